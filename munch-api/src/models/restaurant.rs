use serde::{Deserialize, Serialize};

use super::Id;

#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestaurantResponse {
    pub id: Id,
    /// Identifier assigned by the places provider
    pub external_id: Option<String>,
    pub name: String,
    pub address: String,
    pub phone: String,
    pub opening_hours: String,
    pub photo: String,
    pub rating: f64,
    pub review_count: i64,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}
