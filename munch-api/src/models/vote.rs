use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::Id;
use super::restaurant::RestaurantResponse;

#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CastVoteRequest {
    pub restaurant_id: Id,
    /// `true` keeps the restaurant, `false` vetoes it
    pub value: bool,
}

#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoteResponse {
    pub id: Id,
    pub user_id: String,
    pub group_id: Id,
    pub restaurant_id: Id,
    pub value: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedRestaurantResponse {
    pub restaurant: RestaurantResponse,
    pub likes: i64,
    pub vetoes: i64,
    /// Likes minus vetoes
    pub score: i64,
}

#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultsResponse {
    pub podium: Vec<RankedRestaurantResponse>,
    pub remaining: Vec<RankedRestaurantResponse>,
    pub excluded: Vec<RankedRestaurantResponse>,
}
