use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::member::MemberResponse;
use super::{Coordinates, Id};

#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateGroupRequest {
    /// Group name, unique per owner
    pub name: String,
    /// Budget per person
    pub budget: f64,
    /// Search radius in miles
    pub radius: f64,
    /// Center of the restaurant search
    pub location: Coordinates,
}

#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupResponse {
    pub id: Id,
    pub name: String,
    pub budget: f64,
    /// Search radius in meters
    pub radius: i32,
    pub location: Coordinates,
    pub join_code: String,
    pub is_active: bool,
    pub created_by: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupSummaryResponse {
    #[serde(flatten)]
    pub group: GroupResponse,
    /// Number of members, host included
    pub member_count: i64,
}

#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogSource {
    /// Venues came from the places provider
    Live,
    /// The provider was unavailable and sample venues were used
    Fallback,
}

#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestionResponse {
    /// Where the candidate venues came from
    pub source: CatalogSource,
    /// Why sample venues were served instead of live data
    pub fallback_reason: Option<String>,
    /// Restaurants from this search now linked to the group
    pub linked: usize,
    /// Set when the candidate list could not be stored; the group is still usable
    pub error: Option<String>,
}

#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateGroupResponse {
    pub group: GroupResponse,
    pub host: MemberResponse,
    pub ingestion: IngestionResponse,
}

#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetActiveRequest {
    pub is_active: bool,
}
