use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::Id;
use super::group::GroupResponse;

#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinGroupRequest {
    /// Code shared by the group host
    pub join_code: String,
}

#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberResponse {
    pub group_id: Id,
    pub user_id: String,
    pub is_host: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub joined_at: OffsetDateTime,
}

#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinGroupResponse {
    pub group: GroupResponse,
    pub member: MemberResponse,
    /// False when the user was already a member
    pub created: bool,
}
