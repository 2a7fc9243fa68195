use munch_api::MemberResponse;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::Table;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct GroupMember {
    pub id: i32,
    pub group_id: i32,
    pub user_id: String,
    pub is_host: bool,
    pub joined_at: OffsetDateTime,
}

impl From<GroupMember> for MemberResponse {
    fn from(member: GroupMember) -> Self {
        Self {
            group_id: member.group_id,
            user_id: member.user_id,
            is_host: member.is_host,
            joined_at: member.joined_at,
        }
    }
}

#[derive(Clone)]
pub struct GroupMemberTable;

impl Table for GroupMemberTable {
    fn name(&self) -> &'static str {
        "group_members"
    }

    fn create(&self) -> String {
        // The partial index keeps a single host per group.
        String::from(
            r#"
            CREATE TABLE IF NOT EXISTS group_members (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                group_id INTEGER NOT NULL,
                user_id TEXT NOT NULL,
                is_host BOOLEAN NOT NULL DEFAULT FALSE,
                joined_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
                FOREIGN KEY (group_id) REFERENCES groups (id) ON DELETE CASCADE,
                UNIQUE(group_id, user_id)
            );
            CREATE UNIQUE INDEX IF NOT EXISTS group_members_single_host
                ON group_members (group_id) WHERE is_host;
            "#,
        )
    }

    fn dispose(&self) -> String {
        String::from("DROP TABLE IF EXISTS group_members;")
    }

    fn dependencies(&self) -> Vec<&'static str> {
        vec!["groups"]
    }
}
