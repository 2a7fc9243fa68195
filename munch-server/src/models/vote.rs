use munch_api::VoteResponse;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::Table;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Vote {
    pub id: i32,
    pub user_id: String,
    pub restaurant_id: i32,
    pub group_id: i32,
    /// `true` keeps the restaurant, `false` is a veto.
    pub vote_value: bool,
    pub created_at: OffsetDateTime,
}

impl From<Vote> for VoteResponse {
    fn from(vote: Vote) -> Self {
        Self {
            id: vote.id,
            user_id: vote.user_id,
            group_id: vote.group_id,
            restaurant_id: vote.restaurant_id,
            value: vote.vote_value,
            created_at: vote.created_at,
        }
    }
}

#[derive(Clone)]
pub struct VoteTable;

impl Table for VoteTable {
    fn name(&self) -> &'static str {
        "votes"
    }

    fn create(&self) -> String {
        String::from(
            r#"
            CREATE TABLE IF NOT EXISTS votes (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id TEXT NOT NULL,
                restaurant_id INTEGER NOT NULL,
                group_id INTEGER NOT NULL,
                vote_value BOOLEAN NOT NULL,
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
                FOREIGN KEY (restaurant_id) REFERENCES restaurants (id) ON DELETE CASCADE,
                FOREIGN KEY (group_id) REFERENCES groups (id) ON DELETE CASCADE,
                UNIQUE(user_id, group_id, restaurant_id)
            );
            "#,
        )
    }

    fn dispose(&self) -> String {
        String::from("DROP TABLE IF EXISTS votes;")
    }

    fn dependencies(&self) -> Vec<&'static str> {
        vec!["groups", "restaurants"]
    }
}

/// Per-restaurant vote counts inside one group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::FromRow)]
pub struct VoteTally {
    pub restaurant_id: i32,
    pub likes: i64,
    pub vetoes: i64,
}

impl VoteTally {
    pub fn score(&self) -> i64 {
        self.likes - self.vetoes
    }
}
