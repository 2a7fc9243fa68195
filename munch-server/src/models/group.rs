use munch_api::{Coordinates, GroupResponse};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::Table;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Group {
    pub id: i32,
    pub name: String,
    pub budget: f64,
    /// Search radius in meters.
    pub radius: i32,
    pub latitude: f64,
    pub longitude: f64,
    pub join_code: String,
    pub is_active: bool,
    pub created_by: String,
    pub created_at: OffsetDateTime,
}

impl Group {
    pub fn center(&self) -> Coordinates {
        Coordinates {
            lat: self.latitude,
            lng: self.longitude,
        }
    }
}

impl From<Group> for GroupResponse {
    fn from(group: Group) -> Self {
        let location = group.center();

        Self {
            id: group.id,
            name: group.name,
            budget: group.budget,
            radius: group.radius,
            location,
            join_code: group.join_code,
            is_active: group.is_active,
            created_by: group.created_by,
            created_at: group.created_at,
        }
    }
}

#[derive(Clone)]
pub struct GroupTable;

impl Table for GroupTable {
    fn name(&self) -> &'static str {
        "groups"
    }

    fn create(&self) -> String {
        String::from(
            r#"
            CREATE TABLE IF NOT EXISTS groups (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name VARCHAR(255) NOT NULL,
                budget REAL NOT NULL CHECK (budget > 0),
                radius INTEGER NOT NULL,
                latitude REAL NOT NULL,
                longitude REAL NOT NULL,
                join_code VARCHAR(16) NOT NULL UNIQUE,
                is_active BOOLEAN NOT NULL DEFAULT TRUE,
                created_by TEXT NOT NULL,
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
                UNIQUE(name, created_by)
            );
            "#,
        )
    }

    fn dispose(&self) -> String {
        String::from("DROP TABLE IF EXISTS groups;")
    }

    fn dependencies(&self) -> Vec<&'static str> {
        vec![]
    }
}
