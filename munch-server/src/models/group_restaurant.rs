use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::Table;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct GroupRestaurant {
    pub id: i32,
    pub group_id: i32,
    pub restaurant_id: i32,
    pub added_at: OffsetDateTime,
}

#[derive(Clone)]
pub struct GroupRestaurantTable;

impl Table for GroupRestaurantTable {
    fn name(&self) -> &'static str {
        "group_restaurants"
    }

    fn create(&self) -> String {
        String::from(
            r#"
            CREATE TABLE IF NOT EXISTS group_restaurants (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                group_id INTEGER NOT NULL,
                restaurant_id INTEGER NOT NULL,
                added_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
                FOREIGN KEY (group_id) REFERENCES groups (id) ON DELETE CASCADE,
                FOREIGN KEY (restaurant_id) REFERENCES restaurants (id) ON DELETE CASCADE,
                UNIQUE(group_id, restaurant_id)
            );
            "#,
        )
    }

    fn dispose(&self) -> String {
        String::from("DROP TABLE IF EXISTS group_restaurants;")
    }

    fn dependencies(&self) -> Vec<&'static str> {
        vec!["groups", "restaurants"]
    }
}
