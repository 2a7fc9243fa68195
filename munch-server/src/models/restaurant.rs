use munch_api::RestaurantResponse;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::Table;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Restaurant {
    pub id: i32,
    /// Identifier assigned by the places provider, `None` for manual rows.
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
    pub created_at: OffsetDateTime,
}

impl From<Restaurant> for RestaurantResponse {
    fn from(restaurant: Restaurant) -> Self {
        Self {
            id: restaurant.id,
            external_id: restaurant.external_id,
            name: restaurant.name,
            address: restaurant.address,
            phone: restaurant.phone,
            opening_hours: restaurant.opening_hours,
            photo: restaurant.photo,
            rating: restaurant.rating,
            review_count: restaurant.review_count,
            latitude: restaurant.latitude,
            longitude: restaurant.longitude,
        }
    }
}

#[derive(Clone)]
pub struct RestaurantTable;

impl Table for RestaurantTable {
    fn name(&self) -> &'static str {
        "restaurants"
    }

    fn create(&self) -> String {
        String::from(
            r#"
            CREATE TABLE IF NOT EXISTS restaurants (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                external_id TEXT UNIQUE,
                name TEXT NOT NULL,
                address TEXT NOT NULL,
                phone TEXT NOT NULL,
                opening_hours TEXT NOT NULL,
                photo TEXT NOT NULL,
                rating REAL NOT NULL DEFAULT 0,
                review_count INTEGER NOT NULL DEFAULT 0,
                latitude REAL,
                longitude REAL,
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            );
            "#,
        )
    }

    fn dispose(&self) -> String {
        String::from("DROP TABLE IF EXISTS restaurants;")
    }

    fn dependencies(&self) -> Vec<&'static str> {
        vec![]
    }
}

/// A venue as reported by the places provider, before it is stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateVenue {
    pub provider_id: String,
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
