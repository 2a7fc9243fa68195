use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use sqlx::{Error, Pool, QueryBuilder, Sqlite, Transaction};
use time::OffsetDateTime;

use crate::configs::Storage;
use crate::models::{CandidateVenue, GroupRestaurant, Restaurant};

#[derive(Clone)]
pub struct RestaurantRepository {
    storage: Arc<Storage>,
}

impl RestaurantRepository {
    pub fn new(storage: Arc<Storage>) -> Self {
        Self { storage }
    }

    pub fn get_pool(&self) -> &Pool<Sqlite> {
        self.storage.get_pool()
    }
}

impl RestaurantRepository {
    /// Stores venues not seen before and returns the stored row of every distinct
    /// `provider_id`, in first-seen input order. Existing rows are left untouched.
    pub async fn upsert_by_external_id(
        &self,
        venues: &[CandidateVenue],
        transaction: &mut Transaction<'_, Sqlite>,
    ) -> Result<Vec<Restaurant>, Error> {
        let mut seen = HashSet::new();
        let venues: Vec<&CandidateVenue> = venues
            .iter()
            .filter(|venue| seen.insert(venue.provider_id.as_str()))
            .collect();

        if venues.is_empty() {
            return Ok(vec![]);
        }

        let now = OffsetDateTime::now_utc();

        let mut insert = QueryBuilder::<Sqlite>::new(
            r#"
            INSERT INTO restaurants (external_id, name, address, phone, opening_hours, photo, rating, review_count, latitude, longitude, created_at)
            "#,
        );
        insert.push_values(venues.iter(), |mut row, venue| {
            row.push_bind(venue.provider_id.clone())
                .push_bind(venue.name.clone())
                .push_bind(venue.address.clone())
                .push_bind(venue.phone.clone())
                .push_bind(venue.opening_hours.clone())
                .push_bind(venue.photo.clone())
                .push_bind(venue.rating)
                .push_bind(venue.review_count)
                .push_bind(venue.latitude)
                .push_bind(venue.longitude)
                .push_bind(now);
        });
        insert.push(" ON CONFLICT(external_id) DO NOTHING");
        insert.build().execute(&mut **transaction).await?;

        let mut select =
            QueryBuilder::<Sqlite>::new("SELECT * FROM restaurants WHERE external_id IN (");
        let mut ids = select.separated(", ");
        for venue in &venues {
            ids.push_bind(venue.provider_id.clone());
        }
        ids.push_unseparated(")");

        let stored: Vec<Restaurant> = select
            .build_query_as::<Restaurant>()
            .fetch_all(&mut **transaction)
            .await?;

        let mut by_external_id: HashMap<String, Restaurant> = stored
            .into_iter()
            .filter_map(|restaurant| {
                restaurant
                    .external_id
                    .clone()
                    .map(|external_id| (external_id, restaurant))
            })
            .collect();

        Ok(venues
            .iter()
            .filter_map(|venue| by_external_id.remove(&venue.provider_id))
            .collect())
    }

    /// Links restaurants to a group, skipping pairs already linked. Returns the number of new links.
    pub async fn link_to_group(
        &self,
        group_id: i32,
        restaurant_ids: &[i32],
        transaction: &mut Transaction<'_, Sqlite>,
    ) -> Result<u64, Error> {
        if restaurant_ids.is_empty() {
            return Ok(0);
        }

        let now = OffsetDateTime::now_utc();

        let mut insert = QueryBuilder::<Sqlite>::new(
            "INSERT INTO group_restaurants (group_id, restaurant_id, added_at) ",
        );
        insert.push_values(restaurant_ids.iter(), |mut row, restaurant_id| {
            row.push_bind(group_id)
                .push_bind(*restaurant_id)
                .push_bind(now);
        });
        insert.push(" ON CONFLICT(group_id, restaurant_id) DO NOTHING");

        let affected = insert
            .build()
            .execute(&mut **transaction)
            .await?
            .rows_affected();

        Ok(affected)
    }

    pub async fn find_by_group_id(&self, group_id: i32) -> Result<Vec<Restaurant>, Error> {
        let restaurants: Vec<Restaurant> = sqlx::query_as(
            r#"
            SELECT r.* FROM restaurants r
            INNER JOIN group_restaurants gr ON r.id = gr.restaurant_id
            WHERE gr.group_id = $1
            ORDER BY r.id
            "#,
        )
        .bind(group_id)
        .fetch_all(self.storage.get_pool())
        .await?;

        Ok(restaurants)
    }

    pub async fn is_linked(&self, group_id: i32, restaurant_id: i32) -> Result<bool, Error> {
        let link: Option<GroupRestaurant> = sqlx::query_as(
            "SELECT * FROM group_restaurants WHERE group_id = $1 AND restaurant_id = $2",
        )
        .bind(group_id)
        .bind(restaurant_id)
        .fetch_optional(self.storage.get_pool())
        .await?;

        Ok(link.is_some())
    }
}
