use std::sync::Arc;

use sqlx::{Error, Pool, Sqlite, Transaction};

use crate::configs::Storage;
use crate::models::{Vote, VoteTally};

#[derive(Clone)]
pub struct VoteRepository {
    storage: Arc<Storage>,
}

impl VoteRepository {
    pub fn new(storage: Arc<Storage>) -> Self {
        Self { storage }
    }

    pub fn get_pool(&self) -> &Pool<Sqlite> {
        self.storage.get_pool()
    }
}

impl VoteRepository {
    /// Records a vote, replacing any earlier vote by the same user on the same restaurant.
    pub async fn upsert(
        &self,
        item: &Vote,
        transaction: &mut Transaction<'_, Sqlite>,
    ) -> Result<Vote, Error> {
        let vote: Vote = sqlx::query_as(
            r#"
            INSERT INTO votes (user_id, restaurant_id, group_id, vote_value, created_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT(user_id, group_id, restaurant_id)
            DO UPDATE SET vote_value = excluded.vote_value, created_at = excluded.created_at
            RETURNING *
            "#,
        )
        .bind(&item.user_id)
        .bind(item.restaurant_id)
        .bind(item.group_id)
        .bind(item.vote_value)
        .bind(item.created_at)
        .fetch_one(&mut **transaction)
        .await?;

        Ok(vote)
    }

    /// Counts likes and vetoes for every restaurant linked to the group, including unvoted ones.
    pub async fn tally_by_group(&self, group_id: i32) -> Result<Vec<VoteTally>, Error> {
        let tallies: Vec<VoteTally> = sqlx::query_as(
            r#"
            SELECT gr.restaurant_id AS restaurant_id,
                   COALESCE(SUM(CASE WHEN v.vote_value = 1 THEN 1 ELSE 0 END), 0) AS likes,
                   COALESCE(SUM(CASE WHEN v.vote_value = 0 THEN 1 ELSE 0 END), 0) AS vetoes
            FROM group_restaurants gr
            LEFT JOIN votes v ON v.group_id = gr.group_id AND v.restaurant_id = gr.restaurant_id
            WHERE gr.group_id = $1
            GROUP BY gr.restaurant_id
            ORDER BY gr.restaurant_id
            "#,
        )
        .bind(group_id)
        .fetch_all(self.storage.get_pool())
        .await?;

        Ok(tallies)
    }
}
