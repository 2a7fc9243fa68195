use std::sync::Arc;

use sqlx::{Error, Pool, Sqlite, Transaction};

use crate::configs::Storage;
use crate::models::GroupMember;

#[derive(Clone)]
pub struct GroupMemberRepository {
    storage: Arc<Storage>,
}

impl GroupMemberRepository {
    pub fn new(storage: Arc<Storage>) -> Self {
        Self { storage }
    }

    pub fn get_pool(&self) -> &Pool<Sqlite> {
        self.storage.get_pool()
    }
}

impl GroupMemberRepository {
    pub async fn create(
        &self,
        item: &GroupMember,
        transaction: &mut Transaction<'_, Sqlite>,
    ) -> Result<i32, Error> {
        let id = sqlx::query(
            r#"
            INSERT INTO group_members (group_id, user_id, is_host, joined_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(item.group_id)
        .bind(&item.user_id)
        .bind(item.is_host)
        .bind(item.joined_at)
        .execute(&mut **transaction)
        .await?
        .last_insert_rowid();

        Ok(id as i32)
    }

    /// Inserts the membership unless it already exists. Returns whether a row was written.
    pub async fn insert_if_absent(
        &self,
        item: &GroupMember,
        transaction: &mut Transaction<'_, Sqlite>,
    ) -> Result<bool, Error> {
        let affected = sqlx::query(
            r#"
            INSERT INTO group_members (group_id, user_id, is_host, joined_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT(group_id, user_id) DO NOTHING
            "#,
        )
        .bind(item.group_id)
        .bind(&item.user_id)
        .bind(item.is_host)
        .bind(item.joined_at)
        .execute(&mut **transaction)
        .await?
        .rows_affected();

        Ok(affected > 0)
    }

    pub async fn find(&self, group_id: i32, user_id: &str) -> Result<Option<GroupMember>, Error> {
        let member: Option<GroupMember> =
            sqlx::query_as("SELECT * FROM group_members WHERE group_id = $1 AND user_id = $2")
                .bind(group_id)
                .bind(user_id)
                .fetch_optional(self.storage.get_pool())
                .await?;

        Ok(member)
    }

    pub async fn find_by_group_id(&self, group_id: i32) -> Result<Vec<GroupMember>, Error> {
        let members: Vec<GroupMember> = sqlx::query_as(
            "SELECT * FROM group_members WHERE group_id = $1 ORDER BY is_host DESC, joined_at, id",
        )
        .bind(group_id)
        .fetch_all(self.storage.get_pool())
        .await?;

        Ok(members)
    }
}
