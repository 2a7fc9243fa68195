use std::sync::Arc;

use sqlx::{Error, Pool, Sqlite, Transaction};

use crate::configs::Storage;
use crate::models::Group;

/// A group together with its computed member count.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct GroupWithMembers {
    #[sqlx(flatten)]
    pub group: Group,
    pub member_count: i64,
}

#[derive(Clone)]
pub struct GroupRepository {
    storage: Arc<Storage>,
}

impl GroupRepository {
    pub fn new(storage: Arc<Storage>) -> Self {
        Self { storage }
    }

    pub fn get_pool(&self) -> &Pool<Sqlite> {
        self.storage.get_pool()
    }
}

impl GroupRepository {
    pub async fn create(
        &self,
        item: &Group,
        transaction: &mut Transaction<'_, Sqlite>,
    ) -> Result<i32, Error> {
        let id = sqlx::query(
            r#"
            INSERT INTO groups (name, budget, radius, latitude, longitude, join_code, is_active, created_by, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(&item.name)
        .bind(item.budget)
        .bind(item.radius)
        .bind(item.latitude)
        .bind(item.longitude)
        .bind(&item.join_code)
        .bind(item.is_active)
        .bind(&item.created_by)
        .bind(item.created_at)
        .execute(&mut **transaction)
        .await?
        .last_insert_rowid();

        Ok(id as i32)
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<Group>, Error> {
        let group: Option<Group> = sqlx::query_as("SELECT * FROM groups WHERE id = $1")
            .bind(id)
            .fetch_optional(self.storage.get_pool())
            .await?;

        Ok(group)
    }

    pub async fn find_by_join_code(&self, join_code: &str) -> Result<Option<Group>, Error> {
        let group: Option<Group> = sqlx::query_as("SELECT * FROM groups WHERE join_code = $1")
            .bind(join_code)
            .fetch_optional(self.storage.get_pool())
            .await?;

        Ok(group)
    }

    pub async fn find_active_by_join_code(&self, join_code: &str) -> Result<Option<Group>, Error> {
        let group: Option<Group> =
            sqlx::query_as("SELECT * FROM groups WHERE join_code = $1 AND is_active = TRUE")
                .bind(join_code)
                .fetch_optional(self.storage.get_pool())
                .await?;

        Ok(group)
    }

    pub async fn find_by_name_and_owner(
        &self,
        name: &str,
        created_by: &str,
    ) -> Result<Option<Group>, Error> {
        let group: Option<Group> =
            sqlx::query_as("SELECT * FROM groups WHERE name = $1 AND created_by = $2")
                .bind(name)
                .bind(created_by)
                .fetch_optional(self.storage.get_pool())
                .await?;

        Ok(group)
    }

    pub async fn find_by_user_id(&self, user_id: &str) -> Result<Vec<GroupWithMembers>, Error> {
        let groups: Vec<GroupWithMembers> = sqlx::query_as(
            r#"
            SELECT g.*, (
                SELECT COUNT(*) FROM group_members all_members WHERE all_members.group_id = g.id
            ) AS member_count
            FROM groups g
            INNER JOIN group_members gm ON g.id = gm.group_id
            WHERE gm.user_id = $1
            ORDER BY g.created_at DESC, g.id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(self.storage.get_pool())
        .await?;

        Ok(groups)
    }

    pub async fn set_active(
        &self,
        id: i32,
        is_active: bool,
        transaction: &mut Transaction<'_, Sqlite>,
    ) -> Result<(), Error> {
        sqlx::query("UPDATE groups SET is_active = $1 WHERE id = $2")
            .bind(is_active)
            .bind(id)
            .execute(&mut **transaction)
            .await?;

        Ok(())
    }
}
