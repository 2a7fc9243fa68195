use std::sync::Arc;

use munch_api::{CreateGroupRequest, IngestionResponse};
use time::OffsetDateTime;

use crate::configs::Storage;
use crate::errors::{CatalogError, CreationPhase, FieldErrors, GroupError};
use crate::models::{CandidateVenue, Group, GroupMember, Restaurant};
use crate::repositories::{
    GroupMemberRepository, GroupRepository, GroupWithMembers, RestaurantRepository,
};
use crate::services::join_code::{self, JOIN_CODE_LENGTH};
use crate::services::places_service::{PlacesService, PlacesSource, miles_to_meters};

const JOIN_CODE_ATTEMPTS: usize = 5;

const MIN_BUDGET: f64 = 10.0;
const MAX_BUDGET: f64 = 300.0;
const MIN_RADIUS_MILES: f64 = 1.0;
const MAX_RADIUS_MILES: f64 = 25.0;

/// Outcome of fetching and storing a group's candidate restaurants.
///
/// A failed ingestion never undoes the group; `error` tells the caller to retry.
#[derive(Debug)]
pub struct IngestionReport {
    pub source: PlacesSource,
    pub linked: usize,
    pub error: Option<CatalogError>,
}

impl From<&IngestionReport> for IngestionResponse {
    fn from(report: &IngestionReport) -> Self {
        Self {
            source: report.source.catalog_source(),
            fallback_reason: report.source.fallback_reason().map(str::to_string),
            linked: report.linked,
            error: report.error.as_ref().map(ToString::to_string),
        }
    }
}

#[derive(Debug)]
pub struct CreatedGroup {
    pub group: Group,
    pub host: GroupMember,
    pub ingestion: IngestionReport,
}

#[derive(Clone)]
pub struct GroupService {
    storage: Arc<Storage>,
    group_repository: GroupRepository,
    member_repository: GroupMemberRepository,
    restaurant_repository: RestaurantRepository,
    places_service: Arc<PlacesService>,
}

impl GroupService {
    pub fn new(storage: Arc<Storage>, places_service: Arc<PlacesService>) -> Self {
        Self {
            group_repository: GroupRepository::new(storage.clone()),
            member_repository: GroupMemberRepository::new(storage.clone()),
            restaurant_repository: RestaurantRepository::new(storage.clone()),
            storage,
            places_service,
        }
    }

    pub fn validate(request: &CreateGroupRequest) -> Result<(), GroupError> {
        let mut errors = FieldErrors::default();

        if request.name.trim().is_empty() {
            errors.add("name", "Group name is required");
        }
        if !(MIN_BUDGET..=MAX_BUDGET).contains(&request.budget) {
            errors.add("budget", "Budget must be between 10 and 300");
        }
        if !(MIN_RADIUS_MILES..=MAX_RADIUS_MILES).contains(&request.radius) {
            errors.add("radius", "Radius must be between 1 and 25 miles");
        }
        if !(-90.0..=90.0).contains(&request.location.lat) {
            errors.add("location.lat", "Latitude must be between -90 and 90");
        }
        if !(-180.0..=180.0).contains(&request.location.lng) {
            errors.add("location.lng", "Longitude must be between -180 and 180");
        }

        errors.into_result()
    }

    /// Creates a group hosted by `owner_id` and fills its candidate deck.
    pub async fn create_group(
        &self,
        owner_id: &str,
        request: &CreateGroupRequest,
    ) -> Result<CreatedGroup, GroupError> {
        Self::validate(request)?;

        let name = request.name.trim();

        if self
            .group_repository
            .find_by_name_and_owner(name, owner_id)
            .await?
            .is_some()
        {
            return Err(GroupError::GroupNameExists);
        }

        let now = OffsetDateTime::now_utc();
        let mut group = Group {
            id: 0,
            name: name.to_string(),
            budget: request.budget,
            radius: miles_to_meters(request.radius),
            latitude: request.location.lat,
            longitude: request.location.lng,
            join_code: String::new(),
            is_active: true,
            created_by: owner_id.to_string(),
            created_at: now,
        };
        let host = GroupMember {
            id: 0,
            group_id: 0,
            user_id: owner_id.to_string(),
            is_host: true,
            joined_at: now,
        };

        let group_id = self
            .insert_with_unique_code(&mut group, &host, || join_code::generate(JOIN_CODE_LENGTH))
            .await?;

        let group = self
            .group_repository
            .find_by_id(group_id)
            .await?
            .ok_or(GroupError::GroupNotFound)?;
        let host = self
            .member_repository
            .find(group_id, owner_id)
            .await?
            .ok_or(GroupError::UserNotInGroup)?;

        tracing::info!(group_id, join_code = %group.join_code, "group created");

        let ingestion = self.ingest(&group).await;

        Ok(CreatedGroup {
            group,
            host,
            ingestion,
        })
    }

    /// Draws join codes from `next_code` until one is free, giving up after a few collisions.
    async fn insert_with_unique_code(
        &self,
        group: &mut Group,
        host: &GroupMember,
        mut next_code: impl FnMut() -> String,
    ) -> Result<i32, GroupError> {
        for attempt in 1..=JOIN_CODE_ATTEMPTS {
            group.join_code = next_code();

            if let Some(group_id) = self.insert_with_host(group, host).await? {
                return Ok(group_id);
            }
            tracing::debug!(attempt, join_code = %group.join_code, "join code taken, retrying");
        }

        Err(GroupError::JoinCodeExhausted)
    }

    /// Writes the group and its host in one transaction. Returns `None` when the join code is taken.
    async fn insert_with_host(
        &self,
        group: &Group,
        host: &GroupMember,
    ) -> Result<Option<i32>, GroupError> {
        let mut tx = self.storage.get_pool().begin().await?;

        let group_id = match self.group_repository.create(group, &mut tx).await {
            Ok(id) => id,
            Err(e) if violates_unique(&e, "join_code") => return Ok(None),
            Err(e) if violates_unique(&e, "groups.name") => {
                return Err(GroupError::GroupNameExists);
            }
            Err(source) => {
                return Err(GroupError::Persistence {
                    phase: CreationPhase::InsertGroup,
                    source,
                });
            }
        };

        let host = GroupMember {
            group_id,
            ..host.clone()
        };
        self.member_repository
            .create(&host, &mut tx)
            .await
            .map_err(|source| GroupError::Persistence {
                phase: CreationPhase::InsertHost,
                source,
            })?;

        tx.commit().await.map_err(|source| GroupError::Persistence {
            phase: CreationPhase::Commit,
            source,
        })?;

        Ok(Some(group_id))
    }

    /// Searches around the group's center and links every venue found.
    pub async fn ingest(&self, group: &Group) -> IngestionReport {
        let places = self
            .places_service
            .search(group.center(), group.radius)
            .await;

        match self.store_catalog(group.id, &places.venues).await {
            Ok(linked) => {
                tracing::info!(group_id = group.id, linked, "restaurants linked");

                IngestionReport {
                    source: places.source,
                    linked,
                    error: None,
                }
            }
            Err(e) => {
                tracing::error!(group_id = group.id, error = ?e, "failed to store restaurants");

                IngestionReport {
                    source: places.source,
                    linked: 0,
                    error: Some(e),
                }
            }
        }
    }

    async fn store_catalog(
        &self,
        group_id: i32,
        venues: &[CandidateVenue],
    ) -> Result<usize, CatalogError> {
        let mut tx = self
            .storage
            .get_pool()
            .begin()
            .await
            .map_err(CatalogError::InsertFailed)?;

        let restaurants = self
            .restaurant_repository
            .upsert_by_external_id(venues, &mut tx)
            .await
            .map_err(CatalogError::InsertFailed)?;

        let restaurant_ids: Vec<i32> = restaurants.iter().map(|r| r.id).collect();
        self.restaurant_repository
            .link_to_group(group_id, &restaurant_ids, &mut tx)
            .await
            .map_err(CatalogError::LinkFailed)?;

        tx.commit().await.map_err(CatalogError::LinkFailed)?;

        Ok(restaurant_ids.len())
    }

    /// Re-runs ingestion for a group. Only the host may do this.
    pub async fn refresh_restaurants(
        &self,
        join_code: &str,
        user_id: &str,
    ) -> Result<IngestionReport, GroupError> {
        let (group, member) = self.membership(join_code, user_id).await?;
        if !member.is_host {
            return Err(GroupError::InsufficientPermission);
        }

        let mut report = self.ingest(&group).await;
        match report.error.take() {
            Some(e) => Err(e.into()),
            None => Ok(report),
        }
    }

    pub async fn find_by_join_code(&self, join_code: &str) -> Result<Group, GroupError> {
        self.group_repository
            .find_by_join_code(&join_code::normalize(join_code))
            .await?
            .ok_or(GroupError::GroupNotFound)
    }

    /// Resolves a group the caller belongs to.
    pub async fn membership(
        &self,
        join_code: &str,
        user_id: &str,
    ) -> Result<(Group, GroupMember), GroupError> {
        let group = self.find_by_join_code(join_code).await?;
        let member = self
            .member_repository
            .find(group.id, user_id)
            .await?
            .ok_or(GroupError::UserNotInGroup)?;

        Ok((group, member))
    }

    pub async fn user_groups(&self, user_id: &str) -> Result<Vec<GroupWithMembers>, GroupError> {
        Ok(self.group_repository.find_by_user_id(user_id).await?)
    }

    pub async fn set_active(
        &self,
        join_code: &str,
        user_id: &str,
        is_active: bool,
    ) -> Result<Group, GroupError> {
        let (group, member) = self.membership(join_code, user_id).await?;
        if !member.is_host {
            return Err(GroupError::InsufficientPermission);
        }

        let mut tx = self.storage.get_pool().begin().await?;
        self.group_repository
            .set_active(group.id, is_active, &mut tx)
            .await?;
        tx.commit().await?;

        tracing::info!(group_id = group.id, is_active, "group activity changed");

        Ok(Group { is_active, ..group })
    }

    /// Candidate deck of a group, in id order.
    pub async fn restaurants(
        &self,
        join_code: &str,
        user_id: &str,
    ) -> Result<Vec<Restaurant>, GroupError> {
        let (group, _) = self.membership(join_code, user_id).await?;

        Ok(self.restaurant_repository.find_by_group_id(group.id).await?)
    }
}

fn violates_unique(error: &sqlx::Error, column: &str) -> bool {
    match error {
        sqlx::Error::Database(e) => e.is_unique_violation() && e.message().contains(column),
        _ => false,
    }
}
