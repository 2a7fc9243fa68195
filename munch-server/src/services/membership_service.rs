use std::sync::Arc;

use time::OffsetDateTime;

use crate::configs::Storage;
use crate::errors::GroupError;
use crate::models::{Group, GroupMember};
use crate::repositories::{GroupMemberRepository, GroupRepository};
use crate::services::join_code;

#[derive(Debug)]
pub struct JoinOutcome {
    pub group: Group,
    pub member: GroupMember,
    /// `false` when the user was already a member.
    pub created: bool,
}

#[derive(Clone)]
pub struct MembershipService {
    storage: Arc<Storage>,
    group_repository: GroupRepository,
    member_repository: GroupMemberRepository,
}

impl MembershipService {
    pub fn new(storage: Arc<Storage>) -> Self {
        Self {
            group_repository: GroupRepository::new(storage.clone()),
            member_repository: GroupMemberRepository::new(storage.clone()),
            storage,
        }
    }

    /// Adds the user to the active group behind `join_code` as a guest.
    pub async fn join(&self, join_code: &str, user_id: &str) -> Result<JoinOutcome, GroupError> {
        let join_code = join_code::normalize(join_code);

        let group = self
            .group_repository
            .find_active_by_join_code(&join_code)
            .await?
            .ok_or(GroupError::GroupNotFound)?;

        let guest = GroupMember {
            id: 0,
            group_id: group.id,
            user_id: user_id.to_string(),
            is_host: false,
            joined_at: OffsetDateTime::now_utc(),
        };

        let mut tx = self.storage.get_pool().begin().await?;
        let created = self
            .member_repository
            .insert_if_absent(&guest, &mut tx)
            .await?;
        tx.commit().await?;

        let member = self
            .member_repository
            .find(group.id, user_id)
            .await?
            .ok_or(GroupError::UserNotInGroup)?;

        if created {
            tracing::info!(group_id = group.id, user_id, "user joined group");
        }

        Ok(JoinOutcome {
            group,
            member,
            created,
        })
    }

    /// Lists the members of a group, host first. The caller must be a member.
    pub async fn members(
        &self,
        join_code: &str,
        user_id: &str,
    ) -> Result<Vec<GroupMember>, GroupError> {
        let group = self
            .group_repository
            .find_by_join_code(&join_code::normalize(join_code))
            .await?
            .ok_or(GroupError::GroupNotFound)?;

        let members = self.member_repository.find_by_group_id(group.id).await?;
        if !members.iter().any(|member| member.user_id == user_id) {
            return Err(GroupError::UserNotInGroup);
        }

        Ok(members)
    }
}

#[cfg(test)]
mod tests {
    use crate::tests::*;

    use super::*;

    #[tokio::test]
    async fn test_join_is_idempotent() {
        let storage = setup_test_db().await;
        let group = create_test_group(storage.clone(), "Dinner", "host").await;
        create_test_member(storage.clone(), group.id, "host", true).await;

        let service = MembershipService::new(storage.clone());

        let first = service.join(&group.join_code, "guest").await.unwrap();
        let second = service.join(&group.join_code, "guest").await.unwrap();

        assert!(first.created);
        assert!(!second.created);
        assert!(!first.member.is_host);
        assert_eq!(first.member.id, second.member.id);
        assert_eq!(first.member.joined_at, second.member.joined_at);
    }

    #[tokio::test]
    async fn test_join_normalizes_code() {
        let storage = setup_test_db().await;
        let group = create_test_group(storage.clone(), "Dinner", "host").await;

        let service = MembershipService::new(storage.clone());
        let typed = format!("  {}  ", group.join_code.to_lowercase());

        let outcome = service.join(&typed, "guest").await.unwrap();
        assert_eq!(outcome.group.id, group.id);
    }

    #[tokio::test]
    async fn test_host_rejoin_keeps_host_flag() {
        let storage = setup_test_db().await;
        let group = create_test_group(storage.clone(), "Dinner", "host").await;
        create_test_member(storage.clone(), group.id, "host", true).await;

        let service = MembershipService::new(storage.clone());
        let outcome = service.join(&group.join_code, "host").await.unwrap();

        assert!(!outcome.created);
        assert!(outcome.member.is_host);
    }

    #[tokio::test]
    async fn test_join_unknown_or_inactive_group() {
        let storage = setup_test_db().await;
        let group = create_test_group(storage.clone(), "Dinner", "host").await;

        let mut tx = storage.get_pool().begin().await.unwrap();
        GroupRepository::new(storage.clone())
            .set_active(group.id, false, &mut tx)
            .await
            .unwrap();
        tx.commit().await.unwrap();

        let service = MembershipService::new(storage.clone());

        assert!(matches!(
            service.join("ZZZZZZ", "guest").await,
            Err(GroupError::GroupNotFound)
        ));
        assert!(matches!(
            service.join(&group.join_code, "guest").await,
            Err(GroupError::GroupNotFound)
        ));
    }

    #[tokio::test]
    async fn test_members_requires_membership() {
        let storage = setup_test_db().await;
        let group = create_test_group(storage.clone(), "Dinner", "host").await;
        create_test_member(storage.clone(), group.id, "host", true).await;
        create_test_member(storage.clone(), group.id, "guest", false).await;

        let service = MembershipService::new(storage.clone());

        let members = service.members(&group.join_code, "guest").await.unwrap();
        assert_eq!(members.len(), 2);
        assert!(members[0].is_host);

        assert!(matches!(
            service.members(&group.join_code, "stranger").await,
            Err(GroupError::UserNotInGroup)
        ));
    }
}
