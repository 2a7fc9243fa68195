use std::cmp::Reverse;
use std::collections::HashMap;
use std::sync::Arc;

use munch_api::{RankedRestaurantResponse, ResultsResponse};
use time::OffsetDateTime;

use crate::configs::{Storage, Voting};
use crate::errors::VoteError;
use crate::models::{Restaurant, Vote, VoteTally};
use crate::repositories::{
    GroupMemberRepository, GroupRepository, RestaurantRepository, VoteRepository,
};
use crate::services::join_code;

/// Rule deciding which restaurants drop out of the results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VetoPolicy {
    /// Excluded when vetoes outnumber likes.
    NetNegative,
    /// Excluded once this many members veto.
    Threshold(u32),
}

impl VetoPolicy {
    pub fn excludes(&self, tally: &VoteTally) -> bool {
        match self {
            VetoPolicy::NetNegative => tally.score() < 0,
            VetoPolicy::Threshold(limit) => tally.vetoes >= i64::from(*limit),
        }
    }
}

impl From<&Voting> for VetoPolicy {
    fn from(voting: &Voting) -> Self {
        match voting.veto_threshold {
            Some(limit) => VetoPolicy::Threshold(limit.max(1)),
            None => VetoPolicy::NetNegative,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ranking {
    pub podium: Vec<VoteTally>,
    pub remaining: Vec<VoteTally>,
    pub excluded: Vec<VoteTally>,
}

/// Orders tallies by score, highest first, ties going to the lower restaurant id.
pub fn rank(tallies: Vec<VoteTally>, policy: VetoPolicy, podium_size: usize) -> Ranking {
    let (mut ranked, mut excluded): (Vec<_>, Vec<_>) = tallies
        .into_iter()
        .partition(|tally| !policy.excludes(tally));

    ranked.sort_by_key(|tally| (Reverse(tally.score()), tally.restaurant_id));
    excluded.sort_by_key(|tally| (Reverse(tally.score()), tally.restaurant_id));

    let remaining = ranked.split_off(podium_size.min(ranked.len()));

    Ranking {
        podium: ranked,
        remaining,
        excluded,
    }
}

#[derive(Debug, Clone)]
pub struct RankedRestaurant {
    pub restaurant: Restaurant,
    pub tally: VoteTally,
}

impl From<RankedRestaurant> for RankedRestaurantResponse {
    fn from(ranked: RankedRestaurant) -> Self {
        Self {
            likes: ranked.tally.likes,
            vetoes: ranked.tally.vetoes,
            score: ranked.tally.score(),
            restaurant: ranked.restaurant.into(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Results {
    pub podium: Vec<RankedRestaurant>,
    pub remaining: Vec<RankedRestaurant>,
    pub excluded: Vec<RankedRestaurant>,
}

impl From<Results> for ResultsResponse {
    fn from(results: Results) -> Self {
        Self {
            podium: results.podium.into_iter().map(Into::into).collect(),
            remaining: results.remaining.into_iter().map(Into::into).collect(),
            excluded: results.excluded.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Clone)]
pub struct VoteService {
    storage: Arc<Storage>,
    group_repository: GroupRepository,
    member_repository: GroupMemberRepository,
    restaurant_repository: RestaurantRepository,
    vote_repository: VoteRepository,
    policy: VetoPolicy,
    podium_size: usize,
}

impl VoteService {
    pub fn new(storage: Arc<Storage>, voting: &Voting) -> Self {
        Self {
            group_repository: GroupRepository::new(storage.clone()),
            member_repository: GroupMemberRepository::new(storage.clone()),
            restaurant_repository: RestaurantRepository::new(storage.clone()),
            vote_repository: VoteRepository::new(storage.clone()),
            storage,
            policy: VetoPolicy::from(voting),
            podium_size: voting.podium_size,
        }
    }

    /// Records a like (`true`) or veto (`false`). A later vote replaces an earlier one.
    pub async fn cast_vote(
        &self,
        join_code: &str,
        user_id: &str,
        restaurant_id: i32,
        value: bool,
    ) -> Result<Vote, VoteError> {
        let group = self
            .group_repository
            .find_active_by_join_code(&join_code::normalize(join_code))
            .await?
            .ok_or(VoteError::GroupNotFound)?;

        if !self
            .restaurant_repository
            .is_linked(group.id, restaurant_id)
            .await?
        {
            return Err(VoteError::RestaurantNotFound);
        }

        if self
            .member_repository
            .find(group.id, user_id)
            .await?
            .is_none()
        {
            return Err(VoteError::UserNotInGroup);
        }

        let vote = Vote {
            id: 0,
            user_id: user_id.to_string(),
            restaurant_id,
            group_id: group.id,
            vote_value: value,
            created_at: OffsetDateTime::now_utc(),
        };

        let mut tx = self.storage.get_pool().begin().await?;
        let vote = self.vote_repository.upsert(&vote, &mut tx).await?;
        tx.commit().await?;

        tracing::debug!(group_id = group.id, restaurant_id, value, "vote recorded");

        Ok(vote)
    }

    /// Results of a group the caller belongs to.
    pub async fn results(&self, join_code: &str, user_id: &str) -> Result<Results, VoteError> {
        let group = self
            .group_repository
            .find_by_join_code(&join_code::normalize(join_code))
            .await?
            .ok_or(VoteError::GroupNotFound)?;

        if self
            .member_repository
            .find(group.id, user_id)
            .await?
            .is_none()
        {
            return Err(VoteError::UserNotInGroup);
        }

        self.ranked_results(group.id).await
    }

    /// Ranks every restaurant linked to the group from the current votes.
    pub async fn ranked_results(&self, group_id: i32) -> Result<Results, VoteError> {
        let tallies = self.vote_repository.tally_by_group(group_id).await?;
        let mut restaurants: HashMap<i32, Restaurant> = self
            .restaurant_repository
            .find_by_group_id(group_id)
            .await?
            .into_iter()
            .map(|restaurant| (restaurant.id, restaurant))
            .collect();

        let ranking = rank(tallies, self.policy, self.podium_size);

        let mut attach = |tallies: Vec<VoteTally>| -> Vec<RankedRestaurant> {
            tallies
                .into_iter()
                .filter_map(|tally| {
                    restaurants
                        .remove(&tally.restaurant_id)
                        .map(|restaurant| RankedRestaurant { restaurant, tally })
                })
                .collect()
        };

        Ok(Results {
            podium: attach(ranking.podium),
            remaining: attach(ranking.remaining),
            excluded: attach(ranking.excluded),
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::tests::*;

    use super::*;

    fn tally(restaurant_id: i32, likes: i64, vetoes: i64) -> VoteTally {
        VoteTally {
            restaurant_id,
            likes,
            vetoes,
        }
    }

    fn ids(tallies: &[VoteTally]) -> Vec<i32> {
        tallies.iter().map(|t| t.restaurant_id).collect()
    }

    #[test]
    fn test_rank_net_negative() {
        let ranking = rank(
            vec![tally(3, 0, 1), tally(2, 1, 0), tally(1, 2, 1)],
            VetoPolicy::NetNegative,
            3,
        );

        assert_eq!(ids(&ranking.podium), vec![1, 2]);
        assert!(ranking.remaining.is_empty());
        assert_eq!(ids(&ranking.excluded), vec![3]);
    }

    #[test]
    fn test_rank_threshold() {
        let ranking = rank(
            vec![tally(1, 2, 1), tally(2, 1, 0), tally(3, 0, 0)],
            VetoPolicy::Threshold(1),
            3,
        );

        assert_eq!(ids(&ranking.podium), vec![2, 3]);
        assert_eq!(ids(&ranking.excluded), vec![1]);
    }

    #[test]
    fn test_rank_splits_podium() {
        let ranking = rank(
            vec![
                tally(5, 0, 0),
                tally(4, 3, 0),
                tally(3, 1, 0),
                tally(2, 1, 0),
                tally(1, 2, 0),
            ],
            VetoPolicy::NetNegative,
            3,
        );

        assert_eq!(ids(&ranking.podium), vec![4, 1, 2]);
        assert_eq!(ids(&ranking.remaining), vec![3, 5]);
    }

    #[test]
    fn test_unvoted_restaurant_ranks_below_positive() {
        let ranking = rank(
            vec![tally(1, 0, 0), tally(2, 1, 0)],
            VetoPolicy::NetNegative,
            1,
        );

        assert_eq!(ids(&ranking.podium), vec![2]);
        assert_eq!(ids(&ranking.remaining), vec![1]);
        assert!(ranking.excluded.is_empty());
    }

    #[test]
    fn test_policy_from_settings() {
        let mut voting = Voting::default();
        assert_eq!(VetoPolicy::from(&voting), VetoPolicy::NetNegative);

        voting.veto_threshold = Some(2);
        assert_eq!(VetoPolicy::from(&voting), VetoPolicy::Threshold(2));

        voting.veto_threshold = Some(0);
        assert_eq!(VetoPolicy::from(&voting), VetoPolicy::Threshold(1));
    }

    #[tokio::test]
    async fn test_cast_vote_checks() {
        let storage = setup_test_db().await;
        let group = create_test_group(storage.clone(), "Dinner", "host").await;
        create_test_member(storage.clone(), group.id, "host", true).await;
        let taco = create_test_restaurant(storage.clone(), "Taco Temple").await;
        let stray = create_test_restaurant(storage.clone(), "Stray Diner").await;
        link_test_restaurant(storage.clone(), group.id, taco.id).await;

        let service = VoteService::new(storage.clone(), &Voting::default());

        assert!(matches!(
            service.cast_vote("NOPE00", "host", taco.id, true).await,
            Err(VoteError::GroupNotFound)
        ));
        assert!(matches!(
            service.cast_vote(&group.join_code, "host", stray.id, true).await,
            Err(VoteError::RestaurantNotFound)
        ));
        assert!(matches!(
            service.cast_vote(&group.join_code, "stranger", taco.id, true).await,
            Err(VoteError::UserNotInGroup)
        ));

        let vote = service
            .cast_vote(&group.join_code, "host", taco.id, true)
            .await
            .unwrap();
        assert!(vote.vote_value);

        let vote = service
            .cast_vote(&group.join_code, "host", taco.id, false)
            .await
            .unwrap();
        assert!(!vote.vote_value);
    }

    #[tokio::test]
    async fn test_ranked_results_from_votes() {
        let storage = setup_test_db().await;
        let group = create_test_group(storage.clone(), "Dinner", "host").await;
        let r1 = create_test_restaurant(storage.clone(), "Pasta Paradise").await;
        let r2 = create_test_restaurant(storage.clone(), "Burger Bistro").await;
        let r3 = create_test_restaurant(storage.clone(), "Sushi Sensation").await;
        for restaurant in [&r1, &r2, &r3] {
            link_test_restaurant(storage.clone(), group.id, restaurant.id).await;
        }

        create_test_vote(storage.clone(), "a", group.id, r1.id, true).await;
        create_test_vote(storage.clone(), "b", group.id, r1.id, true).await;
        create_test_vote(storage.clone(), "c", group.id, r1.id, false).await;
        create_test_vote(storage.clone(), "a", group.id, r2.id, true).await;
        create_test_vote(storage.clone(), "a", group.id, r3.id, false).await;

        let service = VoteService::new(storage.clone(), &Voting::default());
        let results = service.ranked_results(group.id).await.unwrap();

        let podium: Vec<&str> = results
            .podium
            .iter()
            .map(|r| r.restaurant.name.as_str())
            .collect();
        assert_eq!(podium, vec!["Pasta Paradise", "Burger Bistro"]);
        assert_eq!(results.podium[0].tally.score(), 1);
        assert_eq!(results.excluded.len(), 1);
        assert_eq!(results.excluded[0].restaurant.id, r3.id);

        let response = ResultsResponse::from(results);
        assert_eq!(response.podium[0].likes, 2);
        assert_eq!(response.podium[0].vetoes, 1);
    }
}
