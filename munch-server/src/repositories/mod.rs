mod group;
mod group_member;
mod restaurant;
mod vote;

pub use group::{GroupRepository, GroupWithMembers};
pub use group_member::GroupMemberRepository;
pub use restaurant::RestaurantRepository;
pub use vote::VoteRepository;
