pub mod group;
pub mod group_member;
pub mod group_restaurant;
pub mod restaurant;
pub mod vote;

pub use group::{Group, GroupTable};
pub use group_member::{GroupMember, GroupMemberTable};
pub use group_restaurant::{GroupRestaurant, GroupRestaurantTable};
pub use restaurant::{CandidateVenue, Restaurant, RestaurantTable};
pub use vote::{Vote, VoteTable, VoteTally};

pub trait Table {
    /// The name of the table
    fn name(&self) -> &'static str;

    /// The SQL statement to create the table
    fn create(&self) -> String;

    /// The SQL statement to dispose the table
    fn dispose(&self) -> String;

    /// The dependencies of the table
    fn dependencies(&self) -> Vec<&'static str>;
}
