mod group_handle;
mod membership_handle;
mod vote_handle;

pub use group_handle::*;
pub use membership_handle::*;
pub use vote_handle::*;
