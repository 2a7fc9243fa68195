mod group_service;
pub mod join_code;
mod membership_service;
mod places_service;
mod token_service;
mod vote_service;

pub use group_service::*;
pub use membership_service::*;
pub use places_service::*;
pub use token_service::*;
pub use vote_service::*;
