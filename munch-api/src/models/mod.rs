mod group;
mod member;
mod restaurant;
mod vote;

pub use group::*;
pub use member::*;
pub use restaurant::*;
pub use vote::*;

use serde::{Deserialize, Serialize};

pub type Id = i32;

#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Latitude in decimal degrees
    pub lat: f64,
    /// Longitude in decimal degrees
    pub lng: f64,
}
