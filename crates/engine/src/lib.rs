//! Placement helpers built on the core engine.
//!
//! - [`place`]: plan and apply "rotate, shift, hard drop" placements
//! - [`autoplay`]: greedy placement chooser used by the headless player

pub mod autoplay;
pub mod place;

pub use autoplay::{choose, choose_from_snapshot, grid_features, Choice, GridFeatures, Weights};
pub use place::{apply_place, plan_place, PlaceError, Plan};
