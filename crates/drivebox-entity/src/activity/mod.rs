//! File activity entities.

pub mod action;
pub mod model;

pub use action::{ActivityAction, ActivityType};
pub use model::{ActivityRecord, CreateActivity, RequesterInfo};
