//! Share domain entities.

pub mod model;

pub use model::{CreateSharedItem, ShareableType, SharedItem};
