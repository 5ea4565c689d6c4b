//! File domain entities.

pub mod category;
pub mod model;

pub use category::FileCategory;
pub use model::{CreateFile, File};
