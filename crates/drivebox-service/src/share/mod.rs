//! Share services: public links, optional passwords, and expiry.

pub mod link;
pub mod password;
pub mod service;

pub use link::LinkService;
pub use password::PasswordHasher;
pub use service::{ShareRequest, ShareService, SharedItemView};
