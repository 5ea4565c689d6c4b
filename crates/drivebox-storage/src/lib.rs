//! # drivebox-storage
//!
//! The filesystem side of DriveBox: the local blob store provider, the
//! resolver that maps users and folders to directories, the materializer
//! that turns upload streams into files, the file-type classifier, and the
//! public URL builder.

pub mod classify;
pub mod materialize;
pub mod paths;
pub mod providers;
pub mod url;

pub use classify::classify_file_type;
pub use materialize::FileMaterializer;
pub use paths::PathResolver;
pub use providers::LocalStorageProvider;
pub use url::PublicUrlBuilder;
