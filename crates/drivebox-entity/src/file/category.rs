//! Listing categories offered by the file browser.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A named view over a user's files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FileCategory {
    Trashed,
    Videos,
    Audio,
    Pdf,
    Word,
    Photos,
    Excel,
    Shared,
    SharedWithMe,
}

impl FileCategory {
    /// Returns the URL slug for this category.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trashed => "trashed",
            Self::Videos => "videos",
            Self::Audio => "audio",
            Self::Pdf => "pdf",
            Self::Word => "word",
            Self::Photos => "photos",
            Self::Excel => "excel",
            Self::Shared => "shared",
            Self::SharedWithMe => "shared-with-me",
        }
    }
}

impl fmt::Display for FileCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FileCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "trashed" => Ok(Self::Trashed),
            "videos" => Ok(Self::Videos),
            "audio" => Ok(Self::Audio),
            "pdf" => Ok(Self::Pdf),
            "word" => Ok(Self::Word),
            "photos" => Ok(Self::Photos),
            "excel" => Ok(Self::Excel),
            "shared" => Ok(Self::Shared),
            "shared-with-me" => Ok(Self::SharedWithMe),
            other => Err(format!("Unknown file category: {other}")),
        }
    }
}
