//! Public URLs for stored files.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

/// Characters left unescaped by JavaScript's `encodeURIComponent`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Percent-encode one URL path component.
pub fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, URI_COMPONENT).to_string()
}

/// Builds `{origin}{storage path}/{email}/{file name}` URLs.
#[derive(Debug, Clone)]
pub struct PublicUrlBuilder {
    base: String,
}

impl PublicUrlBuilder {
    pub fn new(public_app_url: &str, public_storage_path: &str) -> Self {
        let origin = public_app_url.trim_end_matches('/');
        let path = public_storage_path.trim_matches('/');
        Self {
            base: format!("{origin}/{path}"),
        }
    }

    /// URL a user's file is served from.
    pub fn file_url(&self, email: &str, file_name: &str) -> String {
        format!(
            "{}/{}/{}",
            self.base,
            encode_component(email),
            encode_component(file_name)
        )
    }
}
