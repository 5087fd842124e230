//! Store URL construction
//!
//! Collections live at `{base}{path}.json`; single entities at
//! `{base}{path}/{id}.json`. The id segment is always percent-encoded with the
//! same reserved set as JavaScript's `encodeURIComponent`.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Characters `encodeURIComponent` leaves alone besides alphanumerics
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

/// Percent-encode one path segment
pub fn encode_segment(segment: &str) -> String {
    utf8_percent_encode(segment, URI_COMPONENT).to_string()
}

/// URL builder bound to one store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreUrls {
    base: String,
    auth_query: Option<String>,
}

impl StoreUrls {
    /// `base_url` gains a trailing slash if it lacks one
    pub fn new(base_url: &str, auth_token: Option<&str>) -> Self {
        let trimmed = base_url.trim().trim_end_matches('/');
        Self {
            base: format!("{}/", trimmed),
            auth_query: auth_token
                .filter(|t| !t.is_empty())
                .map(|t| format!("?auth={}", encode_segment(t))),
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// URL of a whole collection
    pub fn collection(&self, path: &str) -> String {
        format!("{}{}.json{}", self.base, clean_path(path), self.query())
    }

    /// URL of one entity inside a collection
    pub fn entity(&self, path: &str, id: &str) -> String {
        format!(
            "{}{}/{}.json{}",
            self.base,
            clean_path(path),
            encode_segment(id),
            self.query()
        )
    }

    fn query(&self) -> &str {
        self.auth_query.as_deref().unwrap_or("")
    }
}

fn clean_path(path: &str) -> &str {
    path.trim().trim_matches('/')
}
