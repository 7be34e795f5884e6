//! Bearer credential for the remote vision API.

use std::fmt;

/// Secret used to authenticate against the remote API.
///
/// Never printed: both `Debug` and `Display` redact the value.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Build a credential from user or environment input.
    ///
    /// Empty or whitespace-only input means "no credential" (demo mode).
    pub fn from_input(input: Option<&str>) -> Option<Self> {
        input
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| Self(s.to_string()))
    }

    /// Raw secret, for the `Authorization` header only.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

impl fmt::Display for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("***")
    }
}
