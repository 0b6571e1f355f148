use std::fmt;

use serde::{Deserialize, Serialize};

/// Backend access token.
///
/// Pins are scoped to the credential that issued them, so the same
/// credential must be carried across a session. The token is redacted in
/// `Debug` output.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token. Avoid logging this.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Short prefix suitable for log correlation.
    pub fn fingerprint(&self) -> &str {
        let end = self
            .0
            .char_indices()
            .nth(8)
            .map(|(i, _)| i)
            .unwrap_or(self.0.len());
        &self.0[..end]
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Credential({}…)", self.fingerprint())
    }
}
