//! Machine configuration.

use crate::session::Session;

/// A reserved identifier/secret pair that synthesizes an admin session
/// locally, without provider involvement.
///
/// Injected rather than compiled in, so deployments can rotate it or leave
/// it out entirely (`AuthConfig::default()` disables the path). The machine
/// logs every use of it.
#[derive(Clone, PartialEq, Eq)]
pub struct BypassCredential {
    identifier: String,
    secret: String,
}

impl BypassCredential {
    pub fn new(identifier: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            secret: secret.into(),
        }
    }

    pub fn matches(&self, identifier: &str, secret: &str) -> bool {
        self.identifier == identifier && self.secret == secret
    }

    /// Synthesize the session this credential stands for.
    pub(crate) fn session(&self) -> Session {
        Session::bypass(self.identifier.clone())
    }
}

// Manual Debug: the secret must not end up in logs.
impl core::fmt::Debug for BypassCredential {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BypassCredential")
            .field("identifier", &self.identifier)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// Configuration for an [`AuthMachine`](crate::AuthMachine).
#[derive(Debug, Clone, Default)]
pub struct AuthConfig {
    /// Reserved bypass pair; `None` disables the bypass path.
    pub bypass: Option<BypassCredential>,
}

impl AuthConfig {
    pub fn with_bypass(bypass: BypassCredential) -> Self {
        Self {
            bypass: Some(bypass),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_requires_both_halves() {
        let cred = BypassCredential::new("ops", "s3cret");
        assert!(cred.matches("ops", "s3cret"));
        assert!(!cred.matches("ops", "wrong"));
        assert!(!cred.matches("other", "s3cret"));
    }

    #[test]
    fn debug_redacts_the_secret() {
        let cred = BypassCredential::new("ops", "s3cret");
        let rendered = format!("{cred:?}");
        assert!(rendered.contains("ops"));
        assert!(!rendered.contains("s3cret"));
    }
}
