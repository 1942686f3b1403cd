//! Session configuration.

use crate::error::AuthError;

/// Attorney verification session TTL: 30 minutes.
pub const DEFAULT_SESSION_TTL_SECS: u64 = 1_800;

/// The platform's general session TTL. Attorney sessions must be shorter.
pub const PLATFORM_SESSION_TTL_SECS: u64 = 86_400;

/// Configuration for the attorney session service.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Absolute lifetime of a verification session in seconds
    /// (default: 1800 = 30 minutes). Activity does not extend it.
    pub session_ttl_secs: u64,
    /// General platform session lifetime the TTL is checked against
    /// (default: 86_400 = 24 hours).
    pub platform_session_ttl_secs: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_ttl_secs: DEFAULT_SESSION_TTL_SECS,
            platform_session_ttl_secs: PLATFORM_SESSION_TTL_SECS,
        }
    }
}

impl AuthConfig {
    /// Reject a TTL that is zero or not strictly shorter than the
    /// platform's session TTL.
    pub fn validate(&self) -> Result<(), AuthError> {
        if self.session_ttl_secs == 0 {
            return Err(AuthError::Config("session TTL must be positive".into()));
        }
        if self.session_ttl_secs >= self.platform_session_ttl_secs {
            return Err(AuthError::Config(format!(
                "session TTL {}s must be shorter than the platform TTL {}s",
                self.session_ttl_secs, self.platform_session_ttl_secs
            )));
        }
        Ok(())
    }

    pub fn session_ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.session_ttl_secs as i64)
    }
}
