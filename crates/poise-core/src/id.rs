//! Identity types for Poise
//!
//! Users are identified by an opaque string chosen by the client
//! (e.g. `user-482913` or an email address).

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{PoiseError, PoiseResult};

/// Longest identity accepted, in bytes
pub const MAX_USER_ID_LEN: usize = 128;

/// User identity - key of the signaling registry
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Validate and wrap a raw identity string.
    ///
    /// Accepts ASCII alphanumerics plus `-`, `_`, `.` and `@`.
    pub fn parse(raw: &str) -> PoiseResult<Self> {
        if raw.is_empty() {
            return Err(PoiseError::InvalidIdentity("empty identity".into()));
        }
        if raw.len() > MAX_USER_ID_LEN {
            return Err(PoiseError::InvalidIdentity(format!(
                "identity longer than {MAX_USER_ID_LEN} bytes"
            )));
        }
        if let Some(c) = raw
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '@')))
        {
            return Err(PoiseError::InvalidIdentity(format!(
                "unexpected character {c:?}"
            )));
        }
        Ok(UserId(raw.to_owned()))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for UserId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "User({})", self.0)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
