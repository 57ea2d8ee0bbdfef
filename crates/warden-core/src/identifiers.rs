//! Principal identifiers
//!
//! A principal is any actor the host environment can authenticate as the caller
//! of an operation. Warden never authenticates principals itself; it only
//! compares the identifier the host hands it against the roles it stores.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::WardenError;

const DISPLAY_PREFIX: &str = "principal-";

/// Identifier for a calling principal.
///
/// The nil UUID is reserved as the null principal. It is the default timelock
/// candidate, so no real caller can claim ownership before the owner has
/// explicitly named a successor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrincipalId(pub Uuid);

impl PrincipalId {
    /// The null principal.
    pub const NULL: PrincipalId = PrincipalId(Uuid::nil());

    /// Create a fresh random principal
    pub fn new_random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Derive a stable principal from a label.
    ///
    /// The same label always maps to the same principal, which makes this
    /// suitable for fixtures and scripted setups.
    pub fn from_label(label: &str) -> Self {
        Self(Uuid::new_v5(&Uuid::NAMESPACE_OID, label.as_bytes()))
    }

    /// Returns `true` for the null principal
    pub fn is_null(&self) -> bool {
        self.0.is_nil()
    }
}

impl Default for PrincipalId {
    fn default() -> Self {
        Self::NULL
    }
}

impl fmt::Display for PrincipalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{DISPLAY_PREFIX}{}", self.0)
    }
}

impl FromStr for PrincipalId {
    type Err = WardenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        let raw = raw.strip_prefix(DISPLAY_PREFIX).unwrap_or(raw);
        Uuid::parse_str(raw)
            .map(Self)
            .map_err(|e| WardenError::invalid(format!("Invalid principal '{s}': {e}")))
    }
}
