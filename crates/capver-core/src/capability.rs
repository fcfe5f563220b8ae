//! Capability Version type
use serde::{Deserialize, Serialize};
use std::fmt;

/// Integer encoding the protocol feature set a client build supports.
///
/// Higher values mean more features and track client release recency. The
/// zero value is reserved as [`CapabilityVersion::UNKNOWN`]: fail-open
/// lookups return it for versions missing from the table, so callers must
/// check [`is_unknown`](Self::is_unknown) before treating a result as a
/// real capability tier.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct CapabilityVersion(pub u32);

impl CapabilityVersion {
    /// Sentinel for "version not in the table".
    pub const UNKNOWN: CapabilityVersion = CapabilityVersion(0);

    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    pub const fn get(self) -> u32 {
        self.0
    }

    pub const fn is_unknown(self) -> bool {
        self.0 == 0
    }
}

impl From<u32> for CapabilityVersion {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl From<CapabilityVersion> for u32 {
    fn from(cap: CapabilityVersion) -> Self {
        cap.0
    }
}

impl fmt::Display for CapabilityVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
