//! Engine configuration.
//!
//! ```json
//! { "stride_minutes": 15, "blocking": { "all_except": ["Cancelled"] } }
//! ```
//!
//! Every field is optional; missing fields take the defaults below.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::reservation::StatusPolicy;
use crate::time::Stride;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AvailabilityConfig {
    /// Minutes between successive candidate start times.
    pub stride_minutes: i64,
    /// Which reservation statuses occupy time.
    pub blocking: StatusPolicy,
}

impl Default for AvailabilityConfig {
    fn default() -> Self {
        AvailabilityConfig {
            stride_minutes: i64::from(Stride::DEFAULT.minutes()),
            blocking: StatusPolicy::default(),
        }
    }
}

impl AvailabilityConfig {
    /// Parse and validate a JSON configuration document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: AvailabilityConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    /// Returns `SlotError::InvalidStride` when `stride_minutes` is not positive.
    pub fn validate(&self) -> Result<()> {
        self.stride().map(|_| ())
    }

    pub fn stride(&self) -> Result<Stride> {
        Stride::new(self.stride_minutes)
    }
}
