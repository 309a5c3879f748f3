use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A stored state entry together with the time it was written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalStateValue<T = Value> {
    pub data: T,
    /// Milliseconds since the Unix epoch, microsecond precision.
    pub updated_at: f64,
}

impl<T> GlobalStateValue<T> {
    pub fn new(data: T, updated_at: f64) -> Self {
        Self { data, updated_at }
    }

    /// Stamp `data` with [`timestamp_now`].
    pub fn now(data: T) -> Self {
        Self::new(data, timestamp_now())
    }

    /// Whether writing `self` over `current` would be applied.
    ///
    /// Ties keep the existing value and non-finite stamps never win.
    pub fn supersedes<U>(&self, current: &GlobalStateValue<U>) -> bool {
        self.updated_at.is_finite() && self.updated_at > current.updated_at
    }
}

impl GlobalStateValue {
    pub fn decode<T: DeserializeOwned>(&self) -> Result<GlobalStateValue<T>, serde_json::Error> {
        Ok(GlobalStateValue {
            data: T::deserialize(&self.data)?,
            updated_at: self.updated_at,
        })
    }
}

impl<T: Serialize> GlobalStateValue<T> {
    pub fn encode(&self) -> Result<GlobalStateValue, serde_json::Error> {
        Ok(GlobalStateValue {
            data: serde_json::to_value(&self.data)?,
            updated_at: self.updated_at,
        })
    }
}

static LAST_STAMP_MICROS: AtomicI64 = AtomicI64::new(i64::MIN);

/// Wall-clock milliseconds, strictly increasing across calls in this process.
///
/// Two calls inside the same microsecond (or a clock step backwards) still
/// produce distinct, ordered stamps.
pub fn timestamp_now() -> f64 {
    let wall = Utc::now().timestamp_micros();
    let mut last = LAST_STAMP_MICROS.load(Ordering::Relaxed);
    loop {
        let next = wall.max(last.saturating_add(1));
        match LAST_STAMP_MICROS.compare_exchange_weak(
            last,
            next,
            Ordering::AcqRel,
            Ordering::Relaxed,
        ) {
            Ok(_) => return next as f64 / 1000.0,
            Err(actual) => last = actual,
        }
    }
}
