use std::time::{SystemTime, UNIX_EPOCH};

/// Get current timestamp in seconds since UNIX epoch
pub(crate) fn unix_timestamp() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_secs()
}
