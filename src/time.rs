use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::{PresenceError, Result};

/// Current Unix time in whole seconds
///
/// # Errors
///
/// Returns an error if the system time is before the UNIX epoch (Jan 1, 1970).
pub fn unix_now() -> Result<i64> {
    let now = SystemTime::now().duration_since(UNIX_EPOCH).map_err(|e| {
        PresenceError::SystemTime(format!("System time is before UNIX epoch: {}", e))
    })?;
    Ok(now.as_secs() as i64)
}

/// Current Unix time as text, ready for a presence timestamp field
///
/// ```
/// let now = taikopresence::unix_now_string()?;
/// assert!(now.parse::<i64>().is_ok());
/// # Ok::<(), taikopresence::PresenceError>(())
/// ```
pub fn unix_now_string() -> Result<String> {
    unix_now().map(|secs| secs.to_string())
}
