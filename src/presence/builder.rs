use crate::presence::types::PresenceUpdate;
use crate::error::Result;
use crate::time::unix_now_string;

/// Builder for [`PresenceUpdate`]s
#[derive(Debug, Default)]
pub struct PresenceBuilder {
    update: PresenceUpdate,
}

impl PresenceBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the first line (what the player is doing)
    pub fn details<S: Into<String>>(mut self, details: S) -> Self {
        self.update.details = details.into();
        self
    }

    /// Set the second line
    pub fn state<S: Into<String>>(mut self, state: S) -> Self {
        self.update.state = state.into();
        self
    }

    /// Set the start timestamp (Unix epoch seconds as text)
    pub fn start_timestamp<S: Into<String>>(mut self, timestamp: S) -> Self {
        self.update.start_timestamp = Some(timestamp.into());
        self
    }

    /// Set the start timestamp to now
    ///
    /// # Errors
    ///
    /// Returns an error if the system time is before the UNIX epoch.
    pub fn start_timestamp_now(mut self) -> Result<Self> {
        self.update.start_timestamp = Some(unix_now_string()?);
        Ok(self)
    }

    /// Set the end timestamp (Unix epoch seconds as text)
    pub fn end_timestamp<S: Into<String>>(mut self, timestamp: S) -> Self {
        self.update.end_timestamp = Some(timestamp.into());
        self
    }

    /// Set the small image asset
    pub fn small_image<S: Into<String>>(mut self, key: S) -> Self {
        self.update.small_image_key = Some(key.into());
        self
    }

    /// Set the small image tooltip
    pub fn small_text<S: Into<String>>(mut self, text: S) -> Self {
        self.update.small_image_text = Some(text.into());
        self
    }

    /// Set party size and capacity
    pub fn party(mut self, size: i32, max: i32) -> Self {
        self.update.party = Some((size, max));
        self
    }

    /// Set instance flag
    pub fn instance(mut self, instance: bool) -> Self {
        self.update.instance = instance;
        self
    }

    /// Build the update
    pub fn build(self) -> PresenceUpdate {
        self.update
    }
}
