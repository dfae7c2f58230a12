/// One Rich Presence update as the host describes it
///
/// Timestamps are kept as the text the host supplied and are parsed when the
/// update is sent. The branding icon is not part of an update; it comes from
/// [`PresenceConfig`](crate::PresenceConfig).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PresenceUpdate {
    pub details: String,

    pub state: String,

    /// Unix epoch seconds; empty or `None` leaves the field unset
    pub start_timestamp: Option<String>,

    /// Unix epoch seconds; empty or `None` leaves the field unset
    pub end_timestamp: Option<String>,

    /// `None` falls back to the configured placeholder, `Some("")` sends no key
    pub small_image_key: Option<String>,

    pub small_image_text: Option<String>,

    /// `(size, max)`
    pub party: Option<(i32, i32)>,

    pub instance: bool,
}

impl PresenceUpdate {
    /// Update with the two free-text lines and everything else defaulted
    pub fn new<D: Into<String>, S: Into<String>>(details: D, state: S) -> Self {
        Self {
            details: details.into(),
            state: state.into(),
            ..Self::default()
        }
    }
}
