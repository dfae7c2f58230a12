use std::ffi::CString;
use std::sync::Arc;

use log::{debug, info, trace};

use crate::backend::PresenceBackend;
use crate::config::PresenceConfig;
use crate::error::{PresenceError, Result};
use crate::events::{LogEvents, PresenceEvents};
use crate::ffi::DiscordRichPresence;
use crate::presence::PresenceUpdate;
use crate::scratch::ScratchArena;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionState {
    Active,
    ShutDown,
}

/// One Rich Presence session with the native library
///
/// Creating the session initializes the native library; dropping it (or
/// calling [`shutdown`](Self::shutdown)) ends it. All operations take
/// `&mut self`; hosts that share the session between threads put it behind a
/// `Mutex`.
pub struct PresenceSession<B: PresenceBackend> {
    backend: B,
    config: PresenceConfig,
    scratch: ScratchArena,
    state: SessionState,
}

impl<B: PresenceBackend> PresenceSession<B> {
    /// Initialize the native library and start a session
    ///
    /// # Arguments
    ///
    /// * `backend` - The native library binding
    /// * `application_id` - The Discord application client ID
    /// * `config` - Branding and registration settings
    /// * `events` - Receiver for ready, disconnect and error reports
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `config` is invalid or an id is empty
    /// or contains a NUL byte. Connection failures are not reported here; they
    /// arrive later through `events`.
    pub fn initialize(
        mut backend: B,
        application_id: &str,
        config: PresenceConfig,
        events: Arc<dyn PresenceEvents>,
    ) -> Result<Self> {
        config.validate()?;
        if application_id.is_empty() {
            return Err(PresenceError::InvalidConfig(
                "application_id must not be empty".to_string(),
            ));
        }

        let application_id_c = CString::new(application_id)?;
        let steam_id = config.steam_id.as_deref().map(CString::new).transpose()?;

        backend.initialize(
            &application_id_c,
            events,
            config.auto_register,
            steam_id.as_deref(),
        );
        info!("[Discord] Initialized for application {}", application_id);

        Ok(Self {
            scratch: ScratchArena::with_limit(config.max_scratch_bytes),
            backend,
            config,
            state: SessionState::Active,
        })
    }

    /// Initialize with the default config and [`LogEvents`]
    pub fn with_defaults(backend: B, application_id: &str) -> Result<Self> {
        Self::initialize(
            backend,
            application_id,
            PresenceConfig::default(),
            Arc::new(LogEvents),
        )
    }

    /// Send a presence update
    ///
    /// Every string is copied into a scratch buffer that lives exactly as long
    /// as the native call. The buffers are freed before this returns, on every
    /// path.
    ///
    /// # Errors
    ///
    /// * [`PresenceError::NotActive`] after [`shutdown`](Self::shutdown)
    /// * [`PresenceError::InvalidTimestamp`] if a timestamp is not an integer;
    ///   nothing is allocated and the native library is not called
    /// * [`PresenceError::AllocationFailed`] if a buffer cannot be allocated
    pub fn update_presence(&mut self, update: &PresenceUpdate) -> Result {
        self.ensure_active()?;

        let start = parse_timestamp("start_timestamp", update.start_timestamp.as_deref())?;
        let end = parse_timestamp("end_timestamp", update.end_timestamp.as_deref())?;
        let small_image_key = update
            .small_image_key
            .as_deref()
            .unwrap_or(&self.config.small_image_placeholder);
        let small_image_text = update.small_image_text.as_deref().unwrap_or("");
        let (party_size, party_max) = update.party.unwrap_or((0, 0));

        let mut scratch = self.scratch.scope();
        let details = scratch.allocate(&update.details)?;
        let state = scratch.allocate(&update.state)?;
        let large_image_key = scratch.allocate(&self.config.large_image_key)?;
        let large_image_text = scratch.allocate(&self.config.large_image_text)?;
        let small_image_key = scratch.allocate(small_image_key)?;
        let small_image_text = scratch.allocate(small_image_text)?;

        let presence = DiscordRichPresence {
            state: scratch.resolve(state),
            details: scratch.resolve(details),
            startTimestamp: start,
            endTimestamp: end,
            largeImageKey: scratch.resolve(large_image_key),
            largeImageText: scratch.resolve(large_image_text),
            smallImageKey: scratch.resolve(small_image_key),
            smallImageText: scratch.resolve(small_image_text),
            partySize: party_size,
            partyMax: party_max,
            instance: i8::from(update.instance),
            ..DiscordRichPresence::default()
        };

        trace!(
            "[Discord] Updating presence: details={:?} state={:?} start={} end={}",
            update.details,
            update.state,
            start,
            end
        );
        self.backend.update_presence(&presence);
        debug!("[Discord] Presence updated ({} buffers)", scratch.live());

        Ok(())
    }

    /// Clear the displayed presence
    pub fn clear_presence(&mut self) -> Result {
        self.ensure_active()?;
        self.backend.clear_presence();
        debug!("[Discord] Presence cleared");
        Ok(())
    }

    /// Let the native library deliver queued events
    ///
    /// Call this periodically, for example once per frame.
    pub fn run_callbacks(&mut self) -> Result {
        self.ensure_active()?;
        self.backend.run_callbacks();
        Ok(())
    }

    /// End the session
    ///
    /// Only the first call reaches the native library.
    pub fn shutdown(&mut self) {
        if self.state == SessionState::ShutDown {
            debug!("[Discord] Shutdown requested again, ignoring");
            return;
        }

        self.backend.shutdown();
        self.scratch.release_all();
        self.state = SessionState::ShutDown;
        info!("[Discord] Shut down.");
    }

    pub fn is_active(&self) -> bool {
        self.state == SessionState::Active
    }

    pub fn config(&self) -> &PresenceConfig {
        &self.config
    }

    /// The scratch buffer registry, for inspecting allocation counts
    pub fn scratch(&self) -> &ScratchArena {
        &self.scratch
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    fn ensure_active(&self) -> Result {
        match self.state {
            SessionState::Active => Ok(()),
            SessionState::ShutDown => Err(PresenceError::NotActive),
        }
    }
}

#[cfg(feature = "native")]
impl PresenceSession<crate::backend::DiscordRpc> {
    /// Start a session on the linked `discord-rpc` library
    ///
    /// # Errors
    ///
    /// Returns [`PresenceError::AlreadyInitialized`] while another native
    /// session is alive, plus everything [`initialize`](Self::initialize)
    /// returns.
    pub fn native(
        application_id: &str,
        config: PresenceConfig,
        events: Arc<dyn PresenceEvents>,
    ) -> Result<Self> {
        let backend = crate::backend::DiscordRpc::acquire()?;
        Self::initialize(backend, application_id, config, events)
    }
}

impl<B: PresenceBackend> Drop for PresenceSession<B> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Empty or absent means "unset" and becomes 0
fn parse_timestamp(field: &'static str, value: Option<&str>) -> Result<i64> {
    match value {
        None | Some("") => Ok(0),
        Some(text) => text
            .trim()
            .parse()
            .map_err(|e| PresenceError::invalid_timestamp(field, text, e)),
    }
}
