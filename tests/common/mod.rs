//! Backend that records what the session hands across the FFI boundary

#![allow(dead_code)]

use std::ffi::{c_char, CStr};
use std::sync::{Arc, Mutex, MutexGuard};

use taikopresence::ffi::DiscordRichPresence;
use taikopresence::{PresenceBackend, PresenceEvents};

/// Presence fields as the native side would read them during the call
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SentPresence {
    pub state: Option<String>,
    pub details: Option<String>,
    pub start_timestamp: i64,
    pub end_timestamp: i64,
    pub large_image_key: Option<String>,
    pub large_image_text: Option<String>,
    pub small_image_key: Option<String>,
    pub small_image_text: Option<String>,
    pub party_size: i32,
    pub party_max: i32,
    pub instance: i8,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InitCall {
    pub application_id: String,
    pub auto_register: bool,
    pub steam_id: Option<String>,
}

#[derive(Debug, Clone)]
pub enum NativeEvent {
    Ready,
    Disconnected(i32, String),
    Error(i32, String),
}

#[derive(Default)]
pub struct Recording {
    pub init: Vec<InitCall>,
    pub updates: Vec<SentPresence>,
    pub clears: usize,
    pub polls: usize,
    pub shutdowns: usize,
    pub handler_updates: usize,
    pub pending: Vec<NativeEvent>,
    events: Option<Arc<dyn PresenceEvents>>,
}

#[derive(Clone, Default)]
pub struct RecordingBackend {
    recording: Arc<Mutex<Recording>>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn recording(&self) -> MutexGuard<'_, Recording> {
        self.recording.lock().unwrap()
    }

    /// Queue an event for the next `run_callbacks`
    pub fn push_event(&self, event: NativeEvent) {
        self.recording().pending.push(event);
    }
}

fn read(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        None
    } else {
        Some(unsafe { CStr::from_ptr(ptr) }.to_str().unwrap().to_string())
    }
}

impl PresenceBackend for RecordingBackend {
    fn initialize(
        &mut self,
        application_id: &CStr,
        events: Arc<dyn PresenceEvents>,
        auto_register: bool,
        steam_id: Option<&CStr>,
    ) {
        let mut recording = self.recording();
        recording.init.push(InitCall {
            application_id: application_id.to_str().unwrap().to_string(),
            auto_register,
            steam_id: steam_id.map(|id| id.to_str().unwrap().to_string()),
        });
        recording.events = Some(events);
    }

    fn shutdown(&mut self) {
        let mut recording = self.recording();
        recording.shutdowns += 1;
        recording.events = None;
    }

    fn run_callbacks(&mut self) {
        let (events, pending) = {
            let mut recording = self.recording();
            recording.polls += 1;
            (recording.events.clone(), std::mem::take(&mut recording.pending))
        };
        let Some(events) = events else { return };
        for event in pending {
            match event {
                NativeEvent::Ready => events.on_ready(),
                NativeEvent::Disconnected(code, message) => events.on_disconnected(code, &message),
                NativeEvent::Error(code, message) => events.on_error(code, &message),
            }
        }
    }

    fn update_presence(&mut self, presence: &DiscordRichPresence) {
        let sent = SentPresence {
            state: read(presence.state),
            details: read(presence.details),
            start_timestamp: presence.startTimestamp,
            end_timestamp: presence.endTimestamp,
            large_image_key: read(presence.largeImageKey),
            large_image_text: read(presence.largeImageText),
            small_image_key: read(presence.smallImageKey),
            small_image_text: read(presence.smallImageText),
            party_size: presence.partySize,
            party_max: presence.partyMax,
            instance: presence.instance,
        };
        assert!(presence.partyId.is_null());
        assert!(presence.joinSecret.is_null());
        self.recording().updates.push(sent);
    }

    fn clear_presence(&mut self) {
        self.recording().clears += 1;
    }

    fn update_handlers(&mut self, events: Arc<dyn PresenceEvents>) {
        let mut recording = self.recording();
        recording.handler_updates += 1;
        recording.events = Some(events);
    }
}

/// Events receiver that remembers every report
#[derive(Default)]
pub struct EventLog {
    pub seen: Mutex<Vec<String>>,
}

impl EventLog {
    pub fn seen(&self) -> Vec<String> {
        self.seen.lock().unwrap().clone()
    }
}

impl PresenceEvents for EventLog {
    fn on_ready(&self) {
        self.seen.lock().unwrap().push("ready".to_string());
    }

    fn on_disconnected(&self, code: i32, message: &str) {
        self.seen
            .lock()
            .unwrap()
            .push(format!("disconnected {code} {message}"));
    }

    fn on_error(&self, code: i32, message: &str) {
        self.seen
            .lock()
            .unwrap()
            .push(format!("error {code} {message}"));
    }
}
