//! Raw C ABI of the `discord-rpc` shared library
//!
//! Record layouts follow `discord_rpc.h` from the 3.x releases that predate
//! `partyPrivacy`. The entry points themselves are only linked with the
//! `native` feature.

#![allow(non_snake_case)]

pub mod callbacks;

use std::ffi::{c_char, c_int};
use std::ptr;

/// `DiscordRichPresence`
///
/// Every pointer must reference a NUL-terminated UTF-8 string that stays
/// valid for the duration of `Discord_UpdatePresence`, or be null. The
/// library copies what it needs before returning.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct DiscordRichPresence {
    pub state: *const c_char,
    pub details: *const c_char,
    pub startTimestamp: i64,
    pub endTimestamp: i64,
    pub largeImageKey: *const c_char,
    pub largeImageText: *const c_char,
    pub smallImageKey: *const c_char,
    pub smallImageText: *const c_char,
    pub partyId: *const c_char,
    pub partySize: c_int,
    pub partyMax: c_int,
    pub matchSecret: *const c_char,
    pub joinSecret: *const c_char,
    pub spectateSecret: *const c_char,
    pub instance: i8,
}

impl Default for DiscordRichPresence {
    fn default() -> Self {
        Self {
            state: ptr::null(),
            details: ptr::null(),
            startTimestamp: 0,
            endTimestamp: 0,
            largeImageKey: ptr::null(),
            largeImageText: ptr::null(),
            smallImageKey: ptr::null(),
            smallImageText: ptr::null(),
            partyId: ptr::null(),
            partySize: 0,
            partyMax: 0,
            matchSecret: ptr::null(),
            joinSecret: ptr::null(),
            spectateSecret: ptr::null(),
            instance: 0,
        }
    }
}

/// `DiscordUser`, passed to the ready and join-request callbacks
#[repr(C)]
#[derive(Debug)]
pub struct DiscordUser {
    pub userId: *const c_char,
    pub username: *const c_char,
    pub discriminator: *const c_char,
    pub avatar: *const c_char,
}

pub type ReadyHandler = unsafe extern "C" fn(user: *const DiscordUser);
pub type ErrorHandler = unsafe extern "C" fn(error_code: c_int, message: *const c_char);
pub type SecretHandler = unsafe extern "C" fn(secret: *const c_char);
pub type JoinRequestHandler = unsafe extern "C" fn(request: *const DiscordUser);

/// `DiscordEventHandlers`
///
/// The library copies this record during `Discord_Initialize` and
/// `Discord_UpdateHandlers`.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct DiscordEventHandlers {
    pub ready: Option<ReadyHandler>,
    pub disconnected: Option<ErrorHandler>,
    pub errored: Option<ErrorHandler>,
    pub joinGame: Option<SecretHandler>,
    pub spectateGame: Option<SecretHandler>,
    pub joinRequest: Option<JoinRequestHandler>,
}

#[cfg(feature = "native")]
#[link(name = "discord-rpc")]
extern "C" {
    pub fn Discord_Initialize(
        applicationId: *const c_char,
        handlers: *const DiscordEventHandlers,
        autoRegister: c_int,
        optionalSteamId: *const c_char,
    );
    pub fn Discord_Shutdown();
    pub fn Discord_RunCallbacks();
    pub fn Discord_UpdatePresence(presence: *const DiscordRichPresence);
    pub fn Discord_ClearPresence();
    pub fn Discord_UpdateHandlers(handlers: *const DiscordEventHandlers);
}
