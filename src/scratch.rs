//! Short-lived native string buffers
//!
//! Strings handed to `discord-rpc` must be NUL-terminated and stay alive for
//! the whole native call. [`ScratchArena`] owns those buffers, hands out
//! [`ScratchHandle`]s, and frees everything in one place, so a buffer is never
//! leaked and never read after it was released.

use std::alloc::{self, Layout};
use std::ffi::c_char;
use std::ops::{Deref, DerefMut};
use std::ptr::{self, NonNull};

use log::trace;

use crate::error::{PresenceError, Result};

/// Reference to a buffer owned by a [`ScratchArena`]
///
/// Handles carry the arena generation they were issued in. Resolving a handle
/// after [`ScratchArena::release_all`] trips a debug assertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScratchHandle {
    ptr: *const c_char,
    generation: u64,
}

impl ScratchHandle {
    /// Handle standing for "no string"; resolves to a null pointer
    pub const NULL: ScratchHandle = ScratchHandle {
        ptr: ptr::null(),
        generation: 0,
    };

    pub fn is_null(&self) -> bool {
        self.ptr.is_null()
    }
}

struct ScratchBuffer {
    ptr: NonNull<u8>,
    layout: Layout,
}

/// Registry of native string buffers awaiting release
pub struct ScratchArena {
    buffers: Vec<ScratchBuffer>,
    generation: u64,
    total_allocations: u64,
    used_bytes: usize,
    limit: usize,
}

// SAFETY: the arena exclusively owns every buffer it points at; nothing else
// holds these pointers once the native call that borrowed them has returned.
unsafe impl Send for ScratchArena {}

impl Default for ScratchArena {
    fn default() -> Self {
        Self::new()
    }
}

impl ScratchArena {
    pub fn new() -> Self {
        Self::with_limit(usize::MAX)
    }

    /// Arena that refuses to hold more than `limit` bytes at once
    pub fn with_limit(limit: usize) -> Self {
        Self {
            buffers: Vec::with_capacity(10),
            generation: 1,
            total_allocations: 0,
            used_bytes: 0,
            limit,
        }
    }

    /// Copy `text` into a fresh zero-filled buffer with a trailing NUL
    ///
    /// Empty text allocates nothing and yields [`ScratchHandle::NULL`].
    ///
    /// # Errors
    ///
    /// Returns [`PresenceError::AllocationFailed`] when the allocator cannot
    /// provide the buffer or the arena limit would be exceeded.
    pub fn allocate(&mut self, text: &str) -> Result<ScratchHandle> {
        if text.is_empty() {
            return Ok(ScratchHandle::NULL);
        }

        let size = text.len() + 1;
        if self.limit - self.used_bytes < size {
            return Err(PresenceError::AllocationFailed { size });
        }
        let layout =
            Layout::array::<u8>(size).map_err(|_| PresenceError::AllocationFailed { size })?;

        // SAFETY: `layout` has a non-zero size.
        let raw = unsafe { alloc::alloc_zeroed(layout) };
        let ptr = NonNull::new(raw).ok_or(PresenceError::AllocationFailed { size })?;

        // SAFETY: the buffer holds `size` bytes and does not overlap `text`.
        // The last byte stays zero from `alloc_zeroed`.
        unsafe {
            ptr::copy_nonoverlapping(text.as_ptr(), ptr.as_ptr(), text.len());
        }

        self.buffers.push(ScratchBuffer { ptr, layout });
        self.total_allocations += 1;
        self.used_bytes += size;
        trace!("scratch: allocated {} bytes ({} live)", size, self.buffers.len());

        Ok(ScratchHandle {
            ptr: ptr.as_ptr() as *const c_char,
            generation: self.generation,
        })
    }

    /// Pointer to hand across the FFI boundary
    pub fn resolve(&self, handle: ScratchHandle) -> *const c_char {
        if handle.is_null() {
            return ptr::null();
        }
        debug_assert_eq!(
            handle.generation, self.generation,
            "scratch handle used after release"
        );
        handle.ptr
    }

    /// Contents of a live buffer, trailing NUL included
    ///
    /// Returns `None` for null or released handles.
    pub fn bytes(&self, handle: ScratchHandle) -> Option<&[u8]> {
        if handle.is_null() || handle.generation != self.generation {
            return None;
        }
        self.buffers
            .iter()
            .find(|buffer| buffer.ptr.as_ptr() as *const c_char == handle.ptr)
            // SAFETY: the buffer is live and `layout.size()` bytes long.
            .map(|buffer| unsafe {
                std::slice::from_raw_parts(buffer.ptr.as_ptr(), buffer.layout.size())
            })
    }

    /// Free every buffer, newest first, and invalidate outstanding handles
    pub fn release_all(&mut self) {
        let released = self.buffers.len();
        while let Some(buffer) = self.buffers.pop() {
            trace!("scratch: freeing {:p}", buffer.ptr);
            // SAFETY: allocated by `allocate` with this exact layout and
            // popped from the registry, so it is freed exactly once.
            unsafe { alloc::dealloc(buffer.ptr.as_ptr(), buffer.layout) };
        }
        self.generation += 1;
        self.used_bytes = 0;
        if released > 0 {
            trace!("scratch: released {} buffers", released);
        }
    }

    /// Open a scope that releases everything allocated in it when dropped
    pub fn scope(&mut self) -> ScratchScope<'_> {
        ScratchScope { arena: self }
    }

    /// Number of buffers currently allocated
    pub fn live(&self) -> usize {
        self.buffers.len()
    }

    /// Bytes currently held, trailing NULs included
    pub fn used_bytes(&self) -> usize {
        self.used_bytes
    }

    /// Number of buffers ever allocated by this arena
    pub fn total_allocations(&self) -> u64 {
        self.total_allocations
    }
}

impl Drop for ScratchArena {
    fn drop(&mut self) {
        self.release_all();
    }
}

/// Guard returned by [`ScratchArena::scope`]
pub struct ScratchScope<'a> {
    arena: &'a mut ScratchArena,
}

impl Deref for ScratchScope<'_> {
    type Target = ScratchArena;

    fn deref(&self) -> &ScratchArena {
        self.arena
    }
}

impl DerefMut for ScratchScope<'_> {
    fn deref_mut(&mut self) -> &mut ScratchArena {
        self.arena
    }
}

impl Drop for ScratchScope<'_> {
    fn drop(&mut self) {
        self.arena.release_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CStr;

    #[test]
    fn test_buffer_layout_matches_utf8() {
        let mut arena = ScratchArena::new();
        for text in ["a", "Free play", "太鼓の達人", "🥁 x2", "tab\tand\nnewline"] {
            let handle = arena.allocate(text).unwrap();
            let bytes = arena.bytes(handle).unwrap();

            assert_eq!(bytes.len(), text.len() + 1);
            assert_eq!(&bytes[..text.len()], text.as_bytes());
            assert_eq!(bytes[text.len()], 0);
        }
        assert_eq!(arena.live(), 5);
    }

    #[test]
    fn test_empty_text_is_null() {
        let mut arena = ScratchArena::new();
        let handle = arena.allocate("").unwrap();

        assert!(handle.is_null());
        assert!(arena.resolve(handle).is_null());
        assert_eq!(arena.live(), 0);
        assert_eq!(arena.total_allocations(), 0);
    }

    #[test]
    fn test_resolved_pointer_reads_back() {
        let mut arena = ScratchArena::new();
        let handle = arena.allocate("Oni ★10").unwrap();
        let ptr = arena.resolve(handle);

        let text = unsafe { CStr::from_ptr(ptr) };
        assert_eq!(text.to_str().unwrap(), "Oni ★10");
    }

    #[test]
    fn test_release_all_empties_registry() {
        let mut arena = ScratchArena::new();
        let handle = arena.allocate("one").unwrap();
        arena.allocate("two").unwrap();

        arena.release_all();

        assert_eq!(arena.live(), 0);
        assert_eq!(arena.total_allocations(), 2);
        assert!(arena.bytes(handle).is_none());
    }

    #[test]
    fn test_limit_refuses_oversized_buffer() {
        let mut arena = ScratchArena::with_limit(8);
        arena.allocate("four").unwrap();
        assert_eq!(arena.used_bytes(), 5);

        let err = arena.allocate("four").unwrap_err();
        assert!(matches!(err, PresenceError::AllocationFailed { size: 5 }));
        assert_eq!(arena.live(), 1);

        arena.release_all();
        assert_eq!(arena.used_bytes(), 0);
        arena.allocate("four").unwrap();
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "scratch handle used after release")]
    fn test_stale_handle_is_caught() {
        let mut arena = ScratchArena::new();
        let handle = arena.allocate("stale").unwrap();
        arena.release_all();
        arena.resolve(handle);
    }

    #[test]
    fn test_scope_releases_on_early_return() {
        fn fill(arena: &mut ScratchArena) -> Result {
            let mut scope = arena.scope();
            scope.allocate("first")?;
            scope.allocate("second")?;
            assert_eq!(scope.live(), 2);
            Err(PresenceError::NotActive)
        }

        let mut arena = ScratchArena::new();
        assert!(fill(&mut arena).is_err());
        assert_eq!(arena.live(), 0);
        assert_eq!(arena.total_allocations(), 2);
    }
}
