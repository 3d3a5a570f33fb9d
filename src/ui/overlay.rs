//! Exclusive-overlay bookkeeping for the jukebox screen. Overlays (credits,
//! track details, help) float above the song list and are mutually exclusive:
//! opening one closes whichever other overlay is showing, and asking for the
//! overlay that is already showing toggles it off. The tracker records only
//! *how to close* the current overlay, not what it displays, so it stays free
//! of any widget types.

use std::cell::Cell;
use std::rc::Rc;

/// Capability to close one specific overlay. Whoever opens an overlay
/// constructs the capability; invoking `close` hides that overlay and nothing
/// else.
pub(crate) trait OverlayClose {
    fn close(&self);
}

/// Outcome of an [`OverlayTracker::request`] call, telling the caller whether
/// its overlay should now be shown or hidden.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum OverlayRequest {
    /// The requested overlay is now the tracked one (any previous overlay was
    /// closed on the caller's behalf). Show it.
    Opened,
    /// The requested overlay was already the tracked one, so the slot was
    /// cleared instead. The caller hides its own overlay.
    Closed,
}

/// Single-slot registry of the currently open overlay's close capability.
///
/// The slot starts empty, holds at most one capability, and is owned by the
/// `App` so its lifetime matches the UI session. All mutation happens from
/// the synchronous key-event handler; nothing here needs locking.
#[derive(Default)]
pub(crate) struct OverlayTracker {
    open: Option<Rc<dyn OverlayClose>>,
}

impl OverlayTracker {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Request that the overlay behind `new` become the open one, or pass
    /// `None` to close whatever is open.
    ///
    /// Exactly one of three things happens, checked in this order:
    ///
    /// 1. A different overlay is tracked: its `close` runs, `new` takes the
    ///    slot, and the caller gets [`OverlayRequest::Opened`].
    /// 2. The tracked capability is `new` itself (same `Rc`), or `new` is
    ///    `None`: the slot is cleared without invoking anything and the
    ///    caller gets [`OverlayRequest::Closed`]. Requesting the same overlay
    ///    twice in a row therefore toggles it, it is not a no-op guard.
    /// 3. The slot is empty: `new` takes it and the caller gets
    ///    [`OverlayRequest::Opened`].
    ///
    /// At most one capability is ever invoked per call, and the call cannot
    /// fail.
    pub(crate) fn request(&mut self, new: Option<Rc<dyn OverlayClose>>) -> OverlayRequest {
        match (self.open.take(), new) {
            (Some(current), Some(requested)) if !Rc::ptr_eq(&current, &requested) => {
                current.close();
                self.open = Some(requested);
                OverlayRequest::Opened
            }
            (Some(_), _) => OverlayRequest::Closed,
            (None, requested) => {
                self.open = requested;
                OverlayRequest::Opened
            }
        }
    }

    /// Whether any overlay is currently tracked.
    pub(crate) fn has_open(&self) -> bool {
        self.open.is_some()
    }
}

/// Standard close capability: flips a shared visibility flag off. The `App`
/// keeps the flag for rendering and hands clones of the capability to the
/// tracker.
pub(crate) struct VisibilityClose {
    visible: Rc<Cell<bool>>,
}

impl VisibilityClose {
    pub(crate) fn new(visible: Rc<Cell<bool>>) -> Self {
        Self { visible }
    }
}

impl OverlayClose for VisibilityClose {
    fn close(&self) {
        self.visible.set(false);
    }
}
