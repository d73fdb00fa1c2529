//! Strict/original mode with change listeners
//!
//! Listeners run synchronously, in subscription order, whenever the mode
//! actually changes.

use core::fmt;
use paredit_core::PareditMode;

/// Callback run with the new mode
pub type ModeListener = Box<dyn FnMut(PareditMode)>;

/// Current mode and its subscribers
pub struct ModeState {
    mode: PareditMode,
    listeners: Vec<(usize, ModeListener)>,
    next_listener_id: usize,
}

impl ModeState {
    /// Start in `mode` with no listeners
    #[must_use]
    pub const fn new(mode: PareditMode) -> Self {
        Self {
            mode,
            listeners: Vec::new(),
            next_listener_id: 0,
        }
    }

    /// Current mode
    #[must_use]
    pub const fn mode(&self) -> PareditMode {
        self.mode
    }

    /// Switch to `mode`, notifying listeners if it differs
    ///
    /// Returns whether the mode changed.
    pub fn set_mode(&mut self, mode: PareditMode) -> bool {
        if mode == self.mode {
            return false;
        }
        log::debug!("paredit mode {} -> {}", self.mode, mode);
        self.mode = mode;
        for (_, listener) in &mut self.listeners {
            listener(mode);
        }
        true
    }

    /// Flip between strict and original, returning the new mode
    pub fn toggle(&mut self) -> PareditMode {
        let next = self.mode.toggled();
        self.set_mode(next);
        next
    }

    /// Register a listener, returning its id
    pub fn subscribe(&mut self, listener: impl FnMut(PareditMode) + 'static) -> usize {
        let id = self.next_listener_id;
        self.next_listener_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener; returns whether it was registered
    pub fn unsubscribe(&mut self, id: usize) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    /// Number of registered listeners
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl Default for ModeState {
    fn default() -> Self {
        Self::new(PareditMode::default())
    }
}

impl fmt::Debug for ModeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModeState")
            .field("mode", &self.mode)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
