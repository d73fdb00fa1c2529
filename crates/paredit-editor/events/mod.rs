//! Event system for structural edits and mode changes
//!
//! Provides `PareditEvent` for what a session did and `EventChannel` for
//! distributing events to observers, with per-handler filters and
//! priorities. Dispatch is synchronous and single-threaded.

pub mod mode;

pub use mode::{ModeListener, ModeState};

use crate::core::{EditorError, Range, Result, Selection};
use core::cell::{Cell, RefCell};
use paredit_core::PareditMode;
use std::rc::Rc;

/// Things a session reports to observers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PareditEvent {
    /// Strict/original mode changed
    KeyMapChanged {
        /// Mode before the change
        old_mode: PareditMode,
        /// Mode after the change
        new_mode: PareditMode,
    },

    /// The host accepted a command's edits
    EditsApplied {
        /// Host document the edits landed in
        document_id: String,
        /// Command that produced them
        command: String,
        /// Number of text edits
        edits_count: usize,
        /// Smallest range of the old text touched
        affected: Option<Range>,
    },

    /// A command moved the selection
    SelectionChanged {
        /// Host document
        document_id: String,
        /// Selection before the command
        old_selection: Selection,
        /// Selection after the command
        new_selection: Selection,
    },

    /// The host refused a command's edits
    EditRejected {
        /// Host document
        document_id: String,
        /// Command whose edits were refused
        command: String,
        /// Host-provided reason
        reason: String,
    },
}

impl PareditEvent {
    /// Get a human-readable description of this event
    pub fn description(&self) -> String {
        match self {
            Self::KeyMapChanged { old_mode, new_mode } => {
                format!("Key map changed from {old_mode} to {new_mode}")
            }
            Self::EditsApplied {
                document_id,
                command,
                edits_count,
                ..
            } => format!("{command} applied {edits_count} edits to {document_id}"),
            Self::SelectionChanged {
                document_id,
                old_selection,
                new_selection,
            } => format!("Selection in {document_id} moved from {old_selection} to {new_selection}"),
            Self::EditRejected {
                document_id,
                command,
                reason,
            } => format!("{command} rejected by {document_id}: {reason}"),
        }
    }

    /// Check if this event reports changed text
    pub const fn is_modification(&self) -> bool {
        matches!(self, Self::EditsApplied { .. })
    }

    /// Document the event concerns, if any
    pub fn document_id(&self) -> Option<&str> {
        match self {
            Self::KeyMapChanged { .. } => None,
            Self::EditsApplied { document_id, .. }
            | Self::SelectionChanged { document_id, .. }
            | Self::EditRejected { document_id, .. } => Some(document_id),
        }
    }

    /// Get the event type as a string for filtering
    pub const fn event_type_name(&self) -> &'static str {
        match self {
            Self::KeyMapChanged { .. } => "KeyMapChanged",
            Self::EditsApplied { .. } => "EditsApplied",
            Self::SelectionChanged { .. } => "SelectionChanged",
            Self::EditRejected { .. } => "EditRejected",
        }
    }
}

/// Event filter for selective event handling
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    /// Event types to include (empty means all types)
    include_types: Vec<String>,
    /// Event types to exclude
    exclude_types: Vec<String>,
    /// Whether to include modification events
    include_modifications: Option<bool>,
    /// Only events about this document
    document_id: Option<String>,
}

impl EventFilter {
    /// Create a new event filter that accepts all events
    pub fn new() -> Self {
        Self::default()
    }

    /// Only include specific event types
    #[must_use]
    pub fn include_types(mut self, types: Vec<String>) -> Self {
        self.include_types = types;
        self
    }

    /// Exclude specific event types
    #[must_use]
    pub fn exclude_types(mut self, types: Vec<String>) -> Self {
        self.exclude_types = types;
        self
    }

    /// Set whether to include modification events
    #[must_use]
    pub const fn include_modifications(mut self, include: bool) -> Self {
        self.include_modifications = Some(include);
        self
    }

    /// Only pass events about `document_id`; events about no document pass
    #[must_use]
    pub fn for_document(mut self, document_id: impl Into<String>) -> Self {
        self.document_id = Some(document_id.into());
        self
    }

    /// Check if an event passes this filter
    pub fn matches(&self, event: &PareditEvent) -> bool {
        let event_type = event.event_type_name();

        if self.exclude_types.iter().any(|name| name == event_type) {
            return false;
        }
        if !self.include_types.is_empty() && !self.include_types.iter().any(|name| name == event_type)
        {
            return false;
        }
        if let Some(include_mods) = self.include_modifications {
            if event.is_modification() != include_mods {
                return false;
            }
        }
        match (&self.document_id, event.document_id()) {
            (Some(wanted), Some(actual)) => wanted == actual,
            _ => true,
        }
    }
}

/// Event handler trait for responding to session events
pub trait EventHandler {
    /// Handle an event
    fn handle_event(&mut self, event: &PareditEvent) -> Result<()>;

    /// Get the event filter for this handler
    fn event_filter(&self) -> EventFilter {
        EventFilter::new()
    }

    /// Get handler priority (higher numbers = higher priority)
    fn priority(&self) -> i32 {
        0
    }
}

/// Statistics about event handling
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventStats {
    /// Total number of events dispatched
    pub events_dispatched: usize,
    /// Number of handlers currently registered
    pub handlers_count: usize,
    /// Number of handler deliveries skipped by filters
    pub events_filtered: usize,
    /// Number of handler errors
    pub handler_errors: usize,
    /// Average event processing time in microseconds
    pub avg_processing_time_us: u64,
}

/// Event channel configuration
#[derive(Debug, Clone)]
pub struct EventChannelConfig {
    /// Maximum number of handlers
    pub max_handlers: usize,
    /// Keep delivering to later handlers after one fails
    pub continue_on_error: bool,
}

impl Default for EventChannelConfig {
    fn default() -> Self {
        Self {
            max_handlers: 100,
            continue_on_error: true,
        }
    }
}

/// Event channel for distributing session events to handlers
///
/// Clones share the same handler list and the same statistics.
#[derive(Debug, Clone)]
pub struct EventChannel {
    /// Configuration for this channel
    config: EventChannelConfig,

    /// Registered event handlers, highest priority first
    handlers: Rc<RefCell<Vec<HandlerInfo>>>,

    /// Event statistics, shared with clones
    stats: Rc<RefCell<EventStats>>,

    /// Next handler ID, shared with clones
    next_handler_id: Rc<Cell<usize>>,
}

/// Information about a registered handler
struct HandlerInfo {
    /// Unique handler ID
    id: usize,
    /// Handler implementation
    handler: Box<dyn EventHandler>,
    /// Event filter for this handler
    filter: EventFilter,
    /// Handler priority
    priority: i32,
    /// Number of events processed by this handler
    events_processed: usize,
}

impl core::fmt::Debug for HandlerInfo {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("HandlerInfo")
            .field("id", &self.id)
            .field("filter", &self.filter)
            .field("priority", &self.priority)
            .field("events_processed", &self.events_processed)
            .field("handler", &"<EventHandler>")
            .finish()
    }
}

impl EventChannel {
    /// Create a new event channel with default configuration
    pub fn new() -> Self {
        Self::with_config(EventChannelConfig::default())
    }

    /// Create a new event channel with custom configuration
    pub fn with_config(config: EventChannelConfig) -> Self {
        Self {
            config,
            handlers: Rc::new(RefCell::new(Vec::new())),
            stats: Rc::new(RefCell::new(EventStats::default())),
            next_handler_id: Rc::new(Cell::new(0)),
        }
    }

    /// Get the configuration
    pub const fn config(&self) -> &EventChannelConfig {
        &self.config
    }

    /// Register an event handler
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::HandlerLimitExceeded`] when the channel is full.
    pub fn register_handler(&mut self, handler: Box<dyn EventHandler>) -> Result<usize> {
        let mut handlers = self
            .handlers
            .try_borrow_mut()
            .map_err(|_| EditorError::event_channel("handlers are busy dispatching"))?;
        if handlers.len() >= self.config.max_handlers {
            return Err(EditorError::HandlerLimitExceeded {
                current: handlers.len(),
                limit: self.config.max_handlers,
            });
        }

        let handler_id = self.next_handler_id.get();
        self.next_handler_id.set(handler_id + 1);
        let filter = handler.event_filter();
        let priority = handler.priority();
        handlers.push(HandlerInfo {
            id: handler_id,
            handler,
            filter,
            priority,
            events_processed: 0,
        });
        // Sort by priority (highest first), stable for equal priorities
        handlers.sort_by(|a, b| b.priority.cmp(&a.priority));

        let count = handlers.len();
        self.update_stats(|stats| stats.handlers_count = count);
        Ok(handler_id)
    }

    /// Unregister an event handler by ID
    pub fn unregister_handler(&mut self, handler_id: usize) -> Result<bool> {
        let mut handlers = self
            .handlers
            .try_borrow_mut()
            .map_err(|_| EditorError::event_channel("handlers are busy dispatching"))?;
        let removed = match handlers.iter().position(|h| h.id == handler_id) {
            Some(pos) => {
                handlers.remove(pos);
                true
            }
            None => false,
        };
        let count = handlers.len();
        self.update_stats(|stats| stats.handlers_count = count);
        Ok(removed)
    }

    /// Number of events a handler has processed
    pub fn events_processed(&self, handler_id: usize) -> Option<usize> {
        self.handlers
            .try_borrow()
            .ok()?
            .iter()
            .find(|h| h.id == handler_id)
            .map(|h| h.events_processed)
    }

    /// Dispatch an event to all registered handlers
    ///
    /// # Errors
    ///
    /// Returns the first handler error unless the channel is configured to
    /// continue past failures, in which case errors are only logged.
    pub fn dispatch(&mut self, event: PareditEvent) -> Result<()> {
        let start_time = std::time::Instant::now();
        self.update_stats(|stats| stats.events_dispatched += 1);

        let mut filtered_count = 0;
        let mut processed_count = 0;
        {
            let mut handlers = self
                .handlers
                .try_borrow_mut()
                .map_err(|_| EditorError::event_channel("re-entrant dispatch"))?;

            for handler_info in handlers.iter_mut() {
                if !handler_info.filter.matches(&event) {
                    filtered_count += 1;
                    continue;
                }
                match handler_info.handler.handle_event(&event) {
                    Ok(()) => {
                        handler_info.events_processed += 1;
                        processed_count += 1;
                    }
                    Err(err) if self.config.continue_on_error => {
                        self.update_stats(|stats| stats.handler_errors += 1);
                        log::warn!("event handler {} failed: {err}", handler_info.id);
                    }
                    Err(err) => {
                        self.update_stats(|stats| {
                            stats.handler_errors += 1;
                            stats.events_filtered += filtered_count;
                        });
                        return Err(err);
                    }
                }
            }
        }
        let processing_time = u64::try_from(start_time.elapsed().as_micros()).unwrap_or(u64::MAX);
        self.update_stats(|stats| {
            stats.events_filtered += filtered_count;
            stats.avg_processing_time_us = if stats.events_dispatched == 1 {
                processing_time
            } else {
                (stats.avg_processing_time_us + processing_time) / 2
            };
        });

        log::trace!(
            "event dispatched: {} -> {} handlers (filtered: {})",
            event.description(),
            processed_count,
            filtered_count
        );
        Ok(())
    }

    /// Dispatch multiple events in order
    pub fn dispatch_batch(&mut self, events: Vec<PareditEvent>) -> Result<()> {
        for event in events {
            self.dispatch(event)?;
        }
        Ok(())
    }

    /// Snapshot of the statistics shared by this channel and its clones
    pub fn stats(&self) -> EventStats {
        self.stats
            .try_borrow()
            .map(|stats| stats.clone())
            .unwrap_or_default()
    }

    fn update_stats(&self, update: impl FnOnce(&mut EventStats)) {
        if let Ok(mut stats) = self.stats.try_borrow_mut() {
            update(&mut stats);
        }
    }

    /// Clear all event handlers
    pub fn clear_handlers(&mut self) -> Result<()> {
        self.handlers
            .try_borrow_mut()
            .map_err(|_| EditorError::event_channel("handlers are busy dispatching"))?
            .clear();
        self.update_stats(|stats| stats.handlers_count = 0);
        Ok(())
    }
}

impl Default for EventChannel {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience functions for creating common events
impl PareditEvent {
    /// Create a key map change event
    pub const fn key_map_changed(old_mode: PareditMode, new_mode: PareditMode) -> Self {
        Self::KeyMapChanged { old_mode, new_mode }
    }

    /// Create an edit rejection event
    pub fn edit_rejected(
        document_id: impl Into<String>,
        command: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::EditRejected {
            document_id: document_id.into(),
            command: command.into(),
            reason: reason.into(),
        }
    }

    /// Create a selection change event
    pub fn selection_changed(
        document_id: impl Into<String>,
        old_selection: Selection,
        new_selection: Selection,
    ) -> Self {
        Self::SelectionChanged {
            document_id: document_id.into(),
            old_selection,
            new_selection,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Position;

    fn moved(document_id: &str) -> PareditEvent {
        PareditEvent::selection_changed(
            document_id,
            Selection::empty(Position::new(0)),
            Selection::empty(Position::new(3)),
        )
    }

    fn applied() -> PareditEvent {
        PareditEvent::EditsApplied {
            document_id: "a.clj".to_string(),
            command: "paredit.slurpSexpForward".to_string(),
            edits_count: 2,
            affected: Some(Range::new(Position::new(1), Position::new(6))),
        }
    }

    struct TestHandler {
        log: Rc<RefCell<Vec<String>>>,
        filter: EventFilter,
        priority: i32,
        fail: bool,
    }

    impl TestHandler {
        fn new(log: &Rc<RefCell<Vec<String>>>) -> Self {
            Self {
                log: Rc::clone(log),
                filter: EventFilter::new(),
                priority: 0,
                fail: false,
            }
        }

        fn with_filter(mut self, filter: EventFilter) -> Self {
            self.filter = filter;
            self
        }

        fn with_priority(mut self, priority: i32) -> Self {
            self.priority = priority;
            self
        }
    }

    impl EventHandler for TestHandler {
        fn handle_event(&mut self, event: &PareditEvent) -> Result<()> {
            if self.fail {
                return Err(EditorError::event_channel("handler failure"));
            }
            self.log
                .borrow_mut()
                .push(format!("{}:{}", self.priority, event.event_type_name()));
            Ok(())
        }

        fn event_filter(&self) -> EventFilter {
            self.filter.clone()
        }

        fn priority(&self) -> i32 {
            self.priority
        }
    }

    #[test]
    fn event_descriptions() {
        let event = PareditEvent::key_map_changed(PareditMode::Strict, PareditMode::Original);
        assert_eq!(
            event.description(),
            "Key map changed from strict to original"
        );
        assert!(!event.is_modification());
        assert!(applied().is_modification());
        assert_eq!(applied().document_id(), Some("a.clj"));
        assert_eq!(event.document_id(), None);
    }

    #[test]
    fn filter_by_type_and_document() {
        let filter = EventFilter::new().exclude_types(vec!["SelectionChanged".to_string()]);
        assert!(!filter.matches(&moved("a.clj")));
        assert!(filter.matches(&applied()));

        let filter = EventFilter::new().for_document("b.clj");
        assert!(!filter.matches(&moved("a.clj")));
        assert!(filter.matches(&moved("b.clj")));
        assert!(filter.matches(&PareditEvent::key_map_changed(
            PareditMode::Strict,
            PareditMode::Original
        )));

        let filter = EventFilter::new().include_modifications(true);
        assert!(filter.matches(&applied()));
        assert!(!filter.matches(&moved("a.clj")));
    }

    #[test]
    fn handler_registration() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut channel = EventChannel::new();
        let id = channel
            .register_handler(Box::new(TestHandler::new(&log)))
            .unwrap();
        assert_eq!(channel.stats().handlers_count, 1);
        assert!(channel.unregister_handler(id).unwrap());
        assert!(!channel.unregister_handler(id).unwrap());
        assert_eq!(channel.stats().handlers_count, 0);
    }

    #[test]
    fn handler_limit() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut channel = EventChannel::with_config(EventChannelConfig {
            max_handlers: 1,
            ..EventChannelConfig::default()
        });
        channel
            .register_handler(Box::new(TestHandler::new(&log)))
            .unwrap();
        assert_eq!(
            channel.register_handler(Box::new(TestHandler::new(&log))),
            Err(EditorError::HandlerLimitExceeded {
                current: 1,
                limit: 1
            })
        );
    }

    #[test]
    fn dispatch_respects_priority_and_filters() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut channel = EventChannel::new();
        channel
            .register_handler(Box::new(TestHandler::new(&log).with_priority(1)))
            .unwrap();
        let high = channel
            .register_handler(Box::new(
                TestHandler::new(&log)
                    .with_priority(10)
                    .with_filter(EventFilter::new().include_modifications(true)),
            ))
            .unwrap();

        channel.dispatch(applied()).unwrap();
        channel.dispatch(moved("a.clj")).unwrap();

        assert_eq!(
            *log.borrow(),
            vec![
                "10:EditsApplied".to_string(),
                "1:EditsApplied".to_string(),
                "1:SelectionChanged".to_string(),
            ]
        );
        assert_eq!(channel.stats().events_dispatched, 2);
        assert_eq!(channel.stats().events_filtered, 1);
        assert_eq!(channel.events_processed(high), Some(1));
    }

    #[test]
    fn failing_handler_does_not_stop_others() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut channel = EventChannel::new();
        let mut failing = TestHandler::new(&log).with_priority(5);
        failing.fail = true;
        channel.register_handler(Box::new(failing)).unwrap();
        channel
            .register_handler(Box::new(TestHandler::new(&log)))
            .unwrap();

        channel.dispatch(applied()).unwrap();
        assert_eq!(*log.borrow(), vec!["0:EditsApplied".to_string()]);
        assert_eq!(channel.stats().handler_errors, 1);

        let mut strict = EventChannel::with_config(EventChannelConfig {
            continue_on_error: false,
            ..EventChannelConfig::default()
        });
        let mut failing = TestHandler::new(&log);
        failing.fail = true;
        strict.register_handler(Box::new(failing)).unwrap();
        assert!(strict.dispatch(applied()).is_err());
    }

    #[test]
    fn clones_share_handlers() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut channel = EventChannel::new();
        let mut observer = channel.clone();
        observer
            .register_handler(Box::new(TestHandler::new(&log)))
            .unwrap();
        channel.dispatch_batch(vec![applied(), moved("a")]).unwrap();
        assert_eq!(log.borrow().len(), 2);

        channel.clear_handlers().unwrap();
        observer.dispatch(applied()).unwrap();
        assert_eq!(log.borrow().len(), 2);
    }

    #[test]
    fn clones_share_stats() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut channel = EventChannel::new();
        let mut observer = channel.clone();
        observer
            .register_handler(Box::new(TestHandler::new(&log)))
            .unwrap();
        channel.dispatch(applied()).unwrap();
        observer.dispatch(moved("a")).unwrap();

        assert_eq!(channel.stats(), observer.stats());
        assert_eq!(channel.stats().events_dispatched, 2);
        assert_eq!(channel.stats().handlers_count, 1);
    }
}
