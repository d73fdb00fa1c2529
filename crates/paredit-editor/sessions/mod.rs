//! Host sessions
//!
//! Provides [`PareditSession`], which connects commands to a host editor
//! through the [`HostEditor`] trait. The session keeps one
//! [`EditableDocument`] mirror per host document, the current mode and the
//! event channel.
//!
//! Every command follows the same cycle: resync the mirror from the host,
//! plan against the mirror, hand the plan to the host, and update the mirror
//! only once the host has accepted it.

use crate::commands::{CommandContext, CommandId, CommandOutcome, StructuralCommand};
use crate::core::{EditableDocument, EditorError, PareditConfig, Range, Result, Selection};
use crate::events::{EventChannel, ModeState, PareditEvent};
use crate::ontype::{on_type, OnTypeDecision};
use paredit_core::{EditPlan, PareditMode, TextEdit};
use ahash::RandomState;
use std::collections::HashMap;

/// Mirrors keyed by host document id
type DocumentMap = HashMap<String, EditableDocument, RandomState>;

/// What the engine needs from a host editor
///
/// Offsets are byte offsets into the text returned by [`HostEditor::text`].
pub trait HostEditor {
    /// Identifier of the active document
    fn document_id(&self) -> &str;

    /// Language identifier of the active document, e.g. `clojure`
    fn language_id(&self) -> &str;

    /// Current text of the active document
    fn text(&self) -> String;

    /// Current selection of the active document
    fn selection(&self) -> Selection;

    /// Apply `edits`, all against the current text, then set `selection`
    ///
    /// Must be all or nothing.
    ///
    /// # Errors
    ///
    /// Returns `Err` when the host refuses the batch; the buffer must then
    /// be unchanged.
    fn apply(&mut self, edits: &[TextEdit], selection: Selection) -> Result<()>;

    /// Put `text` on the clipboard
    fn set_clipboard(&mut self, _text: &str) -> Result<()> {
        Ok(())
    }

    /// Run a REPL console command when a console has focus
    ///
    /// Returns whether the console took the command.
    fn forward_to_console(&mut self, _console_name: &str) -> bool {
        false
    }
}

/// Counters for one session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionStats {
    /// Commands started
    pub commands_run: usize,
    /// Plans the host accepted
    pub plans_applied: usize,
    /// Commands that found nothing to do
    pub not_applicable: usize,
    /// Plans the host refused
    pub rejections: usize,
    /// Commands handed to a REPL console
    pub forwarded: usize,
}

/// Engine state shared by all documents of one host
#[derive(Debug)]
pub struct PareditSession {
    config: PareditConfig,
    mode: ModeState,
    events: EventChannel,
    documents: DocumentMap,
    stats: SessionStats,
}

impl PareditSession {
    /// Create a session starting in the configured mode
    pub fn new(config: PareditConfig) -> Self {
        let mode = ModeState::new(config.default_key_map);
        Self {
            config,
            mode,
            events: EventChannel::new(),
            documents: HashMap::with_hasher(RandomState::new()),
            stats: SessionStats::default(),
        }
    }

    /// Get the configuration
    pub const fn config(&self) -> &PareditConfig {
        &self.config
    }

    /// Replace the configuration
    ///
    /// The current mode is kept; the new default applies to new sessions.
    pub fn set_config(&mut self, config: PareditConfig) {
        self.config = config;
    }

    /// Current mode
    pub const fn mode(&self) -> PareditMode {
        self.mode.mode()
    }

    /// Mode state, for subscribing to changes
    pub fn mode_state_mut(&mut self) -> &mut ModeState {
        &mut self.mode
    }

    /// Switch mode, notifying listeners and event handlers on change
    pub fn set_mode(&mut self, mode: PareditMode) -> Result<bool> {
        let old_mode = self.mode.mode();
        if !self.mode.set_mode(mode) {
            return Ok(false);
        }
        self.events
            .dispatch(PareditEvent::key_map_changed(old_mode, mode))?;
        Ok(true)
    }

    /// Flip between strict and original
    pub fn toggle_mode(&mut self) -> Result<PareditMode> {
        let next = self.mode.mode().toggled();
        self.set_mode(next)?;
        Ok(next)
    }

    /// Set the mode from a host string such as ` Original `
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::InvalidConfig`] for anything but `strict` or
    /// `original`, ignoring case and surrounding whitespace.
    pub fn set_mode_str(&mut self, value: &str) -> Result<bool> {
        let mode = value
            .parse()
            .map_err(|_| EditorError::invalid_config("paredit.defaultKeyMap", value))?;
        self.set_mode(mode)
    }

    /// Event channel, for registering handlers
    pub fn events_mut(&mut self) -> &mut EventChannel {
        &mut self.events
    }

    /// Mirror of a host document, if one has been seen
    pub fn document(&self, id: &str) -> Option<&EditableDocument> {
        self.documents.get(id)
    }

    /// Forget a host document
    pub fn close_document(&mut self, id: &str) -> Result<()> {
        self.documents
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| EditorError::DocumentNotFound { id: id.to_string() })
    }

    /// Number of mirrored documents
    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    /// Get session statistics
    pub const fn stats(&self) -> &SessionStats {
        &self.stats
    }

    /// Context for the host's active document
    pub fn context_for(&self, host: &dyn HostEditor) -> CommandContext {
        CommandContext::new(&self.config, host.language_id(), self.mode.mode())
    }

    /// Mirror of the host's active document, brought up to date
    fn synced_document<'a>(
        documents: &'a mut DocumentMap,
        host: &dyn HostEditor,
    ) -> Result<&'a mut EditableDocument> {
        let id = host.document_id();
        let document = documents
            .entry(id.to_string())
            .or_insert_with(|| EditableDocument::new(id, host.language_id(), ""));
        if document.language_id() != host.language_id() {
            document.set_language_id(host.language_id());
        }
        document.sync_from_host(&host.text(), host.selection())?;
        Ok(document)
    }

    /// Run a command by host or console name
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::UnknownCommand`] for an unknown name, and the
    /// errors of [`PareditSession::run_command`].
    pub fn run_named(&mut self, host: &mut dyn HostEditor, name: &str) -> Result<CommandOutcome> {
        let id: CommandId = name.parse()?;
        self.run_command(host, &id)
    }

    /// Run `command` against the host's active document
    ///
    /// A disabled session or an unsupported language yields
    /// [`CommandOutcome::NotApplicable`] without touching the host.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::HostRejected`] when the host refuses the plan;
    /// the mirror then stays at the host's state.
    pub fn run_command(
        &mut self,
        host: &mut dyn HostEditor,
        command: &dyn StructuralCommand,
    ) -> Result<CommandOutcome> {
        self.stats.commands_run += 1;
        let context = self.context_for(host);
        if !context.enabled {
            log::debug!(
                "{} skipped: paredit inactive for {}",
                command.name(),
                context.language_id
            );
            self.stats.not_applicable += 1;
            return Ok(CommandOutcome::NotApplicable);
        }

        if let Some(console_name) = command.console_name() {
            if host.forward_to_console(console_name) {
                log::debug!("{} forwarded to console as {console_name}", command.name());
                self.stats.forwarded += 1;
                return Ok(CommandOutcome::Forwarded(console_name.to_string()));
            }
        }

        let document = Self::synced_document(&mut self.documents, host)?;
        let before = document.selection();
        let outcome = command.plan(document, &context);
        log::trace!("{} planned: {outcome:?}", command.name());

        match outcome {
            CommandOutcome::Edits(plan) => {
                self.hand_over(host, command.name(), &plan, before)?;
                Ok(CommandOutcome::Edits(plan))
            }
            CommandOutcome::Cut { plan, text } => {
                self.hand_over(host, command.name(), &plan, before)?;
                host.set_clipboard(&text)?;
                Ok(CommandOutcome::Cut { plan, text })
            }
            CommandOutcome::Yank { text } => {
                host.set_clipboard(&text)?;
                Ok(CommandOutcome::Yank { text })
            }
            CommandOutcome::ToggleMode => Ok(CommandOutcome::ModeChanged(self.toggle_mode()?)),
            CommandOutcome::NotApplicable => {
                self.stats.not_applicable += 1;
                Ok(CommandOutcome::NotApplicable)
            }
            other @ (CommandOutcome::ModeChanged(_) | CommandOutcome::Forwarded(_)) => Ok(other),
        }
    }

    /// Report a character the host has just inserted before the caret
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::HostRejected`] when the host refuses the
    /// rewrite.
    pub fn on_type(&mut self, host: &mut dyn HostEditor, ch: char) -> Result<OnTypeDecision> {
        let context = self.context_for(host);
        if !context.enabled {
            return Ok(OnTypeDecision::Defer);
        }
        let mode = self.mode.mode();
        let document = Self::synced_document(&mut self.documents, host)?;
        let before = document.selection();
        let decision = on_type(document, ch, mode, &self.config);
        if let OnTypeDecision::Edits(plan) = &decision {
            self.hand_over(host, "onType", plan, before)?;
        }
        Ok(decision)
    }

    /// Give `plan` to the host and, if accepted, to the mirror
    ///
    /// `old_selection` is the selection before planning, since grow and
    /// shrink move the mirror's selection while they plan.
    fn hand_over(
        &mut self,
        host: &mut dyn HostEditor,
        command: &str,
        plan: &EditPlan,
        old_selection: Selection,
    ) -> Result<()> {
        let id = host.document_id().to_string();
        let selection = Selection::from(plan.selection);

        if let Err(err) = host.apply(&plan.edits, selection) {
            log::warn!("host rejected {command} on {id}: {err}");
            self.stats.rejections += 1;
            if let Some(document) = self.documents.get_mut(&id) {
                document.sync_from_host(&host.text(), host.selection())?;
                document.clear_expansion();
            }
            self.events
                .dispatch(PareditEvent::edit_rejected(&id, command, err.to_string()))?;
            return Err(EditorError::host_rejected(err));
        }
        self.stats.plans_applied += 1;

        let Some(document) = self.documents.get_mut(&id) else {
            return Err(EditorError::DocumentNotFound { id });
        };
        if let Err(err) = document.apply(plan) {
            log::warn!("mirror of {id} out of step after {command}: {err}");
            let version = document.version();
            document
                .sync_from_host(&host.text(), host.selection())
                .map_err(|_| EditorError::StaleDocument {
                    id: id.clone(),
                    version,
                })?;
        }

        let mut events = Vec::with_capacity(2);
        if plan.modifies_content() {
            events.push(PareditEvent::EditsApplied {
                document_id: id.clone(),
                command: command.to_string(),
                edits_count: plan.edits.len(),
                affected: plan.affected_range().map(Range::from),
            });
        }
        if old_selection != selection {
            events.push(PareditEvent::selection_changed(id, old_selection, selection));
        }
        self.events.dispatch_batch(events)
    }
}

impl Default for PareditSession {
    fn default() -> Self {
        Self::new(PareditConfig::default())
    }
}
