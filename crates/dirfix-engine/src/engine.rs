//! The engine: activation lifecycle, bulk initialization, the mutation
//! reactor and command handling.

use dirfix_dom::{Document, MutationKind, NodeId, ObserveOptions, ObserverId};
use dirfix_settings::{Mode, Settings, SettingsStore};
use tracing::{debug, error, trace, warn};

use crate::apply::{ELIGIBLE_TAGS, apply, apply_manual};
use crate::command::{Command, Notification, Notifier, NullNotifier};
use crate::error::Result;
use crate::revert::revert_all;

/// Live-subscription state. The observer handle exists only while active,
/// so a disconnected handle can never be reused.
#[derive(Debug, Clone, Copy, Default)]
enum Activation {
    #[default]
    Inactive,
    Active { observer: ObserverId, mode: Mode },
}

/// The direction-fixing engine.
///
/// Owns the settings collaborator, the outbound notifier and the single
/// activation slot. All operations are synchronous; the engine expects to
/// be driven from one event loop that alternates between delivering
/// commands ([`Self::handle_command`]) and draining mutation batches
/// ([`Self::pump`]).
pub struct Engine<S: SettingsStore> {
    store: S,
    notifier: Box<dyn Notifier>,
    activation: Activation,
}

impl<S: SettingsStore> Engine<S> {
    pub fn new(store: S) -> Self {
        Self::with_notifier(store, Box::new(NullNotifier))
    }

    pub fn with_notifier(store: S, notifier: Box<dyn Notifier>) -> Self {
        Self {
            store,
            notifier,
            activation: Activation::Inactive,
        }
    }

    /// The settings collaborator this engine reads and writes.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Whether a mutation subscription is currently installed.
    pub fn is_active(&self) -> bool {
        matches!(self.activation, Activation::Active { .. })
    }

    /// The mode the current subscription was started with.
    pub fn active_mode(&self) -> Option<Mode> {
        match self.activation {
            Activation::Active { mode, .. } => Some(mode),
            Activation::Inactive => None,
        }
    }

    /// Read a snapshot and decide whether processing may touch `doc`.
    /// A failed read counts as disabled.
    fn gate(&self, doc: &Document) -> bool {
        let settings = match self.store.snapshot() {
            Ok(settings) => settings,
            Err(err) => {
                warn!(error = %err, "settings read failed, treating as disabled");
                return false;
            }
        };
        if !settings.enabled {
            return false;
        }
        if let Some(host) = doc.host() {
            if settings.is_blacklisted(host) {
                debug!(host, "host is blacklisted");
                return false;
            }
        }
        true
    }

    /// Visit every eligible element once, in document order. Returns
    /// without traversing when disabled or blacklisted.
    pub fn initialize(&mut self, doc: &mut Document, mode: Mode) -> Result<()> {
        if !self.gate(doc) {
            return Ok(());
        }
        let eligible: Vec<NodeId> = doc
            .elements()
            .filter(|&id| doc.tag(id).is_some_and(|tag| ELIGIBLE_TAGS.contains(&tag)))
            .collect();
        debug!(elements = eligible.len(), ?mode, "bulk initialization");

        let mut changed = false;
        for id in eligible {
            changed |= apply(doc, id, mode)?;
        }
        if changed {
            self.note_changes_applied();
        }
        Ok(())
    }

    /// Install the mutation subscription: body subtree, child-list and
    /// character-data only. Attribute changes are deliberately not
    /// observed; they carry no text and would only multiply event volume
    /// (and the engine's own style writes land there). An existing
    /// subscription is torn down first, so at most one ever exists.
    pub fn start(&mut self, doc: &mut Document, mode: Mode) {
        self.stop(doc);
        let observer = doc.observe(
            doc.root(),
            ObserveOptions {
                child_list: true,
                character_data: true,
                attributes: false,
                subtree: true,
            },
        );
        self.activation = Activation::Active { observer, mode };
        debug!(?mode, "mutation reactor started");
    }

    /// Tear down the subscription, if any. The handle is dropped with it.
    pub fn stop(&mut self, doc: &mut Document) {
        if let Activation::Active { observer, .. } = std::mem::take(&mut self.activation) {
            doc.disconnect(observer);
            debug!("mutation reactor stopped");
        }
    }

    /// Drain and react to the pending mutation batch.
    ///
    /// The enabled/blacklist gate is re-checked per batch, so a settings
    /// change lands at the following batch at the latest. A disable that
    /// races an already-drained batch may still let that batch apply with
    /// the stale flag; this is accepted, the next cycle converges. Work
    /// done is proportional to the batch, never to document size.
    ///
    /// Returns the number of elements re-evaluated.
    pub fn pump(&mut self, doc: &mut Document) -> Result<usize> {
        let Activation::Active { observer, mode } = self.activation else {
            return Ok(0);
        };
        let records = doc.take_records(observer);
        if records.is_empty() {
            return Ok(0);
        }
        if !self.gate(doc) {
            return Ok(0);
        }

        let mut evaluated = 0usize;
        let mut changed = false;
        for record in records {
            let target = match record.kind {
                // A text-node change re-evaluates the containing element.
                MutationKind::CharacterData => doc.parent_element(record.target),
                // A child-list change re-evaluates the element itself,
                // but only while it still has text to classify.
                MutationKind::ChildList => {
                    if doc.is_element(record.target)
                        && !doc.text_content(record.target).trim().is_empty()
                    {
                        Some(record.target)
                    } else {
                        None
                    }
                }
                // Not subscribed.
                MutationKind::Attributes => None,
            };
            let Some(target) = target else {
                continue;
            };
            changed |= apply(doc, target, mode)?;
            evaluated += 1;
        }
        trace!(evaluated, "mutation batch processed");
        if changed {
            self.note_changes_applied();
        }
        Ok(evaluated)
    }

    /// Revert all engine styling and tags, then clear the monotonic
    /// changes-applied flag.
    pub fn reset(&mut self, doc: &mut Document) -> Result<()> {
        revert_all(doc)?;
        if let Err(err) = self.store.set_changes_applied(false) {
            warn!(error = %err, "failed to clear changes-applied flag");
        }
        Ok(())
    }

    /// Record that a visual change happened in this cycle. The flag is a
    /// monotonic true; setting it again for later cycles is harmless.
    fn note_changes_applied(&mut self) {
        if let Err(err) = self.store.set_changes_applied(true) {
            warn!(error = %err, "failed to persist changes-applied flag");
        }
        self.notifier.notify(Notification::ChangesApplied);
    }

    /// Initial activation on document load: read the stored mode, do a
    /// bulk pass and start the reactor.
    pub fn bootstrap(&mut self, doc: &mut Document) -> Result<()> {
        let mode = match self.store.snapshot() {
            Ok(settings) => settings.mode,
            Err(err) => {
                warn!(error = %err, "settings read failed, assuming defaults");
                Mode::default()
            }
        };
        self.initialize(doc, mode)?;
        self.start(doc, mode);
        Ok(())
    }

    /// Handle one command from the control surface. Errors are logged and
    /// swallowed here; the activation state stays consistent either way.
    pub fn handle_command(&mut self, doc: &mut Document, command: Command) {
        if let Err(err) = self.try_handle(doc, command) {
            error!(error = %err, ?command, "command handling failed");
        }
    }

    /// Handle a raw JSON command payload. Payloads that do not decode to
    /// a known command are ignored.
    pub fn handle_command_json(&mut self, doc: &mut Document, payload: &str) {
        match serde_json::from_str::<Command>(payload) {
            Ok(command) => self.handle_command(doc, command),
            Err(err) => debug!(error = %err, "ignoring unrecognized command payload"),
        }
    }

    fn try_handle(&mut self, doc: &mut Document, command: Command) -> Result<()> {
        // Commands other than toggle are gated by the current enabled
        // flag; an unreadable store reads as disabled.
        let settings = self.store.snapshot().unwrap_or_else(|err| {
            warn!(error = %err, "settings read failed, treating as disabled");
            Settings {
                enabled: false,
                ..Settings::default()
            }
        });

        match command {
            Command::Toggle { enabled } => {
                if let Err(err) = self.store.set_enabled(enabled) {
                    warn!(error = %err, "failed to persist enabled flag");
                }
                if enabled {
                    self.initialize(doc, settings.mode)?;
                    self.start(doc, settings.mode);
                } else {
                    self.stop(doc);
                    self.reset(doc)?;
                }
            }
            Command::Mode { mode } if settings.enabled => {
                if let Err(err) = self.store.set_mode(mode) {
                    warn!(error = %err, "failed to persist mode");
                }
                self.initialize(doc, mode)?;
                self.start(doc, mode);
            }
            Command::ApplyManual if settings.enabled && settings.mode == Mode::Manual => {
                if apply_manual(doc)? {
                    self.note_changes_applied();
                }
            }
            Command::ResetChanges if settings.enabled => {
                self.reset(doc)?;
            }
            other => {
                debug!(command = ?other, "command ignored in current state");
            }
        }
        Ok(())
    }
}
