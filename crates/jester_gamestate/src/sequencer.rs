//! Staged initialization sequencer
//!
//! The cursor moves through `stages` one step per [`StageSequencer::poll`]
//! and only when the gate reports the current stage ready. `cursor ==
//! stages.len()` is terminal.

use std::collections::BTreeSet;

use jester_core::{ObjectHandle, ObjectWorld, Tag};
use jester_event::Broadcaster;

use crate::error::{GameStateError, Result};

/// When a binding fires relative to its stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StagePhase {
    /// As soon as the cursor reaches the stage
    #[default]
    Enter,
    /// Once the cursor has moved strictly past the stage
    Post,
}

/// A callable waiting for its stage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeferredBinding {
    pub stage: Tag,
    pub receiver: ObjectHandle,
    pub function: String,
    pub phase: StagePhase,
}

impl DeferredBinding {
    /// Call the function on the receiver if the receiver is still alive.
    /// Returns whether the call happened.
    pub fn execute(&self, world: &ObjectWorld) -> bool {
        if !world.is_valid(self.receiver) {
            log::debug!(
                "Dropping '{}' binding for stage '{}': receiver {:?} is gone",
                self.function,
                self.stage,
                self.receiver
            );
            return false;
        }
        world.invoke(self.receiver, &self.function)
    }
}

/// Broadcast when the cursor lands on a new stage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageChanged {
    pub stage: Tag,
}

/// Broadcast once, when the last stage completes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FullyInitialized;

/// Result of a bind request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindOutcome {
    /// The stage was already due; the binding ran before returning
    Executed { invoked: bool },
    /// Stored until its stage is reached
    Deferred,
}

/// Result of one poll
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    /// Already terminal, nothing happened
    Complete,
    /// The current stage is not ready yet
    Waiting(Tag),
    /// Moved onto this stage
    Advanced(Tag),
    /// The last stage just completed
    FullyInitialized,
}

/// Decides whether the current stage may complete
pub trait StageGate {
    fn is_stage_ready(&mut self, stage: &Tag) -> bool;
}

impl<F: FnMut(&Tag) -> bool> StageGate for F {
    fn is_stage_ready(&mut self, stage: &Tag) -> bool {
        self(stage)
    }
}

/// Ordered stage progression with deferred callbacks
pub struct StageSequencer {
    stages: Vec<Tag>,
    cursor: usize,
    pending: Vec<DeferredBinding>,
    on_stage_changed: Broadcaster<StageChanged>,
    on_fully_initialized: Broadcaster<FullyInitialized>,
}

impl StageSequencer {
    /// Create a sequencer at the first stage. Stages must be distinct.
    pub fn new(stages: Vec<Tag>) -> Result<Self> {
        if stages.is_empty() {
            return Err(GameStateError::EmptySequence);
        }
        let mut seen = BTreeSet::new();
        for stage in &stages {
            if !seen.insert(stage) {
                return Err(GameStateError::DuplicateStage(stage.clone()));
            }
        }

        Ok(Self {
            stages,
            cursor: 0,
            pending: Vec::new(),
            on_stage_changed: Broadcaster::new(),
            on_fully_initialized: Broadcaster::new(),
        })
    }

    /// Ordered stages
    pub fn stages(&self) -> &[Tag] {
        &self.stages
    }

    /// Current cursor, `stages().len()` once complete
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Stage the cursor is on, `None` once complete
    pub fn current_stage(&self) -> Option<&Tag> {
        self.stages.get(self.cursor)
    }

    /// Check if every stage has completed
    pub fn is_complete(&self) -> bool {
        self.cursor >= self.stages.len()
    }

    /// Whether polling still has any effect
    pub fn is_ticking(&self) -> bool {
        !self.is_complete()
    }

    /// Number of stored bindings
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Stored bindings
    pub fn pending(&self) -> &[DeferredBinding] {
        &self.pending
    }

    /// Position of `stage` in the sequence
    pub fn index_of(&self, stage: &Tag) -> Option<usize> {
        self.stages.iter().position(|s| s == stage)
    }

    /// True if `stage` has completed. Unknown stages never have.
    pub fn is_stage_already_initialized(&self, stage: &Tag) -> bool {
        self.index_of(stage).is_some_and(|index| index < self.cursor)
    }

    /// True if the cursor is on `stage`
    pub fn is_current_stage(&self, stage: &Tag) -> bool {
        self.current_stage() == Some(stage)
    }

    /// Stage-changed listeners
    pub fn on_stage_changed(&mut self) -> &mut Broadcaster<StageChanged> {
        &mut self.on_stage_changed
    }

    /// Fully-initialized listeners
    pub fn on_fully_initialized(&mut self) -> &mut Broadcaster<FullyInitialized> {
        &mut self.on_fully_initialized
    }

    /// Bind `function` on `receiver` to `stage`. Runs immediately when the
    /// stage has already completed, or when it is current and `phase` is
    /// [`StagePhase::Enter`]; otherwise the binding waits.
    pub fn bind(
        &mut self,
        world: &ObjectWorld,
        stage: Tag,
        receiver: ObjectHandle,
        function: impl Into<String>,
        phase: StagePhase,
    ) -> BindOutcome {
        let binding = DeferredBinding {
            stage,
            receiver,
            function: function.into(),
            phase,
        };

        let due = self.is_stage_already_initialized(&binding.stage)
            || (self.is_current_stage(&binding.stage) && phase == StagePhase::Enter);
        if due {
            return BindOutcome::Executed {
                invoked: binding.execute(world),
            };
        }

        if self.index_of(&binding.stage).is_none() {
            log::warn!(
                "Binding '{}' to stage '{}' which is not part of the initialization sequence",
                binding.function,
                binding.stage
            );
        }
        self.pending.push(binding);
        BindOutcome::Deferred
    }

    /// Advance at most one stage. Bindings that became due run before any
    /// listener hears about the new stage.
    pub fn poll<G: StageGate + ?Sized>(&mut self, world: &ObjectWorld, gate: &mut G) -> PollOutcome {
        let Some(stage) = self.current_stage().cloned() else {
            return PollOutcome::Complete;
        };
        if !gate.is_stage_ready(&stage) {
            return PollOutcome::Waiting(stage);
        }

        log::info!("GameState initialization step complete: {}", stage);
        self.cursor += 1;

        match self.stages.get(self.cursor).cloned() {
            Some(next) => {
                let cursor = self.cursor;
                let due = self.take_pending(|binding, index| match (binding.phase, index) {
                    (StagePhase::Enter, Some(index)) => index == cursor,
                    (StagePhase::Post, Some(index)) => index < cursor,
                    (_, None) => false,
                });
                for binding in &due {
                    binding.execute(world);
                }

                self.on_stage_changed
                    .broadcast(&StageChanged { stage: next.clone() });
                PollOutcome::Advanced(next)
            }
            None => {
                let due = self.take_pending(|binding, _| binding.stage == stage);
                for binding in &due {
                    binding.execute(world);
                }
                if !self.pending.is_empty() {
                    log::warn!(
                        "Discarding {} bindings for stages outside the initialization sequence",
                        self.pending.len()
                    );
                    self.pending.clear();
                }

                self.on_fully_initialized.broadcast(&FullyInitialized);
                PollOutcome::FullyInitialized
            }
        }
    }

    /// Remove and return the bindings selected by `is_due`, which receives
    /// each binding with its stage index
    fn take_pending<F>(&mut self, is_due: F) -> Vec<DeferredBinding>
    where
        F: Fn(&DeferredBinding, Option<usize>) -> bool,
    {
        let pending = std::mem::take(&mut self.pending);
        let (due, waiting): (Vec<_>, Vec<_>) = pending
            .into_iter()
            .partition(|binding| is_due(binding, self.index_of(&binding.stage)));
        self.pending = waiting;
        due
    }
}

impl std::fmt::Debug for StageSequencer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StageSequencer")
            .field("stages", &self.stages)
            .field("cursor", &self.cursor)
            .field("pending", &self.pending.len())
            .finish()
    }
}
