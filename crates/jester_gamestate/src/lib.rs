//! Jester GameState - Staged Initialization
//!
//! Drives a game session through an ordered list of named stages, one
//! stage per tick, and runs callbacks that were bound to a stage when the
//! session reaches it (or, for post-stage bindings, once it has moved past).
//!
//! # Example
//!
//! ```ignore
//! use jester_gamestate::prelude::*;
//!
//! let mut init = StageSequencer::new(vec![boot, world_loaded, players_ready])?;
//! init.bind(&world, world_loaded.clone(), hud, "OnWorldLoaded", StagePhase::Enter);
//!
//! // Once per tick
//! init.poll(&world, &mut |stage: &Tag| is_ready(stage));
//! ```

pub mod error;
pub mod sequencer;

pub mod prelude {
    pub use crate::error::{GameStateError, Result};
    pub use crate::sequencer::{
        BindOutcome, DeferredBinding, FullyInitialized, PollOutcome, StageChanged, StageGate,
        StagePhase, StageSequencer,
    };
}

pub use prelude::*;
