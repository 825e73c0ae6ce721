//! # jester_toolbox - Gameplay Toolbox
//!
//! Ties the toolbox services together behind one [`ToolboxContext`]:
//! - **Assets**: tag-keyed objects, classes and levels ([`jester_assets`])
//! - **Managers**: class-keyed service locator ([`jester_managers`])
//! - **Initialization**: staged game-state startup ([`jester_gamestate`])
//!
//! Plus a small function library and scalable float curves.
//!
//! ## Example
//!
//! ```ignore
//! use jester_toolbox::prelude::*;
//!
//! let settings = ToolboxSettings::load("toolbox.json")?;
//! let mut ctx = ToolboxContext::new(world, &settings)?;
//! ctx.bind_to_initialization_step(stage, hud, "ShowHud", StagePhase::Enter);
//! while ctx.tick(&mut |stage: &Tag| is_ready(stage)) != Some(PollOutcome::Complete) {}
//! ```

pub mod context;
pub mod curve;
pub mod error;
pub mod library;
pub mod settings;

pub use context::ToolboxContext;
pub use error::{Result, ToolboxError};
pub use settings::ToolboxSettings;

/// Prelude
pub mod prelude {
    pub use crate::context::ToolboxContext;
    pub use crate::curve::{CurveKey, FloatCurve, RichCurve, ScalableCurve};
    pub use crate::error::{Result, ToolboxError};
    pub use crate::library::{
        time_duration_to_text, unwind_degrees, unwind_rotation, FloatBounds, IntBounds,
    };
    pub use crate::settings::ToolboxSettings;

    pub use jester_assets::prelude::{
        AssetCategory, AssetCategorySettings, AssetError, AssetLocator, AssetLocatorSettings,
        LevelRef, LookupPolicy,
    };
    pub use jester_core::prelude::*;
    pub use jester_event::prelude::*;
    pub use jester_gamestate::prelude::*;
    pub use jester_managers::prelude::*;
}
