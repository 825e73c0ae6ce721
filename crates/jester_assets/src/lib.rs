//! # jester_assets - Tag-Keyed Asset Locator
//!
//! Assets and classes are authored per category and flattened into two
//! global tag tables at startup:
//!
//! ```ignore
//! use jester_assets::prelude::*;
//!
//! let mut locator = AssetLocator::from_settings(&settings, &world, LookupPolicy::default())?;
//! locator.initialize();
//! let sword = locator.resolve_object(&world, &sword_tag, Some(weapon_class))?;
//! let hub = locator.resolve_level(&hub_tag);
//! ```

pub mod error;
pub mod locator;
pub mod settings;
pub mod subsystem;

pub mod prelude {
    pub use crate::error::{AssetError, Result};
    pub use crate::locator::{AssetCategory, AssetLocator, LevelRef};
    pub use crate::settings::{AssetCategorySettings, AssetLocatorSettings, LookupPolicy};
    pub use crate::subsystem::AssetSubsystem;
}

pub use prelude::*;
