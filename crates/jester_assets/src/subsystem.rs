//! Owner of the active asset locator

use jester_core::ObjectWorld;

use crate::locator::AssetLocator;
use crate::settings::{AssetLocatorSettings, LookupPolicy};

/// Builds and initializes the asset locator once at session start
#[derive(Debug, Default)]
pub struct AssetSubsystem {
    locator: Option<AssetLocator>,
}

impl AssetSubsystem {
    /// Create the locator from `settings`. Missing or unresolvable settings
    /// leave the subsystem without a locator and log why.
    pub fn initialize(
        settings: Option<&AssetLocatorSettings>,
        world: &ObjectWorld,
        policy: LookupPolicy,
    ) -> Self {
        let Some(settings) = settings else {
            log::warn!("Asset subsystem could not initialize the asset locator: no asset settings configured");
            return Self::default();
        };

        match AssetLocator::from_settings(settings, world, policy) {
            Ok(mut locator) => {
                locator.initialize();
                log::info!(
                    "Asset subsystem initialized asset locator with {} categories",
                    settings.categories.len()
                );
                Self {
                    locator: Some(locator),
                }
            }
            Err(e) => {
                log::error!("Asset subsystem could not initialize the asset locator: {}", e);
                Self::default()
            }
        }
    }

    /// Wrap an already built locator, initializing it if needed
    pub fn with_locator(mut locator: AssetLocator) -> Self {
        locator.initialize();
        Self {
            locator: Some(locator),
        }
    }

    /// Active locator
    pub fn locator(&self) -> Option<&AssetLocator> {
        self.locator.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::AssetCategorySettings;
    use jester_core::{ClassRegistry, Tag};

    #[test]
    fn test_initialize_from_settings() {
        let _ = env_logger::builder().is_test(true).try_init();
        let mut world = ObjectWorld::new();
        let sword = world.spawn(ClassRegistry::OBJECT, "SwordData").unwrap();
        let tag = Tag::new("Asset.Data.Sword").unwrap();
        let settings = AssetLocatorSettings::default().with_category(
            "Weapons",
            AssetCategorySettings::default().with_asset(tag.clone(), "SwordData"),
        );

        let subsystem = AssetSubsystem::initialize(Some(&settings), &world, LookupPolicy::Lenient);
        let locator = subsystem.locator().unwrap();
        assert!(locator.is_initialized());
        assert_eq!(locator.resolve_object(&world, &tag, None), Ok(sword));
    }

    #[test]
    fn test_missing_settings_leaves_no_locator() {
        let world = ObjectWorld::new();
        assert!(AssetSubsystem::initialize(None, &world, LookupPolicy::Lenient)
            .locator()
            .is_none());

        let broken = AssetLocatorSettings::default().with_category(
            "Broken",
            AssetCategorySettings::default().with_class(Tag::new("Asset.Class.X").unwrap(), "Nope"),
        );
        assert!(AssetSubsystem::initialize(Some(&broken), &world, LookupPolicy::Lenient)
            .locator()
            .is_none());
    }
}
