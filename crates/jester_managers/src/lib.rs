//! # jester_managers - Manager Locator
//!
//! Service locator for "manager" objects. Managers come in two shapes:
//! standalone actors and components attached to an actor. Each shape has
//! its own collection; lookups by class pick the collection from the
//! requested class and return the first registrant of that class or a
//! subclass.
//!
//! The locator only stores [`jester_core::ObjectHandle`]s. It observes the
//! destruction of each registrant (or of a component's owner) and evicts
//! entries when the world reports it, and it skips and prunes any stale
//! handle it meets during a lookup.

pub mod locator;

pub mod prelude {
    pub use crate::locator::{ManagerKind, ManagerLocator, Registration, SharedManagerLocator};
}

pub use prelude::*;
