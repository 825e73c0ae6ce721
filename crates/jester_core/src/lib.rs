//! # jester_core - Jester Toolbox Core
//!
//! Primitives shared by every toolbox crate:
//! - **Tags**: dotted hierarchical identifiers used as lookup keys
//! - **Classes**: a runtime class lattice with walk-to-root is-a checks
//! - **Handles**: generational weak references to objects
//! - **World**: the object graph that owns objects and reports their destruction

pub mod class;
pub mod error;
pub mod handle;
pub mod tag;
pub mod world;

pub use class::*;
pub use error::*;
pub use handle::*;
pub use tag::*;
pub use world::*;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::class::{ClassId, ClassRegistry};
    pub use crate::error::{CoreError, Result};
    pub use crate::handle::ObjectHandle;
    pub use crate::tag::{Tag, TagTree};
    pub use crate::world::{DestroyNotice, ObjectWorld, ObserverId};
}
