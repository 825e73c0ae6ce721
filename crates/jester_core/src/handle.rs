//! Generational object handles
//!
//! Registries hold [`ObjectHandle`]s instead of references so they never
//! extend an object's lifetime. Destroying an object bumps the generation
//! of its slot, which turns every outstanding handle stale.

use std::fmt;

/// A weak reference to an object in an [`crate::ObjectWorld`]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectHandle {
    /// Lower 32 bits: index, Upper 32 bits: generation
    bits: u64,
}

impl ObjectHandle {
    /// Create a new handle from index and generation
    #[inline]
    pub const fn new(index: u32, generation: u32) -> Self {
        Self {
            bits: (generation as u64) << 32 | index as u64,
        }
    }

    /// Create a null handle
    #[inline]
    pub const fn null() -> Self {
        Self { bits: u64::MAX }
    }

    /// Check if this handle is null
    #[inline]
    pub const fn is_null(&self) -> bool {
        self.bits == u64::MAX
    }

    /// Get the index portion
    #[inline]
    pub const fn index(&self) -> u32 {
        self.bits as u32
    }

    /// Get the generation portion
    #[inline]
    pub const fn generation(&self) -> u32 {
        (self.bits >> 32) as u32
    }
}

impl fmt::Debug for ObjectHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            write!(f, "ObjectHandle(null)")
        } else {
            write!(f, "ObjectHandle({}v{})", self.index(), self.generation())
        }
    }
}

impl Default for ObjectHandle {
    fn default() -> Self {
        Self::null()
    }
}

/// Allocates handles with proper generation tracking
#[derive(Debug, Default)]
pub struct HandleAllocator {
    /// Generations for each slot
    generations: Vec<u32>,
    /// Free list of available indices
    free_list: Vec<u32>,
}

impl HandleAllocator {
    /// Create a new handle allocator
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a new handle
    pub fn allocate(&mut self) -> ObjectHandle {
        if let Some(index) = self.free_list.pop() {
            ObjectHandle::new(index, self.generations[index as usize])
        } else {
            let index = self.generations.len() as u32;
            self.generations.push(0);
            ObjectHandle::new(index, 0)
        }
    }

    /// Free a handle, making its index available for reuse
    pub fn free(&mut self, handle: ObjectHandle) -> bool {
        if !self.is_valid(handle) {
            return false;
        }
        let gen = &mut self.generations[handle.index() as usize];
        *gen = gen.wrapping_add(1);
        self.free_list.push(handle.index());
        true
    }

    /// Check if a handle is still valid
    pub fn is_valid(&self, handle: ObjectHandle) -> bool {
        if handle.is_null() {
            return false;
        }
        self.generations
            .get(handle.index() as usize)
            .is_some_and(|gen| *gen == handle.generation())
    }

    /// Get the number of live handles
    pub fn len(&self) -> usize {
        self.generations.len() - self.free_list.len()
    }

    /// Check if no handles are live
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_reuse_bumps_generation() {
        let mut alloc = HandleAllocator::new();
        let h1 = alloc.allocate();
        let h2 = alloc.allocate();

        assert!(alloc.is_valid(h1));
        assert!(alloc.is_valid(h2));
        assert_ne!(h1, h2);

        assert!(alloc.free(h1));
        assert!(!alloc.is_valid(h1));
        assert!(!alloc.free(h1));

        let h3 = alloc.allocate();
        assert_eq!(h3.index(), h1.index());
        assert_ne!(h3.generation(), h1.generation());
        assert!(!alloc.is_valid(h1));
        assert_eq!(alloc.len(), 2);
    }

    #[test]
    fn test_null_is_never_valid() {
        let alloc = HandleAllocator::new();
        assert!(!alloc.is_valid(ObjectHandle::null()));
        assert!(ObjectHandle::default().is_null());
    }
}
