use crate::api::traits::uid_allocator::{Uid, UidAllocator};
use core::sync::atomic::Ordering;
use portable_atomic::AtomicU64;

/// Monotonic identity allocator backed by an atomic counter.
///
/// Safe to share between the threads of a disassembly/relocation session;
/// each call hands out the next counter value. Sessions that need
/// reproducible identities (tests, snapshot comparisons) construct their own
/// allocator instead of sharing one.
///
/// # Example
///
/// ```
/// use relocatable_instructions::api::default_uid_allocator::AtomicUidAllocator;
/// use relocatable_instructions::api::traits::uid_allocator::UidAllocator;
///
/// let allocator = AtomicUidAllocator::new();
/// let first = allocator.next_uid();
/// let second = allocator.next_uid();
/// assert!(first < second);
/// ```
#[derive(Debug)]
pub struct AtomicUidAllocator {
    next: AtomicU64,
}

impl AtomicUidAllocator {
    /// Creates an allocator whose first issued identity wraps the value 0.
    pub const fn new() -> Self {
        Self {
            next: AtomicU64::new(0),
        }
    }
}

impl UidAllocator for AtomicUidAllocator {
    fn next_uid(&self) -> Uid {
        Uid::from_raw(self.next.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for AtomicUidAllocator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issues_sequential_identities() {
        let allocator = AtomicUidAllocator::new();

        assert_eq!(allocator.next_uid().value(), 0);
        assert_eq!(allocator.next_uid().value(), 1);
        assert_eq!(allocator.next_uid().value(), 2);
    }

    #[test]
    fn separate_allocators_are_independent() {
        let a = AtomicUidAllocator::new();
        let b = AtomicUidAllocator::new();

        // Identities only distinguish records within one session's allocator.
        assert_eq!(a.next_uid(), b.next_uid());
    }
}
