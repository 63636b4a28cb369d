use core::hash::BuildHasherDefault;
use hashbrown::HashMap;
use nohash::NoHashHasher;

/// Opaque identity of one instruction record.
///
/// Distinguishes a record from every other live record regardless of field
/// contents; relocation logic never reads it. Downstream containers use it
/// to keep tracking an instruction across address/displacement rewrites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Uid(u64);

impl Uid {
    /// Wraps a raw counter value. Allocator implementations are responsible
    /// for never issuing the same value twice.
    pub fn from_raw(value: u64) -> Self {
        Uid(value)
    }

    /// The raw counter value behind this identity.
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl nohash::IsEnabled for Uid {}

/// Issues identities for instruction records.
///
/// Implementations must never repeat a value while any record holding an
/// earlier one is live, and must be safe to call from multiple threads
/// (hence `&self`). Owned by the disassembly or relocation session, so tests
/// can construct their own allocator and get deterministic sequences.
pub trait UidAllocator {
    /// Returns a fresh, never previously issued identity.
    fn next_uid(&self) -> Uid;
}

/// Map keyed by instruction identity, e.g. original instruction to its
/// relocated counterpart inside a trampoline builder.
pub type UidMap<V> = HashMap<Uid, V, BuildHasherDefault<NoHashHasher<Uid>>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uid_map_round_trip() {
        let mut map: UidMap<&str> = UidMap::default();
        map.insert(Uid::from_raw(1), "jmp");
        map.insert(Uid::from_raw(2), "call");

        assert_eq!(map.get(&Uid::from_raw(1)), Some(&"jmp"));
        assert_eq!(map.get(&Uid::from_raw(2)), Some(&"call"));
        assert_eq!(map.get(&Uid::from_raw(3)), None);
    }

    #[test]
    fn uid_ordering_follows_raw_value() {
        assert!(Uid::from_raw(1) < Uid::from_raw(2));
        assert_eq!(Uid::from_raw(7).value(), 7);
    }
}
