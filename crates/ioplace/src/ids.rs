//! Opaque ID newtypes for placement entities.
//!
//! [`PinId`] and [`SectionId`] are thin `u32` wrappers used as indices into
//! the netlist and the section list. They are `Copy`, `Hash`, and
//! `Serialize`/`Deserialize`.

use serde::{Deserialize, Serialize};

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
        pub struct $name(u32);

        impl $name {
            /// Creates an ID from a raw `u32` index.
            pub fn from_raw(index: u32) -> Self {
                Self(index)
            }

            /// Returns the raw `u32` index.
            pub fn as_raw(self) -> u32 {
                self.0
            }

            /// Returns the ID as a vector index.
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

define_id!(
    /// Opaque, copyable ID of an I/O pin in a [`Netlist`](crate::Netlist).
    PinId
);

define_id!(
    /// Opaque, copyable ID of a section of the slot ring.
    SectionId
);

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn pin_id_roundtrip() {
        let id = PinId::from_raw(42);
        assert_eq!(id.as_raw(), 42);
        assert_eq!(id.index(), 42);
    }

    #[test]
    fn id_hash_in_set() {
        let mut set = HashSet::new();
        set.insert(SectionId::from_raw(1));
        set.insert(SectionId::from_raw(2));
        set.insert(SectionId::from_raw(1));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn id_ordering() {
        assert!(PinId::from_raw(3) < PinId::from_raw(4));
    }

    #[test]
    fn id_serde_roundtrip() {
        let id = PinId::from_raw(55);
        let json = serde_json::to_string(&id).unwrap();
        let restored: PinId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, restored);
    }

    #[test]
    fn id_display() {
        assert_eq!(format!("{}", SectionId::from_raw(7)), "7");
    }
}
