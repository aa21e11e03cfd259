//! Strongly typed graph identifiers.
//!
//! Ids are dense `u32` indices into a graph's node and arc stores.  They are
//! `Copy + Ord + Hash`, so they double as map keys and sort keys.  Use
//! `.index()` when indexing a `Vec`.

use std::fmt;

/// Generate a typed id wrapper around a `u32`, displayed as `<prefix><n>`.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident, $prefix:literal;) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub u32);

        impl $name {
            /// Sentinel for "no such element".  Never handed out by a graph.
            pub const INVALID: $name = $name(u32::MAX);

            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }

            /// Build an id from a store position.
            ///
            /// # Panics
            /// Panics if `i` does not fit in a `u32`.
            #[inline]
            pub fn from_index(i: usize) -> Self {
                match u32::try_from(i) {
                    Ok(v) if v != u32::MAX => $name(v),
                    _ => panic!("{} index {} out of range", stringify!($name), i),
                }
            }

            #[inline]
            pub fn is_valid(self) -> bool {
                self != Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "{}"), self.0)
            }
        }

        impl From<$name> for usize {
            #[inline(always)]
            fn from(id: $name) -> usize {
                id.0 as usize
            }
        }
    };
}

typed_id! {
    /// Index of a node in a directed graph.
    ///
    /// Dual graphs reuse this type: a dual node is a plain node whose payload
    /// happens to sit on an arc of the base graph.
    pub struct NodeId, "n";
}

typed_id! {
    /// Index of a directed arc.
    pub struct ArcId, "a";
}
