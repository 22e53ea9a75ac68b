//! Strongly typed, zero-cost identifier wrappers.
//!
//! All IDs are `Copy + Ord + Hash`.  `Ord` matters here more than anywhere
//! else in the workspace: every tie in the dispatch policy is broken by the
//! lowest id, so the ordering of these types is part of the simulation's
//! observable behavior.

use std::fmt;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Sentinel meaning "no valid ID".
            pub const INVALID: $name = $name(<$inner>::MAX);

            /// Position in the table this id indexes.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl Default for $name {
            #[inline(always)]
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                <$inner>::try_from(n).map($name)
            }
        }
    };
}

typed_id! {
    /// Index of a responder in the coordinator's responder table.
    pub struct AgentId(u32);
}

typed_id! {
    /// Index of a location in the network.
    pub struct NodeId(u32);
}

typed_id! {
    /// Monotonic incident identifier, assigned when an arrival is admitted.
    pub struct IncidentId(u32);
}

impl IncidentId {
    /// The id that follows `self`.
    #[inline]
    pub fn next(self) -> IncidentId {
        IncidentId(self.0 + 1)
    }
}
