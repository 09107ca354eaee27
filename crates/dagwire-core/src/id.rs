//! Strongly-typed identifiers used across the workspace.
//!
//! Operator identity is the `OpId` handed out by `DagBuilder`; two operators
//! with identical names or configuration still get distinct ids.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! new_id {
    ($name:ident) => {
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Ord, PartialOrd,
        )]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            pub const fn new(v: u64) -> Self {
                Self(v)
            }
            pub const fn get(self) -> u64 {
                self.0
            }
            /// Dense index form, for side tables indexed by id.
            ///
            /// `None` when the id does not fit in `usize` on this target.
            pub fn index(self) -> Option<usize> {
                usize::try_from(self.0).ok()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }
    };
}

new_id!(OpId);
new_id!(StageId);
