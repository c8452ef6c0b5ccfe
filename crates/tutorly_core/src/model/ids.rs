//! Numeric identity tokens.
//!
//! `0` is reserved for "not yet assigned"; the address book hands out
//! positive ids when an entity is first added.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(u32);

        impl $name {
            pub const UNASSIGNED: Self = Self(0);

            pub fn new(value: u32) -> Self {
                Self(value)
            }

            pub fn value(self) -> u32 {
                self.0
            }

            pub fn is_assigned(self) -> bool {
                self.0 != 0
            }

            /// The following id, or `None` once the id space is used up.
            pub(crate) fn next(self) -> Option<Self> {
                self.0.checked_add(1).map(Self)
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

entity_id!(
    /// Stable student identifier.
    PersonId
);
entity_id!(
    /// Stable session identifier.
    SessionId
);
