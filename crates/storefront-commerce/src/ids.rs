//! Newtype IDs for type-safe identifiers.
//!
//! Using newtypes prevents accidentally mixing up different ID types,
//! e.g., passing a ReviewId where a ProductId is expected. All storefront
//! ids are SQLite row ids and serialize as plain integers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Macro to generate integer newtype ID structs.
macro_rules! define_id {
    ($name:ident) => {
        /// A row identifier.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wrap a raw id.
            pub fn new(id: i64) -> Self {
                Self(id)
            }

            /// Accept only ids that can name a stored row (`> 0`).
            pub fn parse_positive(id: i64) -> Option<Self> {
                (id > 0).then_some(Self(id))
            }

            /// Get the raw integer.
            pub fn get(self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<$name> for storefront_db::Value {
            fn from(id: $name) -> Self {
                storefront_db::Value::Integer(id.0)
            }
        }
    };
}

define_id!(ProductId);
define_id!(ReviewId);
define_id!(MessageId);
