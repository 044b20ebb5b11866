// src/domain/ids.rs

//! Identity newtypes.
//!
//! The core keys every entity by a plain integer id rather than holding
//! shared references between domain objects — graphs are reconstructed per
//! run from flat tables keyed by `cid` (see `SPEC_FULL.md` §9).

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(v: i64) -> Self {
                $name(v)
            }
        }
    };
}

id_newtype!(Cid);
id_newtype!(Tid);
id_newtype!(Rid);
