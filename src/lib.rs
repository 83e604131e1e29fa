//! An optional value stored in place.
//!
//! [`Optional<T>`] either holds a live `T` (engaged) or holds nothing (disengaged). The value lives
//! inline, with no allocation and no sentinel value of `T`. A disengaged optional compares less than
//! every engaged one and hashes to [`DISENGAGED_HASH`].
#![cfg_attr(not(any(test, feature = "std")), no_std)]

pub mod nullopt;
pub mod optional;
mod trace;

pub use nullopt::{Nullopt, NULLOPT};
pub use optional::{make_optional, make_optional_with, swap, BadAccess, Optional, DISENGAGED_HASH};
