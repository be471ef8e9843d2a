//! xrate Common Types
//!
//! Value types shared by the xrate crates: validated currency codes,
//! strictly positive rates and ordered currency pairs.

pub mod monetary;
pub mod error;

pub use monetary::*;
pub use error::*;
