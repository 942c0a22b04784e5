//! Reversible short-code codec for numeric identifiers.
//!
//! Identifiers are written in base 36 over a fixed, shuffled alphabet so that
//! consecutive identifiers do not produce visibly sequential codes. This is
//! obfuscation only and must not be treated as a security boundary.

mod codec;
pub mod error;

pub use codec::{decode, encode, ALPHABET, BASE};
pub use error::{CodecError, Result};
