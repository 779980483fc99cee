//! # Tidepool Serde
//! Bit-level serialization for the messages tidepool ships from the authority
//! to its observers. Values are packed LSB-first with no alignment, so a
//! 64-slot usage mask costs exactly 64 bits on the wire.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

mod bit_reader;
mod bit_writer;
mod error;
mod impls;
mod integer;
mod serde;

pub use bit_reader::BitReader;
pub use bit_writer::{BitWrite, BitWriter};
pub use error::SerdeErr;
pub use integer::{SerdeInteger, UnsignedInteger, UnsignedVariableInteger};
pub use serde::{ConstBitLength, Serde};
