use crate::{
    bit_reader::BitReader, bit_writer::BitWrite, error::SerdeErr, serde::Serde, ConstBitLength,
};

pub type UnsignedInteger<const BITS: u8> = SerdeInteger<false, BITS>;
pub type UnsignedVariableInteger<const BITS: u8> = SerdeInteger<true, BITS>;

/// An unsigned integer written with a chosen bit width.
///
/// The fixed form writes exactly `BITS` bits. The variable form writes
/// `BITS`-bit groups, each preceded by a continuation bit, so small values stay
/// small on the wire while still reaching the full `u64` range.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct SerdeInteger<const VARIABLE: bool, const BITS: u8> {
    value: u64,
}

impl<const VARIABLE: bool, const BITS: u8> SerdeInteger<VARIABLE, BITS> {
    /// # Panics
    ///
    /// Panics if `BITS` is 0 or above 64, or if a fixed-width value does not
    /// fit in `BITS` bits. Use [`Self::try_new`] for untrusted values.
    pub fn new<T: Into<u64>>(value: T) -> Self {
        match Self::try_new(value) {
            Ok(integer) => integer,
            Err(err) => panic!("SerdeInteger: {}", err),
        }
    }

    pub fn try_new<T: Into<u64>>(value: T) -> Result<Self, SerdeErr> {
        if BITS == 0 || BITS > 64 {
            panic!("can't create an integer with {} bits", BITS);
        }

        let value = value.into();
        if !VARIABLE && BITS < 64 && value >> BITS != 0 {
            return Err(SerdeErr::ValueOutOfRange { value, bits: BITS });
        }

        Ok(Self { value })
    }

    pub fn get(&self) -> u64 {
        self.value
    }

    fn group_count(&self) -> u32 {
        let mut groups = 1;
        let mut value = self.value;
        while let Some(rest) = value.checked_shr(u32::from(BITS)) {
            if rest == 0 {
                break;
            }
            value = rest;
            groups += 1;
        }
        groups
    }
}

impl<const VARIABLE: bool, const BITS: u8> Serde for SerdeInteger<VARIABLE, BITS> {
    fn ser(&self, writer: &mut dyn BitWrite) {
        let mut value = self.value;

        if VARIABLE {
            loop {
                let rest = value.checked_shr(u32::from(BITS)).unwrap_or(0);
                let proceed = rest != 0;
                writer.write_bit(proceed);
                for _ in 0..BITS {
                    writer.write_bit(value & 1 != 0);
                    value >>= 1;
                }
                if !proceed {
                    return;
                }
                value = rest;
            }
        } else {
            for _ in 0..BITS {
                writer.write_bit(value & 1 != 0);
                value >>= 1;
            }
        }
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        let mut output: u64 = 0;
        let mut shift: u32 = 0;

        loop {
            let proceed = if VARIABLE { reader.read_bit()? } else { false };

            for _ in 0..BITS {
                let bit = reader.read_bit()?;
                if bit {
                    if shift >= 64 {
                        return Err(SerdeErr::IntegerOverflow { max_bits: 64 });
                    }
                    output |= 1 << shift;
                }
                shift += 1;
            }

            if !proceed {
                return Ok(Self { value: output });
            }
        }
    }

    fn bit_length(&self) -> u32 {
        if VARIABLE {
            self.group_count() * (u32::from(BITS) + 1)
        } else {
            u32::from(BITS)
        }
    }
}

impl<const BITS: u8> ConstBitLength for SerdeInteger<false, BITS> {
    fn const_bit_length() -> u32 {
        u32::from(BITS)
    }
}
