use std::fmt;

use tidepool_serde::{BitReader, BitWrite, ConstBitLength, Serde, SerdeErr};

use crate::MAX_SLOTS;

/// One bit per slot: bit `i` set means slot `i` is currently leased.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct SlotMask(u64);

impl SlotMask {
    pub const EMPTY: Self = Self(0);
    pub const FULL: Self = Self(u64::MAX);

    pub fn from_u64(value: u64) -> Self {
        Self(value)
    }

    pub fn to_u64(&self) -> u64 {
        self.0
    }

    /// # Panics
    ///
    /// Panics if `index >= 64`.
    pub fn test(&self, index: u8) -> bool {
        Self::check_index(index);
        self.0 & (1 << index) != 0
    }

    /// # Panics
    ///
    /// Panics if `index >= 64`.
    pub fn set(&mut self, index: u8, used: bool) {
        Self::check_index(index);
        if used {
            self.0 |= 1 << index;
        } else {
            self.0 &= !(1 << index);
        }
    }

    /// `None` if `index >= 64`.
    pub fn try_test(&self, index: u8) -> Option<bool> {
        (index < MAX_SLOTS).then(|| self.test(index))
    }

    /// Returns false, leaving the mask untouched, if `index >= 64`.
    pub fn try_set(&mut self, index: u8, used: bool) -> bool {
        if index >= MAX_SLOTS {
            return false;
        }
        self.set(index, used);
        true
    }

    pub fn clear(&mut self) {
        self.0 = 0;
    }

    pub fn is_full(&self) -> bool {
        self.0 == u64::MAX
    }

    pub fn any(&self) -> bool {
        self.0 != 0
    }

    /// Number of set bits.
    pub fn count(&self) -> u8 {
        // at most 64, always fits
        self.0.count_ones() as u8
    }

    /// Lowest clear bit. Lower indices always win so the live range stays
    /// packed toward slot 0.
    pub fn first_clear(&self) -> Option<u8> {
        if self.is_full() {
            return None;
        }
        Some((!self.0).trailing_zeros() as u8)
    }

    pub fn xor(&self, other: &SlotMask) -> SlotMask {
        SlotMask(self.0 ^ other.0)
    }

    /// Set bit positions in ascending order.
    pub fn iter_set(&self) -> impl Iterator<Item = u8> {
        let bits = self.0;
        (0..MAX_SLOTS).filter(move |index| bits & (1u64 << *index) != 0)
    }

    /// True if no bit at or above `len` is set.
    pub fn fits_within(&self, len: u8) -> bool {
        if len >= MAX_SLOTS {
            return true;
        }
        self.0 >> len == 0
    }

    fn check_index(index: u8) {
        if index >= MAX_SLOTS {
            panic!("SlotMask: index {} is outside of 0..{}", index, MAX_SLOTS);
        }
    }
}

impl fmt::Debug for SlotMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SlotMask({:#b})", self.0)
    }
}

impl Serde for SlotMask {
    fn ser(&self, writer: &mut dyn BitWrite) {
        self.0.ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        Ok(Self(u64::de(reader)?))
    }

    fn bit_length(&self) -> u32 {
        <Self as ConstBitLength>::const_bit_length()
    }
}

impl ConstBitLength for SlotMask {
    fn const_bit_length() -> u32 {
        64
    }
}
