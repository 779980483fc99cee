use crate::error::SerdeErr;

pub struct BitReader<'b> {
    buffer: &'b [u8],
    byte_index: usize,
    bit_index: u8,
}

impl<'b> BitReader<'b> {
    pub fn new(buffer: &'b [u8]) -> Self {
        Self {
            buffer,
            byte_index: 0,
            bit_index: 0,
        }
    }

    pub fn read_bit(&mut self) -> Result<bool, SerdeErr> {
        let Some(byte) = self.buffer.get(self.byte_index) else {
            return Err(SerdeErr::ReadPastEnd {
                buffer_bytes: self.buffer.len(),
            });
        };

        let bit = (byte >> self.bit_index) & 1 != 0;

        self.bit_index += 1;
        if self.bit_index >= 8 {
            self.bit_index = 0;
            self.byte_index += 1;
        }

        Ok(bit)
    }

    pub fn read_byte(&mut self) -> Result<u8, SerdeErr> {
        let mut output: u8 = 0;
        for index in 0..8 {
            if self.read_bit()? {
                output |= 1 << index;
            }
        }
        Ok(output)
    }

    /// Bytes not yet touched by a read. Only trailing padding may remain
    /// once a complete message has been decoded.
    pub fn bytes_remaining(&self) -> usize {
        let consumed = self.byte_index + usize::from(self.bit_index > 0);
        self.buffer.len().saturating_sub(consumed)
    }

    /// Checks that nothing but zeroed padding follows the bits read so far.
    pub fn finish(&self) -> Result<(), SerdeErr> {
        let padding_clear = match self.buffer.get(self.byte_index) {
            Some(byte) if self.bit_index > 0 => byte >> self.bit_index == 0,
            _ => true,
        };
        if self.bytes_remaining() != 0 || !padding_clear {
            return Err(SerdeErr::TrailingData {
                buffer_bytes: self.buffer.len(),
            });
        }
        Ok(())
    }
}
