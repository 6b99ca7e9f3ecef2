use crate::DecodeError;

/// Zero-copy MSB-first bit reader over a borrowed byte slice.
#[derive(Debug, Clone, Copy)]
pub struct ReadBuffer<'a> {
    buf: &'a [u8],
    bit_pos: usize,
}

impl<'a> ReadBuffer<'a> {
    pub const fn new(buf: &'a [u8]) -> Self {
        Self { buf, bit_pos: 0 }
    }

    /// Current position in whole bytes, rounded down.
    pub const fn position(&self) -> usize {
        self.bit_pos / 8
    }

    pub const fn position_bits(&self) -> usize {
        self.bit_pos
    }

    pub fn remaining_bits(&self) -> usize {
        (self.buf.len() * 8).saturating_sub(self.bit_pos)
    }

    pub fn remaining(&self) -> usize {
        self.remaining_bits() / 8
    }

    pub fn is_empty(&self) -> bool {
        self.remaining_bits() == 0
    }

    pub const fn is_byte_aligned(&self) -> bool {
        self.bit_pos % 8 == 0
    }

    pub fn read_bit(&mut self) -> Result<bool, DecodeError> {
        let byte = *self
            .buf
            .get(self.bit_pos / 8)
            .ok_or(DecodeError::UnexpectedEof)?;
        let bit = (byte >> (7 - (self.bit_pos % 8))) & 1;
        self.bit_pos += 1;
        Ok(bit == 1)
    }

    fn read_bits(&mut self, bits: u8) -> Result<u64, DecodeError> {
        if bits > 64 {
            return Err(DecodeError::InvalidLength);
        }
        if self.remaining_bits() < bits as usize {
            return Err(DecodeError::UnexpectedEof);
        }
        let mut value = 0u64;
        let mut left = bits;
        while left > 0 {
            let offset = self.bit_pos % 8;
            let byte = self.buf[self.bit_pos / 8];
            if offset == 0 && left >= 8 {
                value = (value << 8) | byte as u64;
                self.bit_pos += 8;
                left -= 8;
            } else {
                let bit = (byte >> (7 - offset)) & 1;
                value = (value << 1) | bit as u64;
                self.bit_pos += 1;
                left -= 1;
            }
        }
        Ok(value)
    }

    pub fn read_u8(&mut self, bits: u8) -> Result<u8, DecodeError> {
        if bits > 8 {
            return Err(DecodeError::InvalidLength);
        }
        Ok(self.read_bits(bits)? as u8)
    }

    pub fn read_u16(&mut self, bits: u8) -> Result<u16, DecodeError> {
        if bits > 16 {
            return Err(DecodeError::InvalidLength);
        }
        Ok(self.read_bits(bits)? as u16)
    }

    pub fn read_u32(&mut self, bits: u8) -> Result<u32, DecodeError> {
        if bits > 32 {
            return Err(DecodeError::InvalidLength);
        }
        Ok(self.read_bits(bits)? as u32)
    }

    pub fn read_u64(&mut self, bits: u8) -> Result<u64, DecodeError> {
        self.read_bits(bits)
    }

    /// Reads a two's-complement value of `bits` width and sign-extends it.
    pub fn read_i64(&mut self, bits: u8) -> Result<i64, DecodeError> {
        if bits == 0 {
            return Err(DecodeError::InvalidLength);
        }
        let raw = self.read_bits(bits)?;
        let shift = 64 - bits as u32;
        Ok(((raw << shift) as i64) >> shift)
    }

    pub fn read_exact(&mut self, len: usize) -> Result<&'a [u8], DecodeError> {
        if !self.is_byte_aligned() {
            return Err(DecodeError::Unaligned);
        }
        if self.remaining() < len {
            return Err(DecodeError::UnexpectedEof);
        }
        let start = self.bit_pos / 8;
        self.bit_pos += len * 8;
        Ok(&self.buf[start..start + len])
    }

    /// Reads an IEEE-754 value laid out as sign, exponent and mantissa bits.
    ///
    /// Only the binary32 layout (1/8/23) is accepted here; the bits are taken
    /// verbatim, so NaN payloads survive.
    pub fn read_f32(
        &mut self,
        signed: bool,
        exponent_bits: u8,
        mantissa_bits: u8,
    ) -> Result<f32, DecodeError> {
        if !signed || exponent_bits != 8 || mantissa_bits != 23 {
            return Err(DecodeError::Unsupported);
        }
        Ok(f32::from_bits(self.read_u32(32)?))
    }

    /// Binary64 counterpart of [`read_f32`](Self::read_f32) (1/11/52).
    pub fn read_f64(
        &mut self,
        signed: bool,
        exponent_bits: u8,
        mantissa_bits: u8,
    ) -> Result<f64, DecodeError> {
        if !signed || exponent_bits != 11 || mantissa_bits != 52 {
            return Err(DecodeError::Unsupported);
        }
        Ok(f64::from_bits(self.read_u64(64)?))
    }
}
