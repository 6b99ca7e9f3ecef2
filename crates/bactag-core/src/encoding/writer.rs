use crate::EncodeError;

/// MSB-first bit writer into a caller-owned buffer.
#[derive(Debug)]
pub struct WriteBuffer<'a> {
    buf: &'a mut [u8],
    bit_pos: usize,
}

impl<'a> WriteBuffer<'a> {
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, bit_pos: 0 }
    }

    /// Bytes touched so far, including a trailing partial byte.
    pub const fn position(&self) -> usize {
        self.bit_pos.div_ceil(8)
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

    pub const fn is_byte_aligned(&self) -> bool {
        self.bit_pos % 8 == 0
    }

    pub fn as_written(&self) -> &[u8] {
        &self.buf[..self.position()]
    }

    pub fn write_bit(&mut self, value: bool) -> Result<(), EncodeError> {
        if self.remaining_bits() < 1 {
            return Err(EncodeError::BufferTooSmall);
        }
        let mask = 1u8 << (7 - (self.bit_pos % 8));
        let byte = &mut self.buf[self.bit_pos / 8];
        if value {
            *byte |= mask;
        } else {
            *byte &= !mask;
        }
        self.bit_pos += 1;
        Ok(())
    }

    fn write_bits(&mut self, bits: u8, value: u64) -> Result<(), EncodeError> {
        if bits > 64 {
            return Err(EncodeError::InvalidLength);
        }
        if bits < 64 && value >> bits != 0 {
            return Err(EncodeError::ValueOutOfRange);
        }
        if self.remaining_bits() < bits as usize {
            return Err(EncodeError::BufferTooSmall);
        }
        let mut left = bits;
        while left > 0 {
            if self.is_byte_aligned() && left >= 8 {
                left -= 8;
                self.buf[self.bit_pos / 8] = (value >> left) as u8;
                self.bit_pos += 8;
            } else {
                left -= 1;
                self.write_bit((value >> left) & 1 == 1)?;
            }
        }
        Ok(())
    }

    pub fn write_u8(&mut self, bits: u8, value: u8) -> Result<(), EncodeError> {
        if bits > 8 {
            return Err(EncodeError::InvalidLength);
        }
        self.write_bits(bits, value as u64)
    }

    pub fn write_u16(&mut self, bits: u8, value: u16) -> Result<(), EncodeError> {
        if bits > 16 {
            return Err(EncodeError::InvalidLength);
        }
        self.write_bits(bits, value as u64)
    }

    pub fn write_u32(&mut self, bits: u8, value: u32) -> Result<(), EncodeError> {
        if bits > 32 {
            return Err(EncodeError::InvalidLength);
        }
        self.write_bits(bits, value as u64)
    }

    pub fn write_u64(&mut self, bits: u8, value: u64) -> Result<(), EncodeError> {
        self.write_bits(bits, value)
    }

    /// Writes the low `bits` of a two's-complement value; the value must be
    /// representable in that width.
    pub fn write_i64(&mut self, bits: u8, value: i64) -> Result<(), EncodeError> {
        if bits == 0 || bits > 64 {
            return Err(EncodeError::InvalidLength);
        }
        if bits < 64 {
            let min = -(1i64 << (bits - 1));
            let max = (1i64 << (bits - 1)) - 1;
            if value < min || value > max {
                return Err(EncodeError::ValueOutOfRange);
            }
        }
        let raw = if bits == 64 {
            value as u64
        } else {
            (value as u64) & ((1u64 << bits) - 1)
        };
        self.write_bits(bits, raw)
    }

    pub fn write_all(&mut self, data: &[u8]) -> Result<(), EncodeError> {
        if !self.is_byte_aligned() {
            return Err(EncodeError::Unaligned);
        }
        if self.remaining() < data.len() {
            return Err(EncodeError::BufferTooSmall);
        }
        let start = self.bit_pos / 8;
        self.buf[start..start + data.len()].copy_from_slice(data);
        self.bit_pos += data.len() * 8;
        Ok(())
    }

    /// Writes an IEEE-754 binary32 value; `total_bits` must be 32.
    pub fn write_f32(&mut self, total_bits: u8, value: f32) -> Result<(), EncodeError> {
        if total_bits != 32 {
            return Err(EncodeError::Unsupported);
        }
        self.write_u32(32, value.to_bits())
    }

    /// Writes an IEEE-754 binary64 value; `total_bits` must be 64.
    pub fn write_f64(&mut self, total_bits: u8, value: f64) -> Result<(), EncodeError> {
        if total_bits != 64 {
            return Err(EncodeError::Unsupported);
        }
        self.write_u64(64, value.to_bits())
    }
}
