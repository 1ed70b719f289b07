//! Bit-addressed packet assembly.

/// Fixed-size byte buffer addressed by virtual bit offset, used to assemble
/// binary configuration packets field-by-field.
///
/// Every write lands in byte `bit_offset / 8`. `set_bits` maps bit `i` of the
/// value (LSB first) onto bit `(bit_offset + i) % 8` of that byte, so narrow
/// fields can sit at arbitrary positions inside a byte without disturbing its
/// other bits; no field wider than 8 bits goes through that path. Byte 0 is a
/// reserved header and stays zero unless explicitly written.
///
/// There is no bounds checking beyond the underlying array: offsets are part
/// of a wire contract and fixed by the caller.
#[derive(Debug, Clone)]
pub struct BitPackedBuffer {
    bytes: Vec<u8>,
}

impl BitPackedBuffer {
    pub fn new(size_bytes: usize) -> Self {
        Self {
            bytes: vec![0; size_bytes],
        }
    }

    /// Write `value` verbatim to byte `bit_offset / 8`, clobbering the whole
    /// byte. Meant for offsets that are multiples of 8.
    pub fn set_byte(&mut self, bit_offset: usize, value: u8) {
        self.bytes[bit_offset / 8] = value;
    }

    /// Write the low `len` bits of `value` (at most 8) starting at
    /// `bit_offset`, leaving the other bits of the touched byte alone.
    pub fn set_bits(&mut self, bit_offset: usize, value: u8, len: usize) {
        for i in 0..len.min(8) {
            let position = bit_offset + i;
            let mask = 1u8 << (position % 8);
            if value & (1 << i) == 0 {
                self.bytes[position / 8] &= !mask;
            } else {
                self.bytes[position / 8] |= mask;
            }
        }
    }

    /// Copy `value` contiguously starting at byte `bit_offset / 8`.
    pub fn set_bytes(&mut self, bit_offset: usize, value: &[u8]) {
        let start = bit_offset / 8;
        self.bytes[start..start + value.len()].copy_from_slice(value);
    }

    /// Two-byte convenience for big-endian shorts.
    pub fn set_short(&mut self, bit_offset: usize, value: [u8; 2]) {
        self.set_bytes(bit_offset, &value);
    }

    /// Finish construction, returning the packet bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}
