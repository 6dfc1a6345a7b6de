use crate::SerdeErr;

/// Deepest nesting of self-containing values a reader will follow
pub const MAX_NESTING_DEPTH: usize = 16;

/// Cursor over a borrowed byte slice
pub struct ByteReader<'b> {
    buffer: &'b [u8],
    position: usize,
    depth: usize,
}

impl<'b> ByteReader<'b> {
    pub fn new(buffer: &'b [u8]) -> Self {
        Self {
            buffer,
            position: 0,
            depth: 0,
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn remaining(&self) -> usize {
        self.buffer.len() - self.position
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    pub fn read_byte(&mut self) -> Result<u8, SerdeErr> {
        let bytes = self.read_bytes(1)?;
        Ok(bytes[0])
    }

    pub fn read_bytes(&mut self, count: usize) -> Result<&'b [u8], SerdeErr> {
        let remaining = self.remaining();
        if count > remaining {
            return Err(SerdeErr::UnexpectedEnd {
                needed: count,
                remaining,
            });
        }
        let start = self.position;
        self.position += count;
        Ok(&self.buffer[start..self.position])
    }

    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], SerdeErr> {
        let bytes = self.read_bytes(N)?;
        let mut output = [0u8; N];
        output.copy_from_slice(bytes);
        Ok(output)
    }

    /// The unread tail of the buffer, consumed
    pub fn read_rest(&mut self) -> &'b [u8] {
        let start = self.position;
        self.position = self.buffer.len();
        &self.buffer[start..]
    }

    /// Reads a u32 length prefix and checks that at least `length * min_element_size`
    /// bytes remain, so a hostile prefix cannot trigger a huge allocation
    pub fn read_length(&mut self, min_element_size: usize) -> Result<usize, SerdeErr> {
        let length = u32::from_le_bytes(self.read_array::<4>()?) as usize;
        let remaining = self.remaining();
        if length.saturating_mul(min_element_size) > remaining {
            return Err(SerdeErr::LengthExceedsRemaining { length, remaining });
        }
        Ok(length)
    }

    /// Steps into a value that may contain itself. Recursive `de` impls pair
    /// this with [`ByteReader::leave`] so hostile input cannot exhaust the stack.
    pub fn enter(&mut self) -> Result<(), SerdeErr> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(SerdeErr::TooDeep {
                limit: MAX_NESTING_DEPTH,
            });
        }
        self.depth += 1;
        Ok(())
    }

    pub fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }
}
