use crate::{ByteCounter, ByteReader, ByteWrite, ByteWriter, SerdeErr};

/// A type that can be written to and read from the byte codec.
///
/// Encoding must be deterministic: equal values always produce equal bytes,
/// and `de` must accept exactly what `ser` produces.
pub trait Serde: Sized {
    fn ser(&self, writer: &mut dyn ByteWrite);

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr>;

    /// Decodes into an existing value. Types that carry state which is not
    /// part of their serialized form (back-references, observers) override
    /// this to keep that state intact.
    fn de_in_place(&mut self, reader: &mut ByteReader) -> Result<(), SerdeErr> {
        *self = Self::de(reader)?;
        Ok(())
    }

    /// Number of bytes `ser` will write
    fn byte_length(&self) -> usize {
        let mut counter = ByteCounter::new();
        self.ser(&mut counter);
        counter.count()
    }
}

/// Serializes `value` into a fresh buffer
pub fn encode<T: Serde>(value: &T) -> Vec<u8> {
    let mut writer = ByteWriter::with_capacity(value.byte_length());
    value.ser(&mut writer);
    writer.to_bytes()
}

/// Deserializes a `T` from the front of `bytes`, ignoring anything after it
pub fn decode<T: Serde>(bytes: &[u8]) -> Result<T, SerdeErr> {
    let mut reader = ByteReader::new(bytes);
    T::de(&mut reader)
}

/// Deserializes a `T` that must span all of `bytes`
pub fn decode_exact<T: Serde>(bytes: &[u8]) -> Result<T, SerdeErr> {
    let mut reader = ByteReader::new(bytes);
    let value = T::de(&mut reader)?;
    if !reader.is_empty() {
        return Err(SerdeErr::TrailingBytes {
            trailing: reader.remaining(),
        });
    }
    Ok(value)
}
