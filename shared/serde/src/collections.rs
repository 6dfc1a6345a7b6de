use std::collections::{BTreeMap, BTreeSet};

use crate::{ByteReader, ByteWrite, Serde, SerdeErr};

fn write_length(writer: &mut dyn ByteWrite, length: usize) {
    // lengths above u32::MAX cannot be produced by any message we build
    writer.write_bytes(&(length as u32).to_le_bytes());
}

// The length prefix is only checked at one byte per element, so never reserve
// more memory than the remaining bytes could fill.
fn initial_capacity<T>(length: usize, remaining: usize) -> usize {
    length.min(remaining / std::mem::size_of::<T>().max(1))
}

// String

impl Serde for String {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        write_length(writer, self.len());
        writer.write_bytes(self.as_bytes());
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        let length = reader.read_length(1)?;
        let bytes = reader.read_bytes(length)?;
        String::from_utf8(bytes.to_vec()).map_err(|_| SerdeErr::InvalidUtf8)
    }

    fn byte_length(&self) -> usize {
        4 + self.len()
    }
}

// Vec

impl<T: Serde> Serde for Vec<T> {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        write_length(writer, self.len());
        for item in self {
            item.ser(writer);
        }
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        let length = reader.read_length(1)?;
        let mut output = Vec::with_capacity(initial_capacity::<T>(length, reader.remaining()));
        for _ in 0..length {
            output.push(T::de(reader)?);
        }
        Ok(output)
    }
}

// Option

impl<T: Serde> Serde for Option<T> {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        match self {
            Some(value) => {
                true.ser(writer);
                value.ser(writer);
            }
            None => false.ser(writer),
        }
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        if bool::de(reader)? {
            Ok(Some(T::de(reader)?))
        } else {
            Ok(None)
        }
    }
}

// Box

impl<T: Serde> Serde for Box<T> {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        self.as_ref().ser(writer);
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        Ok(Box::new(T::de(reader)?))
    }

    fn de_in_place(&mut self, reader: &mut ByteReader) -> Result<(), SerdeErr> {
        self.as_mut().de_in_place(reader)
    }
}

// BTreeMap & BTreeSet. Ordered iteration keeps the encoding deterministic.

impl<K: Serde + Ord, V: Serde> Serde for BTreeMap<K, V> {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        write_length(writer, self.len());
        for (key, value) in self {
            key.ser(writer);
            value.ser(writer);
        }
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        let length = reader.read_length(1)?;
        let mut output = BTreeMap::new();
        for _ in 0..length {
            let key = K::de(reader)?;
            let value = V::de(reader)?;
            output.insert(key, value);
        }
        Ok(output)
    }
}

impl<T: Serde + Ord> Serde for BTreeSet<T> {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        write_length(writer, self.len());
        for item in self {
            item.ser(writer);
        }
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        let length = reader.read_length(1)?;
        let mut output = BTreeSet::new();
        for _ in 0..length {
            output.insert(T::de(reader)?);
        }
        Ok(output)
    }
}

// Tuples

macro_rules! impl_serde_tuple {
    ($($name:ident),+) => {
        impl<$($name: Serde),+> Serde for ($($name,)+) {
            #[allow(non_snake_case)]
            fn ser(&self, writer: &mut dyn ByteWrite) {
                let ($($name,)+) = self;
                $($name.ser(writer);)+
            }

            fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
                Ok(($($name::de(reader)?,)+))
            }
        }
    };
}

impl_serde_tuple!(A, B);
impl_serde_tuple!(A, B, C);
impl_serde_tuple!(A, B, C, D);
