use sectornet_serde::{ByteReader, ByteWrite, Serde, SerdeErr};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct BasicAnimComponent {
    pub current_animation: u8,
}

impl Serde for BasicAnimComponent {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        self.current_animation.ser(writer);
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        Ok(Self {
            current_animation: u8::de(reader)?,
        })
    }
}
