use sectornet_serde::{ByteReader, ByteWrite, Serde, SerdeErr};

/// Tag written in front of every serialized component
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ComponentKind {
    Toggle = 0,
    Health = 1,
    Storage = 2,
    Storable = 3,
    BasicAnim = 4,
    Portal = 5,
}

impl ComponentKind {
    pub fn tag(&self) -> u8 {
        *self as u8
    }

    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(ComponentKind::Toggle),
            1 => Some(ComponentKind::Health),
            2 => Some(ComponentKind::Storage),
            3 => Some(ComponentKind::Storable),
            4 => Some(ComponentKind::BasicAnim),
            5 => Some(ComponentKind::Portal),
            _ => None,
        }
    }

    /// Whether an overwrite of this kind may originate from a client. Every
    /// other kind is driven by server logic and only flows server to client.
    pub fn client_writable(&self) -> bool {
        matches!(self, ComponentKind::Toggle | ComponentKind::BasicAnim)
    }
}

impl Serde for ComponentKind {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        self.tag().ser(writer);
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        let tag = u8::de(reader)?;
        Self::from_tag(tag).ok_or(SerdeErr::InvalidTag {
            type_name: "ComponentKind",
            tag: u16::from(tag),
        })
    }

    fn byte_length(&self) -> usize {
        1
    }
}
