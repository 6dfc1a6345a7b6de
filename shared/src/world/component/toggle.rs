use sectornet_serde::{ByteReader, ByteWrite, Serde, SerdeErr};

/// Two-state switch, used for doors
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ToggleComponent {
    pub state: bool,
}

impl ToggleComponent {
    pub fn new(state: bool) -> Self {
        Self { state }
    }

    /// Flips the state and returns the new one
    pub fn toggle(&mut self) -> bool {
        self.state = !self.state;
        self.state
    }
}

impl Serde for ToggleComponent {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        self.state.ser(writer);
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        Ok(Self::new(bool::de(reader)?))
    }
}
