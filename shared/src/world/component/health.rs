use sectornet_serde::{ByteReader, ByteWrite, Serde, SerdeErr};

#[derive(Clone, Debug, PartialEq)]
pub struct HealthComponent {
    pub health: i32,
}

impl HealthComponent {
    pub fn new(health: i32) -> Self {
        Self { health }
    }

    /// Sets the health value. Returns true when the new value is depleted (`<= 0`).
    pub fn set(&mut self, health: i32) -> bool {
        self.health = health;
        self.is_depleted()
    }

    pub fn is_depleted(&self) -> bool {
        self.health <= 0
    }
}

impl Default for HealthComponent {
    fn default() -> Self {
        Self::new(100)
    }
}

impl Serde for HealthComponent {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        self.health.ser(writer);
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        Ok(Self::new(i32::de(reader)?))
    }
}
