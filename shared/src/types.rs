use std::ops::{Add, Sub};

use sectornet_serde::{ByteReader, ByteWrite, Serde, SerdeErr};

pub type PeerId = u64;
pub type EntityId = u64;
pub type SectorId = u64;
pub type ComponentIndex = u32;

/// Owner id meaning "any peer may mutate this entity". Real peer ids start at 1.
pub const ANYONE: PeerId = 0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HostType {
    Server,
    Client,
}

impl HostType {
    pub fn invert(self) -> Self {
        match self {
            HostType::Server => HostType::Client,
            HostType::Client => HostType::Server,
        }
    }
}

// Vec3
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

impl Add for Vec3 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vec3 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Serde for Vec3 {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        self.x.ser(writer);
        self.y.ser(writer);
        self.z.ser(writer);
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        Ok(Self::new(f32::de(reader)?, f32::de(reader)?, f32::de(reader)?))
    }

    fn byte_length(&self) -> usize {
        12
    }
}

/// Per-sector world generation parameters, handed to clients on join
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SectorParameters {
    pub has_terrain: bool,
    pub noise_scale: f32,
    pub noise_offset: Vec3,
}

impl Serde for SectorParameters {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        self.has_terrain.ser(writer);
        self.noise_scale.ser(writer);
        self.noise_offset.ser(writer);
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        Ok(Self {
            has_terrain: bool::de(reader)?,
            noise_scale: f32::de(reader)?,
            noise_offset: Vec3::de(reader)?,
        })
    }
}
