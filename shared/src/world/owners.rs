use std::collections::BTreeSet;

use sectornet_serde::{ByteReader, ByteWrite, Serde, SerdeErr};

use crate::types::{PeerId, ANYONE};

/// Peers permitted to mutate an entity. Containing [`ANYONE`] permits every peer.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Owners(BTreeSet<PeerId>);

impl Owners {
    /// Owned by the server alone
    pub fn none() -> Self {
        Self(BTreeSet::new())
    }

    pub fn anyone() -> Self {
        Self::only(ANYONE)
    }

    pub fn only(peer: PeerId) -> Self {
        Self(BTreeSet::from([peer]))
    }

    pub fn contains_anyone(&self) -> bool {
        self.0.contains(&ANYONE)
    }

    pub fn contains(&self, peer: PeerId) -> bool {
        self.0.contains(&peer)
    }

    pub fn permits(&self, peer: PeerId) -> bool {
        self.contains_anyone() || self.contains(peer)
    }

    pub fn insert(&mut self, peer: PeerId) -> bool {
        self.0.insert(peer)
    }

    pub fn remove(&mut self, peer: PeerId) -> bool {
        self.0.remove(&peer)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = PeerId> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<PeerId> for Owners {
    fn from_iter<I: IntoIterator<Item = PeerId>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Serde for Owners {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        self.0.ser(writer);
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        Ok(Self(BTreeSet::de(reader)?))
    }
}
