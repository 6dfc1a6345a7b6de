use sectornet_serde::{ByteReader, ByteWrite, Serde, SerdeErr};

use crate::types::{EntityId, Vec3};

/// One end of a portal link
#[derive(Clone, Debug, PartialEq)]
pub struct PortalNode {
    /// The holder entity on the other side
    pub target_entity: EntityId,
    /// Index of the node in the target holder's portal component
    pub target_node: u8,
    /// Exit transform, as an offset from the holder entity
    pub exit_position: Vec3,
    pub exit_rotation: Vec3,
}

impl Serde for PortalNode {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        self.target_entity.ser(writer);
        self.target_node.ser(writer);
        self.exit_position.ser(writer);
        self.exit_rotation.ser(writer);
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        Ok(Self {
            target_entity: EntityId::de(reader)?,
            target_node: u8::de(reader)?,
            exit_position: Vec3::de(reader)?,
            exit_rotation: Vec3::de(reader)?,
        })
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PortalComponent {
    pub nodes: Vec<PortalNode>,
}

impl PortalComponent {
    pub fn node(&self, id: u8) -> Option<&PortalNode> {
        self.nodes.get(usize::from(id))
    }
}

impl Serde for PortalComponent {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        self.nodes.ser(writer);
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        Ok(Self {
            nodes: Vec::de(reader)?,
        })
    }
}
