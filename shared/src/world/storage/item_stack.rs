use sectornet_serde::{ByteReader, ByteWrite, Serde, SerdeErr};

use crate::world::{
    component::{ComponentKind, StorableComponent},
    entity_record::EntityRecord,
};

/// A stored item and how many of it the slot holds. The item record is
/// detached: it belongs to no sector and has no live instance.
#[derive(Clone, Debug, PartialEq)]
pub struct ItemStack {
    pub item: Box<EntityRecord>,
    pub count: u32,
}

impl ItemStack {
    pub fn new(item: EntityRecord, count: u32) -> Self {
        Self {
            item: Box::new(item),
            count,
        }
    }

    pub fn storable(&self) -> Option<&StorableComponent> {
        storable_of(&self.item)
    }

    /// Whether `count` more of `item` fit on top of this stack
    pub fn can_stack(&self, item: &EntityRecord, count: u32) -> bool {
        let (Some(existing), Some(incoming)) = (self.storable(), storable_of(item)) else {
            return false;
        };
        existing.stacks_with(incoming)
            && self
                .count
                .checked_add(count)
                .map(|total| total <= existing.max_stack)
                .unwrap_or(false)
    }
}

pub(crate) fn storable_of(record: &EntityRecord) -> Option<&StorableComponent> {
    record
        .components()
        .find(ComponentKind::Storable)
        .and_then(|(_, component)| component.as_storable())
}

impl Serde for ItemStack {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        self.item.ser(writer);
        self.count.ser(writer);
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        let item = Box::<EntityRecord>::de(reader)?;
        let count = u32::de(reader)?;
        if count == 0 {
            return Err(SerdeErr::InvalidValue {
                type_name: "ItemStack",
                reason: "stack count must be at least 1",
            });
        }
        Ok(Self { item, count })
    }
}
