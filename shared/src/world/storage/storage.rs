use std::collections::BTreeMap;

use sectornet_serde::{ByteReader, ByteWrite, Serde, SerdeErr};

use crate::world::{
    entity_record::{EntityHome, EntityRecord},
    storage::{item_stack::storable_of, ItemStack, StorageError},
};

/// Sparse inventory: `slot -> stack`, with slots in `0..max_slots`
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StorageComponent {
    max_slots: u16,
    slots: BTreeMap<u16, ItemStack>,
}

/// How a validated move will be carried out
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveKind {
    /// Items join a compatible stack at the destination
    Merge,
    /// The whole source stack trades places with the destination (which may be empty)
    Swap,
    /// Part of the source stack starts a new stack in the empty destination
    Split,
}

impl StorageComponent {
    pub fn new(max_slots: u16) -> Self {
        Self {
            max_slots,
            slots: BTreeMap::new(),
        }
    }

    pub fn max_slots(&self) -> u16 {
        self.max_slots
    }

    pub fn get(&self, slot: u16) -> Option<&ItemStack> {
        self.slots.get(&slot)
    }

    pub fn slots(&self) -> impl Iterator<Item = (u16, &ItemStack)> {
        self.slots.iter().map(|(slot, stack)| (*slot, stack))
    }

    pub fn occupied(&self) -> usize {
        self.slots.len()
    }

    /// Sum of every stack's count
    pub fn total_count(&self) -> u64 {
        self.slots.values().map(|stack| u64::from(stack.count)).sum()
    }

    /// Puts a stack in an empty slot, for seeding inventories
    pub fn insert(&mut self, slot: u16, stack: ItemStack) -> Result<(), StorageError> {
        self.check_slot(slot)?;
        if stack.count == 0 {
            return Err(StorageError::InvalidCount {
                count: 0,
                available: 0,
            });
        }
        if self.slots.contains_key(&slot) {
            return Err(StorageError::DestinationOccupied { slot });
        }
        self.slots.insert(slot, detach(stack));
        Ok(())
    }

    /// Moves `count` items between two slots of this storage
    pub fn move_within(
        &mut self,
        source_slot: u16,
        dest_slot: u16,
        count: u32,
    ) -> Result<MoveKind, StorageError> {
        if source_slot == dest_slot {
            // still report bounds and emptiness ahead of the same-slot case
            self.check_slot(source_slot)?;
            self.source_stack(source_slot, count)?;
            return Err(StorageError::SameSlot { slot: source_slot });
        }
        let kind = plan_move(self, source_slot, self, dest_slot, count)?;

        match kind {
            MoveKind::Merge => {
                if let Some(dest) = self.slots.get_mut(&dest_slot) {
                    dest.count += count;
                }
                take_from(&mut self.slots, source_slot, count);
            }
            MoveKind::Swap => {
                let moving = self.slots.remove(&source_slot);
                if let Some(displaced) = self.slots.remove(&dest_slot) {
                    self.slots.insert(source_slot, displaced);
                }
                if let Some(moving) = moving {
                    self.slots.insert(dest_slot, moving);
                }
            }
            MoveKind::Split => {
                if let Some(split) = split_off(&mut self.slots, source_slot, count) {
                    self.slots.insert(dest_slot, split);
                }
            }
        }
        Ok(kind)
    }

    /// Moves `count` items from `source_slot` of `source` into `dest_slot` of `dest`
    pub fn move_between(
        source: &mut StorageComponent,
        dest: &mut StorageComponent,
        source_slot: u16,
        dest_slot: u16,
        count: u32,
    ) -> Result<MoveKind, StorageError> {
        let kind = plan_move(source, source_slot, dest, dest_slot, count)?;

        match kind {
            MoveKind::Merge => {
                if let Some(stack) = dest.slots.get_mut(&dest_slot) {
                    stack.count += count;
                }
                take_from(&mut source.slots, source_slot, count);
            }
            MoveKind::Swap => {
                let moving = source.slots.remove(&source_slot);
                if let Some(displaced) = dest.slots.remove(&dest_slot) {
                    source.slots.insert(source_slot, displaced);
                }
                if let Some(moving) = moving {
                    dest.slots.insert(dest_slot, moving);
                }
            }
            MoveKind::Split => {
                if let Some(split) = split_off(&mut source.slots, source_slot, count) {
                    dest.slots.insert(dest_slot, split);
                }
            }
        }
        Ok(kind)
    }

    /// Stores `count` of `item`: onto the first compatible stack if there is
    /// one, else into the first empty slot. Returns the slot used.
    pub fn store_item(&mut self, item: &EntityRecord, count: u32) -> Result<u16, StorageError> {
        let Some(storable) = storable_of(item) else {
            return Err(StorageError::NotStorable {
                entity_id: item.entity_id(),
            });
        };
        if count == 0 {
            return Err(StorageError::InvalidCount {
                count,
                available: 0,
            });
        }

        if storable.stackable {
            let target = self
                .slots
                .iter()
                .find(|(_, stack)| stack.can_stack(item, count))
                .map(|(slot, _)| *slot);
            if let Some(slot) = target {
                if let Some(stack) = self.slots.get_mut(&slot) {
                    stack.count += count;
                }
                return Ok(slot);
            }
        }

        let empty = (0..self.max_slots).find(|slot| !self.slots.contains_key(slot));
        let Some(slot) = empty else {
            return Err(StorageError::StorageFull);
        };
        self.slots
            .insert(slot, detach(ItemStack::new(item.clone(), count)));
        Ok(slot)
    }

    /// Removes and returns the stack in `slot`
    pub fn drop_slot(&mut self, slot: u16) -> Result<ItemStack, StorageError> {
        self.check_slot(slot)?;
        self.slots
            .remove(&slot)
            .ok_or(StorageError::EmptySlot { slot })
    }

    fn check_slot(&self, slot: u16) -> Result<(), StorageError> {
        if slot >= self.max_slots {
            return Err(StorageError::SlotOutOfRange {
                slot,
                max_slots: self.max_slots,
            });
        }
        Ok(())
    }

    fn source_stack(&self, slot: u16, count: u32) -> Result<&ItemStack, StorageError> {
        let stack = self
            .slots
            .get(&slot)
            .ok_or(StorageError::EmptySlot { slot })?;
        if count == 0 || count > stack.count {
            return Err(StorageError::InvalidCount {
                count,
                available: stack.count,
            });
        }
        Ok(stack)
    }
}

/// Validates a move without touching either storage
fn plan_move(
    source: &StorageComponent,
    source_slot: u16,
    dest: &StorageComponent,
    dest_slot: u16,
    count: u32,
) -> Result<MoveKind, StorageError> {
    source.check_slot(source_slot)?;
    dest.check_slot(dest_slot)?;
    let moving = source.source_stack(source_slot, count)?;

    match dest.slots.get(&dest_slot) {
        Some(existing) if existing.can_stack(&moving.item, count) => Ok(MoveKind::Merge),
        _ if count == moving.count => Ok(MoveKind::Swap),
        None => Ok(MoveKind::Split),
        Some(_) => Err(StorageError::DestinationOccupied { slot: dest_slot }),
    }
}

fn take_from(slots: &mut BTreeMap<u16, ItemStack>, slot: u16, count: u32) {
    let emptied = match slots.get_mut(&slot) {
        Some(stack) => {
            stack.count -= count;
            stack.count == 0
        }
        None => false,
    };
    if emptied {
        slots.remove(&slot);
    }
}

fn split_off(slots: &mut BTreeMap<u16, ItemStack>, slot: u16, count: u32) -> Option<ItemStack> {
    let stack = slots.get_mut(&slot)?;
    stack.count -= count;
    Some(ItemStack::new(stack.item.as_ref().clone(), count))
}

fn detach(mut stack: ItemStack) -> ItemStack {
    stack.item.set_home(EntityHome::Detached);
    stack
}

impl Serde for StorageComponent {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        self.max_slots.ser(writer);
        self.slots.ser(writer);
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        let max_slots = u16::de(reader)?;
        let slots = BTreeMap::<u16, ItemStack>::de(reader)?;
        if slots.keys().any(|slot| *slot >= max_slots) {
            return Err(SerdeErr::InvalidValue {
                type_name: "StorageComponent",
                reason: "slot index is outside the storage",
            });
        }
        Ok(Self { max_slots, slots })
    }
}
