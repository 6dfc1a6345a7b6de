use sectornet_serde::{encode, ByteReader, ByteWrite, Serde, SerdeErr};

use crate::{
    world::component::{Component, ComponentKind, OverwriteError},
    ComponentIndex, EntityId,
};

/// Back-reference from a component to the entity slot holding it
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ComponentParent {
    pub entity_id: EntityId,
    pub index: ComponentIndex,
}

#[derive(Clone, Debug, PartialEq)]
struct ComponentCell {
    parent: ComponentParent,
    save_only: bool,
    component: Component,
}

/// Fixed-size, ordered list of an entity's components. Indexes never move
/// and the list never grows or shrinks after construction.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ComponentRegistry {
    entity_id: EntityId,
    cells: Vec<ComponentCell>,
}

impl ComponentRegistry {
    /// Builds a registry from `(component, save_only)` pairs. Save-only
    /// components are left out of network snapshots.
    pub fn new(layout: Vec<(Component, bool)>) -> Self {
        let cells = layout
            .into_iter()
            .map(|(component, save_only)| ComponentCell {
                parent: ComponentParent::default(),
                save_only,
                component,
            })
            .collect();
        Self {
            entity_id: EntityId::default(),
            cells,
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Points every component back at `entity_id`
    pub fn initialize(&mut self, entity_id: EntityId) {
        self.entity_id = entity_id;
        for (index, cell) in self.cells.iter_mut().enumerate() {
            cell.parent = ComponentParent {
                entity_id,
                index: index as ComponentIndex,
            };
        }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn get(&self, index: ComponentIndex) -> Option<&Component> {
        self.cells
            .get(index as usize)
            .map(|cell| &cell.component)
    }

    pub fn get_mut(&mut self, index: ComponentIndex) -> Option<&mut Component> {
        self.cells
            .get_mut(index as usize)
            .map(|cell| &mut cell.component)
    }

    pub fn parent(&self, index: ComponentIndex) -> Option<ComponentParent> {
        self.cells.get(index as usize).map(|cell| cell.parent)
    }

    pub fn is_save_only(&self, index: ComponentIndex) -> bool {
        self.cells
            .get(index as usize)
            .map(|cell| cell.save_only)
            .unwrap_or(false)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ComponentIndex, &Component)> {
        self.cells
            .iter()
            .enumerate()
            .map(|(index, cell)| (index as ComponentIndex, &cell.component))
    }

    /// First component of the given kind
    pub fn find(&self, kind: ComponentKind) -> Option<(ComponentIndex, &Component)> {
        self.iter().find(|(_, component)| component.kind() == kind)
    }

    pub fn find_mut(&mut self, kind: ComponentKind) -> Option<(ComponentIndex, &mut Component)> {
        self.cells
            .iter_mut()
            .enumerate()
            .find(|(_, cell)| cell.component.kind() == kind)
            .map(|(index, cell)| (index as ComponentIndex, &mut cell.component))
    }

    /// Serialized bytes of one component, as sent in an overwrite update
    pub fn payload(&self, index: ComponentIndex) -> Option<Vec<u8>> {
        self.get(index).map(encode)
    }

    /// Replaces the component at `index` with the one encoded in `payload`.
    /// The component's back-reference is kept. On any error nothing changes.
    pub fn overwrite(
        &mut self,
        index: ComponentIndex,
        payload: &[u8],
    ) -> Result<ComponentKind, OverwriteError> {
        let len = self.cells.len();
        let Some(cell) = self.cells.get_mut(index as usize) else {
            return Err(OverwriteError::IndexOutOfRange {
                entity_id: self.entity_id,
                index,
                len,
            });
        };

        let incoming = Component::from_payload(payload)?;
        let expected = cell.component.kind();
        let found = incoming.kind();
        if expected != found {
            return Err(OverwriteError::KindMismatch {
                index,
                expected,
                found,
            });
        }

        cell.component = incoming;
        Ok(found)
    }

    // Serialization

    pub(crate) fn ser_with(&self, writer: &mut dyn ByteWrite, in_save_state: bool) {
        (self.cells.len() as u32).ser(writer);
        for cell in &self.cells {
            if cell.save_only && !in_save_state {
                false.ser(writer);
            } else {
                true.ser(writer);
                cell.component.ser(writer);
            }
        }
    }

    /// Reads a registry over `template`, the entity kind's default layout.
    /// Components that were left out of the snapshot keep the template value.
    pub(crate) fn de_with(
        reader: &mut ByteReader,
        mut template: ComponentRegistry,
    ) -> Result<Self, SerdeErr> {
        let count = u32::de(reader)? as usize;
        if count != template.cells.len() {
            return Err(SerdeErr::InvalidValue {
                type_name: "ComponentRegistry",
                reason: "component count does not match the entity kind",
            });
        }

        for cell in template.cells.iter_mut() {
            if !bool::de(reader)? {
                continue;
            }
            let component = Component::de(reader)?;
            if component.kind() != cell.component.kind() {
                return Err(SerdeErr::InvalidValue {
                    type_name: "ComponentRegistry",
                    reason: "component kind does not match the entity kind layout",
                });
            }
            cell.component = component;
        }

        Ok(template)
    }
}
