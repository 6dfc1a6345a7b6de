use std::collections::HashMap;

use crate::{
    types::{HostType, Vec3},
    world::entity_record::EntityRecord,
};

/// Opaque handle to a live, instanced entity owned by the scene
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LiveHandle(pub u64);

/// The presentation or simulation layer that turns records into live objects
pub trait SceneSpawner: Send {
    fn spawn_instance(&mut self, record: &EntityRecord, host_type: HostType) -> LiveHandle;

    fn destroy(&mut self, handle: LiveHandle);

    /// Current transform of a live object, used to flush it back into its record
    fn read_transform(&self, handle: LiveHandle) -> Option<(Vec3, Vec3)>;

    /// Pushes a replicated transform onto a live object
    fn apply_transform(&mut self, _handle: LiveHandle, _position: Vec3, _rotation: Vec3) {}
}

/// Scene with no presentation, for dedicated servers. Instances are just
/// transforms that stay where they are put.
#[derive(Default)]
pub struct HeadlessScene {
    next_handle: u64,
    instances: HashMap<LiveHandle, (Vec3, Vec3)>,
}

impl HeadlessScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}

impl SceneSpawner for HeadlessScene {
    fn spawn_instance(&mut self, record: &EntityRecord, _host_type: HostType) -> LiveHandle {
        let handle = LiveHandle(self.next_handle);
        self.next_handle += 1;
        self.instances
            .insert(handle, (record.position, record.rotation));
        handle
    }

    fn destroy(&mut self, handle: LiveHandle) {
        self.instances.remove(&handle);
    }

    fn read_transform(&self, handle: LiveHandle) -> Option<(Vec3, Vec3)> {
        self.instances.get(&handle).copied()
    }

    fn apply_transform(&mut self, handle: LiveHandle, position: Vec3, rotation: Vec3) {
        if let Some(transform) = self.instances.get_mut(&handle) {
            *transform = (position, rotation);
        }
    }
}
