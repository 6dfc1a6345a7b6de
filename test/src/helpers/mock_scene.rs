use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use sectornet_shared::{EntityId, EntityRecord, HostType, LiveHandle, SceneSpawner, Vec3};

/// What a [`MockScene`] has been asked to do
#[derive(Default)]
pub struct SceneLog {
    pub spawned: Vec<(EntityId, HostType)>,
    pub destroyed: usize,
    pub live: HashMap<LiveHandle, (Vec3, Vec3)>,
}

/// Scene that keeps transforms in memory and logs every call. Clones share the log.
#[derive(Clone, Default)]
pub struct MockScene {
    log: Arc<Mutex<SceneLog>>,
    next_handle: Arc<Mutex<u64>>,
}

impl MockScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn live_count(&self) -> usize {
        self.log.lock().unwrap().live.len()
    }

    pub fn spawned(&self) -> Vec<(EntityId, HostType)> {
        self.log.lock().unwrap().spawned.clone()
    }

    pub fn destroyed(&self) -> usize {
        self.log.lock().unwrap().destroyed
    }

    /// Moves a live object behind the record's back, as a simulation would
    pub fn nudge(&self, handle: LiveHandle, position: Vec3) {
        if let Some(transform) = self.log.lock().unwrap().live.get_mut(&handle) {
            transform.0 = position;
        }
    }
}

impl SceneSpawner for MockScene {
    fn spawn_instance(&mut self, record: &EntityRecord, host_type: HostType) -> LiveHandle {
        let mut next = self.next_handle.lock().unwrap();
        let handle = LiveHandle(*next);
        *next += 1;

        let mut log = self.log.lock().unwrap();
        log.spawned.push((record.entity_id(), host_type));
        log.live.insert(handle, (record.position, record.rotation));
        handle
    }

    fn destroy(&mut self, handle: LiveHandle) {
        let mut log = self.log.lock().unwrap();
        if log.live.remove(&handle).is_some() {
            log.destroyed += 1;
        }
    }

    fn read_transform(&self, handle: LiveHandle) -> Option<(Vec3, Vec3)> {
        self.log.lock().unwrap().live.get(&handle).copied()
    }

    fn apply_transform(&mut self, handle: LiveHandle, position: Vec3, rotation: Vec3) {
        if let Some(transform) = self.log.lock().unwrap().live.get_mut(&handle) {
            *transform = (position, rotation);
        }
    }
}
