use sectornet_shared::{
    ClientInitializer, ComponentOverwriteUpdate, DestroyEntity, DropReason, Handles, Message,
    MessageOutcome, PlayerTransform, Rejection, SpawnEntity, StorageAction, StorageDrop,
    TransformUpdate, UsePortal,
};

use crate::ClientReplica;

/// Client-side effect of a message from the server
pub(crate) trait OnClient: Message {
    fn on_client(self, replica: &mut ClientReplica) -> MessageOutcome;
}

pub(crate) struct ClientHandler<'r> {
    pub replica: &'r mut ClientReplica,
}

impl<M: OnClient> Handles<M> for ClientHandler<'_> {
    fn handle(&mut self, message: M) -> MessageOutcome {
        message.on_client(self.replica)
    }
}

impl OnClient for ClientInitializer {
    fn on_client(self, replica: &mut ClientReplica) -> MessageOutcome {
        replica.initialize_scene(self);
        MessageOutcome::Applied
    }
}

impl OnClient for SpawnEntity {
    fn on_client(self, replica: &mut ClientReplica) -> MessageOutcome {
        replica.spawn_entity(self.record);
        MessageOutcome::Applied
    }
}

impl OnClient for DestroyEntity {
    fn on_client(self, replica: &mut ClientReplica) -> MessageOutcome {
        match replica.destroy_entity(self.entity_id) {
            Some(_) => MessageOutcome::Applied,
            None => DropReason::StaleEntity(self.entity_id).into(),
        }
    }
}

impl OnClient for TransformUpdate {
    fn on_client(self, replica: &mut ClientReplica) -> MessageOutcome {
        if replica.apply_transform(self.entity_id, self.position, self.rotation) {
            MessageOutcome::Applied
        } else {
            DropReason::StaleEntity(self.entity_id).into()
        }
    }
}

impl OnClient for PlayerTransform {
    fn on_client(self, replica: &mut ClientReplica) -> MessageOutcome {
        if !replica.apply_transform(self.entity_id, self.position, self.rotation) {
            return DropReason::StaleEntity(self.entity_id).into();
        }
        replica.set_head_rotation(self.entity_id, self.head_rotation);
        MessageOutcome::Applied
    }
}

impl OnClient for ComponentOverwriteUpdate {
    fn on_client(self, replica: &mut ClientReplica) -> MessageOutcome {
        match replica.apply_overwrite(&self) {
            Some(Ok(_)) => MessageOutcome::Applied,
            Some(Err(error)) => Rejection::from(error).into(),
            None => DropReason::StaleEntity(self.entity_id).into(),
        }
    }
}

// Client-to-server requests are never accepted from the server

impl OnClient for StorageAction {
    fn on_client(self, _: &mut ClientReplica) -> MessageOutcome {
        MessageOutcome::wrong_role(Self::KIND)
    }
}

impl OnClient for StorageDrop {
    fn on_client(self, _: &mut ClientReplica) -> MessageOutcome {
        MessageOutcome::wrong_role(Self::KIND)
    }
}

impl OnClient for UsePortal {
    fn on_client(self, _: &mut ClientReplica) -> MessageOutcome {
        MessageOutcome::wrong_role(Self::KIND)
    }
}
