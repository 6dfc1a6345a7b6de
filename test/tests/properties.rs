use proptest::prelude::*;

use sectornet_server::ServerConfig;
use sectornet_shared::{
    decode_message, encode_message, LoginPacket, MessageOutcome, PlayerTransform, StorageAction,
    StorageDrop, TransformUpdate, UsePortal, Vec3,
};
use sectornet_test::start_server;

fn finite() -> impl Strategy<Value = f32> {
    -1.0e6f32..1.0e6f32
}

fn vec3() -> impl Strategy<Value = Vec3> {
    (finite(), finite(), finite()).prop_map(|(x, y, z)| Vec3::new(x, y, z))
}

proptest! {
    #[test]
    fn transforms_survive_the_wire(entity_id in any::<u64>(), position in vec3(), rotation in vec3(), head in vec3()) {
        let update = TransformUpdate { entity_id, position, rotation };
        prop_assert_eq!(decode_message::<TransformUpdate>(&encode_message(&update)).unwrap(), update);

        let player = PlayerTransform { entity_id, position, rotation, head_rotation: head };
        prop_assert_eq!(decode_message::<PlayerTransform>(&encode_message(&player)).unwrap(), player);
    }

    #[test]
    fn storage_messages_survive_the_wire(
        entities in (any::<u64>(), any::<u64>()),
        slots in (any::<u16>(), any::<u16>()),
        count in any::<u32>(),
        components in (any::<u32>(), any::<u32>()),
    ) {
        let action = StorageAction {
            source_entity: entities.0,
            dest_entity: entities.1,
            source_slot: slots.0,
            dest_slot: slots.1,
            count,
            source_component: components.0,
            dest_component: components.1,
        };
        prop_assert_eq!(decode_message::<StorageAction>(&encode_message(&action)).unwrap(), action);

        let drop = StorageDrop { entity_id: entities.0, component_index: components.0, slot: slots.0 };
        prop_assert_eq!(decode_message::<StorageDrop>(&encode_message(&drop)).unwrap(), drop);
    }

    #[test]
    fn server_survives_arbitrary_packets(packets in proptest::collection::vec(proptest::collection::vec(any::<u8>(), 0..48), 1..16)) {
        let mut setup = start_server(ServerConfig::default());
        let peer = setup.server.connect_peer(&LoginPacket::new("fuzz", "pw")).unwrap();

        for bytes in &packets {
            let _ = setup.server.receive_packet(peer, bytes);
        }
        // the peer is still served normally afterwards
        let player = setup.server.world().player_entity(peer).unwrap();
        let portal = UsePortal { entity_id: player, portal_id: 0 };
        let outcome = setup.server.receive_packet(peer, &encode_message(&portal));
        prop_assert!(!outcome.is_applied());
        prop_assert!(setup.server.world().is_active(peer));
        prop_assert!(matches!(
            setup.server.receive_packet(peer, &encode_message(&TransformUpdate {
                entity_id: player,
                position: Vec3::ZERO,
                rotation: Vec3::ZERO,
            })),
            MessageOutcome::Applied
        ), "transform update after fuzzing was not applied");
    }
}
