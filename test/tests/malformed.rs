use sectornet_server::ServerConfig;
use sectornet_shared::{
    encode_message, DispatchError, DropReason, EntityId, EntityKind, EntityRecord, ItemStack,
    LoginPacket, MessageKind, MessageOutcome, Owners, PeerId, SerdeErr, SpawnEntity,
    TransformUpdate, Vec3, MAX_NESTING_DEPTH,
};
use sectornet_test::{door, init_logging, start_server, TestSetup};

fn logged_in() -> (TestSetup, PeerId, EntityId) {
    init_logging();
    let mut setup = start_server(ServerConfig::default());
    let peer = setup
        .server
        .connect_peer(&LoginPacket::new("ann", "pw"))
        .unwrap();
    let player = setup.server.world().player_entity(peer).unwrap();
    (setup, peer, player)
}

fn valid_move(player: EntityId) -> Vec<u8> {
    encode_message(&TransformUpdate {
        entity_id: player,
        position: Vec3::new(1.0, 2.0, 3.0),
        rotation: Vec3::ZERO,
    })
}

fn dispatch_error(outcome: MessageOutcome) -> DispatchError {
    match outcome {
        MessageOutcome::Dropped(DropReason::Dispatch(error)) => error,
        other => panic!("expected a dispatch error, got {:?}", other),
    }
}

#[test]
fn short_packets_have_no_tag() {
    let (mut setup, peer, _) = logged_in();
    assert_eq!(
        dispatch_error(setup.server.receive_packet(peer, &[])),
        DispatchError::MissingTag { len: 0 }
    );
    assert_eq!(
        dispatch_error(setup.server.receive_packet(peer, &[4])),
        DispatchError::MissingTag { len: 1 }
    );
}

#[test]
fn unknown_tag_is_dropped() {
    let (mut setup, peer, _) = logged_in();
    assert_eq!(
        dispatch_error(setup.server.receive_packet(peer, &[0xFF, 0x00, 1, 2, 3])),
        DispatchError::UnknownTag { tag: 0xFF }
    );
}

#[test]
fn truncated_and_padded_payloads_are_dropped() {
    let (mut setup, peer, player) = logged_in();
    let bytes = valid_move(player);

    let truncated = dispatch_error(setup.server.receive_packet(peer, &bytes[..bytes.len() - 3]));
    assert!(matches!(
        truncated,
        DispatchError::Malformed {
            kind: MessageKind::TransformUpdate,
            source: SerdeErr::UnexpectedEnd { .. },
        }
    ));

    let mut padded = bytes.clone();
    padded.push(0);
    assert_eq!(
        dispatch_error(setup.server.receive_packet(peer, &padded)),
        DispatchError::Malformed {
            kind: MessageKind::TransformUpdate,
            source: SerdeErr::TrailingBytes { trailing: 1 },
        }
    );
    assert_eq!(
        setup.server.world().record(player).map(|record| record.position),
        Some(Vec3::ZERO)
    );
}

#[test]
fn oversized_packet_is_dropped_unread() {
    let (mut setup, peer, _) = logged_in();
    let max = setup.server.world().protocol().max_payload_bytes;
    let bytes = vec![1u8; max + 1];
    assert_eq!(
        dispatch_error(setup.server.receive_packet(peer, &bytes)),
        DispatchError::Oversized { len: max + 1, max }
    );
}

#[test]
fn server_bound_packets_only() {
    let (mut setup, peer, _) = logged_in();
    let spawn = encode_message(&SpawnEntity {
        record: door(Owners::anyone()),
    });
    assert_eq!(
        setup.server.receive_packet(peer, &spawn),
        MessageOutcome::Dropped(DropReason::WrongRole(MessageKind::SpawnEntity))
    );
    assert_eq!(setup.server.world().sectors().map(|sector| sector.len()).sum::<usize>(), 1);
}

#[test]
fn valid_packet_still_applies_after_garbage() {
    let (mut setup, peer, player) = logged_in();
    let garbage: [&[u8]; 4] = [&[], &[9], &[0xFF, 0xFF], &[1, 0, 7]];
    for bytes in garbage {
        setup.hub.inject(peer, bytes);
    }
    setup.hub.inject(peer, &valid_move(player));

    let outcomes = setup.server.tick();
    assert_eq!(outcomes.len(), 5);
    assert!(outcomes[..4]
        .iter()
        .all(|(_, outcome)| matches!(outcome, MessageOutcome::Dropped(DropReason::Dispatch(_)))));
    assert_eq!(outcomes[4], (peer, MessageOutcome::Applied));
    assert_eq!(
        setup.server.world().record(player).map(|record| record.position),
        Some(Vec3::new(1.0, 2.0, 3.0))
    );

    // everything was consumed in one tick
    assert!(setup.server.tick().is_empty());
}

/// A pickup holding a pickup holding a pickup, `depth` records deep
fn nested_pickup(depth: usize) -> EntityRecord {
    let mut record = EntityRecord::new(EntityKind::StaticProp);
    for _ in 1..depth {
        record = EntityRecord::new(EntityKind::ItemPickup {
            items: vec![ItemStack::new(record, 1)],
        });
    }
    record
}

#[test]
fn deeply_nested_records_are_dropped() {
    let (mut setup, peer, _) = logged_in();
    let max = setup.server.world().protocol().max_payload_bytes;

    // far past the nesting limit yet well within the payload limit
    let spawn = encode_message(&SpawnEntity {
        record: nested_pickup(200),
    });
    assert!(spawn.len() <= max);
    assert_eq!(
        dispatch_error(setup.server.receive_packet(peer, &spawn)),
        DispatchError::Malformed {
            kind: MessageKind::SpawnEntity,
            source: SerdeErr::TooDeep {
                limit: MAX_NESTING_DEPTH
            },
        }
    );

    // the same packet through a tick, on the test thread's own stack
    setup.hub.inject(peer, &spawn);
    let outcomes = setup.server.tick();
    assert_eq!(outcomes.len(), 1);
    assert!(matches!(
        outcomes[0].1,
        MessageOutcome::Dropped(DropReason::Dispatch(DispatchError::Malformed {
            source: SerdeErr::TooDeep { .. },
            ..
        }))
    ));

    // nesting within the limit is still decoded, then refused by role
    let shallow = encode_message(&SpawnEntity {
        record: nested_pickup(MAX_NESTING_DEPTH),
    });
    assert_eq!(
        setup.server.receive_packet(peer, &shallow),
        MessageOutcome::Dropped(DropReason::WrongRole(MessageKind::SpawnEntity))
    );
}
