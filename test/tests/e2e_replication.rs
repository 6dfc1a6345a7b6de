use sectornet_server::ServerConfig;
use sectornet_shared::{
    decode_message, encode_message, ComponentKind, ComponentOverwriteUpdate, DeliveryMethod,
    DropReason, HealthDepletedEvent, HostType, MessageKind, MessageOutcome, Owners, Rejection,
    TransformUpdate, Vec3,
};
use sectornet_test::{connect_client, door, exchange, init_logging, start_server};

fn config() -> ServerConfig {
    ServerConfig {
        player_inventory_slots: 8,
        ..ServerConfig::default()
    }
}

#[tokio::test]
async fn login_replicates_sector_and_private_state() {
    init_logging();
    let mut setup = start_server(config());
    let client = connect_client(&mut setup, "ann", "pw").await.unwrap();

    let player = client.replica().player_entity_id().unwrap();
    let record = client.replica().record(player).unwrap();
    assert!(client.replica().owns(player));

    // the initializer carries the template inventory, the owner overwrite the real one
    let index = record.storage_index().unwrap();
    assert_eq!(record.storage(index).unwrap().max_slots(), 8);

    let sent = setup.hub.sent_to(client.peer_id());
    assert_eq!(sent[0].kind, Some(MessageKind::ClientInitializer));
    assert_eq!(sent[0].delivery, DeliveryMethod::ReliableUnordered);
    let overwrites: Vec<DeliveryMethod> = sent[1..]
        .iter()
        .filter(|packet| packet.kind == Some(MessageKind::ComponentOverwriteUpdate))
        .map(|packet| packet.delivery)
        .collect();
    assert!(overwrites.contains(&DeliveryMethod::ReliableOrdered));
    assert!(overwrites.contains(&DeliveryMethod::Unreliable));
}

#[tokio::test]
async fn live_objects_are_spawned_for_the_right_role() {
    init_logging();
    let mut setup = start_server(config());
    let client = connect_client(&mut setup, "ann", "pw").await.unwrap();
    let player = client.replica().player_entity_id().unwrap();

    assert!(setup
        .scene
        .spawned()
        .contains(&(player, HostType::Server)));
    assert!(client.replica().instance(player).is_some());
}

#[tokio::test]
async fn transform_is_echoed_to_everyone_but_the_sender() {
    init_logging();
    let mut setup = start_server(config());
    let mut ann = connect_client(&mut setup, "ann", "pw").await.unwrap();
    let mut bob = connect_client(&mut setup, "bob", "pw").await.unwrap();
    let mut cat = connect_client(&mut setup, "cat", "pw").await.unwrap();
    exchange(&mut setup.server, &mut [&mut ann, &mut bob, &mut cat]);

    let ann_player = ann.replica().player_entity_id().unwrap();
    let cat_player = cat.replica().player_entity_id().unwrap();
    assert!(ann.replica().record(cat_player).is_some());
    // other players' inventories stay private
    for packet in setup.hub.sent_to(ann.peer_id()) {
        if packet.kind == Some(MessageKind::ComponentOverwriteUpdate) {
            let update = decode_message::<ComponentOverwriteUpdate>(&packet.bytes).unwrap();
            assert_eq!(update.entity_id, ann_player);
        }
    }

    setup.hub.clear_sent();
    let position = Vec3::new(4.0, 0.0, -2.0);
    ann.replica_mut()
        .update_transform(ann_player, position, Vec3::ZERO)
        .unwrap();
    let outcomes = exchange(&mut setup.server, &mut [&mut ann, &mut bob, &mut cat]);

    assert_eq!(outcomes, vec![(ann.peer_id(), MessageOutcome::Applied)]);
    let sent = setup.hub.sent();
    assert_eq!(sent.len(), 2);
    assert!(sent.iter().all(|packet| packet.peer != ann.peer_id()
        && packet.kind == Some(MessageKind::TransformUpdate)
        && packet.delivery == DeliveryMethod::Unreliable));
    assert_eq!(bob.replica().record(ann_player).unwrap().position, position);
    assert_eq!(cat.replica().record(ann_player).unwrap().position, position);
    assert_eq!(
        setup.server.world().record(ann_player).unwrap().position,
        position
    );
}

#[tokio::test]
async fn unauthorized_transform_leaves_position_unchanged() {
    init_logging();
    let mut setup = start_server(config());
    let mut ann = connect_client(&mut setup, "ann", "pw").await.unwrap();
    let mut bob = connect_client(&mut setup, "bob", "pw").await.unwrap();
    exchange(&mut setup.server, &mut [&mut ann, &mut bob]);

    let ann_player = ann.replica().player_entity_id().unwrap();
    let before = setup.server.world().record(ann_player).cloned();

    // the replica refuses locally, so forge the packet
    assert!(bob
        .replica_mut()
        .update_transform(ann_player, Vec3::new(9.0, 9.0, 9.0), Vec3::ZERO)
        .is_err());
    setup.hub.clear_sent();
    let forged = TransformUpdate {
        entity_id: ann_player,
        position: Vec3::new(9.0, 9.0, 9.0),
        rotation: Vec3::ZERO,
    };
    setup.hub.inject(bob.peer_id(), &encode_message(&forged));
    let outcomes = exchange(&mut setup.server, &mut [&mut ann, &mut bob]);

    assert_eq!(
        outcomes,
        vec![(
            bob.peer_id(),
            MessageOutcome::Rejected(Rejection::NotOwner {
                peer: bob.peer_id(),
                entity_id: ann_player,
            })
        )]
    );
    assert_eq!(setup.server.world().record(ann_player).cloned(), before);
    assert!(setup.hub.sent().is_empty());
}

#[tokio::test]
async fn server_toggle_reaches_every_client() {
    init_logging();
    let mut setup = start_server(config());
    let home = setup.server.world().data().home_sector().unwrap();
    let door = setup.server.spawn_entity(home, door(Owners::none())).unwrap();
    let mut ann = connect_client(&mut setup, "ann", "pw").await.unwrap();

    assert_eq!(setup.server.toggle(door), Ok(true));
    exchange(&mut setup.server, &mut [&mut ann]);

    let record = ann.replica().record(door).unwrap();
    let (_, toggle) = record.components().find(ComponentKind::Toggle).unwrap();
    assert_eq!(toggle.as_toggle().map(|toggle| toggle.state), Some(true));
    assert!(ann.replica_mut().toggle(door).is_err());
}

#[tokio::test]
async fn client_toggle_on_shared_door_is_echoed() {
    init_logging();
    let mut setup = start_server(config());
    let home = setup.server.world().data().home_sector().unwrap();
    let door = setup.server.spawn_entity(home, door(Owners::anyone())).unwrap();
    let mut ann = connect_client(&mut setup, "ann", "pw").await.unwrap();
    let mut bob = connect_client(&mut setup, "bob", "pw").await.unwrap();

    assert!(ann.replica_mut().toggle(door).unwrap());
    let outcomes = exchange(&mut setup.server, &mut [&mut ann, &mut bob]);
    assert_eq!(outcomes, vec![(ann.peer_id(), MessageOutcome::Applied)]);

    for record in [
        setup.server.world().record(door).unwrap(),
        bob.replica().record(door).unwrap(),
    ] {
        let (_, toggle) = record.components().find(ComponentKind::Toggle).unwrap();
        assert_eq!(toggle.as_toggle().map(|toggle| toggle.state), Some(true));
    }
}

#[tokio::test]
async fn health_depletion_is_reported() {
    init_logging();
    let mut setup = start_server(config());
    let home = setup.server.world().data().home_sector().unwrap();
    let door = setup.server.spawn_entity(home, door(Owners::none())).unwrap();
    let mut ann = connect_client(&mut setup, "ann", "pw").await.unwrap();

    assert_eq!(setup.server.set_health(door, 40), Ok(false));
    assert_eq!(setup.server.set_health(door, 0), Ok(true));
    let mut events = setup.server.take_events();
    let depleted: Vec<_> = events.read::<HealthDepletedEvent>().collect();
    assert_eq!(depleted, vec![(door, 0)]);
    events.clear();

    exchange(&mut setup.server, &mut [&mut ann]);
    let mut client_events = ann.replica_mut().take_events();
    assert!(client_events.has::<HealthDepletedEvent>());
    client_events.clear();
}

#[tokio::test]
async fn disconnected_peer_packets_are_dropped() {
    init_logging();
    let mut setup = start_server(config());
    let mut ann = connect_client(&mut setup, "ann", "pw").await.unwrap();
    let bob = connect_client(&mut setup, "bob", "pw").await.unwrap();
    let bob_player = bob.replica().player_entity_id().unwrap();

    let update = TransformUpdate {
        entity_id: bob_player,
        position: Vec3::new(1.0, 1.0, 1.0),
        rotation: Vec3::ZERO,
    };
    setup.hub.inject(bob.peer_id(), &encode_message(&update));
    setup.hub.disconnect(bob.peer_id());
    let outcomes = exchange(&mut setup.server, &mut [&mut ann]);

    assert_eq!(
        outcomes,
        vec![(
            bob.peer_id(),
            MessageOutcome::Dropped(DropReason::UnknownPeer(bob.peer_id()))
        )]
    );
    assert!(!setup.server.world().is_active(bob.peer_id()));
    // the body stays behind
    assert!(setup.server.world().record(bob_player).is_some());
}
