use sectornet_server::ServerConfig;
use sectornet_shared::{
    encode, encode_message, Component, ComponentKind, ComponentOverwriteUpdate, HealthComponent,
    MessageOutcome, Owners, Rejection, StorageAction, ToggleComponent, TransformUpdate, Vec3,
};
use sectornet_test::{connect_client, door, exchange, food_stack, init_logging, item_pickup, start_server};

#[tokio::test]
async fn foreign_peers_cannot_touch_owned_entities() {
    init_logging();
    let mut setup = start_server(ServerConfig::default());
    let mut ann = connect_client(&mut setup, "ann", "pw").await.unwrap();
    let mut bob = connect_client(&mut setup, "bob", "pw").await.unwrap();

    let home = setup.server.world().data().home_sector().unwrap();
    let ann_player = ann.replica().player_entity_id().unwrap();
    let ann_door = setup
        .server
        .spawn_entity(home, door(Owners::only(ann.peer_id())))
        .unwrap();
    let pickup = setup
        .server
        .spawn_entity(home, item_pickup(Vec3::ZERO, vec![food_stack("apple", 5)]))
        .unwrap();
    assert_eq!(setup.server.collect_pickup(ann_player, pickup), Ok(5));
    exchange(&mut setup.server, &mut [&mut ann, &mut bob]);

    let player_before = setup.server.world().record(ann_player).cloned().unwrap();
    let door_before = setup.server.world().record(ann_door).cloned().unwrap();
    let storage_index = player_before.storage_index().unwrap();
    let toggle_index = door_before
        .components()
        .find(ComponentKind::Toggle)
        .map(|(index, _)| index)
        .unwrap();

    let forged_transform = TransformUpdate {
        entity_id: ann_player,
        position: Vec3::new(3.0, 0.0, 3.0),
        rotation: Vec3::ZERO,
    };
    let forged_move = StorageAction {
        source_entity: ann_player,
        dest_entity: ann_player,
        source_slot: 0,
        dest_slot: 1,
        count: 2,
        source_component: storage_index,
        dest_component: storage_index,
    };
    let forged_toggle = ComponentOverwriteUpdate {
        entity_id: ann_door,
        component_index: toggle_index,
        payload: encode(&Component::Toggle(ToggleComponent::new(true))),
    };

    setup.hub.clear_sent();
    setup.hub.inject(bob.peer_id(), &encode_message(&forged_transform));
    setup.hub.inject(bob.peer_id(), &encode_message(&forged_move));
    setup.hub.inject(bob.peer_id(), &encode_message(&forged_toggle));
    let outcomes = exchange(&mut setup.server, &mut [&mut ann, &mut bob]);

    let not_owner = |entity_id| {
        (
            bob.peer_id(),
            MessageOutcome::Rejected(Rejection::NotOwner {
                peer: bob.peer_id(),
                entity_id,
            }),
        )
    };
    assert_eq!(
        outcomes,
        vec![not_owner(ann_player), not_owner(ann_player), not_owner(ann_door)]
    );
    assert_eq!(setup.server.world().record(ann_player), Some(&player_before));
    assert_eq!(setup.server.world().record(ann_door), Some(&door_before));
    assert!(setup.hub.sent().is_empty());
}

#[tokio::test]
async fn server_owned_entities_refuse_every_client() {
    init_logging();
    let mut setup = start_server(ServerConfig::default());
    let home = setup.server.world().data().home_sector().unwrap();
    let gate = setup.server.spawn_entity(home, door(Owners::none())).unwrap();
    let mut ann = connect_client(&mut setup, "ann", "pw").await.unwrap();

    let forged = TransformUpdate {
        entity_id: gate,
        position: Vec3::new(0.0, 5.0, 0.0),
        rotation: Vec3::ZERO,
    };
    setup.hub.inject(ann.peer_id(), &encode_message(&forged));
    let outcomes = exchange(&mut setup.server, &mut [&mut ann]);

    assert!(matches!(
        outcomes.as_slice(),
        [(_, MessageOutcome::Rejected(Rejection::NotOwner { .. }))]
    ));
    assert_eq!(
        setup.server.world().record(gate).map(|record| record.position),
        Some(Vec3::ZERO)
    );
}

#[tokio::test]
async fn owner_may_not_write_server_driven_components() {
    init_logging();
    let mut setup = start_server(ServerConfig::default());
    let mut ann = connect_client(&mut setup, "ann", "pw").await.unwrap();
    let home = setup.server.world().data().home_sector().unwrap();
    let ann_door = setup
        .server
        .spawn_entity(home, door(Owners::only(ann.peer_id())))
        .unwrap();
    let before = setup.server.world().record(ann_door).cloned();
    let health_index = before
        .as_ref()
        .and_then(|record| record.components().find(ComponentKind::Health))
        .map(|(index, _)| index)
        .unwrap();

    let forged = ComponentOverwriteUpdate {
        entity_id: ann_door,
        component_index: health_index,
        payload: encode(&Component::Health(HealthComponent::new(1000))),
    };
    setup.hub.inject(ann.peer_id(), &encode_message(&forged));
    let outcomes = exchange(&mut setup.server, &mut [&mut ann]);

    assert_eq!(
        outcomes,
        vec![(
            ann.peer_id(),
            MessageOutcome::Rejected(Rejection::ReadOnlyComponent {
                kind: ComponentKind::Health
            })
        )]
    );
    assert_eq!(setup.server.world().record(ann_door).cloned(), before);
}
