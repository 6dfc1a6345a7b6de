use sectornet_server::ServerConfig;
use sectornet_shared::{
    encode_message, DestroyEntity, DropReason, EntityId, MessageKind, MessageOutcome, Rejection,
    SectorId, SectorParameters, UsePortal, Vec3,
};
use sectornet_test::{
    connect_client, exchange, init_logging, link_portals, portal_gate, start_server, TestSetup,
};

const CAVE: SectorParameters = SectorParameters {
    has_terrain: true,
    noise_scale: 0.5,
    noise_offset: Vec3::new(1.0, 2.0, 3.0),
};

/// Gate `a` in the home sector leads to gate `b` in a new cave sector and back
fn linked_gates(setup: &mut TestSetup) -> (EntityId, EntityId, SectorId) {
    let home = setup.server.world().data().home_sector().unwrap();
    let cave = setup.server.add_sector("cave", CAVE);
    let a = setup.server.spawn_entity(home, portal_gate(Vec3::ZERO)).unwrap();
    let b = setup
        .server
        .spawn_entity(cave, portal_gate(Vec3::new(10.0, 0.0, 0.0)))
        .unwrap();

    let world = setup.server.world_mut();
    link_portals(world.entity_mut(a).unwrap(), b, Vec3::new(0.0, 0.0, -2.0));
    link_portals(world.entity_mut(b).unwrap(), a, Vec3::new(0.0, 0.0, 2.0));
    (a, b, cave)
}

#[tokio::test]
async fn portal_moves_player_into_the_linked_sector() {
    init_logging();
    let mut setup = start_server(ServerConfig::default());
    let (a, b, cave) = linked_gates(&mut setup);
    let mut ann = connect_client(&mut setup, "ann", "pw").await.unwrap();
    let mut bob = connect_client(&mut setup, "bob", "pw").await.unwrap();
    exchange(&mut setup.server, &mut [&mut ann, &mut bob]);
    let ann_player = ann.replica().player_entity_id().unwrap();
    assert!(bob.replica().record(ann_player).is_some());

    ann.replica_mut().use_portal(a, 0).unwrap();
    setup.hub.clear_sent();
    let outcomes = exchange(&mut setup.server, &mut [&mut ann, &mut bob]);
    assert_eq!(outcomes, vec![(ann.peer_id(), MessageOutcome::Applied)]);

    assert_eq!(setup.server.world().active_sector(ann.peer_id()), Some(cave));
    let record = setup.server.world().record(ann_player).unwrap();
    assert_eq!(record.position, Vec3::new(10.0, 0.0, 2.0));
    assert_eq!(record.sector(), Some(cave));
    assert_eq!(
        setup.server.world().data().player(ann.peer_id()).map(|player| player.sector_id),
        Some(cave)
    );

    // the old sector sees the player leave
    assert!(setup
        .hub
        .sent_to(bob.peer_id())
        .iter()
        .any(|packet| packet.kind == Some(MessageKind::DestroyEntity)));
    assert!(bob.replica().record(ann_player).is_none());

    // and the client has swapped scenes
    assert_eq!(*ann.replica().parameters(), CAVE);
    assert!(ann.replica().record(b).is_some());
    assert!(ann.replica().record(a).is_none());
    assert_eq!(
        ann.replica().record(ann_player).map(|record| record.position),
        Some(Vec3::new(10.0, 0.0, 2.0))
    );
}

#[tokio::test]
async fn unknown_portal_node_is_refused() {
    init_logging();
    let mut setup = start_server(ServerConfig::default());
    let (a, _, _) = linked_gates(&mut setup);
    let home = setup.server.world().data().home_sector().unwrap();
    let mut ann = connect_client(&mut setup, "ann", "pw").await.unwrap();

    ann.replica_mut().use_portal(a, 3).unwrap();
    let outcomes = exchange(&mut setup.server, &mut [&mut ann]);

    assert_eq!(
        outcomes,
        vec![(
            ann.peer_id(),
            MessageOutcome::Rejected(Rejection::InvalidPortal {
                entity_id: a,
                portal_id: 3,
            })
        )]
    );
    assert_eq!(setup.server.world().active_sector(ann.peer_id()), Some(home));
}

#[tokio::test]
async fn portal_in_another_sector_is_stale() {
    init_logging();
    let mut setup = start_server(ServerConfig::default());
    let (_, b, _) = linked_gates(&mut setup);
    let mut ann = connect_client(&mut setup, "ann", "pw").await.unwrap();

    // the replica only knows the home sector
    assert!(ann.replica_mut().use_portal(b, 0).is_err());
    setup.hub.inject(
        ann.peer_id(),
        &encode_message(&UsePortal {
            entity_id: b,
            portal_id: 0,
        }),
    );
    let outcomes = exchange(&mut setup.server, &mut [&mut ann]);
    assert_eq!(
        outcomes,
        vec![(ann.peer_id(), MessageOutcome::Dropped(DropReason::StaleEntity(b)))]
    );
}

#[tokio::test]
async fn failed_transfer_keeps_the_peer_connected() {
    init_logging();
    let mut setup = start_server(ServerConfig::default());
    let (a, _, cave) = linked_gates(&mut setup);
    let home = setup.server.world().data().home_sector().unwrap();
    let mut ann = connect_client(&mut setup, "ann", "pw").await.unwrap();
    let peer = ann.peer_id();
    let ann_player = ann.replica().player_entity_id().unwrap();

    // with its player gone there is nothing to send through
    setup
        .hub
        .inject(peer, &encode_message(&DestroyEntity { entity_id: ann_player }));
    assert_eq!(
        exchange(&mut setup.server, &mut [&mut ann]),
        vec![(peer, MessageOutcome::Applied)]
    );

    let use_gate = encode_message(&UsePortal {
        entity_id: a,
        portal_id: 0,
    });
    let refused = MessageOutcome::Rejected(Rejection::InvalidPortal {
        entity_id: a,
        portal_id: 0,
    });
    for _ in 0..2 {
        setup.hub.inject(peer, &use_gate);
        assert_eq!(
            exchange(&mut setup.server, &mut [&mut ann]),
            vec![(peer, refused.clone())]
        );
        assert!(setup.server.world().is_active(peer));
        assert_eq!(setup.server.world().active_sector(peer), Some(home));
        assert!(setup.server.world().sector(home).unwrap().has_peer(peer));
        assert!(!setup.server.world().sector(cave).unwrap().has_peer(peer));
    }
}
