use std::{env, fs, path::PathBuf, process};

use sectornet_client::SectornetClientError;
use sectornet_server::{SectornetServerError, ServerConfig};
use sectornet_shared::{ComponentKind, Owners, SectorParameters, Vec3};
use sectornet_test::{
    connect_client, door, exchange, food_stack, init_logging, item_pickup, start_server,
};

fn save_directory(name: &str) -> PathBuf {
    let directory = env::temp_dir().join(format!("sectornet-{}-{}", name, process::id()));
    let _ = fs::remove_dir_all(&directory);
    directory
}

fn saving_config(directory: &PathBuf) -> ServerConfig {
    ServerConfig {
        save_directory: Some(directory.clone()),
        ..ServerConfig::default()
    }
}

#[tokio::test]
async fn returning_player_gets_their_things_back() {
    init_logging();
    let directory = save_directory("returning");
    let position = Vec3::new(3.0, 0.0, 4.0);

    {
        let mut setup = start_server(saving_config(&directory));
        let mut ann = connect_client(&mut setup, "ann", "secret").await.unwrap();
        let player = ann.replica().player_entity_id().unwrap();
        let home = setup.server.world().data().home_sector().unwrap();
        let pickup = setup
            .server
            .spawn_entity(home, item_pickup(Vec3::ZERO, vec![food_stack("pear", 6)]))
            .unwrap();
        assert_eq!(setup.server.collect_pickup(player, pickup), Ok(6));
        ann.replica_mut()
            .update_transform(player, position, Vec3::ZERO)
            .unwrap();
        exchange(&mut setup.server, &mut [&mut ann]);

        setup.hub.disconnect(ann.peer_id());
        setup.server.tick();
        setup.server.save_world().unwrap();
    }
    assert!(directory.join("world.dat").exists());
    assert!(directory.join("sectors").join("0.dat").exists());

    let mut setup = start_server(saving_config(&directory));
    match connect_client(&mut setup, "ann", "wrong").await {
        Err(SectornetClientError::Rejected { reason }) => assert_eq!(reason, "Incorrect password"),
        Err(other) => panic!("unexpected error {}", other),
        Ok(_) => panic!("wrong password was accepted"),
    }

    let ann = connect_client(&mut setup, "ann", "secret").await.unwrap();
    let player = ann.replica().player_entity_id().unwrap();
    let record = ann.replica().record(player).unwrap();
    assert_eq!(record.position, position);
    let storage = record.storage(record.storage_index().unwrap()).unwrap();
    assert_eq!(storage.total_count(), 6);
    assert_eq!(setup.server.world().data().player(ann.peer_id()).map(|p| p.entity_id), Some(player));

    let _ = fs::remove_dir_all(&directory);
}

#[tokio::test]
async fn occupied_sector_stays_loaded() {
    init_logging();
    let directory = save_directory("occupied");
    let mut setup = start_server(saving_config(&directory));
    let _ann = connect_client(&mut setup, "ann", "pw").await.unwrap();
    let home = setup.server.world().data().home_sector().unwrap();

    assert!(matches!(
        setup.server.world_mut().unload_sector(home),
        Err(SectornetServerError::SectorOccupied { peers: 1, .. })
    ));
    assert!(setup.server.world().sector(home).is_some());

    let _ = fs::remove_dir_all(&directory);
}

#[test]
fn empty_sector_unloads_and_reloads() {
    init_logging();
    let directory = save_directory("unload");
    let mut setup = start_server(saving_config(&directory));
    let cave = setup.server.add_sector("cave", SectorParameters::default());
    let gate = setup.server.spawn_entity(cave, door(Owners::none())).unwrap();
    assert_eq!(setup.server.toggle(gate), Ok(true));
    let live_before = setup.scene.live_count();

    setup.server.world_mut().unload_sector(cave).unwrap();
    assert!(setup.server.world().sector(cave).is_none());
    assert!(setup.server.world().record(gate).is_none());
    assert_eq!(setup.scene.live_count(), live_before - 1);

    setup.server.world_mut().load_sector(cave).unwrap();
    let record = setup.server.world().record(gate).unwrap();
    let (_, toggle) = record.components().find(ComponentKind::Toggle).unwrap();
    assert_eq!(toggle.as_toggle().map(|toggle| toggle.state), Some(true));
    assert_eq!(setup.scene.live_count(), live_before);

    let _ = fs::remove_dir_all(&directory);
}

#[test]
fn memory_only_world_writes_nothing() {
    init_logging();
    let mut setup = start_server(ServerConfig::default());
    let cave = setup.server.add_sector("cave", SectorParameters::default());

    setup.server.save_world().unwrap();
    setup.server.world_mut().unload_sector(cave).unwrap();
    // nothing was saved, so the sector comes back empty
    setup.server.world_mut().load_sector(cave).unwrap();
    assert_eq!(setup.server.world().sector(cave).map(|sector| sector.len()), Some(0));
}
