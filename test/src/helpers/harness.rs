use std::time::Duration;

use sectornet_client::{Client, ClientConfig, SectornetClientError};
use sectornet_server::{Server, ServerConfig};
use sectornet_shared::{MessageOutcome, PeerId, Protocol};

use crate::{helpers::MockScene, local_socket::LocalHub};

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn test_protocol() -> Protocol {
    Protocol::builder()
        .tick_interval(Duration::from_millis(10))
        .build()
}

/// A running server on a fresh hub
pub struct TestSetup {
    pub server: Server,
    pub hub: LocalHub,
    pub scene: MockScene,
}

pub fn start_server(config: ServerConfig) -> TestSetup {
    let mut hub = LocalHub::new();
    let scene = MockScene::new();
    let server = Server::start(config, test_protocol(), &mut hub, Box::new(scene.clone()))
        .expect("server should start");
    TestSetup { server, hub, scene }
}

/// Logs a client in, ticking the server until the handshake is answered
pub async fn connect_client(
    setup: &mut TestSetup,
    username: &str,
    password: &str,
) -> Result<Client, SectornetClientError> {
    let config = ClientConfig {
        connect_timeout: Duration::from_secs(1),
        username: username.to_string(),
    };
    let mut connector = setup.hub.connector();
    let connecting = Client::connect(
        config,
        test_protocol(),
        &mut connector,
        password,
        Box::new(MockScene::new()),
    );

    let hub = setup.hub.clone();
    let server = &mut setup.server;
    let serving = async move {
        for _ in 0..100 {
            tokio::task::yield_now().await;
            server.tick();
            if hub.handshakes_in_flight() == 0 {
                break;
            }
        }
    };

    let (client, ()) = tokio::join!(connecting, serving);
    let mut client = client?;
    client.tick();
    Ok(client)
}

/// One server tick followed by one tick of each client. Returns the server's outcomes.
pub fn exchange(server: &mut Server, clients: &mut [&mut Client]) -> Vec<(PeerId, MessageOutcome)> {
    let outcomes = server.tick();
    for client in clients.iter_mut() {
        client.tick();
    }
    outcomes
}
