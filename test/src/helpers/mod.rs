pub mod harness;
pub mod mock_scene;
pub mod records;

pub use harness::{connect_client, exchange, init_logging, start_server, test_protocol, TestSetup};
pub use mock_scene::{MockScene, SceneLog};
pub use records::{door, food, food_stack, item_pickup, link_portals, portal_gate, storage};
