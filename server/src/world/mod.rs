mod server_world;
mod world_data;

pub use server_world::ServerWorld;
pub use world_data::{PlayerData, SectorMetadata, WorldData};
