use std::{default::Default, path::PathBuf};

use sectornet_shared::{Vec3, PLAYER_INVENTORY_SLOTS};

/// Contains Config properties which will be used by the Server
#[derive(Clone)]
pub struct ServerConfig {
    /// Determines whether returning players must present the password they
    /// first logged in with
    pub require_auth: bool,
    /// Directory holding `world.dat` and the `sectors/` folder. `None` keeps
    /// the world in memory only.
    pub save_directory: Option<PathBuf>,
    /// Name of the sector new players spawn in, created on first start
    pub home_sector_name: String,
    /// Number of inventory slots given to new players
    pub player_inventory_slots: u16,
    /// Where new players appear in the home sector
    pub spawn_position: Vec3,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            require_auth: true,
            save_directory: None,
            home_sector_name: "home".to_string(),
            player_inventory_slots: PLAYER_INVENTORY_SLOTS,
            spawn_position: Vec3::ZERO,
        }
    }
}
