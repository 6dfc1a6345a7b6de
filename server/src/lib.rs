//! # Sectornet Server
//! An authoritative server that keeps entities in sectors, accepts client
//! mutations only from the peers that own the entity, and echoes every
//! accepted change to the other peers in the sector.

#![deny(
    trivial_casts,
    trivial_numeric_casts,
    unstable_features,
    unused_import_braces
)]

mod error;
mod handlers;
mod io;
mod login;
mod sector;
mod server;
mod server_config;
mod transport;
mod world;

pub use error::{EntityActionError, SectornetServerError};
pub use io::Io;
pub use login::LoginRejection;
pub use sector::{Sector, SectorSnapshot};
pub use server::Server;
pub use server_config::ServerConfig;
pub use transport::{ConnectionIo, ConnectionToken, ListenSockets, ServerTransport};
pub use world::{PlayerData, SectorMetadata, ServerWorld, WorldData};
