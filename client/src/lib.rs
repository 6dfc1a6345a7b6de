//! # Sectornet Client
//! Keeps a replica of the sector the server placed this client in, applies
//! the server's updates to it, and sends changes to owned entities upstream.

#![deny(
    trivial_casts,
    trivial_numeric_casts,
    unstable_features,
    unused_import_braces
)]

mod client;
mod client_config;
mod error;
mod handlers;
mod replica;
mod transport;

pub use client::Client;
pub use client_config::ClientConfig;
pub use error::SectornetClientError;
pub use replica::ClientReplica;
pub use transport::Connector;
