use ring::digest;
use thiserror::Error;

use sectornet_shared::LoginResponse;

use crate::SectornetServerError;

/// Why a login attempt was refused. The display string is what the client is told.
#[derive(Debug, Error)]
pub enum LoginRejection {
    #[error("Username must not be empty")]
    EmptyUsername,

    #[error("User {0} is already logged in")]
    AlreadyConnected(String),

    #[error("Incorrect password")]
    WrongPassword,

    #[error("World is unavailable: {0}")]
    World(#[from] SectornetServerError),
}

impl LoginRejection {
    pub fn to_response(&self) -> LoginResponse {
        LoginResponse::Rejected {
            reason: self.to_string(),
        }
    }
}

/// SHA-256 of the password, salted with the username
pub(crate) fn password_digest(username: &str, password: &str) -> Vec<u8> {
    let mut context = digest::Context::new(&digest::SHA256);
    context.update(username.as_bytes());
    context.update(b":");
    context.update(password.as_bytes());
    context.finish().as_ref().to_vec()
}
