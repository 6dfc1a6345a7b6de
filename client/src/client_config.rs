use std::{default::Default, time::Duration};

/// Contains Config properties which will be used by a Client
#[derive(Clone)]
pub struct ClientConfig {
    /// How long the login handshake may take before the connection attempt is abandoned
    pub connect_timeout: Duration,
    /// Name presented to the server at login
    pub username: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(5),
            username: String::new(),
        }
    }
}
