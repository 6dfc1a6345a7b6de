use sectornet_serde::{ByteReader, ByteWrite, Serde, SerdeErr};

/// Credentials sent during the connect handshake, ahead of any tagged message
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoginPacket {
    pub username: String,
    pub password: String,
}

impl LoginPacket {
    pub fn new(username: &str, password: &str) -> Self {
        Self {
            username: username.to_string(),
            password: password.to_string(),
        }
    }
}

impl Serde for LoginPacket {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        self.username.ser(writer);
        self.password.ser(writer);
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        Ok(Self {
            username: String::de(reader)?,
            password: String::de(reader)?,
        })
    }
}

/// The server's answer to a [`LoginPacket`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoginResponse {
    Accepted { peer_id: u64 },
    Rejected { reason: String },
}

impl Serde for LoginResponse {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        match self {
            LoginResponse::Accepted { peer_id } => {
                0u8.ser(writer);
                peer_id.ser(writer);
            }
            LoginResponse::Rejected { reason } => {
                1u8.ser(writer);
                reason.ser(writer);
            }
        }
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        match u8::de(reader)? {
            0 => Ok(LoginResponse::Accepted {
                peer_id: u64::de(reader)?,
            }),
            1 => Ok(LoginResponse::Rejected {
                reason: String::de(reader)?,
            }),
            tag => Err(SerdeErr::InvalidTag {
                type_name: "LoginResponse",
                tag: u16::from(tag),
            }),
        }
    }
}
