use serde::Serialize;

use crate::error::Result;
use crate::models::{RoomMap, RoutingConfig, TokenIndex, UserTable};

/// Routing file read by the media relay
pub const ROUTING_FILE: &str = "mediamtx.yml";

/// Camera access tokens: token -> camera
pub const TOKENS_FILE: &str = "tokens.json";

/// Room membership: "building/room" -> [camera]
pub const ROOMS_FILE: &str = "rooms.json";

/// Accounts: username -> password hash
pub const USERS_FILE: &str = "users.json";

/// A collection persisted as one whole file in the config directory
pub trait StoredFile: Sized {
    const FILE_NAME: &'static str;

    /// Contents assumed when the file does not exist yet
    fn empty() -> Self;

    fn decode(bytes: &[u8]) -> Result<Self>;

    fn encode(&self) -> Result<Vec<u8>>;
}

/// Pretty JSON with 4-space indentation
fn encode_json<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
    value.serialize(&mut serializer)?;
    out.push(b'\n');
    Ok(out)
}

fn is_blank(bytes: &[u8]) -> bool {
    bytes.iter().all(u8::is_ascii_whitespace)
}

macro_rules! json_file {
    ($ty:ty, $name:expr) => {
        impl StoredFile for $ty {
            const FILE_NAME: &'static str = $name;

            fn empty() -> Self {
                Self::default()
            }

            fn decode(bytes: &[u8]) -> Result<Self> {
                if is_blank(bytes) {
                    return Ok(Self::empty());
                }
                Ok(serde_json::from_slice(bytes)?)
            }

            fn encode(&self) -> Result<Vec<u8>> {
                encode_json(self)
            }
        }
    };
}

json_file!(UserTable, USERS_FILE);
json_file!(TokenIndex, TOKENS_FILE);
json_file!(RoomMap, ROOMS_FILE);

impl StoredFile for RoutingConfig {
    const FILE_NAME: &'static str = ROUTING_FILE;

    fn empty() -> Self {
        Self::default()
    }

    fn decode(bytes: &[u8]) -> Result<Self> {
        if is_blank(bytes) {
            return Ok(Self::empty());
        }
        Ok(serde_yaml::from_slice(bytes)?)
    }

    fn encode(&self) -> Result<Vec<u8>> {
        Ok(serde_yaml::to_string(self)?.into_bytes())
    }
}
