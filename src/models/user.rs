use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Username -> stored password (users.json)
///
/// Values are Argon2 PHC strings. Entries written by older deployments may
/// still hold the plaintext password until that user next logs in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserTable(IndexMap<String, String>);

impl UserTable {
    pub fn contains(&self, username: &str) -> bool {
        self.0.contains_key(username)
    }

    pub fn password(&self, username: &str) -> Option<&str> {
        self.0.get(username).map(String::as_str)
    }

    /// Insert or replace a user's stored password
    pub fn set_password(&mut self, username: &str, stored: String) {
        self.0.insert(username.to_string(), stored);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Username and password as they arrive in register/login bodies
#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl Credentials {
    /// Both fields, if both are present and non-empty
    pub fn validate(self) -> Option<(String, String)> {
        match (self.username, self.password) {
            (Some(username), Some(password)) if !username.is_empty() && !password.is_empty() => {
                Some((username, password))
            }
            _ => None,
        }
    }
}
