use std::collections::HashMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Camera access tokens (tokens.json)
///
/// Persisted as a flat `token -> camera` object. A reverse `camera -> token`
/// index is rebuilt on load and kept in step with every mutation. When a
/// file holds several tokens for one camera, the first one wins.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(
    from = "IndexMap<String, String>",
    into = "IndexMap<String, String>"
)]
pub struct TokenIndex {
    by_token: IndexMap<String, String>,
    by_camera: HashMap<String, String>,
}

impl From<IndexMap<String, String>> for TokenIndex {
    fn from(by_token: IndexMap<String, String>) -> Self {
        let mut by_camera = HashMap::with_capacity(by_token.len());
        for (token, camera) in &by_token {
            by_camera
                .entry(camera.clone())
                .or_insert_with(|| token.clone());
        }
        Self {
            by_token,
            by_camera,
        }
    }
}

impl From<TokenIndex> for IndexMap<String, String> {
    fn from(index: TokenIndex) -> Self {
        index.by_token
    }
}

impl TokenIndex {
    pub fn len(&self) -> usize {
        self.by_token.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_token.is_empty()
    }

    pub fn token_for(&self, camera: &str) -> Option<&str> {
        self.by_camera.get(camera).map(String::as_str)
    }

    pub fn camera_for(&self, token: &str) -> Option<&str> {
        self.by_token.get(token).map(String::as_str)
    }

    /// Existing token for `camera`, or a fresh one from `generate`
    ///
    /// The flag is true when a token was created.
    pub fn get_or_insert_with<F>(&mut self, camera: &str, generate: F) -> (String, bool)
    where
        F: FnOnce() -> String,
    {
        if let Some(token) = self.by_camera.get(camera) {
            return (token.clone(), false);
        }

        let token = generate();
        self.by_token.insert(token.clone(), camera.to_string());
        self.by_camera.insert(camera.to_string(), token.clone());
        (token, true)
    }

    /// Drop every token bound to `camera`, returning how many were removed
    pub fn remove_camera(&mut self, camera: &str) -> usize {
        let before = self.by_token.len();
        self.by_token.retain(|_, bound| bound != camera);
        self.by_camera.remove(camera);
        before - self.by_token.len()
    }

    /// Repoint every token bound to `old` at `new`, returning how many moved
    pub fn rename_camera(&mut self, old: &str, new: &str) -> usize {
        let mut moved = 0;
        for bound in self.by_token.values_mut() {
            if bound == old {
                *bound = new.to_string();
                moved += 1;
            }
        }

        if let Some(token) = self.by_camera.remove(old) {
            self.by_camera.entry(new.to_string()).or_insert(token);
        }
        moved
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index_from(pairs: &[(&str, &str)]) -> TokenIndex {
        pairs
            .iter()
            .map(|(t, c)| (t.to_string(), c.to_string()))
            .collect::<IndexMap<_, _>>()
            .into()
    }

    #[test]
    fn test_get_or_insert_reuses_existing_token() {
        let mut index = TokenIndex::default();

        let (first, created) = index.get_or_insert_with("gate", || "aaaa".to_string());
        assert!(created);
        assert_eq!(first, "aaaa");

        let (second, created) = index.get_or_insert_with("gate", || "bbbb".to_string());
        assert!(!created);
        assert_eq!(second, "aaaa");
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_first_token_wins_on_load() {
        let index = index_from(&[("t1", "gate"), ("t2", "gate"), ("t3", "lobby")]);
        assert_eq!(index.token_for("gate"), Some("t1"));
        assert_eq!(index.token_for("lobby"), Some("t3"));
    }

    #[test]
    fn test_remove_camera_strips_all_tokens() {
        let mut index = index_from(&[("t1", "gate"), ("t2", "gate"), ("t3", "lobby")]);
        assert_eq!(index.remove_camera("gate"), 2);
        assert_eq!(index.token_for("gate"), None);
        assert_eq!(index.camera_for("t3"), Some("lobby"));
        assert_eq!(index.remove_camera("gate"), 0);
    }

    #[test]
    fn test_rename_camera_repoints_tokens() {
        let mut index = index_from(&[("t1", "gate"), ("t2", "lobby")]);
        assert_eq!(index.rename_camera("gate", "front-gate"), 1);
        assert_eq!(index.token_for("gate"), None);
        assert_eq!(index.token_for("front-gate"), Some("t1"));
        assert_eq!(index.camera_for("t1"), Some("front-gate"));
    }

    #[test]
    fn test_serializes_as_flat_object() {
        let index = index_from(&[("t1", "gate")]);
        let json = serde_json::to_value(&index).unwrap();
        assert_eq!(json, serde_json::json!({ "t1": "gate" }));

        let back: TokenIndex = serde_json::from_value(json).unwrap();
        assert_eq!(back.token_for("gate"), Some("t1"));
    }
}
