use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::constants::ROOM_KEY_SEPARATOR;
use crate::error::{AppError, Result};
use crate::models::RoutingConfig;

/// Build the "building/room" key
pub fn room_key(building: &str, room: &str) -> String {
    format!("{building}{ROOM_KEY_SEPARATOR}{room}")
}

/// Split a room key on its first separator; keys without one are not rooms
pub fn split_room_key(key: &str) -> Option<(&str, &str)> {
    key.split_once(ROOM_KEY_SEPARATOR)
}

/// Room key -> ordered camera names (rooms.json)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomMap(IndexMap<String, Vec<String>>);

/// Camera as shown in building and room listings
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CameraView {
    pub name: String,
    pub url: String,
}

/// room -> cameras
pub type RoomListing = IndexMap<String, Vec<CameraView>>;

/// building -> room -> cameras
pub type BuildingTree = IndexMap<String, RoomListing>;

impl RoomMap {
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn cameras(&self, key: &str) -> Option<&[String]> {
        self.0.get(key).map(Vec::as_slice)
    }

    /// Append a camera to a room, creating the room if needed
    ///
    /// Returns false if the camera was already listed there.
    pub fn add_camera(&mut self, key: &str, camera: &str) -> bool {
        let cameras = self.0.entry(key.to_string()).or_default();
        if cameras.iter().any(|c| c == camera) {
            return false;
        }
        cameras.push(camera.to_string());
        true
    }

    /// Remove a camera from every room, returning how many rooms changed
    ///
    /// Rooms left empty are kept.
    pub fn remove_camera(&mut self, camera: &str) -> usize {
        let mut touched = 0;
        for cameras in self.0.values_mut() {
            let before = cameras.len();
            cameras.retain(|c| c != camera);
            if cameras.len() != before {
                touched += 1;
            }
        }
        touched
    }

    /// Replace a camera name in every room at its current position
    pub fn rename_camera(&mut self, old: &str, new: &str) -> usize {
        let mut touched = 0;
        for cameras in self.0.values_mut() {
            let Some(pos) = cameras.iter().position(|c| c == old) else {
                continue;
            };
            if cameras.iter().any(|c| c == new) {
                cameras.remove(pos);
            } else {
                cameras[pos] = new.to_string();
            }
            touched += 1;
        }
        touched
    }

    /// Move a room's camera list to a new key, keeping its position
    pub fn rename_room(&mut self, old: &str, new: &str) -> Result<()> {
        if old == new {
            return if self.0.contains_key(old) {
                Ok(())
            } else {
                Err(AppError::OldRoomNotFound)
            };
        }
        if self.0.contains_key(new) {
            return Err(AppError::RoomAlreadyExists(new.to_string()));
        }

        let (index, _, cameras) = self
            .0
            .shift_remove_full(old)
            .ok_or(AppError::OldRoomNotFound)?;
        self.0.shift_insert(index, new.to_string(), cameras);
        Ok(())
    }

    /// Every well-formed room grouped by building
    pub fn building_tree(&self, routing: &RoutingConfig) -> BuildingTree {
        let mut tree = BuildingTree::new();
        for (key, cameras) in &self.0 {
            let Some((building, room)) = split_room_key(key) else {
                continue;
            };
            tree.entry(building.to_string())
                .or_default()
                .insert(room.to_string(), camera_views(cameras, routing));
        }
        tree
    }

    /// Rooms of one building, or None if it has none
    pub fn building_rooms(&self, building: &str, routing: &RoutingConfig) -> Option<RoomListing> {
        let rooms: RoomListing = self
            .0
            .iter()
            .filter_map(|(key, cameras)| match split_room_key(key) {
                Some((b, room)) if b == building => {
                    Some((room.to_string(), camera_views(cameras, routing)))
                }
                _ => None,
            })
            .collect();

        (!rooms.is_empty()).then_some(rooms)
    }

    pub fn as_map(&self) -> &IndexMap<String, Vec<String>> {
        &self.0
    }
}

/// Attach each camera's current source URL
pub fn camera_views(cameras: &[String], routing: &RoutingConfig) -> Vec<CameraView> {
    cameras
        .iter()
        .map(|name| CameraView {
            name: name.clone(),
            url: routing.source_url(name).to_string(),
        })
        .collect()
}
