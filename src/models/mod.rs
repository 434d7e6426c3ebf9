pub mod camera;
pub mod room;
pub mod token;
pub mod user;

pub use camera::{PathEntry, RoutingConfig};
pub use room::{room_key, split_room_key, BuildingTree, CameraView, RoomListing, RoomMap};
pub use token::TokenIndex;
pub use user::{Credentials, UserTable};
