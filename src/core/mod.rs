// Core pipeline exports
pub mod locator;
pub mod map;
pub mod pipeline;

pub use locator::FriendLocator;
pub use map::{MapDocument, MapRenderer, MapView, Marker, DEFAULT_VIEW, FRIENDS_LAYER};
pub use pipeline::{generate_map, MapError, Pipeline};
