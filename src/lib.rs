//! Friend Map - plots where a Twitter user's friends say they live
//!
//! Fetches an account's friends, geocodes their free-text locations with
//! Nominatim and renders the result as a Leaflet map.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{generate_map, FriendLocator, MapDocument, MapError, MapRenderer, Pipeline};
pub use models::{Account, Coordinates, Credentials, FriendSample, LocatedPoint};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        let map = MapRenderer::default().build(None, &[LocatedPoint::new("a", 1.0, 2.0)]);
        assert_eq!(map.markers.len(), 1);
        assert_eq!(FriendLocator::default().max_sample(), 8);
    }
}
