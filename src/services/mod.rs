// Service exports
pub mod geocoder;
pub mod oauth;
pub mod twitter;

pub use geocoder::{locate, GeocodeError, Geocoder, NominatimClient};
pub use twitter::{FriendsPage, SocialGraph, TwitterClient, TwitterError};
