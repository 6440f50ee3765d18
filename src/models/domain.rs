use geo::Point;
use serde::{Deserialize, Serialize};
use std::fmt;

/// OAuth 1.0a credentials for the Twitter API
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct Credentials {
    pub consumer_key: String,
    pub consumer_secret: String,
    pub access_token: String,
    pub access_token_secret: String,
}

impl Credentials {
    pub fn new(
        consumer_key: impl Into<String>,
        consumer_secret: impl Into<String>,
        access_token: impl Into<String>,
        access_token_secret: impl Into<String>,
    ) -> Self {
        Self {
            consumer_key: consumer_key.into(),
            consumer_secret: consumer_secret.into(),
            access_token: access_token.into(),
            access_token_secret: access_token_secret.into(),
        }
    }
}

// Secrets stay out of logs.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("consumer_key", &self.consumer_key)
            .field("consumer_secret", &"<redacted>")
            .field("access_token", &self.access_token)
            .field("access_token_secret", &"<redacted>")
            .finish()
    }
}

/// A Twitter account as returned by `users/show` and `friends/list`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    #[serde(default)]
    pub id_str: String,
    pub screen_name: String,
    #[serde(default)]
    pub name: String,
    /// Free text typed by the user, frequently empty or not a place at all
    #[serde(default)]
    pub location: Option<String>,
}

impl Account {
    pub fn location(&self) -> &str {
        self.location.as_deref().unwrap_or("")
    }
}

/// Latitude/longitude in degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates(Point<f64>);

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self(Point::new(longitude, latitude))
    }

    pub fn latitude(&self) -> f64 {
        self.0.y()
    }

    pub fn longitude(&self) -> f64 {
        self.0.x()
    }
}

impl From<Coordinates> for Point<f64> {
    fn from(coordinates: Coordinates) -> Self {
        coordinates.0
    }
}

/// An account whose location resolved to coordinates
#[derive(Debug, Clone, PartialEq)]
pub struct LocatedPoint {
    pub name: String,
    pub coordinates: Coordinates,
}

impl LocatedPoint {
    pub fn new(name: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            name: name.into(),
            coordinates: Coordinates::new(latitude, longitude),
        }
    }

    pub fn latitude(&self) -> f64 {
        self.coordinates.latitude()
    }

    pub fn longitude(&self) -> f64 {
        self.coordinates.longitude()
    }
}

/// The target account together with the friends that could be placed on a map
#[derive(Debug, Clone)]
pub struct FriendSample {
    pub user: Account,
    pub friends: Vec<LocatedPoint>,
}
