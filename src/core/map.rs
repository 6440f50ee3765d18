use serde::Serialize;

use crate::config::MapSettings;
use crate::models::{Account, Coordinates, LocatedPoint};
use crate::services::{locate, Geocoder};

const MAP_TEMPLATE: &str = include_str!("../../templates/map.html");
const CONFIG_PLACEHOLDER: &str = "__MAP_CONFIG__";

/// Name of the overlay holding every marker
pub const FRIENDS_LAYER: &str = "friends_locations";

/// Whole-world view used when the target account cannot be located
pub const DEFAULT_VIEW: MapView = MapView {
    center: (0.0, 0.0),
    zoom: 1,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapView {
    /// (latitude, longitude)
    pub center: (f64, f64),
    pub zoom: u8,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub coordinates: Coordinates,
    pub popup: String,
}

/// A renderable map: optional centered view plus labeled markers
#[derive(Debug, Clone)]
pub struct MapDocument {
    /// `None` means [`DEFAULT_VIEW`]
    pub view: Option<MapView>,
    pub markers: Vec<Marker>,
    tile_url: String,
    attribution: String,
}

#[derive(Serialize)]
struct LeafletConfig<'a> {
    center: [f64; 2],
    zoom: u8,
    tiles: &'a str,
    attribution: &'a str,
    layer: &'a str,
    markers: Vec<LeafletMarker<'a>>,
}

#[derive(Serialize)]
struct LeafletMarker<'a> {
    lat: f64,
    lon: f64,
    popup: &'a str,
}

impl MapDocument {
    pub fn effective_view(&self) -> MapView {
        self.view.unwrap_or(DEFAULT_VIEW)
    }

    /// Self-contained Leaflet page
    pub fn render(&self) -> String {
        let view = self.effective_view();
        let config = LeafletConfig {
            center: [view.center.0, view.center.1],
            zoom: view.zoom,
            tiles: &self.tile_url,
            attribution: &self.attribution,
            layer: FRIENDS_LAYER,
            markers: self
                .markers
                .iter()
                .map(|m| LeafletMarker {
                    lat: m.coordinates.latitude(),
                    lon: m.coordinates.longitude(),
                    popup: &m.popup,
                })
                .collect(),
        };

        // Serializing plain numbers and strings cannot fail
        let json = serde_json::to_string(&config).unwrap_or_else(|_| "{}".to_string());

        MAP_TEMPLATE.replace(CONFIG_PLACEHOLDER, &escape_script(&json))
    }
}

/// Keep embedded JSON from closing the surrounding `<script>` element
fn escape_script(json: &str) -> String {
    json.replace('<', "\\u003c")
        .replace('>', "\\u003e")
        .replace('&', "\\u0026")
}

/// Builds map documents with the configured zoom and tile source
#[derive(Debug, Clone)]
pub struct MapRenderer {
    settings: MapSettings,
}

impl MapRenderer {
    pub fn new(settings: MapSettings) -> Self {
        Self { settings }
    }

    /// Geocode the target account, then lay out the map
    pub async fn create_map<G: Geocoder>(
        &self,
        geocoder: &G,
        user: &Account,
        friends: &[LocatedPoint],
    ) -> MapDocument {
        let user_point = locate(geocoder, user).await;
        if user_point.is_none() {
            tracing::debug!("@{} has no usable location, using default view", user.screen_name);
        }

        self.build(user_point.as_ref(), friends)
    }

    /// Lay out a map from already-located points
    ///
    /// A located user centers the map at `zoom_start` and gets a
    /// `User: <name>` marker; friends always get one marker each.
    pub fn build(&self, user: Option<&LocatedPoint>, friends: &[LocatedPoint]) -> MapDocument {
        let mut markers = Vec::with_capacity(friends.len() + 1);

        let view = user.map(|point| {
            markers.push(Marker {
                coordinates: point.coordinates,
                popup: format!("User: {}", point.name),
            });

            MapView {
                center: (point.latitude(), point.longitude()),
                zoom: self.settings.zoom_start,
            }
        });

        markers.extend(friends.iter().map(|friend| Marker {
            coordinates: friend.coordinates,
            popup: friend.name.clone(),
        }));

        MapDocument {
            view,
            markers,
            tile_url: self.settings.tile_url.clone(),
            attribution: self.settings.attribution.clone(),
        }
    }
}

impl Default for MapRenderer {
    fn default() -> Self {
        Self::new(MapSettings::default())
    }
}
