use thiserror::Error;

use crate::config::{Settings, TwitterSettings};
use crate::core::{FriendLocator, MapDocument, MapRenderer};
use crate::models::{Credentials, FriendSample};
use crate::services::{Geocoder, TwitterClient, TwitterError};

/// Everything that can stop a map from being built
///
/// Users see the same failure page for every variant; the distinction only
/// reaches the logs.
#[derive(Debug, Error)]
pub enum MapError {
    #[error("Invalid request: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Twitter request failed: {0}")]
    Twitter(#[from] TwitterError),

    #[error("No friends of @{0} could be located")]
    NoLocatedFriends(String),
}

/// authenticate -> sample friends -> render
#[derive(Debug, Clone)]
pub struct Pipeline {
    twitter: TwitterSettings,
    locator: FriendLocator,
    renderer: MapRenderer,
}

impl Pipeline {
    pub fn new(twitter: TwitterSettings, locator: FriendLocator, renderer: MapRenderer) -> Self {
        Self {
            twitter,
            locator,
            renderer,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            settings.twitter.clone(),
            FriendLocator::new(settings.locator.friend_threshold)
                .with_max_pages(settings.locator.max_pages),
            MapRenderer::new(settings.map.clone()),
        )
    }

    /// Authenticate with `credentials` and sample the located friends of `screen_name`
    pub async fn sample_friends<G: Geocoder>(
        &self,
        geocoder: &G,
        screen_name: &str,
        credentials: Credentials,
    ) -> Result<FriendSample, MapError> {
        let api = TwitterClient::authenticate(&self.twitter, credentials).await?;
        let sample = self.locator.sample(&api, geocoder, screen_name).await?;

        Ok(sample)
    }

    pub async fn render<G: Geocoder>(&self, geocoder: &G, sample: &FriendSample) -> MapDocument {
        self.renderer
            .create_map(geocoder, &sample.user, &sample.friends)
            .await
    }

    /// Full pipeline as served to the web form
    ///
    /// An account none of whose sampled friends could be located is an error
    /// here, even though an empty map could be drawn.
    pub async fn generate<G: Geocoder>(
        &self,
        geocoder: &G,
        screen_name: &str,
        credentials: Credentials,
    ) -> Result<MapDocument, MapError> {
        let sample = self.sample_friends(geocoder, screen_name, credentials).await?;

        if sample.friends.is_empty() {
            return Err(MapError::NoLocatedFriends(sample.user.screen_name));
        }

        Ok(self.render(geocoder, &sample).await)
    }
}

/// Build a map for `screen_name` outside the web server
///
/// Unlike [`Pipeline::generate`], an empty sample still yields a map.
pub async fn generate_map<G: Geocoder>(
    settings: &Settings,
    geocoder: &G,
    screen_name: &str,
    credentials: Credentials,
) -> Result<MapDocument, MapError> {
    let pipeline = Pipeline::from_settings(settings);
    let sample = pipeline.sample_friends(geocoder, screen_name, credentials).await?;

    Ok(pipeline.render(geocoder, &sample).await)
}
