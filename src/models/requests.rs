use serde::Deserialize;
use validator::Validate;

use crate::models::Credentials;

/// Form posted by the index page
///
/// Missing fields deserialize to empty strings so that validation, not
/// extraction, decides whether the request is usable.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct MapFormRequest {
    #[validate(length(min = 1))]
    #[serde(default)]
    pub twit: String,
    #[validate(length(min = 1))]
    #[serde(default)]
    pub consumer_key: String,
    #[validate(length(min = 1))]
    #[serde(default)]
    pub consumer_key_secret: String,
    #[validate(length(min = 1))]
    #[serde(default)]
    pub access_token: String,
    #[validate(length(min = 1))]
    #[serde(default)]
    pub access_token_secret: String,
}

impl MapFormRequest {
    pub fn credentials(&self) -> Credentials {
        Credentials::new(
            self.consumer_key.clone(),
            self.consumer_key_secret.clone(),
            self.access_token.clone(),
            self.access_token_secret.clone(),
        )
    }
}
