use crate::config::TwitterSettings;
use crate::models::{Account, Credentials};
use crate::services::oauth;
use reqwest::{header::AUTHORIZATION, Client, StatusCode};
use serde::{de::DeserializeOwned, Deserialize};
use std::future::Future;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when talking to the Twitter API
#[derive(Debug, Error)]
pub enum TwitterError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Unauthorized: credentials were rejected")]
    Unauthorized,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// One page of `friends/list`
#[derive(Debug, Clone, Deserialize)]
pub struct FriendsPage {
    pub users: Vec<Account>,
    /// `0` once the last page has been returned
    #[serde(default)]
    pub next_cursor: i64,
}

/// Source of accounts and their friends
pub trait SocialGraph {
    fn get_user(&self, screen_name: &str) -> impl Future<Output = Result<Account, TwitterError>> + Send;

    /// Fetch the page of friends starting at `cursor` (`-1` for the first page)
    fn friends(
        &self,
        screen_name: &str,
        cursor: i64,
    ) -> impl Future<Output = Result<FriendsPage, TwitterError>> + Send;
}

/// Authenticated Twitter v1.1 client
///
/// Every request is signed with the OAuth 1.0a credentials the client was
/// built with. Obtain one through [`TwitterClient::authenticate`].
pub struct TwitterClient {
    base_url: String,
    credentials: Credentials,
    page_size: u32,
    client: Client,
}

impl TwitterClient {
    /// Build a client without contacting the API
    pub fn new(
        base_url: impl Into<String>,
        credentials: Credentials,
        page_size: u32,
        timeout: Duration,
    ) -> Result<Self, TwitterError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url: base_url.into(),
            credentials,
            page_size,
            client,
        })
    }

    /// Exchange credentials for an API handle
    ///
    /// The credentials are checked against `account/verify_credentials`, so a
    /// handle is only returned when the service accepts them.
    pub async fn authenticate(
        settings: &TwitterSettings,
        credentials: Credentials,
    ) -> Result<Self, TwitterError> {
        let client = Self::new(
            settings.api_base.clone(),
            credentials,
            settings.friends_page_size,
            Duration::from_secs(settings.timeout_secs),
        )?;

        let me = client.verify_credentials().await?;
        tracing::debug!("Authenticated as @{}", me.screen_name);

        Ok(client)
    }

    /// The account the credentials belong to
    pub async fn verify_credentials(&self) -> Result<Account, TwitterError> {
        self.get("/1.1/account/verify_credentials.json", &[]).await
    }

    /// `users/show` for a screen name
    pub async fn show_user(&self, screen_name: &str) -> Result<Account, TwitterError> {
        tracing::debug!("Fetching user @{}", screen_name);

        self.get(
            "/1.1/users/show.json",
            &[("screen_name", screen_name.to_string())],
        )
        .await
    }

    /// `friends/list` for a screen name, in the order the service returns them
    pub async fn friends_list(
        &self,
        screen_name: &str,
        cursor: i64,
    ) -> Result<FriendsPage, TwitterError> {
        tracing::debug!("Fetching friends of @{} (cursor {})", screen_name, cursor);

        self.get(
            "/1.1/friends/list.json",
            &[
                ("screen_name", screen_name.to_string()),
                ("count", self.page_size.to_string()),
                ("cursor", cursor.to_string()),
                ("skip_status", "true".to_string()),
            ],
        )
        .await
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, TwitterError> {
        let url = format!("{}{}", self.base_url.trim_end_matches('/'), path);
        let authorization = oauth::authorization_header("GET", &url, params, &self.credentials);

        let response = self
            .client
            .get(&url)
            .query(params)
            .header(AUTHORIZATION, authorization)
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => {}
            StatusCode::UNAUTHORIZED => return Err(TwitterError::Unauthorized),
            StatusCode::NOT_FOUND => return Err(TwitterError::NotFound(path.to_string())),
            status => {
                let body = response.text().await.unwrap_or_else(|_| "Unable to read body".to_string());
                tracing::error!("Twitter request {} failed: {} - {}", path, status, body);
                return Err(TwitterError::ApiError(format!("{} returned {}", path, status)));
            }
        }

        response
            .json()
            .await
            .map_err(|e| TwitterError::InvalidResponse(format!("{}: {}", path, e)))
    }
}

impl SocialGraph for TwitterClient {
    fn get_user(&self, screen_name: &str) -> impl Future<Output = Result<Account, TwitterError>> + Send {
        self.show_user(screen_name)
    }

    fn friends(
        &self,
        screen_name: &str,
        cursor: i64,
    ) -> impl Future<Output = Result<FriendsPage, TwitterError>> + Send {
        self.friends_list(screen_name, cursor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_twitter_client_creation() {
        let client = TwitterClient::new(
            "https://api.twitter.test/",
            Credentials::new("ck", "cs", "at", "ats"),
            20,
            Duration::from_secs(5),
        )
        .unwrap();

        assert_eq!(client.base_url, "https://api.twitter.test/");
        assert_eq!(client.page_size, 20);
    }

    #[test]
    fn test_friends_page_parsing() {
        let page: FriendsPage = serde_json::from_str(
            r#"{
                "users": [
                    {"id_str": "1", "screen_name": "a", "name": "A", "location": "Lviv"},
                    {"id_str": "2", "screen_name": "b", "name": "B", "location": ""}
                ],
                "next_cursor": 1489467234237774933,
                "previous_cursor": 0
            }"#,
        )
        .unwrap();

        assert_eq!(page.users.len(), 2);
        assert_eq!(page.users[0].location(), "Lviv");
        assert_eq!(page.next_cursor, 1489467234237774933);
    }
}
