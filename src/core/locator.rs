use crate::models::{FriendSample, LocatedPoint};
use crate::services::{locate, Geocoder, SocialGraph, TwitterError};

/// Cursor value that asks `friends/list` for its first page
const FIRST_PAGE: i64 = -1;

/// Collects a bounded sample of friends whose location can be geocoded
///
/// Friends are visited in the order the service returns them and geocoded one
/// at a time. Collection stops as soon as the sample holds more than
/// `friend_threshold` entries, so a full sample is `friend_threshold + 1` long.
/// At most `max_pages` pages of friends are requested.
#[derive(Debug, Clone, Copy)]
pub struct FriendLocator {
    friend_threshold: usize,
    max_pages: usize,
}

impl FriendLocator {
    pub fn new(friend_threshold: usize) -> Self {
        Self {
            friend_threshold,
            max_pages: 1,
        }
    }

    /// Allow up to `max_pages` friend pages; never fewer than one
    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages.max(1);
        self
    }

    pub fn with_default_threshold() -> Self {
        Self::new(7)
    }

    /// Largest sample this locator can return
    pub fn max_sample(&self) -> usize {
        self.friend_threshold + 1
    }

    #[inline]
    fn is_full(&self, sample: &[LocatedPoint]) -> bool {
        sample.len() > self.friend_threshold
    }

    /// Resolve `screen_name` and sample its located friends
    ///
    /// Fails only when the account or its first page of friends cannot be
    /// fetched. A failing later page ends the walk with what was already
    /// located; friends that cannot be geocoded are skipped.
    pub async fn sample<S, G>(
        &self,
        graph: &S,
        geocoder: &G,
        screen_name: &str,
    ) -> Result<FriendSample, TwitterError>
    where
        S: SocialGraph,
        G: Geocoder,
    {
        let user = graph.get_user(screen_name).await?;

        let mut friends = Vec::new();
        let mut cursor = FIRST_PAGE;
        let mut visited = 0usize;
        let mut pages = 0usize;

        'pages: loop {
            let page = match graph.friends(&user.screen_name, cursor).await {
                Ok(page) => page,
                Err(e) if pages > 0 => {
                    tracing::warn!(
                        "Friends page {} of @{} failed, keeping {} located: {}",
                        pages + 1,
                        user.screen_name,
                        friends.len(),
                        e
                    );
                    break;
                }
                Err(e) => return Err(e),
            };
            pages += 1;
            let page_len = page.users.len();

            for friend in &page.users {
                visited += 1;
                if let Some(point) = locate(geocoder, friend).await {
                    friends.push(point);
                }
                if self.is_full(&friends) {
                    break 'pages;
                }
            }

            if page.next_cursor == 0 || page_len == 0 || pages >= self.max_pages {
                break;
            }
            cursor = page.next_cursor;
        }

        tracing::info!(
            "Located {} of {} visited friends for @{}",
            friends.len(),
            visited,
            user.screen_name
        );

        Ok(FriendSample { user, friends })
    }
}

impl Default for FriendLocator {
    fn default() -> Self {
        Self::with_default_threshold()
    }
}
