// Player headshot lookup and its name-keyed cache.
//
// Lookups confirm a sports-reference image URL with a HEAD request. Results,
// including "not found", are cached per player name; concurrent requests for
// the same name share a single in-flight lookup.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures_util::future::join_all;
use moka::future::Cache;
use reqwest::Client;
use tracing::{debug, warn};

use crate::config::ImageConfig;

pub const DEFAULT_IMAGE_BASE_URL: &str =
    "https://www.sports-reference.com/req/202505131/cbb/images/players";

// ---------------------------------------------------------------------------
// Lookup
// ---------------------------------------------------------------------------

/// Resolves a player's display name to an image URL. `None` means no image,
/// whether the image is missing or the lookup failed.
#[async_trait]
pub trait ImageLookup: Send + Sync {
    async fn lookup(&self, player_name: &str) -> Option<String>;
}

/// URL slug for a player name: "Bruce Thornton" -> "bruce-thornton".
///
/// Lowercases, drops everything except ASCII letters, digits and whitespace,
/// then joins the remaining words with single hyphens.
pub fn slug_for(player_name: &str) -> String {
    let cleaned: String = player_name
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace())
        .collect();
    cleaned.split_whitespace().collect::<Vec<_>>().join("-")
}

pub struct SportsReferenceLookup {
    client: Client,
    base_url: String,
}

impl SportsReferenceLookup {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    pub fn from_config(images: &ImageConfig) -> Result<Self, reqwest::Error> {
        Self::new(
            images.base_url.clone(),
            Duration::from_secs(images.timeout_secs),
        )
    }

    /// Candidate URL: `{base_url}/{slug}-1.jpg`.
    pub fn image_url(&self, player_name: &str) -> String {
        format!(
            "{}/{}-1.jpg",
            self.base_url.trim_end_matches('/'),
            slug_for(player_name)
        )
    }
}

#[async_trait]
impl ImageLookup for SportsReferenceLookup {
    async fn lookup(&self, player_name: &str) -> Option<String> {
        let url = self.image_url(player_name);
        match self.client.head(&url).send().await {
            Ok(resp) if resp.status().is_success() => Some(url),
            Ok(resp) => {
                debug!(player = player_name, status = %resp.status(), "no image at {}", url);
                None
            }
            Err(e) => {
                warn!(player = player_name, "image lookup failed: {}", e);
                None
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Cache
// ---------------------------------------------------------------------------

/// Name-keyed image cache in front of an [`ImageLookup`].
#[derive(Clone)]
pub struct ImageCache {
    inner: Cache<String, Option<String>>,
    lookup: Arc<dyn ImageLookup>,
}

impl ImageCache {
    pub fn new(lookup: Arc<dyn ImageLookup>, max_capacity: u64) -> Self {
        Self {
            inner: Cache::new(max_capacity),
            lookup,
        }
    }

    /// Cached result for `player_name` without triggering a lookup. The outer
    /// `None` means "not cached"; `Some(None)` is a cached miss.
    pub async fn get(&self, player_name: &str) -> Option<Option<String>> {
        self.inner.get(player_name).await
    }

    /// Cached result, or run the lookup and cache whatever it returns.
    pub async fn get_or_fetch(&self, player_name: &str) -> Option<String> {
        let lookup = Arc::clone(&self.lookup);
        let name = player_name.to_string();
        self.inner
            .get_with(name.clone(), async move { lookup.lookup(&name).await })
            .await
    }

    /// Look up many players concurrently. Output order follows `names`.
    pub async fn get_many(&self, names: &[String]) -> Vec<(String, Option<String>)> {
        let lookups = names.iter().map(|name| async move {
            let url = self.get_or_fetch(name).await;
            (name.clone(), url)
        });
        join_all(lookups).await
    }

    pub async fn invalidate(&self, player_name: &str) {
        self.inner.invalidate(player_name).await;
    }

    pub fn invalidate_all(&self) {
        self.inner.invalidate_all();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
