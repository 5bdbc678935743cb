//! Data models for follower aggregation.
//!
//! This module contains the public figure description, the per-platform
//! profile shapes returned by connectors, and the ordered totals map
//! produced by the analysis platform.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use tracing::warn;

/// A social network the platform knows how to query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Twitter,
    Facebook,
    Instagram,
}

impl Platform {
    /// All platforms in aggregation order.
    pub const ALL: [Platform; 3] = [Platform::Twitter, Platform::Facebook, Platform::Instagram];

    /// Canonical lowercase name, used as the key in fetched profile maps.
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Twitter => "twitter",
            Platform::Facebook => "facebook",
            Platform::Instagram => "instagram",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Serialize `(platform, count)` pairs as a JSON object keyed by platform name.
pub fn serialize_platform_counts<S: Serializer>(
    counts: &[(Platform, u64)],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(counts.len()))?;
    for (platform, count) in counts {
        map.serialize_entry(platform.as_str(), count)?;
    }
    map.end()
}

/// A named public figure and the handle it uses on each platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicFigure {
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    twitter_handle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    facebook_handle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    instagram_handle: Option<String>,
}

impl PublicFigure {
    /// Creates a figure with no handles.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            twitter_handle: None,
            facebook_handle: None,
            instagram_handle: None,
        }
    }

    pub fn with_twitter(mut self, handle: impl Into<String>) -> Self {
        self.twitter_handle = Some(handle.into());
        self
    }

    pub fn with_facebook(mut self, handle: impl Into<String>) -> Self {
        self.facebook_handle = Some(handle.into());
        self
    }

    pub fn with_instagram(mut self, handle: impl Into<String>) -> Self {
        self.instagram_handle = Some(handle.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the handle for a platform. Empty handles count as absent.
    pub fn handle(&self, platform: Platform) -> Option<&str> {
        let handle = match platform {
            Platform::Twitter => self.twitter_handle.as_deref(),
            Platform::Facebook => self.facebook_handle.as_deref(),
            Platform::Instagram => self.instagram_handle.as_deref(),
        };
        handle.filter(|h| !h.is_empty())
    }
}

/// Coerce a raw `followers_count` value into a non-negative count.
///
/// Missing values, `null`, negatives and anything non-numeric resolve to 0.
pub fn coerce_count(raw: Option<&Value>) -> u64 {
    match raw {
        None | Some(Value::Null) => 0,
        Some(Value::Number(n)) => {
            if let Some(v) = n.as_u64() {
                v
            } else if n.is_i64() {
                0
            } else {
                n.as_f64().map_or(0, |f| if f > 0.0 { f.trunc() as u64 } else { 0 })
            }
        }
        Some(Value::String(s)) => match s.trim().parse::<i128>() {
            Ok(v) => u64::try_from(v.max(0)).unwrap_or(u64::MAX),
            Err(_) => {
                warn!("Ignoring non-numeric follower count: {:?}", s);
                0
            }
        },
        Some(other) => {
            warn!("Ignoring follower count of unexpected type: {}", other);
            0
        }
    }
}

/// Common behaviour of the per-platform profile shapes.
pub trait PlatformProfile: Clone + Send + Sync + 'static {
    /// The platform this shape belongs to.
    const PLATFORM: Platform;

    /// Follower count at the platform's extraction path, 0 when absent.
    fn followers(&self) -> u64;

    /// A record in this platform's native shape carrying `count` followers.
    fn with_followers(count: u64) -> Self;

    fn into_record(self) -> ProfileRecord;
}

/// Twitter API v2 user lookup payload: `data.public_metrics.followers_count`.
///
/// Fields off the extraction path are kept as raw JSON so an unexpected
/// type there never fails decoding.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TwitterProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<TwitterUser>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TwitterUser {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_metrics: Option<TwitterPublicMetrics>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TwitterPublicMetrics {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub followers_count: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub following_count: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tweet_count: Option<Value>,
}

impl PlatformProfile for TwitterProfile {
    const PLATFORM: Platform = Platform::Twitter;

    fn followers(&self) -> u64 {
        let raw = self
            .data
            .as_ref()
            .and_then(|d| d.public_metrics.as_ref())
            .and_then(|m| m.followers_count.as_ref());
        coerce_count(raw)
    }

    fn with_followers(count: u64) -> Self {
        Self {
            data: Some(TwitterUser {
                public_metrics: Some(TwitterPublicMetrics {
                    followers_count: Some(Value::from(count)),
                    ..TwitterPublicMetrics::default()
                }),
                ..TwitterUser::default()
            }),
        }
    }

    fn into_record(self) -> ProfileRecord {
        ProfileRecord::Twitter(self)
    }
}

/// Facebook Graph API page payload: flat `followers_count`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FacebookProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub followers_count: Option<Value>,
}

impl PlatformProfile for FacebookProfile {
    const PLATFORM: Platform = Platform::Facebook;

    fn followers(&self) -> u64 {
        coerce_count(self.followers_count.as_ref())
    }

    fn with_followers(count: u64) -> Self {
        Self {
            followers_count: Some(Value::from(count)),
            ..Self::default()
        }
    }

    fn into_record(self) -> ProfileRecord {
        ProfileRecord::Facebook(self)
    }
}

/// Instagram Graph API user payload: flat `followers_count`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InstagramProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub followers_count: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_count: Option<Value>,
}

impl PlatformProfile for InstagramProfile {
    const PLATFORM: Platform = Platform::Instagram;

    fn followers(&self) -> u64 {
        coerce_count(self.followers_count.as_ref())
    }

    fn with_followers(count: u64) -> Self {
        Self {
            followers_count: Some(Value::from(count)),
            ..Self::default()
        }
    }

    fn into_record(self) -> ProfileRecord {
        ProfileRecord::Instagram(self)
    }
}

/// A profile in its platform's native shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ProfileRecord {
    Twitter(TwitterProfile),
    Facebook(FacebookProfile),
    Instagram(InstagramProfile),
}

impl ProfileRecord {
    pub fn platform(&self) -> Platform {
        match self {
            ProfileRecord::Twitter(_) => Platform::Twitter,
            ProfileRecord::Facebook(_) => Platform::Facebook,
            ProfileRecord::Instagram(_) => Platform::Instagram,
        }
    }

    /// Follower count using the platform-specific extraction path.
    pub fn followers(&self) -> u64 {
        match self {
            ProfileRecord::Twitter(p) => p.followers(),
            ProfileRecord::Facebook(p) => p.followers(),
            ProfileRecord::Instagram(p) => p.followers(),
        }
    }
}

/// Profiles fetched for one figure, at most one per platform.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FetchedProfiles {
    pub twitter: Option<TwitterProfile>,
    pub facebook: Option<FacebookProfile>,
    pub instagram: Option<InstagramProfile>,
}

impl FetchedProfiles {
    /// Iterates present profiles in platform order: twitter, facebook, instagram.
    pub fn iter(&self) -> impl Iterator<Item = (Platform, ProfileRecord)> + '_ {
        let twitter = self.twitter.clone().map(PlatformProfile::into_record);
        let facebook = self.facebook.clone().map(PlatformProfile::into_record);
        let instagram = self.instagram.clone().map(PlatformProfile::into_record);
        [twitter, facebook, instagram]
            .into_iter()
            .flatten()
            .map(|record| (record.platform(), record))
    }

    pub fn contains(&self, platform: Platform) -> bool {
        match platform {
            Platform::Twitter => self.twitter.is_some(),
            Platform::Facebook => self.facebook.is_some(),
            Platform::Instagram => self.instagram.is_some(),
        }
    }

    pub fn is_empty(&self) -> bool {
        Platform::ALL.iter().all(|p| !self.contains(*p))
    }

    /// Platform names present, in insertion order.
    pub fn keys(&self) -> Vec<&'static str> {
        Platform::ALL
            .iter()
            .filter(|p| self.contains(**p))
            .map(Platform::as_str)
            .collect()
    }
}

/// Follower totals keyed by figure name.
///
/// Keys keep the position of their first insertion; re-inserting a name
/// replaces its value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FollowerTotals {
    entries: Vec<(String, u64)>,
    index: HashMap<String, usize>,
}

impl FollowerTotals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or overwrites the total for `name`. Returns the previous value.
    pub fn insert(&mut self, name: impl Into<String>, total: u64) -> Option<u64> {
        let name = name.into();
        match self.index.get(&name) {
            Some(&pos) => Some(std::mem::replace(&mut self.entries[pos].1, total)),
            None => {
                self.index.insert(name.clone(), self.entries.len());
                self.entries.push((name, total));
                None
            }
        }
    }

    #[allow(dead_code)] // Lookup helper, used in tests
    pub fn get(&self, name: &str) -> Option<u64> {
        self.index.get(name).map(|&pos| self.entries[pos].1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.entries.iter().map(|(n, t)| (n.as_str(), *t))
    }

    #[allow(dead_code)] // Lookup helper, used in tests
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|(n, _)| n.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[allow(dead_code)] // Pairs with len(), used in tests
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for FollowerTotals {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, total) in &self.entries {
            map.serialize_entry(name, total)?;
        }
        map.end()
    }
}
