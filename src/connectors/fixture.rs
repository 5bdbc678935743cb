//! In-memory connectors backed by a handle lookup table.

use super::{Connector, TransportError};
use crate::models::{FacebookProfile, InstagramProfile, PlatformProfile, TwitterProfile};
use async_trait::async_trait;
use std::collections::HashMap;
use tracing::debug;

/// Connector that answers from a fixed table of profiles.
///
/// Unknown handles resolve to the platform's zero-follower record.
#[derive(Debug, Clone)]
pub struct FixtureConnector<P> {
    profiles: HashMap<String, P>,
}

pub type TwitterFixture = FixtureConnector<TwitterProfile>;
pub type FacebookFixture = FixtureConnector<FacebookProfile>;
pub type InstagramFixture = FixtureConnector<InstagramProfile>;

impl<P: PlatformProfile> FixtureConnector<P> {
    /// Creates an empty fixture; every lookup returns the zero record.
    #[allow(dead_code)] // Fixture builder for tests
    pub fn empty() -> Self {
        Self {
            profiles: HashMap::new(),
        }
    }

    /// Creates a fixture from `(handle, followers)` pairs.
    pub fn from_counts<I, S>(counts: I) -> Self
    where
        I: IntoIterator<Item = (S, u64)>,
        S: Into<String>,
    {
        let profiles = counts
            .into_iter()
            .map(|(handle, count)| (handle.into(), P::with_followers(count)))
            .collect();
        Self { profiles }
    }

    /// Registers a raw profile under `handle`.
    #[allow(dead_code)] // Fixture builder for tests
    pub fn with_profile(mut self, handle: impl Into<String>, profile: P) -> Self {
        self.profiles.insert(handle.into(), profile);
        self
    }

    fn lookup(&self, handle: &str) -> P {
        match self.profiles.get(handle) {
            Some(profile) => profile.clone(),
            None => {
                debug!("{}: no fixture for '{}', using zero record", P::PLATFORM, handle);
                P::with_followers(0)
            }
        }
    }
}

impl TwitterFixture {
    /// Profiles used by the bundled demo.
    pub fn demo() -> Self {
        Self::from_counts([("user1", 1000), ("user2", 1500)])
    }
}

impl FacebookFixture {
    /// Profiles used by the bundled demo.
    pub fn demo() -> Self {
        Self::from_counts([("fb1", 800), ("fb2", 1200)])
    }
}

impl InstagramFixture {
    /// Profiles used by the bundled demo.
    pub fn demo() -> Self {
        Self::from_counts([("ig1", 500), ("ig2", 700)])
    }
}

#[async_trait]
impl<P: PlatformProfile> Connector for FixtureConnector<P> {
    type Profile = P;

    async fn fetch_profile(&self, handle: &str) -> Result<P, TransportError> {
        Ok(self.lookup(handle))
    }
}
