//! Social network connectors.
//!
//! A connector fetches one profile by handle and returns it in its
//! platform's native shape. Fixture connectors are pure lookups; HTTP
//! connectors talk to the real platform APIs.

pub mod error;
pub mod fixture;
pub mod http;

use crate::models::PlatformProfile;
use async_trait::async_trait;

pub use error::TransportError;
pub use fixture::{FacebookFixture, InstagramFixture, TwitterFixture};
pub use http::{FacebookConnector, InstagramConnector, TwitterConnector};

/// Fetches profiles from a single platform.
#[async_trait]
pub trait Connector: Send + Sync {
    /// Profile shape this connector returns.
    type Profile: PlatformProfile;

    /// Fetch the profile for a non-empty `handle`.
    ///
    /// Transport failures are returned to the caller as-is; there is no
    /// retry.
    async fn fetch_profile(&self, handle: &str) -> Result<Self::Profile, TransportError>;
}

/// Boxed connector bound to a profile shape.
pub type BoxedConnector<P> = Box<dyn Connector<Profile = P>>;
