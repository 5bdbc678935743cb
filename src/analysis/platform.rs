//! The analysis platform: fetch profiles per figure and sum followers.

use super::aggregator::FigureTally;
use crate::connectors::{BoxedConnector, Connector, TransportError};
use crate::models::{
    FacebookProfile, FetchedProfiles, FollowerTotals, InstagramProfile, Platform,
    PlatformProfile, PublicFigure, TwitterProfile,
};
use tracing::{debug, info};

/// Holds at most one connector per platform.
///
/// A platform without a connector contributes nothing for any figure.
#[derive(Default)]
pub struct AnalysisPlatform {
    twitter: Option<BoxedConnector<TwitterProfile>>,
    facebook: Option<BoxedConnector<FacebookProfile>>,
    instagram: Option<BoxedConnector<InstagramProfile>>,
}

impl AnalysisPlatform {
    /// Creates a platform with no connectors configured.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_twitter<C>(mut self, connector: C) -> Self
    where
        C: Connector<Profile = TwitterProfile> + 'static,
    {
        self.twitter = Some(Box::new(connector));
        self
    }

    pub fn with_facebook<C>(mut self, connector: C) -> Self
    where
        C: Connector<Profile = FacebookProfile> + 'static,
    {
        self.facebook = Some(Box::new(connector));
        self
    }

    pub fn with_instagram<C>(mut self, connector: C) -> Self
    where
        C: Connector<Profile = InstagramProfile> + 'static,
    {
        self.instagram = Some(Box::new(connector));
        self
    }

    /// Platforms that have a connector, in aggregation order.
    pub fn configured_platforms(&self) -> Vec<Platform> {
        Platform::ALL
            .into_iter()
            .filter(|p| match p {
                Platform::Twitter => self.twitter.is_some(),
                Platform::Facebook => self.facebook.is_some(),
                Platform::Instagram => self.instagram.is_some(),
            })
            .collect()
    }

    /// Fetch every profile available for `figure`.
    ///
    /// A platform is queried only when the figure has a handle for it and a
    /// connector is configured. Platforms are queried one after another in
    /// the order twitter, facebook, instagram.
    pub async fn fetch_all(&self, figure: &PublicFigure) -> Result<FetchedProfiles, TransportError> {
        Ok(FetchedProfiles {
            twitter: fetch_one(self.twitter.as_deref(), figure).await?,
            facebook: fetch_one(self.facebook.as_deref(), figure).await?,
            instagram: fetch_one(self.instagram.as_deref(), figure).await?,
        })
    }

    /// Per-platform follower counts for one figure.
    pub async fn tally(&self, figure: &PublicFigure) -> Result<FigureTally, TransportError> {
        let profiles = self.fetch_all(figure).await?;
        if profiles.is_empty() {
            debug!("{}: no platform to query", figure.name());
        } else {
            debug!("{}: fetched {:?}", figure.name(), profiles.keys());
        }
        let tally = FigureTally::from_profiles(figure.name(), &profiles);
        debug!("{}: {:?} -> {}", tally.name, tally.counts, tally.total);
        Ok(tally)
    }

    /// Per-figure tallies, fetched strictly in input order.
    pub async fn tally_all(
        &self,
        figures: &[PublicFigure],
    ) -> Result<Vec<FigureTally>, TransportError> {
        let mut tallies = Vec::with_capacity(figures.len());
        for figure in figures {
            tallies.push(self.tally(figure).await?);
        }
        Ok(tallies)
    }

    /// Per-figure tallies with figures fetched concurrently.
    ///
    /// Results come back in input order; the first failing figure in input
    /// order determines the returned error.
    pub async fn tally_all_concurrent(
        &self,
        figures: &[PublicFigure],
    ) -> Result<Vec<FigureTally>, TransportError> {
        let outcomes =
            futures::future::join_all(figures.iter().map(|figure| self.tally(figure))).await;
        outcomes.into_iter().collect()
    }

    /// Total followers per figure name, processing figures sequentially.
    ///
    /// Duplicate names keep their first position but take the last total.
    pub async fn compare_followers(
        &self,
        figures: &[PublicFigure],
    ) -> Result<FollowerTotals, TransportError> {
        info!("Comparing followers for {} figures", figures.len());
        let tallies = self.tally_all(figures).await?;
        Ok(totals_from_tallies(&tallies))
    }

    /// Same result as [`compare_followers`](Self::compare_followers), with
    /// figures fetched concurrently.
    pub async fn compare_followers_concurrent(
        &self,
        figures: &[PublicFigure],
    ) -> Result<FollowerTotals, TransportError> {
        info!(
            "Comparing followers for {} figures (concurrent)",
            figures.len()
        );
        let tallies = self.tally_all_concurrent(figures).await?;
        Ok(totals_from_tallies(&tallies))
    }
}

/// Query `connector` for the figure's handle on that connector's platform.
async fn fetch_one<P: PlatformProfile>(
    connector: Option<&dyn Connector<Profile = P>>,
    figure: &PublicFigure,
) -> Result<Option<P>, TransportError> {
    let (Some(handle), Some(connector)) = (figure.handle(P::PLATFORM), connector) else {
        return Ok(None);
    };
    connector.fetch_profile(handle).await.map(Some)
}

/// Fold tallies into totals in order; later names overwrite earlier ones.
pub fn totals_from_tallies(tallies: &[FigureTally]) -> FollowerTotals {
    let mut totals = FollowerTotals::new();
    for tally in tallies {
        totals.insert(tally.name.clone(), tally.total);
    }
    totals
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connectors::{FacebookFixture, InstagramFixture, TwitterFixture};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn demo_platform() -> AnalysisPlatform {
        AnalysisPlatform::new()
            .with_twitter(TwitterFixture::demo())
            .with_facebook(FacebookFixture::demo())
            .with_instagram(InstagramFixture::demo())
    }

    fn figura1() -> PublicFigure {
        PublicFigure::new("Figura1")
            .with_twitter("user1")
            .with_facebook("fb1")
            .with_instagram("ig1")
    }

    fn figura2() -> PublicFigure {
        PublicFigure::new("Figura2")
            .with_twitter("user2")
            .with_facebook("fb2")
            .with_instagram("ig2")
    }

    /// Connector that always fails and counts calls.
    struct FailingTwitter {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl Connector for FailingTwitter {
        type Profile = TwitterProfile;

        async fn fetch_profile(&self, handle: &str) -> Result<TwitterProfile, TransportError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(TransportError::Status {
                platform: Platform::Twitter,
                handle: handle.to_string(),
                status: 503,
            })
        }
    }

    /// Connector that counts calls and delegates to the demo fixture.
    struct CountingFacebook {
        calls: Arc<AtomicUsize>,
        inner: FacebookFixture,
    }

    #[async_trait]
    impl Connector for CountingFacebook {
        type Profile = FacebookProfile;

        async fn fetch_profile(&self, handle: &str) -> Result<FacebookProfile, TransportError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.fetch_profile(handle).await
        }
    }

    #[tokio::test]
    async fn test_scenario_all_three_platforms() {
        let totals = demo_platform().compare_followers(&[figura1()]).await.unwrap();
        assert_eq!(totals.get("Figura1"), Some(2300));
    }

    #[tokio::test]
    async fn test_demo_totals() {
        let totals = demo_platform()
            .compare_followers(&[figura1(), figura2()])
            .await
            .unwrap();
        let entries: Vec<_> = totals.iter().collect();
        assert_eq!(entries, vec![("Figura1", 2300), ("Figura2", 3400)]);
    }

    #[tokio::test]
    async fn test_unknown_handle_contributes_zero() {
        let platform = AnalysisPlatform::new().with_twitter(TwitterFixture::demo());
        let figure = PublicFigure::new("Ghost").with_twitter("unknown_handle");

        let profiles = platform.fetch_all(&figure).await.unwrap();
        assert_eq!(profiles.keys(), vec!["twitter"]);

        let totals = platform.compare_followers(&[figure]).await.unwrap();
        assert_eq!(totals.get("Ghost"), Some(0));
    }

    #[tokio::test]
    async fn test_figure_without_handles_totals_zero() {
        let figure = PublicFigure::new("Nobody");
        let platform = demo_platform();

        assert!(platform.fetch_all(&figure).await.unwrap().is_empty());
        let totals = platform.compare_followers(&[figure]).await.unwrap();
        assert_eq!(totals.get("Nobody"), Some(0));
    }

    #[tokio::test]
    async fn test_no_connectors_totals_zero() {
        let platform = AnalysisPlatform::new();
        assert!(platform.configured_platforms().is_empty());

        let totals = platform.compare_followers(&[figura1()]).await.unwrap();
        assert_eq!(totals.get("Figura1"), Some(0));
    }

    #[tokio::test]
    async fn test_fetch_all_requires_handle_and_connector() {
        let calls = Arc::new(AtomicUsize::new(0));
        let platform = AnalysisPlatform::new()
            .with_twitter(TwitterFixture::demo())
            .with_facebook(CountingFacebook {
                calls: Arc::clone(&calls),
                inner: FacebookFixture::demo(),
            });
        let figure = PublicFigure::new("Partial")
            .with_twitter("user1")
            .with_instagram("ig1");

        let profiles = platform.fetch_all(&figure).await.unwrap();
        assert_eq!(profiles.keys(), vec!["twitter"]);
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        let tally = platform.tally(&figure).await.unwrap();
        assert_eq!(tally.counts, vec![(Platform::Twitter, 1000)]);
        assert_eq!(tally.total, 1000);
    }

    #[tokio::test]
    async fn test_fetch_all_order_is_fixed() {
        let figure = PublicFigure::new("Reverse")
            .with_instagram("ig1")
            .with_facebook("fb1")
            .with_twitter("user1");
        let profiles = demo_platform().fetch_all(&figure).await.unwrap();
        assert_eq!(profiles.keys(), vec!["twitter", "facebook", "instagram"]);
    }

    #[tokio::test]
    async fn test_missing_path_contributes_zero() {
        let raw: TwitterProfile =
            serde_json::from_value(serde_json::json!({"data": {"id": "7"}})).unwrap();
        let platform = AnalysisPlatform::new()
            .with_twitter(TwitterFixture::empty().with_profile("partial", raw))
            .with_facebook(FacebookFixture::demo());
        let figure = PublicFigure::new("Partial")
            .with_twitter("partial")
            .with_facebook("fb2");

        let totals = platform.compare_followers(&[figure]).await.unwrap();
        assert_eq!(totals.get("Partial"), Some(1200));
    }

    #[tokio::test]
    async fn test_duplicate_names_last_write_wins() {
        let first = PublicFigure::new("Dup").with_twitter("user1");
        let middle = PublicFigure::new("Other").with_facebook("fb1");
        let last = PublicFigure::new("Dup").with_instagram("ig2");

        let totals = demo_platform()
            .compare_followers(&[first, middle, last])
            .await
            .unwrap();
        let entries: Vec<_> = totals.iter().collect();
        assert_eq!(entries, vec![("Dup", 700), ("Other", 800)]);
    }

    #[tokio::test]
    async fn test_compare_is_idempotent() {
        let platform = demo_platform();
        let figures = [figura2(), figura1(), PublicFigure::new("Empty")];

        let first = platform.compare_followers(&figures).await.unwrap();
        let second = platform.compare_followers(&figures).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first.names(), vec!["Figura2", "Figura1", "Empty"]);
    }

    #[tokio::test]
    async fn test_concurrent_matches_sequential() {
        let platform = demo_platform();
        let figures = [
            figura2(),
            PublicFigure::new("Figura1").with_twitter("user1"),
            figura1(),
            PublicFigure::new("Ghost").with_facebook("missing"),
        ];

        let sequential = platform.compare_followers(&figures).await.unwrap();
        let concurrent = platform.compare_followers_concurrent(&figures).await.unwrap();
        assert_eq!(sequential, concurrent);
        assert_eq!(sequential.get("Figura1"), Some(2300));
    }

    #[tokio::test]
    async fn test_transport_error_aborts_run() {
        let twitter_calls = Arc::new(AtomicUsize::new(0));
        let facebook_calls = Arc::new(AtomicUsize::new(0));
        let platform = AnalysisPlatform::new()
            .with_twitter(FailingTwitter {
                calls: Arc::clone(&twitter_calls),
            })
            .with_facebook(CountingFacebook {
                calls: Arc::clone(&facebook_calls),
                inner: FacebookFixture::demo(),
            });
        let figures = [figura1(), figura2()];

        let err = platform.compare_followers(&figures).await.unwrap_err();
        assert!(matches!(err, TransportError::Status { status: 503, .. }));
        // The first figure's twitter failure stops everything after it.
        assert_eq!(twitter_calls.load(Ordering::SeqCst), 1);
        assert_eq!(facebook_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_concurrent_reports_first_error_in_input_order() {
        let platform = AnalysisPlatform::new()
            .with_twitter(FailingTwitter {
                calls: Arc::new(AtomicUsize::new(0)),
            })
            .with_facebook(FacebookFixture::demo());
        let figures = [
            PublicFigure::new("Fine").with_facebook("fb1"),
            PublicFigure::new("Broken").with_twitter("first"),
            PublicFigure::new("AlsoBroken").with_twitter("second"),
        ];

        match platform.compare_followers_concurrent(&figures).await {
            Err(TransportError::Status { handle, .. }) => assert_eq!(handle, "first"),
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[test]
    fn test_configured_platforms() {
        let platform = AnalysisPlatform::new()
            .with_instagram(InstagramFixture::demo())
            .with_twitter(TwitterFixture::demo());
        assert_eq!(
            platform.configured_platforms(),
            vec![Platform::Twitter, Platform::Instagram]
        );
    }
}
