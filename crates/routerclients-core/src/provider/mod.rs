// ── Provider capability ──
//
// A provider knows how to talk to one router family over one transport.
// The contract is connect → fetch_interfaces → disconnect; `snapshot`
// runs that sequence and guarantees the disconnect on every exit path.

pub mod asus;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::config::{RouterConfig, RouterFamily, Transport};
use crate::error::CoreError;
use crate::model::Interface;

pub use asus::{AsusSshProvider, AsusWebProvider};

/// One concrete way of obtaining an interface snapshot from a router.
///
/// Implementations validate their configuration in their constructor, so
/// a value of this type is always ready to connect.
#[async_trait]
pub trait RouterProvider: Send + Sync {
    /// Opaque authenticated handle produced by [`connect`](Self::connect).
    type Session: Send + Sync;

    /// Short strategy name used in logs and errors.
    fn name(&self) -> &'static str;

    async fn connect(&self) -> Result<Self::Session, CoreError>;

    /// Perform every remote call needed to build the snapshot.
    ///
    /// Never returns a partial result: any failed step fails the call.
    async fn fetch_interfaces(&self, session: &Self::Session)
    -> Result<Vec<Interface>, CoreError>;

    /// Best-effort teardown. Errors are reported but callers only log them.
    async fn disconnect(&self, session: Self::Session) -> Result<(), CoreError>;
}

/// Object-safe view of a provider: one call, one snapshot.
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    fn name(&self) -> &'static str;

    async fn snapshot(&self) -> Result<Vec<Interface>, CoreError>;
}

#[async_trait]
impl<P: RouterProvider> SnapshotSource for P {
    fn name(&self) -> &'static str {
        RouterProvider::name(self)
    }

    async fn snapshot(&self) -> Result<Vec<Interface>, CoreError> {
        let session = self.connect().await?;
        debug!(provider = RouterProvider::name(self), "session established");

        let result = self.fetch_interfaces(&session).await;

        if let Err(e) = self.disconnect(session).await {
            warn!(provider = RouterProvider::name(self), error = %e, "disconnect failed");
        }

        result
    }
}

/// Pick and construct the strategy for `config`.
///
/// Construction validates the configuration, so this fails before any
/// network access when a required field is missing.
pub fn select_provider(config: &RouterConfig) -> Result<Box<dyn SnapshotSource>, CoreError> {
    match (config.provider, config.transport) {
        (RouterFamily::Asus, Transport::Ssh) => Ok(Box::new(AsusSshProvider::new(config)?)),
        (RouterFamily::Asus, Transport::Http | Transport::Https) => {
            Ok(Box::new(AsusWebProvider::new(config)?))
        }
    }
}

/// Unwrap a required configuration field or name it in the error.
pub(crate) fn require<'a, T: ?Sized>(
    strategy: &'static str,
    field: &'static str,
    value: Option<&'a T>,
) -> Result<&'a T, CoreError> {
    value.ok_or_else(|| CoreError::missing(strategy, field))
}
