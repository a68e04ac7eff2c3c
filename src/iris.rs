//! Client for the Iris Platform API.
//!
//! Iris Platform speaks the same versioned JSON API as Bambuser, with a
//! different base URL and without player URL signing. Only the shared
//! [`Resource`](crate::Resource) operations are available.

use std::time::Duration;

use crate::errors::{BambuserError, Result};
use crate::resources::Collection;
use crate::transport::{bearer_header, Transport, TransportCell};

const DEFAULT_IRIS_API_URL: &str = "https://api.irisplatform.io";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Iris Platform API client.
///
/// # Example
///
/// ```no_run
/// use bambuser::{IrisClient, Query, Resource};
///
/// # async fn example() -> bambuser::Result<()> {
/// let iris = IrisClient::new("my_api_key")?;
/// let images = iris.images().list(&Query::new()).await?;
/// # Ok(())
/// # }
/// ```
pub struct IrisClient {
    api_url: String,
    transport: TransportCell,
}

impl IrisClient {
    /// Create a client against the default Iris Platform API URL.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_api_url(api_key, DEFAULT_IRIS_API_URL)
    }

    /// Create a client against a custom API URL.
    pub fn with_api_url(api_key: impl Into<String>, api_url: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(BambuserError::Config("missing API key".into()));
        }
        bearer_header(&api_key)?;

        let api_url = api_url.into();
        Ok(Self {
            transport: TransportCell::new(api_url.clone(), api_key, DEFAULT_TIMEOUT),
            api_url,
        })
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// The authenticated transport, created on first call and cached.
    pub fn transport(&self) -> Result<&Transport> {
        self.transport.get()
    }

    pub fn broadcasts(&self) -> Collection<'_> {
        Collection::new(&self.transport, "/broadcasts")
    }

    pub fn images(&self) -> Collection<'_> {
        Collection::new(&self.transport, "/images")
    }
}
