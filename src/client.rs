use std::fmt;
use std::time::Duration;

use crate::errors::{BambuserError, Result};
use crate::resources::{Broadcasts, Collection};
use crate::signer::{SignOptions, Signer};
use crate::transport::{bearer_header, Transport, TransportCell};

const DEFAULT_API_URL: &str = "https://api.bambuser.com";
const DEFAULT_PLAYER_BASE_URL: &str = "https://dist.bambuser.net/player/";
const DEFAULT_CDN_URL: &str = "https://cdn.bambuser.net";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Everything a [`Client`] is constructed from.
///
/// A bare API key converts into a config with every other field at its
/// default:
///
/// ```
/// let config = bambuser::ClientConfig::from("my_api_key");
/// assert_eq!(config.api_url, "https://api.bambuser.com");
/// ```
#[derive(Clone)]
pub struct ClientConfig {
    pub api_url: String,
    pub api_key: String,
    pub player_base_url: String,
    /// Base of the resource URIs handed to the player.
    pub cdn_url: String,
    pub da_id: Option<String>,
    pub da_secret: Option<String>,
    /// HTTP request timeout (defaults to 60 seconds).
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_key: String::new(),
            player_base_url: DEFAULT_PLAYER_BASE_URL.to_string(),
            cdn_url: DEFAULT_CDN_URL.to_string(),
            da_id: None,
            da_secret: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl From<&str> for ClientConfig {
    fn from(api_key: &str) -> Self {
        Self::from(api_key.to_string())
    }
}

impl From<String> for ClientConfig {
    fn from(api_key: String) -> Self {
        Self {
            api_key,
            ..Self::default()
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_url", &self.api_url)
            .field("api_key", &"<redacted>")
            .field("player_base_url", &self.player_base_url)
            .field("cdn_url", &self.cdn_url)
            .field("da_id", &self.da_id)
            .field("da_secret", &self.da_secret.as_ref().map(|_| "<redacted>"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Builder for constructing a [`Client`] with custom configuration.
///
/// # Example
///
/// ```no_run
/// use bambuser::ClientBuilder;
/// use std::time::Duration;
///
/// # fn example() -> bambuser::Result<()> {
/// let client = ClientBuilder::new()
///     .api_key("my_api_key")
///     .signing_keys("my_da_id", "my_da_secret")
///     .timeout(Duration::from_secs(30))
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct ClientBuilder {
    config: ClientConfig,
}

impl ClientBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self {
            config: ClientConfig::default(),
        }
    }

    /// Create a builder pre-filled from the environment.
    ///
    /// Reads `BAMBUSER_API_KEY`, `BAMBUSER_API_URL`,
    /// `BAMBUSER_PLAYER_BASE_URL`, `BAMBUSER_DA_ID` and `BAMBUSER_DA_SECRET`;
    /// unset variables keep their defaults. Setters called afterwards win.
    pub fn from_env() -> Self {
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.is_empty());
        let mut builder = Self::new();
        if let Some(key) = var("BAMBUSER_API_KEY") {
            builder = builder.api_key(key);
        }
        if let Some(url) = var("BAMBUSER_API_URL") {
            builder = builder.api_url(url);
        }
        if let Some(url) = var("BAMBUSER_PLAYER_BASE_URL") {
            builder = builder.player_base_url(url);
        }
        builder.config.da_id = var("BAMBUSER_DA_ID");
        builder.config.da_secret = var("BAMBUSER_DA_SECRET");
        builder
    }

    /// Set the API key for authentication.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = key.into();
        self
    }

    /// Override the API base URL (defaults to `https://api.bambuser.com`).
    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.config.api_url = url.into();
        self
    }

    /// Override the web player URL (defaults to `https://dist.bambuser.net/player/`).
    pub fn player_base_url(mut self, url: impl Into<String>) -> Self {
        self.config.player_base_url = url.into();
        self
    }

    /// Override the base of signed resource URIs (defaults to `https://cdn.bambuser.net`).
    pub fn cdn_url(mut self, url: impl Into<String>) -> Self {
        self.config.cdn_url = url.into();
        self
    }

    /// Set the key pair used to sign player URLs.
    pub fn signing_keys(mut self, da_id: impl Into<String>, da_secret: impl Into<String>) -> Self {
        self.config.da_id = Some(da_id.into());
        self.config.da_secret = Some(da_secret.into());
        self
    }

    /// Set the HTTP request timeout (defaults to 60 seconds).
    pub fn timeout(mut self, d: Duration) -> Self {
        self.config.timeout = d;
        self
    }

    /// Build the [`Client`].
    ///
    /// Returns [`BambuserError::Config`] if the API key is missing or only one
    /// half of the signing key pair was given.
    pub fn build(self) -> Result<Client> {
        Client::from_config(self.config)
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// The Bambuser API client.
///
/// Use [`Client::new`] for quick construction or [`ClientBuilder`] for full
/// control. The HTTP transport is created on first use and reused for the
/// lifetime of the client.
///
/// # Example
///
/// ```no_run
/// use bambuser::{Client, Query, Resource};
///
/// # async fn example() -> bambuser::Result<()> {
/// let client = Client::new("my_api_key")?;
///
/// let latest = client.broadcasts().list(&Query::new().limit(10)).await?;
/// println!("{} broadcasts", latest.len());
/// # Ok(())
/// # }
/// ```
pub struct Client {
    config: ClientConfig,
    signer: Option<Signer>,
    transport: TransportCell,
}

impl Client {
    /// Create a new client with the given API key and default settings.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::from_config(ClientConfig::from(api_key.into()))
    }

    /// Create a client from a full configuration.
    pub fn from_config(config: impl Into<ClientConfig>) -> Result<Self> {
        let mut config = config.into();

        if config.api_key.is_empty() {
            return Err(BambuserError::Config(
                "missing API key, get one at https://bambuser.com".into(),
            ));
        }
        bearer_header(&config.api_key)?;

        config.da_id = config.da_id.filter(|s| !s.is_empty());
        config.da_secret = config.da_secret.filter(|s| !s.is_empty());
        let signer = match (&config.da_id, &config.da_secret) {
            (Some(id), Some(secret)) => Some(Signer::new(id.clone(), secret.clone())?),
            (Some(_), None) => {
                return Err(BambuserError::Config(
                    "missing second half of signing keys (daSecret)".into(),
                ))
            }
            (None, Some(_)) => {
                return Err(BambuserError::Config(
                    "missing first half of signing keys (daId)".into(),
                ))
            }
            (None, None) => None,
        };

        let transport = TransportCell::new(
            config.api_url.clone(),
            config.api_key.clone(),
            config.timeout,
        );

        Ok(Self {
            config,
            signer,
            transport,
        })
    }

    /// Shorthand for [`ClientBuilder::new`].
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The authenticated transport, created on first call and cached.
    pub fn transport(&self) -> Result<&Transport> {
        self.transport.get()
    }

    pub fn broadcasts(&self) -> Broadcasts<'_> {
        Broadcasts::new(self)
    }

    pub fn images(&self) -> Collection<'_> {
        Collection::new(&self.transport, "/images")
    }

    /// Sign an arbitrary resource URI for the player.
    ///
    /// Returns [`BambuserError::Config`] when the client has no signing keys
    /// and [`BambuserError::InvalidArgument`] for a `ttl` of 60 seconds or less.
    pub fn sign_resource_uri(&self, resource_uri: &str, options: &SignOptions) -> Result<String> {
        let signer = self
            .signer
            .as_ref()
            .ok_or_else(|| BambuserError::Config("missing signing keys".into()))?;
        signer.sign(resource_uri, options)
    }
}
