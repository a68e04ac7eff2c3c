//! # Bambuser API client for Rust
//!
//! Async client for the [Bambuser](https://bambuser.com) broadcast API. List,
//! fetch and delete broadcasts and images, create clips, manage tags, and
//! build signed player URLs.
//!
//! ## Quick start
//!
//! ```no_run
//! use bambuser::{Client, Query, Resource};
//!
//! #[tokio::main]
//! async fn main() -> bambuser::Result<()> {
//!     let client = Client::new("your_api_key")?;
//!
//!     for broadcast in client.broadcasts().list(&Query::new().limit(10)).await? {
//!         println!("{}", broadcast["title"]);
//!     }
//!
//!     let clip = client.broadcasts().create_clip("broadcast-id", 10.0, 25.0).await?;
//!     println!("clip: {}", clip["id"]);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Signed player URLs
//!
//! ```no_run
//! use bambuser::{ClientBuilder, SignOptions};
//!
//! # fn example() -> bambuser::Result<()> {
//! let client = ClientBuilder::new()
//!     .api_key("your_api_key")
//!     .signing_keys("your_da_id", "your_da_secret")
//!     .build()?;
//!
//! let url = client
//!     .broadcasts()
//!     .player_url("broadcast-id", &SignOptions::with_ttl(3600))?;
//! # Ok(())
//! # }
//! ```

mod client;
mod errors;
mod iris;
mod models;
mod paginator;
mod query;
mod resources;
pub mod signer;
mod transport;

pub use client::{Client, ClientBuilder, ClientConfig};
pub use errors::{BambuserError, Result};
pub use iris::IrisClient;
pub use models::TagOptions;
pub use paginator::Paginator;
pub use query::{Query, ACCEPTED_QUERY_PARAMETERS};
pub use resources::{Broadcasts, Collection, Resource};
pub use signer::{SignOptions, Signer};
pub use transport::{Transport, API_MEDIA_TYPE};
