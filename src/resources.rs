use reqwest::Method;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::client::Client;
use crate::errors::{BambuserError, Result};
use crate::models::{AddTagRequest, ClipSource, CreateClipRequest, TagOptions};
use crate::paginator::Paginator;
use crate::signer::SignOptions;
use crate::transport::{Transport, TransportCell};

/// Operations every API resource supports.
///
/// Implemented by [`Collection`] for plain resources (images, and both
/// resources of the Iris Platform client) and by [`Broadcasts`], which adds
/// its own operations on top.
#[allow(async_fn_in_trait)]
pub trait Resource {
    /// The authenticated transport requests are sent through.
    fn transport(&self) -> Result<&Transport>;

    /// Collection path relative to the API base URL, e.g. `/images`.
    fn path(&self) -> &str;

    /// Validate `query` and return a [`Paginator`] for manual paging.
    ///
    /// No request is sent until [`Paginator::fetch_next`] is called.
    fn paginate<Q: Serialize + ?Sized>(&self, query: &Q) -> Result<Paginator> {
        Paginator::new(self.transport()?.clone(), self.path(), query)
    }

    /// Fetch the first page of records matching `query`.
    async fn list<Q: Serialize + ?Sized>(&self, query: &Q) -> Result<Vec<Value>> {
        let mut pages = self.paginate(query)?;
        pages.fetch_next().await
    }

    /// Fetch one record.
    ///
    /// Returns [`BambuserError::NotFound`] if the server answers 404.
    async fn get_by_id(&self, id: &str) -> Result<Value> {
        let path = item_path(self.path(), id)?;
        let transport = self.transport()?;
        transport
            .execute_json(transport.request(Method::GET, &path))
            .await
    }

    /// Delete one record.
    async fn delete_by_id(&self, id: &str) -> Result<()> {
        let path = item_path(self.path(), id)?;
        let transport = self.transport()?;
        transport
            .execute(transport.request(Method::DELETE, &path))
            .await?;
        Ok(())
    }
}

/// A resource with only the shared operations.
pub struct Collection<'a> {
    transport: &'a TransportCell,
    path: &'static str,
}

impl<'a> Collection<'a> {
    pub(crate) fn new(transport: &'a TransportCell, path: &'static str) -> Self {
        Self { transport, path }
    }
}

impl Resource for Collection<'_> {
    fn transport(&self) -> Result<&Transport> {
        self.transport.get()
    }

    fn path(&self) -> &str {
        self.path
    }
}

/// The `/broadcasts` resource of a [`Client`].
///
/// Besides the shared [`Resource`] operations it can create clips, manage
/// tags, fetch download links and build signed player URLs.
pub struct Broadcasts<'a> {
    client: &'a Client,
}

impl Resource for Broadcasts<'_> {
    fn transport(&self) -> Result<&Transport> {
        self.client.transport()
    }

    fn path(&self) -> &str {
        "/broadcasts"
    }
}

impl<'a> Broadcasts<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Create a clip of `broadcast_id` spanning `start..end` seconds.
    ///
    /// Both offsets must be finite and non-negative, and `end` must be
    /// strictly greater than `start`. Returns the new broadcast record.
    pub async fn create_clip(&self, broadcast_id: &str, start: f64, end: f64) -> Result<Value> {
        require_id(broadcast_id, "broadcast id")?;
        require_offset(start, "start")?;
        require_offset(end, "end")?;
        if end <= start {
            return Err(BambuserError::InvalidArgument(
                "invalid start and end time: end must be larger than start".into(),
            ));
        }

        debug!("creating clip of {} from {} to {}", broadcast_id, start, end);

        let body = CreateClipRequest {
            source: ClipSource {
                broadcast_id,
                start,
                end,
            },
        };
        let transport = self.transport()?;
        transport
            .execute_json(transport.request(Method::POST, self.path()).json(&body))
            .await
    }

    /// Attach a text tag to a broadcast, optionally at a position.
    pub async fn add_tag(
        &self,
        broadcast_id: &str,
        text: &str,
        options: TagOptions,
    ) -> Result<Value> {
        let path = format!("{}/tags", item_path(self.path(), broadcast_id)?);
        let body = AddTagRequest {
            text,
            position: options,
        };
        let transport = self.transport()?;
        transport
            .execute_json(transport.request(Method::POST, &path).json(&body))
            .await
    }

    /// Remove one tag from a broadcast.
    pub async fn remove_tag(&self, broadcast_id: &str, tag_id: u64) -> Result<()> {
        let path = format!("{}/tags/{}", item_path(self.path(), broadcast_id)?, tag_id);
        let transport = self.transport()?;
        transport
            .execute(transport.request(Method::DELETE, &path))
            .await?;
        Ok(())
    }

    /// Remove every tag from a broadcast.
    pub async fn remove_all_tags(&self, broadcast_id: &str) -> Result<()> {
        let path = format!("{}/tags", item_path(self.path(), broadcast_id)?);
        let transport = self.transport()?;
        transport
            .execute(transport.request(Method::DELETE, &path))
            .await?;
        Ok(())
    }

    /// Fetch the download links of a broadcast.
    pub async fn get_download_link(&self, broadcast_id: &str) -> Result<Value> {
        let path = format!("{}/downloads", item_path(self.path(), broadcast_id)?);
        let transport = self.transport()?;
        transport
            .execute_json(transport.request(Method::GET, &path))
            .await
    }

    /// Build a web player URL for a broadcast with a signed resource URI.
    ///
    /// No request is sent. Requires signing keys on the client.
    pub fn player_url(&self, broadcast_id: &str, options: &SignOptions) -> Result<String> {
        require_id(broadcast_id, "broadcast id")?;
        let resource_uri = format!(
            "{}/broadcasts/{}",
            self.client.config().cdn_url.trim_end_matches('/'),
            urlencoding::encode(broadcast_id)
        );
        let signed = self.client.sign_resource_uri(&resource_uri, options)?;
        Ok(format!(
            "{}?resourceUri={}",
            self.client.config().player_base_url,
            urlencoding::encode(&signed)
        ))
    }
}

fn require_id(id: &str, what: &str) -> Result<()> {
    if id.is_empty() {
        return Err(BambuserError::InvalidArgument(format!("expected {what}")));
    }
    Ok(())
}

fn require_offset(value: f64, what: &str) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(BambuserError::InvalidArgument(format!(
            "expected {what} time as a non-negative number, got {value}"
        )));
    }
    Ok(())
}

/// `<collection>/<escaped id>`, rejecting empty ids.
fn item_path(collection: &str, id: &str) -> Result<String> {
    require_id(id, "resource id")?;
    Ok(format!("{}/{}", collection, urlencoding::encode(id)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_path_escapes_and_validates() {
        assert_eq!(item_path("/images", "abc").unwrap(), "/images/abc");
        assert_eq!(item_path("/images", "a/b").unwrap(), "/images/a%2Fb");
        assert!(matches!(
            item_path("/images", ""),
            Err(BambuserError::InvalidArgument(_))
        ));
    }

    #[test]
    fn offsets() {
        assert!(require_offset(0.0, "start").is_ok());
        assert!(require_offset(12.5, "start").is_ok());
        assert!(require_offset(-1.0, "start").is_err());
        assert!(require_offset(f64::NAN, "start").is_err());
        assert!(require_offset(f64::INFINITY, "end").is_err());
    }
}
