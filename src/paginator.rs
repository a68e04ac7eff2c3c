use reqwest::Method;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::errors::{BambuserError, Result};
use crate::query::{to_pairs, validate_query};
use crate::transport::Transport;

/// Cursor-driven walker over one list endpoint.
///
/// Each [`fetch_next`](Self::fetch_next) issues one `GET` with the stored
/// cursor sent as `after`, returns the page's `results` and replaces the
/// cursor with the server's `next`, whatever it is. Once `next` comes back
/// empty the paginator is exhausted; calling `fetch_next` again re-issues the
/// query without a cursor, i.e. starts over from the first page. Stopping is
/// up to the caller (see [`is_exhausted`](Self::is_exhausted)).
///
/// # Example
///
/// ```no_run
/// use bambuser::{Client, Query, Resource};
///
/// # async fn example() -> bambuser::Result<()> {
/// let client = Client::new("api_key")?;
/// let mut pages = client.broadcasts().paginate(&Query::new().limit(50))?;
/// loop {
///     let page = pages.fetch_next().await?;
///     println!("{} broadcasts", page.len());
///     if pages.is_exhausted() {
///         break;
///     }
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Paginator {
    transport: Transport,
    endpoint: String,
    query: Map<String, Value>,
    cursor: Option<Value>,
    fetched: bool,
}

impl Paginator {
    /// Create a paginator for `endpoint` (relative to the transport's base URL).
    ///
    /// The query is validated against the accepted list parameters; an
    /// `after` value in it seeds the cursor for the first fetch.
    pub fn new<Q: Serialize + ?Sized>(
        transport: Transport,
        endpoint: impl Into<String>,
        query: &Q,
    ) -> Result<Self> {
        let mut query = validate_query(query)?;
        let cursor = query.remove("after").filter(|v| !v.is_null());

        Ok(Self {
            transport,
            endpoint: endpoint.into(),
            query,
            cursor,
            fetched: false,
        })
    }

    /// The cursor that the next fetch will send as `after`.
    pub fn cursor(&self) -> Option<&Value> {
        self.cursor.as_ref()
    }

    /// `true` once a page came back without a `next` cursor.
    pub fn is_exhausted(&self) -> bool {
        self.fetched && self.cursor.is_none()
    }

    /// Fetch one page and advance the cursor.
    ///
    /// # Errors
    ///
    /// - [`BambuserError::RateLimited`] on HTTP 429.
    /// - [`BambuserError::Protocol`] if the body has no `results` array.
    /// - [`BambuserError::NotFound`] / [`BambuserError::Api`] for other
    ///   non-2xx responses.
    pub async fn fetch_next(&mut self) -> Result<Vec<Value>> {
        if self.is_exhausted() {
            warn!(
                "fetching {} again after the last page; starting over from the first page",
                self.endpoint
            );
        }

        let mut query = self.query.clone();
        if let Some(cursor) = &self.cursor {
            query.insert("after".into(), cursor.clone());
        }

        debug!("fetching page of {} after {:?}", self.endpoint, self.cursor);

        let response = self
            .transport
            .request(Method::GET, &self.endpoint)
            .query(&to_pairs(&query))
            .send()
            .await?;

        let status = response.status();
        if status.as_u16() == 429 {
            warn!("rate limited while listing {}", self.endpoint);
            return Err(BambuserError::RateLimited);
        }

        let text = response.text().await?;
        let (results, next) = parse_page(&text)?;

        if !status.is_success() {
            warn!("API error ({}): {}", status.as_u16(), text);
            return Err(BambuserError::from_status(status.as_u16(), text));
        }

        self.cursor = next;
        self.fetched = true;
        Ok(results)
    }
}

/// Split a list response into its records and continuation cursor.
fn parse_page(text: &str) -> Result<(Vec<Value>, Option<Value>)> {
    let body: Value = serde_json::from_str(text)
        .map_err(|e| BambuserError::Protocol(format!("list response is not JSON: {e}")))?;

    let Value::Object(mut body) = body else {
        return Err(BambuserError::Protocol(
            "list response is not an object".into(),
        ));
    };

    let results = match body.remove("results") {
        Some(Value::Array(results)) => results,
        Some(_) => {
            return Err(BambuserError::Protocol(
                "`results` in list response is not an array".into(),
            ))
        }
        None => {
            return Err(BambuserError::Protocol(
                "list response has no `results`".into(),
            ))
        }
    };

    let next = body.remove("next").filter(|v| !v.is_null());
    Ok((results, next))
}
