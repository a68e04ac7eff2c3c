//! Quick-start examples for the Bambuser Rust client.
//!
//! Run with:
//!   BAMBUSER_API_KEY=... BAMBUSER_DA_ID=... BAMBUSER_DA_SECRET=... \
//!     cargo run --example quickstart
//!
//! Set `RUST_LOG=bambuser=debug` to see every request.

use bambuser::{ClientBuilder, Query, Resource, SignOptions, TagOptions};

#[tokio::main]
async fn main() -> bambuser::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // -----------------------------------------------------------------------
    // 1. Create a client (reads BAMBUSER_* from the environment)
    // -----------------------------------------------------------------------
    let client = ClientBuilder::from_env().build()?;

    // Or provide the key directly:
    // let client = bambuser::Client::new("your_api_key")?;

    // -----------------------------------------------------------------------
    // 2. List the latest broadcasts
    // -----------------------------------------------------------------------
    let broadcasts = client.broadcasts();
    let latest = broadcasts.list(&Query::new().limit(5)).await?;
    for b in &latest {
        println!("  {} | {}", b["id"], b["title"]);
    }
    println!();

    // -----------------------------------------------------------------------
    // 3. Walk every broadcast tagged "demo", page by page
    // -----------------------------------------------------------------------
    let mut pages = broadcasts.paginate(&Query::new().has_any_tags("demo").limit(50))?;
    let mut total = 0;
    loop {
        let page = pages.fetch_next().await?;
        total += page.len();
        if pages.is_exhausted() {
            break;
        }
    }
    println!("{total} broadcasts tagged demo");
    println!();

    let Some(id) = latest.first().and_then(|b| b["id"].as_str()) else {
        println!("No broadcasts yet.");
        return Ok(());
    };

    // -----------------------------------------------------------------------
    // 4. Clip the first ten seconds and tag the clip
    // -----------------------------------------------------------------------
    let clip = broadcasts.create_clip(id, 0.0, 10.0).await?;
    println!("Created clip {}", clip["id"]);

    if let Some(clip_id) = clip["id"].as_str() {
        let tag = broadcasts
            .add_tag(
                clip_id,
                "highlight",
                TagOptions {
                    position_start: Some(2.0),
                    position_end: None,
                },
            )
            .await?;
        println!("Tagged clip: {}", tag);
    }

    // -----------------------------------------------------------------------
    // 5. Download link and a signed player URL valid for one hour
    // -----------------------------------------------------------------------
    let downloads = broadcasts.get_download_link(id).await?;
    println!("Downloads: {downloads}");

    if client.config().da_id.is_some() {
        let url = broadcasts.player_url(id, &SignOptions::with_ttl(3600))?;
        println!("Player: {url}");
    }

    Ok(())
}
