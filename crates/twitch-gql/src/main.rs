use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use futures::{StreamExt, TryStreamExt};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use twitch_gql::{ClientConfig, TwitchClient, User};

const SHOWN_FOLLOWERS: usize = 10;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let login = std::env::args()
        .nth(1)
        .context("Usage: twitch-gql <login>")?;

    let config = ClientConfig::load()?;
    let client = TwitchClient::with_config(config);

    let Some(user) = client.fetch_user(None, Some(&login)).await? else {
        anyhow::bail!("No user named {login}");
    };
    println!("{} ({})", user.login, user.id);

    if let Some(count) = client.fetch_user_followers_count(Some(user.id), None).await? {
        println!("{count} followers");
    }

    let followers: Vec<(DateTime<Utc>, User)> = client
        .fetch_user_followers(Some(user.id), None, None)?
        .take(SHOWN_FOLLOWERS)
        .try_collect()
        .await?;
    for (followed_at, follower) in followers {
        println!("  {}  {}", followed_at.format("%Y-%m-%d %H:%M"), follower.login);
    }

    client.close();
    Ok(())
}
