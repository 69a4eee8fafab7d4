//! Profile command - fetches a user's profile from the identity service.

use anyhow::{Context as _, Result};
use clap::Args;

use super::Context;

/// Arguments for the profile command.
#[derive(Args, Debug)]
pub struct ProfileArgs {
    /// User whose profile to fetch
    pub user_id: i64,
}

/// Run the profile command.
pub async fn run(args: ProfileArgs, ctx: &Context) -> Result<()> {
    let client = warden_client::ProfileClient::builder()
        .base_url(&ctx.loaded.settings.profile_base_url)
        .build()?;

    let profile = client
        .fetch_user_profile(args.user_id)
        .await
        .with_context(|| format!("failed to fetch profile for user {}", args.user_id))?;

    if ctx.json_output {
        println!("{}", serde_json::to_string(&profile)?);
    } else {
        println!("{}", serde_json::to_string_pretty(&profile)?);
    }

    Ok(())
}
