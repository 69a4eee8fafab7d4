//! Validate command - resolves a session identifier.

use anyhow::{Result, bail};
use clap::Args;
use console::Style;

use super::Context;

/// Arguments for the validate command.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Session identifier to check
    pub session_id: String,
}

/// Run the validate command.
///
/// Fails (exit code 1) when the session is unknown, unreadable or expired.
pub async fn run(args: ValidateArgs, ctx: &Context) -> Result<()> {
    let store = ctx.session_store();

    let Some(record) = store.validate_session(&args.session_id).await else {
        bail!("session not found: {}", args.session_id);
    };

    if ctx.json_output {
        println!("{}", serde_json::to_string_pretty(&record)?);
    } else {
        let dim = Style::new().dim();
        let green = Style::new().green();

        println!("  {} {}", dim.apply_to("Status:"), green.apply_to("● valid"));
        println!("  {} {}", dim.apply_to("Session:"), record.id);
        println!("  {} {}", dim.apply_to("User:"), record.user_id);
        println!("  {} {}", dim.apply_to("Created:"), record.created_at.to_rfc3339());
        println!("  {} {}", dim.apply_to("Expires:"), record.expires_at.to_rfc3339());
    }

    Ok(())
}
