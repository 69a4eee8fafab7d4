//! Create command - mints a session for a user.

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use super::Context;

/// Arguments for the create command.
#[derive(Args, Debug)]
pub struct CreateArgs {
    /// User the session belongs to
    pub user_id: i64,
}

#[derive(Debug, Serialize)]
struct CreateOutput {
    session_id: String,
    user_id: i64,
    durable: bool,
}

/// Run the create command.
pub async fn run(args: CreateArgs, ctx: &Context) -> Result<()> {
    let store = ctx.session_store();
    let id = store.create_session(args.user_id).await;
    let durable = store.stats().persist_failures == 0;

    if ctx.json_output {
        let output = CreateOutput {
            session_id: id.to_string(),
            user_id: args.user_id,
            durable,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{}", id);
        if !durable {
            eprintln!(
                "warning: session was not written to {}; it will not survive this process",
                ctx.loaded.settings.sessions_dir.display()
            );
        }
    }

    Ok(())
}
