//! Local stand-in for the recognition endpoint.
//!
//! Answers every `BOTH<url>` message with a JSON acknowledgement and echoes
//! anything else, so `001_reply_client` can run without the real service.
//!
//! Usage:
//!   cargo run --example 003_reply_server
//!   cargo run --example 003_reply_server -- --debug

mod common;

// ============================================================================
// Imports
// ============================================================================

use common::Args;
use datacore_tools::protocol::TAG_BOTH;
use datacore_tools::{ReplyServer, Result, TaggedMessage};
use serde_json::json;

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() {
    let args = Args::parse();
    common::init_logging(args.debug);

    if let Err(e) = run().await {
        eprintln!("\n[ERROR] {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    println!("=== 003: Reply Server ===\n");

    let server = ReplyServer::bind_default().await?;
    println!("    Listening on {}", server.ws_url());
    println!("    Press Ctrl+C to exit...\n");

    tokio::select! {
        result = server.serve(respond) => result,
        _ = tokio::signal::ctrl_c() => Ok(()),
    }
}

fn respond(message: String) -> String {
    match TaggedMessage::parse(&message, TAG_BOTH) {
        Some(tagged) => json!({ "command": tagged.tag, "url": tagged.body }).to_string(),
        None => message,
    }
}
