//! Send two image requests to a running recognition endpoint.
//!
//! Demonstrates:
//! - Opening a connection with a single attempt
//! - Sending tagged messages and awaiting one reply each
//!
//! Usage:
//!   cargo run --example 001_reply_client
//!   cargo run --example 001_reply_client -- --debug

mod common;

// ============================================================================
// Imports
// ============================================================================

use common::Args;
use datacore_tools::{Connection, Result, TaggedMessage};

// ============================================================================
// Constants
// ============================================================================

const ENDPOINT: &str = "ws://localhost:5001/";

const IMAGE_URL: &str = "https://cdn.discordapp.com/attachments/296001137809686528/732071634352996373/image0.png";

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
    println!("=== 001: Reply Client ===\n");

    println!("[1] Connecting to {ENDPOINT}...");
    let connection = Connection::open(ENDPOINT).await?;
    println!("    ✓ Connected ({})\n", connection.id());

    for round in 1..=2 {
        println!("[{}] Sending BOTH request...", round + 1);
        let reply = connection
            .send_and_await_reply(TaggedMessage::both(IMAGE_URL))
            .await?;
        println!("    {reply}\n");
    }

    connection.close();
    println!("=== Done ===");

    Ok(())
}
