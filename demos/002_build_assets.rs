//! Generate the crew asset map.
//!
//! Demonstrates:
//! - Configuring the transformer with explicit paths
//! - Running load, filter and write in one call
//!
//! Usage:
//!   cargo run --example 002_build_assets
//!   cargo run --example 002_build_assets -- --debug

mod common;

// ============================================================================
// Imports
// ============================================================================

use common::Args;
use datacore_tools::transform::{self, DEFAULT_CDN_BASE, TransformConfig};
use datacore_tools::Result;

// ============================================================================
// Constants
// ============================================================================

const INPUT_PATH: &str = "../website/static/structured/crew.json";
const OUTPUT_PATH: &str = "data/assets.json";
const THRESHOLD: u32 = 3;

// ============================================================================
// Main
// ============================================================================

fn main() {
    let args = Args::parse();
    common::init_logging(args.debug);

    if let Err(e) = run() {
        eprintln!("\n[ERROR] {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    println!("=== 002: Build Assets ===\n");
    println!("    Input:     {INPUT_PATH}");
    println!("    Output:    {OUTPUT_PATH}");
    println!("    Threshold: > {THRESHOLD}\n");

    let config = TransformConfig::builder()
        .input(INPUT_PATH)
        .output(OUTPUT_PATH)
        .threshold(THRESHOLD)
        .cdn_base(DEFAULT_CDN_BASE)
        .build()?;

    let report = transform::run(&config)?;

    println!(
        "    ✓ {} of {} crew written",
        report.assets_written, report.records_read
    );

    Ok(())
}
