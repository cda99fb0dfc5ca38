//! Shipping Quote Example
//!
//! Quotes a shipment against a fixture set and prints the ranked carriers.
//!
//! Use `-f` to load a fixture set by name
//! Use `-p` (and optionally `-a`) to choose the destination
//! Use `-w`, `-v` and `-n` to describe the shipment by its totals, or `-i LxWxHxKG` once per package

use std::{io, io::Write, time::Instant};

use anyhow::Result;
use clap::Parser;
use humanize_duration::{Truncate, prelude::DurationExt};
use tracing_subscriber::EnvFilter;

use shipquote::{fixtures::Fixture, report::QuoteReport, utils::ExampleQuoteArgs};

/// Shipping Quote Example
pub fn main() -> Result<()> {
    let args = ExampleQuoteArgs::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level)),
        )
        .with_writer(io::stderr)
        .init();

    let fixture = Fixture::from_set(&args.fixture)?;
    let quoter = fixture.quoter();

    let start = Instant::now();

    let quote = quoter.quote(&args.package_input(), &args.destination())?;

    let elapsed = start.elapsed();

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    QuoteReport::new(&quote, fixture.policy()).write_to(&mut handle)?;

    writeln!(
        handle,
        " {} ({}s)",
        elapsed.human(Truncate::Nano),
        elapsed.as_secs_f32()
    )?;

    Ok(())
}
