//! Acquire a real series from OKX.
//!
//! Requires network access and `OKX_API_KEY`, `OKX_API_SECRET`, and
//! `OKX_API_PASSPHRASE` in the environment.

use std::sync::Arc;

use vela::{Acquirer, Interval};
use vela_okx::{Credentials, OkxConnector};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let credentials = Credentials::from_env()?;
    let connector = OkxConnector::new(credentials)?;

    let acquirer = Acquirer::new(Arc::new(connector));
    let result = acquirer.acquire("BTC-USD-SWAP", Interval::Hour4, 512).await;

    println!(
        "acquired {} / {} records via {:?} (fill rate {:.1}%)",
        result.report.unique_records,
        result.report.target,
        result.report.strategy,
        result.report.fill_rate()
    );
    if let Some(continuity) = &result.report.continuity {
        println!(
            "continuity score: {:?} (grade {:?}), gaps: {}",
            continuity.score,
            continuity.grade,
            continuity.gap_events.len()
        );
    }
    for err in &result.report.strategy_errors {
        eprintln!("strategy diagnostic: {err}");
    }
    Ok(())
}
