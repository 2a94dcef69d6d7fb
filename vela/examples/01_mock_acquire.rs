use std::sync::Arc;

use vela::{Acquirer, Interval};
use vela_mock::{MockBehavior, MockSource, fixtures};

const STEP: i64 = 4 * 3600;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    // Script an upstream: a 300-row live window plus one earlier historical
    // batch, forcing the backward walk to do the work.
    let source = MockSource::new();
    let live = fixtures::series_newest_first(250 * STEP, STEP, 300);
    source.push_live(MockBehavior::Return(live.clone()));
    source.push_live(MockBehavior::Return(live));
    source.push_historical(MockBehavior::Return(fixtures::series_newest_first(0, STEP, 250)));

    let acquirer = Acquirer::new(Arc::new(source));
    let result = acquirer.acquire("BTC-USD-SWAP", Interval::Hour4, 512).await;

    println!(
        "acquired {} / {} records via {:?}",
        result.report.unique_records, result.report.target, result.report.strategy
    );
    if let Some(continuity) = &result.report.continuity {
        println!(
            "continuity: score={:?} gaps={} overlaps={} duplicates={}",
            continuity.score,
            continuity.gap_events.len(),
            continuity.overlap_events.len(),
            continuity.duplicate_count
        );
    }
    println!(
        "window: {:?} .. {:?}",
        result.window.first_time(),
        result.window.last_time()
    );
}
