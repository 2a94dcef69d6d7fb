use std::sync::Arc;

use vela::{Acquirer, Interval};
use vela_core::window_to_dataframe;
use vela_mock::{MockBehavior, MockSource, fixtures};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let source = MockSource::new();
    source.push_live(MockBehavior::Return(fixtures::series(0, 4 * 3600, 256)));

    let acquirer = Acquirer::new(Arc::new(source));
    let result = acquirer.acquire("BTC-USD-SWAP", Interval::Hour4, 256).await;

    // The tabular artifact handed to training/prediction collaborators.
    let df = window_to_dataframe(&result.window)?;
    println!(
        "DataFrame shape: {} rows x {} cols",
        df.height(),
        df.width()
    );
    println!("{}", df.head(Some(5)));
    Ok(())
}
