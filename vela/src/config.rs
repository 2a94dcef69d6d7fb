use serde::{Deserialize, Serialize};
use vela_core::CursorParam;

/// Tunables for the multi-strategy acquirer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcquirerConfig {
    /// Hard bound on historical batches per backward walk; guards against an
    /// endpoint that keeps answering without ever extending coverage.
    pub batch_ceiling: u32,
    /// Candidate page sizes for the probing strategy, tried in order.
    pub probe_limits: Vec<u32>,
    /// Which query parameter carries the watermark on the historical
    /// endpoint; validate empirically against the real upstream.
    pub cursor_param: CursorParam,
    /// Relative tolerance band for the continuity pass over the final window.
    pub tolerance: f64,
}

impl Default for AcquirerConfig {
    fn default() -> Self {
        Self {
            batch_ceiling: 5,
            probe_limits: vec![500, 400, 350],
            cursor_param: CursorParam::default(),
            tolerance: 0.1,
        }
    }
}
