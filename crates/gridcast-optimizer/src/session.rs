// Multi-blend sessions: one independent optimization per scoring blend.

use std::sync::Arc;
use tracing::debug;

use gridcast_core::blend::ScoringBlend;
use gridcast_core::candidate::CandidateRow;

use crate::engine::{Optimizer, SolvedRoster};
use crate::error::OptimizeError;
use crate::request::SelectionRequest;
use crate::solver::Solver;

/// Primary projection only, then two blends leaning on the recent average.
pub const DEFAULT_BLENDS: [ScoringBlend; 3] = [
    ScoringBlend::PRIMARY_ONLY,
    ScoringBlend {
        projection_weight: 0.9,
        average_weight: 0.1,
    },
    ScoringBlend {
        projection_weight: 0.8,
        average_weight: 0.2,
    },
];

/// One blend's roster, or why it could not be built.
#[derive(Debug)]
pub struct BlendOutcome {
    pub blend: ScoringBlend,
    pub result: Result<SolvedRoster, OptimizeError>,
}

/// The request for a given blend. The primary-only blend means "no blend".
fn request_for(base: &SelectionRequest, blend: ScoringBlend) -> SelectionRequest {
    SelectionRequest {
        scoring_blend: (!blend.is_primary_only()).then_some(blend),
        ..base.clone()
    }
}

/// Solve one roster per blend, sequentially, in the given order.
pub fn optimize_blends<S: Solver>(
    optimizer: &Optimizer<S>,
    rows: &[CandidateRow],
    request: &SelectionRequest,
    blends: &[ScoringBlend],
) -> Vec<BlendOutcome> {
    blends
        .iter()
        .map(|&blend| BlendOutcome {
            blend,
            result: optimizer.optimize(rows, &request_for(request, blend)),
        })
        .collect()
}

/// Solve one roster per blend concurrently on tokio's blocking pool.
///
/// Outcomes come back in the order of `blends`. A task that panics yields
/// `TaskFailed` for its blend only.
pub async fn optimize_blends_parallel<S: Solver + 'static>(
    optimizer: Arc<Optimizer<S>>,
    rows: Arc<[CandidateRow]>,
    request: &SelectionRequest,
    blends: &[ScoringBlend],
) -> Vec<BlendOutcome> {
    let handles: Vec<_> = blends
        .iter()
        .map(|&blend| {
            let optimizer = Arc::clone(&optimizer);
            let rows = Arc::clone(&rows);
            let request = request_for(request, blend);
            let handle =
                tokio::task::spawn_blocking(move || optimizer.optimize(&rows, &request));
            (blend, handle)
        })
        .collect();

    debug!("spawned {} blend tasks", handles.len());

    let mut outcomes = Vec::with_capacity(handles.len());
    for (blend, handle) in handles {
        let result = match handle.await {
            Ok(result) => result,
            Err(e) => Err(OptimizeError::TaskFailed(e.to_string())),
        };
        outcomes.push(BlendOutcome { blend, result });
    }
    outcomes
}
