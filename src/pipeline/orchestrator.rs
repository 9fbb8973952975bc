//! Runs the stage graph: context, then the three analysis stages
//! concurrently, then aggregation as a barrier join.
//!
//! Stage bodies receive a frozen snapshot of the shared state and hand back
//! partial updates; only this orchestrator applies them, one at a time, so
//! concurrent stages can never race on a field. A failing (or panicking)
//! stage is recorded and disclosed, never fatal: the run always ends with a
//! postable report.

use crate::input::RunInput;
use crate::pipeline::aggregate::aggregate;
use crate::pipeline::state::{
    AggregateUpdate, AnalysisKind, AnalysisUpdate, ContextUpdate, ReviewState, StageId,
    StageStatus, StageUpdate,
};
use crate::provider::{Analyst, ContextSource};
use futures::stream::{FuturesUnordered, StreamExt};
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

pub struct Pipeline {
    context: Arc<dyn ContextSource>,
    analyst: Arc<dyn Analyst>,
}

impl Pipeline {
    pub fn new(context: Arc<dyn ContextSource>, analyst: Arc<dyn Analyst>) -> Self {
        Self { context, analyst }
    }

    /// Run one review. Infallible by design: stage failures degrade the
    /// report instead of propagating.
    pub async fn run(&self, input: RunInput) -> ReviewState {
        let run_id = Uuid::new_v4();
        info!(
            "Starting review run {} ({} changed files)",
            run_id,
            input.changed_files.len()
        );

        let mut state = ReviewState::new(input);

        // Context stage: sole predecessor of the analysis group
        state.mark_processing(StageId::Context);
        let update = self.run_context_stage(&state).await;
        state.apply(StageUpdate::Context(update));

        // Analysis stages: independent concurrent tasks over a frozen
        // snapshot taken after the context merge
        for kind in AnalysisKind::ALL {
            state.mark_processing(kind.stage());
        }
        let snapshot = Arc::new(state.clone());

        let mut futures = FuturesUnordered::new();
        for kind in AnalysisKind::ALL {
            let snapshot = snapshot.clone();
            let analyst = self.analyst.clone();
            let handle =
                tokio::spawn(async move { run_analysis_stage(kind, &snapshot, analyst).await });
            futures.push(async move { (kind, handle.await) });
        }

        // Merge each update as its stage finishes; the loop draining to
        // empty is the barrier before aggregation
        while let Some((kind, joined)) = futures.next().await {
            let update = match joined {
                Ok(update) => update,
                Err(e) => {
                    warn!("{} stage task panicked: {}", kind.display_name(), e);
                    AnalysisUpdate::failed(
                        kind,
                        format!("{} analysis panicked: {}", kind.display_name(), e),
                    )
                }
            };

            match update.status {
                StageStatus::Completed => debug!(
                    "{} analysis completed ({} chars)",
                    kind.display_name(),
                    update.text.len()
                ),
                _ => warn!("{} analysis did not complete", kind.display_name()),
            }

            state.apply(StageUpdate::Analysis(update));
        }

        // Aggregation stage: reads everything, owns the report fields
        debug_assert!(AnalysisKind::ALL
            .iter()
            .all(|kind| state.status(kind.stage()).is_terminal()));
        state.mark_processing(StageId::Aggregator);
        let update = match aggregate(&state) {
            Ok(update) => update,
            Err(e) => {
                warn!("Aggregation failed, emitting degraded report: {}", e);
                AggregateUpdate::degraded(e)
            }
        };
        state.apply(StageUpdate::Aggregate(update));

        info!(
            "Review run {} finished: {} issues, aggregation {}",
            run_id, state.total_issues, state.aggregator_status
        );
        state
    }

    async fn run_context_stage(&self, state: &ReviewState) -> ContextUpdate {
        match self.context.fetch(&state.changed_files).await {
            Ok(bundle) => {
                let mut update = ContextUpdate::completed(bundle.snippets, bundle.summary);
                if update.summary.is_empty() {
                    update
                        .warnings
                        .push("context stage returned an empty summary".to_string());
                }
                update
            }
            Err(e) => ContextUpdate::failed(format!("Context fetcher failed: {}", e)),
        }
    }
}

async fn run_analysis_stage(
    kind: AnalysisKind,
    state: &ReviewState,
    analyst: Arc<dyn Analyst>,
) -> AnalysisUpdate {
    debug!("Running {} analysis via {}", kind.display_name(), analyst.name());

    match analyst.analyze(kind, state).await {
        Ok(text) => AnalysisUpdate::completed(kind, text),
        Err(e) => {
            AnalysisUpdate::failed(kind, format!("{} analysis failed: {}", kind.display_name(), e))
        }
    }
}
