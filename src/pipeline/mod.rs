mod aggregate;
mod orchestrator;
mod state;

pub use orchestrator::Pipeline;
pub use state::{
    AggregateUpdate, AnalysisKind, AnalysisUpdate, ContextUpdate, ReviewState, StageId,
    StageStatus, StageUpdate,
};
