//! Staged pre-change validation.
//!
//! A run builds the documentation and issue models, then walks the gates in
//! [`STAGE_ORDER`]. The first gate with something to report ends the run with
//! its [`PipelineOutcome`]; if none does, the plan is assembled and the run
//! ends waiting for approval. Nothing is retried within a run.
//!
//! ```rust
//! use preflight::config::PreflightConfig;
//! use preflight::io::MemoryProject;
//! use preflight::pipeline::{Pipeline, PipelineOutcome};
//!
//! let project = MemoryProject::new();
//! let config = PreflightConfig::default();
//! let run = Pipeline::new(&config)
//!     .run(&project, "Add endpoint POST /users/{id}/export - exports personal data, #42")
//!     .unwrap();
//!
//! assert!(matches!(run.outcome, PipelineOutcome::NeedsClarification(_)));
//! assert_eq!(run.issue.number.as_deref(), Some("42"));
//! ```

pub mod breaking;
pub mod clarification;
pub mod controller;
pub mod outcome;
pub mod plan;
pub mod stage;

pub use controller::{gates, Pipeline, PipelineRun};
pub use outcome::{
    BreakingChange, BreakingChangeRequest, ClarificationQuestion, ClarificationRequest,
    DocFixRequest, PipelineOutcome, Plan, PolicyUsage, QuestionTopic, TriageChoice,
    TriageRequest,
};
pub use stage::{RunContext, Stage, StageKind, STAGE_ORDER};
