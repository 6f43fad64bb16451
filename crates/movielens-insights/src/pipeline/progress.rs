//! Progress reporting for the analysis pipeline.
//!
//! # Example
//!
//! ```rust,ignore
//! use movielens_insights::Pipeline;
//!
//! let report = Pipeline::builder()
//!     .on_progress(|update| {
//!         println!("[{:.0}%] {}", update.progress * 100.0, update.message);
//!     })
//!     .build()?
//!     .run(&source)?;
//! ```

use serde::{Deserialize, Serialize};

/// Stages of an analysis run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisStage {
    /// Validating configuration
    Initializing,
    /// Reading the input tables
    Loading,
    /// Counting nulls per column
    NullAudit,
    /// Taking the first rows of each table
    Preview,
    /// Most common tag per title
    TagAggregation,
    /// Most common genre per user
    GenreAggregation,
    /// Run finished successfully
    Complete,
    /// Run aborted with an error
    Failed,
}

impl AnalysisStage {
    /// Every non-terminal stage, in execution order.
    pub const PIPELINE: [AnalysisStage; 6] = [
        Self::Initializing,
        Self::Loading,
        Self::NullAudit,
        Self::Preview,
        Self::TagAggregation,
        Self::GenreAggregation,
    ];

    /// Returns a human-readable name for the stage.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Initializing => "Initializing",
            Self::Loading => "Loading Tables",
            Self::NullAudit => "Auditing Nulls",
            Self::Preview => "Previewing Tables",
            Self::TagAggregation => "Ranking Tags",
            Self::GenreAggregation => "Ranking Genres",
            Self::Complete => "Complete",
            Self::Failed => "Failed",
        }
    }

    /// Share of the whole run spent in this stage (0.0 - 1.0).
    ///
    /// Non-terminal stages sum to 1.0.
    pub fn weight(&self) -> f32 {
        match self {
            Self::Initializing => 0.02,
            Self::Loading => 0.40,
            Self::NullAudit => 0.08,
            Self::Preview => 0.05,
            Self::TagAggregation => 0.20,
            Self::GenreAggregation => 0.25,
            Self::Complete => 0.0,
            Self::Failed => 0.0,
        }
    }

    /// Cumulative progress at the start of this stage.
    pub fn base_progress(&self) -> f32 {
        match self {
            Self::Initializing => 0.0,
            Self::Loading => 0.02,
            Self::NullAudit => 0.42,
            Self::Preview => 0.50,
            Self::TagAggregation => 0.55,
            Self::GenreAggregation => 0.75,
            Self::Complete => 1.0,
            Self::Failed => 0.0,
        }
    }
}

/// One progress notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressUpdate {
    pub stage: AnalysisStage,

    /// Optional detail such as the table being loaded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_stage: Option<String>,

    /// Overall progress (0.0 - 1.0)
    pub progress: f32,

    /// Progress within current stage (0.0 - 1.0)
    pub stage_progress: f32,

    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub items_processed: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub items_total: Option<usize>,
}

impl ProgressUpdate {
    /// Update for `stage` at `stage_progress` of the way through it.
    pub fn new(stage: AnalysisStage, stage_progress: f32, message: impl Into<String>) -> Self {
        let progress = stage.base_progress() + (stage.weight() * stage_progress);
        Self {
            stage,
            sub_stage: None,
            progress: progress.clamp(0.0, 1.0),
            stage_progress: stage_progress.clamp(0.0, 1.0),
            message: message.into(),
            items_processed: None,
            items_total: None,
        }
    }

    /// Update for item `current` of `total` within `stage`.
    pub fn with_items(
        stage: AnalysisStage,
        sub_stage: impl Into<String>,
        current: usize,
        total: usize,
        message: impl Into<String>,
    ) -> Self {
        let stage_progress = if total > 0 {
            current as f32 / total as f32
        } else {
            0.0
        };
        Self {
            sub_stage: Some(sub_stage.into()),
            items_processed: Some(current),
            items_total: Some(total),
            ..Self::new(stage, stage_progress, message)
        }
    }

    pub fn complete(message: impl Into<String>) -> Self {
        Self {
            progress: 1.0,
            stage_progress: 1.0,
            ..Self::new(AnalysisStage::Complete, 1.0, message)
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            progress: 0.0,
            stage_progress: 0.0,
            ..Self::new(AnalysisStage::Failed, 0.0, message)
        }
    }
}

/// Receives progress updates during a run.
///
/// Implementations must be `Send + Sync` so a run can happen on a worker
/// thread while updates are consumed elsewhere.
pub trait ProgressReporter: Send + Sync {
    fn report(&self, update: ProgressUpdate);
}

/// [`ProgressReporter`] backed by a closure.
pub struct ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    callback: F,
}

impl<F> ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> ProgressReporter for ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    fn report(&self, update: ProgressUpdate) {
        (self.callback)(update);
    }
}

static_assertions::assert_impl_all!(ProgressUpdate: Send, Sync);
