//! The analysis pipeline and its builder.

use crate::aggregate::RankedAggregator;
use crate::audit::NullAuditor;
use crate::config::{AnalysisConfig, ConfigValidationError};
use crate::error::{Result, ResultExt};
use crate::pipeline::progress::{
    AnalysisStage, ClosureProgressReporter, ProgressReporter, ProgressUpdate,
};
use crate::reporting::{AnalysisReport, TablePreview};
use crate::source::{CsvDirectorySource, MovieLensTables, TableKind, TableSource};
use crate::types::TableSummary;
use polars::prelude::DataFrame;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};

/// Loads the MovieLens tables, audits them and runs both ranked
/// aggregations.
///
/// # Example
///
/// ```rust,ignore
/// use movielens_insights::{AnalysisConfig, Pipeline};
///
/// let config = AnalysisConfig::builder().data_dir("data/ml-latest-small").build()?;
/// let report = Pipeline::builder()
///     .config(config)
///     .on_progress(|update| println!("{}", update.message))
///     .build()?
///     .run_directory()?;
/// ```
pub struct Pipeline {
    config: AnalysisConfig,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
    aggregator: RankedAggregator,
}

static_assertions::assert_impl_all!(Pipeline: Send, Sync);

impl Pipeline {
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::default()
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Run against the CSV directory named by the configuration.
    pub fn run_directory(&self) -> Result<AnalysisReport> {
        self.run(&CsvDirectorySource::from_config(&self.config))
    }

    /// Run against any table source.
    ///
    /// Any failure aborts the run; no partial report is produced.
    pub fn run(&self, source: &dyn TableSource) -> Result<AnalysisReport> {
        match self.run_internal(source) {
            Ok(report) => {
                self.report_progress(ProgressUpdate::complete("Analysis completed successfully"));
                Ok(report)
            }
            Err(e) => {
                self.report_progress(ProgressUpdate::failed(e.to_string()));
                error!("Analysis failed: {}", e);
                Err(e)
            }
        }
    }

    fn report_progress(&self, update: ProgressUpdate) {
        if let Some(reporter) = &self.progress_reporter {
            reporter.report(update);
        }
    }

    fn run_internal(&self, source: &dyn TableSource) -> Result<AnalysisReport> {
        let start_time = Instant::now();

        info!("Starting MovieLens analysis...");
        self.report_progress(ProgressUpdate::new(
            AnalysisStage::Initializing,
            0.0,
            "Starting analysis...",
        ));

        // Step 1: Load
        let (tables, summaries) = self.load_tables(source)?;

        // Step 2: Null audit (diagnostic only)
        self.report_progress(ProgressUpdate::new(
            AnalysisStage::NullAudit,
            0.0,
            "Counting null values...",
        ));
        let null_audits: Vec<_> = TableKind::ALL
            .iter()
            .map(|kind| NullAuditor::audit(tables.get(*kind), kind.label()))
            .collect();
        for audit in &null_audits {
            info!(
                "Null audit of {}: {} nulls across {} columns",
                audit.label,
                audit.total_nulls(),
                audit.columns.len()
            );
        }

        // Step 3: Previews
        self.report_progress(ProgressUpdate::new(
            AnalysisStage::Preview,
            0.0,
            format!("Taking first {} rows of each table...", self.config.preview_rows),
        ));
        let previews = TableKind::ALL
            .iter()
            .map(|kind| TablePreview::new(kind.label(), tables.get(*kind), self.config.preview_rows))
            .collect();

        // Step 4: Most common tag per title
        self.report_progress(ProgressUpdate::new(
            AnalysisStage::TagAggregation,
            0.0,
            "Ranking tags per title...",
        ));
        let most_common_tags = self
            .aggregator
            .most_common_tag_per_title(&tables.tags, &tables.movies)
            .context("most common tag per title")?;

        // Step 5: Most common genre per user
        self.report_progress(ProgressUpdate::new(
            AnalysisStage::GenreAggregation,
            0.0,
            "Ranking genres per user...",
        ));
        let most_common_genres = self
            .aggregator
            .most_common_genre_per_user(&tables.ratings, &tables.movies)
            .context("most common genre per user")?;

        let duration_ms = start_time.elapsed().as_millis() as u64;
        info!("Analysis finished in {} ms", duration_ms);

        Ok(AnalysisReport {
            generated_at: AnalysisReport::timestamp(),
            duration_ms,
            tables: summaries,
            null_audits,
            previews,
            most_common_tags,
            most_common_genres,
        })
    }

    fn load_tables(&self, source: &dyn TableSource) -> Result<(MovieLensTables, Vec<TableSummary>)> {
        let mut summaries = Vec::with_capacity(TableKind::ALL.len());
        let tables = MovieLensTables {
            ratings: self.load_table(source, TableKind::Ratings, &mut summaries)?,
            tags: self.load_table(source, TableKind::Tags, &mut summaries)?,
            movies: self.load_table(source, TableKind::Movies, &mut summaries)?,
        };
        Ok((tables, summaries))
    }

    fn load_table(
        &self,
        source: &dyn TableSource,
        kind: TableKind,
        summaries: &mut Vec<TableSummary>,
    ) -> Result<DataFrame> {
        let described = source.describe(kind);
        self.report_progress(ProgressUpdate::with_items(
            AnalysisStage::Loading,
            kind.label(),
            summaries.len(),
            TableKind::ALL.len(),
            format!("Loading {}...", described),
        ));
        info!("Loading {} from {}", kind.label(), described);

        let df = source.load(kind)?;
        for column in kind.expected_columns() {
            if df.column(column).is_err() {
                warn!("{} table has no '{}' column", kind.label(), column);
            }
        }
        summaries.push(TableSummary {
            label: kind.label().to_string(),
            source: described,
            rows: df.height(),
            columns: df
                .get_column_names()
                .iter()
                .map(|name| name.to_string())
                .collect(),
        });
        Ok(df)
    }
}

/// Builder for [`Pipeline`].
#[derive(Default)]
pub struct PipelineBuilder {
    config: Option<AnalysisConfig>,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
}

static_assertions::assert_impl_all!(PipelineBuilder: Send);

impl PipelineBuilder {
    pub fn config(mut self, config: AnalysisConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set a custom progress reporter.
    pub fn progress_reporter(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.progress_reporter = Some(reporter);
        self
    }

    /// Set a progress callback closure.
    pub fn on_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(ProgressUpdate) + Send + Sync + 'static,
    {
        self.progress_reporter = Some(Arc::new(ClosureProgressReporter::new(callback)));
        self
    }

    /// Build the pipeline.
    ///
    /// Returns an error if the configuration is invalid.
    pub fn build(self) -> std::result::Result<Pipeline, ConfigValidationError> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        let aggregator = RankedAggregator::new(&config);
        Ok(Pipeline {
            config,
            progress_reporter: self.progress_reporter,
            aggregator,
        })
    }
}
