//! Partitioning plan for the grouping stage.

use crate::config::AnalysisConfig;
use std::hash::{DefaultHasher, Hash, Hasher};

/// Rows a single partition should hold before adaptive execution adds
/// another one.
pub const ROWS_PER_ADAPTIVE_PARTITION: usize = 4096;

/// How grouped rows are spread over hash partitions.
///
/// Every row with the same partition key lands in the same shard, so a
/// shard can rank its keys without looking at any other shard. The number
/// of shards changes speed, never results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutionPlan {
    partitions: usize,
}

impl ExecutionPlan {
    /// Plan for `rows` grouped rows under `config`.
    ///
    /// With adaptive execution the configured count is an upper bound and
    /// small inputs are coalesced into fewer partitions.
    pub fn for_rows(config: &AnalysisConfig, rows: usize) -> Self {
        let max_partitions = config.partition_count.max(1);
        let partitions = if config.adaptive_execution {
            rows.div_ceil(ROWS_PER_ADAPTIVE_PARTITION)
                .clamp(1, max_partitions)
        } else {
            max_partitions
        };
        Self { partitions }
    }

    /// A plan with exactly `partitions` shards (at least one).
    pub fn with_partitions(partitions: usize) -> Self {
        Self {
            partitions: partitions.max(1),
        }
    }

    pub fn partitions(&self) -> usize {
        self.partitions
    }

    /// Shard index for a partition key. Stable within one build.
    pub fn shard_of(&self, key: &str) -> usize {
        if self.partitions == 1 {
            return 0;
        }
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        (hasher.finish() % self.partitions as u64) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(adaptive: bool, partitions: usize) -> AnalysisConfig {
        AnalysisConfig::builder()
            .adaptive_execution(adaptive)
            .partition_count(partitions)
            .build()
            .unwrap()
    }

    #[test]
    fn test_fixed_plan_uses_configured_count() {
        let plan = ExecutionPlan::for_rows(&config(false, 8), 10);
        assert_eq!(plan.partitions(), 8);
    }

    #[test]
    fn test_adaptive_plan_coalesces_small_inputs() {
        assert_eq!(ExecutionPlan::for_rows(&config(true, 8), 0).partitions(), 1);
        assert_eq!(ExecutionPlan::for_rows(&config(true, 8), 100).partitions(), 1);
        assert_eq!(
            ExecutionPlan::for_rows(&config(true, 8), ROWS_PER_ADAPTIVE_PARTITION * 3).partitions(),
            3
        );
    }

    #[test]
    fn test_adaptive_plan_capped_by_config() {
        let plan = ExecutionPlan::for_rows(&config(true, 4), 1_000_000);
        assert_eq!(plan.partitions(), 4);
    }

    #[test]
    fn test_shard_of_is_stable_and_in_range() {
        let plan = ExecutionPlan::with_partitions(5);
        for key in ["1", "104", "Memento (2000)", ""] {
            let shard = plan.shard_of(key);
            assert!(shard < 5);
            assert_eq!(shard, plan.shard_of(key));
        }
    }

    #[test]
    fn test_single_partition() {
        let plan = ExecutionPlan::with_partitions(0);
        assert_eq!(plan.partitions(), 1);
        assert_eq!(plan.shard_of("anything"), 0);
    }
}
