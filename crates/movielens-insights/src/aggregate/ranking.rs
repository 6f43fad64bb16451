//! Top-1 value per partition key over hash-sharded pairs.

use super::plan::ExecutionPlan;
use crate::types::RankedRow;
use rayon::prelude::*;
use std::collections::HashMap;
use tracing::debug;

/// Count `(partition, value)` pairs and keep the most frequent value per
/// partition key.
///
/// Pairs are sharded by partition key and shards are ranked in parallel.
/// Ties on count go to the lexicographically smallest value. The result is
/// ordered by count descending, then partition key ascending, so it does
/// not depend on the number of shards.
pub(crate) fn rank_top_per_partition<'a, R, I>(pairs: I, plan: &ExecutionPlan) -> Vec<R>
where
    R: RankedRow + Send,
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut shards: Vec<Vec<(&str, &str)>> = vec![Vec::new(); plan.partitions()];
    for (partition, value) in pairs {
        shards[plan.shard_of(partition)].push((partition, value));
    }

    let mut ranked: Vec<R> = shards
        .into_par_iter()
        .enumerate()
        .flat_map_iter(|(shard, pairs)| {
            let winners = rank_shard(pairs);
            debug!("  shard {}: {} partition keys", shard, winners.len());
            winners
                .into_iter()
                .map(|(partition, value, count)| R::new(partition.to_string(), value.to_string(), count))
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.count()
            .cmp(&a.count())
            .then_with(|| a.partition().cmp(b.partition()))
    });
    ranked
}

fn rank_shard<'a>(pairs: Vec<(&'a str, &'a str)>) -> Vec<(&'a str, &'a str, u32)> {
    let mut counts: HashMap<(&str, &str), u32> = HashMap::new();
    for pair in pairs {
        *counts.entry(pair).or_insert(0) += 1;
    }

    let mut best: HashMap<&str, (&str, u32)> = HashMap::new();
    for ((partition, value), count) in counts {
        best.entry(partition)
            .and_modify(|current| {
                if outranks((value, count), *current) {
                    *current = (value, count);
                }
            })
            .or_insert((value, count));
    }

    best.into_iter()
        .map(|(partition, (value, count))| (partition, value, count))
        .collect()
}

/// Higher count wins; equal counts go to the smaller value.
fn outranks(candidate: (&str, u32), current: (&str, u32)) -> bool {
    candidate.1 > current.1 || (candidate.1 == current.1 && candidate.0 < current.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TagFrequency;
    use pretty_assertions::assert_eq;

    fn rank(pairs: &[(&str, &str)], partitions: usize) -> Vec<TagFrequency> {
        rank_top_per_partition(pairs.iter().copied(), &ExecutionPlan::with_partitions(partitions))
    }

    #[test]
    fn test_keeps_most_frequent_value() {
        let ranked = rank(
            &[("m", "nonlinear"), ("m", "twist"), ("m", "nonlinear")],
            1,
        );

        assert_eq!(
            ranked,
            vec![TagFrequency::new("m".into(), "nonlinear".into(), 2)]
        );
    }

    #[test]
    fn test_tie_goes_to_smallest_value() {
        let ranked = rank(&[("m", "zany"), ("m", "absurd"), ("m", "mellow")], 1);

        assert_eq!(ranked[0].tag, "absurd");
        assert_eq!(ranked[0].tag_count, 1);
    }

    #[test]
    fn test_orders_by_count_then_partition() {
        let ranked = rank(
            &[
                ("b", "x"),
                ("c", "y"),
                ("c", "y"),
                ("a", "z"),
            ],
            2,
        );

        let order: Vec<_> = ranked.iter().map(|r| (r.title.as_str(), r.tag_count)).collect();
        assert_eq!(order, vec![("c", 2), ("a", 1), ("b", 1)]);
    }

    #[test]
    fn test_result_independent_of_partition_count() {
        let pairs: Vec<(String, String)> = (0..500)
            .map(|i| (format!("key{}", i % 37), format!("value{}", (i * 7) % 5)))
            .collect();
        let borrowed: Vec<(&str, &str)> = pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();

        let baseline = rank(&borrowed, 1);
        for partitions in [2, 3, 8, 64] {
            assert_eq!(rank(&borrowed, partitions), baseline);
        }
        assert_eq!(baseline.len(), 37);
    }

    #[test]
    fn test_empty_input() {
        assert!(rank(&[], 4).is_empty());
    }
}
