//! Core-count replica ladder.
//!
//! A ladder is a step function: the replica count for a cluster is the
//! value of the largest core threshold the cluster has reached.

use crate::error::ParamsError;
use std::collections::BTreeMap;
use tracing::trace;

/// Replica count used when no ladder threshold applies.
const BASE_REPLICAS: u32 = 1;

/// Minimum replica count once the cluster has more than one node.
const MULTI_NODE_FLOOR: u32 = 2;

/// Ordered table of schedulable core thresholds to replica counts.
///
/// Thresholds are unique and kept in ascending order; replica counts are
/// always at least 1 and fit a Kubernetes `spec.replicas` field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScalingLadder {
    steps: BTreeMap<u32, u32>,
}

impl ScalingLadder {
    /// Build a ladder from `(threshold, replicas)` pairs.
    ///
    /// Fails on a repeated threshold or a replica count outside `1..=i32::MAX`.
    pub fn new<I>(steps: I) -> Result<Self, ParamsError>
    where
        I: IntoIterator<Item = (u32, i64)>,
    {
        let mut ladder = BTreeMap::new();
        for (threshold, replicas) in steps {
            let replicas = u32::try_from(replicas)
                .ok()
                .filter(|r| *r >= 1 && i32::try_from(*r).is_ok())
                .ok_or(ParamsError::InvalidReplicas { threshold, replicas })?;
            if ladder.insert(threshold, replicas).is_some() {
                return Err(ParamsError::DuplicateThreshold(threshold));
            }
        }
        Ok(Self { steps: ladder })
    }

    /// Number of steps in the ladder
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether the ladder has no steps at all
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Steps in ascending threshold order
    pub fn iter(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.steps.iter().map(|(t, r)| (*t, *r))
    }
}

/// Compute the replica count for the given cluster size.
///
/// Walks the ladder in ascending order and keeps the replica count of the
/// last threshold not exceeding `schedulable_cores`, starting from 1. A
/// cluster with more than one node never gets fewer than two replicas.
pub fn compute_target(ladder: &ScalingLadder, node_count: u32, schedulable_cores: u32) -> u32 {
    let mut replicas = BASE_REPLICAS;
    for (threshold, step_replicas) in ladder.iter() {
        if threshold > schedulable_cores {
            break;
        }
        replicas = step_replicas;
    }
    trace!(
        node_count,
        schedulable_cores,
        ladder_replicas = replicas,
        "ladder walk complete"
    );

    if node_count > 1 && replicas < MULTI_NODE_FLOOR {
        replicas = MULTI_NODE_FLOOR;
    }
    replicas
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ladder(steps: &[(u32, i64)]) -> ScalingLadder {
        ScalingLadder::new(steps.iter().copied()).unwrap()
    }

    #[test]
    fn test_target_uses_last_threshold_reached() {
        let l = ladder(&[(0, 1), (4, 2), (8, 4)]);
        assert_eq!(compute_target(&l, 5, 6), 2);
    }

    #[test]
    fn test_target_uses_largest_threshold_when_all_reached() {
        let l = ladder(&[(0, 1), (4, 2), (8, 4)]);
        assert_eq!(compute_target(&l, 3, 10), 4);
        assert_eq!(compute_target(&l, 3, 8), 4);
    }

    #[test]
    fn test_no_threshold_reached_falls_back_to_floor() {
        let l = ladder(&[(10, 3)]);
        // Base of 1 raised to 2 because there is more than one node
        assert_eq!(compute_target(&l, 5, 2), 2);
    }

    #[test]
    fn test_single_node_cluster_may_run_one_replica() {
        let l = ladder(&[(10, 3)]);
        assert_eq!(compute_target(&l, 1, 2), 1);
        assert_eq!(compute_target(&l, 0, 0), 1);
    }

    #[test]
    fn test_multi_node_floor_applies_to_ladder_values() {
        let l = ladder(&[(0, 1)]);
        assert_eq!(compute_target(&l, 2, 64), 2);
        assert_eq!(compute_target(&l, 1, 64), 1);
    }

    #[test]
    fn test_floor_does_not_lower_larger_targets() {
        let l = ladder(&[(0, 7)]);
        assert_eq!(compute_target(&l, 40, 1), 7);
    }

    #[test]
    fn test_empty_ladder() {
        let l = ScalingLadder::default();
        assert!(l.is_empty());
        assert_eq!(compute_target(&l, 1, 100), 1);
        assert_eq!(compute_target(&l, 3, 100), 2);
    }

    #[test]
    fn test_ladder_is_sorted_regardless_of_input_order() {
        let l = ladder(&[(8, 4), (0, 1), (4, 2)]);
        let thresholds: Vec<u32> = l.iter().map(|(t, _)| t).collect();
        assert_eq!(thresholds, vec![0, 4, 8]);
        assert_eq!(compute_target(&l, 5, 7), 2);
    }

    #[test]
    fn test_ladder_values_need_not_be_monotone() {
        // The walk follows thresholds, not replica values
        let l = ladder(&[(0, 5), (16, 3)]);
        assert_eq!(compute_target(&l, 4, 20), 3);
    }

    #[test]
    fn test_floor_holds_for_every_multi_node_cluster() {
        let l = ladder(&[(0, 1), (100, 1), (1000, 9)]);
        for nodes in 2..20 {
            for cores in [0, 1, 99, 100, 999, 1000, 5000] {
                assert!(compute_target(&l, nodes, cores) >= 2);
            }
        }
    }

    #[test]
    fn test_rejects_non_positive_replicas() {
        let err = ScalingLadder::new([(0, 1), (4, 0)]).unwrap_err();
        assert!(matches!(err, ParamsError::InvalidReplicas { threshold: 4, replicas: 0 }));

        let err = ScalingLadder::new([(2, -3)]).unwrap_err();
        assert!(matches!(err, ParamsError::InvalidReplicas { threshold: 2, replicas: -3 }));
    }

    #[test]
    fn test_rejects_replicas_beyond_kubernetes_range() {
        let err = ScalingLadder::new([(0, i64::from(i32::MAX) + 1)]).unwrap_err();
        assert!(matches!(err, ParamsError::InvalidReplicas { .. }));
    }

    #[test]
    fn test_rejects_duplicate_thresholds() {
        let err = ScalingLadder::new([(4, 1), (4, 2)]).unwrap_err();
        assert!(matches!(err, ParamsError::DuplicateThreshold(4)));
    }
}
