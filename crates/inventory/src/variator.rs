//! Parameter grid over (s, S) policies.

use itertools::iproduct;
use stochsim_core::{ConfigError, ParameterVariator};

use crate::config::InventoryConfig;
use crate::model::InventoryModel;

/// An (s, S) policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Policy {
    /// Reorder point.
    pub reorder_point: i64,
    /// Order-up-to level.
    pub order_up_to: i64,
}

/// Sweeps a list of (s, S) policies over a shared base configuration.
#[derive(Debug, Clone)]
pub struct InventoryVariator {
    /// Configuration shared by every combination.
    pub base: InventoryConfig,
    /// Policies to sweep, in report order.
    pub policies: Vec<Policy>,
}

impl InventoryVariator {
    /// Sweep `reorder_points × order_up_to_levels`, keeping only `s < S`.
    pub fn grid(base: InventoryConfig, reorder_points: &[i64], order_up_to_levels: &[i64]) -> Self {
        let policies = iproduct!(reorder_points.iter(), order_up_to_levels.iter())
            .filter(|(s, big_s)| s < big_s)
            .map(|(&reorder_point, &order_up_to)| Policy {
                reorder_point,
                order_up_to,
            })
            .collect();
        Self { base, policies }
    }

    /// Sweep an explicit list of policies.
    pub fn from_policies(base: InventoryConfig, policies: Vec<Policy>) -> Self {
        Self { base, policies }
    }
}

impl ParameterVariator for InventoryVariator {
    type Model = InventoryModel;
    type Point = Policy;

    fn points(&self) -> Vec<Policy> {
        self.policies.clone()
    }

    fn key(&self, policy: &Policy) -> String {
        format!("{}_{}", policy.reorder_point, policy.order_up_to)
    }

    fn describe(&self, policy: &Policy) -> String {
        format!("(s, S) = ({}, {})", policy.reorder_point, policy.order_up_to)
    }

    fn build(&self, policy: &Policy) -> Result<InventoryModel, ConfigError> {
        InventoryModel::new(
            self.base
                .clone()
                .with_policy(policy.reorder_point, policy.order_up_to),
        )
    }
}
