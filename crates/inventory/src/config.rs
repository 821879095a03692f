//! Configuration for the inventory model.

use stochsim_core::ConfigError;

use crate::demand::DemandDistribution;

/// Parameters of the (s, S) inventory system.
#[derive(Debug, Clone, PartialEq)]
pub struct InventoryConfig {
    /// Number of review periods (months) simulated.
    pub horizon: f64,

    /// Inventory level at time zero.
    pub initial_level: i64,

    /// Reorder point `s`: order when the level falls below it.
    pub reorder_point: i64,

    /// Order-up-to level `S`.
    pub order_up_to: i64,

    /// Fixed cost per order placed.
    pub setup_cost: f64,

    /// Cost per unit ordered.
    pub incremental_cost: f64,

    /// Holding cost per unit per period.
    pub holding_cost: f64,

    /// Shortage (backlog) cost per unit per period.
    pub shortage_cost: f64,

    /// Delivery lag range, uniform in `[min, max)`.
    pub lead_time: (f64, f64),

    /// Mean time between demands.
    pub mean_interdemand: f64,

    /// Demand-size distribution.
    pub demand: DemandDistribution,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            horizon: 120.0,
            initial_level: 60,
            reorder_point: 20,
            order_up_to: 40,
            setup_cost: 32.0,
            incremental_cost: 3.0,
            holding_cost: 1.0,
            shortage_cost: 5.0,
            lead_time: (0.5, 1.0),
            mean_interdemand: 0.1,
            demand: DemandDistribution::default(),
        }
    }
}

impl InventoryConfig {
    /// Default costs with a custom (s, S) policy.
    pub fn with_policy(mut self, reorder_point: i64, order_up_to: i64) -> Self {
        self.reorder_point = reorder_point;
        self.order_up_to = order_up_to;
        self
    }

    /// Set the number of periods.
    pub fn with_horizon(mut self, horizon: f64) -> Self {
        self.horizon = horizon;
        self
    }

    /// Set the starting inventory level.
    pub fn with_initial_level(mut self, level: i64) -> Self {
        self.initial_level = level;
        self
    }

    /// Set the delivery lag range.
    pub fn with_lead_time(mut self, min: f64, max: f64) -> Self {
        self.lead_time = (min, max);
        self
    }

    /// Set the mean time between demands.
    pub fn with_mean_interdemand(mut self, mean: f64) -> Self {
        self.mean_interdemand = mean;
        self
    }

    /// Set the demand-size distribution.
    pub fn with_demand(mut self, demand: DemandDistribution) -> Self {
        self.demand = demand;
        self
    }

    /// Check that every parameter is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.horizon.is_finite() && self.horizon > 0.0) {
            return Err(ConfigError::invalid(
                "horizon",
                format!("must be positive and finite, got {}", self.horizon),
            ));
        }
        if self.reorder_point >= self.order_up_to {
            return Err(ConfigError::invalid(
                "policy",
                format!(
                    "reorder point {} must be below order-up-to level {}",
                    self.reorder_point, self.order_up_to
                ),
            ));
        }
        let (min, max) = self.lead_time;
        if !(min.is_finite() && max.is_finite() && 0.0 <= min && min <= max) {
            return Err(ConfigError::invalid(
                "lead_time",
                format!("expected 0 <= min <= max, got ({min}, {max})"),
            ));
        }
        if !(self.mean_interdemand.is_finite() && self.mean_interdemand > 0.0) {
            return Err(ConfigError::invalid(
                "mean_interdemand",
                format!("must be positive and finite, got {}", self.mean_interdemand),
            ));
        }
        let costs = [
            ("setup_cost", self.setup_cost),
            ("incremental_cost", self.incremental_cost),
            ("holding_cost", self.holding_cost),
            ("shortage_cost", self.shortage_cost),
        ];
        for (name, cost) in costs {
            if !(cost.is_finite() && cost >= 0.0) {
                return Err(ConfigError::invalid(name, format!("must be non-negative, got {cost}")));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = InventoryConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!((config.reorder_point, config.order_up_to), (20, 40));
    }

    #[test]
    fn test_rejects_inverted_policy() {
        let config = InventoryConfig::default().with_policy(40, 20);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_bad_lead_time_and_horizon() {
        assert!(InventoryConfig::default()
            .with_lead_time(1.0, 0.5)
            .validate()
            .is_err());
        assert!(InventoryConfig::default()
            .with_horizon(0.0)
            .validate()
            .is_err());
        assert!(InventoryConfig::default()
            .with_mean_interdemand(-1.0)
            .validate()
            .is_err());
    }
}
