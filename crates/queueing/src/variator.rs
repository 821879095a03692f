//! Parameter grid over load ratio and capacity.

use itertools::iproduct;
use stochsim_core::{ConfigError, ParameterVariator};

use crate::config::QueueConfig;
use crate::model::MmcQueue;

/// One grid point: arrival rate as a fraction of service rate, and capacity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QueuePoint {
    /// `λ / μ`.
    pub load_ratio: f64,
    /// Waiting-line capacity, `None` for unbounded.
    pub capacity: Option<usize>,
}

/// Sweeps the Cartesian product of load ratios and capacities with a fixed
/// service rate, server count and customer target.
#[derive(Debug, Clone)]
pub struct QueueVariator {
    /// Service rate shared by every combination.
    pub service_rate: f64,
    /// Servers shared by every combination.
    pub servers: usize,
    /// Customers to process in each replication.
    pub customers: u64,
    /// Arrival-to-service rate ratios to sweep.
    pub load_ratios: Vec<f64>,
    /// Capacities to sweep.
    pub capacities: Vec<Option<usize>>,
}

impl QueueVariator {
    /// Create a single-server sweep.
    pub fn new(service_rate: f64, load_ratios: Vec<f64>, capacities: Vec<Option<usize>>) -> Self {
        Self {
            service_rate,
            servers: 1,
            customers: 1000,
            load_ratios,
            capacities,
        }
    }

    /// Set the number of servers.
    pub fn with_servers(mut self, servers: usize) -> Self {
        self.servers = servers;
        self
    }

    /// Set the customer target.
    pub fn with_customers(mut self, customers: u64) -> Self {
        self.customers = customers;
        self
    }

    /// Configuration for one grid point.
    pub fn config_for(&self, point: &QueuePoint) -> QueueConfig {
        QueueConfig::new(
            self.servers,
            self.service_rate * point.load_ratio,
            self.service_rate,
        )
        .with_customers(self.customers)
        .with_capacity(point.capacity)
    }
}

fn percent(ratio: f64) -> i64 {
    (ratio * 100.0).round() as i64
}

impl ParameterVariator for QueueVariator {
    type Model = MmcQueue;
    type Point = QueuePoint;

    fn points(&self) -> Vec<QueuePoint> {
        iproduct!(self.load_ratios.iter(), self.capacities.iter())
            .map(|(&load_ratio, &capacity)| QueuePoint {
                load_ratio,
                capacity,
            })
            .collect()
    }

    fn key(&self, point: &QueuePoint) -> String {
        match point.capacity {
            Some(cap) => format!("{}_{}", percent(point.load_ratio), cap),
            None => format!("{}_inf", percent(point.load_ratio)),
        }
    }

    fn describe(&self, point: &QueuePoint) -> String {
        let cap = point
            .capacity
            .map_or_else(|| "∞".to_string(), |cap| cap.to_string());
        format!("Ta/Ts = {}%, cap = {}", percent(point.load_ratio), cap)
    }

    fn build(&self, point: &QueuePoint) -> Result<MmcQueue, ConfigError> {
        MmcQueue::new(self.config_for(point))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_points_are_cartesian_product_in_order() {
        let variator = QueueVariator::new(2.0, vec![0.25, 0.5], vec![None, Some(0), Some(5)]);
        let points = variator.points();
        assert_eq!(points.len(), 6);
        assert_eq!(
            points[0],
            QueuePoint {
                load_ratio: 0.25,
                capacity: None
            }
        );
        assert_eq!(
            points[5],
            QueuePoint {
                load_ratio: 0.5,
                capacity: Some(5)
            }
        );
    }

    #[test]
    fn test_keys_and_descriptions() {
        let variator = QueueVariator::new(2.0, vec![0.75], vec![None, Some(10)]);
        let points = variator.points();
        assert_eq!(variator.key(&points[0]), "75_inf");
        assert_eq!(variator.key(&points[1]), "75_10");
        assert_eq!(variator.describe(&points[0]), "Ta/Ts = 75%, cap = ∞");
        assert_eq!(variator.describe(&points[1]), "Ta/Ts = 75%, cap = 10");
    }

    #[test]
    fn test_build_scales_arrival_rate() {
        let variator = QueueVariator::new(2.0, vec![1.25], vec![Some(2)])
            .with_servers(2)
            .with_customers(10);
        let config = variator.config_for(&variator.points()[0]);
        assert_eq!(config.arrival_rate, 2.5);
        assert_eq!(config.service_rate, 2.0);
        assert_eq!(config.servers, 2);
        assert_eq!(config.customers, 10);
        assert!(variator.build(&variator.points()[0]).is_ok());
    }
}
