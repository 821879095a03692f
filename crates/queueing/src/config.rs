//! Configuration for the queueing model.

use stochsim_core::ConfigError;

/// Parameters of an M/M/c queue.
#[derive(Debug, Clone, PartialEq)]
pub struct QueueConfig {
    /// Number of parallel servers.
    pub servers: usize,

    /// Mean arrivals per time unit.
    pub arrival_rate: f64,

    /// Mean service completions per time unit, per server.
    pub service_rate: f64,

    /// Customers that must complete their delay before the run ends.
    pub customers: u64,

    /// Maximum waiting-line length. `None` means unbounded.
    ///
    /// Arrivals that find every server busy and the line full are denied.
    pub capacity: Option<usize>,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            servers: 1,
            arrival_rate: 1.0,
            service_rate: 2.0,
            customers: 1000,
            capacity: None,
        }
    }
}

impl QueueConfig {
    /// Create an M/M/c configuration.
    pub fn new(servers: usize, arrival_rate: f64, service_rate: f64) -> Self {
        Self {
            servers,
            arrival_rate,
            service_rate,
            ..Default::default()
        }
    }

    /// Create a single-server configuration.
    pub fn mm1(arrival_rate: f64, service_rate: f64) -> Self {
        Self::new(1, arrival_rate, service_rate)
    }

    /// Set the number of customers to process.
    pub fn with_customers(mut self, customers: u64) -> Self {
        self.customers = customers;
        self
    }

    /// Set the waiting-line capacity.
    pub fn with_capacity(mut self, capacity: Option<usize>) -> Self {
        self.capacity = capacity;
        self
    }

    /// Offered load per server, `λ / (c μ)`.
    pub fn utilization_factor(&self) -> f64 {
        self.arrival_rate / (self.servers as f64 * self.service_rate)
    }

    /// Check that every parameter is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.servers == 0 {
            return Err(ConfigError::invalid("servers", "at least one server is required"));
        }
        if !(self.arrival_rate.is_finite() && self.arrival_rate > 0.0) {
            return Err(ConfigError::invalid(
                "arrival_rate",
                format!("must be positive and finite, got {}", self.arrival_rate),
            ));
        }
        if !(self.service_rate.is_finite() && self.service_rate > 0.0) {
            return Err(ConfigError::invalid(
                "service_rate",
                format!("must be positive and finite, got {}", self.service_rate),
            ));
        }
        if self.customers == 0 {
            return Err(ConfigError::invalid("customers", "must be at least 1"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(QueueConfig::default().validate().is_ok());
    }

    #[test]
    fn test_builder_sets_fields() {
        let config = QueueConfig::new(3, 1.5, 1.0)
            .with_customers(50)
            .with_capacity(Some(4));
        assert_eq!(config.servers, 3);
        assert_eq!(config.customers, 50);
        assert_eq!(config.capacity, Some(4));
        assert!((config.utilization_factor() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_rejects_bad_parameters() {
        assert!(QueueConfig::new(0, 1.0, 1.0).validate().is_err());
        assert!(QueueConfig::mm1(0.0, 1.0).validate().is_err());
        assert!(QueueConfig::mm1(1.0, f64::NAN).validate().is_err());
        assert!(QueueConfig::mm1(1.0, 1.0)
            .with_customers(0)
            .validate()
            .is_err());
    }
}
