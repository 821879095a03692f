//! (s, S) inventory state machine.

use std::fmt::Write;

use stochsim_core::{
    ConfigError, Context, Event, Model, StatisticalMeasure, TemporalMeasure, TimeSeries,
};
use tracing::trace;

use crate::config::InventoryConfig;

/// Review period length.
const REVIEW_INTERVAL: f64 = 1.0;

/// Inventory events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InventoryEvent {
    /// Periodic evaluation of the inventory level.
    Review,
    /// A customer demand.
    Demand,
    /// An outstanding order is delivered.
    OrderArrival {
        /// Units delivered.
        quantity: i64,
    },
    /// The simulated horizon is reached.
    EndOfHorizon,
}

/// Single-product inventory with periodic review and backlogging.
#[derive(Debug, Clone)]
pub struct InventoryModel {
    config: InventoryConfig,

    /// Units on hand; negative values are backlogged demand.
    level: i64,

    /// Clock value seen at the last advance.
    now: f64,

    /// Accumulated setup plus incremental ordering cost.
    total_ordering_cost: f64,

    /// Orders placed.
    orders: u64,

    /// Time integral of positive level.
    holding_area: f64,

    /// Time integral of backlog (negated negative level).
    shortage_area: f64,

    /// Level after every change.
    level_trajectory: TimeSeries,
}

impl InventoryModel {
    /// Create a model from a validated configuration.
    pub fn new(config: InventoryConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut level_trajectory = TimeSeries::new();
        level_trajectory.push(0.0, config.initial_level as f64);
        Ok(Self {
            level: config.initial_level,
            config,
            now: 0.0,
            total_ordering_cost: 0.0,
            orders: 0,
            holding_area: 0.0,
            shortage_area: 0.0,
            level_trajectory,
        })
    }

    /// The configuration this model runs with.
    pub fn config(&self) -> &InventoryConfig {
        &self.config
    }

    /// Current inventory level.
    pub fn level(&self) -> i64 {
        self.level
    }

    /// Orders placed so far.
    pub fn orders(&self) -> u64 {
        self.orders
    }

    /// Average ordering cost per period.
    pub fn average_ordering_cost(&self) -> f64 {
        self.total_ordering_cost / self.config.horizon
    }

    /// Average holding cost per period.
    pub fn average_holding_cost(&self) -> f64 {
        self.config.holding_cost * self.holding_area / self.config.horizon
    }

    /// Average shortage cost per period.
    pub fn average_shortage_cost(&self) -> f64 {
        self.config.shortage_cost * self.shortage_area / self.config.horizon
    }

    /// Average total cost per period.
    pub fn average_total_cost(&self) -> f64 {
        self.average_ordering_cost() + self.average_holding_cost() + self.average_shortage_cost()
    }

    /// Inventory level over time.
    pub fn level_trajectory(&self) -> TimeSeries {
        self.level_trajectory.clone()
    }

    fn schedule_demand(&self, ctx: &mut dyn Context<InventoryEvent>) {
        let delay = ctx.rng().exponential(self.config.mean_interdemand);
        ctx.schedule_in(delay, InventoryEvent::Demand);
    }

    fn on_review(&mut self, time: f64, ctx: &mut dyn Context<InventoryEvent>) {
        if self.level < self.config.reorder_point {
            let quantity = self.config.order_up_to - self.level;
            self.total_ordering_cost +=
                self.config.setup_cost + self.config.incremental_cost * quantity as f64;
            self.orders += 1;

            let (min, max) = self.config.lead_time;
            let lag = ctx.rng().uniform_range(min, max);
            ctx.schedule_in(lag, InventoryEvent::OrderArrival { quantity });
            trace!(time, level = self.level, quantity, lag, "Order placed");
        }

        let next = time + REVIEW_INTERVAL;
        if next < self.config.horizon {
            ctx.schedule(next, InventoryEvent::Review);
        }
    }

    fn on_demand(&mut self, time: f64, ctx: &mut dyn Context<InventoryEvent>) {
        self.schedule_demand(ctx);
        let size = self.config.demand.sample(ctx.rng());
        self.level -= size;
        self.level_trajectory.push(time, self.level as f64);
    }

    fn on_order_arrival(&mut self, time: f64, quantity: i64) {
        self.level += quantity;
        self.level_trajectory.push(time, self.level as f64);
    }
}

impl Model for InventoryModel {
    type Event = InventoryEvent;

    fn name(&self) -> String {
        format!(
            "(s, S) = ({}, {}) inventory",
            self.config.reorder_point, self.config.order_up_to
        )
    }

    fn bootstrap(&mut self, ctx: &mut dyn Context<InventoryEvent>) {
        ctx.schedule(0.0, InventoryEvent::Review);
        self.schedule_demand(ctx);
        ctx.schedule(self.config.horizon, InventoryEvent::EndOfHorizon);
    }

    fn handle(&mut self, event: Event<InventoryEvent>, ctx: &mut dyn Context<InventoryEvent>) {
        match event.kind {
            InventoryEvent::Review => self.on_review(event.time, ctx),
            InventoryEvent::Demand => self.on_demand(event.time, ctx),
            InventoryEvent::OrderArrival { quantity } => self.on_order_arrival(event.time, quantity),
            InventoryEvent::EndOfHorizon => {}
        }
    }

    fn advance(&mut self, now: f64, elapsed: f64) {
        if self.level > 0 {
            self.holding_area += self.level as f64 * elapsed;
        } else if self.level < 0 {
            self.shortage_area -= self.level as f64 * elapsed;
        }
        self.now = now;
    }

    fn is_finished(&self) -> bool {
        self.now >= self.config.horizon
    }

    fn report(&self) -> String {
        let c = &self.config;
        let mut out = String::new();
        writeln!(out, "Single-product inventory model").unwrap();
        writeln!(out, "Initial inventory level: {}", c.initial_level).unwrap();
        writeln!(out, "Mean time between demands: {}", c.mean_interdemand).unwrap();
        writeln!(
            out,
            "Demand distribution: {:?} with probabilities {:?}",
            c.demand.values(),
            c.demand.probabilities()
        ).unwrap();
        writeln!(out, "Ordering policy: ({}, {})", c.reorder_point, c.order_up_to).unwrap();
        writeln!(out, "Setup cost: {}", c.setup_cost).unwrap();
        writeln!(out, "Incremental cost: {}", c.incremental_cost).unwrap();
        writeln!(out, "Holding cost: {}", c.holding_cost).unwrap();
        writeln!(out, "Shortage cost: {}", c.shortage_cost).unwrap();
        writeln!(out, "Delivery lag range: [{}, {}]", c.lead_time.0, c.lead_time.1).unwrap();
        writeln!(out, "Number of periods: {}", c.horizon).unwrap();
        writeln!(out).unwrap();
        writeln!(out, "Simulation results:").unwrap();
        writeln!(out, "Orders placed: {}", self.orders).unwrap();
        writeln!(out, "Average ordering cost: {:.3}", self.average_ordering_cost()).unwrap();
        writeln!(out, "Average holding cost: {:.3}", self.average_holding_cost()).unwrap();
        writeln!(out, "Average shortage cost: {:.3}", self.average_shortage_cost()).unwrap();
        write!(out, "Average total cost: {:.3}", self.average_total_cost()).unwrap();
        out
    }

    fn statistical_measures(&self) -> Vec<StatisticalMeasure<Self>> {
        vec![
            StatisticalMeasure::scalar(
                "average_ordering_cost",
                "Average ordering cost per period",
                r"$\bar{C}_o$",
                "Cost",
                InventoryModel::average_ordering_cost,
            ),
            StatisticalMeasure::scalar(
                "average_holding_cost",
                "Average holding cost per period",
                r"$\bar{C}_h$",
                "Cost",
                InventoryModel::average_holding_cost,
            ),
            StatisticalMeasure::scalar(
                "average_shortage_cost",
                "Average shortage cost per period",
                r"$\bar{C}_s$",
                "Cost",
                InventoryModel::average_shortage_cost,
            ),
            StatisticalMeasure::scalar(
                "average_total_cost",
                "Average total cost per period",
                r"$\bar{C}$",
                "Cost",
                InventoryModel::average_total_cost,
            ),
        ]
    }

    fn temporal_measures(&self) -> Vec<TemporalMeasure<Self>> {
        vec![TemporalMeasure {
            key: "level_over_time",
            title: "Inventory level over time",
            x_label: "Time [months]",
            y_label: "Units",
            series: InventoryModel::level_trajectory,
        }]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stochsim_simulation::Simulation;

    fn run(config: InventoryConfig, seed: u64) -> Simulation<InventoryModel> {
        let mut sim = Simulation::new(InventoryModel::new(config).unwrap(), seed).unwrap();
        sim.run().unwrap();
        sim
    }

    #[test]
    fn test_run_ends_exactly_at_horizon() {
        let sim = run(InventoryConfig::default().with_horizon(12.0), 5);
        assert_eq!(sim.clock(), 12.0);
        assert!(sim.is_finished());
    }

    #[test]
    fn test_orders_are_placed_below_reorder_point() {
        let sim = run(InventoryConfig::default(), 7);
        let model = sim.model();
        assert!(model.orders() > 0);
        assert!(model.average_ordering_cost() >= 32.0 * model.orders() as f64 / 120.0);
    }

    #[test]
    fn test_no_demand_means_only_holding_cost() {
        // Demands arrive so rarely that none lands inside the horizon.
        let config = InventoryConfig::default()
            .with_horizon(2.0)
            .with_initial_level(50)
            .with_mean_interdemand(1e12);
        let sim = run(config, 1);
        let model = sim.model();
        assert_eq!(model.orders(), 0);
        assert!((model.average_holding_cost() - 50.0).abs() < 1e-9);
        assert_eq!(model.average_shortage_cost(), 0.0);
    }

    #[test]
    fn test_backlog_accrues_shortage_cost() {
        let config = InventoryConfig::default()
            .with_initial_level(0)
            .with_policy(-1000, 0)
            .with_horizon(10.0);
        let sim = run(config, 3);
        let model = sim.model();
        assert!(model.level() < 0);
        assert_eq!(model.average_holding_cost(), 0.0);
        assert!(model.average_shortage_cost() > 0.0);
    }

    #[test]
    fn test_level_trajectory_tracks_level() {
        let sim = run(InventoryConfig::default().with_horizon(6.0), 9);
        let series = sim.model().level_trajectory();
        assert_eq!(series.values[0], 60.0);
        assert_eq!(*series.values.last().unwrap(), sim.model().level() as f64);
    }

    #[test]
    fn test_report_lists_policy_and_costs() {
        let sim = run(InventoryConfig::default().with_horizon(12.0), 4);
        let report = sim.report();
        assert!(report.starts_with("Single-product inventory model\n"));
        assert!(report.contains("Ordering policy: (20, 40)"));
        assert!(report.contains(&format!(
            "Average total cost: {:.3}",
            sim.model().average_total_cost()
        )));
    }
}
