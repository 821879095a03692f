//! M/M/c queue state machine.

use std::collections::VecDeque;
use std::fmt::Write;

use stochsim_core::{
    ConfigError, Context, Event, Model, StatisticalMeasure, TemporalMeasure, TimeSeries,
};
use tracing::trace;

use crate::config::QueueConfig;

/// Queueing events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueEvent {
    /// A customer arrives.
    Arrival,
    /// A server finishes serving its customer.
    Departure {
        /// Index of the server that frees up.
        server: usize,
    },
}

/// Busy/idle state of one server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerState {
    /// Waiting for a customer.
    Idle,
    /// Serving a customer.
    Busy,
}

/// Multi-server queue with exponential arrivals and services.
#[derive(Debug, Clone)]
pub struct MmcQueue {
    config: QueueConfig,

    /// Per-server state; the fraction busy feeds utilization.
    servers: Vec<ServerState>,

    /// Arrival times of waiting customers, head is the oldest.
    waiting: VecDeque<f64>,

    /// Clock value seen at the last advance.
    now: f64,

    /// Customers that arrived, including denied ones.
    arrivals: u64,

    /// Customers turned away because the line was full.
    denied: u64,

    /// Customers that completed their delay (entered service).
    customers_delayed: u64,

    /// Sum of waiting-line delays.
    total_delay: f64,

    /// Sum of drawn service times.
    total_service_time: f64,

    /// Time integral of the waiting-line length.
    area_queue: f64,

    /// Time integral of the fraction of busy servers.
    area_busy: f64,

    /// Time spent at each waiting-line length, indexed by length.
    time_at_length: Vec<f64>,

    /// Waiting-line length after every change.
    queue_trajectory: TimeSeries,

    /// Waiting-line length after every event, including unchanged ones.
    /// The growth-rate regression runs over these samples.
    queue_samples: TimeSeries,

    /// Customers each server has started serving.
    served_by: Vec<u64>,

    /// Cumulative denials after every change.
    denied_trajectory: TimeSeries,
}

impl MmcQueue {
    /// Create a queue from a validated configuration.
    pub fn new(config: QueueConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut queue_trajectory = TimeSeries::new();
        queue_trajectory.push(0.0, 0.0);
        let mut denied_trajectory = TimeSeries::new();
        denied_trajectory.push(0.0, 0.0);

        Ok(Self {
            servers: vec![ServerState::Idle; config.servers],
            served_by: vec![0; config.servers],
            config,
            waiting: VecDeque::new(),
            now: 0.0,
            arrivals: 0,
            denied: 0,
            customers_delayed: 0,
            total_delay: 0.0,
            total_service_time: 0.0,
            area_queue: 0.0,
            area_busy: 0.0,
            time_at_length: vec![0.0],
            queue_samples: queue_trajectory.clone(),
            queue_trajectory,
            denied_trajectory,
        })
    }

    /// Create a single-server queue.
    pub fn mm1(arrival_rate: f64, service_rate: f64, customers: u64) -> Result<Self, ConfigError> {
        Self::new(QueueConfig::mm1(arrival_rate, service_rate).with_customers(customers))
    }

    /// The configuration this queue runs with.
    pub fn config(&self) -> &QueueConfig {
        &self.config
    }

    /// Current state of every server.
    pub fn servers(&self) -> &[ServerState] {
        &self.servers
    }

    /// Customers currently waiting.
    pub fn queue_len(&self) -> usize {
        self.waiting.len()
    }

    /// Customers that arrived so far.
    pub fn arrivals(&self) -> u64 {
        self.arrivals
    }

    /// Customers denied so far.
    pub fn denied(&self) -> u64 {
        self.denied
    }

    /// Customers that completed their delay so far.
    pub fn customers_delayed(&self) -> u64 {
        self.customers_delayed
    }

    /// Customers each server has started serving, indexed by server.
    pub fn customers_served_by(&self) -> &[u64] {
        &self.served_by
    }

    fn busy_servers(&self) -> usize {
        self.servers
            .iter()
            .filter(|s| **s == ServerState::Busy)
            .count()
    }

    fn per_customer(&self, total: f64) -> f64 {
        if self.customers_delayed == 0 {
            0.0
        } else {
            total / self.customers_delayed as f64
        }
    }

    fn per_time(&self, area: f64) -> f64 {
        if self.now > 0.0 {
            area / self.now
        } else {
            0.0
        }
    }

    /// Mean waiting-line delay, `d(n)`.
    pub fn average_delay(&self) -> f64 {
        self.per_customer(self.total_delay)
    }

    /// Mean service time, `s(n)`.
    pub fn average_service_time(&self) -> f64 {
        self.per_customer(self.total_service_time)
    }

    /// Mean time in system, delay plus service.
    pub fn average_time_in_system(&self) -> f64 {
        self.average_delay() + self.average_service_time()
    }

    /// Time-weighted mean waiting-line length, `q(n)`.
    pub fn average_queue_len(&self) -> f64 {
        self.per_time(self.area_queue)
    }

    /// Time-weighted mean fraction of busy servers, `u(n)`.
    pub fn utilization(&self) -> f64 {
        self.per_time(self.area_busy)
    }

    /// Time-weighted mean number of customers in the system.
    pub fn average_in_system(&self) -> f64 {
        self.average_queue_len() + self.utilization() * self.servers.len() as f64
    }

    /// Denied customers per customer that completed delay.
    pub fn blocking_probability(&self) -> f64 {
        self.per_customer(self.denied as f64)
    }

    /// Slope of a least-squares line through the waiting-line length sampled
    /// after every event.
    pub fn queue_growth_rate(&self) -> f64 {
        if self.queue_samples.len() < 2 {
            return 0.0;
        }
        linreg::linear_regression::<f64, f64, f64>(
            &self.queue_samples.times,
            &self.queue_samples.values,
        )
        .map(|(slope, _intercept)| slope)
        .unwrap_or(0.0)
    }

    /// Fraction of time the waiting line held exactly `n` customers, for
    /// `n = 0..=max observed`.
    pub fn queue_len_distribution(&self) -> Vec<f64> {
        if self.now <= 0.0 {
            return vec![0.0; self.time_at_length.len()];
        }
        self.time_at_length.iter().map(|t| t / self.now).collect()
    }

    /// Fraction of time the waiting line held exactly `n` customers.
    pub fn probability_of_len(&self, n: usize) -> f64 {
        self.queue_len_distribution().get(n).copied().unwrap_or(0.0)
    }

    /// Waiting-line length over time.
    pub fn queue_trajectory(&self) -> TimeSeries {
        self.queue_trajectory.clone()
    }

    /// Cumulative denials over time.
    pub fn denied_trajectory(&self) -> TimeSeries {
        self.denied_trajectory.clone()
    }

    fn schedule_arrival(&self, ctx: &mut dyn Context<QueueEvent>) {
        let delay = ctx.rng().exponential(1.0 / self.config.arrival_rate);
        ctx.schedule_in(delay, QueueEvent::Arrival);
    }

    /// Put the customer on a uniformly chosen idle server.
    fn serve(&mut self, ctx: &mut dyn Context<QueueEvent>) {
        let idle: Vec<usize> = self
            .servers
            .iter()
            .enumerate()
            .filter(|(_, s)| **s == ServerState::Idle)
            .map(|(i, _)| i)
            .collect();
        debug_assert!(!idle.is_empty(), "serve called with every server busy");
        let server = idle[ctx.rng().choose_index(idle.len())];
        self.servers[server] = ServerState::Busy;
        self.served_by[server] += 1;

        let service_time = ctx.rng().exponential(1.0 / self.config.service_rate);
        self.total_service_time += service_time;
        ctx.schedule_in(service_time, QueueEvent::Departure { server });
    }

    fn on_arrival(&mut self, time: f64, ctx: &mut dyn Context<QueueEvent>) {
        self.schedule_arrival(ctx);
        self.arrivals += 1;

        if self.busy_servers() == self.servers.len() {
            let fits = self
                .config
                .capacity
                .map_or(true, |cap| self.waiting.len() < cap);
            if fits {
                self.waiting.push_back(time);
            } else {
                self.denied += 1;
                self.denied_trajectory.push(time, self.denied as f64);
                trace!(time, denied = self.denied, "Customer denied");
            }
        } else {
            self.customers_delayed += 1;
            self.serve(ctx);
        }
    }

    fn on_departure(&mut self, time: f64, server: usize, ctx: &mut dyn Context<QueueEvent>) {
        self.servers[server] = ServerState::Idle;
        if let Some(arrived) = self.waiting.pop_front() {
            self.total_delay += time - arrived;
            self.customers_delayed += 1;
            self.serve(ctx);
        }
    }

    fn record_queue(&mut self, time: f64) {
        let len = self.waiting.len();
        if self.time_at_length.len() <= len {
            self.time_at_length.resize(len + 1, 0.0);
        }
        self.queue_samples.push(time, len as f64);
        let last = self.queue_trajectory.values.last().copied();
        if last != Some(len as f64) {
            self.queue_trajectory.push(time, len as f64);
        }
    }

    fn capacity_label(&self) -> String {
        match self.config.capacity {
            Some(cap) => cap.to_string(),
            None => "∞".to_string(),
        }
    }
}

impl Model for MmcQueue {
    type Event = QueueEvent;

    fn name(&self) -> String {
        format!("M/M/{}/{}", self.servers.len(), self.capacity_label())
    }

    fn bootstrap(&mut self, ctx: &mut dyn Context<QueueEvent>) {
        self.schedule_arrival(ctx);
    }

    fn handle(&mut self, event: Event<QueueEvent>, ctx: &mut dyn Context<QueueEvent>) {
        match event.kind {
            QueueEvent::Arrival => self.on_arrival(event.time, ctx),
            QueueEvent::Departure { server } => self.on_departure(event.time, server, ctx),
        }
        self.record_queue(event.time);
    }

    fn advance(&mut self, now: f64, elapsed: f64) {
        let len = self.waiting.len();
        self.area_queue += len as f64 * elapsed;
        self.area_busy += self.busy_servers() as f64 / self.servers.len() as f64 * elapsed;
        self.time_at_length[len] += elapsed;
        self.now = now;
    }

    fn is_finished(&self) -> bool {
        self.customers_delayed >= self.config.customers
    }

    fn report(&self) -> String {
        let mut out = String::new();
        writeln!(out, "Queueing model {}", self.name()).unwrap();
        writeln!(out, "Arrival rate: {:>31.3} customers/min", self.config.arrival_rate).unwrap();
        writeln!(out, "Service rate: {:>31.3} customers/min", self.config.service_rate).unwrap();
        writeln!(out, "Customers: {:>34}", self.config.customers).unwrap();
        writeln!(out).unwrap();
        writeln!(out, "Simulation results:").unwrap();
        writeln!(out, "Average delay in queue: {:>21.3} min", self.average_delay()).unwrap();
        writeln!(out, "Average time in system: {:>21.3} min", self.average_time_in_system()).unwrap();
        writeln!(out, "Average customers in queue: {:>17.3}", self.average_queue_len()).unwrap();
        writeln!(out, "Average customers in system: {:>16.3}", self.average_in_system()).unwrap();
        if self.config.capacity.is_some() {
            writeln!(out, "Probability of denial: {:>22.3}", self.blocking_probability()).unwrap();
        }
        writeln!(out, "Server utilization: {:>25.3}", self.utilization()).unwrap();
        for (n, p) in self.queue_len_distribution().iter().enumerate() {
            writeln!(out, "P({} customers in queue): {:.4}", n, p).unwrap();
        }
        write!(out, "Simulation end time: {:>24.3}", self.now).unwrap();
        out
    }

    fn statistical_measures(&self) -> Vec<StatisticalMeasure<Self>> {
        let mut measures = vec![
            StatisticalMeasure::scalar(
                "average_delay",
                "Expected average delay in queue",
                r"$\hat{d}(n)$",
                "Time [minutes]",
                MmcQueue::average_delay,
            ),
            StatisticalMeasure::scalar(
                "average_time_in_system",
                "Average time in system",
                r"$\hat{d}(n) + \hat{s}(n)$",
                "Time [minutes]",
                MmcQueue::average_time_in_system,
            ),
            StatisticalMeasure::scalar(
                "average_queue_len",
                "Average number of customers in queue",
                r"$\hat{q}(n)$",
                "Customers",
                MmcQueue::average_queue_len,
            ),
            StatisticalMeasure::scalar(
                "average_service_time",
                "Average service time",
                r"$\hat{s}(n)$",
                "Time [minutes]",
                MmcQueue::average_service_time,
            ),
            StatisticalMeasure::scalar(
                "average_in_system",
                "Average number of customers in system",
                r"$\hat{q}(n) + \hat{u}(n)$",
                "Customers",
                MmcQueue::average_in_system,
            ),
            StatisticalMeasure::scalar(
                "utilization",
                "Server utilization",
                r"$\hat{u}(n)$",
                "",
                MmcQueue::utilization,
            ),
            StatisticalMeasure::distribution(
                "queue_len_distribution",
                "Probability of finding n customers in queue",
                r"$\hat{p}(Q(t) = n)$",
                "n",
                MmcQueue::queue_len_distribution,
            ),
            StatisticalMeasure::scalar(
                "blocking_probability",
                "Probability of denial of service",
                r"$\hat{p}(den)$",
                "",
                MmcQueue::blocking_probability,
            ),
            StatisticalMeasure::scalar(
                "queue_growth_rate",
                "Queue growth rate",
                r"$\hat{\beta}(n)$",
                "Customers per minute",
                MmcQueue::queue_growth_rate,
            ),
        ];

        match self.config.capacity {
            None => measures.retain(|m| m.key != "blocking_probability"),
            Some(0) => measures.retain(|m| {
                !matches!(
                    m.key,
                    "average_delay"
                        | "average_queue_len"
                        | "queue_len_distribution"
                        | "queue_growth_rate"
                )
            }),
            Some(_) => {}
        }
        measures
    }

    fn temporal_measures(&self) -> Vec<TemporalMeasure<Self>> {
        let mut measures = vec![
            TemporalMeasure {
                key: "queue_len_over_time",
                title: "Customers in queue over time",
                x_label: "Time [minutes]",
                y_label: "Customers",
                series: MmcQueue::queue_trajectory,
            },
            TemporalMeasure {
                key: "denied_over_time",
                title: "Cumulative denied customers over time",
                x_label: "Time [minutes]",
                y_label: "Customers",
                series: MmcQueue::denied_trajectory,
            },
        ];

        match self.config.capacity {
            None => measures.retain(|m| m.key != "denied_over_time"),
            Some(0) => measures.retain(|m| m.key != "queue_len_over_time"),
            Some(_) => {}
        }
        measures
    }
}
