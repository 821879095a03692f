//! Stochsim CLI
//!
//! Runs queueing or inventory experiments and prints (or renders) the report.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use stochsim_core::ParameterVariator;
use stochsim_inventory::{InventoryConfig, InventoryVariator, Policy};
use stochsim_queueing::QueueVariator;
use stochsim_simulator::{render_report, Experiment, ExperimentConfig, SvgPlotter};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "stochsim")]
#[command(about = "Discrete-event simulation experiments")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// M/M/c queue over a grid of load ratios and capacities
    Queue {
        /// Service rate (customers per minute)
        #[arg(long, default_value = "2")]
        service_rate: f64,

        /// Arrival-to-service rate ratios (comma-separated)
        #[arg(long, value_delimiter = ',', default_values_t = [0.25, 0.5, 0.75, 1.0, 1.25])]
        load_ratios: Vec<f64>,

        /// Waiting-line capacities, `inf` for unbounded (comma-separated)
        #[arg(long, value_delimiter = ',', value_parser = parse_capacity,
              default_values = ["inf", "0", "2", "5", "10", "50"])]
        capacities: Vec<Capacity>,

        /// Number of servers
        #[arg(long, default_value = "1")]
        servers: usize,

        /// Customers to delay in each replication
        #[arg(long, default_value = "1000")]
        customers: u64,

        #[command(flatten)]
        run: RunArgs,
    },

    /// (s, S) inventory policy comparison
    Inventory {
        /// Horizon in months
        #[arg(long, default_value = "120")]
        horizon: f64,

        /// Policies as `s:S` pairs (comma-separated)
        #[arg(long, value_delimiter = ',', value_parser = parse_policy,
              default_values = ["20:40", "20:60"])]
        policies: Vec<Policy>,

        #[command(flatten)]
        run: RunArgs,
    },
}

#[derive(Args)]
struct RunArgs {
    /// Replications per combination
    #[arg(long, default_value = "100")]
    replications: usize,

    /// Base seed
    #[arg(long, default_value = "12345")]
    seed: u64,

    /// Confidence level of the intervals
    #[arg(long, default_value = "0.95")]
    confidence: f64,

    /// Run replications on all cores
    #[arg(long)]
    parallel: bool,

    /// Render charts and captions under this directory
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Print the report as JSON instead of text
    #[arg(long)]
    json: bool,
}

impl RunArgs {
    fn config(&self) -> ExperimentConfig {
        ExperimentConfig::new(self.replications)
            .with_seed(self.seed)
            .with_confidence(self.confidence)
            .with_parallel(self.parallel)
    }
}

/// `None` means unbounded.
type Capacity = Option<usize>;

fn parse_capacity(s: &str) -> Result<Capacity, String> {
    match s.trim().to_lowercase().as_str() {
        "inf" | "∞" => Ok(None),
        n => n
            .parse()
            .map(Some)
            .map_err(|_| format!("Invalid capacity: {}", s)),
    }
}

fn parse_policy(s: &str) -> Result<Policy, String> {
    let (low, high) = s
        .split_once(':')
        .ok_or_else(|| format!("Policy must be `s:S`, got {}", s))?;
    let reorder_point = low
        .trim()
        .parse()
        .map_err(|_| format!("Invalid reorder point: {}", low))?;
    let order_up_to = high
        .trim()
        .parse()
        .map_err(|_| format!("Invalid order-up-to level: {}", high))?;
    Ok(Policy {
        reorder_point,
        order_up_to,
    })
}

fn execute<V>(variator: V, args: &RunArgs) -> Result<(), Box<dyn std::error::Error>>
where
    V: ParameterVariator,
    V::Model: Send,
    <V::Model as stochsim_core::Model>::Event: Send,
{
    let mut experiment = Experiment::new(variator, args.config())?;
    experiment.execute()?;
    let report = experiment.report()?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report);
    }

    if let Some(dir) = &args.out_dir {
        let mut plotter = SvgPlotter::new(dir);
        let charts = render_report(&report, &mut plotter)?;
        info!(charts, out_dir = %dir.display(), "Charts rendered");
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Queue {
            service_rate,
            load_ratios,
            capacities,
            servers,
            customers,
            run,
        } => {
            let variator = QueueVariator::new(service_rate, load_ratios, capacities)
                .with_servers(servers)
                .with_customers(customers);
            execute(variator, &run)?;
        }

        Commands::Inventory {
            horizon,
            policies,
            run,
        } => {
            let base = InventoryConfig::default().with_horizon(horizon);
            execute(InventoryVariator::from_policies(base, policies), &run)?;
        }
    }

    Ok(())
}
