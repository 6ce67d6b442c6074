use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use mc_dashboard::client::{HttpSimulationClient, InventoryRequest, PriceRequest, SimulationRequest};
use mc_dashboard::config::DashboardConfig;
use mc_dashboard::controller::Controller;
use mc_dashboard::error::{DashboardError, Result};
use mc_dashboard::output;
use mc_dashboard::profile::PageProfile;
use mc_dashboard::report::HtmlCanvasBoard;
use mc_dashboard::summary::{SimulationKind, SimulationResponse};

#[derive(Parser)]
#[command(
    name = "mc-dashboard",
    about = "Summarize and chart Monte Carlo simulation results"
)]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output directory (overrides the configured one)
    #[arg(long, global = true)]
    output_dir: Option<PathBuf>,

    /// Day index to inspect after the run; may be repeated
    #[arg(long = "day", global = true, allow_hyphen_values = true)]
    days: Vec<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the stock price simulation
    Price {
        #[arg(long)]
        initial_price: String,

        /// Annual volatility in percent
        #[arg(long)]
        volatility: String,

        #[arg(long)]
        num_days: String,

        #[arg(long)]
        num_simulations: String,

        /// Price whose probability of being reached is reported
        #[arg(long)]
        target_price: Option<String>,
    },

    /// Run the inventory simulation
    Inventory {
        #[arg(long)]
        initial_inventory: String,

        #[arg(long)]
        avg_daily_demand: String,

        #[arg(long)]
        demand_volatility: String,

        #[arg(long)]
        lead_time_days: String,

        #[arg(long)]
        num_days: String,

        #[arg(long)]
        num_simulations: String,
    },

    /// Run the simulation seeded from a real stock's history
    RealStock {
        /// Ticker symbol (e.g., AAPL)
        symbol: String,
    },

    /// Render a saved server response instead of calling the server
    Replay {
        #[arg(long, value_enum)]
        kind: SimulationKind,

        /// JSON response body
        #[arg(long)]
        input: PathBuf,
    },
}

enum Action {
    Fetch(SimulationRequest),
    Replay(SimulationResponse),
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("mc_dashboard={}", level)));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn action_for(command: Commands) -> Result<(PageProfile, Action)> {
    Ok(match command {
        Commands::Price {
            initial_price,
            volatility,
            num_days,
            num_simulations,
            target_price,
        } => (
            PageProfile::price(),
            Action::Fetch(SimulationRequest::Price(PriceRequest {
                initial_price,
                volatility,
                num_days,
                num_simulations,
                target_price: target_price.filter(|t| !t.trim().is_empty()),
            })),
        ),
        Commands::Inventory {
            initial_inventory,
            avg_daily_demand,
            demand_volatility,
            lead_time_days,
            num_days,
            num_simulations,
        } => (
            PageProfile::inventory(),
            Action::Fetch(SimulationRequest::Inventory(InventoryRequest {
                initial_inventory,
                avg_daily_demand,
                demand_volatility,
                lead_time_days,
                num_days,
                num_simulations,
            })),
        ),
        Commands::RealStock { symbol } => (
            PageProfile::real_stock(),
            Action::Fetch(SimulationRequest::RealStock { symbol }),
        ),
        Commands::Replay { kind, input } => {
            let body = std::fs::read_to_string(&input)?;
            (
                PageProfile::for_kind(kind),
                Action::Replay(SimulationResponse::decode(kind, &body)?),
            )
        }
    })
}

fn spinner(message: &'static str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner} {msg} [{elapsed}]")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}

fn run(cli: Cli, config: DashboardConfig) -> Result<()> {
    let (profile, action) = action_for(cli.command)?;
    let client = HttpSimulationClient::new(&config.server.base_url)?;
    let sampling = config.sampling_options();

    let mut controller =
        Controller::new(profile, client, HtmlCanvasBoard::new()).with_sampling(sampling);

    let pb = spinner(controller.profile().busy_caption);
    let outcome = match action {
        Action::Fetch(request) => controller.run(&request),
        Action::Replay(response) => controller.present(response),
    };
    pb.finish_and_clear();
    let cards = outcome?;

    println!("{}", controller.profile().page_title);
    for card in &cards {
        println!("  {:<32} {}", card.label, card.text);
    }

    for day in &cli.days {
        println!();
        println!("{}", controller.check_day(day).text());
    }

    let output_dir = cli
        .output_dir
        .unwrap_or(config.output.dir)
        .join(controller.profile().kind.name());
    let result = controller.result().ok_or(DashboardError::NoResultAvailable)?;
    output::save_all(
        controller.profile(),
        result,
        controller.renderer(),
        controller.page(),
        sampling.cap,
        sampling.strategy,
        &output_dir,
    )?;
    println!();
    println!("Saved dashboard to {}", output_dir.display());

    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match DashboardConfig::resolve(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };
    init_tracing(&config.log_level);

    match run(cli, config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
