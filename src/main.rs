use anyhow::Result;
use chrono::NaiveDate;
use clap::{CommandFactory, Parser, Subcommand};
use dahab::core::log::init_logging;
use dahab::core::model::PriceMode;
use dahab::core::subscription::PlanDuration;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Display the portfolio dashboard
    Summary,
    /// Manage gold bar records
    #[command(subcommand)]
    Gold(GoldCommands),
    /// Manage cash entries
    #[command(subcommand)]
    Cash(CashCommands),
    /// Configure pricing mode and manual prices
    #[command(subcommand)]
    Price(PriceCommands),
    /// Administer the automatic pricing subscription
    #[command(subcommand)]
    Subscription(SubscriptionCommands),
}

#[derive(Subcommand)]
enum GoldCommands {
    /// Record a purchased bar
    Add {
        /// Weight in grams of pure gold
        #[arg(long)]
        weight: f64,
        /// Total purchase price, manufacturing fee included
        #[arg(long)]
        price: f64,
        /// Manufacturing cost per gram
        #[arg(long, default_value_t = 0.0)]
        manufacturing: f64,
        /// Cashback per gram
        #[arg(long, default_value_t = 0.0)]
        cashback: f64,
        /// Purchase date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Record the sale of a bar
    Sell {
        id: String,
        /// Total sale price
        #[arg(long)]
        price: f64,
        /// Sale date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Correct the purchase date of a bar
    SetDate { id: String, date: NaiveDate },
    /// Delete a bar record
    Remove { id: String },
}

#[derive(Subcommand)]
enum CashCommands {
    /// Record a deposit (or a withdrawal, with a negative amount)
    Add {
        #[arg(long, allow_hyphen_values = true)]
        amount: f64,
        #[arg(long, default_value = "")]
        description: String,
        /// Entry date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Replace an entry's amount, description and date
    Edit {
        id: String,
        #[arg(long, allow_hyphen_values = true)]
        amount: f64,
        #[arg(long)]
        description: String,
        #[arg(long)]
        date: NaiveDate,
    },
    /// Delete an entry
    Remove { id: String },
}

#[derive(Subcommand)]
enum PriceCommands {
    /// Select the pricing mode (manual-gram, usd-ounce or auto)
    Mode { mode: PriceMode },
    /// Set the manual EGP-per-gram price (also selects manual-gram mode)
    SetGram { price: f64 },
    /// Set the manual USD/ounce quote and EGP/USD rate (also selects usd-ounce mode)
    SetOunce {
        #[arg(long)]
        xau: f64,
        #[arg(long)]
        usd: f64,
    },
}

#[derive(Subcommand)]
enum SubscriptionCommands {
    /// Activate automatic pricing for a duration (30min, 7d, 2w, 1M)
    Activate { duration: PlanDuration },
    /// Cancel the subscription and revert to manual pricing
    Cancel,
    /// Show subscription state and remaining time
    Status,
}

impl From<Commands> for dahab::AppCommand {
    fn from(cmd: Commands) -> dahab::AppCommand {
        match cmd {
            Commands::Summary => dahab::AppCommand::Summary,
            Commands::Gold(gold) => dahab::AppCommand::Gold(match gold {
                GoldCommands::Add {
                    weight,
                    price,
                    manufacturing,
                    cashback,
                    date,
                } => dahab::GoldAction::Add {
                    weight,
                    price,
                    manufacturing,
                    cashback,
                    date,
                },
                GoldCommands::Sell { id, price, date } => {
                    dahab::GoldAction::Sell { id, price, date }
                }
                GoldCommands::SetDate { id, date } => dahab::GoldAction::SetDate { id, date },
                GoldCommands::Remove { id } => dahab::GoldAction::Remove { id },
            }),
            Commands::Cash(cash) => dahab::AppCommand::Cash(match cash {
                CashCommands::Add {
                    amount,
                    description,
                    date,
                } => dahab::CashAction::Add {
                    amount,
                    description,
                    date,
                },
                CashCommands::Edit {
                    id,
                    amount,
                    description,
                    date,
                } => dahab::CashAction::Edit {
                    id,
                    amount,
                    description,
                    date,
                },
                CashCommands::Remove { id } => dahab::CashAction::Remove { id },
            }),
            Commands::Price(price) => dahab::AppCommand::Price(match price {
                PriceCommands::Mode { mode } => dahab::PriceAction::Mode { mode },
                PriceCommands::SetGram { price } => dahab::PriceAction::SetGram { price },
                PriceCommands::SetOunce { xau, usd } => dahab::PriceAction::SetOunce { xau, usd },
            }),
            Commands::Subscription(subscription) => {
                dahab::AppCommand::Subscription(match subscription {
                    SubscriptionCommands::Activate { duration } => {
                        dahab::SubscriptionAction::Activate { duration }
                    }
                    SubscriptionCommands::Cancel => dahab::SubscriptionAction::Cancel,
                    SubscriptionCommands::Status => dahab::SubscriptionAction::Status,
                })
            }
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => setup(),
        Some(cmd) => dahab::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}

fn setup() -> anyhow::Result<()> {
    use anyhow::Context;

    let path = dahab::config::AppConfig::default_config_path()?;

    if path.exists() {
        anyhow::bail!("Configuration file already exists at {}", path.display());
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let default_config = r#"---
providers:
  ounce:
    base_url: "https://sa.investing.com"
  rate:
    base_url: "https://gold-price-live.com"

currency: "EGP"
"#;

    std::fs::write(&path, default_config)
        .with_context(|| format!("Failed to write config file to {}", path.display()))?;

    tracing::info!("Created default configuration at {}", path.display());
    Ok(())
}
