//! `bistro` - restaurant back-office from the terminal

mod commands;
mod logger;

use std::path::PathBuf;

use bistro_client::config::{DEFAULT_API_URL, DEFAULT_TIMEOUT_SECS};
use bistro_client::filters::{LoyaltyRange, SpentRange};
use bistro_client::{BistroClient, ClientConfig};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use shared::models::{MenuCategory, StaffRole, TableStatus};

#[derive(Parser)]
#[command(name = "bistro", version, about = "Restaurant back-office client")]
struct Cli {
    /// Backend base URL, without `/api`
    #[arg(long, global = true, env = "BISTRO_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,

    /// Directory for the token file
    #[arg(long, global = true, env = "BISTRO_HOME", default_value = ".bistro")]
    home: PathBuf,

    #[arg(long, global = true, env = "BISTRO_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout: u64,

    #[arg(long, global = true, env = "BISTRO_LOG_LEVEL", default_value = "bistro=info,bistro_client=info")]
    log_level: String,

    /// Also write JSON logs to this directory
    #[arg(long, global = true, env = "BISTRO_LOG_DIR")]
    log_dir: Option<PathBuf>,

    /// JSON console logs
    #[arg(long, global = true, default_value_t = false)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Sign in and store the tokens
    Login {
        #[arg(long, short)]
        username: String,
        #[arg(long, short, env = "BISTRO_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Forget the stored tokens
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Check the backend answers
    Health,
    Tables {
        #[command(subcommand)]
        command: TableCommand,
    },
    /// List bills
    Bills {
        #[arg(long)]
        from: Option<NaiveDate>,
        #[arg(long)]
        to: Option<NaiveDate>,
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        page: Option<u32>,
    },
    /// List menu items
    Menu {
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        category: Option<MenuCategory>,
    },
    /// List staff
    Staff {
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        role: Option<StaffRole>,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    Customers {
        #[command(subcommand)]
        command: CustomerCommand,
    },
    /// Recent reservations
    Reservations {
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Monthly figures and best sellers
    Dashboard,
}

#[derive(Subcommand)]
enum TableCommand {
    List {
        #[arg(long)]
        floor: Option<i32>,
        #[arg(long)]
        status: Option<TableStatus>,
    },
    Add {
        name: String,
        #[arg(long, default_value_t = 0)]
        floor: i32,
        #[arg(long, default_value_t = 4)]
        capacity: i32,
    },
    Remove {
        id: i64,
    },
    /// Orders recorded against a table
    Orders {
        id: i64,
    },
    /// Order menu items, e.g. `order 3 12x2 15`
    Order {
        id: i64,
        /// `MENU_ID` or `MENU_IDxQTY`
        #[arg(required = true)]
        items: Vec<String>,
    },
    /// Reserve a free table, or release a reserved one
    Toggle {
        id: i64,
    },
    /// Bill the table and free it
    Bill {
        id: i64,
        #[arg(long)]
        customer: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        date: Option<NaiveDate>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ExportArg {
    Excel,
    Csv,
}

#[derive(Subcommand)]
enum CustomerCommand {
    List {
        #[arg(long)]
        search: Option<String>,
        /// `0-50`, `51-100`, `101-200` or `200+`
        #[arg(long)]
        loyalty: Option<LoyaltyRange>,
        /// `0-5000000`, `5000000-10000000`, `10000000-20000000` or `20000000+`
        #[arg(long)]
        spent: Option<SpentRange>,
        /// Field to sort by, descending unless `--asc`
        #[arg(long)]
        sort: Option<String>,
        #[arg(long, default_value_t = false)]
        asc: bool,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Loyalty point history of one customer
    History {
        id: i64,
    },
    /// Download the customer list
    Export {
        #[arg(long, value_enum, default_value_t = ExportArg::Excel)]
        format: ExportArg,
        /// Output file; defaults to `customers.<ext>`
        #[arg(long, short)]
        out: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    logger::init_logger(&cli.log_level, cli.log_json, cli.log_dir.as_deref())?;

    let config = ClientConfig::new(&cli.api_url)
        .with_timeout(cli.timeout)
        .with_home(&cli.home);
    let client = BistroClient::new(config)?;

    commands::run(&client, cli.command).await
}
