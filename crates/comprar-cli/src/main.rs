//! Comprar CLI: run place-order scenarios from the command line.
//!
//! ## Usage
//!
//! ```bash
//! comprar run                              # products.json in ./test-data
//! comprar run --csv --file products.csv    # CSV fixtures
//! comprar run --headed                     # watch the browser work
//! comprar fixtures                         # preview fixture records
//! ```

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use comprar::fixture::{FixtureStore, Product};
use comprar::price::format_price;
use comprar::scenario::ScenarioReport;
use comprar::{ComprarResult, StoreConfig};
use tracing_subscriber::EnvFilter;

mod error;

use error::CliResult;

#[derive(Debug, Parser)]
#[command(name = "comprar", version, about = "Storefront place-order scenarios with price reconciliation")]
struct Cli {
    /// Log at debug level (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run the place-order scenario against the storefront
    Run(RunArgs),
    /// Load and print fixture records without touching a browser
    Fixtures(FixturesArgs),
}

#[derive(Debug, clap::Args)]
struct RunArgs {
    /// Directory holding fixture files
    #[arg(long, default_value = "test-data")]
    data_dir: PathBuf,

    /// Fixture file name inside the data directory
    #[arg(long, default_value = "products.json")]
    file: String,

    /// Read the fixture as CSV instead of JSON
    #[arg(long)]
    csv: bool,

    /// Storefront base URL
    #[arg(long, env = "BASE_URL")]
    base_url: Option<String>,

    /// Run with a visible browser window
    #[arg(long)]
    headed: bool,

    /// Test account email
    #[arg(long, env = "TEST_USER_EMAIL")]
    email: Option<String>,

    /// Test account password
    #[arg(long, env = "TEST_USER_PASSWORD")]
    password: Option<String>,
}

#[derive(Debug, clap::Args)]
struct FixturesArgs {
    /// Directory holding fixture files
    #[arg(long, default_value = "test-data")]
    data_dir: PathBuf,

    /// Fixture file name inside the data directory
    #[arg(long, default_value = "products.json")]
    file: String,

    /// Read the fixture as CSV instead of JSON
    #[arg(long)]
    csv: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let outcome = match cli.command {
        Commands::Run(args) => run_command(args).await,
        Commands::Fixtures(args) => fixtures_command(&args),
    };

    match outcome {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "comprar=debug" } else { "comprar=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

async fn run_command(args: RunArgs) -> CliResult<bool> {
    let products = load_products(&args.data_dir, &args.file, args.csv)?;
    let config = build_config(&args);

    let report = run_scenario(config, products).await?;
    print_report(&report);
    Ok(report.all_passed())
}

fn build_config(args: &RunArgs) -> StoreConfig {
    let mut config = StoreConfig::from_env();
    if let Some(url) = &args.base_url {
        config.base_url = url.clone();
    }
    if args.headed {
        config.headless = false;
    }
    if let Some(email) = &args.email {
        config.email = email.clone();
    }
    if let Some(password) = &args.password {
        config.password = password.clone();
    }
    config
}

fn load_products(data_dir: &Path, file: &str, csv: bool) -> ComprarResult<Vec<Product>> {
    let store = FixtureStore::new(data_dir);
    if csv {
        store.products_from_csv(file)
    } else {
        store.products_from_json(file)
    }
}

#[cfg(feature = "browser")]
async fn run_scenario(
    config: StoreConfig,
    products: Vec<Product>,
) -> CliResult<ScenarioReport> {
    use comprar::driver::{CdpDriver, ComprarDriver};
    use comprar::scenario::PlaceOrderScenario;

    let driver = CdpDriver::launch(&config).await?;
    let scenario = PlaceOrderScenario::new(config, products);
    let outcome = scenario.run(&driver).await;
    if let Err(e) = driver.close().await {
        tracing::warn!(error = %e, "browser did not close cleanly");
    }
    Ok(outcome?)
}

#[cfg(not(feature = "browser"))]
async fn run_scenario(
    _config: StoreConfig,
    _products: Vec<Product>,
) -> CliResult<ScenarioReport> {
    Err(error::CliError::Unsupported {
        message: "built without the `browser` feature".to_string(),
    })
}

fn print_report(report: &ScenarioReport) {
    println!();
    for step in &report.steps {
        let mark = if step.passed { "ok" } else { "FAILED" };
        match &step.detail {
            Some(detail) => println!("  {mark:6} {} ({detail})", step.name),
            None => println!("  {mark:6} {}", step.name),
        }
    }
    for error in &report.price_errors {
        println!("  price  {error}");
    }
    if let Some(order_number) = &report.order_number {
        println!("\nOrder number: {order_number}");
    }
    println!(
        "\n{} in {:.1}s",
        if report.all_passed() { "PASSED" } else { "FAILED" },
        report.duration.as_secs_f64()
    );
}

fn fixtures_command(args: &FixturesArgs) -> CliResult<bool> {
    use comprar::price::{item_total, sub_total, CartLineItem};

    let products = load_products(&args.data_dir, &args.file, args.csv)?;
    println!(
        "{} product(s) from {}:",
        products.len(),
        args.data_dir.join(&args.file).display()
    );
    for product in &products {
        println!(
            "  {:30} {:12} x{:<3} @ {:>8} = {:>8}",
            product.name,
            product.category,
            product.quantity,
            format_price(product.price),
            format_price(item_total(product.price, product.quantity))
        );
    }

    let lines: Vec<CartLineItem> = products
        .iter()
        .map(|p| CartLineItem {
            name: p.name.clone(),
            unit_price: p.price,
            quantity: p.quantity,
            observed_total: item_total(p.price, p.quantity),
        })
        .collect();
    println!("\nExpected subtotal: {}", format_price(sub_total(&lines)));
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_cli_parses_run_defaults() {
        let cli = Cli::parse_from(["comprar", "run"]);
        match cli.command {
            Commands::Run(args) => {
                assert_eq!(args.data_dir, PathBuf::from("test-data"));
                assert_eq!(args.file, "products.json");
                assert!(!args.csv);
                assert!(!args.headed);
            }
            Commands::Fixtures(_) => panic!("expected run"),
        }
    }

    #[test]
    fn test_headed_flag_disables_headless() {
        let cli = Cli::parse_from(["comprar", "run", "--headed", "--base-url", "http://shop.test"]);
        let Commands::Run(args) = cli.command else {
            panic!("expected run");
        };
        let config = build_config(&args);
        assert!(!config.headless);
        assert_eq!(config.base_url, "http://shop.test");
    }

    #[test]
    fn test_shipped_fixtures_parse() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../test-data");

        let products = load_products(&dir, "products.json", false).unwrap();
        assert!(!products.is_empty());

        let csv_products = load_products(&dir, "products.csv", true).unwrap();
        assert_eq!(products, csv_products);
    }

    #[test]
    fn test_fixtures_command_reads_json() {
        let dir = tempfile::tempdir().unwrap();
        let mut file = std::fs::File::create(dir.path().join("products.json")).unwrap();
        write!(
            file,
            r#"{{"products": [{{"name": "Fiction", "category": "Books", "price": 24.0, "quantity": 2}}]}}"#
        )
        .unwrap();

        let args = FixturesArgs {
            data_dir: dir.path().to_path_buf(),
            file: "products.json".to_string(),
            csv: false,
        };
        assert!(fixtures_command(&args).unwrap());
    }
}
