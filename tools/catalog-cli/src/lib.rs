//! Command-line front end: run catalog scenarios and manage products on a
//! running catalog service.

use anyhow::Context;
use catalog_core::{Category, NewProduct, Price, ProductFilter, ProductId};
use clap::{Args, Parser, Subcommand};
use product_store::{HttpProductStore, ProductStore};
use std::path::PathBuf;
use step_runner::{FeatureRunner, RunSummary, RunnerConfig, ScenarioStatus, StoreBackend};
use tracing::info;

const DEFAULT_BASE_URL: &str = "http://localhost:8080";

#[derive(Parser, Debug)]
#[command(name = "catalog")]
#[command(about = "Catalog CLI - Scenario runner and product management")]
#[command(version = catalog_core::VERSION)]
pub struct Cli {
    /// Catalog service URL. `run` uses an in-memory store when omitted.
    #[arg(long, global = true, env = "CATALOG_BASE_URL")]
    pub base_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run feature files or directories of them
    Run {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        /// Title the home page is expected to carry
        #[arg(long)]
        title: Option<String>,
    },
    /// Product management commands
    Product {
        #[command(subcommand)]
        action: ProductAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ProductAction {
    /// List products, optionally filtered
    List {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        category: Option<Category>,
        #[arg(long)]
        available: Option<bool>,
    },
    /// Show one product
    Get { id: ProductId },
    /// Create a product
    Create(ProductArgs),
    /// Replace a product's fields
    Update {
        id: ProductId,
        #[command(flatten)]
        fields: ProductArgs,
    },
    /// Delete a product
    Delete { id: ProductId },
}

#[derive(Args, Debug)]
pub struct ProductArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long, default_value = "")]
    pub description: String,
    #[arg(long)]
    pub price: Price,
    #[arg(long)]
    pub available: bool,
    #[arg(long, default_value = "UNKNOWN")]
    pub category: Category,
}

impl From<ProductArgs> for NewProduct {
    fn from(args: ProductArgs) -> Self {
        NewProduct {
            name: args.name,
            description: args.description,
            price: args.price,
            available: args.available,
            category: args.category,
        }
    }
}

/// Execute a parsed command line. `Ok(false)` means scenarios failed.
pub async fn execute(cli: Cli) -> anyhow::Result<bool> {
    match cli.command {
        Commands::Run { paths, title } => handle_run(cli.base_url, paths, title).await,
        Commands::Product { action } => {
            let base_url = cli.base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
            handle_product_action(HttpProductStore::new(base_url), action).await?;
            Ok(true)
        }
    }
}

async fn handle_run(
    base_url: Option<String>,
    paths: Vec<PathBuf>,
    title: Option<String>,
) -> anyhow::Result<bool> {
    let mut config = match base_url {
        Some(url) => RunnerConfig::remote(url),
        None => RunnerConfig::default(),
    };
    if let Some(title) = title {
        config.home_page_title = title;
    }
    if let StoreBackend::Remote { base_url } = &config.backend {
        info!("Running scenarios against {}", base_url);
    }

    let summary = FeatureRunner::new(config)?
        .run_paths(&paths)
        .await
        .context("Scenario run aborted")?;
    print_summary(&summary);
    Ok(summary.is_success())
}

fn print_summary(summary: &RunSummary) {
    for feature in &summary.features {
        println!("📄 {}", feature.name);
        for scenario in &feature.scenarios {
            match &scenario.status {
                ScenarioStatus::Passed => println!("  ✅ {}", scenario.name),
                ScenarioStatus::Failed {
                    step,
                    index,
                    kind,
                    error,
                } => {
                    println!("  ❌ {} (step {}: {}) [{}]", scenario.name, index, step, kind);
                    println!("     {}", error);
                }
            }
        }
    }
    println!(
        "{} scenarios ({} passed, {} failed)",
        summary.total(),
        summary.passed(),
        summary.failed()
    );
}

async fn handle_product_action(
    store: HttpProductStore,
    action: ProductAction,
) -> anyhow::Result<()> {
    match action {
        ProductAction::List {
            name,
            category,
            available,
        } => {
            let filter = ProductFilter {
                name,
                category,
                available,
            };
            let products = store.list(&filter).await?;
            println!("📋 {} products", products.len());
            for product in products {
                println!(
                    "{:>4}  {:<20} {:<12} {:>10}  {}",
                    product.id,
                    product.name,
                    product.category.label(),
                    product.price,
                    if product.available { "available" } else { "unavailable" }
                );
            }
        }
        ProductAction::Get { id } => {
            let product = store.get(id).await?;
            println!("{}", serde_json::to_string_pretty(&product)?);
        }
        ProductAction::Create(args) => {
            let product = store.create(args.into()).await?;
            println!("➕ Created product {}", product.id);
            println!("{}", serde_json::to_string_pretty(&product)?);
        }
        ProductAction::Update { id, fields } => {
            let product = store.update(id, fields.into()).await?;
            println!("✏️  Updated product {}", product.id);
        }
        ProductAction::Delete { id } => {
            store.delete(id).await?;
            println!("🗑️  Product {} deleted", id);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_requires_paths() {
        assert!(Cli::try_parse_from(["catalog", "run"]).is_err());
    }

    #[test]
    fn test_product_create_arguments() {
        let cli = Cli::try_parse_from([
            "catalog",
            "product",
            "create",
            "--name",
            "Hammer",
            "--price",
            "34.95",
            "--category",
            "tools",
            "--available",
        ])
        .unwrap();

        match cli.command {
            Commands::Product {
                action: ProductAction::Create(args),
            } => {
                let product = NewProduct::from(args);
                assert_eq!(product.price.cents(), 3495);
                assert_eq!(product.category, Category::Tools);
                assert!(product.available);
                assert_eq!(product.description, "");
            }
            other => panic!("Unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_bad_price_is_rejected_by_parser() {
        let parsed = Cli::try_parse_from([
            "catalog", "product", "create", "--name", "Hammer", "--price", "cheap",
        ]);
        assert!(parsed.is_err());
    }
}
