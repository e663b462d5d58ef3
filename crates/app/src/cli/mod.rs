use std::path::PathBuf;

use clap::{Parser, Subcommand};

use stratus_app::{
    api::{ApiConfig, ApiToken},
    context::AppContext,
};

mod admin;
mod cart;
mod catalog;
mod instance;
mod order;
mod payment;

#[derive(Debug, Parser)]
#[command(name = "stratus", about = "Stratus storefront console", long_about = None)]
pub(crate) struct Cli {
    /// Base URL of the storefront API
    #[arg(long, env = "STRATUS_API_URL", default_value = "http://localhost:8000/api")]
    api_url: String,

    /// API bearer token; omit for an anonymous session with a local cart
    #[arg(long, env = "STRATUS_API_TOKEN", hide_env_values = true)]
    api_token: Option<String>,

    /// Where the anonymous cart is saved
    #[arg(long, env = "STRATUS_CART_PATH", default_value = "stratus-cart.json")]
    cart_path: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Catalog(catalog::CatalogCommand),
    Cart(cart::CartCommand),
    Order(order::OrderCommand),
    Payment(payment::PaymentCommand),
    Instance(instance::InstanceCommand),
    Admin(admin::AdminCommand),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        let config = ApiConfig::new(self.api_url, self.api_token.map(ApiToken::new));

        let context = AppContext::new(config, self.cart_path)
            .map_err(|error| format!("failed to initialise services: {error}"))?;

        match self.command {
            Commands::Catalog(command) => catalog::run(&context, command).await,
            Commands::Cart(command) => cart::run(&context, command).await,
            Commands::Order(command) => order::run(&context, command).await,
            Commands::Payment(command) => payment::run(&context, command).await,
            Commands::Instance(command) => instance::run(&context, command).await,
            Commands::Admin(command) => admin::run(&context, command).await,
        }
    }
}
