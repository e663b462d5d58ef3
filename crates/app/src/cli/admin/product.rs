use std::collections::BTreeMap;

use clap::{Args, Subcommand};
use stratus::money::{Amount, format_vnd};
use stratus_app::{
    context::AppContext,
    domain::admin::models::{ProductDraft, ProductPatch},
};

#[derive(Debug, Args)]
pub(crate) struct ProductCommand {
    #[command(subcommand)]
    command: ProductSubcommand,
}

#[derive(Debug, Subcommand)]
enum ProductSubcommand {
    /// List every product
    List,
    /// Create a product
    Create(CreateProductArgs),
    /// Update a product's fields
    Update(UpdateProductArgs),
    /// Delete a product
    Delete(DeleteProductArgs),
}

#[derive(Debug, Args)]
struct CreateProductArgs {
    /// Product display name
    #[arg(long)]
    name: String,

    #[arg(long)]
    description: Option<String>,

    /// Price per month in VND
    #[arg(long)]
    monthly_price: Amount,

    /// Price per year in VND, already discounted for the commitment
    #[arg(long)]
    yearly_price: Amount,

    /// Spec sheet attributes as KEY=VALUE, e.g. vCPU=2
    #[arg(long)]
    attribute: Vec<String>,
}

#[derive(Debug, Args)]
struct UpdateProductArgs {
    product_id: i64,

    #[arg(long)]
    name: Option<String>,

    #[arg(long)]
    description: Option<String>,

    #[arg(long)]
    monthly_price: Option<Amount>,

    #[arg(long)]
    yearly_price: Option<Amount>,
}

#[derive(Debug, Args)]
struct DeleteProductArgs {
    product_id: i64,
}

pub(crate) async fn run(context: &AppContext, command: ProductCommand) -> Result<(), String> {
    match command.command {
        ProductSubcommand::List => list(context).await,
        ProductSubcommand::Create(args) => create(context, args).await,
        ProductSubcommand::Update(args) => update(context, args).await,
        ProductSubcommand::Delete(args) => delete(context, args).await,
    }
}

async fn list(context: &AppContext) -> Result<(), String> {
    let products = context
        .admin
        .list_products()
        .await
        .map_err(|error| error.display_message())?;

    for product in products {
        println!(
            "{}: {} ({} / month)",
            product.id,
            product.name,
            format_vnd(product.monthly_price)
        );
    }

    Ok(())
}

async fn create(context: &AppContext, args: CreateProductArgs) -> Result<(), String> {
    let attributes = args
        .attribute
        .iter()
        .map(|pair| parse_attribute(pair))
        .collect::<Result<BTreeMap<_, _>, _>>()?;

    let product = context
        .admin
        .create_product(ProductDraft {
            name: args.name,
            description: args.description,
            monthly_price: args.monthly_price,
            yearly_price: args.yearly_price,
            attributes,
        })
        .await
        .map_err(|error| error.display_message())?;

    println!("created product {}", product.id);

    Ok(())
}

async fn update(context: &AppContext, args: UpdateProductArgs) -> Result<(), String> {
    let product = context
        .admin
        .update_product(
            args.product_id,
            ProductPatch {
                name: args.name,
                description: args.description,
                monthly_price: args.monthly_price,
                yearly_price: args.yearly_price,
            },
        )
        .await
        .map_err(|error| error.display_message())?;

    println!("updated product {}", product.id);

    Ok(())
}

async fn delete(context: &AppContext, args: DeleteProductArgs) -> Result<(), String> {
    context
        .admin
        .delete_product(args.product_id)
        .await
        .map_err(|error| error.display_message())?;

    println!("deleted product {}", args.product_id);

    Ok(())
}

fn parse_attribute(pair: &str) -> Result<(String, String), String> {
    let (key, value) = pair
        .split_once('=')
        .ok_or_else(|| format!("invalid attribute '{pair}', expected KEY=VALUE"))?;

    Ok((key.trim().to_string(), value.trim().to_string()))
}
