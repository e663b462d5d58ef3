use clap::{Args, Subcommand};
use stratus::money::format_vnd;
use stratus_app::context::AppContext;

#[derive(Debug, Args)]
pub(crate) struct CatalogCommand {
    #[command(subcommand)]
    command: CatalogSubcommand,
}

#[derive(Debug, Subcommand)]
enum CatalogSubcommand {
    /// List sellable products
    Products,
    /// Show one product with its spec sheet and discount
    Show(ShowProductArgs),
    /// List selectable OS templates
    Os,
    /// List available addons
    Addons,
}

#[derive(Debug, Args)]
struct ShowProductArgs {
    product_id: i64,
}

pub(crate) async fn run(context: &AppContext, command: CatalogCommand) -> Result<(), String> {
    match command.command {
        CatalogSubcommand::Products => list_products(context).await,
        CatalogSubcommand::Show(args) => show_product(context, args).await,
        CatalogSubcommand::Os => list_os_templates(context).await,
        CatalogSubcommand::Addons => list_addons(context).await,
    }
}

async fn list_products(context: &AppContext) -> Result<(), String> {
    let products = context
        .catalog
        .list_products()
        .await
        .map_err(|error| error.display_message())?;

    for product in products {
        println!(
            "{}: {} ({} / month, {} / year)",
            product.id,
            product.name,
            format_vnd(product.monthly_price),
            format_vnd(product.yearly_price),
        );
    }

    Ok(())
}

async fn show_product(context: &AppContext, args: ShowProductArgs) -> Result<(), String> {
    let product = context
        .catalog
        .get_product(args.product_id)
        .await
        .map_err(|error| error.display_message())?;

    println!("name: {}", product.name);

    if let Some(description) = &product.description {
        println!("description: {description}");
    }

    println!("monthly: {}", format_vnd(product.monthly_price));
    println!("yearly: {}", format_vnd(product.yearly_price));

    for (attribute, value) in &product.attributes {
        println!("{attribute}: {value}");
    }

    match &product.discount {
        Some(discount) => println!(
            "discount: {} ({}% off)",
            discount.code, discount.discount_percent
        ),
        None => println!("discount: none"),
    }

    Ok(())
}

async fn list_os_templates(context: &AppContext) -> Result<(), String> {
    let templates = context
        .catalog
        .list_os_templates()
        .await
        .map_err(|error| error.display_message())?;

    if templates.is_empty() {
        println!("no OS templates available");

        return Ok(());
    }

    for template in templates {
        match template.version {
            Some(version) => println!("{}: {} {version}", template.id, template.name),
            None => println!("{}: {}", template.id, template.name),
        }
    }

    Ok(())
}

async fn list_addons(context: &AppContext) -> Result<(), String> {
    let addons = context
        .catalog
        .list_addons()
        .await
        .map_err(|error| error.display_message())?;

    if addons.is_empty() {
        println!("no addons available");

        return Ok(());
    }

    for addon in addons {
        println!(
            "{}: {} ({} per {} per month, max {})",
            addon.addon_type.as_str(),
            addon.name,
            format_vnd(addon.unit_price),
            addon.unit,
            addon.max_quantity,
        );
    }

    Ok(())
}
