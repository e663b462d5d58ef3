use clap::{Args, Subcommand};
use stratus::{billing::BillingCycle, cart::Quantity, money::format_vnd};
use stratus_app::{
    context::AppContext,
    domain::carts::models::{AddItemRequest, AddonRequest},
};

#[derive(Debug, Args)]
pub(crate) struct CartCommand {
    #[command(subcommand)]
    command: CartSubcommand,
}

#[derive(Debug, Subcommand)]
enum CartSubcommand {
    /// Show the cart with line totals
    Show,
    /// Add a configured product
    Add(AddArgs),
    /// Change a line's quantity
    Update(UpdateArgs),
    /// Remove a line
    Remove(RemoveArgs),
    /// Empty the cart
    Clear,
    /// Turn the cart into an order
    Checkout,
}

#[derive(Debug, Args)]
struct AddArgs {
    product_id: i64,

    /// Billing cycle in months (1, 3, 6 or 12)
    #[arg(long, default_value_t = 1)]
    months: u32,

    #[arg(long, default_value_t = 1)]
    quantity: u32,

    /// Addon selections as TYPE=QUANTITY, e.g. RAM=2
    #[arg(long)]
    addon: Vec<String>,

    /// Discount code to apply against the product's attached discount
    #[arg(long)]
    discount_code: Option<String>,
}

#[derive(Debug, Args)]
struct UpdateArgs {
    item_id: String,

    #[arg(long)]
    quantity: u32,
}

#[derive(Debug, Args)]
struct RemoveArgs {
    item_id: String,
}

pub(crate) async fn run(context: &AppContext, command: CartCommand) -> Result<(), String> {
    match command.command {
        CartSubcommand::Show => show(context).await,
        CartSubcommand::Add(args) => add(context, args).await,
        CartSubcommand::Update(args) => update(context, args).await,
        CartSubcommand::Remove(args) => remove(context, args).await,
        CartSubcommand::Clear => clear(context).await,
        CartSubcommand::Checkout => checkout(context).await,
    }
}

async fn show(context: &AppContext) -> Result<(), String> {
    let cart = context
        .carts
        .fetch_cart()
        .await
        .map_err(|error| error.display_message())?;

    if cart.is_empty() {
        println!("cart is empty");

        return Ok(());
    }

    for item in cart.iter() {
        println!(
            "{}: {} x{} ({} months) = {}",
            item.id,
            item.product_name,
            item.quantity.get(),
            item.billing_cycle.months(),
            format_vnd(item.total),
        );

        for addon in &item.addons_applied {
            println!(
                "  + {} x{} {} = {}",
                addon.addon_type,
                addon.quantity,
                addon.unit,
                format_vnd(addon.total_price),
            );
        }

        if let Some(discount) = &item.discount_applied {
            println!(
                "  - {} ({}% off, {})",
                discount.code,
                discount.discount_percent,
                format_vnd(discount.discount_amount),
            );
        }
    }

    println!("lines: {}", cart.item_count());
    println!("subtotal: {}", format_vnd(cart.subtotal()));
    println!("vat: {}", format_vnd(cart.vat()));
    println!("total: {}", format_vnd(cart.total()));

    Ok(())
}

async fn add(context: &AppContext, args: AddArgs) -> Result<(), String> {
    let quantity = Quantity::new(args.quantity).map_err(|error| error.to_string())?;

    let addons = args
        .addon
        .iter()
        .map(|selection| parse_addon(selection))
        .collect::<Result<Vec<_>, _>>()?;

    let item = context
        .carts
        .add_item(AddItemRequest {
            product_id: args.product_id,
            billing_cycle: BillingCycle::new(args.months),
            quantity,
            addons,
            discount_code: args.discount_code,
        })
        .await
        .map_err(|error| error.display_message())?;

    context
        .notifier
        .success(format!("added {} to the cart", item.product_name));

    println!("item {}: {}", item.id, format_vnd(item.total));

    Ok(())
}

async fn update(context: &AppContext, args: UpdateArgs) -> Result<(), String> {
    let quantity = Quantity::new(args.quantity).map_err(|error| error.to_string())?;

    let item = context
        .carts
        .update_item_quantity(&args.item_id, quantity)
        .await
        .map_err(|error| error.display_message())?;

    println!(
        "item {}: x{} = {}",
        item.id,
        item.quantity.get(),
        format_vnd(item.total)
    );

    Ok(())
}

async fn remove(context: &AppContext, args: RemoveArgs) -> Result<(), String> {
    context
        .carts
        .remove_item(&args.item_id)
        .await
        .map_err(|error| error.display_message())?;

    context.notifier.info("item removed");

    Ok(())
}

async fn clear(context: &AppContext) -> Result<(), String> {
    context
        .carts
        .clear()
        .await
        .map_err(|error| error.display_message())?;

    context.notifier.info("cart cleared");

    Ok(())
}

async fn checkout(context: &AppContext) -> Result<(), String> {
    let receipt = context
        .carts
        .checkout()
        .await
        .map_err(|error| error.display_message())?;

    context.notifier.success("order created");

    println!("order_id: {}", receipt.order_id);

    Ok(())
}

fn parse_addon(selection: &str) -> Result<AddonRequest, String> {
    let (addon_type, quantity) = selection
        .split_once('=')
        .ok_or_else(|| format!("invalid addon selection '{selection}', expected TYPE=QUANTITY"))?;

    let quantity = quantity
        .trim()
        .parse::<u32>()
        .map_err(|_| format!("invalid addon quantity in '{selection}'"))?;

    Ok(AddonRequest {
        addon_type: addon_type.trim().to_string(),
        quantity,
    })
}
