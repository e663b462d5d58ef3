use clap::{Args, Subcommand};
use stratus::money::format_vnd;
use stratus_app::{
    context::AppContext,
    domain::orders::models::{ORDER_STEPS, Order},
};

#[derive(Debug, Args)]
pub(crate) struct OrderCommand {
    #[command(subcommand)]
    command: OrderSubcommand,
}

#[derive(Debug, Subcommand)]
enum OrderSubcommand {
    /// List your orders
    List,
    /// Show one order with its step progression
    Show(ShowOrderArgs),
}

#[derive(Debug, Args)]
struct ShowOrderArgs {
    order_id: i64,
}

pub(crate) async fn run(context: &AppContext, command: OrderCommand) -> Result<(), String> {
    match command.command {
        OrderSubcommand::List => list(context).await,
        OrderSubcommand::Show(args) => show(context, args).await,
    }
}

async fn list(context: &AppContext) -> Result<(), String> {
    let orders = context
        .orders
        .list_orders()
        .await
        .map_err(|error| error.display_message())?;

    for order in orders {
        println!(
            "{}: {:?} {}",
            order.order_id,
            order.status,
            format_vnd(order.total_amount)
        );
    }

    Ok(())
}

async fn show(context: &AppContext, args: ShowOrderArgs) -> Result<(), String> {
    let order = context
        .orders
        .get_order(args.order_id)
        .await
        .map_err(|error| error.display_message())?;

    print_order(&order);

    Ok(())
}

fn print_order(order: &Order) {
    println!("order_id: {}", order.order_id);
    println!("total: {}", format_vnd(order.total_amount));

    if let Some(created_at) = order.created_at {
        println!("created_at: {created_at}");
    }

    match order.status.step() {
        Some(current) => {
            for (index, step) in ORDER_STEPS.iter().enumerate() {
                let marker = if index <= current { "x" } else { " " };

                println!("[{marker}] {step}");
            }
        }
        None => println!("status: {:?}", order.status),
    }

    for item in &order.items {
        println!(
            "  {} x{} = {}",
            item.product_name,
            item.quantity,
            format_vnd(item.total_price)
        );
    }
}
