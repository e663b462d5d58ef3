use clap::{Args, Subcommand, ValueEnum};
use stratus::money::format_vnd;
use stratus_app::{context::AppContext, domain::orders::models::OrderStatus};

#[derive(Debug, Args)]
pub(crate) struct OrderCommand {
    #[command(subcommand)]
    command: OrderSubcommand,
}

#[derive(Debug, Subcommand)]
enum OrderSubcommand {
    /// List every customer order
    List,
    /// Override an order's status
    SetStatus(SetStatusArgs),
}

#[derive(Debug, Args)]
struct SetStatusArgs {
    order_id: i64,

    #[arg(long, value_enum)]
    status: StatusArg,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum StatusArg {
    PendingPayment,
    Paid,
    Provisioning,
    Active,
    Cancelled,
}

impl From<StatusArg> for OrderStatus {
    fn from(status: StatusArg) -> Self {
        match status {
            StatusArg::PendingPayment => Self::PendingPayment,
            StatusArg::Paid => Self::Paid,
            StatusArg::Provisioning => Self::Provisioning,
            StatusArg::Active => Self::Active,
            StatusArg::Cancelled => Self::Cancelled,
        }
    }
}

pub(crate) async fn run(context: &AppContext, command: OrderCommand) -> Result<(), String> {
    match command.command {
        OrderSubcommand::List => list(context).await,
        OrderSubcommand::SetStatus(args) => set_status(context, args).await,
    }
}

async fn list(context: &AppContext) -> Result<(), String> {
    let orders = context
        .admin
        .list_orders()
        .await
        .map_err(|error| error.display_message())?;

    for order in orders {
        let customer = order.customer_email.as_deref().unwrap_or("unknown");

        println!(
            "{}: {customer} {:?} {}",
            order.order_id,
            order.status,
            format_vnd(order.total_amount)
        );
    }

    Ok(())
}

async fn set_status(context: &AppContext, args: SetStatusArgs) -> Result<(), String> {
    let order = context
        .admin
        .update_order_status(args.order_id, args.status.into())
        .await
        .map_err(|error| error.display_message())?;

    println!("order {} is now {:?}", order.order_id, order.status);

    Ok(())
}
