use clap::{Args, Subcommand};
use stratus_app::context::AppContext;

mod addon;
mod discount;
mod homepage;
mod order;
mod product;

#[derive(Debug, Args)]
pub(crate) struct AdminCommand {
    #[command(subcommand)]
    command: AdminSubcommand,
}

#[derive(Debug, Subcommand)]
enum AdminSubcommand {
    Product(product::ProductCommand),
    Discount(discount::DiscountCommand),
    Addon(addon::AddonCommand),
    Order(order::OrderCommand),
    Homepage(homepage::HomepageCommand),
}

pub(crate) async fn run(context: &AppContext, command: AdminCommand) -> Result<(), String> {
    match command.command {
        AdminSubcommand::Product(command) => product::run(context, command).await,
        AdminSubcommand::Discount(command) => discount::run(context, command).await,
        AdminSubcommand::Addon(command) => addon::run(context, command).await,
        AdminSubcommand::Order(command) => order::run(context, command).await,
        AdminSubcommand::Homepage(command) => homepage::run(context, command).await,
    }
}
