use clap::{Args, Subcommand};
use stratus_app::{context::AppContext, domain::admin::models::DiscountDraft};

#[derive(Debug, Args)]
pub(crate) struct DiscountCommand {
    #[command(subcommand)]
    command: DiscountSubcommand,
}

#[derive(Debug, Subcommand)]
enum DiscountSubcommand {
    /// List configured discounts
    List,
    /// Attach a discount to a product
    Create(CreateDiscountArgs),
    /// Remove a discount
    Delete(DeleteDiscountArgs),
}

#[derive(Debug, Args)]
struct CreateDiscountArgs {
    /// Product the code applies to
    #[arg(long)]
    product_id: i64,

    /// Code customers submit at configuration time
    #[arg(long)]
    code: String,

    /// Percentage off the pre-VAT base subtotal
    #[arg(long)]
    percent: f64,
}

#[derive(Debug, Args)]
struct DeleteDiscountArgs {
    discount_id: i64,
}

pub(crate) async fn run(context: &AppContext, command: DiscountCommand) -> Result<(), String> {
    match command.command {
        DiscountSubcommand::List => list(context).await,
        DiscountSubcommand::Create(args) => create(context, args).await,
        DiscountSubcommand::Delete(args) => delete(context, args).await,
    }
}

async fn list(context: &AppContext) -> Result<(), String> {
    let discounts = context
        .admin
        .list_discounts()
        .await
        .map_err(|error| error.display_message())?;

    for discount in discounts {
        println!(
            "{}: {} ({}% off product {})",
            discount.id, discount.code, discount.discount_percent, discount.product_id,
        );
    }

    Ok(())
}

async fn create(context: &AppContext, args: CreateDiscountArgs) -> Result<(), String> {
    let discount = context
        .admin
        .create_discount(DiscountDraft {
            product_id: args.product_id,
            code: args.code,
            discount_percent: args.percent,
        })
        .await
        .map_err(|error| error.display_message())?;

    println!("created discount {}", discount.id);

    Ok(())
}

async fn delete(context: &AppContext, args: DeleteDiscountArgs) -> Result<(), String> {
    context
        .admin
        .delete_discount(args.discount_id)
        .await
        .map_err(|error| error.display_message())?;

    println!("deleted discount {}", args.discount_id);

    Ok(())
}
