use clap::{Args, Subcommand};
use stratus::money::Amount;
use stratus_app::{context::AppContext, domain::admin::models::AddonDraft};

#[derive(Debug, Args)]
pub(crate) struct AddonCommand {
    #[command(subcommand)]
    command: AddonSubcommand,
}

#[derive(Debug, Subcommand)]
enum AddonSubcommand {
    /// Create an addon
    Create(CreateAddonArgs),
    /// Remove an addon
    Delete(DeleteAddonArgs),
}

#[derive(Debug, Args)]
struct CreateAddonArgs {
    /// Wire type, e.g. RAM or CONTROL_PANEL
    #[arg(long)]
    addon_type: String,

    #[arg(long)]
    name: String,

    /// Unit label, e.g. GB
    #[arg(long)]
    unit: String,

    /// Price per unit per month in VND
    #[arg(long)]
    unit_price: Amount,

    /// Largest quantity a single configuration may request
    #[arg(long)]
    max_quantity: u32,
}

#[derive(Debug, Args)]
struct DeleteAddonArgs {
    addon_id: i64,
}

pub(crate) async fn run(context: &AppContext, command: AddonCommand) -> Result<(), String> {
    match command.command {
        AddonSubcommand::Create(args) => create(context, args).await,
        AddonSubcommand::Delete(args) => delete(context, args).await,
    }
}

async fn create(context: &AppContext, args: CreateAddonArgs) -> Result<(), String> {
    let addon = context
        .admin
        .create_addon(AddonDraft {
            addon_type: args.addon_type,
            name: args.name,
            unit: args.unit,
            unit_price: args.unit_price,
            max_quantity: args.max_quantity,
        })
        .await
        .map_err(|error| error.display_message())?;

    println!("created addon {}", addon.id);

    Ok(())
}

async fn delete(context: &AppContext, args: DeleteAddonArgs) -> Result<(), String> {
    context
        .admin
        .delete_addon(args.addon_id)
        .await
        .map_err(|error| error.display_message())?;

    println!("deleted addon {}", args.addon_id);

    Ok(())
}
