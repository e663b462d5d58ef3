use clap::{Args, Subcommand};
use stratus_app::{context::AppContext, domain::admin::models::BannerDraft};

#[derive(Debug, Args)]
pub(crate) struct HomepageCommand {
    #[command(subcommand)]
    command: HomepageSubcommand,
}

#[derive(Debug, Subcommand)]
enum HomepageSubcommand {
    /// List homepage banners
    Banners,
    /// Create a homepage banner
    AddBanner(AddBannerArgs),
    /// Remove a homepage banner
    RemoveBanner(RemoveBannerArgs),
    /// Show the featured products
    Featured,
    /// Replace the featured-product curation
    SetFeatured(SetFeaturedArgs),
}

#[derive(Debug, Args)]
struct AddBannerArgs {
    #[arg(long)]
    title: String,

    #[arg(long)]
    image_url: String,

    #[arg(long)]
    link_url: Option<String>,
}

#[derive(Debug, Args)]
struct RemoveBannerArgs {
    banner_id: i64,
}

#[derive(Debug, Args)]
struct SetFeaturedArgs {
    /// Product ids, in display order
    product_ids: Vec<i64>,
}

pub(crate) async fn run(context: &AppContext, command: HomepageCommand) -> Result<(), String> {
    match command.command {
        HomepageSubcommand::Banners => banners(context).await,
        HomepageSubcommand::AddBanner(args) => add_banner(context, args).await,
        HomepageSubcommand::RemoveBanner(args) => remove_banner(context, args).await,
        HomepageSubcommand::Featured => featured(context).await,
        HomepageSubcommand::SetFeatured(args) => set_featured(context, args).await,
    }
}

async fn banners(context: &AppContext) -> Result<(), String> {
    let banners = context
        .admin
        .list_banners()
        .await
        .map_err(|error| error.display_message())?;

    for banner in banners {
        println!("{}: {} ({})", banner.id, banner.title, banner.image_url);
    }

    Ok(())
}

async fn add_banner(context: &AppContext, args: AddBannerArgs) -> Result<(), String> {
    let banner = context
        .admin
        .create_banner(BannerDraft {
            title: args.title,
            image_url: args.image_url,
            link_url: args.link_url,
        })
        .await
        .map_err(|error| error.display_message())?;

    println!("created banner {}", banner.id);

    Ok(())
}

async fn remove_banner(context: &AppContext, args: RemoveBannerArgs) -> Result<(), String> {
    context
        .admin
        .delete_banner(args.banner_id)
        .await
        .map_err(|error| error.display_message())?;

    println!("removed banner {}", args.banner_id);

    Ok(())
}

async fn featured(context: &AppContext) -> Result<(), String> {
    let products = context
        .admin
        .featured_products()
        .await
        .map_err(|error| error.display_message())?;

    for product in products {
        println!("{}: {}", product.id, product.name);
    }

    Ok(())
}

async fn set_featured(context: &AppContext, args: SetFeaturedArgs) -> Result<(), String> {
    context
        .admin
        .set_featured_products(args.product_ids)
        .await
        .map_err(|error| error.display_message())?;

    println!("featured products updated");

    Ok(())
}
