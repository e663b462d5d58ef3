use std::{ops::ControlFlow, sync::Arc};

use clap::{Args, Subcommand};
use stratus::instance::{Instance, InstanceAction};
use stratus_app::{
    context::AppContext,
    domain::instances::{
        LIVE_STATS_POLL_PERIOD, METRICS_REFRESH_PERIOD, READINESS_POLL_PERIOD,
        models::MetricPoint,
        service::{watch_live_stats, watch_until_settled},
    },
    poll::spawn_poller,
};

#[derive(Debug, Args)]
pub(crate) struct InstanceCommand {
    #[command(subcommand)]
    command: InstanceSubcommand,
}

#[derive(Debug, Subcommand)]
enum InstanceSubcommand {
    /// List your instances
    List,
    /// Show one instance and the actions it offers
    Show(InstanceArgs),
    /// Start a stopped or suspended instance
    Start(InstanceArgs),
    /// Stop a running instance
    Stop(InstanceArgs),
    /// Restart a running instance
    Restart(InstanceArgs),
    /// Suspend a running instance
    Suspend(InstanceArgs),
    /// Open a remote console session and print the viewer URL
    Console(InstanceArgs),
    /// Generate an SSH key pair and install the public half
    SshKey(InstanceArgs),
    /// Show the provisioned hardware
    Hardware(InstanceArgs),
    /// Show the historical metrics range
    Metrics(MetricsArgs),
    /// Stream live usage rates
    Stats(StatsArgs),
    /// Poll until the instance settles
    Watch(InstanceArgs),
}

#[derive(Debug, Args)]
struct InstanceArgs {
    instance_id: i64,
}

#[derive(Debug, Args)]
struct MetricsArgs {
    instance_id: i64,

    /// Keep refreshing the range instead of printing it once
    #[arg(long)]
    follow: bool,

    /// How many refreshes to print in follow mode
    #[arg(long, default_value_t = 3)]
    refreshes: usize,
}

#[derive(Debug, Args)]
struct StatsArgs {
    instance_id: i64,

    /// How many rate samples to print before exiting
    #[arg(long, default_value_t = 5)]
    samples: usize,
}

pub(crate) async fn run(context: &AppContext, command: InstanceCommand) -> Result<(), String> {
    match command.command {
        InstanceSubcommand::List => list(context).await,
        InstanceSubcommand::Show(args) => show(context, args).await,
        InstanceSubcommand::Start(args) => perform(context, args, InstanceAction::Start).await,
        InstanceSubcommand::Stop(args) => perform(context, args, InstanceAction::Stop).await,
        InstanceSubcommand::Restart(args) => perform(context, args, InstanceAction::Restart).await,
        InstanceSubcommand::Suspend(args) => perform(context, args, InstanceAction::Suspend).await,
        InstanceSubcommand::Console(args) => console(context, args).await,
        InstanceSubcommand::SshKey(args) => ssh_key(context, args).await,
        InstanceSubcommand::Hardware(args) => hardware(context, args).await,
        InstanceSubcommand::Metrics(args) => metrics(context, args).await,
        InstanceSubcommand::Stats(args) => stats(context, args).await,
        InstanceSubcommand::Watch(args) => watch(context, args).await,
    }
}

async fn list(context: &AppContext) -> Result<(), String> {
    let instances = context
        .instances
        .list()
        .await
        .map_err(|error| error.display_message())?;

    for instance in instances {
        print_summary(&instance);
    }

    Ok(())
}

async fn show(context: &AppContext, args: InstanceArgs) -> Result<(), String> {
    let instance = context
        .instances
        .get(args.instance_id)
        .await
        .map_err(|error| error.display_message())?;

    print_summary(&instance);

    if let Some(external_vm_id) = &instance.external_vm_id {
        println!("external_vm_id: {external_vm_id}");
    }

    if let Some(vnc_port) = instance.vnc_port {
        println!("vnc_port: {vnc_port}");
    }

    let actions: Vec<&str> = instance
        .status
        .allowed_actions()
        .iter()
        .map(|action| action.as_str())
        .collect();

    if actions.is_empty() {
        println!("actions: none");
    } else {
        println!("actions: {}", actions.join(", "));
    }

    Ok(())
}

async fn perform(
    context: &AppContext,
    args: InstanceArgs,
    action: InstanceAction,
) -> Result<(), String> {
    let instance = context
        .instances
        .perform(args.instance_id, action)
        .await
        .map_err(|error| error.display_message())?;

    context
        .notifier
        .success(format!("{} requested", action.as_str()));

    print_summary(&instance);

    Ok(())
}

async fn console(context: &AppContext, args: InstanceArgs) -> Result<(), String> {
    let session = context
        .instances
        .console(args.instance_id)
        .await
        .map_err(|error| error.display_message())?;

    println!("open this URL in the console viewer:");
    println!("{}", session.ws_url);

    if let Some(vnc_port) = session.vnc_port {
        println!("vnc_port: {vnc_port}");
    }

    Ok(())
}

async fn ssh_key(context: &AppContext, args: InstanceArgs) -> Result<(), String> {
    let key_pair = context
        .instances
        .generate_ssh_key()
        .await
        .map_err(|error| error.display_message())?;

    context
        .instances
        .configure_ssh(args.instance_id, &key_pair.public_key)
        .await
        .map_err(|error| error.display_message())?;

    println!("public_key: {}", key_pair.public_key);
    println!("{}", key_pair.private_key);
    println!("store this private key now; it is only shown once");

    Ok(())
}

async fn hardware(context: &AppContext, args: InstanceArgs) -> Result<(), String> {
    let hardware = context
        .instances
        .hardware(args.instance_id)
        .await
        .map_err(|error| error.display_message())?;

    println!("cpu_cores: {}", hardware.cpu_cores);
    println!("memory_mb: {}", hardware.memory_mb);
    println!("disk_gb: {}", hardware.disk_gb);

    Ok(())
}

async fn metrics(context: &AppContext, args: MetricsArgs) -> Result<(), String> {
    let points = context
        .instances
        .metrics(args.instance_id)
        .await
        .map_err(|error| error.display_message())?;

    print_metric_points(&points);

    if !args.follow || args.refreshes == 0 {
        return Ok(());
    }

    let instances = Arc::clone(&context.instances);
    let instance_id = args.instance_id;
    let mut remaining = args.refreshes;

    let handle = spawn_poller(METRICS_REFRESH_PERIOD, move || {
        let instances = Arc::clone(&instances);

        remaining -= 1;
        let done = remaining == 0;

        async move {
            match instances.metrics(instance_id).await {
                Ok(points) => print_metric_points(&points),
                Err(error) => eprintln!("metrics refresh failed: {}", error.display_message()),
            }

            if done {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        }
    });

    handle.join().await;

    Ok(())
}

fn print_metric_points(points: &[MetricPoint]) {
    for point in points {
        println!(
            "{} cpu={:.1}% mem={:.0}MB rx={} tx={}",
            point.at, point.cpu_percent, point.memory_used_mb, point.net_rx_bytes,
            point.net_tx_bytes,
        );
    }
}

async fn stats(context: &AppContext, args: StatsArgs) -> Result<(), String> {
    println!("sampling live stats for instance {}...", args.instance_id);

    watch_live_stats(
        Arc::clone(&context.instances),
        args.instance_id,
        LIVE_STATS_POLL_PERIOD,
        args.samples,
        |rates| {
            println!(
                "{} cpu={:.1}% mem={:.0}MB rx={:.0}B/s tx={:.0}B/s read={:.0}B/s write={:.0}B/s",
                rates.at,
                rates.cpu_percent,
                rates.memory_used_mb,
                rates.net_rx_per_sec,
                rates.net_tx_per_sec,
                rates.disk_read_per_sec,
                rates.disk_write_per_sec,
            );
        },
    )
    .await
    .map_err(|error| error.display_message())?;

    Ok(())
}

async fn watch(context: &AppContext, args: InstanceArgs) -> Result<(), String> {
    println!("watching instance {}...", args.instance_id);

    let instance = watch_until_settled(
        Arc::clone(&context.instances),
        args.instance_id,
        READINESS_POLL_PERIOD,
    )
    .await
    .map_err(|error| error.display_message())?;

    context
        .notifier
        .info(format!("instance settled: {:?}", instance.status));

    print_summary(&instance);

    Ok(())
}

fn print_summary(instance: &Instance) {
    let name = instance.name.as_deref().unwrap_or("unnamed");

    println!("{}: {name} {:?}", instance.instance_id, instance.status);
}
