use std::sync::Arc;

use clap::{Args, Subcommand};
use stratus::money::format_vnd;
use stratus_app::{
    context::AppContext,
    domain::payments::{
        STATUS_POLL_PERIOD,
        models::Payment,
        service::watch_until_terminal,
    },
};

#[derive(Debug, Args)]
pub(crate) struct PaymentCommand {
    #[command(subcommand)]
    command: PaymentSubcommand,
}

#[derive(Debug, Subcommand)]
enum PaymentSubcommand {
    /// Create a payment for an order and print the QR payload
    Create(CreateArgs),
    /// Show the current gateway status
    Status(PaymentArgs),
    /// Ask the backend to re-check the gateway now
    Check(PaymentArgs),
    /// Poll until the payment settles
    Watch(PaymentArgs),
    /// Cancel a pending payment
    Cancel(PaymentArgs),
}

#[derive(Debug, Args)]
struct CreateArgs {
    order_id: i64,
}

#[derive(Debug, Args)]
struct PaymentArgs {
    payment_id: i64,
}

pub(crate) async fn run(context: &AppContext, command: PaymentCommand) -> Result<(), String> {
    match command.command {
        PaymentSubcommand::Create(args) => create(context, args).await,
        PaymentSubcommand::Status(args) => status(context, args).await,
        PaymentSubcommand::Check(args) => check(context, args).await,
        PaymentSubcommand::Watch(args) => watch(context, args).await,
        PaymentSubcommand::Cancel(args) => cancel(context, args).await,
    }
}

async fn create(context: &AppContext, args: CreateArgs) -> Result<(), String> {
    let payment = context
        .payments
        .create(args.order_id)
        .await
        .map_err(|error| error.display_message())?;

    print_payment(&payment);

    if let Some(qr_code) = &payment.qr_code {
        println!("qr: {qr_code}");
    }

    Ok(())
}

async fn status(context: &AppContext, args: PaymentArgs) -> Result<(), String> {
    let payment = context
        .payments
        .status(args.payment_id)
        .await
        .map_err(|error| error.display_message())?;

    print_payment(&payment);

    Ok(())
}

async fn check(context: &AppContext, args: PaymentArgs) -> Result<(), String> {
    let payment = context
        .payments
        .check(args.payment_id)
        .await
        .map_err(|error| error.display_message())?;

    print_payment(&payment);

    Ok(())
}

async fn watch(context: &AppContext, args: PaymentArgs) -> Result<(), String> {
    println!("watching payment {}...", args.payment_id);

    let payment = watch_until_terminal(
        Arc::clone(&context.payments),
        args.payment_id,
        STATUS_POLL_PERIOD,
    )
    .await
    .map_err(|error| error.display_message())?;

    context
        .notifier
        .info(format!("payment settled: {:?}", payment.status));

    print_payment(&payment);

    Ok(())
}

async fn cancel(context: &AppContext, args: PaymentArgs) -> Result<(), String> {
    context
        .payments
        .cancel(args.payment_id)
        .await
        .map_err(|error| error.display_message())?;

    context.notifier.info("payment cancelled");

    Ok(())
}

fn print_payment(payment: &Payment) {
    println!("payment_id: {}", payment.payment_id);
    println!("status: {:?}", payment.status);

    if let Some(order_id) = payment.order_id {
        println!("order_id: {order_id}");
    }

    if let Some(amount) = payment.amount {
        println!("amount: {}", format_vnd(amount));
    }
}
