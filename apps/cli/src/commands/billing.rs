//! Billing commands.

use super::{confirm, Context};
use crate::output::{self, OutputFormat};
use anyhow::Result;
use api_client::models::CheckoutRequest;

/// List available plans.
pub async fn billing_plans(ctx: &Context) -> Result<()> {
    let plans = ctx.client.billing().plans().await?;

    match ctx.format {
        OutputFormat::Text => {
            println!(
                "{:<12} {:<16} {:>10} {:>13} {:>15}",
                "Slug", "Name", "R$/month", "Integrations", "Replies/day"
            );
            output::print_divider(70);
            for plan in &plans {
                println!(
                    "{:<12} {:<16} {:>10.2} {:>13} {:>15}",
                    plan.slug,
                    plan.name,
                    plan.price_monthly,
                    plan.max_integrations,
                    plan.max_responses_per_day
                );
            }
            Ok(())
        }
        OutputFormat::Json => output::print_json(&plans),
    }
}

/// Show the current subscription.
pub async fn billing_subscription(ctx: &Context) -> Result<()> {
    let subscription = ctx.client.billing().subscription().await?;

    match (ctx.format, subscription) {
        (OutputFormat::Text, None) => {
            println!("No active subscription");
            Ok(())
        }
        (OutputFormat::Text, Some(subscription)) => {
            let plan = subscription
                .plan
                .as_ref()
                .map(|p| p.name.as_str())
                .unwrap_or("-");
            output::print_row("Plan", plan);
            output::print_row("Status", &subscription.status);
            output::print_row("Gateway", output::or_dash(subscription.gateway.as_deref()));
            output::print_row(
                "Period ends",
                &output::timestamp(subscription.current_period_end.as_ref()),
            );
            if subscription.cancel_at_period_end {
                output::print_row("Cancels", "at period end");
            }
            Ok(())
        }
        (OutputFormat::Json, subscription) => output::print_json(&subscription),
    }
}

/// Start a checkout for a plan.
pub async fn billing_checkout(ctx: &Context, request: CheckoutRequest) -> Result<()> {
    let response = ctx.client.billing().checkout(&request).await?;

    match ctx.format {
        OutputFormat::Text => {
            if let Some(url) = &response.checkout_url {
                println!("Complete the payment at:");
                println!("  {}", url);
            }
            if let Some(code) = &response.pix_copy_paste {
                println!("PIX copy-and-paste code:");
                println!("  {}", code);
            }
            if let Some(url) = &response.boleto_url {
                println!("Boleto:");
                println!("  {}", url);
            }
            if let Some(id) = &response.payment_id {
                output::print_row("Payment ID", id);
            }
            Ok(())
        }
        OutputFormat::Json => output::print_json(&response),
    }
}

/// Cancel the subscription at period end.
pub async fn billing_cancel(ctx: &Context, yes: bool) -> Result<()> {
    if !yes && !confirm("Cancel your subscription at the end of the current period?") {
        output::print_success("Cancelled", &ctx.format);
        return Ok(());
    }

    let response = ctx.client.billing().cancel().await?;
    let message = if response.message.is_empty() {
        "Subscription will be cancelled at the end of the period"
    } else {
        response.message.as_str()
    };
    output::print_success(message, &ctx.format);
    Ok(())
}
