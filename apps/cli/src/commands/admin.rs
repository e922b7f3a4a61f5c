//! Admin commands. All of them require an admin account.

use super::Context;
use crate::output::{self, OutputFormat};
use anyhow::Result;

pub async fn admin_stats(ctx: &Context) -> Result<()> {
    ctx.require_admin().await?;
    let stats = ctx.client.admin().stats().await?;

    match ctx.format {
        OutputFormat::Text => {
            output::print_heading("Platform");
            output::print_row("Users", &stats.total_users.to_string());
            output::print_row("Integrations", &stats.total_integrations.to_string());
            output::print_row("Comments", &stats.total_comments.to_string());
            output::print_row("Replies", &stats.total_responses.to_string());
            if !stats.users_by_plan.is_empty() {
                output::print_heading("Users by plan");
                for (plan, count) in &stats.users_by_plan {
                    output::print_row(plan, &count.to_string());
                }
            }
            Ok(())
        }
        OutputFormat::Json => output::print_json(&stats),
    }
}

pub async fn admin_users(ctx: &Context) -> Result<()> {
    ctx.require_admin().await?;
    let users = ctx.client.admin().users().await?;

    match ctx.format {
        OutputFormat::Text => {
            println!(
                "{:<36} {:<30} {:<20} {:<7} {}",
                "ID", "Email", "Name", "Active", "Admin"
            );
            output::print_divider(105);
            for user in &users {
                println!(
                    "{:<36} {:<30} {:<20} {:<7} {}",
                    user.id,
                    output::truncate(&user.email, 30),
                    output::truncate(&user.name, 20),
                    output::yes_no(user.is_active),
                    output::yes_no(user.is_admin),
                );
            }
            Ok(())
        }
        OutputFormat::Json => output::print_json(&users),
    }
}

/// Activate or deactivate a user account.
pub async fn admin_set_active(ctx: &Context, user_id: &str, active: bool) -> Result<()> {
    ctx.require_admin().await?;
    ctx.client.admin().set_user_active(user_id, active).await?;

    let verb = if active { "activated" } else { "deactivated" };
    output::print_success(&format!("User {} {}", user_id, verb), &ctx.format);
    Ok(())
}

pub async fn admin_system(ctx: &Context) -> Result<()> {
    ctx.require_admin().await?;
    let status = ctx.client.admin().system_status().await?;

    match ctx.format {
        OutputFormat::Text => {
            output::print_row("API", output::or_dash(Some(status.api.as_str())));
            output::print_row("Database", output::or_dash(Some(status.database.as_str())));
            output::print_row("Workers", output::or_dash(Some(status.celery_workers.as_str())));
            output::print_row("Scheduler", output::or_dash(Some(status.scheduler.as_str())));
            Ok(())
        }
        OutputFormat::Json => output::print_json(&status),
    }
}
