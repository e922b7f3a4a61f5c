//! Integration management commands.

use super::{confirm, Context};
use crate::output::{self, OutputFormat};
use anyhow::Result;
use api_client::models::AgentConfig;

/// List connected channels.
pub async fn integrations_list(ctx: &Context) -> Result<()> {
    let integrations = ctx.client.integrations().list().await?;

    match ctx.format {
        OutputFormat::Text => {
            if integrations.is_empty() {
                println!("No integrations found. Connect one with `autoreply integrations connect`.");
                return Ok(());
            }
            println!(
                "{:<36} {:<10} {:<28} {:<7} {}",
                "ID", "Platform", "Channel", "Active", "Last run"
            );
            output::print_divider(100);
            for integration in &integrations {
                let channel = integration
                    .channel_name
                    .as_deref()
                    .unwrap_or(&integration.channel_id);
                println!(
                    "{:<36} {:<10} {:<28} {:<7} {}",
                    integration.id,
                    integration.platform,
                    output::truncate(channel, 28),
                    output::yes_no(integration.is_active),
                    output::timestamp(integration.last_run_at.as_ref()),
                );
            }
            Ok(())
        }
        OutputFormat::Json => output::print_json(&integrations),
    }
}

/// Print the OAuth URL for connecting a YouTube channel.
pub async fn integrations_connect(ctx: &Context) -> Result<()> {
    let connect = ctx.client.integrations().youtube_connect().await?;

    match ctx.format {
        OutputFormat::Text => {
            println!("Open this URL in a browser to connect your YouTube channel:");
            println!();
            println!("  {}", connect.auth_url);
            Ok(())
        }
        OutputFormat::Json => output::print_json(&connect),
    }
}

/// Disconnect an integration.
pub async fn integrations_delete(ctx: &Context, id: &str, yes: bool) -> Result<()> {
    if !yes && !confirm(&format!("Disconnect integration {}?", id)) {
        output::print_success("Cancelled", &ctx.format);
        return Ok(());
    }

    ctx.client.integrations().delete(id).await?;
    output::print_success(&format!("Integration {} disconnected", id), &ctx.format);
    Ok(())
}

/// Show the agent configuration attached to an integration.
pub async fn integrations_config(ctx: &Context, id: &str) -> Result<()> {
    let config = ctx.client.integrations().config(id).await?;
    print_agent_config(&config, &ctx.format)
}

pub(super) fn print_agent_config(config: &AgentConfig, format: &OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => {
            output::print_heading(&format!("Agent \"{}\"", config.persona_name));
            output::print_row("Tone", &config.tone);
            output::print_row("Language", &config.language);
            output::print_row(
                "Custom prompt",
                &output::truncate(output::or_dash(config.custom_prompt.as_deref()), 60),
            );
            output::print_row("Respond to praise", output::yes_no(config.respond_to_praise));
            output::print_row("Respond to questions", output::yes_no(config.respond_to_questions));
            output::print_row("Respond to neutral", output::yes_no(config.respond_to_neutral));
            output::print_row("Respond to criticism", output::yes_no(config.respond_to_criticism));
            output::print_row("Skip spam", output::yes_no(config.skip_spam));
            output::print_row("Skip offensive", output::yes_no(config.skip_offensive));
            output::print_row(
                "Working hours",
                &format!("{} - {}", config.working_hours_start, config.working_hours_end),
            );
            let days: Vec<String> = config.working_days.iter().map(|d| d.to_string()).collect();
            output::print_row("Working days", &days.join(","));
            output::print_row("Auto mode", output::yes_no(config.auto_mode));
            output::print_row("Approval required", output::yes_no(config.approval_required));
            if !config.blacklist_words.is_empty() {
                output::print_row("Blacklist", &config.blacklist_words.join(", "));
            }
            Ok(())
        }
        OutputFormat::Json => output::print_json(config),
    }
}
