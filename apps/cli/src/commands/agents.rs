//! Agent commands: background runs and configuration.

use super::integrations::print_agent_config;
use super::Context;
use crate::output::{self, OutputFormat};
use anyhow::Result;
use api_client::models::AgentConfigUpdate;
use serde_json::json;
use task_tracker::{TaskOutcome, TrackerEvent};
use tracing::debug;

/// Queue an agent run. With `wait`, poll until the task finishes.
pub async fn agents_run(ctx: &Context, integration_id: &str, wait: bool) -> Result<()> {
    if !wait {
        let run = ctx.client.agents().run(integration_id).await?;
        match ctx.format {
            OutputFormat::Text => {
                println!("Agent run queued");
                output::print_row("Task ID", &run.task_id);
                println!();
                println!("Check progress with `autoreply agents status {}`", run.task_id);
            }
            OutputFormat::Json => output::print_json(&run)?,
        }
        return Ok(());
    }

    let tracker = ctx.tracker();
    let mut events = tracker.subscribe();
    let task_id = tracker.run(integration_id).await?;

    if ctx.format == OutputFormat::Text {
        println!("Agent running (task {}). Press Ctrl-C to stop it.", task_id);
    }

    let outcome = {
        let wait = tracker.wait_for(integration_id);
        tokio::pin!(wait);
        let mut stop_sent = false;
        loop {
            tokio::select! {
                outcome = &mut wait => break outcome?,
                _ = tokio::signal::ctrl_c(), if !stop_sent => {
                    stop_sent = true;
                    tracker.stop(integration_id).await?;
                    if ctx.format == OutputFormat::Text {
                        println!("Stop requested, waiting for the agent to finish...");
                    }
                }
            }
        }
    };

    // The summary refresh follows the finish event; give it a moment.
    let mut stats = None;
    if matches!(outcome, TaskOutcome::Finished { .. }) {
        let deadline = tokio::time::sleep(std::time::Duration::from_secs(5));
        tokio::pin!(deadline);
        loop {
            tokio::select! {
                event = events.recv() => match event {
                    Ok(TrackerEvent::SummaryRefreshed(s)) => {
                        stats = Some(s);
                        break;
                    }
                    Ok(other) => debug!(event = ?other, "Tracker event"),
                    Err(_) => break,
                },
                _ = &mut deadline => break,
            }
        }
    }

    match ctx.format {
        OutputFormat::Text => {
            match &outcome {
                TaskOutcome::Finished { status, result, .. } => {
                    println!("Task {} finished: {}", task_id, status);
                    if let Some(result) = result.as_ref().filter(|r| !r.is_null()) {
                        output::print_row("Result", &result.to_string());
                    }
                }
                TaskOutcome::Abandoned { polls, .. } => {
                    println!(
                        "Stopped waiting after {} polls; task {} may still be running.",
                        polls, task_id
                    );
                }
                TaskOutcome::SessionLost { .. } => {
                    println!("Session ended while waiting; task {} may still be running.", task_id);
                }
            }
            if let Some(stats) = &stats {
                output::print_row("Comments today", &stats.today_comments.to_string());
                output::print_row("Replies today", &stats.today_responses.to_string());
            }
        }
        OutputFormat::Json => {
            output::print_json(&json!({ "task": outcome, "stats": stats }))?;
        }
    }

    if !outcome.is_success() {
        anyhow::bail!("Agent run did not complete successfully");
    }
    Ok(())
}

/// Show the raw status of a task.
pub async fn agents_status(ctx: &Context, task_id: &str) -> Result<()> {
    let status = ctx.client.agents().status(task_id).await?;

    match ctx.format {
        OutputFormat::Text => {
            output::print_row("Task ID", &status.task_id);
            output::print_row("Status", &status.status);
            if let Some(result) = status.result.as_ref().filter(|r| !r.is_null()) {
                output::print_row("Result", &result.to_string());
            }
            Ok(())
        }
        OutputFormat::Json => output::print_json(&status),
    }
}

/// Revoke a running task.
pub async fn agents_stop(ctx: &Context, task_id: &str) -> Result<()> {
    let response = ctx.client.agents().stop(task_id).await?;
    match ctx.format {
        OutputFormat::Text => {
            output::print_success(&format!("Stop requested for task {}", task_id), &ctx.format);
            Ok(())
        }
        OutputFormat::Json => output::print_json(&response),
    }
}

/// Pause or resume the agent for an integration.
pub async fn agents_toggle(ctx: &Context, integration_id: &str) -> Result<()> {
    let response = ctx.client.agents().toggle(integration_id).await?;
    let state = if response.is_active { "active" } else { "paused" };
    match ctx.format {
        OutputFormat::Text => {
            output::print_success(&format!("Agent for {} is now {}", integration_id, state), &ctx.format);
            Ok(())
        }
        OutputFormat::Json => output::print_json(&response),
    }
}

pub async fn agents_config(ctx: &Context, integration_id: &str) -> Result<()> {
    let config = ctx.client.agents().config(integration_id).await?;
    print_agent_config(&config, &ctx.format)
}

pub async fn agents_config_update(
    ctx: &Context,
    integration_id: &str,
    update: AgentConfigUpdate,
) -> Result<()> {
    let is_empty = serde_json::to_value(&update)?
        .as_object()
        .map_or(true, |fields| fields.is_empty());
    if is_empty {
        anyhow::bail!("Nothing to update. See `autoreply agents set --help`");
    }

    let config = ctx
        .client
        .agents()
        .update_config(integration_id, &update)
        .await?;
    if ctx.format == OutputFormat::Text {
        println!("Agent configuration updated");
    }
    print_agent_config(&config, &ctx.format)
}
