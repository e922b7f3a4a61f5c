//! Comment moderation commands.

use super::{value_or_prompt, Context};
use crate::output::{self, OutputFormat};
use anyhow::Result;
use api_client::models::CommentFilter;

/// List comments matching the filter.
pub async fn comments_list(ctx: &Context, filter: CommentFilter) -> Result<()> {
    let comments = ctx.client.comments().list(&filter).await?;

    match ctx.format {
        OutputFormat::Text => {
            if comments.is_empty() {
                println!("No comments found");
                return Ok(());
            }
            println!(
                "{:<36} {:<18} {:<12} {:<10} {}",
                "ID", "Author", "Category", "Reply", "Comment"
            );
            output::print_divider(120);
            for comment in &comments {
                let reply = comment
                    .response
                    .as_ref()
                    .map(|r| r.status.as_str())
                    .unwrap_or("-");
                println!(
                    "{:<36} {:<18} {:<12} {:<10} {}",
                    comment.id,
                    output::truncate(output::or_dash(comment.author.as_deref()), 18),
                    output::or_dash(comment.category.as_deref()),
                    reply,
                    output::truncate(&comment.text, 50),
                );
                if let Some(response) = &comment.response {
                    println!("{:>36} ↳ {}", "", output::truncate(&response.text, 80));
                }
            }
            Ok(())
        }
        OutputFormat::Json => output::print_json(&comments),
    }
}

/// Dashboard counters.
pub async fn comments_stats(ctx: &Context) -> Result<()> {
    let stats = ctx.client.comments().stats().await?;

    match ctx.format {
        OutputFormat::Text => {
            output::print_heading("Dashboard");
            output::print_row("Comments today", &stats.today_comments.to_string());
            output::print_row("Replies today", &stats.today_responses.to_string());
            output::print_row("Total comments", &stats.total_comments.to_string());
            output::print_row("Total replies", &stats.total_responses.to_string());
            output::print_row("Response rate", &format!("{:.1}%", stats.response_rate));
            output::print_row(
                "Active integrations",
                &stats.active_integrations.to_string(),
            );
            Ok(())
        }
        OutputFormat::Json => output::print_json(&stats),
    }
}

/// Approve the pending reply for a comment.
pub async fn comments_approve(ctx: &Context, id: &str) -> Result<()> {
    let response = ctx.client.comments().approve(id).await?;
    output::print_success(&message_or(&response.message, "Reply approved"), &ctx.format);
    Ok(())
}

/// Reject the pending reply for a comment.
pub async fn comments_reject(ctx: &Context, id: &str) -> Result<()> {
    let response = ctx.client.comments().reject(id).await?;
    output::print_success(&message_or(&response.message, "Reply rejected"), &ctx.format);
    Ok(())
}

/// Replace the reply text for a comment.
pub async fn comments_edit(ctx: &Context, id: &str, text: Option<String>) -> Result<()> {
    let text = value_or_prompt(text, "New reply: ", "Reply text")?;
    let response = ctx.client.comments().edit(id, &text).await?;
    output::print_success(&message_or(&response.message, "Reply updated"), &ctx.format);
    Ok(())
}

fn message_or(message: &str, fallback: &str) -> String {
    if message.trim().is_empty() {
        fallback.to_string()
    } else {
        message.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_or_falls_back_on_blank() {
        assert_eq!(message_or("", "Reply approved"), "Reply approved");
        assert_eq!(message_or("  ", "Reply approved"), "Reply approved");
        assert_eq!(message_or("Resposta aprovada", "Reply approved"), "Resposta aprovada");
    }
}
