//! Authentication and profile commands.

use super::{prompt_password, value_or_prompt, Context};
use crate::output::{self, OutputFormat};
use anyhow::Result;
use api_client::models::{User, UserUpdate};
use serde_json::json;

fn print_user(user: &User, format: &OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => {
            output::print_row("Name", &user.name);
            output::print_row("Email", &user.email);
            output::print_row("User ID", &user.id);
            output::print_row("Admin", output::yes_no(user.is_admin));
            output::print_row("Email verified", output::yes_no(user.email_verified));
            output::print_row("Plan", output::or_dash(user.plan_id.as_deref()));
            output::print_row("Trial ends", &output::timestamp(user.trial_ends_at.as_ref()));
            output::print_row("Timezone", output::or_dash(user.timezone.as_deref()));
            output::print_row("Language", output::or_dash(user.language.as_deref()));
            Ok(())
        }
        OutputFormat::Json => output::print_json(user),
    }
}

/// Login with email and password.
pub async fn login(ctx: &Context, email: Option<String>) -> Result<()> {
    if let Ok(Some(user)) = ctx.session.fetch_me().await {
        output::print_success(&format!("Already logged in as {}", user.email), &ctx.format);
        return Ok(());
    }

    let email = value_or_prompt(email, "Email: ", "Email")?;
    let password = prompt_password("Password: ")?;

    if ctx.format == OutputFormat::Text {
        println!("Logging in...");
    }
    let user = ctx
        .session
        .login(&email, &password)
        .await
        .map_err(|e| anyhow::anyhow!("Login failed: {}", e))?;

    output::print_success(&format!("Logged in as {}", user.email), &ctx.format);
    Ok(())
}

/// Create an account and log in.
pub async fn register(ctx: &Context, name: Option<String>, email: Option<String>) -> Result<()> {
    let name = value_or_prompt(name, "Name: ", "Name")?;
    let email = value_or_prompt(email, "Email: ", "Email")?;
    let password = prompt_password("Password: ")?;
    let confirmation = prompt_password("Confirm password: ")?;
    if password != confirmation {
        anyhow::bail!("Passwords do not match");
    }

    let user = ctx
        .session
        .register(&name, &email, &password)
        .await
        .map_err(|e| anyhow::anyhow!("Registration failed: {}", e))?;

    output::print_success(
        &format!("Account created. Logged in as {}", user.email),
        &ctx.format,
    );
    Ok(())
}

/// Logout and clear stored credentials.
pub async fn logout(ctx: &Context) -> Result<()> {
    ctx.session.logout()?;
    output::print_success("Logged out successfully", &ctx.format);
    Ok(())
}

/// Show who is logged in.
pub async fn status(ctx: &Context) -> Result<()> {
    let user = ctx.session.fetch_me().await.ok().flatten();

    match (&ctx.format, user) {
        (OutputFormat::Text, Some(user)) => {
            println!("API:      {}", ctx.client.origin());
            println!("Auth:     logged in");
            println!();
            print_user(&user, &ctx.format)?;
        }
        (OutputFormat::Text, None) => {
            println!("API:      {}", ctx.client.origin());
            println!("Auth:     not logged in");
        }
        (OutputFormat::Json, user) => {
            output::print_json(&json!({
                "api_url": ctx.client.origin().as_str(),
                "logged_in": user.is_some(),
                "user": user,
            }))?;
        }
    }

    Ok(())
}

/// Update profile fields.
pub async fn profile_update(ctx: &Context, update: UserUpdate) -> Result<()> {
    ctx.require_user().await?;
    if update.is_empty() {
        anyhow::bail!("Nothing to update. Pass at least one of --name, --avatar-url, --timezone, --language");
    }

    let user = ctx.session.update_profile(&update).await?;
    match ctx.format {
        OutputFormat::Text => {
            println!("Profile updated");
            print_user(&user, &ctx.format)
        }
        OutputFormat::Json => output::print_json(&user),
    }
}
