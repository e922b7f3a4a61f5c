//! Autoreply CLI - Command-line client for the Autoreply API.

mod commands;
mod output;

use api_client::models::{AgentConfigUpdate, CheckoutRequest, CommentFilter, UserUpdate};
use clap::{Parser, Subcommand};
use client_config_and_utils::{init_logging, Config, Paths};
use commands::Context;
use tracing::debug;

/// Autoreply CLI - Manage AI comment replies from the terminal.
#[derive(Parser)]
#[command(name = "autoreply")]
#[command(about = "Autoreply CLI for accounts, integrations, comments and agents")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format (text or json)
    #[arg(short, long, default_value = "text", global = true)]
    format: output::OutputFormat,

    /// Log level (trace, debug, info, warn, error); defaults to the config file
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Base API origin, e.g. https://api.autoreply.app
    #[arg(long, global = true, env = "AUTOREPLY_API_URL")]
    api_url: Option<String>,

    /// Mirror logs on stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Login with email and password
    Login {
        /// Account email (prompted when omitted)
        #[arg(short, long)]
        email: Option<String>,
    },

    /// Create an account
    Register {
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long)]
        email: Option<String>,
    },

    /// Logout and clear stored credentials
    Logout,

    /// Show authentication status and the current user
    Status,

    /// Update profile fields
    Profile {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        avatar_url: Option<String>,
        /// IANA timezone, e.g. America/Sao_Paulo
        #[arg(long)]
        timezone: Option<String>,
        #[arg(long)]
        language: Option<String>,
    },

    /// Dashboard counters
    Stats,

    /// Manage connected channels
    Integrations {
        #[command(subcommand)]
        command: IntegrationCommands,
    },

    /// Moderate comments and replies
    Comments {
        #[command(subcommand)]
        command: CommentCommands,
    },

    /// Run and configure reply agents
    Agents {
        #[command(subcommand)]
        command: AgentCommands,
    },

    /// Plans and subscription
    Billing {
        #[command(subcommand)]
        command: BillingCommands,
    },

    /// Platform administration
    Admin {
        #[command(subcommand)]
        command: AdminCommands,
    },
}

#[derive(Subcommand)]
enum IntegrationCommands {
    /// List integrations
    List,
    /// Print the URL for connecting a YouTube channel
    Connect,
    /// Disconnect an integration
    Delete {
        id: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Show an integration's agent configuration
    Config { id: String },
}

#[derive(Subcommand)]
enum CommentCommands {
    /// List comments
    List {
        #[arg(long)]
        platform: Option<String>,
        /// praise, question, neutral, criticism, spam or offensive
        #[arg(long)]
        category: Option<String>,
        /// Reply status: pending, approved, sent, rejected
        #[arg(long)]
        status: Option<String>,
        #[arg(short, long)]
        search: Option<String>,
        #[arg(long)]
        page: Option<u32>,
        #[arg(short, long, default_value = "20")]
        limit: u32,
    },
    /// Approve the pending reply
    Approve { id: String },
    /// Reject the pending reply
    Reject { id: String },
    /// Replace the reply text
    Edit {
        id: String,
        /// New reply text (prompted when omitted)
        #[arg(short, long)]
        text: Option<String>,
    },
}

#[derive(Subcommand)]
enum AgentCommands {
    /// Queue an agent run for an integration
    Run {
        integration_id: String,
        /// Poll until the run finishes
        #[arg(short, long)]
        wait: bool,
    },
    /// Show a task's status
    Status { task_id: String },
    /// Revoke a running task
    Stop { task_id: String },
    /// Pause or resume an integration's agent
    Toggle { integration_id: String },
    /// Show the agent configuration
    Config { integration_id: String },
    /// Change the agent configuration
    Set {
        integration_id: String,
        #[arg(long)]
        persona: Option<String>,
        /// friendly, professional, casual or funny
        #[arg(long)]
        tone: Option<String>,
        #[arg(long)]
        prompt: Option<String>,
        #[arg(long)]
        language: Option<String>,
        /// Comma-separated words that suppress a reply
        #[arg(long, value_delimiter = ',')]
        blacklist: Option<Vec<String>>,
        #[arg(long)]
        praise: Option<bool>,
        #[arg(long)]
        questions: Option<bool>,
        #[arg(long)]
        neutral: Option<bool>,
        #[arg(long)]
        criticism: Option<bool>,
        #[arg(long)]
        skip_spam: Option<bool>,
        #[arg(long)]
        skip_offensive: Option<bool>,
        /// HH:MM
        #[arg(long)]
        hours_start: Option<String>,
        /// HH:MM
        #[arg(long)]
        hours_end: Option<String>,
        /// Comma-separated weekdays, 0 = Sunday
        #[arg(long, value_delimiter = ',')]
        days: Option<Vec<u8>>,
        #[arg(long)]
        auto_mode: Option<bool>,
        #[arg(long)]
        approval_required: Option<bool>,
    },
}

#[derive(Subcommand)]
enum BillingCommands {
    /// List plans
    Plans,
    /// Show the current subscription
    Subscription,
    /// Start a checkout
    Checkout {
        /// Plan slug
        plan: String,
        /// stripe, asaas or mp
        #[arg(short, long, default_value = "stripe")]
        gateway: String,
        /// pix, boleto or credit_card
        #[arg(short, long)]
        method: Option<String>,
    },
    /// Cancel at the end of the current period
    Cancel {
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum AdminCommands {
    /// Platform counters
    Stats,
    /// List users
    Users,
    /// Re-enable a user account
    Activate { user_id: String },
    /// Disable a user account
    Deactivate { user_id: String },
    /// Health of API, database and workers
    System,
}

async fn dispatch(ctx: &Context, command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Login { email } => commands::login(ctx, email).await,
        Commands::Register { name, email } => commands::register(ctx, name, email).await,
        Commands::Logout => commands::logout(ctx).await,
        Commands::Status => commands::status(ctx).await,
        Commands::Profile {
            name,
            avatar_url,
            timezone,
            language,
        } => {
            let update = UserUpdate {
                name,
                avatar_url,
                timezone,
                language,
            };
            commands::profile_update(ctx, update).await
        }
        Commands::Stats => commands::comments_stats(ctx).await,
        Commands::Integrations { command } => match command {
            IntegrationCommands::List => commands::integrations_list(ctx).await,
            IntegrationCommands::Connect => commands::integrations_connect(ctx).await,
            IntegrationCommands::Delete { id, yes } => {
                commands::integrations_delete(ctx, &id, yes).await
            }
            IntegrationCommands::Config { id } => commands::integrations_config(ctx, &id).await,
        },
        Commands::Comments { command } => match command {
            CommentCommands::List {
                platform,
                category,
                status,
                search,
                page,
                limit,
            } => {
                let filter = CommentFilter {
                    platform,
                    category,
                    status,
                    search,
                    page,
                    limit: Some(limit),
                };
                commands::comments_list(ctx, filter).await
            }
            CommentCommands::Approve { id } => commands::comments_approve(ctx, &id).await,
            CommentCommands::Reject { id } => commands::comments_reject(ctx, &id).await,
            CommentCommands::Edit { id, text } => commands::comments_edit(ctx, &id, text).await,
        },
        Commands::Agents { command } => match command {
            AgentCommands::Run {
                integration_id,
                wait,
            } => commands::agents_run(ctx, &integration_id, wait).await,
            AgentCommands::Status { task_id } => commands::agents_status(ctx, &task_id).await,
            AgentCommands::Stop { task_id } => commands::agents_stop(ctx, &task_id).await,
            AgentCommands::Toggle { integration_id } => {
                commands::agents_toggle(ctx, &integration_id).await
            }
            AgentCommands::Config { integration_id } => {
                commands::agents_config(ctx, &integration_id).await
            }
            AgentCommands::Set {
                integration_id,
                persona,
                tone,
                prompt,
                language,
                blacklist,
                praise,
                questions,
                neutral,
                criticism,
                skip_spam,
                skip_offensive,
                hours_start,
                hours_end,
                days,
                auto_mode,
                approval_required,
            } => {
                let update = AgentConfigUpdate {
                    persona_name: persona,
                    tone,
                    custom_prompt: prompt,
                    language,
                    blacklist_words: blacklist,
                    respond_to_praise: praise,
                    respond_to_questions: questions,
                    respond_to_neutral: neutral,
                    respond_to_criticism: criticism,
                    skip_spam,
                    skip_offensive,
                    working_hours_start: hours_start,
                    working_hours_end: hours_end,
                    working_days: days,
                    auto_mode,
                    approval_required,
                };
                commands::agents_config_update(ctx, &integration_id, update).await
            }
        },
        Commands::Billing { command } => match command {
            BillingCommands::Plans => commands::billing_plans(ctx).await,
            BillingCommands::Subscription => commands::billing_subscription(ctx).await,
            BillingCommands::Checkout {
                plan,
                gateway,
                method,
            } => {
                let request = CheckoutRequest {
                    plan_slug: plan,
                    gateway,
                    payment_method: method,
                    success_url: None,
                    cancel_url: None,
                };
                commands::billing_checkout(ctx, request).await
            }
            BillingCommands::Cancel { yes } => commands::billing_cancel(ctx, yes).await,
        },
        Commands::Admin { command } => match command {
            AdminCommands::Stats => commands::admin_stats(ctx).await,
            AdminCommands::Users => commands::admin_users(ctx).await,
            AdminCommands::Activate { user_id } => {
                commands::admin_set_active(ctx, &user_id, true).await
            }
            AdminCommands::Deactivate { user_id } => {
                commands::admin_set_active(ctx, &user_id, false).await
            }
            AdminCommands::System => commands::admin_system(ctx).await,
        },
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let paths = Paths::new()?;
    let mut config = Config::load(&paths)?;
    if let Some(api_url) = cli.api_url {
        config.api_url = Some(api_url);
        config.validate()?;
    }

    let level = cli.log_level.unwrap_or_else(|| config.log_level.clone());
    init_logging(&level, Some(paths.log_file()), cli.verbose);
    debug!(api_url = ?config.api_url, "CLI started");

    let mut ctx = Context::new(&paths, config, cli.format)?;
    let result = dispatch(&ctx, cli.command).await;

    if let Some(reason) = ctx.forced_logout() {
        output::print_error(
            &format!(
                "Your session has ended ({}). Run `autoreply login` to sign in again.",
                reason
            ),
            &ctx.format,
        );
    }

    result
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let format = cli.format;

    if let Err(e) = run(cli).await {
        output::print_error(&format!("{:#}", e), &format);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_agents_set_splits_lists() {
        let cli = Cli::try_parse_from([
            "autoreply",
            "agents",
            "set",
            "i1",
            "--blacklist",
            "spam,golpe",
            "--days",
            "1,2,3",
            "--auto-mode",
            "true",
        ])
        .unwrap();

        match cli.command {
            Commands::Agents {
                command:
                    AgentCommands::Set {
                        integration_id,
                        blacklist,
                        days,
                        auto_mode,
                        tone,
                        ..
                    },
            } => {
                assert_eq!(integration_id, "i1");
                assert_eq!(blacklist, Some(vec!["spam".to_string(), "golpe".to_string()]));
                assert_eq!(days, Some(vec![1, 2, 3]));
                assert_eq!(auto_mode, Some(true));
                assert_eq!(tone, None);
            }
            _ => panic!("expected agents set"),
        }
    }

    #[test]
    fn test_global_format_after_subcommand() {
        let cli = Cli::try_parse_from(["autoreply", "status", "--format", "json"]).unwrap();
        assert_eq!(cli.format, output::OutputFormat::Json);
        assert!(matches!(cli.command, Commands::Status));
    }
}
