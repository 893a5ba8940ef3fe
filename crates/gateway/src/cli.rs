//! `campus-admin` command line.
//!
//! One subcommand per gateway operation. Every command yields a JSON value
//! that the binary prints to stdout.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use domain::models::{Timeframe, UserRole, UserUpdate};
use serde_json::{json, Value as JsonValue};
use shared::pagination::{PageRequest, DEFAULT_LIMIT, DEFAULT_PAGE};

use crate::client::Gateway;
use crate::endpoints::DEFAULT_ACTIVITY_LIMIT;

#[derive(Debug, Parser)]
#[command(name = "campus-admin")]
#[command(about = "Command line client for the campus administration backend", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, PartialEq, Subcommand)]
pub enum Commands {
    /// Show dashboard metrics
    Metrics,
    /// Show AI token usage
    Usage {
        /// 24h, 7d or 30d
        #[arg(long, default_value_t = Timeframe::Day)]
        timeframe: Timeframe,
    },
    /// List token quotas
    Quotas,
    /// Set a user's token quota
    SetQuota {
        user_id: String,
        quota: u64,
    },
    /// Show per-service health
    Health,
    /// Show overall system status
    Status,
    /// List users
    Users {
        #[arg(long, default_value_t = DEFAULT_PAGE)]
        page: u32,
        #[arg(long, default_value_t = DEFAULT_LIMIT)]
        limit: u32,
    },
    /// Show one user
    User { user_id: String },
    /// Update fields of a user
    UpdateUser {
        user_id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        role: Option<UserRole>,
        #[arg(long)]
        department: Option<String>,
        #[arg(long)]
        active: Option<bool>,
        #[arg(long)]
        token_quota: Option<u64>,
    },
    /// Delete a user
    DeleteUser { user_id: String },
    /// Show recent activity
    Activity {
        #[arg(long, default_value_t = DEFAULT_ACTIVITY_LIMIT)]
        limit: u32,
    },
    /// Show who the configured credentials belong to
    Whoami,
    /// Show the latest accessibility report
    A11yReport,
    /// Run an accessibility check against a page
    A11yValidate { url: String },
    /// Show data migration progress
    Migration,
}

impl Commands {
    /// Subcommand name for log fields.
    pub fn name(&self) -> &'static str {
        match self {
            Commands::Metrics => "metrics",
            Commands::Usage { .. } => "usage",
            Commands::Quotas => "quotas",
            Commands::SetQuota { .. } => "set-quota",
            Commands::Health => "health",
            Commands::Status => "status",
            Commands::Users { .. } => "users",
            Commands::User { .. } => "user",
            Commands::UpdateUser { .. } => "update-user",
            Commands::DeleteUser { .. } => "delete-user",
            Commands::Activity { .. } => "activity",
            Commands::Whoami => "whoami",
            Commands::A11yReport => "a11y-report",
            Commands::A11yValidate { .. } => "a11y-validate",
            Commands::Migration => "migration",
        }
    }
}

/// Execute one command against the gateway.
pub async fn run(gateway: &Gateway, command: Commands) -> anyhow::Result<JsonValue> {
    let output = match command {
        Commands::Metrics => serde_json::to_value(gateway.get_dashboard_metrics().await?)?,
        Commands::Usage { timeframe } => {
            serde_json::to_value(gateway.get_token_usage(timeframe).await?)?
        }
        Commands::Quotas => serde_json::to_value(gateway.get_token_quotas().await?)?,
        Commands::SetQuota { user_id, quota } => {
            gateway.update_token_quota(&user_id, quota).await?;
            json!({ "userId": user_id, "quota": quota })
        }
        Commands::Health => serde_json::to_value(gateway.get_system_health().await?)?,
        Commands::Status => serde_json::to_value(gateway.get_system_status().await?)?,
        Commands::Users { page, limit } => {
            let page = PageRequest::new(page, limit);
            page.validate().context("Invalid pagination")?;
            serde_json::to_value(gateway.get_users(page).await?)?
        }
        Commands::User { user_id } => serde_json::to_value(gateway.get_user_by_id(&user_id).await?)?,
        Commands::UpdateUser {
            user_id,
            name,
            email,
            role,
            department,
            active,
            token_quota,
        } => {
            let update = UserUpdate {
                name,
                email,
                role,
                department,
                is_active: active,
                token_quota,
            };
            if update.is_empty() {
                bail!("Nothing to update: pass at least one field");
            }
            serde_json::to_value(gateway.update_user(&user_id, &update).await?)?
        }
        Commands::DeleteUser { user_id } => {
            gateway.delete_user(&user_id).await?;
            json!({ "deleted": user_id })
        }
        Commands::Activity { limit } => {
            serde_json::to_value(gateway.get_recent_activity(limit).await?)?
        }
        Commands::Whoami => serde_json::to_value(gateway.verify_auth().await?)?,
        Commands::A11yReport => serde_json::to_value(gateway.get_accessibility_report().await?)?,
        Commands::A11yValidate { url } => gateway.validate_accessibility(&url).await?,
        Commands::Migration => gateway.get_migration_status().await?,
    };
    Ok(output)
}
