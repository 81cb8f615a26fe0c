//! The `studyhub notify` command.
//!
//! Loads a user roster, persists the notification, and fans it out through
//! the configured mail transport. The notification is committed before any
//! mail moves; failed sends only lower the reported count.

use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Deserialize;

use studyhub_core::model::{Audience, Notification, Role};
use studyhub_core::router::broadcast;
use studyhub_core::traits::NotificationStore;
use studyhub_mailer::{load_config_from, LogMailer};
use studyhub_store::MemoryStore;

#[derive(Debug, Deserialize)]
struct RosterFile {
    #[serde(default)]
    users: Vec<RosterUser>,
}

#[derive(Debug, Deserialize)]
struct RosterUser {
    name: String,
    email: String,
    #[serde(default = "default_role")]
    role: String,
    #[serde(default)]
    semester: Option<String>,
}

fn default_role() -> String {
    "student".to_string()
}

#[allow(clippy::too_many_arguments)]
pub async fn execute(
    users_path: PathBuf,
    title: String,
    body: String,
    link: Option<String>,
    audience: String,
    semester: Option<String>,
    user_id: Option<u64>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    anyhow::ensure!(!title.trim().is_empty(), "title must not be empty");
    anyhow::ensure!(!body.trim().is_empty(), "body must not be empty");

    let audience =
        Audience::from_str(&audience).map_err(|e| anyhow::anyhow!("invalid audience: {e}"))?;
    match audience {
        Audience::Semester => {
            anyhow::ensure!(semester.is_some(), "--semester is required for audience=semester")
        }
        Audience::User => {
            anyhow::ensure!(user_id.is_some(), "--user-id is required for audience=user")
        }
        Audience::All => {}
    }

    // Import the roster
    let content = std::fs::read_to_string(&users_path)
        .with_context(|| format!("failed to read roster: {}", users_path.display()))?;
    let roster: RosterFile = toml::from_str(&content)
        .with_context(|| format!("failed to parse roster: {}", users_path.display()))?;

    let store = MemoryStore::new();
    for user in &roster.users {
        let role: Role = user
            .role
            .parse()
            .map_err(|e: String| anyhow::anyhow!("{}: {e}", user.email))?;
        store
            .register_user(&user.name, &user.email, "imported", role, user.semester.as_deref())
            .map_err(|e| anyhow::anyhow!("{}: {e}", user.email))?;
    }
    println!("Loaded {} users from {}", roster.users.len(), users_path.display());

    // Persist the notification first; delivery is fire-and-forget after this.
    let notification = store
        .add(Notification {
            id: 0,
            title,
            body,
            link,
            audience,
            audience_semester: semester,
            audience_user_id: user_id,
            created_at: Utc::now(),
        })
        .await?;

    let mail_config = load_config_from(config_path.as_deref())?;
    let mailer = LogMailer::new(mail_config);

    let sent = broadcast(&notification, &store, &mailer).await;
    println!("Notification created. Emails sent: {sent}");

    Ok(())
}
