//! Trait seams between the core and its collaborators.
//!
//! The grading engine and notification router depend on nothing but these
//! data-access contracts; `studyhub-store` and `studyhub-mailer` provide the
//! concrete implementations.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::CoreError;
use crate::model::{Notification, Quiz, QuizAttempt, Role, User, Viewer};

// ---------------------------------------------------------------------------
// Quiz storage
// ---------------------------------------------------------------------------

/// Fetch-and-persist contract for quizzes and their attempts.
#[async_trait]
pub trait QuizStore: Send + Sync {
    /// Fetch a quiz with its full owned question set.
    async fn quiz(&self, id: u64) -> Option<Quiz>;

    /// Persist a finished attempt. Attempts are write-once.
    async fn record_attempt(&self, attempt: QuizAttempt) -> anyhow::Result<()>;

    /// Fetch a single attempt by id.
    async fn attempt(&self, id: Uuid) -> Option<QuizAttempt>;

    /// A user's attempts, taken-at descending, bounded.
    async fn recent_attempts(&self, user_id: u64, limit: usize) -> Vec<QuizAttempt>;
}

// ---------------------------------------------------------------------------
// User directory
// ---------------------------------------------------------------------------

/// Read-only user lookups the notification router fans out over.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Fetch a user by id.
    async fn user(&self, id: u64) -> Option<User>;

    /// Fetch a user by case-normalized email.
    async fn user_by_email(&self, email: &str) -> Option<User>;

    /// Every user with the student role.
    async fn students(&self) -> Vec<User>;

    /// Every student whose semester equals the given label.
    async fn students_in_semester(&self, semester: &str) -> Vec<User>;
}

// ---------------------------------------------------------------------------
// Notification storage
// ---------------------------------------------------------------------------

/// Append-and-list contract for notifications.
#[async_trait]
pub trait NotificationStore: Send + Sync {
    /// Persist a new notification, returning it with its assigned id.
    async fn add(&self, notification: Notification) -> anyhow::Result<Notification>;

    /// All notifications, creation-time descending.
    async fn all_desc(&self) -> Vec<Notification>;
}

// ---------------------------------------------------------------------------
// Mailer
// ---------------------------------------------------------------------------

/// Best-effort mail transport.
///
/// `send` reports success as a bool; a failed send is the caller's to count
/// and log, never to propagate. Delivery is fire-and-forget after the
/// notification record is committed.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, to: &str, subject: &str, body: &str) -> bool;
}

// ---------------------------------------------------------------------------
// File storage
// ---------------------------------------------------------------------------

/// Extensions accepted for uploaded resource files.
pub const ALLOWED_EXTENSIONS: &[&str] = &[
    "pdf", "doc", "docx", "ppt", "pptx", "txt", "zip", "png", "jpg", "jpeg",
];

/// Returns `true` if the filename carries an allow-listed extension.
/// Extension-only names like `.pdf` pass; only the extension is judged.
pub fn allowed_file(filename: &str) -> bool {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ALLOWED_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Namespaced persistence for uploaded binary files.
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Persist `bytes` under `subfolder/filename`. The extension allow-list
    /// is checked before anything is written.
    async fn save(&self, subfolder: &str, filename: &str, bytes: &[u8]) -> Result<(), CoreError>;

    /// Best-effort delete; a missing file is logged and ignored.
    async fn delete(&self, subfolder: &str, filename: &str);
}

// ---------------------------------------------------------------------------
// Role gate
// ---------------------------------------------------------------------------

/// Refuse unless the viewer holds `required`.
pub fn require_role(viewer: &Viewer, required: Role) -> Result<(), CoreError> {
    if viewer.role == required {
        Ok(())
    } else {
        Err(CoreError::RoleDenied { required })
    }
}
