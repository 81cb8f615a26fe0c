//! Core data model types for studyhub.
//!
//! These are the fundamental entities the portal stores: users, uploaded
//! resources, quizzes with their questions and attempts, and notifications.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Role held by a portal user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Student,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::Student => write!(f, "student"),
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "student" => Ok(Role::Student),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// A registered portal user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier.
    pub id: u64,
    /// Display name.
    pub name: String,
    /// Unique, case-normalized email address.
    pub email: String,
    /// Opaque password credential; hashing is the identity store's concern.
    pub password_hash: String,
    /// Role of this user.
    pub role: Role,
    /// Semester label for students (admins have none).
    #[serde(default)]
    pub semester: Option<String>,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}

/// Case-normalize an email the way registration and login both do.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// The identity-store projection consumed by gates and the notification
/// router: who is looking, and what semester (if any) they belong to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Viewer {
    /// User identifier.
    pub id: u64,
    /// Role of the viewer.
    pub role: Role,
    /// Semester label, if the viewer is a student with one set.
    #[serde(default)]
    pub semester: Option<String>,
}

impl From<&User> for Viewer {
    fn from(user: &User) -> Self {
        Viewer {
            id: user.id,
            role: user.role,
            semester: user.semester.clone(),
        }
    }
}

/// One of the four labeled answer options of a quiz question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OptionLabel {
    A,
    B,
    C,
    D,
}

impl fmt::Display for OptionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionLabel::A => write!(f, "A"),
            OptionLabel::B => write!(f, "B"),
            OptionLabel::C => write!(f, "C"),
            OptionLabel::D => write!(f, "D"),
        }
    }
}

impl FromStr for OptionLabel {
    type Err = String;

    /// Case-insensitive: submitted answers arrive as raw form strings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "A" => Ok(OptionLabel::A),
            "B" => Ok(OptionLabel::B),
            "C" => Ok(OptionLabel::C),
            "D" => Ok(OptionLabel::D),
            other => Err(format!("unknown option label: {other}")),
        }
    }
}

/// A multiple-choice question owned by a quiz.
///
/// Immutable once created; there is no edit or single-question delete
/// operation, only cascade deletion with the owning quiz.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizQuestion {
    /// Unique identifier.
    pub id: u64,
    /// Owning quiz.
    pub quiz_id: u64,
    /// Question text.
    pub question: String,
    /// Option A text.
    pub option_a: String,
    /// Option B text.
    pub option_b: String,
    /// Option C text.
    pub option_c: String,
    /// Option D text.
    pub option_d: String,
    /// Which option is correct.
    pub correct_option: OptionLabel,
}

/// A quiz with its owned question set and attempt-construction settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quiz {
    /// Unique identifier.
    pub id: u64,
    /// Quiz title.
    pub title: String,
    /// Semester this quiz belongs to.
    pub semester: String,
    /// Subject this quiz belongs to.
    pub subject: String,
    /// Admin who created the quiz.
    pub created_by: u64,
    /// When the quiz was created.
    pub created_at: DateTime<Utc>,
    /// Whether each attempt draws a random subset of questions.
    #[serde(default)]
    pub randomize_questions: bool,
    /// Questions shown per attempt when randomization is on.
    /// Ignored when `randomize_questions` is false; `None` means show all.
    #[serde(default)]
    pub questions_per_attempt: Option<u32>,
    /// The full owned question set, in insertion order.
    #[serde(default)]
    pub questions: Vec<QuizQuestion>,
}

/// One scored instance of a student taking a quiz.
///
/// Created exactly once per submission, never mutated or deleted. Attempts
/// survive deletion of the quiz they reference (dangling reference is the
/// accepted behavior, asserted by tests).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizAttempt {
    /// Unique attempt identifier.
    pub id: Uuid,
    /// The student who took the quiz.
    pub user_id: u64,
    /// The quiz that was taken.
    pub quiz_id: u64,
    /// Number of correctly answered questions. Invariant: `score <= total`.
    pub score: u32,
    /// Number of questions shown for this attempt.
    pub total: u32,
    /// When the attempt was submitted.
    pub taken_at: DateTime<Utc>,
}

/// The targeting rule of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Audience {
    /// Every student.
    All,
    /// Students of one semester.
    Semester,
    /// A single user.
    User,
}

impl fmt::Display for Audience {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Audience::All => write!(f, "all"),
            Audience::Semester => write!(f, "semester"),
            Audience::User => write!(f, "user"),
        }
    }
}

impl FromStr for Audience {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(Audience::All),
            "semester" => Ok(Audience::Semester),
            "user" => Ok(Audience::User),
            other => Err(format!("unknown audience: {other}")),
        }
    }
}

/// A broadcast message targeted at some audience. Immutable after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    /// Unique identifier.
    pub id: u64,
    /// Headline shown in listings.
    pub title: String,
    /// Message body.
    pub body: String,
    /// Optional link attached to the message.
    #[serde(default)]
    pub link: Option<String>,
    /// Targeting rule.
    pub audience: Audience,
    /// Target semester; meaningful only when `audience` is `Semester`.
    #[serde(default)]
    pub audience_semester: Option<String>,
    /// Target user; meaningful only when `audience` is `User`.
    #[serde(default)]
    pub audience_user_id: Option<u64>,
    /// When the notification was created.
    pub created_at: DateTime<Utc>,
}

/// A read receipt.
///
/// Present in the data model but consulted by no visibility or listing
/// operation; kept so stored data round-trips.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationRead {
    pub user_id: u64,
    pub notification_id: u64,
    pub read_at: DateTime<Utc>,
}

/// An uploaded syllabus document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Syllabus {
    pub id: u64,
    pub semester: String,
    pub subject: String,
    /// Name of the backing file in the file store.
    pub filename: String,
    pub uploaded_at: DateTime<Utc>,
}

/// An uploaded study note.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Note {
    pub id: u64,
    pub semester: String,
    pub subject: String,
    pub title: String,
    /// Name of the backing file in the file store.
    pub filename: String,
    pub uploaded_at: DateTime<Utc>,
}

/// An uploaded past question paper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionPaper {
    pub id: u64,
    pub semester: String,
    pub subject: String,
    pub year: String,
    /// Name of the backing file in the file store.
    pub filename: String,
    pub uploaded_at: DateTime<Utc>,
}
