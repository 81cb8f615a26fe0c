//! In-memory entity tables with the backing store's cascade rules.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use studyhub_core::error::CoreError;
use studyhub_core::model::{
    normalize_email, Note, Notification, QuestionPaper, Quiz, QuizAttempt, QuizQuestion, Role,
    Syllabus, User,
};
use studyhub_core::stats::DashboardStats;
use studyhub_core::traits::{NotificationStore, QuizStore, UserDirectory};

/// All entity tables, serializable as one snapshot.
#[derive(Debug, Default, Serialize, Deserialize)]
struct Tables {
    users: HashMap<u64, User>,
    quizzes: HashMap<u64, Quiz>,
    attempts: HashMap<Uuid, QuizAttempt>,
    notifications: Vec<Notification>,
    syllabus: HashMap<u64, Syllabus>,
    notes: HashMap<u64, Note>,
    papers: HashMap<u64, QuestionPaper>,
    next_id: u64,
}

impl Tables {
    fn assign_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

/// In-memory store implementing the core's repository traits.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    // -- users --------------------------------------------------------------

    /// Register a user, enforcing case-normalized email uniqueness.
    pub fn register_user(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
        role: Role,
        semester: Option<&str>,
    ) -> Result<User, CoreError> {
        if name.trim().is_empty() || email.trim().is_empty() || password_hash.is_empty() {
            return Err(CoreError::Validation("all fields are required".into()));
        }
        let email = normalize_email(email);

        let mut tables = self.tables.lock().unwrap();
        if tables.users.values().any(|u| u.email == email) {
            return Err(CoreError::Validation("email already registered".into()));
        }
        let id = tables.assign_id();
        let user = User {
            id,
            name: name.trim().to_string(),
            email,
            password_hash: password_hash.to_string(),
            role,
            semester: semester.map(str::to_string),
            created_at: Utc::now(),
        };
        tables.users.insert(id, user.clone());
        Ok(user)
    }

    // -- quizzes ------------------------------------------------------------

    /// Insert a quiz, assigning fresh ids to it and its questions.
    pub fn add_quiz(&self, mut quiz: Quiz) -> Quiz {
        let mut tables = self.tables.lock().unwrap();
        let quiz_id = tables.assign_id();
        quiz.id = quiz_id;
        for question in &mut quiz.questions {
            question.id = tables.assign_id();
            question.quiz_id = quiz_id;
        }
        tables.quizzes.insert(quiz_id, quiz.clone());
        quiz
    }

    /// Append a question to an existing quiz. A missing quiz consumes
    /// nothing from the id sequence.
    pub fn add_question(&self, quiz_id: u64, mut question: QuizQuestion) -> Result<QuizQuestion, CoreError> {
        let mut tables = self.tables.lock().unwrap();
        if !tables.quizzes.contains_key(&quiz_id) {
            return Err(CoreError::not_found("quiz", quiz_id));
        }
        let id = tables.assign_id();
        question.id = id;
        question.quiz_id = quiz_id;
        if let Some(quiz) = tables.quizzes.get_mut(&quiz_id) {
            quiz.questions.push(question.clone());
        }
        Ok(question)
    }

    /// Delete a quiz. Its questions go with it; attempts that reference the
    /// quiz id stay behind, dangling. That asymmetry is the accepted cascade
    /// rule and tests assert it.
    pub fn delete_quiz(&self, quiz_id: u64) -> Result<(), CoreError> {
        let mut tables = self.tables.lock().unwrap();
        tables
            .quizzes
            .remove(&quiz_id)
            .map(|_| ())
            .ok_or_else(|| CoreError::not_found("quiz", quiz_id))
    }

    /// Quizzes matching optional semester/subject filters, newest first.
    pub fn list_quizzes(&self, semester: Option<&str>, subject: Option<&str>) -> Vec<Quiz> {
        let tables = self.tables.lock().unwrap();
        let mut quizzes: Vec<Quiz> = tables
            .quizzes
            .values()
            .filter(|q| semester.is_none_or(|s| q.semester == s))
            .filter(|q| subject.is_none_or(|s| q.subject == s))
            .cloned()
            .collect();
        quizzes.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        quizzes
    }

    // -- attempts -----------------------------------------------------------

    /// All attempts across users, for statistics.
    pub fn all_attempts(&self) -> Vec<QuizAttempt> {
        self.tables.lock().unwrap().attempts.values().cloned().collect()
    }

    // -- resources ----------------------------------------------------------

    pub fn add_syllabus(&self, semester: &str, subject: &str, filename: &str) -> Syllabus {
        let mut tables = self.tables.lock().unwrap();
        let id = tables.assign_id();
        let record = Syllabus {
            id,
            semester: semester.to_string(),
            subject: subject.to_string(),
            filename: filename.to_string(),
            uploaded_at: Utc::now(),
        };
        tables.syllabus.insert(id, record.clone());
        record
    }

    pub fn add_note(&self, semester: &str, subject: &str, title: &str, filename: &str) -> Note {
        let mut tables = self.tables.lock().unwrap();
        let id = tables.assign_id();
        let record = Note {
            id,
            semester: semester.to_string(),
            subject: subject.to_string(),
            title: title.to_string(),
            filename: filename.to_string(),
            uploaded_at: Utc::now(),
        };
        tables.notes.insert(id, record.clone());
        record
    }

    pub fn add_paper(&self, semester: &str, subject: &str, year: &str, filename: &str) -> QuestionPaper {
        let mut tables = self.tables.lock().unwrap();
        let id = tables.assign_id();
        let record = QuestionPaper {
            id,
            semester: semester.to_string(),
            subject: subject.to_string(),
            year: year.to_string(),
            filename: filename.to_string(),
            uploaded_at: Utc::now(),
        };
        tables.papers.insert(id, record.clone());
        record
    }

    /// Syllabus listing: semester, then subject.
    pub fn list_syllabus(&self, semester: Option<&str>, subject: Option<&str>) -> Vec<Syllabus> {
        let tables = self.tables.lock().unwrap();
        let mut items: Vec<Syllabus> = tables
            .syllabus
            .values()
            .filter(|r| semester.is_none_or(|s| r.semester == s))
            .filter(|r| subject.is_none_or(|s| r.subject == s))
            .cloned()
            .collect();
        items.sort_by(|a, b| (&a.semester, &a.subject).cmp(&(&b.semester, &b.subject)));
        items
    }

    /// Notes listing: semester, subject, then title.
    pub fn list_notes(&self, semester: Option<&str>, subject: Option<&str>) -> Vec<Note> {
        let tables = self.tables.lock().unwrap();
        let mut items: Vec<Note> = tables
            .notes
            .values()
            .filter(|r| semester.is_none_or(|s| r.semester == s))
            .filter(|r| subject.is_none_or(|s| r.subject == s))
            .cloned()
            .collect();
        items.sort_by(|a, b| {
            (&a.semester, &a.subject, &a.title).cmp(&(&b.semester, &b.subject, &b.title))
        });
        items
    }

    /// Papers listing: semester, subject, then year descending.
    pub fn list_papers(&self, semester: Option<&str>, subject: Option<&str>) -> Vec<QuestionPaper> {
        let tables = self.tables.lock().unwrap();
        let mut items: Vec<QuestionPaper> = tables
            .papers
            .values()
            .filter(|r| semester.is_none_or(|s| r.semester == s))
            .filter(|r| subject.is_none_or(|s| r.subject == s))
            .cloned()
            .collect();
        items.sort_by(|a, b| {
            (&a.semester, &a.subject)
                .cmp(&(&b.semester, &b.subject))
                .then(b.year.cmp(&a.year))
        });
        items
    }

    pub fn remove_syllabus(&self, id: u64) -> Result<Syllabus, CoreError> {
        self.tables
            .lock()
            .unwrap()
            .syllabus
            .remove(&id)
            .ok_or_else(|| CoreError::not_found("syllabus", id))
    }

    pub fn remove_note(&self, id: u64) -> Result<Note, CoreError> {
        self.tables
            .lock()
            .unwrap()
            .notes
            .remove(&id)
            .ok_or_else(|| CoreError::not_found("note", id))
    }

    pub fn remove_paper(&self, id: u64) -> Result<QuestionPaper, CoreError> {
        self.tables
            .lock()
            .unwrap()
            .papers
            .remove(&id)
            .ok_or_else(|| CoreError::not_found("question paper", id))
    }

    // -- dashboard ----------------------------------------------------------

    pub fn dashboard_stats(&self) -> DashboardStats {
        let tables = self.tables.lock().unwrap();
        DashboardStats {
            students: tables
                .users
                .values()
                .filter(|u| u.role == Role::Student)
                .count(),
            syllabus: tables.syllabus.len(),
            notes: tables.notes.len(),
            papers: tables.papers.len(),
            quizzes: tables.quizzes.len(),
        }
    }

    // -- snapshots ----------------------------------------------------------

    /// Save the whole store as pretty JSON.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let tables = self.tables.lock().unwrap();
        let json = serde_json::to_string_pretty(&*tables).context("failed to serialize store")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write store to {}", path.display()))?;
        Ok(())
    }

    /// Load a store snapshot from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read store from {}", path.display()))?;
        let tables: Tables =
            serde_json::from_str(&content).context("failed to parse store JSON")?;
        Ok(Self {
            tables: Mutex::new(tables),
        })
    }
}

#[async_trait]
impl QuizStore for MemoryStore {
    async fn quiz(&self, id: u64) -> Option<Quiz> {
        self.tables.lock().unwrap().quizzes.get(&id).cloned()
    }

    async fn record_attempt(&self, attempt: QuizAttempt) -> Result<()> {
        let mut tables = self.tables.lock().unwrap();
        anyhow::ensure!(
            attempt.score <= attempt.total,
            "attempt score {} exceeds total {}",
            attempt.score,
            attempt.total
        );
        tables.attempts.insert(attempt.id, attempt);
        Ok(())
    }

    async fn attempt(&self, id: Uuid) -> Option<QuizAttempt> {
        self.tables.lock().unwrap().attempts.get(&id).cloned()
    }

    async fn recent_attempts(&self, user_id: u64, limit: usize) -> Vec<QuizAttempt> {
        let tables = self.tables.lock().unwrap();
        let mut attempts: Vec<QuizAttempt> = tables
            .attempts
            .values()
            .filter(|a| a.user_id == user_id)
            .cloned()
            .collect();
        attempts.sort_by(|a, b| b.taken_at.cmp(&a.taken_at));
        attempts.truncate(limit);
        attempts
    }
}

#[async_trait]
impl UserDirectory for MemoryStore {
    async fn user(&self, id: u64) -> Option<User> {
        self.tables.lock().unwrap().users.get(&id).cloned()
    }

    async fn user_by_email(&self, email: &str) -> Option<User> {
        let email = normalize_email(email);
        self.tables
            .lock()
            .unwrap()
            .users
            .values()
            .find(|u| u.email == email)
            .cloned()
    }

    async fn students(&self) -> Vec<User> {
        let mut students: Vec<User> = self
            .tables
            .lock()
            .unwrap()
            .users
            .values()
            .filter(|u| u.role == Role::Student)
            .cloned()
            .collect();
        students.sort_by_key(|u| u.id);
        students
    }

    async fn students_in_semester(&self, semester: &str) -> Vec<User> {
        let mut students: Vec<User> = self
            .tables
            .lock()
            .unwrap()
            .users
            .values()
            .filter(|u| u.role == Role::Student && u.semester.as_deref() == Some(semester))
            .cloned()
            .collect();
        students.sort_by_key(|u| u.id);
        students
    }
}

#[async_trait]
impl NotificationStore for MemoryStore {
    async fn add(&self, mut notification: Notification) -> Result<Notification> {
        let mut tables = self.tables.lock().unwrap();
        notification.id = tables.assign_id();
        tables.notifications.push(notification.clone());
        Ok(notification)
    }

    async fn all_desc(&self) -> Vec<Notification> {
        let mut notifications = self.tables.lock().unwrap().notifications.clone();
        notifications.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        notifications
    }
}
