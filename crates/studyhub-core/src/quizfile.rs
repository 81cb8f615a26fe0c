//! TOML quiz-definition parser.
//!
//! Loads quizzes from TOML files and directories, and validates them before
//! they reach the store. Question ids are assigned sequentially in file
//! order; the store re-assigns real ids at insertion.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::model::{OptionLabel, Quiz, QuizQuestion};

/// Intermediate TOML structure for parsing quiz files.
#[derive(Debug, Deserialize)]
struct TomlQuizFile {
    quiz: TomlQuizHeader,
    #[serde(default)]
    questions: Vec<TomlQuestion>,
}

#[derive(Debug, Deserialize)]
struct TomlQuizHeader {
    title: String,
    semester: String,
    subject: String,
    #[serde(default)]
    randomize_questions: bool,
    #[serde(default)]
    questions_per_attempt: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct TomlQuestion {
    question: String,
    option_a: String,
    option_b: String,
    option_c: String,
    option_d: String,
    correct_option: String,
}

/// Parse a single TOML file into an unpersisted `Quiz`.
pub fn parse_quiz_file(path: &Path) -> Result<Quiz> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read quiz file: {}", path.display()))?;
    parse_quiz_str(&content, path)
}

/// Parse a TOML string into an unpersisted `Quiz` (useful for testing).
///
/// Boundary validation happens here: a non-positive `questions_per_attempt`
/// or a correct option outside A-D is rejected before anything is stored.
pub fn parse_quiz_str(content: &str, source_path: &Path) -> Result<Quiz> {
    let parsed: TomlQuizFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let questions_per_attempt = match parsed.quiz.questions_per_attempt {
        Some(n) if n <= 0 => {
            anyhow::bail!("questions_per_attempt must be a positive number, got {n}")
        }
        Some(n) => Some(n as u32),
        None => None,
    };

    let questions = parsed
        .questions
        .into_iter()
        .enumerate()
        .map(|(i, q)| {
            let correct_option: OptionLabel = q
                .correct_option
                .parse()
                .map_err(|e: String| anyhow::anyhow!("question {}: {e}", i + 1))?;
            Ok(QuizQuestion {
                id: (i + 1) as u64,
                quiz_id: 0,
                question: q.question,
                option_a: q.option_a,
                option_b: q.option_b,
                option_c: q.option_c,
                option_d: q.option_d,
                correct_option,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Quiz {
        id: 0,
        title: parsed.quiz.title,
        semester: parsed.quiz.semester,
        subject: parsed.quiz.subject,
        created_by: 0,
        created_at: chrono::Utc::now(),
        randomize_questions: parsed.quiz.randomize_questions,
        questions_per_attempt,
        questions,
    })
}

/// Recursively load all `.toml` quiz files from a directory.
pub fn load_quiz_directory(dir: &Path) -> Result<Vec<Quiz>> {
    let mut quizzes = Vec::new();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
    {
        let entry = entry?;
        let path = entry.path();

        if path.is_dir() {
            quizzes.extend(load_quiz_directory(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            match parse_quiz_file(&path) {
                Ok(quiz) => quizzes.push(quiz),
                Err(e) => {
                    tracing::warn!("skipping {}: {}", path.display(), e);
                }
            }
        }
    }

    Ok(quizzes)
}

/// A warning from quiz validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// One-based question number, if the warning concerns a question.
    pub question: Option<usize>,
    /// Warning message.
    pub message: String,
}

/// Validate a quiz for authoring mistakes that are legal but suspicious.
pub fn validate_quiz(quiz: &Quiz) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    if quiz.questions.is_empty() {
        warnings.push(ValidationWarning {
            question: None,
            message: "quiz has no questions".into(),
        });
    }

    for (i, q) in quiz.questions.iter().enumerate() {
        if q.question.trim().is_empty() {
            warnings.push(ValidationWarning {
                question: Some(i + 1),
                message: "question text is empty".into(),
            });
        }
        if [&q.option_a, &q.option_b, &q.option_c, &q.option_d]
            .iter()
            .any(|o| o.trim().is_empty())
        {
            warnings.push(ValidationWarning {
                question: Some(i + 1),
                message: "one or more option texts are empty".into(),
            });
        }
    }

    if let Some(k) = quiz.questions_per_attempt {
        if !quiz.randomize_questions {
            warnings.push(ValidationWarning {
                question: None,
                message: "questions_per_attempt is set but randomize_questions is off; it will be ignored".into(),
            });
        } else if k as usize >= quiz.questions.len() && !quiz.questions.is_empty() {
            warnings.push(ValidationWarning {
                question: None,
                message: format!(
                    "questions_per_attempt ({k}) is not below the question count ({}); every attempt will use the full set",
                    quiz.questions.len()
                ),
            });
        }
    }

    warnings
}
