//! Quiz attempt construction and scoring.
//!
//! Selects the question set shown for one attempt and grades a submitted
//! response set against it. Both operations are pure functions over the quiz
//! data; `QuizEngine` wraps them with the fetch-and-persist flow.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CoreError;
use crate::model::{Quiz, QuizAttempt, QuizQuestion};
use crate::traits::QuizStore;

/// Select the question set for one attempt.
///
/// When `randomize_questions` is on and `questions_per_attempt` is a positive
/// count strictly below the total, returns a uniform sample of that size
/// drawn without replacement; draw order is arbitrary and each call is an
/// independent, unseeded draw. Otherwise the full set is returned in
/// insertion order, including when the configured count meets or exceeds
/// the total, so the set never shrinks.
pub fn select_attempt_questions(quiz: &Quiz) -> Vec<QuizQuestion> {
    if quiz.randomize_questions {
        if let Some(k) = quiz.questions_per_attempt {
            let k = k as usize;
            if k > 0 && k < quiz.questions.len() {
                let mut rng = rand::thread_rng();
                return quiz
                    .questions
                    .choose_multiple(&mut rng, k)
                    .cloned()
                    .collect();
            }
        }
    }
    quiz.questions.clone()
}

/// Grade a response set against the questions shown for an attempt.
///
/// `total` is the size of the selected set. The scoring pass walks the
/// quiz's *full* owned question set filtered by submitted ids, so an answer
/// keyed by a real question id outside the selected subset still scores;
/// ids that match no question are silently ignored. Submitted labels are
/// compared case-insensitively.
pub fn score_attempt(
    quiz: &Quiz,
    selected: &[QuizQuestion],
    answers: &HashMap<u64, String>,
) -> (u32, u32) {
    let total = selected.len() as u32;
    let mut score = 0u32;
    for question in &quiz.questions {
        if let Some(submitted) = answers.get(&question.id) {
            if submitted.trim().eq_ignore_ascii_case(&question.correct_option.to_string()) {
                score += 1;
            }
        }
    }
    (score, total)
}

/// Parse submitted answers out of a form body.
///
/// The quiz form names one input group per question: `q{id}`. Keys without
/// the prefix or with a non-numeric suffix are skipped.
pub fn extract_submitted_answers(form: &HashMap<String, String>) -> HashMap<u64, String> {
    let mut answers = HashMap::new();
    for (field, value) in form {
        if let Some(raw_id) = field.strip_prefix('q') {
            if let Ok(id) = raw_id.parse::<u64>() {
                answers.insert(id, value.clone());
            }
        }
    }
    answers
}

/// Read-only projection of a quiz plus the question subset chosen for one
/// attempt, handed to the presentation layer. Carries no logic beyond
/// assembling the subset and the unfiltered question count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttemptView {
    pub quiz_id: u64,
    pub title: String,
    pub semester: String,
    pub subject: String,
    pub randomize_questions: bool,
    pub questions_per_attempt: Option<u32>,
    /// The questions shown for this attempt.
    pub questions: Vec<QuizQuestion>,
    /// Size of the quiz's full question set, not the selected subset.
    pub total_questions: usize,
}

impl AttemptView {
    /// Assemble the projection from a quiz and its selected subset.
    pub fn new(quiz: &Quiz, selected: Vec<QuizQuestion>) -> Self {
        AttemptView {
            quiz_id: quiz.id,
            title: quiz.title.clone(),
            semester: quiz.semester.clone(),
            subject: quiz.subject.clone(),
            randomize_questions: quiz.randomize_questions,
            questions_per_attempt: quiz.questions_per_attempt,
            total_questions: quiz.questions.len(),
            questions: selected,
        }
    }
}

/// The attempt flow over a quiz store: fetch, select, score, persist.
pub struct QuizEngine {
    store: Arc<dyn QuizStore>,
}

impl QuizEngine {
    pub fn new(store: Arc<dyn QuizStore>) -> Self {
        Self { store }
    }

    /// The GET half of the quiz-taking flow: fetch the quiz and build the
    /// view with a freshly selected question set.
    pub async fn start_attempt(&self, quiz_id: u64) -> Result<AttemptView, CoreError> {
        let quiz = self
            .store
            .quiz(quiz_id)
            .await
            .ok_or_else(|| CoreError::not_found("quiz", quiz_id))?;
        let selected = select_attempt_questions(&quiz);
        Ok(AttemptView::new(&quiz, selected))
    }

    /// The POST half: re-select for this submission, parse the form body,
    /// grade, and persist the attempt. Each submission is its own
    /// independent draw; there is no persisted seed linking it to the GET.
    pub async fn submit_attempt(
        &self,
        quiz_id: u64,
        user_id: u64,
        form: &HashMap<String, String>,
    ) -> Result<QuizAttempt, CoreError> {
        let quiz = self
            .store
            .quiz(quiz_id)
            .await
            .ok_or_else(|| CoreError::not_found("quiz", quiz_id))?;

        let selected = select_attempt_questions(&quiz);
        let answers = extract_submitted_answers(form);
        let (score, total) = score_attempt(&quiz, &selected, &answers);

        let attempt = QuizAttempt {
            id: Uuid::new_v4(),
            user_id,
            quiz_id: quiz.id,
            score,
            total,
            taken_at: Utc::now(),
        };
        self.store
            .record_attempt(attempt.clone())
            .await
            .map_err(|e| CoreError::Validation(format!("failed to record attempt: {e}")))?;

        tracing::info!(
            quiz_id,
            user_id,
            score,
            total,
            "attempt recorded"
        );
        Ok(attempt)
    }

    /// Fetch a persisted attempt for the result view.
    pub async fn attempt_result(&self, attempt_id: Uuid) -> Result<QuizAttempt, CoreError> {
        self.store
            .attempt(attempt_id)
            .await
            .ok_or_else(|| CoreError::not_found("attempt", attempt_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::OptionLabel;
    use std::collections::HashSet;

    fn question(id: u64, quiz_id: u64, correct: OptionLabel) -> QuizQuestion {
        QuizQuestion {
            id,
            quiz_id,
            question: format!("question {id}"),
            option_a: "a".into(),
            option_b: "b".into(),
            option_c: "c".into(),
            option_d: "d".into(),
            correct_option: correct,
        }
    }

    fn quiz_with(n: u64, randomize: bool, per_attempt: Option<u32>) -> Quiz {
        Quiz {
            id: 1,
            title: "T".into(),
            semester: "3".into(),
            subject: "DS".into(),
            created_by: 1,
            created_at: Utc::now(),
            randomize_questions: randomize,
            questions_per_attempt: per_attempt,
            questions: (1..=n).map(|i| question(i, 1, OptionLabel::A)).collect(),
        }
    }

    #[test]
    fn no_randomization_returns_full_set_in_order() {
        let quiz = quiz_with(5, false, Some(2));
        for _ in 0..3 {
            let selected = select_attempt_questions(&quiz);
            let ids: Vec<u64> = selected.iter().map(|q| q.id).collect();
            assert_eq!(ids, vec![1, 2, 3, 4, 5]);
        }
    }

    #[test]
    fn randomized_sample_is_distinct_subset_of_requested_size() {
        let quiz = quiz_with(20, true, Some(10));
        for _ in 0..10 {
            let selected = select_attempt_questions(&quiz);
            assert_eq!(selected.len(), 10);
            let ids: HashSet<u64> = selected.iter().map(|q| q.id).collect();
            assert_eq!(ids.len(), 10, "sample must be without replacement");
            assert!(ids.iter().all(|id| (1..=20).contains(id)));
        }
    }

    #[test]
    fn per_attempt_at_or_above_total_selects_everything() {
        for k in [5, 6, 100] {
            let quiz = quiz_with(5, true, Some(k));
            assert_eq!(select_attempt_questions(&quiz).len(), 5);
        }
    }

    #[test]
    fn per_attempt_unset_or_zero_selects_everything() {
        let quiz = quiz_with(5, true, None);
        assert_eq!(select_attempt_questions(&quiz).len(), 5);
        let quiz = quiz_with(5, true, Some(0));
        assert_eq!(select_attempt_questions(&quiz).len(), 5);
    }

    #[test]
    fn scoring_is_case_insensitive_and_counts_selected_size() {
        let mut quiz = quiz_with(0, false, None);
        quiz.questions = vec![
            question(1, 1, OptionLabel::A),
            question(2, 1, OptionLabel::B),
        ];
        let selected = quiz.questions.clone();
        let answers = HashMap::from([(1, "a".to_string()), (2, "C".to_string())]);
        let (score, total) = score_attempt(&quiz, &selected, &answers);
        assert_eq!(score, 1);
        assert_eq!(total, 2);
    }

    #[test]
    fn scoring_ignores_unknown_question_ids() {
        let mut quiz = quiz_with(0, false, None);
        quiz.questions = vec![question(1, 1, OptionLabel::A)];
        let selected = quiz.questions.clone();
        let answers = HashMap::from([(1, "A".to_string()), (999, "A".to_string())]);
        let (score, total) = score_attempt(&quiz, &selected, &answers);
        assert_eq!(score, 1);
        assert_eq!(total, 1);
    }

    #[test]
    fn scoring_walks_full_set_not_just_selected() {
        // A submission keyed by a real question id outside the selected
        // subset still scores. Current behavior, preserved deliberately.
        let mut quiz = quiz_with(0, false, None);
        quiz.questions = vec![
            question(1, 1, OptionLabel::A),
            question(2, 1, OptionLabel::B),
        ];
        let selected = vec![quiz.questions[0].clone()];
        let answers = HashMap::from([(1, "A".to_string()), (2, "B".to_string())]);
        let (score, total) = score_attempt(&quiz, &selected, &answers);
        assert_eq!(score, 2);
        assert_eq!(total, 1);
    }

    #[test]
    fn form_extraction_follows_q_prefix_convention() {
        let form = HashMap::from([
            ("q1".to_string(), "A".to_string()),
            ("q17".to_string(), "c".to_string()),
            ("qabc".to_string(), "B".to_string()),
            ("csrf_token".to_string(), "zzz".to_string()),
        ]);
        let answers = extract_submitted_answers(&form);
        assert_eq!(answers.len(), 2);
        assert_eq!(answers.get(&1).map(String::as_str), Some("A"));
        assert_eq!(answers.get(&17).map(String::as_str), Some("c"));
    }

    #[test]
    fn attempt_view_reports_unfiltered_total() {
        let quiz = quiz_with(20, true, Some(10));
        let selected = select_attempt_questions(&quiz);
        let view = AttemptView::new(&quiz, selected);
        assert_eq!(view.questions.len(), 10);
        assert_eq!(view.total_questions, 20);
        assert_eq!(view.quiz_id, 1);
    }

    struct SingleQuizStore {
        quiz: Quiz,
        attempts: std::sync::Mutex<Vec<QuizAttempt>>,
    }

    #[async_trait::async_trait]
    impl QuizStore for SingleQuizStore {
        async fn quiz(&self, id: u64) -> Option<Quiz> {
            (id == self.quiz.id).then(|| self.quiz.clone())
        }

        async fn record_attempt(&self, attempt: QuizAttempt) -> anyhow::Result<()> {
            self.attempts.lock().unwrap().push(attempt);
            Ok(())
        }

        async fn attempt(&self, id: Uuid) -> Option<QuizAttempt> {
            self.attempts
                .lock()
                .unwrap()
                .iter()
                .find(|a| a.id == id)
                .cloned()
        }

        async fn recent_attempts(&self, user_id: u64, limit: usize) -> Vec<QuizAttempt> {
            let attempts = self.attempts.lock().unwrap();
            attempts
                .iter()
                .filter(|a| a.user_id == user_id)
                .rev()
                .take(limit)
                .cloned()
                .collect()
        }
    }

    fn engine_with(quiz: Quiz) -> (QuizEngine, Arc<SingleQuizStore>) {
        let store = Arc::new(SingleQuizStore {
            quiz,
            attempts: std::sync::Mutex::new(Vec::new()),
        });
        (QuizEngine::new(store.clone()), store)
    }

    #[tokio::test]
    async fn start_attempt_selects_and_projects() {
        let (engine, _) = engine_with(quiz_with(20, true, Some(5)));
        let view = engine.start_attempt(1).await.unwrap();
        assert_eq!(view.questions.len(), 5);
        assert_eq!(view.total_questions, 20);
    }

    #[tokio::test]
    async fn start_attempt_unknown_quiz_is_not_found() {
        let (engine, _) = engine_with(quiz_with(3, false, None));
        let err = engine.start_attempt(99).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn submit_attempt_grades_and_persists() {
        let (engine, store) = engine_with(quiz_with(3, false, None));
        let form = HashMap::from([
            ("q1".to_string(), "A".to_string()),
            ("q2".to_string(), "b".to_string()),
            ("q3".to_string(), "A".to_string()),
        ]);
        let attempt = engine.submit_attempt(1, 7, &form).await.unwrap();
        assert_eq!(attempt.score, 2);
        assert_eq!(attempt.total, 3);
        assert_eq!(attempt.user_id, 7);

        let fetched = engine.attempt_result(attempt.id).await.unwrap();
        assert_eq!(fetched.score, 2);
        assert_eq!(store.attempts.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn attempt_result_unknown_id_is_not_found() {
        let (engine, _) = engine_with(quiz_with(1, false, None));
        let err = engine.attempt_result(Uuid::new_v4()).await.unwrap_err();
        assert!(err.is_not_found());
    }
}
