//! Aggregate statistics for dashboards.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::model::QuizAttempt;

/// Entity counts shown on the admin dashboard.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardStats {
    pub students: usize,
    pub syllabus: usize,
    pub notes: usize,
    pub papers: usize,
    pub quizzes: usize,
}

/// Aggregate attempt statistics for one quiz.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizStats {
    /// Quiz identifier.
    pub quiz_id: u64,
    /// Number of recorded attempts.
    pub attempts: usize,
    /// Mean of `score / total` across attempts; zero-total attempts count
    /// as zero.
    pub avg_score_fraction: f64,
}

/// Compute per-quiz attempt statistics grouped by quiz id.
pub fn quiz_averages(attempts: &[QuizAttempt]) -> HashMap<u64, QuizStats> {
    let mut grouped: HashMap<u64, Vec<&QuizAttempt>> = HashMap::new();
    for attempt in attempts {
        grouped.entry(attempt.quiz_id).or_default().push(attempt);
    }

    grouped
        .into_iter()
        .map(|(quiz_id, group)| {
            let sum: f64 = group
                .iter()
                .map(|a| {
                    if a.total == 0 {
                        0.0
                    } else {
                        a.score as f64 / a.total as f64
                    }
                })
                .sum();
            let stats = QuizStats {
                quiz_id,
                attempts: group.len(),
                avg_score_fraction: sum / group.len() as f64,
            };
            (quiz_id, stats)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn attempt(quiz_id: u64, score: u32, total: u32) -> QuizAttempt {
        QuizAttempt {
            id: Uuid::new_v4(),
            user_id: 1,
            quiz_id,
            score,
            total,
            taken_at: Utc::now(),
        }
    }

    #[test]
    fn averages_group_by_quiz() {
        let attempts = vec![
            attempt(1, 5, 10),
            attempt(1, 10, 10),
            attempt(2, 0, 10),
        ];
        let stats = quiz_averages(&attempts);
        assert_eq!(stats.len(), 2);
        let q1 = &stats[&1];
        assert_eq!(q1.attempts, 2);
        assert!((q1.avg_score_fraction - 0.75).abs() < f64::EPSILON);
        assert!((stats[&2].avg_score_fraction - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn zero_total_attempts_count_as_zero() {
        let stats = quiz_averages(&[attempt(1, 0, 0)]);
        assert_eq!(stats[&1].attempts, 1);
        assert_eq!(stats[&1].avg_score_fraction, 0.0);
    }

    #[test]
    fn empty_input_yields_empty_map() {
        assert!(quiz_averages(&[]).is_empty());
    }
}
