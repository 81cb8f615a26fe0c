//! Benchmarks for attempt selection and scoring.

use std::collections::HashMap;

use chrono::Utc;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

use studyhub_core::engine::{score_attempt, select_attempt_questions};
use studyhub_core::model::{OptionLabel, Quiz, QuizQuestion};

fn build_quiz(n: u64, per_attempt: Option<u32>) -> Quiz {
    Quiz {
        id: 1,
        title: "bench".into(),
        semester: "3".into(),
        subject: "DS".into(),
        created_by: 1,
        created_at: Utc::now(),
        randomize_questions: per_attempt.is_some(),
        questions_per_attempt: per_attempt,
        questions: (1..=n)
            .map(|i| QuizQuestion {
                id: i,
                quiz_id: 1,
                question: format!("question {i}"),
                option_a: "a".into(),
                option_b: "b".into(),
                option_c: "c".into(),
                option_d: "d".into(),
                correct_option: OptionLabel::A,
            })
            .collect(),
    }
}

fn bench_selection(c: &mut Criterion) {
    let quiz = build_quiz(500, Some(50));
    c.bench_function("select_50_of_500", |b| {
        b.iter(|| select_attempt_questions(black_box(&quiz)))
    });

    let full = build_quiz(500, None);
    c.bench_function("select_full_500", |b| {
        b.iter(|| select_attempt_questions(black_box(&full)))
    });
}

fn bench_scoring(c: &mut Criterion) {
    let quiz = build_quiz(500, None);
    let selected = quiz.questions.clone();
    let answers: HashMap<u64, String> = (1..=500u64).map(|i| (i, "a".to_string())).collect();

    c.bench_function("score_500_answers", |b| {
        b.iter(|| score_attempt(black_box(&quiz), black_box(&selected), black_box(&answers)))
    });
}

criterion_group!(benches, bench_selection, bench_scoring);
criterion_main!(benches);
