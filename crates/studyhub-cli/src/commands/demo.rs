//! The `studyhub demo` command.
//!
//! Simulates students taking a quiz: every attempt gets its own question
//! selection and random answers, then is scored exactly as a real
//! submission would be.

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};
use rand::seq::SliceRandom;

use studyhub_core::engine::{score_attempt, select_attempt_questions};
use studyhub_core::quizfile::parse_quiz_file;

pub fn execute(quiz_path: PathBuf, attempts: u32) -> Result<()> {
    anyhow::ensure!(attempts >= 1, "attempts must be at least 1");

    let quiz = parse_quiz_file(&quiz_path)?;

    println!(
        "Quiz: {} ({} questions, {})",
        quiz.title,
        quiz.questions.len(),
        if quiz.randomize_questions {
            match quiz.questions_per_attempt {
                Some(k) => format!("random selection, {k} per attempt"),
                None => "random selection, all questions".to_string(),
            }
        } else {
            "fixed order".to_string()
        }
    );

    let labels = ["A", "B", "C", "D"];
    let mut rng = rand::thread_rng();

    let mut table = Table::new();
    table.set_header(vec!["Attempt", "Shown", "Score", "Percent"]);

    for attempt in 1..=attempts {
        let selected = select_attempt_questions(&quiz);

        // Answer every shown question with a uniformly random label.
        let answers: HashMap<u64, String> = selected
            .iter()
            .map(|q| {
                let label = labels.choose(&mut rng).unwrap_or(&"A");
                (q.id, label.to_string())
            })
            .collect();

        let (score, total) = score_attempt(&quiz, &selected, &answers);
        let percent = if total == 0 {
            0.0
        } else {
            score as f64 / total as f64 * 100.0
        };

        table.add_row(vec![
            Cell::new(attempt),
            Cell::new(selected.len()),
            Cell::new(format!("{score}/{total}")),
            Cell::new(format!("{percent:.0}%")),
        ]);
    }

    println!("\n{table}");
    Ok(())
}
