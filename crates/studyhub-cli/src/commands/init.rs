//! The `studyhub init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    // Create studyhub.toml
    if std::path::Path::new("studyhub.toml").exists() {
        println!("studyhub.toml already exists, skipping.");
    } else {
        std::fs::write("studyhub.toml", SAMPLE_CONFIG)?;
        println!("Created studyhub.toml");
    }

    // Create example quiz
    std::fs::create_dir_all("quizzes")?;
    let quiz_path = std::path::Path::new("quizzes/example.toml");
    if quiz_path.exists() {
        println!("quizzes/example.toml already exists, skipping.");
    } else {
        std::fs::write(quiz_path, EXAMPLE_QUIZ)?;
        println!("Created quizzes/example.toml");
    }

    // Create example roster
    let roster_path = std::path::Path::new("users.toml");
    if roster_path.exists() {
        println!("users.toml already exists, skipping.");
    } else {
        std::fs::write(roster_path, EXAMPLE_ROSTER)?;
        println!("Created users.toml");
    }

    println!("\nNext steps:");
    println!("  1. Edit studyhub.toml with your mail server settings");
    println!("  2. Run: studyhub validate --quiz quizzes/example.toml");
    println!("  3. Run: studyhub demo --quiz quizzes/example.toml --attempts 3");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# studyhub configuration

[mail]
# Leave server empty to disable mail; sends will report failure.
server = ""
port = 587
username = ""
password = "${STUDYHUB_MAIL_PASSWORD}"
use_tls = true
from_email = "no-reply@studyhub.local"
"#;

const EXAMPLE_QUIZ: &str = r#"[quiz]
title = "Data Structures Basics"
semester = "3"
subject = "Data Structures"
randomize_questions = true
questions_per_attempt = 2

[[questions]]
question = "Which data structure is LIFO?"
option_a = "Queue"
option_b = "Stack"
option_c = "Heap"
option_d = "Graph"
correct_option = "B"

[[questions]]
question = "Which data structure is FIFO?"
option_a = "Queue"
option_b = "Stack"
option_c = "Tree"
option_d = "Trie"
correct_option = "A"

[[questions]]
question = "What does binary search require?"
option_a = "Sorted input"
option_b = "A hash table"
option_c = "A linked list"
option_d = "Balanced parentheses"
correct_option = "A"
"#;

const EXAMPLE_ROSTER: &str = r#"# studyhub user roster

[[users]]
name = "Ada Lovelace"
email = "ada@example.edu"
role = "student"
semester = "3"

[[users]]
name = "Grace Hopper"
email = "grace@example.edu"
role = "student"
semester = "4"

[[users]]
name = "Administrator"
email = "admin@example.edu"
role = "admin"
"#;
