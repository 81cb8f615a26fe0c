//! studyhub CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "studyhub", version, about = "Quiz grading and notification tooling")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create starter config, an example quiz, and an example roster
    Init,

    /// Validate quiz TOML files
    Validate {
        /// Path to a .toml quiz file or directory
        #[arg(long)]
        quiz: PathBuf,
    },

    /// Simulate attempts against a quiz and show the scores
    Demo {
        /// Path to a .toml quiz file
        #[arg(long)]
        quiz: PathBuf,

        /// Number of attempts to simulate
        #[arg(long, default_value = "3")]
        attempts: u32,
    },

    /// Create a notification and fan it out to a user roster
    Notify {
        /// Path to a users roster TOML file
        #[arg(long)]
        users: PathBuf,

        /// Notification title
        #[arg(long)]
        title: String,

        /// Notification body
        #[arg(long)]
        body: String,

        /// Optional link attached to the notification
        #[arg(long)]
        link: Option<String>,

        /// Audience: all, semester, user
        #[arg(long, default_value = "all")]
        audience: String,

        /// Target semester (audience = semester)
        #[arg(long)]
        semester: Option<String>,

        /// Target user id (audience = user)
        #[arg(long)]
        user_id: Option<u64>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("studyhub=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init => commands::init::execute(),
        Commands::Validate { quiz } => commands::validate::execute(quiz),
        Commands::Demo { quiz, attempts } => commands::demo::execute(quiz, attempts),
        Commands::Notify {
            users,
            title,
            body,
            link,
            audience,
            semester,
            user_id,
            config,
        } => {
            commands::notify::execute(users, title, body, link, audience, semester, user_id, config)
                .await
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
