//! studyhub-core — Core data model, quiz grading engine, and notification router.
//!
//! This crate defines the fundamental entity types, the attempt-construction
//! and scoring logic, and the audience-targeting rules that the rest of the
//! studyhub system builds on.

pub mod engine;
pub mod error;
pub mod model;
pub mod quizfile;
pub mod router;
pub mod stats;
pub mod traits;
