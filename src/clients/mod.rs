pub mod quizapi;

pub use quizapi::{QuizApiClient, TagMap};
