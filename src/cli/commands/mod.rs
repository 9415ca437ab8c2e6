mod bank;
mod daemon;
mod preload;
mod questions;

pub use bank::cmd_bank;
pub use daemon::cmd_daemon;
pub use preload::cmd_preload;
pub use questions::cmd_questions;

use crate::models::Question;

fn print_question(number: usize, question: &Question) {
    println!(
        "{number}. {} [{} | {}]",
        question.prompt(),
        question.difficulty(),
        question.category()
    );
    for (i, option) in question.options().iter().enumerate() {
        let marker = if question.is_correct(i) { '*' } else { ' ' };
        let letter = char::from(b'a' + u8::try_from(i % 26).unwrap_or(0));
        println!("   {marker} {letter}) {option}");
    }
}
