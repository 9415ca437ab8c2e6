use crate::domain::TechnologyId;
use crate::services::QuestionBank;

use super::print_question;

pub fn cmd_bank(technology: &str, count: usize) {
    let bank = QuestionBank::new();
    let questions = bank.questions_for(&TechnologyId::new(technology), count);

    if questions.is_empty() {
        println!("No curated questions for '{technology}'");
        let known: Vec<String> = bank.technologies().iter().map(ToString::to_string).collect();
        println!("Available: {}", known.join(", "));
        return;
    }

    for (i, question) in questions.iter().enumerate() {
        print_question(i + 1, question);
    }
}
