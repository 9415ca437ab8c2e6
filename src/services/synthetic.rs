//! Placeholder questions for when no real source answers.
//!
//! Known technologies get a handful of hand-written templates; everything
//! else (and any shortfall) is filled from generic templates that name the
//! technology in the prompt.

use crate::constants;
use crate::domain::TechnologyId;
use crate::models::{Difficulty, Question, QuestionError};

struct Template {
    prompt: &'static str,
    correct: &'static str,
    distractors: [&'static str; 3],
    difficulty: Difficulty,
    category: &'static str,
}

const fn template(
    prompt: &'static str,
    correct: &'static str,
    distractors: [&'static str; 3],
    difficulty: Difficulty,
    category: &'static str,
) -> Template {
    Template {
        prompt,
        correct,
        distractors,
        difficulty,
        category,
    }
}

const REACT: &[Template] = &[
    template(
        "Which hook runs side effects after a React component renders?",
        "useEffect",
        ["useMemo", "useRef", "useId"],
        Difficulty::Beginner,
        "hooks",
    ),
    template(
        "What must every element in a rendered React list have?",
        "A stable key prop",
        ["An id attribute", "A ref", "A className"],
        Difficulty::Beginner,
        "rendering",
    ),
];

const JAVASCRIPT: &[Template] = &[
    template(
        "What does `typeof null` evaluate to in JavaScript?",
        "\"object\"",
        ["\"null\"", "\"undefined\"", "\"number\""],
        Difficulty::Intermediate,
        "types",
    ),
    template(
        "Which JavaScript keyword declares a block-scoped constant?",
        "const",
        ["var", "static", "final"],
        Difficulty::Beginner,
        "syntax",
    ),
];

const TYPESCRIPT: &[Template] = &[template(
    "Which TypeScript type accepts any value but forces narrowing before use?",
    "unknown",
    ["any", "never", "object"],
    Difficulty::Intermediate,
    "types",
)];

const PYTHON: &[Template] = &[
    template(
        "Which Python structure is immutable?",
        "tuple",
        ["list", "dict", "set"],
        Difficulty::Beginner,
        "data structures",
    ),
    template(
        "What does the GIL limit in CPython?",
        "Parallel execution of Python bytecode across threads",
        [
            "The number of processes",
            "Memory usage per object",
            "Network socket count",
        ],
        Difficulty::Advanced,
        "concurrency",
    ),
];

const JAVA: &[Template] = &[
    template(
        "Which Java collection keeps keys in sorted order?",
        "TreeMap",
        ["HashMap", "LinkedList", "ArrayDeque"],
        Difficulty::Intermediate,
        "collections",
    ),
    template(
        "What reclaims unreachable objects in the JVM?",
        "The garbage collector",
        ["The class loader", "The JIT compiler", "The bytecode verifier"],
        Difficulty::Beginner,
        "memory",
    ),
];

const NODEJS: &[Template] = &[template(
    "What lets Node.js handle many connections on a single thread?",
    "The event loop with non-blocking I/O",
    [
        "One OS thread per request",
        "Synchronous file APIs",
        "A global interpreter lock",
    ],
    Difficulty::Intermediate,
    "runtime",
)];

const RUST: &[Template] = &[template(
    "What does the Rust borrow checker prevent?",
    "Data races and dangling references at compile time",
    [
        "All runtime panics",
        "Integer overflow in release builds",
        "Slow compile times",
    ],
    Difficulty::Intermediate,
    "ownership",
)];

const SQL: &[Template] = &[template(
    "Which SQL clause filters rows after aggregation?",
    "HAVING",
    ["WHERE", "ORDER BY", "LIMIT"],
    Difficulty::Intermediate,
    "queries",
)];

const DOCKER: &[Template] = &[template(
    "Which Dockerfile instruction sets the default command for a container?",
    "CMD",
    ["RUN", "COPY", "WORKDIR"],
    Difficulty::Beginner,
    "images",
)];

fn catalog(technology: &TechnologyId) -> &'static [Template] {
    match technology.as_str() {
        "react" | "reactjs" => REACT,
        "javascript" | "js" => JAVASCRIPT,
        "typescript" | "ts" => TYPESCRIPT,
        "python" => PYTHON,
        "java" => JAVA,
        "nodejs" | "node" | "expressjs" | "express" => NODEJS,
        "rust" => RUST,
        "sql" | "mysql" | "postgresql" | "postgres" => SQL,
        "docker" => DOCKER,
        _ => &[],
    }
}

/// Generic prompts; `{}` is replaced by the technology key.
const GENERIC: &[(&str, &str, [&str; 3])] = &[
    (
        "What is a key concept in {}?",
        "Understanding its core abstractions and how they compose",
        [
            "Memorising every configuration flag",
            "Avoiding its official documentation",
            "Rewriting it from scratch for each project",
        ],
    ),
    (
        "Which practice is recommended when working with {}?",
        "Following the community conventions and documented best practices",
        [
            "Disabling all error reporting",
            "Copying code without reading it",
            "Skipping tests to ship faster",
        ],
    ),
    (
        "What is the best first step when debugging a problem in {}?",
        "Reproduce the issue and read the error output carefully",
        [
            "Reinstall the operating system",
            "Delete the project history",
            "Ignore the logs entirely",
        ],
    ),
    (
        "Where is the most reliable reference for how {} behaves?",
        "The official documentation and release notes",
        [
            "An unrelated forum signature",
            "A random code snippet without context",
            "The oldest tutorial you can find",
        ],
    ),
];

/// Places `correct` at `slot` among the distractors.
fn arrange(correct: &str, distractors: &[&str], slot: usize) -> (Vec<String>, usize) {
    let mut options: Vec<String> = distractors.iter().map(|d| (*d).to_string()).collect();
    let index = slot % (options.len() + 1);
    options.insert(index, correct.to_string());
    (options, index)
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SyntheticGenerator;

impl SyntheticGenerator {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Produces `count` questions for `technology`, capped at
    /// [`MAX_SYNTHETIC_QUESTIONS`](constants::limits::MAX_SYNTHETIC_QUESTIONS).
    ///
    /// Only fails if a template is itself broken, which is a bug here rather
    /// than a runtime condition.
    pub fn generate(
        &self,
        technology: &TechnologyId,
        count: usize,
    ) -> Result<Vec<Question>, QuestionError> {
        let templates = catalog(technology);
        let count = count.min(constants::limits::MAX_SYNTHETIC_QUESTIONS);
        let mut questions = Vec::with_capacity(count);

        for n in 0..count {
            let id = format!("synthetic-{technology}-{}", n + 1);

            let question = if let Some(t) = templates.get(n) {
                let (options, correct) = arrange(t.correct, &t.distractors, n);
                Question::new(
                    id,
                    technology.clone(),
                    t.prompt,
                    options,
                    correct,
                    t.difficulty,
                    t.category,
                )?
            } else {
                let generic_index = n - templates.len();
                let (prompt, correct, distractors) = GENERIC[generic_index % GENERIC.len()];
                let mut prompt = prompt.replace("{}", technology.as_str());
                let round = generic_index / GENERIC.len();
                if round > 0 {
                    prompt = format!("{prompt} (variant {})", round + 1);
                }
                let (options, correct) = arrange(correct, &distractors, n);
                Question::new(
                    id,
                    technology.clone(),
                    prompt,
                    options,
                    correct,
                    Difficulty::Beginner,
                    "general",
                )?
            };

            questions.push(question);
        }

        Ok(questions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn generates_exact_count_for_unknown_technology() {
        let tech = TechnologyId::new("unknown-tech-xyz");
        let questions = SyntheticGenerator::new().generate(&tech, 3).unwrap();

        assert_eq!(questions.len(), 3);
        for q in &questions {
            assert!(q.prompt().contains("unknown-tech-xyz"));
            assert!(q.options().len() >= 2);
            assert!(q.correct_option_index() < q.options().len());
        }
    }

    #[test]
    fn known_technology_uses_catalog_first() {
        let tech = TechnologyId::new("React");
        let questions = SyntheticGenerator::new().generate(&tech, 4).unwrap();

        assert_eq!(questions.len(), 4);
        assert!(questions[0].prompt().contains("hook"));
        assert_eq!(questions[0].correct_option(), "useEffect");
        assert!(questions[2].prompt().contains("react"));
    }

    #[test]
    fn ids_are_unique_and_prompts_distinct() {
        let tech = TechnologyId::new("elixir");
        let questions = SyntheticGenerator::new().generate(&tech, 10).unwrap();

        let ids: HashSet<_> = questions.iter().map(Question::id).collect();
        let prompts: HashSet<_> = questions.iter().map(Question::prompt).collect();
        assert_eq!(ids.len(), 10);
        assert_eq!(prompts.len(), 10);
    }

    #[test]
    fn correct_answer_position_rotates() {
        let tech = TechnologyId::new("go");
        let questions = SyntheticGenerator::new().generate(&tech, 4).unwrap();
        let positions: HashSet<_> = questions.iter().map(Question::correct_option_index).collect();
        assert!(positions.len() > 1);
    }

    #[test]
    fn huge_count_is_capped() {
        let questions = SyntheticGenerator::new()
            .generate(&TechnologyId::new("unknown-tech-xyz"), usize::MAX)
            .unwrap();
        assert_eq!(questions.len(), constants::limits::MAX_SYNTHETIC_QUESTIONS);
    }

    #[test]
    fn zero_count_is_empty() {
        let questions = SyntheticGenerator::new()
            .generate(&TechnologyId::new("python"), 0)
            .unwrap();
        assert!(questions.is_empty());
    }
}
