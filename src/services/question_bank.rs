//! Hand-authored question catalog used as the local fallback.

use rand::seq::SliceRandom;
use tracing::warn;

use crate::domain::TechnologyId;
use crate::models::{Difficulty, Question};

struct BankEntry {
    technology: &'static str,
    prompt: &'static str,
    options: &'static [&'static str],
    correct: usize,
    difficulty: Difficulty,
    category: &'static str,
}

const fn entry(
    technology: &'static str,
    prompt: &'static str,
    options: &'static [&'static str],
    correct: usize,
    difficulty: Difficulty,
    category: &'static str,
) -> BankEntry {
    BankEntry {
        technology,
        prompt,
        options,
        correct,
        difficulty,
        category,
    }
}

const CATALOG: &[BankEntry] = &[
    entry(
        "react",
        "What is the virtual DOM in React?",
        &[
            "An in-memory representation used to compute minimal DOM updates",
            "A browser API for faster rendering",
            "A CSS framework bundled with React",
            "A server-side template engine",
        ],
        0,
        Difficulty::Beginner,
        "rendering",
    ),
    entry(
        "react",
        "When does a component wrapped in React.memo re-render?",
        &[
            "On every parent render",
            "Only when its props change by shallow comparison",
            "Never after the first render",
            "Only when its state is reset",
        ],
        1,
        Difficulty::Intermediate,
        "performance",
    ),
    entry(
        "react",
        "What does the dependency array of useEffect control?",
        &[
            "The order effects run in",
            "Which props are passed to children",
            "When the effect re-runs",
            "How many times the component mounts",
        ],
        2,
        Difficulty::Beginner,
        "hooks",
    ),
    entry(
        "react",
        "Which hook memoizes a callback between renders?",
        &["useMemo", "useReducer", "useLayoutEffect", "useCallback"],
        3,
        Difficulty::Intermediate,
        "hooks",
    ),
    entry(
        "javascript",
        "What does Promise.allSettled resolve with?",
        &[
            "The first fulfilled value",
            "An array describing every promise's outcome",
            "Only the rejected reasons",
            "A boolean indicating success",
        ],
        1,
        Difficulty::Intermediate,
        "async",
    ),
    entry(
        "javascript",
        "Which operator checks equality without type coercion?",
        &["===", "==", "=", "!="],
        0,
        Difficulty::Beginner,
        "operators",
    ),
    entry(
        "javascript",
        "What is a closure?",
        &[
            "A function that has finished executing",
            "A way to close browser tabs",
            "A function bundled with references to its surrounding scope",
            "A syntax error in nested blocks",
        ],
        2,
        Difficulty::Intermediate,
        "functions",
    ),
    entry(
        "python",
        "What does a list comprehension return?",
        &["A generator", "A new list", "A tuple", "A dictionary view"],
        1,
        Difficulty::Beginner,
        "syntax",
    ),
    entry(
        "python",
        "Which keyword defines a generator function?",
        &["return", "async", "lambda", "yield"],
        3,
        Difficulty::Intermediate,
        "generators",
    ),
    entry(
        "python",
        "What does `with open(path) as f:` guarantee?",
        &[
            "The file is closed when the block exits",
            "The file is read into memory",
            "The file is locked for other processes",
            "The path is created if missing",
        ],
        0,
        Difficulty::Beginner,
        "context managers",
    ),
    entry(
        "java",
        "Which keyword prevents a class from being subclassed?",
        &["static", "final", "private", "sealed"],
        1,
        Difficulty::Beginner,
        "classes",
    ),
    entry(
        "java",
        "What does the `volatile` keyword guarantee?",
        &[
            "Atomic compound updates",
            "Exclusive access by one thread",
            "Visibility of writes across threads",
            "Faster field access",
        ],
        2,
        Difficulty::Advanced,
        "concurrency",
    ),
    entry(
        "java",
        "Which interface must a type implement to be used in a try-with-resources block?",
        &["Closeable only", "Runnable", "Serializable", "AutoCloseable"],
        3,
        Difficulty::Intermediate,
        "exceptions",
    ),
    entry(
        "nodejs",
        "Which module ships with Node.js for working with file paths?",
        &["path", "fs-extra", "glob", "url-join"],
        0,
        Difficulty::Beginner,
        "modules",
    ),
    entry(
        "nodejs",
        "What does `process.nextTick` schedule?",
        &[
            "A callback after the next timer phase",
            "A callback before the event loop continues",
            "A new worker thread",
            "A delayed HTTP request",
        ],
        1,
        Difficulty::Advanced,
        "event loop",
    ),
    entry(
        "typescript",
        "What does the `readonly` modifier do on a property?",
        &[
            "Hides it from serialization",
            "Makes it optional",
            "Prevents reassignment after initialization",
            "Marks it as private",
        ],
        2,
        Difficulty::Beginner,
        "types",
    ),
    entry(
        "typescript",
        "Which utility type makes every property optional?",
        &["Required<T>", "Partial<T>", "Pick<T, K>", "Record<K, T>"],
        1,
        Difficulty::Beginner,
        "utility types",
    ),
];

/// Static, in-memory catalog of curated questions.
#[derive(Debug, Default, Clone, Copy)]
pub struct QuestionBank;

impl QuestionBank {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Up to `count` catalog questions for `technology`, in random order.
    /// Unknown technologies yield nothing.
    #[must_use]
    pub fn questions_for(&self, technology: &TechnologyId, count: usize) -> Vec<Question> {
        let mut questions = self.all_for(technology);
        questions.shuffle(&mut rand::rng());
        questions.truncate(count);
        questions
    }

    /// Every catalog question for `technology`, in catalog order.
    #[must_use]
    pub fn all_for(&self, technology: &TechnologyId) -> Vec<Question> {
        CATALOG
            .iter()
            .enumerate()
            .filter(|(_, e)| e.technology == technology.as_str())
            .filter_map(|(n, e)| {
                Question::new(
                    format!("bank-{}-{n}", e.technology),
                    technology.clone(),
                    e.prompt,
                    e.options.iter().map(|o| (*o).to_string()).collect(),
                    e.correct,
                    e.difficulty,
                    e.category,
                )
                .inspect_err(|err| {
                    warn!(
                        technology = %technology,
                        error = %err,
                        "Skipping invalid bank entry"
                    );
                })
                .ok()
            })
            .collect()
    }

    /// Technologies with at least one curated question, sorted.
    #[must_use]
    pub fn technologies(&self) -> Vec<TechnologyId> {
        let mut techs: Vec<TechnologyId> = CATALOG
            .iter()
            .map(|e| TechnologyId::new(e.technology))
            .collect();
        techs.sort();
        techs.dedup();
        techs
    }
}
