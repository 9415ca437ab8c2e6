pub mod cache;
pub use cache::{CacheEntry, CacheEntryInfo, Clock, ManualClock, QuestionCache, SystemClock};

pub mod pipeline;
pub use pipeline::{PipelineError, QuestionBatch, QuestionPipeline};

pub mod question_bank;
pub use question_bank::QuestionBank;

pub mod scheduler;
pub use scheduler::EvictionScheduler;

pub mod source;
pub use source::{RemoteQuestionSource, SourceError};

pub mod synthetic;
pub use synthetic::SyntheticGenerator;
