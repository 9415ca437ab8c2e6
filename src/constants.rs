pub mod cache {

    pub const QUESTION_TTL_SECONDS: u64 = 60 * 60;

    pub const PREFETCH_COUNT: usize = 5;
}

pub mod remote {

    pub const QUIZAPI_BASE_URL: &str = "https://quizapi.io/api/v1";

    pub const DEFAULT_CATEGORY: &str = "code";

    /// Largest `limit` the provider accepts per request.
    pub const MAX_LIMIT: usize = 20;

    pub const REQUEST_DELAY_MS: u64 = 1000;

    pub const REQUEST_TIMEOUT_SECONDS: u64 = 30;

    pub const API_KEY_ENV: &str = "QUIZAPI_KEY";
}

pub mod limits {

    pub const DEFAULT_QUESTION_COUNT: usize = 5;

    /// Most placeholder questions generated for one request.
    pub const MAX_SYNTHETIC_QUESTIONS: usize = 50;
}
