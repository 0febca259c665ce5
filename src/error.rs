#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("statement {index} in category '{category}' is invalid: {reason}")]
    InvalidInput {
        category: String,
        index: usize,
        reason: String,
    },

    #[error("similarity threshold must be a finite value in [0, 1], got {0}")]
    InvalidThreshold(f64),

    #[error("similarity between nodes {first} and {second} is not finite")]
    NonFiniteSimilarity { first: usize, second: usize },

    #[error("invalid layout for bucket '{category}': {reason}")]
    InvalidLayout { category: String, reason: String },

    #[error("unknown evaluation type: {0}")]
    UnknownEvaluationType(String),
}

pub type Result<T> = std::result::Result<T, GraphError>;
