mod health;
mod index;
mod summarize;

pub use health::health_handler;
pub use index::index_handler;
pub use summarize::{
    CONCISENESS_FIELD, ErrorResponse, FILE_FIELD, SummarizeResponse, TEXT_FIELD,
    summarize_handler,
};
