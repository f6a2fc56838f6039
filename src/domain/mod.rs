mod chunk;
mod conciseness;
mod document;
mod summary;

pub use chunk::{Chunk, total_char_len};
pub use conciseness::{Conciseness, ConcisenessError};
pub use document::{ContentType, Document};
pub use summary::{PromptStyle, Summary, SummaryStrategy};
