mod pdf_adapter;
mod recursive_character_splitter;
mod text_sanitizer;

pub use pdf_adapter::PdfAdapter;
pub use recursive_character_splitter::{DEFAULT_SEPARATORS, RecursiveCharacterSplitter};
pub use text_sanitizer::sanitize_extracted_text;
