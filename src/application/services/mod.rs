mod prompt_builder;
mod summarization_service;

pub use prompt_builder::PromptBuilder;
pub use summarization_service::{
    MISSING_INPUT_MESSAGE, SummarizationError, SummarizationOptions, SummarizationService,
    SummaryOutcome, SummaryRequest, UploadedFile,
};
