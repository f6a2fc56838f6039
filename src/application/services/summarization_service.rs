use std::sync::Arc;

use crate::application::ports::{
    FileLoader, FileLoaderError, LlmClient, LlmClientError, TextSplitter, TextSplitterError,
};
use crate::application::services::PromptBuilder;
use crate::domain::{Chunk, Conciseness, Document, Summary, SummaryStrategy, total_char_len};

pub const MISSING_INPUT_MESSAGE: &str = "Please upload a PDF file or enter text to summarize.";

const DOCUMENT_SEPARATOR: &str = "\n\n";

#[derive(Debug, Clone)]
pub struct SummarizationOptions {
    /// Inputs shorter than this many characters are always summarized in one pass.
    pub stuff_threshold_chars: usize,
    /// Upper bound on the joined partial summaries handed to the final combine call.
    pub combine_budget_chars: usize,
    pub max_collapse_rounds: usize,
}

impl Default for SummarizationOptions {
    fn default() -> Self {
        Self {
            stuff_threshold_chars: 10_000,
            combine_budget_chars: 12_000,
            max_collapse_rounds: 5,
        }
    }
}

#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub document: Document,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, Default)]
pub struct SummaryRequest {
    pub file: Option<UploadedFile>,
    pub text: Option<String>,
    pub conciseness: Conciseness,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SummaryOutcome {
    Summarized(Summary),
    /// Neither a file nor any text was submitted; no model call was made.
    MissingInput,
}

impl SummaryOutcome {
    pub fn text(&self) -> &str {
        match self {
            Self::Summarized(summary) => &summary.text,
            Self::MissingInput => MISSING_INPUT_MESSAGE,
        }
    }
}

pub struct SummarizationService<F, L, T: ?Sized>
where
    F: FileLoader,
    L: LlmClient,
    T: TextSplitter,
{
    file_loader: Arc<F>,
    llm_client: Arc<L>,
    text_splitter: Arc<T>,
    options: SummarizationOptions,
}

impl<F, L, T: ?Sized> SummarizationService<F, L, T>
where
    F: FileLoader,
    L: LlmClient,
    T: TextSplitter,
{
    pub fn new(
        file_loader: Arc<F>,
        llm_client: Arc<L>,
        text_splitter: Arc<T>,
        options: SummarizationOptions,
    ) -> Self {
        Self {
            file_loader,
            llm_client,
            text_splitter,
            options,
        }
    }

    #[tracing::instrument(
        skip(self, request),
        fields(
            conciseness = %request.conciseness,
            has_file = request.file.is_some(),
        )
    )]
    pub async fn summarize(
        &self,
        request: SummaryRequest,
    ) -> Result<SummaryOutcome, SummarizationError> {
        let Some(text) = self.resolve_text(request.file, request.text).await? else {
            tracing::info!("No input supplied, skipping summarization");
            return Ok(SummaryOutcome::MissingInput);
        };

        let chunks = self.text_splitter.split(&text).await?;
        if chunks.is_empty() {
            return Err(SummarizationError::EmptyContent);
        }

        let total_chars = total_char_len(&chunks);
        let strategy = SummaryStrategy::select(
            total_chars,
            request.conciseness,
            self.options.stuff_threshold_chars,
        );
        let prompts = PromptBuilder::new(request.conciseness.prompt_style());

        tracing::info!(
            chunk_count = chunks.len(),
            total_chars,
            strategy = strategy.as_str(),
            style = prompts.style().as_str(),
            "Summarization strategy selected"
        );

        let text = match strategy {
            SummaryStrategy::Stuff => self.stuff(&chunks, &prompts).await?,
            SummaryStrategy::MapReduce => self.map_reduce(&chunks, &prompts).await?,
        };

        Ok(SummaryOutcome::Summarized(Summary {
            text,
            strategy,
            style: prompts.style(),
            chunk_count: chunks.len(),
        }))
    }

    /// An uploaded file takes precedence over pasted text.
    async fn resolve_text(
        &self,
        file: Option<UploadedFile>,
        text: Option<String>,
    ) -> Result<Option<String>, SummarizationError> {
        if let Some(file) = file {
            let extracted = self
                .file_loader
                .extract_text(&file.data, &file.document)
                .await?;
            tracing::debug!(
                filename = %file.document.filename,
                chars = extracted.chars().count(),
                "Extracted document text"
            );
            return Ok(Some(extracted));
        }

        Ok(text.filter(|t| !t.trim().is_empty()).inspect(|t| {
            tracing::debug!(chars = t.chars().count(), "Using pasted text");
        }))
    }

    async fn stuff(
        &self,
        chunks: &[Chunk],
        prompts: &PromptBuilder,
    ) -> Result<String, SummarizationError> {
        let joined = join_texts(chunks.iter().map(|c| c.text.as_str()));
        self.complete(&prompts.combine_prompt(&joined)).await
    }

    async fn map_reduce(
        &self,
        chunks: &[Chunk],
        prompts: &PromptBuilder,
    ) -> Result<String, SummarizationError> {
        let mut partials = Vec::with_capacity(chunks.len());
        for (index, chunk) in chunks.iter().enumerate() {
            tracing::debug!(index, offset = chunk.offset, "Summarizing chunk");
            partials.push(self.complete(&prompts.map_prompt(&chunk.text)).await?);
        }

        let mut rounds = 0;
        while partials.len() > 1
            && joined_char_len(&partials) > self.options.combine_budget_chars
            && rounds < self.options.max_collapse_rounds
        {
            partials = self.collapse(&partials, prompts).await?;
            rounds += 1;
        }

        if rounds > 0 {
            tracing::debug!(rounds, remaining = partials.len(), "Collapsed partial summaries");
        }

        let joined = join_texts(partials.iter().map(String::as_str));
        self.complete(&prompts.combine_prompt(&joined)).await
    }

    /// Combines partial summaries batch by batch so each batch fits the combine budget.
    async fn collapse(
        &self,
        partials: &[String],
        prompts: &PromptBuilder,
    ) -> Result<Vec<String>, SummarizationError> {
        let batches = batch_by_budget(partials, self.options.combine_budget_chars);
        let mut collapsed = Vec::with_capacity(batches.len());
        for batch in batches {
            let joined = join_texts(batch.iter().map(String::as_str));
            collapsed.push(self.complete(&prompts.combine_prompt(&joined)).await?);
        }
        Ok(collapsed)
    }

    async fn complete(&self, prompt: &str) -> Result<String, SummarizationError> {
        tracing::debug!(prompt_chars = prompt.chars().count(), "Sending prompt");
        Ok(self.llm_client.complete(prompt).await?)
    }
}

fn join_texts<'a>(texts: impl Iterator<Item = &'a str>) -> String {
    texts.collect::<Vec<_>>().join(DOCUMENT_SEPARATOR)
}

fn joined_char_len(texts: &[String]) -> usize {
    let separators = texts.len().saturating_sub(1) * DOCUMENT_SEPARATOR.len();
    texts.iter().map(|t| t.chars().count()).sum::<usize>() + separators
}

fn batch_by_budget(texts: &[String], budget: usize) -> Vec<&[String]> {
    let mut batches = Vec::new();
    let mut start = 0;
    let mut current = 0;

    for (index, text) in texts.iter().enumerate() {
        let len = text.chars().count();
        let added = if index > start {
            len + DOCUMENT_SEPARATOR.len()
        } else {
            len
        };

        if index > start && current + added > budget {
            batches.push(&texts[start..index]);
            start = index;
            current = len;
        } else {
            current += added;
        }
    }

    if start < texts.len() {
        batches.push(&texts[start..]);
    }

    batches
}

#[derive(Debug, thiserror::Error)]
pub enum SummarizationError {
    #[error("file loading: {0}")]
    FileLoading(#[from] FileLoaderError),
    #[error("text splitting: {0}")]
    Splitting(#[from] TextSplitterError),
    #[error("completion: {0}")]
    Completion(#[from] LlmClientError),
    #[error("input contained no summarizable text")]
    EmptyContent,
}
