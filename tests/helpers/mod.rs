#![allow(dead_code)]

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use synopsis::application::ports::{FileLoader, FileLoaderError, LlmClient, LlmClientError};
use synopsis::application::services::{SummarizationOptions, SummarizationService};
use synopsis::domain::Document;
use synopsis::infrastructure::text_processing::RecursiveCharacterSplitter;

pub const TEST_CHUNK_SIZE: usize = 4000;
pub const TEST_CHUNK_OVERLAP: usize = 400;
pub const MOCK_SUMMARY: &str = "Mock summary";

/// Records every prompt it receives and answers with a fixed reply.
pub struct RecordingLlmClient {
    prompts: Mutex<Vec<String>>,
    reply: String,
}

impl RecordingLlmClient {
    pub fn new() -> Self {
        Self::with_reply(MOCK_SUMMARY)
    }

    pub fn with_reply(reply: impl Into<String>) -> Self {
        Self {
            prompts: Mutex::new(Vec::new()),
            reply: reply.into(),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl LlmClient for RecordingLlmClient {
    async fn complete(&self, prompt: &str) -> Result<String, LlmClientError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(self.reply.clone())
    }
}

pub struct FailingLlmClient;

#[async_trait::async_trait]
impl LlmClient for FailingLlmClient {
    async fn complete(&self, _prompt: &str) -> Result<String, LlmClientError> {
        Err(LlmClientError::ApiRequestFailed(
            "HTTP 503: upstream unavailable".to_string(),
        ))
    }
}

/// Returns the same text for any document and counts how often it was asked.
pub struct FixedTextLoader {
    text: String,
    calls: AtomicUsize,
}

impl FixedTextLoader {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl FileLoader for FixedTextLoader {
    async fn extract_text(&self, _data: &[u8], _doc: &Document) -> Result<String, FileLoaderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.text.clone())
    }
}

pub struct FailingLoader;

#[async_trait::async_trait]
impl FileLoader for FailingLoader {
    async fn extract_text(&self, _data: &[u8], _doc: &Document) -> Result<String, FileLoaderError> {
        Err(FileLoaderError::ExtractionFailed(
            "failed to parse PDF: bad xref".to_string(),
        ))
    }
}

pub fn test_splitter() -> Arc<RecursiveCharacterSplitter> {
    Arc::new(RecursiveCharacterSplitter::new(TEST_CHUNK_SIZE, TEST_CHUNK_OVERLAP).unwrap())
}

pub fn build_service<F, L>(
    loader: Arc<F>,
    llm: Arc<L>,
) -> SummarizationService<F, L, RecursiveCharacterSplitter>
where
    F: FileLoader,
    L: LlmClient,
{
    SummarizationService::new(loader, llm, test_splitter(), SummarizationOptions::default())
}

/// Text of exactly `len` characters with no separators, so chunk boundaries
/// fall on hard character cuts.
pub fn unbroken_text(len: usize) -> String {
    "abcdefghij".chars().cycle().take(len).collect()
}

/// Prose-like text of roughly `len` characters made of short words.
pub fn word_text(len: usize) -> String {
    let mut text = String::with_capacity(len + 16);
    let mut i = 0;
    while text.len() < len {
        text.push_str(&format!("word{} ", i % 97));
        i += 1;
    }
    text.truncate(len);
    text
}

/// Builds a single-font PDF with one page per entry. An empty entry yields a
/// page with an empty content stream.
pub fn minimal_pdf(pages: &[&str]) -> Vec<u8> {
    let page_count = pages.len();
    let font_id = 3;
    let first_page_id = 4;
    let kids: Vec<String> = (0..page_count)
        .map(|i| format!("{} 0 R", first_page_id + i * 2))
        .collect();

    let mut objects = vec![
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        format!(
            "<< /Type /Pages /Kids [{}] /Count {} >>",
            kids.join(" "),
            page_count
        ),
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
            .to_string(),
    ];

    for (i, text) in pages.iter().enumerate() {
        let content_id = first_page_id + i * 2 + 1;
        objects.push(format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
             /Resources << /Font << /F1 {font_id} 0 R >> >> /Contents {content_id} 0 R >>"
        ));
        let stream = if text.is_empty() {
            String::new()
        } else {
            format!("BT /F1 12 Tf 72 720 Td ({text}) Tj ET")
        };
        objects.push(format!(
            "<< /Length {} >>\nstream\n{}\nendstream",
            stream.len(),
            stream
        ));
    }

    let mut pdf = b"%PDF-1.4\n".to_vec();
    let mut offsets = Vec::with_capacity(objects.len());
    for (i, body) in objects.iter().enumerate() {
        offsets.push(pdf.len());
        pdf.extend_from_slice(format!("{} 0 obj\n{}\nendobj\n", i + 1, body).as_bytes());
    }

    let xref_offset = pdf.len();
    pdf.extend_from_slice(format!("xref\n0 {}\n", objects.len() + 1).as_bytes());
    pdf.extend_from_slice(b"0000000000 65535 f \n");
    for offset in offsets {
        pdf.extend_from_slice(format!("{offset:010} 00000 n \n").as_bytes());
    }
    pdf.extend_from_slice(
        format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
            objects.len() + 1,
            xref_offset
        )
        .as_bytes(),
    );
    pdf
}
