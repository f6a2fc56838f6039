use std::sync::Arc;

use crate::application::ports::{FileLoader, LlmClient, TextSplitter};
use crate::application::services::SummarizationService;
use crate::presentation::config::Settings;

pub struct AppState<F, L, T: ?Sized>
where
    F: FileLoader,
    L: LlmClient,
    T: TextSplitter,
{
    pub summarization_service: Arc<SummarizationService<F, L, T>>,
    pub settings: Arc<Settings>,
}

impl<F, L, T: ?Sized> Clone for AppState<F, L, T>
where
    F: FileLoader,
    L: LlmClient,
    T: TextSplitter,
{
    fn clone(&self) -> Self {
        Self {
            summarization_service: Arc::clone(&self.summarization_service),
            settings: Arc::clone(&self.settings),
        }
    }
}
