use std::sync::Arc;

use synopsis::application::ports::{FileLoaderError, LlmClientError};
use synopsis::application::services::{
    MISSING_INPUT_MESSAGE, SummarizationError, SummarizationOptions, SummarizationService,
    SummaryOutcome, SummaryRequest, UploadedFile,
};
use synopsis::domain::{Conciseness, ContentType, Document, PromptStyle, Summary, SummaryStrategy};

use crate::helpers::{
    FailingLlmClient, FailingLoader, FixedTextLoader, MOCK_SUMMARY, RecordingLlmClient,
    build_service, test_splitter, unbroken_text, word_text,
};

fn text_request(text: String, conciseness: f64) -> SummaryRequest {
    SummaryRequest {
        file: None,
        text: Some(text),
        conciseness: Conciseness::new(conciseness).unwrap(),
    }
}

fn pdf_upload() -> UploadedFile {
    UploadedFile {
        document: Document::new("report.pdf".to_string(), ContentType::Pdf, 4),
        data: b"%PDF".to_vec(),
    }
}

fn expect_summary(outcome: SummaryOutcome) -> Summary {
    match outcome {
        SummaryOutcome::Summarized(summary) => summary,
        SummaryOutcome::MissingInput => panic!("expected a summary, got missing input"),
    }
}

#[tokio::test]
async fn given_no_file_and_no_text_when_summarizing_then_returns_instruction_without_model_call() {
    let loader = Arc::new(FixedTextLoader::new("unused"));
    let llm = Arc::new(RecordingLlmClient::new());
    let service = build_service(Arc::clone(&loader), Arc::clone(&llm));

    let outcome = service.summarize(SummaryRequest::default()).await.unwrap();

    assert_eq!(outcome, SummaryOutcome::MissingInput);
    assert_eq!(outcome.text(), MISSING_INPUT_MESSAGE);
    assert_eq!(
        MISSING_INPUT_MESSAGE,
        "Please upload a PDF file or enter text to summarize."
    );
    assert_eq!(llm.call_count(), 0);
    assert_eq!(loader.call_count(), 0);
}

#[tokio::test]
async fn given_whitespace_only_text_when_summarizing_then_returns_instruction() {
    let llm = Arc::new(RecordingLlmClient::new());
    let service = build_service(Arc::new(FixedTextLoader::new("unused")), Arc::clone(&llm));

    let outcome = service
        .summarize(text_request("  \n\t ".to_string(), 0.5))
        .await
        .unwrap();

    assert_eq!(outcome, SummaryOutcome::MissingInput);
    assert_eq!(llm.call_count(), 0);
}

#[tokio::test]
async fn given_9000_chars_and_default_conciseness_when_summarizing_then_single_pass_detailed() {
    let llm = Arc::new(RecordingLlmClient::new());
    let service = build_service(Arc::new(FixedTextLoader::new("unused")), Arc::clone(&llm));

    let summary = expect_summary(
        service
            .summarize(text_request(unbroken_text(9000), 0.5))
            .await
            .unwrap(),
    );

    assert_eq!(summary.strategy, SummaryStrategy::Stuff);
    assert_eq!(summary.style, PromptStyle::Detailed);
    assert_eq!(summary.text, MOCK_SUMMARY);
    assert_eq!(llm.call_count(), 1);
    assert!(llm.prompts()[0].starts_with("Write a comprehensive summary"));
}

#[tokio::test]
async fn given_15000_chars_and_high_conciseness_when_summarizing_then_single_pass_concise() {
    let llm = Arc::new(RecordingLlmClient::new());
    let service = build_service(Arc::new(FixedTextLoader::new("unused")), Arc::clone(&llm));

    let summary = expect_summary(
        service
            .summarize(text_request(unbroken_text(15_000), 0.9))
            .await
            .unwrap(),
    );

    assert_eq!(summary.strategy, SummaryStrategy::Stuff);
    assert_eq!(summary.style, PromptStyle::Concise);
    assert_eq!(llm.call_count(), 1);
    assert!(llm.prompts()[0].starts_with("Write a highly condensed summary"));
}

#[tokio::test]
async fn given_15000_chars_and_moderate_conciseness_when_summarizing_then_map_reduce_concise() {
    let llm = Arc::new(RecordingLlmClient::new());
    let service = build_service(Arc::new(FixedTextLoader::new("unused")), Arc::clone(&llm));

    let summary = expect_summary(
        service
            .summarize(text_request(unbroken_text(15_000), 0.75))
            .await
            .unwrap(),
    );

    assert_eq!(summary.strategy, SummaryStrategy::MapReduce);
    assert_eq!(summary.style, PromptStyle::Concise);
    assert!(summary.chunk_count > 1);

    let prompts = llm.prompts();
    assert_eq!(prompts.len(), summary.chunk_count + 1);
    for map_prompt in &prompts[..summary.chunk_count] {
        assert!(map_prompt.starts_with("Write a very concise summary"));
    }
    let combine_prompt = prompts.last().unwrap();
    assert!(combine_prompt.starts_with("Write a highly condensed summary"));
    assert!(combine_prompt.contains(&format!("{MOCK_SUMMARY}\n\n{MOCK_SUMMARY}")));
}

#[tokio::test]
async fn given_long_text_when_map_reducing_then_maps_chunks_in_order() {
    let paragraphs: Vec<String> = (0..8)
        .map(|i| format!("SECTION{i} {}", word_text(1990)))
        .collect();
    let text = paragraphs.join("\n\n");
    let llm = Arc::new(RecordingLlmClient::new());
    let service = build_service(Arc::new(FixedTextLoader::new("unused")), Arc::clone(&llm));

    let summary = expect_summary(service.summarize(text_request(text, 0.3)).await.unwrap());

    assert_eq!(summary.strategy, SummaryStrategy::MapReduce);
    assert_eq!(summary.style, PromptStyle::Detailed);

    let map_prompts = &llm.prompts()[..summary.chunk_count];
    let first_sections: Vec<usize> = map_prompts
        .iter()
        .map(|p| {
            let start = p.find("SECTION").unwrap() + "SECTION".len();
            p[start..start + 1].parse().unwrap()
        })
        .collect();
    let mut sorted = first_sections.clone();
    sorted.sort();
    assert_eq!(first_sections, sorted);
    assert_eq!(first_sections.first(), Some(&0));
}

#[tokio::test]
async fn given_file_and_text_when_summarizing_then_file_takes_precedence() {
    let loader = Arc::new(FixedTextLoader::new("Text extracted from the PDF."));
    let llm = Arc::new(RecordingLlmClient::new());
    let service = build_service(Arc::clone(&loader), Arc::clone(&llm));

    let request = SummaryRequest {
        file: Some(pdf_upload()),
        text: Some("Pasted text that should be ignored.".to_string()),
        conciseness: Conciseness::default(),
    };

    service.summarize(request).await.unwrap();

    assert_eq!(loader.call_count(), 1);
    let prompt = &llm.prompts()[0];
    assert!(prompt.contains("Text extracted from the PDF."));
    assert!(!prompt.contains("Pasted text"));
}

#[tokio::test]
async fn given_failing_extractor_when_summarizing_then_propagates_error() {
    let llm = Arc::new(RecordingLlmClient::new());
    let service = build_service(Arc::new(FailingLoader), Arc::clone(&llm));

    let request = SummaryRequest {
        file: Some(pdf_upload()),
        ..SummaryRequest::default()
    };

    let result = service.summarize(request).await;

    assert!(matches!(
        result,
        Err(SummarizationError::FileLoading(
            FileLoaderError::ExtractionFailed(_)
        ))
    ));
    assert_eq!(llm.call_count(), 0);
}

#[tokio::test]
async fn given_failing_model_when_summarizing_then_propagates_error() {
    let service = build_service(
        Arc::new(FixedTextLoader::new("unused")),
        Arc::new(FailingLlmClient),
    );

    let result = service
        .summarize(text_request("A short paragraph.".to_string(), 0.5))
        .await;

    assert!(matches!(
        result,
        Err(SummarizationError::Completion(
            LlmClientError::ApiRequestFailed(_)
        ))
    ));
}

#[tokio::test]
async fn given_extracted_text_without_content_when_summarizing_then_reports_empty_content() {
    let service = build_service(
        Arc::new(FixedTextLoader::new("   \n  ")),
        Arc::new(RecordingLlmClient::new()),
    );

    let request = SummaryRequest {
        file: Some(pdf_upload()),
        ..SummaryRequest::default()
    };

    let result = service.summarize(request).await;

    assert!(matches!(result, Err(SummarizationError::EmptyContent)));
}

#[tokio::test]
async fn given_partial_summaries_over_budget_when_map_reducing_then_collapses_before_combining() {
    let llm = Arc::new(RecordingLlmClient::with_reply("x".repeat(300)));
    let options = SummarizationOptions {
        stuff_threshold_chars: 10_000,
        combine_budget_chars: 700,
        max_collapse_rounds: 5,
    };
    let service = SummarizationService::new(
        Arc::new(FixedTextLoader::new("unused")),
        Arc::clone(&llm),
        test_splitter(),
        options,
    );

    let summary = expect_summary(
        service
            .summarize(text_request(unbroken_text(15_000), 0.5))
            .await
            .unwrap(),
    );

    assert_eq!(summary.strategy, SummaryStrategy::MapReduce);
    assert!(llm.call_count() > summary.chunk_count + 1);
    let combine_prompt = llm.prompts().last().unwrap().clone();
    assert!(combine_prompt.starts_with("Write a comprehensive summary"));
    assert!(combine_prompt.chars().count() < 1000);
}

#[tokio::test]
async fn given_collapse_round_limit_when_summaries_never_shrink_then_still_combines() {
    let llm = Arc::new(RecordingLlmClient::with_reply("y".repeat(5000)));
    let options = SummarizationOptions {
        stuff_threshold_chars: 10_000,
        combine_budget_chars: 100,
        max_collapse_rounds: 2,
    };
    let service = SummarizationService::new(
        Arc::new(FixedTextLoader::new("unused")),
        Arc::clone(&llm),
        test_splitter(),
        options,
    );

    let summary = expect_summary(
        service
            .summarize(text_request(unbroken_text(15_000), 0.5))
            .await
            .unwrap(),
    );

    let chunks = summary.chunk_count;
    assert_eq!(llm.call_count(), chunks + chunks + chunks + 1);
}

#[tokio::test]
async fn given_text_with_leading_blank_lines_when_summarizing_then_succeeds() {
    let llm = Arc::new(RecordingLlmClient::new());
    let service = build_service(Arc::new(FixedTextLoader::new("unused")), Arc::clone(&llm));
    let text = format!("\n\n\n\nIntro\n\n{}", "word ".repeat(798));

    let outcome = service.summarize(text_request(text, 0.5)).await.unwrap();

    let summary = expect_summary(outcome);
    assert_eq!(summary.chunk_count, 2);
    assert_eq!(summary.strategy, SummaryStrategy::Stuff);
    assert_eq!(llm.call_count(), 1);
    assert!(llm.prompts()[0].contains("\"Intro\n\nIntro\n\nword"));
}
