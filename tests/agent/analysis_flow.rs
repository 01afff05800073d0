use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use afterword::analysis::ShelfAnalyzer;
use afterword::config::AnalysisConfig;
use afterword::error::AnalysisError;
use afterword::providers::{
    ContentBlock, MessageRole, Provider, ProviderMessage, ProviderResponse, StopReason,
};
use afterword::tools::{ToolInvocation, ToolOutcome, ToolProvider, ToolProviderFactory, ToolSpec};
use anyhow::Result;
use async_trait::async_trait;
use serde_json::json;

struct MockProvider {
    responses: Mutex<VecDeque<ProviderResponse>>,
    seen_messages: Mutex<Vec<Vec<ProviderMessage>>>,
    seen_tools: Mutex<Vec<Vec<String>>>,
}

impl MockProvider {
    fn new(responses: Vec<ProviderResponse>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(VecDeque::from(responses)),
            seen_messages: Mutex::new(Vec::new()),
            seen_tools: Mutex::new(Vec::new()),
        })
    }

    fn seen_messages(&self) -> Vec<Vec<ProviderMessage>> {
        self.seen_messages
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    fn seen_tools(&self) -> Vec<Vec<String>> {
        self.seen_tools
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl Provider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn chat_with_tools(
        &self,
        _system_prompt: Option<&str>,
        messages: &[ProviderMessage],
        tools: &[ToolSpec],
    ) -> Result<ProviderResponse> {
        self.seen_messages
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(messages.to_vec());
        self.seen_tools
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(tools.iter().map(|tool| tool.name.clone()).collect());

        let mut responses = self
            .responses
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        Ok(responses
            .pop_front()
            .unwrap_or_else(|| ProviderResponse::new(vec![], Some(StopReason::EndTurn))))
    }
}

/// Track lookup that knows one album.
struct TrackLookup {
    sessions: AtomicUsize,
    closed: Arc<AtomicUsize>,
}

impl TrackLookup {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            sessions: AtomicUsize::new(0),
            closed: Arc::new(AtomicUsize::new(0)),
        })
    }
}

struct TrackLookupSession {
    closed: Arc<AtomicUsize>,
}

#[async_trait]
impl ToolProvider for TrackLookupSession {
    async fn list_tools(&self) -> Result<Vec<ToolSpec>> {
        Ok(vec![ToolSpec {
            name: "search_spotify".into(),
            description: "Search tracks by artist and album".into(),
            parameters: json!({
                "type": "object",
                "properties": {"query": {"type": "string"}},
                "required": ["query"]
            }),
        }])
    }

    async fn invoke(&self, invocation: &ToolInvocation) -> ToolOutcome {
        let query = invocation.arguments["query"].as_str().unwrap_or_default();
        if query.contains("Pink Moon") {
            ToolOutcome::success(
                invocation.id.clone(),
                r#"[{"name": "Pink Moon", "url": "https://open.spotify.com/track/pinkmoon"}]"#,
            )
        } else {
            ToolOutcome::failure(invocation.id.clone(), "no tracks found")
        }
    }

    async fn close(&self) {
        self.closed.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl ToolProviderFactory for TrackLookup {
    async fn connect(&self) -> Result<Arc<dyn ToolProvider>> {
        self.sessions.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::new(TrackLookupSession {
            closed: Arc::clone(&self.closed),
        }))
    }
}

fn search(id: &str, query: &str) -> ContentBlock {
    ContentBlock::ToolUse {
        id: id.into(),
        name: "search_spotify".into(),
        input: json!({"query": query}),
    }
}

fn analyzer(provider: Arc<MockProvider>, tools: Arc<TrackLookup>) -> ShelfAnalyzer {
    ShelfAnalyzer::new(provider, tools, &AnalysisConfig::default())
}

#[tokio::test]
async fn verified_links_flow_from_tool_results_into_the_profile() {
    let provider = MockProvider::new(vec![
        ProviderResponse::new(
            vec![
                ContentBlock::Text {
                    text: "Checking two albums.".into(),
                },
                search("toolu_a", "Nick Drake Pink Moon"),
                search("toolu_b", "Obscure Demo Tape"),
            ],
            Some(StopReason::ToolUse),
        ),
        ProviderResponse::text_only(
            json!({
                "detected_books": ["The Rings of Saturn"],
                "dominant_themes": ["memory"],
                "reader_archetype": "The Wanderer",
                "tone_profile": ["hushed"],
                "recommendations": {
                    "music": [
                        {"label": "Nick Drake - Pink Moon", "url": "https://open.spotify.com/track/pinkmoon"},
                        {"label": "Someone - Obscure Demo Tape", "url": null}
                    ]
                }
            })
            .to_string(),
        ),
    ]);
    let tools = TrackLookup::new();

    let result = analyzer(Arc::clone(&provider), Arc::clone(&tools))
        .analyze(b"\x89PNG\r\n\x1a\n", "image/png")
        .await
        .unwrap();

    assert_eq!(result.reader_archetype, "The Wanderer");
    assert_eq!(result.recommendations.music.len(), 2);
    assert_eq!(
        result.recommendations.music[0].url.as_deref(),
        Some("https://open.spotify.com/track/pinkmoon")
    );
    assert!(result.recommendations.music[1].url.is_none());
    assert!(result.recommendations.books.is_empty());

    assert_eq!(tools.sessions.load(Ordering::SeqCst), 1);
    assert_eq!(tools.closed.load(Ordering::SeqCst), 1);
    assert_eq!(
        provider.seen_tools(),
        vec![vec!["search_spotify".to_string()]; 2]
    );

    let seen = provider.seen_messages();
    assert_eq!(seen.len(), 2);
    let second_call = &seen[1];
    assert_eq!(second_call.len(), 3);
    assert_eq!(second_call[2].role, MessageRole::User);
    match (&second_call[2].content[0], &second_call[2].content[1]) {
        (
            ContentBlock::ToolResult {
                tool_use_id: first_id,
                is_error: false,
                ..
            },
            ContentBlock::ToolResult {
                tool_use_id: second_id,
                is_error: true,
                content,
            },
        ) => {
            assert_eq!(first_id, "toolu_a");
            assert_eq!(second_id, "toolu_b");
            assert_eq!(content, "Error: no tracks found");
        }
        other => panic!("unexpected tool results: {other:?}"),
    }
}

#[tokio::test]
async fn model_that_never_answers_yields_empty_answer_and_closes_tools() {
    let provider = MockProvider::new(vec![ProviderResponse::new(
        vec![],
        Some(StopReason::EndTurn),
    )]);
    let tools = TrackLookup::new();

    let err = analyzer(provider, Arc::clone(&tools))
        .analyze(b"jpeg", "image/jpeg")
        .await
        .unwrap_err();

    assert!(matches!(err, AnalysisError::EmptyAnswer { rounds: 1 }));
    assert_eq!(tools.closed.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn fenced_answer_with_stray_fields_is_normalized() {
    let provider = MockProvider::new(vec![ProviderResponse::text_only(
        "```json\n{\"detected_books\": [\"Gilead\", 42], \"reader_archetype\": 7, \"extra\": true}\n```",
    )]);

    let result = analyzer(provider, TrackLookup::new())
        .analyze(b"jpeg", "image/jpeg")
        .await
        .unwrap();

    assert_eq!(result.detected_books, vec!["Gilead".to_string()]);
    assert_eq!(result.reader_archetype, "Unknown");
    assert!(result.dominant_themes.is_empty());
}
