//! Dispatcher behaviour against mock adapters

use async_trait::async_trait;
use llm_wars::config::Config;
use llm_wars::providers::{AdapterRegistry, Completion, OpenAIAdapter, Outcome, ProviderAdapter};
use llm_wars::{AppError, Dispatcher, FailureKind, ProviderCatalog, Selection};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

struct MockAdapter {
    provider: &'static str,
    reply: Outcome,
    latency: Duration,
    calls: Arc<AtomicUsize>,
}

impl MockAdapter {
    fn answering(provider: &'static str, text: &str, tokens_in: u32, tokens_out: u32) -> Self {
        Self {
            provider,
            reply: Outcome::Success(Completion::new(text, tokens_in, tokens_out)),
            latency: Duration::ZERO,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn after(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    fn counting(mut self, calls: &Arc<AtomicUsize>) -> Self {
        self.calls = Arc::clone(calls);
        self
    }
}

#[async_trait]
impl ProviderAdapter for MockAdapter {
    fn provider(&self) -> &str {
        self.provider
    }

    async fn answer(&self, _model: &str, _prompt: &str) -> Outcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.latency).await;
        self.reply.clone()
    }
}

struct PanickingAdapter;

#[async_trait]
impl ProviderAdapter for PanickingAdapter {
    fn provider(&self) -> &str {
        "google"
    }

    async fn answer(&self, _model: &str, _prompt: &str) -> Outcome {
        panic!("adapter blew up");
    }
}

fn dispatcher(registry: AdapterRegistry) -> Dispatcher {
    Dispatcher::new(Arc::new(ProviderCatalog::builtin()), registry)
}

fn all_selections() -> Vec<Selection> {
    vec![
        Selection::new("openai", "gpt-4o"),
        Selection::new("anthropic", "claude-3-haiku-20240307"),
        Selection::new("google", "gemini-1.5-pro"),
        Selection::new("codegpt", "codegpt-latest"),
    ]
}

#[tokio::test]
async fn test_two_providers_end_to_end() {
    let registry = AdapterRegistry::new()
        .with(MockAdapter::answering("openai", "4", 3, 1).after(Duration::from_millis(100)))
        .with(MockAdapter::answering("anthropic", "It's 4.", 4, 3).after(Duration::from_millis(200)));

    let selections = vec![
        Selection::new("openai", "gpt-4o"),
        Selection::new("anthropic", "claude-3-haiku-20240307"),
    ];

    let results = dispatcher(registry).dispatch(&selections, "2+2?").await.unwrap();

    assert_eq!(results.len(), 2);

    assert_eq!(results[0].provider, "openai");
    assert_eq!(results[0].model, "gpt-4o");
    assert_eq!(results[0].text, "4");
    assert_eq!((results[0].tokens_in, results[0].tokens_out), (3, 1));
    assert!(results[0].elapsed_time >= 0.1);

    assert_eq!(results[1].provider, "anthropic");
    assert_eq!(results[1].model, "claude-3-haiku-20240307");
    assert_eq!(results[1].text, "It's 4.");
    assert_eq!((results[1].tokens_in, results[1].tokens_out), (4, 3));
    assert!(results[1].elapsed_time >= 0.2);

    assert!(results.iter().all(|r| !r.is_error()));
}

#[tokio::test]
async fn test_results_follow_input_order_not_completion_order() {
    let registry = AdapterRegistry::new()
        .with(MockAdapter::answering("openai", "slow", 1, 1).after(Duration::from_millis(300)))
        .with(MockAdapter::answering("anthropic", "fast", 1, 1).after(Duration::from_millis(10)));

    let selections = vec![
        Selection::new("openai", "gpt-4-turbo"),
        Selection::new("anthropic", "claude-3-opus-20240229"),
    ];

    let results = dispatcher(registry).dispatch(&selections, "race").await.unwrap();

    assert_eq!(results[0].text, "slow");
    assert_eq!(results[1].text, "fast");
    assert!(results[0].elapsed_time > results[1].elapsed_time);
}

#[tokio::test]
async fn test_calls_run_concurrently() {
    let latency = Duration::from_millis(300);
    let registry = AdapterRegistry::new()
        .with(MockAdapter::answering("openai", "a", 1, 1).after(latency))
        .with(MockAdapter::answering("anthropic", "b", 1, 1).after(latency))
        .with(MockAdapter::answering("google", "c", 1, 1).after(latency))
        .with(MockAdapter::answering("codegpt", "d", 1, 1).after(latency));

    let started = Instant::now();
    let results = dispatcher(registry)
        .dispatch(&all_selections(), "parallel")
        .await
        .unwrap();
    let total = started.elapsed();

    assert_eq!(results.len(), 4);
    assert!(results.iter().all(|r| r.elapsed_time >= 0.3));
    // Sequential calls would take at least 1.2s
    assert!(total < Duration::from_millis(900), "took {:?}", total);
}

#[tokio::test]
async fn test_result_count_matches_selection_count() {
    let registry = AdapterRegistry::new()
        .with(MockAdapter::answering("openai", "a", 1, 1))
        .with(MockAdapter::answering("anthropic", "b", 1, 1))
        .with(MockAdapter::answering("google", "c", 1, 1))
        .with(MockAdapter::answering("codegpt", "d", 1, 1));
    let dispatcher = dispatcher(registry);
    let selections = all_selections();

    for n in 1..=selections.len() {
        let results = dispatcher.dispatch(&selections[..n], "count").await.unwrap();
        assert_eq!(results.len(), n);
        for (selection, result) in selections[..n].iter().zip(&results) {
            assert_eq!(result.provider, selection.provider);
            assert_eq!(result.model, selection.model);
            assert!(result.elapsed_time >= 0.0);
        }
    }
}

#[tokio::test]
async fn test_duplicate_provider_selections_are_allowed() {
    let calls = Arc::new(AtomicUsize::new(0));
    let registry = AdapterRegistry::new()
        .with(MockAdapter::answering("openai", "same", 2, 2).counting(&calls));
    let selections = vec![
        Selection::new("openai", "gpt-4o"),
        Selection::new("openai", "gpt-3.5-turbo"),
        Selection::new("openai", "gpt-4o"),
    ];

    let results = dispatcher(registry).dispatch(&selections, "twice").await.unwrap();

    assert_eq!(results.len(), 3);
    assert_eq!(results[1].model, "gpt-3.5-turbo");
    assert_eq!(results[2].model, "gpt-4o");
    assert!(results.iter().all(|result| result.text == "same"));
    // One independent call per entry, duplicates included
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_missing_credential_is_isolated() {
    // No credentials configured at all
    let config = Config::default();
    let registry = AdapterRegistry::new()
        .with(OpenAIAdapter::new(reqwest::Client::new(), &config))
        .with(MockAdapter::answering("anthropic", "It's 4.", 4, 3));

    let selections = vec![
        Selection::new("openai", "gpt-4o"),
        Selection::new("anthropic", "claude-3-haiku-20240307"),
    ];

    let results = dispatcher(registry).dispatch(&selections, "2+2?").await.unwrap();

    assert!(results[0].text.starts_with("Error:"));
    assert!(results[0].text.contains("OPENAI_API_KEY"));
    assert_eq!((results[0].tokens_in, results[0].tokens_out), (0, 0));
    assert_eq!(results[0].failure, Some(FailureKind::MissingCredential));
    assert!(results[0].elapsed_time >= 0.0);

    assert_eq!(results[1].text, "It's 4.");
    assert_eq!((results[1].tokens_in, results[1].tokens_out), (4, 3));
    assert_eq!(results[1].failure, None);
}

#[tokio::test]
async fn test_adapter_failure_becomes_error_text() {
    let failing = MockAdapter {
        provider: "google",
        reply: Outcome::failure(FailureKind::Transport, "google API error: quota exhausted"),
        latency: Duration::ZERO,
        calls: Arc::new(AtomicUsize::new(0)),
    };
    let registry = AdapterRegistry::new()
        .with(failing)
        .with(MockAdapter::answering("codegpt", "fine", 1, 1));

    let selections = vec![
        Selection::new("google", "gemini-1.0-pro"),
        Selection::new("codegpt", "codegpt-latest"),
    ];

    let results = dispatcher(registry).dispatch(&selections, "quota").await.unwrap();

    assert_eq!(results[0].text, "Error: google API error: quota exhausted");
    assert_eq!(results[0].failure, Some(FailureKind::Transport));
    assert_eq!(results[1].text, "fine");
}

#[tokio::test]
async fn test_panicking_adapter_only_fails_its_slot() {
    let registry = AdapterRegistry::new()
        .with(MockAdapter::answering("openai", "survivor", 1, 1).after(Duration::from_millis(50)))
        .with(PanickingAdapter);

    let selections = vec![
        Selection::new("openai", "gpt-4o"),
        Selection::new("google", "gemini-1.5-flash"),
    ];

    let results = dispatcher(registry).dispatch(&selections, "boom").await.unwrap();

    assert_eq!(results[0].text, "survivor");
    assert!(results[1].text.starts_with("Error:"));
    assert_eq!(results[1].failure, Some(FailureKind::Transport));
    assert_eq!((results[1].tokens_in, results[1].tokens_out), (0, 0));
}

#[tokio::test]
async fn test_unknown_provider_fails_before_any_call() {
    let calls = Arc::new(AtomicUsize::new(0));
    let registry = AdapterRegistry::new()
        .with(MockAdapter::answering("openai", "never", 1, 1).counting(&calls));

    let selections = vec![
        Selection::new("openai", "gpt-4o"),
        Selection::new("mistral", "mistral-large"),
    ];

    let result = dispatcher(registry).dispatch(&selections, "hello").await;

    match result {
        Err(AppError::InvalidSelection { provider, model }) => {
            assert_eq!(provider, "mistral");
            assert_eq!(model, "mistral-large");
        }
        other => panic!("Expected InvalidSelection, got {:?}", other),
    }
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_unknown_model_is_invalid_selection() {
    let calls = Arc::new(AtomicUsize::new(0));
    let registry = AdapterRegistry::new()
        .with(MockAdapter::answering("openai", "never", 1, 1).counting(&calls));

    let result = dispatcher(registry)
        .dispatch(&[Selection::new("openai", "gpt-5-ultra")], "hello")
        .await;

    assert!(matches!(result, Err(AppError::InvalidSelection { .. })));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_catalog_provider_without_adapter_is_invalid() {
    let registry = AdapterRegistry::new().with(MockAdapter::answering("openai", "a", 1, 1));

    let result = dispatcher(registry)
        .dispatch(&[Selection::new("codegpt", "codegpt-latest")], "hello")
        .await;

    assert!(matches!(result, Err(AppError::InvalidSelection { .. })));
}

#[tokio::test]
async fn test_blank_prompt_is_rejected() {
    let calls = Arc::new(AtomicUsize::new(0));
    let registry = AdapterRegistry::new()
        .with(MockAdapter::answering("openai", "never", 1, 1).counting(&calls));

    let result = dispatcher(registry)
        .dispatch(&[Selection::new("openai", "gpt-4o")], "   ")
        .await;

    assert!(matches!(result, Err(AppError::EmptyPrompt)));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_no_selections_yield_no_results() {
    let results = dispatcher(AdapterRegistry::new())
        .dispatch(&[], "anyone there?")
        .await
        .unwrap();

    assert!(results.is_empty());
}

#[tokio::test]
async fn test_builtin_codegpt_runs_without_credential() {
    let config = Config {
        codegpt_latency_ms: 50,
        ..Config::default()
    };
    let dispatcher = Dispatcher::from_config(&config).unwrap();

    let results = dispatcher
        .dispatch(&[Selection::new("codegpt", "codegpt-latest")], "hello")
        .await
        .unwrap();

    assert_eq!(results[0].text, "CodeGPT response for: hello");
    assert_eq!(results[0].tokens_in, 1);
    assert_eq!(results[0].tokens_out, 6);
    assert!(results[0].elapsed_time >= 0.05);
    assert!(!results[0].is_error());
}
