use std::sync::Arc;

use axum::Router;
use common::utils::config::{get_config, SummarizerKind};
use html_router::{html_routes, html_state::HtmlState};
use retrieval_index::{
    DocumentIndex, DocumentStore, FirstLinesSummarizer, LlmSummarizer, Summarizer,
};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Set up tracing
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .try_init()
        .ok();

    // Get config
    let config = get_config()?;

    let openai_client = Arc::new(async_openai::Client::with_config(
        async_openai::config::OpenAIConfig::new()
            .with_api_key(&config.openai_api_key)
            .with_api_base(&config.openai_base_url),
    ));

    let summarizer: Arc<dyn Summarizer> = match config.summarizer {
        SummarizerKind::Truncate => Arc::new(FirstLinesSummarizer::new(config.summary_lines)),
        SummarizerKind::Llm => Arc::new(LlmSummarizer::new(
            Arc::clone(&openai_client),
            config.query_model.clone(),
        )),
    };

    // Bulk-load the corpus and fit the initial snapshot
    tokio::fs::create_dir_all(&config.documents_dir).await?;
    let store = DocumentStore::load_all(&config.documents_dir, summarizer.as_ref()).await?;
    info!(documents = store.len(), "Corpus loaded, fitting index");
    let index = Arc::new(DocumentIndex::new(store));

    let html_state = HtmlState::new_with_resources(index, openai_client, summarizer, config.clone())?;

    // Create Axum router
    let app = Router::new().merge(html_routes()).with_state(html_state);

    info!("Starting server listening on 0.0.0.0:{}", config.http_port);
    let serve_address = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(serve_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use common::utils::config::AppConfig;
    use std::path::Path;
    use tower::ServiceExt;

    fn smoke_test_config(data_dir: &Path) -> AppConfig {
        AppConfig {
            openai_api_key: "test-key".into(),
            openai_base_url: "https://example.com/v1".into(),
            query_model: "gpt-4o-mini".into(),
            query_system_prompt: "Answer the question given the following context".into(),
            max_answer_tokens: 150,
            http_port: 0,
            documents_dir: data_dir.to_string_lossy().into_owned(),
            context_documents: 5,
            summarizer: SummarizerKind::Truncate,
            summary_lines: 1,
        }
    }

    async fn test_app(data_dir: &Path) -> Router {
        let config = smoke_test_config(data_dir);
        let summarizer: Arc<dyn Summarizer> =
            Arc::new(FirstLinesSummarizer::new(config.summary_lines));
        let store = DocumentStore::load_all(data_dir, summarizer.as_ref())
            .await
            .expect("failed to load documents");
        let index = Arc::new(DocumentIndex::new(store));
        let openai_client = Arc::new(async_openai::Client::with_config(
            async_openai::config::OpenAIConfig::new()
                .with_api_key(&config.openai_api_key)
                .with_api_base(&config.openai_base_url),
        ));
        let html_state =
            HtmlState::new_with_resources(index, openai_client, summarizer, config)
                .expect("failed to build html state");

        Router::new().merge(html_routes()).with_state(html_state)
    }

    async fn body_json(body: Body) -> serde_json::Value {
        let bytes = axum::body::to_bytes(body, usize::MAX)
            .await
            .expect("failed to read body");
        serde_json::from_slice(&bytes).expect("body was not valid json")
    }

    #[tokio::test]
    async fn index_page_lists_loaded_documents() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("apples.txt"), "apple pie recipe\nwith cinnamon")
            .expect("write fixture");
        let app = test_app(dir.path()).await;

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).expect("request"))
            .await
            .expect("router response");

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("failed to read body");
        let html = String::from_utf8(bytes.to_vec()).expect("utf8 body");
        assert!(html.contains("apples.txt"));
        assert!(html.contains("apple pie recipe"));
    }

    #[tokio::test]
    async fn save_then_search_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let app = test_app(dir.path()).await;

        let save_response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/documents")
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from("id=banana.txt&text=banana+bread+recipe"))
                    .expect("request"),
            )
            .await
            .expect("save response");
        assert_eq!(save_response.status(), StatusCode::OK);
        let saved = body_json(save_response.into_body()).await;
        assert_eq!(saved["id"], "banana.txt");
        assert_eq!(saved["summary"], "banana bread recipe");

        // The saved text is persisted back to the documents directory.
        assert!(dir.path().join("banana.txt").exists());

        let search_response = app
            .oneshot(
                Request::builder()
                    .uri("/search?query=banana")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("search response");
        assert_eq!(search_response.status(), StatusCode::OK);
        let results = body_json(search_response.into_body()).await;
        assert_eq!(results[0]["id"], "banana.txt");
        assert!(results[0]["score"].as_f64().expect("score") > 0.0);
    }

    #[tokio::test]
    async fn duplicate_save_conflicts() {
        let dir = tempfile::tempdir().expect("tempdir");
        let app = test_app(dir.path()).await;

        let save = |app: Router| async move {
            app.oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/documents")
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from("id=dup.txt&text=some+text"))
                    .expect("request"),
            )
            .await
            .expect("save response")
        };

        assert_eq!(save(app.clone()).await.status(), StatusCode::OK);
        assert_eq!(save(app).await.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn empty_corpus_search_is_empty_not_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let app = test_app(dir.path()).await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/search?query=anything")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("search response");

        assert_eq!(response.status(), StatusCode::OK);
        let results = body_json(response.into_body()).await;
        assert_eq!(results, serde_json::json!([]));
    }
}
