use pdfbrief::configuration::SummarizerSettings;
use pdfbrief::services::summarizer::ChatTurn;
use pdfbrief::services::{SummarizerClient, SummaryEngine};
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn settings(base_url: String) -> SummarizerSettings {
    SummarizerSettings {
        base_url,
        model: "gpt-4o-mini".to_string(),
        api_key: String::new(),
    }
}

fn completion(content: &str) -> serde_json::Value {
    serde_json::json!({
        "choices": [
            { "message": { "role": "assistant", "content": content } }
        ]
    })
}

#[tokio::test]
async fn summarize_returns_model_output() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_string_contains("gpt-4o-mini"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("A short summary.")))
        .expect(1)
        .mount(&server)
        .await;

    let client = SummarizerClient::new(&settings(server.uri()));
    let summary = client.summarize("long extracted document text").await.unwrap();
    assert_eq!(summary, "A short summary.");
}

#[tokio::test]
async fn answer_sends_history_and_question() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_string_contains("What about chapter two"))
        .and(body_string_contains("Earlier answer"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("Chapter two covers X.")))
        .expect(1)
        .mount(&server)
        .await;

    let client = SummarizerClient::new(&settings(server.uri()));
    let history = vec![
        ChatTurn {
            role: "user".to_string(),
            content: "First question".to_string(),
        },
        ChatTurn {
            role: "assistant".to_string(),
            content: "Earlier answer".to_string(),
        },
    ];
    let answer = client
        .answer("The document summary", &history, "What about chapter two?")
        .await
        .unwrap();
    assert_eq!(answer, "Chapter two covers X.");
}

#[tokio::test]
async fn api_errors_are_reported() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
        .mount(&server)
        .await;

    let client = SummarizerClient::new(&settings(server.uri()));
    let err = client.summarize("text").await.unwrap_err();
    assert!(err.to_string().contains("429"));
}
