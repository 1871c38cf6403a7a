//! OpenAI completion adapter tests against a mock server.
//!
//! Validates model validation, request shape and response extraction.

use promptfit::api::Tokenizer;
use promptfit::{
    FitError, ModelAdapter, ModelError, OpenAiCompletion, OpenAiConfig, PromptFitter,
    SamplingConfig, Vars,
};
use serde_json::{json, Value};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

fn models_response() -> Value {
    json!({
        "object": "list",
        "data": [
            { "id": "text-ada-001", "object": "model" },
            { "id": "gpt-4o", "object": "model" },
            { "id": "text-davinci-003", "object": "model" }
        ]
    })
}

/// Answers each completion with the prompt it was given.
struct EchoCompletion;

impl Respond for EchoCompletion {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let body: Value = serde_json::from_slice(&request.body).unwrap();
        let prompt = body["prompt"].as_str().unwrap_or_default().to_string();
        ResponseTemplate::new(200).set_body_json(json!({
            "id": "cmpl-1",
            "object": "text_completion",
            "model": body["model"],
            "choices": [{ "text": format!(" re: {}", prompt), "index": 0, "finish_reason": "stop" }],
            "usage": { "prompt_tokens": 3, "completion_tokens": 4, "total_tokens": 7 }
        }))
    }
}

async fn mount_models(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/v1/models"))
        .and(header("authorization", "Bearer test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(models_response()))
        .mount(server)
        .await;
}

fn config(server: &MockServer) -> OpenAiConfig {
    OpenAiConfig::new("test-key").with_base_url(format!("{}/v1/", server.uri()))
}

async fn connect(server: &MockServer) -> OpenAiCompletion {
    OpenAiCompletion::connect(config(server), reqwest::Client::new())
        .await
        .expect("connect ok")
}

#[tokio::test]
async fn supported_models_keep_preference_order() {
    let server = MockServer::start().await;
    mount_models(&server).await;

    let model = connect(&server).await;
    assert_eq!(model.model(), "text-davinci-003");
    assert_eq!(
        model.list_supported_models().await.unwrap(),
        vec!["text-davinci-003".to_string(), "text-ada-001".to_string()]
    );
}

#[tokio::test]
async fn unavailable_model_is_rejected_at_construction() {
    let server = MockServer::start().await;
    mount_models(&server).await;
    Mock::given(method("POST"))
        .and(path("/v1/completions"))
        .respond_with(EchoCompletion)
        .expect(0)
        .mount(&server)
        .await;

    let err = OpenAiCompletion::connect(
        config(&server).with_model("text-curie-001"),
        reqwest::Client::new(),
    )
    .await
    .unwrap_err();

    match err {
        ModelError::UnsupportedModel { model, available } => {
            assert_eq!(model, "text-curie-001");
            assert_eq!(available, vec!["text-davinci-003", "text-ada-001"]);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn unknown_model_outside_supported_set_is_rejected() {
    let server = MockServer::start().await;
    mount_models(&server).await;

    let err = OpenAiCompletion::connect(config(&server).with_model("gpt-4o"), reqwest::Client::new())
        .await
        .unwrap_err();
    assert!(matches!(err, ModelError::UnsupportedModel { .. }));
}

#[tokio::test]
async fn request_shape_subtracts_prompt_tokens_from_budget() {
    let server = MockServer::start().await;
    mount_models(&server).await;

    let prompt = "Extract the entities from: Alice met Bob in Paris.";
    let expected_max = 4000 - Tokenizer::new().unwrap().count(prompt) as i64;

    Mock::given(method("POST"))
        .and(path("/v1/completions"))
        .and(header("authorization", "Bearer test-key"))
        .and(move |req: &Request| {
            let Ok(v) = serde_json::from_slice::<Value>(&req.body) else {
                return false;
            };
            v["model"] == json!("text-davinci-003")
                && v["prompt"] == json!(prompt)
                && v["max_tokens"] == json!(expected_max)
                && v["temperature"] == json!(0.2)
                && v["top_p"] == json!(0.1)
                && v["frequency_penalty"] == json!(0.0)
                && v["presence_penalty"] == json!(0.0)
                && v["stop"] == json!(["\n"])
        })
        .respond_with(EchoCompletion)
        .expect(1)
        .mount(&server)
        .await;

    let model = connect(&server).await;
    let config = SamplingConfig {
        temperature: 0.2,
        stop: Some(vec!["\n".to_string()]),
        ..SamplingConfig::default()
    };
    let records = model.run(&[prompt.to_string()], &config).await.unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].text, format!(" re: {}", prompt));
    assert_eq!(records[0].usage["total_tokens"], json!(7));
}

#[tokio::test]
async fn records_follow_prompt_order() {
    let server = MockServer::start().await;
    mount_models(&server).await;
    Mock::given(method("POST"))
        .and(path("/v1/completions"))
        .respond_with(EchoCompletion)
        .expect(3)
        .mount(&server)
        .await;

    let model = connect(&server).await;
    let prompts: Vec<String> = ["p1", "p2", "p3"].iter().map(|p| p.to_string()).collect();
    let records = model.run(&prompts, &SamplingConfig::default()).await.unwrap();

    let texts: Vec<&str> = records.iter().map(|r| r.text.as_str()).collect();
    assert_eq!(texts, vec![" re: p1", " re: p2", " re: p3"]);
}

#[tokio::test]
async fn provider_error_message_is_surfaced() {
    let server = MockServer::start().await;
    mount_models(&server).await;
    Mock::given(method("POST"))
        .and(path("/v1/completions"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "error": { "message": "Rate limit reached", "type": "requests" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let model = connect(&server).await;
    let err = model
        .run(&["a".to_string(), "b".to_string()], &SamplingConfig::default())
        .await
        .unwrap_err();

    match err {
        ModelError::Provider { status, message } => {
            assert_eq!(status, 429);
            assert_eq!(message, "Rate limit reached");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn prompt_over_budget_fails_locally() {
    let server = MockServer::start().await;
    mount_models(&server).await;
    Mock::given(method("POST"))
        .and(path("/v1/completions"))
        .respond_with(EchoCompletion)
        .expect(0)
        .mount(&server)
        .await;

    let model = connect(&server).await;
    let config = SamplingConfig {
        max_tokens: 2,
        ..SamplingConfig::default()
    };
    let err = model
        .run(&["a prompt that is clearly longer than two tokens".to_string()], &config)
        .await
        .unwrap_err();

    assert!(matches!(err, ModelError::PromptExceedsBudget { max_tokens: 2, .. }));
}

#[tokio::test]
async fn missing_choice_is_malformed() {
    let server = MockServer::start().await;
    mount_models(&server).await;
    Mock::given(method("POST"))
        .and(path("/v1/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [],
            "usage": { "total_tokens": 1 }
        })))
        .mount(&server)
        .await;

    let model = connect(&server).await;
    let err = model
        .run(&["hi".to_string()], &SamplingConfig::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ModelError::MalformedResponse(_)));
}

#[tokio::test]
async fn fit_runs_rendered_template_through_openai() {
    let server = MockServer::start().await;
    mount_models(&server).await;
    Mock::given(method("POST"))
        .and(path("/v1/completions"))
        .and(|req: &Request| {
            let Ok(v) = serde_json::from_slice::<Value>(&req.body) else {
                return false;
            };
            v["prompt"] == json!("Summarize: hello") && v["temperature"] == json!(0.5)
        })
        .respond_with(EchoCompletion)
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("s.jinja"), "\nSummarize: {{ text }}\n").unwrap();

    let model = connect(&server).await;
    let fitter = PromptFitter::new(&model, dir.path());
    let vars: Vars = [
        ("text".to_string(), json!("hello")),
        ("temperature".to_string(), json!(0.5)),
        ("ignored".to_string(), json!(true)),
    ]
    .into_iter()
    .collect();

    let record = fitter.fit("s.jinja", vars).await.unwrap();
    assert_eq!(record.text, " re: Summarize: hello");
    assert_eq!(record.usage["prompt_tokens"], json!(3));

    let err = fitter.fit("s.jinja", Vars::new()).await.unwrap_err();
    assert!(matches!(err, FitError::Template(_)));
}

#[tokio::test]
async fn usage_text_never_shadows_generated_text() {
    let server = MockServer::start().await;
    mount_models(&server).await;
    Mock::given(method("POST"))
        .and(path("/v1/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{ "text": "generated" }],
            "usage": { "text": "usage", "total_tokens": 2 }
        })))
        .mount(&server)
        .await;

    let model = connect(&server).await;
    let records = model
        .run(&["hi".to_string()], &SamplingConfig::default())
        .await
        .unwrap();

    assert_eq!(
        serde_json::to_string(&records[0]).unwrap(),
        r#"{"total_tokens":2,"text":"generated"}"#
    );
}

#[tokio::test]
async fn most_negative_budget_fails_locally() {
    let server = MockServer::start().await;
    mount_models(&server).await;
    Mock::given(method("POST"))
        .and(path("/v1/completions"))
        .respond_with(EchoCompletion)
        .expect(0)
        .mount(&server)
        .await;

    let model = connect(&server).await;
    let config = SamplingConfig {
        max_tokens: i64::MIN,
        ..SamplingConfig::default()
    };
    let err = model
        .run(&["hello".to_string()], &config)
        .await
        .unwrap_err();

    assert!(matches!(err, ModelError::PromptExceedsBudget { max_tokens: i64::MIN, .. }));
}

#[tokio::test]
async fn available_models_ignore_configured_model() {
    let server = MockServer::start().await;
    mount_models(&server).await;

    let models = OpenAiCompletion::available_models(
        config(&server).with_model("text-curie-001"),
        reqwest::Client::new(),
    )
    .await
    .unwrap();

    assert_eq!(models, vec!["text-davinci-003", "text-ada-001"]);
}
