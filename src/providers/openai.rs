//! OpenAI-compatible generation service.
//!
//! Answers questions through `/chat/completions` and fine-tunes through the
//! files + `/fine_tuning/jobs` API. Works with any server that speaks the
//! same wire format (OpenAI, Azure-style proxies, local gateways).
//!
//! Auth priority: config key → RECALLBOT_API_KEY → OPENAI_API_KEY

use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{multipart, Client};
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::cache::CacheEntry;
use crate::config::{FineTuneConfig, ProviderConfig};
use crate::error::{RecallError, Result};

use super::{describe_http_error, GenerationService};

/// Environment variables consulted for the API key, in order.
const API_KEY_ENV_VARS: [&str; 2] = ["RECALLBOT_API_KEY", "OPENAI_API_KEY"];

const PROVIDER_NAME: &str = "openai";

// ── Fine-tune job status ─────────────────────────────────────────────────────

/// Interpreted state of a remote fine-tuning job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobStatus {
    /// Still validating, queued or running.
    Pending(String),
    /// Finished; carries the name of the new model.
    Succeeded(String),
    /// Terminal failure or cancellation, with a reason.
    Failed(String),
}

impl JobStatus {
    /// Interpret a `GET /fine_tuning/jobs/{id}` response body.
    pub fn from_json(job: &Value) -> Result<Self> {
        let status = job["status"].as_str().ok_or_else(|| {
            RecallError::Training("fine-tuning job response has no status".into())
        })?;
        Ok(match status {
            "succeeded" => match job["fine_tuned_model"].as_str() {
                Some(model) if !model.is_empty() => Self::Succeeded(model.to_string()),
                _ => Self::Failed("job succeeded but reported no fine-tuned model".into()),
            },
            "failed" => Self::Failed(
                job["error"]["message"]
                    .as_str()
                    .unwrap_or("job failed without an error message")
                    .to_string(),
            ),
            "cancelled" => Self::Failed("job was cancelled".into()),
            other => Self::Pending(other.to_string()),
        })
    }
}

// ── Provider ──────────────────────────────────────────────────────────────────

/// Generation service backed by an OpenAI-compatible HTTP API.
///
/// The active model starts as the configured one and is replaced by the
/// fine-tuned model after every successful training pass.
pub struct OpenAiProvider {
    api_key: String,
    api_base: String,
    model: String,
    system_prompt: Option<String>,
    temperature: f32,
    max_tokens: u32,
    fine_tune: FineTuneConfig,
    client: Client,
}

impl std::fmt::Debug for OpenAiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiProvider")
            .field("api_key", &"[REDACTED]")
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .finish()
    }
}

impl OpenAiProvider {
    /// Build a provider from configuration, resolving the API key from the
    /// config file first and the environment second.
    pub fn from_config(provider: &ProviderConfig, fine_tune: &FineTuneConfig) -> Result<Self> {
        let env_key = API_KEY_ENV_VARS
            .iter()
            .find_map(|name| std::env::var(name).ok().filter(|v| !v.trim().is_empty()));
        let api_key = resolve_api_key(provider.api_key.as_deref(), env_key.as_deref())
            .ok_or_else(|| {
                RecallError::Config(format!(
                    "no API key configured; set provider.api_key in the config file or export {}",
                    API_KEY_ENV_VARS.join(" / ")
                ))
            })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(provider.timeout_secs))
            .build()
            .map_err(|e| RecallError::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            api_key,
            api_base: provider.api_base.trim_end_matches('/').to_string(),
            model: provider.model.clone(),
            system_prompt: provider.system_prompt.clone(),
            temperature: provider.temperature,
            max_tokens: provider.max_tokens,
            fine_tune: fine_tune.clone(),
            client,
        })
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/{}", self.api_base, path.trim_start_matches('/'))
    }

    /// Build a `/chat/completions` body for one question. No history is
    /// sent: each question is answered on its own.
    pub fn build_chat_body(&self, question: &str) -> Value {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = self.system_prompt.as_deref().filter(|s| !s.is_empty()) {
            messages.push(json!({ "role": "system", "content": system }));
        }
        messages.push(json!({ "role": "user", "content": question }));
        json!({
            "model": self.model,
            "messages": messages,
            "temperature": self.temperature,
            "max_tokens": self.max_tokens,
        })
    }

    /// Pull the assistant text out of a chat completion response.
    ///
    /// Returns `None` when the model never produced a final message.
    pub fn extract_answer(response: &Value) -> Option<String> {
        let choice = &response["choices"][0];
        if choice["finish_reason"].as_str() == Some("length") {
            warn!("Completion hit the token limit; answer may be truncated");
        }
        choice["message"]["content"].as_str().map(String::from)
    }

    /// Send a request, check the status and parse the JSON body. Failures
    /// are wrapped with `kind` so callers get the right error class.
    async fn send_json(
        &self,
        request: reqwest::RequestBuilder,
        what: &str,
        kind: fn(String) -> RecallError,
    ) -> Result<Value> {
        let response = request
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| kind(format!("{} request failed: {}", what, e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(kind(format!(
                "{}: {}",
                what,
                describe_http_error(PROVIDER_NAME, status.as_u16(), &body)
            )));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| kind(format!("failed to parse {} response: {}", what, e)))
    }

    async fn upload_training_file(&self, jsonl: String) -> Result<String> {
        let file_name = format!("recallbot-{}.jsonl", Utc::now().format("%Y%m%dT%H%M%S"));
        let part = multipart::Part::bytes(jsonl.into_bytes())
            .file_name(file_name)
            .mime_str("application/jsonl")
            .map_err(|e| RecallError::Training(format!("invalid upload part: {}", e)))?;
        let form = multipart::Form::new()
            .text("purpose", "fine-tune")
            .part("file", part);

        let request = self.client.post(self.api_url("files")).multipart(form);
        let body = self
            .send_json(request, "training file upload", RecallError::Training)
            .await?;
        body["id"]
            .as_str()
            .map(String::from)
            .ok_or_else(|| RecallError::Training("file upload response has no id".into()))
    }

    async fn create_job(&self, training_file: &str) -> Result<String> {
        let mut payload = json!({
            "training_file": training_file,
            "model": self.model,
        });
        if !self.fine_tune.suffix.is_empty() {
            payload["suffix"] = json!(self.fine_tune.suffix);
        }

        let request = self
            .client
            .post(self.api_url("fine_tuning/jobs"))
            .json(&payload);
        let body = self
            .send_json(request, "fine-tuning job creation", RecallError::Training)
            .await?;
        body["id"]
            .as_str()
            .map(String::from)
            .ok_or_else(|| RecallError::Training("job creation response has no id".into()))
    }

    /// Poll until the job reaches a terminal state or the wait budget runs out.
    async fn wait_for_job(&self, job_id: &str) -> Result<String> {
        let started = Instant::now();
        let max_wait = Duration::from_secs(self.fine_tune.max_wait_secs);
        let interval = Duration::from_secs(self.fine_tune.poll_interval_secs);
        let url = self.api_url(&format!("fine_tuning/jobs/{}", job_id));

        loop {
            let body = self
                .send_json(self.client.get(&url), "fine-tuning job status", RecallError::Training)
                .await?;
            match JobStatus::from_json(&body)? {
                JobStatus::Succeeded(model) => return Ok(model),
                JobStatus::Failed(reason) => {
                    return Err(RecallError::Training(format!(
                        "job {} did not complete: {}",
                        job_id, reason
                    )))
                }
                JobStatus::Pending(status) => {
                    debug!(job_id, status = %status, elapsed_secs = started.elapsed().as_secs(), "Fine-tuning job still running");
                }
            }

            if started.elapsed() >= max_wait {
                return Err(RecallError::Training(format!(
                    "job {} still running after {}s; giving up (the job keeps running remotely)",
                    job_id, self.fine_tune.max_wait_secs
                )));
            }
            tokio::time::sleep(interval).await;
        }
    }
}

#[async_trait]
impl GenerationService for OpenAiProvider {
    async fn complete(&self, question: &str) -> Result<String> {
        let body = self.build_chat_body(question);
        debug!(model = %self.model, "Requesting completion");

        let request = self.client.post(self.api_url("chat/completions")).json(&body);
        let response = self
            .send_json(request, "completion", RecallError::Generation)
            .await?;

        Self::extract_answer(&response).ok_or_else(|| {
            RecallError::Generation("completion response contained no answer".into())
        })
    }

    async fn fine_tune(&mut self, pairs: &[CacheEntry]) -> Result<()> {
        if pairs.len() < self.fine_tune.min_examples {
            return Err(RecallError::Training(format!(
                "need at least {} cached answers to fine-tune, have {}",
                self.fine_tune.min_examples,
                pairs.len()
            )));
        }

        let jsonl = encode_training_jsonl(pairs)?;
        let file_id = self.upload_training_file(jsonl).await?;
        info!(file_id = %file_id, examples = pairs.len(), "Uploaded training file");

        let job_id = self.create_job(&file_id).await?;
        info!(job_id = %job_id, base_model = %self.model, "Started fine-tuning job");

        let tuned = self.wait_for_job(&job_id).await?;
        info!(previous = %self.model, model = %tuned, "Fine-tuning complete, switching model");
        self.model = tuned;
        Ok(())
    }

    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }

    fn model(&self) -> String {
        self.model.clone()
    }
}

/// Pick the first non-empty key: explicit config value, then environment.
pub fn resolve_api_key(explicit: Option<&str>, env: Option<&str>) -> Option<String> {
    explicit
        .filter(|k| !k.trim().is_empty())
        .or_else(|| env.filter(|k| !k.trim().is_empty()))
        .map(|k| k.trim().to_string())
}

/// Encode pairs as chat-format JSONL, one `{"messages": [...]}` per line.
pub fn encode_training_jsonl(pairs: &[CacheEntry]) -> Result<String> {
    let mut out = String::new();
    for entry in pairs {
        let line = json!({
            "messages": [
                { "role": "user", "content": entry.question },
                { "role": "assistant", "content": entry.answer },
            ]
        });
        let encoded = serde_json::to_string(&line)
            .map_err(|e| RecallError::Training(format!("failed to encode pair: {}", e)))?;
        out.push_str(&encoded);
        out.push('\n');
    }
    Ok(out)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn provider(system_prompt: Option<&str>) -> OpenAiProvider {
        let config = ProviderConfig {
            api_key: Some("sk-test".into()),
            api_base: "https://api.example.com/v1/".into(),
            system_prompt: system_prompt.map(String::from),
            ..ProviderConfig::default()
        };
        OpenAiProvider::from_config(&config, &FineTuneConfig::default()).unwrap()
    }

    #[test]
    fn test_resolve_api_key_prefers_explicit() {
        assert_eq!(
            resolve_api_key(Some("config-key"), Some("env-key")).as_deref(),
            Some("config-key")
        );
    }

    #[test]
    fn test_resolve_api_key_falls_back_to_env() {
        assert_eq!(
            resolve_api_key(Some("  "), Some("env-key")).as_deref(),
            Some("env-key")
        );
        assert_eq!(resolve_api_key(None, Some("env-key")).as_deref(), Some("env-key"));
    }

    #[test]
    fn test_resolve_api_key_none() {
        assert!(resolve_api_key(None, None).is_none());
        assert!(resolve_api_key(Some(""), Some("")).is_none());
    }

    #[test]
    fn test_api_url_strips_trailing_slash() {
        let p = provider(None);
        assert_eq!(
            p.api_url("chat/completions"),
            "https://api.example.com/v1/chat/completions"
        );
    }

    #[test]
    fn test_debug_redacts_key() {
        let p = provider(None);
        let dbg = format!("{:?}", p);
        assert!(!dbg.contains("sk-test"));
        assert!(dbg.contains("REDACTED"));
    }

    #[test]
    fn test_chat_body_single_user_message() {
        let p = provider(None);
        let body = p.build_chat_body("What is 2+2?");
        let messages = body["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0]["role"], "user");
        assert_eq!(messages[0]["content"], "What is 2+2?");
        assert_eq!(body["model"], ProviderConfig::default().model.as_str());
    }

    #[test]
    fn test_chat_body_with_system_prompt() {
        let p = provider(Some("Answer briefly."));
        let body = p.build_chat_body("hi");
        let messages = body["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0]["role"], "system");
        assert_eq!(messages[1]["content"], "hi");
    }

    #[test]
    fn test_chat_body_keeps_raw_question() {
        let p = provider(None);
        let body = p.build_chat_body("  spaced  ");
        assert_eq!(body["messages"][0]["content"], "  spaced  ");
    }

    #[test]
    fn test_extract_answer() {
        let response = json!({
            "choices": [{
                "message": { "role": "assistant", "content": "4" },
                "finish_reason": "stop"
            }]
        });
        assert_eq!(OpenAiProvider::extract_answer(&response).as_deref(), Some("4"));
    }

    #[test]
    fn test_extract_answer_truncated_still_returns_text() {
        let response = json!({
            "choices": [{
                "message": { "content": "partial" },
                "finish_reason": "length"
            }]
        });
        assert_eq!(
            OpenAiProvider::extract_answer(&response).as_deref(),
            Some("partial")
        );
    }

    #[test]
    fn test_extract_answer_missing_content() {
        let no_choices = json!({ "choices": [] });
        assert!(OpenAiProvider::extract_answer(&no_choices).is_none());

        let null_content = json!({
            "choices": [{ "message": { "content": null }, "finish_reason": "tool_calls" }]
        });
        assert!(OpenAiProvider::extract_answer(&null_content).is_none());
    }

    #[test]
    fn test_encode_training_jsonl() {
        let pairs = vec![
            CacheEntry::new("What is 2+2?", "4"),
            CacheEntry::new("line\nbreak", "quote \"x\""),
        ];
        let jsonl = encode_training_jsonl(&pairs).unwrap();
        let lines: Vec<&str> = jsonl.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["messages"][0]["role"], "user");
        assert_eq!(first["messages"][0]["content"], "What is 2+2?");
        assert_eq!(first["messages"][1]["role"], "assistant");
        assert_eq!(first["messages"][1]["content"], "4");

        let second: Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second["messages"][0]["content"], "line\nbreak");
    }

    #[test]
    fn test_job_status_pending() {
        for status in ["validating_files", "queued", "running"] {
            let job = json!({ "id": "ftjob-1", "status": status });
            assert_eq!(
                JobStatus::from_json(&job).unwrap(),
                JobStatus::Pending(status.to_string())
            );
        }
    }

    #[test]
    fn test_job_status_succeeded() {
        let job = json!({
            "status": "succeeded",
            "fine_tuned_model": "ft:gpt-4o-mini:org:recallbot:abc123"
        });
        assert_eq!(
            JobStatus::from_json(&job).unwrap(),
            JobStatus::Succeeded("ft:gpt-4o-mini:org:recallbot:abc123".into())
        );
    }

    #[test]
    fn test_job_status_succeeded_without_model_is_failure() {
        let job = json!({ "status": "succeeded", "fine_tuned_model": null });
        assert!(matches!(
            JobStatus::from_json(&job).unwrap(),
            JobStatus::Failed(_)
        ));
    }

    #[test]
    fn test_job_status_failed_reports_reason() {
        let job = json!({
            "status": "failed",
            "error": { "message": "Training file has too few examples" }
        });
        assert_eq!(
            JobStatus::from_json(&job).unwrap(),
            JobStatus::Failed("Training file has too few examples".into())
        );
        let cancelled = json!({ "status": "cancelled" });
        assert!(matches!(
            JobStatus::from_json(&cancelled).unwrap(),
            JobStatus::Failed(_)
        ));
    }

    #[test]
    fn test_job_status_missing_is_training_error() {
        let err = JobStatus::from_json(&json!({ "id": "x" })).unwrap_err();
        assert!(matches!(err, RecallError::Training(_)));
    }

    fn provider_at(api_base: &str, fine_tune: FineTuneConfig) -> OpenAiProvider {
        let config = ProviderConfig {
            api_key: Some("sk-test".into()),
            api_base: api_base.into(),
            timeout_secs: 5,
            ..ProviderConfig::default()
        };
        OpenAiProvider::from_config(&config, &fine_tune).unwrap()
    }

    fn quick_jobs() -> FineTuneConfig {
        FineTuneConfig {
            poll_interval_secs: 0,
            max_wait_secs: 0,
            ..FineTuneConfig::default()
        }
    }

    fn pairs(n: usize) -> Vec<CacheEntry> {
        (0..n)
            .map(|i| CacheEntry::new(format!("question {i}"), format!("answer {i}")))
            .collect()
    }

    const UNREACHABLE: &str = "http://127.0.0.1:1/v1";

    /// Read one request (headers plus a `content-length` body) and return
    /// its method and path.
    async fn read_request(stream: &mut tokio::net::TcpStream) -> Option<(String, String)> {
        use tokio::io::AsyncReadExt;

        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        let header_end = loop {
            let n = stream.read(&mut chunk).await.ok()?;
            if n == 0 {
                return None;
            }
            buf.extend_from_slice(&chunk[..n]);
            if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                break pos + 4;
            }
        };

        let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
        let content_length = head
            .lines()
            .find_map(|line| {
                let (name, value) = line.split_once(':')?;
                if name.eq_ignore_ascii_case("content-length") {
                    value.trim().parse::<usize>().ok()
                } else {
                    None
                }
            })
            .unwrap_or(0);
        while buf.len() < header_end + content_length {
            let n = stream.read(&mut chunk).await.ok()?;
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
        }

        let mut request_line = head.split_whitespace();
        Some((
            request_line.next()?.to_string(),
            request_line.next()?.to_string(),
        ))
    }

    /// Local HTTP server answering every request with canned JSON chosen by
    /// method and path. Returns the `api_base` to point a provider at.
    async fn serve_canned<F>(respond: F) -> String
    where
        F: Fn(&str, &str) -> (u16, Value) + Send + Sync + 'static,
    {
        use tokio::io::AsyncWriteExt;

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let respond = std::sync::Arc::new(respond);
        tokio::spawn(async move {
            while let Ok((mut stream, _)) = listener.accept().await {
                let respond = respond.clone();
                tokio::spawn(async move {
                    let Some((method, path)) = read_request(&mut stream).await else {
                        return;
                    };
                    let (status, body) = respond(&method, &path);
                    let body = body.to_string();
                    let reply = format!(
                        "HTTP/1.1 {} Canned\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                        status,
                        body.len(),
                        body
                    );
                    let _ = stream.write_all(reply.as_bytes()).await;
                    let _ = stream.shutdown().await;
                });
            }
        });
        format!("http://{}/v1", addr)
    }

    /// Canned fine-tuning backend whose job always reports `job`.
    async fn serve_fine_tune(job: Value) -> String {
        serve_canned(move |method, path| match (method, path) {
            ("POST", "/v1/files") => (200, json!({ "id": "file-abc" })),
            ("POST", "/v1/fine_tuning/jobs") => (200, json!({ "id": "ftjob-abc" })),
            ("GET", "/v1/fine_tuning/jobs/ftjob-abc") => (200, job.clone()),
            _ => (404, json!({ "error": { "message": "no such route" } })),
        })
        .await
    }

    #[tokio::test]
    async fn test_complete_unreachable_is_generation_error() {
        let p = provider_at(UNREACHABLE, FineTuneConfig::default());
        let err = p.complete("What is 2+2?").await.unwrap_err();
        assert!(matches!(err, RecallError::Generation(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn test_complete_returns_answer() {
        let base = serve_canned(|_, _| {
            (
                200,
                json!({
                    "choices": [{
                        "message": { "role": "assistant", "content": "4" },
                        "finish_reason": "stop"
                    }]
                }),
            )
        })
        .await;
        let p = provider_at(&base, FineTuneConfig::default());
        assert_eq!(p.complete("What is 2+2?").await.unwrap(), "4");
    }

    #[tokio::test]
    async fn test_complete_http_error_is_generation_error() {
        let base = serve_canned(|_, _| {
            (500, json!({ "error": { "message": "upstream exploded" } }))
        })
        .await;
        let p = provider_at(&base, FineTuneConfig::default());
        let err = p.complete("What is 2+2?").await.unwrap_err();
        match err {
            RecallError::Generation(msg) => assert!(msg.contains("500"), "{msg}"),
            other => panic!("expected generation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fine_tune_unreachable_is_training_error_and_keeps_model() {
        let mut p = provider_at(UNREACHABLE, FineTuneConfig::default());
        let before = p.model();
        let err = p.fine_tune(&pairs(10)).await.unwrap_err();
        assert!(matches!(err, RecallError::Training(_)), "got {err:?}");
        assert_eq!(p.model(), before);
    }

    #[tokio::test]
    async fn test_fine_tune_success_switches_model() {
        let base = serve_fine_tune(json!({
            "status": "succeeded",
            "fine_tuned_model": "ft:gpt-4o-mini:org:recallbot:abc123"
        }))
        .await;
        let mut p = provider_at(&base, quick_jobs());
        p.fine_tune(&pairs(10)).await.unwrap();
        assert_eq!(p.model(), "ft:gpt-4o-mini:org:recallbot:abc123");
    }

    #[tokio::test]
    async fn test_fine_tune_failed_job_keeps_model() {
        let base = serve_fine_tune(json!({
            "status": "failed",
            "error": { "message": "Training file has too few examples" }
        }))
        .await;
        let mut p = provider_at(&base, quick_jobs());
        let before = p.model();
        let err = p.fine_tune(&pairs(10)).await.unwrap_err();
        match err {
            RecallError::Training(msg) => assert!(msg.contains("too few examples"), "{msg}"),
            other => panic!("expected training error, got {other:?}"),
        }
        assert_eq!(p.model(), before);
    }

    #[tokio::test]
    async fn test_fine_tune_timeout_keeps_model() {
        let base = serve_fine_tune(json!({ "status": "running" })).await;
        let mut p = provider_at(&base, quick_jobs());
        let before = p.model();
        let err = p.fine_tune(&pairs(10)).await.unwrap_err();
        match err {
            RecallError::Training(msg) => assert!(msg.contains("still running"), "{msg}"),
            other => panic!("expected training error, got {other:?}"),
        }
        assert_eq!(p.model(), before);
    }

    #[tokio::test]
    async fn test_fine_tune_upload_rejected_is_training_error() {
        let base = serve_canned(|_, _| (401, json!({ "error": { "message": "bad key" } }))).await;
        let mut p = provider_at(&base, quick_jobs());
        let before = p.model();
        let err = p.fine_tune(&pairs(10)).await.unwrap_err();
        assert!(matches!(err, RecallError::Training(_)), "got {err:?}");
        assert_eq!(p.model(), before);
    }

    #[tokio::test]
    async fn test_fine_tune_below_minimum_keeps_model() {
        let mut p = provider(None);
        let before = p.model();
        let err = p
            .fine_tune(&[CacheEntry::new("q", "a")])
            .await
            .unwrap_err();
        assert!(matches!(err, RecallError::Training(_)));
        assert_eq!(p.model(), before);
    }
}
