//! Ollama provider implementation.
//!
//! Talks to the native Ollama API:
//! - `POST /api/generate` with `stream: true`, answered by newline-delimited
//!   JSON records `{"response": "...", "done": false}`
//! - `GET /api/tags` for model listing and health checks
//!
//! Records that fail to decode are forwarded as recoverable
//! [`ProviderError::Protocol`] items so the consumer can skip them.

use async_trait::async_trait;
use futures::StreamExt;
use serde::Deserialize;
use std::time::Duration;
use steward_core::error::ProviderError;
use steward_core::provider::{ChunkReceiver, Provider, ProviderRequest, StreamChunk};
use tracing::{debug, trace, warn};

/// A provider backed by a local or remote Ollama server.
pub struct OllamaProvider {
    base_url: String,
    client: reqwest::Client,
    idle_timeout: Duration,
}

impl OllamaProvider {
    /// Create a provider for the server at `base_url` (e.g. `http://localhost:11434`).
    ///
    /// `idle_timeout` is the longest the provider waits for the backend
    /// between bytes.
    pub fn new(base_url: impl Into<String>, idle_timeout: Duration) -> Self {
        let client = match reqwest::Client::builder()
            .connect_timeout(idle_timeout)
            .build()
        {
            Ok(client) => client,
            Err(e) => {
                warn!(error = %e, "Failed to configure HTTP client, using defaults");
                reqwest::Client::new()
            }
        };

        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
            idle_timeout,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send a request, giving up if no response head arrives in time.
    async fn send(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, ProviderError> {
        match tokio::time::timeout(self.idle_timeout, request.send()).await {
            Ok(result) => result.map_err(Self::transport_error),
            Err(_) => Err(idle_error(self.idle_timeout)),
        }
    }

    fn transport_error(e: reqwest::Error) -> ProviderError {
        if e.is_timeout() {
            ProviderError::Timeout(e.to_string())
        } else {
            ProviderError::Unavailable(e.to_string())
        }
    }

    /// Turn a non-success response into an error, preferring Ollama's
    /// `{"error": "..."}` body when present.
    async fn status_error(response: reqwest::Response) -> ProviderError {
        let status_code = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .map(|b| b.error)
            .unwrap_or(body);
        warn!(status = status_code, message = %message, "Ollama returned error");
        ProviderError::ApiError {
            status_code,
            message,
        }
    }
}

#[async_trait]
impl Provider for OllamaProvider {
    fn name(&self) -> &str {
        "ollama"
    }

    async fn stream(&self, request: ProviderRequest) -> Result<ChunkReceiver, ProviderError> {
        let url = format!("{}/api/generate", self.base_url);

        debug!(
            model = %request.model,
            prompt_chars = request.prompt.len(),
            "Sending streaming generate request"
        );

        let response = self.send(self.client.post(&url).json(&request)).await?;

        if !response.status().is_success() {
            return Err(Self::status_error(response).await);
        }

        let (tx, rx) = tokio::sync::mpsc::channel(64);
        let idle_timeout = self.idle_timeout;

        // Spawn task to read the NDJSON byte stream and parse records
        tokio::spawn(async move {
            let mut byte_stream = response.bytes_stream();
            let mut buffer: Vec<u8> = Vec::new();

            loop {
                let next = tokio::time::timeout(idle_timeout, byte_stream.next()).await;
                let chunk_result = match next {
                    Ok(Some(chunk_result)) => chunk_result,
                    Ok(None) => break,
                    Err(_) => {
                        warn!(
                            timeout_secs = idle_timeout.as_secs_f64(),
                            "Ollama stream stalled"
                        );
                        let _ = tx.send(Err(idle_error(idle_timeout))).await;
                        return;
                    }
                };
                let bytes = match chunk_result {
                    Ok(b) => b,
                    Err(e) => {
                        let _ = tx
                            .send(Err(ProviderError::StreamInterrupted(e.to_string())))
                            .await;
                        return;
                    }
                };

                buffer.extend_from_slice(&bytes);

                // Process complete lines
                while let Some(line_end) = buffer.iter().position(|&b| b == b'\n') {
                    let line: Vec<u8> = buffer.drain(..=line_end).collect();
                    let line = String::from_utf8_lossy(&line);

                    let Some(item) = decode_line(&line) else {
                        continue;
                    };
                    let finished = item.as_ref().map(|c| c.done).unwrap_or(false);
                    let fatal = item.as_ref().is_err_and(|e| !e.is_recoverable());

                    if tx.send(item).await.is_err() {
                        return; // receiver dropped
                    }
                    if finished || fatal {
                        return;
                    }
                }
            }

            // Trailing record without a newline
            let rest = String::from_utf8_lossy(&buffer);
            if let Some(item) = decode_line(&rest) {
                let _ = tx.send(item).await;
            }
            trace!("Ollama stream closed");
        });

        Ok(rx)
    }

    async fn list_models(&self) -> Result<Vec<String>, ProviderError> {
        let url = format!("{}/api/tags", self.base_url);
        let response = self.send(self.client.get(&url)).await?;

        if !response.status().is_success() {
            return Err(Self::status_error(response).await);
        }

        let tags = tokio::time::timeout(self.idle_timeout, response.json::<TagsResponse>())
            .await
            .map_err(|_| idle_error(self.idle_timeout))?
            .map_err(|e| ProviderError::Protocol(format!("Failed to parse model list: {e}")))?;

        Ok(tags.models.into_iter().map(|m| m.name).collect())
    }

    async fn health_check(&self) -> Result<bool, ProviderError> {
        let url = format!("{}/api/tags", self.base_url);
        let response = self.send(self.client.get(&url)).await?;

        Ok(response.status().is_success())
    }
}

fn idle_error(timeout: Duration) -> ProviderError {
    ProviderError::Timeout(format!(
        "no data from backend for {:.1}s",
        timeout.as_secs_f64()
    ))
}

/// Decode one NDJSON line. Blank lines yield `None`.
///
/// A record carrying an `error` field ends the stream; a line that is not a
/// valid record is a recoverable protocol error.
pub fn decode_line(line: &str) -> Option<Result<StreamChunk, ProviderError>> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let item = match serde_json::from_str::<GenerateRecord>(line) {
        Ok(GenerateRecord {
            error: Some(message),
            ..
        }) => Err(ProviderError::StreamInterrupted(message)),
        Ok(record) => Ok(StreamChunk {
            content: record.response,
            done: record.done,
        }),
        Err(e) => Err(ProviderError::Protocol(format!(
            "could not decode response line <{line}>: {e}"
        ))),
    };
    Some(item)
}

// ── Ollama API types ──────────────────────────────────────────────────

#[derive(Deserialize)]
struct GenerateRecord {
    #[serde(default)]
    response: String,
    #[serde(default)]
    done: bool,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<TagModel>,
}

#[derive(Deserialize)]
struct TagModel {
    name: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve exactly one HTTP request with a canned response, then close.
    async fn serve_once(status: &'static str, content_type: &'static str, body: String) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            read_request(&mut socket).await;
            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
        });

        format!("http://{addr}")
    }

    /// Read headers plus a Content-Length body so the client never sees a reset.
    async fn read_request(socket: &mut tokio::net::TcpStream) {
        let mut data = Vec::new();
        let mut buf = [0u8; 4096];
        loop {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                return;
            }
            data.extend_from_slice(&buf[..n]);
            let text = String::from_utf8_lossy(&data).to_string();
            if let Some(header_end) = text.find("\r\n\r\n") {
                let content_length = text[..header_end]
                    .lines()
                    .find_map(|l| {
                        let (k, v) = l.split_once(':')?;
                        k.eq_ignore_ascii_case("content-length")
                            .then(|| v.trim().parse::<usize>().ok())
                            .flatten()
                    })
                    .unwrap_or(0);
                if data.len() >= header_end + 4 + content_length {
                    return;
                }
            }
        }
    }

    /// Answer one request with a close-delimited NDJSON body, writing each
    /// record after `gap`, then holding the connection open for `hold`.
    async fn serve_paced(records: Vec<&'static str>, gap: Duration, hold: Duration) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            read_request(&mut socket).await;
            socket
                .write_all(
                    b"HTTP/1.1 200 OK\r\nContent-Type: application/x-ndjson\r\nConnection: close\r\n\r\n",
                )
                .await
                .unwrap();
            for record in records {
                tokio::time::sleep(gap).await;
                socket.write_all(record.as_bytes()).await.unwrap();
                socket.write_all(b"\n").await.unwrap();
            }
            tokio::time::sleep(hold).await;
            let _ = socket.shutdown().await;
        });

        format!("http://{addr}")
    }

    async fn collect(mut rx: ChunkReceiver) -> Vec<Result<StreamChunk, ProviderError>> {
        let mut items = Vec::new();
        while let Some(item) = rx.recv().await {
            items.push(item);
        }
        items
    }

    #[test]
    fn decode_regular_record() {
        let chunk = decode_line(r#"{"response":"Hel","done":false}"#)
            .unwrap()
            .unwrap();
        assert_eq!(chunk, StreamChunk::text("Hel"));
    }

    #[test]
    fn decode_final_record_without_response() {
        let chunk = decode_line(r#"{"model":"llama3","done":true,"eval_count":12}"#)
            .unwrap()
            .unwrap();
        assert!(chunk.done);
        assert!(chunk.content.is_empty());
    }

    #[test]
    fn decode_blank_line_is_skipped() {
        assert!(decode_line("   \r\n").is_none());
    }

    #[test]
    fn decode_garbage_is_recoverable() {
        let err = decode_line("{not json").unwrap().unwrap_err();
        assert!(err.is_recoverable());
        assert!(err.to_string().contains("{not json"));
    }

    #[test]
    fn decode_error_record_is_fatal() {
        let err = decode_line(r#"{"error":"model crashed"}"#).unwrap().unwrap_err();
        assert!(!err.is_recoverable());
        assert!(err.to_string().contains("model crashed"));
    }

    #[tokio::test]
    async fn streams_records_in_order_and_skips_bad_lines() {
        let body = concat!(
            "{\"response\":\"a \",\"done\":false}\n",
            "garbage\n",
            "{\"response\":\"b\",\"done\":false}\n",
            "{\"response\":\"\",\"done\":true}\n",
        )
        .to_string();
        let base_url = serve_once("200 OK", "application/x-ndjson", body).await;

        let provider = OllamaProvider::new(&base_url, Duration::from_secs(5));
        let rx = provider
            .stream(ProviderRequest::new("llama3", "sys", "User: hi"))
            .await
            .unwrap();
        let items = collect(rx).await;

        assert_eq!(items.len(), 4);
        assert_eq!(items[0].as_ref().unwrap().content, "a ");
        assert!(items[1].as_ref().unwrap_err().is_recoverable());
        assert_eq!(items[2].as_ref().unwrap().content, "b");
        assert!(items[3].as_ref().unwrap().done);
    }

    #[tokio::test]
    async fn slow_generation_outlasting_the_timeout_completes() {
        let records = vec![
            r#"{"response":"one ","done":false}"#,
            r#"{"response":"two ","done":false}"#,
            r#"{"response":"three","done":false}"#,
            r#"{"response":"","done":true}"#,
        ];
        let base_url =
            serve_paced(records, Duration::from_millis(150), Duration::ZERO).await;

        let provider = OllamaProvider::new(&base_url, Duration::from_millis(400));
        let rx = provider
            .stream(ProviderRequest::new("llama3", "sys", "User: hi"))
            .await
            .unwrap();
        let items = collect(rx).await;

        let text: String = items
            .iter()
            .map(|item| item.as_ref().unwrap().content.as_str())
            .collect();
        assert_eq!(text, "one two three");
        assert!(items.last().unwrap().as_ref().unwrap().done);
    }

    #[tokio::test]
    async fn stalled_stream_times_out() {
        let records = vec![r#"{"response":"partial","done":false}"#];
        let base_url =
            serve_paced(records, Duration::ZERO, Duration::from_secs(5)).await;

        let provider = OllamaProvider::new(&base_url, Duration::from_millis(200));
        let rx = provider
            .stream(ProviderRequest::new("llama3", "sys", "User: hi"))
            .await
            .unwrap();
        let items = collect(rx).await;

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].as_ref().unwrap().content, "partial");
        let err = items[1].as_ref().unwrap_err();
        assert!(matches!(err, ProviderError::Timeout(_)));
        assert!(!err.is_recoverable());
    }

    #[tokio::test]
    async fn error_status_surfaces_backend_message() {
        let base_url = serve_once(
            "404 Not Found",
            "application/json",
            r#"{"error":"model 'nope' not found"}"#.to_string(),
        )
        .await;

        let provider = OllamaProvider::new(&base_url, Duration::from_secs(5));
        let err = provider
            .stream(ProviderRequest::new("nope", "sys", "User: hi"))
            .await
            .unwrap_err();
        match err {
            ProviderError::ApiError {
                status_code,
                message,
            } => {
                assert_eq!(status_code, 404);
                assert_eq!(message, "model 'nope' not found");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn lists_models_from_tags() {
        let base_url = serve_once(
            "200 OK",
            "application/json",
            r#"{"models":[{"name":"llama3:latest","modified_at":"x"},{"name":"qwen2:0.5b"}]}"#
                .to_string(),
        )
        .await;

        let provider = OllamaProvider::new(&base_url, Duration::from_secs(5));
        let models = provider.list_models().await.unwrap();
        assert_eq!(models, vec!["llama3:latest", "qwen2:0.5b"]);
    }

    #[tokio::test]
    async fn unreachable_backend_is_unavailable() {
        // Bind then drop to get a port with nothing listening.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let provider = OllamaProvider::new(format!("http://{addr}"), Duration::from_secs(5));
        let err = provider
            .stream(ProviderRequest::new("llama3", "sys", "User: hi"))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Unavailable(_)));
    }

    #[test]
    fn trailing_slash_trimmed() {
        let provider = OllamaProvider::new("http://localhost:11434/", Duration::from_secs(1));
        assert_eq!(provider.base_url(), "http://localhost:11434");
    }
}
