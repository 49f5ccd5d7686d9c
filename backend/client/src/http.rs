//! reqwest-backed transport.

use anyhow::Context;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use tracing::debug;

use filepost_core::{FileHandle, FormPayload, Transport, TransportResponse, UploadError};

/// Posts multipart forms to a fixed server origin.
pub struct HttpTransport {
    client: Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }

    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Join the origin and the endpoint path with exactly one slash.
    pub fn url_for(&self, endpoint: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        )
    }
}

/// Content type for a part: the handle's own, else a guess from its name.
pub fn content_type_for(file: &FileHandle) -> String {
    match &file.content_type {
        Some(content_type) => content_type.clone(),
        None => mime_guess::from_path(&file.name)
            .first_or_octet_stream()
            .essence_str()
            .to_string(),
    }
}

fn build_form(payload: &FormPayload) -> Result<Form, UploadError> {
    let mut form = Form::new();
    for entry in payload.entries() {
        let file = &entry.file;
        let part = Part::stream_with_length(file.content.clone(), file.len() as u64)
            .file_name(file.name.clone())
            .mime_str(&content_type_for(file))
            .map_err(|e| UploadError::InvalidPart {
                file_name: file.name.clone(),
                message: e.to_string(),
            })?;
        form = form.part(entry.field.clone(), part);
    }
    Ok(form)
}

#[async_trait]
impl Transport for HttpTransport {
    fn name(&self) -> &str {
        "http"
    }

    async fn post(
        &self,
        endpoint: &str,
        payload: &FormPayload,
    ) -> Result<Box<dyn TransportResponse>, UploadError> {
        let url = self.url_for(endpoint);
        let form = build_form(payload)?;

        debug!(url = %url, parts = payload.len(), "Sending multipart request");

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .with_context(|| format!("POST {url} failed"))
            .map_err(|e| UploadError::Transport(format!("{e:#}")))?;

        Ok(Box::new(HttpResponse(response)))
    }
}

struct HttpResponse(reqwest::Response);

#[async_trait]
impl TransportResponse for HttpResponse {
    fn status(&self) -> u16 {
        self.0.status().as_u16()
    }

    async fn text(self: Box<Self>) -> Result<String, UploadError> {
        self.0
            .text()
            .await
            .map_err(|e| UploadError::BodyRead(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use axum::extract::{Multipart, State};
    use axum::http::StatusCode;
    use axum::routing::post;
    use axum::Router;
    use bytes::Bytes;
    use tokio::net::TcpListener;

    use crate::action::{upload_files, UploadOptions};
    use filepost_core::{FileSelection, UploadOutcome, FILE_FIELD};

    #[derive(Debug, Clone, PartialEq)]
    struct ReceivedPart {
        field: String,
        file_name: Option<String>,
        content_type: Option<String>,
        data: Bytes,
    }

    type Received = Arc<Mutex<Vec<Vec<ReceivedPart>>>>;

    async fn receive(
        State(received): State<Received>,
        mut multipart: Multipart,
    ) -> (StatusCode, &'static str) {
        let mut parts = Vec::new();
        while let Ok(Some(field)) = multipart.next_field().await {
            let field_name = field.name().unwrap_or_default().to_string();
            let file_name = field.file_name().map(str::to_string);
            let content_type = field.content_type().map(str::to_string);
            let data = field.bytes().await.unwrap_or_default();
            parts.push(ReceivedPart {
                field: field_name,
                file_name,
                content_type,
                data,
            });
        }
        received.lock().unwrap().push(parts);
        (StatusCode::CREATED, "stored")
    }

    async fn reject() -> (StatusCode, &'static str) {
        (StatusCode::INTERNAL_SERVER_ERROR, "server error")
    }

    /// Serve a throwaway upload endpoint; returns its origin.
    async fn spawn_server(received: Received) -> String {
        let app = Router::new()
            .route("/f/", post(receive))
            .route("/broken/", post(reject))
            .with_state(received);
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[test]
    fn url_joining_handles_slashes() {
        let transport = HttpTransport::new("http://localhost:8080/");
        assert_eq!(transport.url_for("/f/"), "http://localhost:8080/f/");
        assert_eq!(transport.url_for("f/"), "http://localhost:8080/f/");
    }

    #[test]
    fn content_type_guessed_from_name() {
        assert_eq!(content_type_for(&FileHandle::new("photo.png", "x")), "image/png");
        assert_eq!(
            content_type_for(&FileHandle::new("blob.unknownext", "x")),
            "application/octet-stream"
        );
        assert_eq!(
            content_type_for(&FileHandle::new("notes", "x").with_content_type("text/markdown")),
            "text/markdown"
        );
    }

    #[test]
    fn invalid_content_type_is_rejected() {
        let mut payload = FormPayload::new();
        payload.append(FILE_FIELD, FileHandle::new("bad.bin", "x").with_content_type("not a mime"));
        let err = build_form(&payload).unwrap_err();
        assert!(matches!(
            err,
            UploadError::InvalidPart { ref file_name, .. } if file_name == "bad.bin"
        ));
    }

    #[tokio::test]
    async fn server_receives_files_in_order() {
        let received = Received::default();
        let origin = spawn_server(received.clone()).await;
        let transport = HttpTransport::new(origin);

        let selection = FileSelection::new(vec![
            FileHandle::new("first.txt", "one"),
            FileHandle::new("second.json", "{\"n\":2}"),
            FileHandle::new("third.txt", "three"),
        ]);

        let outcome = upload_files(&transport, "/f/", &selection, UploadOptions::default())
            .await
            .unwrap();
        assert_eq!(outcome, UploadOutcome::Success { status: 201 });

        let received = received.lock().unwrap();
        assert_eq!(received.len(), 1);
        let parts = &received[0];
        assert_eq!(parts.len(), 3);
        assert!(parts.iter().all(|p| p.field == FILE_FIELD));

        let names: Vec<_> = parts.iter().filter_map(|p| p.file_name.as_deref()).collect();
        assert_eq!(names, vec!["first.txt", "second.json", "third.txt"]);
        assert_eq!(parts[1].content_type.as_deref(), Some("application/json"));
        assert_eq!(parts[2].data, Bytes::from_static(b"three"));
    }

    #[tokio::test]
    async fn server_failure_body_becomes_diagnostic() {
        let origin = spawn_server(Received::default()).await;
        let transport = HttpTransport::new(origin);
        let selection = FileSelection::new(vec![FileHandle::new("a.txt", "a")]);

        let outcome = upload_files(&transport, "/broken/", &selection, UploadOptions::default())
            .await
            .unwrap();

        assert_eq!(
            outcome,
            UploadOutcome::Failure {
                status: 500,
                diagnostic: "server error".into()
            }
        );
    }

    #[tokio::test]
    async fn refused_connection_is_transport_failure() {
        // Bind then drop to get a port with nothing listening.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let transport = HttpTransport::new(format!("http://{addr}"));
        let selection = FileSelection::new(vec![FileHandle::new("a.txt", "a")]);

        let outcome = upload_files(&transport, "/f/", &selection, UploadOptions::default())
            .await
            .unwrap();

        assert!(matches!(outcome, UploadOutcome::TransportFailed { .. }));
    }
}
