use std::collections::HashMap;
use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use artshare_core::ports::{
  ApiRequest, ApiResponse, FormField, FormValue, HttpTransport, Method, RequestBody, TransportError,
  UploadProgress,
};
use artshare_core::services::SessionStore;
use async_trait::async_trait;
use futures::StreamExt;
use reqwest::header::AUTHORIZATION;
use reqwest::multipart::{Form, Part};
use reqwest::{Body, Client};
use thiserror::Error;
use tracing::trace;

use crate::config::ApiConfig;
use crate::cookies::SessionCookieJar;

/// File parts are streamed in chunks of this size when progress is tracked.
const UPLOAD_CHUNK: usize = 64 * 1024;

#[derive(Debug, Error)]
pub enum ClientError {
  #[error("failed to build HTTP client: {0}")]
  Build(#[from] reqwest::Error),
}

/// [`HttpTransport`] over a reqwest client.
///
/// Cookies go through a [`SessionCookieJar`], so session cookies set by the
/// login endpoint ride along on later requests and later runs.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
  client: Client,
}

impl ReqwestTransport {
  pub fn new(cfg: &ApiConfig, session: Arc<SessionStore>) -> Result<Self, ClientError> {
    let jar = SessionCookieJar::new(session, &cfg.api_base());
    let mut builder = Client::builder().cookie_provider(Arc::new(jar));
    if let Some(secs) = cfg.timeout_secs {
      builder = builder.timeout(Duration::from_secs(secs));
    }
    Ok(Self { client: builder.build()? })
  }
}

fn to_reqwest_method(method: Method) -> reqwest::Method {
  match method {
    Method::Get => reqwest::Method::GET,
    Method::Post => reqwest::Method::POST,
    Method::Patch => reqwest::Method::PATCH,
    Method::Delete => reqwest::Method::DELETE,
  }
}

/// Counts file bytes as the connection pulls them and reports the running
/// total. Shared by every file part of one form.
#[derive(Debug)]
struct ProgressCounter {
  progress: Arc<dyn UploadProgress>,
  total: u64,
  sent: AtomicU64,
}

impl ProgressCounter {
  fn part(self: &Arc<Self>, bytes: Vec<u8>) -> Part {
    let length = bytes.len() as u64;
    let chunks: Vec<Vec<u8>> = bytes.chunks(UPLOAD_CHUNK).map(<[u8]>::to_vec).collect();

    let counter = Arc::clone(self);
    let stream = futures::stream::iter(chunks).map(move |chunk| {
      let len = chunk.len() as u64;
      let sent = counter.sent.fetch_add(len, Ordering::Relaxed) + len;
      counter.progress.advance(sent, counter.total);
      Ok::<_, io::Error>(chunk)
    });

    Part::stream_with_length(Body::wrap_stream(stream), length)
  }
}

fn file_bytes(fields: &[FormField]) -> u64 {
  fields
    .iter()
    .map(|field| match &field.value {
      FormValue::File(file) => file.bytes.len() as u64,
      FormValue::Text(_) => 0,
    })
    .sum()
}

fn build_form(
  fields: Vec<FormField>,
  counter: Option<&Arc<ProgressCounter>>,
) -> Result<Form, TransportError> {
  let mut form = Form::new();
  for field in fields {
    form = match field.value {
      FormValue::Text(text) => form.text(field.name, text),
      FormValue::File(file) => {
        let part = match counter {
          Some(counter) => counter.part(file.bytes),
          None => Part::bytes(file.bytes),
        };
        let mut part = part.file_name(file.file_name);
        if let Some(mime) = file.mime {
          part = part
            .mime_str(&mime)
            .map_err(|e| TransportError::Request(format!("invalid mime type {mime}: {e}")))?;
        }
        form.part(field.name, part)
      }
    };
  }
  Ok(form)
}

/// No response at all is `Unreachable`; a request that could not be built
/// never left the process.
fn classify(error: reqwest::Error) -> TransportError {
  if error.is_builder() {
    TransportError::Request(error.to_string())
  } else {
    TransportError::Unreachable(error.to_string())
  }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
  async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
    let mut builder = self.client.request(to_reqwest_method(request.method), &request.url);

    if let Some(auth) = &request.authorization {
      builder = builder.header(AUTHORIZATION, auth);
    }

    let mut counter = None;
    builder = match request.body {
      RequestBody::Empty => builder,
      RequestBody::Json(value) => builder.json(&value),
      RequestBody::Multipart(fields) => {
        let total = file_bytes(&fields);
        counter = request
          .progress
          .filter(|_| total > 0)
          .map(|progress| Arc::new(ProgressCounter { progress, total, sent: AtomicU64::new(0) }));
        builder.multipart(build_form(fields, counter.as_ref())?)
      }
    };

    if let Some(counter) = &counter {
      counter.progress.start(counter.total);
    }
    let response = builder.send().await.map_err(classify)?;
    if let Some(counter) = &counter {
      counter.progress.finish();
    }

    let status = response.status().as_u16();
    let headers: HashMap<String, String> = response
      .headers()
      .iter()
      .filter_map(|(name, value)| {
        value.to_str().ok().map(|v| (name.as_str().to_ascii_lowercase(), v.to_string()))
      })
      .collect();

    let body = response
      .bytes()
      .await
      .map_err(|e| TransportError::Request(format!("reading response body: {e}")))?
      .to_vec();

    trace!(url = %request.url, status, bytes = body.len(), "response");
    Ok(ApiResponse { status, headers, body })
  }
}
