//! The request pipeline.
//!
//! Every named operation goes through [`RequestPipeline`]:
//!
//! 1. file parts of multipart bodies are normalized once per operation
//! 2. per attempt, the stored credential is read and attached
//! 3. the request is sent with a bounded timeout
//! 4. failures are classified; transient ones are retried with backoff
//! 5. a 401 clears the stored credential as a side effect
//! 6. accepted responses are decoded for the caller

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::sync::Mutex;
use vendorlink_domain::{
    BaseUrl, Credential, RequestBody, RequestDescriptor, ResponseSpec, StatusCode,
    request::{Header, MultipartField, MultipartForm, MultipartValue},
    response::{normalize_record, normalize_records},
};

use crate::error::{ApiError, ApiErrorKind, ApiResult};
use crate::ports::{CredentialStore, HttpTransport, LocatorNormalizer, PreparedRequest};
use crate::retry::{RetryPolicy, with_retry};

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Settings shared by every request of a pipeline.
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    /// Sanitized backend base URL.
    pub base_url: BaseUrl,
    /// Timeout used when a descriptor does not set one.
    pub default_timeout: Duration,
    /// Retry policy applied to every operation.
    pub retry: RetryPolicy,
}

impl PipelineSettings {
    /// Settings with default timeout and retry policy.
    #[must_use]
    pub fn new(base_url: BaseUrl) -> Self {
        Self {
            base_url,
            default_timeout: DEFAULT_TIMEOUT,
            retry: RetryPolicy::default(),
        }
    }
}

/// A response whose status the request accepted.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    /// HTTP status.
    pub status: u16,
    /// Decoded body. Empty bodies are `Null`; non-JSON text is a string.
    pub body: Value,
}

impl ApiResponse {
    /// Returns true for a 2xx status.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        StatusCode::new(self.status).is_success()
    }

    /// Body normalized into a record list.
    #[must_use]
    pub fn records(&self) -> Vec<Value> {
        normalize_records(&self.body)
    }

    /// Body unwrapped into a single record.
    #[must_use]
    pub fn record(self) -> Value {
        normalize_record(self.body)
    }
}

/// Resilient request pipeline over an HTTP transport.
pub struct RequestPipeline<T: HttpTransport> {
    transport: Arc<T>,
    credentials: Arc<dyn CredentialStore>,
    normalizer: Arc<dyn LocatorNormalizer>,
    settings: PipelineSettings,
    clear_lock: Mutex<()>,
}

impl<T: HttpTransport> RequestPipeline<T> {
    /// Creates a pipeline from its collaborators.
    pub fn new(
        transport: Arc<T>,
        credentials: Arc<dyn CredentialStore>,
        normalizer: Arc<dyn LocatorNormalizer>,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            transport,
            credentials,
            normalizer,
            settings,
            clear_lock: Mutex::new(()),
        }
    }

    /// The credential store this pipeline reads from.
    #[must_use]
    pub fn credentials(&self) -> &Arc<dyn CredentialStore> {
        &self.credentials
    }

    /// The pipeline settings.
    #[must_use]
    pub const fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    /// Sends a request, retrying transient failures per the retry policy.
    ///
    /// # Errors
    ///
    /// Returns the classified error of the last attempt, or the first
    /// non-transient one.
    pub async fn send(&self, request: &RequestDescriptor) -> ApiResult<ApiResponse> {
        self.send_with_policy(request, &self.settings.retry).await
    }

    /// Sends a request with an explicit retry policy.
    ///
    /// # Errors
    ///
    /// See [`RequestPipeline::send`].
    pub async fn send_with_policy(
        &self,
        request: &RequestDescriptor,
        policy: &RetryPolicy,
    ) -> ApiResult<ApiResponse> {
        let body = self.prepare_body(&request.body).await;
        let label = request.label();
        with_retry(policy, ApiError::is_transient, |attempt| {
            tracing::debug!(request = %label, attempt, "dispatching");
            self.attempt(request, &body)
        })
        .await
        .inspect_err(|e| {
            tracing::debug!(request = %label, kind = ?e.kind, status = ?e.status, "request failed");
        })
    }

    /// Sends a request and normalizes the envelope into records.
    ///
    /// # Errors
    ///
    /// See [`RequestPipeline::send`].
    pub async fn fetch_records(&self, request: &RequestDescriptor) -> ApiResult<Vec<Value>> {
        Ok(self.send(request).await?.records())
    }

    /// Sends a request and unwraps a single record.
    ///
    /// # Errors
    ///
    /// See [`RequestPipeline::send`].
    pub async fn fetch_record(&self, request: &RequestDescriptor) -> ApiResult<Value> {
        Ok(self.send(request).await?.record())
    }

    /// Normalizes pending file parts. Runs once per operation so retries
    /// reuse the materialized files.
    async fn prepare_body(&self, body: &RequestBody) -> RequestBody {
        let RequestBody::Multipart(form) = body else {
            return body.clone();
        };
        let mut fields = Vec::with_capacity(form.fields.len());
        for field in &form.fields {
            let value = match &field.value {
                MultipartValue::File { part } => MultipartValue::Upload {
                    file: self.normalizer.normalize(part).await,
                },
                other => other.clone(),
            };
            fields.push(MultipartField {
                name: field.name.clone(),
                value,
            });
        }
        RequestBody::Multipart(MultipartForm { fields })
    }

    async fn attempt(
        &self,
        request: &RequestDescriptor,
        body: &RequestBody,
    ) -> ApiResult<ApiResponse> {
        let credential = self.read_credential().await;

        let mut headers = request.effective_headers();
        headers.retain(|h| !h.is("authorization"));
        if let Some(credential) = &credential {
            headers.push(Header::new("Authorization", credential.authorization_value()));
        }
        headers.push(Header::new("Accept", "application/json"));

        let prepared = PreparedRequest {
            method: request.method,
            url: self.settings.base_url.join(&request.path),
            query: request.query.clone(),
            headers,
            body: body.clone(),
            timeout: request.timeout.unwrap_or(self.settings.default_timeout),
        };

        let response = self.transport.send(&prepared).await?;

        if request.accepts(response.status) {
            return decode_accepted(&response);
        }

        let error = ApiError::from_response(&response);
        if error.kind == ApiErrorKind::AuthExpired {
            self.expire_session(credential.as_ref()).await;
        }
        Err(error)
    }

    async fn read_credential(&self) -> Option<Credential> {
        match self.credentials.load().await {
            Ok(credential) => credential,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    "could not read stored credential, sending unauthenticated"
                );
                None
            }
        }
    }

    /// Clears the stored credential if it is still the one that was rejected.
    ///
    /// Concurrent 401s for the same token clear it once; a token saved by a
    /// newer login is left alone. Session data that cannot be read is cleared
    /// too.
    async fn expire_session(&self, rejected: Option<&Credential>) {
        let _guard = self.clear_lock.lock().await;
        let stale = match self.credentials.load().await {
            Ok(current) => current.is_some() && current.as_ref() == rejected,
            Err(e) => {
                tracing::debug!(error = %e, "stored session unreadable");
                true
            }
        };
        if !stale {
            return;
        }
        match self.credentials.clear().await {
            Ok(()) => tracing::info!("session expired, stored credential cleared"),
            Err(e) => tracing::warn!(error = %e, "failed to clear expired credential"),
        }
    }
}

fn decode_accepted(response: &ResponseSpec) -> ApiResult<ApiResponse> {
    if response.is_markup() {
        return Err(ApiError::from_response(response));
    }
    let body = response
        .json_body()
        .unwrap_or_else(|_| Value::String(response.text()));
    Ok(ApiResponse {
        status: response.status,
        body,
    })
}
