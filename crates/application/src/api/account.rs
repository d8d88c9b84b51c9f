//! Session, store profile and device registration.

use serde_json::Value;
use vendorlink_domain::{
    Credential, Payload, RequestDescriptor,
    vendor::{DeviceRegistration, LoginInput, ProfileInput},
};

use super::VendorApi;
use crate::error::{ApiError, ApiResult};
use crate::ports::HttpTransport;
use crate::retry::RetryPolicy;

/// Token locations seen in login responses, in lookup order.
const TOKEN_POINTERS: &[&str] = &[
    "/token",
    "/access_token",
    "/data/token",
    "/data/access_token",
];

impl<T: HttpTransport> VendorApi<T> {
    /// Signs in and stores the returned bearer token.
    ///
    /// Returns the vendor record from the response.
    ///
    /// # Errors
    ///
    /// Returns the classified request error, or `UnexpectedError` if the
    /// response has no token or the token cannot be stored.
    pub async fn login(&self, input: &LoginInput) -> ApiResult<Value> {
        let request = RequestDescriptor::post("/auth/login").payload(&input.to_payload());
        let body = self.pipeline.send(&request).await?.body;

        let credential = TOKEN_POINTERS
            .iter()
            .filter_map(|p| body.pointer(p).and_then(Value::as_str))
            .find_map(Credential::new)
            .ok_or_else(|| ApiError::unexpected("The login response did not include a token."))?;

        self.pipeline
            .credentials()
            .save(&credential)
            .await
            .map_err(|e| ApiError::unexpected(format!("Could not store session: {e}")))?;
        tracing::info!("signed in");

        let vendor = body
            .pointer("/vendor")
            .or_else(|| body.pointer("/data/vendor"))
            .or_else(|| body.pointer("/user"))
            .or_else(|| body.pointer("/data/user"))
            .cloned()
            .unwrap_or(Value::Null);
        Ok(vendor)
    }

    /// Signs out. The local session is cleared even if the server call fails.
    ///
    /// # Errors
    ///
    /// Returns `UnexpectedError` only if the local credential cannot be
    /// cleared.
    pub async fn logout(&self) -> ApiResult<()> {
        if let Err(e) = self
            .pipeline
            .send_with_policy(
                &RequestDescriptor::post("/auth/logout"),
                &RetryPolicy::no_retry(),
            )
            .await
        {
            tracing::debug!(error = %e, "server-side logout failed");
        }
        self.pipeline
            .credentials()
            .clear()
            .await
            .map_err(|e| ApiError::unexpected(format!("Could not clear session: {e}")))
    }

    /// Fetches the store profile.
    ///
    /// # Errors
    ///
    /// Returns the classified request error.
    pub async fn profile(&self) -> ApiResult<Value> {
        self.pipeline
            .fetch_record(&RequestDescriptor::get("/vendor/profile"))
            .await
    }

    /// Updates the store profile; uploads logo/cover when provided.
    ///
    /// # Errors
    ///
    /// Returns the classified request error.
    pub async fn update_profile(&self, input: &ProfileInput) -> ApiResult<Value> {
        let request = RequestDescriptor::post("/vendor/profile").payload(&input.to_payload());
        self.pipeline.fetch_record(&request).await
    }

    /// Opens or closes the store for new orders.
    ///
    /// # Errors
    ///
    /// Returns the classified request error.
    pub async fn toggle_store_status(&self, open: bool) -> ApiResult<Value> {
        let request = RequestDescriptor::patch("/vendor/status")
            .payload(&Payload::new().field("is_open", open));
        self.pipeline.fetch_record(&request).await
    }

    /// Registers the device's push token with the backend.
    ///
    /// # Errors
    ///
    /// Returns the classified request error.
    pub async fn register_device_token(&self, registration: &DeviceRegistration) -> ApiResult<()> {
        let request = RequestDescriptor::post("/devices").payload(&registration.to_payload());
        self.pipeline.send(&request).await.map(|_| ())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::super::testing::api;
    use crate::ApiErrorKind;
    use crate::ports::CredentialStore;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use vendorlink_domain::{
        Credential, FilePart, HttpMethod, RequestBody,
        vendor::{DevicePlatform, DeviceRegistration, LoginInput, ProfileInput},
    };

    fn login_input() -> LoginInput {
        LoginInput {
            login: "shop@example.com".into(),
            password: "pw".into(),
        }
    }

    #[tokio::test]
    async fn test_login_stores_token() {
        let (api, recorder, store) = api(vec![(
            200,
            json!({"data": {"token": "new-token", "vendor": {"id": 3}}}),
        )]);
        let vendor = api.login(&login_input()).await.unwrap();

        assert_eq!(vendor, json!({"id": 3}));
        assert_eq!(store.load().await.unwrap(), Credential::new("new-token"));
        assert_eq!(recorder.last().url, "https://api.example.com/auth/login");
    }

    #[tokio::test]
    async fn test_login_without_token_fails() {
        let (api, _, store) = api(vec![(200, json!({"message": "ok"}))]);
        let error = api.login(&login_input()).await.unwrap_err();
        assert_eq!(error.kind, ApiErrorKind::UnexpectedError);
        assert_eq!(store.load().await.unwrap(), Credential::new("tok"));
    }

    #[tokio::test]
    async fn test_logout_clears_even_when_server_fails() {
        let (api, recorder, store) = api(vec![(500, json!({}))]);
        api.logout().await.unwrap();
        assert!(store.load().await.unwrap().is_none());
        assert_eq!(recorder.count(), 1);
    }

    #[tokio::test]
    async fn test_update_profile_with_logo_is_multipart() {
        let (api, recorder, _) = api(vec![(200, json!({"data": {"store_name": "Deli"}}))]);
        let input = ProfileInput {
            store_name: Some("Deli".into()),
            logo: Some(FilePart::new("/tmp/logo.png")),
            ..ProfileInput::default()
        };
        let record = api.update_profile(&input).await.unwrap();
        assert_eq!(record, json!({"store_name": "Deli"}));
        assert!(matches!(recorder.last().body, RequestBody::Multipart(_)));
    }

    #[tokio::test]
    async fn test_toggle_store_status() {
        let (api, recorder, _) = api(vec![]);
        api.toggle_store_status(false).await.unwrap();
        let sent = recorder.last();
        assert_eq!(sent.method, HttpMethod::Patch);
        assert_eq!(sent.body, RequestBody::Json(json!({"is_open": false})));
    }

    #[tokio::test]
    async fn test_register_device() {
        let (api, recorder, _) = api(vec![]);
        api.register_device_token(&DeviceRegistration {
            token: "fcm-1".into(),
            platform: DevicePlatform::Android,
        })
        .await
        .unwrap();
        assert_eq!(
            recorder.last().body,
            RequestBody::Json(json!({"device_token": "fcm-1", "platform": "android"}))
        );
    }
}
