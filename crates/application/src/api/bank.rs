//! Payout bank details.

use serde_json::Value;
use vendorlink_domain::{
    RequestDescriptor,
    vendor::{BankDetailsInput, BankDetailsOutcome},
};

use super::VendorApi;
use crate::error::{ApiResult, field_errors};
use crate::ports::HttpTransport;

const UNPROCESSABLE: u16 = 422;

impl<T: HttpTransport> VendorApi<T> {
    /// Fetches the stored bank details.
    ///
    /// # Errors
    ///
    /// Returns the classified request error.
    pub async fn bank_details(&self) -> ApiResult<Value> {
        self.pipeline
            .fetch_record(&RequestDescriptor::get("/bank-details"))
            .await
    }

    /// Saves bank details.
    ///
    /// A 422 answer is returned as [`BankDetailsOutcome::Rejected`] with
    /// the per-field messages instead of an error.
    ///
    /// # Errors
    ///
    /// Returns the classified request error for every other failure.
    pub async fn save_bank_details(
        &self,
        input: &BankDetailsInput,
    ) -> ApiResult<BankDetailsOutcome> {
        let request = RequestDescriptor::post("/bank-details")
            .payload(&input.to_payload())
            .accept_status(UNPROCESSABLE);
        let response = self.pipeline.send(&request).await?;
        if response.status == UNPROCESSABLE {
            tracing::debug!("bank details rejected by server");
            return Ok(BankDetailsOutcome::Rejected(field_errors(&response.body)));
        }
        Ok(BankDetailsOutcome::Saved(response.record()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::super::testing::api;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::collections::BTreeMap;
    use vendorlink_domain::vendor::{BankDetailsInput, BankDetailsOutcome};

    fn input() -> BankDetailsInput {
        BankDetailsInput {
            account_holder: "Ana Diaz".into(),
            account_number: "000123".into(),
            bank_name: "First Bank".into(),
            branch_code: "FB001".into(),
        }
    }

    #[tokio::test]
    async fn test_save_returns_saved_record() {
        let (api, recorder, _) = api(vec![(200, json!({"data": {"bank_name": "First Bank"}}))]);
        let outcome = api.save_bank_details(&input()).await.unwrap();
        assert_eq!(
            outcome,
            BankDetailsOutcome::Saved(json!({"bank_name": "First Bank"}))
        );
        assert_eq!(recorder.last().url, "https://api.example.com/bank-details");
    }

    #[tokio::test]
    async fn test_unprocessable_is_a_rejected_outcome() {
        let (api, recorder, _) = api(vec![(
            422,
            json!({"errors": {"account_number": ["Must be 10 digits."]}}),
        )]);
        let outcome = api.save_bank_details(&input()).await.unwrap();
        let expected = BTreeMap::from([(
            "account_number".to_string(),
            vec!["Must be 10 digits.".to_string()],
        )]);
        assert_eq!(outcome, BankDetailsOutcome::Rejected(expected));
        assert_eq!(recorder.count(), 1);
    }

    #[tokio::test]
    async fn test_bank_details_fetch() {
        let (api, _, _) = api(vec![(200, json!({"data": {"account_number": "***123"}}))]);
        let details = api.bank_details().await.unwrap();
        assert_eq!(details["account_number"], "***123");
    }
}
