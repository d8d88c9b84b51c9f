//! Wallet and earnings operations.

use serde_json::Value;
use vendorlink_domain::{
    RequestDescriptor,
    vendor::{DateRange, WithdrawalRequest},
};

use super::VendorApi;
use crate::error::ApiResult;
use crate::ports::HttpTransport;
use crate::retry::RetryPolicy;

impl<T: HttpTransport> VendorApi<T> {
    /// Fetches the wallet balance.
    ///
    /// # Errors
    ///
    /// Returns the classified request error.
    pub async fn wallet_balance(&self) -> ApiResult<Value> {
        self.pipeline
            .fetch_record(&RequestDescriptor::get("/wallet"))
            .await
    }

    /// Lists wallet transactions, newest first.
    ///
    /// # Errors
    ///
    /// Returns the classified request error.
    pub async fn wallet_transactions(&self, page: Option<u32>) -> ApiResult<Vec<Value>> {
        let mut request = RequestDescriptor::get("/wallet/transactions");
        if let Some(page) = page {
            request = request.query("page", page);
        }
        self.pipeline.fetch_records(&request).await
    }

    /// Fetches the earnings summary, optionally for a date range.
    ///
    /// # Errors
    ///
    /// Returns the classified request error.
    pub async fn earnings_summary(&self, range: Option<DateRange>) -> ApiResult<Value> {
        let mut request = RequestDescriptor::get("/wallet/earnings");
        if let Some(range) = range {
            request.query = range.query_pairs();
        }
        self.pipeline.fetch_record(&request).await
    }

    /// Requests a payout from the wallet.
    ///
    /// # Errors
    ///
    /// Returns the classified request error.
    pub async fn request_withdrawal(&self, withdrawal: WithdrawalRequest) -> ApiResult<Value> {
        let request =
            RequestDescriptor::post("/wallet/withdrawals").payload(&withdrawal.to_payload());
        // A payout must not be submitted twice.
        let response = self
            .pipeline
            .send_with_policy(&request, &RetryPolicy::no_retry())
            .await?;
        Ok(response.record())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::super::testing::api;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use vendorlink_domain::vendor::{DateRange, WithdrawalRequest};

    #[tokio::test]
    async fn test_concurrent_wallet_and_earnings() {
        let (api, recorder, _) = api(vec![
            (200, json!({"data": {"balance": 120.5}})),
            (200, json!({"data": {"total": 900}})),
        ]);
        let (balance, earnings) = tokio::join!(api.wallet_balance(), api.earnings_summary(None));
        let balance = balance.unwrap();
        let earnings = earnings.unwrap();
        assert!(balance.get("balance").is_some() || balance.get("total").is_some());
        assert!(earnings.get("balance").is_some() || earnings.get("total").is_some());
        assert_eq!(recorder.count(), 2);
    }

    #[tokio::test]
    async fn test_earnings_range_query() {
        let (api, recorder, _) = api(vec![]);
        let range = DateRange::new(
            chrono::NaiveDate::from_ymd_opt(2026, 5, 1).unwrap(),
            chrono::NaiveDate::from_ymd_opt(2026, 5, 31).unwrap(),
        )
        .unwrap();
        api.earnings_summary(Some(range)).await.unwrap();
        assert_eq!(
            recorder.last().query,
            vec![
                ("from".to_string(), "2026-05-01".to_string()),
                ("to".to_string(), "2026-05-31".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_transactions_page_and_withdrawal() {
        let (api, recorder, _) = api(vec![(200, json!({"data": [{"id": "t1"}]}))]);
        let txs = api.wallet_transactions(Some(3)).await.unwrap();
        assert_eq!(txs, vec![json!({"id": "t1"})]);
        assert_eq!(recorder.last().query, vec![("page".to_string(), "3".to_string())]);

        api.request_withdrawal(WithdrawalRequest::new(50.0).unwrap())
            .await
            .unwrap();
        assert_eq!(recorder.last().url, "https://api.example.com/wallet/withdrawals");
    }

    #[tokio::test]
    async fn test_withdrawal_is_not_retried() {
        let (api, recorder, _) = api(vec![
            (503, json!({"message": "Service unavailable"})),
            (200, json!({"data": {"id": "w1"}})),
        ]);
        let error = api
            .request_withdrawal(WithdrawalRequest::new(25.0).unwrap())
            .await
            .unwrap_err();
        assert_eq!(error.status, Some(503));
        assert_eq!(recorder.count(), 1);
    }
}
