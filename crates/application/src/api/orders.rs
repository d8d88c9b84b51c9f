//! Order operations.

use serde_json::Value;
use vendorlink_domain::{
    Payload, RequestDescriptor,
    vendor::{AcceptOrder, OrderFilter, OrderStatus, RejectOrder},
};

use super::{VendorApi, path_id};
use crate::error::ApiResult;
use crate::ports::HttpTransport;

impl<T: HttpTransport> VendorApi<T> {
    /// Lists orders matching a filter.
    ///
    /// # Errors
    ///
    /// Returns the classified request error.
    pub async fn list_orders(&self, filter: &OrderFilter) -> ApiResult<Vec<Value>> {
        let mut request = RequestDescriptor::get("/orders");
        request.query = filter.query_pairs();
        self.pipeline.fetch_records(&request).await
    }

    /// Fetches a single order.
    ///
    /// # Errors
    ///
    /// Returns the classified request error.
    pub async fn order(&self, id: &str) -> ApiResult<Value> {
        let id = path_id(id)?;
        self.pipeline
            .fetch_record(&RequestDescriptor::get(format!("/orders/{id}")))
            .await
    }

    /// Accepts an order with an estimated preparation time.
    ///
    /// # Errors
    ///
    /// Returns the classified request error.
    pub async fn accept_order(&self, id: &str, decision: AcceptOrder) -> ApiResult<Value> {
        let id = path_id(id)?;
        let request =
            RequestDescriptor::post(format!("/orders/{id}/accept")).payload(&decision.to_payload());
        self.pipeline.fetch_record(&request).await
    }

    /// Rejects an order.
    ///
    /// # Errors
    ///
    /// Returns the classified request error.
    pub async fn reject_order(&self, id: &str, decision: &RejectOrder) -> ApiResult<Value> {
        let id = path_id(id)?;
        let request =
            RequestDescriptor::post(format!("/orders/{id}/reject")).payload(&decision.to_payload());
        self.pipeline.fetch_record(&request).await
    }

    /// Moves an order to a new status (preparing, ready, ...).
    ///
    /// # Errors
    ///
    /// Returns the classified request error.
    pub async fn update_order_status(&self, id: &str, status: OrderStatus) -> ApiResult<Value> {
        let id = path_id(id)?;
        let request = RequestDescriptor::patch(format!("/orders/{id}/status"))
            .payload(&Payload::new().field("status", status.as_str()));
        self.pipeline.fetch_record(&request).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::super::testing::api;
    use crate::ApiErrorKind;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use vendorlink_domain::{
        HttpMethod, RequestBody,
        vendor::{AcceptOrder, OrderFilter, OrderStatus, RejectOrder},
    };

    #[tokio::test]
    async fn test_list_orders_sends_filter_and_normalizes() {
        let (api, recorder, _) = api(vec![(
            200,
            json!({"data": {"data": [{"id": 1}, {"id": 2}], "total": 2}}),
        )]);
        let orders = api
            .list_orders(&OrderFilter::status(OrderStatus::Pending))
            .await
            .unwrap();
        assert_eq!(orders.len(), 2);
        let sent = recorder.last();
        assert_eq!(sent.url, "https://api.example.com/orders");
        assert_eq!(
            sent.query,
            vec![("status".to_string(), "pending".to_string())]
        );
    }

    #[tokio::test]
    async fn test_reject_uses_single_endpoint() {
        let (api, recorder, _) = api(vec![(404, json!({"message": "No such order"}))]);
        let error = api
            .reject_order(
                "17",
                &RejectOrder {
                    reason: "Closed".into(),
                },
            )
            .await
            .unwrap_err();
        assert_eq!(error.kind, ApiErrorKind::RequestFailed);
        assert_eq!(recorder.count(), 1);
        assert_eq!(recorder.last().url, "https://api.example.com/orders/17/reject");
    }

    #[tokio::test]
    async fn test_accept_order() {
        let (api, recorder, _) = api(vec![(200, json!({"data": {"id": 4, "status": "accepted"}}))]);
        let order = api
            .accept_order(
                "4",
                AcceptOrder {
                    preparation_minutes: 15,
                },
            )
            .await
            .unwrap();
        assert_eq!(order["status"], "accepted");
        assert_eq!(
            recorder.last().body,
            RequestBody::Json(json!({"preparation_time": 15}))
        );
    }

    #[tokio::test]
    async fn test_update_status() {
        let (api, recorder, _) = api(vec![]);
        api.update_order_status("4", OrderStatus::Ready).await.unwrap();
        let sent = recorder.last();
        assert_eq!(sent.method, HttpMethod::Patch);
        assert_eq!(sent.body, RequestBody::Json(json!({"status": "ready"})));
    }

    #[tokio::test]
    async fn test_invalid_id_is_rejected_locally() {
        let (api, recorder, _) = api(vec![]);
        let error = api.order("").await.unwrap_err();
        assert_eq!(error.kind, ApiErrorKind::UnexpectedError);
        assert_eq!(recorder.count(), 0);
    }
}
