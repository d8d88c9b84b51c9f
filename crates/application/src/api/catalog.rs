//! Menu item and coupon operations.

use serde_json::Value;
use vendorlink_domain::{
    Payload, RequestDescriptor,
    vendor::{CouponInput, MenuItemInput},
};

use super::{VendorApi, path_id};
use crate::error::ApiResult;
use crate::ports::HttpTransport;

impl<T: HttpTransport> VendorApi<T> {
    /// Lists the vendor's menu items.
    ///
    /// # Errors
    ///
    /// Returns the classified request error.
    pub async fn list_menu_items(&self) -> ApiResult<Vec<Value>> {
        self.pipeline
            .fetch_records(&RequestDescriptor::get("/menu-items"))
            .await
    }

    /// Creates a menu item, uploading its photo when one is attached.
    ///
    /// # Errors
    ///
    /// Returns the classified request error.
    pub async fn create_menu_item(&self, input: &MenuItemInput) -> ApiResult<Value> {
        let request = RequestDescriptor::post("/menu-items").payload(&input.to_payload());
        self.pipeline.fetch_record(&request).await
    }

    /// Updates a menu item.
    ///
    /// # Errors
    ///
    /// Returns the classified request error.
    pub async fn update_menu_item(&self, id: &str, input: &MenuItemInput) -> ApiResult<Value> {
        let id = path_id(id)?;
        let request =
            RequestDescriptor::put(format!("/menu-items/{id}")).payload(&input.to_payload());
        self.pipeline.fetch_record(&request).await
    }

    /// Deletes a menu item.
    ///
    /// # Errors
    ///
    /// Returns the classified request error.
    pub async fn delete_menu_item(&self, id: &str) -> ApiResult<()> {
        let id = path_id(id)?;
        self.pipeline
            .send(&RequestDescriptor::delete(format!("/menu-items/{id}")))
            .await
            .map(|_| ())
    }

    /// Marks a menu item as available or sold out.
    ///
    /// # Errors
    ///
    /// Returns the classified request error.
    pub async fn toggle_menu_item(&self, id: &str, available: bool) -> ApiResult<Value> {
        let id = path_id(id)?;
        let request = RequestDescriptor::patch(format!("/menu-items/{id}/availability"))
            .payload(&Payload::new().field("is_available", available));
        self.pipeline.fetch_record(&request).await
    }

    /// Lists the vendor's coupons.
    ///
    /// # Errors
    ///
    /// Returns the classified request error.
    pub async fn list_coupons(&self) -> ApiResult<Vec<Value>> {
        self.pipeline
            .fetch_records(&RequestDescriptor::get("/coupons"))
            .await
    }

    /// Creates a coupon.
    ///
    /// # Errors
    ///
    /// Returns the classified request error; `ValidationFailed` carries
    /// per-field messages.
    pub async fn create_coupon(&self, input: &CouponInput) -> ApiResult<Value> {
        let request = RequestDescriptor::post("/coupons").payload(&input.to_payload());
        self.pipeline.fetch_record(&request).await
    }

    /// Updates a coupon.
    ///
    /// # Errors
    ///
    /// Returns the classified request error.
    pub async fn update_coupon(&self, id: &str, input: &CouponInput) -> ApiResult<Value> {
        let id = path_id(id)?;
        let request = RequestDescriptor::put(format!("/coupons/{id}")).payload(&input.to_payload());
        self.pipeline.fetch_record(&request).await
    }

    /// Deletes a coupon.
    ///
    /// # Errors
    ///
    /// Returns the classified request error.
    pub async fn delete_coupon(&self, id: &str) -> ApiResult<()> {
        let id = path_id(id)?;
        self.pipeline
            .send(&RequestDescriptor::delete(format!("/coupons/{id}")))
            .await
            .map(|_| ())
    }

    /// Activates or pauses a coupon.
    ///
    /// # Errors
    ///
    /// Returns the classified request error.
    pub async fn toggle_coupon(&self, id: &str, active: bool) -> ApiResult<Value> {
        let id = path_id(id)?;
        let request = RequestDescriptor::patch(format!("/coupons/{id}/status"))
            .payload(&Payload::new().field("is_active", active));
        self.pipeline.fetch_record(&request).await
    }
}
