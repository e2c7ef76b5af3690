/*
[INPUT]:  Asset data, image/document bytes and asset options
[OUTPUT]: Asset DIDs, resolved asset data and raw CAS content
[POS]:    HTTP layer - asset, image, document and CAS endpoints
[UPDATE]: When asset endpoints change
*/

// ### Assets

use reqwest::Method;
use serde::Serialize;
use serde_json::{Value, json};

use crate::http::{KeymasterClient, Result};
use crate::types::{CreateAssetOptions, FileAsset, FileAssetOptions, ImageAsset, ResolveDidOptions};

impl KeymasterClient {
    /// Create an asset holding `data` and return its DID
    ///
    /// POST /assets
    pub async fn create_asset<D>(&self, data: &D, options: &CreateAssetOptions) -> Result<String>
    where
        D: Serialize + ?Sized,
    {
        let data = serde_json::to_value(data)?;
        let builder = self
            .request(Method::POST, &["assets"])?
            .json(&json!({ "data": data, "options": options }));
        self.send_for_field(builder, "did").await
    }

    /// POST /assets/{id}/clone
    pub async fn clone_asset(&self, id: &str, options: &CreateAssetOptions) -> Result<String> {
        let builder = self
            .request(Method::POST, &["assets", id, "clone"])?
            .json(&json!({ "options": options }));
        self.send_for_field(builder, "did").await
    }

    /// GET /assets
    pub async fn list_assets(&self) -> Result<Vec<String>> {
        let builder = self.request(Method::GET, &["assets"])?;
        self.send_for_field(builder, "assets").await
    }

    /// GET /assets/{id}
    pub async fn resolve_asset(
        &self,
        id: &str,
        options: Option<&ResolveDidOptions>,
    ) -> Result<Option<Value>> {
        let mut builder = self.request(Method::GET, &["assets", id])?;
        if let Some(options) = options {
            builder = builder.query(options);
        }
        self.send_for_field(builder, "asset").await
    }

    /// PUT /assets/{id}
    pub async fn update_asset<D>(&self, id: &str, data: &D) -> Result<bool>
    where
        D: Serialize + ?Sized,
    {
        let data = serde_json::to_value(data)?;
        let builder = self
            .request(Method::PUT, &["assets", id])?
            .json(&json!({ "data": data }));
        self.send_for_field(builder, "ok").await
    }

    /// Hand control of an asset to another DID
    ///
    /// POST /assets/{id}/transfer
    pub async fn transfer_asset(&self, id: &str, controller: &str) -> Result<bool> {
        let builder = self
            .request(Method::POST, &["assets", id, "transfer"])?
            .json(&json!({ "controller": controller }));
        self.send_for_field(builder, "ok").await
    }

    // ### Images

    /// POST /images (octet-stream, options in X-Options)
    pub async fn create_image(&self, data: Vec<u8>, options: &CreateAssetOptions) -> Result<String> {
        let builder = self.octet_request(Method::POST, &["images"], data, Some(options))?;
        self.send_for_field(builder, "did").await
    }

    /// PUT /images/{id} (octet-stream)
    pub async fn update_image(&self, id: &str, data: Vec<u8>) -> Result<bool> {
        let builder = self.octet_request::<Value>(Method::PUT, &["images", id], data, None)?;
        self.send_for_field(builder, "ok").await
    }

    /// GET /images/{id}
    pub async fn get_image(&self, id: &str) -> Result<Option<ImageAsset>> {
        let builder = self.request(Method::GET, &["images", id])?;
        self.send_for_field(builder, "image").await
    }

    /// POST /images/{id}/test
    pub async fn test_image(&self, id: &str) -> Result<bool> {
        let builder = self.request(Method::POST, &["images", id, "test"])?;
        self.send_for_field(builder, "test").await
    }

    // ### Documents

    /// POST /documents (octet-stream, options in X-Options)
    pub async fn create_document(&self, data: Vec<u8>, options: &FileAssetOptions) -> Result<String> {
        let builder = self.octet_request(Method::POST, &["documents"], data, Some(options))?;
        self.send_for_field(builder, "did").await
    }

    /// PUT /documents/{id} (octet-stream, options in X-Options)
    pub async fn update_document(
        &self,
        id: &str,
        data: Vec<u8>,
        options: &FileAssetOptions,
    ) -> Result<bool> {
        let builder = self.octet_request(Method::PUT, &["documents", id], data, Some(options))?;
        self.send_for_field(builder, "ok").await
    }

    /// GET /documents/{id}
    pub async fn get_document(&self, id: &str) -> Result<Option<FileAsset>> {
        let builder = self.request(Method::GET, &["documents", id])?;
        self.send_for_field(builder, "document").await
    }

    /// POST /documents/{id}/test
    pub async fn test_document(&self, id: &str) -> Result<bool> {
        let builder = self.request(Method::POST, &["documents", id, "test"])?;
        self.send_for_field(builder, "test").await
    }

    /// Raw content-addressed data; `None` when the CID is unknown
    ///
    /// GET /cas/data/{cid}
    pub async fn get_data(&self, cid: &str) -> Result<Option<Vec<u8>>> {
        let builder = self.request(Method::GET, &["cas", "data", cid])?;
        self.send_optional_bytes(builder).await
    }
}
