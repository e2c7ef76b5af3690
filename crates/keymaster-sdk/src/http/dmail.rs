/*
[INPUT]:  Dmail messages, notice messages, DIDs, tags and attachment bytes
[OUTPUT]: Mailbox listings, message DIDs and attachment content
[POS]:    HTTP layer - dmail and notice endpoints
[UPDATE]: When dmail or notice endpoints change
*/

use std::collections::BTreeMap;

use reqwest::Method;
use serde_json::{Value, json};

use crate::http::{KeymasterClient, Result};
use crate::types::{
    CreateAssetOptions, DmailItem, DmailMessage, GroupVaultOptions, NoticeMessage,
    ResolveDidOptions,
};

impl KeymasterClient {
    /// Mailbox of the current identity keyed by message DID
    ///
    /// GET /dmail
    pub async fn list_dmail(&self) -> Result<BTreeMap<String, DmailItem>> {
        let builder = self.request(Method::GET, &["dmail"])?;
        self.send_for_field(builder, "dmail").await
    }

    /// POST /dmail
    pub async fn create_dmail(
        &self,
        message: &DmailMessage,
        options: &GroupVaultOptions,
    ) -> Result<String> {
        let builder = self
            .request(Method::POST, &["dmail"])?
            .json(&json!({ "message": message, "options": options }));
        self.send_for_field(builder, "did").await
    }

    /// PUT /dmail/{did}
    pub async fn update_dmail(&self, did: &str, message: &DmailMessage) -> Result<bool> {
        let builder = self
            .request(Method::PUT, &["dmail", did])?
            .json(&json!({ "message": message }));
        self.send_for_field(builder, "ok").await
    }

    /// Deliver a dmail; returns the notice DID, if one was created
    ///
    /// POST /dmail/{did}/send
    pub async fn send_dmail(&self, did: &str) -> Result<Option<String>> {
        let builder = self.request(Method::POST, &["dmail", did, "send"])?;
        self.send_for_field(builder, "did").await
    }

    /// Replace the tags of a mailbox entry
    ///
    /// POST /dmail/{did}/file
    pub async fn file_dmail(&self, did: &str, tags: &[String]) -> Result<bool> {
        let builder = self
            .request(Method::POST, &["dmail", did, "file"])?
            .json(&json!({ "tags": tags }));
        self.send_for_field(builder, "ok").await
    }

    /// DELETE /dmail/{did}
    pub async fn remove_dmail(&self, did: &str) -> Result<bool> {
        let builder = self.request(Method::DELETE, &["dmail", did])?;
        self.send_for_field(builder, "ok").await
    }

    /// POST /dmail/import
    pub async fn import_dmail(&self, did: &str) -> Result<bool> {
        let builder = self
            .request(Method::POST, &["dmail", "import"])?
            .json(&json!({ "did": did }));
        self.send_for_field(builder, "ok").await
    }

    /// GET /dmail/{did}
    pub async fn get_dmail_message(
        &self,
        did: &str,
        options: Option<&ResolveDidOptions>,
    ) -> Result<Option<DmailMessage>> {
        let mut builder = self.request(Method::GET, &["dmail", did])?;
        if let Some(options) = options {
            builder = builder.query(options);
        }
        self.send_for_field(builder, "message").await
    }

    /// GET /dmail/{did}/attachments
    pub async fn list_dmail_attachments(
        &self,
        did: &str,
        options: Option<&ResolveDidOptions>,
    ) -> Result<Value> {
        let mut builder = self.request(Method::GET, &["dmail", did, "attachments"])?;
        if let Some(options) = options {
            builder = builder.query(options);
        }
        self.send_for_field(builder, "attachments").await
    }

    /// POST /dmail/{did}/attachments (octet-stream, `{"name": ..}` in X-Options)
    pub async fn add_dmail_attachment(&self, did: &str, name: &str, data: Vec<u8>) -> Result<bool> {
        let builder = self.octet_request(
            Method::POST,
            &["dmail", did, "attachments"],
            data,
            Some(&json!({ "name": name })),
        )?;
        self.send_for_field(builder, "ok").await
    }

    /// DELETE /dmail/{did}/attachments/{name}
    pub async fn remove_dmail_attachment(&self, did: &str, name: &str) -> Result<bool> {
        let builder = self.request(Method::DELETE, &["dmail", did, "attachments", name])?;
        self.send_for_field(builder, "ok").await
    }

    /// GET /dmail/{did}/attachments/{name}
    pub async fn get_dmail_attachment(&self, did: &str, name: &str) -> Result<Option<Vec<u8>>> {
        let builder = self.request(Method::GET, &["dmail", did, "attachments", name])?;
        self.send_optional_bytes(builder).await
    }

    /// POST /notices
    pub async fn create_notice(
        &self,
        message: &NoticeMessage,
        options: &CreateAssetOptions,
    ) -> Result<String> {
        let builder = self
            .request(Method::POST, &["notices"])?
            .json(&json!({ "message": message, "options": options }));
        self.send_for_field(builder, "did").await
    }

    /// PUT /notices/{did}
    pub async fn update_notice(&self, did: &str, message: &NoticeMessage) -> Result<bool> {
        let builder = self
            .request(Method::PUT, &["notices", did])?
            .json(&json!({ "message": message }));
        self.send_for_field(builder, "ok").await
    }

    /// Import pending notices addressed to the current identity
    ///
    /// POST /notices/refresh
    pub async fn refresh_notices(&self) -> Result<bool> {
        let builder = self.request(Method::POST, &["notices", "refresh"])?;
        self.send_for_field(builder, "ok").await
    }
}
