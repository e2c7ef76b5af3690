/*
[INPUT]:  Identity names, DIDs, alias names and resolution options
[OUTPUT]: DIDs, DID documents and alias tables
[POS]:    HTTP layer - identity, name and DID endpoints
[UPDATE]: When identity endpoints change
*/

use std::collections::BTreeMap;

use reqwest::Method;
use serde_json::{Value, json};

use crate::http::{KeymasterClient, KeymasterError, Result};
use crate::types::{CreateIdOptions, ResolveDidOptions};

impl KeymasterClient {
    /// Name of the identity currently in use, if any
    ///
    /// GET /ids/current
    pub async fn get_current_id(&self) -> Result<Option<String>> {
        let builder = self.request(Method::GET, &["ids", "current"])?;
        self.send_for_field(builder, "current").await
    }

    /// PUT /ids/current
    pub async fn set_current_id(&self, name: &str) -> Result<bool> {
        let builder = self
            .request(Method::PUT, &["ids", "current"])?
            .json(&json!({ "name": name }));
        self.send_for_field(builder, "ok").await
    }

    /// GET /ids
    pub async fn list_ids(&self) -> Result<Vec<String>> {
        let builder = self.request(Method::GET, &["ids"])?;
        self.send_for_field(builder, "ids").await
    }

    /// Create a new identity and return its DID
    ///
    /// POST /ids
    pub async fn create_id(&self, name: &str, options: &CreateIdOptions) -> Result<String> {
        let builder = self
            .request(Method::POST, &["ids"])?
            .json(&json!({ "name": name, "options": options }));
        self.send_for_field(builder, "did").await
    }

    /// GET /ids/{id}
    pub async fn resolve_id(&self, id: &str) -> Result<Value> {
        let builder = self.request(Method::GET, &["ids", id])?;
        self.send_for_field(builder, "docs").await
    }

    /// DELETE /ids/{id}
    pub async fn remove_id(&self, id: &str) -> Result<bool> {
        let builder = self.request(Method::DELETE, &["ids", id])?;
        self.send_for_field(builder, "ok").await
    }

    /// POST /ids/{id}/rename
    pub async fn rename_id(&self, id: &str, name: &str) -> Result<bool> {
        let builder = self
            .request(Method::POST, &["ids", id, "rename"])?
            .json(&json!({ "name": name }));
        self.send_for_field(builder, "ok").await
    }

    /// Back up an identity to its DID document; `None` backs up the current identity
    ///
    /// POST /ids/{id}/backup
    pub async fn backup_id(&self, id: Option<&str>) -> Result<bool> {
        let id = match id {
            Some(id) => id.to_string(),
            None => self.get_current_id().await?.ok_or_else(|| {
                KeymasterError::InvalidResponse("no current identity to back up".to_string())
            })?,
        };

        let builder = self.request(Method::POST, &["ids", &id, "backup"])?;
        self.send_for_field(builder, "ok").await
    }

    /// Recover an identity from its DID backup and return its name
    ///
    /// POST /ids/{did}/recover
    pub async fn recover_id(&self, did: &str) -> Result<String> {
        let builder = self.request(Method::POST, &["ids", did, "recover"])?;
        self.send_for_field(builder, "recovered").await
    }

    /// GET /names
    pub async fn list_names(&self) -> Result<BTreeMap<String, String>> {
        let builder = self.request(Method::GET, &["names"])?;
        self.send_for_field(builder, "names").await
    }

    /// POST /names
    pub async fn add_name(&self, name: &str, did: &str) -> Result<bool> {
        let builder = self
            .request(Method::POST, &["names"])?
            .json(&json!({ "name": name, "did": did }));
        self.send_for_field(builder, "ok").await
    }

    /// GET /names/{name}
    pub async fn get_name(&self, name: &str) -> Result<Option<String>> {
        let builder = self.request(Method::GET, &["names", name])?;
        self.send_for_field(builder, "did").await
    }

    /// DELETE /names/{name}
    pub async fn remove_name(&self, name: &str) -> Result<bool> {
        let builder = self.request(Method::DELETE, &["names", name])?;
        self.send_for_field(builder, "ok").await
    }

    /// Resolve a DID, name or alias to its DID document
    ///
    /// GET /did/{id}?atTime=..&atVersion=..&confirm=..&verify=..
    pub async fn resolve_did(&self, id: &str, options: Option<&ResolveDidOptions>) -> Result<Value> {
        let mut builder = self.request(Method::GET, &["did", id])?;
        if let Some(options) = options {
            builder = builder.query(options);
        }
        self.send_for_field(builder, "docs").await
    }

    /// DELETE /did/{id}
    pub async fn revoke_did(&self, id: &str) -> Result<bool> {
        let builder = self.request(Method::DELETE, &["did", id])?;
        self.send_for_field(builder, "ok").await
    }
}
