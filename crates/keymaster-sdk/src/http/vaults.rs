/*
[INPUT]:  Vault DIDs, member DIDs, item names and item bytes
[OUTPUT]: Vault DIDs, vault records, member/item indexes and item content
[POS]:    HTTP layer - group vault endpoints
[UPDATE]: When group vault endpoints change
*/

use reqwest::Method;
use serde_json::{Value, json};

use crate::http::{KeymasterClient, Result};
use crate::types::{GroupVaultOptions, ResolveDidOptions};

impl KeymasterClient {
    /// POST /groupVaults
    pub async fn create_group_vault(&self, options: &GroupVaultOptions) -> Result<String> {
        let builder = self
            .request(Method::POST, &["groupVaults"])?
            .json(&json!({ "options": options }));
        self.send_for_field(builder, "did").await
    }

    /// GET /groupVaults/{id}
    pub async fn get_group_vault(
        &self,
        id: &str,
        options: Option<&ResolveDidOptions>,
    ) -> Result<Value> {
        let mut builder = self.request(Method::GET, &["groupVaults", id])?;
        if let Some(options) = options {
            builder = builder.query(options);
        }
        self.send_for_field(builder, "groupVault").await
    }

    /// POST /groupVaults/{id}/test
    pub async fn test_group_vault(
        &self,
        id: &str,
        options: Option<&ResolveDidOptions>,
    ) -> Result<bool> {
        let body = match options {
            Some(options) => json!({ "options": options }),
            None => json!({}),
        };

        let builder = self
            .request(Method::POST, &["groupVaults", id, "test"])?
            .json(&body);
        self.send_for_field(builder, "test").await
    }

    /// POST /groupVaults/{vault}/members
    pub async fn add_group_vault_member(&self, vault_id: &str, member_id: &str) -> Result<bool> {
        let builder = self
            .request(Method::POST, &["groupVaults", vault_id, "members"])?
            .json(&json!({ "memberId": member_id }));
        self.send_for_field(builder, "ok").await
    }

    /// DELETE /groupVaults/{vault}/members/{member}
    pub async fn remove_group_vault_member(&self, vault_id: &str, member_id: &str) -> Result<bool> {
        let builder = self.request(
            Method::DELETE,
            &["groupVaults", vault_id, "members", member_id],
        )?;
        self.send_for_field(builder, "ok").await
    }

    /// Member index keyed by member DID
    ///
    /// GET /groupVaults/{vault}/members
    pub async fn list_group_vault_members(&self, vault_id: &str) -> Result<Value> {
        let builder = self.request(Method::GET, &["groupVaults", vault_id, "members"])?;
        self.send_for_field(builder, "members").await
    }

    /// Store `data` under `name` in the vault
    ///
    /// POST /groupVaults/{vault}/items (octet-stream, `{"name": ..}` in X-Options)
    pub async fn add_group_vault_item(&self, vault_id: &str, name: &str, data: Vec<u8>) -> Result<bool> {
        let builder = self.octet_request(
            Method::POST,
            &["groupVaults", vault_id, "items"],
            data,
            Some(&json!({ "name": name })),
        )?;
        self.send_for_field(builder, "ok").await
    }

    /// DELETE /groupVaults/{vault}/items/{name}
    pub async fn remove_group_vault_item(&self, vault_id: &str, name: &str) -> Result<bool> {
        let builder = self.request(Method::DELETE, &["groupVaults", vault_id, "items", name])?;
        self.send_for_field(builder, "ok").await
    }

    /// Item index keyed by item name
    ///
    /// GET /groupVaults/{vault}/items
    pub async fn list_group_vault_items(
        &self,
        vault_id: &str,
        options: Option<&ResolveDidOptions>,
    ) -> Result<Value> {
        let mut builder = self.request(Method::GET, &["groupVaults", vault_id, "items"])?;
        if let Some(options) = options {
            builder = builder.query(options);
        }
        self.send_for_field(builder, "items").await
    }

    /// Decrypted item content; `None` when the item is missing or empty
    ///
    /// GET /groupVaults/{vault}/items/{name}
    pub async fn get_group_vault_item(
        &self,
        vault_id: &str,
        name: &str,
        options: Option<&ResolveDidOptions>,
    ) -> Result<Option<Vec<u8>>> {
        let mut builder = self.request(Method::GET, &["groupVaults", vault_id, "items", name])?;
        if let Some(options) = options {
            builder = builder.query(options);
        }
        self.send_optional_bytes(builder).await
    }
}
