/*
[INPUT]:  Wallet documents and mnemonic phrases
[OUTPUT]: Server-side wallet state and maintenance results
[POS]:    HTTP layer - wallet and registry endpoints
[UPDATE]: When wallet endpoints change
*/

use reqwest::Method;
use serde::Serialize;
use serde_json::{Value, json};

use crate::http::{KeymasterClient, Result};
use crate::types::{CheckWalletResult, FixWalletResult};

impl KeymasterClient {
    /// GET /wallet
    pub async fn load_wallet(&self) -> Result<Value> {
        let builder = self.request(Method::GET, &["wallet"])?;
        self.send_for_field(builder, "wallet").await
    }

    /// PUT /wallet
    pub async fn save_wallet<W>(&self, wallet: &W) -> Result<bool>
    where
        W: Serialize + ?Sized,
    {
        let wallet = serde_json::to_value(wallet)?;
        let builder = self
            .request(Method::PUT, &["wallet"])?
            .json(&json!({ "wallet": wallet }));
        self.send_for_field(builder, "ok").await
    }

    /// Create a wallet, from `mnemonic` when given
    ///
    /// POST /wallet/new
    pub async fn new_wallet(&self, mnemonic: Option<&str>, overwrite: bool) -> Result<Value> {
        let mut body = json!({ "overwrite": overwrite });
        if let Some(mnemonic) = mnemonic {
            body["mnemonic"] = json!(mnemonic);
        }

        let builder = self.request(Method::POST, &["wallet", "new"])?.json(&body);
        self.send_for_field(builder, "wallet").await
    }

    /// POST /wallet/backup
    pub async fn backup_wallet(&self) -> Result<bool> {
        let builder = self.request(Method::POST, &["wallet", "backup"])?;
        self.send_for_field(builder, "ok").await
    }

    /// POST /wallet/recover
    pub async fn recover_wallet(&self) -> Result<Value> {
        let builder = self.request(Method::POST, &["wallet", "recover"])?;
        self.send_for_field(builder, "wallet").await
    }

    /// POST /wallet/check
    pub async fn check_wallet(&self) -> Result<CheckWalletResult> {
        let builder = self.request(Method::POST, &["wallet", "check"])?;
        self.send_for_field(builder, "check").await
    }

    /// POST /wallet/fix
    pub async fn fix_wallet(&self) -> Result<FixWalletResult> {
        let builder = self.request(Method::POST, &["wallet", "fix"])?;
        self.send_for_field(builder, "fix").await
    }

    /// GET /wallet/mnemonic
    pub async fn decrypt_mnemonic(&self) -> Result<String> {
        let builder = self.request(Method::GET, &["wallet", "mnemonic"])?;
        self.send_for_field(builder, "mnemonic").await
    }

    /// GET /export/wallet/encrypted
    pub async fn export_encrypted_wallet(&self) -> Result<Value> {
        let builder = self.request(Method::GET, &["export", "wallet", "encrypted"])?;
        self.send_for_field(builder, "wallet").await
    }

    /// GET /registries
    pub async fn list_registries(&self) -> Result<Vec<String>> {
        let builder = self.request(Method::GET, &["registries"])?;
        self.send_for_field(builder, "registries").await
    }
}
