/*
[INPUT]:  Plaintext messages, JSON documents and receiver DIDs
[OUTPUT]: Encrypted-asset DIDs, decrypted payloads and signatures
[POS]:    HTTP layer - key rotation, encryption and signing endpoints
[UPDATE]: When key endpoints change
*/

use reqwest::Method;
use serde::Serialize;
use serde_json::{Value, json};

use crate::http::{KeymasterClient, Result};
use crate::types::EncryptOptions;

impl KeymasterClient {
    /// POST /keys/rotate
    pub async fn rotate_keys(&self) -> Result<bool> {
        let builder = self.request(Method::POST, &["keys", "rotate"])?;
        self.send_for_field(builder, "ok").await
    }

    /// Encrypt `msg` for `receiver`, returning the DID of the encrypted asset
    ///
    /// POST /keys/encrypt/message
    pub async fn encrypt_message(
        &self,
        msg: &str,
        receiver: &str,
        options: &EncryptOptions,
    ) -> Result<String> {
        let builder = self
            .request(Method::POST, &["keys", "encrypt", "message"])?
            .json(&json!({ "msg": msg, "receiver": receiver, "options": options }));
        self.send_for_field(builder, "did").await
    }

    /// POST /keys/decrypt/message
    pub async fn decrypt_message(&self, did: &str) -> Result<String> {
        let builder = self
            .request(Method::POST, &["keys", "decrypt", "message"])?
            .json(&json!({ "did": did }));
        self.send_for_field(builder, "message").await
    }

    /// POST /keys/encrypt/json
    pub async fn encrypt_json<J>(
        &self,
        json: &J,
        receiver: &str,
        options: &EncryptOptions,
    ) -> Result<String>
    where
        J: Serialize + ?Sized,
    {
        let json = serde_json::to_value(json)?;
        let builder = self
            .request(Method::POST, &["keys", "encrypt", "json"])?
            .json(&json!({ "json": json, "receiver": receiver, "options": options }));
        self.send_for_field(builder, "did").await
    }

    /// POST /keys/decrypt/json
    pub async fn decrypt_json(&self, did: &str) -> Result<Value> {
        let builder = self
            .request(Method::POST, &["keys", "decrypt", "json"])?
            .json(&json!({ "did": did }));
        self.send_for_field(builder, "json").await
    }

    /// Sign a JSON document with the current identity
    ///
    /// POST /keys/sign
    ///
    /// The service expects `contents` as a JSON-encoded string.
    pub async fn add_signature<C>(&self, contents: &C) -> Result<Value>
    where
        C: Serialize + ?Sized,
    {
        let contents = serde_json::to_string(contents)?;
        let builder = self
            .request(Method::POST, &["keys", "sign"])?
            .json(&json!({ "contents": contents }));
        self.send_for_field(builder, "signed").await
    }

    /// POST /keys/verify
    pub async fn verify_signature<J>(&self, json: &J) -> Result<bool>
    where
        J: Serialize + ?Sized,
    {
        let json = serde_json::to_value(json)?;
        let builder = self
            .request(Method::POST, &["keys", "verify"])?
            .json(&json!({ "json": json }));
        self.send_for_field(builder, "ok").await
    }
}
