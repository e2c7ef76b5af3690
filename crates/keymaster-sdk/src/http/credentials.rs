/*
[INPUT]:  Schemas, credential subjects, verifiable credentials, challenge specs
[OUTPUT]: Schema/credential DIDs, bound credentials and verification results
[POS]:    HTTP layer - schema, agent, credential and challenge/response endpoints
[UPDATE]: When credential flow endpoints change
*/

use reqwest::Method;
use serde::Serialize;
use serde_json::{Value, json};

use crate::http::{KeymasterClient, Result};
use crate::types::{
    BindCredentialOptions, Challenge, ChallengeOptions, ChallengeResponse, CreateAssetOptions,
    CreateResponseOptions, IssueCredentialOptions, PublishOptions, VerifyResponseOptions,
};

impl KeymasterClient {
    // ### Schemas

    /// Create a schema asset; `None` lets the service use its default schema
    ///
    /// POST /schemas
    pub async fn create_schema(
        &self,
        schema: Option<&Value>,
        options: &CreateAssetOptions,
    ) -> Result<String> {
        let mut body = json!({ "options": options });
        if let Some(schema) = schema {
            body["schema"] = schema.clone();
        }

        let builder = self.request(Method::POST, &["schemas"])?.json(&body);
        self.send_for_field(builder, "did").await
    }

    /// GET /schemas/{id}
    pub async fn get_schema(&self, id: &str) -> Result<Option<Value>> {
        let builder = self.request(Method::GET, &["schemas", id])?;
        self.send_for_field(builder, "schema").await
    }

    /// PUT /schemas/{id}
    pub async fn set_schema<S>(&self, id: &str, schema: &S) -> Result<bool>
    where
        S: Serialize + ?Sized,
    {
        let schema = serde_json::to_value(schema)?;
        let builder = self
            .request(Method::PUT, &["schemas", id])?
            .json(&json!({ "schema": schema }));
        self.send_for_field(builder, "ok").await
    }

    /// POST /schemas/{id}/test
    pub async fn test_schema(&self, id: &str) -> Result<bool> {
        let builder = self.request(Method::POST, &["schemas", id, "test"])?;
        self.send_for_field(builder, "test").await
    }

    /// GET /schemas?owner={owner}
    pub async fn list_schemas(&self, owner: Option<&str>) -> Result<Vec<String>> {
        let mut builder = self.request(Method::GET, &["schemas"])?;
        if let Some(owner) = owner {
            builder = builder.query(&[("owner", owner)]);
        }
        self.send_for_field(builder, "schemas").await
    }

    /// Credential template generated from a schema
    ///
    /// POST /schemas/{id}/template
    pub async fn create_template(&self, schema_id: &str) -> Result<Value> {
        let builder = self.request(Method::POST, &["schemas", schema_id, "template"])?;
        self.send_for_field(builder, "template").await
    }

    /// Whether `id` resolves to an agent (identity) DID
    ///
    /// POST /agents/{id}/test
    pub async fn test_agent(&self, id: &str) -> Result<bool> {
        let builder = self.request(Method::POST, &["agents", id, "test"])?;
        self.send_for_field(builder, "test").await
    }

    // ### Credentials

    /// Bind a schema to a subject, producing an unsigned credential
    ///
    /// POST /credentials/bind
    pub async fn bind_credential(
        &self,
        schema: &str,
        subject: &str,
        options: &BindCredentialOptions,
    ) -> Result<Value> {
        let builder = self
            .request(Method::POST, &["credentials", "bind"])?
            .json(&json!({ "schema": schema, "subject": subject, "options": options }));
        self.send_for_field(builder, "credential").await
    }

    /// POST /credentials/issued
    pub async fn issue_credential<C>(
        &self,
        credential: &C,
        options: &IssueCredentialOptions,
    ) -> Result<String>
    where
        C: Serialize + ?Sized,
    {
        let credential = serde_json::to_value(credential)?;
        let builder = self
            .request(Method::POST, &["credentials", "issued"])?
            .json(&json!({ "credential": credential, "options": options }));
        self.send_for_field(builder, "did").await
    }

    /// Notify the subject of an issued credential; returns the notice DID
    ///
    /// POST /credentials/issued/{did}/send
    pub async fn send_credential(
        &self,
        did: &str,
        options: &CreateAssetOptions,
    ) -> Result<Option<String>> {
        let builder = self
            .request(Method::POST, &["credentials", "issued", did, "send"])?
            .json(&json!({ "options": options }));
        self.send_for_field(builder, "did").await
    }

    /// POST /credentials/issued/{did}
    pub async fn update_credential<C>(&self, did: &str, credential: &C) -> Result<bool>
    where
        C: Serialize + ?Sized,
    {
        let credential = serde_json::to_value(credential)?;
        let builder = self
            .request(Method::POST, &["credentials", "issued", did])?
            .json(&json!({ "credential": credential }));
        self.send_for_field(builder, "ok").await
    }

    /// GET /credentials/issued
    pub async fn list_issued(&self) -> Result<Vec<String>> {
        let builder = self.request(Method::GET, &["credentials", "issued"])?;
        self.send_for_field(builder, "issued").await
    }

    /// DELETE /credentials/issued/{did}
    pub async fn revoke_credential(&self, did: &str) -> Result<bool> {
        let builder = self.request(Method::DELETE, &["credentials", "issued", did])?;
        self.send_for_field(builder, "ok").await
    }

    /// GET /credentials/held
    pub async fn list_credentials(&self) -> Result<Vec<String>> {
        let builder = self.request(Method::GET, &["credentials", "held"])?;
        self.send_for_field(builder, "held").await
    }

    /// POST /credentials/held
    pub async fn accept_credential(&self, did: &str) -> Result<bool> {
        let builder = self
            .request(Method::POST, &["credentials", "held"])?
            .json(&json!({ "did": did }));
        self.send_for_field(builder, "ok").await
    }

    /// GET /credentials/held/{did}
    pub async fn get_credential(&self, did: &str) -> Result<Option<Value>> {
        let builder = self.request(Method::GET, &["credentials", "held", did])?;
        self.send_for_field(builder, "credential").await
    }

    /// DELETE /credentials/held/{did}
    pub async fn remove_credential(&self, did: &str) -> Result<bool> {
        let builder = self.request(Method::DELETE, &["credentials", "held", did])?;
        self.send_for_field(builder, "ok").await
    }

    /// Publish a held credential to the holder's DID document
    ///
    /// POST /credentials/held/{did}/publish
    pub async fn publish_credential(&self, did: &str, options: &PublishOptions) -> Result<bool> {
        let builder = self
            .request(Method::POST, &["credentials", "held", did, "publish"])?
            .json(&json!({ "options": options }));
        self.send_for_field(builder, "ok").await
    }

    /// POST /credentials/held/{did}/unpublish
    pub async fn unpublish_credential(&self, did: &str) -> Result<bool> {
        let builder = self.request(Method::POST, &["credentials", "held", did, "unpublish"])?;
        self.send_for_field(builder, "ok").await
    }

    // ### Challenge / response

    /// POST /challenge
    pub async fn create_challenge(
        &self,
        challenge: &Challenge,
        options: &ChallengeOptions,
    ) -> Result<String> {
        let builder = self
            .request(Method::POST, &["challenge"])?
            .json(&json!({ "challenge": challenge, "options": options }));
        self.send_for_field(builder, "did").await
    }

    /// Answer a challenge with the matching held credentials
    ///
    /// POST /response
    pub async fn create_response(
        &self,
        challenge_did: &str,
        options: &CreateResponseOptions,
    ) -> Result<String> {
        let builder = self
            .request(Method::POST, &["response"])?
            .json(&json!({ "challenge": challenge_did, "options": options }));
        self.send_for_field(builder, "did").await
    }

    /// POST /response/verify
    pub async fn verify_response(
        &self,
        response_did: &str,
        options: &VerifyResponseOptions,
    ) -> Result<ChallengeResponse> {
        let builder = self
            .request(Method::POST, &["response", "verify"])?
            .json(&json!({ "response": response_did, "options": options }));
        self.send_for_field(builder, "verify").await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, ResponseTemplate};

    use crate::http::KeymasterError;
    use crate::http::test_support::{json_response, mock_client};
    use crate::types::{
        BindCredentialOptions, Challenge, ChallengeCredential, ChallengeOptions,
        CreateAssetOptions, CreateResponseOptions, IssueCredentialOptions, PublishOptions,
        VerifyResponseOptions,
    };

    #[tokio::test]
    async fn test_create_schema_default_and_explicit() {
        let (server, client) = mock_client().await;
        let schema = json!({ "type": "object", "properties": { "email": { "type": "string" } } });

        Mock::given(method("POST"))
            .and(path("/api/v1/schemas"))
            .and(body_json(json!({ "options": {} })))
            .respond_with(json_response(json!({ "did": "did:test:default-schema" })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/v1/schemas"))
            .and(body_json(json!({ "schema": schema.clone(), "options": {} })))
            .respond_with(json_response(json!({ "did": "did:test:email-schema" })))
            .expect(1)
            .mount(&server)
            .await;

        let options = CreateAssetOptions::default();
        assert_eq!(
            client.create_schema(None, &options).await.unwrap(),
            "did:test:default-schema"
        );
        assert_eq!(
            client.create_schema(Some(&schema), &options).await.unwrap(),
            "did:test:email-schema"
        );
    }

    #[tokio::test]
    async fn test_schema_get_set_test_template() {
        let (server, client) = mock_client().await;

        Mock::given(method("GET"))
            .and(path("/api/v1/schemas/did:test:schema"))
            .respond_with(json_response(json!({ "schema": { "type": "object" } })))
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/api/v1/schemas/did:test:schema"))
            .and(body_json(json!({ "schema": { "type": "string" } })))
            .respond_with(json_response(json!({ "ok": true })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/v1/schemas/did:test:schema/test"))
            .respond_with(json_response(json!({ "test": true })))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/v1/schemas/did:test:schema/template"))
            .respond_with(json_response(json!({ "template": { "$schema": "did:test:schema" } })))
            .mount(&server)
            .await;

        assert_eq!(
            client.get_schema("did:test:schema").await.unwrap(),
            Some(json!({ "type": "object" }))
        );
        assert!(client
            .set_schema("did:test:schema", &json!({ "type": "string" }))
            .await
            .unwrap());
        assert!(client.test_schema("did:test:schema").await.unwrap());
        let template = client.create_template("did:test:schema").await.unwrap();
        assert_eq!(template["$schema"], "did:test:schema");
    }

    #[tokio::test]
    async fn test_list_schemas_with_owner() {
        let (server, client) = mock_client().await;

        Mock::given(method("GET"))
            .and(path("/api/v1/schemas"))
            .and(query_param("owner", "alice"))
            .respond_with(json_response(json!({ "schemas": ["did:test:s1"] })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v1/schemas"))
            .respond_with(json_response(json!({ "schemas": ["did:test:s1", "did:test:s2"] })))
            .expect(1)
            .mount(&server)
            .await;

        assert_eq!(client.list_schemas(Some("alice")).await.unwrap(), vec!["did:test:s1"]);
        assert_eq!(client.list_schemas(None).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_test_agent() {
        let (server, client) = mock_client().await;

        Mock::given(method("POST"))
            .and(path("/api/v1/agents/alice/test"))
            .respond_with(json_response(json!({ "test": true })))
            .expect(1)
            .mount(&server)
            .await;

        assert!(client.test_agent("alice").await.unwrap());
    }

    #[tokio::test]
    async fn test_bind_and_issue_credential() {
        let (server, client) = mock_client().await;
        let bound = json!({
            "type": ["VerifiableCredential", "did:test:schema"],
            "issuer": "did:test:alice",
            "credentialSubject": { "id": "did:test:bob" }
        });

        Mock::given(method("POST"))
            .and(path("/api/v1/credentials/bind"))
            .and(body_json(json!({
                "schema": "did:test:schema",
                "subject": "did:test:bob",
                "options": {}
            })))
            .respond_with(json_response(json!({ "credential": bound.clone() })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/v1/credentials/issued"))
            .and(body_json(json!({ "credential": bound.clone(), "options": { "registry": "local" } })))
            .respond_with(json_response(json!({ "did": "did:test:vc" })))
            .expect(1)
            .mount(&server)
            .await;

        let credential = client
            .bind_credential("did:test:schema", "did:test:bob", &BindCredentialOptions::default())
            .await
            .expect("bind_credential failed");
        assert_eq!(credential, bound);

        let options = IssueCredentialOptions {
            registry: Some("local".to_string()),
            ..Default::default()
        };
        let did = client
            .issue_credential(&credential, &options)
            .await
            .expect("issue_credential failed");
        assert_eq!(did, "did:test:vc");
    }

    #[tokio::test]
    async fn test_issued_credential_lifecycle() {
        let (server, client) = mock_client().await;

        Mock::given(method("POST"))
            .and(path("/api/v1/credentials/issued/did:test:vc/send"))
            .and(body_json(json!({ "options": {} })))
            .respond_with(json_response(json!({ "did": "did:test:notice" })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/v1/credentials/issued/did:test:vc"))
            .and(body_json(json!({ "credential": { "credentialSubject": { "id": "did:test:bob" } } })))
            .respond_with(json_response(json!({ "ok": true })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v1/credentials/issued"))
            .respond_with(json_response(json!({ "issued": ["did:test:vc"] })))
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/api/v1/credentials/issued/did:test:vc"))
            .respond_with(json_response(json!({ "ok": true })))
            .expect(1)
            .mount(&server)
            .await;

        assert_eq!(
            client
                .send_credential("did:test:vc", &CreateAssetOptions::default())
                .await
                .unwrap()
                .as_deref(),
            Some("did:test:notice")
        );
        assert!(client
            .update_credential(
                "did:test:vc",
                &json!({ "credentialSubject": { "id": "did:test:bob" } })
            )
            .await
            .unwrap());
        assert_eq!(client.list_issued().await.unwrap(), vec!["did:test:vc"]);
        assert!(client.revoke_credential("did:test:vc").await.unwrap());
    }

    #[tokio::test]
    async fn test_held_credential_lifecycle() {
        let (server, client) = mock_client().await;

        Mock::given(method("POST"))
            .and(path("/api/v1/credentials/held"))
            .and(body_json(json!({ "did": "did:test:vc" })))
            .respond_with(json_response(json!({ "ok": true })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v1/credentials/held"))
            .respond_with(json_response(json!({ "held": ["did:test:vc"] })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v1/credentials/held/did:test:vc"))
            .respond_with(json_response(json!({ "credential": { "issuer": "did:test:alice" } })))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/v1/credentials/held/did:test:vc/publish"))
            .and(body_json(json!({ "options": { "reveal": true } })))
            .respond_with(json_response(json!({ "ok": true })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/v1/credentials/held/did:test:vc/unpublish"))
            .respond_with(json_response(json!({ "ok": true })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/api/v1/credentials/held/did:test:vc"))
            .respond_with(json_response(json!({ "ok": true })))
            .expect(1)
            .mount(&server)
            .await;

        assert!(client.accept_credential("did:test:vc").await.unwrap());
        assert_eq!(client.list_credentials().await.unwrap(), vec!["did:test:vc"]);
        let credential = client.get_credential("did:test:vc").await.unwrap().expect("held");
        assert_eq!(credential["issuer"], "did:test:alice");

        let reveal = PublishOptions { reveal: Some(true) };
        assert!(client.publish_credential("did:test:vc", &reveal).await.unwrap());
        assert!(client.unpublish_credential("did:test:vc").await.unwrap());
        assert!(client.remove_credential("did:test:vc").await.unwrap());
    }

    #[tokio::test]
    async fn test_accept_unknown_credential_fails() {
        let (server, client) = mock_client().await;

        Mock::given(method("POST"))
            .and(path("/api/v1/credentials/held"))
            .respond_with(
                ResponseTemplate::new(500).set_body_json(json!({ "error": "Invalid parameter: did" })),
            )
            .mount(&server)
            .await;

        let err = client.accept_credential("did:test:bogus").await.expect_err("should fail");
        assert!(matches!(err, KeymasterError::Api { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_challenge_response_flow() {
        let (server, client) = mock_client().await;

        Mock::given(method("POST"))
            .and(path("/api/v1/challenge"))
            .and(body_json(json!({
                "challenge": { "credentials": [{ "schema": "did:test:schema", "issuers": ["did:test:alice"] }] },
                "options": {}
            })))
            .respond_with(json_response(json!({ "did": "did:test:challenge" })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/v1/response"))
            .and(body_json(json!({ "challenge": "did:test:challenge", "options": { "retries": 3 } })))
            .respond_with(json_response(json!({ "did": "did:test:response" })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/v1/response/verify"))
            .and(body_json(json!({ "response": "did:test:response", "options": {} })))
            .respond_with(json_response(json!({
                "verify": {
                    "challenge": "did:test:challenge",
                    "credentials": [{ "vc": "did:test:vc", "vp": "did:test:vp" }],
                    "requested": 1,
                    "fulfilled": 1,
                    "match": true,
                    "vps": [],
                    "responder": "did:test:bob"
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let challenge = Challenge {
            credentials: vec![ChallengeCredential {
                schema: "did:test:schema".to_string(),
                issuers: Some(vec!["did:test:alice".to_string()]),
            }],
        };
        let challenge_did = client
            .create_challenge(&challenge, &ChallengeOptions::default())
            .await
            .expect("create_challenge failed");

        let options = CreateResponseOptions {
            retries: Some(3),
            ..Default::default()
        };
        let response_did = client
            .create_response(&challenge_did, &options)
            .await
            .expect("create_response failed");

        let verify = client
            .verify_response(&response_did, &VerifyResponseOptions::default())
            .await
            .expect("verify_response failed");
        assert!(verify.matched);
        assert_eq!(verify.fulfilled, 1);
        assert_eq!(verify.credentials.len(), 1);
    }
}
