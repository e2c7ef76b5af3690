/*
[INPUT]:  Group names/DIDs and member DIDs
[OUTPUT]: Group DIDs, group records and membership checks
[POS]:    HTTP layer - group endpoints
[UPDATE]: When group endpoints change
*/

use reqwest::Method;
use serde_json::json;

use crate::http::{KeymasterClient, Result};
use crate::types::{CreateAssetOptions, Group};

impl KeymasterClient {
    /// POST /groups
    pub async fn create_group(&self, name: &str, options: &CreateAssetOptions) -> Result<String> {
        let builder = self
            .request(Method::POST, &["groups"])?
            .json(&json!({ "name": name, "options": options }));
        self.send_for_field(builder, "did").await
    }

    /// GET /groups/{group}
    pub async fn get_group(&self, group: &str) -> Result<Option<Group>> {
        let builder = self.request(Method::GET, &["groups", group])?;
        self.send_for_field(builder, "group").await
    }

    /// POST /groups/{group}/add
    pub async fn add_group_member(&self, group: &str, member: &str) -> Result<bool> {
        let builder = self
            .request(Method::POST, &["groups", group, "add"])?
            .json(&json!({ "member": member }));
        self.send_for_field(builder, "ok").await
    }

    /// POST /groups/{group}/remove
    pub async fn remove_group_member(&self, group: &str, member: &str) -> Result<bool> {
        let builder = self
            .request(Method::POST, &["groups", group, "remove"])?
            .json(&json!({ "member": member }));
        self.send_for_field(builder, "ok").await
    }

    /// Whether `group` is a group, or with `member`, whether it contains that member
    ///
    /// POST /groups/{group}/test
    pub async fn test_group(&self, group: &str, member: Option<&str>) -> Result<bool> {
        let body = match member {
            Some(member) => json!({ "member": member }),
            None => json!({}),
        };

        let builder = self
            .request(Method::POST, &["groups", group, "test"])?
            .json(&body);
        self.send_for_field(builder, "test").await
    }

    /// GET /groups?owner={owner}
    pub async fn list_groups(&self, owner: Option<&str>) -> Result<Vec<String>> {
        let mut builder = self.request(Method::GET, &["groups"])?;
        if let Some(owner) = owner {
            builder = builder.query(&[("owner", owner)]);
        }
        self.send_for_field(builder, "groups").await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::Mock;

    use crate::http::test_support::{json_response, mock_client};
    use crate::types::{CreateAssetOptions, Group};

    #[tokio::test]
    async fn test_create_and_get_group() {
        let (server, client) = mock_client().await;

        Mock::given(method("POST"))
            .and(path("/api/v1/groups"))
            .and(body_json(json!({ "name": "voters", "options": {} })))
            .respond_with(json_response(json!({ "did": "did:test:group" })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v1/groups/did:test:group"))
            .respond_with(json_response(json!({
                "group": { "name": "voters", "members": ["did:test:alice"] }
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v1/groups/did:test:asset"))
            .respond_with(json_response(json!({ "group": null })))
            .expect(1)
            .mount(&server)
            .await;

        let did = client
            .create_group("voters", &CreateAssetOptions::default())
            .await
            .expect("create_group failed");
        let group = client.get_group(&did).await.expect("get_group failed");
        assert_eq!(
            group,
            Some(Group {
                name: "voters".to_string(),
                members: vec!["did:test:alice".to_string()],
            })
        );
        assert_eq!(client.get_group("did:test:asset").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_group_membership() {
        let (server, client) = mock_client().await;

        Mock::given(method("POST"))
            .and(path("/api/v1/groups/voters/add"))
            .and(body_json(json!({ "member": "did:test:bob" })))
            .respond_with(json_response(json!({ "ok": true })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/v1/groups/voters/remove"))
            .and(body_json(json!({ "member": "did:test:bob" })))
            .respond_with(json_response(json!({ "ok": true })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/v1/groups/voters/test"))
            .and(body_json(json!({ "member": "did:test:bob" })))
            .respond_with(json_response(json!({ "test": false })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/v1/groups/voters/test"))
            .and(body_json(json!({})))
            .respond_with(json_response(json!({ "test": true })))
            .expect(1)
            .mount(&server)
            .await;

        assert!(client.add_group_member("voters", "did:test:bob").await.unwrap());
        assert!(client.remove_group_member("voters", "did:test:bob").await.unwrap());
        assert!(!client.test_group("voters", Some("did:test:bob")).await.unwrap());
        assert!(client.test_group("voters", None).await.unwrap());
    }

    #[tokio::test]
    async fn test_list_groups() {
        let (server, client) = mock_client().await;

        Mock::given(method("GET"))
            .and(path("/api/v1/groups"))
            .and(query_param("owner", "did:test:alice"))
            .respond_with(json_response(json!({ "groups": ["did:test:group"] })))
            .expect(1)
            .mount(&server)
            .await;

        let groups = client.list_groups(Some("did:test:alice")).await.unwrap();
        assert_eq!(groups, vec!["did:test:group"]);
    }
}
