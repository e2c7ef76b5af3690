/*
[INPUT]:  Poll definitions, poll DIDs, votes and ballots
[OUTPUT]: Poll DIDs, poll records, views with tallies
[POS]:    HTTP layer - poll endpoints
[UPDATE]: When poll endpoints change
*/

use reqwest::Method;
use serde_json::json;

use crate::http::{KeymasterClient, Result};
use crate::types::{CreateAssetOptions, Poll, PublishOptions, ViewPollResult, VoteOptions};

impl KeymasterClient {
    /// Skeleton poll to fill in before [`create_poll`](Self::create_poll)
    ///
    /// GET /templates/poll
    pub async fn poll_template(&self) -> Result<Poll> {
        let builder = self.request(Method::GET, &["templates", "poll"])?;
        self.send_for_field(builder, "template").await
    }

    /// POST /polls
    pub async fn create_poll(&self, poll: &Poll, options: &CreateAssetOptions) -> Result<String> {
        let builder = self
            .request(Method::POST, &["polls"])?
            .json(&json!({ "poll": poll, "options": options }));
        self.send_for_field(builder, "did").await
    }

    /// GET /polls?owner={owner}
    pub async fn list_polls(&self, owner: Option<&str>) -> Result<Vec<String>> {
        let mut builder = self.request(Method::GET, &["polls"])?;
        if let Some(owner) = owner {
            builder = builder.query(&[("owner", owner)]);
        }
        self.send_for_field(builder, "polls").await
    }

    /// GET /polls/{id}
    pub async fn get_poll(&self, id: &str) -> Result<Option<Poll>> {
        let builder = self.request(Method::GET, &["polls", id])?;
        self.send_for_field(builder, "poll").await
    }

    /// GET /polls/{id}/test
    pub async fn test_poll(&self, id: &str) -> Result<bool> {
        let builder = self.request(Method::GET, &["polls", id, "test"])?;
        self.send_for_field(builder, "test").await
    }

    /// GET /polls/{id}/view
    pub async fn view_poll(&self, id: &str) -> Result<ViewPollResult> {
        let builder = self.request(Method::GET, &["polls", id, "view"])?;
        self.send_for_field(builder, "poll").await
    }

    /// Cast a vote (1-based option index, 0 to spoil); returns the ballot DID
    ///
    /// POST /polls/{id}/vote
    pub async fn vote_poll(&self, id: &str, vote: u32, options: &VoteOptions) -> Result<String> {
        let builder = self
            .request(Method::POST, &["polls", id, "vote"])?
            .json(&json!({ "vote": vote, "options": options }));
        self.send_for_field(builder, "did").await
    }

    /// Record a ballot DID received from a voter
    ///
    /// PUT /polls/update
    pub async fn update_poll(&self, ballot: &str) -> Result<bool> {
        let builder = self
            .request(Method::PUT, &["polls", "update"])?
            .json(&json!({ "ballot": ballot }));
        self.send_for_field(builder, "ok").await
    }

    /// POST /polls/{id}/publish
    pub async fn publish_poll(&self, id: &str, options: &PublishOptions) -> Result<bool> {
        let builder = self
            .request(Method::POST, &["polls", id, "publish"])?
            .json(&json!({ "options": options }));
        self.send_for_field(builder, "ok").await
    }

    /// POST /polls/{id}/unpublish
    pub async fn unpublish_poll(&self, id: &str) -> Result<bool> {
        let builder = self.request(Method::POST, &["polls", id, "unpublish"])?;
        self.send_for_field(builder, "ok").await
    }
}
