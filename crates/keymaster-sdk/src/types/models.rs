/*
[INPUT]:  Keymaster response schemas with a fixed shape
[OUTPUT]: Typed Rust structs with serialization support
[POS]:    Data layer - response models
[UPDATE]: When API schema changes or new types added
*/

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckWalletResult {
    pub checked: u32,
    pub invalid: u32,
    pub deleted: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixWalletResult {
    pub ids_removed: u32,
    pub owned_removed: u32,
    pub held_removed: u32,
    pub names_removed: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub name: String,
    #[serde(default)]
    pub members: Vec<String>,
}

/// Credentials requested by a challenge
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Challenge {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub credentials: Vec<ChallengeCredential>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChallengeCredential {
    pub schema: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issuers: Option<Vec<String>>,
}

/// Outcome of verifying a challenge response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChallengeResponse {
    pub challenge: String,
    #[serde(default)]
    pub credentials: Vec<Value>,
    pub requested: u32,
    pub fulfilled: u32,
    #[serde(rename = "match")]
    pub matched: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vps: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub responder: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Poll {
    #[serde(rename = "type")]
    pub kind: String,
    pub version: u32,
    pub description: String,
    /// DID of the eligible voter group
    pub roster: String,
    pub options: Vec<String>,
    pub deadline: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ballots: Option<BTreeMap<String, PollBallot>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollBallot {
    pub ballot: String,
    pub received: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewPollResult {
    pub description: String,
    pub options: Vec<String>,
    pub deadline: DateTime<Utc>,
    pub is_owner: bool,
    pub is_eligible: bool,
    pub vote_expired: bool,
    pub has_voted: bool,
    /// Present only when the caller owns the poll
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<PollResults>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollResults {
    pub tally: Vec<PollTally>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ballots: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub votes: Option<PollVotes>,
    #[serde(default, rename = "final", skip_serializing_if = "Option::is_none")]
    pub is_final: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollTally {
    pub vote: u32,
    pub option: String,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollVotes {
    pub eligible: u32,
    pub received: u32,
    pub pending: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageAsset {
    pub cid: String,
    pub bytes: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileAsset {
    pub cid: String,
    pub bytes: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DmailMessage {
    pub to: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cc: Vec<String>,
    pub subject: String,
    pub body: String,
    /// DID of the message this one replies to or forwards
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

/// Mailbox entry as listed by the service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DmailItem {
    pub message: DmailMessage,
    #[serde(default)]
    pub to: Vec<String>,
    #[serde(default)]
    pub cc: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachments: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoticeMessage {
    pub to: Vec<String>,
    pub dids: Vec<String>,
}
