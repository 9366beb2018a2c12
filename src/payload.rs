//! Gogs push event payload models

use serde::{Deserialize, Serialize};

/// A push event as delivered by a Gogs webhook.
///
/// Decoding is lenient: absent fields take their default values instead of
/// failing the decode. A payload without a `secret` therefore decodes to an
/// empty secret and is rejected by authentication, and a payload without
/// `commits` decodes to an empty commit list and is rejected as such.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PushEvent {
    pub secret: String,
    #[serde(rename = "ref")]
    pub git_ref: String,
    pub before: String,
    pub after: String,
    pub compare_url: String,
    pub commits: Vec<Commit>,
    pub repository: Repository,
    pub pusher: Author,
    pub sender: Sender,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Commit {
    pub id: String,
    pub message: String,
    pub url: String,
    pub author: Author,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Author {
    pub name: String,
    pub email: String,
    pub username: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Repository {
    pub id: u64,
    pub name: String,
    pub url: String,
    pub ssh_url: String,
    pub clone_url: String,
    pub description: String,
    pub website: String,
    pub watchers: i64,
    pub owner: Author,
    pub private: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Sender {
    pub login: String,
    pub id: i64,
    pub avatar_url: String,
}
