//! Nextcloud Polls REST client

use async_trait::async_trait;
use reqwest::{Client, Method};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};
use weekender_api::{OptionDraft, PollOption, Tally, Voter, VoterKey};
use weekender_util::{OptionId, PollId};

use crate::{PollError, PollResult, PollSource};

const API_PATH: &str = "index.php/apps/polls/api/v1.0";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Poll source backed by a Nextcloud Polls instance
pub struct NextcloudPolls {
    client: Client,
    base_url: String,
    username: String,
    token: String,
}

impl NextcloudPolls {
    /// Client for `server` (the Nextcloud root, e.g. `https://cloud.example.org`)
    pub fn new(
        server: &str,
        username: impl Into<String>,
        token: impl Into<String>,
    ) -> PollResult<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .connect_timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            base_url: format!("{}/{}", server.trim_end_matches('/'), API_PATH),
            username: username.into(),
            token: token.into(),
        })
    }

    fn options_url(&self, poll: PollId) -> String {
        format!("{}/poll/{}/options", self.base_url, poll)
    }

    fn votes_url(&self, poll: PollId) -> String {
        format!("{}/poll/{}/votes", self.base_url, poll)
    }

    fn create_url(&self, poll: PollId) -> String {
        format!("{}/poll/{}/option", self.base_url, poll)
    }

    fn option_url(&self, option: OptionId) -> String {
        format!("{}/option/{}", self.base_url, option)
    }

    async fn request<B: Serialize + ?Sized>(
        &self,
        method: Method,
        url: &str,
        body: Option<&B>,
    ) -> PollResult<String> {
        let mut request = self
            .client
            .request(method.clone(), url)
            .basic_auth(&self.username, Some(&self.token))
            .header("Accept", "application/json");
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;
        debug!(method = %method, url = %url, status = %status, "Nextcloud request complete");

        if !status.is_success() {
            return Err(PollError::Status {
                status: status.as_u16(),
                body: text,
            });
        }
        Ok(text)
    }
}

#[async_trait]
impl PollSource for NextcloudPolls {
    async fn fetch_options(&self, poll: PollId) -> PollResult<Vec<PollOption>> {
        let body = self
            .request::<()>(Method::GET, &self.options_url(poll), None)
            .await?;
        decode_options(&body)
    }

    async fn fetch_voters(&self, poll: PollId) -> PollResult<Vec<Voter>> {
        let body = self
            .request::<()>(Method::GET, &self.votes_url(poll), None)
            .await?;
        decode_voters(&body)
    }

    async fn create_option(&self, poll: PollId, draft: OptionDraft) -> PollResult<()> {
        let body = CreateOption {
            timestamp: draft.timestamp,
            duration: draft.duration,
        };
        self.request(Method::POST, &self.create_url(poll), Some(&body))
            .await?;
        info!(poll_id = %poll, timestamp = draft.timestamp, "Option created");
        Ok(())
    }

    async fn delete_option(&self, poll: PollId, option: OptionId) -> PollResult<()> {
        self.request::<()>(Method::DELETE, &self.option_url(option), None)
            .await?;
        info!(poll_id = %poll, option_id = %option, "Option deleted");
        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct CreateOption {
    timestamp: i64,
    duration: i64,
}

#[derive(Debug, Deserialize)]
struct OptionsResponse {
    #[serde(default)]
    options: Vec<WireOption>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct WireOption {
    id: i64,
    text: Option<String>,
    timestamp: i64,
    duration: i64,
    deleted: Flag,
    votes: WireTally,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WireTally {
    yes: i64,
    maybe: i64,
    no: i64,
}

#[derive(Debug, Deserialize)]
struct VotesResponse {
    #[serde(default)]
    votes: Vec<WireVote>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WireVote {
    user: WireUser,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct WireUser {
    id: Option<String>,
    user_id: Option<String>,
    display_name: Option<String>,
    is_no_user: bool,
}

/// Soft-delete marker; older servers send a timestamp, newer ones a bool
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Flag {
    Int(i64),
    Bool(bool),
}

impl Default for Flag {
    fn default() -> Self {
        Flag::Int(0)
    }
}

impl Flag {
    fn is_set(&self) -> bool {
        match self {
            Flag::Int(v) => *v != 0,
            Flag::Bool(v) => *v,
        }
    }
}

/// Decode a `GET /poll/{id}/options` body, skipping soft-deleted options
pub fn decode_options(body: &str) -> PollResult<Vec<PollOption>> {
    let response: OptionsResponse = serde_json::from_str(body)?;
    Ok(response
        .options
        .into_iter()
        .filter(|o| !o.deleted.is_set())
        .map(|o| {
            let tally = Tally::new(o.votes.yes, o.votes.maybe, o.votes.no);
            let mut option = PollOption::new(OptionId::new(o.id), o.timestamp, o.duration, tally);
            option.text = o.text.unwrap_or_default();
            option
        })
        .collect())
}

/// Decode a `GET /poll/{id}/votes` body into one voter per vote
pub fn decode_voters(body: &str) -> PollResult<Vec<Voter>> {
    let response: VotesResponse = serde_json::from_str(body)?;
    Ok(response.votes.into_iter().map(|v| voter_from(v.user)).collect())
}

fn voter_from(user: WireUser) -> Voter {
    let non_empty = |s: Option<String>| s.filter(|s| !s.is_empty());
    let display_name = non_empty(user.display_name).unwrap_or_default();

    let key = match non_empty(user.user_id) {
        Some(user_id) if !user.is_no_user => VoterKey::User(user_id),
        _ => VoterKey::Guest(non_empty(user.id).unwrap_or_else(|| display_name.clone())),
    };

    Voter { key, display_name }
}
