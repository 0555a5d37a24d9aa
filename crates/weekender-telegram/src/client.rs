//! Telegram Bot API client

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};
use weekender_util::{ChatId, MessageId};

use crate::types::ApiResponse;
use crate::{ChatTransport, Message, TextFormat, TransportError, TransportResult, Update, User};

pub const TELEGRAM_API_ROOT: &str = "https://api.telegram.org";

/// Budget for ordinary calls; long polls add their own wait on top
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Chat transport backed by the Telegram Bot API
pub struct TelegramClient {
    client: Client,
    /// `{root}/bot{token}`; never logged
    base_url: String,
}

impl TelegramClient {
    pub fn new(token: &str) -> TransportResult<Self> {
        Self::with_api_root(TELEGRAM_API_ROOT, token)
    }

    /// Client for a self-hosted Bot API server
    pub fn with_api_root(root: &str, token: &str) -> TransportResult<Self> {
        let client = Client::builder().connect_timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            client,
            base_url: format!("{}/bot{}", root.trim_end_matches('/'), token),
        })
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/{}", self.base_url, method)
    }

    async fn call<P, R>(&self, method: &str, params: &P, timeout: Duration) -> TransportResult<R>
    where
        P: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let response = self
            .client
            .post(self.method_url(method))
            .timeout(timeout)
            .json(params)
            .send()
            .await
            .map_err(without_url)?;

        let status = response.status();
        let body = response.text().await.map_err(without_url)?;
        debug!(method, status = %status, "Telegram call complete");

        decode_response(&body).map_err(|e| match e {
            TransportError::Decode(_) if !status.is_success() => TransportError::Api {
                code: Some(i64::from(status.as_u16())),
                description: body,
            },
            other => other,
        })
    }
}

/// reqwest errors print their URL, and ours carries the bot token
fn without_url(e: reqwest::Error) -> TransportError {
    TransportError::Http(e.without_url())
}

/// Unwrap the `{ok, result, description}` envelope
pub(crate) fn decode_response<R: DeserializeOwned>(body: &str) -> TransportResult<R> {
    let envelope: ApiResponse<R> = serde_json::from_str(body)?;
    match (envelope.ok, envelope.result) {
        (true, Some(result)) => Ok(result),
        (true, None) => Err(TransportError::Api {
            code: None,
            description: "response carried no result".into(),
        }),
        (false, _) => Err(TransportError::Api {
            code: envelope.error_code,
            description: envelope.description.unwrap_or_default(),
        }),
    }
}

#[derive(Serialize)]
struct GetUpdates {
    offset: i64,
    timeout: u64,
    allowed_updates: &'static [&'static str],
}

#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: i64,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    parse_mode: Option<&'static str>,
}

#[derive(Serialize)]
struct DeleteMessage {
    chat_id: i64,
    message_id: i64,
}

#[derive(Serialize)]
struct NoParams {}

#[async_trait]
impl ChatTransport for TelegramClient {
    async fn get_me(&self) -> TransportResult<User> {
        self.call("getMe", &NoParams {}, REQUEST_TIMEOUT).await
    }

    async fn get_updates(&self, offset: i64, timeout: Duration) -> TransportResult<Vec<Update>> {
        let params = GetUpdates {
            offset,
            timeout: timeout.as_secs(),
            allowed_updates: &["message"],
        };
        self.call("getUpdates", &params, timeout + REQUEST_TIMEOUT)
            .await
    }

    async fn send_message(
        &self,
        chat: ChatId,
        text: &str,
        format: TextFormat,
    ) -> TransportResult<Message> {
        let params = SendMessage {
            chat_id: chat.get(),
            text,
            parse_mode: match format {
                TextFormat::Plain => None,
                TextFormat::MarkdownV2 => Some("MarkdownV2"),
            },
        };
        let sent: Message = self.call("sendMessage", &params, REQUEST_TIMEOUT).await?;
        debug!(chat_id = %chat, message_id = sent.message_id, "Message sent");
        Ok(sent)
    }

    async fn delete_message(&self, chat: ChatId, message: MessageId) -> TransportResult<()> {
        let params = DeleteMessage {
            chat_id: chat.get(),
            message_id: message.get(),
        };
        let deleted: bool = self.call("deleteMessage", &params, REQUEST_TIMEOUT).await?;
        if !deleted {
            warn!(chat_id = %chat, message_id = %message, "Telegram declined to delete message");
            return Err(TransportError::Api {
                code: None,
                description: "deleteMessage returned false".into(),
            });
        }
        Ok(())
    }
}
