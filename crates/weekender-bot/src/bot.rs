//! Command handling and the long-poll loop

use chrono::{DateTime, Local};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, watch};
use tracing::{debug, error, info, warn};
use weekender_api::{BotCommand, PollOption};
use weekender_config::{Channel, ScheduleSettings};
use weekender_core::{generate_next, next_weekend, past_options, summarize};
use weekender_poll::PollSource;
use weekender_store::{LedgerMessage, MessageKind, MessageLedger};
use weekender_telegram::{ChatTransport, Message, TextFormat, TransportResult};
use weekender_util::{ChatId, PollId};

use crate::render::{schedule_table, summary_line};
use crate::replies;

/// Pause after a failed `getUpdates` before polling again
pub const ERROR_PAUSE: Duration = Duration::from_secs(5);

/// A reply the bot wants to post
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub format: TextFormat,
}

impl Reply {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            format: TextFormat::Plain,
        }
    }

    pub fn markdown(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            format: TextFormat::MarkdownV2,
        }
    }
}

/// The chat bot: one instance serves every configured chat
pub struct Bot {
    channels: Vec<Channel>,
    schedule: ScheduleSettings,
    polls: Arc<dyn PollSource>,
    transport: Arc<dyn ChatTransport>,
    ledger: Arc<dyn MessageLedger>,
    /// Serializes ledger read-modify-write sequences
    ledger_lock: Mutex<()>,
}

impl Bot {
    pub fn new(
        channels: Vec<Channel>,
        schedule: ScheduleSettings,
        polls: Arc<dyn PollSource>,
        transport: Arc<dyn ChatTransport>,
        ledger: Arc<dyn MessageLedger>,
    ) -> Self {
        Self {
            channels,
            schedule,
            polls,
            transport,
            ledger,
            ledger_lock: Mutex::new(()),
        }
    }

    fn poll_for(&self, chat: ChatId) -> Option<PollId> {
        self.channels
            .iter()
            .find(|c| c.chat_id == chat)
            .map(|c| c.poll_id)
    }

    /// Poll Telegram until `shutdown` flips to true
    pub async fn run(&self, long_poll: Duration, mut shutdown: watch::Receiver<bool>) {
        let mut offset = 0;
        info!("Startup complete, awaiting orders");

        while !*shutdown.borrow() {
            tokio::select! {
                _ = shutdown.changed() => break,
                result = self.poll_once(offset, long_poll) => match result {
                    Ok(next) => offset = next,
                    Err(e) => {
                        warn!(error = %e, pause = ?ERROR_PAUSE, "Failed to fetch updates");
                        tokio::select! {
                            _ = shutdown.changed() => break,
                            _ = tokio::time::sleep(ERROR_PAUSE) => {}
                        }
                    }
                }
            }
        }

        // Telegram redelivers the last batch until a later offset is requested
        if offset > 0 {
            if let Err(e) = self.transport.get_updates(offset, Duration::ZERO).await {
                warn!(error = %e, offset, "Failed to confirm handled updates");
            }
        }

        info!("Bot loop stopped");
    }

    /// Fetch and handle one batch of updates, returning the next offset
    pub async fn poll_once(&self, offset: i64, long_poll: Duration) -> TransportResult<i64> {
        let updates = self.transport.get_updates(offset, long_poll).await?;
        let mut next = offset;

        for update in updates {
            next = next.max(update.update_id + 1);
            if let Some(message) = update.message {
                self.handle_message(&message, &weekender_util::now()).await;
            }
        }

        Ok(next)
    }

    /// React to one incoming message
    pub async fn handle_message(&self, message: &Message, now: &DateTime<Local>) {
        let chat = message.chat_id();
        let text = message.text.as_deref().unwrap_or_default();

        let Some(command) = BotCommand::parse(text) else {
            debug!(chat_id = %chat, message_id = message.message_id, "Non-command message received");
            self.record(message, MessageKind::Received).await;
            return;
        };

        info!(chat_id = %chat, command = command.name(), "Command received");
        if let Some(reply) = self.dispatch(&command, message, now).await {
            self.send(chat, reply).await;
        }
    }

    /// Compute the reply to a command, performing its side effects
    pub async fn dispatch(
        &self,
        command: &BotCommand,
        message: &Message,
        now: &DateTime<Local>,
    ) -> Option<Reply> {
        let chat = message.chat_id();
        match command {
            BotCommand::Intro => Some(Reply::plain(replies::intro(message.first_name()))),
            BotCommand::Help => Some(Reply::plain(replies::HELP)),
            BotCommand::Unknown { .. } => Some(Reply::plain(replies::UNKNOWN_COMMAND)),
            BotCommand::DeleteMessages => self.delete_messages(chat).await,
            BotCommand::Schedule | BotCommand::Cleanup | BotCommand::ExtendPoll => {
                let Some(poll) = self.poll_for(chat) else {
                    warn!(chat_id = %chat, command = command.name(), "No poll configured for chat");
                    return Some(Reply::plain(replies::NO_POLL));
                };
                let options = match self.polls.load_poll(poll, self.schedule.derive_no_votes).await {
                    Ok(options) => options,
                    Err(e) => {
                        error!(poll_id = %poll, error = %e, "Failed to load poll");
                        return Some(Reply::plain(replies::POLL_UNAVAILABLE));
                    }
                };

                Some(match command {
                    BotCommand::Schedule => self.schedule_reply(&options, now),
                    BotCommand::Cleanup => self.cleanup(poll, &options, now).await,
                    _ => self.extend(poll, &options, now).await,
                })
            }
        }
    }

    fn schedule_reply(&self, options: &[PollOption], now: &DateTime<Local>) -> Reply {
        let tz = now.timezone();
        let summaries: Vec<_> = next_weekend(options, now)
            .iter()
            .map(|o| summarize(o, &tz))
            .collect();

        for summary in &summaries {
            debug!(line = %summary_line(summary), "Weekend option");
        }

        match schedule_table(&summaries) {
            Some(table) => Reply::markdown(table),
            None => Reply::plain(replies::NO_VOTES),
        }
    }

    async fn cleanup(&self, poll: PollId, options: &[PollOption], now: &DateTime<Local>) -> Reply {
        let expired = past_options(options, now);
        let mut failed = 0;

        for option in &expired {
            let Some(id) = option.id else {
                warn!(poll_id = %poll, timestamp = option.timestamp, "Expired option has no id");
                failed += 1;
                continue;
            };
            if let Err(e) = self.polls.delete_option(poll, id).await {
                warn!(poll_id = %poll, option_id = %id, error = %e, "Failed to delete option");
                failed += 1;
            }
        }

        info!(poll_id = %poll, expired = expired.len(), failed, "Cleanup finished");
        if failed == 0 {
            Reply::plain(replies::CLEANUP_DONE)
        } else {
            Reply::plain(replies::cleanup_failed(failed, expired.len()))
        }
    }

    async fn extend(&self, poll: PollId, options: &[PollOption], now: &DateTime<Local>) -> Reply {
        let drafts = generate_next(options, self.schedule.extend_count, now);
        let mut created = 0;

        for draft in &drafts {
            match self.polls.create_option(poll, *draft).await {
                Ok(()) => created += 1,
                Err(e) => {
                    warn!(poll_id = %poll, timestamp = draft.timestamp, error = %e, "Failed to create option");
                }
            }
        }

        info!(poll_id = %poll, created, requested = drafts.len(), "Poll extended");
        Reply::plain(replies::options_added(created, drafts.len() - created))
    }

    async fn delete_messages(&self, chat: ChatId) -> Option<Reply> {
        let _guard = self.ledger_lock.lock().await;

        let messages = match self.ledger.messages_for_chat(chat, None) {
            Ok(messages) => messages,
            Err(e) => {
                error!(chat_id = %chat, error = %e, "Failed to read message ledger");
                return Some(Reply::plain(replies::LEDGER_UNAVAILABLE));
            }
        };

        let mut failed = 0;
        for message in &messages {
            if let Err(e) = self
                .transport
                .delete_message(message.chat_id, message.message_id)
                .await
            {
                warn!(chat_id = %chat, message_id = %message.message_id, error = %e, "Failed to delete message");
                failed += 1;
                continue;
            }
            if let Err(e) = self.ledger.forget_message(message.id) {
                warn!(id = message.id, error = %e, "Failed to forget deleted message");
            }
        }

        info!(chat_id = %chat, total = messages.len(), failed, "Chat messages deleted");
        (failed > 0).then(|| Reply::plain(replies::messages_not_deleted(failed)))
    }

    /// Post a reply and remember it
    pub async fn send(&self, chat: ChatId, reply: Reply) {
        match self
            .transport
            .send_message(chat, &reply.text, reply.format)
            .await
        {
            Ok(sent) => self.record(&sent, MessageKind::Sent).await,
            Err(e) => error!(chat_id = %chat, error = %e, "Failed to send message"),
        }
    }

    async fn record(&self, message: &Message, kind: MessageKind) {
        let entry = LedgerMessage::new(message.id(), message.chat_id(), message.sent_at(), kind)
            .with_user(message.username())
            .with_text(message.text.clone());

        let _guard = self.ledger_lock.lock().await;
        if let Err(e) = self.ledger.record_message(&entry) {
            error!(chat_id = %entry.chat_id, message_id = %entry.message_id, error = %e, "Failed to record message");
        }
    }
}
