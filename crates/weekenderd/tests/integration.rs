//! Integration tests for weekenderd
//!
//! These tests drive the bot end to end over the mock poll source, the mock
//! Telegram transport and a real SQLite ledger.

use chrono::{DateTime, Local, TimeZone};
use std::sync::Arc;
use std::time::Duration;
use weekender_api::{PollOption, Tally, Voter, VoterKey};
use weekender_bot::{Bot, NO_VOTES, batch_report};
use weekender_config::parse_config;
use weekender_poll::MockPollSource;
use weekender_store::{MessageKind, MessageLedger, SqliteLedger};
use weekender_telegram::{MockTransport, TextFormat, Update};
use weekender_util::{ChatId, DAY_SECONDS, OptionId, PollId};

const CONFIG: &str = r#"
    config_version = 1

    [nextcloud]
    server = "https://cloud.example.org"
    username = "weekender"

    [schedule]
    extend_count = 2

    [[channels]]
    chat_id = -1001
    poll_id = 42

    [[channels]]
    chat_id = -2002
    poll_id = 43
"#;

const CHAT: ChatId = ChatId::new(-1001);
const POLL: PollId = PollId::new(42);

fn local(day: u32, hour: u32) -> DateTime<Local> {
    Local.with_ymd_and_hms(2024, 1, day, hour, 0, 0).unwrap()
}

fn option(id: i64, day: u32, yes: i64, maybe: i64) -> PollOption {
    PollOption::new(
        OptionId::new(id),
        local(day, 0).timestamp(),
        DAY_SECONDS,
        Tally::new(yes, maybe, 0),
    )
}

fn voters(count: usize) -> Vec<Voter> {
    (0..count)
        .map(|i| Voter {
            key: VoterKey::User(format!("user{i}")),
            display_name: format!("User {i}"),
        })
        .collect()
}

struct Harness {
    bot: Bot,
    polls: Arc<MockPollSource>,
    transport: Arc<MockTransport>,
    ledger: Arc<SqliteLedger>,
}

fn harness(ledger: SqliteLedger) -> Harness {
    let settings = parse_config(CONFIG).unwrap();
    let polls = Arc::new(MockPollSource::new());
    let transport = Arc::new(MockTransport::new());
    let ledger = Arc::new(ledger);
    let bot = Bot::new(
        settings.channels,
        settings.schedule,
        polls.clone(),
        transport.clone(),
        ledger.clone(),
    );
    Harness {
        bot,
        polls,
        transport,
        ledger,
    }
}

#[tokio::test]
async fn test_weekend_lifecycle() {
    let h = harness(SqliteLedger::in_memory().unwrap());
    h.polls.set_poll(
        POLL,
        vec![
            option(1, 5, 2, 0),
            option(2, 6, 1, 1),
            option(3, 12, 3, 1),
            option(4, 13, 1, 1),
        ],
        voters(4),
    );
    let wednesday = local(10, 12);

    // Schedule: only the coming Friday and Saturday, with derived "no" counts
    h.bot
        .handle_message(&h.transport.incoming(CHAT, "Ada", "/schedule"), &wednesday)
        .await;
    let table = h.transport.last_sent().unwrap();
    assert_eq!(table.format, TextFormat::MarkdownV2);
    assert!(table.text.contains("| Friday     | 12/01 |     3 |     0 |     1 | 100.00 % |"));
    assert!(table.text.contains("| Saturday   | 13/01 |     1 |     2 |     1 |  50.00 % |"));

    // Cleanup: the previous weekend goes away
    h.bot
        .handle_message(&h.transport.incoming(CHAT, "Ada", "/cleanup"), &wednesday)
        .await;
    assert_eq!(h.polls.deleted().len(), 2);
    let remaining: Vec<i64> = h.polls.options(POLL).iter().map(|o| o.timestamp).collect();
    assert_eq!(remaining, vec![local(12, 0).timestamp(), local(13, 0).timestamp()]);

    // Extend: two more pairs after the latest Saturday
    h.bot
        .handle_message(&h.transport.incoming(CHAT, "Ada", "/extendpoll"), &wednesday)
        .await;
    let created: Vec<i64> = h.polls.created().iter().map(|(_, d)| d.timestamp).collect();
    assert_eq!(
        created,
        vec![
            local(19, 0).timestamp(),
            local(20, 0).timestamp(),
            local(26, 0).timestamp(),
            local(27, 0).timestamp(),
        ]
    );

    // A week later the schedule shows the new pair
    let next_wednesday = local(17, 12);
    h.bot
        .handle_message(&h.transport.incoming(CHAT, "Ada", "/schedule"), &next_wednesday)
        .await;
    let table = h.transport.last_sent().unwrap();
    assert!(table.text.contains("19/01"));
    assert!(table.text.contains("20/01"));
    assert!(table.text.contains("n/a") || table.text.contains("0.00 %"));
}

#[tokio::test]
async fn test_each_chat_uses_its_own_poll() {
    let h = harness(SqliteLedger::in_memory().unwrap());
    h.polls.set_poll(POLL, vec![option(1, 12, 1, 0)], voters(1));
    h.polls.set_poll(PollId::new(43), vec![], vec![]);
    let wednesday = local(10, 12);

    h.bot
        .handle_message(&h.transport.incoming(ChatId::new(-2002), "Bo", "/schedule"), &wednesday)
        .await;

    let reply = h.transport.last_sent().unwrap();
    assert_eq!(reply.chat, ChatId::new(-2002));
    assert_eq!(reply.text, NO_VOTES);
}

#[tokio::test]
async fn test_ledger_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("messages.db");

    {
        let h = harness(SqliteLedger::open(&path).unwrap());
        let wednesday = local(10, 12);
        h.bot
            .handle_message(&h.transport.incoming(CHAT, "Ada", "lunch first?"), &wednesday)
            .await;
        h.bot
            .handle_message(&h.transport.incoming(CHAT, "Ada", "/help"), &wednesday)
            .await;
    }

    let h = harness(SqliteLedger::open(&path).unwrap());
    let kinds: Vec<MessageKind> = h
        .ledger
        .messages_for_chat(CHAT, None)
        .unwrap()
        .iter()
        .map(|m| m.kind)
        .collect();
    assert_eq!(kinds, vec![MessageKind::Received, MessageKind::Sent]);

    h.bot
        .handle_message(&h.transport.incoming(CHAT, "Ada", "/deletemessages"), &local(10, 13))
        .await;
    assert_eq!(h.transport.deleted().len(), 2);
    assert!(h.ledger.messages_for_chat(CHAT, None).unwrap().is_empty());
}

#[tokio::test]
async fn test_long_poll_dispatch() {
    let h = harness(SqliteLedger::in_memory().unwrap());
    h.transport.push_update(Update {
        update_id: 7,
        message: Some(h.transport.incoming(CHAT, "Ada", "/nonsense")),
    });
    h.transport.push_update(Update {
        update_id: 8,
        message: None,
    });

    let offset = h.bot.poll_once(0, Duration::ZERO).await.unwrap();

    assert_eq!(offset, 9);
    assert_eq!(h.transport.sent().len(), 1);
    assert!(h.transport.sent()[0].text.starts_with("Unknown command"));
}

#[tokio::test]
async fn test_send_failure_is_not_recorded() {
    let h = harness(SqliteLedger::in_memory().unwrap());
    h.transport.set_fail_send(true);

    h.bot
        .handle_message(&h.transport.incoming(CHAT, "Ada", "/help"), &local(10, 12))
        .await;

    assert!(h.ledger.messages_for_chat(CHAT, None).unwrap().is_empty());
}

#[tokio::test]
async fn test_batch_pass_over_config() {
    let settings = parse_config(CONFIG).unwrap();
    let polls = MockPollSource::new();
    polls.set_poll(POLL, vec![option(1, 5, 1, 0), option(2, 12, 2, 1)], voters(4));
    let now = local(10, 12);

    let report = batch_report(&polls, POLL, &settings.schedule, false, &now)
        .await
        .unwrap();

    assert_eq!(report.weekend, vec!["Friday (12/01): 2 (YES) 1 (MAYBE) 1 (NO): 75%"]);
    assert_eq!(report.expired.len(), 1);
    assert_eq!(report.drafts.len(), 4);
    assert!(polls.created().is_empty());
}
