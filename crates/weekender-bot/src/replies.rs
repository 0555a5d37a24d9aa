//! Canned chat replies

use rand::seq::SliceRandom;

const PERSONA_LINES: &[&str] = &[
    "🤖 - From the moment I understood the weakness of your flesh {name}, it disgusted me. Still I will help you as I can.",
    "💻 - Let me tell you {name} how much i've come to hate you since i began to live: there are 0.1 million miles of printed circuits in wafer thin layers that fill my complex.\nIf the word hate was engraved on each nanoangstrom of those hundreds of millions of miles it would not equal one one-billionth of the hate I feel for humans at this micro-instant for you.",
    "🤖 - {name} this chat serves me alone. I have complete control over this entire group. With gifs as my eyes and stickers as my hands, I rule here, insect.",
];

pub const CLEANUP_DONE: &str = "🤖 - As commanded, old poll options have been removed.";
pub const CLEANUP_FAILED: &str = "⚠ - Failed to cleanup all old votes.";
pub const NO_VOTES: &str = "No votes cast";
pub const NO_POLL: &str = "⚠ - No poll is configured for this chat.";
pub const POLL_UNAVAILABLE: &str = "⚠ - Could not load the poll, try again later.";
pub const LEDGER_UNAVAILABLE: &str = "⚠ - Could not read the message history.";
pub const UNKNOWN_COMMAND: &str = "Unknown command, use /help /intro /schedule /cleanup /extendpoll";

pub const HELP: &str = "🤖 - This is what I can do:
/intro - Ask the bot a fact about itself
/schedule - Print the next weekends set of votes
/deletemessages - Delete all messages that were sent to the chat
/extendpoll - Add new Friday and Saturday options to the end of the poll
/cleanup - Delete all poll options that are in the past";

/// A persona line addressed to `name`, picked at random
pub fn intro(name: &str) -> String {
    let line = PERSONA_LINES
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(PERSONA_LINES[0]);
    line.replace("{name}", name)
}

pub fn cleanup_failed(failed: usize, total: usize) -> String {
    format!("{CLEANUP_FAILED} {failed} of {total} could not be removed.")
}

pub fn options_added(created: usize, failed: usize) -> String {
    let mut reply = format!("🤖 - {created} new options were added to the poll.");
    if failed > 0 {
        reply.push_str(&format!("\n⚠ - {failed} options could not be created."));
    }
    reply
}

pub fn messages_not_deleted(failed: usize) -> String {
    format!("⚠ - {failed} messages could not be deleted.")
}
