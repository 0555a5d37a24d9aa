//! Chat commands understood by the bot

use serde::{Deserialize, Serialize};

/// All commands a chat member can send
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BotCommand {
    /// Ask the bot to introduce itself
    Intro,

    /// Show the votes for the upcoming weekend
    Schedule,

    /// Delete poll options that lie in the past
    Cleanup,

    /// Append new Friday/Saturday options to the poll
    ExtendPoll,

    /// Delete every message the bot knows about in this chat
    DeleteMessages,

    /// List the commands
    Help,

    /// Any other `/command`
    Unknown { name: String },
}

impl BotCommand {
    /// Parse the command at the start of a message.
    ///
    /// Returns `None` for text that is not a command. `/cmd@botname` is
    /// accepted; arguments after the command are ignored.
    pub fn parse(text: &str) -> Option<Self> {
        let first = text.split_whitespace().next()?;
        let name = first.strip_prefix('/')?;
        let name = name.split('@').next().unwrap_or(name);
        if name.is_empty() {
            return None;
        }

        let command = match name.to_lowercase().as_str() {
            "intro" | "start" => Self::Intro,
            "schedule" => Self::Schedule,
            "cleanup" => Self::Cleanup,
            "extendpoll" => Self::ExtendPoll,
            "deletemessages" => Self::DeleteMessages,
            "help" => Self::Help,
            _ => Self::Unknown {
                name: name.to_string(),
            },
        };
        Some(command)
    }

    /// Command name as typed in chat, without the slash
    pub fn name(&self) -> &str {
        match self {
            Self::Intro => "intro",
            Self::Schedule => "schedule",
            Self::Cleanup => "cleanup",
            Self::ExtendPoll => "extendpoll",
            Self::DeleteMessages => "deletemessages",
            Self::Help => "help",
            Self::Unknown { name } => name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_commands() {
        assert_eq!(BotCommand::parse("/schedule"), Some(BotCommand::Schedule));
        assert_eq!(BotCommand::parse("/cleanup now please"), Some(BotCommand::Cleanup));
        assert_eq!(BotCommand::parse("/ExtendPoll"), Some(BotCommand::ExtendPoll));
        assert_eq!(BotCommand::parse("/start"), Some(BotCommand::Intro));
    }

    #[test]
    fn strips_bot_mention() {
        assert_eq!(
            BotCommand::parse("/deletemessages@weekender_bot"),
            Some(BotCommand::DeleteMessages)
        );
    }

    #[test]
    fn plain_text_is_not_a_command() {
        assert_eq!(BotCommand::parse("see you on friday"), None);
        assert_eq!(BotCommand::parse(""), None);
        assert_eq!(BotCommand::parse("/"), None);
    }

    #[test]
    fn unknown_commands_keep_their_name() {
        let cmd = BotCommand::parse("/roll 2d6").unwrap();
        assert_eq!(cmd, BotCommand::Unknown { name: "roll".into() });
        assert_eq!(cmd.name(), "roll");
    }
}
