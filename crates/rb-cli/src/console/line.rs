use rb_core::{ChannelId, GuildId, MessageId, OriginRef, UserId};

/// Who is typing: the requester and the channel the line is posted in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user: UserId,
    pub channel: ChannelId,
    pub guild: Option<GuildId>,
}

impl Identity {
    pub fn origin(&self) -> OriginRef {
        OriginRef::new(self.channel.clone(), self.user.clone(), self.guild.clone())
    }

    /// `<user>@<channel>[#guild]`
    fn parse(raw: &str) -> Option<Self> {
        let (user, rest) = raw.split_once('@')?;
        let (channel, guild) = match rest.split_once('#') {
            Some((channel, guild)) => (channel, Some(guild)),
            None => (rest, None),
        };
        if user.is_empty() || channel.is_empty() || guild.is_some_and(str::is_empty) {
            return None;
        }
        Some(Self {
            user: UserId::from(user),
            channel: ChannelId::from(channel),
            guild: guild.map(GuildId::from),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    /// Full command text, parsed by the scheduler
    Calculate(String),
    /// Page forward; without a handle, the last page shown in the channel
    Next(Option<MessageId>),
    Prev(Option<MessageId>),
    Queue,
    Help,
    Quit,
    Unknown(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleLine {
    /// Acting identity from a `<user>@<channel>[#guild]:` prefix
    pub identity: Option<Identity>,
    pub command: ConsoleCommand,
}

/// Parse one input line. Blank lines yield `None`.
pub fn parse_line(line: &str) -> Option<ConsoleLine> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let (identity, text) = match line.split_once(char::is_whitespace) {
        Some((first, rest)) if first.ends_with(':') => {
            match Identity::parse(first.trim_end_matches(':')) {
                Some(identity) => (Some(identity), rest.trim()),
                None => (None, line),
            }
        }
        _ => (None, line),
    };

    let mut tokens = text.split_whitespace();
    let handle = |token: Option<&str>| token.map(MessageId::from);
    let command = match tokens.next() {
        Some("!calculate") => ConsoleCommand::Calculate(text.to_string()),
        Some("!next") => ConsoleCommand::Next(handle(tokens.next())),
        Some("!prev") => ConsoleCommand::Prev(handle(tokens.next())),
        Some("!queue") => ConsoleCommand::Queue,
        Some("!help") => ConsoleCommand::Help,
        Some("!quit") => ConsoleCommand::Quit,
        _ => ConsoleCommand::Unknown(text.to_string()),
    };

    Some(ConsoleLine { identity, command })
}
