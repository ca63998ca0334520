//! Messenger that prints to a terminal instead of a chat platform.
//! 以终端输出代替聊天平台的消息适配器。

use std::collections::{HashMap, HashSet, VecDeque};
use std::io::Write;
use std::sync::Mutex;

use rb_core::ports::{MessengerError, MessengerPort, OutgoingMessage};
use rb_core::render::PREVIOUS_BUTTON_ID;
use rb_core::{ChannelId, MessageId, RenderedPage};

/// Editable message ids kept by default; older ones can no longer be edited.
pub const DEFAULT_EDIT_HISTORY: usize = 4096;

struct State<W> {
    out: W,
    known: HashSet<MessageId>,
    /// Insertion order of `known`, oldest first
    history: VecDeque<MessageId>,
    edit_history: usize,
    /// Last result page sent to each channel
    last_page: HashMap<ChannelId, MessageId>,
}

/// Writes every send and edit as a block of text.
///
/// Message ids are random, so handles printed with a page can be pasted
/// back into `!next` / `!prev`.
pub struct ConsoleMessenger<W> {
    state: Mutex<State<W>>,
}

impl ConsoleMessenger<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send> ConsoleMessenger<W> {
    pub fn new(out: W) -> Self {
        Self::with_edit_history(out, DEFAULT_EDIT_HISTORY)
    }

    /// Remember at most `edit_history` sent messages for later edits.
    pub fn with_edit_history(out: W, edit_history: usize) -> Self {
        Self {
            state: Mutex::new(State {
                out,
                known: HashSet::new(),
                history: VecDeque::new(),
                edit_history: edit_history.max(1),
                last_page: HashMap::new(),
            }),
        }
    }

    /// Handle of the most recent result page delivered to `channel_id`.
    pub fn last_page_in(&self, channel_id: &ChannelId) -> Option<MessageId> {
        self.lock().ok()?.last_page.get(channel_id).cloned()
    }

    /// Print a line that is not a message, such as a rejected button press.
    pub fn notice(&self, channel_id: &ChannelId, text: &str) -> Result<(), MessengerError> {
        let mut state = self.lock()?;
        writeln!(state.out, "[#{channel_id}] (only you can see this) {text}").map_err(io_error)?;
        state.out.flush().map_err(io_error)
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, State<W>>, MessengerError> {
        self.state
            .lock()
            .map_err(|_| MessengerError::Transport("console output poisoned".to_string()))
    }

    fn write(
        state: &mut State<W>,
        channel_id: &ChannelId,
        message_id: &MessageId,
        edited: bool,
        message: &OutgoingMessage,
    ) -> std::io::Result<()> {
        let marker = if edited { " (edited)" } else { "" };
        match message {
            OutgoingMessage::Text(text) => {
                writeln!(state.out, "[#{channel_id}] {message_id}{marker}: {text}")?;
            }
            OutgoingMessage::Page(page) => {
                writeln!(
                    state.out,
                    "[#{channel_id}] {message_id}{marker}: {}",
                    page.content
                )?;
                write_page(&mut state.out, message_id, page)?;
            }
        }
        state.out.flush()
    }
}

impl<W> State<W> {
    fn remember(&mut self, message_id: MessageId) {
        while self.history.len() >= self.edit_history {
            let Some(oldest) = self.history.pop_front() else {
                break;
            };
            self.known.remove(&oldest);
            self.last_page.retain(|_, id| id != &oldest);
        }
        self.known.insert(message_id.clone());
        self.history.push_back(message_id);
    }
}

fn write_page(
    out: &mut impl Write,
    message_id: &MessageId,
    page: &RenderedPage,
) -> std::io::Result<()> {
    writeln!(out, "  | {}", page.embed.title)?;
    for line in page.embed.description.lines() {
        writeln!(out, "  | {line}")?;
    }
    writeln!(out, "  | {}", page.embed.footer)?;
    let buttons: Vec<String> = page
        .buttons
        .iter()
        .map(|button| {
            format!(
                "[{}] !{} {message_id}",
                button.label,
                short_command(&button.custom_id)
            )
        })
        .collect();
    writeln!(out, "  | {}", buttons.join("   "))
}

fn short_command(button_id: &str) -> &str {
    match button_id {
        PREVIOUS_BUTTON_ID => "prev",
        other => other,
    }
}

fn io_error(err: std::io::Error) -> MessengerError {
    MessengerError::Transport(err.to_string())
}

#[async_trait::async_trait]
impl<W: Write + Send> MessengerPort for ConsoleMessenger<W> {
    async fn send(
        &self,
        channel_id: &ChannelId,
        message: OutgoingMessage,
    ) -> Result<MessageId, MessengerError> {
        let message_id = MessageId::generate();
        let mut state = self.lock()?;
        Self::write(&mut state, channel_id, &message_id, false, &message).map_err(io_error)?;

        state.remember(message_id.clone());
        if matches!(message, OutgoingMessage::Page(_)) {
            state
                .last_page
                .insert(channel_id.clone(), message_id.clone());
        }
        Ok(message_id)
    }

    async fn edit(
        &self,
        channel_id: &ChannelId,
        message_id: &MessageId,
        message: OutgoingMessage,
    ) -> Result<(), MessengerError> {
        let mut state = self.lock()?;
        if !state.known.contains(message_id) {
            return Err(MessengerError::MessageNotFound(message_id.to_string()));
        }
        Self::write(&mut state, channel_id, message_id, true, &message).map_err(io_error)
    }
}
