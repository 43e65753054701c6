//! Commands pushed into a session from outside the tick.
//!
//! Input callbacks, prompt responses and button clicks may arrive on any
//! task. They are queued here and drained at the start of the next tick.

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::input::Key;
use crate::prompt::PromptOutcome;
use crate::touch::PointerEvent;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SessionCommand {
    /// A mapped key changed level.
    Key { key: Key, down: bool },
    Pointer(PointerEvent),
    /// The prompt entry was submitted but was empty after trimming.
    EmptyPrompt,
    /// A prompt request finished, successfully or not.
    PromptResolved(PromptOutcome),
    /// An action button was clicked.
    Button { label: String },
}

/// Shared FIFO of [`SessionCommand`]s. Clones push into the same queue.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "bevy", derive(bevy::prelude::Resource))]
pub struct CommandQueue {
    inner: Arc<Mutex<VecDeque<SessionCommand>>>,
}

impl CommandQueue {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(VecDeque::new())),
        }
    }

    /// Push a command to be processed.
    pub fn push(&self, command: SessionCommand) {
        self.inner.lock().push_back(command);
    }

    /// Drain all pending commands.
    pub fn drain(&self) -> Vec<SessionCommand> {
        self.inner.lock().drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }
}

impl Default for CommandQueue {
    fn default() -> Self {
        Self::new()
    }
}
