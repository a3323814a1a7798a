//! Command queue between the transport and the render loop.
//!
//! The transport side (a task, an interrupt handler or another thread)
//! pushes decoded commands; the render loop drains them at the start of a
//! tick. Access is serialized with `critical-section`, and storage is a
//! fixed-size `heapless::Deque`.

use core::cell::RefCell;

use critical_section::Mutex;
use heapless::Deque;
use thiserror::Error;

use crate::command::{Arg, Command, CommandError};

/// Default queue depth
pub const DEFAULT_QUEUE_SIZE: usize = 16;

/// Reasons a command could not be queued
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SendError {
    /// The queue is full; the rejected command is handed back
    #[error("command queue is full")]
    Full(Command),
    /// The address or argument list does not fit a queue entry
    #[error(transparent)]
    Invalid(#[from] CommandError),
}

/// Queue with [`DEFAULT_QUEUE_SIZE`] entries
pub type DefaultCommandChannel = CommandChannel<DEFAULT_QUEUE_SIZE>;

/// A bounded command queue.
pub struct CommandChannel<const SIZE: usize> {
    inner: Mutex<RefCell<Deque<Command, SIZE>>>,
}

impl<const SIZE: usize> CommandChannel<SIZE> {
    /// Create a new empty queue.
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(Deque::new())),
        }
    }

    /// Get a sender handle for this queue.
    ///
    /// Multiple senders can coexist; they share access to the same queue.
    pub const fn sender(&self) -> CommandSender<'_, SIZE> {
        CommandSender { channel: self }
    }

    /// Get a receiver handle for this queue.
    ///
    /// Only the render loop should drain the queue.
    pub const fn receiver(&self) -> CommandReceiver<'_, SIZE> {
        CommandReceiver { channel: self }
    }

    fn push(&self, command: Command) -> Result<(), SendError> {
        critical_section::with(|cs| {
            let mut queue = self.inner.borrow(cs).borrow_mut();
            queue.push_back(command).map_err(SendError::Full)
        })
    }

    fn pop(&self) -> Option<Command> {
        critical_section::with(|cs| self.inner.borrow(cs).borrow_mut().pop_front())
    }

    /// Number of queued commands
    pub fn len(&self) -> usize {
        critical_section::with(|cs| self.inner.borrow(cs).borrow().len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<const SIZE: usize> Default for CommandChannel<SIZE> {
    fn default() -> Self {
        Self::new()
    }
}

/// A sender handle for a [`CommandChannel`].
#[derive(Clone, Copy)]
pub struct CommandSender<'a, const SIZE: usize> {
    channel: &'a CommandChannel<SIZE>,
}

impl<const SIZE: usize> CommandSender<'_, SIZE> {
    /// Queue a decoded message.
    pub fn send(&self, address: &str, args: &[Arg]) -> Result<(), SendError> {
        let command = Command::new(address, args)?;
        self.try_send(command)
    }

    /// Queue an already built command.
    ///
    /// Returns the command back inside `SendError::Full` if the queue is full.
    pub fn try_send(&self, command: Command) -> Result<(), SendError> {
        self.channel.push(command).inspect_err(|_| {
            log::warn!("command queue full, dropping message");
        })
    }
}

/// A receiver handle for a [`CommandChannel`].
#[derive(Clone, Copy)]
pub struct CommandReceiver<'a, const SIZE: usize> {
    channel: &'a CommandChannel<SIZE>,
}

impl<const SIZE: usize> CommandReceiver<'_, SIZE> {
    /// Take the oldest queued command, if any.
    pub fn try_receive(&self) -> Option<Command> {
        self.channel.pop()
    }

    pub fn is_empty(&self) -> bool {
        self.channel.is_empty()
    }
}
