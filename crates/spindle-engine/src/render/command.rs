use std::sync::{Mutex, MutexGuard, PoisonError};

/// Intent published by the owning thread for the render thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command<W> {
    None,
    /// Bind a surface to this window.
    WindowChanged(W),
    /// Release the surface and leave the render loop.
    ShutdownRequested,
}

impl<W> Command<W> {
    pub fn is_none(&self) -> bool {
        matches!(self, Command::None)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Command::None => "none",
            Command::WindowChanged(_) => "window-changed",
            Command::ShutdownRequested => "shutdown",
        }
    }
}

/// Single-slot mailbox between the owning thread and the render thread.
///
/// Publishing replaces whatever is pending: an unconsumed command is lost,
/// not queued. The lock is held only for the swap itself.
pub(crate) struct CommandCell<W> {
    slot: Mutex<Command<W>>,
}

impl<W> CommandCell<W> {
    pub fn new() -> Self {
        Self {
            slot: Mutex::new(Command::None),
        }
    }

    /// Stores `command` and returns the one it displaced.
    pub fn publish(&self, command: Command<W>) -> Command<W> {
        std::mem::replace(&mut *self.lock(), command)
    }

    /// Takes the pending command, leaving `Command::None`.
    pub fn take(&self) -> Command<W> {
        std::mem::replace(&mut *self.lock(), Command::None)
    }

    // The slot holds plain data, so a panic while it was locked cannot leave it
    // half-written.
    fn lock(&self) -> MutexGuard<'_, Command<W>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn take_clears_the_slot() {
        let cell = CommandCell::new();
        cell.publish(Command::WindowChanged(7));

        assert_eq!(cell.take(), Command::WindowChanged(7));
        assert_eq!(cell.take(), Command::None);
    }

    #[test]
    fn last_writer_wins() {
        let cell = CommandCell::new();
        assert!(cell.publish(Command::WindowChanged(1)).is_none());

        let displaced = cell.publish(Command::WindowChanged(2));
        assert_eq!(displaced, Command::WindowChanged(1));
        assert_eq!(cell.take(), Command::WindowChanged(2));
    }

    #[test]
    fn shutdown_drops_pending_window_change() {
        let cell = CommandCell::new();
        cell.publish(Command::WindowChanged(1));

        let displaced = cell.publish(Command::ShutdownRequested);
        assert_eq!(displaced.name(), "window-changed");
        assert_eq!(cell.take(), Command::ShutdownRequested);
    }

    #[test]
    fn poisoned_slot_is_still_usable() {
        let cell = std::sync::Arc::new(CommandCell::new());
        let poisoner = std::sync::Arc::clone(&cell);

        let _ = std::thread::spawn(move || {
            let _guard = poisoner.lock();
            panic!("poison the command cell");
        })
        .join();

        cell.publish(Command::WindowChanged(3));
        assert_eq!(cell.take(), Command::WindowChanged(3));
    }
}
