//! Keystroke debounce for typing indicators.
//!
//! The first keystroke emits `typing`. Every keystroke re-arms a deferred
//! check `quiet` later; the check emits `stop-typing` only if no keystroke
//! landed in between, so a steady typist produces exactly one `typing` and,
//! once they pause, exactly one `stop-typing`.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::time::Instant;

/// Quiet interval after which typing is considered stopped.
pub const DEFAULT_QUIET_INTERVAL: Duration = Duration::from_millis(3000);

/// Where the debouncer sends its signals.
pub trait TypingEmitter: Send + Sync + 'static {
    fn emit_typing(&self, channel: &str);
    fn emit_stop_typing(&self, channel: &str);
}

impl<T: TypingEmitter> TypingEmitter for Arc<T> {
    fn emit_typing(&self, channel: &str) {
        (**self).emit_typing(channel);
    }

    fn emit_stop_typing(&self, channel: &str) {
        (**self).emit_stop_typing(channel);
    }
}

#[derive(Debug)]
struct TypingState {
    /// Channel currently flagged as typing, if any.
    channel: Option<String>,
    last_keystroke: Instant,
}

/// Client-side typing debounce. Must be used inside a Tokio runtime.
#[derive(Debug)]
pub struct TypingDebouncer<E: TypingEmitter> {
    emitter: Arc<E>,
    quiet: Duration,
    state: Arc<Mutex<TypingState>>,
}

impl<E: TypingEmitter> TypingDebouncer<E> {
    pub fn new(emitter: E) -> Self {
        Self::with_quiet_interval(emitter, DEFAULT_QUIET_INTERVAL)
    }

    pub fn with_quiet_interval(emitter: E, quiet: Duration) -> Self {
        Self {
            emitter: Arc::new(emitter),
            quiet,
            state: Arc::new(Mutex::new(TypingState {
                channel: None,
                last_keystroke: Instant::now(),
            })),
        }
    }

    /// Whether a `typing` signal is outstanding.
    pub fn is_typing(&self) -> bool {
        self.state.lock().channel.is_some()
    }

    /// Record a keystroke in `channel`.
    pub fn keystroke(&self, channel: &str) {
        let (stop_previous, start) = {
            let mut state = self.state.lock();
            state.last_keystroke = Instant::now();
            match state.channel.as_deref() {
                Some(current) if current == channel => (None, false),
                _ => (state.channel.replace(channel.to_string()), true),
            }
        };

        if let Some(previous) = stop_previous {
            self.emitter.emit_stop_typing(&previous);
        }
        if start {
            self.emitter.emit_typing(channel);
        }

        let state = self.state.clone();
        let emitter = self.emitter.clone();
        let quiet = self.quiet;
        tokio::spawn(async move {
            tokio::time::sleep(quiet).await;
            let expired = {
                let mut state = state.lock();
                if state.last_keystroke.elapsed() >= quiet {
                    state.channel.take()
                } else {
                    None
                }
            };
            if let Some(channel) = expired {
                emitter.emit_stop_typing(&channel);
            }
        });
    }

    /// The user sent a message: stop typing right away.
    pub fn message_sent(&self) {
        let channel = self.state.lock().channel.take();
        if let Some(channel) = channel {
            self.emitter.emit_stop_typing(&channel);
        }
    }
}
