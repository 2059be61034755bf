//! Background tasks bound to a logger's lifetime: the periodic flush and the
//! one-shot termination-signal hook.
//!
//! Both threads hold the logger's shared state and are stopped (and joined)
//! when the owning `Logger` is dropped.

use crate::internal;
use crate::logger::Inner;
use std::sync::Arc;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread::{self, JoinHandle};

/// Which background tasks a logger runs while file output is enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DaemonOptions {
    pub flush: bool,
    pub signals: bool,
}

impl Default for DaemonOptions {
    fn default() -> Self {
        Self {
            flush: true,
            signals: true,
        }
    }
}

pub(crate) struct Daemon {
    flusher: Option<Flusher>,
    #[cfg(unix)]
    signals: Option<signals::SignalWatch>,
}

impl Daemon {
    /// Spawn failures are reported and leave that task off; logging still works without it.
    pub(crate) fn start(inner: &Arc<Inner>, options: DaemonOptions) -> Self {
        let flusher = options
            .flush
            .then(|| Flusher::spawn(Arc::clone(inner)))
            .and_then(|spawned| {
                spawned
                    .map_err(|e| internal::warn("DAEMON", &format!("flush loop not started: {e}")))
                    .ok()
            });

        #[cfg(unix)]
        let signals = options
            .signals
            .then(|| signals::SignalWatch::spawn(Arc::clone(inner)))
            .and_then(|spawned| {
                spawned
                    .map_err(|e| internal::warn("DAEMON", &format!("signal hook not installed: {e}")))
                    .ok()
            });

        internal::debug("DAEMON", "Background tasks started");
        Self {
            flusher,
            #[cfg(unix)]
            signals,
        }
    }

    pub(crate) fn stop(self) {
        if let Some(flusher) = self.flusher {
            flusher.stop();
        }
        #[cfg(unix)]
        if let Some(signals) = self.signals {
            signals.stop();
        }
        internal::debug("DAEMON", "Background tasks stopped");
    }
}

/// Flushes and syncs on every tick. The interval is re-read each tick so
/// `set_flush_interval` applies without a restart.
struct Flusher {
    stop: mpsc::Sender<()>,
    thread: JoinHandle<()>,
}

impl Flusher {
    fn spawn(inner: Arc<Inner>) -> std::io::Result<Self> {
        let (stop, stopped) = mpsc::channel::<()>();
        let thread = thread::Builder::new()
            .name("daylog-flush".to_string())
            .spawn(move || {
                loop {
                    match stopped.recv_timeout(inner.flush_interval()) {
                        Err(RecvTimeoutError::Timeout) => {
                            if let Err(e) = inner.flush() {
                                internal::warn("DAEMON", &format!("periodic flush failed: {e}"));
                            }
                        }
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
            })?;
        Ok(Self { stop, thread })
    }

    fn stop(self) {
        drop(self.stop);
        let _ = self.thread.join();
    }
}

#[cfg(unix)]
mod signals {
    use crate::logger::Inner;
    use signal_hook::consts::{SIGHUP, SIGINT, SIGQUIT, SIGTERM};
    use signal_hook::flag;
    use signal_hook::iterator::{Handle, Signals};
    use signal_hook::low_level::signal_name;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Mutex, PoisonError};
    use std::thread::{self, JoinHandle};

    const SHUTDOWN_SIGNALS: [i32; 4] = [SIGTERM, SIGINT, SIGHUP, SIGQUIT];

    /// Process-wide fallback: while no watch is live, the shutdown signals
    /// take their default action again.
    struct DefaultAction {
        restore: Arc<AtomicBool>,
        watches: usize,
    }

    static DEFAULT_ACTION: Mutex<Option<DefaultAction>> = Mutex::new(None);

    fn watch_started() -> std::io::Result<()> {
        let mut slot = DEFAULT_ACTION.lock().unwrap_or_else(PoisonError::into_inner);
        if slot.is_none() {
            let restore = Arc::new(AtomicBool::new(false));
            for signal in SHUTDOWN_SIGNALS {
                flag::register_conditional_default(signal, Arc::clone(&restore))?;
            }
            *slot = Some(DefaultAction {
                restore,
                watches: 0,
            });
        }
        let Some(action) = slot.as_mut() else {
            return Ok(());
        };
        action.watches += 1;
        action.restore.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn watch_stopped() {
        let mut slot = DEFAULT_ACTION.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(action) = slot.as_mut() {
            action.watches = action.watches.saturating_sub(1);
            if action.watches == 0 {
                action.restore.store(true, Ordering::SeqCst);
            }
        }
    }

    /// Waits for the first termination signal, unregisters itself, then logs,
    /// flushes and exits with success.
    ///
    /// Once the last watch in the process stops, the signals fall back to
    /// their default action instead of being swallowed by stale handlers.
    pub(super) struct SignalWatch {
        handle: Handle,
        thread: JoinHandle<()>,
    }

    impl SignalWatch {
        pub(super) fn spawn(inner: Arc<Inner>) -> std::io::Result<Self> {
            watch_started()?;
            let mut signals = match Signals::new(SHUTDOWN_SIGNALS) {
                Ok(signals) => signals,
                Err(e) => {
                    watch_stopped();
                    return Err(e);
                }
            };
            let handle = signals.handle();
            let spawned = thread::Builder::new()
                .name("daylog-signal".to_string())
                .spawn(move || {
                    let Some(signal) = signals.forever().next() else {
                        return;
                    };
                    signals.handle().close();
                    let name = signal_name(signal).map_or_else(|| signal.to_string(), str::to_string);
                    inner.shutdown(&name);
                });
            match spawned {
                Ok(thread) => Ok(Self { handle, thread }),
                Err(e) => {
                    handle.close();
                    watch_stopped();
                    Err(e)
                }
            }
        }

        pub(super) fn stop(self) {
            self.handle.close();
            let _ = self.thread.join();
            watch_stopped();
        }
    }
}
