//! Background Saver
//!
//! A cancellable repeating task on its own thread.
//!
//! The worker `select!`s between a ticker and a stop channel. Dropping the
//! stop sender disconnects the channel, which wakes the worker immediately
//! even mid-interval, so `stop` never waits out a full tick.

use std::io;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam::channel::{bounded, select, tick, Sender};

/// Handle to a running repeating task
pub struct Saver {
    /// Dropped to signal shutdown
    stop: Sender<()>,

    /// Worker thread
    handle: JoinHandle<()>,
}

impl Saver {
    /// Run `task` every `interval` until stopped
    ///
    /// The first run happens one interval after spawning.
    pub fn spawn<F>(interval: Duration, task: F) -> io::Result<Self>
    where
        F: Fn() + Send + 'static,
    {
        let (stop, stopped) = bounded::<()>(0);

        let handle = thread::Builder::new()
            .name("stylestore-saver".to_string())
            .spawn(move || {
                let ticker = tick(interval);
                loop {
                    select! {
                        recv(ticker) -> _ => task(),
                        recv(stopped) -> _ => break,
                    }
                }
                tracing::debug!("Background saver stopped");
            })?;

        Ok(Self { stop, handle })
    }

    /// Stop the worker and wait for it to exit
    ///
    /// A save already in progress runs to completion first.
    pub fn stop(self) {
        drop(self.stop);
        if self.handle.join().is_err() {
            tracing::error!("Background saver panicked");
        }
    }
}
