//! The log sink handed to the resource store, the loader and the GPU caches.
//!
//! Every component logs through the `tracing` macros. Which subscriber receives
//! those records is decided by the [`LogSink`] the component was constructed
//! with: a sink either carries its own [`Dispatch`] or defers to whatever the
//! process installed globally.
//!
//! Lifecycle: build the sink once at process start, clone it into the
//! components that should report to it and drop the last clone at shutdown.

use std::fmt::{Debug, Formatter};
use tracing::Dispatch;
use tracing::dispatcher::{self, DefaultGuard};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Clone, Default)]
pub struct LogSink {
    dispatch: Option<Dispatch>,
}

impl LogSink {
    /// A sink that forwards to the process wide default subscriber.
    pub fn global() -> Self {
        Self { dispatch: None }
    }

    pub fn new(dispatch: Dispatch) -> Self {
        Self {
            dispatch: Some(dispatch),
        }
    }

    /// Formatted output on stdout, filtered by `RUST_LOG`.
    pub fn from_env() -> Self {
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .finish();
        Self::new(Dispatch::new(subscriber))
    }

    /// Formatted output into `make_writer`, filtered by the given directives (e.g. `"warn"`).
    pub fn with_writer<W>(make_writer: W, directives: &str) -> Self
    where
        W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
    {
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(EnvFilter::new(directives))
            .with_writer(make_writer)
            .with_ansi(false)
            .finish();
        Self::new(Dispatch::new(subscriber))
    }

    /// Makes this sink the default of the current thread until the guard is dropped.
    ///
    /// Returns `None` for the global sink, which needs no installation.
    pub fn install(&self) -> Option<DefaultGuard> {
        self.dispatch.as_ref().map(dispatcher::set_default)
    }

    /// Runs `f` with this sink as the active subscriber.
    pub fn scope<R>(&self, f: impl FnOnce() -> R) -> R {
        match &self.dispatch {
            Some(dispatch) => dispatcher::with_default(dispatch, f),
            None => f(),
        }
    }

    pub fn is_global(&self) -> bool {
        self.dispatch.is_none()
    }
}

impl Debug for LogSink {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.dispatch {
            None => write!(f, "LogSink(global)"),
            Some(_) => write!(f, "LogSink(dedicated)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Buffer(Arc<Mutex<Vec<u8>>>);

    impl Write for Buffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl Buffer {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    #[test]
    fn scoped_sink_receives_records() {
        let buffer = Buffer::default();
        let writer = buffer.clone();
        let sink = LogSink::with_writer(move || writer.clone(), "info");

        sink.scope(|| tracing::warn!("texture #4 rejected"));
        sink.scope(|| tracing::debug!("filtered out"));

        let out = buffer.contents();
        assert!(out.contains("texture #4 rejected"));
        assert!(!out.contains("filtered out"));
    }

    #[test]
    fn installed_sink_is_the_thread_default() {
        let buffer = Buffer::default();
        let writer = buffer.clone();
        let sink = LogSink::with_writer(move || writer.clone(), "debug");

        {
            let _guard = sink.install();
            tracing::debug!("mesh #2 retained");
        }
        tracing::debug!("after the guard");

        let out = buffer.contents();
        assert!(out.contains("mesh #2 retained"));
        assert!(!out.contains("after the guard"));
    }

    #[test]
    fn global_sink_runs_closure() {
        let sink = LogSink::global();
        assert!(sink.is_global());
        assert!(sink.install().is_none());
        assert_eq!(sink.scope(|| 3 + 4), 7);
    }
}
