//! Log output for the viewer and the tools
//!
//! Recordings are loaded before the Bevy app is built, so the subscriber is
//! installed up front rather than by `LogPlugin`. `RUST_LOG` overrides the
//! default `info` level.

use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::fmt::MakeWriter;

fn env_filter() -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy()
}

/// Formatting subscriber writing to `writer`
pub fn subscriber<W>(writer: W) -> impl tracing::Subscriber + Send + Sync + 'static
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_target(false)
        .with_writer(writer)
        .finish()
}

/// Install the global stderr subscriber. Returns false if one was already set.
pub fn init_logging() -> bool {
    tracing::subscriber::set_global_default(subscriber(std::io::stderr)).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{self, Write};
    use std::sync::{Arc, Mutex};

    use crate::demo::DemoSource;
    use crate::replay::load_replay;

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Captured {
        fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    #[test]
    fn test_load_warnings_reach_subscriber() {
        let captured = Captured::default();
        let writer = captured.clone();
        let source =
            DemoSource::from_content("HD|64.0|de_dust2\nFR|{\"tick\":1}\nFR|{\"tick\":\nZZ\nFR|{\"tick\":2}\n")
                .unwrap();

        let replay = tracing::subscriber::with_default(subscriber(move || writer.clone()), || {
            load_replay(&source)
        })
        .unwrap();
        assert_eq!(replay.stats.skipped_frames, 1);
        assert_eq!(replay.stats.skipped_events, 1);

        let text = captured.text();
        assert!(text.contains("Skipping frame"), "{}", text);
        assert!(text.contains("Skipping event"), "{}", text);
        assert!(text.contains("Loaded 2 frames"), "{}", text);
    }

    #[test]
    fn test_global_subscriber_installed_once() {
        init_logging();
        assert!(tracing::dispatcher::has_been_set());
        assert!(!init_logging());
    }
}
