//! Crossterm adapter: terminal events in, canonical key-token strings out.
//!
//! Only key presses (and repeats) and bracketed pastes produce tokens.
//! Releases, focus changes, resizes and mouse reports are dropped, so a
//! host can forward every `Some` straight to `Model::dispatch`.

mod key_token;

pub use key_token::{key_token, map_key_token, map_mod_mask};

use crossterm::event::Event as CEvent;

#[inline]
pub(crate) fn log_paste(text: &str) {
    tracing::trace!(target: "input.paste", len = text.len(), "paste");
}

/// Token for any terminal event, `None` when the event is not input.
pub fn event_token(event: &CEvent) -> Option<String> {
    match event {
        CEvent::Key(key) => key_token(key),
        CEvent::Paste(text) if !text.is_empty() => {
            log_paste(text);
            Some(text.clone())
        }
        CEvent::Paste(_)
        | CEvent::Mouse(_)
        | CEvent::Resize(..)
        | CEvent::FocusGained
        | CEvent::FocusLost => None,
    }
}

#[cfg(test)]
mod tests {
    use std::fmt;
    use std::sync::{Arc, Mutex};
    use tracing::Subscriber;
    use tracing::dispatcher::Dispatch;
    use tracing::field::{Field, Visit};
    use tracing_subscriber::layer::{Context, Layer, SubscriberExt};
    use tracing_subscriber::registry::Registry;

    #[derive(Clone, Default)]
    struct Capture {
        events: Arc<Mutex<Vec<(String, Vec<(String, String)>)>>>,
    }

    #[derive(Default)]
    struct FieldCollector {
        fields: Vec<(String, String)>,
    }

    impl Visit for FieldCollector {
        fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
            self.fields.push((field.name().to_string(), format!("{value:?}")));
        }
    }

    impl<S: Subscriber> Layer<S> for Capture {
        fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
            let mut collector = FieldCollector::default();
            event.record(&mut collector);
            self.events
                .lock()
                .unwrap()
                .push((event.metadata().target().to_string(), collector.fields));
        }
    }

    #[test]
    fn paste_log_redacts_content() {
        let capture = Capture::default();
        let events = capture.events.clone();
        let dispatch = Dispatch::new(Registry::default().with(capture));

        tracing::dispatcher::with_default(&dispatch, || {
            super::log_paste("secret paste payload 💣");
        });

        let events = events.lock().unwrap();
        let (_, fields) = events
            .iter()
            .find(|(target, _)| target == "input.paste")
            .expect("missing input.paste event");
        assert!(fields.iter().any(|(name, _)| name == "len"));
        for (_, value) in fields {
            assert!(!value.contains("secret"), "paste content leaked: {value}");
            assert!(!value.contains('💣'), "paste content leaked: {value}");
        }
    }
}
