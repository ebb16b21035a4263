// src/overlay/log_capture.rs
//! Tracing layer that forwards log messages into the ECS so the overlay can show
//! the most recent warning or error.

use std::sync::mpsc;
use std::sync::Mutex;

use bevy::log::tracing::{self, Subscriber};
use bevy::log::tracing_subscriber::{self, Layer};
use bevy::log::{BoxedLayer, Level};
use bevy::prelude::*;

/// One captured log record.
#[derive(Event, Clone, Debug)]
pub struct CapturedLog {
    pub level: Level,
    pub message: String,
}

/// Most recent captured record; the banner is hidden while this is `None` or info-level.
#[derive(Resource, Clone, Debug, Default)]
pub struct LastLog(pub Option<CapturedLog>);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BannerKind {
    Warning,
    Error,
}

impl LastLog {
    /// Banner style for the last record, if one should be shown.
    pub fn banner(&self) -> Option<(BannerKind, &str)> {
        let log = self.0.as_ref()?;
        match log.level {
            Level::WARN => Some((BannerKind::Warning, &log.message)),
            Level::ERROR => Some((BannerKind::Error, &log.message)),
            _ => None,
        }
    }
}

#[derive(Resource)]
struct LogReceiver(Mutex<mpsc::Receiver<CapturedLog>>);

struct CaptureLayer {
    sender: mpsc::Sender<CapturedLog>,
}

impl<S: Subscriber> Layer<S> for CaptureLayer {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
        let mut message = None;
        event.record(&mut MessageVisitor(&mut message));
        if let Some(message) = message {
            // Receiver gone means the app is shutting down.
            let _ = self.sender.send(CapturedLog { level: *event.metadata().level(), message });
        }
    }
}

struct MessageVisitor<'a>(&'a mut Option<String>);

impl tracing::field::Visit for MessageVisitor<'_> {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            *self.0 = Some(format!("{value:?}"));
        }
    }
}

/// `LogPlugin::custom_layer` hook: installs the capture layer and the systems draining it.
pub fn capture_layer(app: &mut App) -> Option<BoxedLayer> {
    let (sender, receiver) = mpsc::channel();
    app.insert_resource(LogReceiver(Mutex::new(receiver)))
        .init_resource::<LastLog>()
        .add_event::<CapturedLog>()
        .add_systems(PreUpdate, (drain_captured_logs, remember_last_log).chain());
    Some(CaptureLayer { sender }.boxed())
}

fn drain_captured_logs(receiver: Res<LogReceiver>, mut out: EventWriter<CapturedLog>) {
    let Ok(rx) = receiver.0.lock() else { return };
    out.write_batch(rx.try_iter());
}

/// Only records at info or above replace the banner; debug/trace chatter is skipped.
fn remember_last_log(mut events: EventReader<CapturedLog>, mut last: ResMut<LastLog>) {
    for ev in events.read() {
        if ev.level <= Level::INFO {
            last.0 = Some(ev.clone());
        }
    }
}
