//! Presentation sink seam.
//!
//! The engine hands every [`AnimationEvent`] to an [`AnimationSink`] and
//! moves on. It never waits for the sink: delivery is fire-and-forget and the
//! per-step delay is the only pacing.

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures::Stream;
use parking_lot::Mutex;
use tokio::sync::mpsc;

use super::sample::{AnimationEvent, Sample};

/// Consumer of animation events (marker, camera and trail renderer).
///
/// `emit` is called from the run's task and must not block.
pub trait AnimationSink: Send + Sync + 'static {
    fn emit(&self, event: AnimationEvent);
}

impl<S: AnimationSink + ?Sized> AnimationSink for Arc<S> {
    fn emit(&self, event: AnimationEvent) {
        (**self).emit(event)
    }
}

impl AnimationSink for mpsc::UnboundedSender<AnimationEvent> {
    fn emit(&self, event: AnimationEvent) {
        // A dropped receiver just means nobody is watching any more
        let _ = self.send(event);
    }
}

/// Create a sink/stream pair for consumers that prefer a [`Stream`].
pub fn event_channel() -> (mpsc::UnboundedSender<AnimationEvent>, AnimationEvents) {
    let (tx, rx) = mpsc::unbounded_channel();
    (tx, AnimationEvents { rx })
}

/// Stream side of [`event_channel`].
#[derive(Debug)]
pub struct AnimationEvents {
    rx: mpsc::UnboundedReceiver<AnimationEvent>,
}

impl AnimationEvents {
    /// Receive the next event, or `None` once every sender is gone.
    pub async fn recv(&mut self) -> Option<AnimationEvent> {
        self.rx.recv().await
    }
}

impl Stream for AnimationEvents {
    type Item = AnimationEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.rx.poll_recv(cx)
    }
}

/// Sink that keeps every event in memory.
///
/// Handy for tests and for replaying a run after the fact.
#[derive(Debug, Default)]
pub struct CollectingSink {
    events: Mutex<Vec<AnimationEvent>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all events received so far.
    pub fn events(&self) -> Vec<AnimationEvent> {
        self.events.lock().clone()
    }

    /// Snapshot of the samples received so far, in order.
    pub fn samples(&self) -> Vec<Sample> {
        self.events
            .lock()
            .iter()
            .filter_map(AnimationEvent::as_sample)
            .cloned()
            .collect()
    }

    /// Number of samples received so far.
    pub fn sample_count(&self) -> usize {
        self.events
            .lock()
            .iter()
            .filter(|e| matches!(e, AnimationEvent::Sample(_)))
            .count()
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

impl AnimationSink for CollectingSink {
    fn emit(&self, event: AnimationEvent) {
        self.events.lock().push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    #[test]
    fn test_collecting_sink_records_in_order() {
        let sink = CollectingSink::new();
        sink.emit(AnimationEvent::Finished);
        sink.emit(AnimationEvent::Finished);
        assert_eq!(sink.events().len(), 2);
        assert_eq!(sink.sample_count(), 0);

        sink.clear();
        assert!(sink.events().is_empty());
    }

    #[test]
    fn test_arc_sink_forwards() {
        let sink = Arc::new(CollectingSink::new());
        let shared: Arc<dyn AnimationSink> = sink.clone();
        shared.emit(AnimationEvent::Finished);
        assert_eq!(sink.events(), vec![AnimationEvent::Finished]);
    }

    #[tokio::test]
    async fn test_event_channel_streams_events() {
        let (tx, events) = event_channel();
        tx.emit(AnimationEvent::Finished);
        drop(tx);

        let received: Vec<_> = events.collect().await;
        assert_eq!(received, vec![AnimationEvent::Finished]);
    }

    #[test]
    fn test_sender_ignores_closed_receiver() {
        let (tx, events) = event_channel();
        drop(events);
        tx.emit(AnimationEvent::Finished);
    }
}
