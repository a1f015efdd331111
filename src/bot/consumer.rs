//! Single-threaded fetch/process loop.

use crate::bot::events::{EventProcessor, EventSource};
use crate::error::Result;
use log::{debug, error};
use std::time::Duration;

/// Pulls batches from an event source and hands each event to a processor.
///
/// Events are processed sequentially in the order the source returns them.
/// A failing event is logged and skipped; it never stops the loop.
pub struct Consumer<S, P> {
    source: S,
    processor: P,
    batch_size: usize,
    poll_interval: Duration,
}

impl<S: EventSource, P: EventProcessor> Consumer<S, P> {
    /// Create a consumer fetching up to `batch_size` events per poll.
    pub fn new(source: S, processor: P, batch_size: usize, poll_interval: Duration) -> Self {
        Self {
            source,
            processor,
            batch_size,
            poll_interval,
        }
    }

    /// The processor handling events.
    pub fn processor(&self) -> &P {
        &self.processor
    }

    /// Take back the source and processor.
    pub fn into_parts(self) -> (S, P) {
        (self.source, self.processor)
    }

    /// Fetch and process one batch. Returns the number of events fetched.
    pub fn run_once(&mut self) -> Result<usize> {
        let events = self.source.fetch(self.batch_size)?;
        let fetched = events.len();

        for event in events {
            let kind = event.kind().to_string();
            match self.processor.process(event) {
                Ok(()) => debug!("processed {} event", kind),
                Err(e) => error!("can't handle {} event: {}", kind, e),
            }
        }

        Ok(fetched)
    }

    /// Process batches until the source returns an empty one.
    pub fn drain(&mut self) -> Result<usize> {
        let mut total = 0;
        loop {
            match self.run_once()? {
                0 => return Ok(total),
                n => total += n,
            }
        }
    }

    /// Process batches forever, sleeping whenever the source is idle or
    /// fetching fails.
    pub fn start(&mut self) -> ! {
        loop {
            match self.run_once() {
                Ok(0) => std::thread::sleep(self.poll_interval),
                Ok(_) => {}
                Err(e) => {
                    error!("can't fetch events: {}", e);
                    std::thread::sleep(self.poll_interval);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bot::events::Event;
    use crate::error::Error;
    use std::collections::VecDeque;

    struct Queue(VecDeque<Event>);

    impl EventSource for Queue {
        fn fetch(&mut self, limit: usize) -> Result<Vec<Event>> {
            let n = limit.min(self.0.len());
            Ok(self.0.drain(..n).collect())
        }
    }

    #[derive(Default)]
    struct Recorder(Vec<String>);

    impl EventProcessor for Recorder {
        fn process(&mut self, event: Event) -> Result<()> {
            match event {
                Event::Message { text, .. } => {
                    self.0.push(text);
                    Ok(())
                }
                other => Err(Error::UnknownEventType(other.kind().to_string())),
            }
        }
    }

    fn queue(texts: &[&str]) -> Queue {
        Queue(texts.iter().map(|t| Event::message(1, "alice", t)).collect())
    }

    #[test]
    fn test_run_once_respects_batch_size() {
        let mut consumer = Consumer::new(
            queue(&["a", "b", "c"]),
            Recorder::default(),
            2,
            Duration::ZERO,
        );

        assert_eq!(consumer.run_once().unwrap(), 2);
        assert_eq!(consumer.processor().0, vec!["a", "b"]);
    }

    #[test]
    fn test_drain_keeps_order() {
        let mut consumer = Consumer::new(
            queue(&["1", "2", "3", "4", "5"]),
            Recorder::default(),
            2,
            Duration::ZERO,
        );

        assert_eq!(consumer.drain().unwrap(), 5);
        let (_, recorder) = consumer.into_parts();
        assert_eq!(recorder.0, vec!["1", "2", "3", "4", "5"]);
    }

    #[test]
    fn test_failing_event_is_skipped() {
        let mut source = queue(&["before"]);
        source.0.push_back(Event::Unknown {
            kind: "poll".into(),
        });
        source.0.push_back(Event::message(1, "alice", "after"));

        let mut consumer = Consumer::new(source, Recorder::default(), 10, Duration::ZERO);

        assert_eq!(consumer.drain().unwrap(), 3);
        assert_eq!(consumer.processor().0, vec!["before", "after"]);
    }
}
