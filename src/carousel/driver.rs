//! Runs a carousel on the tokio runtime.
//!
//! The driver task owns the widget. Events arrive over an mpsc channel, the
//! task sleeps until the widget's next scheduled deadline, and every change
//! is published as a [`CarouselSnapshot`] on a watch channel. The widget's
//! virtual clock is pinned to milliseconds elapsed since the driver started.

use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tracing::debug;

use super::commands::CarouselEvent;
use super::widget::{Carousel, CarouselSnapshot};

/// Pending events buffered per driver.
const EVENT_BUFFER: usize = 64;

#[derive(Debug)]
enum DriverMessage {
    Event(CarouselEvent),
    Dispose,
}

/// Returned when the driver task is gone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("carousel driver has stopped")]
pub struct DriverStopped;

/// Handle to a running carousel.
///
/// Dropping the handle closes the event channel, which disposes the widget.
pub struct CarouselHandle {
    events: mpsc::Sender<DriverMessage>,
    snapshots: watch::Receiver<CarouselSnapshot>,
    task: JoinHandle<()>,
}

impl CarouselHandle {
    /// Deliver an event to the widget.
    pub async fn send(&self, event: CarouselEvent) -> Result<(), DriverStopped> {
        self.events
            .send(DriverMessage::Event(event))
            .await
            .map_err(|_| DriverStopped)
    }

    /// Latest published state.
    pub fn snapshot(&self) -> CarouselSnapshot {
        self.snapshots.borrow().clone()
    }

    /// A receiver that sees every future snapshot.
    pub fn subscribe(&self) -> watch::Receiver<CarouselSnapshot> {
        let mut receiver = self.snapshots.clone();
        receiver.mark_unchanged();
        receiver
    }

    /// Dispose the widget and wait for the driver to exit.
    ///
    /// Returns the final snapshot.
    pub async fn dispose(self) -> CarouselSnapshot {
        let _ = self.events.send(DriverMessage::Dispose).await;
        drop(self.events);
        let _ = self.task.await;
        let snapshot = self.snapshots.borrow().clone();
        snapshot
    }
}

/// Start driving a carousel on the current runtime.
pub fn spawn(carousel: Carousel) -> CarouselHandle {
    let (events_tx, events_rx) = mpsc::channel(EVENT_BUFFER);
    let (snapshot_tx, snapshot_rx) = watch::channel(carousel.snapshot());
    let task = tokio::spawn(run(carousel, events_rx, snapshot_tx));
    CarouselHandle {
        events: events_tx,
        snapshots: snapshot_rx,
        task,
    }
}

async fn run(
    mut carousel: Carousel,
    mut events: mpsc::Receiver<DriverMessage>,
    snapshots: watch::Sender<CarouselSnapshot>,
) {
    let started = Instant::now();
    let base = carousel.now();
    let elapsed = move || base + started.elapsed().as_millis() as u64;

    debug!(slides = carousel.slide_count(), "Carousel driver started");

    loop {
        let deadline = carousel
            .next_deadline()
            .map(|at| started + Duration::from_millis(at.saturating_sub(base)));

        tokio::select! {
            message = events.recv() => {
                carousel.advance_to(elapsed());
                match message {
                    Some(DriverMessage::Event(event)) => {
                        carousel.handle(&event);
                    }
                    Some(DriverMessage::Dispose) | None => break,
                }
            }
            _ = sleep_until(deadline.unwrap_or(started)), if deadline.is_some() => {
                carousel.advance_to(elapsed());
            }
        }

        snapshots.send_replace(carousel.snapshot());
    }

    carousel.dispose();
    snapshots.send_replace(carousel.snapshot());
    debug!("Carousel driver stopped");
}
