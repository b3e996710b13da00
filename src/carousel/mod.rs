//! Headless carousel widget.
//!
//! A [`Carousel`] is the client-side slider as a deterministic state
//! machine. It is mounted from the same data the HTML fragment carries,
//! consumes [`CarouselEvent`]s, and keeps its autoplay and
//! transition timers in a widget-owned [`TimerQueue`] on a virtual clock.
//!
//! ```text
//!   host events ──► CommandTable ──► Carousel ◄── advance(ms)
//!                                       │
//!                                       ▼
//!                               CarouselSnapshot
//! ```
//!
//! [`driver::spawn`] runs a widget on tokio, mapping the virtual clock onto
//! `tokio::time`.

mod commands;
pub mod driver;
mod geometry;
mod lazy;
mod timer;
mod widget;

pub use commands::{action, CarouselEvent, CommandTable, Handler, Wiring};
pub use driver::{CarouselHandle, DriverStopped};
pub use geometry::{format_number, transform_for, SlideSizing, SlideStyle, Strip};
pub use lazy::{
    placeholder_src, ImageElement, LazyLoader, DEFAULT_PLACEHOLDER_HEIGHT,
    DEFAULT_PLACEHOLDER_WIDTH,
};
pub use timer::{Task, TaskId, TimerQueue};
pub use widget::{
    Carousel, CarouselMount, CarouselSnapshot, DotElement, SlideElement, Transition,
    SWIPE_THRESHOLD,
};
