//! The carousel state machine.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::banner::Settings;
use crate::render::RenderPayload;

use super::commands::{CarouselEvent, CommandTable, Wiring};
use super::geometry::{transform_for, SlideSizing, SlideStyle, Strip};
use super::lazy::{ImageElement, LazyLoader};
use super::timer::{Task, TaskId, TimerQueue};

/// Minimum horizontal travel (px) for a touch gesture to count as a swipe.
pub const SWIPE_THRESHOLD: f64 = 50.0;

// =============================================================================
// Mount
// =============================================================================

/// One slide element as mounted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlideElement {
    pub index: usize,
    pub image: ImageElement,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Natural rendered width of the slide when auto-sized (px)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intrinsic_width: Option<f64>,
}

impl SlideElement {
    pub fn new(index: usize, image: ImageElement) -> Self {
        Self {
            index,
            image,
            link: None,
            title: None,
            intrinsic_width: None,
        }
    }

    pub fn with_intrinsic_width(mut self, width: f64) -> Self {
        self.intrinsic_width = Some(width);
        self
    }
}

/// One dot indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DotElement {
    pub index: usize,
    pub active: bool,
}

/// Everything a carousel is constructed from, besides its settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarouselMount {
    pub slides: Vec<SlideElement>,

    #[serde(default)]
    pub dots: Vec<DotElement>,

    #[serde(default)]
    pub prev_control: bool,

    #[serde(default)]
    pub next_control: bool,

    pub container_width: f64,
    pub viewport_width: f64,

    /// Whether the host can report viewport intersections
    #[serde(default)]
    pub intersection_observer: bool,
}

impl CarouselMount {
    /// The mount produced by the HTML fragment for this payload.
    pub fn from_payload(payload: &RenderPayload, container_width: f64, viewport_width: f64) -> Self {
        let slides = payload
            .slides
            .iter()
            .map(|view| SlideElement {
                index: view.index,
                image: ImageElement::from_view(view),
                link: view.link.clone(),
                title: view.title.clone(),
                intrinsic_width: None,
            })
            .collect::<Vec<_>>();
        let dots = if payload.settings.show_dots {
            (0..slides.len())
                .map(|index| DotElement {
                    index,
                    active: index == 0,
                })
                .collect()
        } else {
            Vec::new()
        };

        Self {
            slides,
            dots,
            prev_control: payload.settings.show_arrows,
            next_control: payload.settings.show_arrows,
            container_width,
            viewport_width,
            intersection_observer: true,
        }
    }

    /// Set intrinsic slide widths in display order.
    pub fn with_intrinsic_widths(mut self, widths: &[f64]) -> Self {
        for (slide, width) in self.slides.iter_mut().zip(widths) {
            slide.intrinsic_width = Some(*width);
        }
        self
    }
}

// =============================================================================
// Snapshot
// =============================================================================

/// Observable state of a carousel at one instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarouselSnapshot {
    pub current_index: usize,
    pub is_animating: bool,
    pub autoplay_armed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_dot: Option<usize>,
    pub offset: f64,
    pub transform: String,
    pub transition: String,
    pub slide_styles: Vec<SlideStyle>,
    /// Virtual clock (ms)
    pub now: u64,
    pub disposed: bool,
}

/// Transition applied to the strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// No transition set
    Cleared,
    /// Instant move
    None,
    /// Timed ease over the given milliseconds
    Ease(u64),
}

impl Transition {
    pub fn css(&self) -> String {
        match self {
            Transition::Cleared => String::new(),
            Transition::None => "none".to_string(),
            Transition::Ease(ms) => format!("transform {}ms ease", ms),
        }
    }
}

// =============================================================================
// Carousel
// =============================================================================

/// A headless carousel driven by host events and a virtual clock.
#[derive(Debug)]
pub struct Carousel {
    base: Settings,
    settings: Settings,
    slides: Vec<SlideElement>,
    dots: Vec<DotElement>,
    strip: Strip,
    sizing: SlideSizing,
    viewport_width: f64,

    current_index: usize,
    is_animating: bool,
    touch_start_x: f64,
    touch_end_x: f64,
    offset: f64,
    transition: Transition,

    timers: TimerQueue,
    autoplay: Option<TaskId>,
    animation_clear: Option<TaskId>,
    lazy: LazyLoader,
    commands: CommandTable,
    disposed: bool,
}

impl Carousel {
    /// Mount a carousel.
    ///
    /// Applies the breakpoint covering the mount viewport, sizes the slides,
    /// wires the command table, starts autoplay when enabled, prioritizes the
    /// first image and sets up lazy loading.
    pub fn new(mount: CarouselMount, base: Settings) -> Self {
        let settings = effective_settings(&base, mount.viewport_width);
        let strip = Strip::new(
            mount.container_width,
            mount.slides.iter().map(|s| s.intrinsic_width).collect(),
        );
        let commands = CommandTable::standard(Wiring {
            prev_control: mount.prev_control,
            next_control: mount.next_control,
            dots: !mount.dots.is_empty(),
            pause_on_hover: settings.pause_on_hover,
        });

        let mut carousel = Self {
            sizing: SlideSizing::for_settings(&settings),
            base,
            settings,
            slides: mount.slides,
            dots: mount.dots,
            strip,
            viewport_width: mount.viewport_width,
            current_index: 0,
            is_animating: false,
            touch_start_x: 0.0,
            touch_end_x: 0.0,
            offset: 0.0,
            transition: Transition::Cleared,
            timers: TimerQueue::new(),
            autoplay: None,
            animation_clear: None,
            lazy: LazyLoader::default(),
            commands,
            disposed: false,
        };

        carousel.update_dots();
        if carousel.settings.autoplay {
            carousel.start_autoplay();
        }
        if let Some(first) = carousel.slides.first_mut() {
            first.image.prioritize();
        }
        let mut images: Vec<&mut ImageElement> =
            carousel.slides.iter_mut().map(|s| &mut s.image).collect();
        carousel.lazy = LazyLoader::init(&mut images, mount.intersection_observer);

        debug!(
            slides = carousel.slides.len(),
            autoplay = carousel.settings.autoplay,
            "Carousel mounted"
        );
        carousel
    }

    /// Mount a carousel for a render payload.
    pub fn from_payload(payload: &RenderPayload, container_width: f64, viewport_width: f64) -> Self {
        Self::new(
            CarouselMount::from_payload(payload, container_width, viewport_width),
            payload.settings.clone(),
        )
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn is_animating(&self) -> bool {
        self.is_animating
    }

    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    pub fn slides(&self) -> &[SlideElement] {
        &self.slides
    }

    pub fn dots(&self) -> &[DotElement] {
        &self.dots
    }

    /// Index of the active dot, if there are dots.
    pub fn active_dot(&self) -> Option<usize> {
        self.dots.iter().position(|d| d.active)
    }

    /// Settings currently in effect (base or breakpoint override).
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn sizing(&self) -> SlideSizing {
        self.sizing
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn transition(&self) -> Transition {
        self.transition
    }

    pub fn touch_positions(&self) -> (f64, f64) {
        (self.touch_start_x, self.touch_end_x)
    }

    pub fn is_autoplay_armed(&self) -> bool {
        self.autoplay.is_some()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn commands(&self) -> &CommandTable {
        &self.commands
    }

    pub fn timers(&self) -> &TimerQueue {
        &self.timers
    }

    pub fn is_observing(&self, index: usize) -> bool {
        self.lazy.is_observing(index)
    }

    /// Inline style of every slide.
    pub fn slide_styles(&self) -> Vec<SlideStyle> {
        let style = self.sizing.style();
        vec![style; self.slides.len()]
    }

    pub fn snapshot(&self) -> CarouselSnapshot {
        CarouselSnapshot {
            current_index: self.current_index,
            is_animating: self.is_animating,
            autoplay_armed: self.autoplay.is_some(),
            active_dot: self.active_dot(),
            offset: self.offset,
            transform: transform_for(self.offset),
            transition: self.transition.css(),
            slide_styles: self.slide_styles(),
            now: self.timers.now(),
            disposed: self.disposed,
        }
    }

    // -------------------------------------------------------------------------
    // Events and time
    // -------------------------------------------------------------------------

    /// Dispatch a host event through the command table.
    ///
    /// Returns false when the widget is disposed or nothing handles the event.
    pub fn handle(&mut self, event: &CarouselEvent) -> bool {
        if self.disposed {
            return false;
        }
        match self.commands.lookup(event.action()) {
            Some(handler) => {
                handler(self, event);
                true
            }
            None => false,
        }
    }

    /// Advance the virtual clock by `ms`, running every task that comes due.
    pub fn advance(&mut self, ms: u64) {
        let until = self.timers.now().saturating_add(ms);
        self.advance_to(until);
    }

    /// Advance the virtual clock to an absolute time.
    pub fn advance_to(&mut self, time: u64) {
        while let Some((id, task)) = self.timers.pop_due(time) {
            self.run(id, task);
        }
        self.timers.advance_to(time);
    }

    /// Deadline of the next scheduled task.
    pub fn next_deadline(&self) -> Option<u64> {
        self.timers.next_deadline()
    }

    pub fn now(&self) -> u64 {
        self.timers.now()
    }

    fn run(&mut self, id: TaskId, task: Task) {
        match task {
            Task::Autoplay => self.next_slide(),
            Task::ClearAnimation => {
                if self.animation_clear == Some(id) {
                    self.animation_clear = None;
                }
                self.is_animating = false;
                self.transition = Transition::Cleared;
            }
        }
    }

    // -------------------------------------------------------------------------
    // Navigation
    // -------------------------------------------------------------------------

    /// Move to a slide.
    ///
    /// Ignored while a transition is running or when `index` already is the
    /// current index. Out-of-range indices wrap when looping (anything below
    /// zero goes to the last slide, anything past the end to the first) and
    /// are clamped otherwise.
    pub fn go_to_slide(&mut self, index: isize, animate: bool) {
        if self.disposed || self.slides.is_empty() {
            return;
        }
        if self.is_animating || index == self.current_index as isize {
            return;
        }

        let last = self.slides.len() as isize - 1;
        let target = if self.settings.infinite_loop {
            if index < 0 {
                last
            } else if index > last {
                0
            } else {
                index
            }
        } else {
            index.clamp(0, last)
        };

        self.move_to(target as usize, animate);
    }

    pub fn next_slide(&mut self) {
        self.go_to_slide(self.current_index as isize + 1, true);
    }

    pub fn prev_slide(&mut self) {
        self.go_to_slide(self.current_index as isize - 1, true);
    }

    pub fn dot_click(&mut self, index: usize) {
        self.go_to_slide(index as isize, true);
    }

    fn move_to(&mut self, index: usize, animate: bool) {
        self.is_animating = animate;
        self.current_index = index;
        self.offset = self.strip.centered_offset(index, self.sizing);
        self.update_dots();

        if let Some(pending) = self.animation_clear.take() {
            self.timers.cancel(pending);
        }
        if animate {
            self.transition = Transition::Ease(self.settings.animation_speed);
            self.animation_clear = Some(
                self.timers
                    .schedule_once(self.settings.animation_speed, Task::ClearAnimation),
            );
        } else {
            self.transition = Transition::None;
        }
    }

    fn update_dots(&mut self) {
        for dot in &mut self.dots {
            dot.active = dot.index == self.current_index;
        }
    }

    // -------------------------------------------------------------------------
    // Touch
    // -------------------------------------------------------------------------

    pub fn touch_start(&mut self, x: f64) {
        self.touch_start_x = x;
        self.pause_autoplay();
    }

    pub fn touch_end(&mut self, x: f64) {
        self.touch_end_x = x;
        self.handle_swipe();
        self.resume_autoplay();
    }

    fn handle_swipe(&mut self) {
        let diff = self.touch_start_x - self.touch_end_x;
        if diff.abs() > SWIPE_THRESHOLD {
            if diff > 0.0 {
                self.next_slide();
            } else {
                self.prev_slide();
            }
        }
    }

    // -------------------------------------------------------------------------
    // Autoplay
    // -------------------------------------------------------------------------

    /// Arm the autoplay task, replacing any armed one.
    pub fn start_autoplay(&mut self) {
        if self.disposed {
            return;
        }
        if let Some(id) = self.autoplay.take() {
            self.timers.cancel(id);
        }
        self.autoplay = Some(
            self.timers
                .schedule_repeating(self.settings.autoplay_speed, Task::Autoplay),
        );
    }

    pub fn pause_autoplay(&mut self) {
        if let Some(id) = self.autoplay.take() {
            self.timers.cancel(id);
        }
    }

    /// Re-arm autoplay if it is enabled and not already armed.
    pub fn resume_autoplay(&mut self) {
        if self.settings.autoplay && self.autoplay.is_none() {
            self.start_autoplay();
        }
    }

    // -------------------------------------------------------------------------
    // Layout
    // -------------------------------------------------------------------------

    /// React to a viewport change.
    ///
    /// Picks the first breakpoint covering the viewport and applies it on
    /// top of the base settings, or reverts to the base settings when none
    /// matches. The current slide is then re-centered without animation.
    pub fn resize(&mut self, viewport_width: f64, container_width: Option<f64>) {
        if self.disposed {
            return;
        }
        self.viewport_width = viewport_width;
        if let Some(width) = container_width {
            self.strip.set_container_width(width);
        }

        if !self.base.responsive.is_empty() {
            self.settings = effective_settings(&self.base, viewport_width);
            self.sizing = SlideSizing::for_settings(&self.settings);
            debug!(
                viewport_width,
                sizing = ?self.sizing,
                "Applied responsive settings"
            );
        }

        if !self.slides.is_empty() {
            self.move_to(self.current_index, false);
        }
    }

    pub fn viewport_width(&self) -> f64 {
        self.viewport_width
    }

    // -------------------------------------------------------------------------
    // Lazy loading
    // -------------------------------------------------------------------------

    /// Slides entered the viewport. Returns the indices whose images loaded.
    pub fn intersect(&mut self, indices: &[usize]) -> Vec<usize> {
        let mut images: Vec<&mut ImageElement> =
            self.slides.iter_mut().map(|s| &mut s.image).collect();
        self.lazy.on_intersect(&mut images, indices)
    }

    // -------------------------------------------------------------------------
    // Teardown
    // -------------------------------------------------------------------------

    /// Cancel every scheduled task and stop reacting to events.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.timers.cancel_all();
        self.autoplay = None;
        self.animation_clear = None;
        self.lazy.disconnect();
        self.disposed = true;
        debug!("Carousel disposed");
    }
}

/// Base settings with the breakpoint covering `viewport_width` applied.
fn effective_settings(base: &Settings, viewport_width: f64) -> Settings {
    match base.breakpoint_for(viewport_width) {
        Some(bp) => base.merged(&bp.settings),
        None => base.clone(),
    }
}
