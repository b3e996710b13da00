//! UI events and the action table that routes them.
//!
//! Each widget builds its table once at construction. An event whose action
//! has no registered handler is dropped, which is how missing controls and
//! a disabled `pause_on_hover` are expressed.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::widget::Carousel;

/// Action identifiers.
pub mod action {
    pub const PREV: &str = "prev";
    pub const NEXT: &str = "next";
    pub const DOT: &str = "dot";
    pub const TOUCH_START: &str = "touchstart";
    pub const TOUCH_END: &str = "touchend";
    pub const MOUSE_ENTER: &str = "mouseenter";
    pub const MOUSE_LEAVE: &str = "mouseleave";
    pub const RESIZE: &str = "resize";
    pub const INTERSECT: &str = "intersect";
}

/// An input delivered to a carousel by its host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CarouselEvent {
    PrevClick,
    NextClick,
    DotClick { index: usize },
    TouchStart { x: f64 },
    TouchEnd { x: f64 },
    MouseEnter,
    MouseLeave,
    /// The viewport changed size; the container may have as well
    Resize {
        viewport_width: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        container_width: Option<f64>,
    },
    /// These slide indices entered the viewport
    Intersect { indices: Vec<usize> },
}

impl CarouselEvent {
    /// Action identifier this event dispatches to.
    pub fn action(&self) -> &'static str {
        match self {
            CarouselEvent::PrevClick => action::PREV,
            CarouselEvent::NextClick => action::NEXT,
            CarouselEvent::DotClick { .. } => action::DOT,
            CarouselEvent::TouchStart { .. } => action::TOUCH_START,
            CarouselEvent::TouchEnd { .. } => action::TOUCH_END,
            CarouselEvent::MouseEnter => action::MOUSE_ENTER,
            CarouselEvent::MouseLeave => action::MOUSE_LEAVE,
            CarouselEvent::Resize { .. } => action::RESIZE,
            CarouselEvent::Intersect { .. } => action::INTERSECT,
        }
    }
}

/// Event handler bound to an action.
pub type Handler = fn(&mut Carousel, &CarouselEvent);

/// Action identifier to handler mapping.
#[derive(Clone, Default)]
pub struct CommandTable {
    handlers: HashMap<&'static str, Handler>,
}

/// Which optional parts of the widget exist, deciding what gets wired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Wiring {
    pub prev_control: bool,
    pub next_control: bool,
    pub dots: bool,
    pub pause_on_hover: bool,
}

impl CommandTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard table for a widget with the given parts.
    pub fn standard(wiring: Wiring) -> Self {
        let mut table = Self::new();
        if wiring.prev_control {
            table.register(action::PREV, on_prev);
        }
        if wiring.next_control {
            table.register(action::NEXT, on_next);
        }
        if wiring.dots {
            table.register(action::DOT, on_dot);
        }
        table.register(action::TOUCH_START, on_touch_start);
        table.register(action::TOUCH_END, on_touch_end);
        if wiring.pause_on_hover {
            table.register(action::MOUSE_ENTER, on_mouse_enter);
            table.register(action::MOUSE_LEAVE, on_mouse_leave);
        }
        table.register(action::RESIZE, on_resize);
        table.register(action::INTERSECT, on_intersect);
        table
    }

    pub fn register(&mut self, action: &'static str, handler: Handler) {
        self.handlers.insert(action, handler);
    }

    pub fn lookup(&self, action: &str) -> Option<Handler> {
        self.handlers.get(action).copied()
    }

    pub fn is_registered(&self, action: &str) -> bool {
        self.handlers.contains_key(action)
    }

    /// Registered actions, sorted.
    pub fn actions(&self) -> Vec<&'static str> {
        let mut actions: Vec<&'static str> = self.handlers.keys().copied().collect();
        actions.sort_unstable();
        actions
    }
}

impl std::fmt::Debug for CommandTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandTable")
            .field("actions", &self.actions())
            .finish()
    }
}

// =============================================================================
// Handlers
// =============================================================================

fn on_prev(carousel: &mut Carousel, _: &CarouselEvent) {
    carousel.prev_slide();
}

fn on_next(carousel: &mut Carousel, _: &CarouselEvent) {
    carousel.next_slide();
}

fn on_dot(carousel: &mut Carousel, event: &CarouselEvent) {
    if let CarouselEvent::DotClick { index } = event {
        carousel.dot_click(*index);
    }
}

fn on_touch_start(carousel: &mut Carousel, event: &CarouselEvent) {
    if let CarouselEvent::TouchStart { x } = event {
        carousel.touch_start(*x);
    }
}

fn on_touch_end(carousel: &mut Carousel, event: &CarouselEvent) {
    if let CarouselEvent::TouchEnd { x } = event {
        carousel.touch_end(*x);
    }
}

fn on_mouse_enter(carousel: &mut Carousel, _: &CarouselEvent) {
    carousel.pause_autoplay();
}

fn on_mouse_leave(carousel: &mut Carousel, _: &CarouselEvent) {
    carousel.resume_autoplay();
}

fn on_resize(carousel: &mut Carousel, event: &CarouselEvent) {
    if let CarouselEvent::Resize {
        viewport_width,
        container_width,
    } = event
    {
        carousel.resize(*viewport_width, *container_width);
    }
}

fn on_intersect(carousel: &mut Carousel, event: &CarouselEvent) {
    if let CarouselEvent::Intersect { indices } = event {
        carousel.intersect(indices);
    }
}
