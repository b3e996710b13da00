//! Server-side banner rendering.
//!
//! - [`payload`]: the resolved settings and slides handed to the widget
//! - [`html`]: the carousel HTML fragment and error markers
//! - [`embed`]: embed tag parsing and content expansion

pub mod embed;
pub mod html;
pub mod payload;

pub use embed::{
    expand_content, find_embeds, preload_link, render_banner, resolve_embed, Embed,
    EmbedFailure, ExpandedContent,
};
pub use html::{html_escape, render_error, render_fragment};
pub use payload::{image_hints, Decoding, FetchPriority, Loading, RenderPayload, SlideView};
