//! Embed tags in page content.
//!
//! Content embeds a banner with `[abc_banner slug="home"]`. The slug may be
//! double-quoted, single-quoted or bare. Every tag is replaced by the
//! banner's fragment, or by an inline error marker when it cannot be
//! resolved, so a broken embed never breaks the page around it.

use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::banner::{normalize_slug, Settings, SHORTCODE_TAG};
use crate::store::{BannerRegistry, BannerStore};

use super::html::{html_escape, render_error, render_fragment};
use super::payload::RenderPayload;

// =============================================================================
// Parsing
// =============================================================================

/// One embed tag found in content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Embed {
    /// Byte range of the whole tag, brackets included
    pub start: usize,
    pub end: usize,

    /// The `slug` attribute, if present and non-empty
    pub slug: Option<String>,
}

/// Find every embed tag in `content`, in order.
pub fn find_embeds(content: &str) -> Vec<Embed> {
    let opener = format!("[{}", SHORTCODE_TAG);
    let mut embeds = Vec::new();
    let mut cursor = 0;

    while let Some(found) = content[cursor..].find(&opener) {
        let start = cursor + found;
        let after_name = start + opener.len();
        let rest = &content[after_name..];

        // The tag name must end here, "[abc_banner_x]" is a different tag
        let boundary = rest.chars().next();
        let is_tag = matches!(boundary, Some(c) if c == ']' || c == '/' || c.is_whitespace());
        let close = rest.find(']');

        match (is_tag, close) {
            (true, Some(close)) => {
                let attrs = &rest[..close];
                let end = after_name + close + 1;
                embeds.push(Embed {
                    start,
                    end,
                    slug: attribute(attrs, "slug").filter(|s| !s.trim().is_empty()),
                });
                cursor = end;
            }
            _ => cursor = after_name,
        }
    }

    embeds
}

/// Value of a named attribute in a tag's attribute text.
fn attribute(attrs: &str, name: &str) -> Option<String> {
    let mut rest = attrs.trim_start_matches('/').trim();

    while !rest.is_empty() {
        let key_end = rest
            .find(|c: char| c == '=' || c.is_whitespace())
            .unwrap_or(rest.len());
        let key = &rest[..key_end];
        rest = rest[key_end..].trim_start();

        if !rest.starts_with('=') {
            // Valueless attribute
            rest = rest.trim_start_matches('/').trim_start();
            if key.is_empty() {
                break;
            }
            continue;
        }
        rest = rest[1..].trim_start();

        let (value, remainder) = match rest.chars().next() {
            Some(quote @ ('"' | '\'')) => {
                let body = &rest[1..];
                match body.find(quote) {
                    Some(close) => (&body[..close], &body[close + 1..]),
                    None => (body, ""),
                }
            }
            _ => {
                let value_end = rest
                    .find(|c: char| c.is_whitespace())
                    .unwrap_or(rest.len());
                (rest[..value_end].trim_end_matches('/'), &rest[value_end..])
            }
        };

        if key.eq_ignore_ascii_case(name) {
            return Some(value.to_string());
        }
        rest = remainder.trim_start();
    }

    None
}

// =============================================================================
// Resolution
// =============================================================================

/// Why an embed rendered as an error marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbedFailure {
    MissingSlug,
    NotFound,
    NoSlides,
}

impl EmbedFailure {
    pub fn message(&self) -> &'static str {
        match self {
            EmbedFailure::MissingSlug => "Please specify a banner slug",
            EmbedFailure::NotFound => "Banner not found",
            EmbedFailure::NoSlides => "No slides found for this banner",
        }
    }

    pub fn to_html(&self) -> String {
        render_error(self.message())
    }
}

/// Resolve a slug to its render payload.
///
/// Store failures are logged and reported as a missing banner.
pub async fn resolve_embed<S: BannerStore>(
    registry: &BannerRegistry<S>,
    defaults: &Settings,
    slug: Option<&str>,
) -> Result<RenderPayload, EmbedFailure> {
    let slug = slug
        .map(normalize_slug)
        .filter(|s| !s.is_empty())
        .ok_or(EmbedFailure::MissingSlug)?;

    let banner = match registry.get_by_slug(&slug).await {
        Ok(Some(banner)) => banner,
        Ok(None) => return Err(EmbedFailure::NotFound),
        Err(e) => {
            error!(slug = %slug, error = %e, "Failed to load banner for embed");
            return Err(EmbedFailure::NotFound);
        }
    };

    if banner.slides.is_empty() {
        return Err(EmbedFailure::NoSlides);
    }
    Ok(RenderPayload::from_banner(&banner, defaults))
}

/// Render one banner as HTML, or the matching error marker.
pub async fn render_banner<S: BannerStore>(
    registry: &BannerRegistry<S>,
    defaults: &Settings,
    slug: Option<&str>,
) -> String {
    match resolve_embed(registry, defaults, slug).await {
        Ok(payload) => render_fragment(&payload),
        Err(failure) => {
            debug!(?slug, reason = failure.message(), "Embed rendered as error");
            failure.to_html()
        }
    }
}

/// `<link rel="preload">` hint for a banner's first image.
pub fn preload_link(image_url: &str) -> String {
    format!(
        r#"<link rel="preload" as="image" href="{}" fetchpriority="high">"#,
        html_escape(image_url)
    )
}

/// Content with every embed replaced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpandedContent {
    pub html: String,

    /// Preload hint for the first embedded banner's first image
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preload: Option<String>,
}

/// Replace every embed tag in `content` with its rendering.
///
/// The preload hint comes from the first tag that names a slug, and only
/// when that banner resolves.
pub async fn expand_content<S: BannerStore>(
    registry: &BannerRegistry<S>,
    defaults: &Settings,
    content: &str,
) -> ExpandedContent {
    let embeds = find_embeds(content);
    let mut html = String::with_capacity(content.len());
    let mut preload = None;
    let mut preload_decided = false;
    let mut cursor = 0;

    for embed in &embeds {
        html.push_str(&content[cursor..embed.start]);

        let resolved = resolve_embed(registry, defaults, embed.slug.as_deref()).await;
        if !preload_decided && embed.slug.is_some() {
            preload_decided = true;
            preload = resolved
                .as_ref()
                .ok()
                .and_then(|payload| payload.first_image())
                .map(preload_link);
        }

        match resolved {
            Ok(payload) => html.push_str(&render_fragment(&payload)),
            Err(failure) => html.push_str(&failure.to_html()),
        }
        cursor = embed.end;
    }
    html.push_str(&content[cursor..]);

    debug!(embeds = embeds.len(), "Expanded content");
    ExpandedContent { html, preload }
}
