//! Slides and the text/URL sanitizers applied to them on save.

use serde::{Deserialize, Serialize};
use url::Url;

/// One image in a banner, in display order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Slide {
    /// Image URL
    #[serde(default)]
    pub image: String,

    /// Optional click-through URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,

    /// Optional caption rendered over the image
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Optional alternative text for the image
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt_text: Option<String>,
}

impl Slide {
    /// Create a slide with only an image.
    pub fn new(image: impl Into<String>) -> Self {
        Self {
            image: image.into(),
            ..Self::default()
        }
    }

    /// Set the click-through link.
    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    /// Set the caption.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the alternative text.
    pub fn with_alt_text(mut self, alt_text: impl Into<String>) -> Self {
        self.alt_text = Some(alt_text.into());
        self
    }

    /// Return a copy with URLs and text fields cleaned.
    ///
    /// Empty optional fields collapse to `None`. An unusable image URL
    /// becomes the empty string, which save validation then rejects.
    pub fn sanitized(&self) -> Slide {
        Slide {
            image: sanitize_url(&self.image).unwrap_or_default(),
            link: self.link.as_deref().and_then(sanitize_url),
            title: self.title.as_deref().and_then(non_empty_text),
            alt_text: self.alt_text.as_deref().and_then(non_empty_text),
        }
    }

    /// Alternative text, or the empty string.
    pub fn alt(&self) -> &str {
        self.alt_text.as_deref().unwrap_or("")
    }
}

fn non_empty_text(input: &str) -> Option<String> {
    let text = sanitize_text(input);
    (!text.is_empty()).then_some(text)
}

/// Strip markup and collapse whitespace in a single-line text field.
///
/// A `<` only opens a tag when followed by a letter, `/`, `!` or `?`;
/// otherwise it is kept as text (`"total < $50"`).
pub fn sanitize_text(input: &str) -> String {
    let mut stripped = String::with_capacity(input.len());
    let mut in_tag = false;
    let mut chars = input.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '<' if !in_tag && chars.peek().is_some_and(|&next| opens_tag(next)) => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if in_tag => {}
            c if c.is_control() => stripped.push(' '),
            c => stripped.push(c),
        }
    }
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn opens_tag(c: char) -> bool {
    c.is_ascii_alphabetic() || matches!(c, '/' | '!' | '?')
}

/// Normalize a URL for storage.
///
/// Absolute URLs must use `http` or `https`. Root-relative, query and
/// fragment references are kept. Bare host names get an `http://` prefix.
/// Anything else (including `javascript:` and `data:` URLs) is dropped.
pub fn sanitize_url(input: &str) -> Option<String> {
    let trimmed: String = input
        .trim()
        .chars()
        .filter(|c| !c.is_control() && !c.is_whitespace())
        .collect();
    if trimmed.is_empty() {
        return None;
    }

    if trimmed.starts_with('/') || trimmed.starts_with('#') || trimmed.starts_with('?') {
        // Protocol-relative URLs still need a host
        if let Some(rest) = trimmed.strip_prefix("//") {
            return Url::parse(&format!("https://{}", rest))
                .ok()
                .map(|_| trimmed.clone());
        }
        return Some(trimmed);
    }

    match Url::parse(&trimmed) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Some(trimmed),
        Ok(_) => None,
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            let candidate = format!("http://{}", trimmed);
            Url::parse(&candidate)
                .ok()
                .filter(|url| url.host_str().is_some_and(|h| h.contains('.')))
                .map(|_| candidate)
        }
        Err(_) => None,
    }
}
