//! HTML fragment rendering.

use std::fmt::Write;

use crate::carousel::placeholder_src;

use super::payload::{Loading, RenderPayload, SlideView};

const PREV_ICON: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24" width="24" height="24"><path d="M15.41 16.59L10.83 12l4.58-4.59L14 6l-6 6 6 6 1.41-1.41z"/></svg>"#;
const NEXT_ICON: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24" width="24" height="24"><path d="M8.59 16.59L13.17 12 8.59 7.41 10 6l6 6-6 6-1.41-1.41z"/></svg>"#;

/// Escape HTML special characters for text and attribute values.
pub fn html_escape(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}

/// Inline error marker shown in place of a banner.
pub fn render_error(message: &str) -> String {
    format!(r#"<p class="abc-error">{}</p>"#, html_escape(message))
}

/// Render the carousel markup for a payload.
///
/// The widget reads its settings back from `data-settings`. Lazy images
/// start on a placeholder and carry the real URL in `data-src`.
pub fn render_fragment(payload: &RenderPayload) -> String {
    let settings_json =
        serde_json::to_string(&payload.settings).unwrap_or_else(|_| "{}".to_string());

    let mut html = String::with_capacity(512 + payload.slides.len() * 384);
    let _ = write!(
        html,
        r#"<div class="abc-banner-carousel" data-slug="{}" data-settings="{}">"#,
        html_escape(&payload.slug),
        html_escape(&settings_json)
    );

    html.push_str(r#"<div class="abc-carousel-inner">"#);
    for slide in &payload.slides {
        render_slide(&mut html, slide);
    }
    html.push_str("</div>");

    if payload.settings.show_arrows {
        let _ = write!(
            html,
            r#"<button class="abc-carousel-prev" aria-label="Previous slide">{}</button><button class="abc-carousel-next" aria-label="Next slide">{}</button>"#,
            PREV_ICON, NEXT_ICON
        );
    }

    if payload.settings.show_dots {
        html.push_str(r#"<div class="abc-carousel-dots">"#);
        for slide in &payload.slides {
            let class = if slide.index == 0 { "abc-dot active" } else { "abc-dot" };
            let _ = write!(
                html,
                r#"<button class="{}" data-index="{}" aria-label="Go to slide {}"></button>"#,
                class,
                slide.index,
                slide.index + 1
            );
        }
        html.push_str("</div>");
    }

    html.push_str("</div>");
    html
}

fn render_slide(html: &mut String, slide: &SlideView) {
    let _ = write!(html, r#"<div class="abc-slide" data-index="{}">"#, slide.index);

    if let Some(link) = &slide.link {
        let _ = write!(
            html,
            r#"<a href="{}" class="abc-slide-link">"#,
            html_escape(link)
        );
    }

    let image = html_escape(&slide.image);
    let (src, data_src) = match slide.loading {
        Loading::Eager => (image, None),
        Loading::Lazy => (html_escape(&placeholder_src(None, None)), Some(image)),
    };
    let class = if slide.index == 0 {
        "abc-slide-image abc-first-slide"
    } else {
        "abc-slide-image"
    };

    let _ = write!(html, r#"<img src="{}""#, src);
    if let Some(data_src) = data_src {
        let _ = write!(html, r#" data-src="{}""#, data_src);
    }
    let _ = write!(
        html,
        r#" alt="{}" loading="{}" fetchpriority="{}" decoding="{}" class="{}" />"#,
        html_escape(&slide.alt_text),
        slide.loading.as_str(),
        slide.fetchpriority.as_str(),
        slide.decoding.as_str(),
        class
    );

    if let Some(title) = &slide.title {
        let _ = write!(
            html,
            r#"<div class="abc-slide-title">{}</div>"#,
            html_escape(title)
        );
    }

    if slide.link.is_some() {
        html.push_str("</a>");
    }
    html.push_str("</div>");
}
