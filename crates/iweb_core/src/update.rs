use percent_encoding::percent_decode_str;
use url::Url;

use crate::{Attribute, ExtractError, ExtractState, MarkupEvent, Tag};

/// Sentinel that stands in for a local image's directory inside the body.
pub const IMAGE_PLACEHOLDER: &str = "WP_IMAGE_PLACEHOLDER";

const TITLE_CLASSES: &[&str] = &["Title", "Heading_1"];
const DATE_CLASSES: &[&str] = &["Date", "Comment_Posted_Date"];
// Stray header block emitted by the circa 2011 exporter.
const STRAY_HEADER_CLASS: &str = "Header";
// Body containers from the two exporter generations.
const CONTAINER_CLASSES: &[&str] = &["Normal", "style"];
const FEATURED_IMAGE_ID: &str = "generic-picture-attributes";
// Circa 2011 pages render the title as an image and keep the text in `alt`.
const LEGACY_TITLE_IMAGE_SUFFIX: &str = "_files/shapeimage_2.png";

/// Pure transition: applies one markup event to the extraction state.
///
/// The only failure is a second featured image, which aborts the entry.
pub fn update(mut state: ExtractState, event: MarkupEvent) -> Result<ExtractState, ExtractError> {
    match event {
        MarkupEvent::Open(tag) => open_tag(&mut state, &tag),
        MarkupEvent::Close { name } => close_tag(&mut state, &name),
        MarkupEvent::SelfClosing(tag) => self_closing_tag(&mut state, &tag)?,
        MarkupEvent::Text(text) => text_data(&mut state, text),
        MarkupEvent::EntityRef(name) => {
            if state.recording {
                state.output.push('&');
                state.output.push_str(&name);
                state.output.push(';');
            }
        }
        MarkupEvent::CharRef(code) => {
            if state.recording {
                state.output.push_str("&#");
                state.output.push_str(&code);
                state.output.push(';');
            }
        }
    }

    Ok(state)
}

fn open_tag(state: &mut ExtractState, tag: &Tag) {
    if tag.line > state.cur_line {
        state.cur_line = tag.line;
        if state.recording {
            state.output.push('\n');
        }
    }

    if tag.is("p") {
        if has_any_class(tag, TITLE_CLASSES) {
            state.recording = false;
            state.in_title = true;
            return;
        }
        if has_any_class(tag, DATE_CLASSES) {
            state.recording = false;
            state.in_date = true;
            return;
        }
        if tag.has_class(STRAY_HEADER_CLASS) {
            state.recording = false;
            return;
        }
    }

    if state.recording {
        state.depth += 1;
        state.output.push_str(&tag.raw);
    }

    // Restarts even when already recording, so nested containers lose
    // track of the outer depth.
    if tag.is("div") && has_any_class(tag, CONTAINER_CLASSES) {
        state.recording = true;
        state.depth = 1;
    }
}

fn close_tag(state: &mut ExtractState, name: &str) {
    state.in_title = false;
    state.in_date = false;

    if state.recording {
        state.depth = state.depth.saturating_sub(1);
        if state.depth == 0 {
            state.recording = false;
        } else {
            state.output.push_str("</");
            state.output.push_str(name);
            state.output.push('>');
        }
    }
}

fn self_closing_tag(state: &mut ExtractState, tag: &Tag) -> Result<(), ExtractError> {
    if state.recording {
        match local_image_src(tag) {
            Some(src) => {
                state.images.push(percent_decode(&src.value));
                state.output.push_str(&rewrite_image_src(tag, src));
            }
            None => state.output.push_str(&tag.raw),
        }
        return Ok(());
    }

    if !tag.is("img") {
        return Ok(());
    }
    let Some(src) = tag.attr("src") else {
        return Ok(());
    };

    if tag.attr("id") == Some(FEATURED_IMAGE_ID) {
        let image = percent_decode(src);
        if let Some(first) = &state.featured_image {
            return Err(ExtractError::DuplicateFeaturedImage {
                first: first.clone(),
                second: image,
            });
        }
        state.featured_image = Some(image);
    }

    if src.ends_with(LEGACY_TITLE_IMAGE_SUFFIX) {
        if let Some(alt) = tag.attr("alt").filter(|alt| !alt.is_empty()) {
            state.title = Some(alt.to_string());
        }
    }

    Ok(())
}

fn text_data(state: &mut ExtractState, text: String) {
    if state.in_title {
        state.title = Some(text.clone());
    }
    if state.in_date {
        state.date = Some(text.clone());
    }
    if state.recording && !text.trim().is_empty() {
        state.output.push_str(&text);
    }
}

fn has_any_class(tag: &Tag, classes: &[&str]) -> bool {
    classes.iter().any(|class| tag.has_class(class))
}

/// The `src` of an image that lives next to the page rather than on the web.
fn local_image_src(tag: &Tag) -> Option<&Attribute> {
    if !tag.is("img") {
        return None;
    }
    tag.attribute("src")
        .filter(|src| !src.value.is_empty() && Url::parse(&src.value).is_err())
}

fn percent_decode(value: &str) -> String {
    percent_decode_str(value).decode_utf8_lossy().into_owned()
}

/// Swap the directory part of the raw `src` value for the placeholder,
/// leaving every other byte of the tag as written.
fn rewrite_image_src(tag: &Tag, src: &Attribute) -> String {
    let raw_src = src.raw_value.as_str();
    let file_name = raw_src.rsplit('/').next().unwrap_or(raw_src);
    let replacement = format!("{IMAGE_PLACEHOLDER}/{file_name}");

    let search_from = src_attribute_offset(&tag.raw).unwrap_or(0);
    match tag.raw[search_from..].find(raw_src) {
        Some(offset) => {
            let start = search_from + offset;
            let end = start + raw_src.len();
            format!("{}{}{}", &tag.raw[..start], replacement, &tag.raw[end..])
        }
        None => tag.raw.clone(),
    }
}

/// Byte offset of the `src` attribute name: preceded by whitespace and
/// followed, after optional whitespace, by `=`.
fn src_attribute_offset(raw: &str) -> Option<usize> {
    let lower = raw.to_ascii_lowercase();
    let bytes = lower.as_bytes();
    lower.match_indices("src").map(|(at, _)| at).find(|&at| {
        let after_space = at > 0 && bytes[at - 1].is_ascii_whitespace();
        let before_equals = lower[at + 3..].trim_start().starts_with('=');
        after_space && before_equals
    })
}
