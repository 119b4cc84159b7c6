use std::sync::Once;

use iweb_core::{update, Attribute, ExtractError, ExtractState, MarkupEvent, Tag};
use pretty_assertions::assert_eq;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(iweb_logging::initialize_for_tests);
}

fn tag(name: &str, attrs: &[(&str, &str)], line: usize) -> Tag {
    let rendered: String = attrs
        .iter()
        .map(|(key, value)| format!(" {key}=\"{value}\""))
        .collect();
    Tag {
        name: name.to_string(),
        attrs: attrs
            .iter()
            .map(|(key, value)| Attribute {
                name: key.to_string(),
                value: value.to_string(),
                raw_value: value.to_string(),
            })
            .collect(),
        raw: format!("<{name}{rendered}>"),
        line,
    }
}

fn open(name: &str, attrs: &[(&str, &str)], line: usize) -> MarkupEvent {
    MarkupEvent::Open(tag(name, attrs, line))
}

fn close(name: &str) -> MarkupEvent {
    MarkupEvent::Close {
        name: name.to_string(),
    }
}

fn img(attrs: &[(&str, &str)]) -> MarkupEvent {
    let mut tag = tag("img", attrs, 1);
    tag.raw = tag.raw.replace('>', " />");
    MarkupEvent::SelfClosing(tag)
}

fn text(value: &str) -> MarkupEvent {
    MarkupEvent::Text(value.to_string())
}

fn run(events: Vec<MarkupEvent>) -> Result<ExtractState, ExtractError> {
    events.into_iter().try_fold(ExtractState::new(), update)
}

#[test]
fn container_starts_recording_without_emitting_itself() {
    init_logging();
    let state = run(vec![open("div", &[("class", "Normal")], 1)]).unwrap();

    assert!(state.is_recording());
    assert_eq!(state.depth(), 1);
    assert_eq!(state.output(), "");
}

#[test]
fn style_container_is_recognised_too() {
    let state = run(vec![open("div", &[("class", "style")], 1)]).unwrap();
    assert!(state.is_recording());
}

#[test]
fn nested_tags_are_emitted_and_container_close_is_dropped() {
    let state = run(vec![
        open("div", &[("class", "Normal")], 1),
        open("p", &[("class", "paragraph_style")], 1),
        text("Hello"),
        close("p"),
        close("div"),
        text("outside"),
    ])
    .unwrap();

    assert!(!state.is_recording());
    assert_eq!(state.depth(), 0);
    assert_eq!(state.output(), r#"<p class="paragraph_style">Hello</p>"#);
}

#[test]
fn new_source_line_inserts_newline_while_recording() {
    let state = run(vec![
        open("div", &[("class", "Normal")], 1),
        open("p", &[], 2),
        text("a"),
        close("p"),
        open("p", &[], 2),
        text("b"),
        close("p"),
        open("p", &[], 3),
        text("c"),
        close("p"),
    ])
    .unwrap();

    assert_eq!(state.output(), "\n<p>a</p><p>b</p>\n<p>c</p>");
}

#[test]
fn whitespace_only_text_is_dropped() {
    let state = run(vec![
        open("div", &[("class", "Normal")], 1),
        text("\n   \t"),
        open("span", &[], 1),
        text(" kept "),
        close("span"),
    ])
    .unwrap();

    assert_eq!(state.output(), "<span> kept </span>");
}

#[test]
fn title_region_captures_text_and_stops_recording() {
    let state = run(vec![
        open("div", &[("class", "Normal")], 1),
        open("p", &[("class", "Title")], 1),
        text("My Trip"),
        close("p"),
        text("after"),
    ])
    .unwrap();

    assert_eq!(state.title(), Some("My Trip"));
    assert!(!state.in_title());
    assert!(!state.is_recording());
    assert_eq!(state.output(), "");
}

#[test]
fn heading_one_is_a_title_marker() {
    let state = run(vec![
        open("p", &[("class", "Heading_1")], 1),
        text("Old Style"),
        close("p"),
    ])
    .unwrap();
    assert_eq!(state.title(), Some("Old Style"));
}

#[test]
fn later_text_in_title_region_replaces_earlier_text() {
    let state = run(vec![
        open("p", &[("class", "Title")], 1),
        text("first"),
        text("second"),
        close("p"),
    ])
    .unwrap();
    assert_eq!(state.title(), Some("second"));
}

#[test]
fn date_markers_capture_date_text() {
    for class in ["Date", "Comment_Posted_Date"] {
        let state = run(vec![
            open("p", &[("class", class)], 1),
            text("Monday, July 4, 2011"),
            close("p"),
        ])
        .unwrap();
        assert_eq!(state.date_text(), Some("Monday, July 4, 2011"));
        assert!(!state.in_date());
    }
}

#[test]
fn stray_header_stops_recording_and_emits_nothing() {
    let state = run(vec![
        open("div", &[("class", "Normal")], 1),
        open("p", &[("class", "Header")], 1),
        text("cruft"),
        close("p"),
    ])
    .unwrap();

    assert!(!state.is_recording());
    assert_eq!(state.output(), "");
    assert_eq!(state.title(), None);
}

#[test]
fn local_image_is_recorded_and_rewritten() {
    let state = run(vec![
        open("div", &[("class", "Normal")], 1),
        img(&[
            ("src", "4_My%20Trip_files/IMG_01.jpg"),
            ("alt", ""),
            ("style", "border: none; "),
        ]),
    ])
    .unwrap();

    assert_eq!(state.images(), ["4_My Trip_files/IMG_01.jpg"]);
    assert_eq!(
        state.output(),
        r#"<img src="WP_IMAGE_PLACEHOLDER/IMG_01.jpg" alt="" style="border: none; " />"#
    );
}

#[test]
fn duplicate_image_references_are_kept_positionally() {
    let state = run(vec![
        open("div", &[("class", "Normal")], 1),
        img(&[("src", "e_files/a.jpg")]),
        img(&[("src", "e_files/b.jpg")]),
        img(&[("src", "e_files/a.jpg")]),
    ])
    .unwrap();

    assert_eq!(state.images(), ["e_files/a.jpg", "e_files/b.jpg", "e_files/a.jpg"]);
}

#[test]
fn remote_image_passes_through_untouched() {
    let state = run(vec![
        open("div", &[("class", "Normal")], 1),
        img(&[("src", "http://example.com/pic.jpg")]),
    ])
    .unwrap();

    assert!(state.images().is_empty());
    assert_eq!(state.output(), r#"<img src="http://example.com/pic.jpg" />"#);
}

#[test]
fn self_closing_non_image_is_emitted_while_recording() {
    let mut br = tag("br", &[], 1);
    br.raw = "<br />".to_string();
    let state = run(vec![
        open("div", &[("class", "Normal")], 1),
        MarkupEvent::SelfClosing(br),
    ])
    .unwrap();
    assert_eq!(state.output(), "<br />");
}

#[test]
fn featured_image_is_taken_from_page_chrome() {
    let state = run(vec![img(&[
        ("id", "generic-picture-attributes"),
        ("src", "4_My%20Trip_files/droppedImage.jpg"),
    ])])
    .unwrap();

    assert_eq!(state.featured_image(), Some("4_My Trip_files/droppedImage.jpg"));
    assert!(state.images().is_empty());
}

#[test]
fn second_featured_image_is_fatal() {
    let err = run(vec![
        img(&[("id", "generic-picture-attributes"), ("src", "a_files/one.jpg")]),
        img(&[("id", "generic-picture-attributes"), ("src", "a_files/two.jpg")]),
    ])
    .unwrap_err();

    assert_eq!(
        err,
        ExtractError::DuplicateFeaturedImage {
            first: "a_files/one.jpg".to_string(),
            second: "a_files/two.jpg".to_string(),
        }
    );
}

#[test]
fn legacy_title_image_supplies_title_from_alt() {
    let state = run(vec![img(&[
        ("src", "4_My_Trip_files/shapeimage_2.png"),
        ("alt", "My Trip"),
    ])])
    .unwrap();
    assert_eq!(state.title(), Some("My Trip"));

    let state = run(vec![img(&[
        ("src", "4_My_Trip_files/shapeimage_2.png"),
        ("alt", ""),
    ])])
    .unwrap();
    assert_eq!(state.title(), None);
}

#[test]
fn references_are_reemitted_escaped_only_while_recording() {
    let state = run(vec![
        MarkupEvent::EntityRef("amp".to_string()),
        open("div", &[("class", "Normal")], 1),
        text("Fish "),
        MarkupEvent::EntityRef("amp".to_string()),
        text(" chips "),
        MarkupEvent::CharRef("8217".to_string()),
    ])
    .unwrap();

    assert_eq!(state.output(), "Fish &amp; chips &#8217;");
}

#[test]
fn nested_container_restarts_depth() {
    // A container inside a container resets depth to 1, so the inner
    // close ends recording and the rest of the outer container is lost.
    let state = run(vec![
        open("div", &[("class", "Normal")], 1),
        open("p", &[], 1),
        text("outer"),
        close("p"),
        open("div", &[("class", "Normal")], 1),
        text("inner"),
        close("div"),
        text("lost"),
        close("div"),
    ])
    .unwrap();

    assert!(!state.is_recording());
    assert_eq!(state.output(), r#"<p>outer</p><div class="Normal">inner"#);
}

#[test]
fn same_events_give_identical_state() {
    let events = vec![
        open("p", &[("class", "Title")], 1),
        text("T"),
        close("p"),
        open("div", &[("class", "Normal")], 2),
        img(&[("src", "x_files/a.jpg")]),
    ];
    assert_eq!(run(events.clone()).unwrap(), run(events).unwrap());
}
