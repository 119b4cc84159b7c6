use std::collections::VecDeque;

use iweb_core::{Attribute, ExtractError, MarkupEvent, Tag};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// Longest reference body (`name` in `&name;`) still treated as a reference.
const MAX_REFERENCE_LEN: usize = 32;

/// Lenient tokenizer turning an exported page into [`MarkupEvent`]s in
/// document order.
///
/// Doctype, comments, CDATA, processing instructions and declarations yield
/// nothing. Character data is split around `&name;` / `&#code;` references,
/// which are reported without being resolved.
pub struct MarkupEvents<'a> {
    input: &'a str,
    reader: Reader<&'a [u8]>,
    /// Offset of the reader's slice within `input`.
    base: usize,
    pending: VecDeque<MarkupEvent>,
    line: usize,
    counted_to: usize,
    done: bool,
}

impl<'a> MarkupEvents<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            reader: lenient_reader(input),
            base: 0,
            pending: VecDeque::new(),
            line: 1,
            counted_to: 0,
            done: false,
        }
    }

    /// 1-based line of the byte at `offset`; offsets must not go backwards.
    fn line_at(&mut self, offset: usize) -> usize {
        let offset = offset.min(self.input.len());
        if offset > self.counted_to {
            self.line += self.input.as_bytes()[self.counted_to..offset]
                .iter()
                .filter(|b| **b == b'\n')
                .count();
            self.counted_to = offset;
        }
        self.line
    }

    fn position(&self) -> usize {
        self.base + self.reader.buffer_position() as usize
    }

    /// A `<` that cannot open a tag, comment or declaration is plain text.
    /// The reader is restarted just past it.
    fn skip_stray_lt(&mut self, at: usize) -> bool {
        let bytes = self.input.as_bytes();
        if bytes.get(at) != Some(&b'<') {
            return false;
        }
        if bytes.get(at + 1).is_some_and(|next| opens_markup(*next)) {
            return false;
        }
        self.pending.push_back(MarkupEvent::Text("<".to_string()));
        let input = self.input;
        self.base = at + 1;
        self.reader = lenient_reader(&input[self.base..]);
        true
    }

    fn tag(&mut self, start: &BytesStart<'_>, from: usize, to: usize, self_closing: bool) -> Tag {
        let name = lowercase(start.name().as_ref());
        let attrs = start
            .html_attributes()
            .filter_map(Result::ok)
            .map(|attr| {
                let raw_value = String::from_utf8_lossy(&attr.value).into_owned();
                let value = attr
                    .unescape_value()
                    .map(|value| value.into_owned())
                    .unwrap_or_else(|_| raw_value.clone());
                Attribute {
                    name: lowercase(attr.key.as_ref()),
                    value,
                    raw_value,
                }
            })
            .collect();
        let raw = match self.input.get(from..to) {
            Some(raw) => raw.to_string(),
            None => {
                let content = String::from_utf8_lossy(start);
                if self_closing {
                    format!("<{content}/>")
                } else {
                    format!("<{content}>")
                }
            }
        };
        let line = self.line_at(from);

        Tag {
            name,
            attrs,
            raw,
            line,
        }
    }
}

impl Iterator for MarkupEvents<'_> {
    type Item = Result<MarkupEvent, ExtractError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(event) = self.pending.pop_front() {
                return Some(Ok(event));
            }
            if self.done {
                return None;
            }

            let from = MarkupEvents::position(self);
            if self.skip_stray_lt(from) {
                continue;
            }
            let event = match self.reader.read_event() {
                Ok(event) => event,
                Err(err) => {
                    self.done = true;
                    return Some(Err(ExtractError::Markup {
                        position: self.base + self.reader.error_position() as usize,
                        message: err.to_string(),
                    }));
                }
            };
            let to = MarkupEvents::position(self);

            match event {
                Event::Start(start) => {
                    let tag = self.tag(&start, from, to, false);
                    self.pending.push_back(MarkupEvent::Open(tag));
                }
                Event::Empty(start) => {
                    let tag = self.tag(&start, from, to, true);
                    self.pending.push_back(MarkupEvent::SelfClosing(tag));
                }
                Event::End(end) => {
                    self.pending.push_back(MarkupEvent::Close {
                        name: lowercase(end.name().as_ref()),
                    });
                }
                Event::Text(text) => {
                    let text = String::from_utf8_lossy(&text);
                    split_references(&text, &mut self.pending);
                }
                Event::Eof => self.done = true,
                Event::CData(_)
                | Event::Comment(_)
                | Event::Decl(_)
                | Event::PI(_)
                | Event::DocType(_) => {}
            }
        }
    }
}

fn lenient_reader(input: &str) -> Reader<&[u8]> {
    let mut reader = Reader::from_str(input);
    let config = reader.config_mut();
    config.trim_text(false);
    config.check_end_names = false;
    config.allow_unmatched_ends = true;
    config.expand_empty_elements = false;
    reader
}

fn opens_markup(next: u8) -> bool {
    next.is_ascii_alphabetic() || matches!(next, b'/' | b'!' | b'?')
}

fn lowercase(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).to_ascii_lowercase()
}

/// Split character data into text runs and unresolved references. A bare `&`
/// that does not start a well-formed reference stays in the text.
fn split_references(text: &str, out: &mut VecDeque<MarkupEvent>) {
    let mut plain = String::new();
    let mut rest = text;

    while let Some(amp) = rest.find('&') {
        plain.push_str(&rest[..amp]);
        let candidate = &rest[amp..];
        match parse_reference(candidate) {
            Some((reference, consumed)) => {
                if !plain.is_empty() {
                    out.push_back(MarkupEvent::Text(std::mem::take(&mut plain)));
                }
                out.push_back(reference);
                rest = &candidate[consumed..];
            }
            None => {
                plain.push('&');
                rest = &candidate[1..];
            }
        }
    }

    plain.push_str(rest);
    if !plain.is_empty() {
        out.push_back(MarkupEvent::Text(plain));
    }
}

/// Parse a reference at the start of `input` (which begins with `&`),
/// returning the event and the number of bytes it spans.
fn parse_reference(input: &str) -> Option<(MarkupEvent, usize)> {
    let semicolon = input.get(1..MAX_REFERENCE_LEN + 2).unwrap_or(&input[1..]).find(';')? + 1;
    let body = &input[1..semicolon];

    let event = match body.strip_prefix('#') {
        Some(code) => {
            let valid = match code.strip_prefix(['x', 'X']) {
                Some(hex) => !hex.is_empty() && hex.chars().all(|c| c.is_ascii_hexdigit()),
                None => !code.is_empty() && code.chars().all(|c| c.is_ascii_digit()),
            };
            if !valid {
                return None;
            }
            MarkupEvent::CharRef(code.to_string())
        }
        None => {
            let mut chars = body.chars();
            let starts_alpha = chars.next().is_some_and(|c| c.is_ascii_alphabetic());
            if !starts_alpha || !chars.all(|c| c.is_ascii_alphanumeric()) {
                return None;
            }
            MarkupEvent::EntityRef(body.to_string())
        }
    };

    Some((event, semicolon + 1))
}
