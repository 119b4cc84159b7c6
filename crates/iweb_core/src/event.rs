/// One item of the document-order event stream the extractor consumes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkupEvent {
    /// `<tag ...>` with a separate close event expected.
    Open(Tag),
    /// `</tag>`.
    Close { name: String },
    /// `<tag ... />`, which never gets a close event.
    SelfClosing(Tag),
    /// Character data between tags, references excluded.
    Text(String),
    /// `&name;`, carrying `name`.
    EntityRef(String),
    /// `&#code;`, carrying `code` (for example `38` or `x26`).
    CharRef(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    /// Lowercased element name.
    pub name: String,
    pub attrs: Vec<Attribute>,
    /// The tag exactly as written in the source, angle brackets included.
    pub raw: String,
    /// 1-based source line the tag starts on.
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Lowercased attribute name.
    pub name: String,
    /// Value with character references resolved.
    pub value: String,
    /// Value exactly as written between the quotes.
    pub raw_value: String,
}

impl Tag {
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attribute(name).map(|attr| attr.value.as_str())
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attrs.iter().find(|attr| attr.name == name)
    }

    /// True when any `class` attribute equals `class` exactly.
    pub fn has_class(&self, class: &str) -> bool {
        self.attrs
            .iter()
            .any(|attr| attr.name == "class" && attr.value == class)
    }

    pub fn is(&self, name: &str) -> bool {
        self.name == name
    }
}
