//! `markup.rs` - Turns an HTML fragment into lines a terminal can show.
use scraper::{ElementRef, Html, Node};

/// How a rendered line should be styled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Heading(u8),
    Text,
    ListItem,
    Quote,
    Blank,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedLine {
    pub kind: LineKind,
    pub text: String,
}

impl RenderedLine {
    pub fn new(kind: LineKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    pub fn blank() -> Self {
        Self::new(LineKind::Blank, "")
    }
}

/// Elements whose contents never reach the page.
const SKIPPED_ELEMENTS: &[&str] = &["script", "style", "template", "noscript", "head"];

/// Renders a fragment into styled lines. Only block structure is kept;
/// inline markup is flattened to its text.
pub fn render_fragment(html: &str) -> Vec<RenderedLine> {
    let fragment = Html::parse_fragment(html);
    let mut renderer = Renderer::default();
    renderer.walk(fragment.root_element());
    renderer.finish()
}

#[derive(Default)]
struct Renderer {
    lines: Vec<RenderedLine>,
    current: String,
    kind: Option<LineKind>,
    quote_depth: usize,
}

impl Renderer {
    fn walk(&mut self, element: ElementRef<'_>) {
        for child in element.children() {
            match child.value() {
                Node::Text(text) => self.push_text(text),
                Node::Element(inner) if SKIPPED_ELEMENTS.contains(&inner.name()) => {}
                Node::Element(_) => {
                    if let Some(inner) = ElementRef::wrap(child) {
                        let name = inner.value().name();
                        self.tag(name, false);
                        self.walk(inner);
                        self.tag(name, true);
                    }
                }
                _ => {}
            }
        }
    }

    fn push_text(&mut self, raw: &str) {
        let text = collapse_whitespace(raw);
        if text.trim().is_empty() {
            if !self.current.is_empty() && !self.current.ends_with(' ') {
                self.current.push(' ');
            }
            return;
        }
        if self.current.is_empty() {
            self.current.push_str(text.trim_start());
        } else {
            self.current.push_str(&text);
        }
    }

    fn tag(&mut self, name: &str, closing: bool) {
        match name {
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                self.flush();
                if closing {
                    self.blank();
                } else {
                    let level = name[1..].parse().unwrap_or(1);
                    self.kind = Some(LineKind::Heading(level));
                }
            }
            "p" | "div" | "section" | "article" | "figure" | "figcaption" | "table" | "tr" => {
                self.flush();
                if closing && name == "p" {
                    self.blank();
                }
            }
            "li" => {
                self.flush();
                if !closing {
                    self.kind = Some(LineKind::ListItem);
                }
            }
            "ul" | "ol" => {
                self.flush();
                if closing {
                    self.blank();
                }
            }
            "blockquote" => {
                self.flush();
                if closing {
                    self.quote_depth = self.quote_depth.saturating_sub(1);
                    self.blank();
                } else {
                    self.quote_depth += 1;
                }
            }
            "br" | "hr" => self.flush(),
            "td" | "th" if closing => self.current.push_str("  "),
            _ => {}
        }
    }

    fn flush(&mut self) {
        let text = self.current.trim().to_string();
        self.current.clear();
        let kind = self.kind.take();
        if text.is_empty() {
            return;
        }
        let kind = match kind {
            Some(kind) => kind,
            None if self.quote_depth > 0 => LineKind::Quote,
            None => LineKind::Text,
        };
        self.lines.push(RenderedLine::new(kind, text));
    }

    fn blank(&mut self) {
        if matches!(self.lines.last(), Some(line) if line.kind != LineKind::Blank) {
            self.lines.push(RenderedLine::blank());
        }
    }

    fn finish(mut self) -> Vec<RenderedLine> {
        self.flush();
        while matches!(self.lines.last(), Some(line) if line.kind == LineKind::Blank) {
            self.lines.pop();
        }
        self.lines
    }
}

fn collapse_whitespace(raw: &str) -> String {
    let mut collapsed = String::with_capacity(raw.len());
    let mut in_space = false;
    for c in raw.chars() {
        if c.is_whitespace() {
            if !in_space {
                collapsed.push(' ');
            }
            in_space = true;
        } else {
            collapsed.push(c);
            in_space = false;
        }
    }
    collapsed
}
