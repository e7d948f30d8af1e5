//! Page document model consumed by the bootstrap locator.
//!
//! The locator never talks to a browser. It reads script text through
//! [`ScriptSource`], which is implemented by [`PageDocument`]. A document is
//! either captured inside the live page (and deserialized from JSON) or
//! rebuilt from saved HTML with [`PageDocument::from_html`].

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Read access to the scripts of a page.
pub trait ScriptSource {
    /// Text of the body's element child at `index`, if that child is a script.
    fn body_child_script(&self, index: usize) -> Option<&str>;

    /// Text of every script element, in document order.
    fn scripts(&self) -> Box<dyn Iterator<Item = &str> + '_>;
}

/// Script-level view of a page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageDocument {
    /// One entry per element child of `<body>`: the script text for script
    /// children, `None` for everything else.
    #[serde(default)]
    pub body_children: Vec<Option<String>>,

    /// All script texts in document order.
    #[serde(default)]
    pub scripts: Vec<String>,
}

/// Everything one extraction needs from the page, captured in a single pass.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageCapture {
    #[serde(default)]
    pub document: PageDocument,

    /// The application's already-evaluated snapshot object, when the page
    /// exposes one.
    #[serde(default)]
    pub snapshot: Option<serde_json::Value>,
}

impl PageCapture {
    pub fn new(document: PageDocument) -> Self {
        Self {
            document,
            snapshot: None,
        }
    }

    pub fn with_snapshot(mut self, snapshot: serde_json::Value) -> Self {
        self.snapshot = Some(snapshot);
        self
    }
}

static SCRIPT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<script\b[^>]*>(.*?)</script\s*>").expect("valid regex"));

static COMMENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<!--.*?-->").expect("valid regex"));

static BODY_OPEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<body\b[^>]*>").expect("valid regex"));

// Comment, or an opening/closing tag: (1) slash, (2) name, (3) self-closing slash.
static TAG_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)<!--.*?-->|<(/?)([A-Za-z][A-Za-z0-9:-]*)(?:\s[^>]*?)?(/?)>")
        .expect("valid regex")
});

static SCRIPT_CLOSE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)</script\s*>").expect("valid regex"));

static STYLE_CLOSE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)</style\s*>").expect("valid regex"));

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

impl PageDocument {
    pub fn new(body_children: Vec<Option<String>>, scripts: Vec<String>) -> Self {
        Self {
            body_children,
            scripts,
        }
    }

    /// Rebuild the script view from saved HTML.
    pub fn from_html(html: &str) -> Self {
        let uncommented = COMMENT_RE.replace_all(html, "");
        let scripts = SCRIPT_RE
            .captures_iter(&uncommented)
            .map(|caps| caps.get(1).map_or("", |m| m.as_str()).to_string())
            .collect();

        Self {
            body_children: scan_body_children(html),
            scripts,
        }
    }
}

fn raw_text_close(tag: &str) -> Option<&'static Regex> {
    match tag {
        "script" => Some(&SCRIPT_CLOSE_RE),
        "style" => Some(&STYLE_CLOSE_RE),
        _ => None,
    }
}

/// Walk the element children of `<body>`, tracking nesting depth.
fn scan_body_children(html: &str) -> Vec<Option<String>> {
    let mut children = Vec::new();
    let Some(body) = BODY_OPEN_RE.find(html) else {
        return children;
    };

    let mut pos = body.end();
    let mut depth = 0usize;

    while let Some(caps) = TAG_RE.captures_at(html, pos) {
        let Some(whole) = caps.get(0) else { break };
        pos = whole.end();

        let Some(name) = caps.get(2) else {
            continue; // comment
        };
        let name = name.as_str().to_ascii_lowercase();
        let closing = caps.get(1).is_some_and(|m| !m.as_str().is_empty());

        if closing {
            if depth == 0 {
                if name == "body" || name == "html" {
                    break;
                }
                continue;
            }
            depth -= 1;
            continue;
        }

        if let Some(close_re) = raw_text_close(&name) {
            let (text, next) = match close_re.find_at(html, pos) {
                Some(end) => (&html[pos..end.start()], end.end()),
                None => (&html[pos..], html.len()),
            };
            if depth == 0 {
                children.push((name == "script").then(|| text.to_string()));
            }
            pos = next;
            continue;
        }

        if depth == 0 {
            children.push(None);
        }
        let self_closing = caps.get(3).is_some_and(|m| !m.as_str().is_empty())
            || VOID_ELEMENTS.contains(&name.as_str());
        if !self_closing {
            depth += 1;
        }
    }

    children
}

impl ScriptSource for PageDocument {
    fn body_child_script(&self, index: usize) -> Option<&str> {
        self.body_children.get(index)?.as_deref()
    }

    fn scripts(&self) -> Box<dyn Iterator<Item = &str> + '_> {
        Box::new(self.scripts.iter().map(String::as_str))
    }
}
