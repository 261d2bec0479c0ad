//! Markup extraction strategies.
//!
//! Three strategies, tried in strict flavor priority: a strict XML parse of
//! an `image/svg+xml` representation, `<svg>` subtree extraction from
//! `text/html`, and a regex scan of `text/plain`. Only the first flavor that
//! yields at least one fragment is used. Extraction is best-effort — a
//! flavor that fails to parse simply yields nothing.

use crate::payload::{ClipboardPayload, Flavor};
use once_cell::sync::Lazy;
use regex::Regex;
use smallvec::SmallVec;

static SVG_SPAN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<svg\b.*?</svg\s*>").expect("valid svg span regex"));
static PROLOG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<\?xml.*?\?>|<!DOCTYPE[^>]*>").expect("valid prolog regex"));
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

pub type Fragments = SmallVec<[String; 4]>;

/// Run the strategy chain over a payload. Fragments come back stripped of
/// prolog/doctype noise and deduplicated, but not yet namespaced.
pub fn extract_fragments(payload: &ClipboardPayload) -> Fragments {
    let mut fragments = Fragments::new();

    for (flavor, extractor) in [
        (Flavor::SvgXml, from_svg_xml as fn(&str) -> Fragments),
        (Flavor::Html, from_html),
        (Flavor::PlainText, from_plain_text),
    ] {
        if let Some(text) = payload.text_of(flavor) {
            fragments = extractor(text);
            if !fragments.is_empty() {
                log::debug!("extract: {} fragment(s) from {}", fragments.len(), flavor.mime());
                break;
            }
        }
    }

    fragments = fragments.into_iter().map(|f| strip_prolog(&f)).collect();
    dedup_by_canonical_whitespace(&mut fragments);
    fragments
}

/// Strict XML parse; the document element must be `<svg>`.
fn from_svg_xml(text: &str) -> Fragments {
    let mut out = Fragments::new();
    match roxmltree::Document::parse(text) {
        Ok(doc) if doc.root_element().has_tag_name("svg") => {
            out.push(text.trim().to_string());
        }
        Ok(_) => log::debug!("extract: svg+xml flavor is valid XML but not an <svg> document"),
        Err(err) => log::debug!("extract: svg+xml flavor failed strict parse: {err}"),
    }
    out
}

/// Parse as HTML and pull out every `<svg>` subtree.
fn from_html(text: &str) -> Fragments {
    let html = scraper::Html::parse_fragment(text);
    let selector = scraper::Selector::parse("svg").expect("valid svg selector");
    html.select(&selector).map(|el| el.html()).collect()
}

/// Regex scan for `<svg …>…</svg>` spans in arbitrary text.
fn from_plain_text(text: &str) -> Fragments {
    SVG_SPAN_RE.find_iter(text).map(|m| m.as_str().to_string()).collect()
}

fn strip_prolog(fragment: &str) -> String {
    PROLOG_RE.replace_all(fragment, "").trim().to_string()
}

/// Collapse runs of whitespace for comparison, so the same drawing pasted
/// with different formatting counts once.
fn canonical(fragment: &str) -> String {
    WHITESPACE_RE.replace_all(fragment.trim(), " ").into_owned()
}

fn dedup_by_canonical_whitespace(fragments: &mut Fragments) {
    let mut seen: Vec<String> = Vec::new();
    fragments.retain(|f| {
        let canon = canonical(f);
        if seen.contains(&canon) {
            false
        } else {
            seen.push(canon);
            true
        }
    });
}
