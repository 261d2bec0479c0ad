//! Fragment identifier namespacing.
//!
//! Pasted SVG fragments routinely reuse internal ids (`gradient`, `clip0`,
//! export-tool defaults). When two such fragments are mounted at once the
//! second `id` wins and the first fragment's dependent paint silently
//! disappears. Every declared id and every reference to it is therefore
//! rewritten with a fragment-unique suffix before the fragment becomes an
//! item.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::collections::HashSet;

static ID_DECL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"\bid\s*=\s*"([^"]+)""#).expect("valid id decl regex"));
static URL_REF_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"url\(#([^)]+)\)").expect("valid url ref regex"));
static HREF_REF_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r##"\b((?:xlink:)?href)\s*=\s*"#([^"]+)""##).expect("valid href regex"));
static LABELLEDBY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"\b(aria-labelledby)\s*=\s*"([^"]*)""#).expect("valid labelledby regex"));

/// Mint a suffix no other fragment in this process has used.
pub fn fresh_suffix() -> String {
    use std::sync::atomic::{AtomicU64, Ordering};
    static COUNTER: AtomicU64 = AtomicU64::new(0);
    format!("p{}", COUNTER.fetch_add(1, Ordering::Relaxed))
}

/// Rewrite every internal id and id-reference in `markup` with `-{suffix}`.
/// Ids referenced but never declared in the fragment (external links) are
/// left alone.
pub fn namespace_fragment(markup: &str, suffix: &str) -> String {
    let declared: HashSet<String> =
        ID_DECL_RE.captures_iter(markup).map(|c| c[1].to_string()).collect();
    if declared.is_empty() {
        return markup.to_string();
    }

    let renamed = |id: &str| format!("{id}-{suffix}");

    let step = ID_DECL_RE.replace_all(markup, |c: &Captures| {
        format!(r#"id="{}""#, renamed(&c[1]))
    });
    let step = URL_REF_RE.replace_all(&step, |c: &Captures| {
        if declared.contains(&c[1]) {
            format!("url(#{})", renamed(&c[1]))
        } else {
            c[0].to_string()
        }
    });
    let step = HREF_REF_RE.replace_all(&step, |c: &Captures| {
        if declared.contains(&c[2]) {
            format!(r##"{}="#{}""##, &c[1], renamed(&c[2]))
        } else {
            c[0].to_string()
        }
    });
    let step = LABELLEDBY_RE.replace_all(&step, |c: &Captures| {
        let rewritten: Vec<String> = c[2]
            .split_whitespace()
            .map(|token| {
                if declared.contains(token) {
                    renamed(token)
                } else {
                    token.to_string()
                }
            })
            .collect();
        format!(r#"{}="{}""#, &c[1], rewritten.join(" "))
    });

    step.into_owned()
}
