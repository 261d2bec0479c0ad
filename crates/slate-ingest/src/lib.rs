//! Clipboard ingestion pipeline.
//!
//! Turns one paste event's MIME-typed representations into new scene items:
//! raster blobs win outright; otherwise the first markup flavor that yields
//! fragments is deduplicated, stripped of prolog noise, id-namespaced, and
//! appended as vector items. Nothing found means an empty result — pasting
//! junk is a silent no-op, never an error.

pub mod extract;
pub mod namespace;
pub mod payload;
pub mod raster;

pub use payload::{ClipboardError, ClipboardPayload, Flavor};

use once_cell::sync::Lazy;
use regex::Regex;
use slate_core::Item;

static VIEWBOX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"viewBox\s*=\s*"([^"]*)""#).expect("valid viewBox regex"));

/// Run the full pipeline over a payload. The caller appends the returned
/// items (selecting the last one) and owns the single history snapshot that
/// precedes the append when the result is non-empty.
pub fn ingest(payload: &ClipboardPayload) -> Vec<Item> {
    // Raster representations take priority over markup.
    let mut items: Vec<Item> = payload
        .rasters()
        .filter_map(|(flavor, bytes)| match raster::decode(flavor, bytes) {
            Ok(raster) => Some(Item::raster(raster)),
            Err(err) => {
                log::warn!("ingest: skipping undecodable {} blob: {err}", flavor.mime());
                None
            }
        })
        .collect();
    if !items.is_empty() {
        log::debug!("ingest: {} raster item(s)", items.len());
        return items;
    }

    for fragment in extract::extract_fragments(payload) {
        let aspect = viewbox_aspect(&fragment).unwrap_or(1.0);
        let namespaced = namespace::namespace_fragment(&fragment, &namespace::fresh_suffix());
        items.push(Item::markup(namespaced, aspect));
    }
    if !items.is_empty() {
        log::debug!("ingest: {} markup item(s)", items.len());
    }
    items
}

/// Height/width ratio from the fragment's `viewBox`, when it has a sane one.
fn viewbox_aspect(fragment: &str) -> Option<f32> {
    let cap = VIEWBOX_RE.captures(fragment)?;
    let nums: Vec<f32> = cap[1].split_whitespace().filter_map(|n| n.parse().ok()).collect();
    match nums.as_slice() {
        [_, _, w, h] if *w > 0.0 && *h > 0.0 => Some(h / w),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::ImageFormat;
    use slate_core::ItemKind;
    use std::io::Cursor;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(width, height, image::Rgba([0, 0, 0, 255]));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn raster_takes_priority_over_markup() {
        let mut payload = ClipboardPayload::new();
        payload.push_text("image/svg+xml", "<svg><rect/></svg>");
        payload.push_bytes("image/png", png_bytes(4, 2));

        let items = ingest(&payload);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].kind(), ItemKind::RasterReference);
        assert!((items[0].aspect - 0.5).abs() < 1e-6);
    }

    #[test]
    fn undecodable_raster_is_skipped_best_effort() {
        let mut payload = ClipboardPayload::new();
        payload.push_bytes("image/png", b"junk".to_vec());
        payload.push_bytes("image/png", png_bytes(2, 2));

        let items = ingest(&payload);
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn markup_items_are_namespaced_apart() {
        let svg = r##"<svg viewBox="0 0 10 5"><defs><linearGradient id="g"/></defs><rect fill="url(#g)"/></svg>"##;
        let mut payload = ClipboardPayload::new();
        payload.push_text("text/plain", format!("{svg}\n<svg><rect id=\"g\"/></svg>"));

        let items = ingest(&payload);
        assert_eq!(items.len(), 2);

        let markup_of = |item: &Item| match &item.content {
            slate_core::ItemContent::Markup(m) => m.clone(),
            _ => panic!("expected markup"),
        };
        let a = markup_of(&items[0]);
        let b = markup_of(&items[1]);
        // Both fragments declared id "g"; after ingestion no id occurs twice.
        let re = Regex::new(r#"id="([^"]+)""#).unwrap();
        let mut ids: Vec<String> =
            re.captures_iter(&format!("{a}{b}")).map(|c| c[1].to_string()).collect();
        let before = ids.len();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), before, "namespaced ids must be globally unique");
        // The internal reference follows its declaration.
        assert!(a.contains("url(#g-"));
    }

    #[test]
    fn viewbox_drives_aspect() {
        let mut payload = ClipboardPayload::new();
        payload.push_text("image/svg+xml", r#"<svg viewBox="0 0 200 50"><rect/></svg>"#);
        let items = ingest(&payload);
        assert!((items[0].aspect - 0.25).abs() < 1e-6);
    }

    #[test]
    fn empty_payload_is_a_silent_noop() {
        let payload = ClipboardPayload::new();
        assert!(ingest(&payload).is_empty());

        let mut text_only = ClipboardPayload::new();
        text_only.push_text("text/plain", "no markup here");
        assert!(ingest(&text_only).is_empty());
    }
}
