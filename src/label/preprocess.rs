//! Raw OCR text → ordered, trimmed, non-empty line sequence.
//!
//! The line order is load-bearing: it encodes the label's physical layout,
//! which every downstream extractor window depends on.

/// Split raw OCR output into trimmed non-empty lines. Always succeeds;
/// garbage input just produces an empty sequence and every extractor
/// downstream reports not-found.
pub fn split_lines(raw: &str) -> Vec<String> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
