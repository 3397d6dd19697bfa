//! Fixed screen artefacts the OLT mixes into command output.

use std::borrow::Cow;

use memchr::memmem;

/// Banner printed at the bottom of every page of long listings. The device
/// waits for a key press before it sends the next page.
pub const PAGINATION_BANNER: &str = "---- More ( Press 'Q' to break ) ----";

/// Leading part of the banner, enough to recognise leftovers in text that
/// did not pass through the reader.
pub const PAGINATION_MARKER: &str = "---- More (";

/// Count banner occurrences in a chunk.
pub fn count_banners(chunk: &[u8]) -> usize {
    memmem::find_iter(chunk, PAGINATION_BANNER.as_bytes()).count()
}

/// Remove every banner occurrence from a chunk.
pub fn strip_banners(chunk: &[u8]) -> Cow<'_, [u8]> {
    let banner = PAGINATION_BANNER.as_bytes();
    let mut matches = memmem::find_iter(chunk, banner).peekable();
    if matches.peek().is_none() {
        return Cow::Borrowed(chunk);
    }

    let mut out = Vec::with_capacity(chunk.len());
    let mut last = 0;
    for start in matches {
        out.extend_from_slice(&chunk[last..start]);
        last = start + banner.len();
    }
    out.extend_from_slice(&chunk[last..]);
    Cow::Owned(out)
}

/// Length of the longest suffix of `data` that is a proper prefix of the
/// banner, i.e. the bytes that may be the start of a banner split across
/// reads.
pub fn partial_banner_len(data: &[u8]) -> usize {
    let banner = PAGINATION_BANNER.as_bytes();
    let max = (banner.len() - 1).min(data.len());
    (1..=max)
        .rev()
        .find(|&n| data.ends_with(&banner[..n]))
        .unwrap_or(0)
}
