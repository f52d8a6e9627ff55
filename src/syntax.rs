// ---------------------------------------------------------------------------
// Line framing and character classification helpers (RFC 7230)
// ---------------------------------------------------------------------------

/// Offset of the first CRLF in `data`, if any.
#[inline]
pub(crate) fn find_crlf(data: &[u8]) -> Option<usize> {
    data.windows(2).position(|w| w == b"\r\n")
}

/// Punctuation allowed in a token besides ASCII letters and digits.
const TCHAR_PUNCT: &[u8] = b"!#$%&'*+-.^_`|~";

/// Returns `true` for bytes allowed in HTTP tokens (method, header names):
/// ASCII letters, digits and [`TCHAR_PUNCT`].
#[inline]
pub(crate) fn is_tchar(b: u8) -> bool {
    b.is_ascii_alphanumeric() || TCHAR_PUNCT.contains(&b)
}
