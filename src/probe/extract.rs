//! Counter extraction from stats bodies.
//!
//! The stats endpoint answers with a nested array whose last element is the
//! error count of the latest bucket, e.g. `[[1514764800, 42]]`. Only the
//! digits directly in front of the closing `]]` at the very end matter.

const TRAILER: &str = "]]";

/// Parse the integer immediately preceding a trailing `]]`.
///
/// Returns 0 when the body does not end with `]]`, when no digits precede
/// it, or when the digits do not fit an `i64`.
pub fn extract_error_count(body: &str) -> i64 {
    let Some(head) = body.strip_suffix(TRAILER) else {
        return 0;
    };

    let digits = head.bytes().rev().take_while(u8::is_ascii_digit).count();
    head[head.len() - digits..].parse().unwrap_or(0)
}
