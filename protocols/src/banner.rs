//! Service banners.

/// Sent to services that stay silent after the handshake.
pub const HTTP_HEAD_PROBE: &[u8] = b"HEAD / HTTP/1.0\r\n\r\n";

/// Upper bound on bytes read for a banner.
pub const BANNER_READ_LEN: usize = 1024;

/// Turns raw bytes into a one-line banner.
///
/// Invalid UTF-8 and non-printable characters are dropped (line breaks survive until the
/// first line is taken). Returns `None` when nothing printable is left.
pub fn extract(bytes: &[u8]) -> Option<String> {
    let text = String::from_utf8_lossy(bytes);
    let printable: String = text
        .chars()
        .filter(|c| is_printable(*c) || *c == '\n' || *c == '\r')
        .collect();

    let first_line: &str = printable.trim().lines().next()?.trim();
    if first_line.is_empty() {
        return None;
    }
    Some(first_line.to_string())
}

fn is_printable(c: char) -> bool {
    !c.is_control() && c != char::REPLACEMENT_CHARACTER
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
