//! ANSI escape sequence removal.
//!
//! Delivery channels are not terminal-aware, so colour and cursor control
//! sequences are removed before a message leaves the process.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

/// Matches OSC sequences (BEL or ST terminated) and CSI/escape sequences,
/// including the 8-bit CSI introducer U+009B.
static ANSI_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"\x1B\][^\x07\x1B]*(?:\x07|\x1B\\)",
        r"|[\x1B\x{9B}][\[\]()#;?]*(?:",
        r"(?:(?:[a-zA-Z0-9]*(?:;[a-zA-Z0-9]*)*)?\x07)",
        r"|(?:(?:[0-9]{1,4}(?:;[0-9]{0,4})*)?[0-9A-PRZcf-ntqry=><~])",
        r")",
    ))
    .expect("ANSI pattern is valid")
});

/// Removes ANSI control sequences, leaving every other character untouched
pub fn strip_ansi(input: &str) -> Cow<'_, str> {
    ANSI_RE.replace_all(input, "")
}
