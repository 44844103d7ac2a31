//! Content sniffing for autodetection.

/// Cheap guess whether `text` is an OpenSSL configuration file.
///
/// The first line must be at least three characters long, start with `[` and end
/// with `]`, i.e. the file opens with a section header. Text without any newline is
/// rejected. This is a pre-filter for hosts choosing a lexer, not a validity check.
pub fn looks_like(text: &str) -> bool {
    let Some(newline) = text.find('\n') else {
        return false;
    };
    let first_line = &text[..newline];
    if first_line.chars().count() < 3 {
        return false;
    }
    first_line.starts_with('[') && first_line.ends_with(']')
}
