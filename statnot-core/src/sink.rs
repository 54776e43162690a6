//! Capabilities the scheduler talks to: where the status line comes from
//! and where the final line goes.

use async_trait::async_trait;

use crate::error::{DisplayError, StatusError};

/// Produces the composed status line.
#[async_trait]
pub trait StatusSource: Send + Sync {
    /// Compose the status text, optionally embedding the active notification.
    ///
    /// Implementations return only the first line of whatever they produce.
    async fn status(&self, notification: Option<&str>) -> Result<String, StatusError>;
}

/// Renders one line of text, e.g. on the root window name.
#[async_trait]
pub trait DisplaySink: Send + Sync {
    async fn show(&self, line: &str) -> Result<(), DisplayError>;
}

/// First line of `text`, or the empty string.
pub fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_line() {
        assert_eq!(first_line("cpu 3%\nmem 40%"), "cpu 3%");
        assert_eq!(first_line("single"), "single");
        assert_eq!(first_line("crlf\r\nnext"), "crlf");
        assert_eq!(first_line(""), "");
        assert_eq!(first_line("\nsecond"), "");
    }
}
