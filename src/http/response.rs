//! Origin response head inspection.
//!
//! The relay never rewrites a response; it only needs to know where the
//! body ends so it can stop copying. Everything here works on the raw head
//! bytes (status line plus headers, up to and including the blank line).

/// Upper bound on a response head kept in memory while looking for `\r\n\r\n`.
pub const MAX_HEAD_SIZE: usize = 64 * 1024;

/// How the end of a response body is determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFraming {
    /// Exactly this many body bytes follow the head.
    Length(u64),
    /// Chunked transfer coding; the body ends with the zero-size chunk
    /// and trailer section.
    Chunked,
    /// The body runs until the origin closes its write side.
    UntilClose,
}

/// The parts of a response head that matter for framing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseHead {
    pub status: u16,
    /// Ignored (`None`) whenever a `Transfer-Encoding` header is present.
    pub content_length: Option<u64>,
    /// The final transfer coding is `chunked`.
    pub chunked: bool,
}

impl ResponseHead {
    /// Parses a complete response head.
    ///
    /// Returns `None` when the status line is unreadable; the caller then
    /// falls back to relaying until close. Malformed header lines are skipped.
    pub fn parse(head: &[u8]) -> Option<Self> {
        let text = std::str::from_utf8(head).ok()?;
        let mut lines = text.split("\r\n");

        let status_line = lines.next()?;
        let mut parts = status_line.splitn(3, ' ');
        let version = parts.next()?;
        if !version.starts_with("HTTP/") {
            return None;
        }
        let status = parts.next()?.parse::<u16>().ok()?;

        let mut content_length = None;
        let mut transfer_encoded = false;
        let mut chunked = false;

        for line in lines {
            if line.is_empty() {
                break;
            }

            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let key = key.trim();
            let value = value.trim();

            if key.eq_ignore_ascii_case("Content-Length") {
                content_length = value.parse::<u64>().ok();
            } else if key.eq_ignore_ascii_case("Transfer-Encoding") {
                transfer_encoded = true;
                chunked = value
                    .rsplit(',')
                    .next()
                    .is_some_and(|coding| coding.trim().eq_ignore_ascii_case("chunked"));
            }
        }

        if transfer_encoded {
            content_length = None;
        }

        Some(Self {
            status,
            content_length,
            chunked,
        })
    }

    /// An informational head (`100 Continue`, `103 Early Hints`, ...) that
    /// precedes the final response. `101 Switching Protocols` is final.
    pub fn is_interim(&self) -> bool {
        self.status / 100 == 1 && self.status != 101
    }

    /// Decides how the body following this head is delimited.
    ///
    /// `head_request` is true when the client asked with `HEAD`, in which
    /// case no body follows regardless of what the headers announce.
    /// A non-chunked `Transfer-Encoding` leaves the body delimited by close,
    /// so an origin that holds its connection open stalls the relay.
    pub fn framing(&self, head_request: bool) -> ResponseFraming {
        if head_request || self.status / 100 == 1 || self.status == 204 || self.status == 304 {
            return ResponseFraming::Length(0);
        }

        if self.chunked {
            return ResponseFraming::Chunked;
        }

        match self.content_length {
            Some(len) => ResponseFraming::Length(len),
            None => ResponseFraming::UntilClose,
        }
    }
}

/// Offset just past the first `\r\n\r\n` in `buf`, if any.
pub fn find_head_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4)
        .position(|w| w == b"\r\n\r\n")
        .map(|pos| pos + 4)
}
