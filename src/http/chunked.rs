//! Locating the end of a chunked response body.
//!
//! Bytes are never decoded or altered; [`ChunkedBody::feed`] only reports how
//! many of them still belong to the current message.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Reading the hex chunk size.
    Size { size: u64, digits: bool },
    /// Skipping a chunk extension up to the end of the size line.
    Extension { size: u64 },
    /// Inside chunk data.
    Data { remaining: u64 },
    /// The CRLF closing a chunk's data.
    DataEnd,
    /// Trailer section; `line_len` counts non-CR bytes on the current line.
    Trailer { line_len: usize },
    Done,
    /// Framing broke; everything until close belongs to the body.
    Malformed,
}

/// Tracks a chunked body as it streams past.
#[derive(Debug, Clone)]
pub struct ChunkedBody {
    state: State,
}

impl Default for ChunkedBody {
    fn default() -> Self {
        Self::new()
    }
}

impl ChunkedBody {
    pub fn new() -> Self {
        Self {
            state: State::Size {
                size: 0,
                digits: false,
            },
        }
    }

    /// True once the last-chunk and trailer section have been seen.
    pub fn is_done(&self) -> bool {
        self.state == State::Done
    }

    /// True when the body stopped following chunked syntax.
    pub fn is_malformed(&self) -> bool {
        self.state == State::Malformed
    }

    /// Advances over `buf` and returns how many leading bytes are part of
    /// the body. Anything past that count follows the end of the message.
    pub fn feed(&mut self, buf: &[u8]) -> usize {
        let mut pos = 0;

        while pos < buf.len() {
            match self.state {
                State::Done => return pos,
                State::Malformed => return buf.len(),
                State::Data { remaining } => {
                    let take = remaining.min((buf.len() - pos) as u64);
                    pos += take as usize;
                    self.state = if take == remaining {
                        State::DataEnd
                    } else {
                        State::Data {
                            remaining: remaining - take,
                        }
                    };
                    continue;
                }
                _ => {}
            }

            let byte = buf[pos];
            self.state = match self.state {
                State::Size { size, digits } => match byte {
                    b'0'..=b'9' | b'a'..=b'f' | b'A'..=b'F' => {
                        let digit = u64::from((byte as char).to_digit(16).unwrap_or(0));
                        match size.checked_mul(16).and_then(|s| s.checked_add(digit)) {
                            Some(size) => State::Size { size, digits: true },
                            None => State::Malformed,
                        }
                    }
                    b';' | b' ' | b'\t' if digits => State::Extension { size },
                    b'\r' if digits => State::Size { size, digits },
                    b'\n' if digits => Self::after_size_line(size),
                    _ => State::Malformed,
                },

                State::Extension { size } => match byte {
                    b'\n' => Self::after_size_line(size),
                    _ => State::Extension { size },
                },

                State::DataEnd => match byte {
                    b'\r' => State::DataEnd,
                    b'\n' => State::Size {
                        size: 0,
                        digits: false,
                    },
                    _ => State::Malformed,
                },

                State::Trailer { line_len } => match byte {
                    b'\r' => State::Trailer { line_len },
                    b'\n' if line_len == 0 => State::Done,
                    b'\n' => State::Trailer { line_len: 0 },
                    _ => State::Trailer {
                        line_len: line_len + 1,
                    },
                },

                // Handled above.
                other @ (State::Data { .. } | State::Done | State::Malformed) => other,
            };
            pos += 1;
        }

        pos
    }

    fn after_size_line(size: u64) -> State {
        if size == 0 {
            State::Trailer { line_len: 0 }
        } else {
            State::Data { remaining: size }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stops_after_last_chunk() {
        let mut body = ChunkedBody::new();
        let wire = b"5\r\nhello\r\n0\r\n\r\nHTTP/1.1 200 OK";
        assert_eq!(body.feed(wire), wire.len() - "HTTP/1.1 200 OK".len());
        assert!(body.is_done());
    }

    #[test]
    fn invalid_size_falls_back_to_malformed() {
        let mut body = ChunkedBody::new();
        assert_eq!(body.feed(b"zz\r\nrest"), 8);
        assert!(body.is_malformed());
    }
}
