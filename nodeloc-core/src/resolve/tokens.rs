use std::io::{self, BufRead};

/// Longest token kept in full, in bytes.
///
/// Every valid identifier fits comfortably; longer tokens are cut at this
/// length and marked so they can never parse as an identifier.
pub const MAX_TOKEN_LEN: usize = 64;

/// Marker appended to tokens cut at [`MAX_TOKEN_LEN`].
const TRUNCATION_MARKER: char = '\u{2026}';

/// Whitespace-separated tokens read from a byte stream.
///
/// A token is yielded as soon as the whitespace byte ending it has been read,
/// without waiting for the rest of its line, and a final token is ended by the
/// end of the stream. At most [`MAX_TOKEN_LEN`] bytes of a token are held, so
/// memory stays bounded whatever the input. Bytes that are not UTF-8 are
/// replaced, which makes the token fail identifier parsing instead of
/// aborting the stream.
///
/// ```
/// use nodeloc_core::Tokens;
///
/// let tokens: Vec<String> = Tokens::new("1 2\n\n 3".as_bytes())
///     .collect::<Result<_, _>>()
///     .unwrap();
/// assert_eq!(tokens, ["1", "2", "3"]);
/// ```
#[derive(Debug)]
pub struct Tokens<R> {
    reader: R,
    token: Vec<u8>,
    truncated: bool,
}

impl<R: BufRead> Tokens<R> {
    /// Tokenise `reader`.
    #[must_use]
    pub const fn new(reader: R) -> Self {
        Self {
            reader,
            token: Vec::new(),
            truncated: false,
        }
    }

    /// Scan buffered bytes into the pending token.
    ///
    /// Returns `Ok(true)` once a token is complete and `Ok(false)` at the end
    /// of the stream.
    fn scan(&mut self) -> io::Result<bool> {
        loop {
            let available = self.reader.fill_buf()?;
            if available.is_empty() {
                return Ok(false);
            }

            let mut used = 0;
            let mut complete = false;
            for &byte in available {
                used += 1;
                if is_separator(byte) {
                    if self.token.is_empty() && !self.truncated {
                        continue;
                    }
                    complete = true;
                    break;
                }
                if self.token.len() < MAX_TOKEN_LEN {
                    self.token.push(byte);
                } else {
                    self.truncated = true;
                }
            }
            self.reader.consume(used);
            if complete {
                return Ok(true);
            }
        }
    }

    fn take_token(&mut self) -> Option<String> {
        if self.token.is_empty() && !self.truncated {
            return None;
        }
        let mut token = String::from_utf8_lossy(&self.token).into_owned();
        if self.truncated {
            token.push(TRUNCATION_MARKER);
        }
        self.token.clear();
        self.truncated = false;
        Some(token)
    }
}

impl<R: BufRead> Iterator for Tokens<R> {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.scan() {
                Ok(_) => return self.take_token().map(Ok),
                Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
                Err(err) => return Some(Err(err)),
            }
        }
    }
}

/// Separators are the C locale's whitespace, vertical tab included.
const fn is_separator(byte: u8) -> bool {
    byte.is_ascii_whitespace() || byte == b'\x0b'
}
