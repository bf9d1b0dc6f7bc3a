//! Streaming multipart/form-data ingestion.
//!
//! # Format
//! ```text
//! --boundary\r\n
//! Content-Disposition: form-data; name="field1"\r\n
//! \r\n
//! value1\r\n
//! --boundary\r\n
//! Content-Disposition: form-data; name="file"; filename="blob.bin"\r\n
//! Content-Type: application/octet-stream\r\n
//! \r\n
//! file contents...\r\n
//! --boundary--\r\n
//! ```
//!
//! # Design Decisions
//! - Incremental: file content is drained in fixed-size chunks as it
//!   arrives, never buffered whole, so a concurrent poll sees progress
//! - Form fields only update names the seed record already declares;
//!   stray fields are ignored
//! - Malformed input stops parsing and yields the fields read so far;
//!   the fixture exercises client tolerance, not server strictness

use axum::body::Bytes;
use futures_util::{Stream, StreamExt};

use crate::record::Record;
use crate::upload::UploadSession;

/// Extract the boundary parameter from a multipart Content-Type.
pub fn parse_boundary(content_type: &str) -> Option<String> {
    let media_type = content_type.split(';').next()?.trim();
    if !media_type.eq_ignore_ascii_case("multipart/form-data") {
        return None;
    }
    for param in content_type.split(';').skip(1) {
        let param = param.trim();
        let lowered = param.to_ascii_lowercase();
        if let Some(rest) = lowered.strip_prefix("boundary=") {
            let value = &param[param.len() - rest.len()..];
            let value = value.trim_matches('"');
            if !value.is_empty() {
                return Some(value.to_string());
            }
        }
    }
    None
}

/// Stream a multipart body into `seed`, feeding file bytes to `session`.
///
/// Form-field parts overwrite matching fields of the seed record. File
/// parts are consumed in `chunk_bytes`-sized chunks; each chunk's length
/// is added to the session's `loaded` counter and the content dropped.
/// Stream errors and malformed input end ingestion early with whatever
/// was parsed.
pub async fn ingest<S, E>(
    mut stream: S,
    boundary: &str,
    chunk_bytes: usize,
    session: &UploadSession,
    seed: Record,
) -> Record
where
    S: Stream<Item = Result<Bytes, E>> + Unpin,
{
    let mut reader = FormReader::new(boundary, chunk_bytes, session, seed);
    loop {
        match reader.step() {
            Step::Continue => {}
            Step::Done => break,
            Step::NeedMore => match stream.next().await {
                Some(Ok(data)) => reader.extend(&data),
                Some(Err(_)) | None => {
                    reader.finish();
                    break;
                }
            },
        }
    }
    reader.into_record()
}

enum Step {
    /// Progress was made; call `step` again.
    Continue,
    /// The buffer holds no complete unit; feed more input.
    NeedMore,
    /// Closing delimiter reached or input unrecoverable.
    Done,
}

enum State {
    /// Before the first delimiter line.
    Preamble,
    /// Just past a delimiter; next is `--` (end) or CRLF and headers.
    AfterDelimiter,
    /// Reading part headers up to the blank line.
    PartHeaders,
    /// Reading a form field's value; `None` when the part had no name.
    FieldValue(Option<String>),
    /// Draining file content.
    FileData,
    Done,
}

struct FormReader<'a> {
    buf: Vec<u8>,
    state: State,
    /// `--boundary`, as it appears at the start of the body.
    delimiter: Vec<u8>,
    /// `\r\n--boundary`, as it terminates a part's content.
    close_delimiter: Vec<u8>,
    chunk_bytes: usize,
    session: &'a UploadSession,
    record: Record,
}

impl<'a> FormReader<'a> {
    fn new(boundary: &str, chunk_bytes: usize, session: &'a UploadSession, seed: Record) -> Self {
        Self {
            buf: Vec::new(),
            state: State::Preamble,
            delimiter: format!("--{boundary}").into_bytes(),
            close_delimiter: format!("\r\n--{boundary}").into_bytes(),
            chunk_bytes: chunk_bytes.max(1),
            session,
            record: seed,
        }
    }

    fn extend(&mut self, data: &[u8]) {
        self.buf.extend_from_slice(data);
    }

    fn into_record(self) -> Record {
        self.record
    }

    fn step(&mut self) -> Step {
        match &self.state {
            State::Preamble => match find(&self.buf, &self.delimiter) {
                Some(i) => {
                    self.buf.drain(..i + self.delimiter.len());
                    self.state = State::AfterDelimiter;
                    Step::Continue
                }
                None => Step::NeedMore,
            },
            State::AfterDelimiter => {
                if self.buf.len() < 2 {
                    return Step::NeedMore;
                }
                if self.buf.starts_with(b"--") {
                    self.state = State::Done;
                    return Step::Done;
                }
                if !self.buf.starts_with(b"\r\n") {
                    // Garbage after the delimiter line; give up with
                    // what we have.
                    self.state = State::Done;
                    return Step::Done;
                }
                self.buf.drain(..2);
                self.state = State::PartHeaders;
                Step::Continue
            }
            State::PartHeaders => match find(&self.buf, b"\r\n\r\n") {
                Some(i) => {
                    let headers = String::from_utf8_lossy(&self.buf[..i]).into_owned();
                    self.buf.drain(..i + 4);
                    self.state = part_state(&headers);
                    Step::Continue
                }
                None => Step::NeedMore,
            },
            State::FieldValue(name) => match find(&self.buf, &self.close_delimiter) {
                Some(i) => {
                    if let Some(name) = name.clone() {
                        let value = String::from_utf8_lossy(&self.buf[..i]).into_owned();
                        if !self.record.update(&name, value) {
                            tracing::debug!(field = %name, "ignoring unmatched form field");
                        }
                    }
                    self.buf.drain(..i + self.close_delimiter.len());
                    self.state = State::AfterDelimiter;
                    Step::Continue
                }
                None => Step::NeedMore,
            },
            State::FileData => match find(&self.buf, &self.close_delimiter) {
                Some(i) => {
                    self.consume_file_bytes(i);
                    self.buf.drain(..self.close_delimiter.len());
                    self.state = State::AfterDelimiter;
                    Step::Continue
                }
                None => {
                    // Hold back enough bytes that a delimiter split
                    // across reads is still found; drain the rest in
                    // whole chunks.
                    let safe = self
                        .buf
                        .len()
                        .saturating_sub(self.close_delimiter.len() - 1);
                    let whole = safe - safe % self.chunk_bytes;
                    if whole > 0 {
                        self.consume_file_bytes(whole);
                    }
                    Step::NeedMore
                }
            },
            State::Done => Step::Done,
        }
    }

    /// Drain `n` leading file bytes, crediting the tracker per chunk.
    fn consume_file_bytes(&mut self, n: usize) {
        let mut remaining = n;
        while remaining > 0 {
            let chunk = remaining.min(self.chunk_bytes);
            self.session.add_loaded(chunk as u64);
            remaining -= chunk;
        }
        self.buf.drain(..n);
    }

    /// Flush on a truncated or failed stream.
    fn finish(&mut self) {
        if matches!(self.state, State::FileData) && !self.buf.is_empty() {
            // The bytes did arrive even if the closing delimiter never
            // did; count them so progress reflects consumption.
            let n = self.buf.len();
            self.consume_file_bytes(n);
        }
        self.state = State::Done;
    }
}

/// Decide what kind of part the headers describe.
fn part_state(headers: &str) -> State {
    for line in headers.split("\r\n") {
        if !line.to_ascii_lowercase().starts_with("content-disposition") {
            continue;
        }
        let mut name = None;
        let mut is_file = false;
        for param in line.split(';').skip(1) {
            let param = param.trim();
            if param.strip_prefix("filename=").is_some() {
                is_file = true;
            } else if let Some(rest) = param.strip_prefix("name=") {
                name = Some(rest.trim_matches('"').to_string());
            }
        }
        return if is_file {
            State::FileData
        } else {
            State::FieldValue(name)
        };
    }
    // No Content-Disposition: skip the part's content without binding it.
    State::FieldValue(None)
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || haystack.len() < needle.len() {
        return None;
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}
