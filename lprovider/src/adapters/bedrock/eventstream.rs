//! Incremental decoder for the `application/vnd.amazon.eventstream` framing.
//!
//! Each message is laid out as:
//!
//! ```text
//! | total len (u32) | headers len (u32) | prelude crc (u32) | headers | payload | crc (u32) |
//! ```
//!
//! Network chunks do not align with message boundaries, so the decoder buffers
//! bytes until a full message is available. Both CRC32 checksums are verified
//! before a message is handed out.

use crate::ProviderError;

const PRELUDE_LEN: usize = 12;
const TRAILER_LEN: usize = 4;
const MIN_MESSAGE_LEN: usize = PRELUDE_LEN + TRAILER_LEN;
const MAX_MESSAGE_LEN: usize = 16 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderValue {
    Bool(bool),
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Bytes(Vec<u8>),
    String(String),
    Timestamp(i64),
    Uuid([u8; 16]),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventStreamMessage {
    headers: Vec<(String, HeaderValue)>,
    payload: Vec<u8>,
}

impl EventStreamMessage {
    pub fn new(headers: Vec<(String, HeaderValue)>, payload: Vec<u8>) -> Self {
        Self { headers, payload }
    }

    pub fn header(&self, name: &str) -> Option<&HeaderValue> {
        self.headers
            .iter()
            .find(|(header, _)| header == name)
            .map(|(_, value)| value)
    }

    pub fn header_str(&self, name: &str) -> Option<&str> {
        match self.header(name)? {
            HeaderValue::String(value) => Some(value.as_str()),
            _ => None,
        }
    }

    pub fn message_type(&self) -> Option<&str> {
        self.header_str(":message-type")
    }

    pub fn event_type(&self) -> Option<&str> {
        self.header_str(":event-type")
    }

    pub fn exception_type(&self) -> Option<&str> {
        self.header_str(":exception-type")
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }
}

#[derive(Debug, Default)]
pub struct EventStreamDecoder {
    buffer: Vec<u8>,
}

impl EventStreamDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    /// Bytes of an incomplete message still waiting for more input.
    pub fn buffered_len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Returns the next complete message, or `None` when more bytes are needed.
    pub fn next_message(&mut self) -> Result<Option<EventStreamMessage>, ProviderError> {
        if self.buffer.len() < PRELUDE_LEN {
            return Ok(None);
        }

        let prelude_crc = read_u32(&self.buffer[8..PRELUDE_LEN]);
        if crc32fast::hash(&self.buffer[..8]) != prelude_crc {
            return Err(ProviderError::decode("event stream prelude checksum mismatch"));
        }

        let total_len = read_u32(&self.buffer[0..4]) as usize;
        let headers_len = read_u32(&self.buffer[4..8]) as usize;

        if !(MIN_MESSAGE_LEN..=MAX_MESSAGE_LEN).contains(&total_len)
            || headers_len > total_len - MIN_MESSAGE_LEN
        {
            return Err(ProviderError::decode(format!(
                "malformed event stream prelude (total {total_len}, headers {headers_len})"
            )));
        }

        if self.buffer.len() < total_len {
            return Ok(None);
        }

        let frame = self.buffer.drain(..total_len).collect::<Vec<_>>();
        let body_end = total_len - TRAILER_LEN;
        if crc32fast::hash(&frame[..body_end]) != read_u32(&frame[body_end..]) {
            return Err(ProviderError::decode("event stream message checksum mismatch"));
        }

        let headers_end = PRELUDE_LEN + headers_len;
        let headers = parse_headers(&frame[PRELUDE_LEN..headers_end])?;
        let payload = frame[headers_end..body_end].to_vec();

        Ok(Some(EventStreamMessage { headers, payload }))
    }
}

fn read_u32(bytes: &[u8]) -> u32 {
    u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}

struct Cursor<'a> {
    bytes: &'a [u8],
    position: usize,
}

impl<'a> Cursor<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, position: 0 }
    }

    fn is_done(&self) -> bool {
        self.position >= self.bytes.len()
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8], ProviderError> {
        let end = self
            .position
            .checked_add(len)
            .filter(|end| *end <= self.bytes.len())
            .ok_or_else(|| ProviderError::decode("event stream header overruns its section"))?;
        let slice = &self.bytes[self.position..end];
        self.position = end;
        Ok(slice)
    }

    fn take_array<const N: usize>(&mut self) -> Result<[u8; N], ProviderError> {
        let mut array = [0_u8; N];
        array.copy_from_slice(self.take(N)?);
        Ok(array)
    }

    fn read_string(&mut self, len: usize) -> Result<String, ProviderError> {
        let bytes = self.take(len)?;
        String::from_utf8(bytes.to_vec())
            .map_err(|_| ProviderError::decode("event stream header is not valid UTF-8"))
    }
}

fn parse_headers(section: &[u8]) -> Result<Vec<(String, HeaderValue)>, ProviderError> {
    let mut cursor = Cursor::new(section);
    let mut headers = Vec::new();

    while !cursor.is_done() {
        let [name_len] = cursor.take_array::<1>()?;
        let name = cursor.read_string(name_len as usize)?;
        let [value_type] = cursor.take_array::<1>()?;

        let value = match value_type {
            0 => HeaderValue::Bool(true),
            1 => HeaderValue::Bool(false),
            2 => HeaderValue::Byte(i8::from_be_bytes(cursor.take_array()?)),
            3 => HeaderValue::Short(i16::from_be_bytes(cursor.take_array()?)),
            4 => HeaderValue::Int(i32::from_be_bytes(cursor.take_array()?)),
            5 => HeaderValue::Long(i64::from_be_bytes(cursor.take_array()?)),
            6 => {
                let len = u16::from_be_bytes(cursor.take_array()?) as usize;
                HeaderValue::Bytes(cursor.take(len)?.to_vec())
            }
            7 => {
                let len = u16::from_be_bytes(cursor.take_array()?) as usize;
                HeaderValue::String(cursor.read_string(len)?)
            }
            8 => HeaderValue::Timestamp(i64::from_be_bytes(cursor.take_array()?)),
            9 => HeaderValue::Uuid(cursor.take_array()?),
            other => {
                return Err(ProviderError::decode(format!(
                    "unknown event stream header type {other}"
                )));
            }
        };

        headers.push((name, value));
    }

    Ok(headers)
}

/// Encodes a message with string headers.
#[cfg(test)]
pub(crate) fn encode_message(headers: &[(&str, &str)], payload: &[u8]) -> Vec<u8> {
    let mut header_bytes = Vec::new();
    for (name, value) in headers {
        header_bytes.push(name.len() as u8);
        header_bytes.extend_from_slice(name.as_bytes());
        header_bytes.push(7);
        header_bytes.extend_from_slice(&(value.len() as u16).to_be_bytes());
        header_bytes.extend_from_slice(value.as_bytes());
    }

    encode_frame(&header_bytes, payload)
}

/// Frames pre-encoded header bytes and a payload, with valid checksums.
#[cfg(test)]
pub(crate) fn encode_frame(header_bytes: &[u8], payload: &[u8]) -> Vec<u8> {
    let total_len = MIN_MESSAGE_LEN + header_bytes.len() + payload.len();
    let mut frame = Vec::with_capacity(total_len);
    frame.extend_from_slice(&(total_len as u32).to_be_bytes());
    frame.extend_from_slice(&(header_bytes.len() as u32).to_be_bytes());
    let prelude_crc = crc32fast::hash(&frame);
    frame.extend_from_slice(&prelude_crc.to_be_bytes());
    frame.extend_from_slice(header_bytes);
    frame.extend_from_slice(payload);
    let message_crc = crc32fast::hash(&frame);
    frame.extend_from_slice(&message_crc.to_be_bytes());
    frame
}
