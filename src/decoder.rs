//! Decoder for the API's line-oriented `key:"value"` response format.
//!
//! ```text
//! success:"true"
//! id:"12"
//! title:"First Blood"
//! ...
//! ```
//!
//! The header is the first line reporting `success:"true"`; lines before it are
//! ignored. Anything after the closing quote of
//! a value (the upstream encoder sometimes leaves a trailing comma) is noise
//! and gets dropped.

use crate::errors::GameApiError;
use crate::structs::record::Record;

const SUCCESS_HEADER: &str = "success:\"true\"";

/// Field order of a single-trophy response.
const TROPHY_FIELDS: [&str; 6] = [
    "id",
    "title",
    "description",
    "difficulty",
    "image_url",
    "achieved",
];

/// Which entity shape the body is decoded into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeMode {
    SingleTrophy,
    TrophyList,
    User,
    AuthCheck,
}

/// Result of a decode, shaped by the [`DecodeMode`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoded {
    Record(Record),
    Records(Vec<Record>),
    Verified(bool),
}

/// One `key:value` line split at its first colon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Line<'a> {
    key: &'a str,
    value: &'a str,
    raw_value: &'a str,
}

impl<'a> Line<'a> {
    fn parse(line: &'a str) -> Option<Self> {
        let (key, rest) = line.trim().split_once(':')?;
        let raw_value = rest.trim();

        let value = match raw_value.strip_prefix('"') {
            Some(inner) => match inner.rfind('"') {
                Some(end) => &inner[..end],
                None => inner,
            },
            None => raw_value,
        };

        Some(Self {
            key: key.trim(),
            value,
            raw_value,
        })
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ResponseDecoder {
    mode: DecodeMode,
}

impl ResponseDecoder {
    pub fn new(mode: DecodeMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> DecodeMode {
        self.mode
    }

    /// Decodes `body`. Fails with [`GameApiError::RequestRejected`] when the
    /// header does not report success.
    pub fn decode(&self, body: &str) -> Result<Decoded, GameApiError> {
        let (header, lines) = split_header(body)?;

        match self.mode {
            DecodeMode::TrophyList => Ok(Decoded::Records(group_trophy_blocks(&lines))),
            DecodeMode::SingleTrophy => trophy_fields(&lines).map(Decoded::Record),
            DecodeMode::User => user_fields(&lines).map(Decoded::Record),
            DecodeMode::AuthCheck => Ok(Decoded::Verified(
                std::iter::once(header).chain(lines).any(is_true_flag),
            )),
        }
    }
}

pub fn decode_trophies(body: &str) -> Result<Vec<Record>, GameApiError> {
    match ResponseDecoder::new(DecodeMode::TrophyList).decode(body)? {
        Decoded::Records(records) => Ok(records),
        other => Err(unexpected(other)),
    }
}

pub fn decode_trophy(body: &str) -> Result<Record, GameApiError> {
    match ResponseDecoder::new(DecodeMode::SingleTrophy).decode(body)? {
        Decoded::Record(record) => Ok(record),
        other => Err(unexpected(other)),
    }
}

pub fn decode_user(body: &str) -> Result<Record, GameApiError> {
    match ResponseDecoder::new(DecodeMode::User).decode(body)? {
        Decoded::Record(record) => Ok(record),
        other => Err(unexpected(other)),
    }
}

pub fn decode_auth(body: &str) -> Result<bool, GameApiError> {
    match ResponseDecoder::new(DecodeMode::AuthCheck).decode(body)? {
        Decoded::Verified(verified) => Ok(verified),
        other => Err(unexpected(other)),
    }
}

/// Whether the header line reports success. For calls whose response has no
/// payload, like `trophies/add-achieved`.
pub fn is_success(body: &str) -> bool {
    split_header(body).is_ok()
}

fn unexpected(decoded: Decoded) -> GameApiError {
    GameApiError::MalformedResponse(format!("unexpected decode result {:?}", decoded))
}

/// Finds the first line carrying `success:"true"` and returns it with the
/// lines after it. Leading noise (a server notice, proxy text) is skipped, but
/// a `success` line that does not report `true` ends the search.
fn split_header(body: &str) -> Result<(&str, Vec<&str>), GameApiError> {
    let mut lines = body.lines().filter(|line| !line.trim().is_empty());

    let header = lines
        .find(|line| {
            line.trim().contains(SUCCESS_HEADER)
                || Line::parse(line).is_some_and(|line| line.key == "success")
        })
        .filter(|line| line.trim().contains(SUCCESS_HEADER))
        .ok_or(GameApiError::RequestRejected)?;

    Ok((header, lines.collect()))
}

fn group_trophy_blocks(lines: &[&str]) -> Vec<Record> {
    let mut records = Vec::new();
    let mut current: Option<Record> = None;

    for line in lines.iter().filter_map(|line| Line::parse(line)) {
        if line.key == "id" {
            current = Some(Record::new());
        }

        // Lines outside an id..achieved block belong to no trophy.
        let Some(record) = current.as_mut() else {
            continue;
        };
        record.set(line.key, line.value);

        if line.key == "achieved" {
            records.extend(current.take());
        }
    }

    records
}

fn trophy_fields(lines: &[&str]) -> Result<Record, GameApiError> {
    if lines.len() < TROPHY_FIELDS.len() {
        return Err(GameApiError::MalformedResponse(format!(
            "expected {} trophy fields, got {}",
            TROPHY_FIELDS.len(),
            lines.len()
        )));
    }

    let mut record = Record::new();

    for (position, (field, line)) in TROPHY_FIELDS.iter().zip(lines).enumerate() {
        let line = Line::parse(line).ok_or_else(|| {
            GameApiError::MalformedResponse(format!(
                "trophy line {} has no key:value pair",
                position + 1
            ))
        })?;

        if *field == "difficulty" {
            record.set(*field, line.value.to_uppercase());
        } else {
            record.set(*field, line.value);
        }
    }

    for line in lines[TROPHY_FIELDS.len()..]
        .iter()
        .filter_map(|line| Line::parse(line))
    {
        if !record.contains_key(line.key) {
            record.set(line.key, line.value);
        }
    }

    Ok(record)
}

fn user_fields(lines: &[&str]) -> Result<Record, GameApiError> {
    let mut record = Record::new();

    for line in lines.iter().filter_map(|line| Line::parse(line)) {
        record.set(line.key, line.value);
    }

    if record.is_empty() {
        return Err(GameApiError::MalformedResponse(
            "user response carried no fields".to_string(),
        ));
    }

    Ok(record)
}

/// Lenient auth flag: the value, past an optional opening quote, starts with
/// `true`.
fn is_true_flag(line: &str) -> bool {
    Line::parse(line).is_some_and(|line| {
        let value = line.raw_value.strip_prefix('"').unwrap_or(line.raw_value);
        value.starts_with("true")
    })
}
