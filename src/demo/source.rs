//! Lazy, restartable reading of recordings
//!
//! A recording is scanned from the start for every pass. Both the frame pass
//! and the event pass run over the same [`RecordReader`], which decodes every
//! frame line under one policy and counts only frames that decoded. Events are
//! stamped with the index of the most recent decoded frame, so event frame
//! indices line up with timeline indices even when frames are skipped.

use std::fs::File;
use std::io::{BufRead, BufReader, Cursor};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::error::{DemoError, FormatError, RecordError};
use super::events::DomainEvent;
use super::format::{Record, parse_record};
use super::types::{RawFrame, SessionHeader};

/// Where the recording bytes come from
#[derive(Debug, Clone)]
enum Origin {
    File(PathBuf),
    Memory(Arc<str>),
}

/// An opened recording with a validated session header
#[derive(Debug, Clone)]
pub struct DemoSource {
    origin: Origin,
    header: SessionHeader,
}

impl DemoSource {
    /// Open a recording file and read its session header
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, DemoError> {
        let origin = Origin::File(path.as_ref().to_path_buf());
        Self::with_origin(origin)
    }

    /// Use in-memory recording content (tools and tests)
    pub fn from_content(content: impl Into<String>) -> Result<Self, DemoError> {
        let content: String = content.into();
        Self::with_origin(Origin::Memory(Arc::from(content)))
    }

    fn with_origin(origin: Origin) -> Result<Self, DemoError> {
        let reader = open_reader(&origin)?;
        let header = read_header(reader)?;
        Ok(Self { origin, header })
    }

    pub fn header(&self) -> &SessionHeader {
        &self.header
    }

    /// Fresh scan over all records
    pub fn records(&self) -> Result<RecordReader<Box<dyn BufRead>>, DemoError> {
        Ok(RecordReader::new(open_reader(&self.origin)?))
    }

    /// Fresh scan yielding frames only
    pub fn frames(&self) -> Result<Frames<Box<dyn BufRead>>, DemoError> {
        Ok(Frames {
            reader: self.records()?,
        })
    }

    /// Fresh scan yielding frame-stamped events only
    pub fn events(&self) -> Result<Events<Box<dyn BufRead>>, DemoError> {
        Ok(Events {
            reader: self.records()?,
        })
    }
}

fn open_reader(origin: &Origin) -> Result<Box<dyn BufRead>, DemoError> {
    match origin {
        Origin::File(path) => {
            let file = File::open(path).map_err(|source| DemoError::Open {
                path: path.clone(),
                source,
            })?;
            Ok(Box::new(BufReader::new(file)))
        }
        Origin::Memory(content) => Ok(Box::new(Cursor::new(content.as_bytes().to_vec()))),
    }
}

/// The header must be the first record; anything else is fatal
fn read_header<B: BufRead>(reader: B) -> Result<SessionHeader, DemoError> {
    for line in reader.lines() {
        let line = line.map_err(|e| DemoError::InvalidHeader(e.to_string()))?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        return match parse_record(line) {
            Ok(Record::Header(header)) => {
                if !header.frame_rate.is_finite() || header.frame_rate <= 0.0 {
                    return Err(DemoError::InvalidHeader(format!(
                        "frame rate must be positive, got {}",
                        header.frame_rate
                    )));
                }
                Ok(header)
            }
            Ok(_) => Err(DemoError::MissingHeader),
            Err(e) => Err(DemoError::InvalidHeader(e.to_string())),
        };
    }
    Err(DemoError::MissingHeader)
}

/// A decoded record plus the frame index events are stamped with
#[derive(Debug, Clone, PartialEq)]
pub enum SourceItem {
    Frame(RawFrame),
    Event(DomainEvent),
}

/// Line-by-line decoder shared by both passes
pub struct RecordReader<B: BufRead> {
    lines: std::io::Lines<B>,
    line_no: usize,
    header_seen: bool,
    frames_decoded: usize,
    finished: bool,
}

impl<B: BufRead> RecordReader<B> {
    pub fn new(reader: B) -> Self {
        Self {
            lines: reader.lines(),
            line_no: 0,
            header_seen: false,
            frames_decoded: 0,
            finished: false,
        }
    }

    /// Frame index the next event would be stamped with
    fn current_frame(&self) -> usize {
        self.frames_decoded.saturating_sub(1)
    }

    fn decode(&mut self, line: &str) -> Option<Result<SourceItem, RecordError>> {
        let line_no = self.line_no;
        let record = match parse_record(line) {
            Ok(record) => record,
            Err(source) => {
                return Some(Err(RecordError::Malformed {
                    line: line_no,
                    source,
                }));
            }
        };

        match record {
            Record::Header(_) if !self.header_seen => {
                self.header_seen = true;
                None
            }
            Record::Header(_) => Some(Err(RecordError::DuplicateHeader { line: line_no })),
            // Every frame that parses gets an index, whatever its tick
            Record::Frame(frame) => {
                self.frames_decoded += 1;
                Some(Ok(SourceItem::Frame(frame)))
            }
            Record::Event(kind) => Some(Ok(SourceItem::Event(DomainEvent {
                frame: self.current_frame(),
                kind,
            }))),
        }
    }
}

impl<B: BufRead> Iterator for RecordReader<B> {
    type Item = Result<SourceItem, RecordError>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.finished {
            let line = match self.lines.next() {
                Some(Ok(line)) => line,
                Some(Err(source)) => {
                    // A broken stream does not recover; report once and stop
                    self.finished = true;
                    return Some(Err(RecordError::Io {
                        line: self.line_no,
                        source,
                    }));
                }
                None => {
                    self.finished = true;
                    return None;
                }
            };
            self.line_no += 1;

            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if let Some(item) = self.decode(line) {
                return Some(item);
            }
        }
        None
    }
}

/// Frame pass view over a [`RecordReader`]
pub struct Frames<B: BufRead> {
    reader: RecordReader<B>,
}

impl<B: BufRead> Iterator for Frames<B> {
    type Item = Result<RawFrame, RecordError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.reader.next()? {
                Ok(SourceItem::Frame(frame)) => return Some(Ok(frame)),
                Ok(SourceItem::Event(_)) => continue,
                Err(RecordError::Malformed { line, source }) if is_frame_failure(&source) => {
                    return Some(Err(RecordError::Malformed { line, source }));
                }
                // Everything else is reported once, by the event pass
                Err(_) => continue,
            }
        }
    }
}

/// Event pass view over a [`RecordReader`]
pub struct Events<B: BufRead> {
    reader: RecordReader<B>,
}

impl<B: BufRead> Iterator for Events<B> {
    type Item = Result<DomainEvent, RecordError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.reader.next()? {
                Ok(SourceItem::Event(event)) => return Some(Ok(event)),
                Ok(SourceItem::Frame(_)) => continue,
                // Frame failures are reported by the frame pass
                Err(RecordError::Malformed { source, .. }) if is_frame_failure(&source) => continue,
                Err(e) => return Some(Err(e)),
            }
        }
    }
}

fn is_frame_failure(error: &FormatError) -> bool {
    matches!(error, FormatError::InvalidFrame(_))
}
