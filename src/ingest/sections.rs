//! Streaming section reader with hourly gap fill

use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::Path;

use chrono::{DateTime, Utc};

use crate::error::{DstError, Result};
use crate::ingest::line::{classify_line, parse_header_field, LineKind};
use crate::series::{Sample, Section, SectionHeader, TIMESTAMP_FORMAT};

/// Lazy iterator over the sections of an IAGA-2002-style stream.
///
/// In the default streaming mode a section is emitted as soon as a header
/// line arrives after at least one data line, so one station's records can
/// be consumed while the next station is still unread. With
/// [`with_read_all`](Sections::with_read_all) every record accumulates into
/// a single section and header fields are overwritten last-wins.
///
/// The final section is emitted unconditionally when input ends, even if it
/// holds no data. A parse or IO error ends the stream; no further sections
/// follow it.
pub struct Sections<R: BufRead> {
    lines: Lines<R>,
    lineno: usize,
    read_all: bool,
    header: SectionHeader,
    data: Vec<Sample>,
    prev_timestamp: Option<DateTime<Utc>>,
    done: bool,
}

impl<R: BufRead> Sections<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            lineno: 0,
            read_all: false,
            header: SectionHeader::default(),
            data: Vec::new(),
            prev_timestamp: None,
            done: false,
        }
    }

    /// Accumulate the whole stream into one section instead of flushing on
    /// header lines
    pub fn with_read_all(mut self, read_all: bool) -> Self {
        self.read_all = read_all;
        self
    }

    /// Move the accumulated state out as a finished section
    fn take_section(&mut self) -> Section {
        self.prev_timestamp = None;
        Section {
            header: std::mem::take(&mut self.header),
            data: std::mem::take(&mut self.data),
        }
    }

    /// Append a parsed sample, materializing a missing marker for every
    /// skipped hourly slot between it and the previous sample
    fn push_sample(&mut self, sample: Sample, lineno: usize) -> Result<()> {
        if let Some(prev) = self.prev_timestamp {
            if sample.timestamp <= prev {
                return Err(DstError::ParseError {
                    line: lineno,
                    reason: format!(
                        "non-monotonic timestamp {} (previous record at {})",
                        sample.timestamp.format(TIMESTAMP_FORMAT),
                        prev.format(TIMESTAMP_FORMAT)
                    ),
                });
            }
            let mut expected = prev + chrono::Duration::hours(1);
            while sample.timestamp > expected {
                self.data.push(Sample::missing(expected));
                expected += chrono::Duration::hours(1);
            }
        }
        self.prev_timestamp = Some(sample.timestamp);
        self.data.push(sample);
        Ok(())
    }
}

impl Sections<BufReader<File>> {
    /// Open a file for streaming section reads
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Ok(Sections::new(BufReader::new(file)))
    }
}

impl<R: BufRead> Iterator for Sections<R> {
    type Item = Result<Section>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        loop {
            let raw = match self.lines.next() {
                Some(Ok(raw)) => raw,
                Some(Err(e)) => {
                    self.done = true;
                    return Some(Err(e.into()));
                }
                None => {
                    self.done = true;
                    return Some(Ok(self.take_section()));
                }
            };
            self.lineno += 1;

            match classify_line(&raw, self.lineno) {
                Ok(LineKind::Invalid) => continue,
                Ok(LineKind::Header) => {
                    if !self.read_all && !self.data.is_empty() {
                        let finished = self.take_section();
                        parse_header_field(&mut self.header, &raw);
                        return Some(Ok(finished));
                    }
                    parse_header_field(&mut self.header, &raw);
                }
                Ok(LineKind::Data(sample)) => {
                    if let Err(e) = self.push_sample(sample, self.lineno) {
                        self.done = true;
                        return Some(Err(e));
                    }
                }
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            }
        }
    }
}

/// Stream sections from any buffered reader
pub fn read_sections<R: BufRead>(reader: R, read_all: bool) -> Sections<R> {
    Sections::new(reader).with_read_all(read_all)
}

/// Eagerly load every section of a file
pub fn load_sections<P: AsRef<Path>>(path: P, read_all: bool) -> Result<Vec<Section>> {
    let path = path.as_ref();
    let sections: Vec<Section> = Sections::from_path(path)?
        .with_read_all(read_all)
        .collect::<Result<_>>()?;
    let samples: usize = sections.iter().map(Section::len).sum();
    tracing::debug!(
        path = %path.display(),
        sections = sections.len(),
        samples,
        "loaded Dst sections"
    );
    Ok(sections)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn sections_of(text: &str, read_all: bool) -> Vec<Section> {
        read_sections(Cursor::new(text.to_string()), read_all)
            .collect::<Result<Vec<_>>>()
            .unwrap()
    }

    #[test]
    fn test_header_flush_mid_stream() {
        let text = "\
Station Name    Example |
2024-01-01 00:00:00.000000 001 -10.0
2024-01-01 01:00:00.000000 001 -12.0
2024-01-01 03:00:00.000000 001 -15.0
Station Name    Next |
2024-01-02 00:00:00.000000 002 -1.0
";
        let mut stream = read_sections(Cursor::new(text.to_string()), false);

        let first = stream.next().unwrap().unwrap();
        assert_eq!(first.header.station.as_deref(), Some("Example"));
        // Three records plus one gap-filled marker for the 02:00 slot
        assert_eq!(first.len(), 4);
        assert!(first.data[2].is_missing());
        assert_eq!(
            first.data[2].timestamp.format(TIMESTAMP_FORMAT).to_string(),
            "2024-01-01 02:00:00.000000"
        );

        let second = stream.next().unwrap().unwrap();
        assert_eq!(second.header.station.as_deref(), Some("Next"));
        assert_eq!(second.len(), 1);

        assert!(stream.next().is_none());
    }

    #[test]
    fn test_gap_fill_is_exhaustive() {
        let text = "\
2024-01-01 00:00:00.000000 001 1.0
2024-01-01 05:00:00.000000 001 2.0
";
        let sections = sections_of(text, false);
        assert_eq!(sections.len(), 1);
        let data = &sections[0].data;

        // A five hour jump yields exactly four missing markers
        assert_eq!(data.len(), 6);
        assert_eq!(data.iter().filter(|s| s.is_missing()).count(), 4);
        for pair in data.windows(2) {
            assert_eq!(pair[1].timestamp - pair[0].timestamp, chrono::Duration::hours(1));
        }
        assert_eq!(data[5].dst_nt, Some(2.0));
    }

    #[test]
    fn test_read_all_accumulates_across_headers() {
        let text = "\
Station Name    A |
2024-01-01 00:00:00.000000 001 1.0
Station Name    B |
IAGA CODE       HER |
2024-01-01 02:00:00.000000 001 3.0
";
        let sections = sections_of(text, true);
        assert_eq!(sections.len(), 1);

        let section = &sections[0];
        // Header fields are last-wins and gap fill spans header lines
        assert_eq!(section.header.station.as_deref(), Some("B"));
        assert_eq!(section.header.iaga_code.as_deref(), Some("HER"));
        assert_eq!(section.len(), 3);
        assert!(section.data[1].is_missing());
    }

    #[test]
    fn test_empty_mid_stream_sections_never_flush() {
        let text = "\
Station Name    A |
IAGA CODE       HER |
2024-01-01 00:00:00.000000 001 1.0
";
        let sections = sections_of(text, false);
        // Consecutive headers with no data between them merge into one section
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].header.station.as_deref(), Some("A"));
        assert_eq!(sections[0].header.iaga_code.as_deref(), Some("HER"));
        assert_eq!(sections[0].len(), 1);
    }

    #[test]
    fn test_final_section_emitted_even_when_empty() {
        let empties = ["", "   \n# nothing here\n", "Station Name    Quiet |\n"];
        for text in empties {
            let sections = sections_of(text, false);
            assert_eq!(sections.len(), 1);
            assert!(sections[0].is_empty());
        }
    }

    #[test]
    fn test_noise_lines_are_skipped_silently() {
        let text = "\
# hourly values

2024-01-01 00:00:00.000000 001 1.0
bad row
2024-01-01 01:00:00.000000 001 2.0
";
        let sections = sections_of(text, false);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].len(), 2);
        assert_eq!(sections[0].missing_count(), 0);
    }

    #[test]
    fn test_parse_error_reports_line_number() {
        let text = "\
Station Name    Example |
2024-01-01 00:00:00.000000 001 1.0
2024-01-01 01:00:00.000000 001 not-a-number
";
        let mut stream = read_sections(Cursor::new(text.to_string()), false);
        let err = stream.next().unwrap().unwrap_err();
        match err {
            DstError::ParseError { line, .. } => assert_eq!(line, 3),
            other => panic!("expected parse error, got {:?}", other),
        }
        assert!(stream.next().is_none());
    }

    #[test]
    fn test_non_monotonic_timestamps_are_fatal() {
        let text = "\
2024-01-01 05:00:00.000000 001 1.0
2024-01-01 04:00:00.000000 001 2.0
";
        let mut stream = read_sections(Cursor::new(text.to_string()), false);
        let err = stream.next().unwrap().unwrap_err();
        assert!(matches!(err, DstError::ParseError { line: 2, .. }));
        assert!(stream.next().is_none());
    }
}
