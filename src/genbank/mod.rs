//! GenBank flat-file parser: header metadata, FEATURES table and ORIGIN sequence.

pub mod features;
pub mod metadata;

use std::io::{BufRead, BufReader, Lines, Read};

use flate2::read::GzDecoder;
use log::{debug, warn};

use crate::config::ParserConfig;
use crate::error::Error;
use crate::sequence::Sequence;

use features::FeatureTableBuilder;

pub use features::Feature;
pub use metadata::{Locus, Metadata};

/// One parsed GenBank record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenbankRecord {
    /// `None` when metadata parsing was disabled.
    pub metadata: Option<Metadata>,
    pub features: Vec<Feature>,
    pub sequence: Sequence,
}

/// Section the parser will read next within the current record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Header,
    Features,
    Trailer,
}

/// Streaming GenBank parser over a line source.
///
/// A record can be read in one call with [`parse_record`](Self::parse_record),
/// or phase by phase with [`parse_metadata`](Self::parse_metadata),
/// [`parse_features`](Self::parse_features) and
/// [`parse_origin`](Self::parse_origin). Phases that are not called are
/// skipped without parsing.
pub struct GenbankParser<R: BufRead> {
    lines: Lines<R>,
    buffer_line: Option<String>,
    section: Section,
    config: ParserConfig,
}

impl<R: BufRead> GenbankParser<R> {
    pub fn new(reader: R) -> Self {
        Self::with_config(reader, ParserConfig::default())
    }

    pub fn with_config(reader: R, config: ParserConfig) -> Self {
        Self {
            lines: reader.lines(),
            buffer_line: None,
            section: Section::Header,
            config,
        }
    }

    fn next_line(&mut self) -> Result<Option<String>, Error> {
        match self.buffer_line.take() {
            Some(line) => Ok(Some(line)),
            None => Ok(self.lines.next().transpose()?),
        }
    }

    fn push_back(&mut self, line: String) {
        self.buffer_line = Some(line);
    }

    /// Read the header up to the FEATURES line.
    ///
    /// With `parse == false` the header lines are consumed without being
    /// parsed and `None` is returned. Also returns `None` once the header has
    /// already been passed.
    pub fn parse_metadata(&mut self, parse: bool) -> Result<Option<Metadata>, Error> {
        if self.section != Section::Header {
            return Ok(None);
        }
        let mut metadata = Metadata::default();

        while let Some(line) = self.next_line()? {
            if line.starts_with("FEATURES") {
                break;
            }
            if line.starts_with("ORIGIN") || line.starts_with("//") {
                debug!("record has no FEATURES section");
                self.push_back(line);
                break;
            }
            if parse {
                metadata.push_line(&line);
            }
        }

        self.section = Section::Features;
        Ok(parse.then_some(metadata))
    }

    /// Read the FEATURES table. A record without one yields no features.
    pub fn parse_features(&mut self) -> Result<Vec<Feature>, Error> {
        if self.section == Section::Header {
            self.parse_metadata(false)?;
        }
        if self.section != Section::Features {
            return Ok(Vec::new());
        }
        self.section = Section::Trailer;

        let mut builder = FeatureTableBuilder::new(self.config.strict_features);
        while let Some(line) = self.next_line()? {
            // Any unindented line (ORIGIN, CONTIG, BASE COUNT, //) ends the table
            if line.starts_with(|c: char| !c.is_whitespace()) {
                self.push_back(line);
                break;
            }
            builder.push_line(&line)?;
        }
        builder.finish()
    }

    /// Read the ORIGIN sequence up to the `//` terminator, skipping whatever
    /// of the record has not been read yet. A record without ORIGIN yields
    /// an empty sequence.
    pub fn parse_origin(&mut self) -> Result<Sequence, Error> {
        self.section = Section::Header;

        let mut found_origin = false;
        while let Some(line) = self.next_line()? {
            if line.starts_with("//") {
                return Ok(Sequence::default());
            }
            if line.starts_with("ORIGIN") {
                found_origin = true;
                break;
            }
        }
        if !found_origin {
            return Ok(Sequence::default());
        }

        let mut bases = Vec::new();
        loop {
            let Some(line) = self.next_line()? else {
                warn!("ORIGIN section not terminated by '//'");
                break;
            };
            if line.starts_with("//") {
                break;
            }
            if line.starts_with("LOCUS") {
                warn!("ORIGIN section not terminated by '//'");
                self.push_back(line);
                break;
            }
            // Drop the leading position, keep the base groups in order
            for group in line.split_whitespace().skip(1) {
                bases.extend_from_slice(group.as_bytes());
            }
        }
        Ok(Sequence::new(bases))
    }

    /// Read the next full record, or `None` at end of input.
    pub fn parse_record(&mut self) -> Result<Option<GenbankRecord>, Error> {
        loop {
            match self.next_line()? {
                None => return Ok(None),
                Some(line) if line.trim().is_empty() => continue,
                Some(line) => {
                    self.push_back(line);
                    break;
                }
            }
        }

        self.section = Section::Header;
        let metadata = self.parse_metadata(self.config.parse_metadata)?;
        let features = self.parse_features()?;
        let sequence = self.parse_origin()?;
        Ok(Some(GenbankRecord {
            metadata,
            features,
            sequence,
        }))
    }

    /// Iterate over the remaining records. Iteration stops after the first error.
    pub fn records(&mut self) -> Records<'_, R> {
        Records {
            parser: self,
            failed: false,
        }
    }
}

/// Iterator returned by [`GenbankParser::records`].
pub struct Records<'a, R: BufRead> {
    parser: &'a mut GenbankParser<R>,
    failed: bool,
}

impl<R: BufRead> Iterator for Records<'_, R> {
    type Item = Result<GenbankRecord, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let result = self.parser.parse_record().transpose();
        if matches!(result, Some(Err(_))) {
            self.failed = true;
        }
        result
    }
}

/// Parse the first record of `content` with default settings.
/// Empty content yields an empty record.
pub fn parse(content: &str) -> Result<GenbankRecord, Error> {
    parse_with_config(content, ParserConfig::default())
}

pub fn parse_with_config(content: &str, config: ParserConfig) -> Result<GenbankRecord, Error> {
    let mut parser = GenbankParser::with_config(content.as_bytes(), config);
    Ok(parser.parse_record()?.unwrap_or_default())
}

/// Parse all records from a buffered reader.
pub fn parse_genbank<R: BufRead>(
    reader: R,
    config: ParserConfig,
) -> Result<Vec<GenbankRecord>, Error> {
    GenbankParser::with_config(reader, config).records().collect()
}

/// Parse all records from a gzip-compressed GenBank file.
pub fn parse_genbank_gz<R: Read>(
    reader: R,
    config: ParserConfig,
) -> Result<Vec<GenbankRecord>, Error> {
    let decoder = GzDecoder::new(reader);
    let buf_reader = BufReader::new(decoder);
    parse_genbank(buf_reader, config)
}
