//! Parser for the fixed-column FEATURES table.

use log::warn;

use crate::error::Error;
use crate::location::{Location, parse_location};

/// Byte column where locations and qualifiers start.
const LOCATION_COLUMN: usize = 21;

/// A feature-table entry, e.g. a `CDS` with its location and qualifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feature {
    pub name: String,
    pub location: Location,
    /// Qualifiers in file order. Keys may repeat (e.g. `db_xref`).
    pub qualifiers: Vec<(String, String)>,
}

impl Feature {
    /// First value of the qualifier `key`, without the leading `/`.
    #[must_use]
    pub fn qualifier(&self, key: &str) -> Option<&str> {
        self.qualifiers
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// All values of the qualifier `key`.
    pub fn qualifiers_named<'a, 'k>(
        &'a self,
        key: &'k str,
    ) -> impl Iterator<Item = &'a str> + use<'a, 'k> {
        self.qualifiers
            .iter()
            .filter(move |(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// A feature whose lines are still being read.
struct PendingFeature {
    name: String,
    first_line: String,
    location_text: String,
    qualifiers: Vec<(String, String)>,
}

impl PendingFeature {
    fn finish(self) -> Result<Feature, Error> {
        if self.location_text.trim().is_empty() {
            return Err(Error::Parse(format!(
                "feature '{}' has no location",
                self.name
            )));
        }
        let location = parse_location(&self.location_text)?;
        let qualifiers = self
            .qualifiers
            .into_iter()
            .map(|(key, raw)| (key, unquote(&raw)))
            .collect();
        Ok(Feature {
            name: self.name,
            location,
            qualifiers,
        })
    }
}

/// Line-at-a-time builder for the FEATURES section.
///
/// Malformed features are dropped with a warning unless `strict` is set, in
/// which case the first error is returned.
pub(crate) struct FeatureTableBuilder {
    strict: bool,
    features: Vec<Feature>,
    current: Option<PendingFeature>,
}

impl FeatureTableBuilder {
    pub(crate) fn new(strict: bool) -> Self {
        Self {
            strict,
            features: Vec::new(),
            current: None,
        }
    }

    /// Feed one indented line of the table.
    pub(crate) fn push_line(&mut self, line: &str) -> Result<(), Error> {
        if line.trim().is_empty() {
            return Ok(());
        }
        let (key_column, content) = split_columns(line);
        let key_column = key_column.trim();

        if !key_column.is_empty() {
            self.finish_current()?;
            // Best effort for keys running into the location column
            let mut tokens = key_column.splitn(2, char::is_whitespace);
            let name = tokens.next().unwrap_or_default().to_string();
            let mut location_text = tokens.next().unwrap_or_default().trim().to_string();
            location_text.push_str(content.trim());
            self.current = Some(PendingFeature {
                name,
                first_line: line.to_string(),
                location_text,
                qualifiers: Vec::new(),
            });
            return Ok(());
        }

        let Some(current) = self.current.as_mut() else {
            return self.malformed(Error::Parse(format!(
                "continuation line outside of a feature: '{}'",
                line.trim()
            )));
        };

        let content = content.trim();
        if let Some(qualifier) = content.strip_prefix('/') {
            let (key, value) = qualifier.split_once('=').unwrap_or((qualifier, ""));
            current
                .qualifiers
                .push((key.trim().to_string(), value.to_string()));
        } else if let Some((key, value)) = current.qualifiers.last_mut() {
            if key.as_str() != "translation" && !value.is_empty() {
                value.push(' ');
            }
            value.push_str(content);
        } else {
            current.location_text.push_str(content);
        }
        Ok(())
    }

    /// Close the table and return the parsed features in file order.
    pub(crate) fn finish(mut self) -> Result<Vec<Feature>, Error> {
        self.finish_current()?;
        Ok(self.features)
    }

    fn finish_current(&mut self) -> Result<(), Error> {
        let Some(pending) = self.current.take() else {
            return Ok(());
        };
        let name = pending.name.clone();
        let first_line = pending.first_line.clone();
        match pending.finish() {
            Ok(feature) => {
                self.features.push(feature);
                Ok(())
            }
            Err(e) => self.malformed(Error::Feature {
                name,
                line: first_line.trim().to_string(),
                source: Box::new(e),
            }),
        }
    }

    fn malformed(&self, error: Error) -> Result<(), Error> {
        if self.strict {
            return Err(error);
        }
        warn!("skipping malformed feature: {error}");
        Ok(())
    }
}

fn split_columns(line: &str) -> (&str, &str) {
    if line.len() <= LOCATION_COLUMN {
        return (line, "");
    }
    let mut split = LOCATION_COLUMN;
    while !line.is_char_boundary(split) {
        split += 1;
    }
    line.split_at(split)
}

/// Strip surrounding quotes and unescape doubled quotes.
fn unquote(raw: &str) -> String {
    let trimmed = raw.trim();
    match trimmed.strip_prefix('"') {
        Some(inner) => inner
            .strip_suffix('"')
            .unwrap_or(inner)
            .replace("\"\"", "\""),
        None => trimmed.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::Span;

    fn parse_table(text: &str, strict: bool) -> Result<Vec<Feature>, Error> {
        let mut builder = FeatureTableBuilder::new(strict);
        for line in text.lines() {
            builder.push_line(line)?;
        }
        builder.finish()
    }

    #[test]
    fn features_in_file_order() {
        let table = "\
     source          1..2618
                     /organism=\"Homo sapiens\"
     gene            1..2618
     CDS             join(142..516,609..1621)
                     /codon_start=1
";
        let features = parse_table(table, false).unwrap();
        let names: Vec<&str> = features.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["source", "gene", "CDS"]);
        assert!(features[1].qualifiers.is_empty());
        assert_eq!(
            features[2].location,
            Location::Joined(vec![Span::new(142, 516), Span::new(609, 1621)])
        );
        assert_eq!(features[2].qualifier("codon_start"), Some("1"));
        assert_eq!(features[0].qualifier("organism"), Some("Homo sapiens"));
    }

    #[test]
    fn wrapped_location_is_accumulated() {
        let table = "\
     CDS             join(1..10,20..30,40..50,60..70,80..90,100..110,120..130,
                     140..150,160..170)
                     /gene=\"ABC\"
";
        let features = parse_table(table, false).unwrap();
        assert_eq!(features.len(), 1);
        assert_eq!(features[0].location.parts().len(), 9);
        assert_eq!(features[0].location.parts()[8], Span::new(160, 170));
    }

    #[test]
    fn wrapped_qualifier_values() {
        let table = "\
     CDS             1..12
                     /note=\"first part
                     second part\"
                     /translation=\"MVHLTPEEKS
                     AVTALWGKV\"
                     /pseudo
";
        let features = parse_table(table, false).unwrap();
        let cds = &features[0];
        assert_eq!(cds.qualifier("note"), Some("first part second part"));
        assert_eq!(cds.qualifier("translation"), Some("MVHLTPEEKSAVTALWGKV"));
        assert_eq!(cds.qualifier("pseudo"), Some(""));
    }

    #[test]
    fn repeated_qualifiers_and_escaped_quotes() {
        let table = "\
     gene            1..50
                     /db_xref=\"GeneID:3043\"
                     /db_xref=\"HGNC:HGNC:4827\"
                     /note=\"the \"\"beta\"\" chain\"
";
        let features = parse_table(table, false).unwrap();
        let xrefs: Vec<&str> = features[0].qualifiers_named("db_xref").collect();
        assert_eq!(xrefs, vec!["GeneID:3043", "HGNC:HGNC:4827"]);
        assert_eq!(features[0].qualifier("note"), Some("the \"beta\" chain"));
    }

    #[test]
    fn qualifier_values_outlive_the_lookup_key() {
        let table = "\
     gene            1..50
                     /gene=\"HBB\"
                     /db_xref=\"GeneID:3043\"
";
        let features = parse_table(table, false).unwrap();
        let gene = {
            let key = String::from("gene");
            features[0].qualifier(&key)
        };
        assert_eq!(gene, Some("HBB"));
        let xrefs: Vec<&str> = {
            let key = format!("db_{}", "xref");
            features[0].qualifiers_named(&key).collect()
        };
        assert_eq!(xrefs, vec!["GeneID:3043"]);
    }

    #[test]
    fn malformed_feature_skipped() {
        let table = "\
     gene            1..100
     CDS             join(467..)
                     /gene=\"X\"
     exon            1..40
";
        let features = parse_table(table, false).unwrap();
        let names: Vec<&str> = features.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["gene", "exon"]);
    }

    #[test]
    fn malformed_feature_fails_in_strict_mode() {
        let table = "\
     gene            1..100
     CDS             join(467..)
     exon            1..40
";
        let err = parse_table(table, true).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("join(467..)"));
        assert!(message.contains("CDS"));
        match err {
            Error::Feature { name, source, .. } => {
                assert_eq!(name, "CDS");
                assert!(matches!(*source, Error::Location { .. }));
            }
            other => panic!("expected a feature error, got {other:?}"),
        }
    }

    #[test]
    fn feature_without_location_skipped() {
        let table = "\
     misc_feature
                     /note=\"no location\"
     exon            1..40
";
        let features = parse_table(table, false).unwrap();
        assert_eq!(features.len(), 1);
        assert_eq!(features[0].name, "exon");
    }

    #[test]
    fn stray_continuation_line_skipped() {
        let table = "\
                     /note=\"orphan\"
     exon            1..40
";
        let features = parse_table(table, false).unwrap();
        assert_eq!(features.len(), 1);
        assert!(parse_table(table, true).is_err());
    }

    #[test]
    fn long_key_runs_into_location_column() {
        let features = parse_table("     misc_feature_x 5..9", false).unwrap();
        assert_eq!(features[0].name, "misc_feature_x");
        assert_eq!(features[0].location, Location::Simple(Span::new(5, 9)));
    }

    #[test]
    fn empty_table() {
        assert!(parse_table("", false).unwrap().is_empty());
    }
}
