//! Header keywords preceding the FEATURES section (LOCUS, DEFINITION, ...).

use log::debug;

/// Width of the keyword column in header lines.
const KEYWORD_WIDTH: usize = 12;

/// Header fields of a GenBank record, in file order.
///
/// Continuation lines are folded into the preceding field. Indented
/// sub-keywords such as `ORGANISM` or `AUTHORS` are fields of their own, and
/// repeated keywords (one `AUTHORS` per reference) are all kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    fields: Vec<(String, String)>,
}

/// Fields of the LOCUS line. Everything but the name is optional because
/// producers disagree on the layout of this line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locus {
    pub name: String,
    pub length: Option<usize>,
    pub molecule: Option<String>,
    pub topology: Option<String>,
    pub division: Option<String>,
    pub date: Option<String>,
}

impl Metadata {
    /// Add one raw header line.
    pub(crate) fn push_line(&mut self, line: &str) {
        let (keyword, value) = split_keyword(line);
        let keyword = keyword.trim();
        let value = value.trim();

        if !keyword.is_empty() {
            self.fields.push((keyword.to_string(), value.to_string()));
            return;
        }

        match self.fields.last_mut() {
            Some((_, existing)) => {
                if value.is_empty() {
                    return;
                }
                if !existing.is_empty() {
                    existing.push(' ');
                }
                existing.push_str(value);
            }
            None => debug!("header continuation line before any keyword: '{line}'"),
        }
    }

    /// All fields as `(keyword, value)` pairs.
    #[must_use]
    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }

    /// Value of the first field named `keyword`.
    #[must_use]
    pub fn get(&self, keyword: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == keyword)
            .map(|(_, v)| v.as_str())
    }

    #[must_use]
    pub fn definition(&self) -> Option<&str> {
        self.get("DEFINITION")
    }

    /// Primary accession (the first token of the ACCESSION line).
    #[must_use]
    pub fn accession(&self) -> Option<&str> {
        self.get("ACCESSION")?.split_whitespace().next()
    }

    /// Versioned accession from the VERSION line, e.g. `NM_000518.5`.
    #[must_use]
    pub fn version(&self) -> Option<&str> {
        self.get("VERSION")?.split_whitespace().next()
    }

    #[must_use]
    pub fn locus(&self) -> Option<Locus> {
        parse_locus(self.get("LOCUS")?)
    }
}

fn split_keyword(line: &str) -> (&str, &str) {
    if line.len() <= KEYWORD_WIDTH {
        return (line, "");
    }
    let mut split = KEYWORD_WIDTH;
    while !line.is_char_boundary(split) {
        split += 1;
    }
    line.split_at(split)
}

/// Parse the value of a LOCUS line:
/// `NM_000518  1606 bp  mRNA  linear  PRI 21-JUN-2024`.
fn parse_locus(value: &str) -> Option<Locus> {
    let tokens: Vec<&str> = value.split_whitespace().collect();
    let name = tokens.first()?.to_string();

    let unit_pos = tokens.iter().position(|t| *t == "bp" || *t == "aa");
    let length = unit_pos
        .and_then(|pos| pos.checked_sub(1))
        .and_then(|pos| tokens[pos].parse().ok());
    let molecule = unit_pos
        .and_then(|pos| tokens.get(pos + 1))
        .filter(|t| !is_topology(t))
        .map(|t| t.to_string());
    let topology = tokens
        .iter()
        .find(|t| is_topology(t))
        .map(|t| t.to_string());

    let date_pos = tokens.iter().rposition(|t| is_date(t));
    let date = date_pos.map(|pos| tokens[pos].to_string());
    let division = date_pos
        .and_then(|pos| pos.checked_sub(1))
        .map(|pos| tokens[pos])
        .filter(|t| t.len() == 3 && t.chars().all(|c| c.is_ascii_uppercase()))
        .map(str::to_string);

    Some(Locus {
        name,
        length,
        molecule,
        topology,
        division,
        date,
    })
}

fn is_topology(token: &str) -> bool {
    token == "linear" || token == "circular"
}

/// `DD-MMM-YYYY`
fn is_date(token: &str) -> bool {
    let parts: Vec<&str> = token.split('-').collect();
    parts.len() == 3
        && parts[0].len() == 2
        && parts[1].len() == 3
        && parts[2].len() == 4
        && parts[0].chars().all(|c| c.is_ascii_digit())
        && parts[2].chars().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata(text: &str) -> Metadata {
        let mut metadata = Metadata::default();
        for line in text.lines() {
            metadata.push_line(line);
        }
        metadata
    }

    const HEADER: &str = "\
LOCUS       NM_000518               1606 bp    mRNA    linear   PRI 21-JUN-2024
DEFINITION  Homo sapiens hemoglobin subunit beta (HBB), mRNA.
ACCESSION   NM_000518 XM_005253157
VERSION     NM_000518.5
KEYWORDS    RefSeq; MANE Select.
SOURCE      Homo sapiens (human)
  ORGANISM  Homo sapiens
            Eukaryota; Metazoa; Chordata; Craniata; Vertebrata; Euteleostomi;
            Mammalia; Eutheria; Euarchontoglires; Primates; Haplorrhini.
REFERENCE   1  (bases 1 to 1606)
  AUTHORS   Smith J.
  TITLE     First title
REFERENCE   2  (bases 1 to 1606)
  AUTHORS   Jones K.
  TITLE     Second title that is long enough
            to wrap onto a second line";

    #[test]
    fn common_accessors() {
        let md = metadata(HEADER);
        assert_eq!(
            md.definition(),
            Some("Homo sapiens hemoglobin subunit beta (HBB), mRNA.")
        );
        assert_eq!(md.accession(), Some("NM_000518"));
        assert_eq!(md.version(), Some("NM_000518.5"));
        assert_eq!(md.get("SOURCE"), Some("Homo sapiens (human)"));
    }

    #[test]
    fn continuation_lines_are_folded() {
        let md = metadata(HEADER);
        let organism = md.get("ORGANISM").unwrap();
        assert!(organism.starts_with("Homo sapiens Eukaryota; Metazoa;"));
        assert!(organism.ends_with("Primates; Haplorrhini."));
    }

    #[test]
    fn repeated_keywords_kept() {
        let md = metadata(HEADER);
        let titles: Vec<&str> = md
            .fields()
            .iter()
            .filter(|(k, _)| k == "TITLE")
            .map(|(_, v)| v.as_str())
            .collect();
        assert_eq!(
            titles,
            vec![
                "First title",
                "Second title that is long enough to wrap onto a second line"
            ]
        );
    }

    #[test]
    fn locus_line() {
        let locus = metadata(HEADER).locus().unwrap();
        assert_eq!(locus.name, "NM_000518");
        assert_eq!(locus.length, Some(1606));
        assert_eq!(locus.molecule.as_deref(), Some("mRNA"));
        assert_eq!(locus.topology.as_deref(), Some("linear"));
        assert_eq!(locus.division.as_deref(), Some("PRI"));
        assert_eq!(locus.date.as_deref(), Some("21-JUN-2024"));
    }

    #[test]
    fn minimal_locus_line() {
        let locus = metadata("LOCUS       AB000001").locus().unwrap();
        assert_eq!(locus.name, "AB000001");
        assert_eq!(locus.length, None);
        assert_eq!(locus.date, None);
    }

    #[test]
    fn missing_fields() {
        let md = metadata("LOCUS       X 10 bp DNA");
        assert!(md.accession().is_none());
        assert!(md.definition().is_none());
    }
}
