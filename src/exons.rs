//! Exon and intron structure derived from a record's CDS feature.

use serde::Serialize;

use crate::error::Error;
use crate::genbank::Feature;
use crate::location::{Location, Span, gaps};
use crate::sequence::Sequence;
use crate::strand::Strand;

/// Feature key of the coding sequence.
pub const CDS_FEATURE: &str = "CDS";

/// Exon and intron counts and total lengths of one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ExonIntronStats {
    pub exons: usize,
    pub exons_length: usize,
    pub introns: usize,
    pub introns_length: usize,
}

/// Exon and intron spans of a CDS.
///
/// Reverse-strand spans are expressed on the reverse complement of the
/// record sequence, in 5' to 3' order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneStructure {
    pub strand: Strand,
    pub exons: Vec<Span>,
    /// Non-empty gaps before, between and after the exons.
    pub introns: Vec<Span>,
}

impl GeneStructure {
    /// The uppercased sequence the spans index into: `sequence` itself, or
    /// its reverse complement for reverse-strand structures.
    #[must_use]
    pub fn frame(&self, sequence: &Sequence) -> Sequence {
        let upper = sequence.to_uppercase();
        match self.strand {
            Strand::Forward => upper,
            Strand::Reverse => upper.reverse_complement(),
        }
    }

    /// Spliced coding bases: the exons of the frame, concatenated.
    pub fn coding_sequence(&self, sequence: &Sequence) -> Result<Sequence, Error> {
        self.frame(sequence)
            .extract(&Location::Joined(self.exons.clone()))
    }
}

/// First feature named `CDS`.
#[must_use]
pub fn find_cds(features: &[Feature]) -> Option<&Feature> {
    features.iter().find(|f| f.name == CDS_FEATURE)
}

/// Resolve the exon/intron spans of the first CDS, or `None` when the record
/// has no CDS. The feature itself is left untouched.
pub fn resolve_gene_structure(
    features: &[Feature],
    sequence: &Sequence,
) -> Result<Option<GeneStructure>, Error> {
    let Some(cds) = find_cds(features) else {
        return Ok(None);
    };
    let length = sequence.len();
    let (exons, strand) = cds.location.to_joined(length)?;

    if let Some(exon) = exons.iter().find(|e| e.end > length) {
        return Err(Error::Validation(format!(
            "CDS {} has exon {exon} beyond a sequence of {length} bases",
            cds.location
        )));
    }

    let introns = gaps(&exons, length)
        .into_iter()
        .filter(|gap| !gap.is_empty())
        .collect();

    Ok(Some(GeneStructure {
        strand,
        exons,
        introns,
    }))
}

/// Count exons and introns of the first CDS and sum their lengths.
///
/// A record without a CDS (e.g. a tRNA) counts as a single exon spanning the
/// whole sequence.
pub fn compute_exon_intron_stats(
    features: &[Feature],
    sequence: &Sequence,
) -> Result<ExonIntronStats, Error> {
    let Some(structure) = resolve_gene_structure(features, sequence)? else {
        return Ok(ExonIntronStats {
            exons: 1,
            exons_length: sequence.len(),
            introns: 0,
            introns_length: 0,
        });
    };

    let frame = structure.frame(sequence);
    Ok(ExonIntronStats {
        exons: structure.exons.len(),
        exons_length: total_length(&structure.exons, &frame)?,
        introns: structure.introns.len(),
        introns_length: total_length(&structure.introns, &frame)?,
    })
}

fn total_length(spans: &[Span], frame: &Sequence) -> Result<usize, Error> {
    spans
        .iter()
        .map(|span| frame.slice(*span).map(<[u8]>::len))
        .sum()
}
