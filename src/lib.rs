//! Exonic: GenBank flat-file parsing and exon/intron structure of coding sequences.

pub mod error;

pub mod cli;
pub mod config;
pub mod exons;
pub mod genbank;
pub mod location;
pub mod sequence;
pub mod strand;
