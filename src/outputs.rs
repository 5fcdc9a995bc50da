//! The output file categories AlphaPeel writes, and which of them exist.

use std::fmt;

use crate::command::ScenarioConfig;

/// Files written as `<prefix>.<suffix>` that scenarios toggle on and off
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputKind {
    /// Genotype dosages
    Dosages,
    /// Segregation probabilities
    Seg,
    /// Minor allele frequencies
    Maf,
    /// Genotype error rates
    GenoError,
    /// Sequence error rates
    SeqError,
    /// Phased haplotypes
    Haps,
}

impl OutputKind {
    /// Every watched category, in the order used for existence vectors
    pub const ALL: [OutputKind; 6] = [
        OutputKind::Dosages,
        OutputKind::Seg,
        OutputKind::Maf,
        OutputKind::GenoError,
        OutputKind::SeqError,
        OutputKind::Haps,
    ];

    /// File suffix
    pub fn suffix(&self) -> &'static str {
        match self {
            OutputKind::Dosages => "dosages",
            OutputKind::Seg => "seg",
            OutputKind::Maf => "maf",
            OutputKind::GenoError => "genoError",
            OutputKind::SeqError => "seqError",
            OutputKind::Haps => "haps",
        }
    }
}

/// Suffix of the called genotype file for a calling threshold, e.g. `called.0.1`
pub fn called_suffix(threshold: &str) -> String {
    format!("called.{threshold}")
}

/// One flag per [`OutputKind::ALL`] entry: does that output exist?
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExistenceVector(pub Vec<bool>);

impl ExistenceVector {
    /// Checks the output directory of `config` for every category
    pub fn observe(config: &ScenarioConfig) -> Self {
        Self(
            OutputKind::ALL
                .iter()
                .map(|kind| config.output_file(kind.suffix()).exists())
                .collect(),
        )
    }

    /// From the `0`/`1` notation, anything non-zero counts as present
    pub fn from_bits(bits: &[u8]) -> Self {
        Self(bits.iter().map(|b| *b != 0).collect())
    }
}

impl fmt::Display for ExistenceVector {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let bits: Vec<&str> = self.0.iter().map(|b| if *b { "1" } else { "0" }).collect();
        write!(f, "[{}]", bits.join(","))
    }
}
