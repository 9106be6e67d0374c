use phf::{Map, phf_map};
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AminoAcidType {
    // --- Aliphatic, Nonpolar ---
    Alanine,    // Alanine (ALA)
    Glycine,    // Glycine (GLY)
    Isoleucine, // Isoleucine (ILE)
    Leucine,    // Leucine (LEU)
    Proline,    // Proline (PRO)
    Valine,     // Valine (VAL)

    // --- Aromatic ---
    Phenylalanine, // Phenylalanine (PHE)
    Tryptophan,    // Tryptophan (TRP)
    Tyrosine,      // Tyrosine (TYR)

    // --- Polar, Uncharged ---
    Asparagine, // Asparagine (ASN)
    Cysteine,   // Cysteine (CYS)
    Glutamine,  // Glutamine (GLN)
    Serine,     // Serine (SER)
    Threonine,  // Threonine (THR)
    Methionine, // Methionine (MET)

    // --- Positively Charged (Basic) ---
    Arginine,  // Arginine (ARG)
    Lysine,    // Lysine (LYS)
    Histidine, // Histidine (HIS, and the HSD/HSE/HSP/HID/HIE/HIP variants)

    // --- Negatively Charged (Acidic) ---
    AsparticAcid, // Aspartic Acid (ASP)
    GlutamicAcid, // Glutamic Acid (GLU)
}

static THREE_LETTER_CODES: Map<&'static str, AminoAcidType> = phf_map! {
    "ALA" => AminoAcidType::Alanine,
    "GLY" => AminoAcidType::Glycine,
    "ILE" => AminoAcidType::Isoleucine,
    "LEU" => AminoAcidType::Leucine,
    "PRO" => AminoAcidType::Proline,
    "VAL" => AminoAcidType::Valine,
    "PHE" => AminoAcidType::Phenylalanine,
    "TRP" => AminoAcidType::Tryptophan,
    "TYR" => AminoAcidType::Tyrosine,
    "ASN" => AminoAcidType::Asparagine,
    "CYS" => AminoAcidType::Cysteine,
    "GLN" => AminoAcidType::Glutamine,
    "SER" => AminoAcidType::Serine,
    "THR" => AminoAcidType::Threonine,
    "MET" => AminoAcidType::Methionine,
    "ARG" => AminoAcidType::Arginine,
    "LYS" => AminoAcidType::Lysine,
    "HIS" => AminoAcidType::Histidine,
    "HSD" => AminoAcidType::Histidine,
    "HSE" => AminoAcidType::Histidine,
    "HSP" => AminoAcidType::Histidine,
    "HID" => AminoAcidType::Histidine,
    "HIE" => AminoAcidType::Histidine,
    "HIP" => AminoAcidType::Histidine,
    "ASP" => AminoAcidType::AsparticAcid,
    "GLU" => AminoAcidType::GlutamicAcid,
};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Unknown residue name: '{0}'")]
pub struct UnknownResidueError(pub String);

impl FromStr for AminoAcidType {
    type Err = UnknownResidueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        THREE_LETTER_CODES
            .get(s.trim().to_ascii_uppercase().as_str())
            .copied()
            .ok_or_else(|| UnknownResidueError(s.to_string()))
    }
}

impl AminoAcidType {
    pub fn one_letter_code(self) -> char {
        match self {
            AminoAcidType::Alanine => 'A',
            AminoAcidType::Glycine => 'G',
            AminoAcidType::Isoleucine => 'I',
            AminoAcidType::Leucine => 'L',
            AminoAcidType::Proline => 'P',
            AminoAcidType::Valine => 'V',
            AminoAcidType::Phenylalanine => 'F',
            AminoAcidType::Tryptophan => 'W',
            AminoAcidType::Tyrosine => 'Y',
            AminoAcidType::Asparagine => 'N',
            AminoAcidType::Cysteine => 'C',
            AminoAcidType::Glutamine => 'Q',
            AminoAcidType::Serine => 'S',
            AminoAcidType::Threonine => 'T',
            AminoAcidType::Methionine => 'M',
            AminoAcidType::Arginine => 'R',
            AminoAcidType::Lysine => 'K',
            AminoAcidType::Histidine => 'H',
            AminoAcidType::AsparticAcid => 'D',
            AminoAcidType::GlutamicAcid => 'E',
        }
    }

    /// One-letter code as understood by the iBP-ng protein topology, which has
    /// no proline entry: prolines are written as alanine.
    pub fn ibp_code(self) -> char {
        match self {
            AminoAcidType::Proline => 'A',
            other => other.one_letter_code(),
        }
    }
}

/// Sequence letter for a three-letter residue name, `'X'` when unknown.
pub fn sequence_letter(res_name: &str) -> char {
    res_name
        .parse::<AminoAcidType>()
        .map(AminoAcidType::ibp_code)
        .unwrap_or('X')
}
