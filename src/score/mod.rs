//! Substitution scores and the per-query profile the scanners gather from

mod matrix;
mod profile;

pub use matrix::{AMINO_ACIDS, MASK_LETTER, SubstitutionMatrix, encode};
pub use profile::ScoreProfile;
