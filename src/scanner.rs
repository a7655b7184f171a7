use std::ops::Range;

use crate::error::Result;
use crate::scan::VectorScanner;
use crate::score::{ScoreProfile, SubstitutionMatrix};
use crate::session::{ScanSession, scan_diags_reusing};
use crate::{Config, DiagonalNode};

/// Scans one query against any number of subjects. The query profile is built once, and
/// the band grids are kept between scans, so clone one scanner per thread.
#[derive(Debug, Clone)]
pub struct DiagScanner {
    query: Vec<u8>,
    config: Config,
    matrix: SubstitutionMatrix,
    profile: ScoreProfile,
    vector: VectorScanner,
    session: Option<ScanSession>,
}

impl DiagScanner {
    /// `query` holds letter indices of `matrix`
    pub fn new(query: &[u8], matrix: &SubstitutionMatrix, config: &Config) -> Result<Self> {
        config.validate()?;
        matrix.check_letters(query)?;
        Ok(Self {
            query: query.to_vec(),
            config: config.clone(),
            matrix: matrix.clone(),
            profile: ScoreProfile::new(query, matrix),
            vector: VectorScanner::new(),
            session: None,
        })
    }

    /// Scans the diagonals in `band`, clamped to those touching both sequences. Fails when
    /// `subject` holds a letter outside the alphabet of the matrix.
    pub fn scan(&mut self, subject: &[u8], band: Range<i32>) -> Result<Vec<DiagonalNode>> {
        self.matrix.check_letters(subject)?;
        Ok(scan_diags_reusing(
            &mut self.session,
            &self.query,
            subject,
            &self.profile,
            &self.matrix,
            band,
            &self.config,
            &self.vector,
        ))
    }

    /// Scans every diagonal
    pub fn scan_all(&mut self, subject: &[u8]) -> Result<Vec<DiagonalNode>> {
        self.scan(subject, 1 - subject.len() as i32..self.query.len() as i32)
    }
}
