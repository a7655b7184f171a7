use std::cmp::Ordering;

#[cfg(feature = "parallel_sort")]
use rayon::prelude::*;

use crate::error::Result;
use crate::score::SubstitutionMatrix;
use crate::{Config, DiagScanner, DiagonalNode};

mod parallel;

pub use parallel::{scan_subjects_parallel, write_subjects_parallel};

/// Segments found on one subject
#[derive(Debug, Clone)]
pub struct SubjectHits {
    /// Index of the subject in the original list of subjects
    pub index: u32,
    /// Highest segment score
    pub best_score: i32,
    pub nodes: Vec<DiagonalNode>,
}

impl PartialOrd for SubjectHits {
    fn partial_cmp(&self, other: &SubjectHits) -> Option<Ordering> {
        Some(std::cmp::Ord::cmp(self, other))
    }
}
/// Orders by best score descending, then index
impl Ord for SubjectHits {
    fn cmp(&self, other: &Self) -> Ordering {
        self.best_score
            .cmp(&other.best_score)
            .reverse()
            .then_with(|| self.index.cmp(&other.index))
    }
}
impl PartialEq for SubjectHits {
    fn eq(&self, other: &Self) -> bool {
        self.best_score == other.best_score && self.index == other.index
    }
}
impl Eq for SubjectHits {}

impl DiagScanner {
    /// Scans `subjects`, numbering them from `offset`, and appends the hits of every
    /// subject with at least one segment
    pub(crate) fn scan_subjects_into<S: AsRef<[u8]>>(
        &mut self,
        subjects: &[S],
        offset: u32,
        hits: &mut Vec<SubjectHits>,
    ) -> Result<()> {
        for (i, subject) in subjects.iter().enumerate() {
            let nodes = self.scan_all(subject.as_ref())?;
            let Some(best_score) = nodes.iter().map(|node| node.segment.score).max() else {
                continue;
            };
            hits.push(SubjectHits {
                index: offset + i as u32,
                best_score,
                nodes,
            });
        }
        Ok(())
    }
}

/// Scans `query` against every subject. Subjects without segments are left out; the rest
/// are ordered by best score when `config.sort` is set, by index otherwise.
pub fn scan_subjects<S: AsRef<[u8]>>(
    query: &[u8],
    subjects: &[S],
    matrix: &SubstitutionMatrix,
    config: &Config,
) -> Result<Vec<SubjectHits>> {
    assert!(
        subjects.len() < (u32::MAX as usize),
        "subject index overflow"
    );

    let mut scanner = DiagScanner::new(query, matrix, config)?;
    let mut hits = vec![];
    scanner.scan_subjects_into(subjects, 0, &mut hits)?;

    if config.sort {
        #[cfg(feature = "parallel_sort")]
        hits.par_sort_unstable();
        #[cfg(not(feature = "parallel_sort"))]
        hits.sort_unstable();
    }

    Ok(hits)
}
