use log::trace;

use super::ScanSession;
use crate::DiagonalNode;
use crate::r#const::{END_SCAN_LEN, REVERSE_DIAGS};
use crate::window::SlidingWindow;

impl ScanSession {
    /// Walks the segments in order of subject end and searches the diagonals around every
    /// segment reaching the primary threshold for weak fragments: shifted continuations at
    /// both of its ends, and connections to the segments closed shortly before it.
    /// Fragments found are appended to `diags` but not walked themselves.
    pub fn link(&mut self, diags: &mut Vec<DiagonalNode>) {
        diags.sort_by_key(|node| node.segment.subject_end());

        let mut window = SlidingWindow::new(self.config.max_dist);
        let nodes = diags.len();
        for node in 0..nodes {
            let segment = diags[node].segment;
            if segment.score < self.config.min_diag_score {
                continue;
            }
            trace!("node {node}: {segment}");

            self.scan_ends(node, diags);

            window.evict(segment.subject_end());
            for (_, entry) in window.iter() {
                if (segment.diag() - diags[entry].segment.diag()).abs() > self.config.max_dist {
                    continue;
                }
                trace!("link {node} -> {entry}");
                self.scan_vicinity(node, entry, diags);
            }
            window.insert(segment.subject_end(), node);
        }
    }

    /// Probes the diagonals `±shift` around node `d_idx` just before its start and just
    /// after its end. An indel of length `shift` costs `gap_open + shift * gap_extend`, so
    /// the probe threshold grows with the shift until it reaches the primary threshold.
    pub fn scan_ends(&mut self, d_idx: usize, diags: &mut Vec<DiagonalNode>) {
        let segment = diags[d_idx].segment;
        let (dd, dj, dj1) = (segment.diag(), segment.j, segment.subject_end());
        let subject_len = self.geometry.subject_len;
        let first = diags.len();

        let mut shift = 1;
        loop {
            let min_score = self.config.gap_open + shift * self.config.gap_extend + 1;
            if min_score >= self.config.min_diag_score {
                break;
            }
            for diag in [dd + shift, dd - shift] {
                if !self.geometry.contains(diag) {
                    continue;
                }
                let o = self.geometry.offset(diag);
                if (self.grids.sv_max[o as usize] as i32) < min_score {
                    continue;
                }
                self.get_diag(o, (dj - END_SCAN_LEN).max(0), dj, min_score, diags);
                self.get_diag(o, dj1, (dj1 + END_SCAN_LEN).min(subject_len), min_score, diags);
            }
            shift += 1;
        }

        link_fragments(diags, first, d_idx);
    }

    /// Probes the diagonals between node `d_idx` and the earlier node `e_idx` over the
    /// subject columns an indel joining them would cover, plus up to `REVERSE_DIAGS`
    /// diagonals past `e_idx` in the opposite direction.
    pub fn scan_vicinity(&mut self, d_idx: usize, e_idx: usize, diags: &mut Vec<DiagonalNode>) {
        let (d, e) = (diags[d_idx].segment, diags[e_idx].segment);
        let (dd, de) = (d.diag(), e.diag());
        let (jd, jd1, ld) = (d.j, d.subject_end(), d.len);
        let (je, je1, le) = (e.j, e.subject_end(), e.len);
        let first = diags.len();

        let shift = dd - de;
        if shift > 0 {
            let j0 = je1.min(jd);
            let j1 = jd.max(je1).min(jd1);
            let reverse = (de - REVERSE_DIAGS).max(self.geometry.d_begin)..de;
            for diag in (de + 1..dd).chain(reverse) {
                self.probe(diag, j0, j1, diags);
            }
        } else if shift < 0 {
            let (jde, jde1) = (jd + shift, jd1 + shift);
            let (j0, l) = if jde > je1 {
                (je1, jde - je1)
            } else if jde > je {
                (jde, (je1 - jde).min(ld))
            } else {
                let l = (jde1 - je).min(le);
                if l <= 0 {
                    return;
                }
                (je, l)
            };
            debug_assert!(l >= 0);

            for (step, diag) in (dd + 1..de).rev().enumerate() {
                let j = j0 + step as i32;
                self.probe(diag, j, j + l, diags);
            }
            for diag in de + 1..(de + REVERSE_DIAGS + 1).min(self.geometry.d_end) {
                self.probe(diag, j0, j0 + l, diags);
            }
        }

        link_fragments(diags, first, d_idx);
    }

    fn probe(&mut self, diag: i32, j_begin: i32, j_end: i32, diags: &mut Vec<DiagonalNode>) {
        let o = self.geometry.offset(diag);
        let low = self.config.min_low_score;
        if self.grids.sv_max[o as usize] as i32 >= low {
            self.get_diag(o, j_begin, j_end, low, diags);
        }
    }
}

fn link_fragments(diags: &mut [DiagonalNode], first: usize, node: usize) {
    for fragment in &mut diags[first..] {
        fragment.link_idx = Some(node);
    }
}
