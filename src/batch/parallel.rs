use std::fmt::Write as _;
use std::io::Write;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::thread;

use itertools::Itertools;
use log::debug;

use super::SubjectHits;
use crate::error::Result;
use crate::output::{OrderedSink, SinkStats, heartbeat};
use crate::score::SubstitutionMatrix;
use crate::{Config, DiagScanner};

// Smaller chunks enable better load balancing via stealing
// but too small increases atomic contention
const CHUNK_SIZE: usize = 64;

/// Same as [`super::scan_subjects`], with the subjects distributed over `threads` workers
pub fn scan_subjects_parallel<S: AsRef<[u8]> + Sync>(
    query: &[u8],
    subjects: &[S],
    matrix: &SubstitutionMatrix,
    config: &Config,
    threads: usize,
) -> Result<Vec<SubjectHits>> {
    assert!(
        subjects.len() < (u32::MAX as usize),
        "subject index overflow"
    );

    let scanner = DiagScanner::new(query, matrix, config)?;
    if subjects.is_empty() {
        return Ok(vec![]);
    }

    let num_chunks = subjects.len().div_ceil(CHUNK_SIZE);
    let next_chunk = AtomicUsize::new(0);
    let stop = AtomicBool::new(false);

    thread::scope(|s| -> Result<Vec<SubjectHits>> {
        let handles: Vec<_> = (0..threads.max(1))
            .map(|_| {
                s.spawn(|| -> Result<Vec<SubjectHits>> {
                    let mut local_hits = Vec::new();
                    let mut scanner = scanner.clone();

                    while !stop.load(Ordering::Relaxed) {
                        // Claim next available chunk
                        let chunk_idx = next_chunk.fetch_add(1, Ordering::Relaxed);
                        if chunk_idx >= num_chunks {
                            break;
                        }

                        let start = chunk_idx * CHUNK_SIZE;
                        let end = (start + CHUNK_SIZE).min(subjects.len());
                        if let Err(err) = scanner.scan_subjects_into(
                            &subjects[start..end],
                            start as u32,
                            &mut local_hits,
                        ) {
                            stop.store(true, Ordering::Relaxed);
                            return Err(err);
                        }
                    }

                    // Each thread sorts so that we can perform k-way merge
                    if config.sort {
                        local_hits.sort_unstable();
                    } else {
                        local_hits.sort_unstable_by_key(|hit| hit.index);
                    }

                    Ok(local_hits)
                })
            })
            .collect();

        let results = handles
            .into_iter()
            .map(|h| h.join().unwrap_or_else(|e| std::panic::resume_unwind(e)))
            .collect::<Result<Vec<_>>>()?;
        Ok(if config.sort {
            results.into_iter().kmerge().collect()
        } else {
            results
                .into_iter()
                .kmerge_by(|a, b| a.index < b.index)
                .collect()
        })
    })
}

/// Scans the subjects over `threads` workers and writes one tab-separated line per segment
/// to `writer`, in subject order: subject index, query start, subject start, length, score
/// and diagonal. Progress is logged while the workers run.
pub fn write_subjects_parallel<S: AsRef<[u8]> + Sync, W: Write + Send>(
    query: &[u8],
    subjects: &[S],
    matrix: &SubstitutionMatrix,
    config: &Config,
    threads: usize,
    writer: W,
) -> Result<SinkStats> {
    assert!(
        subjects.len() < (u32::MAX as usize),
        "subject index overflow"
    );

    let scanner = DiagScanner::new(query, matrix, config)?;
    let num_chunks = subjects.len().div_ceil(CHUNK_SIZE);
    let next_chunk = AtomicUsize::new(0);
    let sink = OrderedSink::new(writer);
    let stop = AtomicBool::new(false);
    let error = Mutex::new(None);

    thread::scope(|s| {
        let monitor = s.spawn(|| heartbeat(&sink, num_chunks, &stop));

        let handles: Vec<_> = (0..threads.max(1))
            .map(|_| {
                s.spawn(|| {
                    let mut hits = Vec::new();
                    let mut scanner = scanner.clone();

                    while !stop.load(Ordering::Relaxed) {
                        let chunk_idx = next_chunk.fetch_add(1, Ordering::Relaxed);
                        if chunk_idx >= num_chunks {
                            break;
                        }

                        let start = chunk_idx * CHUNK_SIZE;
                        let end = (start + CHUNK_SIZE).min(subjects.len());
                        hits.clear();
                        let result = scanner
                            .scan_subjects_into(&subjects[start..end], start as u32, &mut hits)
                            .and_then(|()| sink.push(chunk_idx, format_hits(&hits)).map_err(Into::into));

                        if let Err(err) = result {
                            stop.store(true, Ordering::Relaxed);
                            let mut error = error.lock().unwrap_or_else(|e| e.into_inner());
                            if error.is_none() {
                                *error = Some(err);
                            }
                        }
                    }
                })
            })
            .collect();

        for h in handles {
            h.join().unwrap_or_else(|e| std::panic::resume_unwind(e));
        }
        stop.store(true, Ordering::Relaxed);
        monitor.join().unwrap_or_else(|e| std::panic::resume_unwind(e));
    });

    if let Some(err) = error.into_inner().unwrap_or_else(|e| e.into_inner()) {
        return Err(err);
    }
    let stats = sink.stats();
    debug!(
        "wrote {} chunks of {} subjects, peak backlog {} bytes",
        stats.written,
        subjects.len(),
        stats.max_size
    );
    Ok(stats)
}

fn format_hits(hits: &[SubjectHits]) -> Vec<u8> {
    let mut out = String::new();
    for hit in hits {
        for node in &hit.nodes {
            let s = node.segment;
            // writing to a String cannot fail
            let _ = writeln!(
                out,
                "{}\t{}\t{}\t{}\t{}\t{}",
                hit.index,
                s.i,
                s.j,
                s.len,
                s.score,
                s.diag()
            );
        }
    }
    out.into_bytes()
}
