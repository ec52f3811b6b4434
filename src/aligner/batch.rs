use std::thread;

use tracing::debug;

use crate::aligner::{AlignmentResult, PairwiseAligner};
use crate::errors::AlignError;

/// Align every pair on `num_threads` worker threads.
///
/// The workers share the aligner's read-only models. Results are returned in
/// the order of `pairs`, each pair failing or succeeding independently.
pub fn align_batch<S1, S2>(
    aligner: &PairwiseAligner,
    pairs: &[(S1, S2)],
    num_threads: usize,
) -> Vec<Result<AlignmentResult, AlignError>>
where
    S1: AsRef<[u8]> + Sync,
    S2: AsRef<[u8]> + Sync,
{
    let num_threads = num_threads.clamp(1, pairs.len().max(1));
    debug!(pairs = pairs.len(), num_threads, "Starting batch alignment");

    let (tx, rx) = crossbeam_channel::unbounded();
    let (tx_out, rx_out) = crossbeam_channel::unbounded();

    for job in pairs.iter().enumerate() {
        // The receiving end is alive, so this can't fail
        let _ = tx.send(job);
    }
    drop(tx);

    thread::scope(|scope| {
        for _ in 0..num_threads {
            let thread_rx = rx.clone();
            let tx_out_thread = tx_out.clone();

            scope.spawn(move || {
                while let Ok((ix, (seq1, seq2))) = thread_rx.recv() {
                    let result = aligner.align(seq1, seq2);
                    if tx_out_thread.send((ix, result)).is_err() {
                        break;
                    }
                }
            });
        }
    });

    drop(tx_out);

    let mut results: Vec<Option<Result<AlignmentResult, AlignError>>> = Vec::with_capacity(pairs.len());
    results.resize_with(pairs.len(), || None);

    while let Ok((ix, result)) = rx_out.recv() {
        results[ix] = Some(result);
    }

    results.into_iter()
        .flatten()
        .collect()
}
