//! Asynchronous spectrum computation, decoupled from the capture path.
//!
//! The transform is the only O(N log N) piece of the pipeline, so it runs on
//! a dedicated worker thread. Hand-off is a single-slot pending cell: a
//! submission never blocks, and a request that arrives while another is still
//! waiting replaces it (latest wins) rather than building a backlog.

use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::{Arc, Condvar, Mutex};
use std::thread::{self, JoinHandle};

use num_complex::Complex;

use crate::audio::fft;

/// Number of magnitude bins published per completed transform.
pub const SPECTRUM_SIZE: usize = 256;

/// Smallest analysis window worth transforming. The window is the largest
/// power of two that fits in the incoming signal, so anything shorter than
/// this is a degenerate buffer and the cycle is skipped.
pub const MIN_WINDOW: usize = 512;

/// One completed analysis: magnitudes in [0, 1] plus the playback duration
/// hint the submission carried.
#[derive(Clone, Debug)]
pub struct SpectrumUpdate {
    pub magnitudes: Vec<f64>,
    pub duration_ms: u64,
}

struct Job {
    signal: Vec<f64>,
    duration_ms: u64,
}

#[derive(Default)]
struct Slot {
    pending: Option<Job>,
    shutdown: bool,
}

/// Owns the transform worker thread.
///
/// Results come back over an internal channel in submission order; the owner
/// drains them with [`try_recv`](Self::try_recv) from its own context.
/// Dropping the calculator stops the worker and discards any in-flight
/// result.
pub struct SpectrumCalculator {
    slot: Arc<(Mutex<Slot>, Condvar)>,
    results: Receiver<SpectrumUpdate>,
    worker: Option<JoinHandle<()>>,
}

impl SpectrumCalculator {
    pub fn new() -> Self {
        let slot = Arc::new((Mutex::new(Slot::default()), Condvar::new()));
        let (tx, rx) = channel();

        let worker_slot = Arc::clone(&slot);
        let worker = thread::spawn(move || worker_loop(worker_slot, tx));

        Self {
            slot,
            results: rx,
            worker: Some(worker),
        }
    }

    /// Queue `signal` for analysis. Never blocks the caller; any request the
    /// worker has not started yet is replaced by this one.
    pub fn submit(&self, signal: Vec<f64>, duration_ms: u64) {
        let (lock, cvar) = &*self.slot;
        let Ok(mut slot) = lock.lock() else { return };
        if slot
            .pending
            .replace(Job {
                signal,
                duration_ms,
            })
            .is_some()
        {
            log::trace!("replaced a pending spectrum request before it started");
        }
        cvar.notify_one();
    }

    /// Non-blocking poll for the next completed spectrum.
    pub fn try_recv(&self) -> Option<SpectrumUpdate> {
        self.results.try_recv().ok()
    }
}

impl Default for SpectrumCalculator {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for SpectrumCalculator {
    fn drop(&mut self) {
        let (lock, cvar) = &*self.slot;
        if let Ok(mut slot) = lock.lock() {
            slot.shutdown = true;
            slot.pending = None;
        }
        cvar.notify_one();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

fn worker_loop(slot: Arc<(Mutex<Slot>, Condvar)>, tx: Sender<SpectrumUpdate>) {
    let (lock, cvar) = &*slot;
    loop {
        let job = {
            let Ok(mut guard) = lock.lock() else { return };
            loop {
                if guard.shutdown {
                    return;
                }
                if let Some(job) = guard.pending.take() {
                    break job;
                }
                guard = match cvar.wait(guard) {
                    Ok(guard) => guard,
                    Err(_) => return,
                };
            }
        };

        if let Some(update) = compute_spectrum(&job.signal, job.duration_ms) {
            // The owner dropping its receiver is the shutdown signal too.
            if tx.send(update).is_err() {
                return;
            }
        }
    }
}

/// Runs the forward transform over the largest power-of-two prefix of
/// `signal` and folds the first half of the bins into [0, 1] magnitudes.
///
/// The analysis window follows the incoming buffer size instead of
/// resampling: the capture backend's buffer length decides the frequency
/// resolution, with [`MIN_WINDOW`] as the floor.
fn compute_spectrum(signal: &[f64], duration_ms: u64) -> Option<SpectrumUpdate> {
    let window = prev_power_of_two(signal.len())?;
    if window < MIN_WINDOW {
        log::debug!("skipping transform: window {window} is below the {MIN_WINDOW} minimum");
        return None;
    }

    let mut sequence: Vec<Complex<f64>> = signal[..window]
        .iter()
        .map(|&s| Complex::new(s, 0.0))
        .collect();
    fft::fft(&mut sequence);

    // A full-scale sine puts window/2 into each of its mirrored bins, so
    // 2/window maps the modulus onto [0, 1]. The upper half of the bins is
    // redundant for real input and never published.
    let scale = 2.0 / window as f64;
    let bins = SPECTRUM_SIZE.min(window / 2);
    let magnitudes = sequence[..bins]
        .iter()
        .map(|c| (c.norm() * scale).min(1.0))
        .collect();

    Some(SpectrumUpdate {
        magnitudes,
        duration_ms,
    })
}

fn prev_power_of_two(n: usize) -> Option<usize> {
    if n == 0 {
        return None;
    }
    Some(1 << (usize::BITS - 1 - n.leading_zeros()))
}
