//! The single-pass capture-candidate scan.
//!
//! Walks the sorted, ToF-corrected hit series once, left to right, using
//! the primary-window count as a local-density trigger. Within a group of
//! hits closer together than the minimum peak separation only the first
//! hit reaching the maximal primary count survives; well-separated groups
//! each emit one trigger. The scan also tracks the global maximum of the
//! wide-window count as an event-level summary.

use crate::config::SearchConfig;
use crate::errors::DataProcessingError;
use crate::models::SortedHitSeries;
use crate::utils::window_stats::{
    count_centered,
    count_in_window,
};
use tracing::debug;

/// Hit times are in ns; the admissibility bounds are in us.
pub const NS_TO_US: f32 = 1e-3;

/// One accepted peak: the index (into the sorted series) of the hit that
/// anchors it, and the primary-window count that hit reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Trigger {
    pub index: usize,
    pub primary_count: usize,
}

/// The hit currently nominated to anchor the open peak group.
#[derive(Debug, Clone, Copy)]
struct PendingPeak {
    index: usize,
    time: f32,
    primary_count: usize,
    wide_count: usize,
}

/// Running state of one scan. Created fresh per event and discarded after
/// the scan returns; every sequential dependency of the algorithm lives
/// here, explicitly, rather than in fields mutated across methods.
#[derive(Debug, Default)]
struct ScanState {
    pending: Option<PendingPeak>,
    first_hit_time: Option<f32>,
    max_wide_count: usize,
    max_wide_time: Option<f32>,
}

/// What one scan over one event produces.
#[derive(Debug, Clone)]
pub struct ScanOutput {
    /// Accepted triggers, ordered by time.
    pub triggers: Vec<Trigger>,
    /// Corrected time [ns] of the earliest admissible hit.
    pub first_hit_time: Option<f32>,
    /// Largest wide-window count seen anywhere in the scan, independent of
    /// peak acceptance, and the candidate time at which it occurred.
    pub max_wide_count: usize,
    pub max_wide_time: Option<f32>,
}

/// Runs the candidate scan over a sorted corrected series.
///
/// The series must be ascending in time and column-aligned; violations
/// abort the event with an error since a partially scanned event would
/// yield silently wrong features.
pub fn scan(
    sorted: &SortedHitSeries,
    config: &SearchConfig,
) -> Result<ScanOutput, DataProcessingError> {
    sorted.check_sorted("scan")?;
    if sorted.times.len() != sorted.charges.len() {
        return Err(DataProcessingError::ExpectedSlicesSameLength {
            expected: sorted.times.len(),
            other: sorted.charges.len(),
            context: "scan charges".to_string(),
        });
    }

    let times = &sorted.times;
    let mut state = ScanState::default();
    let mut triggers = Vec::new();

    for (i, &t) in times.iter().enumerate() {
        if t * NS_TO_US < config.start_time_floor {
            continue;
        }

        if state.first_hit_time.is_none() {
            state.first_hit_time = Some(t);
        }

        let n_primary = count_in_window(times, i, config.primary_window);
        if n_primary < config.min_primary_count || n_primary > config.max_primary_count {
            continue;
        }

        // Local activity on the wider scale, centered on the primary
        // window of this hit. Tracked globally, independent of acceptance.
        let n_wide = count_centered(times, t + config.primary_window / 2.0, config.wide_window);
        if t * NS_TO_US > config.start_time_floor && n_wide > state.max_wide_count {
            state.max_wide_count = n_wide;
            state.max_wide_time = Some(t);
        }

        // A gap larger than the minimum separation closes the open group:
        // its pending peak is emitted (if it passes the wide-count and
        // floor checks) and the group count memory resets.
        if let Some(pending) = state.pending {
            if t - pending.time > config.min_peak_separation {
                if pending.wide_count < config.max_wide_count
                    && pending.time * NS_TO_US > config.start_time_floor
                {
                    triggers.push(Trigger {
                        index: pending.index,
                        primary_count: pending.primary_count,
                    });
                }
                state.pending = None;
            }
        }

        // Only a strictly larger primary count takes over the group, so
        // the first hit at the maximal count wins ties.
        let pending_count = state.pending.map_or(0, |p| p.primary_count);
        if n_primary <= pending_count {
            continue;
        }

        state.pending = Some(PendingPeak {
            index: i,
            time: t,
            primary_count: n_primary,
            wide_count: n_wide,
        });
    }

    // The last open group still qualifies if it met the minimum count.
    if let Some(pending) = state.pending {
        if pending.primary_count >= config.min_primary_count {
            triggers.push(Trigger {
                index: pending.index,
                primary_count: pending.primary_count,
            });
        }
    }

    debug!(
        num_triggers = triggers.len(),
        max_wide_count = state.max_wide_count,
        "candidate scan finished"
    );

    Ok(ScanOutput {
        triggers,
        first_hit_time: state.first_hit_time,
        max_wide_count: state.max_wide_count,
        max_wide_time: state.max_wide_time,
    })
}
