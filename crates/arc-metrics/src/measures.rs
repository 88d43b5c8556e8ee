//! Individual metrics over trace columns.
//!
//! Every function is pure and total: short or empty inputs produce the
//! documented fallback value instead of an error.

use arc_types::ControlAction;

use crate::params::MetricsParams;

/// Pre-collapse floor: a baseline below this is treated as unrecoverable.
const COLLAPSED_BASELINE: f64 = 0.20;

/// Minimum step-over-step gain that counts as performance improving.
const IMPROVEMENT_EPS: f64 = 0.01;

/// End of phase 1 and start of phase 2 in the continual-learning layout.
const PHASE2_START: usize = 50;
/// Start of phase 3.
const PHASE3_START: usize = 100;
/// Warm-up steps skipped at the start of phase 1.
const WARMUP: usize = 10;
/// Maximum phase-3 window.
const PHASE3_LEN: usize = 50;
/// Minimum phase-2 samples for a meaningful adaptation speed.
const ADAPT_MIN: usize = 20;

/// Sub-slice `[start, end)` clamped to the slice bounds.
fn window(xs: &[f64], start: usize, end: usize) -> &[f64] {
    let end = end.min(xs.len());
    xs.get(start.min(end)..end).unwrap_or(&[])
}

/// Arithmetic mean, `0.0` for an empty slice.
#[allow(clippy::cast_precision_loss)]
pub fn mean(xs: &[f64]) -> f64 {
    if xs.is_empty() {
        return 0.0;
    }
    xs.iter().sum::<f64>() / xs.len() as f64
}

/// Population variance, `0.0` for an empty slice.
#[allow(clippy::cast_precision_loss)]
pub fn variance(xs: &[f64]) -> f64 {
    if xs.is_empty() {
        return 0.0;
    }
    let m = mean(xs);
    xs.iter().map(|x| (x - m).powi(2)).sum::<f64>() / xs.len() as f64
}

/// Population standard deviation, `0.0` for an empty slice.
pub fn std_dev(xs: &[f64]) -> f64 {
    variance(xs).sqrt()
}

/// Steps after `onset` until performance returns to its pre-onset level
/// with arousal back under control.
///
/// The baseline is the mean performance over the `baseline_window` steps
/// before the onset (zero when that window is empty). A baseline below
/// `0.20` means the agent had already collapsed, and `rt_max` is returned.
/// Otherwise the first step at or after the onset whose performance lies in
/// `baseline +/- rt_eps` (clipped to `[0, 1]`) and whose arousal is at most
/// `a_safe + rt_a_eps` gives the recovery time; if none does, `rt_max`.
pub fn recovery_time(perf: &[f64], arousal: &[f64], onset: usize, params: &MetricsParams) -> usize {
    let pre = window(perf, onset.saturating_sub(params.baseline_window), onset);
    let baseline = mean(pre);
    if baseline < COLLAPSED_BASELINE {
        return params.rt_max;
    }
    let low = (baseline - params.rt_eps).max(0.0);
    let high = (baseline + params.rt_eps).min(1.0);
    let a_limit = params.a_safe + params.rt_a_eps;

    perf.iter()
        .zip(arousal)
        .enumerate()
        .skip(onset)
        .find(|(_, (p, a))| (low..=high).contains(*p) && **a <= a_limit)
        .map_or(params.rt_max, |(t, _)| t.saturating_sub(onset))
}

/// Recovery time as a fraction of `rt_max`, capped at `1.0`.
#[allow(clippy::cast_precision_loss)]
pub fn rt_normalized(rt: usize, rt_max: usize) -> f64 {
    if rt_max == 0 {
        return 1.0;
    }
    (rt as f64 / rt_max as f64).min(1.0)
}

/// Peak arousal above `a_safe`, floored at zero.
pub fn overshoot(arousal: &[f64], a_safe: f64) -> f64 {
    let peak = arousal.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    (peak - a_safe).max(0.0)
}

/// Fraction of steps with narrative above `tau`, plus `weight` times the
/// mean length of the above-threshold runs divided by the trace length.
#[allow(clippy::cast_precision_loss)]
pub fn rumination_index(narrative: &[f64], tau: f64, weight: f64) -> f64 {
    if narrative.is_empty() {
        return 0.0;
    }
    let mut runs: Vec<usize> = Vec::new();
    let mut current = 0usize;
    let mut above = 0usize;
    for &s in narrative {
        if s > tau {
            above = above.saturating_add(1);
            current = current.saturating_add(1);
        } else if current > 0 {
            runs.push(current);
            current = 0;
        }
    }
    if current > 0 {
        runs.push(current);
    }

    let n = narrative.len() as f64;
    let fraction = above as f64 / n;
    let persistence = if runs.is_empty() {
        0.0
    } else {
        (runs.iter().sum::<usize>() as f64 / runs.len() as f64) / n
    };
    fraction + weight * persistence
}

/// Share of post-onset steps where the narrative is above `s_safe` while
/// performance is not improving.
///
/// Counted over steps `i >= 1` of the post-onset window, divided by the
/// window length minus one. Zero when fewer than two post-onset samples.
#[allow(clippy::cast_precision_loss)]
pub fn narrative_dominance_ratio(
    narrative: &[f64],
    perf: &[f64],
    onset: usize,
    s_safe: f64,
) -> f64 {
    let post_s = window(narrative, onset, narrative.len());
    let post_p = window(perf, onset, perf.len());
    let len = post_s.len().min(post_p.len());
    if len < 2 {
        return 0.0;
    }
    let dominated = post_s
        .iter()
        .skip(1)
        .zip(post_p.windows(2))
        .filter(|(s, pair)| {
            let improving = match pair {
                [prev, cur] => *cur > *prev + IMPROVEMENT_EPS,
                _ => false,
            };
            **s > s_safe && !improving
        })
        .count();
    dominated as f64 / len.saturating_sub(1) as f64
}

/// Population standard deviation of post-onset performance; zero when
/// fewer than two post-onset samples.
pub fn stability_post(perf: &[f64], onset: usize) -> f64 {
    let post = window(perf, onset, perf.len());
    if post.len() < 2 {
        return 0.0;
    }
    std_dev(post)
}

/// Mean intervention magnitude per step.
#[allow(clippy::cast_precision_loss)]
pub fn control_effort(control: &[ControlAction]) -> f64 {
    if control.is_empty() {
        return 0.0;
    }
    control.iter().map(ControlAction::effort).sum::<f64>() / control.len() as f64
}

/// Phase-3 performance relative to phase 1, capped at `1.0`.
///
/// Phase 3 always averages over its full 50-step window; steps missing from
/// a shorter run count as zero. Zero for runs shorter than 110 steps or when
/// phase-1 performance is below `0.1`.
#[allow(clippy::cast_precision_loss)]
pub fn retention(perf: &[f64]) -> f64 {
    if perf.len() < PHASE3_START.saturating_add(WARMUP) {
        return 0.0;
    }
    let phase1 = mean(window(perf, WARMUP, PHASE2_START));
    let phase3 = window(perf, PHASE3_START, PHASE3_START.saturating_add(PHASE3_LEN))
        .iter()
        .sum::<f64>()
        / PHASE3_LEN as f64;
    if phase1 < 0.1 {
        return 0.0;
    }
    (phase3 / phase1).min(1.0)
}

/// Steps into phase 2 until performance reaches 80% of its phase-2 peak.
///
/// The peak is taken over the first 50 phase-2 samples. A phase 2 shorter
/// than 20 samples reports its own length; so does one that never reaches
/// the target.
#[allow(clippy::cast_precision_loss)]
pub fn adaptation_speed(perf: &[f64]) -> f64 {
    let phase2 = window(perf, PHASE2_START, perf.len());
    if phase2.len() < ADAPT_MIN {
        return phase2.len() as f64;
    }
    let peak = window(phase2, 0, PHASE3_LEN)
        .iter()
        .copied()
        .fold(f64::NEG_INFINITY, f64::max);
    let target = 0.8 * peak;
    let reached = phase2.iter().position(|p| *p >= target).unwrap_or(phase2.len());
    reached as f64
}

/// `1 - 10 * var(mf)`, floored at zero; `1.0` for fewer than two samples.
pub fn memory_stability(fast_memory: &[f64]) -> f64 {
    if fast_memory.len() < 2 {
        return 1.0;
    }
    10.0f64.mul_add(-variance(fast_memory), 1.0).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::tests::test_params;

    #[test]
    fn single_run_rumination_counts_twice() {
        // One contiguous run of L = 5 above threshold in N = 20 steps.
        let mut s = vec![0.2; 20];
        for x in s.iter_mut().skip(8).take(5) {
            *x = 0.9;
        }
        let ri = rumination_index(&s, 0.6, 1.0);
        assert!((ri - (5.0 / 20.0 + 5.0 / 20.0)).abs() < 1e-12);
    }

    #[test]
    fn rumination_persistence_uses_mean_run_length() {
        // Runs of 2 and 4 in 10 steps: fraction 0.6, persistence 3/10.
        let s = [0.9, 0.9, 0.1, 0.9, 0.9, 0.9, 0.9, 0.1, 0.1, 0.1];
        let ri = rumination_index(&s, 0.6, 0.5);
        assert!((ri - (0.6 + 0.5 * 0.3)).abs() < 1e-12);
    }

    #[test]
    fn collapsed_baseline_returns_rt_max() {
        let p = test_params();
        let perf = vec![0.1; 100];
        let arousal = vec![0.3; 100];
        assert_eq!(recovery_time(&perf, &arousal, 50, &p), p.rt_max);
    }

    #[test]
    fn empty_baseline_window_returns_rt_max() {
        let p = test_params();
        let perf = vec![0.9; 100];
        let arousal = vec![0.3; 100];
        assert_eq!(recovery_time(&perf, &arousal, 0, &p), p.rt_max);
    }

    #[test]
    fn recovery_waits_for_performance_and_arousal() {
        let p = test_params();
        let mut perf = vec![0.8; 100];
        let mut arousal = vec![0.3; 100];
        for x in perf.iter_mut().skip(50).take(10) {
            *x = 0.5;
        }
        // Performance back at t = 60, arousal only at t = 63.
        for a in arousal.iter_mut().skip(50).take(13) {
            *a = 0.7;
        }
        assert_eq!(recovery_time(&perf, &arousal, 50, &p), 13);
        assert!((rt_normalized(13, p.rt_max) - 0.13).abs() < 1e-12);
    }

    #[test]
    fn never_recovering_hits_cap() {
        let p = test_params();
        let mut perf = vec![0.8; 80];
        for x in perf.iter_mut().skip(50) {
            *x = 0.3;
        }
        let arousal = vec![0.3; 80];
        assert_eq!(recovery_time(&perf, &arousal, 50, &p), 100);
        assert!((rt_normalized(250, 100) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn ndr_counts_stalled_high_narrative() {
        let s = [0.1, 0.9, 0.9, 0.9, 0.2];
        let perf = [0.5, 0.5, 0.7, 0.7, 0.7];
        // Post-onset from 0: i=1 stalled+high, i=2 improving, i=3 stalled+high, i=4 low.
        assert!((narrative_dominance_ratio(&s, &perf, 0, 0.55) - 0.5).abs() < 1e-12);
        assert!(narrative_dominance_ratio(&s, &perf, 4, 0.55).abs() < f64::EPSILON);
        assert!(narrative_dominance_ratio(&s, &perf, 10, 0.55).abs() < f64::EPSILON);
    }

    #[test]
    fn overshoot_is_peak_excess() {
        assert!((overshoot(&[0.2, 0.75, 0.5], 0.6) - 0.15).abs() < 1e-12);
        assert!(overshoot(&[0.2, 0.5], 0.6).abs() < f64::EPSILON);
    }

    #[test]
    fn effort_averages_action_magnitude() {
        let busy = ControlAction {
            u_dmg: 0.5,
            u_mem: 0.5,
            ..ControlAction::NEUTRAL
        };
        let effort = control_effort(&[ControlAction::NEUTRAL, busy]);
        assert!((effort - 0.5).abs() < 1e-12);
        assert!(control_effort(&[]).abs() < f64::EPSILON);
    }

    #[test]
    fn retention_needs_long_runs() {
        assert!(retention(&[0.8; 109]).abs() < f64::EPSILON);
        assert!((retention(&[0.8; 150]) - 1.0).abs() < 1e-12);
        let mut perf = vec![0.8; 160];
        for x in perf.iter_mut().skip(100) {
            *x = 0.4;
        }
        assert!((retention(&perf) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn short_phase_three_counts_missing_steps_as_zero() {
        // 20 of 50 phase-3 steps present: 0.8 * 20 / 50 over 0.8.
        assert!((retention(&[0.8; 120]) - 0.4).abs() < 1e-12);
        assert!((retention(&[0.8; 110]) - 0.2).abs() < 1e-12);
    }

    #[test]
    fn adaptation_speed_finds_first_target_hit() {
        let mut perf = vec![0.9; 50];
        perf.extend((0..60).map(|i| if i < 7 { 0.2 } else { 0.6 }));
        assert!((adaptation_speed(&perf) - 7.0).abs() < f64::EPSILON);
        assert!(adaptation_speed(&[0.5; 80]).abs() < f64::EPSILON);
        assert!((adaptation_speed(&[0.5; 55]) - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn memory_stability_penalizes_variance() {
        assert!((memory_stability(&[0.3]) - 1.0).abs() < f64::EPSILON);
        assert!((memory_stability(&[0.2, 0.2, 0.2]) - 1.0).abs() < 1e-12);
        // Variance 0.04 -> 1 - 0.4.
        assert!((memory_stability(&[0.1, 0.5]) - 0.6).abs() < 1e-12);
        assert!(memory_stability(&[0.0, 1.0]).abs() < f64::EPSILON);
    }

    #[test]
    fn post_onset_stability_is_population_std() {
        assert!(stability_post(&[0.5, 0.2], 1).abs() < f64::EPSILON);
        assert!((stability_post(&[0.0, 0.2, 0.6], 1) - 0.2).abs() < 1e-12);
    }
}
