//! Unit tests for rd-schedule.

use rd_core::{Cycle, IncidentKind, SimRng};

use crate::{ArrivalDistribution, ArrivalQueue, ArrivalSchedule, ScheduledArrival};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn arrival(cycle: u64, kind: IncidentKind) -> ScheduledArrival {
    ScheduledArrival { cycle: Cycle(cycle), kind }
}

// ── ArrivalSchedule ───────────────────────────────────────────────────────────

#[cfg(test)]
mod schedule {
    use super::*;

    #[test]
    fn new_sorts_stably_by_cycle() {
        let schedule = ArrivalSchedule::new(vec![
            arrival(5, IncidentKind::Minor),
            arrival(1, IncidentKind::Severe),
            arrival(1, IncidentKind::Moderate),
        ]);
        let got: Vec<(u64, IncidentKind)> =
            schedule.arrivals().iter().map(|a| (a.cycle.0, a.kind)).collect();
        assert_eq!(
            got,
            vec![
                (1, IncidentKind::Severe),
                (1, IncidentKind::Moderate),
                (5, IncidentKind::Minor),
            ]
        );
        assert_eq!(schedule.last_cycle(), Some(Cycle(5)));
    }

    #[test]
    fn kind_counts() {
        let schedule = ArrivalSchedule::new(vec![
            arrival(0, IncidentKind::Minor),
            arrival(0, IncidentKind::Minor),
            arrival(2, IncidentKind::Critical),
        ]);
        assert_eq!(schedule.kind_counts(), [2, 0, 0, 0, 1]);
    }

    #[test]
    fn empty_schedule() {
        let schedule = ArrivalSchedule::empty();
        assert!(schedule.is_empty());
        assert!(schedule.last_cycle().is_none());
        assert!(schedule.into_queue().is_empty());
    }
}

// ── ArrivalQueue ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod queue {
    use super::*;

    #[test]
    fn drain_due_returns_only_due_arrivals() {
        let mut q = ArrivalQueue::new();
        q.push(Cycle(3), IncidentKind::Minor);
        q.push(Cycle(5), IncidentKind::Serious);
        assert!(q.drain_due(Cycle(2)).is_empty());
        assert_eq!(q.drain_due(Cycle(3)), vec![IncidentKind::Minor]);
        assert_eq!(q.len(), 1);
        assert_eq!(q.next_cycle(), Some(Cycle(5)));
    }

    #[test]
    fn late_arrivals_are_still_delivered_in_order() {
        let mut q = ArrivalQueue::new();
        q.push(Cycle(1), IncidentKind::Moderate);
        q.push(Cycle(2), IncidentKind::Severe);
        q.push(Cycle(2), IncidentKind::Minor);
        let due = q.drain_due(Cycle(10));
        assert_eq!(due, vec![IncidentKind::Moderate, IncidentKind::Severe, IncidentKind::Minor]);
        assert!(q.is_empty());
        assert!(q.next_cycle().is_none());
    }

    #[test]
    fn schedule_converts_to_queue() {
        let schedule = ArrivalSchedule::new(vec![
            arrival(0, IncidentKind::Minor),
            arrival(0, IncidentKind::Critical),
            arrival(7, IncidentKind::Serious),
        ]);
        let mut q = schedule.into_queue();
        assert_eq!(q.len(), 3);
        assert_eq!(q.drain_due(Cycle(0)), vec![IncidentKind::Minor, IncidentKind::Critical]);
    }
}

// ── Distributions ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod distribution {
    use super::*;
    use crate::KindSampler;
    use crate::ScheduleError;

    #[test]
    fn all_distributions_stay_in_range() {
        let mut rng = SimRng::new(11);
        for dist in ArrivalDistribution::ALL {
            let schedule = ArrivalSchedule::generate(dist, 500, 100, &mut rng).unwrap();
            assert_eq!(schedule.len(), 500);
            for a in schedule.arrivals() {
                assert!(a.cycle.0 < 100, "{dist}: {}", a.cycle);
            }
            let cycles: Vec<u64> = schedule.arrivals().iter().map(|a| a.cycle.0).collect();
            assert!(cycles.windows(2).all(|w| w[0] <= w[1]), "{dist} not sorted");
        }
    }

    #[test]
    fn single_cycle_run_puts_everything_at_zero() {
        let mut rng = SimRng::new(2);
        for dist in ArrivalDistribution::ALL {
            assert_eq!(dist.sample_cycle(&mut rng, 1).unwrap(), Cycle::ZERO);
        }
    }

    #[test]
    fn linear_and_exponential_skew_late() {
        let mut rng = SimRng::new(5);
        let late_share = |dist: ArrivalDistribution, rng: &mut SimRng| {
            let s = ArrivalSchedule::generate(dist, 2_000, 1_000, rng).unwrap();
            s.arrivals().iter().filter(|a| a.cycle.0 >= 500).count() as f64 / 2_000.0
        };
        // Triangular ramp: P(x ≥ half) = 0.75.  Reflected exponential: ≈ 1.
        assert!(late_share(ArrivalDistribution::Linear, &mut rng) > 0.65);
        assert!(late_share(ArrivalDistribution::Exponential, &mut rng) > 0.95);
    }

    #[test]
    fn exponential_scale_is_a_thirty_second_of_the_run() {
        // Within two scales of the end: 1 - e^-2 ≈ 0.86 of the mass.
        let mut rng = SimRng::new(21);
        let s = ArrivalSchedule::generate(ArrivalDistribution::Exponential, 4_000, 1_000, &mut rng).unwrap();
        let tail = s.arrivals().iter().filter(|a| a.cycle.0 >= 999 - 62).count() as f64 / 4_000.0;
        assert!((tail - 0.865).abs() < 0.03, "tail share {tail}");
    }

    #[test]
    fn normal_centres_on_midpoint() {
        let mut rng = SimRng::new(8);
        let s = ArrivalSchedule::generate(ArrivalDistribution::Normal, 4_000, 1_000, &mut rng).unwrap();
        let mean = s.arrivals().iter().map(|a| a.cycle.0 as f64).sum::<f64>() / 4_000.0;
        assert!((mean - 500.0).abs() < 30.0, "mean {mean}");
    }

    #[test]
    fn generation_is_deterministic() {
        let a = ArrivalSchedule::generate(ArrivalDistribution::Normal, 200, 300, &mut SimRng::new(77)).unwrap();
        let b = ArrivalSchedule::generate(ArrivalDistribution::Normal, 200, 300, &mut SimRng::new(77)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn kind_frequencies_follow_weights() {
        let mut rng = SimRng::new(13);
        let kinds = KindSampler::new().unwrap();
        let mut counts = [0usize; 5];
        for _ in 0..20_000 {
            counts[kinds.sample(&mut rng).index()] += 1;
        }
        for (count, w) in counts.iter().zip(IncidentKind::WEIGHTS) {
            let share = *count as f64 / 20_000.0;
            assert!((share - w).abs() < 0.02, "share {share} vs weight {w}");
        }
    }

    #[test]
    fn parse_names_case_insensitively() {
        assert_eq!("Uniform".parse::<ArrivalDistribution>().unwrap(), ArrivalDistribution::Uniform);
        assert_eq!("EXPONENTIAL".parse::<ArrivalDistribution>().unwrap(), ArrivalDistribution::Exponential);
        assert!(matches!(
            "poisson".parse::<ArrivalDistribution>(),
            Err(ScheduleError::UnknownDistribution(_))
        ));
        for dist in ArrivalDistribution::ALL {
            assert_eq!(dist.to_string().parse::<ArrivalDistribution>().unwrap(), dist);
        }
    }
}

// ── CSV loader ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod loader {
    use std::io::Cursor;

    use super::*;
    use crate::{load_schedule_reader, ScheduleError};

    #[test]
    fn loads_and_sorts_rows() {
        let csv = "cycle,kind\n4,5\n0,1\n0,3\n";
        let schedule = load_schedule_reader(Cursor::new(csv)).unwrap();
        assert_eq!(
            schedule.arrivals(),
            &[
                arrival(0, IncidentKind::Minor),
                arrival(0, IncidentKind::Serious),
                arrival(4, IncidentKind::Critical),
            ]
        );
    }

    #[test]
    fn kind_out_of_range_is_a_parse_error() {
        let csv = "cycle,kind\n0,1\n1,9\n";
        let err = load_schedule_reader(Cursor::new(csv)).unwrap_err();
        assert!(matches!(err, ScheduleError::Parse(msg) if msg.contains("row 2")));
    }

    #[test]
    fn malformed_row_is_a_parse_error() {
        let csv = "cycle,kind\nsoon,1\n";
        assert!(matches!(
            load_schedule_reader(Cursor::new(csv)),
            Err(ScheduleError::Parse(_))
        ));
    }
}
