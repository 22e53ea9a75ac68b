//! Unit tests for rd-core primitives.

#[cfg(test)]
mod ids {
    use crate::{AgentId, IncidentId, NodeId};

    #[test]
    fn index_roundtrip() {
        let id = AgentId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(AgentId::try_from(42usize).unwrap(), id);
    }

    #[test]
    fn ordering_breaks_ties_by_lowest_id() {
        let mut ids = vec![AgentId(3), AgentId(0), AgentId(2)];
        ids.sort();
        assert_eq!(ids, vec![AgentId(0), AgentId(2), AgentId(3)]);
        assert!(NodeId(100) > NodeId(99));
    }

    #[test]
    fn incident_ids_are_monotonic() {
        let a = IncidentId(0);
        assert_eq!(a.next(), IncidentId(1));
        assert!(a.next() > a);
    }

    #[test]
    fn invalid_sentinels_are_max() {
        assert_eq!(AgentId::INVALID.0, u32::MAX);
        assert_eq!(NodeId::default(), NodeId::INVALID);
    }

    #[test]
    fn display() {
        assert_eq!(NodeId(7).to_string(), "NodeId(7)");
    }
}

#[cfg(test)]
mod kind {
    use crate::{IncidentKind, RdError};

    #[test]
    fn type_numbers_roundtrip() {
        for (i, kind) in IncidentKind::ALL.iter().enumerate() {
            assert_eq!(kind.type_number(), i as u32 + 1);
            assert_eq!(IncidentKind::from_type(i as u32 + 1).unwrap(), *kind);
        }
    }

    #[test]
    fn out_of_range_type_is_rejected() {
        assert!(matches!(IncidentKind::from_type(0), Err(RdError::InvalidIncidentKind(0))));
        assert!(matches!(IncidentKind::from_type(6), Err(RdError::InvalidIncidentKind(6))));
    }

    #[test]
    fn need_ranges_grow_with_severity() {
        assert_eq!(IncidentKind::Minor.need_range(), 4..=8);
        assert_eq!(IncidentKind::Critical.need_range(), 100..=150);
        for pair in IncidentKind::ALL.windows(2) {
            assert!(pair[0].need_range().end() < pair[1].need_range().start());
        }
    }

    #[test]
    fn weights_sum_to_one() {
        let total: f64 = IncidentKind::WEIGHTS.iter().sum();
        assert!((total - 1.0).abs() < 1e-12);
    }

    #[test]
    fn success_requires_both_ceilings() {
        // type 1: 12 cycles to first response, 5 to resolve
        assert!(IncidentKind::Minor.is_success(12, 5));
        assert!(!IncidentKind::Minor.is_success(13, 5));
        assert!(!IncidentKind::Minor.is_success(12, 6));
        // type 5: 5 / 16
        assert!(IncidentKind::Critical.is_success(5, 16));
        assert!(!IncidentKind::Critical.is_success(6, 1));
    }
}

#[cfg(test)]
mod time {
    use crate::{Cycle, SimClock, SimConfig};

    #[test]
    fn cycle_arithmetic() {
        let c = Cycle(10);
        assert_eq!(c + 5, Cycle(15));
        assert_eq!(c.offset(3), Cycle(13));
        assert_eq!(Cycle(15) - Cycle(10), 5u64);
        assert_eq!(Cycle(15).since(Cycle(10)), 5);
    }

    #[test]
    fn clock_advances_one_cycle() {
        let mut clock = SimClock::new();
        assert_eq!(clock.current, Cycle::ZERO);
        clock.advance();
        clock.advance();
        assert_eq!(clock.current, Cycle(2));
        assert_eq!(clock.to_string(), "C2");
    }

    #[test]
    fn end_cycle_is_total_cycles() {
        let config = SimConfig { total_cycles: 100, ..SimConfig::default() };
        assert_eq!(config.end_cycle(), Cycle(100));
        assert!(config.drain_incidents);
    }
}

#[cfg(test)]
mod rng {
    use crate::{AgentId, AgentRng, SimRng};

    #[test]
    fn agent_rng_is_deterministic() {
        let mut a = AgentRng::new(42, AgentId(5));
        let mut b = AgentRng::new(42, AgentId(5));
        for _ in 0..100 {
            assert_eq!(a.gen_range(0..1_000u32), b.gen_range(0..1_000u32));
        }
    }

    #[test]
    fn different_agents_get_different_streams() {
        let mut a = AgentRng::new(42, AgentId(0));
        let mut b = AgentRng::new(42, AgentId(1));
        let xs: Vec<u32> = (0..16).map(|_| a.gen_range(0..u32::MAX)).collect();
        let ys: Vec<u32> = (0..16).map(|_| b.gen_range(0..u32::MAX)).collect();
        assert_ne!(xs, ys);
    }

    #[test]
    fn children_are_reproducible() {
        let mut root_a = SimRng::new(7);
        let mut root_b = SimRng::new(7);
        let mut ca = root_a.child(1);
        let mut cb = root_b.child(1);
        assert_eq!(ca.random::<u64>(), cb.random::<u64>());
    }

    #[test]
    fn choose_on_empty_slice_is_none() {
        let mut rng = AgentRng::new(1, AgentId(0));
        let empty: [u8; 0] = [];
        assert!(rng.choose(&empty).is_none());
    }
}
