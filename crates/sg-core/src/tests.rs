//! Unit tests for sg-core primitives.

#[cfg(test)]
mod ids {
    use crate::{JunctionId, NodeId, RoadId};

    #[test]
    fn index_roundtrip() {
        let id = NodeId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(NodeId::try_from(42usize).unwrap(), id);
    }

    #[test]
    fn ordering() {
        assert!(NodeId(0) < NodeId(1));
        assert!(RoadId(100) > RoadId(99));
    }

    #[test]
    fn display() {
        assert_eq!(NodeId(7).to_string(), "NodeId(7)");
        assert_eq!(JunctionId(3).to_string(), "JunctionId(3)");
    }
}

#[cfg(test)]
mod geo {
    use crate::Point;
    use crate::geo::{angle_between, line_distance, signed_angle};

    #[test]
    fn distance_345() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert!((a.distance(b) - 5.0).abs() < 1e-12);
        assert_eq!(a.distance(a), 0.0);
    }

    #[test]
    fn right_angle() {
        let v = Point::ORIGIN;
        let a = Point::new(10.0, 0.0);
        let b = Point::new(0.0, 10.0);
        assert!((angle_between(a, v, b) - 90.0).abs() < 1e-9);
        assert!((angle_between(b, v, a) - 90.0).abs() < 1e-9);
    }

    #[test]
    fn straight_and_degenerate_angles() {
        let v = Point::ORIGIN;
        assert!((angle_between(Point::new(1.0, 0.0), v, Point::new(-1.0, 0.0)) - 180.0).abs() < 1e-9);
        assert_eq!(angle_between(v, v, Point::new(1.0, 0.0)), 0.0);
    }

    #[test]
    fn signed_angle_does_not_wrap() {
        // Bearings of 179° and −179° are only 2° apart.
        let u = (179f64.to_radians().cos(), 179f64.to_radians().sin());
        let v = ((-179f64).to_radians().cos(), (-179f64).to_radians().sin());
        let a = signed_angle(u, v).to_degrees();
        assert!((a - 2.0).abs() < 1e-9, "got {a}");
    }

    #[test]
    fn signed_angle_sign_follows_turn() {
        let east = (1.0, 0.0);
        assert!(signed_angle(east, (1.0, 1.0)) > 0.0);
        assert!(signed_angle(east, (1.0, -1.0)) < 0.0);
        assert_eq!(signed_angle(east, (2.0, 0.0)), 0.0);
    }

    #[test]
    fn segment_distance() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(10.0, 0.0);
        assert!((line_distance(Point::new(5.0, 3.0), a, b) - 3.0).abs() < 1e-12);
        // Beyond the end: distance to the endpoint.
        assert!((line_distance(Point::new(13.0, 4.0), a, b) - 5.0).abs() < 1e-12);
        // Degenerate segment.
        assert!((line_distance(Point::new(3.0, 4.0), a, a) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn wire_rounding() {
        let p = Point::new(10.4, -2.6);
        assert_eq!(p.to_wire(), (10, -3));
        assert_eq!(Point::from_wire(10, -3), Point::new(10.0, -3.0));
    }

    #[test]
    fn offset_along_heading() {
        let p = Point::ORIGIN.offset(std::f64::consts::FRAC_PI_2, 5.0);
        assert!(p.x.abs() < 1e-12);
        assert!((p.y - 5.0).abs() < 1e-12);
    }
}

#[cfg(test)]
mod time {
    use crate::{SimClock, SimConfig, SimTime};

    #[test]
    fn conversions() {
        assert_eq!(SimTime::from_secs_f64(1.5), SimTime(1_500_000));
        assert_eq!(SimTime::from_millis(3), SimTime(3_000));
        assert_eq!(SimTime::from_secs_f64(-1.0), SimTime::ZERO);
        assert!((SimTime(2_500_000).as_secs_f64() - 2.5).abs() < 1e-12);
    }

    #[test]
    fn arithmetic() {
        let t = SimTime(10);
        assert_eq!(t + 5, SimTime(15));
        assert_eq!(SimTime(15) - SimTime(10), 5u64);
        assert_eq!(SimTime(1_000_000).secs_since(SimTime(3_000_000)), 0.0);
        assert!((SimTime(3_000_000).secs_since(SimTime(1_000_000)) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn clock_never_rewinds() {
        let mut clock = SimClock::new();
        clock.advance_to(SimTime(100));
        clock.advance_to(SimTime(50));
        assert_eq!(clock.now(), SimTime(100));
    }

    #[test]
    fn sim_config_times() {
        let cfg = SimConfig { seed: 42, duration_secs: 30.0, flow_start_secs: 5.0 };
        assert_eq!(cfg.end_time(), SimTime(30_000_000));
        assert_eq!(cfg.flow_start(), SimTime(5_000_000));
    }
}

#[cfg(test)]
mod rng {
    use crate::{NodeId, NodeRng, NodeRngs, SimRng};

    #[test]
    fn deterministic_same_seed() {
        let mut r1 = NodeRng::new(12345, NodeId(0));
        let mut r2 = NodeRng::new(12345, NodeId(0));
        for _ in 0..100 {
            assert_eq!(r1.jitter_us(100, 500), r2.jitter_us(100, 500));
        }
    }

    #[test]
    fn different_nodes_differ() {
        let mut r0 = NodeRng::new(1, NodeId(0));
        let mut r1 = NodeRng::new(1, NodeId(1));
        let a: Vec<u64> = (0..8).map(|_| r0.gen_range(0..u64::MAX)).collect();
        let b: Vec<u64> = (0..8).map(|_| r1.gen_range(0..u64::MAX)).collect();
        assert_ne!(a, b, "seeds for adjacent nodes should diverge");
    }

    #[test]
    fn jitter_in_bounds() {
        let mut rng = NodeRng::new(0, NodeId(0));
        for _ in 0..1000 {
            let j = rng.jitter_us(100, 500);
            assert!((100..=500).contains(&j));
        }
        assert_eq!(rng.jitter_us(7, 7), 7);
        assert_eq!(rng.jitter_us(9, 3), 9);
    }

    #[test]
    fn node_rngs_len() {
        let rngs = NodeRngs::new(4, 9);
        assert_eq!(rngs.len(), 4);
        assert!(!rngs.is_empty());
    }

    #[test]
    fn sim_rng_gen_bool_extremes() {
        let mut rng = SimRng::new(3);
        assert!(rng.gen_bool(1.0));
        assert!(!rng.gen_bool(0.0));
        assert!(rng.gen_bool(7.0), "probabilities clamp to 1");
    }
}
