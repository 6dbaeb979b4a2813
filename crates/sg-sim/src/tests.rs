//! Unit and scenario tests for sg-sim.
//!
//! Scenarios place stationary vehicles along one straight road with a
//! loss-free channel, so the only randomness left is protocol jitter.

#[cfg(test)]
mod helpers {
    use std::io::Cursor;

    use sg_core::{NodeId, Point, SimConfig, SimTime};
    use sg_mobility::{Kinematics, MobilityStore};
    use sg_routing::{NodeBehavior, RecoveryMode, SigoConfig};
    use sg_schedule::Flow;
    use sg_topology::{RoadTopology, load_topology_reader};

    use crate::{ChannelConfig, Sim, SimBuilder};

    pub fn road() -> RoadTopology {
        let src = "junction A -100 0\njunction B 1000 0\nroad AB A_B\n";
        load_topology_reader(Cursor::new(src), 20.0).expect("road parses")
    }

    pub fn line(xs: &[f64]) -> MobilityStore {
        let points: Vec<(f64, f64)> = xs.iter().map(|&x| (x, 0.0)).collect();
        parked(&points)
    }

    pub fn parked(points: &[(f64, f64)]) -> MobilityStore {
        MobilityStore::from_states(
            points
                .iter()
                .map(|&(x, y)| Kinematics::stationary(Point::new(x, y), SimTime::ZERO))
                .collect(),
        )
    }

    pub fn config() -> SimConfig {
        SimConfig { seed: 7, duration_secs: 8.0, flow_start_secs: 5.0 }
    }

    pub fn lossless() -> ChannelConfig {
        ChannelConfig { range: 250.0, reliable_fraction: 1.0, tx_delay_us: 200 }
    }

    pub fn flow(src: u32, dst: u32, offset_secs: f64) -> Flow {
        Flow::new(NodeId(src), NodeId(dst), SimTime::from_secs_f64(offset_secs))
    }

    pub fn line_sim(xs: &[f64], flows: Vec<Flow>, mode: RecoveryMode, behaviors: Option<Vec<NodeBehavior>>) -> Sim {
        parked_sim(line(xs), flows, mode, behaviors)
    }

    pub fn parked_sim(
        mobility:  MobilityStore,
        flows:     Vec<Flow>,
        mode:      RecoveryMode,
        behaviors: Option<Vec<NodeBehavior>>,
    ) -> Sim {
        let protocol = SigoConfig { recovery_mode: mode, ..SigoConfig::default() };
        let mut b = SimBuilder::new(config(), road(), mobility)
            .protocol(protocol)
            .channel(lossless())
            .flows(flows);
        if let Some(v) = behaviors {
            b = b.behaviors(v);
        }
        b.build().expect("scenario builds")
    }
}

// ── Channel ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod channel {
    use sg_core::SimRng;

    use crate::ChannelConfig;

    fn cfg() -> ChannelConfig {
        ChannelConfig { range: 200.0, reliable_fraction: 0.5, tx_delay_us: 0 }
    }

    #[test]
    fn probability_profile() {
        let c = cfg();
        assert_eq!(c.delivery_probability(0.0), 1.0);
        assert_eq!(c.delivery_probability(100.0), 1.0);
        assert!((c.delivery_probability(150.0) - 0.5).abs() < 1e-12);
        assert_eq!(c.delivery_probability(200.0), 0.0);
        assert_eq!(c.delivery_probability(200.1), 0.0);
    }

    #[test]
    fn draws_are_certain_at_the_extremes() {
        let c = cfg();
        let mut rng = SimRng::new(3);
        assert!((0..100).all(|_| c.draw(50.0, &mut rng)));
        assert!((0..100).all(|_| !c.draw(250.0, &mut rng)));
    }

    #[test]
    fn draws_in_the_fade_zone_are_mixed() {
        let c = cfg();
        let mut rng = SimRng::new(3);
        let heard = (0..1000).filter(|_| c.draw(150.0, &mut rng)).count();
        assert!((350..650).contains(&heard), "heard {heard}/1000");
    }

    #[test]
    fn validation() {
        assert!(ChannelConfig::default().validate().is_ok());
        assert!(ChannelConfig { range: 0.0, ..cfg() }.validate().is_err());
        assert!(ChannelConfig { reliable_fraction: 1.5, ..cfg() }.validate().is_err());
    }
}

// ── SimulationContext ─────────────────────────────────────────────────────────

#[cfg(test)]
mod context {
    use sg_core::{NodeId, Point, SimTime};
    use sg_routing::{DropReason, PacketKind, ReceiveRecord};

    use crate::SimulationContext;

    use super::helpers::flow;

    fn arrival(receiver: u32, secs: f64, hops: u32) -> ReceiveRecord {
        ReceiveRecord {
            time: SimTime::from_secs_f64(secs),
            receiver: NodeId(receiver),
            position: Point::ORIGIN,
            sender: NodeId(1),
            sender_pos: Point::ORIGIN,
            hop_count: hops,
            kind: PacketKind::Send,
        }
    }

    #[test]
    fn one_receive_per_epoch() {
        let mut ctx = SimulationContext::new(4);
        ctx.begin_epoch(&flow(0, 3, 0.0), SimTime::from_secs_f64(1.0));

        assert!(ctx.accept_arrival(&arrival(3, 1.5, 2)));
        assert!(!ctx.accept_arrival(&arrival(3, 1.6, 3)));
        assert_eq!(ctx.log.receives.len(), 1);
        assert_eq!(ctx.duplicate_arrivals, 1);
        assert_eq!(ctx.finish_time(NodeId(3)), Some(SimTime::from_secs_f64(1.5)));
        assert_eq!(ctx.flows[0].hop_count, Some(2));
        assert!((ctx.flows[0].delay_secs().unwrap() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn new_epoch_resets_guard() {
        let mut ctx = SimulationContext::new(4);
        ctx.begin_epoch(&flow(0, 3, 0.0), SimTime::from_secs_f64(1.0));
        assert!(ctx.accept_arrival(&arrival(3, 1.5, 2)));

        ctx.begin_epoch(&flow(1, 3, 0.0), SimTime::from_secs_f64(2.0));
        assert_eq!(ctx.start_time(NodeId(3)), Some(SimTime::from_secs_f64(2.0)));
        assert_eq!(ctx.finish_time(NodeId(3)), None);
        assert!(ctx.accept_arrival(&arrival(3, 2.5, 1)));
        assert_eq!(ctx.log.receives.len(), 2);
        assert_eq!(ctx.delivered_count(), 2);
    }

    #[test]
    fn arrival_without_epoch_is_ignored() {
        let mut ctx = SimulationContext::new(4);
        assert!(!ctx.accept_arrival(&arrival(2, 1.0, 1)));
        assert!(ctx.log.receives.is_empty());
        assert_eq!(ctx.start_time(NodeId(2)), None);
    }

    #[test]
    fn drop_counters() {
        let mut ctx = SimulationContext::new(1);
        ctx.record_drop(DropReason::MaxHop);
        ctx.record_drop(DropReason::MaxHop);
        assert_eq!(ctx.drop_count(DropReason::MaxHop), 2);
        assert_eq!(ctx.drop_count(DropReason::BlackHole), 0);
    }
}

// ── Builder ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod builder {
    use sg_core::{NodeId, SimConfig};
    use sg_mobility::MobilityStore;
    use sg_routing::{NodeBehavior, SigoConfig};

    use crate::{SimBuilder, SimError};

    use super::helpers::{config, flow, line, road};

    #[test]
    fn builds_with_defaults() {
        let sim = SimBuilder::new(config(), road(), line(&[0.0, 100.0])).build().unwrap();
        assert_eq!(sim.node_count(), 2);
        assert!(sim.queue.is_empty());
        assert_eq!(sim.context.node_count, 2);
    }

    #[test]
    fn flows_are_offset_by_flow_start() {
        let sim = SimBuilder::new(config(), road(), line(&[0.0, 100.0]))
            .flows(vec![flow(0, 1, 0.5)])
            .build()
            .unwrap();
        assert_eq!(sim.queue.next_time(), Some(config().flow_start() + 500_000));
    }

    #[test]
    fn rejects_empty_fleet() {
        let err = SimBuilder::new(config(), road(), MobilityStore::new(0)).build().unwrap_err();
        assert!(matches!(err, SimError::Config(_)));
    }

    #[test]
    fn rejects_behavior_length_mismatch() {
        let err = SimBuilder::new(config(), road(), line(&[0.0, 100.0]))
            .behaviors(vec![NodeBehavior::Normal])
            .build()
            .unwrap_err();
        assert!(matches!(err, SimError::NodeCountMismatch { expected: 2, got: 1, .. }));
    }

    #[test]
    fn rejects_flow_to_missing_node() {
        let err = SimBuilder::new(config(), road(), line(&[0.0, 100.0]))
            .flows(vec![flow(0, 9, 0.0)])
            .build()
            .unwrap_err();
        assert!(matches!(err, SimError::UnknownNode(NodeId(9))));
    }

    #[test]
    fn rejects_invalid_protocol_config() {
        let err = SimBuilder::new(config(), road(), line(&[0.0]))
            .protocol(SigoConfig { max_range: -1.0, ..SigoConfig::default() })
            .build()
            .unwrap_err();
        assert!(matches!(err, SimError::Routing(_)));
    }

    #[test]
    fn rejects_non_positive_duration() {
        let cfg = SimConfig { duration_secs: 0.0, ..config() };
        let err = SimBuilder::new(cfg, road(), line(&[0.0])).build().unwrap_err();
        assert!(matches!(err, SimError::Config(_)));
    }
}

// ── Scenarios ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod scenario {
    use sg_core::{NodeId, SimTime};
    use sg_routing::{DropReason, NodeBehavior, PacketKind, RecoveryMode, SendRecord};

    use crate::{NoopObserver, SimObserver, SimulationContext};

    use super::helpers::{flow, line_sim, parked, parked_sim};

    #[derive(Default)]
    struct Recorder {
        sends:    Vec<SendRecord>,
        receives: usize,
        drops:    Vec<DropReason>,
        ended:    Option<SimTime>,
    }

    impl SimObserver for Recorder {
        fn on_send(&mut self, record: &SendRecord) {
            self.sends.push(*record);
        }
        fn on_receive(&mut self, _record: &sg_routing::ReceiveRecord) {
            self.receives += 1;
        }
        fn on_drop(&mut self, _at: SimTime, _node: NodeId, _dest: NodeId, _hop: u32, reason: DropReason) {
            self.drops.push(reason);
        }
        fn on_sim_end(&mut self, end: SimTime, _context: &SimulationContext) {
            self.ended = Some(end);
        }
    }

    #[test]
    fn beacons_fill_neighbor_tables() {
        let mut sim = line_sim(&[0.0, 200.0, 400.0], vec![], RecoveryMode::Sigo, None);
        sim.run_until(SimTime::from_secs_f64(3.0), &mut NoopObserver).unwrap();
        assert!(sim.nodes[0].neighbors().contains(NodeId(1)));
        assert!(!sim.nodes[0].neighbors().contains(NodeId(2)));
        assert!(sim.nodes[1].neighbors().contains(NodeId(0)));
        assert!(sim.nodes[1].neighbors().contains(NodeId(2)));
        assert!(sim.context.hello_broadcasts >= 6);
        assert_eq!(sim.context.data_broadcasts, 0);
    }

    #[test]
    fn greedy_two_hop_delivery() {
        let mut sim = line_sim(&[0.0, 200.0, 400.0], vec![flow(0, 2, 0.0)], RecoveryMode::Sigo, None);
        let mut obs = Recorder::default();
        sim.run(&mut obs).unwrap();

        let outcome = sim.context.flows[0];
        assert!(outcome.delivered());
        assert_eq!(outcome.hop_count, Some(2));
        assert!(outcome.delay_secs().unwrap() < 0.01);

        assert_eq!(sim.context.log.receives.len(), 1);
        assert_eq!(sim.context.log.receives[0].sender, NodeId(1));
        assert_eq!(obs.receives, 1);
        assert_eq!(obs.ended, Some(SimTime::from_secs_f64(8.0)));

        // Source addresses node 1, node 1 addresses the destination.
        assert_eq!(obs.sends.len(), 2);
        assert_eq!(obs.sends[0].sender, NodeId(0));
        assert_eq!(obs.sends[0].candidates.first().map(|c| c.id), Some(NodeId(1)));
        assert_eq!(obs.sends[1].sender, NodeId(1));
        assert_eq!(obs.sends[1].hop_count, 2);
        assert!(obs.sends.iter().all(|s| s.kind == PacketKind::Send));
        assert!(obs.drops.is_empty());
    }

    #[test]
    fn destination_receives_once_per_epoch() {
        let flows = vec![flow(0, 2, 0.0), flow(0, 2, 1.0)];
        let mut sim = line_sim(&[0.0, 200.0, 400.0], flows, RecoveryMode::Sigo, None);
        sim.run(&mut NoopObserver).unwrap();

        assert_eq!(sim.context.flows.len(), 2);
        assert_eq!(sim.context.delivered_count(), 2);
        assert_eq!(sim.context.log.receives.len(), 2);
        assert!(sim.context.log.receives[0].time < sim.context.log.receives[1].time);
    }

    #[test]
    fn local_optimum_without_recovery_drops() {
        // Node 1 sits behind the source; the destination is out of range.
        let mut sim = line_sim(&[0.0, -200.0, 600.0], vec![flow(0, 2, 0.0)], RecoveryMode::None, None);
        let mut obs = Recorder::default();
        sim.run(&mut obs).unwrap();

        assert!(sim.context.log.receives.is_empty());
        assert!(!sim.context.flows[0].delivered());
        assert_eq!(sim.context.drop_count(DropReason::LocalOptimum), 1);
        assert_eq!(obs.drops, vec![DropReason::LocalOptimum]);
        assert_eq!(obs.sends.len(), 1);
        assert!(obs.sends[0].candidates.is_empty());
    }

    /// The source's only neighbor lies behind it.  Recovery walks 0 → 1 → 2,
    /// node 3 is closer to the destination than the source was and resumes
    /// greedy forwarding through 4 and 5.  Each vehicle hears only its chain
    /// neighbors.
    #[test]
    fn recovery_detours_around_dead_end() {
        let chain = parked(&[
            (0.0, 0.0),
            (-100.0, 150.0),
            (0.0, 350.0),
            (200.0, 400.0),
            (380.0, 250.0),
            (550.0, 150.0),
            (600.0, 0.0),
        ]);
        let mut sim = parked_sim(chain, vec![flow(0, 6, 0.0)], RecoveryMode::Sigo, None);
        let mut obs = Recorder::default();
        sim.run(&mut obs).unwrap();

        let outcome = sim.context.flows[0];
        assert!(outcome.delivered(), "drops: {:?}", obs.drops);
        assert_eq!(outcome.hop_count, Some(6));
        assert!(obs.drops.is_empty());

        let walk: Vec<(u32, PacketKind)> = obs.sends.iter().map(|s| (s.sender.0, s.kind)).collect();
        assert_eq!(
            walk,
            vec![
                (0, PacketKind::Recover),
                (1, PacketKind::Recover),
                (2, PacketKind::Recover),
                (3, PacketKind::Send),
                (4, PacketKind::Send),
                (5, PacketKind::Send),
            ]
        );
        assert_eq!(sim.context.log.receives[0].sender, NodeId(5));
    }

    #[test]
    fn black_hole_relay_swallows_packet() {
        let behaviors = vec![NodeBehavior::Normal, NodeBehavior::BlackHole, NodeBehavior::Normal, NodeBehavior::Normal];
        let mut sim = line_sim(
            &[0.0, 200.0, 400.0, 600.0],
            vec![flow(0, 3, 0.0)],
            RecoveryMode::Sigo,
            Some(behaviors),
        );
        sim.run(&mut NoopObserver).unwrap();

        assert!(sim.context.log.receives.is_empty());
        assert_eq!(sim.context.drop_count(DropReason::BlackHole), 1);
        // The black hole's hop-advancing SEND addresses nobody.
        let last = sim.context.log.sends.last().unwrap();
        assert_eq!(last.sender, NodeId(1));
        assert!(last.candidates.is_empty());
    }

    #[test]
    fn identical_seeds_reproduce() {
        let run = || {
            let mut sim = line_sim(&[0.0, 200.0, 400.0], vec![flow(0, 2, 0.0)], RecoveryMode::Sigo, None);
            sim.run(&mut NoopObserver).unwrap();
            (sim.context.log.receives[0].time, sim.context.hello_broadcasts)
        };
        assert_eq!(run(), run());
    }
}
