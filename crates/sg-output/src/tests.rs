//! Integration tests for sg-output.

#[cfg(test)]
mod fixtures {
    use sg_core::{NodeId, Point, SimTime};
    use sg_routing::{Candidate, CandidateSet, PacketKind, ReceiveRecord, SendRecord};

    use crate::row::{FlowSummaryRow, ReceiveLogRow, SendLogRow};

    pub fn send_record() -> SendRecord {
        let c = |id, priority| Candidate { id: NodeId(id), priority, rt: 0.5, is_intersection: false };
        SendRecord {
            time: SimTime::from_secs_f64(10.5),
            sender: NodeId(0),
            position: Point::new(1.0, 2.0),
            dest: NodeId(4),
            dest_pos: Point::new(600.0, 0.0),
            hop_count: 1,
            kind: PacketKind::Send,
            candidates: CandidateSet::from_scored(vec![c(3, 150.0), c(7, 90.0)], 1.0),
        }
    }

    pub fn receive_row() -> ReceiveLogRow {
        ReceiveLogRow::from(&ReceiveRecord {
            time: SimTime::from_secs_f64(10.75),
            receiver: NodeId(4),
            position: Point::new(600.0, 0.0),
            sender: NodeId(3),
            sender_pos: Point::new(400.0, 0.0),
            hop_count: 2,
            kind: PacketKind::Send,
        })
    }

    pub fn send_row() -> SendLogRow {
        SendLogRow::from(&send_record())
    }

    pub fn flow_row(delivered: bool) -> FlowSummaryRow {
        FlowSummaryRow {
            source: 0,
            destination: 4,
            start_secs: 10.5,
            delivered,
            finish_secs: delivered.then_some(10.75),
            delay_secs: delivered.then_some(0.25),
            hop_count: delivered.then_some(2),
        }
    }
}

// ── Rows ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod rows {
    use super::fixtures::{receive_row, send_record, send_row};

    #[test]
    fn send_row_lists_candidates_in_rank_order() {
        let row = send_row();
        assert_eq!(row.candidates, "3;7");
        assert_eq!(row.best_priority, 150.0);
        assert_eq!(row.kind, "send");
        assert_eq!(row.time_secs, 10.5);
    }

    #[test]
    fn send_row_without_candidates() {
        let mut rec = send_record();
        rec.candidates = sg_routing::CandidateSet::empty();
        let row = crate::SendLogRow::from(&rec);
        assert_eq!(row.candidates, "");
        assert_eq!(row.best_priority, 0.0);
    }

    #[test]
    fn receive_row_fields() {
        let row = receive_row();
        assert_eq!(row.receiver, 4);
        assert_eq!(row.sender, 3);
        assert_eq!(row.hop_count, 2);
        assert_eq!(row.sender_x, 400.0);
    }
}

// ── CSV ───────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod csv_tests {
    use tempfile::TempDir;

    use crate::csv::CsvWriter;
    use crate::writer::OutputWriter;

    use super::fixtures::{flow_row, receive_row, send_row};

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    fn records(dir: &TempDir, name: &str) -> Vec<csv::StringRecord> {
        let mut rdr = csv::Reader::from_path(dir.path().join(name)).unwrap();
        rdr.records().map(|r| r.unwrap()).collect()
    }

    #[test]
    fn csv_files_created() {
        let dir = tmp();
        let _w = CsvWriter::new(dir.path()).unwrap();
        assert!(dir.path().join("send_log.csv").exists());
        assert!(dir.path().join("receive_log.csv").exists());
        assert!(dir.path().join("flow_summary.csv").exists());
    }

    #[test]
    fn csv_creates_missing_directory() {
        let dir = tmp();
        let nested = dir.path().join("runs").join("seed-1");
        let _w = CsvWriter::new(&nested).unwrap();
        assert!(nested.join("send_log.csv").exists());
    }

    #[test]
    fn csv_headers_correct() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("flow_summary.csv")).unwrap();
        let headers: Vec<_> = rdr.headers().unwrap().iter().map(str::to_owned).collect();
        assert_eq!(headers, crate::csv::FLOW_HEADER);

        let mut rdr = csv::Reader::from_path(dir.path().join("send_log.csv")).unwrap();
        assert_eq!(rdr.headers().unwrap().len(), crate::csv::SEND_HEADER.len());
    }

    #[test]
    fn csv_send_and_receive_rows() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_sends(&[send_row(), send_row()]).unwrap();
        w.write_receives(&[receive_row()]).unwrap();
        w.finish().unwrap();

        let sends = records(&dir, "send_log.csv");
        assert_eq!(sends.len(), 2);
        assert_eq!(&sends[0][0], "10.5"); // time_secs
        assert_eq!(&sends[0][8], "send"); // kind
        assert_eq!(&sends[0][9], "3;7"); // candidates

        let receives = records(&dir, "receive_log.csv");
        assert_eq!(receives.len(), 1);
        assert_eq!(&receives[0][1], "4"); // receiver
        assert_eq!(&receives[0][7], "2"); // hop_count
    }

    #[test]
    fn csv_undelivered_flow_leaves_blanks() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_flows(&[flow_row(true), flow_row(false)]).unwrap();
        w.finish().unwrap();

        let flows = records(&dir, "flow_summary.csv");
        assert_eq!(&flows[0][3], "1");
        assert_eq!(&flows[0][5], "0.25");
        assert_eq!(&flows[1][3], "0");
        assert_eq!(&flows[1][4], "");
        assert_eq!(&flows[1][6], "");
    }

    #[test]
    fn csv_finish_idempotent() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();
        w.finish().unwrap();
    }
}

// ── Statistics ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod stats {
    use sg_core::{NodeId, Point, SimTime};
    use sg_routing::{DropReason, PacketKind, ReceiveRecord};
    use sg_schedule::Flow;
    use sg_sim::SimulationContext;

    use crate::DeliveryStats;

    fn arrival(receiver: u32, secs: f64, hops: u32) -> ReceiveRecord {
        ReceiveRecord {
            time: SimTime::from_secs_f64(secs),
            receiver: NodeId(receiver),
            position: Point::ORIGIN,
            sender: NodeId(0),
            sender_pos: Point::ORIGIN,
            hop_count: hops,
            kind: PacketKind::Send,
        }
    }

    #[test]
    fn ratio_and_means() {
        let mut ctx = SimulationContext::new(5);
        ctx.begin_epoch(&Flow::new(NodeId(0), NodeId(2), SimTime::ZERO), SimTime::from_secs_f64(1.0));
        ctx.begin_epoch(&Flow::new(NodeId(0), NodeId(3), SimTime::ZERO), SimTime::from_secs_f64(1.0));
        ctx.begin_epoch(&Flow::new(NodeId(0), NodeId(4), SimTime::ZERO), SimTime::from_secs_f64(1.0));
        ctx.accept_arrival(&arrival(2, 1.25, 2));
        ctx.accept_arrival(&arrival(3, 1.75, 4));
        ctx.record_drop(DropReason::MaxHop);
        ctx.data_broadcasts = 6;
        ctx.unicasts = 1;

        let s = DeliveryStats::from_context(&ctx);
        assert_eq!(s.flows, 3);
        assert_eq!(s.delivered, 2);
        assert!((s.delivery_ratio() - 2.0 / 3.0).abs() < 1e-12);
        assert!((s.mean_delay_secs.unwrap() - 0.5).abs() < 1e-9);
        assert_eq!(s.mean_hop_count, Some(3.0));
        assert_eq!(s.data_frames, 7);
        assert_eq!(s.drops, 1);
        assert!(s.to_string().starts_with("delivered 2/3 (66.7%)"));
    }

    #[test]
    fn empty_run() {
        let s = DeliveryStats::from_context(&SimulationContext::new(0));
        assert_eq!(s.delivery_ratio(), 0.0);
        assert_eq!(s.mean_delay_secs, None);
        assert_eq!(s.to_string(), "delivered 0/0 (0.0%), 0 data frames, 0 drops");
    }
}

// ── Observer ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod observer {
    use std::io::Cursor;

    use sg_core::{NodeId, Point, SimConfig, SimTime};
    use sg_mobility::{Kinematics, MobilityStore};
    use sg_schedule::Flow;
    use sg_sim::{ChannelConfig, SimBuilder};
    use sg_topology::load_topology_reader;

    use crate::csv::CsvWriter;
    use crate::observer::SimOutputObserver;

    #[test]
    fn integration_csv() {
        let topology =
            load_topology_reader(Cursor::new("junction A -100 0\njunction B 1000 0\nroad AB A_B\n"), 20.0).unwrap();
        let mobility = MobilityStore::from_states(
            [0.0, 200.0, 400.0]
                .iter()
                .map(|&x| Kinematics::stationary(Point::new(x, 0.0), SimTime::ZERO))
                .collect(),
        );
        let config = SimConfig { seed: 3, duration_secs: 7.0, flow_start_secs: 5.0 };
        let mut sim = SimBuilder::new(config, topology, mobility)
            .channel(ChannelConfig { range: 250.0, reliable_fraction: 1.0, tx_delay_us: 200 })
            .flows(vec![Flow::new(NodeId(0), NodeId(2), SimTime::ZERO)])
            .build()
            .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let mut obs = SimOutputObserver::new(CsvWriter::new(dir.path()).unwrap());
        assert!(obs.stats().is_none());
        sim.run(&mut obs).unwrap();
        assert!(obs.take_error().is_none(), "no write errors expected");
        assert_eq!(obs.stats().unwrap().delivered, 1);

        let mut rdr = csv::Reader::from_path(dir.path().join("receive_log.csv")).unwrap();
        assert_eq!(rdr.records().count(), 1);
        let mut rdr = csv::Reader::from_path(dir.path().join("send_log.csv")).unwrap();
        assert_eq!(rdr.records().count(), 2);
        let mut rdr = csv::Reader::from_path(dir.path().join("flow_summary.csv")).unwrap();
        let flows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(&flows[0][3], "1");
        assert_eq!(&flows[0][6], "2");
    }
}

// ── SQLite tests ──────────────────────────────────────────────────────────────

#[cfg(all(test, feature = "sqlite"))]
mod sqlite_tests {
    use tempfile::TempDir;

    use crate::sqlite::SqliteWriter;
    use crate::writer::OutputWriter;

    use super::fixtures::{flow_row, receive_row, send_row};

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    #[test]
    fn sqlite_db_created() {
        let dir = tmp();
        let _w = SqliteWriter::new(dir.path()).unwrap();
        assert!(dir.path().join("output.db").exists());
    }

    #[test]
    fn sqlite_row_counts() {
        let dir = tmp();
        let mut w = SqliteWriter::new(dir.path()).unwrap();
        w.write_sends(&[send_row(), send_row(), send_row()]).unwrap();
        w.write_receives(&[receive_row()]).unwrap();
        w.finish().unwrap();

        let conn = rusqlite::Connection::open(dir.path().join("output.db")).unwrap();
        let sends: i64 = conn.query_row("SELECT COUNT(*) FROM send_log", [], |r| r.get(0)).unwrap();
        let receives: i64 = conn.query_row("SELECT COUNT(*) FROM receive_log", [], |r| r.get(0)).unwrap();
        assert_eq!(sends, 3);
        assert_eq!(receives, 1);
    }

    #[test]
    fn sqlite_undelivered_flow_is_null() {
        let dir = tmp();
        let mut w = SqliteWriter::new(dir.path()).unwrap();
        w.write_flows(&[flow_row(false)]).unwrap();
        w.finish().unwrap();

        let conn = rusqlite::Connection::open(dir.path().join("output.db")).unwrap();
        let (delivered, delay): (i64, Option<f64>) = conn
            .query_row("SELECT delivered, delay_secs FROM flow_summary", [], |r| Ok((r.get(0)?, r.get(1)?)))
            .unwrap();
        assert_eq!(delivered, 0);
        assert_eq!(delay, None);
    }
}
