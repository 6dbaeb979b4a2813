//! Unit tests for sg-schedule.

#[cfg(test)]
mod event_queue {
    use sg_core::SimTime;

    use crate::EventQueue;

    #[test]
    fn pops_in_time_order() {
        let mut q = EventQueue::new();
        q.push(SimTime(30), "c");
        q.push(SimTime(10), "a");
        q.push(SimTime(20), "b");
        assert_eq!(q.len(), 3);
        assert_eq!(q.next_time(), Some(SimTime(10)));
        assert_eq!(q.pop(), Some((SimTime(10), "a")));
        assert_eq!(q.pop(), Some((SimTime(20), "b")));
        assert_eq!(q.pop(), Some((SimTime(30), "c")));
        assert_eq!(q.pop(), None);
        assert!(q.is_empty());
    }

    #[test]
    fn same_time_is_fifo() {
        let mut q = EventQueue::new();
        for i in 0..5 {
            q.push(SimTime(7), i);
        }
        q.push(SimTime(3), 99);
        assert_eq!(q.time_count(), 2);
        let order: Vec<i32> = std::iter::from_fn(|| q.pop().map(|(_, e)| e)).collect();
        assert_eq!(order, vec![99, 0, 1, 2, 3, 4]);
    }

    #[test]
    fn push_during_drain() {
        let mut q = EventQueue::new();
        q.push(SimTime(5), 1u32);
        let (t, _) = q.pop().unwrap();
        q.push(t, 2);
        q.push(t + 1, 3);
        assert_eq!(q.pop(), Some((SimTime(5), 2)));
        assert_eq!(q.pop(), Some((SimTime(6), 3)));
    }
}

#[cfg(test)]
mod loader {
    use std::io::Cursor;

    use sg_core::{NodeId, SimTime};

    use crate::{ScheduleError, load_flows_csv, load_flows_reader};

    #[test]
    fn parses_and_sorts() {
        let csv = "source,destination,start_secs\n4,17,2.5\n0,17,0.0\n9,3, 2.5\n";
        let flows = load_flows_reader(Cursor::new(csv)).unwrap();
        assert_eq!(flows.len(), 3);
        assert_eq!(flows[0].source, NodeId(0));
        assert_eq!(flows[0].start, SimTime::ZERO);
        // Equal start times keep file order.
        assert_eq!(flows[1].source, NodeId(4));
        assert_eq!(flows[2].source, NodeId(9));
        assert_eq!(flows[2].destination, NodeId(3));
        assert_eq!(flows[2].start, SimTime(2_500_000));
    }

    #[test]
    fn self_flow_rejected() {
        let csv = "source,destination,start_secs\n2,2,1.0\n";
        let err = load_flows_reader(Cursor::new(csv)).unwrap_err();
        assert!(matches!(err, ScheduleError::Parse(ref m) if m.contains("line 2")), "{err}");
    }

    #[test]
    fn negative_start_rejected() {
        let csv = "source,destination,start_secs\n1,2,-1.0\n";
        assert!(matches!(load_flows_reader(Cursor::new(csv)), Err(ScheduleError::Parse(_))));
    }

    #[test]
    fn bad_field_rejected() {
        let csv = "source,destination,start_secs\nx,2,1.0\n";
        assert!(matches!(load_flows_reader(Cursor::new(csv)), Err(ScheduleError::Parse(_))));
    }

    #[test]
    fn header_only_is_empty() {
        let flows = load_flows_reader(Cursor::new("source,destination,start_secs\n")).unwrap();
        assert!(flows.is_empty());
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_flows_csv(std::path::Path::new("/nonexistent/flows.csv")).unwrap_err();
        assert!(matches!(err, ScheduleError::Io(_)));
    }
}
