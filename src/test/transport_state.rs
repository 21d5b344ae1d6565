use crate::net::{NodeId, Segment};
use crate::proto::{TransportConfig, TransportState};
use crate::sim::Tick;

const ME: NodeId = NodeId(0);
const PEER: NodeId = NodeId(1);

fn state(initial_window: u32, initial_timeout: u64) -> TransportState {
    TransportState::new(&TransportConfig {
        initial_window,
        initial_timeout,
        ..TransportConfig::default()
    })
}

fn queue(st: &mut TransportState, seqs: &[u64]) {
    for &seq in seqs {
        st.push_outgoing(Segment::data(seq, ME, PEER));
    }
}

#[test]
fn new_state_uses_config_defaults() {
    let st = TransportState::new(&TransportConfig::default());
    assert_eq!(st.window_size(), 1);
    assert_eq!(st.timeout(), 10);
    assert!(st.is_idle());
}

#[test]
fn zero_initial_window_is_clamped_to_one() {
    let st = state(0, 10);
    assert_eq!(st.window_size(), 1);
}

#[test]
fn requeue_reverses_in_flight_order_at_queue_head() {
    let mut st = state(3, 10);
    queue(&mut st, &[5, 7, 9, 11]);

    let admitted = st.admit(Tick(0));
    assert_eq!(admitted.len(), 3);
    assert_eq!(st.in_flight_seqs(), vec![5, 7, 9]);
    assert_eq!(st.outgoing_seqs(), vec![11]);

    // 10 ticks elapsed is not yet a timeout.
    assert!(st.requeue_expired(Tick(10)).is_empty());

    let requeued = st.requeue_expired(Tick(11));
    let requeued: Vec<u64> = requeued.iter().map(|s| s.seq).collect();
    assert_eq!(requeued, vec![5, 7, 9]);
    assert!(st.in_flight().is_empty());
    assert_eq!(st.outgoing_seqs(), vec![9, 7, 5, 11]);
}

#[test]
fn requeue_only_takes_expired_entries_and_keeps_the_rest_in_order() {
    let mut st = state(2, 3);
    queue(&mut st, &[1, 2]);
    st.admit(Tick(0));

    // Acknowledge one entry so the remaining one is the only candidate.
    let m = st.acknowledge(1, Tick(2));
    assert_eq!(m.rtt, Some(2));
    assert_eq!(st.timeout(), 2);

    assert!(st.requeue_expired(Tick(2)).is_empty());
    assert_eq!(st.in_flight_seqs(), vec![2]);

    let requeued = st.requeue_expired(Tick(3));
    assert_eq!(requeued.len(), 1);
    assert_eq!(st.outgoing_seqs(), vec![2]);
}

#[test]
fn acknowledge_sets_timeout_to_observed_round_trip() {
    let mut st = state(1, 10);
    queue(&mut st, &[1]);
    st.admit(Tick(4));

    let m = st.acknowledge(1, Tick(9));
    assert_eq!(m.rtt, Some(5));
    assert!(!m.dequeued);
    assert!(m.matched());
    assert_eq!(st.timeout(), 5);
    assert!(st.in_flight().is_empty());
}

#[test]
fn acknowledge_removes_pending_duplicate_from_outgoing() {
    let mut st = state(1, 10);
    queue(&mut st, &[1, 2, 3]);

    let m = st.acknowledge(2, Tick(1));
    assert_eq!(m.rtt, None);
    assert!(m.dequeued);
    assert_eq!(st.outgoing_seqs(), vec![1, 3]);
    // Timeout only follows in-flight matches.
    assert_eq!(st.timeout(), 10);
}

#[test]
fn stale_acknowledge_is_a_no_op() {
    let mut st = state(2, 10);
    queue(&mut st, &[1, 2, 3]);
    st.admit(Tick(0));

    let m = st.acknowledge(42, Tick(3));
    assert!(!m.matched());
    assert_eq!(st.in_flight_seqs(), vec![1, 2]);
    assert_eq!(st.outgoing_seqs(), vec![3]);
    assert_eq!(st.timeout(), 10);
}

#[test]
fn admit_is_blocked_while_anything_is_in_flight() {
    let mut st = state(2, 10);
    queue(&mut st, &[1, 2, 3, 4]);
    assert_eq!(st.admit(Tick(0)).len(), 2);

    st.apply_window(10);
    assert!(st.admit(Tick(1)).is_empty());
    assert_eq!(st.outgoing_seqs(), vec![3, 4]);

    st.acknowledge(1, Tick(2));
    assert!(st.admit(Tick(2)).is_empty(), "one segment is still outstanding");

    st.acknowledge(2, Tick(3));
    let batch: Vec<u64> = st.admit(Tick(3)).iter().map(|s| s.seq).collect();
    assert_eq!(batch, vec![3, 4]);
    assert!(st.in_flight().iter().all(|f| f.sent_at == Tick(3)));
}

#[test]
fn apply_window_clamps_to_at_least_one() {
    let mut st = state(4, 10);
    assert_eq!(st.apply_window(0), 1);
    assert_eq!(st.apply_window(-7), 1);
    assert_eq!(st.apply_window(12), 12);
    assert_eq!(st.apply_window(i64::MAX), u32::MAX);
    assert_eq!(st.window_size(), u32::MAX);
}
