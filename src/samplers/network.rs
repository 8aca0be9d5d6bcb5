// Host-wide network counters and send/recv rates.

use crate::models::NetworkReading;
use crate::rate::RateTracker;
use crate::source::NetIoCounters;
use std::time::Instant;

const SENT_KEY: &str = "sent";
const RECV_KEY: &str = "recv";

/// Single global baseline; both rates derive from one timestamp delta.
pub struct NetworkSampler {
    rates: RateTracker,
}

impl NetworkSampler {
    /// Seeds the baseline from the construction-time counters, when the
    /// platform has any.
    pub fn new(initial: Option<NetIoCounters>, now: Instant) -> Self {
        let mut rates = RateTracker::new();
        if let Some(counters) = initial {
            rates.update(SENT_KEY, counters.bytes_sent, now);
            rates.update(RECV_KEY, counters.bytes_recv, now);
        }
        Self { rates }
    }

    pub fn collect(&mut self, counters: NetIoCounters, now: Instant) -> NetworkReading {
        NetworkReading {
            bytes_sent: counters.bytes_sent,
            bytes_recv: counters.bytes_recv,
            packets_sent: counters.packets_sent,
            packets_recv: counters.packets_recv,
            send_speed: self.rates.update(SENT_KEY, counters.bytes_sent, now),
            recv_speed: self.rates.update(RECV_KEY, counters.bytes_recv, now),
        }
    }
}
