// Stateless memory snapshot.

use crate::models::MemoryReading;
use crate::source::MemCounters;

pub fn collect(counters: MemCounters) -> MemoryReading {
    let used = counters.total.saturating_sub(counters.available);
    let percent = if counters.total > 0 {
        used as f64 / counters.total as f64 * 100.0
    } else {
        0.0
    };
    MemoryReading {
        total: counters.total,
        available: counters.available,
        used,
        percent,
    }
}
