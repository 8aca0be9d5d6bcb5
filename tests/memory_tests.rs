// Memory derivation: used and percent computed from total and available.

use resmon::samplers::memory;
use resmon::source::MemCounters;

#[test]
fn memory_reading_derives_used_and_percent() {
    let reading = memory::collect(MemCounters {
        total: 1000,
        available: 250,
    });
    assert_eq!(reading.used, 750);
    assert_eq!(reading.percent, 75.0);
    assert_eq!(reading.total, 1000);
    assert_eq!(reading.available, 250);
}

#[test]
fn memory_reading_handles_zero_total() {
    let reading = memory::collect(MemCounters {
        total: 0,
        available: 0,
    });
    assert_eq!(reading.percent, 0.0);
    assert_eq!(reading.used, 0);
}
