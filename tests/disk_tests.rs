// Disk sampler: device resolution heuristics, unmapped-volume behavior,
// per-volume failure isolation.

mod common;

use common::partition;
use resmon::samplers::disk::{DiskSampler, unix_base_device, windows_physical_drive};
use resmon::source::DiskIoCounters;
use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};

fn io(entries: &[(&str, u64, u64)]) -> HashMap<String, DiskIoCounters> {
    entries
        .iter()
        .map(|(name, read_bytes, write_bytes)| {
            (
                name.to_string(),
                DiskIoCounters {
                    read_bytes: *read_bytes,
                    write_bytes: *write_bytes,
                },
            )
        })
        .collect()
}

#[test]
fn unix_resolution_strips_partition_digits_and_path_prefix() {
    let has = |key: &str| key == "sda" || key == "vdb";
    assert_eq!(unix_base_device("/dev/sda1", has), Some("sda".to_string()));
    assert_eq!(unix_base_device("/dev/sda12", has), Some("sda".to_string()));
    assert_eq!(unix_base_device("/dev/vdb", has), Some("vdb".to_string()));
}

#[test]
fn unix_resolution_fails_for_unknown_base_device() {
    let has = |key: &str| key == "sda";
    assert_eq!(unix_base_device("/dev/sdb1", has), None);
    // NVMe partition names keep a trailing 'p' after digit stripping; the
    // heuristic does not resolve them.
    assert_eq!(unix_base_device("/dev/nvme0n1p2", has), None);
    assert_eq!(unix_base_device("123", has), None);
}

#[test]
fn windows_resolution_binds_first_unclaimed_physical_drive() {
    let keys = ["PhysicalDrive1", "loop0", "PhysicalDrive0"];
    let mut claimed = HashSet::new();
    let first = windows_physical_drive(keys.iter().copied(), &claimed);
    assert_eq!(first, Some("PhysicalDrive0".to_string()));
    claimed.insert("PhysicalDrive0".to_string());
    let second = windows_physical_drive(keys.iter().copied(), &claimed);
    assert_eq!(second, Some("PhysicalDrive1".to_string()));
    claimed.insert("PhysicalDrive1".to_string());
    assert_eq!(windows_physical_drive(keys.iter().copied(), &claimed), None);
}

#[test]
fn mapped_volume_reports_io_throughput() {
    let partitions = vec![partition("/dev/sda1", "/", "ext4")];
    let t0 = Instant::now();
    let mut sampler = DiskSampler::new(&partitions, &io(&[("sda", 0, 0)]), t0);
    assert_eq!(sampler.mapped_device("/dev/sda1"), Some("sda"));

    let readings = sampler.collect(
        &partitions,
        &io(&[("sda", 4096, 2048)]),
        t0 + Duration::from_secs(2),
    );
    let disk = &readings["/dev/sda1"];
    assert_eq!(disk.read_speed, 2048.0);
    assert_eq!(disk.write_speed, 1024.0);
    assert_eq!(disk.mountpoint, "/");
    assert_eq!(disk.fstype, "ext4");
}

#[test]
fn unmapped_volume_always_reports_zero_throughput_with_valid_capacity() {
    let partitions = vec![partition("/dev/mmcblk0p1", "/boot", "vfat")];
    let counters = io(&[("sda", 0, 0)]);
    let t0 = Instant::now();
    let mut sampler = DiskSampler::new(&partitions, &counters, t0);
    assert_eq!(sampler.mapped_device("/dev/mmcblk0p1"), None);

    for poll in 1..=3 {
        let readings = sampler.collect(
            &partitions,
            &io(&[("sda", poll * 10_000, poll * 10_000)]),
            t0 + Duration::from_secs(poll),
        );
        let disk = &readings["/dev/mmcblk0p1"];
        assert_eq!(disk.read_speed, 0.0);
        assert_eq!(disk.write_speed, 0.0);
        assert_eq!(disk.total, 100_000_000_000);
        assert_eq!(disk.percent, 40.0);
    }
}

#[test]
fn volume_with_failed_usage_stat_is_skipped_without_aborting_collection() {
    let mut partitions = vec![
        partition("/dev/sda1", "/", "ext4"),
        partition("/dev/sdb1", "/mnt/usb", "ext4"),
    ];
    let counters = io(&[("sda", 0, 0), ("sdb", 0, 0)]);
    let t0 = Instant::now();
    let mut sampler = DiskSampler::new(&partitions, &counters, t0);

    // The USB stick vanished between enumeration and statting.
    partitions[1].usage = None;
    let readings = sampler.collect(&partitions, &counters, t0 + Duration::from_secs(1));
    assert!(readings.contains_key("/dev/sda1"));
    assert!(!readings.contains_key("/dev/sdb1"));
}

#[test]
fn mount_set_may_grow_after_construction() {
    let initial = vec![partition("/dev/sda1", "/", "ext4")];
    let counters = io(&[("sda", 0, 0), ("sdb", 0, 0)]);
    let t0 = Instant::now();
    let mut sampler = DiskSampler::new(&initial, &counters, t0);

    // A volume mounted mid-session is reported, but the device map is never
    // rebuilt, so it stays unmapped and reads zero throughput.
    let grown = vec![
        partition("/dev/sda1", "/", "ext4"),
        partition("/dev/sdb1", "/mnt/usb", "ext4"),
    ];
    let readings = sampler.collect(&grown, &counters, t0 + Duration::from_secs(1));
    assert_eq!(readings.len(), 2);
    assert_eq!(readings["/dev/sdb1"].read_speed, 0.0);
    assert_eq!(sampler.mapped_device("/dev/sdb1"), None);
}

#[test]
fn mapped_device_with_missing_counters_reports_zero_without_disturbing_baseline() {
    let partitions = vec![partition("/dev/sda1", "/", "ext4")];
    let t0 = Instant::now();
    let mut sampler = DiskSampler::new(&partitions, &io(&[("sda", 0, 0)]), t0);

    // Counters temporarily absent (device busy, read error).
    let readings = sampler.collect(&partitions, &io(&[]), t0 + Duration::from_secs(1));
    assert_eq!(readings["/dev/sda1"].read_speed, 0.0);

    // They come back: the rate spans the full window since the last valid
    // observation at t0.
    let readings = sampler.collect(
        &partitions,
        &io(&[("sda", 8192, 0)]),
        t0 + Duration::from_secs(2),
    );
    assert_eq!(readings["/dev/sda1"].read_speed, 4096.0);
}
