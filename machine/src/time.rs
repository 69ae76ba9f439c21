/*
 * SPDX-License-Identifier: BlueOak-1.0.0
 */

//! Generic delay timer and the uptime stamp for log lines.

use {
    crate::arch::aarch64::time as arch_time,
    core::{
        sync::atomic::{AtomicU64, Ordering},
        time::Duration,
    },
};

/// Counter frequency in Hz, 0 until the delay timer is initialised.
static COUNTER_FREQ: AtomicU64 = AtomicU64::new(0);

const NANOS_PER_SEC: u64 = 1_000_000_000;

/// Program CNTFRQ_EL0 with the system counter frequency and start timestamping.
pub fn init_delay_timer(freq_hz: u32) {
    arch_time::set_counter_frequency(freq_hz);
    COUNTER_FREQ.store(u64::from(freq_hz), Ordering::Relaxed);
}

/// Counter frequency the delay timer was initialised with.
pub fn counter_frequency() -> u64 {
    COUNTER_FREQ.load(Ordering::Relaxed)
}

/// Time since the counter started. Zero before [`init_delay_timer`].
pub fn uptime() -> Duration {
    ticks_to_duration(arch_time::counter(), counter_frequency())
}

fn ticks_to_duration(ticks: u64, freq_hz: u64) -> Duration {
    if freq_hz == 0 {
        return Duration::ZERO;
    }

    // Split to keep the nanosecond product from overflowing.
    let secs = ticks / freq_hz;
    let nanos = (ticks % freq_hz) * NANOS_PER_SEC / freq_hz;
    Duration::new(secs, nanos as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticks_convert_at_25_mhz() {
        let d = ticks_to_duration(25_000_000 * 3 + 12_500_000, 25_000_000);
        assert_eq!(d, Duration::from_millis(3500));
        assert_eq!(ticks_to_duration(25, 25_000_000), Duration::from_micros(1));
    }

    #[test]
    fn no_frequency_means_no_uptime() {
        assert_eq!(ticks_to_duration(12345, 0), Duration::ZERO);
    }

    #[test]
    fn huge_counts_do_not_overflow() {
        let d = ticks_to_duration(u64::MAX, 25_000_000);
        assert_eq!(d.as_secs(), u64::MAX / 25_000_000);
    }
}
