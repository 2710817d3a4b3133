mod common;

use ad5933::{constants::*, Ad5933, Error, Sample, SweepConfig, SweepState};
use common::{BusFault, FakeDelay, FakeI2c, Kind};

#[test]
fn yields_one_more_point_than_increments() {
    let mut dev = Ad5933::new(FakeI2c::new());
    let mut d = FakeDelay::new();
    let config = SweepConfig::new(1e3, 250.0, 10).unwrap();

    let samples: Vec<Sample> = dev.sweep(&mut d, &config).collect();
    assert_eq!(samples.len(), 11);
    for (i, s) in samples.iter().enumerate() {
        assert_eq!(s.frequency_hz, 1e3 + i as f64 * 250.0);
    }

    let i2c = dev.release();
    assert_eq!(i2c.reads_from(0x94), 11);
    assert_eq!(i2c.reads_from(0x96), 11);
}

#[test]
fn control_sequence() {
    let mut dev = Ad5933::new(FakeI2c::new());
    let mut d = FakeDelay::new();
    let config = SweepConfig::new(30e3, 100.0, 3).unwrap();
    assert_eq!(dev.sweep(&mut d, &config).count(), 4);

    // power-down, standby, configure, init, start, 3 x increment
    let i2c = dev.release();
    assert_eq!(i2c.modes(), vec![0xA, 0xB, 0xB, 0x1, 0x2, 0x3, 0x3, 0x3]);
}

#[test]
fn single_point_never_increments() {
    let mut dev = Ad5933::new(FakeI2c::new().with_responses(&[(100, -200)]));
    let mut d = FakeDelay::new();
    let config = SweepConfig::new(50e3, 0.0, 0).unwrap();

    let samples: Vec<Sample> = dev.sweep(&mut d, &config).collect();
    assert_eq!(samples, vec![Sample::new(50e3, 100, -200)]);
    assert!(!dev.release().modes().contains(&0x3));
}

#[test]
fn samples_carry_signed_dft_results() {
    let responses = [(3, 4), (-3, 4), (3, -4), (-32768, 32767)];
    let mut dev = Ad5933::new(FakeI2c::new().with_responses(&responses));
    let mut d = FakeDelay::new();
    let config = SweepConfig::new(10e3, 1e3, 3).unwrap();

    let samples: Vec<Sample> = dev.sweep(&mut d, &config).collect();
    assert_eq!(samples.len(), 4);
    for (s, &(re, im)) in samples.iter().zip(responses.iter()) {
        assert_eq!((s.real, s.imaginary), (re, im));
    }
    assert_eq!(samples[0].magnitude, 5.0);
    assert_eq!(samples[1].magnitude, 5.0);
    assert_eq!(samples[2].magnitude, 5.0);
    assert_eq!(samples[3].frequency_hz, 13e3);
}

#[test]
fn nothing_happens_until_pulled() {
    let mut dev = Ad5933::new(FakeI2c::new());
    let mut d = FakeDelay::new();
    let config = SweepConfig::new(30e3, 100.0, 5).unwrap();
    {
        let mut sweep = dev.sweep(&mut d, &config);
        assert_eq!(sweep.state(), SweepState::Idle);
        assert_eq!(sweep.remaining(), 6);
        assert!(sweep.outcome().is_none());

        assert!(sweep.next().is_some());
        assert_eq!(sweep.state(), SweepState::Advancing);
        assert_eq!(sweep.remaining(), 5);
        assert_eq!(sweep.size_hint(), (0, Some(5)));
    }
    assert_eq!(dev.release().reads_from(0x94), 1);

    let mut dev = Ad5933::new(FakeI2c::new());
    drop(dev.sweep(&mut d, &config));
    assert_eq!(dev.release().attempts(), 0);
}

#[test]
fn caller_can_stop_early() {
    let mut dev = Ad5933::new(FakeI2c::new());
    let mut d = FakeDelay::new();
    let config = SweepConfig::new(30e3, 100.0, 100).unwrap();

    assert_eq!(dev.sweep(&mut d, &config).take(3).count(), 3);
    // the third point is read but never advanced past
    assert_eq!(dev.release().modes().iter().filter(|&&m| m == 0x3).count(), 2);
}

#[test]
fn config_failure_yields_nothing() {
    let mut dev = Ad5933::new(FakeI2c::new().fail_writes_to(0x85));
    let mut d = FakeDelay::new();
    let config = SweepConfig::new(30e3, 100.0, 10).unwrap();

    let mut sweep = dev.sweep(&mut d, &config);
    assert!(sweep.next().is_none());
    assert_eq!(sweep.state(), SweepState::Done);
    assert_eq!(sweep.outcome(), Some(Err(&Error::Bus(BusFault))));
    drop(sweep);

    let i2c = dev.release();
    assert!(i2c.reads_from(0x94) == 0);
    assert!(!i2c.modes().contains(&0x1));
}

#[test]
fn data_ready_timeout_aborts() {
    // reset poll, first point ready, then nothing
    let mut script = vec![0x07, 0x02];
    script.extend(std::iter::repeat(0x00).take(DATA_POLL_ATTEMPTS as usize));
    let mut dev = Ad5933::new(FakeI2c::new().with_status_script(&script));
    let mut d = FakeDelay::new();
    let config = SweepConfig::new(30e3, 100.0, 10).unwrap();

    let mut sweep = dev.sweep(&mut d, &config);
    assert!(sweep.next().is_some());
    assert!(sweep.next().is_none());
    assert_eq!(sweep.outcome(), Some(Err(&Error::Timeout)));
    drop(sweep);

    let i2c = dev.release();
    assert_eq!(i2c.reads_from(0x8F), 2 + DATA_POLL_ATTEMPTS as usize);
    // no stale read for the missing point, no further advance
    assert_eq!(i2c.reads_from(0x94), 1);
    assert_eq!(i2c.modes().iter().filter(|&&m| m == 0x3).count(), 1);
    // no wait after the final poll
    let waits = d.calls.iter().filter(|&&ms| ms == DATA_POLL_INTERVAL_MS).count();
    assert_eq!(waits, DATA_POLL_ATTEMPTS as usize - 1);
}

#[test]
fn bus_failure_mid_sweep_ends_it() {
    let mut dev = Ad5933::new(FakeI2c::new().fail_after(Kind::Read, 0x96, 2));
    let mut d = FakeDelay::new();
    let config = SweepConfig::new(30e3, 100.0, 10).unwrap();

    let mut sweep = dev.sweep(&mut d, &config);
    assert_eq!(sweep.by_ref().count(), 2);
    assert_eq!(sweep.outcome(), Some(Err(&Error::Bus(BusFault))));
    assert_eq!(sweep.remaining(), 0);
}

#[test]
fn increment_failure_ends_it() {
    // power-down, standby, configure, init and start go through
    let mut dev = Ad5933::new(FakeI2c::new().fail_after(Kind::Write, 0x80, 5));
    let mut d = FakeDelay::new();
    let config = SweepConfig::new(30e3, 100.0, 10).unwrap();

    let mut sweep = dev.sweep(&mut d, &config);
    assert!(sweep.next().is_some());
    assert!(sweep.next().is_none());
    assert_eq!(sweep.outcome(), Some(Err(&Error::Bus(BusFault))));
    drop(sweep);

    let i2c = dev.release();
    assert_eq!(i2c.modes(), vec![0xA, 0xB, 0xB, 0x1, 0x2]);
    assert_eq!(i2c.reads_from(0x94), 1);
}

#[test]
fn fused_after_done() {
    let mut dev = Ad5933::new(FakeI2c::new());
    let mut d = FakeDelay::new();
    let config = SweepConfig::new(30e3, 100.0, 1).unwrap();

    let mut sweep = dev.sweep(&mut d, &config);
    assert_eq!(sweep.by_ref().count(), 2);
    assert_eq!(sweep.outcome(), Some(Ok(())));
    assert_eq!(sweep.state(), SweepState::Done);
    assert!(sweep.next().is_none());
    assert!(sweep.next().is_none());
    drop(sweep);

    // nothing sent after the last point
    let i2c = dev.release();
    assert_eq!(i2c.log.last(), Some(&(common::Op::Read { reg: 0x96, len: 2 }, true)));
}

#[test]
fn restart_reconfigures() {
    let mut dev = Ad5933::new(FakeI2c::new());
    let mut d = FakeDelay::new();
    let config = SweepConfig::new(30e3, 100.0, 2).unwrap();

    assert_eq!(dev.sweep(&mut d, &config).count(), 3);
    assert_eq!(dev.sweep(&mut d, &config).count(), 3);

    let i2c = dev.release();
    assert_eq!(i2c.modes().iter().filter(|&&m| m == 0xA).count(), 2);
    assert_eq!(i2c.writes_to(0x82).len(), 2);
}

#[test]
fn sweep_timing() {
    let mut dev = Ad5933::new(FakeI2c::new());
    let mut d = FakeDelay::new();
    let config = SweepConfig::new(30e3, 100.0, 2).unwrap();
    assert_eq!(dev.sweep(&mut d, &config).count(), 3);

    let settle = WRITE_SETTLE_MS as u32;
    let expected =
        // reset
        2 * (settle + RESET_DELAY_MS as u32)
        // control, start, increment, count, settling
        + 5 * settle
        // init, start
        + 2 * (settle + SWEEP_START_DELAY_MS as u32)
        // two increments
        + 2 * (settle + INCREMENT_DELAY_MS as u32);
    assert_eq!(d.total_ms(), expected);
}
