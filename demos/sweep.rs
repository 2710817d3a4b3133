#![deny(unsafe_code)]
#![no_main]
#![no_std]

extern crate panic_halt; // panic handler

use cortex_m;
use cortex_m_rt::entry;
use stm32f4xx_hal as hal;

use cortex_m_semihosting::hprintln;

use crate::hal::{
    prelude::*,
    stm32,
    i2c::I2c,
};

use ad5933::{ Ad5933, SweepConfig, ExcitationRange, PgaGain, GainFactor };


#[entry]
fn main() -> ! {
    let dp = stm32::Peripherals::take().unwrap();
    let cp = cortex_m::peripheral::Peripherals::take().unwrap();

    let rcc = dp.RCC.constrain();
    let clocks = rcc.cfgr.use_hse(8.mhz()).sysclk(168.mhz()).pclk1(42.mhz()).pclk2(84.mhz()).freeze();

    let gpioa = dp.GPIOA.split();
    let mut led1 = gpioa.pa6.into_push_pull_output();

    let mut delay = hal::delay::Delay::new(cp.SYST, clocks);

    let gpiob = dp.GPIOB.split();
    let scl = gpiob.pb8.into_alternate_af4().set_open_drain();
    let sda = gpiob.pb9.into_alternate_af4().set_open_drain();

    let i2c = I2c::i2c1(dp.I2C1, (scl, sda), 100.khz(), clocks);

    let mut imp = Ad5933::new(i2c);
    imp.probe(&mut delay).unwrap();

    let t = imp.measure_temperature(&mut delay).unwrap();
    hprintln!("die temperature {} C", t).unwrap();

    let config = SweepConfig::new(30_000.0, 100.0, 50).unwrap()
        .range(ExcitationRange::V2p0)
        .gain(PgaGain::X1);

    // 200k calibration resistor on the first point
    let mut gain_factor = None;

    let mut sweep = imp.sweep(&mut delay, &config);
    for s in sweep.by_ref() {
        let gf = *gain_factor.get_or_insert_with(|| GainFactor::calibrate(200e3, s.magnitude));
        hprintln!(
            "{} Hz re {} im {} |{}| {} deg {} ohm",
            s.frequency_hz, s.real, s.imaginary, s.magnitude, s.phase_degrees(), s.impedance(gf),
        ).unwrap();
    }
    hprintln!("{:?}", sweep.outcome()).unwrap();
    drop(sweep);

    imp.power_down(&mut delay).unwrap();

    loop {
        led1.set_high().unwrap();
        delay.delay_ms(1000_u32);
        led1.set_low().unwrap();
        delay.delay_ms(1000_u32);
    }
}
