#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};

use embedded_hal::blocking::{
    delay::DelayMs,
    i2c::{Write, WriteRead},
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BusFault;

#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    Write { reg: u8, data: Vec<u8> },
    Read { reg: u8, len: usize },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Kind {
    Write,
    Read,
}

/// Fails matching transfers after letting `skip` of them through,
/// `times` times (forever if `None`).
#[derive(Debug, Clone)]
struct FaultRule {
    kind: Option<Kind>,
    reg: Option<u8>,
    skip: usize,
    times: Option<usize>,
}

/// Register file model of the part.
///
/// Control writes drive a tiny simulation: start sweep loads the first
/// scripted DFT result, increment frequency loads the next one,
/// measure temperature loads the temperature register.
pub struct FakeI2c {
    pub address: Option<u8>,
    regs: HashMap<u8, u8>,
    /// Every attempted transfer and whether it succeeded
    pub log: Vec<(Op, bool)>,
    faults: Vec<FaultRule>,
    /// Status reads pop from here first
    pub status_script: VecDeque<u8>,
    /// Status once the script runs out
    pub status: u8,
    pub responses: Vec<(i16, i16)>,
    pub temperature_raw: u16,
    point: usize,
}

impl FakeI2c {
    pub fn new() -> Self {
        FakeI2c {
            address: None,
            regs: HashMap::new(),
            log: Vec::new(),
            faults: Vec::new(),
            status_script: VecDeque::new(),
            status: 0x07,
            responses: Vec::new(),
            temperature_raw: 0,
            point: 0,
        }
    }

    pub fn with_responses(mut self, responses: &[(i16, i16)]) -> Self {
        self.responses = responses.to_vec();
        self
    }

    pub fn with_status(mut self, status: u8) -> Self {
        self.status = status;
        self
    }

    pub fn with_status_script(mut self, script: &[u8]) -> Self {
        self.status_script = script.iter().copied().collect();
        self
    }

    pub fn with_temperature(mut self, raw: u16) -> Self {
        self.temperature_raw = raw;
        self
    }

    pub fn fail_all(mut self) -> Self {
        self.faults.push(FaultRule { kind: None, reg: None, skip: 0, times: None });
        self
    }

    pub fn fail_writes(mut self, times: usize) -> Self {
        self.faults.push(FaultRule { kind: Some(Kind::Write), reg: None, skip: 0, times: Some(times) });
        self
    }

    pub fn fail_writes_to(mut self, reg: u8) -> Self {
        self.faults.push(FaultRule { kind: Some(Kind::Write), reg: Some(reg), skip: 0, times: None });
        self
    }

    pub fn fail_reads_from(mut self, reg: u8) -> Self {
        self.faults.push(FaultRule { kind: Some(Kind::Read), reg: Some(reg), skip: 0, times: None });
        self
    }

    /// Let `skip` matching transfers through, then fail `reg` for good
    pub fn fail_after(mut self, kind: Kind, reg: u8, skip: usize) -> Self {
        self.faults.push(FaultRule { kind: Some(kind), reg: Some(reg), skip, times: None });
        self
    }

    pub fn set_reg(&mut self, reg: u8, bytes: &[u8]) {
        for (i, b) in bytes.iter().enumerate() {
            self.regs.insert(reg + i as u8, *b);
        }
    }

    pub fn reg(&self, reg: u8, len: usize) -> Vec<u8> {
        (0..len).map(|i| *self.regs.get(&(reg + i as u8)).unwrap_or(&0)).collect()
    }

    pub fn attempts(&self) -> usize {
        self.log.len()
    }

    pub fn ops(&self) -> Vec<Op> {
        self.log.iter().filter(|(_, ok)| *ok).map(|(op, _)| op.clone()).collect()
    }

    /// Successful writes to `reg`, in order
    pub fn writes_to(&self, reg: u8) -> Vec<Vec<u8>> {
        self.ops()
            .into_iter()
            .filter_map(|op| match op {
                Op::Write { reg: r, data } if r == reg => Some(data),
                _ => None,
            })
            .collect()
    }

    /// High nibbles of successful control writes, in order
    pub fn modes(&self) -> Vec<u8> {
        self.writes_to(0x80).iter().map(|d| d[0] >> 4).collect()
    }

    pub fn reads_from(&self, reg: u8) -> usize {
        self.ops()
            .iter()
            .filter(|op| matches!(op, Op::Read { reg: r, .. } if *r == reg))
            .count()
    }

    fn fault(&mut self, kind: Kind, reg: u8) -> bool {
        for rule in self.faults.iter_mut() {
            if rule.kind.map_or(true, |k| k == kind) && rule.reg.map_or(true, |r| r == reg) {
                if rule.skip > 0 {
                    rule.skip -= 1;
                    continue;
                }
                match rule.times {
                    None => return true,
                    Some(0) => continue,
                    Some(n) => {
                        rule.times = Some(n - 1);
                        return true;
                    }
                }
            }
        }
        false
    }

    fn load_point(&mut self) {
        let (re, im) = self.responses.get(self.point).copied().unwrap_or((0, 0));
        self.set_reg(0x94, &re.to_be_bytes());
        self.set_reg(0x96, &im.to_be_bytes());
    }

    fn control(&mut self, high: u8) {
        match high >> 4 {
            0x2 => {
                self.point = 0;
                self.load_point();
            }
            0x3 => {
                self.point += 1;
                self.load_point();
            }
            0x9 => {
                let raw = self.temperature_raw;
                self.set_reg(0x92, &raw.to_be_bytes());
            }
            _ => {}
        }
    }
}

impl Write for FakeI2c {
    type Error = BusFault;

    fn write(&mut self, address: u8, bytes: &[u8]) -> Result<(), BusFault> {
        self.address = Some(address);
        let (reg, data) = (bytes[0], bytes[1..].to_vec());
        let failed = self.fault(Kind::Write, reg);
        self.log.push((Op::Write { reg, data: data.clone() }, !failed));
        if failed {
            return Err(BusFault);
        }

        self.set_reg(reg, &data);
        if reg == 0x80 && !data.is_empty() {
            self.control(data[0]);
        }
        Ok(())
    }
}

impl WriteRead for FakeI2c {
    type Error = BusFault;

    fn write_read(&mut self, address: u8, bytes: &[u8], buffer: &mut [u8]) -> Result<(), BusFault> {
        self.address = Some(address);
        let reg = bytes[0];
        let failed = self.fault(Kind::Read, reg);
        self.log.push((Op::Read { reg, len: buffer.len() }, !failed));
        if failed {
            return Err(BusFault);
        }

        if reg == 0x8F {
            let status = self.status_script.pop_front().unwrap_or(self.status);
            buffer[0] = status;
        } else {
            buffer.copy_from_slice(&self.reg(reg, buffer.len()));
        }
        Ok(())
    }
}

/// Records requested waits instead of sleeping
#[derive(Default)]
pub struct FakeDelay {
    pub calls: Vec<u16>,
}

impl FakeDelay {
    pub fn new() -> Self {
        FakeDelay::default()
    }

    pub fn total_ms(&self) -> u32 {
        self.calls.iter().map(|&ms| ms as u32).sum()
    }
}

impl DelayMs<u16> for FakeDelay {
    fn delay_ms(&mut self, ms: u16) {
        self.calls.push(ms);
    }
}
