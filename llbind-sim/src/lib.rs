//! Simulated register bus
//!
//! [`SimBus`] is a sparse 32-bit register file implementing
//! [`RegisterBus`]. Every access is recorded so tests can assert on what a
//! shim wrote, and in which order. Peripheral behaviour that shims depend on
//! (set/reset alias registers, self-clearing bits, status flags raised by a
//! trigger write or cleared by a read, free-running counters) is described
//! with [`Rule`]s installed before the test runs.
//!
//! Registers never written read as zero.
//!
//! ```
//! use llbind_hal::RegisterBus;
//! use llbind_sim::{Rule, SimBus};
//!
//! let bus = SimBus::new().with_rule(Rule::SelfClearing { addr: 0x10, mask: 0x8 });
//! bus.write(0x10, 0x9);
//! assert_eq!(bus.read(0x10), 0x1);
//! ```

use std::cell::RefCell;
use std::collections::BTreeMap;

use llbind_hal::RegisterBus;

/// One recorded bus access
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Read { addr: u32, value: u32 },
    Write { addr: u32, value: u32 },
}

impl Access {
    pub fn addr(&self) -> u32 {
        match *self {
            Access::Read { addr, .. } | Access::Write { addr, .. } => addr,
        }
    }
}

/// Per-address behaviour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Write-only register: the low half-word sets bits in `target`, the
    /// high half-word clears them (GPIO BSHR/BSRR style)
    SetReset { addr: u32, target: u32 },
    /// Write-only register: the low half-word clears bits in `target`
    /// (GPIO BCR/BRR style)
    Reset { addr: u32, target: u32 },
    /// Write-only register: ones written clear the same bits in `target`.
    /// `target` may equal `addr` for rc_w1 status registers.
    WriteOneToClear { addr: u32, target: u32 },
    /// Bits of `mask` never stick after a write (hardware clears them once
    /// the operation they start has finished)
    SelfClearing { addr: u32, mask: u32 },
    /// Writing any bit of `mask` to `addr` sets `bits` in `target`
    SetOnWrite {
        addr: u32,
        mask: u32,
        target: u32,
        bits: u32,
    },
    /// Reading `addr` clears `bits` in `target`
    ClearOnRead { addr: u32, target: u32, bits: u32 },
    /// Free-running counter advanced by `step` on every read, wrapping at
    /// `modulus`; counts down when `down` is set
    Counter {
        addr: u32,
        step: u32,
        modulus: u32,
        down: bool,
    },
}

/// Sparse register file with an access log
#[derive(Debug, Default)]
pub struct SimBus {
    regs: RefCell<BTreeMap<u32, u32>>,
    log: RefCell<Vec<Access>>,
    rules: Vec<Rule>,
}

impl SimBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a behaviour rule
    pub fn with_rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Add several behaviour rules
    pub fn with_rules(mut self, rules: impl IntoIterator<Item = Rule>) -> Self {
        self.rules.extend(rules);
        self
    }

    /// Register value without logging or rules
    pub fn peek(&self, addr: u32) -> u32 {
        self.regs.borrow().get(&addr).copied().unwrap_or(0)
    }

    /// Set a register value without logging or rules
    pub fn poke(&self, addr: u32, value: u32) {
        self.regs.borrow_mut().insert(addr, value);
    }

    /// Every access since creation or the last [`clear_log`](Self::clear_log)
    pub fn accesses(&self) -> Vec<Access> {
        self.log.borrow().clone()
    }

    /// Writes only, as `(addr, value)`
    pub fn writes(&self) -> Vec<(u32, u32)> {
        self.log
            .borrow()
            .iter()
            .filter_map(|a| match *a {
                Access::Write { addr, value } => Some((addr, value)),
                Access::Read { .. } => None,
            })
            .collect()
    }

    /// Values written to one address, oldest first
    pub fn writes_to(&self, addr: u32) -> Vec<u32> {
        self.writes()
            .into_iter()
            .filter(|(a, _)| *a == addr)
            .map(|(_, v)| v)
            .collect()
    }

    /// True if any access touched an address in `start..end`
    pub fn touched(&self, start: u32, end: u32) -> bool {
        self.log
            .borrow()
            .iter()
            .any(|a| (start..end).contains(&a.addr()))
    }

    pub fn clear_log(&self) {
        self.log.borrow_mut().clear();
    }

    fn is_write_only(&self, addr: u32) -> bool {
        self.rules.iter().any(|r| {
            matches!(*r,
                Rule::SetReset { addr: a, .. }
                | Rule::Reset { addr: a, .. }
                | Rule::WriteOneToClear { addr: a, .. } if a == addr)
        })
    }

    fn update(&self, addr: u32, f: impl FnOnce(u32) -> u32) {
        let mut regs = self.regs.borrow_mut();
        let slot = regs.entry(addr).or_insert(0);
        *slot = f(*slot);
    }
}

impl RegisterBus for SimBus {
    fn read(&self, addr: u32) -> u32 {
        for rule in &self.rules {
            if let Rule::Counter {
                addr: a,
                step,
                modulus,
                down,
            } = *rule
            {
                if a == addr && modulus != 0 {
                    self.update(addr, |v| {
                        let v = v % modulus;
                        if down {
                            (v + modulus - step % modulus) % modulus
                        } else {
                            (v + step) % modulus
                        }
                    });
                }
            }
        }

        let value = self.peek(addr);
        self.log.borrow_mut().push(Access::Read { addr, value });

        for rule in &self.rules {
            if let Rule::ClearOnRead {
                addr: a,
                target,
                bits,
            } = *rule
            {
                if a == addr {
                    self.update(target, |v| v & !bits);
                }
            }
        }
        value
    }

    fn write(&self, addr: u32, value: u32) {
        self.log.borrow_mut().push(Access::Write { addr, value });

        if !self.is_write_only(addr) {
            self.poke(addr, value);
        }

        for rule in &self.rules {
            match *rule {
                Rule::SetReset { addr: a, target } if a == addr => {
                    let set = value & 0xFFFF;
                    let reset = value >> 16;
                    self.update(target, |v| (v & !reset) | set);
                }
                Rule::Reset { addr: a, target } if a == addr => {
                    self.update(target, |v| v & !(value & 0xFFFF));
                }
                Rule::WriteOneToClear { addr: a, target } if a == addr => {
                    self.update(target, |v| v & !value);
                }
                Rule::SelfClearing { addr: a, mask } if a == addr => {
                    self.update(addr, |v| v & !mask);
                }
                Rule::SetOnWrite {
                    addr: a,
                    mask,
                    target,
                    bits,
                } if a == addr && value & mask != 0 => {
                    self.update(target, |v| v | bits);
                }
                _ => {}
            }
        }
    }
}
