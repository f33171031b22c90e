//! Top-level Game Boy system.
//!
//! Owns the CPU and the bus. The caller drives execution one instruction at
//! a time with [`GameBoy::step`], or with [`GameBoy::run`] for a bounded
//! number of steps.

use std::fmt;

use emu_core::{Bus, BusError, Cpu, Observable, Value, parse_address};
use gb_cartridge::{Cartridge, LoadError};
use sharp_sm83::{Fault, Sm83};

use crate::bus::GbBus;
use crate::config::GameBoyConfig;

/// What the console is doing after a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// The last instruction completed; stepping may continue.
    Running,
    /// HALT or STOP executed. Nothing will wake the CPU.
    Halted,
    /// An instruction could not complete. The state is left as it was at
    /// the fault and further steps do nothing.
    Faulted(Fault),
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Running => f.write_str("running"),
            Self::Halted => f.write_str("halted"),
            Self::Faulted(fault) => write!(f, "faulted: {fault}"),
        }
    }
}

/// Game Boy system.
pub struct GameBoy {
    cpu: Sm83,
    bus: GbBus,
    /// Instructions completed.
    steps: u64,
    fault: Option<Fault>,
}

impl GameBoy {
    /// Create a Game Boy from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the cartridge image is too short or names an
    /// unsupported bank controller.
    pub fn new(config: &GameBoyConfig) -> Result<Self, LoadError> {
        let cartridge = Cartridge::from_rom(config.rom_data.clone(), config.ram_protection)?;
        Ok(Self {
            cpu: Sm83::with_registers(config.start.registers()),
            bus: GbBus::new(cartridge),
            steps: 0,
            fault: None,
        })
    }

    /// Execute one instruction.
    pub fn step(&mut self) -> Status {
        if let Some(fault) = self.fault {
            return Status::Faulted(fault);
        }
        if self.cpu.is_halted() {
            return Status::Halted;
        }

        match self.cpu.step(&mut self.bus) {
            Ok(_) => {
                self.steps += 1;
                self.status()
            }
            Err(fault) => {
                log::warn!("fault after {} steps: {fault}", self.steps);
                self.fault = Some(fault);
                Status::Faulted(fault)
            }
        }
    }

    /// Step until the console stops running or `max_steps` instructions
    /// have executed.
    pub fn run(&mut self, max_steps: u64) -> Status {
        let mut status = self.status();
        for _ in 0..max_steps {
            status = self.step();
            if status != Status::Running {
                break;
            }
        }
        status
    }

    /// Current status without stepping.
    #[must_use]
    pub fn status(&self) -> Status {
        match self.fault {
            Some(fault) => Status::Faulted(fault),
            None if self.cpu.is_halted() => Status::Halted,
            None => Status::Running,
        }
    }

    /// Instructions completed so far.
    #[must_use]
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Read through the bus, as the CPU would.
    pub fn read(&mut self, address: u16) -> u8 {
        self.bus.read(address)
    }

    /// Write through the bus, as the CPU would.
    ///
    /// # Errors
    ///
    /// Returns the cartridge's refusal for ROM or disabled-RAM writes.
    pub fn write(&mut self, address: u16, value: u8) -> Result<(), BusError> {
        self.bus.write(address, value)
    }

    /// Reference to the CPU.
    #[must_use]
    pub fn cpu(&self) -> &Sm83 {
        &self.cpu
    }

    /// Mutable reference to the CPU.
    pub fn cpu_mut(&mut self) -> &mut Sm83 {
        &mut self.cpu
    }

    /// Reference to the bus.
    #[must_use]
    pub fn bus(&self) -> &GbBus {
        &self.bus
    }
}

impl Observable for GameBoy {
    fn query(&self, path: &str) -> Option<Value> {
        if let Some(rest) = path.strip_prefix("cpu.") {
            self.cpu.query(rest)
        } else if let Some(rest) = path.strip_prefix("cartridge.") {
            self.bus.cartridge.query(rest)
        } else if let Some(rest) = path.strip_prefix("memory.") {
            parse_address(rest).map(|a| Value::U8(self.bus.peek(a)))
        } else {
            match path {
                "status" => Some(Value::String(self.status().to_string())),
                "steps" => Some(self.steps.into()),
                _ => self.cpu.query(path),
            }
        }
    }

    fn query_paths(&self) -> &'static [&'static str] {
        &[
            "cpu.<sm83_paths>",
            "cartridge.<cartridge_paths>",
            "memory.<address>",
            "status",
            "steps",
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StartState;
    use gb_cartridge::RamProtection;

    /// A 32K ROM-only image with `program` at 0x0100.
    fn make_gameboy(program: &[u8]) -> GameBoy {
        let mut rom = vec![0; 0x8000];
        rom[0x100..0x100 + program.len()].copy_from_slice(program);
        let mut config = GameBoyConfig::new(rom);
        config.start = StartState::PostBoot;
        GameBoy::new(&config).expect("type 0 loads")
    }

    #[test]
    fn post_boot_starts_at_0100() {
        let gb = make_gameboy(&[]);
        assert_eq!(gb.cpu().pc(), 0x0100);
        assert_eq!(gb.cpu().regs().sp, 0xFFFE);
    }

    #[test]
    fn step_reports_halt() {
        let mut gb = make_gameboy(&[0x00, 0x76]);
        assert_eq!(gb.step(), Status::Running);
        assert_eq!(gb.step(), Status::Halted);
        assert_eq!(gb.step(), Status::Halted);
        assert_eq!(gb.steps(), 2);
    }

    #[test]
    fn fault_is_sticky() {
        // LD A, 1; LD (0x2000), A
        let mut gb = make_gameboy(&[0x3E, 0x01, 0xEA, 0x00, 0x20]);
        assert_eq!(gb.step(), Status::Running);
        let expected = Status::Faulted(Fault::Bus(BusError::RomWrite {
            address: 0x2000,
            value: 0x01,
        }));
        assert_eq!(gb.step(), expected);
        let pc = gb.cpu().pc();
        assert_eq!(gb.step(), expected);
        assert_eq!(gb.cpu().pc(), pc);
        assert_eq!(gb.status(), expected);
    }

    #[test]
    fn unknown_opcode_faults() {
        let mut gb = make_gameboy(&[0xD3]);
        assert_eq!(
            gb.step(),
            Status::Faulted(Fault::UnknownOpcode {
                opcode: 0xD3,
                address: 0x0100
            })
        );
    }

    #[test]
    fn run_stops_at_budget() {
        // JR -2: spin forever
        let mut gb = make_gameboy(&[0x18, 0xFE]);
        assert_eq!(gb.run(1000), Status::Running);
        assert_eq!(gb.steps(), 1000);
    }

    #[test]
    fn ignore_policy_lets_program_continue() {
        let mut rom = vec![0; 0x8000];
        rom[0x147] = 0x01;
        // LD A, 0x55; LD (0xA000), A; HALT
        rom[0x100..0x106].copy_from_slice(&[0x3E, 0x55, 0xEA, 0x00, 0xA0, 0x76]);
        let mut config = GameBoyConfig::new(rom);
        config.start = StartState::PostBoot;

        let mut gb = GameBoy::new(&config).expect("type 1 loads");
        assert!(matches!(gb.run(10), Status::Faulted(_)));

        config.ram_protection = RamProtection::Ignore;
        let mut gb = GameBoy::new(&config).expect("type 1 loads");
        assert_eq!(gb.run(10), Status::Halted);
        assert_eq!(gb.query("memory.0xA000"), Some(Value::U8(0x00)));
    }

    #[test]
    fn observable_paths() {
        let mut gb = make_gameboy(&[0x3E, 0x42, 0xEA, 0x00, 0xC0, 0x76]);
        gb.run(10);
        assert_eq!(gb.query("cpu.a"), Some(Value::U8(0x42)));
        assert_eq!(gb.query("a"), Some(Value::U8(0x42)));
        assert_eq!(gb.query("memory.0xC000"), Some(Value::U8(0x42)));
        assert_eq!(gb.query("memory.$E000"), Some(Value::U8(0x42)));
        assert_eq!(gb.query("cartridge.kind"), Some(Value::String("ROM ONLY".into())));
        assert_eq!(gb.query("status"), Some(Value::String("halted".into())));
        assert_eq!(gb.query("steps"), Some(Value::U64(3)));
        assert_eq!(gb.query("memory.zz"), None);
    }
}
