//! Game Boy emulator binary.
//!
//! `run` executes a ROM headless until it halts, faults, or exhausts its
//! step budget. `info` prints the cartridge header.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use emu_core::Cpu;
use emu_gb::{GameBoy, GameBoyConfig, StartState, Status};
use gb_cartridge::{CartridgeHeader, RamProtection};
use log::LevelFilter;

#[derive(Parser, Debug)]
#[command(name = "emu-gb")]
#[command(about = "Game Boy (DMG) CPU and cartridge emulator", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a ROM until it halts, faults, or runs out of steps
    Run {
        /// Cartridge image
        rom: PathBuf,

        /// Maximum number of instructions to execute
        #[arg(long, default_value_t = 1_000_000)]
        max_steps: u64,

        /// Start at 0x0100 with the registers the boot ROM leaves behind
        #[arg(long)]
        post_boot: bool,

        /// Drop writes to disabled cartridge RAM instead of faulting
        #[arg(long)]
        ignore_ram_protect: bool,

        /// Log every executed instruction
        #[arg(long)]
        trace: bool,
    },
    /// Print the cartridge header
    Info {
        /// Cartridge image
        rom: PathBuf,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    match args.command {
        Command::Run {
            rom,
            max_steps,
            post_boot,
            ignore_ram_protect,
            trace,
        } => {
            init_logging(trace);
            let config = GameBoyConfig {
                rom_data: read_rom(&rom)?,
                ram_protection: if ignore_ram_protect {
                    RamProtection::Ignore
                } else {
                    RamProtection::Fault
                },
                start: if post_boot {
                    StartState::PostBoot
                } else {
                    StartState::PowerOn
                },
            };
            run(&config, max_steps)
        }
        Command::Info { rom } => {
            init_logging(false);
            info(&read_rom(&rom)?)
        }
    }
}

fn init_logging(trace: bool) {
    if trace {
        env_logger::Builder::new()
            .filter_level(LevelFilter::Trace)
            .init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    }
}

fn read_rom(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).with_context(|| format!("reading {}", path.display()))
}

fn run(config: &GameBoyConfig, max_steps: u64) -> Result<()> {
    let mut gb = GameBoy::new(config).context("loading cartridge")?;
    let status = gb.run(max_steps);

    let cpu = gb.cpu();
    let regs = cpu.registers();
    println!(
        "AF={:04X} BC={:04X} DE={:04X} HL={:04X} SP={:04X} PC={:04X}",
        regs.af(),
        regs.bc(),
        regs.de(),
        regs.hl(),
        regs.sp,
        regs.pc
    );
    println!("{} steps, {} cycles", gb.steps(), cpu.cycles().get());

    match status {
        Status::Faulted(fault) => bail!("{fault}"),
        Status::Halted => println!("halted"),
        Status::Running => println!("step budget of {max_steps} exhausted"),
    }
    Ok(())
}

fn info(rom: &[u8]) -> Result<()> {
    let header = CartridgeHeader::parse(rom)?;
    let kb = |size: Option<usize>| {
        size.map_or_else(|| "invalid".to_string(), |s| format!("{} kB", s / 1024))
    };

    println!("ROM information");
    println!("---------------");
    println!("Title:\t\t\"{}\"", header.title);
    println!("GameBoy Color:\t{}", header.color);
    println!("License:\t{}", header.licensee);
    println!("Destination:\t{}", header.destination());
    println!("Cartridge type:\t{}", header.type_label());
    println!("ROM size:\t{}", kb(header.rom_size));
    println!("RAM size:\t{}", kb(header.ram_size));
    Ok(())
}
