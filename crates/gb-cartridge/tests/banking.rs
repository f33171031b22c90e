//! Loading large images through each bank controller.

use gb_cartridge::{Cartridge, CartridgeHeader, RamProtection};

/// A 100000-byte image where each run of `stride` bytes holds its run number
/// plus one, with the cartridge type byte patched in.
fn striped_image(stride: usize, kind: u8) -> Vec<u8> {
    let mut rom: Vec<u8> = (0..100_000).map(|i| (i / stride + 1) as u8).collect();
    rom[0x147] = kind;
    rom
}

#[test]
fn rom_only_keeps_first_32k() {
    let cart = Cartridge::from_rom(striped_image(1000, 0x00), RamProtection::Fault)
        .expect("type 0 loads");
    assert_eq!(cart.read(0x0000), 1);
    assert_eq!(cart.read(0x3FFF), 17);
    assert_eq!(cart.read(0x4000), 17);
    assert_eq!(cart.read(0x7FFF), 33);
}

#[test]
fn mbc1_switches_upper_window() {
    let mut cart = Cartridge::from_rom(striped_image(1024, 0x01), RamProtection::Fault)
        .expect("type 1 loads");
    assert_eq!(cart.read(0x0000), 1);
    assert_eq!(cart.read(0x4000), 17);

    cart.write(0x2000, 3).expect("bank register");
    assert_eq!(cart.read(0x4000), 49);
    assert_eq!(cart.read(0x0000), 1);
}

#[test]
fn mbc1_last_bank_is_partial() {
    // 100000 bytes is six full banks and part of a seventh.
    let mut cart = Cartridge::from_rom(striped_image(1024, 0x01), RamProtection::Fault)
        .expect("type 1 loads");
    cart.write(0x2000, 6).expect("bank register");
    assert_eq!(cart.read(0x4000), 97);
    // 100000 - 6 * 0x4000 = 1696 bytes of bank 6 exist
    assert_eq!(cart.read(0x4000 + 1695), 98);
    assert_eq!(cart.read(0x4000 + 1696), 0xFF);
}

#[test]
fn header_reads_the_same_type_byte() {
    let rom = striped_image(1024, 0x01);
    let header = CartridgeHeader::parse(&rom).expect("long enough");
    assert_eq!(header.cartridge_type, 0x01);
    assert_eq!(header.type_label(), "ROM+MBC1");
}
