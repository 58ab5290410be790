use spin_vm::consts::{REG_CNT, REG_INA, REG_OUTA};
use spin_vm::prelude::*;

const CODE: u32 = 0x1000;
const OBJECT: u32 = 0x0800;
const VARIABLE: u32 = 0x0400;
const STACK: u32 = 0x4000;
const INIT: u32 = 0x7F00;

fn boot_cog_with(mut hub: MemoryHub, bytecode: &[u8]) -> Cog<MemoryHub> {
    hub.load(CODE, bytecode);
    hub.direct_write_word(INIT - 8, OBJECT as u16);
    hub.direct_write_word(INIT - 6, VARIABLE as u16);
    hub.direct_write_word(INIT - 4, CODE as u16);
    hub.direct_write_word(INIT - 2, (STACK + 4) as u16);

    let mut cog = Cog::new(hub, 0, INIT);
    for _ in 0..48 {
        cog.step();
    }
    assert_eq!(cog.state(), CogState::ExecInterpreter);

    cog
}

fn boot_cog(bytecode: &[u8]) -> Cog<MemoryHub> {
    boot_cog_with(MemoryHub::new(), bytecode)
}

fn run(cog: &mut Cog<MemoryHub>, instructions: usize) {
    for _ in 0..instructions {
        assert_eq!(cog.state(), CogState::ExecInterpreter, "cog not ready to execute");
        cog.step();
        while cog.state() == CogState::WaitInterpreter {
            cog.step();
        }
    }
}

fn top(cog: &Cog<MemoryHub>) -> u32 {
    cog.hub().direct_read_long(cog.stack_frame().wrapping_sub(4))
}

#[test]
fn main_byte_write_and_read_back() {
    let mut cog = boot_cog(&[
        0x38, 0x55, // value
        0x3A, 0x20, 0x00, // address
        0x81, // pop byte
        0x3A, 0x20, 0x00, //
        0x80, // push byte
    ]);

    run(&mut cog, 5);

    assert_eq!(cog.hub().direct_read_byte(0x2000), 0x55);
    assert_eq!(top(&cog), 0x55);
}

#[test]
fn main_word_and_long_round_trip() {
    let mut cog = boot_cog(&[
        0x39, 0x12, 0x34, // word value
        0x3A, 0x20, 0x02, //
        0xA1, // pop word
        0x3B, 0xDE, 0xAD, 0xBE, 0xEF, // long value
        0x3A, 0x20, 0x04, //
        0xC1, // pop long
        0x3A, 0x20, 0x02, //
        0xA0, // push word
        0x3A, 0x20, 0x04, //
        0xC0, // push long
    ]);

    run(&mut cog, 10);

    assert_eq!(top(&cog), 0xDEAD_BEEF);
    assert_eq!(cog.hub().direct_read_word(0x2002), 0x1234);
    assert_eq!(cog.hub().direct_read_long(0x2004), 0xDEAD_BEEF);
}

#[test]
fn narrow_writes_truncate_the_value() {
    let mut cog = boot_cog(&[
        0x39, 0x01, 0xFF, // 0x1FF into a byte slot
        0x3A, 0x20, 0x00, //
        0x81, //
    ]);

    run(&mut cog, 3);

    assert_eq!(cog.hub().direct_read_byte(0x2000), 0xFF);
    assert_eq!(cog.hub().direct_read_byte(0x2001), 0);
}

#[test]
fn indexed_main_scales_the_popped_address() {
    // The long-sized effective address is index + (address << 2).
    let mut cog = boot_cog(&[
        0x38, 0x77, // value
        0x3A, 0x08, 0x00, // address 0x800
        0x38, 0x04, // index 4
        0xD1, // pop long, indexed main
        0x3A, 0x08, 0x00, //
        0x38, 0x04, //
        0xD0, // push long, indexed main
    ]);

    run(&mut cog, 7);

    assert_eq!(cog.hub().direct_read_long(0x2004), 0x77);
    assert_eq!(top(&cog), 0x77);
}

#[test]
fn object_reads_take_a_packed_offset() {
    let mut hub = MemoryHub::new();
    hub.direct_write_long(OBJECT + 0x40, 0xCAFE);
    hub.direct_write_long(OBJECT + 0x180, 0xF00D);

    let mut cog = boot_cog_with(hub, &[
        0xC4, 0x40, // one-byte offset
        0xC4, 0x81, 0x80, // two-byte offset 0x180
        0xEC, // add the two
    ]);

    run(&mut cog, 3);

    assert_eq!(top(&cog), 0xCAFE + 0xF00D);
}

#[test]
fn variable_indexed_access_scales_by_size() {
    let mut hub = MemoryHub::new();
    hub.direct_write_long(VARIABLE + 0x1C, 0x600D);

    let mut cog = boot_cog_with(hub, &[
        0x38, 0x03, // index 3
        0xD8, 0x10, // push long VAR[0x10][3]
    ]);

    run(&mut cog, 2);

    assert_eq!(top(&cog), 0x600D);
}

#[test]
fn local_slots_address_from_the_local_frame() {
    let mut cog = boot_cog(&[
        0x38, 0x2A, //
        0xCD, 0x04, // pop long LOCAL+4
        0xCC, 0x04, // push long LOCAL+4
    ]);

    run(&mut cog, 3);

    assert_eq!(top(&cog), 42);
    assert_eq!(cog.hub().direct_read_long(INIT - 4 + 4), 42);
}

#[test]
fn using_on_main_memory_writes_back_and_pushes() {
    let mut hub = MemoryHub::new();
    hub.direct_write_long(0x2040, 41);

    let mut cog = boot_cog_with(hub, &[
        0x3A, 0x20, 0x40, //
        0xC2, 0xA6, // read-modify-write: pre-increment long, push
    ]);

    run(&mut cog, 2);

    assert_eq!(cog.hub().direct_read_long(0x2040), 42);
    assert_eq!(top(&cog), 42);
}

#[test]
fn reference_actions_push_the_effective_address() {
    let mut cog = boot_cog(&[
        0xC7, 0x08, // reference long OBJECT+8
        0x3A, 0x12, 0x34, //
        0xC3, // reference long MAIN
    ]);

    run(&mut cog, 3);

    assert_eq!(top(&cog), 0x1234);
    assert_eq!(cog.hub().direct_read_long(cog.stack_frame() - 8), OBJECT + 8);
}

#[test]
fn fast_family_round_trips_variable_and_local_slots() {
    let mut hub = MemoryHub::new();
    hub.direct_write_long(VARIABLE + 8, 0x1234);

    let mut cog = boot_cog_with(hub, &[
        0x48, // push VAR slot 2
        0x38, 0x2A, //
        0x65, // pop into LOC slot 1
        0x64, // push LOC slot 1
        0xEC, // add
    ]);

    run(&mut cog, 5);

    assert_eq!(top(&cog), 0x1234 + 42);
    assert_eq!(cog.hub().direct_read_long(INIT - 4 + 4), 42);
}

#[test]
fn fast_family_reference_and_using() {
    let mut hub = MemoryHub::new();
    hub.direct_write_long(VARIABLE + 8, 41);

    let mut cog = boot_cog_with(hub, &[
        0x4F, // reference VAR slot 3
        0x4A, 0xA6, // using on VAR slot 2: pre-increment, push
    ]);

    run(&mut cog, 2);

    assert_eq!(top(&cog), 42);
    assert_eq!(cog.hub().direct_read_long(VARIABLE + 8), 42);
    assert_eq!(cog.hub().direct_read_long(cog.stack_frame() - 8), VARIABLE + 12);
}

#[test]
fn byte_fill_repeats_the_value() {
    let mut cog = boot_cog(&[
        0x3A, 0x20, 0x00, // dest
        0x38, 0x41, // value
        0x38, 0x05, // count
        0x18, // byte fill
    ]);

    run(&mut cog, 4);

    for offset in 0..5 {
        assert_eq!(cog.hub().direct_read_byte(0x2000 + offset), 0x41);
    }
    assert_eq!(cog.hub().direct_read_byte(0x2005), 0);
}

#[test]
fn word_move_copies_forward() {
    let mut hub = MemoryHub::new();
    for (slot, value) in [0x1111u16, 0x2222, 0x3333].into_iter().enumerate() {
        hub.direct_write_word(0x2100 + slot as u32 * 2, value);
    }

    let mut cog = boot_cog_with(hub, &[
        0x3A, 0x21, 0x40, // dest
        0x3A, 0x21, 0x00, // source
        0x38, 0x03, // count
        0x1D, // word move
    ]);

    run(&mut cog, 4);

    assert_eq!(cog.hub().direct_read_word(0x2140), 0x1111);
    assert_eq!(cog.hub().direct_read_word(0x2142), 0x2222);
    assert_eq!(cog.hub().direct_read_word(0x2144), 0x3333);
}

#[test]
fn string_size_counts_to_the_terminator() {
    let mut hub = MemoryHub::new();
    hub.load(0x2200, b"hello\0");

    let mut cog = boot_cog_with(hub, &[0x3A, 0x22, 0x00, 0x16]);
    run(&mut cog, 2);

    assert_eq!(top(&cog), 5);
}

#[test]
fn string_compare_tests_equality() {
    let mut hub = MemoryHub::new();
    hub.load(0x2200, b"abc\0");
    hub.load(0x2210, b"abc\0");
    hub.load(0x2220, b"abd\0");

    let mut cog = boot_cog_with(hub, &[
        0x3A, 0x22, 0x00, //
        0x3A, 0x22, 0x10, //
        0x17, // equal strings
        0x3A, 0x22, 0x00, //
        0x3A, 0x22, 0x20, //
        0x17, // unequal strings
    ]);

    run(&mut cog, 6);

    assert_eq!(top(&cog), 0);
    assert_eq!(cog.hub().direct_read_long(cog.stack_frame() - 8), u32::MAX);
}

#[test]
fn full_register_write_and_read_back() {
    let mut cog = boot_cog(&[
        0x38, 0x5A, //
        0x3F, 0xB4, // pop into the OUTA window slot
        0x3F, 0x94, // push it back
    ]);

    run(&mut cog, 3);

    assert_eq!(cog.cog_register(REG_OUTA), 0x5A);
    assert_eq!(top(&cog), 0x5A);
}

#[test]
fn single_bit_register_access() {
    let mut cog = boot_cog(&[
        0x36, // value 1
        0x38, 0x04, // bit 4
        0x3D, 0xB4, // set OUTA[4]
        0x38, 0x04, //
        0x3D, 0x94, // read OUTA[4]
    ]);

    run(&mut cog, 5);

    assert_eq!(cog.cog_register(REG_OUTA), 0x10);
    assert_eq!(top(&cog), 1);
}

#[test]
fn bit_range_register_access_normalizes_bounds() {
    let mut cog = boot_cog(&[
        0x38, 0x0A, // value 0b1010
        0x38, 0x07, // bounds pushed inverted
        0x38, 0x04, //
        0x3E, 0xB4, // set OUTA[7..4]
        0x38, 0x04, //
        0x38, 0x07, //
        0x3E, 0x94, // read OUTA[7..4]
    ]);

    run(&mut cog, 7);

    assert_eq!(cog.cog_register(REG_OUTA), 0xA0);
    assert_eq!(top(&cog), 0xA);
}

#[test]
fn full_mask_using_matches_direct_register_using() {
    // Same increment through the register window and through the SPR
    // bytecode must agree.
    let mut window = boot_cog(&[
        0x38, 0x29, 0x3F, 0xB4, // OUTA := 41
        0x3F, 0xD4, 0x26, // using: pre-increment
    ]);
    run(&mut window, 3);

    let mut spr = boot_cog(&[
        0x38, 0x29, 0x38, 0x04, 0x25, // OUTA := 41 via SPR write
        0x38, 0x04, 0x26, 0x26, // SPR using: pre-increment
    ]);
    run(&mut spr, 5);

    assert_eq!(window.cog_register(REG_OUTA), 42);
    assert_eq!(spr.cog_register(REG_OUTA), 42);
}

#[test]
fn bad_register_action_reports_a_diagnostic() {
    let mut cog = boot_cog(&[0x3F, 0x14]);

    run(&mut cog, 1);

    assert_eq!(
        cog.diagnostics(),
        &[Diagnostic::UndefinedRegisterOp { opcode: 0x14, pc: CODE + 1 }]
    );
}

#[test]
fn spr_reads_route_live_registers() {
    let mut hub = MemoryHub::new();
    hub.set_counter(0x1234);
    hub.set_pins_a(0xABCD);

    let mut cog = boot_cog_with(hub, &[
        0x35, 0x24, // SPR 0: PAR
        0x36, 0x24, // SPR 1: CNT
        0x38, 0x02, 0x24, // SPR 2: INA
    ]);

    run(&mut cog, 6);

    assert_eq!(top(&cog), 0xABCD);
    assert_eq!(cog.hub().direct_read_long(cog.stack_frame() - 8), 0x1234);
    assert_eq!(cog.hub().direct_read_long(cog.stack_frame() - 12), INIT);
    assert_eq!(cog.cog_register(REG_CNT), 0x1234);
    assert_eq!(cog.cog_register(REG_INA), 0xABCD);
}

#[test]
fn spr_write_and_read_back() {
    let mut cog = boot_cog(&[
        0x38, 0x2A, 0x38, 0x04, 0x25, // OUTA := 42
        0x38, 0x04, 0x24, // push OUTA
    ]);

    run(&mut cog, 5);

    assert_eq!(top(&cog), 42);
    assert_eq!(cog.cog_register(REG_OUTA), 42);
}

#[test]
fn out_of_range_spr_read_is_swallowed() {
    let mut cog = boot_cog(&[0x38, 0x10, 0x24]);

    run(&mut cog, 2);

    assert_eq!(cog.stack_frame(), STACK);
    assert!(cog.diagnostics().is_empty());
}

#[test]
fn out_of_range_spr_write_leaves_the_value_behind() {
    let mut cog = boot_cog(&[0x38, 0x63, 0x38, 0x14, 0x25]);

    run(&mut cog, 3);

    assert_eq!(cog.stack_frame(), STACK + 4);
    assert_eq!(top(&cog), 0x63);
}
