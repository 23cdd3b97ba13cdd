//! Unit tests for 6507 instruction behavior.

use emu_core::{Bus, Cpu, SimpleBus};
use mos_6507::{CpuError, Mos6507, OPCODES, flags};

/// Run one instruction, returning the cycles it took.
fn run_instruction(cpu: &mut Mos6507, bus: &mut SimpleBus) -> u8 {
    cpu.step(bus).expect("documented opcode")
}

/// Load a program at $0200 and set PC there.
fn setup_program(bus: &mut SimpleBus, cpu: &mut Mos6507, program: &[u8]) {
    bus.load(0x0200, program);
    cpu.regs.pc = 0x0200;
}

#[test]
fn test_stack_pha_pla() {
    let mut bus = SimpleBus::new();
    let mut cpu = Mos6507::new();

    let program = [
        0xA9, 0x42, // LDA #$42
        0xA2, 0xFF, // LDX #$FF
        0x9A, // TXS
        0x48, // PHA
        0xA9, 0x00, // LDA #$00
        0x68, // PLA
    ];
    setup_program(&mut bus, &mut cpu, &program);

    for _ in 0..6 {
        run_instruction(&mut cpu, &mut bus);
    }

    assert_eq!(cpu.regs.a, 0x42, "PLA should restore A");
    assert_eq!(cpu.regs.s, 0xFF, "SP should be back to $FF after PLA");
    assert_eq!(bus.peek(0x01FF), 0x42);
}

#[test]
fn test_stack_php_plp() {
    let mut bus = SimpleBus::new();
    let mut cpu = Mos6507::new();

    let program = [
        0xA2, 0xFF, // LDX #$FF
        0x9A, // TXS
        0x38, // SEC
        0xF8, // SED
        0x08, // PHP
        0x18, // CLC
        0xD8, // CLD
        0x28, // PLP
    ];
    setup_program(&mut bus, &mut cpu, &program);

    for _ in 0..8 {
        run_instruction(&mut cpu, &mut bus);
    }

    assert!(cpu.regs.p.is_set(flags::C), "PLP should restore carry");
    assert!(cpu.regs.p.is_set(flags::D), "PLP should restore decimal");
    assert_eq!(cpu.regs.s, 0xFF, "SP should be back to $FF");
    assert_eq!(bus.peek(0x01FF) & 0x30, 0x30, "PHP pushes B and bit 5");
}

#[test]
fn test_jsr_rts_round_trip() {
    let mut bus = SimpleBus::new();
    let mut cpu = Mos6507::new();

    setup_program(&mut bus, &mut cpu, &[0x20, 0x00, 0x03]); // JSR $0300
    bus.load(0x0300, &[0x60]); // RTS

    assert_eq!(run_instruction(&mut cpu, &mut bus), 6);
    assert_eq!(cpu.pc(), 0x0300);
    assert_eq!(cpu.regs.s, 0xFB);
    // Return address minus one, high byte first.
    assert_eq!(bus.peek(0x01FD), 0x02);
    assert_eq!(bus.peek(0x01FC), 0x02);

    assert_eq!(run_instruction(&mut cpu, &mut bus), 6);
    assert_eq!(cpu.pc(), 0x0203, "RTS lands after the JSR");
    assert_eq!(cpu.regs.s, 0xFD, "call and return leave SP unchanged");
}

#[test]
fn test_brk_stack_layout() {
    let mut bus = SimpleBus::new();
    let mut cpu = Mos6507::new();

    bus.write(0xFFFE, 0x00);
    bus.write(0xFFFF, 0x03);

    let program = [
        0xA2, 0xFF, // LDX #$FF    @ $0200
        0x9A, // TXS         @ $0202
        0x58, // CLI         @ $0203
        0x00, // BRK         @ $0204
        0xEA, // padding     @ $0205 (skipped)
    ];
    setup_program(&mut bus, &mut cpu, &program);

    for _ in 0..3 {
        run_instruction(&mut cpu, &mut bus);
    }
    assert_eq!(run_instruction(&mut cpu, &mut bus), 7);

    assert_eq!(cpu.pc(), 0x0300, "PC should be at BRK vector target");
    assert_eq!(cpu.regs.s, 0xFC, "three pushes from $FF");
    assert!(cpu.regs.p.is_set(flags::I), "I flag should be set after BRK");

    assert_eq!(bus.peek(0x01FF), 0x02, "pushed PCH");
    assert_eq!(bus.peek(0x01FE), 0x06, "pushed PCL skips the padding byte");
    let pushed_p = bus.peek(0x01FD);
    assert_eq!(pushed_p & 0x30, 0x30, "pushed P has B and U set");
    assert_eq!(pushed_p & 0x04, 0x00, "pushed P has I clear (CLI ran)");
}

#[test]
fn test_brk_rti_round_trip() {
    let mut bus = SimpleBus::new();
    let mut cpu = Mos6507::new();

    bus.write(0xFFFE, 0x00);
    bus.write(0xFFFF, 0x03);
    bus.write(0x0300, 0x40); // RTI

    setup_program(&mut bus, &mut cpu, &[0x58, 0x00, 0xEA]); // CLI; BRK
    run_instruction(&mut cpu, &mut bus);
    let s_before = cpu.regs.s;
    run_instruction(&mut cpu, &mut bus);
    assert_eq!(run_instruction(&mut cpu, &mut bus), 6);

    assert_eq!(cpu.pc(), 0x0203, "RTI does not add one");
    assert_eq!(cpu.regs.s, s_before);
    assert!(!cpu.regs.p.is_set(flags::I), "RTI restores the pre-BRK I flag");
}

#[test]
fn test_indirect_jmp_page_wrap() {
    let mut bus = SimpleBus::new();
    let mut cpu = Mos6507::new();

    bus.write(0x10FF, 0x34);
    bus.write(0x1000, 0x12);
    bus.write(0x1100, 0x56);
    setup_program(&mut bus, &mut cpu, &[0x6C, 0xFF, 0x10]); // JMP ($10FF)

    assert_eq!(run_instruction(&mut cpu, &mut bus), 5);
    assert_eq!(cpu.pc(), 0x1234, "high byte comes from $1000, not $1100");
}

#[test]
fn test_branch_cycles() {
    let mut bus = SimpleBus::new();
    let mut cpu = Mos6507::new();

    // Not taken.
    setup_program(&mut bus, &mut cpu, &[0xD0, 0x05]); // BNE +5
    cpu.regs.p.set(flags::Z);
    assert_eq!(run_instruction(&mut cpu, &mut bus), 2);
    assert_eq!(cpu.pc(), 0x0202);

    // Taken, same page.
    cpu.regs.pc = 0x0200;
    cpu.regs.p.clear(flags::Z);
    assert_eq!(run_instruction(&mut cpu, &mut bus), 3);
    assert_eq!(cpu.pc(), 0x0207);

    // Taken, forward across a page.
    bus.load(0x02F0, &[0xD0, 0x20]);
    cpu.regs.pc = 0x02F0;
    assert_eq!(run_instruction(&mut cpu, &mut bus), 4);
    assert_eq!(cpu.pc(), 0x0312);

    // Taken, backward across a page.
    bus.load(0x0300, &[0xD0, 0xFA]);
    cpu.regs.pc = 0x0300;
    assert_eq!(run_instruction(&mut cpu, &mut bus), 4);
    assert_eq!(cpu.pc(), 0x02FC);
}

#[test]
fn test_page_cross_penalty_only_on_reads() {
    let mut bus = SimpleBus::new();
    let mut cpu = Mos6507::new();
    cpu.regs.x = 0x10;

    setup_program(&mut bus, &mut cpu, &[0xBD, 0xF0, 0x12]); // LDA $12F0,X
    assert_eq!(run_instruction(&mut cpu, &mut bus), 5);

    setup_program(&mut bus, &mut cpu, &[0x9D, 0xF0, 0x12]); // STA $12F0,X
    assert_eq!(run_instruction(&mut cpu, &mut bus), 5);

    // (zp),Y with the pointer at $12F0.
    bus.load(0x0080, &[0xF0, 0x12]);
    cpu.regs.y = 0x10;
    setup_program(&mut bus, &mut cpu, &[0xB1, 0x80]); // LDA ($80),Y
    assert_eq!(run_instruction(&mut cpu, &mut bus), 6);
    cpu.regs.y = 0x0F;
    setup_program(&mut bus, &mut cpu, &[0xB1, 0x80]);
    assert_eq!(run_instruction(&mut cpu, &mut bus), 5);
}

#[test]
fn test_every_opcode_length_and_base_cycles() {
    for (code, entry) in OPCODES.iter().enumerate() {
        if entry.is_illegal() || entry.operation.transfers_control() {
            continue;
        }

        let mut bus = SimpleBus::new();
        let mut cpu = Mos6507::new();
        // Zero-page pointer at $10 for the indirect modes.
        bus.load(0x0010, &[0x00, 0x03]);
        setup_program(&mut bus, &mut cpu, &[code as u8, 0x10, 0x00]);

        let cycles = run_instruction(&mut cpu, &mut bus);
        assert_eq!(
            cpu.pc(),
            0x0200 + u16::from(entry.bytes),
            "PC after ${code:02X}"
        );
        assert_eq!(cycles, entry.cycles, "cycles for ${code:02X}");
    }
}

#[test]
fn test_illegal_opcode_is_fatal() {
    let mut bus = SimpleBus::new();
    let mut cpu = Mos6507::new();
    setup_program(&mut bus, &mut cpu, &[0x02]);

    let err = cpu.step(&mut bus).unwrap_err();
    assert_eq!(
        err,
        CpuError::IllegalOpcode {
            opcode: 0x02,
            pc: 0x0200
        }
    );
    assert_eq!(err.to_string(), "illegal opcode $02 at $0200");
    assert_eq!(cpu.pc(), 0x0200, "PC is left on the offending opcode");
}

#[test]
fn test_reset_loads_vector() {
    let mut bus = SimpleBus::new();
    let mut cpu = Mos6507::new();
    bus.load(0xFFFC, &[0x00, 0xF0]);
    cpu.regs.s = 0x12;

    cpu.reset(&mut bus);

    assert_eq!(cpu.pc(), 0xF000);
    assert_eq!(cpu.regs.s, 0xFD);
    assert!(cpu.regs.p.is_set(flags::I));
}

#[test]
fn test_adc_sbc_flags_match_reference() {
    let mut bus = SimpleBus::new();
    let mut cpu = Mos6507::new();

    for a in 0..=255u8 {
        for m in 0..=255u8 {
            for carry in [false, true] {
                // Decimal mode must not change anything.
                let decimal = (a ^ m) & 1 == 1;
                let c = i16::from(carry);

                // ADC #m
                setup_program(&mut bus, &mut cpu, &[0x69, m]);
                cpu.regs.a = a;
                cpu.regs.p.set_if(flags::C, carry);
                cpu.regs.p.set_if(flags::D, decimal);
                run_instruction(&mut cpu, &mut bus);

                let sum = u16::from(a) + u16::from(m) + u16::from(carry);
                let signed = i16::from(a as i8) + i16::from(m as i8) + c;
                assert_eq!(cpu.regs.a, sum as u8, "ADC {a:02X}+{m:02X}+{c}");
                assert_eq!(cpu.regs.p.is_set(flags::C), sum > 0xFF);
                assert_eq!(cpu.regs.p.is_set(flags::Z), sum as u8 == 0);
                assert_eq!(cpu.regs.p.is_set(flags::N), sum & 0x80 != 0);
                assert_eq!(
                    cpu.regs.p.is_set(flags::V),
                    !(-128..=127).contains(&signed),
                    "ADC V {a:02X}+{m:02X}+{c}"
                );

                // SBC #m
                setup_program(&mut bus, &mut cpu, &[0xE9, m]);
                cpu.regs.a = a;
                cpu.regs.p.set_if(flags::C, carry);
                cpu.regs.p.set_if(flags::D, decimal);
                run_instruction(&mut cpu, &mut bus);

                let diff = i16::from(a) - i16::from(m) - (1 - c);
                let signed = i16::from(a as i8) - i16::from(m as i8) - (1 - c);
                assert_eq!(cpu.regs.a, diff as u8, "SBC {a:02X}-{m:02X}-{c}");
                assert_eq!(cpu.regs.p.is_set(flags::C), diff >= 0);
                assert_eq!(cpu.regs.p.is_set(flags::Z), diff as u8 == 0);
                assert_eq!(cpu.regs.p.is_set(flags::N), diff as u8 & 0x80 != 0);
                assert_eq!(
                    cpu.regs.p.is_set(flags::V),
                    !(-128..=127).contains(&signed),
                    "SBC V {a:02X}-{m:02X}-{c}"
                );
            }
        }
    }
}

#[test]
fn test_compare_and_bit() {
    let mut bus = SimpleBus::new();
    let mut cpu = Mos6507::new();

    bus.write(0x0080, 0xC0);
    let program = [
        0xA9, 0x40, // LDA #$40
        0xC9, 0x40, // CMP #$40
        0xC9, 0x41, // CMP #$41
        0x24, 0x80, // BIT $80
    ];
    setup_program(&mut bus, &mut cpu, &program);

    run_instruction(&mut cpu, &mut bus);
    run_instruction(&mut cpu, &mut bus);
    assert!(cpu.regs.p.is_set(flags::C) && cpu.regs.p.is_set(flags::Z));

    run_instruction(&mut cpu, &mut bus);
    assert!(!cpu.regs.p.is_set(flags::C));
    assert!(cpu.regs.p.is_set(flags::N), "$40 - $41 = $FF");

    run_instruction(&mut cpu, &mut bus);
    assert!(!cpu.regs.p.is_set(flags::Z), "$40 & $C0 != 0");
    assert!(cpu.regs.p.is_set(flags::N));
    assert!(cpu.regs.p.is_set(flags::V));
}

#[test]
fn test_rotate_through_carry() {
    let mut bus = SimpleBus::new();
    let mut cpu = Mos6507::new();

    bus.write(0x0080, 0x01);
    let program = [
        0x18, // CLC
        0x66, 0x80, // ROR $80 -> $00, C=1
        0x66, 0x80, // ROR $80 -> $80, C=0
        0xA9, 0x81, // LDA #$81
        0x2A, // ROL A -> $02, C=1
    ];
    setup_program(&mut bus, &mut cpu, &program);

    run_instruction(&mut cpu, &mut bus);
    assert_eq!(run_instruction(&mut cpu, &mut bus), 5);
    assert_eq!(bus.peek(0x0080), 0x00);
    assert!(cpu.regs.p.is_set(flags::C) && cpu.regs.p.is_set(flags::Z));

    run_instruction(&mut cpu, &mut bus);
    assert_eq!(bus.peek(0x0080), 0x80);
    assert!(!cpu.regs.p.is_set(flags::C));

    run_instruction(&mut cpu, &mut bus);
    run_instruction(&mut cpu, &mut bus);
    assert_eq!(cpu.regs.a, 0x02);
    assert!(cpu.regs.p.is_set(flags::C));
}
