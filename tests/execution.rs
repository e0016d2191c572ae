// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! End-to-end execution tests against a RAM-backed bus.

mod common;

use common::{boot, TestBus, INITIAL_PC, INITIAL_SSP};

use m68k_core::{event, reg, M68K};

const NOP: u16 = 0x4E71;

#[test]
fn reset_vector_fetch() {
    let mut bus = TestBus::new();
    bus.write_long(0, 0x0000_1000);
    bus.write_long(4, 0x0000_0400);

    let mut cpu = M68K::new(true);
    cpu.reset(true);
    cpu.run(&mut bus, 100);

    assert_eq!(cpu.regs.a(7), 0x1000);
    assert_eq!(cpu.regs.pc.0, 0x400);
    assert!(cpu.regs.sr.s);
    assert_eq!(cpu.regs.sr.interrupt_mask, 7);
}

#[test]
fn add_word_sets_carry_and_zero() {
    let (mut cpu, mut bus) = boot(&[0xD240]); // ADD.W D0,D1
    cpu.set_register(reg::D0, 0xFFFF);
    cpu.set_register(reg::D0 + 1, 0x0001);

    cpu.step(&mut bus);

    assert_eq!(cpu.get_register(reg::D0 + 1), 0x0000_0000);
    assert!(cpu.regs.sr.z);
    assert!(cpu.regs.sr.c);
    assert!(cpu.regs.sr.x);
    assert!(!cpu.regs.sr.v);
    assert!(!cpu.regs.sr.n);
}

#[test]
fn move_byte_preserves_upper_bits() {
    let (mut cpu, mut bus) = boot(&[0x103C, 0x00AA]); // MOVE.B #$AA,D0
    cpu.set_register(reg::D0, 0x1234_5678);

    cpu.step(&mut bus);

    assert_eq!(cpu.get_register(reg::D0), 0x1234_56AA);
    assert!(cpu.regs.sr.n);
    assert!(!cpu.regs.sr.z);
    assert!(!cpu.regs.sr.v);
    assert!(!cpu.regs.sr.c);
}

#[test]
fn movea_word_sign_extends_without_flags() {
    let (mut cpu, mut bus) = boot(&[0x3040]); // MOVEA.W D0,A0
    cpu.set_register(reg::D0, 0x0000_8000);
    let sr = cpu.get_sr();

    cpu.step(&mut bus);

    assert_eq!(cpu.get_register(reg::A0), 0xFFFF_8000);
    assert_eq!(cpu.get_sr(), sr);
}

#[test]
fn subx_predecrement_pair_on_same_register() {
    let (mut cpu, mut bus) = boot(&[0x9108]); // SUBX.B -(A0),-(A0)
    cpu.set_register(reg::A0, 0x1010);
    bus.ram[0x100F] = 0x01; // Source, read first.
    bus.ram[0x100E] = 0x05; // Destination.

    cpu.step(&mut bus);

    assert_eq!(cpu.get_register(reg::A0), 0x100E);
    assert_eq!(bus.ram[0x100E], 0x04);
}

#[test]
fn cmpm_postincrement_pair_on_same_register() {
    let (mut cpu, mut bus) = boot(&[0xB108]); // CMPM.B (A0)+,(A0)+
    cpu.set_register(reg::A0, 0x2000);
    bus.ram[0x2000] = 7; // Source, read first.
    bus.ram[0x2001] = 7; // Destination, read at the incremented address.

    cpu.step(&mut bus);

    assert_eq!(cpu.get_register(reg::A0), 0x2002);
    assert!(cpu.regs.sr.z);
}

#[test]
fn divs_by_zero_raises_zero_divide() {
    let (mut cpu, mut bus) = boot(&[0x81FC, 0x0000]); // DIVS.W #0,D0
    bus.write_long(5 * 4, 0x3000);
    cpu.set_register(reg::D0, 0x0001_0000);

    cpu.step(&mut bus);

    // Frame is PC (long) then SR (word); the saved PC points past DIVS.
    assert_eq!(cpu.regs.a(7), INITIAL_SSP - 6);
    assert_eq!(bus.long(INITIAL_SSP - 4), INITIAL_PC + 4);
    assert_eq!(cpu.regs.pc.0, 0x3000);
    assert_eq!(cpu.get_register(reg::D0), 0x0001_0000);
}

#[test]
fn zero_divide_flags_differ_by_mask_revision() {
    for (rev_e, n) in [(true, false), (false, true)] {
        let mut bus = TestBus::new();
        bus.write_long(0, INITIAL_SSP);
        bus.write_long(4, INITIAL_PC);
        bus.write_word(INITIAL_PC, 0x80FC); // DIVU.W #0,D0
        bus.write_word(INITIAL_PC + 2, 0x0000);

        let mut cpu = M68K::new(rev_e);
        cpu.run(&mut bus, 1);
        cpu.step(&mut bus);

        assert_eq!(cpu.regs.sr.n, n, "rev_e = {rev_e}");
        assert!(!cpu.regs.sr.z);
    }
}

#[test]
fn divs_overflow_sets_v_and_keeps_destination() {
    let (mut cpu, mut bus) = boot(&[0x81FC, 0x0001]); // DIVS.W #1,D0
    cpu.set_register(reg::D0, 0x0004_0000); // Quotient 0x40000 overflows i16.

    cpu.step(&mut bus);

    assert!(cpu.regs.sr.v);
    assert_eq!(cpu.get_register(reg::D0), 0x0004_0000);
    assert_eq!(cpu.regs.pc.0, INITIAL_PC + 4); // No trap.
}

#[test]
fn nmi_wakes_stop_and_autovectors() {
    let (mut cpu, mut bus) = boot(&[0x4E72, 0x2000]); // STOP #$2000
    bus.write_long(31 * 4, 0x2000); // Level 7 autovector handler.

    cpu.step(&mut bus);
    assert!(cpu.pending() & event::STOPPED != 0);

    // Stopped: the clock idles forward in 4-cycle chunks.
    let t = cpu.timestamp;
    cpu.run(&mut bus, t + 100);
    assert_eq!(cpu.timestamp, t + 4);

    cpu.set_ipl(7);
    cpu.run(&mut bus, cpu.timestamp + 1000);

    assert_eq!(bus.int_acks, [7]);
    assert_eq!(cpu.regs.sr.interrupt_mask, 7);
    assert_eq!(cpu.regs.pc.0, 0x2000);
    assert!(cpu.pending() & event::STOPPED == 0);
}

#[test]
fn device_supplied_interrupt_vector() {
    let (mut cpu, mut bus) = boot(&[0x46FC, 0x2000, NOP]); // MOVE #$2000,SR
    bus.ack_vector = 0x40;
    bus.write_long(0x40 * 4, 0x4000);

    cpu.step(&mut bus); // Lowers the interrupt mask to 0.
    cpu.set_ipl(5);
    cpu.run(&mut bus, cpu.timestamp + 1000);

    assert_eq!(bus.int_acks, [5]);
    assert_eq!(cpu.regs.sr.interrupt_mask, 5);
    assert_eq!(cpu.regs.pc.0, 0x4000);
}

#[test]
fn interrupts_below_the_mask_stay_pending_free() {
    let (mut cpu, mut bus) = boot(&[NOP, NOP]);

    cpu.set_ipl(3); // Mask is 7 after reset.
    assert_eq!(cpu.pending() & (event::INT | event::NMI), 0);

    cpu.step(&mut bus);
    assert!(bus.int_acks.is_empty());
    assert_eq!(cpu.regs.pc.0, INITIAL_PC + 2);
}

#[test]
fn movem_predecrement_order_and_writeback() {
    // MOVEM.L D0/D1/A0,-(A1)
    let (mut cpu, mut bus) = boot(&[0x48E1, 0xC080]);
    cpu.set_register(reg::D0, 0x1111_1111);
    cpu.set_register(reg::D0 + 1, 0x2222_2222);
    cpu.set_register(reg::A0, 0x3333_3333);
    cpu.set_register(reg::A0 + 1, 0x4000);

    cpu.step(&mut bus);

    assert_eq!(cpu.get_register(reg::A0 + 1), 0x4000 - 12);
    assert_eq!(bus.long(0x3FFC), 0x3333_3333); // Highest register first.
    assert_eq!(bus.long(0x3FF8), 0x2222_2222);
    assert_eq!(bus.long(0x3FF4), 0x1111_1111);
}

#[test]
fn movem_memory_to_register_sign_extends_words() {
    // MOVEM.W (A1)+,D0/D1
    let (mut cpu, mut bus) = boot(&[0x4C99, 0x0003]);
    cpu.set_register(reg::A0 + 1, 0x4000);
    bus.write_word(0x4000, 0x8001);
    bus.write_word(0x4002, 0x7FFF);

    cpu.step(&mut bus);

    assert_eq!(cpu.get_register(reg::D0), 0xFFFF_8001);
    assert_eq!(cpu.get_register(reg::D0 + 1), 0x0000_7FFF);
    assert_eq!(cpu.get_register(reg::A0 + 1), 0x4004);
}

#[test]
fn tas_goes_through_the_rmw_cycle() {
    let (mut cpu, mut bus) = boot(&[0x4AF8, 0x2000]); // TAS ($2000).W
    bus.ram[0x2000] = 0x42;

    cpu.step(&mut bus);

    assert_eq!(bus.rmw_count, 1);
    assert_eq!(bus.ram[0x2000], 0xC2);
    assert!(!cpu.regs.sr.n);
    assert!(!cpu.regs.sr.z);
}

#[test]
fn link_and_unlk() {
    let (mut cpu, mut bus) = boot(&[0x4E56, 0xFFF8, 0x4E5E]); // LINK A6,#-8; UNLK A6
    cpu.set_register(reg::A0 + 6, 0x1234_5678);

    cpu.step(&mut bus);
    assert_eq!(bus.long(INITIAL_SSP - 4), 0x1234_5678); // Old A6 on the stack.
    assert_eq!(cpu.get_register(reg::A0 + 6), INITIAL_SSP - 4);
    assert_eq!(cpu.regs.a(7), INITIAL_SSP - 4 - 8);

    cpu.step(&mut bus);
    assert_eq!(cpu.get_register(reg::A0 + 6), 0x1234_5678);
    assert_eq!(cpu.regs.a(7), INITIAL_SSP);
}

#[test]
fn bsr_pushes_return_address_and_rts_pops_it() {
    let mut program = vec![0x6100, 0x000E]; // BSR.W to INITIAL_PC + 0x10
    program.resize(8, NOP);
    program.push(0x4E75); // RTS at INITIAL_PC + 0x10
    let (mut cpu, mut bus) = boot(&program);

    cpu.step(&mut bus);
    assert_eq!(cpu.regs.pc.0, INITIAL_PC + 0x10);
    assert_eq!(bus.long(INITIAL_SSP - 4), INITIAL_PC + 4);

    cpu.step(&mut bus);
    assert_eq!(cpu.regs.pc.0, INITIAL_PC + 4);
    assert_eq!(cpu.regs.a(7), INITIAL_SSP);
}

#[test]
fn conditional_branches() {
    // MOVEQ #1,D0; BNE.B +4
    let (mut cpu, mut bus) = boot(&[0x7001, 0x6604]);
    cpu.step(&mut bus);
    cpu.step(&mut bus);
    assert_eq!(cpu.regs.pc.0, INITIAL_PC + 8);

    // MOVEQ #0,D0; BNE.B +4 falls through.
    let (mut cpu, mut bus) = boot(&[0x7000, 0x6604]);
    cpu.step(&mut bus);
    cpu.step(&mut bus);
    assert_eq!(cpu.regs.pc.0, INITIAL_PC + 4);
}

#[test]
fn dbf_counts_down_to_minus_one() {
    let (mut cpu, mut bus) = boot(&[0x51C8, 0xFFFE]); // DBF D0,*
    cpu.set_register(reg::D0, 3);

    for _ in 0..3 {
        cpu.step(&mut bus);
        assert_eq!(cpu.regs.pc.0, INITIAL_PC);
    }

    cpu.step(&mut bus); // Counter expires, falls through.
    assert_eq!(cpu.get_register(reg::D0) as u16, 0xFFFF);
    assert_eq!(cpu.regs.pc.0, INITIAL_PC + 4);
}

#[test]
fn rte_restores_sr_and_swaps_stack_pointers() {
    let (mut cpu, mut bus) = boot(&[0x4E73]); // RTE
    cpu.set_register(reg::USP, 0x3000);

    // Hand-built frame: SR word then PC long.
    let frame = INITIAL_SSP - 6;
    bus.write_word(frame, 0x0000); // User mode, all flags clear.
    bus.write_long(frame + 2, 0x2000);
    cpu.set_register(reg::A7, frame);

    cpu.step(&mut bus);

    assert_eq!(cpu.regs.pc.0, 0x2000);
    assert!(!cpu.regs.sr.s);
    assert_eq!(cpu.regs.a(7), 0x3000); // USP is live again.
    assert_eq!(cpu.get_register(reg::SSP), INITIAL_SSP);
}

#[test]
fn privileged_instruction_in_user_mode_saves_faulting_pc() {
    let (mut cpu, mut bus) = boot(&[0x46FC, 0x2700]); // MOVE #$2700,SR
    bus.write_long(8 * 4, 0x3000);
    cpu.set_register(reg::USP, 0x4000);
    cpu.set_register(reg::SR, 0x0000); // Drop to user mode.

    cpu.step(&mut bus);

    assert_eq!(cpu.regs.pc.0, 0x3000);
    assert!(cpu.regs.sr.s);
    // The stacked PC points at the faulting instruction, not past it.
    assert_eq!(bus.long(INITIAL_SSP - 4), INITIAL_PC);
    assert_eq!(bus.word(INITIAL_SSP - 6), 0x0000);
}

#[test]
fn line_a_and_line_f_vector_through_their_exceptions() {
    let (mut cpu, mut bus) = boot(&[0xA123]);
    bus.write_long(10 * 4, 0x3000);
    cpu.step(&mut bus);
    assert_eq!(cpu.regs.pc.0, 0x3000);
    assert_eq!(bus.long(INITIAL_SSP - 4), INITIAL_PC);

    let (mut cpu, mut bus) = boot(&[0xF123]);
    bus.write_long(11 * 4, 0x3000);
    cpu.step(&mut bus);
    assert_eq!(cpu.regs.pc.0, 0x3000);
}

#[test]
fn illegal_instruction_vectors_through_4() {
    for opcode in [0x4AFC, 0x4E7A] { // ILLEGAL, and MOVEC which the 68000 lacks.
        let (mut cpu, mut bus) = boot(&[opcode]);
        bus.write_long(4 * 4, 0x3000);
        cpu.step(&mut bus);
        assert_eq!(cpu.regs.pc.0, 0x3000, "opcode {opcode:#06X}");
        assert_eq!(bus.long(INITIAL_SSP - 4), INITIAL_PC);
    }
}

#[test]
fn trace_fires_once_after_the_instruction() {
    let (mut cpu, mut bus) = boot(&[NOP, NOP]);
    bus.write_long(9 * 4, 0x3000);
    cpu.set_register(reg::SR, 0xA700); // T set, supervisor.

    cpu.step(&mut bus);

    assert_eq!(cpu.regs.pc.0, 0x3000);
    assert!(!cpu.regs.sr.t); // T is clear in the handler.
    assert_eq!(bus.long(INITIAL_SSP - 4), INITIAL_PC + 2);
    assert_eq!(bus.word(INITIAL_SSP - 6), 0xA700);
}

#[test]
fn chk_traps_out_of_bounds_values() {
    let (mut cpu, mut bus) = boot(&[0x41BC, 0x000A]); // CHK.W #10,D0
    bus.write_long(6 * 4, 0x3000);
    cpu.set_register(reg::D0, 20);
    cpu.step(&mut bus);
    assert_eq!(cpu.regs.pc.0, 0x3000);
    assert_eq!(bus.long(INITIAL_SSP - 4), INITIAL_PC + 4);

    let (mut cpu, mut bus) = boot(&[0x41BC, 0x000A]);
    cpu.set_register(reg::D0, 5);
    cpu.step(&mut bus);
    assert_eq!(cpu.regs.pc.0, INITIAL_PC + 4); // In bounds, no trap.
}

#[test]
fn addx_only_clears_zero_on_nonzero_results() {
    // MOVEQ #0,D0 sets Z; ADDX.L D0,D1 with a zero result must keep it.
    let (mut cpu, mut bus) = boot(&[0x7000, 0xD380]);
    cpu.set_register(reg::D0 + 1, 0);
    cpu.step(&mut bus);
    cpu.step(&mut bus);
    assert!(cpu.regs.sr.z);

    // A nonzero result clears it.
    let (mut cpu, mut bus) = boot(&[0x7000, 0xD380]);
    cpu.set_register(reg::D0 + 1, 1);
    cpu.step(&mut bus);
    cpu.step(&mut bus);
    assert!(!cpu.regs.sr.z);
}

#[test]
fn reset_instruction_pulses_the_bus_line() {
    let (mut cpu, mut bus) = boot(&[0x4E70]); // RESET
    let a7 = cpu.regs.a(7);

    cpu.step(&mut bus);

    assert_eq!(bus.reset_pulses, [true, false]);
    assert_eq!(cpu.regs.pc.0, INITIAL_PC + 2); // The CPU itself is untouched.
    assert_eq!(cpu.regs.a(7), a7);
}

#[test]
fn external_halt_idles_the_clock() {
    let (mut cpu, mut bus) = boot(&[NOP, NOP]);

    cpu.set_ext_halted(true);
    let t = cpu.timestamp;
    cpu.run(&mut bus, t + 100);
    assert_eq!(cpu.timestamp, t + 4);
    assert_eq!(cpu.regs.pc.0, INITIAL_PC);

    cpu.set_ext_halted(false);
    cpu.run(&mut bus, cpu.timestamp + 8);
    assert!(cpu.regs.pc.0 > INITIAL_PC);
}

#[test]
fn host_requested_dtack_halt() {
    let (mut cpu, mut bus) = boot(&[NOP, NOP]);

    cpu.set_dtack_halted(true);
    let t = cpu.timestamp;
    cpu.run(&mut bus, t + 100);
    assert_eq!(cpu.timestamp, t + 4);

    cpu.set_dtack_halted(false);
    assert_eq!(cpu.pending() & event::DTACKHALTED, 0);
}

#[test]
fn bus_error_pushes_a_short_error_frame() {
    // MOVE.L ($FF0000).L,D0 reads outside the 64 KiB RAM.
    let (mut cpu, mut bus) = boot(&[0x2039, 0x00FF, 0x0000]);
    bus.write_long(2 * 4, 0x3000);

    cpu.step(&mut bus);
    assert!(cpu.pending() & event::BUS != 0);

    cpu.run(&mut bus, cpu.timestamp + 1000);

    assert_eq!(cpu.pending() & event::BUS, 0);
    assert_eq!(cpu.regs.pc.0, 0x3000);
    // Standard frame plus the three stub words.
    assert_eq!(cpu.regs.a(7), INITIAL_SSP - 14);
}

#[test]
fn address_error_on_odd_word_access() {
    let (mut cpu, mut bus) = boot(&[0x3038, 0x1001]); // MOVE.W ($1001).W,D0
    bus.write_long(3 * 4, 0x3000);

    cpu.step(&mut bus);
    assert!(cpu.pending() & event::ADDRESS != 0);

    cpu.run(&mut bus, cpu.timestamp + 1000);

    assert_eq!(cpu.pending() & event::ADDRESS, 0);
    assert_eq!(cpu.regs.pc.0, 0x3000);
    assert_eq!(cpu.regs.a(7), INITIAL_SSP - 14);
}

#[test]
fn timestamp_is_monotonic_across_runs() {
    let (mut cpu, mut bus) = boot(&[0x51C8, 0xFFFE]); // DBF D0,* spins forever.
    cpu.set_register(reg::D0, 0xFFFF);

    let mut last = cpu.timestamp;
    for _ in 0..50 {
        cpu.run(&mut bus, last + 16);
        assert!(cpu.timestamp >= last);
        last = cpu.timestamp;
    }
}

#[test]
fn swap_exchanges_register_halves() {
    let (mut cpu, mut bus) = boot(&[0x4840]); // SWAP D0
    cpu.set_register(reg::D0, 0x1234_5678);

    cpu.step(&mut bus);

    assert_eq!(cpu.get_register(reg::D0), 0x5678_1234);
    assert!(!cpu.regs.sr.n);
    assert!(!cpu.regs.sr.z);
}
