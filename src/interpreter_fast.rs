// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::{M68K, MemoryAccess, event};
use crate::exception::Vector;
use crate::instruction::*;
use crate::interpreter::{BitOp, InterpreterResult, ShiftKind};
use crate::isa::Isa;

use std::marker::PhantomData;

impl M68K {
    /// Runs the core until the timestamp reaches `run_until_time`.
    ///
    /// Pending events are serviced before each instruction, in decreasing
    /// priority: reset, then bus/address errors, then interrupts. The method
    /// returns to the caller after servicing any of them so the surrounding
    /// machine can observe the acknowledge side effects. While stopped or
    /// halted the timestamp idles forward in 4-cycle chunks.
    pub fn run<M: MemoryAccess + ?Sized>(&mut self, memory: &mut M, run_until_time: i64) {
        while self.timestamp < run_until_time {
            if self.xpending != 0 {
                if self.xpending & event::HALTED == 0 {
                    if self.xpending & (event::RESET | event::ADDRESS | event::BUS) != 0 {
                        if self.xpending & event::RESET != 0 {
                            self.service_reset(memory);
                            self.xpending &= !event::RESET;
                        } else {
                            let vector = if self.xpending & event::BUS != 0 {
                                Vector::AccessError
                            } else {
                                Vector::AddressError
                            };

                            if self.enter_exception(memory, vector as u8, false).is_err() {
                                // A fault while stacking a bus or address
                                // error frame is a double fault.
                                log::warn!("double fault at {:#010X}, core halted", self.regs.pc.0);
                                self.xpending |= event::ERRORHALTED;
                            }
                            // Only cleared once the frame is fully stacked.
                            self.xpending &= !(event::BUS | event::ADDRESS);
                        }

                        return;
                    } else if self.xpending & (event::INT | event::NMI) != 0 {
                        debug_assert!(self.ipl == 7 || self.ipl > self.regs.sr.interrupt_mask);
                        self.xpending &= !(event::STOPPED | event::INT | event::NMI);

                        if let Err(e) = self.enter_exception(memory, 0, true) {
                            self.dispatch_fault(memory, e);
                        }

                        return;
                    }
                }

                // STOP and external/error halts idle here.
                self.timestamp += 4;
                return;
            }

            self.step(memory);
        }
    }

    /// Fetches, decodes and executes a single instruction, including any
    /// exception it raises.
    ///
    /// Pending events are not serviced here; [Self::run] is the driver that
    /// honors them.
    pub fn step<M: MemoryAccess + ?Sized>(&mut self, memory: &mut M) {
        self.instr_pc = self.regs.pc.0;

        let opcode = match self.read_op(memory) {
            Ok(op) => op,
            Err(e) => {
                self.dispatch_fault(memory, e);
                return;
            },
        };
        self.current_opcode = opcode;
        let isa = Isa::from(opcode);

        let trace = self.regs.sr.t;
        match Execute::<M>::EXECUTE[isa as usize](self, memory) {
            Ok(cycles) => {
                self.timestamp += cycles as i64;

                if trace && !isa.is_privileged() {
                    if let Err(e) = self.enter_exception(memory, Vector::Trace as u8, false) {
                        self.dispatch_fault(memory, e);
                    }
                }
            },
            Err(vector) => self.dispatch_fault(memory, vector),
        }
    }

    fn fast_unknown<M: MemoryAccess + ?Sized>(&mut self, _: &mut M) -> InterpreterResult {
        self.execute_unknown_instruction()
    }

    fn fast_abcd<M: MemoryAccess + ?Sized>(&mut self, memory: &mut M) -> InterpreterResult {
        let (rx, _, mode, ry) = register_size_mode_register(self.current_opcode);
        self.execute_abcd(memory, rx, mode, ry)
    }

    fn fast_add<M: MemoryAccess + ?Sized>(&mut self, memory: &mut M) -> InterpreterResult {
        let opcode = self.current_opcode;
        let (reg, dir, size) = register_direction_size(opcode);
        let (mode, eareg) = effective_address_field(opcode);
        let am = self.decode_am(memory, mode, eareg, Some(size))?;
        self.execute_add(memory, reg, dir, size, am)
    }

    fn fast_adda<M: MemoryAccess + ?Sized>(&mut self, memory: &mut M) -> InterpreterResult {
        let opcode = self.current_opcode;
        let (reg, size) = register_size_opmode(opcode);
        let (mode, eareg) = effective_address_field(opcode);
        let am = self.decode_am(memory, mode, eareg, Some(size))?;
        self.execute_adda(memory, reg, size, am)
    }

    /// Fetches the immediate operand of the ALU-immediate instructions.
    /// Byte and word operands take one extension word, longs take two.
    fn immediate_operand<M: MemoryAccess + ?Sized>(&mut self, memory: &mut M, size: Size) -> Result<u32, u8> {
        if size.is_long() {
            let high = (self.read_op(memory)? as u32) << 16;
            Ok(high | self.read_op(memory)? as u32)
        } else {
            Ok(self.read_op(memory)? as u32)
        }
    }

    fn fast_addi<M: MemoryAccess + ?Sized>(&mut self, memory: &mut M) -> InterpreterResult {
        let opcode = self.current_opcode;
        let size = Size::from(opcode >> 6 & 3);
        let imm = self.immediate_operand(memory, size)?;
        let (mode, eareg) = effective_address_field(opcode);
        let am = self.decode_am(memory, mode, eareg, Some(size))?;
        self.execute_addi(memory, size, am, imm)
    }

    fn fast_addq<M: MemoryAccess + ?Sized>(&mut self, memory: &mut M) -> InterpreterResult {
        let opcode = self.current_opcode;
        let (imm, size) = data_size(opcode);
        let (mode, eareg) = effective_address_field(opcode);
        let am = self.decode_am(memory, mode, eareg, Some(size))?;
        self.execute_addq(memory, imm, size, am)
    }

    fn fast_addx<M: MemoryAccess + ?Sized>(&mut self, memory: &mut M) -> InterpreterResult {
        let (rx, size, mode, ry) = register_size_mode_register(self.current_opcode);
        self.execute_addx(memory, rx, size, mode, ry)
    }

    fn fast_and<M: MemoryAccess + ?Sized>(&mut self, memory: &mut M) -> InterpreterResult {
        let opcode = self.current_opcode;
        let (reg, dir, size) = register_direction_size(opcode);
        let (mode, eareg) = effective_address_field(opcode);
        let am = self.decode_am(memory, mode, eareg, Some(size))?;
        self.execute_and(memory, reg, dir, size, am)
    }

    fn fast_andi<M: MemoryAccess + ?Sized>(&mut self, memory: &mut M) -> InterpreterResult {
        let opcode = self.current_opcode;
        let size = Size::from(opcode >> 6 & 3);
        let imm = self.immediate_operand(memory, size)?;
        let (mode, eareg) = effective_address_field(opcode);
        let am = self.decode_am(memory, mode, eareg, Some(size))?;
        self.execute_andi(memory, size, am, imm)
    }

    fn fast_andiccr<M: MemoryAccess + ?Sized>(&mut self, memory: &mut M) -> InterpreterResult {
        let imm = self.read_op(memory)?;
        self.execute_andiccr(imm)
    }

    fn fast_andisr<M: MemoryAccess + ?Sized>(&mut self, memory: &mut M) -> InterpreterResult {
        let imm = self.read_op(memory)?;
        self.execute_andisr(imm)
    }

    fn fast_asm<M: MemoryAccess + ?Sized>(&mut self, memory: &mut M) -> InterpreterResult {
        let opcode = self.current_opcode;
        let dir = shift_direction(opcode);
        let (mode, eareg) = effective_address_field(opcode);
        let am = self.decode_am(memory, mode, eareg, Some(Size::Word))?;
        self.execute_shift_memory(memory, ShiftKind::Arithmetic, dir, am)
    }

    fn fast_asr<M: MemoryAccess + ?Sized>(&mut self, _: &mut M) -> InterpreterResult {
        let (rot, dir, size, mode, reg) = rotation_direction_size_mode_register(self.current_opcode);
        self.execute_shift_register(ShiftKind::Arithmetic, rot, dir, size, mode, reg)
    }

    /// Fetches the displacement of a branch: taken from the low opcode byte,
    /// or from an extension word when that byte is zero.
    fn branch_displacement<M: MemoryAccess + ?Sized>(&mut self, memory: &mut M) -> Result<(u32, i16), u8> {
        let pc = self.regs.pc.0;
        let disp = if self.current_opcode as u8 == 0 {
            self.read_op(memory)? as i16
        } else {
            self.current_opcode as u8 as i8 as i16
        };
        Ok((pc, disp))
    }

    fn fast_bcc<M: MemoryAccess + ?Sized>(&mut self, memory: &mut M) -> InterpreterResult {
        let condition = (self.current_opcode >> 8 & 0xF) as u8;
        let (pc, disp) = self.branch_displacement(memory)?;
        self.execute_bcc(pc, condition, disp)
    }

    /// Fetches the bit number of the bit manipulation instructions: a
    /// register field for the dynamic forms, an extension word otherwise.
    fn bit_count<M: MemoryAccess + ?Sized>(&mut self, memory: &mut M) -> Result<u8, u8> {
        if self.current_opcode & 0x0100 != 0 {
            Ok((self.current_opcode >> 9 & 7) as u8)
        } else {
            Ok(self.read_op(memory)? as u8)
        }
    }

    fn fast_bchg<M: MemoryAccess + ?Sized>(&mut self, memory: &mut M) -> InterpreterResult {
        let count = self.bit_count(memory)?;
        let (mode, eareg) = effective_address_field(self.current_opcode);
        let am = self.decode_am(memory, mode, eareg, Some(Size::Byte))?;
        self.execute_bit_op(memory, am, count, BitOp::Change)
    }

    fn fast_bclr<M: MemoryAccess + ?Sized>(&mut self, memory: &mut M) -> InterpreterResult {
        let count = self.bit_count(memory)?;
        let (mode, eareg) = effective_address_field(self.current_opcode);
        let am = self.decode_am(memory, mode, eareg, Some(Size::Byte))?;
        self.execute_bit_op(memory, am, count, BitOp::Clear)
    }

    fn fast_bra<M: MemoryAccess + ?Sized>(&mut self, memory: &mut M) -> InterpreterResult {
        let (pc, disp) = self.branch_displacement(memory)?;
        self.execute_bra(pc, disp)
    }

    fn fast_bset<M: MemoryAccess + ?Sized>(&mut self, memory: &mut M) -> InterpreterResult {
        let count = self.bit_count(memory)?;
        let (mode, eareg) = effective_address_field(self.current_opcode);
        let am = self.decode_am(memory, mode, eareg, Some(Size::Byte))?;
        self.execute_bit_op(memory, am, count, BitOp::Set)
    }

    fn fast_bsr<M: MemoryAccess + ?Sized>(&mut self, memory: &mut M) -> InterpreterResult {
        let (pc, disp) = self.branch_displacement(memory)?;
        self.execute_bsr(memory, pc, disp)
    }

    fn fast_btst<M: MemoryAccess + ?Sized>(&mut self, memory: &mut M) -> InterpreterResult {
        let count = self.bit_count(memory)?;
        let (mode, eareg) = effective_address_field(self.current_opcode);
        let am = self.decode_am(memory, mode, eareg, Some(Size::Byte))?;
        self.execute_bit_op(memory, am, count, BitOp::Test)
    }

    fn fast_chk<M: MemoryAccess + ?Sized>(&mut self, memory: &mut M) -> InterpreterResult {
        let opcode = self.current_opcode;
        let reg = (opcode >> 9 & 7) as u8;
        let (mode, eareg) = effective_address_field(opcode);
        let am = self.decode_am(memory, mode, eareg, Some(Size::Word))?;
        self.execute_chk(memory, reg, am)
    }

    fn fast_clr<M: MemoryAccess + ?Sized>(&mut self, memory: &mut M) -> InterpreterResult {
        let opcode = self.current_opcode;
        let size = Size::from(opcode >> 6 & 3);
        let (mode, eareg) = effective_address_field(opcode);
        let am = self.decode_am(memory, mode, eareg, Some(size))?;
        self.execute_clr(memory, size, am)
    }

    fn fast_cmp<M: MemoryAccess + ?Sized>(&mut self, memory: &mut M) -> InterpreterResult {
        let opcode = self.current_opcode;
        let (reg, _, size) = register_direction_size(opcode);
        let (mode, eareg) = effective_address_field(opcode);
        let am = self.decode_am(memory, mode, eareg, Some(size))?;
        self.execute_cmp(memory, reg, size, am)
    }

    fn fast_cmpa<M: MemoryAccess + ?Sized>(&mut self, memory: &mut M) -> InterpreterResult {
        let opcode = self.current_opcode;
        let (reg, size) = register_size_opmode(opcode);
        let (mode, eareg) = effective_address_field(opcode);
        let am = self.decode_am(memory, mode, eareg, Some(size))?;
        self.execute_cmpa(memory, reg, size, am)
    }

    fn fast_cmpi<M: MemoryAccess + ?Sized>(&mut self, memory: &mut M) -> InterpreterResult {
        let opcode = self.current_opcode;
        let size = Size::from(opcode >> 6 & 3);
        let imm = self.immediate_operand(memory, size)?;
        let (mode, eareg) = effective_address_field(opcode);
        let am = self.decode_am(memory, mode, eareg, Some(size))?;
        self.execute_cmpi(memory, size, am, imm)
    }

    fn fast_cmpm<M: MemoryAccess + ?Sized>(&mut self, memory: &mut M) -> InterpreterResult {
        let (ax, size, ay) = register_size_register(self.current_opcode);
        self.execute_cmpm(memory, ax, size, ay)
    }

    fn fast_dbcc<M: MemoryAccess + ?Sized>(&mut self, memory: &mut M) -> InterpreterResult {
        let opcode = self.current_opcode;
        let cc = (opcode >> 8 & 0xF) as u8;
        let reg = (opcode & 7) as u8;
        let pc = self.regs.pc.0;
        let disp = self.read_op(memory)? as i16;
        self.execute_dbcc(pc, cc, reg, disp)
    }

    fn fast_divs<M: MemoryAccess + ?Sized>(&mut self, memory: &mut M) -> InterpreterResult {
        let opcode = self.current_opcode;
        let reg = (opcode >> 9 & 7) as u8;
        let (mode, eareg) = effective_address_field(opcode);
        let am = self.decode_am(memory, mode, eareg, Some(Size::Word))?;
        self.execute_divs(memory, reg, am)
    }

    fn fast_divu<M: MemoryAccess + ?Sized>(&mut self, memory: &mut M) -> InterpreterResult {
        let opcode = self.current_opcode;
        let reg = (opcode >> 9 & 7) as u8;
        let (mode, eareg) = effective_address_field(opcode);
        let am = self.decode_am(memory, mode, eareg, Some(Size::Word))?;
        self.execute_divu(memory, reg, am)
    }

    fn fast_eor<M: MemoryAccess + ?Sized>(&mut self, memory: &mut M) -> InterpreterResult {
        let opcode = self.current_opcode;
        let (reg, _, size) = register_direction_size(opcode);
        let (mode, eareg) = effective_address_field(opcode);
        let am = self.decode_am(memory, mode, eareg, Some(size))?;
        self.execute_eor(memory, reg, size, am)
    }

    fn fast_eori<M: MemoryAccess + ?Sized>(&mut self, memory: &mut M) -> InterpreterResult {
        let opcode = self.current_opcode;
        let size = Size::from(opcode >> 6 & 3);
        let imm = self.immediate_operand(memory, size)?;
        let (mode, eareg) = effective_address_field(opcode);
        let am = self.decode_am(memory, mode, eareg, Some(size))?;
        self.execute_eori(memory, size, am, imm)
    }

    fn fast_eoriccr<M: MemoryAccess + ?Sized>(&mut self, memory: &mut M) -> InterpreterResult {
        let imm = self.read_op(memory)?;
        self.execute_eoriccr(imm)
    }

    fn fast_eorisr<M: MemoryAccess + ?Sized>(&mut self, memory: &mut M) -> InterpreterResult {
        let imm = self.read_op(memory)?;
        self.execute_eorisr(imm)
    }

    fn fast_exg<M: MemoryAccess + ?Sized>(&mut self, _: &mut M) -> InterpreterResult {
        let (rx, mode, ry) = register_opmode_register(self.current_opcode);
        self.execute_exg(rx, mode, ry)
    }

    fn fast_ext<M: MemoryAccess + ?Sized>(&mut self, _: &mut M) -> InterpreterResult {
        let opcode = self.current_opcode;
        let opmode = (opcode >> 6 & 7) as u8;
        let reg = (opcode & 7) as u8;
        self.execute_ext(opmode, reg)
    }

    fn fast_illegal<M: MemoryAccess + ?Sized>(&mut self, _: &mut M) -> InterpreterResult {
        self.execute_illegal()
    }

    fn fast_jmp<M: MemoryAccess + ?Sized>(&mut self, memory: &mut M) -> InterpreterResult {
        let (mode, eareg) = effective_address_field(self.current_opcode);
        let am = self.decode_am(memory, mode, eareg, None)?;
        self.execute_jmp(am)
    }

    fn fast_jsr<M: MemoryAccess + ?Sized>(&mut self, memory: &mut M) -> InterpreterResult {
        let (mode, eareg) = effective_address_field(self.current_opcode);
        let am = self.decode_am(memory, mode, eareg, None)?;
        self.execute_jsr(memory, am)
    }

    fn fast_lea<M: MemoryAccess + ?Sized>(&mut self, memory: &mut M) -> InterpreterResult {
        let opcode = self.current_opcode;
        let reg = (opcode >> 9 & 7) as u8;
        let (mode, eareg) = effective_address_field(opcode);
        let am = self.decode_am(memory, mode, eareg, None)?;
        self.execute_lea(reg, am)
    }

    fn fast_linea<M: MemoryAccess + ?Sized>(&mut self, _: &mut M) -> InterpreterResult {
        self.execute_linea()
    }

    fn fast_linef<M: MemoryAccess + ?Sized>(&mut self, _: &mut M) -> InterpreterResult {
        self.execute_linef()
    }

    fn fast_link<M: MemoryAccess + ?Sized>(&mut self, memory: &mut M) -> InterpreterResult {
        let reg = (self.current_opcode & 7) as u8;
        let disp = self.read_op(memory)? as i16;
        self.execute_link(memory, reg, disp)
    }

    fn fast_lsm<M: MemoryAccess + ?Sized>(&mut self, memory: &mut M) -> InterpreterResult {
        let opcode = self.current_opcode;
        let dir = shift_direction(opcode);
        let (mode, eareg) = effective_address_field(opcode);
        let am = self.decode_am(memory, mode, eareg, Some(Size::Word))?;
        self.execute_shift_memory(memory, ShiftKind::Logical, dir, am)
    }

    fn fast_lsr<M: MemoryAccess + ?Sized>(&mut self, _: &mut M) -> InterpreterResult {
        let (rot, dir, size, mode, reg) = rotation_direction_size_mode_register(self.current_opcode);
        self.execute_shift_register(ShiftKind::Logical, rot, dir, size, mode, reg)
    }

    fn fast_move<M: MemoryAccess + ?Sized>(&mut self, memory: &mut M) -> InterpreterResult {
        let (size, dst_mode, dst_reg, src_mode, src_reg) = move_operands(self.current_opcode);
        // The source extension words precede the destination's.
        let amsrc = self.decode_am(memory, src_mode, src_reg, Some(size))?;
        let amdst = self.decode_am(memory, dst_mode, dst_reg, Some(size))?;
        self.execute_move(memory, size, amdst, amsrc)
    }

    fn fast_movea<M: MemoryAccess + ?Sized>(&mut self, memory: &mut M) -> InterpreterResult {
        let (size, _, dst_reg, src_mode, src_reg) = move_operands(self.current_opcode);
        let am = self.decode_am(memory, src_mode, src_reg, Some(size))?;
        self.execute_movea(memory, size, dst_reg, am)
    }

    fn fast_moveccr<M: MemoryAccess + ?Sized>(&mut self, memory: &mut M) -> InterpreterResult {
        let (mode, eareg) = effective_address_field(self.current_opcode);
        let am = self.decode_am(memory, mode, eareg, Some(Size::Word))?;
        self.execute_moveccr(memory, am)
    }

    fn fast_movefsr<M: MemoryAccess + ?Sized>(&mut self, memory: &mut M) -> InterpreterResult {
        let (mode, eareg) = effective_address_field(self.current_opcode);
        let am = self.decode_am(memory, mode, eareg, Some(Size::Word))?;
        self.execute_movefsr(memory, am)
    }

    fn fast_movesr<M: MemoryAccess + ?Sized>(&mut self, memory: &mut M) -> InterpreterResult {
        let (mode, eareg) = effective_address_field(self.current_opcode);
        let am = self.decode_am(memory, mode, eareg, Some(Size::Word))?;
        self.execute_movesr(memory, am)
    }

    fn fast_moveusp<M: MemoryAccess + ?Sized>(&mut self, _: &mut M) -> InterpreterResult {
        let opcode = self.current_opcode;
        let dir = if opcode & 1 << 3 != 0 { Direction::UspToRegister } else { Direction::RegisterToUsp };
        let reg = (opcode & 7) as u8;
        self.execute_moveusp(dir, reg)
    }

    fn fast_movem<M: MemoryAccess + ?Sized>(&mut self, memory: &mut M) -> InterpreterResult {
        let opcode = self.current_opcode;
        let (dir, size) = movem_direction_size(opcode);
        let list = self.read_op(memory)?;
        let (mode, eareg) = effective_address_field(opcode);
        let am = self.decode_am(memory, mode, eareg, Some(size))?;
        self.execute_movem(memory, dir, size, am, list)
    }

    fn fast_movep<M: MemoryAccess + ?Sized>(&mut self, memory: &mut M) -> InterpreterResult {
        let (data, dir, size, addr) = movep_operands(self.current_opcode);
        let disp = self.read_op(memory)? as i16;
        self.execute_movep(memory, data, dir, size, addr, disp)
    }

    fn fast_moveq<M: MemoryAccess + ?Sized>(&mut self, _: &mut M) -> InterpreterResult {
        let opcode = self.current_opcode;
        let reg = (opcode >> 9 & 7) as u8;
        self.execute_moveq(reg, opcode as i8)
    }

    fn fast_muls<M: MemoryAccess + ?Sized>(&mut self, memory: &mut M) -> InterpreterResult {
        let opcode = self.current_opcode;
        let reg = (opcode >> 9 & 7) as u8;
        let (mode, eareg) = effective_address_field(opcode);
        let am = self.decode_am(memory, mode, eareg, Some(Size::Word))?;
        self.execute_muls(memory, reg, am)
    }

    fn fast_mulu<M: MemoryAccess + ?Sized>(&mut self, memory: &mut M) -> InterpreterResult {
        let opcode = self.current_opcode;
        let reg = (opcode >> 9 & 7) as u8;
        let (mode, eareg) = effective_address_field(opcode);
        let am = self.decode_am(memory, mode, eareg, Some(Size::Word))?;
        self.execute_mulu(memory, reg, am)
    }

    fn fast_nbcd<M: MemoryAccess + ?Sized>(&mut self, memory: &mut M) -> InterpreterResult {
        let (mode, eareg) = effective_address_field(self.current_opcode);
        let am = self.decode_am(memory, mode, eareg, Some(Size::Byte))?;
        self.execute_nbcd(memory, am)
    }

    fn fast_neg<M: MemoryAccess + ?Sized>(&mut self, memory: &mut M) -> InterpreterResult {
        let opcode = self.current_opcode;
        let size = Size::from(opcode >> 6 & 3);
        let (mode, eareg) = effective_address_field(opcode);
        let am = self.decode_am(memory, mode, eareg, Some(size))?;
        self.execute_neg(memory, size, am)
    }

    fn fast_negx<M: MemoryAccess + ?Sized>(&mut self, memory: &mut M) -> InterpreterResult {
        let opcode = self.current_opcode;
        let size = Size::from(opcode >> 6 & 3);
        let (mode, eareg) = effective_address_field(opcode);
        let am = self.decode_am(memory, mode, eareg, Some(size))?;
        self.execute_negx(memory, size, am)
    }

    fn fast_nop<M: MemoryAccess + ?Sized>(&mut self, _: &mut M) -> InterpreterResult {
        self.execute_nop()
    }

    fn fast_not<M: MemoryAccess + ?Sized>(&mut self, memory: &mut M) -> InterpreterResult {
        let opcode = self.current_opcode;
        let size = Size::from(opcode >> 6 & 3);
        let (mode, eareg) = effective_address_field(opcode);
        let am = self.decode_am(memory, mode, eareg, Some(size))?;
        self.execute_not(memory, size, am)
    }

    fn fast_or<M: MemoryAccess + ?Sized>(&mut self, memory: &mut M) -> InterpreterResult {
        let opcode = self.current_opcode;
        let (reg, dir, size) = register_direction_size(opcode);
        let (mode, eareg) = effective_address_field(opcode);
        let am = self.decode_am(memory, mode, eareg, Some(size))?;
        self.execute_or(memory, reg, dir, size, am)
    }

    fn fast_ori<M: MemoryAccess + ?Sized>(&mut self, memory: &mut M) -> InterpreterResult {
        let opcode = self.current_opcode;
        let size = Size::from(opcode >> 6 & 3);
        let imm = self.immediate_operand(memory, size)?;
        let (mode, eareg) = effective_address_field(opcode);
        let am = self.decode_am(memory, mode, eareg, Some(size))?;
        self.execute_ori(memory, size, am, imm)
    }

    fn fast_oriccr<M: MemoryAccess + ?Sized>(&mut self, memory: &mut M) -> InterpreterResult {
        let imm = self.read_op(memory)?;
        self.execute_oriccr(imm)
    }

    fn fast_orisr<M: MemoryAccess + ?Sized>(&mut self, memory: &mut M) -> InterpreterResult {
        let imm = self.read_op(memory)?;
        self.execute_orisr(imm)
    }

    fn fast_pea<M: MemoryAccess + ?Sized>(&mut self, memory: &mut M) -> InterpreterResult {
        let (mode, eareg) = effective_address_field(self.current_opcode);
        let am = self.decode_am(memory, mode, eareg, None)?;
        self.execute_pea(memory, am)
    }

    fn fast_reset<M: MemoryAccess + ?Sized>(&mut self, memory: &mut M) -> InterpreterResult {
        self.execute_reset(memory)
    }

    fn fast_rom<M: MemoryAccess + ?Sized>(&mut self, memory: &mut M) -> InterpreterResult {
        let opcode = self.current_opcode;
        let dir = shift_direction(opcode);
        let (mode, eareg) = effective_address_field(opcode);
        let am = self.decode_am(memory, mode, eareg, Some(Size::Word))?;
        self.execute_shift_memory(memory, ShiftKind::Rotate, dir, am)
    }

    fn fast_ror<M: MemoryAccess + ?Sized>(&mut self, _: &mut M) -> InterpreterResult {
        let (rot, dir, size, mode, reg) = rotation_direction_size_mode_register(self.current_opcode);
        self.execute_shift_register(ShiftKind::Rotate, rot, dir, size, mode, reg)
    }

    fn fast_roxm<M: MemoryAccess + ?Sized>(&mut self, memory: &mut M) -> InterpreterResult {
        let opcode = self.current_opcode;
        let dir = shift_direction(opcode);
        let (mode, eareg) = effective_address_field(opcode);
        let am = self.decode_am(memory, mode, eareg, Some(Size::Word))?;
        self.execute_shift_memory(memory, ShiftKind::RotateExtend, dir, am)
    }

    fn fast_roxr<M: MemoryAccess + ?Sized>(&mut self, _: &mut M) -> InterpreterResult {
        let (rot, dir, size, mode, reg) = rotation_direction_size_mode_register(self.current_opcode);
        self.execute_shift_register(ShiftKind::RotateExtend, rot, dir, size, mode, reg)
    }

    fn fast_rte<M: MemoryAccess + ?Sized>(&mut self, memory: &mut M) -> InterpreterResult {
        self.execute_rte(memory)
    }

    fn fast_rtr<M: MemoryAccess + ?Sized>(&mut self, memory: &mut M) -> InterpreterResult {
        self.execute_rtr(memory)
    }

    fn fast_rts<M: MemoryAccess + ?Sized>(&mut self, memory: &mut M) -> InterpreterResult {
        self.execute_rts(memory)
    }

    fn fast_sbcd<M: MemoryAccess + ?Sized>(&mut self, memory: &mut M) -> InterpreterResult {
        let (ry, _, mode, rx) = register_size_mode_register(self.current_opcode);
        self.execute_sbcd(memory, ry, mode, rx)
    }

    fn fast_scc<M: MemoryAccess + ?Sized>(&mut self, memory: &mut M) -> InterpreterResult {
        let opcode = self.current_opcode;
        let cc = (opcode >> 8 & 0xF) as u8;
        let (mode, eareg) = effective_address_field(opcode);
        let am = self.decode_am(memory, mode, eareg, Some(Size::Byte))?;
        self.execute_scc(memory, cc, am)
    }

    fn fast_stop<M: MemoryAccess + ?Sized>(&mut self, memory: &mut M) -> InterpreterResult {
        let imm = self.read_op(memory)?;
        self.execute_stop(imm)
    }

    fn fast_sub<M: MemoryAccess + ?Sized>(&mut self, memory: &mut M) -> InterpreterResult {
        let opcode = self.current_opcode;
        let (reg, dir, size) = register_direction_size(opcode);
        let (mode, eareg) = effective_address_field(opcode);
        let am = self.decode_am(memory, mode, eareg, Some(size))?;
        self.execute_sub(memory, reg, dir, size, am)
    }

    fn fast_suba<M: MemoryAccess + ?Sized>(&mut self, memory: &mut M) -> InterpreterResult {
        let opcode = self.current_opcode;
        let (reg, size) = register_size_opmode(opcode);
        let (mode, eareg) = effective_address_field(opcode);
        let am = self.decode_am(memory, mode, eareg, Some(size))?;
        self.execute_suba(memory, reg, size, am)
    }

    fn fast_subi<M: MemoryAccess + ?Sized>(&mut self, memory: &mut M) -> InterpreterResult {
        let opcode = self.current_opcode;
        let size = Size::from(opcode >> 6 & 3);
        let imm = self.immediate_operand(memory, size)?;
        let (mode, eareg) = effective_address_field(opcode);
        let am = self.decode_am(memory, mode, eareg, Some(size))?;
        self.execute_subi(memory, size, am, imm)
    }

    fn fast_subq<M: MemoryAccess + ?Sized>(&mut self, memory: &mut M) -> InterpreterResult {
        let opcode = self.current_opcode;
        let (imm, size) = data_size(opcode);
        let (mode, eareg) = effective_address_field(opcode);
        let am = self.decode_am(memory, mode, eareg, Some(size))?;
        self.execute_subq(memory, imm, size, am)
    }

    fn fast_subx<M: MemoryAccess + ?Sized>(&mut self, memory: &mut M) -> InterpreterResult {
        let (ry, size, mode, rx) = register_size_mode_register(self.current_opcode);
        self.execute_subx(memory, ry, size, mode, rx)
    }

    fn fast_swap<M: MemoryAccess + ?Sized>(&mut self, _: &mut M) -> InterpreterResult {
        let reg = (self.current_opcode & 7) as u8;
        self.execute_swap(reg)
    }

    fn fast_tas<M: MemoryAccess + ?Sized>(&mut self, memory: &mut M) -> InterpreterResult {
        let (mode, eareg) = effective_address_field(self.current_opcode);
        let am = self.decode_am(memory, mode, eareg, Some(Size::Byte))?;
        self.execute_tas(memory, am)
    }

    fn fast_trap<M: MemoryAccess + ?Sized>(&mut self, _: &mut M) -> InterpreterResult {
        self.execute_trap(self.current_opcode as u8 & 0xF)
    }

    fn fast_trapv<M: MemoryAccess + ?Sized>(&mut self, _: &mut M) -> InterpreterResult {
        self.execute_trapv()
    }

    fn fast_tst<M: MemoryAccess + ?Sized>(&mut self, memory: &mut M) -> InterpreterResult {
        let opcode = self.current_opcode;
        let size = Size::from(opcode >> 6 & 3);
        let (mode, eareg) = effective_address_field(opcode);
        let am = self.decode_am(memory, mode, eareg, Some(size))?;
        self.execute_tst(memory, size, am)
    }

    fn fast_unlk<M: MemoryAccess + ?Sized>(&mut self, memory: &mut M) -> InterpreterResult {
        let reg = (self.current_opcode & 7) as u8;
        self.execute_unlk(memory, reg)
    }
}

/// Per-mnemonic dispatch table, indexed by [Isa].
pub(super) struct Execute<M: MemoryAccess + ?Sized>(PhantomData<M>);

impl<M: MemoryAccess + ?Sized> Execute<M> {
    /// The array that maps instructions to their dispatch function. Index it using the [Isa] enum.
    pub(super) const EXECUTE: [fn(&mut M68K, &mut M) -> InterpreterResult; Isa::_Size as usize] = [
        M68K::fast_unknown,
        M68K::fast_abcd,
        M68K::fast_add,
        M68K::fast_adda,
        M68K::fast_addi,
        M68K::fast_addq,
        M68K::fast_addx,
        M68K::fast_and,
        M68K::fast_andi,
        M68K::fast_andiccr,
        M68K::fast_andisr,
        M68K::fast_asm,
        M68K::fast_asr,
        M68K::fast_bcc,
        M68K::fast_bchg,
        M68K::fast_bclr,
        M68K::fast_bra,
        M68K::fast_bset,
        M68K::fast_bsr,
        M68K::fast_btst,
        M68K::fast_chk,
        M68K::fast_clr,
        M68K::fast_cmp,
        M68K::fast_cmpa,
        M68K::fast_cmpi,
        M68K::fast_cmpm,
        M68K::fast_dbcc,
        M68K::fast_divs,
        M68K::fast_divu,
        M68K::fast_eor,
        M68K::fast_eori,
        M68K::fast_eoriccr,
        M68K::fast_eorisr,
        M68K::fast_exg,
        M68K::fast_ext,
        M68K::fast_illegal,
        M68K::fast_jmp,
        M68K::fast_jsr,
        M68K::fast_lea,
        M68K::fast_linea,
        M68K::fast_linef,
        M68K::fast_link,
        M68K::fast_lsm,
        M68K::fast_lsr,
        M68K::fast_move,
        M68K::fast_movea,
        M68K::fast_moveccr,
        M68K::fast_movefsr,
        M68K::fast_movesr,
        M68K::fast_moveusp,
        M68K::fast_movem,
        M68K::fast_movep,
        M68K::fast_moveq,
        M68K::fast_muls,
        M68K::fast_mulu,
        M68K::fast_nbcd,
        M68K::fast_neg,
        M68K::fast_negx,
        M68K::fast_nop,
        M68K::fast_not,
        M68K::fast_or,
        M68K::fast_ori,
        M68K::fast_oriccr,
        M68K::fast_orisr,
        M68K::fast_pea,
        M68K::fast_reset,
        M68K::fast_rom,
        M68K::fast_ror,
        M68K::fast_roxm,
        M68K::fast_roxr,
        M68K::fast_rte,
        M68K::fast_rtr,
        M68K::fast_rts,
        M68K::fast_sbcd,
        M68K::fast_scc,
        M68K::fast_stop,
        M68K::fast_sub,
        M68K::fast_suba,
        M68K::fast_subi,
        M68K::fast_subq,
        M68K::fast_subx,
        M68K::fast_swap,
        M68K::fast_tas,
        M68K::fast_trap,
        M68K::fast_trapv,
        M68K::fast_tst,
        M68K::fast_unlk,
    ];
}
