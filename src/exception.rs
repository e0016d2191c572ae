// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Exception processing.

use crate::{M68K, MemoryAccess, event};
use crate::memory_access::GetResult;
use crate::timing;

/// Constant equal to the AccessError vector.
pub const ACCESS_ERROR: u8 = Vector::AccessError as u8;
/// Constant equal to the AddressError vector.
pub const ADDRESS_ERROR: u8 = Vector::AddressError as u8;

/// Exception vectors of the 68000.
///
/// You can directly cast the enum to u8 to get the vector number.
/// ```
/// use m68k_core::exception::Vector;
/// assert_eq!(Vector::AccessError as u8, 2);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[non_exhaustive]
pub enum Vector {
    ResetSspPc = 0,
    /// Bus error. Sent when the accessed address is not in the memory range of the system.
    AccessError = 2,
    AddressError,
    IllegalInstruction,
    ZeroDivide,
    ChkInstruction,
    TrapVInstruction,
    PrivilegeViolation,
    Trace,
    LineAEmulator,
    LineFEmulator,
    UninitializedInterrupt = 15,
    /// The spurious interrupt vector is taken when there is a bus error indication
    /// during interrupt processing.
    SpuriousInterrupt = 24,
    Level1Interrupt,
    Level2Interrupt,
    Level3Interrupt,
    Level4Interrupt,
    Level5Interrupt,
    Level6Interrupt,
    Level7Interrupt,
    Trap0Instruction,
    Trap1Instruction,
    Trap2Instruction,
    Trap3Instruction,
    Trap4Instruction,
    Trap5Instruction,
    Trap6Instruction,
    Trap7Instruction,
    Trap8Instruction,
    Trap9Instruction,
    Trap10Instruction,
    Trap11Instruction,
    Trap12Instruction,
    Trap13Instruction,
    Trap14Instruction,
    Trap15Instruction,
}

/// Base vector of the autovectored interrupts; the interrupt level is added to it.
pub const INT_BASE: u8 = Vector::SpuriousInterrupt as u8;

impl M68K {
    /// Enters the given exception: switches to supervisor mode, pushes the
    /// frame, loads the handler address and primes the prefetch.
    ///
    /// For interrupts (`interrupt` true), the interrupt mask is raised to the
    /// latched IPL and the bus is asked to acknowledge; an acknowledge value
    /// above 255 autovectors to `INT_BASE + IPL`.
    ///
    /// An `Err` means the frame pushes or the vector fetch themselves faulted;
    /// the caller decides between re-raising and halting.
    pub(super) fn enter_exception<M: MemoryAccess + ?Sized>(&mut self, memory: &mut M, vector: u8, interrupt: bool) -> GetResult<()> {
        let mut vector = vector;
        let pc_save = self.regs.pc.0;
        let sr_save = self.get_sr();

        self.set_sr(sr_save & !0x8000 | 0x2000);

        if interrupt {
            self.timestamp += 4;

            self.regs.sr.interrupt_mask = self.ipl;

            let evn = memory.int_ack(self.ipl);
            vector = if evn > 255 {
                INT_BASE + self.ipl
            } else {
                evn as u8
            };

            self.timestamp += 2;
            self.recalc_int();
        }

        self.push_long(memory, pc_save)?;
        self.push_word(memory, sr_save)?;

        if vector == ACCESS_ERROR || vector == ADDRESS_ERROR {
            // Short error frame. The access address and code words are
            // stubbed; the format is what handlers walk over.
            self.push_word(memory, self.current_opcode)?;
            self.push_long(memory, 0)?; // Access address
            self.push_word(memory, 0)?; // R/W, I/N, function code
        }

        self.regs.pc.0 = self.bus_read32(memory, (vector as u32) << 2)?;

        // Prime the two-word prefetch so the next run iteration starts from a
        // filled pipeline, then rewind to the handler's first instruction.
        self.read_op(memory)?;
        self.read_op(memory)?;
        self.regs.pc -= 4;

        self.timestamp += timing::EXCEPTION as i64;

        Ok(())
    }

    /// Services the RESET pending event: fetches the initial SSP and PC from
    /// vectors 0 and 1 and forces supervisor mode with interrupts masked.
    pub(super) fn service_reset<M: MemoryAccess + ?Sized>(&mut self, memory: &mut M) {
        let sr = self.get_sr();
        self.set_sr(sr & !0x8000 | 0x2000);
        self.regs.sr.interrupt_mask = 7;

        let ssp = self.bus_read32(memory, (Vector::ResetSspPc as u32) << 2);
        let pc = self.bus_read32(memory, 4);
        match (ssp, pc) {
            (Ok(ssp), Ok(pc)) => {
                self.regs.a[7].0 = ssp;
                self.regs.pc.0 = pc;
                self.timestamp += timing::VECTOR_RESET as i64;
            },
            _ => {
                // The reset vectors are unreadable; nothing sensible can run.
                log::warn!("bus error while fetching the reset vectors, halting");
                self.xpending |= event::ERRORHALTED;
            },
        }

        self.recalc_int();
    }

    /// Handles the fault vector returned by an instruction (or by exception
    /// processing itself).
    ///
    /// Bus and address errors become pending events serviced at the next run
    /// iteration. Everything else enters the exception now, with the saved PC
    /// rewound to the faulting instruction for the vectors that require it.
    pub(super) fn dispatch_fault<M: MemoryAccess + ?Sized>(&mut self, memory: &mut M, vector: u8) {
        match vector {
            ACCESS_ERROR => self.xpending |= event::BUS,
            ADDRESS_ERROR => self.xpending |= event::ADDRESS,
            _ => {
                // Illegal, privilege and line A/F faults save the PC of the
                // faulting instruction; instruction traps (TRAP, TRAPV, CHK,
                // zero divide) save the PC past it.
                if matches!(vector, 4 | 8 | 10 | 11) {
                    self.regs.pc.0 = self.instr_pc;
                }

                if vector == Vector::IllegalInstruction as u8 {
                    log::debug!("illegal instruction {:#06X} at {:#010X}", self.current_opcode, self.instr_pc);
                }

                if let Err(e) = self.enter_exception(memory, vector, false) {
                    self.dispatch_fault(memory, e);
                }
            },
        }
    }
}
