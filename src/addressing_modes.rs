// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Addressing mode-related structs, enums and functions.

use crate::{M68K, MemoryAccess};
use crate::instruction::Size;
use crate::memory_access::GetResult;
use crate::timing;

/// Addressing modes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AddressingMode {
    /// Data Register Direct.
    Drd(u8),
    /// Address Register Direct.
    Ard(u8),
    /// Address Register Indirect.
    Ari(u8),
    /// Address Register Indirect With POstincrement.
    Ariwpo(u8),
    /// Address Register Indirect With PRedecrement.
    Ariwpr(u8),
    /// Address Register Indirect With Displacement (address reg, displacement).
    Ariwd(u8, i16),
    /// Address Register Indirect With Index 8 (address reg, brief extension word).
    Ariwi8(u8, BriefExtensionWord),
    /// Absolute Short.
    AbsShort(u16),
    /// Absolute Long.
    AbsLong(u32),
    /// Program Counter Indirect With Displacement (PC value, displacement).
    Pciwd(u32, i16),
    /// Program Counter Indirect With Index 8 (PC value, brief extension word).
    Pciwi8(u32, BriefExtensionWord),
    /// Immediate Data (cast this variant to the correct type when used).
    Immediate(u32),
}

impl AddressingMode {
    /// Return the register of the addressing mode, or None if the mode has no associated register.
    #[inline(always)]
    pub const fn register(self) -> Option<u8> {
        match self {
            AddressingMode::Drd(reg) => Some(reg),
            AddressingMode::Ard(reg) => Some(reg),
            AddressingMode::Ari(reg) => Some(reg),
            AddressingMode::Ariwpo(reg) => Some(reg),
            AddressingMode::Ariwpr(reg) => Some(reg),
            AddressingMode::Ariwd(reg, _) => Some(reg),
            AddressingMode::Ariwi8(reg, _) => Some(reg),
            _ => None,
        }
    }

    /// Returns true if `self` is `Drd`, false otherwise.
    #[inline(always)]
    pub const fn is_drd(self) -> bool {
        matches!(self, Self::Drd(_))
    }

    /// Returns true if `self` is `Ard`, false otherwise.
    #[inline(always)]
    pub const fn is_ard(self) -> bool {
        matches!(self, Self::Ard(_))
    }

    /// Returns true if `self` is `Drd` or `Ard`, false otherwise.
    #[inline(always)]
    pub const fn is_dard(self) -> bool {
        matches!(self, Self::Drd(_) | Self::Ard(_))
    }

    /// Returns true if `self` is `Ariwpo`, false otherwise.
    #[inline(always)]
    pub const fn is_ariwpo(self) -> bool {
        matches!(self, Self::Ariwpo(_))
    }

    /// Returns true if `self` is `Ariwpr`, false otherwise.
    #[inline(always)]
    pub const fn is_ariwpr(self) -> bool {
        matches!(self, Self::Ariwpr(_))
    }

    /// Returns true if `self` is `Immediate`, false otherwise.
    #[inline(always)]
    pub const fn is_immediate(self) -> bool {
        matches!(self, Self::Immediate(_))
    }
}

/// Raw Brief Extension Word.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BriefExtensionWord(pub u16);

impl BriefExtensionWord {
    /// Returns the displacement associated with the brief extension word.
    pub const fn disp(self) -> i8 {
        self.0 as i8
    }

    #[inline(always)]
    const fn is_address_reg(self) -> bool {
        self.0 & 0x8000 != 0
    }

    #[inline(always)]
    const fn reg(self) -> u8 {
        (self.0 >> 12 & 7) as u8
    }

    #[inline(always)]
    const fn is_long(self) -> bool {
        self.0 & 0x0800 != 0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) struct EffectiveAddress {
    /// The addressing mode.
    pub mode: AddressingMode,
    /// Where this effective address points to. `None` if the address has not been calculated yet.
    pub address: Option<u32>,
    /// The size of the data.
    pub size: Option<Size>,
}

impl EffectiveAddress {
    pub fn new(am: AddressingMode, size: Option<Size>) -> Self {
        Self {
            mode: am,
            address: None,
            size,
        }
    }
}

impl M68K {
    /// Decodes the effective-address field of the current instruction,
    /// consuming any extension words from the opcode stream.
    ///
    /// `mode` and `reg` are the raw 3-bit fields of the opcode; `size` is the
    /// operation size, required to decode immediate operands.
    pub(super) fn decode_am<M: MemoryAccess + ?Sized>(&mut self, memory: &mut M, mode: u16, reg: u8, size: Option<Size>) -> GetResult<AddressingMode> {
        Ok(match mode {
            0 => AddressingMode::Drd(reg),
            1 => AddressingMode::Ard(reg),
            2 => AddressingMode::Ari(reg),
            3 => AddressingMode::Ariwpo(reg),
            4 => AddressingMode::Ariwpr(reg),
            5 => AddressingMode::Ariwd(reg, self.read_op(memory)? as i16),
            6 => AddressingMode::Ariwi8(reg, BriefExtensionWord(self.read_op(memory)?)),
            7 => match reg {
                0 => AddressingMode::AbsShort(self.read_op(memory)?),
                1 => {
                    let high = (self.read_op(memory)? as u32) << 16;
                    let low = self.read_op(memory)? as u32;
                    AddressingMode::AbsLong(high | low)
                },
                2 => {
                    let pc = self.regs.pc.0;
                    AddressingMode::Pciwd(pc, self.read_op(memory)? as i16)
                },
                3 => {
                    let pc = self.regs.pc.0;
                    AddressingMode::Pciwi8(pc, BriefExtensionWord(self.read_op(memory)?))
                },
                4 => {
                    if size.expect("immediate must have a size").is_long() {
                        let high = (self.read_op(memory)? as u32) << 16;
                        let low = self.read_op(memory)? as u32;
                        AddressingMode::Immediate(high | low)
                    } else {
                        AddressingMode::Immediate(self.read_op(memory)? as u32)
                    }
                },
                _ => panic!("[M68K::decode_am] Wrong register {reg}"),
            },
            _ => panic!("[M68K::decode_am] Wrong mode {mode}"),
        })
    }

    /// Calculates the value of the given effective address.
    ///
    /// If the address has already been calculated (`ea.address` is Some), it is returned and no
    /// computation is performed. Otherwise the address is computed and assigned to `ea.address`
    /// and returned, or panic if the addressing mode is not in memory.
    pub(super) fn get_effective_address(&mut self, ea: &mut EffectiveAddress, exec_time: &mut usize) -> u32 {
        if ea.address.is_none() {
            ea.address = match ea.mode {
                AddressingMode::Ari(reg) => Some(self.regs.a(reg)),
                AddressingMode::Ariwpo(reg) => {
                    Some(self.ariwpo(reg, ea.size.expect("ariwpo must have a size")))
                },
                AddressingMode::Ariwpr(reg) => {
                    *exec_time += timing::EA_ARIWPR;
                    Some(self.ariwpr(reg, ea.size.expect("ariwpr must have a size")))
                },
                AddressingMode::Ariwd(reg, disp) => {
                    Some(self.regs.a(reg).wrapping_add(disp as u32))
                },
                AddressingMode::Ariwi8(reg, bew) => {
                    *exec_time += timing::EA_INDEX;
                    Some(self.regs.a(reg).wrapping_add(bew.disp() as u32).wrapping_add(self.get_index_register(bew)))
                },
                AddressingMode::AbsShort(addr) => Some(addr as i16 as u32),
                AddressingMode::AbsLong(addr) => Some(addr),
                AddressingMode::Pciwd(pc, disp) => Some(pc.wrapping_add(disp as u32)),
                AddressingMode::Pciwi8(pc, bew) => {
                    *exec_time += timing::EA_INDEX;
                    Some(pc.wrapping_add(bew.disp() as u32).wrapping_add(self.get_index_register(bew)))
                },
                _ => None,
            };
        }

        ea.address.expect("[get_effective_address] Trying to read effective address of a value not in memory.")
    }

    const fn get_index_register(&self, bew: BriefExtensionWord) -> u32 {
        let reg = bew.reg();
        let long = bew.is_long();

        if bew.is_address_reg() {
            if long {
                self.regs.a(reg)
            } else { // Word
                self.regs.a(reg) as i16 as u32
            }
        } else { // Data register
            if long {
                self.regs.d[reg as usize].0
            } else { // Word
                self.regs.d[reg as usize].0 as i16 as u32
            }
        }
    }

    /// Address Register Indirect With POstincrement.
    ///
    /// Returns the original register value and increments it by the operation
    /// size (A7 stays word-aligned on byte accesses).
    pub(super) fn ariwpo(&mut self, reg: u8, size: Size) -> u32 {
        let areg = self.regs.a_mut(reg);
        let addr = areg.0;
        *areg += if reg == 7 { size.as_word_long() } else { size } as u32;
        addr
    }

    /// Address Register Indirect With PRedecrement.
    ///
    /// Decrements the register by the operation size and returns the new value
    /// (A7 stays word-aligned on byte accesses).
    pub(super) fn ariwpr(&mut self, reg: u8, size: Size) -> u32 {
        let areg = self.regs.a_mut(reg);
        *areg -= if reg == 7 { size.as_word_long() } else { size } as u32;
        areg.0
    }
}
