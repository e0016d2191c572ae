// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-instruction internal execution times.
//!
//! Bus traffic already advances the timestamp by 4 cycles per access inside
//! the bus accessors, so the constants here hold only the internal cycles an
//! instruction spends on top of its memory activity. The values derive from
//! the MC68000 user's manual tables minus the nominal bus cycles.
//!
//! TODO: verify the division and shift counts against a reference cycle
//! table; several are rounded to the manual's maximum.

// Effective address calculation overhead (indexing and predecrement).
pub(crate) const EA_ARIWPR: usize = 2;
pub(crate) const EA_INDEX: usize = 2;

// Register-destination ALU operations (ADD, SUB, AND, OR, EOR, CMP, ...).
pub(crate) const ARITH_REG_BW: usize = 0;
pub(crate) const ARITH_REG_L: usize = 2;
pub(crate) const ARITH_REG_L_RDIMM: usize = 4;
pub(crate) const ARITH_MEM: usize = 0;

// Single-operand operations (CLR, NEG, NEGX, NOT, TST, Scc...).
pub(crate) const SINGLE_REG_BW: usize = 0;
pub(crate) const SINGLE_REG_L: usize = 2;
pub(crate) const SINGLE_MEM: usize = 0;
pub(crate) const SCC_REG_TRUE: usize = 2;

// Bit manipulation.
pub(crate) const BIT_REG: usize = 2;
pub(crate) const BIT_MEM: usize = 0;

// Binary coded decimal.
pub(crate) const BCD_REG: usize = 2;
pub(crate) const BCD_MEM: usize = 2;

// Shifts and rotates: base plus per-bit cost in registers.
pub(crate) const SHIFT_REG_BW: usize = 2;
pub(crate) const SHIFT_REG_L: usize = 4;
pub(crate) const SHIFT_COUNT: usize = 2;
pub(crate) const SHIFT_MEM: usize = 0;

// Multiply and divide, rounded to the manual's maximum.
pub(crate) const MULU: usize = 34;
pub(crate) const MULS: usize = 36;
pub(crate) const DIVU: usize = 76;
pub(crate) const DIVS: usize = 94;

// Control flow.
pub(crate) const BCC_BRANCH: usize = 2;
pub(crate) const BCC_NO_BRANCH_BYTE: usize = 4;
pub(crate) const BCC_NO_BRANCH_WORD: usize = 4;
pub(crate) const DBCC_TRUE: usize = 4;
pub(crate) const DBCC_FALSE_BRANCH: usize = 2;
pub(crate) const DBCC_FALSE_NO_BRANCH: usize = 6;
pub(crate) const JMP: usize = 4;
pub(crate) const JSR: usize = 4;
pub(crate) const LEA: usize = 0;
pub(crate) const PEA: usize = 2;
pub(crate) const LINK: usize = 4;
pub(crate) const UNLK: usize = 0;
pub(crate) const RTS: usize = 4;
pub(crate) const RTR: usize = 4;
pub(crate) const RTE: usize = 4;

// Miscellaneous.
pub(crate) const MOVEM: usize = 4;
pub(crate) const EXG: usize = 2;
pub(crate) const CHK_NO_TRAP: usize = 6;
pub(crate) const TRAPV_NO_TRAP: usize = 0;
pub(crate) const TAS_MEM: usize = 2;
pub(crate) const STOP: usize = 4;
pub(crate) const RESET_INSTRUCTION: usize = 128;
pub(crate) const SR_CCR_OP: usize = 12;
pub(crate) const MOVE_TO_SR: usize = 8;
pub(crate) const MOVE_FROM_SR_REG: usize = 2;

// Exception processing, beyond the frame pushes and vector fetch.
pub(crate) const EXCEPTION: usize = 6;
pub(crate) const VECTOR_RESET: usize = 24;
