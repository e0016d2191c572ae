// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Opcode decode table.
//!
//! [DECODER] maps every one of the 65 536 opcode words to its mnemonic. The
//! table is generated by the const evaluator from the bit-pattern classifier
//! below, so encodings with invalid effective-address fields land on
//! [Isa::Unknown] and execute the illegal-instruction path.

use crate::isa::Isa;

// One bit per addressing mode; mode 7 sub-modes get their own bits.
const DRD: u16 = 1 << 0;
const ARD: u16 = 1 << 1;
const ARI: u16 = 1 << 2;
const ARIWPO: u16 = 1 << 3;
const ARIWPR: u16 = 1 << 4;
const ARIWD: u16 = 1 << 5;
const ARIWI8: u16 = 1 << 6;
const ABS_SHORT: u16 = 1 << 7;
const ABS_LONG: u16 = 1 << 8;
const PCIWD: u16 = 1 << 9;
const PCIWI8: u16 = 1 << 10;
const IMMEDIATE: u16 = 1 << 11;

const MEMORY_ALTERABLE: u16 = ARI | ARIWPO | ARIWPR | ARIWD | ARIWI8 | ABS_SHORT | ABS_LONG;
const DATA_ALTERABLE: u16 = DRD | MEMORY_ALTERABLE;
const ALTERABLE: u16 = DATA_ALTERABLE | ARD;
const DATA: u16 = DATA_ALTERABLE | PCIWD | PCIWI8 | IMMEDIATE;
const ALL: u16 = DATA | ARD;
const CONTROL: u16 = ARI | ARIWD | ARIWI8 | ABS_SHORT | ABS_LONG | PCIWD | PCIWI8;
const CONTROL_ALTERABLE: u16 = ARI | ARIWD | ARIWI8 | ABS_SHORT | ABS_LONG;
const MOVEM_DST: u16 = CONTROL_ALTERABLE | ARIWPR;
const MOVEM_SRC: u16 = CONTROL | ARIWPO;

const fn ea_bit(mode: u16, reg: u16) -> u16 {
    if mode < 7 {
        1 << mode
    } else if reg <= 4 {
        1 << (7 + reg)
    } else {
        0
    }
}

const fn ea_valid(mode: u16, reg: u16, allowed: u16) -> bool {
    ea_bit(mode, reg) & allowed != 0
}

const fn decode_group0(op: u16) -> Isa {
    let mode = op >> 3 & 7;
    let reg = op & 7;
    let ty = op >> 6 & 3;

    if op & 0x0100 != 0 {
        // Dynamic bit operations, or MOVEP when the EA field says An.
        if mode == 1 {
            return Isa::Movep;
        }
        // Only BTST takes an immediate operand.
        let allowed = if ty == 0 { DATA } else { DATA_ALTERABLE };
        if !ea_valid(mode, reg, allowed) {
            return Isa::Unknown;
        }
        return match ty {
            0 => Isa::Btst,
            1 => Isa::Bchg,
            2 => Isa::Bclr,
            _ => Isa::Bset,
        };
    }

    match op >> 9 & 7 {
        0 => match op {
            0x003C => Isa::Oriccr,
            0x007C => Isa::Orisr,
            _ if ty <= 2 && ea_valid(mode, reg, DATA_ALTERABLE) => Isa::Ori,
            _ => Isa::Unknown,
        },
        1 => match op {
            0x023C => Isa::Andiccr,
            0x027C => Isa::Andisr,
            _ if ty <= 2 && ea_valid(mode, reg, DATA_ALTERABLE) => Isa::Andi,
            _ => Isa::Unknown,
        },
        2 if ty <= 2 && ea_valid(mode, reg, DATA_ALTERABLE) => Isa::Subi,
        3 if ty <= 2 && ea_valid(mode, reg, DATA_ALTERABLE) => Isa::Addi,
        4 => {
            // Static bit operations; the immediate bit number follows the opcode.
            let allowed = if ty == 0 { DATA & !IMMEDIATE } else { DATA_ALTERABLE };
            if !ea_valid(mode, reg, allowed) {
                return Isa::Unknown;
            }
            match ty {
                0 => Isa::Btst,
                1 => Isa::Bchg,
                2 => Isa::Bclr,
                _ => Isa::Bset,
            }
        },
        5 => match op {
            0x0A3C => Isa::Eoriccr,
            0x0A7C => Isa::Eorisr,
            _ if ty <= 2 && ea_valid(mode, reg, DATA_ALTERABLE) => Isa::Eori,
            _ => Isa::Unknown,
        },
        6 if ty <= 2 && ea_valid(mode, reg, DATA_ALTERABLE) => Isa::Cmpi,
        _ => Isa::Unknown,
    }
}

const fn decode_move(op: u16) -> Isa {
    let src_mode = op >> 3 & 7;
    let src_reg = op & 7;
    let dst_mode = op >> 6 & 7;
    let dst_reg = op >> 9 & 7;
    let byte = op >> 12 & 3 == 1;

    let src_allowed = if byte { DATA } else { ALL };
    if !ea_valid(src_mode, src_reg, src_allowed) {
        return Isa::Unknown;
    }

    if dst_mode == 1 {
        if byte {
            return Isa::Unknown;
        }
        return Isa::Movea;
    }

    if ea_valid(dst_mode, dst_reg, DATA_ALTERABLE) {
        Isa::Move
    } else {
        Isa::Unknown
    }
}

const fn decode_group4(op: u16) -> Isa {
    let mode = op >> 3 & 7;
    let reg = op & 7;
    let size = op >> 6 & 3;

    if op == 0x4AFC {
        return Isa::Illegal;
    }

    if op & 0x01C0 == 0x01C0 {
        return if ea_valid(mode, reg, CONTROL) { Isa::Lea } else { Isa::Unknown };
    }
    if op & 0x01C0 == 0x0180 {
        return if ea_valid(mode, reg, DATA) { Isa::Chk } else { Isa::Unknown };
    }

    match op >> 8 & 0xF {
        0x0 => {
            if size == 3 {
                // MOVE from SR is unprivileged on the MC68000.
                if ea_valid(mode, reg, DATA_ALTERABLE) { Isa::Movefsr } else { Isa::Unknown }
            } else if ea_valid(mode, reg, DATA_ALTERABLE) {
                Isa::Negx
            } else {
                Isa::Unknown
            }
        },
        0x2 => {
            if size == 3 {
                Isa::Unknown // MOVE from CCR is 68010+.
            } else if ea_valid(mode, reg, DATA_ALTERABLE) {
                Isa::Clr
            } else {
                Isa::Unknown
            }
        },
        0x4 => {
            if size == 3 {
                if ea_valid(mode, reg, DATA) { Isa::Moveccr } else { Isa::Unknown }
            } else if ea_valid(mode, reg, DATA_ALTERABLE) {
                Isa::Neg
            } else {
                Isa::Unknown
            }
        },
        0x6 => {
            if size == 3 {
                if ea_valid(mode, reg, DATA) { Isa::Movesr } else { Isa::Unknown }
            } else if ea_valid(mode, reg, DATA_ALTERABLE) {
                Isa::Not
            } else {
                Isa::Unknown
            }
        },
        0x8 => match size {
            0 => if ea_valid(mode, reg, DATA_ALTERABLE) { Isa::Nbcd } else { Isa::Unknown },
            1 => {
                if mode == 0 {
                    Isa::Swap
                } else if ea_valid(mode, reg, CONTROL) {
                    Isa::Pea
                } else {
                    Isa::Unknown
                }
            },
            _ => {
                if mode == 0 {
                    Isa::Ext
                } else if ea_valid(mode, reg, MOVEM_DST) {
                    Isa::Movem
                } else {
                    Isa::Unknown
                }
            },
        },
        0xA => {
            if size == 3 {
                if ea_valid(mode, reg, DATA_ALTERABLE) { Isa::Tas } else { Isa::Unknown }
            } else if ea_valid(mode, reg, DATA_ALTERABLE) {
                Isa::Tst
            } else {
                Isa::Unknown
            }
        },
        0xC => {
            if size >= 2 && ea_valid(mode, reg, MOVEM_SRC) {
                Isa::Movem
            } else {
                Isa::Unknown
            }
        },
        0xE => match op >> 4 & 0xF {
            0x4 => Isa::Trap,
            0x5 => if op & 8 == 0 { Isa::Link } else { Isa::Unlk },
            0x6 => Isa::Moveusp,
            0x7 => match op & 0xF {
                0x0 => Isa::Reset,
                0x1 => Isa::Nop,
                0x2 => Isa::Stop,
                0x3 => Isa::Rte,
                0x5 => Isa::Rts,
                0x6 => Isa::Trapv,
                0x7 => Isa::Rtr,
                _ => Isa::Unknown,
            },
            _ => {
                if op & 0x00C0 == 0x0080 {
                    if ea_valid(mode, reg, CONTROL) { Isa::Jsr } else { Isa::Unknown }
                } else if op & 0x00C0 == 0x00C0 {
                    if ea_valid(mode, reg, CONTROL) { Isa::Jmp } else { Isa::Unknown }
                } else {
                    Isa::Unknown
                }
            },
        },
        _ => Isa::Unknown,
    }
}

const fn decode_group5(op: u16) -> Isa {
    let mode = op >> 3 & 7;
    let reg = op & 7;
    let size = op >> 6 & 3;

    if size == 3 {
        if mode == 1 {
            Isa::Dbcc
        } else if ea_valid(mode, reg, DATA_ALTERABLE) {
            Isa::Scc
        } else {
            Isa::Unknown
        }
    } else {
        // An is a valid destination for word and long sizes only.
        let allowed = if size == 0 { DATA_ALTERABLE } else { ALTERABLE };
        if !ea_valid(mode, reg, allowed) {
            Isa::Unknown
        } else if op & 0x0100 != 0 {
            Isa::Subq
        } else {
            Isa::Addq
        }
    }
}

const fn decode_group6(op: u16) -> Isa {
    match op >> 8 & 0xF {
        0x0 => Isa::Bra,
        0x1 => Isa::Bsr,
        _ => Isa::Bcc,
    }
}

const fn decode_group8(op: u16) -> Isa {
    let mode = op >> 3 & 7;
    let reg = op & 7;

    if op >> 6 & 3 == 3 {
        if !ea_valid(mode, reg, DATA) {
            Isa::Unknown
        } else if op & 0x0100 != 0 {
            Isa::Divs
        } else {
            Isa::Divu
        }
    } else if op & 0x01F0 == 0x0100 {
        Isa::Sbcd
    } else if op & 0x0100 == 0 {
        if ea_valid(mode, reg, DATA) { Isa::Or } else { Isa::Unknown }
    } else if ea_valid(mode, reg, MEMORY_ALTERABLE) {
        Isa::Or
    } else {
        Isa::Unknown
    }
}

const fn decode_sub_add(op: u16, suba: Isa, subx: Isa, sub: Isa) -> Isa {
    let mode = op >> 3 & 7;
    let reg = op & 7;
    let size = op >> 6 & 3;

    if size == 3 {
        return if ea_valid(mode, reg, ALL) { suba } else { Isa::Unknown };
    }
    if op & 0x0130 == 0x0100 {
        return subx;
    }
    if op & 0x0100 == 0 {
        // An is a valid source for word and long sizes only.
        let allowed = if size == 0 { DATA } else { ALL };
        if ea_valid(mode, reg, allowed) { sub } else { Isa::Unknown }
    } else if ea_valid(mode, reg, MEMORY_ALTERABLE) {
        sub
    } else {
        Isa::Unknown
    }
}

const fn decode_groupb(op: u16) -> Isa {
    let mode = op >> 3 & 7;
    let reg = op & 7;
    let size = op >> 6 & 3;

    if size == 3 {
        return if ea_valid(mode, reg, ALL) { Isa::Cmpa } else { Isa::Unknown };
    }
    if op & 0x0138 == 0x0108 {
        return Isa::Cmpm;
    }
    if op & 0x0100 != 0 {
        if ea_valid(mode, reg, DATA_ALTERABLE) { Isa::Eor } else { Isa::Unknown }
    } else {
        let allowed = if size == 0 { DATA } else { ALL };
        if ea_valid(mode, reg, allowed) { Isa::Cmp } else { Isa::Unknown }
    }
}

const fn decode_groupc(op: u16) -> Isa {
    let mode = op >> 3 & 7;
    let reg = op & 7;

    if op >> 6 & 3 == 3 {
        if !ea_valid(mode, reg, DATA) {
            Isa::Unknown
        } else if op & 0x0100 != 0 {
            Isa::Muls
        } else {
            Isa::Mulu
        }
    } else if op & 0x01F0 == 0x0100 {
        Isa::Abcd
    } else if op & 0x01F8 == 0x0140 || op & 0x01F8 == 0x0148 || op & 0x01F8 == 0x0188 {
        Isa::Exg
    } else if op & 0x0100 == 0 {
        if ea_valid(mode, reg, DATA) { Isa::And } else { Isa::Unknown }
    } else if ea_valid(mode, reg, MEMORY_ALTERABLE) {
        Isa::And
    } else {
        Isa::Unknown
    }
}

const fn decode_groupe(op: u16) -> Isa {
    let mode = op >> 3 & 7;
    let reg = op & 7;

    if op >> 6 & 3 == 3 {
        // Memory shifts work on a single word; bit 11 set is 68020 bitfields.
        if op >> 11 & 1 != 0 || !ea_valid(mode, reg, MEMORY_ALTERABLE) {
            return Isa::Unknown;
        }
        match op >> 9 & 3 {
            0 => Isa::Asm,
            1 => Isa::Lsm,
            2 => Isa::Roxm,
            _ => Isa::Rom,
        }
    } else {
        match op >> 3 & 3 {
            0 => Isa::Asr,
            1 => Isa::Lsr,
            2 => Isa::Roxr,
            _ => Isa::Ror,
        }
    }
}

const fn decode(op: u16) -> Isa {
    match op >> 12 {
        0x0 => decode_group0(op),
        0x1 | 0x2 | 0x3 => decode_move(op),
        0x4 => decode_group4(op),
        0x5 => decode_group5(op),
        0x6 => decode_group6(op),
        0x7 => if op & 0x0100 == 0 { Isa::Moveq } else { Isa::Unknown },
        0x8 => decode_group8(op),
        0x9 => decode_sub_add(op, Isa::Suba, Isa::Subx, Isa::Sub),
        0xA => Isa::LineA,
        0xB => decode_groupb(op),
        0xC => decode_groupc(op),
        0xD => decode_sub_add(op, Isa::Adda, Isa::Addx, Isa::Add),
        0xE => decode_groupe(op),
        _ => Isa::LineF,
    }
}

/// The instruction decode table, indexed by the full 16-bit opcode word.
pub static DECODER: [Isa; 0x1_0000] = {
    let mut lut = [Isa::Unknown; 0x1_0000];
    let mut op = 0usize;
    while op < 0x1_0000 {
        lut[op] = decode(op as u16);
        op += 1;
    }
    lut
};
