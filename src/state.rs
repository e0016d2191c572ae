// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Save-state snapshots of the architectural state.

use crate::{M68K, event};

use serde::{Deserialize, Serialize};

/// A plain snapshot of the architectural state, for save states and
/// debuggers. Serialize it with any serde format; deterministic formats
/// round-trip byte-identically.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CpuState {
    pub d: [u32; 8],
    pub a: [u32; 8],
    pub pc: u32,
    pub sp_inactive: u32,
    /// The full SR word, in the hardware layout.
    pub sr: u16,
    pub ipl: u8,
    /// Pending-event bitmap. Masked with [event::VALID_MASK] on load.
    pub xpending: u32,
    pub timestamp: i64,
}

impl M68K {
    /// Captures the architectural state.
    pub fn save_state(&self) -> CpuState {
        CpuState {
            d: self.regs.d.map(|d| d.0),
            a: self.regs.a.map(|a| a.0),
            pc: self.regs.pc.0,
            sp_inactive: self.regs.sp_inactive.0,
            sr: self.get_sr(),
            ipl: self.ipl,
            xpending: self.xpending,
            timestamp: self.timestamp,
        }
    }

    /// Restores a previously captured state.
    ///
    /// The snapshot's stack pointers are already consistent with its S bit,
    /// so the SR is assigned without the usual swap. Transient error and
    /// halt bits of the pending bitmap do not survive the reload.
    pub fn load_state(&mut self, state: &CpuState) {
        for (reg, value) in self.regs.d.iter_mut().zip(state.d) {
            reg.0 = value;
        }
        for (reg, value) in self.regs.a.iter_mut().zip(state.a) {
            reg.0 = value;
        }
        self.regs.pc.0 = state.pc;
        self.regs.sp_inactive.0 = state.sp_inactive;
        self.regs.sr = state.sr.into();
        self.ipl = state.ipl;
        self.xpending = state.xpending & event::VALID_MASK;
        self.timestamp = state.timestamp;

        self.recalc_int();
    }
}
