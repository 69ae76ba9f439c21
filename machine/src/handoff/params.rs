/*
 * SPDX-License-Identifier: BlueOak-1.0.0
 */

//! Parameter records passed between boot stages, laid out exactly as the previous stage
//! writes them (AArch64, little-endian, C layout).

use {
    core::mem::{offset_of, size_of},
    static_assertions::{assert_eq_size, const_assert_eq},
};

pub const PARAM_EP: u8 = 0x01;
pub const PARAM_IMAGE_BINARY: u8 = 0x02;
pub const PARAM_BL31: u8 = 0x03;
pub const PARAM_BL_LOAD_INFO: u8 = 0x04;
pub const PARAM_BL_PARAMS: u8 = 0x05;

pub const VERSION_1: u8 = 0x01;
pub const VERSION_2: u8 = 0x02;

pub const BL32_IMAGE_ID: u32 = 4;
pub const BL33_IMAGE_ID: u32 = 5;

/// `attr` bit holding the security state of an entry point.
const EP_SECURITY_MASK: u32 = 0x1;

/// Which world an image runs in.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SecurityState {
    Secure,
    NonSecure,
}

/// Common header of every parameter record.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ParamHeader {
    /// One of the `PARAM_*` constants.
    pub type_: u8,
    pub version: u8,
    /// Size of the whole record, header included.
    pub size: u16,
    pub attr: u32,
}

/// Where and how to start an image.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct EntryPointInfo {
    pub h: ParamHeader,
    pub pc: u64,
    pub spsr: u32,
    /// Loaded into x0..x7 on entry.
    pub args: [u64; 8],
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Default)]
pub struct ImageInfo {
    pub h: ParamHeader,
    pub image_base: usize,
    pub image_size: u32,
    pub image_max_size: u32,
}

/// Head of the image list the previous stage hands over in `x0`.
#[repr(C)]
#[derive(Debug)]
pub struct BlParams {
    pub h: ParamHeader,
    pub head: *const BlParamsNode,
}

#[repr(C)]
#[derive(Debug)]
pub struct BlParamsNode {
    pub image_id: u32,
    pub image_info: *const ImageInfo,
    pub ep_info: *const EntryPointInfo,
    pub next_params_info: *const BlParamsNode,
}

assert_eq_size!(ParamHeader, u64);
assert_eq_size!(EntryPointInfo, [u8; 88]);
const_assert_eq!(offset_of!(EntryPointInfo, pc), 8);
const_assert_eq!(offset_of!(EntryPointInfo, spsr), 16);
const_assert_eq!(offset_of!(EntryPointInfo, args), 24);
#[cfg(target_pointer_width = "64")]
const_assert_eq!(size_of::<BlParams>(), 16);
#[cfg(target_pointer_width = "64")]
const_assert_eq!(size_of::<BlParamsNode>(), 32);

impl ParamHeader {
    pub const fn new(type_: u8, version: u8, size: u16, attr: u32) -> Self {
        Self {
            type_,
            version,
            size,
            attr,
        }
    }
}

impl EntryPointInfo {
    /// An empty version 1 entry point record for an image in the given world.
    pub const fn new(state: SecurityState) -> Self {
        let attr = match state {
            SecurityState::Secure => 0,
            SecurityState::NonSecure => EP_SECURITY_MASK,
        };
        Self {
            h: ParamHeader::new(PARAM_EP, VERSION_1, size_of::<Self>() as u16, attr),
            pc: 0,
            spsr: 0,
            args: [0; 8],
        }
    }

    pub fn security_state(&self) -> SecurityState {
        if self.h.attr & EP_SECURITY_MASK == 0 {
            SecurityState::Secure
        } else {
            SecurityState::NonSecure
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_entry_point_has_ep_header() {
        let ep = EntryPointInfo::new(SecurityState::NonSecure);
        assert_eq!(ep.h, ParamHeader::new(PARAM_EP, VERSION_1, 88, 1));
        assert_eq!(ep.security_state(), SecurityState::NonSecure);
    }

    #[test]
    fn security_state_reads_bit_zero_only() {
        let mut ep = EntryPointInfo::new(SecurityState::Secure);
        ep.h.attr = 0xf0;
        assert_eq!(ep.security_state(), SecurityState::Secure);
        ep.h.attr = 0xf1;
        assert_eq!(ep.security_state(), SecurityState::NonSecure);
    }
}
