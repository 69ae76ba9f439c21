/*
 * SPDX-License-Identifier: BlueOak-1.0.0
 */

//! Boot handoff: the entry points of the images BL31 passes control to.
//!
//! They either come from the previous stage as a [`BlParams`] list, or are compiled in when
//! BL31 is the reset vector. Either way they are copied into a [`NextImages`] before the MMU is
//! turned on, because the previous stage's memory is not mapped afterwards.

use snafu::{ensure, Snafu};

mod params;
mod spsr;

pub use {params::*, spsr::*};

/// Value the previous stage passes in `x3` to prove the platform parameters are meant for us.
pub const PLAT_PARAM_MAGIC: u64 = 0x0F1E_2D3C_4B5A_6978;

//--------------------------------------------------------------------------------------------------
// Public Definitions
//--------------------------------------------------------------------------------------------------

/// Handoff validation errors.
#[derive(Debug, Snafu, PartialEq, Eq)]
pub enum HandoffError {
    #[snafu(display("BL31 is the reset vector but was passed parameters ({arg0:#x}, {arg3:#x})"))]
    UnexpectedParams { arg0: usize, arg3: u64 },
    #[snafu(display("Platform parameter {found:#x} does not carry the expected magic"))]
    BadPlatformMagic { found: u64 },
    #[snafu(display("No parameter list was passed"))]
    NullParams,
    #[snafu(display("Parameter list has type {found:#x}, expected BL params"))]
    BadParamType { found: u8 },
    #[snafu(display("Parameter list version {found} is older than version 2"))]
    BadParamVersion { found: u8 },
    #[snafu(display("No entry point for the non-secure image"))]
    MissingNonSecureImage,
}

/// Entry points of the secure (BL32) and non-secure (BL33) images.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct NextImages {
    pub bl32: EntryPointInfo,
    pub bl33: EntryPointInfo,
}

//--------------------------------------------------------------------------------------------------
// Public Code
//--------------------------------------------------------------------------------------------------

impl NextImages {
    pub const fn empty() -> Self {
        Self {
            bl32: EntryPointInfo::new(SecurityState::Secure),
            bl33: EntryPointInfo::new(SecurityState::NonSecure),
        }
    }

    /// Copy the BL32 and BL33 entry points out of the list the previous stage passed.
    ///
    /// Later nodes for the same image id replace earlier ones. Nodes for other images are
    /// skipped.
    ///
    /// # Safety
    ///
    /// `arg0`, when not null, must point to a readable `BlParams` whose node list is
    /// null-terminated and whose nodes and entry point records are readable.
    pub unsafe fn from_bl_params(arg0: usize, arg3: u64) -> Result<Self, HandoffError> {
        ensure!(arg3 == PLAT_PARAM_MAGIC, BadPlatformMagicSnafu { found: arg3 });
        ensure!(arg0 != 0, NullParamsSnafu);

        let params = &*(arg0 as *const BlParams);
        ensure!(
            params.h.type_ == PARAM_BL_PARAMS,
            BadParamTypeSnafu {
                found: params.h.type_
            }
        );
        ensure!(
            params.h.version >= VERSION_2,
            BadParamVersionSnafu {
                found: params.h.version
            }
        );

        let mut images = Self::empty();
        let mut node = params.head;
        while let Some(n) = node.as_ref() {
            if let Some(ep) = n.ep_info.as_ref() {
                match n.image_id {
                    BL32_IMAGE_ID => images.bl32 = *ep,
                    BL33_IMAGE_ID => images.bl33 = *ep,
                    _ => {}
                }
            }
            node = n.next_params_info;
        }

        ensure!(images.bl33.pc != 0, MissingNonSecureImageSnafu);
        Ok(images)
    }

    /// The stored entry point for `state`, if that image exists.
    ///
    /// No image on this platform can start at address 0, so a zero `pc` means absent.
    pub fn ep_info(&self, state: SecurityState) -> Option<EntryPointInfo> {
        let ep = match state {
            SecurityState::NonSecure => &self.bl33,
            SecurityState::Secure => &self.bl32,
        };
        (ep.pc != 0).then_some(*ep)
    }
}

impl Default for NextImages {
    fn default() -> Self {
        Self::empty()
    }
}

/// A reset-vector BL31 has no previous stage, so both parameter registers must be null.
pub fn check_reset_args(arg0: usize, arg3: u64) -> Result<(), HandoffError> {
    ensure!(
        arg0 == 0 && arg3 == 0,
        UnexpectedParamsSnafu { arg0, arg3 }
    );
    Ok(())
}

//--------------------------------------------------------------------------------------------------
// Testing
//--------------------------------------------------------------------------------------------------
