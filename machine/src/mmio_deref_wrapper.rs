/*
 * SPDX-License-Identifier: BlueOak-1.0.0
 */

use core::{marker::PhantomData, ops};

//--------------------------------------------------------------------------------------------------
// Public Definitions
//--------------------------------------------------------------------------------------------------

pub struct MMIODerefWrapper<T> {
    base_addr: usize,
    phantom: PhantomData<fn() -> T>,
}

//--------------------------------------------------------------------------------------------------
// Public Code
//--------------------------------------------------------------------------------------------------

impl<T> MMIODerefWrapper<T> {
    /// Create an instance.
    ///
    /// # Safety
    ///
    /// `start_addr` must be the base of a register block laid out as `T` that stays mapped for
    /// the lifetime of the wrapper. Unit tests pass a block in ordinary memory.
    pub const unsafe fn new(start_addr: usize) -> Self {
        Self {
            base_addr: start_addr,
            phantom: PhantomData,
        }
    }
}

/// Deref to RegisterBlock
///
/// Allows writing
/// ```ignore
/// self.LSR.read(LSR::THRE)
/// ```
/// instead of something along the lines of
/// ```ignore
/// unsafe { (*(UART0_BASE as *const RegisterBlock)).LSR.read(LSR::THRE) }
/// ```
impl<T> ops::Deref for MMIODerefWrapper<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        unsafe { &*(self.base_addr as *const _) }
    }
}
