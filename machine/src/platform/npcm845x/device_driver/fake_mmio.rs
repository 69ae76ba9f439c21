/*
 * SPDX-License-Identifier: BlueOak-1.0.0
 */

//! Register blocks in ordinary memory, for exercising drivers on the host.

use core::ptr;

pub struct FakeMmio {
    words: Box<[u32]>,
}

impl FakeMmio {
    /// A zeroed block `size` bytes long.
    pub fn new(size: usize) -> Self {
        Self {
            words: vec![0u32; size / 4].into_boxed_slice(),
        }
    }

    /// Address to hand to a driver constructor.
    pub fn base(&mut self) -> usize {
        self.words.as_mut_ptr() as usize
    }

    pub fn get(&self, offset: usize) -> u32 {
        unsafe { ptr::read_volatile(self.words.as_ptr().add(offset / 4)) }
    }

    pub fn set(&mut self, offset: usize, value: u32) {
        unsafe { ptr::write_volatile(self.words.as_mut_ptr().add(offset / 4), value) }
    }
}
