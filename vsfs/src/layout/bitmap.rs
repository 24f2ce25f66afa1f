use core::ops::Range;

use crate::{DataBlock, BLOCK_BITS};

/// 占据一整块的位图，第`i`位位于第`i / 8`字节的第`i % 8`位。
///
/// 不做越界检查之外的校验，调用者保证编号小于 [`BLOCK_BITS`]。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    bits: Box<DataBlock>,
}

impl Bitmap {
    #[inline]
    pub fn new(bits: Box<DataBlock>) -> Self {
        Self { bits }
    }

    #[inline]
    pub fn test(&self, index: usize) -> bool {
        debug_assert!(index < BLOCK_BITS);
        (self.bits[index / 8] >> (index % 8)) & 1 != 0
    }

    #[inline]
    pub fn set(&mut self, index: usize) {
        debug_assert!(index < BLOCK_BITS);
        self.bits[index / 8] |= 1 << (index % 8);
    }

    /// 范围内编号最小的空闲位
    pub fn first_clear(&self, range: Range<usize>) -> Option<usize> {
        let end = range.end.min(BLOCK_BITS);
        (range.start..end).find(|&index| !self.test(index))
    }

    /// 所有已置位的编号，从小到大
    pub fn iter_set(&self) -> impl Iterator<Item = usize> + '_ {
        (0..BLOCK_BITS).filter(|&index| self.test(index))
    }

    #[inline]
    pub fn as_block(&self) -> &DataBlock {
        &self.bits
    }

    #[inline]
    pub fn into_block(self) -> Box<DataBlock> {
        self.bits
    }
}
