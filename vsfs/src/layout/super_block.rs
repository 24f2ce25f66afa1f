use binrw::binrw;

use super::BlockId;
use crate::{Error, Result};
use crate::{BLOCK_BITS, BLOCK_SIZE, FS_MAGIC, INODES_PER_BLOCK};

/// 超级块：
/// - 提供文件系统合法性校验；
/// - 定位其它连续区域
///
/// 由格式化工具写入，此后只读。
#[binrw]
#[brw(little)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuperBlock {
    /// 魔数：用于校验文件系统合法性
    pub magic: u32,
    pub block_size: u32,
    /// 文件系统占据块数
    pub total_blocks: u32,
    pub inode_count: u32,
    pub journal_block: u32,
    pub inode_bitmap: u32,
    pub data_bitmap: u32,
    pub inode_start: u32,
    #[brw(pad_after = 92)]
    pub data_start: u32,
}

on_disk!(SuperBlock);

impl Default for SuperBlock {
    /// 默认布局
    fn default() -> Self {
        Self {
            magic: FS_MAGIC,
            block_size: BLOCK_SIZE as u32,
            total_blocks: crate::TOTAL_BLOCKS,
            inode_count: crate::INODE_BLOCKS * INODES_PER_BLOCK as u32,
            journal_block: crate::JOURNAL_BLOCK,
            inode_bitmap: crate::INODE_BITMAP_BLOCK,
            data_bitmap: crate::DATA_BITMAP_BLOCK,
            inode_start: crate::INODE_START_BLOCK,
            data_start: crate::DATA_START_BLOCK,
        }
    }
}

impl SuperBlock {
    /// 超级块大小恒为128字节
    pub const SIZE: usize = 128;

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.magic == FS_MAGIC
    }

    /// 校验各区域的排布，得出文件系统的几何信息
    pub fn geometry(&self) -> Result<Geometry> {
        if !self.is_valid() {
            return Err(Error::BadMagic);
        }
        if self.block_size as usize != BLOCK_SIZE {
            return Err(Error::BadGeometry("unsupported block size"));
        }

        let ordered = 0 < self.journal_block
            && self.journal_block < self.inode_bitmap
            && self.inode_bitmap < self.data_bitmap
            && self.data_bitmap < self.inode_start
            && self.inode_start < self.data_start
            && self.data_start <= self.total_blocks;
        if !ordered {
            return Err(Error::BadGeometry("regions are out of order"));
        }
        // 两个位图各占一块
        if self.data_bitmap != self.inode_bitmap + 1 || self.inode_start != self.data_bitmap + 1 {
            return Err(Error::BadGeometry("bitmaps must span exactly one block"));
        }

        let inode_blocks = self.data_start - self.inode_start;
        let inode_cap = (inode_blocks as usize * INODES_PER_BLOCK).min(BLOCK_BITS);
        if self.inode_count == 0 || self.inode_count as usize > inode_cap {
            return Err(Error::BadGeometry("inode count exceeds the inode table"));
        }

        Ok(Geometry {
            total_blocks: self.total_blocks,
            inode_count: self.inode_count,
            journal_start: BlockId::new(self.journal_block),
            journal_blocks: self.inode_bitmap - self.journal_block,
            inode_bitmap: BlockId::new(self.inode_bitmap),
            data_bitmap: BlockId::new(self.data_bitmap),
            inode_start: BlockId::new(self.inode_start),
            inode_blocks,
            data_start: BlockId::new(self.data_start),
        })
    }
}

/// 经过校验的区域排布
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    pub total_blocks: u32,
    pub inode_count: u32,
    pub journal_start: BlockId,
    pub journal_blocks: u32,
    pub inode_bitmap: BlockId,
    pub data_bitmap: BlockId,
    pub inode_start: BlockId,
    pub inode_blocks: u32,
    pub data_start: BlockId,
}

impl Geometry {
    /// 日志区的字节容量
    #[inline]
    pub fn journal_capacity(&self) -> usize {
        self.journal_blocks as usize * BLOCK_SIZE
    }

    /// 通过编号获取 inode 在磁盘上的位置：**块ID**以及**块内偏移**
    pub fn inode_pos(&self, inode_id: u32) -> (BlockId, usize) {
        let block_id = self.inode_start + inode_id / INODES_PER_BLOCK as u32;
        let block_offset = inode_id as usize % INODES_PER_BLOCK * crate::INODE_SIZE;

        (block_id, block_offset)
    }

    /// 块是否位于数据块区域
    #[inline]
    pub fn is_data(&self, block_id: BlockId) -> bool {
        block_id >= self.data_start && u32::from(block_id) < self.total_blocks
    }

    /// 日志记录可以回放到的归属位置：日志区之后的所有块
    #[inline]
    pub fn is_home(&self, block_id: BlockId) -> bool {
        block_id >= self.inode_bitmap && u32::from(block_id) < self.total_blocks
    }
}
