//! # 文件系统层
//!
//! [`Vsfs`] 是对一个已格式化镜像的独占会话：
//! - [`Vsfs::create`] 把创建文件所需的元数据修改作为一个事务写进日志；
//! - [`Vsfs::install`] 把日志中的记录回放到归属位置，然后清空日志。
//!
//! 除了计算下一个事务所需的读取，两者都不直接修改归属位置的元数据块。
//! 同一镜像上的并发会话需要外部加锁。

mod create;
mod install;

pub use install::{InstallReport, ReplayPolicy};

use std::sync::Arc;

use block_dev::BlockDevice;

use crate::block;
use crate::dir_entry::{self, RESERVED_ENTRIES};
use crate::{Bitmap, BlockId, DirEntry, DiskInode, Error, Geometry, Journal, Record, Result};
use crate::{ScanEnd, SuperBlock, ROOT_INODE};

pub struct Vsfs {
    block_device: Arc<dyn BlockDevice>,
    super_block: SuperBlock,
    geometry: Geometry,
}

/// 日志的当前状态，只读
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Status {
    pub initialized: bool,
    pub bytes_used: usize,
    pub capacity: usize,
    /// 已提交的事务数
    pub transactions: usize,
    /// 最后一个提交记录之后的数据记录数
    pub pending_records: usize,
    pub end: ScanEnd,
}

impl Vsfs {
    /// 读出并校验超级块
    pub fn open(block_device: Arc<dyn BlockDevice>) -> Result<Self> {
        let block = block::read(&*block_device, BlockId::SUPER)?;
        let super_block = SuperBlock::decode(&block[..SuperBlock::SIZE])?;
        if !super_block.is_valid() {
            return Err(Error::BadMagic);
        }

        let geometry = super_block.geometry()?;
        if block_device.num_blocks() < geometry.total_blocks as usize {
            return Err(Error::BadGeometry("image is smaller than its superblock claims"));
        }
        log::debug!("opened image: {geometry:?}");

        Ok(Self {
            block_device,
            super_block,
            geometry,
        })
    }

    #[inline]
    pub fn super_block(&self) -> &SuperBlock {
        &self.super_block
    }

    #[inline]
    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    #[inline]
    pub fn journal(&self) -> Journal<'_> {
        Journal::new(&*self.block_device, &self.geometry)
    }

    /// 归属位置上的 inode 位图
    pub fn inode_bitmap(&self) -> Result<Bitmap> {
        block::read(&*self.block_device, self.geometry.inode_bitmap).map(Bitmap::new)
    }

    /// 归属位置上编号为`inode_id`的 inode
    pub fn inode(&self, inode_id: u32) -> Result<DiskInode> {
        if inode_id >= self.geometry.inode_count {
            return Err(Error::Corrupted("inode number out of range"));
        }
        let (block_id, offset) = self.geometry.inode_pos(inode_id);
        let block = block::read(&*self.block_device, block_id)?;
        DiskInode::decode(&block[offset..][..DiskInode::SIZE])
    }

    /// 根目录中的非空闲项及其槽位，跳过`.`与`..`
    pub fn root_entries(&self) -> Result<Vec<(usize, DirEntry)>> {
        let root = self.root_inode()?;
        let block = block::read(&*self.block_device, self.root_dir_block(&root)?)?;
        let entries = (root.size as usize / DirEntry::SIZE).min(dir_entry::ENTRIES_PER_BLOCK);

        let mut found = Vec::new();
        for slot in RESERVED_ENTRIES..entries {
            let entry = dir_entry::entry_at(&block, slot)?;
            if !entry.is_free() {
                found.push((slot, entry));
            }
        }
        Ok(found)
    }

    pub fn status(&self) -> Result<Status> {
        let journal = self.journal();
        let Some(header) = journal.header()? else {
            return Ok(Status {
                capacity: journal.capacity(),
                ..Default::default()
            });
        };

        let mut status = Status {
            initialized: true,
            bytes_used: header.bytes_used as usize,
            capacity: journal.capacity(),
            ..Default::default()
        };
        let mut records = journal.records(&header);
        for item in records.by_ref() {
            match item?.1 {
                Record::Data { .. } => status.pending_records += 1,
                Record::Commit => {
                    status.transactions += 1;
                    status.pending_records = 0;
                }
            }
        }
        status.end = records.end();

        Ok(status)
    }
}

impl Vsfs {
    fn root_inode(&self) -> Result<DiskInode> {
        let root = self.inode(ROOT_INODE)?;
        if !root.is_dir() {
            return Err(Error::NotADirectory);
        }
        Ok(root)
    }

    /// 根目录唯一的数据块
    fn root_dir_block(&self, root: &DiskInode) -> Result<BlockId> {
        let block_id = BlockId::new(root.direct[0]);
        if !self.geometry.is_data(block_id) {
            return Err(Error::Corrupted("root directory block is outside the data region"));
        }
        Ok(block_id)
    }
}
