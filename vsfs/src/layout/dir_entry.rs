use core::fmt;

use binrw::binrw;

use crate::{DataBlock, Result, BLOCK_SIZE};

/// 名字字段的长度，最后一字节留给 \0
pub const NAME_LEN: usize = 28;
pub const NAME_MAX_LEN: usize = NAME_LEN - 1;

/// 一块可容纳的目录项个数
pub const ENTRIES_PER_BLOCK: usize = BLOCK_SIZE / DirEntry::SIZE;
/// `.`与`..`占据的前两项
pub const RESERVED_ENTRIES: usize = 2;

/// 目录项：inode 编号为0的项是空闲的
#[binrw]
#[brw(little)]
#[derive(Default, Clone, PartialEq, Eq)]
pub struct DirEntry {
    inode_id: u32,
    name: [u8; NAME_LEN],
}

on_disk!(DirEntry);

impl DirEntry {
    /// 目录项大小恒为32字节
    pub const SIZE: usize = 32;

    /// 名字超出 [`NAME_MAX_LEN`] 的部分被截去
    pub fn new(inode_id: u32, name: &[u8]) -> Self {
        let len = name.len().min(NAME_MAX_LEN);
        let mut buf = [0; NAME_LEN];
        buf[..len].copy_from_slice(&name[..len]);

        Self {
            inode_id,
            name: buf,
        }
    }

    #[inline]
    pub fn inode_id(&self) -> u32 {
        self.inode_id
    }

    /// \0 之前的名字
    pub fn name(&self) -> &[u8] {
        let len = self.name.iter().position(|&c| c == 0).unwrap_or(NAME_LEN);
        &self.name[..len]
    }

    #[inline]
    pub fn is_free(&self) -> bool {
        self.inode_id == 0
    }
}

impl fmt::Debug for DirEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DirEntry")
            .field("inode_id", &self.inode_id)
            .field("name", &String::from_utf8_lossy(self.name()))
            .finish()
    }
}

/// 目录块中第`slot`项
#[inline]
pub fn entry_at(block: &DataBlock, slot: usize) -> Result<DirEntry> {
    DirEntry::decode(&block[slot * DirEntry::SIZE..][..DirEntry::SIZE])
}

/// 写入目录块中第`slot`项
#[inline]
pub fn put_entry(block: &mut DataBlock, slot: usize, entry: &DirEntry) -> Result<()> {
    entry.encode(&mut block[slot * DirEntry::SIZE..][..DirEntry::SIZE])
}

/// 寻找可用的目录项：
/// 先在已有的`entries`项中找空闲项，再看块内是否还能追加一项。
/// 保留的前两项从不分配。
pub fn free_slot(block: &DataBlock, entries: usize) -> Result<Option<usize>> {
    let entries = entries.min(ENTRIES_PER_BLOCK);
    for slot in RESERVED_ENTRIES..entries {
        if entry_at(block, slot)?.is_free() {
            return Ok(Some(slot));
        }
    }

    let next = entries.max(RESERVED_ENTRIES);
    Ok((next < ENTRIES_PER_BLOCK).then_some(next))
}
