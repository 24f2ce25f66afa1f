use core::fmt;

use binrw::binrw;

use crate::layout::on_disk;
use crate::{BlockId, DataBlock, Result, BLOCK_SIZE, JOURNAL_MAGIC};

/// 日志头，位于日志区第一块的开头
#[binrw]
#[brw(little)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JournalHeader {
    pub magic: u32,
    /// 已用字节数，包括日志头本身
    pub bytes_used: u32,
}

on_disk!(JournalHeader);

impl JournalHeader {
    pub const SIZE: usize = 8;

    /// 刚初始化或清空后的日志头
    #[inline]
    pub fn empty() -> Self {
        Self {
            magic: JOURNAL_MAGIC,
            bytes_used: Self::SIZE as u32,
        }
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.magic == JOURNAL_MAGIC
    }
}

/// 每条记录开头的类型与大小，大小包括此头
#[binrw]
#[brw(little)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordHeader {
    pub kind: u16,
    pub size: u16,
}

on_disk!(RecordHeader);

impl RecordHeader {
    pub const SIZE: usize = 4;

    pub const DATA: u16 = 1;
    pub const COMMIT: u16 = 2;
}

/// 数据记录在整块数据之前的部分
#[binrw]
#[brw(little)]
#[derive(Debug, Clone, Copy)]
pub(super) struct DataRecordHead {
    pub header: RecordHeader,
    pub block_id: u32,
}

on_disk!(DataRecordHead);

impl DataRecordHead {
    pub const SIZE: usize = RecordHeader::SIZE + 4;
}

pub const DATA_RECORD_SIZE: usize = DataRecordHead::SIZE + BLOCK_SIZE;
pub const COMMIT_RECORD_SIZE: usize = RecordHeader::SIZE;

/// 日志记录：
/// - 数据记录携带一整块及其归属位置；
/// - 提交记录标志着一个事务的结束。
#[derive(Clone, PartialEq, Eq)]
pub enum Record {
    Data { block_id: BlockId, data: Box<DataBlock> },
    Commit,
}

impl Record {
    #[inline]
    pub fn data(block_id: BlockId, data: Box<DataBlock>) -> Self {
        Self::Data { block_id, data }
    }

    #[inline]
    pub const fn size(&self) -> usize {
        match self {
            Self::Data { .. } => DATA_RECORD_SIZE,
            Self::Commit => COMMIT_RECORD_SIZE,
        }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut bytes = vec![0; self.size()];

        match self {
            Self::Data { block_id, data } => {
                let head = DataRecordHead {
                    header: RecordHeader {
                        kind: RecordHeader::DATA,
                        size: DATA_RECORD_SIZE as u16,
                    },
                    block_id: (*block_id).into(),
                };
                head.encode(&mut bytes)?;
                bytes[DataRecordHead::SIZE..].copy_from_slice(&data[..]);
            }
            Self::Commit => {
                let header = RecordHeader {
                    kind: RecordHeader::COMMIT,
                    size: COMMIT_RECORD_SIZE as u16,
                };
                header.encode(&mut bytes)?;
            }
        }

        Ok(bytes)
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Data { block_id, .. } => f.debug_struct("Data").field("block_id", block_id).finish(),
            Self::Commit => f.write_str("Commit"),
        }
    }
}
