//! # vsfs
//!
//! 带预写日志的极简文件系统修改器。
//! 元数据的修改先以整块镜像的形式追加进日志区，
//! 之后再由 install 按顺序回放到各块的归属位置，回放完毕后清空日志。
//!
//! 整体架构，自下而上：
//! - 块设备层：[`block_dev::BlockDevice`]，整块读写镜像
//! - 磁盘数据结构层：超级块、inode、目录项、位图的编解码
//! - 日志层：日志头与记录的追加、顺序读取、清空
//! - 文件系统层：[`Vsfs`]，暂存创建事务、回放已提交的事务

// 块读写的辅助函数
mod block;

// 磁盘数据结构层
mod layout;

// 日志层
mod journal;

// 文件系统层
mod fs;

mod error;

pub use self::{
    error::{Error, Result},
    fs::{InstallReport, ReplayPolicy, Status, Vsfs},
    journal::{
        Journal, JournalHeader, Record, RecordHeader, Records, ScanEnd, COMMIT_RECORD_SIZE,
        DATA_RECORD_SIZE,
    },
    layout::{dir_entry, Bitmap, BlockId, DirEntry, DiskInode, Geometry, InodeKind, SuperBlock},
};

pub const FS_MAGIC: u32 = 0x5653_4653;
pub const JOURNAL_MAGIC: u32 = 0x4A52_4E4C;

pub const BLOCK_SIZE: usize = 4096;
pub const BLOCK_BITS: usize = BLOCK_SIZE * 8;
pub const INODE_SIZE: usize = 128;
pub const INODES_PER_BLOCK: usize = BLOCK_SIZE / INODE_SIZE;

/* 默认布局，超级块由格式化工具写入 */
pub const JOURNAL_BLOCK: u32 = 1;
pub const JOURNAL_BLOCKS: u32 = 16;
pub const INODE_BLOCKS: u32 = 2;
pub const DATA_BLOCKS: u32 = 64;
pub const INODE_BITMAP_BLOCK: u32 = JOURNAL_BLOCK + JOURNAL_BLOCKS;
pub const DATA_BITMAP_BLOCK: u32 = INODE_BITMAP_BLOCK + 1;
pub const INODE_START_BLOCK: u32 = DATA_BITMAP_BLOCK + 1;
pub const DATA_START_BLOCK: u32 = INODE_START_BLOCK + INODE_BLOCKS;
pub const TOTAL_BLOCKS: u32 = DATA_START_BLOCK + DATA_BLOCKS;

/// 根目录的 inode 编号
pub const ROOT_INODE: u32 = 0;

pub const DEFAULT_IMAGE: &str = "vsfs.img";

pub type DataBlock = [u8; BLOCK_SIZE];
