//! # 磁盘数据结构层
//!
//! vsfs 的磁盘布局（以块为单位）：
//! 超级块 | 日志区 | inode 位图 | 数据块位图 | inode 区域 | 数据块区域
//!
//! 所有多字节整数均以小端序存放，经由`binrw`显式编解码。

use derive_more::{Add, Display, From, Into};

/// 为定长的磁盘结构生成编解码方法
macro_rules! on_disk {
    ($($ty:ty),* $(,)?) => {$(
        impl $ty {
            /// 从`bytes`的开头解码
            pub fn decode(bytes: &[u8]) -> $crate::Result<Self> {
                let mut reader = binrw::io::Cursor::new(bytes);
                Ok(<Self as binrw::BinRead>::read(&mut reader)?)
            }

            /// 编码至`bytes`的开头，其后的字节保持不变
            pub fn encode(&self, bytes: &mut [u8]) -> $crate::Result<()> {
                let mut writer = binrw::io::Cursor::new(bytes);
                binrw::BinWrite::write(self, &mut writer)?;
                Ok(())
            }
        }
    )*};
}

mod super_block;
pub use super_block::{Geometry, SuperBlock};

mod bitmap;
pub use bitmap::Bitmap;

mod inode;
pub use inode::{DiskInode, InodeKind};

/// 目录项，根目录的数据块由其紧密排列而成
pub mod dir_entry;
pub use dir_entry::DirEntry;

pub(crate) use on_disk;

/// 块编号
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Add, From, Into, Display)]
#[repr(transparent)]
pub struct BlockId(u32);

impl core::ops::Add<u32> for BlockId {
    type Output = Self;

    fn add(self, rhs: u32) -> Self::Output {
        self + Self(rhs)
    }
}

impl BlockId {
    /// 超级块所在的块
    pub const SUPER: Self = Self(0);

    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// 交给块设备使用的下标
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}
