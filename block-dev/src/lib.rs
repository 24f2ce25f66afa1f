//! # 块设备接口层
//!
//! 块设备是以**块**为单位存储数据的设备，例如磁盘镜像、U盘等；
//! [`BlockDevice`] 就是对读写块设备的抽象，
//! 实现了此特质的类型称为**块设备驱动**。
//!
//! 每次读写都是整块进行，读写不完整的块一律视为错误交还调用者，
//! 不在驱动内部重试。

use std::io;

/// 块设备驱动特质
pub trait BlockDevice: Send + Sync {
    /// 设备的总块数
    fn num_blocks(&self) -> usize;

    /// 读出编号为`block_id`的整块，`buf`的长度即块大小。
    fn read_block(&self, block_id: usize, buf: &mut [u8]) -> io::Result<()>;

    /// 写入编号为`block_id`的整块，`buf`的长度即块大小。
    fn write_block(&self, block_id: usize, buf: &[u8]) -> io::Result<()>;

    /// 把此前的写入落盘
    fn flush(&self) -> io::Result<()> {
        Ok(())
    }
}
