//! # 日志层
//!
//! 日志区是一段线性的字节空间，开头是 [`JournalHeader`]，其后紧密排列着记录。
//! 追加只会让`bytes_used`变大，只有清空才会把它重置为日志头的大小；
//! 日志区不回绕，写满后必须先 install。
//!
//! 记录的字节可能跨越块边界，也可能与相邻记录共享一块，
//! 所以每块都是先读后写。日志头总是在记录的字节落盘后才更新。

mod record;
mod scan;

pub use self::{
    record::{JournalHeader, Record, RecordHeader, COMMIT_RECORD_SIZE, DATA_RECORD_SIZE},
    scan::{Records, ScanEnd},
};

use block_dev::BlockDevice;

use crate::block;
use crate::{BlockId, Error, Geometry, Result, BLOCK_SIZE};

pub struct Journal<'a> {
    block_device: &'a dyn BlockDevice,
    /// 日志区的起始块
    start: BlockId,
    /// 日志区占用块数
    blocks: u32,
}

impl<'a> Journal<'a> {
    pub fn new(block_device: &'a dyn BlockDevice, geometry: &Geometry) -> Self {
        Self {
            block_device,
            start: geometry.journal_start,
            blocks: geometry.journal_blocks,
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.blocks as usize * BLOCK_SIZE
    }

    /// 读出日志头，魔数不符则说明日志尚未初始化
    pub fn header(&self) -> Result<Option<JournalHeader>> {
        let block = block::read(self.block_device, self.start)?;
        let header = JournalHeader::decode(&block[..JournalHeader::SIZE])?;
        Ok(header.is_valid().then_some(header))
    }

    /// 在第一块写入空的日志头，其余块不动
    pub fn init(&self) -> Result<JournalHeader> {
        let header = JournalHeader::empty();
        let mut block = block::zeroed();
        header.encode(&mut block[..])?;
        block::write(self.block_device, self.start, &block)?;
        block::flush(self.block_device)?;

        log::info!("journal initialized, capacity={}", self.capacity());
        Ok(header)
    }

    /// 校验过的已用字节数，应落在`[JournalHeader::SIZE, capacity]`之间
    pub fn used(&self, header: &JournalHeader) -> Result<usize> {
        let used = header.bytes_used as usize;
        if (JournalHeader::SIZE..=self.capacity()).contains(&used) {
            Ok(used)
        } else {
            Err(Error::Corrupted("journal usage out of range"))
        }
    }

    #[inline]
    pub fn remaining(&self, header: &JournalHeader) -> Result<usize> {
        Ok(self.capacity() - self.used(header)?)
    }

    /// 在日志末尾追加`bytes`，返回其起始偏移。
    /// 空间不足时什么都不写。
    pub fn append(&self, bytes: &[u8]) -> Result<usize> {
        let mut header = self.header()?.ok_or(Error::NoJournal)?;
        let offset = self.used(&header)?;
        let remaining = self.capacity() - offset;
        if remaining < bytes.len() {
            return Err(Error::JournalFull {
                needed: bytes.len(),
                remaining,
            });
        }

        self.write_at(offset, bytes)?;
        block::flush(self.block_device)?;

        header.bytes_used = (offset + bytes.len()) as u32;
        self.write_header(&header)?;
        block::flush(self.block_device)?;

        Ok(offset)
    }

    pub fn append_record(&self, record: &Record) -> Result<usize> {
        let offset = self.append(&record.to_bytes()?)?;
        log::debug!("journaled {record:?} at offset {offset}");
        Ok(offset)
    }

    /// 从偏移`offset`处读满`buf`
    pub fn read(&self, offset: usize, buf: &mut [u8]) -> Result<()> {
        if offset + buf.len() > self.capacity() {
            return Err(Error::Corrupted("read past the end of the journal"));
        }

        let mut block_id = self.start + (offset / BLOCK_SIZE) as u32;
        let mut inner = offset % BLOCK_SIZE;
        let mut rest = buf;
        while !rest.is_empty() {
            let block = block::read(self.block_device, block_id)?;
            let len = rest.len().min(BLOCK_SIZE - inner);
            let (head, tail) = core::mem::take(&mut rest).split_at_mut(len);
            head.copy_from_slice(&block[inner..inner + len]);

            rest = tail;
            inner = 0;
            block_id = block_id + 1;
        }

        Ok(())
    }

    /// 清零所有日志块并重写日志头。
    /// 日志头最后写入，中途崩溃时旧的记录仍在，可以再 install 一次。
    pub fn clear(&self) -> Result<()> {
        let zero = block::zeroed();
        for i in 1..self.blocks {
            block::write(self.block_device, self.start + i, &zero)?;
        }
        block::flush(self.block_device)?;

        let mut first = block::zeroed();
        JournalHeader::empty().encode(&mut first[..])?;
        block::write(self.block_device, self.start, &first)?;
        block::flush(self.block_device)?;

        log::debug!("journal cleared");
        Ok(())
    }

    /// 从日志头之后顺序解析记录，直到`bytes_used`
    #[inline]
    pub fn records(&self, header: &JournalHeader) -> Records<'_, 'a> {
        Records::new(self, header)
    }
}

impl Journal<'_> {
    fn write_header(&self, header: &JournalHeader) -> Result<()> {
        let mut block = block::read(self.block_device, self.start)?;
        header.encode(&mut block[..JournalHeader::SIZE])?;
        block::write(self.block_device, self.start, &block)
    }

    fn write_at(&self, offset: usize, bytes: &[u8]) -> Result<()> {
        let mut block_id = self.start + (offset / BLOCK_SIZE) as u32;
        let mut inner = offset % BLOCK_SIZE;
        let mut rest = bytes;
        while !rest.is_empty() {
            let mut block = block::read(self.block_device, block_id)?;
            let len = rest.len().min(BLOCK_SIZE - inner);
            block[inner..inner + len].copy_from_slice(&rest[..len]);
            block::write(self.block_device, block_id, &block)?;

            rest = &rest[len..];
            inner = 0;
            block_id = block_id + 1;
        }

        Ok(())
    }
}
