use super::record::DataRecordHead;
use super::{Journal, JournalHeader, Record, RecordHeader, COMMIT_RECORD_SIZE, DATA_RECORD_SIZE};
use crate::block;
use crate::{BlockId, Result};

/// 扫描停止的原因
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ScanEnd {
    /// 恰好读到`bytes_used`
    #[default]
    Clean,
    UnknownRecord { offset: usize, kind: u16 },
    /// 记录声明的大小与其类型不符
    BadSize { offset: usize, size: u16 },
    /// 最后一条记录超出了`bytes_used`
    Truncated { offset: usize },
    /// 数据记录的目标块不在归属区域内
    BadTarget { offset: usize, block_id: BlockId },
}

impl ScanEnd {
    #[inline]
    pub fn is_clean(&self) -> bool {
        *self == Self::Clean
    }
}

/// 记录的前向游标，产出`(偏移, 记录)`
pub struct Records<'j, 'a> {
    journal: &'j Journal<'a>,
    offset: usize,
    end: usize,
    stop: Option<ScanEnd>,
    failed: bool,
}

impl<'j, 'a> Records<'j, 'a> {
    pub(super) fn new(journal: &'j Journal<'a>, header: &JournalHeader) -> Self {
        let used = header.bytes_used as usize;
        // 防止`bytes_used`损坏时越过日志区
        let end = used.min(journal.capacity());
        if used > end {
            log::warn!("journal claims {used} bytes but holds only {end}");
        }

        Self {
            journal,
            offset: JournalHeader::SIZE,
            end,
            stop: None,
            failed: false,
        }
    }

    /// 扫描停止的原因，迭代结束后才有意义
    #[inline]
    pub fn end(&self) -> ScanEnd {
        self.stop.unwrap_or_default()
    }

    fn halt(&mut self, end: ScanEnd) -> Result<Option<(usize, Record)>> {
        if !end.is_clean() {
            log::debug!("journal scan halted: {end:?}");
        }
        self.stop = Some(end);
        Ok(None)
    }

    fn next_record(&mut self) -> Result<Option<(usize, Record)>> {
        let offset = self.offset;
        if offset >= self.end {
            return self.halt(ScanEnd::Clean);
        }
        if offset + RecordHeader::SIZE > self.end {
            return self.halt(ScanEnd::Truncated { offset });
        }

        let mut raw = [0; RecordHeader::SIZE];
        self.journal.read(offset, &mut raw)?;
        let header = RecordHeader::decode(&raw)?;

        let record = match header.kind {
            RecordHeader::DATA => {
                if header.size as usize != DATA_RECORD_SIZE {
                    return self.halt(ScanEnd::BadSize {
                        offset,
                        size: header.size,
                    });
                }
                if offset + DATA_RECORD_SIZE > self.end {
                    return self.halt(ScanEnd::Truncated { offset });
                }

                let mut raw = [0; DataRecordHead::SIZE];
                self.journal.read(offset, &mut raw)?;
                let head = DataRecordHead::decode(&raw)?;
                let mut data = block::zeroed();
                self.journal
                    .read(offset + DataRecordHead::SIZE, &mut data[..])?;

                Record::data(BlockId::new(head.block_id), data)
            }
            RecordHeader::COMMIT => {
                if header.size as usize != COMMIT_RECORD_SIZE {
                    return self.halt(ScanEnd::BadSize {
                        offset,
                        size: header.size,
                    });
                }
                Record::Commit
            }
            kind => return self.halt(ScanEnd::UnknownRecord { offset, kind }),
        };

        self.offset += header.size as usize;
        Ok(Some((offset, record)))
    }
}

impl Iterator for Records<'_, '_> {
    type Item = Result<(usize, Record)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.stop.is_some() {
            return None;
        }

        match self.next_record() {
            Ok(item) => item.map(Ok),
            Err(err) => {
                self.failed = true;
                Some(Err(err))
            }
        }
    }
}
