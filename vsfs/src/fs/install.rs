use super::Vsfs;
use crate::block;
use crate::{BlockId, DataBlock, Error, Record, Result, ScanEnd};

/// 回放策略
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ReplayPolicy {
    /// 遇到数据记录就立即写回，不论其后是否有提交记录。
    /// 崩溃时未写完的事务也会被部分应用。
    #[default]
    Lenient,
    /// 数据记录先缓存，遇到本事务的提交记录才一并写回；
    /// 末尾未提交的事务被丢弃。
    CommitOnly,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct InstallReport {
    /// 遇到的提交记录数
    pub transactions: usize,
    /// 写回归属位置的块数
    pub blocks_written: usize,
    /// [`ReplayPolicy::CommitOnly`] 下被丢弃的未提交数据记录数
    pub discarded_records: usize,
    pub end: ScanEnd,
}

impl Vsfs {
    #[inline]
    pub fn install(&self) -> Result<InstallReport> {
        self.install_with(ReplayPolicy::default())
    }

    /// 按日志顺序把数据记录写回归属位置，统计事务数，最后清空日志。
    ///
    /// 遇到无法解析的记录时停止扫描而不报错，日志照样清空，
    /// 停止的原因记录在 [`InstallReport::end`] 中。
    pub fn install_with(&self, policy: ReplayPolicy) -> Result<InstallReport> {
        let journal = self.journal();
        let header = journal.header()?.ok_or(Error::NoJournal)?;

        let mut report = InstallReport::default();
        let mut pending: Vec<(BlockId, Box<DataBlock>)> = Vec::new();
        let mut records = journal.records(&header);
        let mut bad_target = None;

        for item in records.by_ref() {
            let (offset, record) = item?;
            match record {
                Record::Data { block_id, data } => {
                    if !self.geometry.is_home(block_id) {
                        bad_target = Some(ScanEnd::BadTarget { offset, block_id });
                        break;
                    }
                    match policy {
                        ReplayPolicy::Lenient => {
                            self.write_home(block_id, &data)?;
                            report.blocks_written += 1;
                        }
                        ReplayPolicy::CommitOnly => pending.push((block_id, data)),
                    }
                }
                Record::Commit => {
                    for (block_id, data) in pending.drain(..) {
                        self.write_home(block_id, &data)?;
                        report.blocks_written += 1;
                    }
                    report.transactions += 1;
                }
            }
        }

        report.end = bad_target.unwrap_or_else(|| records.end());
        report.discarded_records = pending.len();
        if !report.end.is_clean() {
            log::warn!("journal tail left unparsed: {:?}", report.end);
        }
        if report.discarded_records > 0 {
            log::warn!(
                "discarded {} records of an uncommitted transaction",
                report.discarded_records
            );
        }

        // 归属位置先落盘，再清空日志
        block::flush(&*self.block_device)?;
        journal.clear()?;

        log::info!(
            "installed {} transactions ({} blocks)",
            report.transactions,
            report.blocks_written
        );
        Ok(report)
    }

    fn write_home(&self, block_id: BlockId, data: &DataBlock) -> Result<()> {
        log::debug!("replaying block {block_id}");
        block::write(&*self.block_device, block_id, data)
    }
}
