use std::time::{SystemTime, UNIX_EPOCH};

use super::Vsfs;
use crate::block;
use crate::dir_entry;
use crate::{DirEntry, DiskInode, Error, Record, Result, ROOT_INODE};
use crate::{COMMIT_RECORD_SIZE, DATA_RECORD_SIZE};

impl Vsfs {
    /// 在根目录下创建名为`name`的空文件，返回新 inode 的编号。
    ///
    /// 只把修改后的 inode 位图、inode 块、根目录块作为一个事务写进日志，
    /// install 之前归属位置上什么都没变。
    /// 超出 [`dir_entry::NAME_MAX_LEN`] 的名字会被截断。
    pub fn create(&self, name: impl AsRef<[u8]>) -> Result<u32> {
        let name = name.as_ref();
        if name.is_empty() {
            return Err(Error::InvalidName);
        }

        let journal = self.journal();
        let header = match journal.header()? {
            Some(header) => header,
            None => journal.init()?,
        };

        let mut inode_bitmap = self.inode_bitmap()?;
        // 0号 inode 保留给根目录
        let inode_id = inode_bitmap
            .first_clear(1..self.geometry.inode_count as usize)
            .ok_or(Error::NoFreeInode)? as u32;

        let mut root = self.root_inode()?;
        let dir_block_id = self.root_dir_block(&root)?;
        let mut dir_block = block::read(&*self.block_device, dir_block_id)?;
        let slot = dir_entry::free_slot(&dir_block, root.size as usize / DirEntry::SIZE)?
            .ok_or(Error::NoFreeDirEntry)?;

        // 新 inode 与根 inode 不在同一块时，两块都要记录
        let (root_block_id, root_offset) = self.geometry.inode_pos(ROOT_INODE);
        let (inode_block_id, inode_offset) = self.geometry.inode_pos(inode_id);
        let mut tables = vec![(root_block_id, block::read(&*self.block_device, root_block_id)?)];
        if inode_block_id != root_block_id {
            tables.push((inode_block_id, block::read(&*self.block_device, inode_block_id)?));
        }

        let needed = (2 + tables.len()) * DATA_RECORD_SIZE + COMMIT_RECORD_SIZE;
        let remaining = journal.remaining(&header)?;
        if remaining < needed {
            return Err(Error::JournalFull { needed, remaining });
        }

        let now = timestamp();

        inode_bitmap.set(inode_id as usize);

        root.size = root.size.max(((slot + 1) * DirEntry::SIZE) as u32);
        root.mtime = now;
        root.encode(&mut tables[0].1[root_offset..][..DiskInode::SIZE])?;
        let last = tables.len() - 1;
        DiskInode::new_file(now).encode(&mut tables[last].1[inode_offset..][..DiskInode::SIZE])?;

        dir_entry::put_entry(&mut dir_block, slot, &DirEntry::new(inode_id, name))?;

        tables.sort_by_key(|(block_id, _)| *block_id);
        let mut records = vec![Record::data(self.geometry.inode_bitmap, inode_bitmap.into_block())];
        records.extend(tables.into_iter().map(|(block_id, data)| Record::data(block_id, data)));
        records.push(Record::data(dir_block_id, dir_block));
        records.push(Record::Commit);

        for record in &records {
            journal.append_record(record)?;
        }

        log::info!(
            "created {:?} as inode {inode_id} in slot {slot}",
            String::from_utf8_lossy(&name[..name.len().min(dir_entry::NAME_MAX_LEN)])
        );
        Ok(inode_id)
    }
}

/// 秒级 Unix 时间戳
fn timestamp() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_secs() as u32)
}
