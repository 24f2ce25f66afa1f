#![allow(dead_code)]

use std::io;
use std::ops::Range;
use std::sync::{Arc, Mutex};

use block_dev::BlockDevice;
use vsfs::{dir_entry, BlockId, DirEntry, DiskInode, InodeKind, SuperBlock, Vsfs, BLOCK_SIZE};

/// 内存中的块设备，记录每次写入的块号
pub struct RamDisk {
    data: Mutex<Vec<u8>>,
    writes: Mutex<Vec<usize>>,
    num_blocks: usize,
}

impl RamDisk {
    pub fn new(num_blocks: usize) -> Self {
        Self {
            data: Mutex::new(vec![0; num_blocks * BLOCK_SIZE]),
            writes: Mutex::new(Vec::new()),
            num_blocks,
        }
    }

    pub fn block(&self, block_id: u32) -> Vec<u8> {
        self.span(block_id..block_id + 1)
    }

    pub fn span(&self, blocks: Range<u32>) -> Vec<u8> {
        let data = self.data.lock().unwrap();
        data[blocks.start as usize * BLOCK_SIZE..blocks.end as usize * BLOCK_SIZE].to_vec()
    }

    /// 绕过日志直接改写某块中的字节
    pub fn poke(&self, block_id: u32, offset: usize, bytes: &[u8]) {
        let mut data = self.data.lock().unwrap();
        let start = block_id as usize * BLOCK_SIZE + offset;
        data[start..start + bytes.len()].copy_from_slice(bytes);
    }

    pub fn writes(&self) -> Vec<usize> {
        self.writes.lock().unwrap().clone()
    }

    pub fn forget_writes(&self) {
        self.writes.lock().unwrap().clear();
    }
}

impl BlockDevice for RamDisk {
    fn num_blocks(&self) -> usize {
        self.num_blocks
    }

    fn read_block(&self, block_id: usize, buf: &mut [u8]) -> io::Result<()> {
        if block_id >= self.num_blocks || buf.len() != BLOCK_SIZE {
            return Err(io::ErrorKind::UnexpectedEof.into());
        }
        let data = self.data.lock().unwrap();
        buf.copy_from_slice(&data[block_id * BLOCK_SIZE..][..BLOCK_SIZE]);
        Ok(())
    }

    fn write_block(&self, block_id: usize, buf: &[u8]) -> io::Result<()> {
        if block_id >= self.num_blocks || buf.len() != BLOCK_SIZE {
            return Err(io::ErrorKind::WriteZero.into());
        }
        let mut data = self.data.lock().unwrap();
        data[block_id * BLOCK_SIZE..][..BLOCK_SIZE].copy_from_slice(buf);
        self.writes.lock().unwrap().push(block_id);
        Ok(())
    }
}

/// 按默认布局格式化：根目录占0号 inode 与第一个数据块，只有`.`和`..`
pub fn format(disk: &RamDisk) {
    let sb = SuperBlock::default();

    let mut block = vec![0; BLOCK_SIZE];
    sb.encode(&mut block).unwrap();
    disk.poke(0, 0, &block);

    disk.poke(sb.inode_bitmap, 0, &[0b1]);
    disk.poke(sb.data_bitmap, 0, &[0b1]);

    let mut root = DiskInode {
        kind: InodeKind::Directory,
        links: 2,
        size: 2 * DirEntry::SIZE as u32,
        ..Default::default()
    };
    root.direct[0] = sb.data_start;
    let mut raw = [0; DiskInode::SIZE];
    root.encode(&mut raw).unwrap();
    disk.poke(sb.inode_start, 0, &raw);

    let mut dir = [0; BLOCK_SIZE];
    dir_entry::put_entry(&mut dir, 0, &DirEntry::new(0, b".")).unwrap();
    dir_entry::put_entry(&mut dir, 1, &DirEntry::new(0, b"..")).unwrap();
    disk.poke(sb.data_start, 0, &dir);

    disk.forget_writes();
}

/// 格式化好的镜像及其会话
pub fn fresh() -> (Arc<RamDisk>, Vsfs) {
    let disk = Arc::new(RamDisk::new(vsfs::TOTAL_BLOCKS as usize));
    format(&disk);
    let fs = Vsfs::open(disk.clone()).unwrap();
    (disk, fs)
}

/// 直接改写根 inode
pub fn rewrite_root(disk: &RamDisk, f: impl FnOnce(&mut DiskInode)) {
    let sb = SuperBlock::default();
    let block = disk.block(sb.inode_start);
    let mut root = DiskInode::decode(&block).unwrap();
    f(&mut root);
    let mut raw = [0; DiskInode::SIZE];
    root.encode(&mut raw).unwrap();
    disk.poke(sb.inode_start, 0, &raw);
}

/// 日志区的全部字节
pub fn journal_bytes(disk: &RamDisk) -> Vec<u8> {
    let sb = SuperBlock::default();
    disk.span(sb.journal_block..sb.inode_bitmap)
}

pub fn root_dir_block() -> BlockId {
    BlockId::new(SuperBlock::default().data_start)
}
