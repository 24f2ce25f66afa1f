use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::Path;
use std::sync::{Mutex, PoisonError};

use block_dev::BlockDevice;
use vsfs::BLOCK_SIZE;

/// 以主机上的镜像文件作块设备
#[derive(Debug)]
pub struct BlockFile {
    file: Mutex<File>,
    num_blocks: usize,
}

impl BlockFile {
    pub fn new(file: File) -> io::Result<Self> {
        let num_blocks = (file.metadata()?.len() / BLOCK_SIZE as u64) as usize;
        Ok(Self {
            file: Mutex::new(file),
            num_blocks,
        })
    }

    /// 以读写方式打开已有的镜像
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let file = OpenOptions::new().read(true).write(true).open(path)?;
        Self::new(file)
    }

    fn seek_to(&self, file: &mut File, block_id: usize, len: usize) -> io::Result<()> {
        if block_id >= self.num_blocks {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("block {block_id} is beyond the image ({} blocks)", self.num_blocks),
            ));
        }
        if len != BLOCK_SIZE {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("buffer of {len} bytes is not a complete block"),
            ));
        }
        file.seek(SeekFrom::Start((block_id * BLOCK_SIZE) as u64))?;
        Ok(())
    }
}

impl BlockDevice for BlockFile {
    fn num_blocks(&self) -> usize {
        self.num_blocks
    }

    fn read_block(&self, block_id: usize, buf: &mut [u8]) -> io::Result<()> {
        let mut file = self.file.lock().unwrap_or_else(PoisonError::into_inner);
        self.seek_to(&mut file, block_id, buf.len())?;
        file.read_exact(buf)
    }

    fn write_block(&self, block_id: usize, buf: &[u8]) -> io::Result<()> {
        let mut file = self.file.lock().unwrap_or_else(PoisonError::into_inner);
        self.seek_to(&mut file, block_id, buf.len())?;
        file.write_all(buf)
    }

    fn flush(&self) -> io::Result<()> {
        self.file
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .sync_data()
    }
}
