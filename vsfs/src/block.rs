use block_dev::BlockDevice;

use crate::{BlockId, DataBlock, Error, Result, BLOCK_SIZE};

#[inline]
pub fn zeroed() -> Box<DataBlock> {
    Box::new([0; BLOCK_SIZE])
}

pub fn read(block_device: &dyn BlockDevice, block_id: BlockId) -> Result<Box<DataBlock>> {
    let mut block = zeroed();
    log::trace!("read block {block_id}");
    block_device
        .read_block(block_id.index(), &mut block[..])
        .map_err(|source| Error::BlockIo { block_id, source })?;
    Ok(block)
}

pub fn write(block_device: &dyn BlockDevice, block_id: BlockId, block: &DataBlock) -> Result<()> {
    log::trace!("write block {block_id}");
    block_device
        .write_block(block_id.index(), &block[..])
        .map_err(|source| Error::BlockIo { block_id, source })
}

#[inline]
pub fn flush(block_device: &dyn BlockDevice) -> Result<()> {
    block_device.flush().map_err(Error::Flush)
}
