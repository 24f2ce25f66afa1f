use std::io;

use thiserror::Error;

use crate::BlockId;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O failure on block {block_id}")]
    BlockIo {
        block_id: BlockId,
        #[source]
        source: io::Error,
    },

    #[error("failed to flush block device")]
    Flush(#[source] io::Error),

    #[error("malformed on-disk record")]
    Codec(#[from] binrw::Error),

    #[error("invalid filesystem magic")]
    BadMagic,

    #[error("invalid filesystem geometry: {0}")]
    BadGeometry(&'static str),

    #[error("journal does not exist")]
    NoJournal,

    #[error("root is not a directory")]
    NotADirectory,

    #[error("no free inodes")]
    NoFreeInode,

    #[error("no free directory entries in root")]
    NoFreeDirEntry,

    /// 日志区剩余空间放不下整个事务，需要先 install
    #[error("journal is full ({needed} bytes needed, {remaining} left), run install first")]
    JournalFull { needed: usize, remaining: usize },

    #[error("file name must not be empty")]
    InvalidName,

    #[error("corrupted filesystem: {0}")]
    Corrupted(&'static str),
}

pub type Result<T> = core::result::Result<T, Error>;
