use binrw::binrw;

/// 直接索引块的个数
pub const DIRECT_COUNT: usize = 8;

#[binrw]
#[brw(little)]
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DiskInode {
    pub kind: InodeKind,
    /// 硬链接个数
    pub links: u16,
    pub size: u32,
    /// 直接索引块
    pub direct: [u32; DIRECT_COUNT],
    /// 创建时间，秒级 Unix 时间戳
    pub ctime: u32,
    #[brw(pad_after = 80)]
    pub mtime: u32,
}

on_disk!(DiskInode);

#[binrw]
#[brw(repr = u16)]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum InodeKind {
    #[default]
    Free = 0,
    File = 1,
    Directory = 2,
}

impl DiskInode {
    /// inode 大小恒为128字节
    pub const SIZE: usize = crate::INODE_SIZE;

    /// 新建的空文件，没有数据块
    #[inline]
    pub fn new_file(now: u32) -> Self {
        Self {
            kind: InodeKind::File,
            links: 1,
            ctime: now,
            mtime: now,
            ..Default::default()
        }
    }

    #[inline]
    pub fn is_dir(&self) -> bool {
        self.kind == InodeKind::Directory
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout() {
        let mut inode = DiskInode::new_file(0x0102_0304);
        inode.direct[7] = 0xDEAD_BEEF;

        let mut buf = [0xAA; DiskInode::SIZE + 1];
        inode.encode(&mut buf).unwrap();
        assert_eq!([1, 0, 1, 0], buf[..4]);
        assert_eq!(0xDEAD_BEEFu32.to_le_bytes(), buf[36..40]);
        assert_eq!(0x0102_0304u32.to_le_bytes(), buf[40..44]);
        assert!(buf[48..DiskInode::SIZE].iter().all(|&b| b == 0));
        assert_eq!(0xAA, buf[DiskInode::SIZE]);

        assert_eq!(inode, DiskInode::decode(&buf).unwrap());
    }

    #[test]
    fn unknown_kind() {
        let mut buf = [0; DiskInode::SIZE];
        buf[0] = 7;
        assert!(DiskInode::decode(&buf).is_err());
    }
}
