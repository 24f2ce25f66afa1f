#![allow(dead_code)]

use std::fs::OpenOptions;
use std::io::{Seek, SeekFrom, Write};
use std::path::Path;

use vsfs::{dir_entry, DirEntry, DiskInode, InodeKind, SuperBlock, BLOCK_SIZE};

fn put(file: &mut std::fs::File, block_id: u32, offset: usize, bytes: &[u8]) {
    file.seek(SeekFrom::Start(block_id as u64 * BLOCK_SIZE as u64 + offset as u64))
        .unwrap();
    file.write_all(bytes).unwrap();
}

/// 在`path`处生成默认布局的空镜像
pub fn format_image(path: &Path) {
    let sb = SuperBlock::default();
    let mut file = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
        .unwrap();
    file.set_len(sb.total_blocks as u64 * BLOCK_SIZE as u64).unwrap();

    let mut raw = [0; SuperBlock::SIZE];
    sb.encode(&mut raw).unwrap();
    put(&mut file, 0, 0, &raw);
    put(&mut file, sb.inode_bitmap, 0, &[0b1]);
    put(&mut file, sb.data_bitmap, 0, &[0b1]);

    let mut root = DiskInode {
        kind: InodeKind::Directory,
        links: 2,
        size: 2 * DirEntry::SIZE as u32,
        ..Default::default()
    };
    root.direct[0] = sb.data_start;
    let mut raw = [0; DiskInode::SIZE];
    root.encode(&mut raw).unwrap();
    put(&mut file, sb.inode_start, 0, &raw);

    let mut dir = [0; BLOCK_SIZE];
    dir_entry::put_entry(&mut dir, 0, &DirEntry::new(0, b".")).unwrap();
    dir_entry::put_entry(&mut dir, 1, &DirEntry::new(0, b"..")).unwrap();
    put(&mut file, sb.data_start, 0, &dir);
}
