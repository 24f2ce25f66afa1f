mod common;

use common::{fresh, journal_bytes};
use vsfs::{
    BlockId, Error, Journal, JournalHeader, Record, ScanEnd, BLOCK_SIZE, COMMIT_RECORD_SIZE,
    DATA_RECORD_SIZE,
};

#[test]
fn lazy_header() {
    let (_disk, fs) = fresh();
    let journal = fs.journal();

    assert_eq!(None, journal.header().unwrap());
    assert!(matches!(journal.append(b"early"), Err(Error::NoJournal)));

    let header = journal.init().unwrap();
    assert_eq!(Some(header), journal.header().unwrap());
    assert_eq!(JournalHeader::SIZE, journal.used(&header).unwrap());
    assert_eq!(16 * BLOCK_SIZE - JournalHeader::SIZE, journal.remaining(&header).unwrap());
}

#[test]
fn append_read_across_blocks() {
    let (_disk, fs) = fresh();
    let journal = fs.journal();
    journal.init().unwrap();

    let small: Vec<u8> = (0..100u8).collect();
    let spanning: Vec<u8> = (0..BLOCK_SIZE + 300).map(|i| (i % 251) as u8).collect();
    let tail = vec![0xC3; 17];

    let offsets = [&small, &spanning, &tail].map(|bytes| journal.append(bytes).unwrap());
    assert_eq!([8, 108, 108 + BLOCK_SIZE + 300], offsets);

    for (offset, expected) in offsets.iter().zip([&small, &spanning, &tail]) {
        let mut buf = vec![0; expected.len()];
        journal.read(*offset, &mut buf).unwrap();
        assert_eq!(expected, &buf);
    }

    let header = journal.header().unwrap().unwrap();
    assert_eq!(108 + BLOCK_SIZE + 300 + 17, header.bytes_used as usize);
}

#[test]
fn full_journal_is_untouched() {
    let (disk, fs) = fresh();
    let journal = fs.journal();
    journal.init().unwrap();

    let record = Record::data(BlockId::new(17), Box::new([0x11; BLOCK_SIZE]));
    for _ in 0..15 {
        journal.append_record(&record).unwrap();
    }
    let header = journal.header().unwrap().unwrap();
    assert_eq!(8 + 15 * DATA_RECORD_SIZE, header.bytes_used as usize);

    let before = journal_bytes(&disk);
    disk.forget_writes();

    let err = journal.append_record(&record).unwrap_err();
    assert!(matches!(
        err,
        Error::JournalFull { needed: DATA_RECORD_SIZE, remaining } if remaining == 16 * BLOCK_SIZE - header.bytes_used as usize
    ));
    assert_eq!(before, journal_bytes(&disk));
    assert!(disk.writes().is_empty());
    assert_eq!(Some(header), journal.header().unwrap());

    // 提交记录仍然放得下
    journal.append_record(&Record::Commit).unwrap();
}

#[test]
fn scan_yields_records_in_order() {
    let (_disk, fs) = fresh();
    let journal = fs.journal();
    journal.init().unwrap();

    let first = Record::data(BlockId::new(17), Box::new([1; BLOCK_SIZE]));
    let second = Record::data(BlockId::new(40), Box::new([2; BLOCK_SIZE]));
    for record in [&first, &second, &Record::Commit] {
        journal.append_record(record).unwrap();
    }

    let header = journal.header().unwrap().unwrap();
    let mut records = journal.records(&header);
    let found: Vec<_> = records.by_ref().map(Result::unwrap).collect();
    assert_eq!(
        vec![
            (8, first),
            (8 + DATA_RECORD_SIZE, second),
            (8 + 2 * DATA_RECORD_SIZE, Record::Commit)
        ],
        found
    );
    assert_eq!(ScanEnd::Clean, records.end());
}

#[test]
fn scan_stops_at_anomalies() {
    let (_disk, fs) = fresh();
    let journal = fs.journal();
    journal.init().unwrap();

    journal.append_record(&Record::Commit).unwrap();
    // 未知类型
    journal.append(&[9, 0, 4, 0]).unwrap();
    journal.append_record(&Record::Commit).unwrap();

    let header = journal.header().unwrap().unwrap();
    let mut records = journal.records(&header);
    assert_eq!(1, records.by_ref().count());
    assert_eq!(ScanEnd::UnknownRecord { offset: 12, kind: 9 }, records.end());

    journal.clear().unwrap();
    // 提交记录声明了错误的大小
    journal.append(&[2, 0, 8, 0]).unwrap();
    let header = journal.header().unwrap().unwrap();
    let mut records = journal.records(&header);
    assert_eq!(0, records.by_ref().count());
    assert_eq!(ScanEnd::BadSize { offset: 8, size: 8 }, records.end());

    journal.clear().unwrap();
    // 数据记录只写了一半
    let bytes = Record::data(BlockId::new(17), Box::new([0; BLOCK_SIZE]))
        .to_bytes()
        .unwrap();
    journal.append(&bytes[..100]).unwrap();
    let header = journal.header().unwrap().unwrap();
    let mut records = journal.records(&header);
    assert_eq!(0, records.by_ref().count());
    assert_eq!(ScanEnd::Truncated { offset: 8 }, records.end());
}

#[test]
fn clear_zeroes_everything() {
    let (disk, fs) = fresh();
    let journal = fs.journal();
    journal.init().unwrap();
    for _ in 0..3 {
        journal
            .append_record(&Record::data(BlockId::new(30), Box::new([0xEE; BLOCK_SIZE])))
            .unwrap();
    }
    journal.append_record(&Record::Commit).unwrap();

    journal.clear().unwrap();

    let header = journal.header().unwrap().unwrap();
    assert_eq!(JournalHeader::empty(), header);
    let bytes = journal_bytes(&disk);
    assert!(bytes[JournalHeader::SIZE..].iter().all(|&b| b == 0));
    assert_eq!(0, journal.records(&header).count());
}

#[test]
fn read_past_end() {
    let (_disk, fs) = fresh();
    let journal: Journal<'_> = fs.journal();
    let mut buf = [0; COMMIT_RECORD_SIZE];
    assert!(matches!(
        journal.read(journal.capacity() - 2, &mut buf),
        Err(Error::Corrupted(_))
    ));
}
