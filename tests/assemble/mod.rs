use std::fs;

use pcap_tagger::decoder::DecodedRecord;
use pcap_tagger::link_layer::build_link_layer_header;
use pcap_tagger::pcap::{build_global_header, build_record_header, PcapReader};
use pcap_tagger::{assemble, assemble_from_file, dump_to_text, PcapError};

use super::{init_logger, ipv4_packet, tcp_header};

#[test]
fn assemble_ten_bytes() {
    init_logger();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.pcap");

    let raw: Vec<u8> = (0..10).collect();
    assemble(&raw, &path).unwrap();

    let out = fs::read(&path).unwrap();
    assert_eq!(out.len(), 34);
    assert_eq!(&out[..24], &build_global_header());
    assert_eq!(&out[24..], &raw[..]);
}

#[test]
fn assemble_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.pcap");

    assemble(&[], &path).unwrap();

    assert_eq!(fs::read(&path).unwrap(), build_global_header());
}

#[test]
fn assemble_truncates_previous_content() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.pcap");
    fs::write(&path, vec![0xff_u8; 4096]).unwrap();

    assemble(&[0x42], &path).unwrap();

    let out = fs::read(&path).unwrap();
    assert_eq!(out.len(), 25);
    assert_eq!(out[24], 0x42);
}

#[test]
fn assemble_into_missing_directory_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("out.pcap");

    assert!(matches!(assemble(&[1, 2, 3], &path), Err(PcapError::IoError(_))));
}

#[test]
fn assemble_raw_dump_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let raw_path = dir.path().join("chrome");
    let pcap_path = dir.path().join("chrome.pcap");
    fs::write(&raw_path, b"records").unwrap();

    assemble_from_file(&raw_path, &pcap_path).unwrap();

    let out = fs::read(&pcap_path).unwrap();
    assert_eq!(&out[24..], b"records");

    let missing = dir.path().join("nothing");
    assert!(matches!(assemble_from_file(&missing, &pcap_path), Err(PcapError::IoError(_))));
}

/// Frames built by the pipeline builders, assembled, then read and dumped.
#[test]
fn builders_assemble_and_dump() {
    init_logger();
    let dir = tempfile::tempdir().unwrap();
    let pcap_path = dir.path().join("app.pcap");
    let txt_path = dir.path().join("app.txt");

    let packet = ipv4_packet(6, &tcp_header(50000, 443, 1, 2));
    let mut raw = Vec::new();
    raw.extend_from_slice(&build_record_header(packet.len() as i64).unwrap());
    raw.extend_from_slice(&build_link_layer_header(10123).unwrap());
    raw.extend_from_slice(&packet);

    assemble(&raw, &pcap_path).unwrap();

    let mut reader = PcapReader::new(fs::File::open(&pcap_path).unwrap()).unwrap();
    let header = reader.header();
    let pkt = reader.next_packet().unwrap().unwrap();
    assert_eq!(pkt.data.len(), packet.len() + 14);

    let record = DecodedRecord::decode(&pkt, header.datalink);
    assert_eq!(record.application_id(), Some(10123));
    assert!(reader.next_packet().is_none());

    dump_to_text(&pcap_path, &txt_path).unwrap();
    let text = fs::read_to_string(&txt_path).unwrap();
    assert!(text.contains("Destination port: 443"));
}
