use std::fs;

use byteorder_slice::LittleEndian;
use pcap_tagger::pcap::{PacketHeader, PcapHeader};
use pcap_tagger::{dump_beside, dump_to_text, DecodeError};

use super::{capture, capture_bytes, init_logger, ipv4_packet, tcp_header, udp_datagram};

const TCP_IPV4: &str = "Arrival time: 1442125307748184\n\
                        Protocol: PCAP\n\
                        Destination port: 443\n\
                        Header length: 20\n\
                        Source port: 50000\n\
                        Ack number: 2\n\
                        Name: tcp\n\
                        Sequence number: 1\n\
                        1442125307748184IPv4";

fn dump(name: &str) -> String {
    init_logger();
    let dir = tempfile::tempdir().unwrap();
    let txt = dir.path().join("dump.txt");

    dump_to_text(capture(name), &txt).unwrap();

    fs::read_to_string(&txt).unwrap()
}

/// Dumps `data` written to a scratch capture, returning the result and the text file content.
fn dump_bytes(data: &[u8]) -> (Result<(), DecodeError>, Option<String>) {
    init_logger();
    let dir = tempfile::tempdir().unwrap();
    let pcap = dir.path().join("in.pcap");
    let txt = dir.path().join("out.txt");
    fs::write(&pcap, data).unwrap();

    let res = dump_to_text(&pcap, &txt);

    (res, fs::read_to_string(&txt).ok())
}

#[test]
fn dump_tcp_over_ipv4() {
    assert_eq!(dump("tcp_ipv4.pcap"), TCP_IPV4);
}

#[test]
fn dump_keeps_only_the_last_record() {
    assert_eq!(
        dump("udp_then_tcp_ipv6.pcap"),
        "Arrival time: 1700000001250000\n\
         Protocol: PCAP\n\
         Destination port: 8080\n\
         Header length: 32\n\
         Source port: 40000\n\
         Ack number: 7\n\
         Name: tcp\n\
         Sequence number: 3735928559\n\
         1700000001250000IPv6"
    );
}

#[test]
fn dump_raw_ip_nanosecond_capture() {
    let text = dump("raw_ip_nanosecond.pcap");

    assert!(text.starts_with("Arrival time: 1600000000123456\n"));
    assert!(text.contains("Destination port: 22\n"));
    assert!(text.ends_with("1600000000123456IPv4"));
}

#[test]
fn dump_without_tcp_is_empty() {
    assert_eq!(dump("udp_only.pcap"), "");
}

#[test]
fn dump_every_capture() {
    init_logger();
    let dir = tempfile::tempdir().unwrap();
    let pattern = format!("{}/tests/captures/*.pcap", env!("CARGO_MANIFEST_DIR"));

    let mut nb_captures = 0;
    for entry in glob::glob(&pattern).unwrap() {
        let path = entry.unwrap();
        let txt = dir.path().join(path.file_name().unwrap()).with_extension("txt");

        dump_to_text(&path, &txt).unwrap_or_else(|e| panic!("Error dumping {}: {e}", path.display()));
        assert!(txt.exists());
        nb_captures += 1;
    }

    assert_eq!(nb_captures, 4);
}

#[test]
fn overwrite_not_append() {
    let tcp = ipv4_packet(6, &tcp_header(50000, 443, 1, 2));
    let udp = ipv4_packet(17, &udp_datagram());

    // Only the last record carries TCP: the file holds its text alone
    let (res, text) = dump_bytes(&capture_bytes(10123, &[udp.clone(), udp.clone(), tcp.clone()]));
    res.unwrap();
    assert_eq!(text.unwrap(), TCP_IPV4);

    // The TCP record is followed by one without: its text is overwritten
    let (res, text) = dump_bytes(&capture_bytes(10123, &[tcp, udp]));
    res.unwrap();
    assert_eq!(text.unwrap(), "");
}

#[test]
fn capture_without_records_gives_empty_file() {
    let (res, text) = dump_bytes(&capture_bytes(1, &[]));

    res.unwrap();
    assert_eq!(text.unwrap(), "");
}

#[test]
fn bad_magic_leaves_destination_untouched() {
    let mut data = capture_bytes(1, &[ipv4_packet(6, &tcp_header(1, 2, 3, 4))]);
    data[0] = 0;

    let (res, text) = dump_bytes(&data);

    assert!(matches!(res, Err(DecodeError::UnreadableOrMalformed(_))));
    assert_eq!(text, None);
}

#[test]
fn missing_source_is_unreadable() {
    let dir = tempfile::tempdir().unwrap();

    let res = dump_to_text(dir.path().join("nope.pcap"), dir.path().join("nope.txt"));

    assert!(matches!(res, Err(DecodeError::UnreadableOrMalformed(_))));
    assert!(!dir.path().join("nope.txt").exists());
}

#[test]
fn truncated_record_aborts_after_previous_records() {
    let tcp = ipv4_packet(6, &tcp_header(50000, 443, 1, 2));
    let mut data = capture_bytes(10123, &[tcp.clone(), tcp]);
    data.truncate(data.len() - 5);

    let (res, text) = dump_bytes(&data);

    assert!(matches!(res, Err(DecodeError::UnreadableOrMalformed(_))));
    assert_eq!(text.unwrap(), TCP_IPV4);
}

#[test]
fn oversized_record_length_is_unreadable() {
    let header = PcapHeader { snaplen: u32::MAX, ..Default::default() };
    let record = PacketHeader { ts_sec: 0, ts_frac: 0, incl_len: 0xF000_0000, orig_len: 0xF000_0000 };

    let mut data = header.to_bytes().to_vec();
    data.extend_from_slice(&record.to_bytes::<LittleEndian>());
    data.extend_from_slice(&[1, 2, 3, 4]);

    let (res, text) = dump_bytes(&data);

    assert!(matches!(res, Err(DecodeError::UnreadableOrMalformed(_))));
    assert_eq!(text.unwrap(), "");
}

#[test]
fn dump_beside_writes_txt_next_to_capture() {
    let dir = tempfile::tempdir().unwrap();
    let pcap = dir.path().join("chrome.pcap");
    fs::copy(capture("tcp_ipv4.pcap"), &pcap).unwrap();

    let txt = dump_beside(&pcap).unwrap();

    assert_eq!(txt, dir.path().join("chrome.txt"));
    assert_eq!(fs::read_to_string(txt).unwrap(), TCP_IPV4);
}
