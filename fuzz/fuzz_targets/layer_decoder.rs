#![no_main]
use std::time::Duration;

use libfuzzer_sys::fuzz_target;
use pcap_tagger::decoder::DecodedRecord;
use pcap_tagger::pcap::PcapPacket;
use pcap_tagger::{render_fragment, DataLink};

fuzz_target!(|data: &[u8]| {
    let packet = PcapPacket::new(Duration::ZERO, data.len() as u32, data);

    for datalink in [DataLink::ETHERNET, DataLink::RAW] {
        let record = DecodedRecord::decode(&packet, datalink);
        let _ = render_fragment(&record);
    }
});
