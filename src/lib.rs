//! Builds pcap captures whose frames are tagged with the application they belong to,
//! and dumps the TCP records of a capture as text.
//!
//! The capture pipeline frames each packet with [`pcap::build_record_header`] and
//! [`link_layer::build_link_layer_header`] (or a [`pcap::CaptureWriter`]), and
//! [`assemble`] turns the raw records into a pcap file. [`dump_to_text`] decodes a
//! capture with [`pcap::PcapReader`] and [`decoder::DecodedRecord`].
//!
//! # Examples
//!
//! ```rust,no_run
//! use pcap_tagger::{assemble, dump_to_text};
//! use pcap_tagger::link_layer::build_link_layer_header;
//! use pcap_tagger::pcap::build_record_header;
//!
//! // An IPv4 packet captured for the app with uid 10123
//! let ip_packet = vec![0x45_u8; 40];
//!
//! let mut raw = Vec::new();
//! raw.extend_from_slice(&build_record_header(ip_packet.len() as i64).unwrap());
//! raw.extend_from_slice(&build_link_layer_header(10123).unwrap());
//! raw.extend_from_slice(&ip_packet);
//!
//! assemble(&raw, "chrome.pcap").unwrap();
//! dump_to_text("chrome.pcap", "chrome.txt").unwrap();
//! ```

pub mod decoder;
pub mod errors;
pub mod link_layer;
pub mod pcap;

mod assembler;
mod common;
mod dump;
mod read_buffer;

pub use assembler::*;
pub use common::*;
pub use dump::*;
pub use errors::*;
