//! Decodes the protocol layers of a captured record.
//!
//! A record decodes to a [`DecodedRecord`]: its arrival time and the stack of
//! layers found in its bytes, outermost first. Layers are a closed set of
//! variants ([`Layer`]) queried with [`DecodedRecord::has_layer`] and
//! [`DecodedRecord::get_layer`].

use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::time::Duration;

use etherparse::{Ethernet2HeaderSlice, Ipv4HeaderSlice, Ipv6HeaderSlice, TcpHeaderSlice};
use log::trace;

use crate::link_layer::{SyntheticLinkHeader, ETHERTYPE_IPV4, ETHERTYPE_IPV6};
use crate::pcap::PcapPacket;
use crate::DataLink;

/// IP protocol number for TCP.
pub const IP_PROTO_TCP: u8 = 6;

/// Name of the container every decoded record comes from.
pub const RECORD_PROTOCOL: &str = "PCAP";

/// Kind of a [`Layer`].
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum LayerKind {
    /// Ethernet II
    Ethernet,
    /// IPv4
    Ipv4,
    /// IPv6
    Ipv6,
    /// TCP
    Tcp,
    /// Anything that isn't decoded
    Other,
}

impl fmt::Display for LayerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LayerKind::Ethernet => "ETHERNET_II",
            LayerKind::Ipv4 => "IPv4",
            LayerKind::Ipv6 => "IPv6",
            LayerKind::Tcp => "TCP",
            LayerKind::Other => "OTHER",
        };
        f.write_str(name)
    }
}

/// Ethernet II header.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct EthernetLayer {
    /// Destination MAC address
    pub destination: [u8; 6],
    /// Source MAC address, the application identifier in synthetic headers
    pub source: [u8; 6],
    /// EtherType of the payload
    pub ether_type: u16,
}

impl EthernetLayer {
    /// Application identifier carried in the source address of a synthetic header.
    pub fn application_id(&self) -> u32 {
        SyntheticLinkHeader::identifier_from_source(&self.source)
    }
}

/// IPv4 header.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Ipv4Layer {
    /// Source address
    pub source: Ipv4Addr,
    /// Destination address
    pub destination: Ipv4Addr,
    /// IP protocol number of the payload
    pub protocol: u8,
    /// Time to live
    pub ttl: u8,
    /// Fragment offset in 8 byte units
    pub fragment_offset: u16,
}

/// IPv6 fixed header.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Ipv6Layer {
    /// Source address
    pub source: Ipv6Addr,
    /// Destination address
    pub destination: Ipv6Addr,
    /// IP protocol number of the header following the fixed header
    pub next_header: u8,
    /// Hop limit
    pub hop_limit: u8,
}

/// TCP header.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct TcpLayer {
    /// Source port
    pub source_port: u16,
    /// Destination port
    pub destination_port: u16,
    /// Sequence number
    pub sequence_number: u32,
    /// Acknowledgment number, meaningful only when `ack` is set
    pub acknowledgment_number: u32,
    /// Header length in bytes, options included
    pub header_len: u16,
    /// Receive window size
    pub window_size: u16,
    /// SYN flag
    pub syn: bool,
    /// ACK flag
    pub ack: bool,
    /// FIN flag
    pub fin: bool,
    /// RST flag
    pub rst: bool,
}

impl TcpLayer {
    /// Short name of the connection's protocol.
    pub fn name(&self) -> &'static str {
        "tcp"
    }
}

/// One decoded protocol layer.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Layer {
    /// Ethernet II header
    Ethernet(EthernetLayer),
    /// IPv4 header
    Ipv4(Ipv4Layer),
    /// IPv6 fixed header
    Ipv6(Ipv6Layer),
    /// TCP header
    Tcp(TcpLayer),
    /// Bytes that weren't decoded, with their length
    Other(usize),
}

impl Layer {
    /// Returns the kind of the layer.
    pub fn kind(&self) -> LayerKind {
        match self {
            Layer::Ethernet(_) => LayerKind::Ethernet,
            Layer::Ipv4(_) => LayerKind::Ipv4,
            Layer::Ipv6(_) => LayerKind::Ipv6,
            Layer::Tcp(_) => LayerKind::Tcp,
            Layer::Other(_) => LayerKind::Other,
        }
    }
}

/// A record with its decoded layers, outermost first.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DecodedRecord {
    /// Arrival time since EPOCH
    pub arrival_time: Duration,
    /// Decoded layers, outermost first
    pub layers: Vec<Layer>,
}

impl DecodedRecord {
    /// Decodes the layers of `packet`, whose first layer is given by `datalink`.
    ///
    /// Decoding never fails: it stops at the first layer that is truncated or unknown.
    pub fn decode(packet: &PcapPacket, datalink: DataLink) -> DecodedRecord {
        let mut layers = Vec::new();
        let data = &packet.data[..];

        match datalink {
            DataLink::ETHERNET => decode_ethernet(data, &mut layers),
            DataLink::RAW => decode_ip(data, &mut layers),
            DataLink::Unknown(link) => {
                trace!("Link type {} is not decoded", link);
                push_other(data, &mut layers);
            },
        }

        DecodedRecord { arrival_time: packet.timestamp, layers }
    }

    /// Arrival time in microseconds since EPOCH.
    pub fn arrival_micros(&self) -> u128 {
        self.arrival_time.as_micros()
    }

    /// Name of the outermost protocol of the record.
    pub fn protocol(&self) -> &'static str {
        RECORD_PROTOCOL
    }

    /// Returns true if the record has a layer of the given kind.
    pub fn has_layer(&self, kind: LayerKind) -> bool {
        self.get_layer(kind).is_some()
    }

    /// Returns the outermost layer of the given kind.
    pub fn get_layer(&self, kind: LayerKind) -> Option<&Layer> {
        self.layers.iter().find(|layer| layer.kind() == kind)
    }

    /// Returns the layer directly enclosing the outermost layer of the given kind.
    pub fn beneath(&self, kind: LayerKind) -> Option<&Layer> {
        let idx = self.layers.iter().position(|layer| layer.kind() == kind)?;
        idx.checked_sub(1).map(|outer| &self.layers[outer])
    }

    /// Returns the TCP layer of the record, if any.
    pub fn tcp(&self) -> Option<&TcpLayer> {
        match self.get_layer(LayerKind::Tcp) {
            Some(Layer::Tcp(tcp)) => Some(tcp),
            _ => None,
        }
    }

    /// Application identifier of a record framed by a synthetic link-layer header.
    pub fn application_id(&self) -> Option<u32> {
        match self.get_layer(LayerKind::Ethernet) {
            Some(Layer::Ethernet(eth)) => Some(eth.application_id()),
            _ => None,
        }
    }
}

fn push_other(data: &[u8], layers: &mut Vec<Layer>) {
    if !data.is_empty() {
        layers.push(Layer::Other(data.len()));
    }
}

fn decode_ethernet(data: &[u8], layers: &mut Vec<Layer>) {
    let eth = match Ethernet2HeaderSlice::from_slice(data) {
        Ok(eth) => eth,
        Err(e) => {
            trace!("Ethernet not decoded: {}", e);
            return push_other(data, layers);
        },
    };

    let ether_type = eth.ether_type().0;
    layers.push(Layer::Ethernet(EthernetLayer { destination: eth.destination(), source: eth.source(), ether_type }));

    let rem = &data[eth.slice().len()..];
    match ether_type {
        ETHERTYPE_IPV4 => decode_ipv4(rem, layers),
        ETHERTYPE_IPV6 => decode_ipv6(rem, layers),
        _ => push_other(rem, layers),
    }
}

/// Raw IP: the version nibble tells IPv4 from IPv6.
fn decode_ip(data: &[u8], layers: &mut Vec<Layer>) {
    match data.first().map(|b| b >> 4) {
        Some(4) => decode_ipv4(data, layers),
        Some(6) => decode_ipv6(data, layers),
        _ => push_other(data, layers),
    }
}

fn decode_ipv4(data: &[u8], layers: &mut Vec<Layer>) {
    let ip = match Ipv4HeaderSlice::from_slice(data) {
        Ok(ip) => ip,
        Err(e) => {
            trace!("IPv4 not decoded: {}", e);
            return push_other(data, layers);
        },
    };

    let layer = Ipv4Layer {
        source: ip.source_addr(),
        destination: ip.destination_addr(),
        protocol: ip.protocol().0,
        ttl: ip.ttl(),
        fragment_offset: ip.fragments_offset().value(),
    };
    layers.push(Layer::Ipv4(layer));

    // Ethernet padding past total_len is not payload
    let header_len = ip.slice().len();
    let end = (ip.total_len() as usize).clamp(header_len, data.len());
    let rem = &data[header_len..end];

    // Only the first fragment starts with the transport header
    if layer.protocol == IP_PROTO_TCP && layer.fragment_offset == 0 {
        decode_tcp(rem, layers)
    } else {
        push_other(rem, layers)
    }
}

fn decode_ipv6(data: &[u8], layers: &mut Vec<Layer>) {
    let ip = match Ipv6HeaderSlice::from_slice(data) {
        Ok(ip) => ip,
        Err(e) => {
            trace!("IPv6 not decoded: {}", e);
            return push_other(data, layers);
        },
    };

    let layer = Ipv6Layer {
        source: ip.source_addr(),
        destination: ip.destination_addr(),
        next_header: ip.next_header().0,
        hop_limit: ip.hop_limit(),
    };
    layers.push(Layer::Ipv6(layer));

    let rem = &data[ip.slice().len()..];
    if layer.next_header == IP_PROTO_TCP {
        decode_tcp(rem, layers)
    } else {
        push_other(rem, layers)
    }
}

fn decode_tcp(data: &[u8], layers: &mut Vec<Layer>) {
    let tcp = match TcpHeaderSlice::from_slice(data) {
        Ok(tcp) => tcp,
        Err(e) => {
            trace!("TCP not decoded: {}", e);
            return push_other(data, layers);
        },
    };

    let header_len = tcp.slice().len();
    layers.push(Layer::Tcp(TcpLayer {
        source_port: tcp.source_port(),
        destination_port: tcp.destination_port(),
        sequence_number: tcp.sequence_number(),
        acknowledgment_number: tcp.acknowledgment_number(),
        header_len: header_len as u16,
        window_size: tcp.window_size(),
        syn: tcp.syn(),
        ack: tcp.ack(),
        fin: tcp.fin(),
        rst: tcp.rst(),
    }));

    push_other(&data[header_len..], layers);
}
