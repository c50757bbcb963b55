use chrono::{DateTime, SecondsFormat, Utc};
use itertools::Itertools;
use std::fmt::{Display, Formatter};

/// `ElemType` tells whether a record announces or withdraws a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ElemType {
    ANNOUNCE,
    WITHDRAW,
}

/// Route distinguisher as published by the collector: the `administrator:assigned-number` text
/// together with the RD type that governs how the administrator subfield is encoded
/// (RFC 4364, section 4.2).
///
/// The collector spreads it over two adjacent columns; the decoder assembles them into this one
/// value.
///
/// ```
/// use obmp_parsed::RouteDistinguisher;
///
/// let rd = RouteDistinguisher::new("65000:100", 0);
/// assert_eq!(rd.administrator(), "65000");
/// assert_eq!(rd.assigned_number(), "100");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RouteDistinguisher {
    pub value: String,
    pub rd_type: u8,
}

impl RouteDistinguisher {
    pub fn new(value: impl Into<String>, rd_type: u8) -> Self {
        RouteDistinguisher {
            value: value.into(),
            rd_type,
        }
    }

    /// Administrator subfield, i.e. the part before the last `:`. The whole value is returned if
    /// there is no separator.
    pub fn administrator(&self) -> &str {
        match self.value.rsplit_once(':') {
            Some((admin, _)) => admin,
            None => self.value.as_str(),
        }
    }

    /// Assigned number subfield, i.e. the part after the last `:`. Empty if there is no separator.
    pub fn assigned_number(&self) -> &str {
        match self.value.rsplit_once(':') {
            Some((_, assigned)) => assigned,
            None => "",
        }
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}

impl Display for RouteDistinguisher {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// One EVPN prefix record from the `evpn_prefix` parsed topic.
///
/// Network values (addresses, AS paths, communities, MACs) are kept as the collector formatted
/// them. Attributes missing from older schema versions, or whose column failed to decode, hold
/// their default value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EvpnPrefix {
    /// `true` unless the action column is `add`.
    pub is_withdrawn: bool,
    /// Collector sequence number. The column is read as a signed 64-bit integer, so values above
    /// `i64::MAX` are reported as [InvalidInteger](crate::models::FieldErrorKind::InvalidInteger).
    pub sequence: u64,
    /// Hash identifying this EVPN prefix.
    pub hash: String,
    pub vpn_hash: String,
    pub router_ip: String,
    pub path_attr_hash: String,
    pub peer_hash: String,
    pub peer_ip: String,
    pub peer_asn: u32,
    pub timestamp: DateTime<Utc>,
    pub origin: String,
    pub as_path: String,
    pub as_path_count: u32,
    pub origin_asn: u32,
    pub next_hop: String,
    pub med: u32,
    pub local_pref: u32,
    pub aggregator: String,
    pub community_list: String,
    pub ext_community_list: String,
    pub cluster_list: String,
    pub is_atomic_agg: bool,
    pub is_nexthop_ipv4: bool,
    pub originator_id: String,
    /// Add-path identifier (schema 1.1 and later).
    pub path_id: String,
    /// Route observed before inbound policy (schema 1.3 and later).
    pub is_pre_policy: bool,

    // EVPN NLRI, schema 1.7 and later
    pub route_distinguisher: RouteDistinguisher,
    pub originating_router_ip_len: u8,
    pub originating_router_ip: String,
    pub ethernet_tag_id_hex: String,
    pub ethernet_segment_id: String,
    pub mac_len: u8,
    pub mac: String,
    pub ip_len: u8,
    pub ip: String,
    pub label_1: u32,
    pub label_2: u32,
    /// EVPN route type (RFC 7432 section 7, RFC 9136 for type 5).
    pub route_type: u8,
    pub gateway: String,
}

impl EvpnPrefix {
    pub fn elem_type(&self) -> ElemType {
        match self.is_withdrawn {
            true => ElemType::WITHDRAW,
            false => ElemType::ANNOUNCE,
        }
    }

    /// Returns true if the record is a route advertisement.
    pub fn is_announcement(&self) -> bool {
        !self.is_withdrawn
    }

    /// `ip/ip_len`, or an empty string when the route carries no IP prefix (e.g. a MAC-only
    /// type 2 route).
    pub fn prefix(&self) -> String {
        match self.ip.is_empty() {
            true => String::new(),
            false => format!("{}/{}", self.ip, self.ip_len),
        }
    }

    /// Returns the PSV header matching [EvpnPrefix::to_psv].
    ///
    /// ```
    /// use obmp_parsed::EvpnPrefix;
    ///
    /// let header = EvpnPrefix::get_psv_header();
    /// assert!(header.starts_with("type|timestamp|peer_ip|peer_asn|route_type|rd|"));
    /// ```
    pub fn get_psv_header() -> String {
        let fields = [
            "type",
            "timestamp",
            "peer_ip",
            "peer_asn",
            "route_type",
            "rd",
            "ethernet_tag_id",
            "ethernet_segment_id",
            "mac",
            "prefix",
            "labels",
            "gateway",
            "originating_router_ip",
            "next_hop",
            "as_path",
            "origin",
            "local_pref",
            "med",
            "communities",
            "ext_communities",
        ];
        fields.join("|")
    }

    /// Converts the record into a pipe-separated line.
    pub fn to_psv(&self) -> String {
        let t = match self.elem_type() {
            ElemType::ANNOUNCE => "A",
            ElemType::WITHDRAW => "W",
        };
        [
            t.to_string(),
            self.timestamp.to_rfc3339_opts(SecondsFormat::AutoSi, true),
            self.peer_ip.clone(),
            self.peer_asn.to_string(),
            self.route_type.to_string(),
            self.route_distinguisher.to_string(),
            self.ethernet_tag_id_hex.clone(),
            self.ethernet_segment_id.clone(),
            self.mac.clone(),
            self.prefix(),
            self.labels().iter().join(" "),
            self.gateway.clone(),
            self.originating_router_ip.clone(),
            self.next_hop.clone(),
            self.as_path.clone(),
            self.origin.clone(),
            self.local_pref.to_string(),
            self.med.to_string(),
            self.community_list.clone(),
            self.ext_community_list.clone(),
        ]
        .iter()
        .join("|")
    }

    /// Non-zero MPLS labels, in order.
    pub fn labels(&self) -> Vec<u32> {
        [self.label_1, self.label_2]
            .into_iter()
            .filter(|l| *l != 0)
            .collect()
    }
}

impl Display for EvpnPrefix {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let t = match self.elem_type() {
            ElemType::ANNOUNCE => "A",
            ElemType::WITHDRAW => "W",
        };
        write!(
            f,
            "{}|{}|{}|{}|{}|{}|{}|{}|{}|{}",
            t,
            self.timestamp.to_rfc3339_opts(SecondsFormat::AutoSi, true),
            &self.peer_ip,
            self.peer_asn,
            self.route_type,
            &self.route_distinguisher,
            &self.mac,
            self.prefix(),
            self.labels().iter().join(" "),
            &self.gateway,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> EvpnPrefix {
        EvpnPrefix {
            peer_ip: "192.0.2.1".to_string(),
            peer_asn: 65001,
            route_type: 2,
            route_distinguisher: RouteDistinguisher::new("192.0.2.1:7", 1),
            mac: "00:11:22:33:44:55".to_string(),
            ip: "10.1.1.1".to_string(),
            ip_len: 32,
            label_1: 100,
            ..Default::default()
        }
    }

    #[test]
    fn test_elem_type() {
        let mut prefix = sample();
        assert_eq!(prefix.elem_type(), ElemType::ANNOUNCE);
        assert!(prefix.is_announcement());
        prefix.is_withdrawn = true;
        assert_eq!(prefix.elem_type(), ElemType::WITHDRAW);
    }

    #[test]
    fn test_route_distinguisher_parts() {
        let rd = RouteDistinguisher::new("192.0.2.1:7", 1);
        assert_eq!(rd.administrator(), "192.0.2.1");
        assert_eq!(rd.assigned_number(), "7");

        let rd = RouteDistinguisher::new("opaque", 0);
        assert_eq!(rd.administrator(), "opaque");
        assert_eq!(rd.assigned_number(), "");

        assert!(RouteDistinguisher::default().is_empty());
    }

    #[test]
    fn test_display() {
        assert_eq!(
            sample().to_string(),
            "A|1970-01-01T00:00:00Z|192.0.2.1|65001|2|192.0.2.1:7|00:11:22:33:44:55|10.1.1.1/32|100|"
        );
    }

    #[test]
    fn test_psv() {
        let header_len = EvpnPrefix::get_psv_header().split('|').count();
        let psv = sample().to_psv();
        assert_eq!(psv.split('|').count(), header_len);
        assert!(psv.starts_with("A|1970-01-01T00:00:00Z|192.0.2.1|65001|2|192.0.2.1:7|"));
    }

    #[test]
    fn test_prefix_without_ip() {
        let prefix = EvpnPrefix {
            ip_len: 0,
            ..Default::default()
        };
        assert_eq!(prefix.prefix(), "");
    }

    #[test]
    #[cfg(feature = "serde")]
    fn test_serialize() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(value["peer_asn"], 65001);
        assert_eq!(value["route_distinguisher"]["value"], "192.0.2.1:7");
    }
}
