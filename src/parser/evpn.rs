/*!
Column layout of the `evpn_prefix` parsed topic.

| since | columns |
|---|---|
| 1.0 | action .. originator_id (24 columns) |
| 1.1 | path_id |
| 1.3 | is_pre_policy |
| 1.7 | route distinguisher (2 columns) .. gateway |

EVPN NLRI columns (route distinguisher, MAC, IP, labels, route type, gateway) exist only from 1.7.
Rows decoded with an older version leave those attributes at their defaults without reporting
errors, and trailing columns beyond the layout are ignored.
*/
use crate::models::{EvpnPrefix, FieldErrorKind, FieldValue, SchemaVersion};
use crate::parser::schema::{FieldDef, SchemaStep};
use crate::parser::{Coercer, MsgBusRecord, SchemaRegistry};

/// Attributes of [EvpnPrefix] addressable by the schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EvpnField {
    Action,
    Sequence,
    Hash,
    VpnHash,
    RouterIp,
    PathAttrHash,
    PeerHash,
    PeerIp,
    PeerAsn,
    Timestamp,
    Origin,
    AsPath,
    AsPathCount,
    OriginAsn,
    NextHop,
    Med,
    LocalPref,
    Aggregator,
    CommunityList,
    ExtCommunityList,
    ClusterList,
    IsAtomicAgg,
    IsNexthopIpv4,
    OriginatorId,
    PathId,
    IsPrePolicy,
    RouteDistinguisher,
    OriginatingRouterIpLen,
    OriginatingRouterIp,
    EthernetTagIdHex,
    EthernetSegmentId,
    MacLen,
    Mac,
    IpLen,
    Ip,
    Label1,
    Label2,
    RouteType,
    Gateway,
}

const FLAG_SET: Coercer = Coercer::Flag {
    literal: "1",
    matched: true,
};

static EVPN_PREFIX_STEPS: [SchemaStep<EvpnField>; 4] = [
    SchemaStep {
        since: SchemaVersion::new(1, 0),
        fields: &[
            FieldDef::new(
                EvpnField::Action,
                "action",
                Coercer::Flag {
                    literal: "add",
                    matched: false,
                },
            ),
            FieldDef::new(EvpnField::Sequence, "sequence", Coercer::Long),
            FieldDef::new(EvpnField::Hash, "hash", Coercer::Required),
            FieldDef::new(EvpnField::VpnHash, "vpn_hash", Coercer::Required),
            FieldDef::new(EvpnField::RouterIp, "router_ip", Coercer::Required),
            FieldDef::new(EvpnField::PathAttrHash, "path_attr_hash", Coercer::NullAsEmpty),
            FieldDef::new(EvpnField::PeerHash, "peer_hash", Coercer::NullAsEmpty),
            FieldDef::new(EvpnField::PeerIp, "peer_ip", Coercer::Required),
            FieldDef::new(EvpnField::PeerAsn, "peer_asn", Coercer::Long),
            FieldDef::new(EvpnField::Timestamp, "timestamp", Coercer::Timestamp),
            FieldDef::new(EvpnField::Origin, "origin", Coercer::NullAsEmpty),
            FieldDef::new(EvpnField::AsPath, "as_path", Coercer::NullAsEmpty),
            FieldDef::new(
                EvpnField::AsPathCount,
                "as_path_count",
                Coercer::IntegerEmptyAsZero,
            ),
            FieldDef::new(EvpnField::OriginAsn, "origin_as", Coercer::LongEmptyAsZero),
            FieldDef::new(EvpnField::NextHop, "nexthop", Coercer::NullAsEmpty),
            FieldDef::new(EvpnField::Med, "med", Coercer::LongEmptyAsZero),
            FieldDef::new(EvpnField::LocalPref, "local_pref", Coercer::LongEmptyAsZero),
            FieldDef::new(EvpnField::Aggregator, "aggregator", Coercer::NullAsEmpty),
            FieldDef::new(EvpnField::CommunityList, "community_list", Coercer::NullAsEmpty),
            FieldDef::new(
                EvpnField::ExtCommunityList,
                "ext_community_list",
                Coercer::NullAsEmpty,
            ),
            FieldDef::new(EvpnField::ClusterList, "cluster_list", Coercer::NullAsEmpty),
            FieldDef::new(EvpnField::IsAtomicAgg, "isAtomicAgg", FLAG_SET),
            FieldDef::new(EvpnField::IsNexthopIpv4, "isNextHopIPv4", FLAG_SET),
            FieldDef::new(EvpnField::OriginatorId, "originator_id", Coercer::NullAsEmpty),
        ],
    },
    SchemaStep {
        since: SchemaVersion::new(1, 1),
        fields: &[FieldDef::new(EvpnField::PathId, "path_id", Coercer::NullAsEmpty)],
    },
    SchemaStep {
        since: SchemaVersion::new(1, 3),
        fields: &[FieldDef::new(EvpnField::IsPrePolicy, "isPrePolicy", FLAG_SET)],
    },
    SchemaStep {
        since: SchemaVersion::new(1, 7),
        fields: &[
            FieldDef::new(
                EvpnField::RouteDistinguisher,
                "rd",
                Coercer::RouteDistinguisher,
            ),
            FieldDef::new(
                EvpnField::OriginatingRouterIpLen,
                "originating_router_ip_len",
                Coercer::IntegerEmptyAsZero,
            ),
            FieldDef::new(
                EvpnField::OriginatingRouterIp,
                "originating_router_ip",
                Coercer::NullAsEmpty,
            ),
            FieldDef::new(
                EvpnField::EthernetTagIdHex,
                "ethernet_tag_id_hex",
                Coercer::NullAsEmpty,
            ),
            FieldDef::new(
                EvpnField::EthernetSegmentId,
                "ethernet_segment_id",
                Coercer::NullAsEmpty,
            ),
            FieldDef::new(EvpnField::MacLen, "mac_len", Coercer::IntegerEmptyAsZero),
            FieldDef::new(EvpnField::Mac, "mac", Coercer::NullAsEmpty),
            FieldDef::new(EvpnField::IpLen, "ip_len", Coercer::IntegerEmptyAsZero),
            FieldDef::new(EvpnField::Ip, "ip", Coercer::NullAsEmpty),
            FieldDef::new(EvpnField::Label1, "mpls_label_1", Coercer::LongEmptyAsZero),
            FieldDef::new(EvpnField::Label2, "mpls_label_2", Coercer::LongEmptyAsZero),
            FieldDef::new(EvpnField::RouteType, "route_type", Coercer::Integer),
            FieldDef::new(EvpnField::Gateway, "gateway", Coercer::NullAsEmpty),
        ],
    },
];

pub static EVPN_PREFIX_REGISTRY: SchemaRegistry<EvpnField> =
    SchemaRegistry::new(&EVPN_PREFIX_STEPS);

impl MsgBusRecord for EvpnPrefix {
    type Field = EvpnField;

    fn registry() -> &'static SchemaRegistry<EvpnField> {
        &EVPN_PREFIX_REGISTRY
    }

    fn apply(&mut self, field: EvpnField, value: FieldValue) -> Result<(), FieldErrorKind> {
        match field {
            EvpnField::Action => self.is_withdrawn = value.into_flag()?,
            EvpnField::Sequence => self.sequence = value.into_int()?,
            EvpnField::Hash => self.hash = value.into_text()?,
            EvpnField::VpnHash => self.vpn_hash = value.into_text()?,
            EvpnField::RouterIp => self.router_ip = value.into_text()?,
            EvpnField::PathAttrHash => self.path_attr_hash = value.into_text()?,
            EvpnField::PeerHash => self.peer_hash = value.into_text()?,
            EvpnField::PeerIp => self.peer_ip = value.into_text()?,
            EvpnField::PeerAsn => self.peer_asn = value.into_int()?,
            EvpnField::Timestamp => self.timestamp = value.into_timestamp()?,
            EvpnField::Origin => self.origin = value.into_text()?,
            EvpnField::AsPath => self.as_path = value.into_text()?,
            EvpnField::AsPathCount => self.as_path_count = value.into_int()?,
            EvpnField::OriginAsn => self.origin_asn = value.into_int()?,
            EvpnField::NextHop => self.next_hop = value.into_text()?,
            EvpnField::Med => self.med = value.into_int()?,
            EvpnField::LocalPref => self.local_pref = value.into_int()?,
            EvpnField::Aggregator => self.aggregator = value.into_text()?,
            EvpnField::CommunityList => self.community_list = value.into_text()?,
            EvpnField::ExtCommunityList => self.ext_community_list = value.into_text()?,
            EvpnField::ClusterList => self.cluster_list = value.into_text()?,
            EvpnField::IsAtomicAgg => self.is_atomic_agg = value.into_flag()?,
            EvpnField::IsNexthopIpv4 => self.is_nexthop_ipv4 = value.into_flag()?,
            EvpnField::OriginatorId => self.originator_id = value.into_text()?,
            EvpnField::PathId => self.path_id = value.into_text()?,
            EvpnField::IsPrePolicy => self.is_pre_policy = value.into_flag()?,
            EvpnField::RouteDistinguisher => {
                self.route_distinguisher = value.into_route_distinguisher()?
            }
            EvpnField::OriginatingRouterIpLen => {
                self.originating_router_ip_len = value.into_int()?
            }
            EvpnField::OriginatingRouterIp => self.originating_router_ip = value.into_text()?,
            EvpnField::EthernetTagIdHex => self.ethernet_tag_id_hex = value.into_text()?,
            EvpnField::EthernetSegmentId => self.ethernet_segment_id = value.into_text()?,
            EvpnField::MacLen => self.mac_len = value.into_int()?,
            EvpnField::Mac => self.mac = value.into_text()?,
            EvpnField::IpLen => self.ip_len = value.into_int()?,
            EvpnField::Ip => self.ip = value.into_text()?,
            EvpnField::Label1 => self.label_1 = value.into_int()?,
            EvpnField::Label2 => self.label_2 = value.into_int()?,
            EvpnField::RouteType => self.route_type = value.into_int()?,
            EvpnField::Gateway => self.gateway = value.into_text()?,
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FieldError, RouteDistinguisher};
    use crate::parser::decode_record;
    use chrono::{TimeZone, Utc};

    const SAMPLE_1_7: &str = "add\t100\thashA\tvpnHashA\t10.0.0.1\t\t\t192.0.2.1\t65001\t2024-01-01T00:00:00Z\tIGP\t65001 65002\t2\t65001\t192.0.2.254\t0\t100\t\t\t\t\t0\t1\t\tvoid\t0\trd1:1\t2\t32\t10.0.0.2\tabcd\tesi1\t48\t00:11:22:33:44:55\t24\t10.1.1.0\t100\t200\t5\tgw1";

    fn decode(line: &str, version: SchemaVersion) -> (EvpnPrefix, Vec<FieldError>) {
        let schema = EVPN_PREFIX_REGISTRY.resolve(version).unwrap();
        let fields = line.split('\t').collect::<Vec<_>>();
        decode_record::<EvpnPrefix>(&fields, &schema)
    }

    #[test]
    fn test_layout_sizes() {
        let column_counts = EVPN_PREFIX_REGISTRY
            .thresholds()
            .into_iter()
            .map(|v| EVPN_PREFIX_REGISTRY.resolve(v).unwrap().column_count())
            .collect::<Vec<_>>();
        assert_eq!(column_counts, vec![24, 25, 26, 40]);
    }

    #[test]
    fn test_trailing_positions() {
        let schema = EVPN_PREFIX_REGISTRY
            .resolve(SchemaVersion::new(1, 7))
            .unwrap();
        assert_eq!(schema.get("peer_asn").unwrap().position, 8);
        assert_eq!(schema.get("rd").unwrap().columns(), 26..28);
        assert_eq!(schema.get("mpls_label_2").unwrap().position, 37);
        // route type precedes gateway
        assert_eq!(schema.get("route_type").unwrap().position, 38);
        assert_eq!(schema.get("gateway").unwrap().position, 39);
        assert_eq!(schema.header_names().last(), Some(&"gateway"));
    }

    #[test]
    fn test_decode_sample() {
        let (prefix, errors) = decode(SAMPLE_1_7, SchemaVersion::new(1, 7));
        assert!(errors.is_empty(), "{:?}", errors);

        assert!(!prefix.is_withdrawn);
        assert_eq!(prefix.sequence, 100);
        assert_eq!(prefix.hash, "hashA");
        assert_eq!(prefix.vpn_hash, "vpnHashA");
        assert_eq!(prefix.router_ip, "10.0.0.1");
        assert_eq!(prefix.path_attr_hash, "");
        assert_eq!(prefix.peer_ip, "192.0.2.1");
        assert_eq!(prefix.peer_asn, 65001);
        assert_eq!(
            prefix.timestamp,
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
        );
        assert_eq!(prefix.origin, "IGP");
        assert_eq!(prefix.as_path, "65001 65002");
        assert_eq!(prefix.as_path_count, 2);
        assert_eq!(prefix.origin_asn, 65001);
        assert_eq!(prefix.next_hop, "192.0.2.254");
        assert_eq!(prefix.med, 0);
        assert_eq!(prefix.local_pref, 100);
        assert!(!prefix.is_atomic_agg);
        assert!(prefix.is_nexthop_ipv4);
        assert_eq!(prefix.path_id, "void");
        assert!(!prefix.is_pre_policy);
        assert_eq!(prefix.route_distinguisher, RouteDistinguisher::new("rd1:1", 2));
        assert_eq!(prefix.originating_router_ip_len, 32);
        assert_eq!(prefix.originating_router_ip, "10.0.0.2");
        assert_eq!(prefix.ethernet_tag_id_hex, "abcd");
        assert_eq!(prefix.ethernet_segment_id, "esi1");
        assert_eq!(prefix.mac_len, 48);
        assert_eq!(prefix.mac, "00:11:22:33:44:55");
        assert_eq!(prefix.ip_len, 24);
        assert_eq!(prefix.ip, "10.1.1.0");
        assert_eq!(prefix.label_1, 100);
        assert_eq!(prefix.label_2, 200);
        assert_eq!(prefix.route_type, 5);
        assert_eq!(prefix.gateway, "gw1");
    }

    #[test]
    fn test_newer_row_with_older_schema() {
        // a 1.0 reader only consumes the shared prefix of a 1.7 row
        let (prefix, errors) = decode(SAMPLE_1_7, SchemaVersion::new(1, 0));
        assert!(errors.is_empty());
        assert_eq!(prefix.peer_asn, 65001);
        assert_eq!(prefix.path_id, "");
        assert_eq!(prefix.route_type, 0);
        assert_eq!(prefix.gateway, "");
    }

    #[test]
    fn test_evpn_columns_only_from_1_7() {
        let (prefix, errors) = decode(SAMPLE_1_7, SchemaVersion::new(1, 3));
        assert!(errors.is_empty());
        assert_eq!(prefix.path_id, "void");
        assert_eq!(prefix.route_distinguisher, RouteDistinguisher::default());
        assert_eq!(prefix.mac, "");
        assert_eq!(prefix.label_1, 0);
        assert_eq!(prefix.route_type, 0);
    }

    #[test]
    fn test_sequence_limits() {
        let max = SAMPLE_1_7.replacen("\t100\t", &format!("\t{}\t", i64::MAX), 1);
        let (prefix, errors) = decode(&max, SchemaVersion::new(1, 7));
        assert!(errors.is_empty());
        assert_eq!(prefix.sequence, i64::MAX as u64);

        let above = (i64::MAX as u64 + 1).to_string();
        let line = SAMPLE_1_7.replacen("\t100\t", &format!("\t{}\t", above), 1);
        let (prefix, errors) = decode(&line, SchemaVersion::new(1, 7));
        assert_eq!(
            errors,
            vec![FieldError::new(
                "sequence",
                1,
                FieldErrorKind::InvalidInteger(above)
            )]
        );
        assert_eq!(prefix.sequence, 0);
    }

    #[test]
    fn test_out_of_range_length() {
        let line = SAMPLE_1_7.replace("\t48\t", "\t300\t");
        let (prefix, errors) = decode(&line, SchemaVersion::new(1, 7));
        assert_eq!(
            errors,
            vec![FieldError::new("mac_len", 32, FieldErrorKind::OutOfRange(300))]
        );
        assert_eq!(prefix.mac_len, 0);
        assert_eq!(prefix.mac, "00:11:22:33:44:55");
    }

    #[test]
    fn test_withdraw() {
        let line = SAMPLE_1_7.replacen("add", "del", 1);
        let (prefix, errors) = decode(&line, SchemaVersion::new(1, 7));
        assert!(errors.is_empty());
        assert!(prefix.is_withdrawn);
    }
}
