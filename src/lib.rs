/*!
`obmp-parsed` decodes the tab-separated records published on the OpenBMP "parsed" message bus
topics into strongly-typed Rust structs.

Every message on a parsed topic carries a batch of records, one per line, each line holding
tab-separated columns. The column layout depends on the message bus schema version negotiated
by the collector; newer versions only ever append columns to the end of an older layout. This
crate resolves the layout for a given version, coerces each column into its typed attribute and
reports any column that fails to decode *next to* the record it belongs to, instead of dropping
the record or failing the whole batch.

Currently supported topics:
- `evpn_prefix`: EVPN route advertisements and withdrawals, decoded into [EvpnPrefix].

# Example

```
use obmp_parsed::{decode_batch, EvpnPrefix, SchemaVersion};

let payload = "add\t100\thashA\tvpnHashA\t10.0.0.1\t\t\t192.0.2.1\t65001\t2024-01-01T00:00:00Z\tIGP\t65001 65002\t2\t65001\t192.0.2.254\t0\t100\t\t\t\t\t0\t1\t\tvoid\t0\trd1:1\t2\t32\t10.0.0.2\tabcd\tesi1\t48\t00:11:22:33:44:55\t24\t10.1.1.0\t100\t200\t5\tgw1\n";
let version: SchemaVersion = "1.7".parse().unwrap();

let batch = decode_batch::<EvpnPrefix>(payload, version).unwrap();
assert_eq!(batch.records.len(), 1);

let parsed = &batch.records[0];
assert!(parsed.is_complete());
assert_eq!(parsed.record.peer_asn, 65001);
assert_eq!(parsed.record.route_type, 5);
assert_eq!(parsed.record.gateway, "gw1");
```

# Partial records

A column that cannot be decoded does not abort its record. The attribute keeps its default
value and a [FieldError] naming the column is attached to the [ParsedRecord]:

```
use obmp_parsed::{decode_batch, EvpnPrefix, FieldErrorKind, SchemaVersion};

let payload = "add\t100\thashA\tvpnHashA\t10.0.0.1\t\t\t192.0.2.1\tabc\t2024-01-01T00:00:00Z\n";
let batch = decode_batch::<EvpnPrefix>(payload, SchemaVersion::new(1, 0)).unwrap();

let parsed = &batch.records[0];
assert_eq!(parsed.record.peer_ip, "192.0.2.1");
assert_eq!(parsed.record.peer_asn, 0);
assert!(parsed.errors.iter().any(|e| e.name == "peer_asn"));
```
*/

pub mod error;
pub mod models;
pub mod parser;

pub use error::ParserError;
pub use models::*;
pub use parser::{
    decode_batch, decode_record, BatchWarning, Coercer, FieldSpec, MsgBusParser, MsgBusRecord,
    ParsedBatch, ParsedRecord, ParserConfig, Schema, SchemaRegistry,
};
