use std::io::Write;
use std::path::PathBuf;

use clap::Parser;
use obmp_parsed::{EvpnPrefix, MsgBusParser, ParsedRecord, SchemaVersion};

/// obmp-parsed is a simple cli tool that decodes OpenBMP parsed message bus dumps.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Opts {
    /// File path to a TSV dump of an `evpn_prefix` topic, optionally gzip or bzip2 compressed.
    #[clap(name = "FILE")]
    file_path: PathBuf,

    /// Message bus schema version the records were produced with
    #[clap(short = 's', long, default_value = "1.7", value_parser = parse_schema_version)]
    schema_version: SchemaVersion,

    /// Output as JSON objects
    #[clap(long)]
    json: bool,

    /// Output as full PSV entries with header
    #[clap(long)]
    psv: bool,

    /// Pretty-print JSON output
    #[clap(long)]
    pretty: bool,

    /// Print field decoding errors to stderr
    #[clap(short, long)]
    errors: bool,

    /// Only print the number of records and field errors
    #[clap(short, long)]
    count: bool,

    /// Maximum number of lines decoded from the input
    #[clap(long)]
    max_lines: Option<usize>,

    /// Maximum number of columns decoded per line
    #[clap(long)]
    max_fields: Option<usize>,

    #[clap(flatten)]
    filters: Filters,
}

#[derive(Parser, Debug)]
struct Filters {
    /// Filter by elem type: announce (a) or withdraw (w)
    #[clap(short = 'm', long)]
    elem_type: Option<String>,

    /// Filter by peer ASN
    #[clap(short = 'J', long)]
    peer_asn: Option<u32>,

    /// Filter by EVPN route type
    #[clap(short = 'r', long)]
    route_type: Option<u8>,
}

impl Filters {
    fn matches(&self, record: &ParsedRecord<EvpnPrefix>, announce: Option<bool>) -> bool {
        let prefix = &record.record;
        if let Some(announce) = announce {
            if prefix.is_announcement() != announce {
                return false;
            }
        }
        if let Some(asn) = self.peer_asn {
            if prefix.peer_asn != asn {
                return false;
            }
        }
        if let Some(route_type) = self.route_type {
            if prefix.route_type != route_type {
                return false;
            }
        }
        true
    }
}

fn parse_schema_version(s: &str) -> Result<SchemaVersion, String> {
    s.parse::<SchemaVersion>().map_err(|e| e.to_string())
}

fn main() {
    let opts: Opts = Opts::parse();

    env_logger::init();

    let announce = match opts.filters.elem_type.as_deref() {
        None => None,
        Some("a" | "announce" | "announcement") => Some(true),
        Some("w" | "withdraw" | "withdrawal") => Some(false),
        Some(other) => {
            eprintln!("Error: cannot parse elem type from {}", other);
            std::process::exit(1);
        }
    };

    let mut parser = MsgBusParser::new();
    if let Some(v) = opts.max_lines {
        parser = parser.with_max_lines(v);
    }
    if let Some(v) = opts.max_fields {
        parser = parser.with_max_fields(v);
    }

    let file_path = opts.file_path.to_string_lossy();
    let batch = match parser.decode_path::<EvpnPrefix>(&file_path, opts.schema_version) {
        Ok(b) => b,
        Err(err) => {
            eprintln!("{}", err);
            std::process::exit(1);
        }
    };

    for warning in &batch.warnings {
        log::warn!("{:?}", warning);
    }

    let records = batch
        .records
        .iter()
        .filter(|r| opts.filters.matches(r, announce))
        .collect::<Vec<_>>();

    if opts.errors {
        for record in &records {
            for err in &record.errors {
                eprintln!("line {}: {}", record.line, err);
            }
        }
    }

    if opts.count {
        let errors_count: usize = records.iter().map(|r| r.errors.len()).sum();
        println!("total records: {}", records.len());
        println!("field errors:  {}", errors_count);
        return;
    }

    let mut stdout = std::io::stdout();
    for (index, record) in records.iter().enumerate() {
        let output_str = if opts.json {
            let res = match opts.pretty {
                true => serde_json::to_string_pretty(&record.record),
                false => serde_json::to_string(&record.record),
            };
            match res {
                Ok(s) => s,
                Err(e) => {
                    eprintln!("{}", e);
                    std::process::exit(1);
                }
            }
        } else if opts.psv {
            if index == 0 {
                format!("{}\n{}", EvpnPrefix::get_psv_header(), record.record.to_psv())
            } else {
                record.record.to_psv()
            }
        } else {
            record.record.to_string()
        };
        if let Err(e) = writeln!(stdout, "{}", &output_str) {
            if e.kind() != std::io::ErrorKind::BrokenPipe {
                eprintln!("{}", e);
            }
            std::process::exit(1);
        }
    }
}
