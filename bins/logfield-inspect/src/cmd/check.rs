use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use logfield_api::Subject;
use logfield_catalog::IpNetwork;
use logfield_engine::{DispatchConfig, Dispatcher};
use rust_decimal::Decimal;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::cmd::build_registry;
use crate::config::{CheckArgs, InspectConfig};
use crate::error::InspectError;

/// A value no handler knows about.
#[derive(Debug)]
struct Session {
    id: u32,
}

/// Log fields of the kinds a service typically emits.
struct Samples {
    user: String,
    request_id: Uuid,
    started: DateTime<Utc>,
    elapsed: Duration,
    peer: IpAddr,
    subnet: IpNetwork,
    price: Decimal,
    payload: Vec<u8>,
    log_file: PathBuf,
    session: Session,
}

impl Samples {
    fn new() -> Result<Self, InspectError> {
        let peer = IpAddr::V4(Ipv4Addr::new(10, 1, 2, 3));
        Ok(Self {
            user: "ann".to_string(),
            request_id: Uuid::from_u128(0x67e5_5044_10b1_426f_9247_bb68_0e5f_e0c8),
            started: Utc.timestamp_opt(1_700_000_000, 0).single().unwrap_or_default(),
            elapsed: Duration::from_millis(1250),
            peer,
            subnet: IpNetwork::new(peer, 8)?,
            price: Decimal::new(1999, 2),
            payload: b"ping".to_vec(),
            log_file: PathBuf::from("/var/log/app.log"),
            session: Session { id: 7 },
        })
    }

    fn fields(&self) -> Vec<(&'static str, Subject<'_>)> {
        vec![
            ("user", Subject::new(&self.user)),
            ("request_id", Subject::new(&self.request_id)),
            ("started", Subject::new(&self.started)),
            ("elapsed", Subject::new(&self.elapsed)),
            ("peer", Subject::new(&self.peer)),
            ("subnet", Subject::new(&self.subnet)),
            ("price", Subject::new(&self.price)),
            ("payload", Subject::new(&self.payload)),
            ("log_file", Subject::new(&self.log_file)),
            ("session", Subject::new(&self.session)),
        ]
    }
}

fn check(config: &DispatchConfig) -> Result<Map<String, Value>, InspectError> {
    let registry = build_registry(config)?;
    let dispatcher = Dispatcher::with_config(registry, config);
    let samples = Samples::new()?;
    tracing::debug!(session = samples.session.id, "serializing samples");
    Ok(dispatcher.serialize_fields(samples.fields())?)
}

pub fn run(args: CheckArgs) -> Result<(), InspectError> {
    let mut config = InspectConfig::load(&args.config)?.dispatch;
    if args.fallback {
        config.raise_on_unknown = false;
    }
    let fields = check(&config)?;
    tracing::info!(fields = fields.len(), "all sample fields serialized");
    println!("{}", serde_json::to_string_pretty(&Value::Object(fields))?);
    Ok(())
}
