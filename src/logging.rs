//! Unified JSON logging with custom format.
//!
//! Log format:
//! ```json
//! {"ts":"2024-12-28T15:04:05.123Z","level":"info","type":"app","msg":"Server started","ctx":{"service":"tokio_httpbin"},"data":{}}
//! ```

use std::collections::BTreeMap;
use std::io::{self, Write};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Install the global subscriber: env filter + one JSON object per line.
pub fn init(config: &LoggingConfig) {
    tracing_subscriber::registry()
        .with(EnvFilter::new(&config.filter))
        .with(
            tracing_subscriber::fmt::layer()
                .event_format(JsonFormatter::new(config.service_name.clone())),
        )
        .init();
}

/// Custom JSON formatter for tracing.
pub struct JsonFormatter {
    service_name: String,
}

impl JsonFormatter {
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
        }
    }
}

impl<S, N> FormatEvent<S, N> for JsonFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let meta = event.metadata();
        let level = level_name(*meta.level());
        let log_type = if *meta.level() == Level::ERROR {
            "error"
        } else {
            "app"
        };

        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);

        let entry = serde_json::json!({
            "ts": Iso8601Timestamp::now().as_str(),
            "level": level,
            "type": log_type,
            "msg": visitor.message.unwrap_or_default(),
            "ctx": { "service": &self.service_name },
            "data": visitor.fields,
        });

        writeln!(writer, "{}", entry)
    }
}

fn level_name(level: Level) -> &'static str {
    match level {
        Level::TRACE | Level::DEBUG => "debug",
        Level::INFO => "info",
        Level::WARN => "warn",
        Level::ERROR => "error",
    }
}

/// Field visitor for collecting tracing fields.
#[derive(Default)]
struct FieldVisitor {
    message: Option<String>,
    fields: BTreeMap<String, serde_json::Value>,
}

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = Some(format!("{:?}", value).trim_matches('"').to_string());
        } else {
            self.fields.insert(
                field.name().to_string(),
                serde_json::Value::String(format!("{:?}", value)),
            );
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message = Some(value.to_string());
        } else {
            self.fields
                .insert(field.name().to_string(), serde_json::json!(value));
        }
    }

    fn record_i64(&mut self, field: &tracing::field::Field, value: i64) {
        self.fields
            .insert(field.name().to_string(), serde_json::json!(value));
    }

    fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
        self.fields
            .insert(field.name().to_string(), serde_json::json!(value));
    }

    fn record_f64(&mut self, field: &tracing::field::Field, value: f64) {
        self.fields
            .insert(field.name().to_string(), serde_json::json!(value));
    }

    fn record_bool(&mut self, field: &tracing::field::Field, value: bool) {
        self.fields
            .insert(field.name().to_string(), serde_json::json!(value));
    }
}

/// One access log line.
pub struct AccessLogEntry<'a> {
    pub service: &'a str,
    pub request_id: &'a str,
    pub ip: &'a str,
    pub method: &'a str,
    pub path: &'a str,
    pub query: Option<&'a str>,
    pub http: &'a str,
    pub status: u16,
    pub bytes: Option<u64>,
    pub duration: Duration,
    pub ua: Option<&'a str>,
    pub referer: Option<&'a str>,
    pub xff: Option<&'a str>,
    pub tls: bool,
}

impl AccessLogEntry<'_> {
    /// Render the entry as a JSON value with the given timestamp.
    pub fn to_json(&self, ts: &str) -> serde_json::Value {
        let mut data = serde_json::Map::new();
        data.insert("method".into(), serde_json::json!(self.method));
        data.insert("path".into(), serde_json::json!(self.path));
        if let Some(q) = self.query {
            data.insert("query".into(), serde_json::json!(q));
        }
        data.insert("http".into(), serde_json::json!(self.http));
        data.insert("status".into(), serde_json::json!(self.status));
        // Streamed bodies have no known size
        if let Some(b) = self.bytes {
            data.insert("bytes".into(), serde_json::json!(b));
        }
        data.insert(
            "duration_ms".into(),
            serde_json::json!(self.duration.as_secs_f64() * 1000.0),
        );
        data.insert("ip".into(), serde_json::json!(self.ip));
        if let Some(u) = self.ua {
            data.insert("ua".into(), serde_json::json!(u));
        }
        if let Some(r) = self.referer {
            data.insert("referer".into(), serde_json::json!(r));
        }
        if let Some(x) = self.xff {
            data.insert("xff".into(), serde_json::json!(x));
        }
        if self.tls {
            data.insert("tls".into(), serde_json::json!(true));
        }

        serde_json::json!({
            "ts": ts,
            "level": "info",
            "type": "access",
            "msg": format!("{} {} {}", self.method, self.path, self.status),
            "ctx": {
                "service": self.service,
                "request_id": self.request_id,
            },
            "data": data,
        })
    }
}

/// Log an access request directly (bypassing tracing for simpler output).
pub fn log_access(entry: &AccessLogEntry<'_>) {
    let ts = Iso8601Timestamp::now();
    let _ = writeln!(io::stdout(), "{}", entry.to_json(ts.as_str()));
}

/// ISO 8601 timestamp buffer - exactly 24 bytes: "2024-01-15T10:30:00.123Z"
/// Stack-allocated, no heap allocation.
#[derive(Clone, Copy)]
pub struct Iso8601Timestamp {
    buf: [u8; 24],
}

impl Iso8601Timestamp {
    /// Create a new timestamp for the current time.
    #[inline]
    pub fn now() -> Self {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        Self::from_duration(now)
    }

    /// Create from a Duration since UNIX_EPOCH.
    pub fn from_duration(duration: Duration) -> Self {
        let secs = duration.as_secs();
        let millis = duration.subsec_millis();

        let day_secs = secs % 86400;
        let hours = (day_secs / 3600) as u8;
        let minutes = ((day_secs % 3600) / 60) as u8;
        let seconds = (day_secs % 60) as u8;

        let mut year = 1970u16;
        let mut remaining = secs / 86400;
        loop {
            let year_days = if is_leap_year(year) { 366 } else { 365 };
            if remaining < year_days {
                break;
            }
            remaining -= year_days;
            year += 1;
        }

        let feb = if is_leap_year(year) { 29 } else { 28 };
        let month_days: [u64; 12] = [31, feb, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

        let mut month = 1u8;
        for &days_in_month in &month_days {
            if remaining < days_in_month {
                break;
            }
            remaining -= days_in_month;
            month += 1;
        }
        let day = (remaining + 1) as u8;

        let mut buf = [0u8; 24];
        write_digits(&mut buf[0..4], year as u32);
        buf[4] = b'-';
        write_digits(&mut buf[5..7], month as u32);
        buf[7] = b'-';
        write_digits(&mut buf[8..10], day as u32);
        buf[10] = b'T';
        write_digits(&mut buf[11..13], hours as u32);
        buf[13] = b':';
        write_digits(&mut buf[14..16], minutes as u32);
        buf[16] = b':';
        write_digits(&mut buf[17..19], seconds as u32);
        buf[19] = b'.';
        write_digits(&mut buf[20..23], millis);
        buf[23] = b'Z';

        Self { buf }
    }

    /// Get the timestamp as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        // Only ASCII digits and punctuation are ever written
        std::str::from_utf8(&self.buf).unwrap_or("1970-01-01T00:00:00.000Z")
    }
}

impl std::fmt::Display for Iso8601Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::fmt::Debug for Iso8601Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[inline]
const fn is_leap_year(year: u16) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

/// Write `val` as zero-padded decimal filling the whole buffer.
#[inline]
fn write_digits(buf: &mut [u8], mut val: u32) {
    for slot in buf.iter_mut().rev() {
        *slot = b'0' + (val % 10) as u8;
        val /= 10;
    }
}
