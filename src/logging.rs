//! Structured JSONL logging for simulation runs.
//!
//! Every record is one JSON object on stderr. When `LOG_DIR` is set, records
//! are also written under `<LOG_DIR>/<run_id>/`: trace and debug records to
//! `trace.jsonl`, everything else to `events.jsonl`. `LOG_LEVEL` sets the
//! minimum level (default info) and `LOG_DOMAINS` a comma-separated list of
//! enabled domains (default all).

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::fs::{create_dir_all, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, OnceLock};
use std::time::Instant;

// =============================================================================
// Log Levels
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Trace = 0,
    Debug = 1,
    Info = 2,
    Warn = 3,
    Error = 4,
    Fatal = 5,
}

impl Level {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "trace" => Some(Level::Trace),
            "debug" => Some(Level::Debug),
            "info" => Some(Level::Info),
            "warn" => Some(Level::Warn),
            "error" => Some(Level::Error),
            "fatal" => Some(Level::Fatal),
            _ => None,
        }
    }

    pub fn from_env() -> Self {
        std::env::var("LOG_LEVEL")
            .ok()
            .and_then(|v| Self::parse(&v.to_lowercase()))
            .unwrap_or(Level::Info)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Trace => "trace",
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Warn => "warn",
            Level::Error => "error",
            Level::Fatal => "fatal",
        }
    }
}

// =============================================================================
// Log Domains
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    Game,    // Construction, round completion
    Duel,    // Individual duel outcomes
    Stats,   // Inequality measurements
    Verify,  // Invariant checks
    System,  // Run start/end, configuration
    Profile, // Timing
}

impl Domain {
    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Game => "game",
            Domain::Duel => "duel",
            Domain::Stats => "stats",
            Domain::Verify => "verify",
            Domain::System => "system",
            Domain::Profile => "profile",
        }
    }

    pub fn is_enabled(&self) -> bool {
        match std::env::var("LOG_DOMAINS").as_deref() {
            Ok("all") | Err(_) => true,
            Ok(domains) => domains.split(',').any(|d| d.trim() == self.as_str()),
        }
    }
}

// =============================================================================
// Run context
// =============================================================================

static LOG_SEQ: AtomicU64 = AtomicU64::new(0);
static MIN_LEVEL: OnceLock<Level> = OnceLock::new();
static RUN_CONTEXT: OnceLock<RunContext> = OnceLock::new();

fn next_seq() -> u64 {
    LOG_SEQ.fetch_add(1, Ordering::SeqCst)
}

fn min_level() -> Level {
    *MIN_LEVEL.get_or_init(Level::from_env)
}

/// Whether a record at `level` in `domain` would be emitted.
pub fn enabled(level: Level, domain: Domain) -> bool {
    level >= min_level() && domain.is_enabled()
}

/// Files of one run directory.
#[derive(Debug)]
pub struct RunLog {
    dir: PathBuf,
    events: Mutex<BufWriter<File>>,
    trace: Mutex<BufWriter<File>>,
}

impl RunLog {
    pub fn create(base: &Path, run_id: &str) -> io::Result<Self> {
        let dir = base.join(run_id);
        create_dir_all(&dir)?;
        let events = File::create(dir.join("events.jsonl"))?;
        let trace = File::create(dir.join("trace.jsonl"))?;
        Ok(Self {
            dir,
            events: Mutex::new(BufWriter::new(events)),
            trace: Mutex::new(BufWriter::new(trace)),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn write_manifest(&self, manifest: &Value) -> io::Result<()> {
        std::fs::write(self.dir.join("manifest.json"), manifest.to_string())
    }

    pub fn write(&self, level: Level, line: &str) {
        let sink = match level {
            Level::Trace | Level::Debug => &self.trace,
            _ => &self.events,
        };
        if let Ok(mut w) = sink.lock() {
            let _ = writeln!(w, "{}", line);
        }
    }

    pub fn flush(&self) {
        for sink in [&self.events, &self.trace] {
            if let Ok(mut w) = sink.lock() {
                let _ = w.flush();
            }
        }
    }
}

#[derive(Debug)]
struct RunContext {
    run_id: String,
    files: Option<RunLog>,
}

fn ensure_run_context() -> &'static RunContext {
    RUN_CONTEXT.get_or_init(|| {
        let run_id = std::env::var("RUN_ID")
            .unwrap_or_else(|_| format!("r-{}-{}", ts_epoch_ms(), process::id()));
        let files = std::env::var("LOG_DIR").ok().and_then(|base| {
            RunLog::create(Path::new(&base), &run_id)
                .map_err(|err| eprintln!("[log] failed to create run dir: {}", err))
                .ok()
        });
        RunContext { run_id, files }
    })
}

/// Write the run manifest (when a log directory is configured) and log run start.
pub fn start_run(params: Value) {
    let ctx = ensure_run_context();
    if let Some(files) = &ctx.files {
        let manifest = json!({
            "run_id": ctx.run_id,
            "ts": ts_now(),
            "pid": process::id(),
            "log_dir": files.dir().to_string_lossy(),
            "params": params.clone(),
        });
        if let Err(err) = files.write_manifest(&manifest) {
            eprintln!("[log] failed to write manifest: {}", err);
        }
    }
    log(Level::Info, Domain::System, "run_start", obj(&[("params", params)]));
}

pub fn flush() {
    if let Some(files) = &ensure_run_context().files {
        files.flush();
    }
}

// =============================================================================
// Core logging functions
// =============================================================================

/// RFC3339 timestamp with milliseconds
pub fn ts_now() -> String {
    Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

pub fn ts_epoch_ms() -> u64 {
    Utc::now().timestamp_millis() as u64
}

/// Emit a structured log entry
pub fn log(level: Level, domain: Domain, event: &str, fields: Map<String, Value>) {
    if !enabled(level, domain) {
        return;
    }
    let ctx = ensure_run_context();
    let line = format_record(&ctx.run_id, next_seq(), level, domain, event, fields);
    if let Some(files) = &ctx.files {
        files.write(level, &line);
    }
    eprintln!("{}", line);
}

fn format_record(
    run_id: &str,
    seq: u64,
    level: Level,
    domain: Domain,
    event: &str,
    mut fields: Map<String, Value>,
) -> String {
    let msg = fields.remove("msg").unwrap_or(Value::String(String::new()));
    let mut entry = Map::new();
    entry.insert("ts".to_string(), json!(ts_now()));
    entry.insert("run_id".to_string(), json!(run_id));
    entry.insert("seq".to_string(), json!(seq));
    entry.insert("lvl".to_string(), json!(level.as_str().to_uppercase()));
    entry.insert("component".to_string(), json!(domain.as_str()));
    entry.insert("event".to_string(), json!(event));
    entry.insert("msg".to_string(), msg);
    entry.insert("data".to_string(), Value::Object(fields));
    Value::Object(entry).to_string()
}

// =============================================================================
// Domain-specific helpers
// =============================================================================

pub fn log_duel(round: u64, first: usize, second: usize, outcome: &str, stake: i64) {
    log(
        Level::Trace,
        Domain::Duel,
        "duel",
        obj(&[
            ("round", json!(round)),
            ("first", json!(first)),
            ("second", json!(second)),
            ("outcome", v_str(outcome)),
            ("stake", json!(stake)),
        ]),
    );
}

pub fn log_round(round: u64, duels: usize, skipped: usize, alive: usize, gini: f64) {
    log(
        Level::Debug,
        Domain::Game,
        "round",
        obj(&[
            ("round", json!(round)),
            ("duels", json!(duels)),
            ("skipped", json!(skipped)),
            ("nb_alive_players", json!(alive)),
            ("gini", v_num(gini)),
        ]),
    );
}

pub fn log_violation(round: u64, msg: &str) {
    log(
        Level::Error,
        Domain::Verify,
        "invariant_violated",
        obj(&[("round", json!(round)), ("msg", v_str(msg))]),
    );
}

pub fn log_run_summary(rounds: u64, final_gini: Option<f64>, alive: usize, nb_players: usize) {
    log(
        Level::Info,
        Domain::System,
        "run_summary",
        obj(&[
            ("rounds", json!(rounds)),
            ("final_gini", final_gini.map(v_num).unwrap_or(Value::Null)),
            ("nb_alive_players", json!(alive)),
            ("nb_players", json!(nb_players)),
        ]),
    );
}

pub fn obj(pairs: &[(&str, Value)]) -> Map<String, Value> {
    let mut map = Map::new();
    for (k, v) in pairs {
        map.insert((*k).to_string(), v.clone());
    }
    map
}

pub fn v_str(s: &str) -> Value {
    Value::String(s.to_string())
}

pub fn v_num(n: f64) -> Value {
    json!(n)
}

// =============================================================================
// Profiling Scope
// =============================================================================

/// Emits elapsed time at trace level when dropped.
pub struct ProfileScope {
    label: &'static str,
    started: Instant,
    enabled: bool,
}

impl ProfileScope {
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            started: Instant::now(),
            enabled: enabled(Level::Trace, Domain::Profile),
        }
    }
}

impl Drop for ProfileScope {
    fn drop(&mut self) {
        if !self.enabled {
            return;
        }
        let elapsed_ms = self.started.elapsed().as_secs_f64() * 1000.0;
        log(
            Level::Trace,
            Domain::Profile,
            "profile",
            obj(&[("label", v_str(self.label)), ("elapsed_ms", v_num(elapsed_ms))]),
        );
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_ordering() {
        assert!(Level::Trace < Level::Debug);
        assert!(Level::Debug < Level::Info);
        assert!(Level::Info < Level::Warn);
        assert!(Level::Warn < Level::Error);
        assert!(Level::Error < Level::Fatal);
    }

    #[test]
    fn test_level_parse() {
        assert_eq!(Level::parse("debug"), Some(Level::Debug));
        assert_eq!(Level::parse("loud"), None);
    }

    #[test]
    fn test_obj_helper() {
        let m = obj(&[("key", v_str("value")), ("num", v_num(42.0))]);
        assert_eq!(m.get("key").unwrap(), "value");
        assert_eq!(m.get("num").unwrap(), 42.0);
    }

    #[test]
    fn test_seq_increments() {
        let s1 = next_seq();
        let s2 = next_seq();
        assert!(s2 > s1);
    }

    #[test]
    fn test_record_shape() {
        let line = format_record(
            "r-test",
            7,
            Level::Debug,
            Domain::Game,
            "round",
            obj(&[("msg", v_str("done")), ("round", json!(3))]),
        );
        let v: Value = serde_json::from_str(&line).unwrap();
        assert_eq!(v["run_id"], "r-test");
        assert_eq!(v["seq"], 7);
        assert_eq!(v["lvl"], "DEBUG");
        assert_eq!(v["component"], "game");
        assert_eq!(v["msg"], "done");
        assert_eq!(v["data"]["round"], 3);
        assert!(v["data"].get("msg").is_none());
    }

    #[test]
    fn test_failure_records_carry_their_component() {
        let stats = format_record("r-test", 1, Level::Error, Domain::Stats, "gini_undefined", Map::new());
        let verify = format_record("r-test", 2, Level::Error, Domain::Verify, "invariant_violated", Map::new());
        let stats: Value = serde_json::from_str(&stats).unwrap();
        let verify: Value = serde_json::from_str(&verify).unwrap();
        assert_eq!(stats["component"], "stats");
        assert_eq!(stats["lvl"], "ERROR");
        assert_eq!(verify["component"], "verify");
    }

    #[test]
    fn test_run_log_splits_by_level() {
        let dir = tempfile::tempdir().unwrap();
        let run = RunLog::create(dir.path(), "r-1").unwrap();
        run.write(Level::Trace, "{\"event\":\"duel\"}");
        run.write(Level::Info, "{\"event\":\"run_start\"}");
        run.write_manifest(&json!({"run_id": "r-1"})).unwrap();
        run.flush();

        let base = dir.path().join("r-1");
        let trace = std::fs::read_to_string(base.join("trace.jsonl")).unwrap();
        let events = std::fs::read_to_string(base.join("events.jsonl")).unwrap();
        assert!(trace.contains("duel") && !trace.contains("run_start"));
        assert!(events.contains("run_start") && !events.contains("duel"));
        assert!(base.join("manifest.json").exists());
    }
}
