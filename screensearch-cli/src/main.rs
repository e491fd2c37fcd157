use clap::Parser;
use screensearch::{
    BatchConfig, BatchRunner, BatchSummary, CancelToken, CaptureTarget, ConfirmingInjector,
    EnigoInjector, FileCapture, InputAction, InputInjector, Locator, MatchConfig, NoOpInjector,
    Point, RecordSource, ResultRow, ResultSink, ScreenCapture, SearchRecord, SearchSession,
    SessionConfig, TemplateLibrary, XcapCapture,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

const SCHEMA_JSON: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.schema.json"));
const EXAMPLE_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.json"));

#[derive(Parser, Debug)]
#[command(author, version, about = "Batch screen search (JSON config driven)")]
struct Cli {
    /// Path to the JSON configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "config.json")]
    config: PathBuf,
    /// Print the JSON schema and exit.
    #[arg(long)]
    print_schema: bool,
    /// Print an example config and exit.
    #[arg(long)]
    print_example: bool,
    /// Raise log verbosity to debug.
    #[arg(long)]
    trace: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
enum CaptureKind {
    #[default]
    Xcap,
    File,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CaptureConfigJson {
    kind: CaptureKind,
    window: Option<String>,
    path: Option<String>,
    origin: [i32; 2],
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
enum InputKind {
    #[default]
    Enigo,
    Noop,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct InputConfigJson {
    kind: InputKind,
    confirm: bool,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct SessionConfigJson {
    input_field: String,
    search_button: String,
    marker: String,
    select_all: Vec<String>,
    clear_key: String,
    click_delay_ms: u64,
    settle_delay_ms: u64,
}

impl Default for SessionConfigJson {
    fn default() -> Self {
        let cfg = SessionConfig::default();
        Self {
            input_field: cfg.input_field,
            search_button: cfg.search_button,
            marker: cfg.marker,
            select_all: cfg.select_all,
            clear_key: cfg.clear_key,
            click_delay_ms: cfg.click_delay.as_millis() as u64,
            settle_delay_ms: cfg.settle_delay.as_millis() as u64,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct MatchConfigJson {
    threshold: f32,
    dedup_radius: u32,
    parallel: bool,
    min_var_i: f64,
}

impl Default for MatchConfigJson {
    fn default() -> Self {
        let cfg = MatchConfig::default();
        Self {
            threshold: cfg.threshold,
            dedup_radius: cfg.dedup_radius,
            parallel: cfg.parallel,
            min_var_i: cfg.min_var_i,
        }
    }
}

impl From<&MatchConfigJson> for MatchConfig {
    fn from(value: &MatchConfigJson) -> Self {
        MatchConfig {
            threshold: value.threshold,
            dedup_radius: value.dedup_radius,
            min_var_i: value.min_var_i,
            parallel: value.parallel,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct BatchConfigJson {
    start_delay_ms: u64,
    record_delay_ms: u64,
}

impl Default for BatchConfigJson {
    fn default() -> Self {
        let cfg = BatchConfig::default();
        Self {
            start_delay_ms: cfg.start_delay.as_millis() as u64,
            record_delay_ms: cfg.record_delay.as_millis() as u64,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct Config {
    records_path: String,
    output_path: Option<String>,
    template_dir: String,
    capture: CaptureConfigJson,
    input: InputConfigJson,
    session: SessionConfigJson,
    #[serde(rename = "match")]
    match_cfg: MatchConfigJson,
    batch: BatchConfigJson,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            records_path: String::new(),
            output_path: None,
            template_dir: "templates".into(),
            capture: CaptureConfigJson::default(),
            input: InputConfigJson::default(),
            session: SessionConfigJson::default(),
            match_cfg: MatchConfigJson::default(),
            batch: BatchConfigJson::default(),
        }
    }
}

impl Config {
    fn session_config(&self) -> SessionConfig {
        SessionConfig {
            input_field: self.session.input_field.clone(),
            search_button: self.session.search_button.clone(),
            marker: self.session.marker.clone(),
            select_all: self.session.select_all.clone(),
            clear_key: self.session.clear_key.clone(),
            click_delay: Duration::from_millis(self.session.click_delay_ms),
            settle_delay: Duration::from_millis(self.session.settle_delay_ms),
            marker_match: (&self.match_cfg).into(),
        }
    }

    fn batch_config(&self) -> BatchConfig {
        BatchConfig {
            start_delay: Duration::from_millis(self.batch.start_delay_ms),
            record_delay: Duration::from_millis(self.batch.record_delay_ms),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RecordJson {
    identifier: String,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    sequence_number: Option<u64>,
}

impl From<RecordJson> for SearchRecord {
    fn from(value: RecordJson) -> Self {
        SearchRecord {
            identifier: value.identifier,
            display_name: value.display_name,
            sequence_number: value.sequence_number,
        }
    }
}

#[derive(Debug, Serialize)]
struct RowJson<'a> {
    sequence_number: u64,
    identifier: &'a str,
    display_name: &'a str,
    count: usize,
    status: String,
    message: &'a str,
}

impl<'a> From<&'a ResultRow> for RowJson<'a> {
    fn from(value: &'a ResultRow) -> Self {
        Self {
            sequence_number: value.sequence_number,
            identifier: &value.identifier,
            display_name: &value.display_name,
            count: value.count,
            status: value.status.to_string(),
            message: &value.message,
        }
    }
}

struct JsonRecordFile(PathBuf);

impl RecordSource for JsonRecordFile {
    type Error = Box<dyn std::error::Error>;

    fn read_records(&mut self) -> Result<Vec<SearchRecord>, Self::Error> {
        let text = fs::read_to_string(&self.0)?;
        let records: Vec<RecordJson> = serde_json::from_str(&text)?;
        Ok(records.into_iter().map(SearchRecord::from).collect())
    }
}

/// Writes rows to a file, or to stdout when no path is configured.
enum JsonRowSink {
    File(fs::File),
    Stdout,
}

impl JsonRowSink {
    /// Creates missing parent directories and the output file up front, so an
    /// unusable path fails before any input is injected.
    fn open(path: Option<&Path>) -> Result<Self, Box<dyn std::error::Error>> {
        let Some(path) = path else {
            return Ok(Self::Stdout);
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|e| format!("cannot create {}: {e}", parent.display()))?;
        }
        let file = fs::File::create(path)
            .map_err(|e| format!("cannot write {}: {e}", path.display()))?;
        Ok(Self::File(file))
    }
}

impl ResultSink for JsonRowSink {
    type Error = Box<dyn std::error::Error>;

    fn write_rows(&mut self, rows: &[ResultRow]) -> Result<(), Self::Error> {
        let rows: Vec<RowJson<'_>> = rows.iter().map(RowJson::from).collect();
        let json = serde_json::to_string_pretty(&rows)?;
        match self {
            Self::File(file) => {
                file.write_all(json.as_bytes())?;
                file.write_all(b"\n")?;
                file.flush()?;
            }
            Self::Stdout => println!("{json}"),
        }
        Ok(())
    }
}

fn build_capture(
    cfg: &CaptureConfigJson,
) -> Result<Box<dyn ScreenCapture>, Box<dyn std::error::Error>> {
    Ok(match cfg.kind {
        CaptureKind::Xcap => {
            let target = match &cfg.window {
                Some(title) => CaptureTarget::Window(title.clone()),
                None => CaptureTarget::PrimaryMonitor,
            };
            Box::new(XcapCapture::new(target))
        }
        CaptureKind::File => {
            let path = cfg
                .path
                .as_deref()
                .ok_or("capture.path must be set for file capture")?;
            let [x, y] = cfg.origin;
            Box::new(FileCapture::new(path).with_origin(Point::new(x, y)))
        }
    })
}

fn build_injector(
    cfg: &InputConfigJson,
) -> Result<Box<dyn InputInjector>, Box<dyn std::error::Error>> {
    let inner: Box<dyn InputInjector> = match cfg.kind {
        InputKind::Enigo => Box::new(EnigoInjector::new()?),
        InputKind::Noop => Box::new(NoOpInjector),
    };
    if !cfg.confirm {
        return Ok(inner);
    }
    Ok(Box::new(ConfirmingInjector::new(inner, confirm_on_stdin)))
}

fn confirm_on_stdin(action: &InputAction) -> bool {
    eprint!("allow {action:?}? [y/N] ");
    let _ = io::stderr().flush();
    let mut answer = String::new();
    if io::stdin().lock().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim(), "y" | "Y" | "yes")
}

/// Cancels `token` once a line reading `stop` arrives on stdin.
fn spawn_stop_listener(token: CancelToken) {
    std::thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            match line {
                Ok(line) if line.trim().eq_ignore_ascii_case("stop") => {
                    tracing::info!("stop requested, finishing current record");
                    token.cancel();
                    break;
                }
                Ok(_) => {}
                Err(_) => break,
            }
        }
    });
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let directive = if cli.trace {
        "screensearch=debug"
    } else {
        "screensearch=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(directive.parse()?))
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    if cli.print_schema {
        println!("{SCHEMA_JSON}");
        return Ok(());
    }
    if cli.print_example {
        println!("{EXAMPLE_JSON}");
        return Ok(());
    }

    let config_text = fs::read_to_string(&cli.config)?;
    let config: Config = serde_json::from_str(&config_text)?;
    if config.records_path.is_empty() {
        return Err("records_path must be set in the config".into());
    }
    if !(-1.0..=1.0).contains(&config.match_cfg.threshold) {
        return Err("match.threshold must lie in [-1, 1]".into());
    }

    let records = JsonRecordFile(PathBuf::from(&config.records_path)).read_records()?;
    tracing::info!(records = records.len(), "records loaded");
    let mut sink = JsonRowSink::open(config.output_path.as_deref().map(Path::new))?;

    let library = TemplateLibrary::new(&config.template_dir)
        .with_match_config((&config.match_cfg).into());
    let locator = Locator::new(library, build_capture(&config.capture)?);
    let session = SearchSession::new(
        locator,
        build_injector(&config.input)?,
        config.session_config(),
    );
    let mut runner = BatchRunner::new(session).with_config(config.batch_config());

    let token = CancelToken::new();
    // confirmation prompts own stdin
    if !config.input.confirm {
        spawn_stop_listener(token.clone());
    }
    if config.batch.start_delay_ms > 0 && !records.is_empty() {
        tracing::info!(
            "starting in {:.1} s, bring the target window to the front",
            config.batch.start_delay_ms as f64 / 1000.0
        );
    }

    let outcomes = runner.run(
        &records,
        |progress| {
            tracing::info!(
                completed = progress.completed,
                total = progress.total,
                identifier = progress.outcome.identifier.as_str(),
                count = progress.outcome.count,
                "{}",
                progress.outcome.message
            );
        },
        || token.is_cancelled(),
    );

    let rows = ResultRow::collect(&records, &outcomes);
    sink.write_rows(&rows)?;

    let summary = BatchSummary::from_outcomes(records.len(), &outcomes);
    tracing::info!(
        total = summary.total,
        attempted = summary.attempted,
        succeeded = summary.succeeded,
        failed = summary.failed,
        cancelled = summary.cancelled,
        "batch finished"
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{Config, JsonRowSink};
    use screensearch::{ResultRow, ResultSink, SearchOutcome, SearchRecord};
    use std::time::Duration;

    #[test]
    fn output_directories_are_created_before_the_run() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("daily").join("results.json");
        let mut sink = JsonRowSink::open(Some(path.as_path())).unwrap();
        assert!(path.is_file());

        let records = vec![SearchRecord::new("a-1")];
        let rows = ResultRow::collect(&records, &[SearchOutcome::success("a-1", 2)]);
        sink.write_rows(&rows).unwrap();
        drop(sink);

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written[0]["count"], 2);
        assert_eq!(written[0]["status"], "completed");
    }

    #[test]
    fn unusable_output_path_fails_up_front() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not_a_dir");
        std::fs::write(&blocker, b"x").unwrap();
        assert!(JsonRowSink::open(Some(blocker.join("results.json").as_path())).is_err());
    }

    #[test]
    fn batch_delays_come_from_config() {
        let config: Config = serde_json::from_str(
            r#"{"records_path": "records.json", "batch": {"start_delay_ms": 0}}"#,
        )
        .unwrap();
        let batch = config.batch_config();
        assert_eq!(batch.start_delay, Duration::ZERO);
        assert_eq!(batch.record_delay, Duration::from_millis(200));

        let defaults: Config = serde_json::from_str(r#"{"records_path": "r.json"}"#).unwrap();
        assert_eq!(defaults.batch_config().start_delay, Duration::from_secs(5));
    }
}
