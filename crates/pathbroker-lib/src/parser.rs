//! Interpretation of captured path-finder output.
//!
//! Producers have emitted three contracts over time: a single JSON record, a
//! free-form report with a `Path:` line, and a bare pre-built map URL. [`parse`]
//! tries each in that order; every attempt returns `None` when its contract
//! does not apply, and the first `Some` wins.

use serde::{Deserialize, Serialize};

/// Separators placed between waypoint names, in the order they are checked.
///
/// `" ? "` is what older producers emitted when the arrow was mangled by a
/// console code page.
pub const WAYPOINT_SEPARATORS: [&str; 3] = [" -> ", " → ", " ? "];

/// Marker introducing the path in the text contract.
pub const PATH_MARKER: &str = "Path:";

/// Message for output matching no known contract.
pub const UNPARSEABLE_MESSAGE: &str = "unparseable output";

/// Everything one finished subprocess produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawProcessOutput {
    /// Exit status; `-1` when the process was terminated by a signal.
    pub exit_code: i32,
    pub stdout: String,
    /// Diagnostics only; never used to build a result.
    pub stderr: String,
}

impl RawProcessOutput {
    pub fn new(exit_code: i32, stdout: impl Into<String>) -> Self {
        Self {
            exit_code,
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    pub fn with_stderr(mut self, stderr: impl Into<String>) -> Self {
        self.stderr = stderr.into();
        self
    }
}

/// Which producer contract a successful result was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    Structured,
    Text,
    UrlBypass,
}

impl OutputFormat {
    pub fn label(self) -> &'static str {
        match self {
            OutputFormat::Structured => "structured",
            OutputFormat::Text => "text",
            OutputFormat::UrlBypass => "url_bypass",
        }
    }
}

/// A computed route.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteSuccess {
    pub format: OutputFormat,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub algorithm: Option<String>,
    /// Metres.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
    /// Minutes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub steps: Option<u64>,
    /// Ordered waypoint names; empty for the URL-bypass contract.
    pub path: Vec<String>,
    pub summary: String,
    /// Map link supplied by the producer itself.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub producer_link: Option<String>,
}

/// Classification of a failed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FailureKind {
    /// The subprocess exited with a non-zero status.
    ProcessExit { code: i32 },
    /// The producer reported `success: false`.
    Reported,
    /// No contract matched.
    Unparseable,
    /// The subprocess was killed after its deadline.
    Timeout,
    /// The subprocess could not be started.
    Launch,
    /// The broker stopped admitting computations.
    Unavailable,
}

impl FailureKind {
    pub fn label(self) -> &'static str {
        match self {
            FailureKind::ProcessExit { .. } => "process_exit",
            FailureKind::Reported => "reported",
            FailureKind::Unparseable => "unparseable",
            FailureKind::Timeout => "timeout",
            FailureKind::Launch => "launch",
            FailureKind::Unavailable => "unavailable",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteFailure {
    #[serde(flatten)]
    pub kind: FailureKind,
    pub message: String,
}

/// Canonical outcome of one path request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RouteResult {
    Success(RouteSuccess),
    Failure(RouteFailure),
}

impl RouteResult {
    pub fn failure(kind: FailureKind, message: impl Into<String>) -> Self {
        RouteResult::Failure(RouteFailure {
            kind,
            message: message.into(),
        })
    }

    pub fn is_success(&self) -> bool {
        matches!(self, RouteResult::Success(_))
    }

    /// Ordered waypoints; empty on failure.
    pub fn path(&self) -> &[String] {
        match self {
            RouteResult::Success(success) => &success.path,
            RouteResult::Failure(_) => &[],
        }
    }

    /// Human-readable text handed to the presentation layer.
    pub fn summary(&self) -> String {
        match self {
            RouteResult::Success(success) => success.summary.clone(),
            RouteResult::Failure(failure) => format!("Error: {}", failure.message),
        }
    }
}

/// Only `success` is required. Metric fields accept a JSON number or a
/// numeric string; any other value reads as absent.
#[derive(Debug, Deserialize)]
struct StructuredPayload {
    success: bool,
    algorithm: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    distance: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    time: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    steps: Option<f64>,
    path: Option<String>,
    error: Option<String>,
}

fn lenient_number<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    let number = match value {
        Some(serde_json::Value::Number(n)) => n.as_f64(),
        Some(serde_json::Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(number.filter(|n| n.is_finite()))
}

fn step_count(steps: f64) -> Option<u64> {
    (steps >= 0.0).then(|| steps.round() as u64)
}

/// Normalize captured output into a [`RouteResult`].
pub fn parse(raw: &RawProcessOutput) -> RouteResult {
    if raw.exit_code != 0 {
        return RouteResult::failure(
            FailureKind::ProcessExit {
                code: raw.exit_code,
            },
            format!("computation exited with status {}", raw.exit_code),
        );
    }

    let attempts: [fn(&str) -> Option<RouteResult>; 3] =
        [parse_structured, parse_text, parse_url_bypass];
    for attempt in attempts {
        if let Some(result) = attempt(&raw.stdout) {
            if let RouteResult::Success(success) = &result {
                tracing::debug!(
                    format = success.format.label(),
                    waypoints = success.path.len(),
                    "parsed path-finder output"
                );
            }
            return result;
        }
    }

    tracing::debug!(bytes = raw.stdout.len(), "no output contract matched");
    RouteResult::failure(FailureKind::Unparseable, UNPARSEABLE_MESSAGE)
}

fn parse_structured(stdout: &str) -> Option<RouteResult> {
    let payload: StructuredPayload = match serde_json::from_str(stdout.trim()) {
        Ok(payload) => payload,
        Err(err) => {
            tracing::trace!(error = %err, "output is not a structured record");
            return None;
        }
    };

    if !payload.success {
        let message = payload
            .error
            .filter(|e| !e.trim().is_empty())
            .unwrap_or_else(|| "computation reported failure".to_string());
        return Some(RouteResult::failure(FailureKind::Reported, message));
    }

    let path_text = payload.path.unwrap_or_default();
    let steps = payload.steps.and_then(step_count);
    let summary = format!(
        "Algorithm: {}\nDistance: {} meters\nTime: {} minutes\nSteps: {}\nPath: {}",
        payload.algorithm.as_deref().unwrap_or("unknown"),
        display_or_na(payload.distance),
        display_or_na(payload.time),
        display_or_na(steps),
        path_text,
    );

    Some(RouteResult::Success(RouteSuccess {
        format: OutputFormat::Structured,
        algorithm: payload.algorithm,
        distance: payload.distance,
        time: payload.time,
        steps,
        path: split_waypoints(&path_text),
        summary,
        producer_link: None,
    }))
}

fn parse_text(stdout: &str) -> Option<RouteResult> {
    let path_line = stdout.lines().find(|line| line.contains(PATH_MARKER))?;
    let (_, remainder) = path_line.split_once(PATH_MARKER)?;
    let path = split_waypoints(remainder)
        .into_iter()
        .map(|name| name.to_lowercase())
        .collect();
    let metrics = TextMetrics::scan(stdout);

    Some(RouteResult::Success(RouteSuccess {
        format: OutputFormat::Text,
        algorithm: metrics.algorithm,
        distance: metrics.distance,
        time: metrics.time,
        steps: metrics.steps,
        path,
        summary: stdout.to_string(),
        producer_link: None,
    }))
}

fn parse_url_bypass(stdout: &str) -> Option<RouteResult> {
    let link = stdout
        .lines()
        .map(str::trim)
        .find(|line| line.starts_with("http"))?;

    Some(RouteResult::Success(RouteSuccess {
        format: OutputFormat::UrlBypass,
        algorithm: None,
        distance: None,
        time: None,
        steps: None,
        path: Vec::new(),
        summary: stdout.to_string(),
        producer_link: Some(link.to_string()),
    }))
}

/// Split a path string into trimmed, non-empty waypoint names.
///
/// Every separator in [`WAYPOINT_SEPARATORS`] splits the text, so a line that
/// mixes arrow styles still yields one entry per hop.
pub fn split_waypoints(path: &str) -> Vec<String> {
    let mut pieces = vec![path];
    for separator in WAYPOINT_SEPARATORS {
        pieces = pieces
            .into_iter()
            .flat_map(|piece| piece.split(separator))
            .collect();
    }

    pieces
        .into_iter()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

fn display_or_na<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| v.to_string())
}

/// Metric lines printed by the legacy text producer.
#[derive(Debug, Default)]
struct TextMetrics {
    algorithm: Option<String>,
    distance: Option<f64>,
    time: Option<f64>,
    steps: Option<u64>,
}

impl TextMetrics {
    fn scan(stdout: &str) -> Self {
        let mut metrics = TextMetrics::default();
        for line in stdout.lines().map(str::trim) {
            if metrics.algorithm.is_none() {
                metrics.algorithm = line
                    .strip_prefix("Using ")
                    .and_then(|rest| rest.trim_end_matches('.').strip_suffix(" Algorithm"))
                    .map(str::to_string);
            }
            if metrics.distance.is_none() {
                metrics.distance = labelled_number(line, "Shortest Distance:");
            }
            if metrics.time.is_none() {
                metrics.time = labelled_number(line, "Walking Time:");
            }
            if metrics.steps.is_none() {
                metrics.steps = labelled_number(line, "Total Steps:").and_then(step_count);
            }
        }
        metrics
    }
}

fn labelled_number(line: &str, label: &str) -> Option<f64> {
    line.strip_prefix(label)?
        .split_whitespace()
        .next()?
        .parse()
        .ok()
}
