use pathbroker_lib::{parse, FailureKind, OutputFormat, RawProcessOutput, RouteResult, RouteSuccess};

fn expect_success(result: RouteResult) -> RouteSuccess {
    match result {
        RouteResult::Success(success) => success,
        RouteResult::Failure(failure) => panic!("expected success, got {:?}", failure),
    }
}

fn expect_failure(result: RouteResult) -> (FailureKind, String) {
    match result {
        RouteResult::Failure(failure) => (failure.kind, failure.message),
        RouteResult::Success(success) => panic!("expected failure, got {:?}", success),
    }
}

#[test]
fn structured_success_populates_metrics_and_path() {
    let stdout = r#"{"success":true,"algorithm":"dijkstra","distance":120,"time":2.5,"steps":3,"path":"main gate → basketball → library"}"#;
    let success = expect_success(parse(&RawProcessOutput::new(0, stdout)));

    assert_eq!(success.format, OutputFormat::Structured);
    assert_eq!(success.algorithm.as_deref(), Some("dijkstra"));
    assert_eq!(success.distance, Some(120.0));
    assert_eq!(success.time, Some(2.5));
    assert_eq!(success.steps, Some(3));
    assert_eq!(success.path, vec!["main gate", "basketball", "library"]);
    assert_eq!(
        success.summary,
        "Algorithm: dijkstra\nDistance: 120 meters\nTime: 2.5 minutes\nSteps: 3\nPath: main gate → basketball → library"
    );
}

#[test]
fn structured_path_entries_are_trimmed_not_recased() {
    let stdout = r#"  {"success":true,"algorithm":"a*","distance":1,"time":1,"steps":1,"path":"  Main Gate  →  DS "}  "#;
    let success = expect_success(parse(&RawProcessOutput::new(0, stdout)));
    assert_eq!(success.path, vec!["Main Gate", "DS"]);
}

#[test]
fn structured_failure_uses_embedded_error() {
    let stdout = r#"{"success":false,"error":"Invalid source or destination"}"#;
    let (kind, message) = expect_failure(parse(&RawProcessOutput::new(0, stdout)));
    assert_eq!(kind, FailureKind::Reported);
    assert_eq!(message, "Invalid source or destination");
}

#[test]
fn non_zero_exit_fails_regardless_of_stdout() {
    let outputs = [
        "",
        r#"{"success":true,"algorithm":"dijkstra","distance":1,"time":1,"steps":1,"path":"oat → hostel"}"#,
        "Path: oat -> hostel",
        "https://www.openstreetmap.org/directions?route=1,2",
    ];
    for code in [1, 2, 127, -1] {
        for stdout in outputs {
            let (kind, message) = expect_failure(parse(&RawProcessOutput::new(code, stdout)));
            assert_eq!(kind, FailureKind::ProcessExit { code });
            assert_eq!(message, format!("computation exited with status {}", code));
        }
    }
}

#[test]
fn all_separators_yield_the_same_waypoints() {
    let sequences: Vec<Vec<String>> = [" -> ", " → ", " ? "]
        .iter()
        .map(|separator| {
            let stdout = format!(
                "Searching...\nPath: Main Gate{sep}Canteen{sep}Academic Block A\nDone\n",
                sep = separator
            );
            expect_success(parse(&RawProcessOutput::new(0, stdout))).path
        })
        .collect();

    assert_eq!(
        sequences[0],
        vec!["main gate", "canteen", "academic block a"]
    );
    assert_eq!(sequences[0], sequences[1]);
    assert_eq!(sequences[1], sequences[2]);
}

#[test]
fn text_contract_keeps_full_stdout_as_summary() {
    let stdout = "computation complete\nPath: Main Gate -> Unknown Place\n";
    let success = expect_success(parse(&RawProcessOutput::new(0, stdout)));
    assert_eq!(success.format, OutputFormat::Text);
    assert_eq!(success.summary, stdout);
    assert_eq!(success.path, vec!["main gate", "unknown place"]);
}

#[test]
fn first_path_line_wins() {
    let stdout = "Path: oat -> bus\nPath: hostel -> library\n";
    let success = expect_success(parse(&RawProcessOutput::new(0, stdout)));
    assert_eq!(success.path, vec!["oat", "bus"]);
}

#[test]
fn path_marker_takes_priority_over_url_line() {
    let stdout = "https://example.test/route=1,2\nPath: oat -> bus\n";
    let success = expect_success(parse(&RawProcessOutput::new(0, stdout)));
    assert_eq!(success.format, OutputFormat::Text);
    assert!(success.producer_link.is_none());
}

#[test]
fn url_line_is_a_link_bypass() {
    let stdout = "Shortest Distance: 120 meters\nhttps://www.openstreetmap.org/directions?engine=fossgis_osrm_foot&route=29.375,79.531111;29.375556,79.530556#map=19/29.375/79.531111\n";
    let success = expect_success(parse(&RawProcessOutput::new(0, stdout)));
    assert_eq!(success.format, OutputFormat::UrlBypass);
    assert!(success.path.is_empty());
    assert_eq!(success.summary, stdout);
    assert!(success
        .producer_link
        .as_deref()
        .unwrap()
        .starts_with("https://www.openstreetmap.org/directions"));
}

#[test]
fn empty_output_is_unparseable() {
    let (kind, message) = expect_failure(parse(&RawProcessOutput::new(0, "")));
    assert_eq!(kind, FailureKind::Unparseable);
    assert_eq!(message, "unparseable output");
}

#[test]
fn unrecognized_text_is_unparseable() {
    let (kind, _) = expect_failure(parse(&RawProcessOutput::new(
        0,
        "Invalid source or destination.\n",
    )));
    assert_eq!(kind, FailureKind::Unparseable);
}

#[test]
fn truncated_structured_output_falls_back_to_text() {
    let stdout = "{\"success\":true,\"path\":\"oat → bus\"\nPath: oat → bus\n";
    let success = expect_success(parse(&RawProcessOutput::new(0, stdout)));
    assert_eq!(success.format, OutputFormat::Text);
    assert_eq!(success.path, vec!["oat", "bus"]);
}

#[test]
fn stderr_never_affects_the_result() {
    let quiet = parse(&RawProcessOutput::new(0, "Path: oat -> bus"));
    let noisy = parse(
        &RawProcessOutput::new(0, "Path: oat -> bus").with_stderr("warning: low memory\nPath: x"),
    );
    assert_eq!(quiet, noisy);
}
