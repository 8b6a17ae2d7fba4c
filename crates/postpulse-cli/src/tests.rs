use std::path::Path;

use super::*;

fn config(handle: Option<&str>, data_dir: &Path) -> AppConfig {
    AppConfig {
        handle: handle.map(str::to_owned),
        bearer_token: None,
        max_results: 90,
        data_dir: data_dir.to_path_buf(),
        api_base_url: "http://127.0.0.1:9/2/".to_string(),
        request_timeout_secs: 5,
        user_agent: "postpulse-test".to_string(),
        empty_fetch_fallback: true,
        log_level: "info".to_string(),
    }
}

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["postpulse-cli"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn parses_collect_defaults() {
    let cli = Cli::try_parse_from(["postpulse-cli", "collect"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Collect {
            handle: None,
            max_results: None,
            daily: false
        })
    ));
}

#[test]
fn parses_collect_with_overrides() {
    let cli = Cli::try_parse_from([
        "postpulse-cli",
        "collect",
        "--handle",
        "someone",
        "--max-results",
        "50",
        "--daily",
    ])
    .unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Collect {
            handle: Some(ref h),
            max_results: Some(50),
            daily: true
        }) if h == "someone"
    ));
}

#[test]
fn rejects_non_numeric_max_results() {
    let result = Cli::try_parse_from(["postpulse-cli", "collect", "--max-results", "many"]);
    assert!(result.is_err());
}

#[test]
fn parses_report_daily() {
    let cli = Cli::try_parse_from(["postpulse-cli", "report", "--daily"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Report {
            handle: None,
            daily: true
        })
    ));
}

#[test]
fn handle_flag_wins_over_config() {
    assert_eq!(
        resolve_handle(Some("configured"), Some("@other")).unwrap(),
        "other"
    );
}

#[test]
fn handle_flag_stands_in_for_missing_config() {
    assert_eq!(resolve_handle(None, Some("someone")).unwrap(), "someone");
}

#[test]
fn configured_handle_used_without_flag() {
    assert_eq!(resolve_handle(Some("configured"), None).unwrap(), "configured");
}

#[test]
fn missing_handle_everywhere_is_an_error() {
    let err = resolve_handle(None, None).unwrap_err();
    assert!(err.to_string().contains("POSTPULSE_HANDLE"));
}

#[test]
fn blank_handle_flag_is_rejected() {
    assert!(resolve_handle(Some("configured"), Some(" @ ")).is_err());
}

#[test]
fn settings_take_config_values() {
    let dir = tempfile::tempdir().unwrap();
    let settings = AcquireSettings::new("someone".to_string(), &config(None, dir.path()));
    assert_eq!(settings.handle, "someone");
    assert_eq!(settings.max_results, 90);
    assert!(settings.empty_fetch_fallback);
}

#[test]
fn report_without_snapshot_fails() {
    let dir = tempfile::tempdir().unwrap();
    let err = run_report(&config(Some("someone"), dir.path()), None, false).unwrap_err();
    assert!(
        err.to_string().contains("no snapshot found for @someone"),
        "unexpected error: {err}"
    );
}
