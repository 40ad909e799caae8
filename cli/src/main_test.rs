use super::*;

#[test]
fn url_joins_without_double_slash() {
    let ctx = CliContext { base_url: "http://lab.local:3000/".into() };
    assert_eq!(ctx.url("/api/report"), "http://lab.local:3000/api/report");
}

#[test]
fn list_params_only_include_set_filters() {
    assert!(list_params(None, None, false).is_empty());
    let params = list_params(Some("servo".into()), Some("Passive Components".into()), true);
    assert_eq!(
        params,
        vec![
            ("q", "servo".to_owned()),
            ("category", "Passive Components".to_owned()),
            ("issuable", "true".to_owned()),
        ]
    );
}

#[test]
fn server_error_reads_json_body() {
    let err = server_error(
        reqwest::StatusCode::BAD_REQUEST,
        r#"{"code":"E_ROW","message":"row 2: missing category","row":2}"#,
    );
    match err {
        CliError::ServerError { status, code, message } => {
            assert_eq!(status, 400);
            assert_eq!(code, "E_ROW");
            assert_eq!(message, "row 2: missing category");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn server_error_falls_back_to_raw_text() {
    let err = server_error(reqwest::StatusCode::BAD_GATEWAY, "upstream down\n");
    assert!(matches!(
        err,
        CliError::ServerError { status: 502, ref code, ref message } if code == "E_HTTP" && message == "upstream down"
    ));
}

#[test]
fn parses_issue_command() {
    let id = Uuid::new_v4();
    let cli = Cli::try_parse_from(["labstock", "issue", &id.to_string(), "--student", "Amy", "--quantity", "3"]).unwrap();
    assert!(matches!(
        cli.command,
        Command::Issue { component_id, ref student, quantity: 3 } if component_id == id && student == "Amy"
    ));
}

#[test]
fn parses_backup_import_and_base_url() {
    let cli = Cli::try_parse_from(["labstock", "--base-url", "http://x", "backup", "import", "snap.json"]).unwrap();
    assert_eq!(cli.base_url, "http://x");
    assert!(matches!(
        cli.command,
        Command::Backup(BackupCommand { command: BackupSubcommand::Import { ref file } }) if file == &PathBuf::from("snap.json")
    ));
}
