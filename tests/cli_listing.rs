//! CLI tests for `sitepush servers` and `sitepush deployers`.

mod common;

use common::*;

#[test]
fn servers_lists_aliases() {
    let env = site();

    let result = env.run(&["servers"]);

    assert!(result.is_success(), "{}", result.combined_output());
    assert!(result.stdout.contains("local"));
    assert!(result.stdout.contains("Local preview"));
    assert!(result.stdout.contains("nowhere"));
}

#[test]
fn servers_json_hides_credentials() {
    let env = site();
    env.write(
        "sitepush.toml",
        r#"
[[servers]]
alias = "live"
deployer = { alias = "ftp", server = "ftp.example.com", username = "deploy", password = "hunter2", folder = "/www" }
"#,
    );

    let result = env.run(&["servers", "--json"]);

    assert!(result.is_success(), "{}", result.combined_output());
    let events = result.json_events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["command"], "servers");
    assert_eq!(events[0]["servers"][0]["alias"], "live");
    assert_eq!(events[0]["servers"][0]["deployer"], "ftp");
    assert!(!result.stdout.contains("hunter2"));
}

#[test]
fn servers_missing_config_fails() {
    let env = TestEnv::new();

    let result = env.run(&["servers", "--config", "absent.toml"]);

    assert!(!result.is_success());
    assert!(result.stderr.contains("absent.toml"));
}

#[test]
fn deployers_lists_builtin_transports() {
    let env = TestEnv::new();

    let result = env.run(&["deployers", "--json"]);

    assert!(result.is_success(), "{}", result.combined_output());
    let events = result.json_events();
    let aliases: Vec<&str> = events[0]["deployers"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["alias"].as_str().unwrap())
        .collect();
    assert_eq!(aliases, vec!["folder", "ftp", "sftp"]);
}
