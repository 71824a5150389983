//! CLI tests for `sitepush publish` against the folder deployer.

mod common;

use common::*;

#[test]
fn publish_copies_pages_and_media_to_folder() {
    let env = site();

    let result = env.run(&["publish", "--server", "local"]);

    assert!(result.is_success(), "publish failed:\n{}", result.combined_output());
    assert_eq!(env.read("out/home/index.html"), HOME_HTML);
    assert_eq!(env.read("out/home/about/index.html"), ABOUT_HTML);
    assert_eq!(env.read("out/media/logo.png"), "PNG");
    assert!(!env.exists("out/home/draft/index.html"));
    assert!(!env.exists("out/sitemap.xml"));
    assert!(!env.exists("out/css/site.css"));
}

#[test]
fn publish_from_another_directory_writes_next_to_config() {
    let env = site();
    env.write("elsewhere/.keep", "");

    let result = env.run_in(
        &env.path("elsewhere"),
        &["publish", "-s", "local", "-c", "../sitepush.toml", "-m", "../site.toml"],
    );

    assert!(result.is_success(), "publish failed:\n{}", result.combined_output());
    assert_eq!(env.read("out/home/index.html"), HOME_HTML);
    assert!(!env.exists("elsewhere/out"));
}

#[test]
fn publish_prints_steps_and_summary_to_stderr() {
    let env = site();

    let result = env.run(&["publish", "--server", "local"]);

    assert!(result.is_success(), "{}", result.combined_output());
    assert!(result.stdout.is_empty(), "unexpected stdout: {}", result.stdout);
    assert!(result.stderr.contains("Publishing to local"));
    assert!(result.stderr.contains("[1/5]"));
    assert!(result.stderr.contains("[5/5]"));
    assert!(result.stderr.contains("Done: 1 transferred"));
    assert!(result.stderr.contains("pages: 2 written, 1 skipped"));
}

#[test]
fn publish_with_files_stages_css_and_sitemap() {
    let env = site();

    let result = env.run(&["publish", "--server", "local", "--files"]);

    assert!(result.is_success(), "{}", result.combined_output());
    assert_eq!(env.read("out/css/site.css"), "body { margin: 0 }");
    let sitemap = env.read("out/sitemap.xml");
    assert!(sitemap.contains("<loc>https://example.com/home/</loc>"));
    assert!(sitemap.contains("<loc>https://example.com/home/about/</loc>"));
    assert!(!sitemap.contains("draft"));
}

#[test]
fn publish_single_item_without_descendants() {
    let env = site();

    let result = env.run(&["publish", "-s", "local", "--item", "about"]);

    assert!(result.is_success(), "{}", result.combined_output());
    assert!(env.exists("out/home/about/index.html"));
    assert!(!env.exists("out/home/index.html"));
    assert!(!env.exists("out/media/logo.png"));
}

#[test]
fn publish_keeps_staging_unless_clean() {
    let env = site();

    let kept = env.run(&["publish", "-s", "local"]);
    assert!(kept.is_success(), "{}", kept.combined_output());
    assert_eq!(env.staging_sessions().len(), 1);

    let cleaned = env.run(&["publish", "-s", "local", "--clean"]);
    assert!(cleaned.is_success(), "{}", cleaned.combined_output());
    assert_eq!(env.staging_sessions().len(), 1);
}

#[test]
fn publish_reuses_given_session_id() {
    let env = site();
    let id = "0b6a8f2e-5c1d-4e7a-8b3f-9d2c1e0a4b5c";

    let result = env.run(&["publish", "-s", "local", "--session", id]);

    assert!(result.is_success(), "{}", result.combined_output());
    assert_eq!(env.staging_sessions(), vec![id.to_string()]);
    assert!(env.exists(&format!("staging/{}/home/index.html", id)));
}

#[test]
fn publish_json_emits_ndjson_events() {
    let env = site();

    let result = env.run(&["publish", "-s", "local", "--json"]);

    assert!(result.is_success(), "{}", result.combined_output());
    let events = result.json_events();
    assert_eq!(events.first().unwrap()["event"], "start");
    assert_eq!(events.first().unwrap()["destination"], "local");
    let completed_steps = events
        .iter()
        .filter(|e| e["event"] == "step_complete")
        .count();
    assert_eq!(completed_steps, 5);
    let last = events.last().unwrap();
    assert_eq!(last["event"], "complete");
    assert_eq!(last["status"], "success");
    assert_eq!(last["transferred"], 1);
    assert!(events.iter().all(|e| e["command"] == "publish"));
}

#[test]
fn missing_server_exits_non_zero() {
    let env = site();

    let result = env.run(&["publish", "-s", "staging-box"]);

    assert!(!result.is_success());
    assert_ne!(result.exit_code, 0);
    assert!(result.stderr.contains("no server configured with alias 'staging-box'"));
    assert!(!env.exists("out"));
    assert!(env.staging_sessions().is_empty());
}

#[test]
fn unknown_deployer_exits_non_zero() {
    let env = site();

    let result = env.run(&["publish", "-s", "nowhere"]);

    assert!(!result.is_success());
    assert!(result.stderr.contains("carrier-pigeon"));
}

#[test]
fn folder_server_without_folder_exits_non_zero() {
    let env = site();

    let result = env.run(&["publish", "-s", "unset", "--json"]);

    assert!(!result.is_success());
    let events = result.json_events();
    let last = events.last().unwrap();
    assert_eq!(last["event"], "complete");
    assert_eq!(last["status"], "failed");
}

#[test]
fn unknown_item_fails_in_calculate() {
    let env = site();

    let result = env.run(&["publish", "-s", "local", "--item", "missing"]);

    assert!(!result.is_success());
    assert!(result.stderr.contains("dependency calculation failed"));
    assert!(!env.exists("out"));
}

#[test]
fn unknown_config_key_is_a_warning() {
    let env = site();
    env.write(
        "sitepush.toml",
        &format!("colour = \"blue\"\n{}", SITE_CONFIG),
    );

    let result = env.run(&["publish", "-s", "local"]);

    assert!(result.is_success(), "{}", result.combined_output());
    assert!(result.stderr.contains("unknown config key 'colour'"));
}
