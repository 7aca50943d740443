use assert_cmd::Command;
use mockito::{Matcher, Server};
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn crawler() -> Command {
    let mut cmd = Command::cargo_bin("crawl-repo").unwrap();
    cmd.env_remove("GITHUB_TOKEN")
        .env_remove("GITHUB_USERNAME")
        .arg("--color=false");
    cmd
}

fn write_config(dir: &TempDir, server: &Server) -> std::path::PathBuf {
    let path = dir.path().join("crawler.toml");
    fs::write(
        &path,
        format!(
            r#"
[github]
api_url = "{url}"
raw_url = "{url}/raw"
user_agent = "repo-crawler-tests"
timeout_secs = 5
verify_ref = true

[crawl]
show_progress = false
"#,
            url = server.url()
        ),
    )
    .unwrap();
    path
}

#[test]
fn include_and_exclude_together_is_a_usage_error() {
    crawler()
        .args(["org/repo", "--include", "py", "--exclude", "svg"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn token_without_username_is_a_usage_error() {
    crawler()
        .args(["org/repo", "--token", "ghp_abc"])
        .assert()
        .failure()
        .code(2);
}

#[test]
fn malformed_path_exits_before_any_request() {
    crawler()
        .args(["justone", "--config", "/nonexistent/crawler.toml"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("must be in format 'org/repo'"));
}

#[test]
fn relative_output_path_is_rejected() {
    crawler()
        .args(["org/repo", "--output", "relative/out.txt"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("absolute"));
}

#[test]
fn crawls_into_output_file() {
    let mut server = Server::new();
    let branch = server
        .mock("GET", "/repos/octo/widgets/branches/dev")
        .with_status(200)
        .with_body(r#"{"name":"dev"}"#)
        .create();
    let _tree = server
        .mock("GET", "/repos/octo/widgets/git/trees/dev")
        .match_query(Matcher::UrlEncoded("recursive".into(), "1".into()))
        .with_status(200)
        .with_body(
            r#"{"tree":[
                {"path":"src","type":"tree"},
                {"path":"src/main.py","type":"blob","size":20},
                {"path":"logo.svg","type":"blob","size":7}
            ],"truncated":false}"#,
        )
        .create();
    let _raw = server
        .mock("GET", "/raw/octo/widgets/dev/src/main.py")
        .with_status(200)
        .with_body("import os\nprint(os.name)\n")
        .create();

    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, &server);
    let output = dir.path().join("nested/out/transcript.txt");

    crawler()
        .arg("octo/widgets:dev")
        .arg("--exclude")
        .arg("svg")
        .arg("--config")
        .arg(&config)
        .arg("--output")
        .arg(&output)
        .assert()
        .success();

    branch.assert();
    assert_eq!(
        fs::read_to_string(&output).unwrap(),
        "# src/main.py\n00001| import os\n00002| print(os.name)\n\n"
    );
}

#[test]
fn missing_branch_fails_with_message() {
    let mut server = Server::new();
    let _branch = server
        .mock("GET", "/repos/octo/widgets/branches/nope")
        .with_status(404)
        .with_body(r#"{"message":"Branch not found"}"#)
        .create();

    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, &server);

    crawler()
        .arg("octo/widgets:nope")
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains(
            "Branch 'nope' does not exist in repository 'octo/widgets'.",
        ));
}

#[test]
fn skip_ref_check_never_asks_for_the_branch() {
    let mut server = Server::new();
    let branch = server
        .mock("GET", Matcher::Regex("^/repos/octo/widgets/branches/".into()))
        .expect(0)
        .create();
    let _tree = server
        .mock("GET", "/repos/octo/widgets/git/trees/main")
        .match_query(Matcher::UrlEncoded("recursive".into(), "1".into()))
        .with_status(200)
        .with_body(r#"{"tree":[{"path":"a.txt","type":"blob","size":2}],"truncated":false}"#)
        .create();
    let _raw = server
        .mock("GET", "/raw/octo/widgets/main/a.txt")
        .with_status(200)
        .with_body("a\n")
        .create();

    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, &server);

    crawler()
        .arg("octo/widgets")
        .arg("--skip-ref-check")
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout("# a.txt\n00001| a\n\n");

    branch.assert();
}

#[test]
fn missing_branch_leaves_existing_output_untouched() {
    let mut server = Server::new();
    let _branch = server
        .mock("GET", "/repos/octo/widgets/branches/typo")
        .with_status(404)
        .create();

    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, &server);
    let output = dir.path().join("transcript.txt");
    fs::write(&output, "previous run\n").unwrap();

    crawler()
        .arg("octo/widgets:typo")
        .arg("--config")
        .arg(&config)
        .arg("--output")
        .arg(&output)
        .assert()
        .failure()
        .code(1);

    assert_eq!(fs::read_to_string(&output).unwrap(), "previous run\n");
}
