// CLI integration tests for the families/decode/completion flows.
use std::io::Write;
use std::process::{Command, Output, Stdio};

use serde_json::Value;

fn cmd() -> Command {
    let exe = env!("CARGO_BIN_EXE_clusterwire");
    Command::new(exe)
}

fn parse_json(value: &str) -> Value {
    serde_json::from_str(value).expect("valid json")
}

fn run_with_stdin(args: &[&str], stdin: &str) -> Output {
    let mut child = cmd()
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn");
    child
        .stdin
        .take()
        .expect("stdin")
        .write_all(stdin.as_bytes())
        .expect("write stdin");
    child.wait_with_output().expect("output")
}

fn stdout_line(output: &Output) -> String {
    let text = String::from_utf8_lossy(&output.stdout);
    text.lines().next().expect("stdout line").to_string()
}

fn stderr_error(output: &Output) -> Value {
    let text = String::from_utf8_lossy(&output.stderr);
    let line = text
        .lines()
        .find(|line| line.starts_with("{\"error\""))
        .expect("error json on stderr");
    parse_json(line)
}

#[test]
fn families_lists_discriminators_and_tags() {
    let output = cmd().args(["families"]).output().expect("families");
    assert!(output.status.success());
    let value = parse_json(&stdout_line(&output));
    let families = value["families"].as_array().expect("families array");
    let node = families
        .iter()
        .find(|entry| entry["name"] == "NodeEvent")
        .expect("NodeEvent registered");
    assert_eq!(node["discriminator"], "Kind");
    assert_eq!(node["tags"][0], "NodeUp");

    let policy = families
        .iter()
        .find(|entry| entry["name"] == "BackupPolicyDescription")
        .expect("plain type registered");
    assert!(policy["discriminator"].is_null());
}

#[test]
fn decode_emits_canonical_encoding() {
    let output = run_with_stdin(
        &["decode", "nodeevent"],
        r#"{"Kind":"NodeUp","Extra":{"a":[1]},"EventInstanceId":"3fa85f64-5717-4562-b3fc-2c963f66afa6","TimeStamp":"2023-01-01T00:00:00Z","NodeName":"_Node_0"}"#,
    );
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(
        stdout_line(&output),
        concat!(
            r#"{"Kind":"NodeUp","EventInstanceId":"3fa85f64-5717-4562-b3fc-2c963f66afa6","#,
            r#""TimeStamp":"2023-01-01T00:00:00Z","NodeName":"_Node_0","NodeInstance":0,"#,
            r#""LastNodeDownAt":"1970-01-01T00:00:00Z"}"#
        )
    );
}

#[test]
fn decode_reads_arrays_from_file() {
    let temp = tempfile::tempdir().expect("tempdir");
    let path = temp.path().join("values.json");
    std::fs::write(
        &path,
        r#"[{"Kind":"Int64","Data":7},{"kind":"String","Data":"x","Note":true}]"#,
    )
    .expect("write input");

    let output = cmd()
        .args([
            "decode",
            "PropertyValue",
            "--array",
            "--input",
            path.to_str().unwrap(),
        ])
        .output()
        .expect("decode");
    assert!(output.status.success());
    assert_eq!(
        stdout_line(&output),
        r#"[{"Kind":"Int64","Data":7},{"Kind":"String","Data":"x"}]"#
    );
}

#[test]
fn pretty_output_keeps_property_order() {
    let output = run_with_stdin(
        &["--color", "never", "decode", "AutoScalingMetric", "--pretty"],
        r#"{"kind":"Resource","name":"cpu"}"#,
    );
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "{\n  \"kind\": \"Resource\",\n  \"name\": \"cpu\"\n}\n"
    );
}

#[test]
fn unknown_discriminator_exit_code() {
    let output = run_with_stdin(&["decode", "ChaosEvent"], r#"{"Kind":"Paused"}"#);
    assert_eq!(output.status.code(), Some(7));
    let err = stderr_error(&output);
    assert_eq!(err["error"]["kind"], "UnknownDiscriminator");
    assert_eq!(err["error"]["discriminator"], "Paused");
    assert_eq!(err["error"]["property"], "Kind");
}

#[test]
fn misplaced_discriminator_exit_code() {
    let output = run_with_stdin(
        &["decode", "BackupStorageDescription"],
        r#"{"Path":"p","StorageKind":"FileShare"}"#,
    );
    assert_eq!(output.status.code(), Some(6));
    let err = stderr_error(&output);
    assert_eq!(err["error"]["kind"], "UnexpectedDiscriminatorPosition");
}

#[test]
fn malformed_value_reports_property() {
    let output = run_with_stdin(
        &["decode", "AutoScalingMechanism"],
        r#"{"kind":"AddRemoveReplica","minCount":"one"}"#,
    );
    assert_eq!(output.status.code(), Some(5));
    let err = stderr_error(&output);
    assert_eq!(err["error"]["property"], "minCount");
    assert_eq!(err["error"]["expected"], "int32");
}

#[test]
fn truncated_json_exit_code() {
    let output = run_with_stdin(&["decode", "PropertyValue"], r#"{"Kind":"Int64""#);
    assert_eq!(output.status.code(), Some(8));
    assert_eq!(stderr_error(&output)["error"]["kind"], "Structural");
}

#[test]
fn not_found_exit_code() {
    let output = run_with_stdin(&["decode", "NoSuchType"], "{}");
    assert_eq!(output.status.code(), Some(3));
    assert_eq!(stderr_error(&output)["error"]["kind"], "NotFound");

    let temp = tempfile::tempdir().expect("tempdir");
    let missing = temp.path().join("missing.json");
    let output = cmd()
        .args(["decode", "PropertyValue", "--input", missing.to_str().unwrap()])
        .output()
        .expect("decode");
    assert_eq!(output.status.code(), Some(3));
}

#[test]
fn usage_exit_code() {
    let output = cmd()
        .args(["decode", "PropertyValue", "--bogus"])
        .output()
        .expect("decode");
    assert_eq!(output.status.code(), Some(2));
    assert_eq!(stderr_error(&output)["error"]["kind"], "Usage");
}

#[test]
fn completion_script_is_generated() {
    let output = cmd().args(["completion", "bash"]).output().expect("completion");
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("clusterwire"));
}
