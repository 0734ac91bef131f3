use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::tempdir;

fn run(home: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_sv-agent"))
        .args(args)
        .env("HOME", home)
        .env_remove("SV_AGENT_CONFIG")
        .env_remove("SV_AGENT_PROVIDER")
        .env_remove("OLLAMA_HOST")
        .output()
        .expect("run sv-agent")
}

fn write_config(home: &Path, body: &str) {
    let dir = home.join(".sv-agent");
    fs::create_dir_all(&dir).expect("create config dir");
    fs::write(dir.join("config.yaml"), body).expect("write config");
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

fn assert_ok(output: &Output) {
    assert!(
        output.status.success(),
        "stdout:\n{}\nstderr:\n{}",
        stdout(output),
        stderr(output)
    );
}

fn assert_err_contains(output: &Output, needle: &str) {
    assert!(
        !output.status.success(),
        "expected failure, stdout:\n{}\nstderr:\n{}",
        stdout(output),
        stderr(output)
    );
    let text = format!("{}{}", stdout(output), stderr(output));
    assert!(
        text.contains(needle),
        "expected error to contain `{needle}`, got:\n{text}"
    );
}

#[test]
fn help_is_printed_without_arguments() {
    let temp = tempdir().expect("tempdir");
    let output = run(temp.path(), &[]);
    assert_ok(&output);
    let text = stdout(&output);
    assert!(text.contains("Commands:"));
    assert!(text.contains("  batch <batch.json>"));
}

#[test]
fn unknown_commands_exit_non_zero() {
    let temp = tempdir().expect("tempdir");
    let output = run(temp.path(), &["setup"]);
    assert_err_contains(&output, "unknown command `setup`");
}

#[test]
fn ask_with_rule_provider_answers_and_logs() {
    let temp = tempdir().expect("tempdir");
    let output = run(
        temp.path(),
        &["ask", "--provider", "rules", "What coverage do I need for SV detection?"],
    );
    assert_ok(&output);
    assert!(stdout(&output).contains("30x"));

    let log = fs::read_to_string(temp.path().join(".sv-agent/logs/sv-agent.log"))
        .expect("log written");
    assert!(log.contains("\"event\":\"provider.selected\""));
    assert!(log.contains("\"event\":\"provider.generate\""));
    assert!(log.contains("prompt_tokens="));
}

#[test]
fn ask_requires_a_question() {
    let temp = tempdir().expect("tempdir");
    let output = run(temp.path(), &["ask", "--provider", "rules"]);
    assert_err_contains(&output, "usage: ask");
}

#[test]
fn list_shows_modules_and_sv_types() {
    let temp = tempdir().expect("tempdir");
    let modules = run(temp.path(), &["list"]);
    assert_ok(&modules);
    let text = stdout(&modules);
    assert!(text.starts_with("Module00a\t"));
    assert!(text.contains("Module06\t"));

    let types = run(temp.path(), &["list", "sv-types"]);
    assert_ok(&types);
    assert!(stdout(&types).contains("DEL\tDeletion"));

    assert_err_contains(&run(temp.path(), &["list", "genes"]), "unknown list target");
}

#[test]
fn invalid_settings_fail_fast() {
    let temp = tempdir().expect("tempdir");
    write_config(temp.path(), "provider:\n  preferred: skynet\n");
    let output = run(temp.path(), &["ask", "hello"]);
    assert_err_contains(&output, "unknown provider `skynet`");
}

#[test]
fn analyze_prints_workflow_statistics() {
    let temp = tempdir().expect("tempdir");
    let wdl = temp.path().join("Flow.wdl");
    fs::write(
        &wdl,
        "version 1.0\nworkflow Flow {\n  input {\n    File bam\n  }\n  call A { input: bam = bam }\n  call B { input: x = A.out }\n}\n",
    )
    .expect("write wdl");
    let output = run(temp.path(), &["analyze", wdl.to_str().expect("utf8 path")]);
    assert_ok(&output);
    let text = stdout(&output);
    assert!(text.contains("workflow=Flow"));
    assert!(text.contains("inputs=bam"));
    assert!(text.contains("total_calls=2"));
    assert!(text.contains("has_cycles=false"));
    assert!(text.contains("  B <- A"));
}

#[test]
fn convert_reports_failures_with_exit_code() {
    let temp = tempdir().expect("tempdir");
    write_config(
        temp.path(),
        "workflow:\n  converter_binary: sv-agent-no-such-converter\n",
    );
    let wdl = temp.path().join("A.wdl");
    fs::write(&wdl, "workflow A {}").expect("write wdl");
    let out = temp.path().join("cwl");
    let output = run(
        temp.path(),
        &[
            "convert",
            wdl.to_str().expect("utf8 path"),
            "-o",
            out.to_str().expect("utf8 path"),
        ],
    );
    assert_err_contains(&output, "failed=1");
}

#[test]
fn batch_validation_errors_are_surfaced() {
    let temp = tempdir().expect("tempdir");
    let batch = temp.path().join("batch.json");
    fs::write(&batch, r#"{"samples": ["s1"], "output_dir": "out"}"#).expect("write batch");
    let output = run(temp.path(), &["batch", batch.to_str().expect("utf8 path")]);
    assert_err_contains(&output, "Missing required field: reference");
}

#[test]
fn providers_fall_back_to_rules_and_suggest_a_model() {
    let temp = tempdir().expect("tempdir");
    write_config(
        temp.path(),
        "provider:\n  probe_timeout_secs: 1\n  local:\n    base_url: http://127.0.0.1:9\n  openai:\n    api_key: \"\"\n  anthropic:\n    api_key: \"\"\n  huggingface:\n    api_key: \"\"\n",
    );
    let output = run(temp.path(), &["providers", "--task", "convert WDL"]);
    assert_ok(&output);
    let text = stdout(&output);
    assert!(text.contains("  rules        available"));
    assert!(text.contains("selected=rules"));
    assert!(text.contains("suggested=codellama:13b"));
}

#[test]
fn unknown_provider_flag_fails_like_unknown_config() {
    let temp = tempdir().expect("tempdir");
    let output = run(temp.path(), &["ask", "--provider", "bogus", "hello"]);
    assert_err_contains(&output, "unknown provider `bogus`");
}
