use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn cli() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_caption-planner"));
    cmd.env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_cli_help() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Timed caption planning"));
}

#[test]
fn test_cli_plan_single_line() {
    cli()
        .args(["plan", "--text", "你好。再见！", "--duration", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("01 (2.00s)"))
        .stdout(predicate::str::contains("[  0.000 -   1.000] 你好"))
        .stdout(predicate::str::contains("[  1.000 -   2.000] 再见"));
}

#[test]
fn test_cli_plan_json() {
    let assert = cli()
        .args(["plan", "--json", "--text", "今天天气真好，我们出去玩吧", "--duration", "3"])
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let plans: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let instruction = &plans[0][0];
    assert_eq!(instruction["row_texts"][0], "今天天气真好我们出去玩吧");
    assert_eq!(instruction["start"], 0.0);
    assert_eq!(instruction["end"], 3.0);
}

#[test]
fn test_cli_plan_text_requires_duration() {
    cli()
        .args(["plan", "--text", "你好"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--duration"));
}

#[test]
fn test_cli_plan_rejects_negative_duration() {
    cli()
        .args(["plan", "--text", "你好", "--duration=-4"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("non-negative"));
}

#[test]
fn test_cli_plan_episode_script() {
    let dir = TempDir::new().unwrap();
    let script = dir.path().join("剧本.json");
    fs::write(
        &script,
        r#"{
            "title": "学外语",
            "dialogue": [
                {"character": "橘猫", "text": "你好。再见！", "duration": 2.0},
                {"character": "白猫", "text": "好的", "duration": 1.0}
            ]
        }"#,
    )
    .unwrap();

    cli()
        .arg("plan")
        .arg(&script)
        .assert()
        .success()
        .stdout(predicate::str::contains("01 橘猫 (2.00s)"))
        .stdout(predicate::str::contains("02 白猫 (1.00s)"));
}

#[test]
fn test_cli_parse_text_script() {
    let dir = TempDir::new().unwrap();
    let script = dir.path().join("剧本.txt");
    fs::write(&script, "【橘猫】你好呀！\n【白猫】今天学什么？\n").unwrap();

    cli()
        .arg("parse")
        .arg(&script)
        .args(["--title", "学外语"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"title\": \"学外语\""))
        .stdout(predicate::str::contains("\"video\": \"白猫说话.mp4\""))
        .stdout(predicate::str::contains("今天学什么？"))
        .stderr(predicate::str::contains("Title: 学外语"))
        .stderr(predicate::str::contains("Lines: 2"));
}

#[test]
fn test_cli_timeline_js() {
    let dir = TempDir::new().unwrap();
    let scenes = dir.path().join("scenes.json");
    let timestamps = dir.path().join("timestamps.json");
    fs::write(
        &scenes,
        r#"{"scenes": [
            {"id": "s1", "lines": [{"text": "表面是储蓄"}, {"text": "实际是负债"}]},
            {"id": "s2", "lines": [{"text": "每月还款"}], "counter": {"id": "counter1", "target": 5000}}
        ]}"#,
    )
    .unwrap();
    fs::write(
        &timestamps,
        r#"[{"start": 0.0, "duration": 3.0}, {"start": 3.5, "duration": 4.0}]"#,
    )
    .unwrap();

    cli()
        .arg("timeline")
        .arg(&scenes)
        .arg("--timestamps")
        .arg(&timestamps)
        .assert()
        .success()
        .stdout(predicate::str::contains("['s2',  3.50,  4.00, ["))
        .stdout(predicate::str::contains("'counter:5000'"))
        .stdout(predicate::str::contains("const TOTAL=7.50;"));

    cli()
        .arg("timeline")
        .arg(&scenes)
        .arg("--timestamps")
        .arg(&timestamps)
        .args(["--at", "3.2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"scene_id\": \"s1\""));
}

fn write_two_scenes(dir: &TempDir) -> std::path::PathBuf {
    let scenes = dir.path().join("scenes.json");
    fs::write(
        &scenes,
        r#"{"scenes": [
            {"id": "s1", "lines": [{"text": "表面是储蓄"}]},
            {"id": "s2", "lines": [{"text": "每月还款"}]}
        ]}"#,
    )
    .unwrap();
    scenes
}

#[test]
fn test_cli_timeline_audio_total_sets_total() {
    let dir = TempDir::new().unwrap();
    let scenes = write_two_scenes(&dir);
    let timestamps = dir.path().join("timestamps.json");
    fs::write(
        &timestamps,
        r#"[{"start": 0.0, "duration": 3.0}, {"start": 3.5, "duration": 4.0}]"#,
    )
    .unwrap();

    cli()
        .arg("timeline")
        .arg(&scenes)
        .arg("--timestamps")
        .arg(&timestamps)
        .args(["--audio-total", "40"])
        .assert()
        .success()
        .stdout(predicate::str::contains("['s2',  3.50,  4.00, ["))
        .stdout(predicate::str::contains("const TOTAL=40.00;"));
}

#[test]
fn test_cli_timeline_from_silences() {
    let dir = TempDir::new().unwrap();
    let scenes = write_two_scenes(&dir);
    let silences = dir.path().join("silences.json");
    fs::write(&silences, "[[2.8, 3.5], [7.0, 7.5]]").unwrap();

    cli()
        .arg("timeline")
        .arg(&scenes)
        .arg("--silences")
        .arg(&silences)
        .assert()
        .success()
        .stdout(predicate::str::contains("['s1',  0.00,  3.50, ["))
        .stdout(predicate::str::contains("['s2',  3.50,  4.00, ["))
        .stdout(predicate::str::contains("const TOTAL=7.50;"));
}

#[test]
fn test_cli_compose_without_script() {
    let dir = TempDir::new().unwrap();
    cli()
        .arg("compose")
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Script not found"));
}

#[test]
fn test_cli_config_output() {
    cli()
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("max_chars_per_row = 14"))
        .stdout(predicate::str::contains("[overlay]"));
}

#[test]
fn test_cli_config_env_override() {
    cli()
        .arg("config")
        .env("CAPTION_PLANNER_CAPTIONS__MAX_CHARS_PER_ROW", "18")
        .assert()
        .success()
        .stdout(predicate::str::contains("max_chars_per_row = 18"));
}
