use assert_cmd::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

fn repo_root() -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    manifest_dir
        .parent()
        .and_then(|p| p.parent())
        .expect("expected crates/<name> layout")
        .to_path_buf()
}

fn story_fixture(root: &Path) -> PathBuf {
    let fixture = root
        .join("fixtures")
        .join("stories")
        .join("day01-the-lost-kite.txt");
    assert!(fixture.exists(), "fixture missing: {}", fixture.display());
    fixture
}

#[test]
fn cli_renders_png_smoke() {
    let root = repo_root();
    let fixture = story_fixture(&root);
    let config = root.join("fixtures").join("posters").join("day01.yaml");

    let tmp = tempfile::tempdir().expect("tempdir");
    let out = tmp.path().join("out.png");

    let exe = assert_cmd::cargo_bin!("wordloom-cli");
    Command::new(exe)
        .current_dir(&root)
        .args([
            "render",
            "--offline",
            "--seed",
            "7",
            "--format",
            "png",
            "--config",
            config.to_string_lossy().as_ref(),
            "--out",
            out.to_string_lossy().as_ref(),
            fixture.to_string_lossy().as_ref(),
        ])
        .assert()
        .success();

    let file = fs::File::open(&out).expect("open png");
    let decoder = png::Decoder::new(file);
    let reader = decoder.read_info().expect("png header");
    let info = reader.info();
    assert_eq!((info.width, info.height), (1080, 1350));
}

#[test]
fn cli_renders_png_with_default_out_path_for_file_input() {
    let root = repo_root();
    let fixture = story_fixture(&root);

    let tmp = tempfile::tempdir().expect("tempdir");
    let tmp_fixture = tmp.path().join("story.txt");
    fs::copy(&fixture, &tmp_fixture).expect("copy fixture");

    let expected_out = tmp_fixture.with_extension("png");

    let exe = assert_cmd::cargo_bin!("wordloom-cli");
    Command::new(exe)
        .current_dir(&root)
        .args([
            "render",
            "--offline",
            "--format",
            "png",
            "--scale",
            "0.5",
            tmp_fixture.to_string_lossy().as_ref(),
        ])
        .assert()
        .success();

    let bytes = fs::read(&expected_out).expect("read png");
    assert!(
        bytes.starts_with(b"\x89PNG\r\n\x1a\n"),
        "output is not a PNG"
    );
}

#[test]
fn cli_renders_svg_to_stdout_with_overrides() {
    let root = repo_root();
    let fixture = story_fixture(&root);

    let exe = assert_cmd::cargo_bin!("wordloom-cli");
    let output = Command::new(exe)
        .current_dir(&root)
        .args([
            "render",
            "--offline",
            "--seed",
            "3",
            "--set",
            "title=Kite <Day>",
            "--set",
            "width=800",
            fixture.to_string_lossy().as_ref(),
        ])
        .output()
        .expect("run cli");
    assert!(output.status.success());

    let svg = String::from_utf8(output.stdout).expect("utf-8 svg");
    assert!(svg.starts_with("<svg "));
    assert!(svg.contains(r#"width="800""#));
    assert!(svg.contains("Kite &lt;Day&gt;"));
    assert!(svg.contains(">kite</text>"));
    assert!(!svg.contains("<image"), "offline render must not embed images");
}

#[test]
fn cli_words_reports_ranked_frequencies() {
    let exe = assert_cmd::cargo_bin!("wordloom-cli");
    let output = assert_cmd::Command::new(exe)
        .args(["words", "--limit", "2"])
        .write_stdin("The cat and the dog. The cat!")
        .output()
        .expect("run cli");
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(
        json,
        serde_json::json!({
            "total": 3,
            "distinct": 2,
            "words": [
                { "word": "cat", "count": 2 },
                { "word": "dog", "count": 1 }
            ]
        })
    );
}

#[test]
fn cli_words_total_ignores_the_limit() {
    let exe = assert_cmd::cargo_bin!("wordloom-cli");
    let output = assert_cmd::Command::new(exe)
        .args(["words", "--limit", "1"])
        .write_stdin("cat cat dog bird")
        .output()
        .expect("run cli");
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(json["total"], 4);
    assert_eq!(json["distinct"], 3);
    assert_eq!(json["words"], serde_json::json!([{ "word": "cat", "count": 2 }]));
}

#[test]
fn cli_layout_is_deterministic_for_a_seed() {
    let root = repo_root();
    let fixture = story_fixture(&root);

    let run = || {
        let exe = assert_cmd::cargo_bin!("wordloom-cli");
        let output = Command::new(exe)
            .args(["layout", "--seed", "11", fixture.to_string_lossy().as_ref()])
            .output()
            .expect("run cli");
        assert!(output.status.success());
        output.stdout
    };
    let first = run();
    assert_eq!(first, run());

    let json: serde_json::Value = serde_json::from_slice(&first).expect("json");
    assert_eq!(json["cloud"]["words"][0]["word"], "kite");
}

#[test]
fn cli_usage_errors_exit_with_code_2() {
    let exe = assert_cmd::cargo_bin!("wordloom-cli");
    Command::new(exe)
        .args(["render", "--format", "gif"])
        .assert()
        .code(2);
}

#[test]
fn cli_invalid_config_exits_with_code_1() {
    let exe = assert_cmd::cargo_bin!("wordloom-cli");
    assert_cmd::Command::new(exe)
        .args(["layout", "--set", "maxWords=0"])
        .write_stdin("kite kite")
        .assert()
        .code(1);
}
