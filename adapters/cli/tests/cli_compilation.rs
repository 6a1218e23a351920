use std::process::Command;

#[test]
fn cli_compiles_without_warnings() {
    let status = Command::new(env!("CARGO"))
        .current_dir(env!("CARGO_MANIFEST_DIR"))
        .args(["check", "--quiet", "--bin", "canvas-snake"])
        .status()
        .expect("failed to invoke cargo check for canvas-snake CLI binary");

    assert!(status.success(), "cargo check --bin canvas-snake should succeed");
}

#[test]
fn headless_run_finishes_and_writes_no_score_without_eating() {
    let dir = std::env::temp_dir().join(format!("canvas-snake-cli-{}", std::process::id()));
    std::fs::create_dir_all(&dir).expect("temp dir is writable");
    let score_file = dir.join("high-score.toml");
    let _ = std::fs::remove_file(&score_file);

    let status = Command::new(env!("CARGO_BIN_EXE_canvas-snake"))
        .args(["--headless", "--frames", "5", "--frame-ms", "1", "--seed", "3"])
        .arg("--high-score-file")
        .arg(&score_file)
        .status()
        .expect("failed to launch canvas-snake");

    assert!(status.success(), "headless run should exit cleanly");
    assert!(!score_file.exists());
}
