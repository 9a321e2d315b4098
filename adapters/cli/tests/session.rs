use std::{env, fs, process::Command};

fn mapgame() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_mapgame"));
    let _ = command.env("RUST_LOG", "off");
    command
}

#[test]
fn session_prints_board_and_census() {
    let output = mapgame()
        .args(["--size", "6", "--seed", "3", "--enemies", "2", "--turns", "4"])
        .output()
        .expect("failed to run mapgame");
    assert!(output.status.success(), "mapgame should exit cleanly");

    let stdout = String::from_utf8(output.stdout).expect("utf-8 output");
    let lines: Vec<&str> = stdout.lines().collect();
    assert!(lines.len() >= 6 + 1 + 4, "unexpected output:\n{stdout}");
    assert!(lines[..6].iter().all(|row| row.starts_with("[#]") && row.ends_with("[#]")));
    assert_eq!(lines[6].split_whitespace().next(), Some("4"));
    assert!(lines.contains(&"Player: 1"));
    assert!(lines.iter().any(|line| line.starts_with("Obstacle: ")));
}

#[test]
fn identical_seeds_replay_identical_sessions() {
    let run = || {
        mapgame()
            .args(["--size", "7", "--seed", "11", "--turns", "10"])
            .output()
            .expect("failed to run mapgame")
            .stdout
    };
    assert_eq!(run(), run());
}

#[test]
fn config_file_values_apply_and_flags_win() {
    let path = env::temp_dir().join(format!("mapgame-session-{}.toml", std::process::id()));
    fs::write(&path, "size = 5\nenemies = 1\nturns = 2\n").expect("write config");

    let output = mapgame()
        .arg("--config")
        .arg(&path)
        .args(["--turns", "3"])
        .output()
        .expect("failed to run mapgame");
    fs::remove_file(&path).expect("remove config");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("utf-8 output");
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines[0], "[#] [#] [#] [#] [#]");
    assert!(lines[5].starts_with("3 turns played"));
}

#[test]
fn zero_sized_board_fails() {
    let output = mapgame()
        .args(["--size", "0"])
        .output()
        .expect("failed to run mapgame");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("non-empty square grid"), "stderr: {stderr}");
}
