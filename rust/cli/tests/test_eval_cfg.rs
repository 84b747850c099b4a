use fivedraw_cli::run_with;
use std::collections::HashMap;
use std::fs;
use std::io::Cursor;

fn run_env(args: &[&str], vars: &[(&str, &str)]) -> (i32, String, String) {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    let env = move |k: &str| vars.get(k).cloned();
    let mut out = Vec::new();
    let mut err = Vec::new();
    let code = run_with(args, &mut Cursor::new(""), &mut out, &mut err, &env);
    (
        code,
        String::from_utf8(out).unwrap(),
        String::from_utf8(err).unwrap(),
    )
}

#[test]
fn eval_reports_category_and_winner() {
    let (code, out, _) = run_env(
        &["fivedraw", "eval", "--cards", "4C 4D JH JS 9C", "--against", "KH KD 2C 3S 7D"],
        &[],
    );
    assert_eq!(code, 0);
    assert!(out.contains("Rank: Two Pair (11 4 9)"));
    assert!(out.contains("Rank: One Pair"));
    assert!(out.contains("Result: first hand wins"));
}

#[test]
fn eval_wheel_is_five_high() {
    let (code, out, _) = run_env(&["fivedraw", "eval", "--cards", "AS 2D 3C 4H 5S"], &[]);
    assert_eq!(code, 0);
    assert!(out.contains("Rank: Straight (5)"));
}

#[test]
fn eval_rejects_a_hand_with_repeated_cards() {
    let (code, out, err) = run_env(&["fivedraw", "eval", "--cards", "AS AS AS AS AS"], &[]);
    assert_eq!(code, 2);
    assert!(!out.contains("Rank:"));
    assert!(err.contains("AS appears more than once"), "stderr: {err}");
}

#[test]
fn cfg_reads_file_named_by_environment() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fivedraw.toml");
    fs::write(&path, "agents = \"A:random,B:random,C:heuristic\"\nlog_format = \"csv\"\n").unwrap();
    let (code, out, err) = run_env(
        &["fivedraw", "cfg"],
        &[("FIVEDRAW_CONFIG", path.to_str().unwrap()), ("FIVEDRAW_SEED", "99")],
    );
    assert_eq!(code, 0, "stderr: {err}");
    let json: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(json["agents"]["source"], "file");
    assert_eq!(json["log_format"]["value"], "csv");
    assert_eq!(json["seed"]["value"], 99);
    assert_eq!(json["seed"]["source"], "env");
}

#[test]
fn cfg_rejects_unknown_keys() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fivedraw.toml");
    fs::write(&path, "blinds = 3\n").unwrap();
    let (code, _, err) = run_env(&["fivedraw", "cfg", "--config", path.to_str().unwrap()], &[]);
    assert_eq!(code, 2);
    assert!(err.contains("Error:"));
}

#[test]
fn sim_flags_override_environment() {
    let (code, out, err) = run_env(
        &["fivedraw", "sim", "--games", "2", "--seed", "5"],
        &[("FIVEDRAW_SEED", "6")],
    );
    assert_eq!(code, 0, "stderr: {err}");
    assert!(out.contains("Seed: 5"));
}
