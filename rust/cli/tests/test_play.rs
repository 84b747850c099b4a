use fivedraw_cli::run_with;
use std::io::Cursor;

fn no_env(_: &str) -> Option<String> {
    None
}

fn run_play(args: &[&str], input: &str) -> (i32, String, String) {
    let mut argv = vec!["fivedraw", "play"];
    argv.extend_from_slice(args);
    let mut out = Vec::new();
    let mut err = Vec::new();
    let code = run_with(&argv, &mut Cursor::new(input.to_string()), &mut out, &mut err, &no_env);
    (
        code,
        String::from_utf8(out).unwrap(),
        String::from_utf8(err).unwrap(),
    )
}

#[test]
fn quit_leaves_cleanly() {
    let (code, out, _) = run_play(&["--seed", "4"], "quit\n");
    assert_eq!(code, 0);
    assert!(out.contains("play: opponents=1 hands=1 seed=4"));
    assert!(out.contains("Quit."));
}

#[test]
fn end_of_input_counts_as_quit() {
    let (code, out, _) = run_play(&["--seed", "4", "--hands", "3"], "");
    assert_eq!(code, 0);
    assert!(out.contains("Quit."));
}

#[test]
fn illegal_actions_are_reprompted() {
    // nothing is owed on the first decision, so neither fold nor call is offered
    let (code, out, err) = run_play(&["--seed", "8"], "fold\ncall\nbet 100000\nq\n");
    assert_eq!(code, 0);
    assert!(err.contains("fold is not available"));
    assert!(err.contains("call is not available"));
    assert!(err.contains("bet amount must be between"));
    assert_eq!(out.matches("Enter action").count(), 4);
}

#[test]
fn several_opponents_and_hands() {
    let script = "check\ncall\n\n".repeat(60);
    let (code, out, err) = run_play(
        &[
            "--seed",
            "17",
            "--hands",
            "3",
            "--opponents",
            "R:random,H:heuristic",
            "--ante",
            "1",
        ],
        &script,
    );
    assert_eq!(code, 0, "stderr: {err}");
    assert!(out.contains("play: opponents=2 hands=3 seed=17"));
    assert!(out.contains("=== Hand 1 ==="));
    assert!(out.contains("Session complete"));
}

#[test]
fn unknown_opponent_kind_fails() {
    let (code, _, err) = run_play(&["--opponents", "X:oracle"], "");
    assert_eq!(code, 2);
    assert!(err.starts_with("Error: Invalid input"));
}
