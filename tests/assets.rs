const BOARD_JS: &str = include_str!("../assets/board.js");

#[test]
fn board_script_guards_every_fetch() {
    let fetches: Vec<usize> = BOARD_JS.match_indices("await fetch(").map(|(i, _)| i).collect();
    assert_eq!(fetches.len(), 2);
    for at in fetches {
        let before = &BOARD_JS[..at];
        let try_at = before.rfind("try {").expect("fetch outside a try block");
        assert!(!before[try_at..].contains('}'), "try block closed before fetch");
        assert!(BOARD_JS[at..].contains("} catch (_) {\n            showError(networkError);"));
    }
}

#[test]
fn board_script_reports_network_errors() {
    assert!(BOARD_JS.contains("\"Network error. Please check your connection.\""));
}
