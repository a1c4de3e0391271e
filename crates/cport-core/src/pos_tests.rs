use super::*;

#[test]
fn display_full() {
    let pos = SourcePos::new("main.c", 12, 5);
    insta::assert_snapshot!(pos, @"main.c:12:5");
}

#[test]
fn display_partial() {
    assert_eq!(SourcePos::new("main.c", 3, 0).to_string(), "main.c:3");
    assert_eq!(SourcePos::new("main.c", 0, 0).to_string(), "main.c");
    assert!(!SourcePos::default().is_known());
}

#[test]
fn serde_round_trip() {
    let pos = SourcePos::new("lib/x.h", 1, 2);
    let json = serde_json::to_string(&pos).unwrap();
    assert_eq!(json, r#"{"file":"lib/x.h","line":1,"col":2}"#);
    let back: SourcePos = serde_json::from_str(&json).unwrap();
    assert_eq!(back, pos);
}
