use super::kind::Kind;

#[test]
fn is_is_subset() {
    let k = Kind::INT | Kind::SIGNED;
    assert!(k.is(Kind::INT));
    assert!(k.is(Kind::SIGNED));
    assert!(k.is(Kind::INT | Kind::SIGNED));
    assert!(!k.is(Kind::UNSIGNED));
    assert!(!k.is(Kind::UNTYPED_INT));
}

#[test]
fn unknown_only_matches_unknown() {
    assert!(Kind::UNKNOWN.is(Kind::UNKNOWN));
    assert!(!Kind::INT.is(Kind::UNKNOWN));
    assert!(!Kind::UNKNOWN.is(Kind::INT));
    assert!(Kind::UNKNOWN.is_unknown());
}

#[test]
fn derived_combinations() {
    assert!(Kind::NIL.is_ptr());
    assert!(Kind::NIL.is_untyped());
    assert!(Kind::NIL.is_nil());
    assert!(!Kind::PTR.is_nil());
    assert!(Kind::UNSAFE_PTR.is_ptr());
    assert!(!Kind::PTR.is_unsafe_ptr());
    assert!((Kind::UNTYPED_INT | Kind::UNSIGNED).is_untyped_int());
    assert!(Kind::FUNC.is_ref());
    assert!(Kind::PTR.is_ref());
    assert!(!Kind::INT.is_ref());
}

#[test]
fn major_drops_qualifiers() {
    assert_eq!((Kind::UNTYPED_INT | Kind::SIGNED).major(), Kind::INT);
    assert_eq!(Kind::UNSAFE_PTR.major(), Kind::PTR);
    assert_eq!(Kind::NIL.major(), Kind::PTR);
    assert_eq!(Kind::UNTYPED_FLOAT.major(), Kind::FLOAT);
    assert_eq!(Kind::UNKNOWN.major(), Kind::UNKNOWN);
}

#[test]
fn display() {
    assert_eq!(Kind::UNKNOWN.to_string(), "Unknown");
    assert_eq!(Kind::NIL.to_string(), "Nil");
    assert_eq!((Kind::INT | Kind::SIGNED).to_string(), "Signed|Int");
    assert_eq!(
        (Kind::UNTYPED_INT | Kind::UNSIGNED).to_string(),
        "UntypedInt|Unsigned"
    );
    assert_eq!(Kind::UNSAFE_PTR.to_string(), "UnsafePtr");
    assert_eq!((Kind::ARRAY).to_string(), "Array");
}
