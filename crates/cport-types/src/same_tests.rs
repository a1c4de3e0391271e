use crate::same::same_int;
use crate::{Config, Field, IntType, TypeEnv, TypeId};

fn env() -> TypeEnv {
    TypeEnv::new(Config::config64()).unwrap()
}

#[test]
fn same_int_table() {
    let u = |t: IntType| t.as_untyped();
    let cases = [
        ("same i8", IntType::signed(1), IntType::signed(1), true),
        ("same i64", IntType::signed(8), IntType::signed(8), true),
        ("same u8", IntType::unsigned(1), IntType::unsigned(1), true),
        ("same u64", IntType::unsigned(8), IntType::unsigned(8), true),
        ("i8 vs u8", IntType::signed(1), IntType::unsigned(1), false),
        ("i8 vs i16", IntType::signed(1), IntType::signed(2), false),
        ("u8 vs u16", IntType::unsigned(1), IntType::unsigned(2), false),
        ("untyped u8 vs u8", u(IntType::unsigned(1)), IntType::unsigned(1), true),
        ("untyped u64 vs u64", u(IntType::unsigned(8)), IntType::unsigned(8), true),
        ("untyped i8 vs i8", u(IntType::signed(1)), IntType::signed(1), true),
        ("untyped i64 vs i64", u(IntType::signed(8)), IntType::signed(8), true),
        ("untyped u8 vs i8", u(IntType::unsigned(1)), IntType::signed(1), false),
        ("untyped i8 vs u8", u(IntType::signed(1)), IntType::unsigned(1), false),
        ("untyped i8 vs i16", u(IntType::signed(1)), IntType::signed(2), true),
        ("untyped u8 vs u16", u(IntType::unsigned(1)), IntType::unsigned(2), true),
        ("untyped i16 vs i8", u(IntType::signed(2)), IntType::signed(1), false),
        ("untyped u16 vs u8", u(IntType::unsigned(2)), IntType::unsigned(1), false),
    ];
    for (name, x, y, expected) in cases {
        assert_eq!(same_int(x, y), expected, "{name}");
        assert_eq!(same_int(y, x), expected, "{name} (swapped)");
    }
}

#[test]
fn unknown_equals_nothing() {
    let env = env();
    let unk = env.unknown_t(4);
    assert!(!env.same(unk, unk));
    assert!(!env.same(unk, TypeId::INT32));
}

#[test]
fn named_by_identity() {
    let env = env();
    let a = env.named_t("A", TypeId::INT32);
    let b = env.named_t("B", TypeId::INT32);
    assert!(env.same(a, a));
    assert!(!env.same(a, b));
    assert!(!env.same(a, TypeId::INT32));
    // builtin string is a named placeholder; it is still equal to itself
    let s = env.go().string();
    assert!(env.same(s, s));
}

#[test]
fn pointers_compare_pointees() {
    let env = env();
    let p1 = env.ptr_t(Some(TypeId::INT32));
    let p2 = env.ptr_t(Some(TypeId::INT32));
    let q = env.ptr_t(Some(TypeId::UINT32));
    assert_eq!(p1, p2);
    assert!(env.same(p1, p2));
    assert!(!env.same(p1, q));
    assert!(!env.same(p1, env.unsafe_ptr_t()));
    assert!(env.same(env.unsafe_ptr_t(), env.nil_t()));

    let named = env.named_t("intp", p1);
    assert!(env.same(named, p1));
}

#[test]
fn arrays_and_funcs() {
    let env = env();
    assert!(env.same(env.array_t(TypeId::INT8, 4), env.array_t(TypeId::INT8, 4)));
    assert!(!env.same(env.array_t(TypeId::INT8, 4), env.array_t(TypeId::INT8, 5)));
    assert!(!env.same(env.array_t(TypeId::INT8, 0), env.slice_t(TypeId::INT8)));

    let f = env.func_t(
        Some(TypeId::INT32),
        vec![Field::new("a", TypeId::INT32)],
        false,
    );
    let g = env.func_tt(Some(TypeId::INT32), &[TypeId::INT32]);
    assert_ne!(f, g);
    assert!(env.same(f, g));
    assert!(!env.same(f, env.func_tt(None, &[TypeId::INT32])));
    assert!(env.same_opt(None, None));
    assert!(!env.same_opt(Some(TypeId::INT32), None));
}
