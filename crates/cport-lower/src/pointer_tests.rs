use cport_types::{Config, Field, TypeEnv, TypeId};

use crate::expr::{Expr, PtrExpr};
use crate::lower::Lower;

fn env() -> TypeEnv {
    TypeEnv::new(Config {
        int_size: 4,
        ..Config::config64()
    })
    .unwrap()
}

fn ptr(env: &TypeEnv, name: &str, elem: TypeId) -> PtrExpr {
    PtrExpr::value(Expr::ident(name, env.ptr_t(Some(elem))))
}

#[test]
fn constant_index_precomputes_bytes() {
    let env = env();
    let lower = Lower::new(&env);
    let p = lower
        .ptr_offset(ptr(&env, "p", TypeId::INT64), Expr::int(3), false)
        .unwrap();
    assert!(matches!(p, PtrExpr::Offset { bytes: 24, .. }));
    insta::assert_snapshot!(
        p.render(&env),
        @"(*int64)(unsafe.Pointer(uintptr(unsafe.Pointer(p)) + 24))"
    );

    let back = lower
        .ptr_offset(ptr(&env, "p", TypeId::INT64), Expr::int(1), true)
        .unwrap();
    insta::assert_snapshot!(
        back.render(&env),
        @"(*int64)(unsafe.Pointer(uintptr(unsafe.Pointer(p)) - 8))"
    );
}

#[test]
fn variable_index_scales_at_run_time() {
    let env = env();
    let lower = Lower::new(&env);
    let i = || Expr::ident("i", TypeId::INT32);

    let fwd = lower
        .ptr_offset(ptr(&env, "p", TypeId::INT64), i(), false)
        .unwrap();
    insta::assert_snapshot!(
        fwd.render(&env),
        @"(*int64)(unsafe.Pointer(uintptr(unsafe.Pointer(p)) + 8*uintptr(i)))"
    );

    let bwd = lower
        .ptr_offset(ptr(&env, "p", TypeId::INT64), i(), true)
        .unwrap();
    insta::assert_snapshot!(
        bwd.render(&env),
        @"(*int64)(unsafe.Pointer(uintptr(unsafe.Pointer(p)) - 8*uintptr(i)))"
    );

    let bytes = lower
        .ptr_offset(ptr(&env, "q", TypeId::UINT8), i(), true)
        .unwrap();
    assert!(matches!(bytes, PtrExpr::VarOffset { mul: -1, .. }));
    insta::assert_snapshot!(
        bytes.render(&env),
        @"(*uint8)(unsafe.Pointer(uintptr(unsafe.Pointer(q)) - uintptr(i)))"
    );
}

#[test]
fn offsets_fold() {
    let env = env();
    let lower = Lower::new(&env);
    let p = ptr(&env, "p", TypeId::INT64);

    assert_eq!(lower.ptr_offset(p.clone(), Expr::int(0), false).unwrap(), p);

    let once = lower.ptr_offset(p.clone(), Expr::int(3), false).unwrap();
    let twice = lower.ptr_offset(once, Expr::int(1), false).unwrap();
    assert!(matches!(twice, PtrExpr::Offset { bytes: 32, .. }));

    let undone = lower.ptr_offset(twice, Expr::int(4), true).unwrap();
    assert_eq!(undone, p);
}

#[test]
fn opaque_and_aggregate_elements() {
    let env = env();
    let lower = Lower::new(&env);

    let v = PtrExpr::value(Expr::ident("v", env.unsafe_ptr_t()));
    let raw = lower.ptr_offset(v, Expr::int(16), false).unwrap();
    insta::assert_snapshot!(raw.render(&env), @"unsafe.Pointer(uintptr(v) + 16)");

    let s = env.named_t(
        "S",
        env.struct_t(vec![
            Field::new("a", TypeId::INT32),
            Field::new("b", TypeId::INT64),
        ]),
    );
    let fwd = lower.ptr_offset(ptr(&env, "s", s), Expr::int(2), false).unwrap();
    insta::assert_snapshot!(
        fwd.render(&env),
        @"(*S)(unsafe.Pointer(uintptr(unsafe.Pointer(s)) + unsafe.Sizeof(S{})*uintptr(2)))"
    );
    let bwd = lower.ptr_offset(ptr(&env, "s", s), Expr::int(2), true).unwrap();
    insta::assert_snapshot!(
        bwd.render(&env),
        @"(*S)(unsafe.Pointer(uintptr(unsafe.Pointer(s)) - unsafe.Sizeof(S{})*uintptr(2)))"
    );
}

#[test]
fn huge_constant_offset_is_an_error() {
    let env = env();
    let lower = Lower::new(&env);
    let err = lower
        .ptr_offset(
            ptr(&env, "p", TypeId::INT64),
            Expr::Int(crate::literal::IntLit::from_u64(u64::MAX)),
            false,
        )
        .unwrap_err();
    insta::assert_snapshot!(
        err.to_string(),
        @"literal `18446744073709551615 * 8` does not fit in 64 bits"
    );
}

#[test]
fn conversions_retype_offsets() {
    let env = env();
    let lower = Lower::new(&env);
    let off = lower
        .ptr_offset(ptr(&env, "p", TypeId::INT64), Expr::int(3), false)
        .unwrap();
    let bytes = lower.ptr_to_ptr(env.c().string(), off);
    insta::assert_snapshot!(
        bytes.render(&env),
        @"(*byte)(unsafe.Pointer(uintptr(unsafe.Pointer(p)) + 24))"
    );

    let pint = env.ptr_t(Some(TypeId::INT32));
    let twice = lower.ptr_to_ptr(
        pint,
        lower.ptr_to_ptr(env.c().string(), ptr(&env, "p", TypeId::INT64)),
    );
    insta::assert_snapshot!(twice.render(&env), @"(*int32)(unsafe.Pointer(p))");
}

fn records(env: &TypeEnv) -> (TypeId, TypeId, TypeId) {
    let base = env.named_t("Base", env.struct_t(vec![Field::new("x", TypeId::INT32)]));
    let derived = env.named_t(
        "Derived",
        env.struct_t(vec![
            Field::new("base", base),
            Field::new("y", TypeId::INT32),
        ]),
    );
    let other = env.named_t("Other", env.struct_t(vec![Field::new("z", TypeId::INT64)]));
    (base, derived, other)
}

#[test]
fn first_field_aliasing() {
    let env = env();
    let lower = Lower::new(&env);
    let (base, derived, other) = records(&env);
    let d = || Expr::ident("d", env.ptr_t(Some(derived)));

    let up = lower.cast(env.ptr_t(Some(base)), d());
    insta::assert_snapshot!(up.render(&env), @"&d.base");
    assert_eq!(up.ctype(&env), env.ptr_t(Some(base)));

    let unrelated = lower.cast(env.ptr_t(Some(other)), d());
    insta::assert_snapshot!(unrelated.render(&env), @"(*Other)(unsafe.Pointer(d))");
}

#[test]
fn first_field_aliasing_can_be_disabled() {
    let env = TypeEnv::new(Config {
        first_field_aliasing: false,
        ..Config::config64()
    })
    .unwrap();
    let lower = Lower::new(&env);
    let (base, derived, _) = records(&env);
    let d = Expr::ident("d", env.ptr_t(Some(derived)));
    insta::assert_snapshot!(
        lower.cast(env.ptr_t(Some(base)), d).render(&env),
        @"(*Base)(unsafe.Pointer(d))"
    );
}

#[test]
fn addr_and_deref() {
    let env = env();
    let lower = Lower::new(&env);
    let x = Expr::ident("x", TypeId::INT32);

    let p = lower.addr(x.clone());
    insta::assert_snapshot!(p.render(&env), @"&x");
    assert_eq!(lower.deref(p), x);

    let q = ptr(&env, "q", TypeId::INT32);
    let star = lower.deref(q.clone());
    insta::assert_snapshot!(star.render(&env), @"*q");
    assert_eq!(lower.addr(star), q);

    let v = PtrExpr::value(Expr::ident("v", env.unsafe_ptr_t()));
    let byte = lower.deref(v);
    assert_eq!(byte.ctype(&env), env.go().byte());
    insta::assert_snapshot!(byte.render(&env), @"*(*byte)(v)");
}

#[test]
fn integer_addresses() {
    let env = env();
    let lower = Lower::new(&env);
    let pint = env.ptr_t(Some(TypeId::INT32));

    assert_eq!(lower.int_to_ptr(pint, Expr::int(0)), PtrExpr::Nil);
    insta::assert_snapshot!(
        lower.int_to_ptr(pint, Expr::int(-1)).render(&env),
        @"(*int32)(unsafe.Pointer(uintptr(18446744073709551615)))"
    );

    let a = Expr::ident("a", TypeId::UINT64);
    let round = lower.ptr_to_int(TypeId::UINT64, lower.int_to_ptr(pint, a.clone()));
    assert_eq!(round, a);

    let diff = lower.ptr_diff(ptr(&env, "p", TypeId::INT32), ptr(&env, "q", TypeId::INT32));
    assert_eq!(diff.ctype(&env), TypeId::INT64);
    insta::assert_snapshot!(
        diff.render(&env),
        @"int64(uintptr(unsafe.Pointer(p)) - uintptr(unsafe.Pointer(q)))"
    );
}
