use cport_types::{Config, Field, TypeEnv, TypeId};

use crate::expr::{Expr, PtrExpr};
use crate::literal::{IntLit, StringLit};
use crate::lower::Lower;

fn env() -> TypeEnv {
    TypeEnv::new(Config {
        int_size: 4,
        ..Config::config64()
    })
    .unwrap()
}

fn int_lit(text: &str) -> Expr {
    Expr::Int(IntLit::parse(text).unwrap())
}

#[test]
fn identity_is_a_no_op() {
    let env = env();
    let lower = Lower::new(&env);
    let s = env.struct_t(vec![Field::new("a", TypeId::INT32)]);
    for ty in [TypeId::INT32, TypeId::FLOAT64, TypeId::BOOL, s, env.c().string()] {
        let x = Expr::ident("x", ty);
        assert_eq!(lower.cast(ty, x.clone()), x, "{}", env.render(ty));
    }
    assert_eq!(lower.cast(TypeId::INT8, Expr::int(5)), Expr::int(5));
}

#[test]
fn repeated_conversion_collapses() {
    let env = env();
    let lower = Lower::new(&env);
    let once = Expr::convert(TypeId::INT64, Expr::ident("x", TypeId::INT32));
    let twice = lower.cast(TypeId::INT64, once.clone());
    assert_eq!(twice, once);
    insta::assert_snapshot!(twice.render(&env), @"int64(x)");
}

#[test]
fn constants_wrap_to_target_width() {
    let env = env();
    let lower = Lower::new(&env);

    let x = lower.cast(TypeId::INT32, int_lit("0x80000000"));
    assert_eq!(x.const_int().and_then(IntLit::to_i64), Some(-2147483648));
    insta::assert_snapshot!(x.render(&env), @"-0x80000000");

    let y = lower.cast(TypeId::UINT64, Expr::int(-1));
    assert_eq!(y.const_int().and_then(IntLit::to_u64), Some(u64::MAX));
    insta::assert_snapshot!(y.render(&env), @"18446744073709551615");

    let z = lower.cast(TypeId::UINT8, Expr::int(300));
    insta::assert_snapshot!(z.render(&env), @"44");
}

#[test]
fn odd_width_constant_is_converted() {
    let env = env();
    let lower = Lower::new(&env);
    let int24 = env.int_t(3);
    let x = Expr::Int(IntLit::from_u64(0x100_0000));
    assert_eq!(lower.cast(int24, x.clone()), Expr::convert(int24, x));
}

#[test]
fn sign_changes_go_through_target_width() {
    let env = env();
    let lower = Lower::new(&env);
    let cast = |to, from| lower.cast(to, Expr::ident("x", from)).render(&env);

    insta::assert_snapshot!(cast(TypeId::UINT32, TypeId::INT8), @"uint32(int32(x))");
    insta::assert_snapshot!(cast(TypeId::UINT8, TypeId::INT32), @"uint8(int8(x))");
    insta::assert_snapshot!(cast(TypeId::UINT32, TypeId::INT32), @"uint32(x)");
    insta::assert_snapshot!(cast(TypeId::INT64, TypeId::INT8), @"int64(x)");
    insta::assert_snapshot!(cast(TypeId::FLOAT32, TypeId::INT32), @"float32(x)");
}

#[test]
fn bool_conversions() {
    let env = env();
    let lower = Lower::new(&env);
    let n = Expr::ident("n", TypeId::INT32);
    let p = Expr::ident("p", env.ptr_t(Some(TypeId::INT32)));
    let b = Expr::ident("b", TypeId::BOOL);

    insta::assert_snapshot!(lower.cast(TypeId::BOOL, n).render(&env), @"n != 0");
    insta::assert_snapshot!(lower.cast(TypeId::BOOL, p).render(&env), @"p != nil");
    insta::assert_snapshot!(lower.cast(TypeId::BOOL, Expr::int(1)).render(&env), @"true");
    insta::assert_snapshot!(
        lower.cast(TypeId::INT32, b.clone()).render(&env),
        @"int32(libc.BoolToInt(b))"
    );
    insta::assert_snapshot!(
        lower.cast(TypeId::FLOAT64, b).render(&env),
        @"float64(libc.BoolToInt(b))"
    );
}

#[test]
fn pointer_targets() {
    let env = env();
    let lower = Lower::new(&env);
    let pint = env.ptr_t(Some(TypeId::INT32));

    let null = lower.cast(pint, Expr::int(0));
    assert_eq!(null, Expr::Ptr(Box::new(PtrExpr::Nil)));

    let addr = lower.cast(pint, Expr::ident("a", TypeId::UINT64));
    insta::assert_snapshot!(addr.render(&env), @"(*int32)(unsafe.Pointer(uintptr(a)))");

    let back = lower.cast(TypeId::UINT64, Expr::ident("p", pint));
    insta::assert_snapshot!(back.render(&env), @"uint64(uintptr(unsafe.Pointer(p)))");

    let bytes = lower.cast(env.c().string(), Expr::ident("p", pint));
    insta::assert_snapshot!(bytes.render(&env), @"(*byte)(unsafe.Pointer(p))");

    let raw = lower.cast(env.unsafe_ptr_t(), Expr::ident("p", pint));
    insta::assert_snapshot!(raw.render(&env), @"unsafe.Pointer(p)");

    let typed = lower.cast(pint, Expr::ident("v", env.unsafe_ptr_t()));
    insta::assert_snapshot!(typed.render(&env), @"(*int32)(v)");
}

#[test]
fn arrays_decay_and_erase_length() {
    let env = env();
    let lower = Lower::new(&env);
    let arr = Expr::ident("arr", env.array_t(TypeId::INT32, 4));
    let pint = env.ptr_t(Some(TypeId::INT32));

    insta::assert_snapshot!(lower.cast(pint, arr.clone()).render(&env), @"&arr[0]");
    insta::assert_snapshot!(
        lower.cast(env.slice_t(TypeId::INT32), arr).render(&env),
        @"arr[:]"
    );
    insta::assert_snapshot!(
        lower.cast(env.slice_t(TypeId::INT32), Expr::int(0)).render(&env),
        @"nil"
    );
}

#[test]
fn strings() {
    let env = env();
    let lower = Lower::new(&env);
    let go_string = env.go().string();

    let s = Expr::ident("s", env.c().string());
    insta::assert_snapshot!(lower.cast(go_string, s).render(&env), @"libc.GoString(s)");

    let w = Expr::ident("w", env.c().wstring());
    insta::assert_snapshot!(lower.cast(go_string, w).render(&env), @"libc.GoWString(w)");

    let hi = Expr::Str(StringLit::new("hi"));
    insta::assert_snapshot!(lower.cast(env.c().string(), hi.clone()).render(&env), @r#"libc.CString("hi")"#);
    insta::assert_snapshot!(
        lower.cast(env.c().wstring(), hi.clone()).render(&env),
        @r#"libc.CWString("hi")"#
    );
    insta::assert_snapshot!(
        lower.cast(env.array_t(env.go().byte(), 4), hi.clone()).render(&env),
        @r#"func(s string) (r [4]byte) { copy(r[:], s); return }("hi")"#
    );
    insta::assert_snapshot!(lower.cast(env.go().bytes(), hi).render(&env), @r#"[]byte("hi")"#);
}

#[test]
fn interface_boundaries() {
    let env = env();
    let lower = Lower::new(&env);
    let v = Expr::ident("v", env.go().iface());
    insta::assert_snapshot!(lower.cast(TypeId::INT32, v).render(&env), @"v.(int32)");

    let n = Expr::ident("n", TypeId::INT32);
    assert_eq!(lower.cast(env.go().iface(), n.clone()), n);
    assert_eq!(lower.cast(env.unknown_t(4), n.clone()), n);
}

#[test]
fn functions() {
    let env = env();
    let lower = Lower::new(&env);
    let fty = env.func_tt(Some(TypeId::INT32), &[]);
    let f = Expr::ident("f", fty);

    insta::assert_snapshot!(lower.cast(fty, Expr::int(0)).render(&env), @"nil");
    insta::assert_snapshot!(
        lower.cast(TypeId::UINT64, f.clone()).render(&env),
        @"uint64(libc.FuncAddr(f))"
    );
    insta::assert_snapshot!(
        lower.cast(env.unsafe_ptr_t(), f).render(&env),
        @"unsafe.Pointer(libc.FuncAddr(f))"
    );
    insta::assert_snapshot!(
        lower.cast(fty, Expr::ident("v", TypeId::UINT64)).render(&env),
        @"libc.AsFunc(v, (*func() int32)(nil)).(func() int32)"
    );
}

#[test]
fn functions_adapt_to_wider_signatures() {
    let env = env();
    let lower = Lower::new(&env);
    let f = Expr::ident("f", env.func_tt(Some(TypeId::INT32), &[TypeId::INT32]));

    let wider = env.func_tt(Some(TypeId::INT32), &[TypeId::INT32, TypeId::INT64]);
    let adapted = lower.cast(wider, f.clone());
    assert_eq!(adapted.ctype(&env), wider);
    insta::assert_snapshot!(
        adapted.render(&env),
        @"func(arg1 int32, arg2 int64) int32 { return f(arg1) }"
    );

    let void = env.func_t(None, vec![Field::new("x", TypeId::INT64)], false);
    insta::assert_snapshot!(
        lower.cast(void, f).render(&env),
        @"func(x int64) { f(int32(x)) }"
    );

    let g = Expr::ident("g", env.func_t(None, vec![], true));
    let more = env.func_t(None, vec![Field::unnamed(TypeId::INT32)], true);
    insta::assert_snapshot!(
        lower.cast(more, g).render(&env),
        @"func(arg1 int32, _rest ...interface{}) { g(_rest...) }"
    );
}

#[test]
fn incompatible_functions_are_converted() {
    let env = env();
    let lower = Lower::new(&env);
    let two = env.func_tt(Some(TypeId::INT32), &[TypeId::INT32, TypeId::INT32]);
    let f = Expr::ident("f", two);

    let fewer = env.func_tt(Some(TypeId::INT32), &[TypeId::INT32]);
    insta::assert_snapshot!(lower.cast(fewer, f).render(&env), @"(func(int32) int32)(f)");

    let h = Expr::ident("h", env.func_tt(None, &[]));
    let returning = env.func_tt(Some(TypeId::INT32), &[]);
    assert_eq!(
        lower.cast(returning, h.clone()),
        Expr::convert(returning, h)
    );
}

#[test]
fn floats_and_structs() {
    let env = env();
    let lower = Lower::new(&env);

    let one = lower.cast(TypeId::FLOAT64, Expr::int(1));
    assert!(env.kind(one.ctype(&env)).is_untyped_float());
    insta::assert_snapshot!(one.render(&env), @"1");

    let s = env.named_t("S", env.struct_t(vec![Field::new("a", TypeId::INT32)]));
    insta::assert_snapshot!(lower.cast(s, Expr::int(0)).render(&env), @"S{}");
}
