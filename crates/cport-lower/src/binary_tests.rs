use cport_types::{Config, TypeEnv, TypeId};

use crate::error::{Error, LiteralError};
use crate::expr::{BinaryOp, Expr, UnaryOp};
use crate::literal::IntLit;
use crate::lower::Lower;

fn env() -> TypeEnv {
    TypeEnv::new(Config {
        int_size: 4,
        ..Config::config64()
    })
    .unwrap()
}

#[test]
fn arithmetic_uses_common_type() {
    let env = env();
    let lower = Lower::new(&env);
    let n = || Expr::ident("n", TypeId::INT32);
    let bin = |x, op, y| lower.binary(x, op, y).unwrap();

    let sum = bin(Expr::int(1), BinaryOp::Add, n());
    insta::assert_snapshot!(sum.render(&env), @"n + 1");
    assert_eq!(sum.ctype(&env), TypeId::INT32);

    let narrow = bin(
        Expr::ident("c", TypeId::INT8),
        BinaryOp::Add,
        Expr::ident("d", TypeId::INT8),
    );
    insta::assert_snapshot!(narrow.render(&env), @"int32(c) + int32(d)");
    assert_eq!(narrow.ctype(&env), TypeId::INT32);

    let small = bin(Expr::ident("c", TypeId::INT8), BinaryOp::Add, Expr::int(1));
    insta::assert_snapshot!(small.render(&env), @"c + 1");
    assert_eq!(small.ctype(&env), TypeId::INT8);

    let mixed = bin(Expr::ident("u", TypeId::UINT32), BinaryOp::Add, n());
    insta::assert_snapshot!(mixed.render(&env), @"u + uint32(n)");

    let float = bin(Expr::ident("x", TypeId::FLOAT64), BinaryOp::Mul, Expr::int(2));
    insta::assert_snapshot!(float.render(&env), @"x * 2");

    let neg = bin(n(), BinaryOp::Sub, Expr::int(-1));
    insta::assert_snapshot!(neg.render(&env), @"n - (-1)");

    let nested = bin(sum, BinaryOp::Mul, n());
    insta::assert_snapshot!(nested.render(&env), @"(n + 1) * n");
}

#[test]
fn shifts_keep_the_left_type() {
    let env = env();
    let lower = Lower::new(&env);
    let shl = lower
        .binary(Expr::ident("c", TypeId::INT8), BinaryOp::Shl, Expr::int(2))
        .unwrap();
    insta::assert_snapshot!(shl.render(&env), @"int32(c) << 2");

    let shr = lower
        .binary(
            Expr::ident("n", TypeId::INT64),
            BinaryOp::Shr,
            Expr::ident("s", TypeId::UINT8),
        )
        .unwrap();
    insta::assert_snapshot!(shr.render(&env), @"n >> s");
    assert_eq!(shr.ctype(&env), TypeId::INT64);
}

#[test]
fn pointer_arithmetic() {
    let env = env();
    let lower = Lower::new(&env);
    let p = || Expr::ident("p", env.ptr_t(Some(TypeId::INT64)));
    let i = || Expr::ident("i", TypeId::INT32);
    let bin = |x, op, y| lower.binary(x, op, y).unwrap().render(&env);

    insta::assert_snapshot!(
        bin(p(), BinaryOp::Add, Expr::int(3)),
        @"(*int64)(unsafe.Pointer(uintptr(unsafe.Pointer(p)) + 24))"
    );
    insta::assert_snapshot!(
        bin(Expr::int(3), BinaryOp::Add, p()),
        @"(*int64)(unsafe.Pointer(uintptr(unsafe.Pointer(p)) + 24))"
    );
    insta::assert_snapshot!(
        bin(i(), BinaryOp::Add, p()),
        @"(*int64)(unsafe.Pointer(uintptr(unsafe.Pointer(p)) + 8*uintptr(i)))"
    );
    insta::assert_snapshot!(
        bin(p(), BinaryOp::Sub, Expr::int(1)),
        @"(*int64)(unsafe.Pointer(uintptr(unsafe.Pointer(p)) - 8))"
    );
    insta::assert_snapshot!(
        bin(p(), BinaryOp::Sub, Expr::ident("q", env.ptr_t(Some(TypeId::INT64)))),
        @"int64(uintptr(unsafe.Pointer(p)) - uintptr(unsafe.Pointer(q)))"
    );
}

#[test]
fn array_indexing_folds() {
    let env = env();
    let lower = Lower::new(&env);
    let arr = Expr::ident("arr", env.array_t(TypeId::INT32, 4));
    let i = Expr::ident("i", TypeId::INT32);

    let elem = lower.binary(arr, BinaryOp::Add, i).unwrap();
    insta::assert_snapshot!(elem.render(&env), @"&arr[i]");
    assert_eq!(elem.ctype(&env), env.ptr_t(Some(TypeId::INT32)));

    let next = lower.binary(elem, BinaryOp::Add, Expr::int(1)).unwrap();
    insta::assert_snapshot!(next.render(&env), @"&arr[i + 1]");
}

#[test]
fn function_operands_become_addresses() {
    let env = env();
    let lower = Lower::new(&env);
    let f = Expr::ident("f", env.func_tt(None, &[]));
    let moved = lower.binary(f, BinaryOp::Add, Expr::int(1)).unwrap();
    insta::assert_snapshot!(
        moved.render(&env),
        @"unsafe.Pointer(uintptr(unsafe.Pointer(libc.FuncAddr(f))) + 1)"
    );
}

#[test]
fn unary_folds_constants() {
    let env = env();
    let lower = Lower::new(&env);
    insta::assert_snapshot!(lower.unary(UnaryOp::Minus, Expr::int(5)).unwrap().render(&env), @"-5");
    insta::assert_snapshot!(
        lower.unary(UnaryOp::BitNot, Expr::ident("n", TypeId::INT32)).unwrap().render(&env),
        @"^n"
    );
    let err = lower
        .unary(UnaryOp::Minus, Expr::Int(IntLit::from_u64(u64::MAX)))
        .unwrap_err();
    assert_eq!(
        err,
        Error::Literal {
            source: LiteralError::CannotNegate(u64::MAX),
            pos: None,
        }
    );
}
