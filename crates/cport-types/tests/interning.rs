use std::thread;

use cport_types::{Config, Field, TypeEnv, TypeId};

fn point(env: &TypeEnv) -> Vec<Field> {
    vec![
        Field::new("x", TypeId::INT32),
        Field::new("y", TypeId::INT32),
        Field::new("tag", env.ptr_t(Some(env.go().byte()))),
    ]
}

#[test]
fn independently_built_structs_share_identity() {
    let env = TypeEnv::new(Config::config64()).unwrap();
    let a = env.struct_t(point(&env));
    let b = env.struct_t(point(&env));
    assert_eq!(a, b);
    assert!(env.same(a, b));
}

#[test]
fn concurrent_interning_agrees_on_one_id() {
    let env = TypeEnv::new(Config::config64()).unwrap();
    let before = env.type_count();

    let ids: Vec<TypeId> = thread::scope(|s| {
        let handles: Vec<_> = (0..8)
            .map(|_| s.spawn(|| env.struct_t(point(&env))))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert!(ids.windows(2).all(|w| w[0] == w[1]));
    // `*byte` is registered with the builtins, so only the struct is new
    assert_eq!(env.type_count(), before + 1);
}

#[test]
fn environments_are_independent() {
    let (a, b) = thread::scope(|s| {
        let a = s.spawn(|| {
            let env = TypeEnv::new(Config::config32()).unwrap();
            let id = env.struct_t(point(&env));
            env.sizeof(id)
        });
        let b = s.spawn(|| {
            let env = TypeEnv::new(Config::config64()).unwrap();
            let id = env.struct_t(point(&env));
            env.sizeof(id)
        });
        (a.join().unwrap(), b.join().unwrap())
    });
    assert_eq!((a, b), (12, 16));
}
