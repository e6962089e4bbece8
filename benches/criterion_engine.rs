#![cfg(all(feature = "criterion-bench", feature = "memory-store"))]

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use faculty_access::{
    ClassifierRules, EngineBuilder, MemoryStore, Permission, PermissionAction, Principal,
    PrincipalId, RoleCatalog, RoleDefinition, RoleId, SystemModule, TabId,
};
use futures::executor::block_on;
use std::hint::black_box;

fn principal(role: &str, email: &str) -> Principal {
    Principal::new(
        PrincipalId::try_from("principal_bench").unwrap(),
        "Bench",
        email,
        RoleId::try_from(role).unwrap(),
    )
}

fn setup_fanout_store(role_count: usize) -> (MemoryStore, Principal) {
    let store = MemoryStore::new();
    let mut principal = principal("role_0", "bench@x.edu");

    for i in 0..role_count {
        let role = RoleId::try_from(format!("role_{i}").as_str()).unwrap();
        let permission = if i + 1 == role_count {
            Permission::try_from("planning:approve:assignments").unwrap()
        } else {
            Permission::try_from("statistics:read:dashboard").unwrap()
        };
        store.put_role(RoleDefinition::new(role.clone(), format!("Role {i}")).grant(permission));
        principal = principal.with_role(role);
    }

    (store, principal)
}

fn bench_decide(c: &mut Criterion) {
    let mut group = c.benchmark_group("decide_faculty");
    group.sample_size(30);
    group.throughput(Throughput::Elements(1));

    let engine = EngineBuilder::new(RoleCatalog::faculty().unwrap())
        .rules(ClassifierRules::faculty())
        .build();
    let absences = TabId::try_from("absences").unwrap();
    let cases = [
        ("super_admin", principal("super_admin", "root@x.edu"), SystemModule::Statistics),
        ("administrative_bypass", principal("teacher", "admin.assist@x.edu"), SystemModule::Hr),
        ("role_grant", principal("dept_head", "head@x.edu"), SystemModule::Hr),
        ("default_deny", principal("teacher", "a.b@x.edu"), SystemModule::Hr),
        ("unknown_role", principal("janitor", "j@x.edu"), SystemModule::Hr),
    ];

    for (name, principal, module) in &cases {
        group.bench_function(*name, |b| {
            b.iter(|| {
                let decision = engine.decide(
                    black_box(principal),
                    *module,
                    PermissionAction::Read,
                    Some(&absences),
                );
                black_box(decision);
            });
        });
    }

    group.finish();
}

fn bench_role_fanout(c: &mut Criterion) {
    let mut group = c.benchmark_group("decide_role_fanout");
    group.sample_size(30);
    group.throughput(Throughput::Elements(1));

    for role_count in [1usize, 8, 32, 128] {
        let (store, principal) = setup_fanout_store(role_count);
        let engine = block_on(EngineBuilder::from_store(&store, ClassifierRules::strict()))
            .unwrap()
            .build();
        let tab = TabId::try_from("assignments").unwrap();

        let id = BenchmarkId::from_parameter(role_count);
        group.bench_with_input(id, &role_count, |b, _| {
            b.iter(|| {
                let decision = engine.decide(
                    &principal,
                    SystemModule::Planning,
                    PermissionAction::Approve,
                    Some(&tab),
                );
                black_box(decision);
            });
        });
    }

    group.finish();
}

fn bench_navigation(c: &mut Criterion) {
    let mut group = c.benchmark_group("accessible_modules");
    group.sample_size(30);
    group.throughput(Throughput::Elements(1));

    let engine = EngineBuilder::new(RoleCatalog::faculty().unwrap()).build();
    for role in ["super_admin", "dean", "dept_head", "teacher"] {
        let principal = principal(role, "nav@x.edu");
        group.bench_with_input(BenchmarkId::from_parameter(role), &principal, |b, principal| {
            b.iter(|| black_box(engine.accessible_modules(principal)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_decide, bench_role_fanout, bench_navigation);
criterion_main!(benches);
