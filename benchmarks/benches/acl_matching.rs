use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use peerguard_core::acl::parse;
use peerguard_core::AccessController;

/// `count` deny rules for 10.x.y.0/24 followed by one allow for 192.168.0.0/16
fn controller_with(count: usize) -> AccessController {
    let acl = AccessController::new();
    for i in 0..count {
        acl.add_deny(&format!("10.{}.{}.0/24", (i >> 8) & 0xFF, i & 0xFF)).unwrap();
    }
    acl.add_allow("192.168.0.0/16").unwrap();
    acl
}

fn benchmark_first_match(c: &mut Criterion) {
    let mut group = c.benchmark_group("first_match");
    group.throughput(Throughput::Elements(1));

    for rule_count in [0usize, 16, 256, 4096] {
        let acl = controller_with(rule_count);

        // Hit on the very first rule (or the only allow rule)
        group.bench_with_input(BenchmarkId::new("hit_first", rule_count), &acl, |b, acl| {
            b.iter(|| acl.is_allowed(black_box([10, 0, 0, 7])))
        });

        // Walks every deny rule before reaching the trailing allow
        group.bench_with_input(BenchmarkId::new("hit_last", rule_count), &acl, |b, acl| {
            b.iter(|| acl.is_allowed(black_box([192, 168, 3, 4])))
        });

        // Walks every rule and falls back to the default
        group.bench_with_input(BenchmarkId::new("miss", rule_count), &acl, |b, acl| {
            b.iter(|| acl.is_allowed(black_box([172, 16, 0, 1])))
        });
    }

    group.finish();
}

fn benchmark_family_skip(c: &mut Criterion) {
    let acl = controller_with(1024);
    let mut v6 = [0u8; 16];
    v6[..4].copy_from_slice(&[0x20, 0x01, 0x0d, 0xb8]);

    // IPv4 rules reject a 16-byte address on length alone
    c.bench_function("family_skip_1024", |b| b.iter(|| acl.is_allowed(black_box(v6))));
}

fn benchmark_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");
    let patterns = [
        ("exact_v4", "192.168.1.5"),
        ("wildcard_v4", "192.168.*.*"),
        ("slash_v4", "192.168.1.0/24"),
        ("exact_v6", "2001:db8:0:0:0:0:0:1"),
        ("wildcard_v6", "2001:db8:*:*:*:*:*:*"),
        ("slash_v6", "2001:db8:0:0:0:0:0:0/32"),
        ("invalid", "not.an.address"),
    ];

    for (name, pattern) in patterns {
        group.bench_with_input(BenchmarkId::from_parameter(name), pattern, |b, pattern| {
            b.iter(|| parse(black_box(pattern)).is_ok())
        });
    }

    group.finish();
}

fn benchmark_append(c: &mut Criterion) {
    let mut group = c.benchmark_group("append");

    for existing in [16usize, 256, 4096] {
        group.bench_with_input(BenchmarkId::new("copy_on_write", existing), &existing, |b, &existing| {
            b.iter_batched(
                || controller_with(existing),
                |acl| {
                    acl.add_allow("172.16.0.0/12").unwrap();
                    acl
                },
                criterion::BatchSize::LargeInput,
            )
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_first_match,
    benchmark_family_skip,
    benchmark_parse,
    benchmark_append
);
criterion_main!(benches);
