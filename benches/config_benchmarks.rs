use criterion::{criterion_group, criterion_main, Criterion};
use dna_portal::config::{Config, RuleConfig};
use dna_portal::RouteTable;
use std::hint::black_box;

const ACCESS_CONFIG: &str = r#"
[access]
home = "/"
matching = "segment"
fallback = ["guest"]

[[access.rules]]
prefix = "/"
exact = true
roles = ["guest", "customer", "staff", "manager", "admin"]

[[access.rules]]
prefix = "/booking"
roles = ["customer"]

[[access.rules]]
prefix = "/staff"
roles = ["staff", "manager"]

[[access.rules]]
prefix = "/staff/schedule"
roles = ["staff"]

[[access.rules]]
prefix = "/admin"
roles = ["admin"]
"#;

fn bench_access_parsing(c: &mut Criterion) {
    c.bench_function("access_rules_from_toml", |b| {
        b.iter(|| toml::from_str::<Config>(black_box(ACCESS_CONFIG)))
    });

    let config: Config = toml::from_str(ACCESS_CONFIG).unwrap();
    c.bench_function("route_table_from_access_rules", |b| {
        b.iter(|| RouteTable::from_config(black_box(&config.access)))
    });
}

fn bench_default_table(c: &mut Criterion) {
    let config = Config::default();

    c.bench_function("route_table_builtin_rules", |b| {
        b.iter(|| RouteTable::from_config(black_box(&config.access)))
    });

    c.bench_function("route_table_export_toml", |b| {
        b.iter(|| {
            let mut export = config.clone();
            export.access.rules = RouteTable::portal_default()
                .rules()
                .iter()
                .map(RuleConfig::from)
                .collect();
            toml::to_string_pretty(black_box(&export))
        })
    });
}

criterion_group!(benches, bench_access_parsing, bench_default_table);
criterion_main!(benches);
