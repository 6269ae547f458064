use citation_patterns::diagnostics::Warning;
use citation_patterns::edition::expand_edition;
use citation_patterns::index::Indices;
use citation_patterns::records::Reporters;
use citation_patterns::resolver::substitute;
use citation_patterns::serialization::OrderedMap;
use citation_patterns::variables::VariableTable;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use serde_json::{json, Value};

// ============================================================================
// Test Data
// ============================================================================

fn variables_doc() -> Value {
    json!({
        "#": "benchmark variables",
        "volume": { "": r"(?P<volume>\d+)", "year": r"(?P<volume>1[789]\d\d|20\d\d)" },
        "page": { "": r"(?P<page>\d+)", "with_commas": r"(?P<page>\d(?:,?\d)*)" },
        "full_cite": "$volume (?P<reporter>$edition) $page",
        "pin": "(?:, $page_with_commas)?",
        "full_cite_pin": "$full_cite$pin"
    })
}

// A chain `v0 -> v1 -> ... -> v{depth}` of references.
fn chain_table(depth: usize) -> VariableTable {
    (0..depth)
        .map(|i| (format!("v{i}"), format!("x${{v{}}}", i + 1)))
        .chain(std::iter::once((format!("v{depth}"), "end".to_string())))
        .collect()
}

// `count` reporters with three editions and a handful of variations each.
fn generate_reporters(count: usize) -> Reporters {
    let mut map = serde_json::Map::new();
    for i in 0..count {
        let key = format!("R{i}.");
        map.insert(
            key.clone(),
            json!([{
                "name": format!("Reporter {i}"),
                "editions": {
                    format!("R{i}."): { "start": "1880-01-01T00:00:00", "regexes": ["$full_cite"] },
                    format!("R{i}.2d"): { "start": "1930-01-01T00:00:00" },
                    format!("R{i}.3d"): { "start": null }
                },
                "variations": {
                    format!("R {i}."): key.clone(),
                    format!("R{i}. 2d"): format!("R{i}.2d"),
                    format!("Rep. {i}"): key.clone()
                }
            }]),
        );
    }
    serde_json::from_value(Value::Object(map)).unwrap()
}

// ============================================================================
// Resolution Benchmarks
// ============================================================================

fn bench_variable_table(c: &mut Criterion) {
    let doc = variables_doc();
    c.bench_function("variable_table_from_document", |b| {
        b.iter(|| {
            let mut warnings: Vec<Warning> = Vec::new();
            VariableTable::from_document(black_box(&doc), &mut warnings)
        })
    });
}

fn bench_substitute_depth(c: &mut Criterion) {
    let mut group = c.benchmark_group("substitute_chain_depth");

    for depth in [1, 10, 50, 99] {
        let table = chain_table(depth);
        group.throughput(Throughput::Elements(depth as u64));
        group.bench_with_input(BenchmarkId::from_parameter(depth), &table, |b, table| {
            b.iter(|| substitute(black_box("$v0"), table))
        });
    }

    group.finish();
}

fn bench_expand_edition(c: &mut Criterion) {
    let mut group = c.benchmark_group("expand_edition_variations");

    for size in [1, 10, 100] {
        let variations: OrderedMap<String> = (0..size)
            .map(|i| (format!("A. {i}"), "A.".to_string()))
            .collect();
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &variations, |b, vars| {
            b.iter(|| expand_edition(black_box(r"(?P<volume>\d+) $edition (?P<page>\d+)"), "A.", vars))
        });
    }

    group.finish();
}

// ============================================================================
// Index Benchmarks
// ============================================================================

fn bench_indices(c: &mut Criterion) {
    let mut group = c.benchmark_group("indices_by_reporter_count");

    for size in [10, 100, 1000] {
        let reporters = generate_reporters(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &reporters, |b, reporters| {
            b.iter(|| {
                let mut warnings: Vec<Warning> = Vec::new();
                Indices::build(black_box(reporters), &mut warnings)
            })
        });
    }

    group.finish();
}

criterion_group!(
    resolution_benches,
    bench_variable_table,
    bench_substitute_depth,
    bench_expand_edition
);
criterion_group!(index_benches, bench_indices);
criterion_main!(resolution_benches, index_benches);
