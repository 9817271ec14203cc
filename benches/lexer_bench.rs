use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use reckon::{Environment, ScopeId, evaluate, parse_str, tokenize_with_warnings};

// Nested arithmetic with identifiers, repeated to give the scanner some work
fn bench_input() -> String {
    let line = "(width * 12 + 7) % 5 - (height / (3 + depth)) * 42 - null\n";
    line.repeat(200)
}

fn bench_tokenizers(c: &mut Criterion) {
    let input = bench_input();
    let mut group = c.benchmark_group("Tokenizer");

    group.bench_with_input(
        BenchmarkId::new("tokenize", "arithmetic_input"),
        &input,
        |b, input| b.iter(|| tokenize_with_warnings(black_box(input))),
    );

    group.finish();
}

fn bench_pipeline(c: &mut Criterion) {
    let input = bench_input();
    let mut env = Environment::new_global_populated();
    for (name, value) in [("width", 3.0), ("height", 80.0), ("depth", 5.0)] {
        env.declare(ScopeId::GLOBAL, name, reckon::RuntimeVal::Number(value), Default::default())
            .expect("benchmark variables are unique");
    }

    let mut group = c.benchmark_group("Pipeline");

    group.bench_with_input(
        BenchmarkId::new("parse", "arithmetic_input"),
        &input,
        |b, input| b.iter(|| parse_str(black_box(input))),
    );

    let program = parse_str(&input).expect("benchmark input parses");
    group.bench_function(BenchmarkId::new("evaluate", "arithmetic_input"), |b| {
        b.iter(|| evaluate(black_box(&program), &env, ScopeId::GLOBAL))
    });

    group.finish();
}

criterion_group!(benches, bench_tokenizers, bench_pipeline);
criterion_main!(benches);
