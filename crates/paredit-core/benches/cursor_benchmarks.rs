//! Benchmarks for lexing, cursor motion and structural edits
//!
//! Generates synthetic Clojure source of increasing size so every operation is
//! measured on the same nesting shapes without external files.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use paredit_core::{
    edit::{delete, slurp, splice, EditSelection, PareditMode},
    navigation::ExpansionStack,
    SexpTokenizer, TokenStream,
};
use std::fmt::Write;

/// Synthetic Clojure source generator
struct SourceGenerator {
    /// Number of top-level `defn` forms
    forms: usize,
    /// Extra nesting inside each body
    depth: usize,
}

impl SourceGenerator {
    const fn new(forms: usize, depth: usize) -> Self {
        Self { forms, depth }
    }

    fn generate(&self) -> String {
        let mut source = String::new();
        for index in 0..self.forms {
            let _ = writeln!(source, ";; form {index}");
            let _ = write!(source, "(defn f{index} [x y]\n  ");
            for level in 0..self.depth {
                let _ = write!(source, "(let [v{level} #{{:a \"s\\\"{level}\"}}] ");
            }
            source.push_str("(+ x y 'z @w)");
            for _ in 0..self.depth {
                source.push(')');
            }
            source.push_str(")\n\n");
        }
        source
    }
}

fn bench_tokenizer(c: &mut Criterion) {
    let mut group = c.benchmark_group("tokenizer");
    for &forms in &[10, 100, 1000] {
        let source = SourceGenerator::new(forms, 4).generate();
        group.throughput(Throughput::Bytes(source.len() as u64));
        group.bench_with_input(BenchmarkId::new("tokenize_all", forms), &source, |b, source| {
            b.iter(|| SexpTokenizer::new(black_box(source)).tokenize_all());
        });
    }
    group.finish();
}

fn bench_cursor(c: &mut Criterion) {
    let mut group = c.benchmark_group("cursor");
    for &forms in &[10, 100, 1000] {
        let source = SourceGenerator::new(forms, 4).generate();
        let stream = TokenStream::new(&source);

        group.bench_with_input(BenchmarkId::new("forward_sexp_walk", forms), &stream, |b, stream| {
            b.iter(|| {
                let mut cursor = stream.cursor_at(0);
                let mut count = 0usize;
                while cursor.forward_sexp() {
                    count += 1;
                }
                black_box(count)
            });
        });

        let middle = source.len() / 2;
        group.bench_with_input(BenchmarkId::new("enclosing_list", forms), &stream, |b, stream| {
            b.iter(|| stream.cursor_at(black_box(middle)).enclosing_list());
        });

        group.bench_with_input(BenchmarkId::new("grow_to_top", forms), &stream, |b, stream| {
            b.iter(|| {
                let mut stack = ExpansionStack::new();
                let mut current = EditSelection::caret(middle);
                while let Some(next) = stack.grow(stream, current) {
                    current = next;
                }
                black_box(stack.len())
            });
        });
    }
    group.finish();
}

fn bench_edits(c: &mut Criterion) {
    let mut group = c.benchmark_group("edits");
    for &forms in &[10, 100, 1000] {
        let source = SourceGenerator::new(forms, 4).generate();
        let caret = source.find("(+ x").map_or(0, |offset| offset + 3);
        let selection = EditSelection::caret(caret);

        group.throughput(Throughput::Bytes(source.len() as u64));
        group.bench_with_input(BenchmarkId::new("forward_slurp", forms), &source, |b, source| {
            b.iter(|| slurp::forward_slurp(black_box(source), selection));
        });
        group.bench_with_input(BenchmarkId::new("splice", forms), &source, |b, source| {
            b.iter(|| splice::splice(black_box(source), selection));
        });
        group.bench_with_input(BenchmarkId::new("strict_backspace", forms), &source, |b, source| {
            b.iter(|| delete::delete_backward(black_box(source), selection, PareditMode::Strict));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_tokenizer, bench_cursor, bench_edits);
criterion_main!(benches);
