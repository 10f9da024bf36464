use criterion::{black_box, criterion_group, criterion_main, Criterion};
use serde_json::{json, Map, Value};
use std::path::Path;
use tokenweave_compiler_css::{compile_trees, TokenConfig};
use tokenweave_tokens::{parse_token_value, TokenContext, TokenTree};

/// A palette of `count` colors, each with a spacing token and an alias
fn token_document(count: usize) -> Value {
    let mut color = Map::new();
    let mut spacing = Map::new();
    color.insert("$type".to_string(), json!("color"));
    spacing.insert("$type".to_string(), json!("dimension"));
    let mut alias = Map::new();

    for i in 0..count {
        color.insert(
            format!("c{}", i),
            json!({ "$value": format!("#{:06x}", i * 4099 % 0xffffff) }),
        );
        spacing.insert(
            format!("s{}", i),
            json!({ "$value": { "value": i % 64, "unit": "px" } }),
        );
        alias.insert(
            format!("a{}", i),
            json!({ "$value": format!("{{color.c{}}}", i) }),
        );
    }

    json!({
        "color": color,
        "spacing": spacing,
        "alias": alias
    })
}

fn tree(count: usize, context: TokenContext, path: &str) -> TokenTree {
    let document = token_document(count);
    let group = parse_token_value(&document, Path::new(path)).expect("Failed to parse");
    TokenTree::new(context, group, path)
}

fn compile_small(c: &mut Criterion) {
    let trees = vec![tree(20, TokenContext::Base, "tokens.json")];
    let config = TokenConfig::default();

    c.bench_function("compile_small", |b| {
        b.iter(|| compile_trees(black_box(&trees), &[], &config))
    });
}

fn compile_themed(c: &mut Criterion) {
    let trees = vec![
        tree(500, TokenContext::Base, "tokens.json"),
        tree(100, TokenContext::named("dark"), "dark.json"),
    ];
    let config = TokenConfig::default();

    c.bench_function("compile_themed", |b| {
        b.iter(|| compile_trees(black_box(&trees), &[], &config))
    });
}

criterion_group!(benches, compile_small, compile_themed);
criterion_main!(benches);
