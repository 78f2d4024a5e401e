use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::path::PathBuf;

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn bench_parse_board(c: &mut Criterion) {
    let input = std::fs::read_to_string(fixture_path("demo.kicad_pcb")).unwrap();

    c.bench_function("parse_board", |b| {
        b.iter(|| boardscan::parse_board(black_box(&input)));
    });
}

fn bench_parse_board_repeated_footprints(c: &mut Criterion) {
    // A larger synthetic board: the demo fixture's footprint repeated, so
    // the bench also covers layer/net resolution against a warm table.
    let demo = std::fs::read_to_string(fixture_path("demo.kicad_pcb")).unwrap();
    let footprint_start = demo.find("(footprint").unwrap();
    let footprint_end = demo.find("(segment").unwrap();
    let footprint = &demo[footprint_start..footprint_end];
    let mut input = demo[..footprint_start].to_string();
    for _ in 0..100 {
        input.push_str(footprint);
    }
    input.push(')');

    c.bench_function("parse_board_100_footprints", |b| {
        b.iter(|| boardscan::parse_board(black_box(&input)));
    });
}

criterion_group!(benches, bench_parse_board, bench_parse_board_repeated_footprints);
criterion_main!(benches);
