use criterion::{Criterion, black_box, criterion_group, criterion_main};
use tempfile::tempdir;
use wiki_fs::{PathCodec, RobustnessConfig};
use wiki_store::cache::parse_cache_content;
use wiki_store::{CacheIndex, Layer, RepositoryConfig, RepositoryStore};

fn no_fsync() -> RobustnessConfig {
    RobustnessConfig {
        enable_fsync: false,
        ..RobustnessConfig::default()
    }
}

fn cache_benchmark(c: &mut Criterion) {
    let dir = tempdir().unwrap();
    let mut index = CacheIndex::new(PathCodec::new(dir.path()), no_fsync());
    let content: String = (0..2_000)
        .map(|i| format!("/wiki/page-{i}.txt\t2020-01-20T21:39:58.804Z\n"))
        .collect();
    std::fs::write(index.cache_file(), &content).unwrap();

    c.bench_function("cache::parse (2000 entries)", |b| {
        b.iter(|| parse_cache_content(black_box(&content)).unwrap())
    });

    c.bench_function("cache::load (2000 entries)", |b| {
        b.iter(|| index.load().unwrap())
    });
}

fn store_benchmark(c: &mut Criterion) {
    let dir = tempdir().unwrap();
    let config = RepositoryConfig::new(dir.path()).with_robustness(no_fsync());
    let store = RepositoryStore::open(config).unwrap();
    for i in 0..500 {
        store
            .write_text(&format!("/wiki/page-{i}.txt"), "content", Layer::Base)
            .unwrap();
    }

    c.bench_function("store::last_modified_files (500 files)", |b| {
        b.iter(|| store.last_modified_files(black_box(20), |_| true))
    });

    c.bench_function("store::read_text", |b| {
        b.iter(|| store.read_text(black_box("/wiki/page-250.txt")).unwrap())
    });
}

criterion_group!(benches, cache_benchmark, store_benchmark);
criterion_main!(benches);
