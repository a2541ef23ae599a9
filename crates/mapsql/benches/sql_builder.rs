use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use mapsql::{Entity, Orm, Predicate, col};

#[derive(Debug, Default, Entity)]
#[allow(dead_code)]
struct Item {
    id: i64,
    name: String,
    price: f64,
    stock: i32,
}

/// `n` equality predicates folded with AND:
/// `id` = ? AND `stock` = ? AND `id` = ? ...
fn predicates(n: usize) -> Predicate {
    let fields = ["id", "stock"];
    Predicate::all((0..n).map(|i| col(fields[i % 2]).eq(i as i64)))
        .expect("at least one predicate")
}

fn bench_select(c: &mut Criterion) {
    let mut group = c.benchmark_group("sql_builder/select");
    let orm = Orm::new();

    for n in [1, 5, 10, 50, 100] {
        let predicate = predicates(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &predicate, |b, p| {
            b.iter(|| {
                let q = orm.select::<Item>().where_(p.clone()).limit(10).build();
                black_box(q)
            });
        });
    }

    group.finish();
}

fn bench_insert_rows(c: &mut Criterion) {
    let mut group = c.benchmark_group("sql_builder/insert_rows");
    let orm = Orm::new();

    for n in [1, 10, 100, 500] {
        let items: Vec<Item> = (0..n)
            .map(|i| Item {
                id: i,
                name: format!("item{i}"),
                price: i as f64 * 1.5,
                stock: 10,
            })
            .collect();
        group.bench_with_input(BenchmarkId::from_parameter(n), &items, |b, items| {
            b.iter(|| black_box(orm.insert::<Item>().values(items).build()));
        });
    }

    group.finish();
}

fn bench_nested_or(c: &mut Criterion) {
    let mut group = c.benchmark_group("sql_builder/nested_or");
    let orm = Orm::new();

    for depth in [2, 8, 32] {
        let p = (1..depth).fold(col("id").eq(0), |acc, i| {
            acc.or(col("stock").gt(i).and(col("name").like("a%")))
        });
        group.bench_with_input(BenchmarkId::from_parameter(depth), &p, |b, p| {
            b.iter(|| black_box(orm.select::<Item>().where_(p.clone()).build()));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_select, bench_insert_rows, bench_nested_or);
criterion_main!(benches);
