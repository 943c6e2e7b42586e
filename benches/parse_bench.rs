use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use csvgrid_sheet::{parse, Delimiter, Sheet};

/// Build CSV text with `rows` rows of mixed plain and quoted cells
fn generate_csv(rows: usize) -> String {
    let mut text = String::from("id,name,city,note,score\n");
    for i in 0..rows {
        text.push_str(&format!(
            "{i},Person {i},\"City, {}\",\"says \"\"hi\"\"\nand leaves\",{}.5\n",
            i % 50,
            i % 100
        ));
    }
    text
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");

    group.bench_function("plain_row", |b| {
        b.iter(|| parse(black_box("47,28,John,4.5\n23,4.2,Jane,Hurz\n"), false, Delimiter::Comma))
    });

    group.bench_function("quoted_row", |b| {
        b.iter(|| {
            parse(
                black_box("47,\"28\"\"\",John,\"Räuber\r\nHotzenplotz\"\r\n"),
                false,
                Delimiter::Comma,
            )
        })
    });

    for rows in [100, 1_000, 10_000].iter() {
        let text = generate_csv(*rows);
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(BenchmarkId::new("rows", rows), &text, |b, text| {
            b.iter(|| parse(black_box(text), true, Delimiter::Comma))
        });
    }

    group.finish();
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");

    for rows in [100, 1_000, 10_000].iter() {
        group.bench_with_input(BenchmarkId::new("add_row", rows), rows, |b, &rows| {
            b.iter(|| {
                let mut sheet = Sheet::new(false);
                for i in 0..rows {
                    sheet.add_row(["a", "\"b\"", "c"]).unwrap();
                    if i % 10 == 0 {
                        // a wider row extends every column
                        sheet.add_row(["a", "b", "c", "d"]).unwrap();
                    }
                }
                sheet
            })
        });
    }

    group.finish();
}

fn bench_format(c: &mut Criterion) {
    let mut group = c.benchmark_group("format");

    for rows in [100, 1_000, 10_000].iter() {
        let sheet = parse(&generate_csv(*rows), true, Delimiter::Comma).unwrap();

        group.bench_with_input(BenchmarkId::new("comma", rows), &sheet, |b, sheet| {
            b.iter(|| sheet.get_formatted_sheet(black_box(Delimiter::Comma)).count())
        });

        group.bench_with_input(BenchmarkId::new("to_csv_string", rows), &sheet, |b, sheet| {
            b.iter(|| black_box(sheet).to_csv_string())
        });
    }

    group.finish();
}

criterion_group!(benches, bench_parse, bench_build, bench_format);
criterion_main!(benches);
