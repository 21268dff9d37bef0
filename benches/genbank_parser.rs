use criterion::{Criterion, criterion_group, criterion_main};

use exonic::exons::compute_exon_intron_stats;
use exonic::genbank::parse;
use exonic::location::parse_location;

/// A 60 kb record with a 40-exon reverse-strand CDS.
fn synthetic_record() -> String {
    let length = 60_000;
    let parts: Vec<String> = (0..40)
        .map(|i| {
            let start = 1_000 + i * 1_400;
            format!("{}..{}", start, start + 299)
        })
        .collect();

    let mut record = format!(
        "LOCUS       BENCH1               {length} bp    DNA     linear   PRI 01-JAN-2024\n\
         DEFINITION  Synthetic benchmark record.\n\
         ACCESSION   BENCH1\n\
         FEATURES             Location/Qualifiers\n\
         \x20    source          1..{length}\n\
         \x20    CDS             complement(join({}))\n\
         \x20                    /gene=\"BENCH\"\n\
         ORIGIN\n",
        parts.join(",")
    );

    let bases = b"acgt";
    for line_start in (0..length).step_by(60) {
        record.push_str(&format!("{:>9}", line_start + 1));
        for group in 0..6 {
            record.push(' ');
            for i in 0..10 {
                record.push(bases[(line_start + group * 10 + i) % 4] as char);
            }
        }
        record.push('\n');
    }
    record.push_str("//\n");
    record
}

fn bench_parse_record(c: &mut Criterion) {
    let data = synthetic_record();
    c.bench_function("parse record (60 kb, 40 exons)", |b| {
        b.iter(|| {
            let record = parse(&data).unwrap();
            assert_eq!(record.sequence.len(), 60_000);
        });
    });
}

fn bench_exon_stats(c: &mut Criterion) {
    let record = parse(&synthetic_record()).unwrap();
    c.bench_function("exon/intron stats (reverse strand)", |b| {
        b.iter(|| {
            let stats = compute_exon_intron_stats(&record.features, &record.sequence).unwrap();
            assert_eq!(stats.exons, 40);
        });
    });
}

fn bench_parse_location(c: &mut Criterion) {
    let text = "complement(join(467..1347,1442..1921,2010..2400,2500..2700,2800..3100))";
    c.bench_function("parse_location (5-part join)", |b| {
        b.iter(|| parse_location(text).unwrap());
    });
}

criterion_group!(
    benches,
    bench_parse_record,
    bench_exon_stats,
    bench_parse_location
);
criterion_main!(benches);
