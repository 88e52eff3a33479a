//! Performance benchmarks for genobase-importer
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use genobase_importer::core::chromosome::{place, resolve, resolve_label};
use genobase_importer::formats::vcf::VcfRecord;
use genobase_importer::import::alleles::AlleleFrequencyExtractor;
use genobase_importer::import::variants::VariantNormalizer;
use genobase_importer::import::{import_variant_records, ImportOptions};
use genobase_importer::{Cancellation, MemoryStore};

const DBSNP_LINE: &str =
    "NC_000001.11\t10001\trs1570391677\tT\tA\t.\t.\tRS=1570391677;dbSNPBuildID=154;SSR=0;PSEUDOGENEINFO=DDX11L1:100287102;VC=SNV;COMMON;GNO;FREQ=KOREAN:0.9891,0.0109";

const GNOMAD_LINE: &str = "chr1\t10031\trs1570391692\tT\tC\t.\tPASS\tAC=2;AN=51534;AF=0.0388;allele_type=snv;AF_afr=0.04;AF_ami=0.01;AF_amr=0.02;AF_asj=0.05;AF_eas=0.03;AF_fin=0.0001;AF_mid=0.02;AF_nfe=0.045;AF_sas=0.07";

const GNOMAD_MT_LINE: &str = "chrM\t3\trs1556422499\tT\tC\t.\tPASS\tAF_het=0.0001;AF_hom=0.0302;vep=C|upstream_gene_variant|SNV;pop_AF_het=0.0|0.0|0.0|0.0|0.0|0.0|0.0001|0.0|0.0|0.0;pop_AF_hom=0.1|0.0|0.01|0.0|0.0|0.02|0.03|0.0|0.0|0.0";

/// Benchmark chromosome resolution
fn bench_chrom_resolution(c: &mut Criterion) {
    let accessions = ["NC_000001.11", "NC_000023.11", "NC_012920.1", "NT_187361.1"];
    let labels = ["chr1", "chrX", "chrM", "chrUn_KI270742v1"];

    c.bench_function("resolve_accession", |b| {
        b.iter(|| {
            for accession in &accessions {
                black_box(resolve(black_box(accession)));
            }
        })
    });

    c.bench_function("resolve_label", |b| {
        b.iter(|| {
            for label in &labels {
                black_box(resolve_label(black_box(label)));
            }
        })
    });

    c.bench_function("place_par", |b| {
        b.iter(|| black_box(place(black_box("X"), black_box(60_000))))
    });
}

/// Benchmark VCF line parsing
fn bench_vcf_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("vcf_parsing");

    for (name, line) in [("dbsnp", DBSNP_LINE), ("gnomad", GNOMAD_LINE)] {
        group.throughput(Throughput::Bytes(line.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(name), line, |b, line| {
            b.iter(|| black_box(VcfRecord::parse(black_box(line), 1)))
        });
    }

    group.finish();
}

/// Benchmark per-record normalization and extraction
fn bench_record_evaluation(c: &mut Criterion) {
    let dbsnp = VcfRecord::parse(DBSNP_LINE, 1).unwrap();
    let gnomad = VcfRecord::parse(GNOMAD_LINE, 1).unwrap();
    let mitochondrial = VcfRecord::parse(GNOMAD_MT_LINE, 1).unwrap();
    let normalizer = VariantNormalizer::new();
    let extractor = AlleleFrequencyExtractor::new(0.001);

    c.bench_function("normalize_variant", |b| {
        b.iter(|| black_box(normalizer.normalize(black_box(&dbsnp)).unwrap()))
    });

    let mut group = c.benchmark_group("extract_alleles");
    for (name, record) in [("nuclear", &gnomad), ("mitochondrial", &mitochondrial)] {
        group.bench_with_input(BenchmarkId::from_parameter(name), record, |b, record| {
            b.iter(|| black_box(extractor.extract(black_box(record)).unwrap()))
        });
    }
    group.finish();
}

/// Benchmark the batched variant pipeline into memory
fn bench_variant_pipeline(c: &mut Criterion) {
    let record = VcfRecord::parse(DBSNP_LINE, 1).unwrap();
    let mut group = c.benchmark_group("variant_pipeline");

    for size in [1_000usize, 10_000] {
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            b.iter(|| {
                let mut store = MemoryStore::new();
                let records = std::iter::repeat(record.clone()).take(size).map(Ok);
                let stats = import_variant_records(
                    &mut store,
                    &Cancellation::new(),
                    records,
                    &ImportOptions::default(),
                )
                .unwrap();
                black_box(stats)
            })
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_chrom_resolution,
    bench_vcf_parsing,
    bench_record_evaluation,
    bench_variant_pipeline,
);

criterion_main!(benches);
