//! longalign Demo
//!
//! Aligns a few small sequence pairs and prints the regions found.

use longalign_core::nucleotide::{is_complement, reverse_complement};
use longalign_core::{AlignerParams, AlignmentReport, LocalShortRegionAligner, LongSequenceAligner};

fn main() {
    println!("longalign Seed-and-Extend Demo");
    println!("==============================\n");

    let params = AlignerParams {
        rng_seed: Some(42),
        ..Default::default()
    };
    let mut aligner = match LongSequenceAligner::new(params) {
        Ok(aligner) => aligner,
        Err(e) => {
            eprintln!("Failed to create aligner: {}", e);
            return;
        }
    };

    let reference = b"GATCCTAGGCATTCGAAGTCTGACGGTAACCTTGAGCAATGCGTCAGTTACGGATCCAAT";
    let with_insert = b"GATCCTAGGCATTCGAAGTCTGACGGTAACCGGGGTTGAGCAATGCGTCAGTTACGGATCCAAT";
    let with_deletion = b"GATCCTAGGCATTCGAAGTCTGACGGTAACCCAATGCGTCAGTTACGGATCCAAT";
    let with_substitutions = b"GATCCTAGGCATTCGAAGTCTGACGCCCCCCTTGAGCAATGCGTCAGTTACGGATCCAAT";

    demo_pair(&mut aligner, "Insertion", reference, with_insert);
    demo_pair(&mut aligner, "Deletion", reference, with_deletion);
    demo_pair(&mut aligner, "Substitutions", reference, with_substitutions);

    println!("Reverse complement");
    println!("------------------");
    let query = reverse_complement(reference);
    match aligner.align_by(reference, &query, is_complement) {
        Ok(regions) => {
            for region in &regions {
                println!("  {}", region);
            }
        }
        Err(e) => println!("  Error: {}", e),
    }
    println!();

    println!("Short region fallback");
    println!("---------------------");
    let fallback = LocalShortRegionAligner::new();
    match aligner.align_detailed_with(&reference[..], &with_substitutions[..], |a, b| a == b, &fallback) {
        Ok(report) => print_report(&report),
        Err(e) => println!("  Error: {}", e),
    }
}

fn demo_pair(aligner: &mut LongSequenceAligner, title: &str, reference: &[u8], query: &[u8]) {
    println!("{}", title);
    println!("{}", "-".repeat(title.len()));
    println!("Reference: {}", String::from_utf8_lossy(reference));
    println!("Query:     {}", String::from_utf8_lossy(query));

    match aligner.align_detailed_by(reference, query, |a, b| a == b) {
        Ok(report) => print_report(&report),
        Err(e) => println!("  Error: {}", e),
    }
    println!();
}

fn print_report(report: &AlignmentReport) {
    for region in &report.regions {
        println!("  {}", region);
    }
    for span in &report.unaligned {
        println!("  unaligned ref[{}..{}) qry[{}..{})", span.reference.start, span.reference.end, span.query.start, span.query.end);
    }
    println!(
        "  {} iterations, {} seeded, {} unseedable, {} via fallback",
        report.stats.iterations, report.stats.seeded_parts, report.stats.unseedable_parts, report.stats.fallback_parts
    );
}
