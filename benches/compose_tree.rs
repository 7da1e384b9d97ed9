//! This bench composes a large generated book without reading any module
//! sources, exercising numbering, reference resolution and the duplicate
//! guard.

#![allow(missing_docs)]

use criterion::{Criterion, criterion_group, criterion_main};
use folio::domain::{ConfigTree, ModuleAttributes, NoFacts, compose};

/// Builds a book of `chapters` chapters, each with a few nested sections.
fn generate_book(chapters: usize, sections: usize, modules: usize) -> ConfigTree {
    let mut book = ConfigTree::new();
    for c in 0..chapters {
        let mut chapter = ConfigTree::new();
        for s in 0..sections {
            let mut section = ConfigTree::new();
            for m in 0..modules {
                section = section.module(
                    format!("Chapter{c}/Section{s}/Module{c}_{s}_{m}"),
                    ModuleAttributes::default(),
                );
            }
            chapter = chapter.section(format!("Section {c}.{s}"), section);
        }
        book = book.section(format!("Chapter {c}"), chapter);
    }
    book
}

fn compose_large_book(c: &mut Criterion) {
    let book = generate_book(40, 10, 12);
    c.bench_function("compose 4800 modules", |b| {
        b.iter(|| compose(&book, 1, NoFacts).unwrap());
    });
}

criterion_group!(benches, compose_large_book);
criterion_main!(benches);
