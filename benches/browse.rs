//! Benchmarks for loading modules and building namespace trees.
//!
//! The input is a synthetic module with a configurable number of namespaces and types, each
//! type carrying a field, a method, a property and a derived type that inherits them.

extern crate dotbrowse;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use dotbrowse::{
    build_namespace_tree,
    metadata::{
        builder::MetadataBuilder,
        signatures::{SignatureField, SignatureMethod, SignatureProperty, TypeSignature},
        typesystem::{FieldAttributes, MethodAttributes, MethodSemanticsAttributes, TypeAttributes},
    },
    AssemblyBrowser, BrowserConfig, CilModule,
};
use std::hint::black_box;

fn synthetic_image(namespaces: usize, types_per_namespace: usize) -> Vec<u8> {
    let mut builder = MetadataBuilder::new("Bench.dll");
    builder.assembly("Bench", [1, 0, 0, 0]);
    let object = builder.type_ref("System", "Object");

    for ns in 0..namespaces {
        let namespace = format!("Bench.Ns{ns}");
        for index in 0..types_per_namespace {
            let base = builder.type_def(
                TypeAttributes::PUBLIC,
                &namespace,
                &format!("Base{index}"),
                Some(object),
            );
            builder
                .field(
                    FieldAttributes::PUBLIC,
                    "Value",
                    &SignatureField {
                        modifiers: vec![],
                        base: TypeSignature::I4,
                    },
                )
                .unwrap();
            builder
                .method(
                    MethodAttributes::PUBLIC | MethodAttributes::VIRTUAL,
                    "Run",
                    &SignatureMethod::new(
                        true,
                        TypeSignature::Void,
                        vec![TypeSignature::String, TypeSignature::I8],
                    ),
                )
                .unwrap();
            let getter = builder
                .method(
                    MethodAttributes::PUBLIC | MethodAttributes::SPECIAL_NAME,
                    "get_Name",
                    &SignatureMethod::new(true, TypeSignature::String, vec![]),
                )
                .unwrap();
            let property = builder
                .property(
                    "Name",
                    &SignatureProperty {
                        has_this: true,
                        modifiers: vec![],
                        base: TypeSignature::String,
                        params: vec![],
                    },
                )
                .unwrap();
            builder.semantics(MethodSemanticsAttributes::GETTER, getter, property);

            builder.type_def(
                TypeAttributes::PUBLIC | TypeAttributes::SEALED,
                &namespace,
                &format!("Derived{index}"),
                Some(base),
            );
        }
    }

    builder.build_pe().unwrap()
}

fn bench_load(c: &mut Criterion) {
    let image = synthetic_image(8, 32);

    c.bench_function("load_module", |b| {
        b.iter(|| {
            let module = CilModule::from_mem(black_box(image.clone())).unwrap();
            black_box(module)
        });
    });
}

fn bench_browse(c: &mut Criterion) {
    let mut group = c.benchmark_group("browse");

    for types in [4usize, 32, 128] {
        let module = CilModule::from_mem(synthetic_image(4, types)).unwrap();

        group.bench_with_input(BenchmarkId::new("complete", types), &module, |b, module| {
            b.iter(|| black_box(build_namespace_tree(black_box(module)).unwrap()));
        });

        let declared = AssemblyBrowser::new(BrowserConfig::declared_only());
        group.bench_with_input(BenchmarkId::new("declared_only", types), &module, |b, module| {
            b.iter(|| black_box(declared.browse(black_box(module)).unwrap()));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_load, bench_browse);
criterion_main!(benches);
