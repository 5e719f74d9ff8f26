// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Benchmarks for `trellis_style`.

use criterion::{BatchSize, BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use std::sync::Once;
use std::vec::Vec;

use trellis_style::{
    ResolveCx, StyleDefinition, StyleKind, StyleValue, StyledObject, Styleable, TypeDeclaration,
    TypeRegistry, WidgetType,
};

struct Elem {
    key: u32,
    parent: Option<u32>,
    style: Styleable<u32>,
}

impl Elem {
    fn new(registry: &TypeRegistry, ty: WidgetType, key: u32, parent: Option<u32>) -> Self {
        Self {
            key,
            parent,
            style: Styleable::new(key, registry.styles(ty)),
        }
    }
}

impl StyledObject<u32> for Elem {
    fn styleable(&self) -> &Styleable<u32> {
        &self.style
    }

    fn styleable_mut(&mut self) -> &mut Styleable<u32> {
        &mut self.style
    }

    fn key(&self) -> u32 {
        self.key
    }

    fn parent_key(&self) -> Option<u32> {
        self.parent
    }
}

fn registry() -> (TypeRegistry, WidgetType) {
    let mut registry = TypeRegistry::new();
    let mut base = registry
        .register(
            TypeDeclaration::new("Element")
                .style("FontSize", StyleKind::Inheritable)
                .default("FontSize", StyleValue::new(12.0_f64))
                .default("Width", StyleValue::new(0.0_f64)),
        )
        .unwrap();
    // A realistic depth of derivation.
    for name in ["Control", "ButtonBase", "Button", "IconButton"] {
        base = registry
            .register(TypeDeclaration::new(name).extends(base))
            .unwrap();
    }
    (registry, base)
}

fn bench_style(c: &mut Criterion) {
    static PRINT_SIZES: Once = Once::new();
    PRINT_SIZES.call_once(|| {
        eprintln!(
            "sizes: Styleable<u32>={} StyleValue={}",
            core::mem::size_of::<Styleable<u32>>(),
            core::mem::size_of::<StyleValue>(),
        );
    });

    let (registry, ty) = registry();

    // A small inheritance chain: 0 <- 1 <- ... <- N-1
    let chain_len: u32 = 16;
    let mut nodes: Vec<Elem> = (0..chain_len)
        .map(|i| Elem::new(&registry, ty, i, if i == 0 { None } else { Some(i - 1) }))
        .collect();
    nodes[0].style.set_style("FontSize", StyleValue::new(16.0_f64));
    let leaf = &nodes[(chain_len - 1) as usize];

    let mut group = c.benchmark_group("style/resolve");

    group.bench_function("instance_cached", |b| {
        let mut element = Elem::new(&registry, ty, 1, None);
        element.style.set_style("Width", StyleValue::new(100.0_f64));
        let cx = ResolveCx::new(|_: u32| None);
        b.iter(|| black_box(cx.get_style(&element, "Width")))
    });

    group.bench_function("class_default_cached", |b| {
        let element = Elem::new(&registry, ty, 1, None);
        let cx = ResolveCx::new(|_: u32| None);
        b.iter(|| black_box(cx.get_style(&element, "Width")))
    });

    group.bench_function("definition_uncached", |b| {
        let mut element = Elem::new(&registry, ty, 1, None);
        for i in 0..8_u32 {
            element
                .style
                .add_style_definition(StyleDefinition::new().with("Pad", StyleValue::new(i)));
        }
        element
            .style
            .add_style_definition(StyleDefinition::new().with("Width", StyleValue::new(1.0_f64)));
        let cx = ResolveCx::new(|_: u32| None);
        b.iter(|| {
            element.style.invalidate_all();
            black_box(cx.get_style(&element, "Width"))
        })
    });

    group.bench_function(BenchmarkId::new("inherited", chain_len), |b| {
        let cx = ResolveCx::new(|key: u32| {
            nodes
                .get(key as usize)
                .map(|e| (e.styleable(), e.parent_key()))
        });
        b.iter(|| black_box(cx.get_style(leaf, "FontSize")))
    });

    group.finish();

    let mut group = c.benchmark_group("style/mutate");

    for holders in [1_usize, 16, 256] {
        group.bench_function(BenchmarkId::new("definition_fan_out", holders), |b| {
            let shared = StyleDefinition::new();
            let elems: Vec<Elem> = (0..holders)
                .map(|i| {
                    let mut e = Elem::new(&registry, ty, i as u32, None);
                    e.style.add_style_definition(shared.clone());
                    e
                })
                .collect();
            let mut n = 0_u32;
            b.iter(|| {
                n = n.wrapping_add(1);
                black_box(shared.set_style("Width", StyleValue::new(n)));
            });
            black_box(elems.len());
        });
    }

    group.bench_function("set_style", |b| {
        b.iter_batched(
            || Elem::new(&registry, ty, 1, None),
            |mut element| {
                black_box(element.style.set_style("Width", StyleValue::new(123.0_f64)));
                black_box(element);
            },
            BatchSize::SmallInput,
        )
    });

    group.finish();
}

criterion_group!(benches, bench_style);
criterion_main!(benches);
