use criterion::{Criterion, black_box, criterion_group, criterion_main};
use std::collections::HashSet;
use webconfig::api::{ItemKind, MenuItem, SymbolType};
use webconfig::ui::state::render_tree;

fn synthetic_tree(menus: usize, per_menu: usize) -> Vec<MenuItem> {
    (0..menus)
        .map(|m| MenuItem {
            prompt: format!("Menu {}", m),
            kind: ItemKind::Menu,
            visible: true,
            children: (0..per_menu)
                .map(|s| MenuItem {
                    symbol_type: Some(SymbolType::Bool),
                    ..MenuItem::symbol_stub(format!("SYM_{}_{}", m, s), "y")
                })
                .collect(),
            ..MenuItem::default()
        })
        .collect()
}

fn bench_render_tree(c: &mut Criterion) {
    let tree = synthetic_tree(50, 40);
    let collapsed = HashSet::new();
    let expanded: HashSet<String> = (0..50).map(|m| format!("/Menu {}", m)).collect();

    c.bench_function("render_tree_collapsed", |b| {
        b.iter(|| render_tree(black_box(&tree), black_box(&collapsed)))
    });
    c.bench_function("render_tree_expanded", |b| {
        b.iter(|| render_tree(black_box(&tree), black_box(&expanded)))
    });
}

criterion_group!(benches, bench_render_tree);
criterion_main!(benches);
