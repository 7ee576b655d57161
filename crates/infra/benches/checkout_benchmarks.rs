use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use std::sync::Arc;

use shopcore_catalog::{NewProduct, Product};
use shopcore_core::ProductId;
use shopcore_infra::{
    CartService, CheckoutService, InMemoryCartStore, InMemoryCatalogStore, InMemoryReceiptStore,
};
use shopcore_infra::{CartStore, CatalogStore};

fn seed_catalog(catalog: &InMemoryCatalogStore, count: usize) -> Vec<ProductId> {
    (0..count)
        .map(|i| {
            let product = Product::new(
                ProductId::new(),
                NewProduct {
                    title: format!("Product {i}"),
                    description: None,
                    code: None,
                    price: 100 + i as u64,
                    stock: u32::MAX,
                    category: "bench".to_string(),
                    available: true,
                    thumbnails: vec![],
                },
            )
            .unwrap();
            catalog.insert(product).unwrap().id
        })
        .collect()
}

fn bench_merge_adds(c: &mut Criterion) {
    let mut group = c.benchmark_group("merge_engine");

    for &cart_size in &[1usize, 10, 100] {
        group.throughput(Throughput::Elements(cart_size as u64));
        group.bench_with_input(
            BenchmarkId::new("add_line_item", cart_size),
            &cart_size,
            |b, &cart_size| {
                let carts = Arc::new(InMemoryCartStore::new());
                let service = CartService::new(Arc::clone(&carts));
                let products: Vec<ProductId> =
                    (0..cart_size).map(|_| ProductId::new()).collect();

                b.iter(|| {
                    let cart = carts.create().unwrap();
                    for product_id in &products {
                        black_box(service.add_line_item(cart.id, *product_id, 1).unwrap());
                    }
                });
            },
        );
    }

    group.finish();
}

fn bench_checkout(c: &mut Criterion) {
    let mut group = c.benchmark_group("checkout");

    for &cart_size in &[1usize, 10, 100] {
        group.throughput(Throughput::Elements(cart_size as u64));
        group.bench_with_input(
            BenchmarkId::new("reconcile", cart_size),
            &cart_size,
            |b, &cart_size| {
                let catalog = Arc::new(InMemoryCatalogStore::new());
                let carts = Arc::new(InMemoryCartStore::new());
                let receipts = Arc::new(InMemoryReceiptStore::new());
                let cart_service = CartService::new(Arc::clone(&carts));
                let checkout = CheckoutService::new(
                    Arc::clone(&catalog),
                    Arc::clone(&carts),
                    Arc::clone(&receipts),
                );
                let products = seed_catalog(&catalog, cart_size);

                b.iter(|| {
                    let cart = carts.create().unwrap();
                    for product_id in &products {
                        cart_service.add_line_item(cart.id, *product_id, 2).unwrap();
                    }
                    black_box(checkout.checkout(cart.id, "bench@example.com").unwrap());
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_merge_adds, bench_checkout);
criterion_main!(benches);
