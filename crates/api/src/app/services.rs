//! Store construction and service wiring.
//!
//! All store handles are built here and injected into the services; the
//! process entry point owns their lifecycle. Nothing in this crate holds
//! global state.

use std::sync::Arc;

use shopcore_auth::Hs256Jwt;
use shopcore_infra::{
    CartService, CheckoutService, InMemoryAccountStore, InMemoryCartStore, InMemoryCatalogStore,
    InMemoryReceiptStore,
};

pub type AppCheckoutService = CheckoutService<
    Arc<InMemoryCatalogStore>,
    Arc<InMemoryCartStore>,
    Arc<InMemoryReceiptStore>,
>;

pub struct AppServices {
    pub jwt: Arc<Hs256Jwt>,
    pub catalog: Arc<InMemoryCatalogStore>,
    pub carts: Arc<InMemoryCartStore>,
    pub receipts: Arc<InMemoryReceiptStore>,
    pub accounts: Arc<InMemoryAccountStore>,
    pub cart_service: CartService<Arc<InMemoryCartStore>>,
    pub checkout: AppCheckoutService,
}

pub fn build_services(jwt_secret: String) -> AppServices {
    let catalog = Arc::new(InMemoryCatalogStore::new());
    let carts = Arc::new(InMemoryCartStore::new());
    let receipts = Arc::new(InMemoryReceiptStore::new());
    let accounts = Arc::new(InMemoryAccountStore::new());

    AppServices {
        jwt: Arc::new(Hs256Jwt::new(jwt_secret.as_bytes())),
        cart_service: CartService::new(Arc::clone(&carts)),
        checkout: CheckoutService::new(
            Arc::clone(&catalog),
            Arc::clone(&carts),
            Arc::clone(&receipts),
        ),
        catalog,
        carts,
        receipts,
        accounts,
    }
}
