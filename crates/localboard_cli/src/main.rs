//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `localboard_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

use localboard_core::{
    open_cart_store, open_db_in_memory, CartConfig, CartService, SqliteSlotRepository, SystemClock,
    CATALOG,
};

fn main() {
    println!("localboard_core ping={}", localboard_core::ping());
    println!("localboard_core version={}", localboard_core::core_version());
    println!("localboard_core catalog_size={}", CATALOG.len());

    // Exercise the full slot path against a throwaway database.
    let probe = match open_db_in_memory() {
        Ok(conn) => {
            let config = CartConfig::default();
            let mut store =
                open_cart_store(SqliteSlotRepository::new(&conn), &config, SystemClock);
            let mut cart = CartService::new(&mut store, config);
            CATALOG
                .first()
                .map(|product| cart.add_to_cart(product).is_ok() && cart.total_items() == 1)
                .unwrap_or(false)
        }
        Err(err) => {
            eprintln!("localboard_core db_error={}", err.error_code());
            false
        }
    };
    println!("localboard_core slot_probe={probe}");
}
