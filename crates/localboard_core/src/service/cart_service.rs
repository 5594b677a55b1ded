//! Shopping cart use-case service.
//!
//! # Responsibility
//! - Add catalog products with create-or-increment semantics.
//! - Adjust, remove and clear cart lines.
//! - Derive cart totals.
//!
//! # Invariants
//! - At most one line per product id.
//! - A line whose quantity reaches zero is removed.

use crate::clock::Clock;
use crate::config::CartConfig;
use crate::model::cart::{
    find_product, CartLine, CartLineFields, Product, ProductCategory, ProductId, QuantityChange,
};
use crate::repo::json_slot::JsonSlot;
use crate::repo::slot_repo::SlotRepository;
use crate::search::projection::{category_counts, project, ViewQuery};
use crate::service::feedback::{Confirm, Deferred, Notice, NoticeKind};
use crate::service::tracker_controller::{ClearOutcome, DeleteOutcome};
use crate::store::{InsertPosition, RecordStore, StoreError, StoreResult, UpdateOutcome};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

const REMOVE_PROMPT: &str = "Remove this item from the cart?";
const CLEAR_PROMPT: &str = "Empty the cart?";

pub type CartStore<S> = RecordStore<CartLine, S>;

/// Opens the cart store from `config.records_key`; lines are appended.
pub fn open_cart_store<S: SlotRepository>(
    repo: S,
    config: &CartConfig,
    clock: impl Clock + 'static,
) -> CartStore<S> {
    RecordStore::open(
        JsonSlot::new(repo, config.records_key.clone()),
        clock,
        InsertPosition::Back,
    )
}

/// Cart service failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartError {
    /// Product id is not in the catalog.
    UnknownProduct(ProductId),
    Store(StoreError),
}

impl Display for CartError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownProduct(id) => write!(f, "unknown product: {id}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CartError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::UnknownProduct(_) => None,
            Self::Store(err) => Some(err),
        }
    }
}

impl From<StoreError> for CartError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Cart controller bound to one cart store.
pub struct CartService<'s, S: SlotRepository> {
    store: &'s mut CartStore<S>,
    config: CartConfig,
    notice: Deferred<Notice>,
}

impl<'s, S: SlotRepository> CartService<'s, S> {
    pub fn new(store: &'s mut CartStore<S>, config: CartConfig) -> Self {
        Self {
            store,
            config,
            notice: Deferred::new(),
        }
    }

    pub fn store(&self) -> &CartStore<S> {
        self.store
    }

    /// Cart lines in insertion order.
    pub fn lines(&self) -> &[CartLine] {
        self.store.all()
    }

    /// Adds one unit of `product`, creating its line on first add.
    pub fn add_to_cart(&mut self, product: &Product) -> StoreResult<CartLine> {
        let line = if self.store.contains(&product.id) {
            self.store
                .update(&product.id, QuantityChange::Increment(1))?
                .into_record()
        } else {
            self.store.create(CartLineFields {
                product: *product,
                quantity: 1,
            })?
        };
        self.notify(NoticeKind::Info, format!("{} added to cart!", product.name));
        Ok(line)
    }

    /// Adds one unit of the catalog product with `id`.
    pub fn add_product(&mut self, id: ProductId) -> Result<CartLine, CartError> {
        let product = find_product(id).ok_or(CartError::UnknownProduct(id))?;
        Ok(self.add_to_cart(product)?)
    }

    /// Adds one unit to an existing line.
    ///
    /// # Errors
    /// - `NotFound` when the product has no line yet.
    pub fn increase_quantity(&mut self, id: ProductId) -> StoreResult<CartLine> {
        let line = self
            .store
            .update(&id, QuantityChange::Increment(1))?
            .into_record();
        self.notify(NoticeKind::Info, format!("{} added to cart!", line.name));
        Ok(line)
    }

    /// Removes one unit; the line disappears when its quantity reaches zero.
    pub fn decrease_quantity(&mut self, id: ProductId) -> StoreResult<UpdateOutcome<CartLine>> {
        let outcome = self.store.update(&id, QuantityChange::Decrement(1))?;
        match &outcome {
            UpdateOutcome::Updated(line) => {
                self.notify(NoticeKind::Info, format!("Removed one {}", line.name));
            }
            UpdateOutcome::Removed(line) => {
                self.notify(
                    NoticeKind::Danger,
                    format!("{} removed from cart", line.name),
                );
            }
        }
        Ok(outcome)
    }

    /// Removes a whole line after confirmation.
    pub fn remove_from_cart(
        &mut self,
        id: ProductId,
        confirm: &mut impl Confirm,
    ) -> DeleteOutcome {
        let Some(name) = self.store.get(&id).map(|line| line.name.clone()) else {
            return DeleteOutcome::NotFound;
        };
        if !confirm.confirm(REMOVE_PROMPT) {
            return DeleteOutcome::Cancelled;
        }
        if !self.store.delete(&id) {
            return DeleteOutcome::NotFound;
        }
        self.notify(NoticeKind::Danger, format!("{name} removed from cart"));
        DeleteOutcome::Deleted
    }

    /// Empties the cart after confirmation.
    pub fn clear_cart(&mut self, confirm: &mut impl Confirm) -> ClearOutcome {
        if self.store.is_empty() {
            return ClearOutcome::AlreadyEmpty;
        }
        if !confirm.confirm(CLEAR_PROMPT) {
            return ClearOutcome::Cancelled;
        }

        let count = self.store.len();
        if self.store.replace_all(Vec::new()).is_err() {
            return ClearOutcome::Cancelled;
        }
        self.notify(NoticeKind::Danger, "Cart cleared!");
        ClearOutcome::Cleared { count }
    }

    /// Sum of `price * quantity` over all lines.
    pub fn total_price(&self) -> u64 {
        self.store
            .all()
            .iter()
            .fold(0_u64, |total, line| total.saturating_add(line.line_total()))
    }

    /// Sum of quantities, shown as the cart badge.
    pub fn total_items(&self) -> u64 {
        self.store
            .all()
            .iter()
            .map(|line| u64::from(line.quantity))
            .sum()
    }

    pub fn projection(&self, query: &ViewQuery<ProductCategory>) -> Vec<CartLine> {
        project(self.store.all(), query)
    }

    pub fn category_counts(&self) -> BTreeMap<ProductCategory, usize> {
        category_counts(self.store.all())
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.current(self.store.now_ms())
    }

    /// Dismisses an expired notice; returns whether one was dismissed.
    pub fn tick(&mut self) -> bool {
        let now = self.store.now_ms();
        self.notice.tick(now).is_some()
    }

    fn notify(&mut self, kind: NoticeKind, message: impl Into<String>) {
        let now = self.store.now_ms();
        self.notice.schedule(
            Notice::new(kind, message),
            now,
            self.config.notice_duration_ms,
        );
    }
}
