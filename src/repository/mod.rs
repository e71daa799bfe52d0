use crate::db::{DbConnection, DbPool};
use crate::domain::product::{NewProduct, Product, ProductUpdate};
use crate::domain::types::{ImageUrl, ProductId};

pub mod errors;
pub mod product;

use errors::RepositoryResult;

/// Repository implementation backed by Diesel and SQLite.
///
/// The underlying `r2d2::Pool` is cheap to clone, allowing the repository to
/// be passed around freely between handlers.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool, // r2d2::Pool is cheap to clone
}

impl DieselRepository {
    /// Create a new repository from an established database pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Get a pooled database connection.
    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

/// Read-only operations for product entities.
pub trait ProductReader {
    /// List every product ordered by identifier, descending.
    ///
    /// Identifiers are random, so the order is stable for a given data set but
    /// does not reflect creation time.
    fn list_products(&self) -> RepositoryResult<Vec<Product>>;
    /// Retrieve a product by its identifier.
    fn get_product_by_id(&self, id: &ProductId) -> RepositoryResult<Option<Product>>;
    /// Every image reference currently stored on a product row.
    fn list_image_urls(&self) -> RepositoryResult<Vec<ImageUrl>>;
}

/// Write operations for product entities.
pub trait ProductWriter {
    /// Persist a new product under a freshly generated identifier.
    fn create_product(&self, product: NewProduct) -> RepositoryResult<Product>;
    /// Overwrite the fields present in `update`. Returns `None` when no row
    /// matches `id`.
    fn update_product(
        &self,
        id: &ProductId,
        update: ProductUpdate,
    ) -> RepositoryResult<Option<Product>>;
    /// Remove a product row. Returns the number of affected rows.
    fn delete_product(&self, id: &ProductId) -> RepositoryResult<usize>;
}
