use diesel::prelude::*;

use crate::domain::product::{
    NewProduct as DomainNewProduct, Product as DomainProduct, ProductUpdate,
};
use crate::domain::types::{
    CategoryName, ImageUrl, ProductDescription, ProductId, ProductName, ProductNameLc,
    ProductPrice, TypeConstraintError,
};

/// Diesel model representing the `products` table.
#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::products)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub name_lc: String,
    pub descriptions: Option<String>,
    pub price: f64,
    pub category: String,
    pub image_url: Option<String>,
    pub stock_quantity: i32,
    pub is_active: bool,
}

/// Insertable form of [`Product`].
#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::products)]
pub struct NewProduct {
    pub id: String,
    pub name: String,
    pub name_lc: String,
    pub descriptions: Option<String>,
    pub price: f64,
    pub category: String,
    pub image_url: Option<String>,
    pub stock_quantity: i32,
    pub is_active: bool,
}

/// Partial update of [`Product`]; `None` fields are skipped by Diesel.
#[derive(Debug, Default, AsChangeset)]
#[diesel(table_name = crate::schema::products)]
pub struct ProductChangeset {
    pub name: Option<String>,
    pub name_lc: Option<String>,
    pub descriptions: Option<String>,
    pub price: Option<f64>,
    pub category: Option<String>,
    pub image_url: Option<String>,
    pub stock_quantity: Option<i32>,
    pub is_active: Option<bool>,
}

/// Rows are expected to satisfy the domain constraints; a row that does not
/// is reported as a repository validation error rather than skipped.
impl TryFrom<Product> for DomainProduct {
    type Error = TypeConstraintError;

    fn try_from(product: Product) -> Result<Self, Self::Error> {
        Ok(Self {
            id: ProductId::new(product.id)?,
            name: ProductName::new(product.name)?,
            name_lc: ProductNameLc::new(product.name_lc)?,
            descriptions: product
                .descriptions
                .map(ProductDescription::new)
                .transpose()?,
            price: ProductPrice::new(product.price)?,
            category: CategoryName::new(product.category)?,
            image_url: product.image_url.map(ImageUrl::new).transpose()?,
            stock_quantity: product.stock_quantity,
            is_active: product.is_active,
        })
    }
}

impl NewProduct {
    /// Builds the row inserted for `product` under the freshly assigned `id`.
    pub fn from_domain(id: &ProductId, product: DomainNewProduct) -> Self {
        Self {
            id: id.as_str().to_string(),
            name: product.name.into_inner(),
            name_lc: product.name_lc.into_inner(),
            descriptions: product.descriptions.map(ProductDescription::into_inner),
            price: product.price.get(),
            category: product.category.into_inner(),
            image_url: product.image_url.map(ImageUrl::into_inner),
            stock_quantity: product.stock_quantity,
            is_active: true,
        }
    }
}

impl From<ProductUpdate> for ProductChangeset {
    fn from(update: ProductUpdate) -> Self {
        Self {
            name: update.name.map(ProductName::into_inner),
            name_lc: update.name_lc.map(ProductNameLc::into_inner),
            descriptions: update.descriptions.map(ProductDescription::into_inner),
            price: update.price.map(ProductPrice::get),
            category: update.category.map(CategoryName::into_inner),
            image_url: update.image_url.map(ImageUrl::into_inner),
            stock_quantity: update.stock_quantity,
            is_active: update.is_active,
        }
    }
}
