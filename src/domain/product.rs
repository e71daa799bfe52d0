use serde::{Deserialize, Serialize};

use crate::domain::types::{
    CategoryName, ImageUrl, ProductDescription, ProductId, ProductName, ProductNameLc,
    ProductPrice,
};

/// A catalog item as persisted in the `products` table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: ProductId,
    pub name: ProductName,
    pub name_lc: ProductNameLc,
    pub descriptions: Option<ProductDescription>,
    pub price: ProductPrice,
    pub category: CategoryName,
    /// Stored image reference, relative to the application origin unless it
    /// was rewritten for a response.
    pub image_url: Option<ImageUrl>,
    pub stock_quantity: i32,
    pub is_active: bool,
}

impl Product {
    /// Returns a copy whose relative image reference is prefixed with
    /// `base_url`.
    pub fn with_absolute_image_url(mut self, base_url: &str) -> Self {
        self.image_url = self.image_url.map(|url| url.absolute(base_url));
        self
    }
}

/// Information required to create a new [`Product`].
///
/// The identifier is assigned by the repository and new products are always
/// active.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewProduct {
    pub name: ProductName,
    pub name_lc: ProductNameLc,
    pub descriptions: Option<ProductDescription>,
    pub price: ProductPrice,
    pub category: CategoryName,
    pub image_url: Option<ImageUrl>,
    pub stock_quantity: i32,
}

impl NewProduct {
    /// Materializes the record that will be stored under `id`.
    pub fn into_product(self, id: ProductId) -> Product {
        Product {
            id,
            name: self.name,
            name_lc: self.name_lc,
            descriptions: self.descriptions,
            price: self.price,
            category: self.category,
            image_url: self.image_url,
            stock_quantity: self.stock_quantity,
            is_active: true,
        }
    }
}

/// Partial update of a [`Product`]. `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ProductUpdate {
    pub name: Option<ProductName>,
    pub name_lc: Option<ProductNameLc>,
    pub descriptions: Option<ProductDescription>,
    pub price: Option<ProductPrice>,
    pub category: Option<CategoryName>,
    pub image_url: Option<ImageUrl>,
    pub stock_quantity: Option<i32>,
    pub is_active: Option<bool>,
}

impl ProductUpdate {
    /// True when no field would change.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.name_lc.is_none()
            && self.descriptions.is_none()
            && self.price.is_none()
            && self.category.is_none()
            && self.image_url.is_none()
            && self.stock_quantity.is_none()
            && self.is_active.is_none()
    }

    /// Applies the present fields onto `product`.
    pub fn apply_to(self, product: &mut Product) {
        if let Some(name) = self.name {
            product.name = name;
        }
        if let Some(name_lc) = self.name_lc {
            product.name_lc = name_lc;
        }
        if let Some(descriptions) = self.descriptions {
            product.descriptions = Some(descriptions);
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        if let Some(category) = self.category {
            product.category = category;
        }
        if let Some(image_url) = self.image_url {
            product.image_url = Some(image_url);
        }
        if let Some(stock_quantity) = self.stock_quantity {
            product.stock_quantity = stock_quantity;
        }
        if let Some(is_active) = self.is_active {
            product.is_active = is_active;
        }
    }
}
