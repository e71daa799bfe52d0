use std::fs;

use actix_multipart::form::{MultipartForm, tempfile::TempFile, text::Text};
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::assets::ImageUpload;
use crate::domain::product::{NewProduct, ProductUpdate};
use crate::domain::types::{
    CategoryName, ProductDescription, ProductName, ProductNameLc, ProductPrice,
    TypeConstraintError,
};

/// Multipart body of `POST /products/`.
#[derive(MultipartForm)]
pub struct CreateProductForm {
    pub name: Text<String>,
    pub name_lc: Text<String>,
    pub price: Text<f64>,
    pub stock_quantity: Text<i32>,
    pub category: Text<String>,
    pub descriptions: Option<Text<String>>,
    pub image: Option<TempFile>,
}

/// Multipart body of `PUT /products/{id}`; every field may be omitted.
#[derive(MultipartForm)]
pub struct UpdateProductForm {
    pub name: Option<Text<String>>,
    pub name_lc: Option<Text<String>>,
    pub price: Option<Text<f64>>,
    pub stock_quantity: Option<Text<i32>>,
    pub descriptions: Option<Text<String>>,
    pub category: Option<Text<String>>,
    pub is_active: Option<Text<String>>,
    pub image: Option<TempFile>,
}

/// Text fields shared by both forms, checked before conversion into domain
/// types.
#[derive(Debug, Validate)]
struct SubmittedFields {
    #[validate(length(min = 1))]
    name: Option<String>,
    #[validate(length(min = 1))]
    name_lc: Option<String>,
    #[validate(length(min = 1))]
    category: Option<String>,
}

impl SubmittedFields {
    fn into_domain(
        self,
    ) -> Result<(Option<ProductName>, Option<ProductNameLc>, Option<CategoryName>), TypeConstraintError>
    {
        Ok((
            self.name.map(ProductName::new).transpose()?,
            self.name_lc.map(ProductNameLc::new).transpose()?,
            self.category.map(CategoryName::new).transpose()?,
        ))
    }
}

/// Validated content of [`CreateProductForm`].
#[derive(Debug, Clone, PartialEq)]
pub struct CreateProductPayload {
    pub product: NewProduct,
    pub image: Option<ImageUpload>,
}

/// Validated content of [`UpdateProductForm`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateProductPayload {
    pub update: ProductUpdate,
    pub image: Option<ImageUpload>,
}

#[derive(Debug, Error)]
pub enum ProductFormError {
    #[error("Product form validation failed: {0}")]
    Validation(String),
    #[error("Product form contains invalid data: {0}")]
    TypeConstraint(String),
    #[error("Failed to read uploaded image")]
    ImageRead,
}

impl From<ValidationErrors> for ProductFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for ProductFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

/// Reads an uploaded image part. A part without file name and content, as
/// sent for an empty file input, counts as no image.
fn read_image(file: Option<TempFile>) -> Result<Option<ImageUpload>, ProductFormError> {
    let Some(mut file) = file else {
        return Ok(None);
    };

    let file_name = file.file_name.take().unwrap_or_default();
    if file.size == 0 && file_name.is_empty() {
        return Ok(None);
    }

    let bytes = fs::read(file.file.path()).map_err(|e| {
        log::error!("Failed to read uploaded image '{file_name}': {e}");
        ProductFormError::ImageRead
    })?;

    Ok(Some(ImageUpload { file_name, bytes }))
}

/// Interprets the usual spellings of a boolean form value.
fn parse_flag(value: &str) -> Result<bool, TypeConstraintError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        other => Err(TypeConstraintError::InvalidValue(format!("is_active: {other}"))),
    }
}

impl TryFrom<CreateProductForm> for CreateProductPayload {
    type Error = ProductFormError;

    fn try_from(form: CreateProductForm) -> Result<Self, Self::Error> {
        let fields = SubmittedFields {
            name: Some(form.name.into_inner()),
            name_lc: Some(form.name_lc.into_inner()),
            category: Some(form.category.into_inner()),
        };
        fields.validate()?;

        let (name, name_lc, category) = match fields.into_domain()? {
            (Some(name), Some(name_lc), Some(category)) => (name, name_lc, category),
            _ => {
                return Err(ProductFormError::Validation(
                    "name, name_lc and category are required".to_string(),
                ));
            }
        };

        let product = NewProduct {
            name,
            name_lc,
            descriptions: form
                .descriptions
                .map(|text| ProductDescription::new(text.into_inner()))
                .transpose()?,
            price: ProductPrice::new(form.price.into_inner())?,
            category,
            image_url: None,
            stock_quantity: form.stock_quantity.into_inner(),
        };

        Ok(Self {
            product,
            image: read_image(form.image)?,
        })
    }
}

impl TryFrom<UpdateProductForm> for UpdateProductPayload {
    type Error = ProductFormError;

    fn try_from(form: UpdateProductForm) -> Result<Self, Self::Error> {
        let fields = SubmittedFields {
            name: form.name.map(Text::into_inner),
            name_lc: form.name_lc.map(Text::into_inner),
            category: form.category.map(Text::into_inner),
        };
        fields.validate()?;
        let (name, name_lc, category) = fields.into_domain()?;

        let update = ProductUpdate {
            name,
            name_lc,
            descriptions: form
                .descriptions
                .map(|text| ProductDescription::new(text.into_inner()))
                .transpose()?,
            price: form
                .price
                .map(|text| ProductPrice::new(text.into_inner()))
                .transpose()?,
            category,
            image_url: None,
            stock_quantity: form.stock_quantity.map(Text::into_inner),
            is_active: form
                .is_active
                .map(|text| parse_flag(&text))
                .transpose()?,
        };

        Ok(Self {
            update,
            image: read_image(form.image)?,
        })
    }
}
