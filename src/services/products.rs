use std::collections::HashSet;

use crate::assets::{ImageStore, ImageUpload};
use crate::domain::product::Product;
use crate::domain::types::{ImageUrl, ProductId};
use crate::forms::products::{CreateProductPayload, UpdateProductPayload};
use crate::models::config::{AssetWriteMode, CatalogConfig};
use crate::repository::{ProductReader, ProductWriter};

use super::{ServiceError, ServiceResult};

/// Unknown or malformed identifiers are reported as missing products.
fn parse_product_id(id: &str) -> ServiceResult<ProductId> {
    ProductId::new(id).map_err(|_| ServiceError::NotFound)
}

fn store_image<S>(images: &S, upload: &ImageUpload) -> ServiceResult<ImageUrl>
where
    S: ImageStore + ?Sized,
{
    images.store(upload).map_err(|e| {
        log::error!("Failed to store image '{}': {e}", upload.file_name);
        ServiceError::Internal
    })
}

/// Best-effort removal: failures are logged and otherwise ignored.
fn discard_image<S>(images: &S, image_url: &ImageUrl)
where
    S: ImageStore + ?Sized,
{
    match images.remove(image_url) {
        Ok(true) => log::debug!("Removed image {image_url}"),
        Ok(false) => {}
        Err(e) => log::warn!("Failed to remove image {image_url}: {e}"),
    }
}

/// Undo a file written for a row write that did not happen.
fn compensate<S>(images: &S, config: &CatalogConfig, stored: Option<&ImageUrl>)
where
    S: ImageStore + ?Sized,
{
    if config.asset_write_mode != AssetWriteMode::Compensating {
        return;
    }
    if let Some(image_url) = stored {
        discard_image(images, image_url);
    }
}

/// Creates a product, storing its image first when one was uploaded.
///
/// The new product is always active. The returned record carries the stored
/// image reference unchanged.
pub fn create_product<R, S>(
    payload: CreateProductPayload,
    repo: &R,
    images: &S,
    config: &CatalogConfig,
) -> ServiceResult<Product>
where
    R: ProductWriter,
    S: ImageStore + ?Sized,
{
    let CreateProductPayload { mut product, image } = payload;

    let stored = match image {
        Some(upload) => Some(store_image(images, &upload)?),
        None => None,
    };
    product.image_url = stored.clone();

    match repo.create_product(product) {
        Ok(product) => {
            log::info!("Created product {}", product.id);
            Ok(product)
        }
        Err(e) => {
            log::error!("Failed to create product: {e}");
            compensate(images, config, stored.as_ref());
            Err(ServiceError::Internal)
        }
    }
}

/// Lists every product, ordered by identifier descending, with relative image
/// references made absolute.
pub fn list_products<R>(repo: &R, config: &CatalogConfig) -> ServiceResult<Vec<Product>>
where
    R: ProductReader,
{
    match repo.list_products() {
        Ok(products) => Ok(products
            .into_iter()
            .map(|p| p.with_absolute_image_url(&config.public_base_url))
            .collect()),
        Err(e) => {
            log::error!("Failed to list products: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Fetches a single product. The image reference is returned as stored.
pub fn get_product<R>(id: &str, repo: &R) -> ServiceResult<Product>
where
    R: ProductReader,
{
    let id = parse_product_id(id)?;

    match repo.get_product_by_id(&id) {
        Ok(Some(product)) => Ok(product),
        Ok(None) => Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get product: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Applies a partial update, replacing the product image when a new one was
/// uploaded.
///
/// The order of the file operations relative to the row write follows
/// [`CatalogConfig::asset_write_mode`].
pub fn update_product<R, S>(
    id: &str,
    payload: UpdateProductPayload,
    repo: &R,
    images: &S,
    config: &CatalogConfig,
) -> ServiceResult<Product>
where
    R: ProductReader + ProductWriter,
    S: ImageStore + ?Sized,
{
    let id = parse_product_id(id)?;

    let existing = match repo.get_product_by_id(&id) {
        Ok(Some(product)) => product,
        Ok(None) => return Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get product: {e}");
            return Err(ServiceError::Internal);
        }
    };

    let UpdateProductPayload { mut update, image } = payload;
    let previous = existing.image_url;

    let stored = match image {
        Some(upload) => {
            if config.asset_write_mode == AssetWriteMode::Unordered {
                if let Some(previous) = &previous {
                    discard_image(images, previous);
                }
            }
            let image_url = store_image(images, &upload)?;
            update.image_url = Some(image_url.clone());
            Some(image_url)
        }
        None => None,
    };

    match repo.update_product(&id, update) {
        Ok(Some(product)) => {
            if config.asset_write_mode == AssetWriteMode::Compensating && stored.is_some() {
                if let Some(previous) = &previous {
                    discard_image(images, previous);
                }
            }
            Ok(product.with_absolute_image_url(&config.public_base_url))
        }
        Ok(None) => {
            compensate(images, config, stored.as_ref());
            Err(ServiceError::NotFound)
        }
        Err(e) => {
            log::error!("Failed to update product: {e}");
            compensate(images, config, stored.as_ref());
            Err(ServiceError::Internal)
        }
    }
}

/// Deletes a product row.
///
/// The image file stays on disk unless
/// [`CatalogConfig::remove_image_on_delete`] is set.
pub fn delete_product<R, S>(
    id: &str,
    repo: &R,
    images: &S,
    config: &CatalogConfig,
) -> ServiceResult<()>
where
    R: ProductReader + ProductWriter,
    S: ImageStore + ?Sized,
{
    let id = parse_product_id(id)?;

    let existing = match repo.get_product_by_id(&id) {
        Ok(Some(product)) => product,
        Ok(None) => return Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get product: {e}");
            return Err(ServiceError::Internal);
        }
    };

    match repo.delete_product(&id) {
        Ok(0) => return Err(ServiceError::NotFound),
        Ok(_) => log::info!("Deleted product {id}"),
        Err(e) => {
            log::error!("Failed to delete product: {e}");
            return Err(ServiceError::Internal);
        }
    }

    if config.remove_image_on_delete {
        if let Some(image_url) = &existing.image_url {
            discard_image(images, image_url);
        }
    }

    Ok(())
}

/// Removes stored images that no product references. Returns how many files
/// were deleted.
pub fn sweep_orphaned_images<R, S>(repo: &R, images: &S) -> ServiceResult<usize>
where
    R: ProductReader,
    S: ImageStore + ?Sized,
{
    let referenced: HashSet<ImageUrl> = match repo.list_image_urls() {
        Ok(urls) => urls.into_iter().collect(),
        Err(e) => {
            log::error!("Failed to list referenced images: {e}");
            return Err(ServiceError::Internal);
        }
    };

    let stored = images.list().map_err(|e| {
        log::error!("Failed to list stored images: {e}");
        ServiceError::Internal
    })?;

    let mut removed = 0;
    for image_url in stored.iter().filter(|url| !referenced.contains(*url)) {
        match images.remove(image_url) {
            Ok(true) => removed += 1,
            Ok(false) => {}
            Err(e) => log::warn!("Failed to remove orphaned image {image_url}: {e}"),
        }
    }

    Ok(removed)
}
