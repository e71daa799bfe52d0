use diesel::prelude::*;

use crate::domain::product::{NewProduct, Product, ProductUpdate};
use crate::domain::types::{ImageUrl, ProductId};
use crate::models::product::{
    NewProduct as DbNewProduct, Product as DbProduct, ProductChangeset,
};
use crate::repository::errors::RepositoryResult;
use crate::repository::{DieselRepository, ProductReader, ProductWriter};

impl ProductReader for DieselRepository {
    fn list_products(&self) -> RepositoryResult<Vec<Product>> {
        use crate::schema::products;

        let mut conn = self.conn()?;

        let items = products::table
            .order(products::id.desc())
            .select(DbProduct::as_select())
            .load::<DbProduct>(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<Product>, _>>()?;

        Ok(items)
    }

    fn get_product_by_id(&self, id: &ProductId) -> RepositoryResult<Option<Product>> {
        use crate::schema::products;

        let mut conn = self.conn()?;

        let product = products::table
            .filter(products::id.eq(id.as_str()))
            .select(DbProduct::as_select())
            .first::<DbProduct>(&mut conn)
            .optional()?;

        let product = product.map(TryInto::try_into).transpose()?;
        Ok(product)
    }

    fn list_image_urls(&self) -> RepositoryResult<Vec<ImageUrl>> {
        use crate::schema::products;

        let mut conn = self.conn()?;

        let urls = products::table
            .filter(products::image_url.is_not_null())
            .select(products::image_url)
            .load::<Option<String>>(&mut conn)?
            .into_iter()
            .flatten()
            .map(ImageUrl::new)
            .collect::<Result<Vec<ImageUrl>, _>>()?;

        Ok(urls)
    }
}

impl ProductWriter for DieselRepository {
    fn create_product(&self, product: NewProduct) -> RepositoryResult<Product> {
        use crate::schema::products;

        let mut conn = self.conn()?;
        let id = ProductId::generate();
        let db_product = DbNewProduct::from_domain(&id, product);

        let created = diesel::insert_into(products::table)
            .values(&db_product)
            .returning(DbProduct::as_returning())
            .get_result::<DbProduct>(&mut conn)?;

        Ok(created.try_into()?)
    }

    fn update_product(
        &self,
        id: &ProductId,
        update: ProductUpdate,
    ) -> RepositoryResult<Option<Product>> {
        use crate::schema::products;

        let mut conn = self.conn()?;

        // Diesel refuses an UPDATE without assignments.
        let updated = if update.is_empty() {
            products::table
                .filter(products::id.eq(id.as_str()))
                .select(DbProduct::as_select())
                .first::<DbProduct>(&mut conn)
                .optional()?
        } else {
            let changeset: ProductChangeset = update.into();
            diesel::update(products::table.filter(products::id.eq(id.as_str())))
                .set(&changeset)
                .returning(DbProduct::as_returning())
                .get_result::<DbProduct>(&mut conn)
                .optional()?
        };

        let updated = updated.map(TryInto::try_into).transpose()?;
        Ok(updated)
    }

    fn delete_product(&self, id: &ProductId) -> RepositoryResult<usize> {
        use crate::schema::products;

        let mut conn = self.conn()?;

        let affected = diesel::delete(products::table.filter(products::id.eq(id.as_str())))
            .execute(&mut conn)?;

        Ok(affected)
    }
}
