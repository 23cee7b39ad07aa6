//! Catalog service.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    database::Db,
    domain::catalog::{
        errors::CatalogServiceError,
        models::{NewProduct, NewVariant, Product, ProductUuid, Variant, VariantUuid},
        repository::PgCatalogRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgCatalogService {
    db: Db,
    repository: PgCatalogRepository,
}

impl PgCatalogService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgCatalogRepository::new(),
        }
    }
}

/// Attach variant rows to their owning products.
///
/// Pure projection over two already-fetched result sets; keeps the fetch cost
/// at exactly two queries regardless of product count.
fn attach_variants(mut products: Vec<Product>, variants: Vec<Variant>) -> Vec<Product> {
    for variant in variants {
        if let Some(product) = products.iter_mut().find(|p| p.uuid == variant.product_uuid) {
            product.variants.push(variant);
        }
    }

    products
}

#[async_trait]
impl CatalogService for PgCatalogService {
    async fn list_products(&self) -> Result<Vec<Product>, CatalogServiceError> {
        let mut tx = self.db.begin().await?;

        let products = self.repository.list_products(&mut tx).await?;

        let uuids: Vec<ProductUuid> = products.iter().map(|p| p.uuid).collect();
        let variants = self.repository.list_variants(&mut tx, &uuids).await?;

        tx.commit().await?;

        Ok(attach_variants(products, variants))
    }

    async fn get_product(&self, product: ProductUuid) -> Result<Product, CatalogServiceError> {
        let mut tx = self.db.begin().await?;

        let found = self.repository.get_product(&mut tx, product).await?;
        let variants = self.repository.list_variants(&mut tx, &[product]).await?;

        tx.commit().await?;

        Ok(attach_variants(vec![found], variants)
            .pop()
            .ok_or(CatalogServiceError::NotFound)?)
    }

    async fn create_product(&self, product: NewProduct) -> Result<Product, CatalogServiceError> {
        let mut tx = self.db.begin().await?;

        let created = self.repository.create_product(&mut tx, &product).await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn create_variant(
        &self,
        product: ProductUuid,
        variant: NewVariant,
    ) -> Result<Variant, CatalogServiceError> {
        let mut tx = self.db.begin().await?;

        let created = self
            .repository
            .create_variant(&mut tx, product, &variant)
            .await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn get_variant(&self, variant: VariantUuid) -> Result<Variant, CatalogServiceError> {
        let mut tx = self.db.begin().await?;

        let found = self.repository.get_variant(&mut tx, variant).await?;

        tx.commit().await?;

        Ok(found)
    }
}

#[automock]
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// Retrieves all products with their variants.
    async fn list_products(&self) -> Result<Vec<Product>, CatalogServiceError>;

    /// Retrieve a single product with its variants.
    async fn get_product(&self, product: ProductUuid) -> Result<Product, CatalogServiceError>;

    /// Creates a new product.
    async fn create_product(&self, product: NewProduct) -> Result<Product, CatalogServiceError>;

    /// Adds a variant to an existing product.
    async fn create_variant(
        &self,
        product: ProductUuid,
        variant: NewVariant,
    ) -> Result<Variant, CatalogServiceError>;

    /// Retrieve a single variant.
    async fn get_variant(&self, variant: VariantUuid) -> Result<Variant, CatalogServiceError>;
}
