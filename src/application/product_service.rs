use tokio_util::sync::CancellationToken;

use crate::domain::errors::DomainError;
use crate::domain::ports::ProductRepository;
use crate::domain::product::{NewProduct, ProductView};

pub struct ProductService<R> {
    repo: R,
}

impl<R: ProductRepository> ProductService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn add_product(
        &self,
        product: NewProduct,
        cancel: &CancellationToken,
    ) -> Result<ProductView, DomainError> {
        product.validate()?;
        let added = self.repo.add(product, cancel)?;
        log::info!("product {} added to category {}", added.id, added.category_id);
        Ok(added)
    }
}
