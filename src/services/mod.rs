//! Business logic services

pub mod authors;
pub mod catalog;
pub mod loans;

use std::sync::Arc;

use crate::{clock::Clock, config::CatalogConfig, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub authors: authors::AuthorsService,
    pub catalog: catalog::CatalogService,
    pub loans: loans::LoansService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, config: CatalogConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            authors: authors::AuthorsService::new(repository.clone(), config.clone()),
            catalog: catalog::CatalogService::new(repository.clone(), config.clone()),
            loans: loans::LoansService::new(repository, config, clock),
        }
    }
}
