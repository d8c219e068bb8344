use actix_web::web;
use async_trait::async_trait;
use diesel::prelude::*;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::customer::Customer;
use crate::domain::errors::DomainError;
use crate::domain::ports::CustomerStore;
use crate::schema::customers;

use super::models::CustomerRow;

/// Read-only view onto the customer records owned by the storefront's
/// account subsystem.
pub struct DieselCustomerStore {
    pool: DbPool,
}

impl DieselCustomerStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CustomerStore for DieselCustomerStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Customer>, DomainError> {
        let pool = self.pool.clone();
        web::block(move || {
            let mut conn = pool.get()?;

            let row = customers::table
                .filter(customers::id.eq(id))
                .select(CustomerRow::as_select())
                .first(&mut conn)
                .optional()?;

            row.map(CustomerRow::into_domain).transpose()
        })
        .await
        .map_err(|e| DomainError::Internal(e.to_string()))?
    }
}
