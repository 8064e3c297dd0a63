use async_trait::async_trait;
use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::SqliteConnection;
use std::sync::Arc;

use adscout_core::ad_creation::{
    AdCreationRepositoryTrait, AdDocument, AdDocumentType, AdFilter, AdFilterCategory, CreatedAd,
};
use adscout_core::utils::time_utils::now_utc;
use adscout_core::Result;

use super::model::{AdDocumentDB, AdFilterDB, CreatedAdDB};
use crate::db::{get_connection, WriteHandle};
use crate::errors::{not_found_as, StorageError};
use crate::schema::{ad_documents, ad_filters, created_ads};

pub struct AdCreationRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl AdCreationRepository {
    pub fn new(
        pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
        writer: WriteHandle,
    ) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl AdCreationRepositoryTrait for AdCreationRepository {
    fn get_filter(&self, filter_id: &str) -> Result<AdFilter> {
        let mut conn = get_connection(&self.pool)?;
        let row = not_found_as(
            ad_filters::table
                .find(filter_id)
                .select(AdFilterDB::as_select())
                .first::<AdFilterDB>(&mut conn),
            "Filter",
        )?;
        Ok(row.into())
    }

    fn list_filters(
        &self,
        category: AdFilterCategory,
        organization_id: &str,
    ) -> Result<Vec<AdFilter>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = ad_filters::table
            .filter(ad_filters::category.eq(category.as_str()))
            .filter(
                ad_filters::organization_id
                    .is_null()
                    .or(ad_filters::organization_id.eq(organization_id)),
            )
            .select(AdFilterDB::as_select())
            .order((ad_filters::sort_order.asc(), ad_filters::name.asc()))
            .load::<AdFilterDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(AdFilter::from).collect())
    }

    async fn create_filter(&self, filter: AdFilter) -> Result<AdFilter> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<AdFilter> {
                let row = diesel::insert_into(ad_filters::table)
                    .values(AdFilterDB::from(filter))
                    .returning(AdFilterDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                Ok(row.into())
            })
            .await
    }

    async fn delete_filter(&self, filter_id: &str) -> Result<usize> {
        let filter_id = filter_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                Ok(diesel::delete(ad_filters::table.find(filter_id))
                    .execute(conn)
                    .map_err(StorageError::from)?)
            })
            .await
    }

    async fn replace_global_filters(
        &self,
        category: AdFilterCategory,
        filters: Vec<AdFilter>,
    ) -> Result<usize> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                diesel::delete(
                    ad_filters::table
                        .filter(ad_filters::category.eq(category.as_str()))
                        .filter(ad_filters::organization_id.is_null()),
                )
                .execute(conn)
                .map_err(StorageError::from)?;
                let rows: Vec<AdFilterDB> = filters.into_iter().map(AdFilterDB::from).collect();
                Ok(diesel::insert_into(ad_filters::table)
                    .values(&rows)
                    .execute(conn)
                    .map_err(StorageError::from)?)
            })
            .await
    }

    fn get_created_ad(&self, created_ad_id: &str) -> Result<CreatedAd> {
        let mut conn = get_connection(&self.pool)?;
        let row = not_found_as(
            created_ads::table
                .find(created_ad_id)
                .select(CreatedAdDB::as_select())
                .first::<CreatedAdDB>(&mut conn),
            "Created ad",
        )?;
        Ok(row.into())
    }

    fn list_created_ads(&self, organization_id: &str) -> Result<Vec<CreatedAd>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = created_ads::table
            .filter(created_ads::organization_id.eq(organization_id))
            .select(CreatedAdDB::as_select())
            .order((created_ads::created_at.desc(), created_ads::id.asc()))
            .load::<CreatedAdDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(CreatedAd::from).collect())
    }

    async fn create_created_ad(&self, created_ad: CreatedAd) -> Result<CreatedAd> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<CreatedAd> {
                let row = diesel::insert_into(created_ads::table)
                    .values(CreatedAdDB::try_from(created_ad)?)
                    .returning(CreatedAdDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                Ok(row.into())
            })
            .await
    }

    async fn update_pipeline_stage(
        &self,
        created_ad_id: &str,
        stage: String,
    ) -> Result<CreatedAd> {
        let created_ad_id = created_ad_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<CreatedAd> {
                let row = not_found_as(
                    diesel::update(created_ads::table.find(&created_ad_id))
                        .set((
                            created_ads::pipeline_stage.eq(stage),
                            created_ads::updated_at.eq(now_utc()),
                        ))
                        .returning(CreatedAdDB::as_returning())
                        .get_result(conn),
                    "Created ad",
                )?;
                Ok(row.into())
            })
            .await
    }

    async fn delete_created_ad(&self, created_ad_id: &str) -> Result<usize> {
        let created_ad_id = created_ad_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                let documents = diesel::delete(
                    ad_documents::table.filter(ad_documents::created_ad_id.eq(&created_ad_id)),
                )
                .execute(conn)
                .map_err(StorageError::from)?;
                let ads = diesel::delete(created_ads::table.find(&created_ad_id))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(documents + ads)
            })
            .await
    }

    fn list_documents(&self, created_ad_id: &str) -> Result<Vec<AdDocument>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = ad_documents::table
            .filter(ad_documents::created_ad_id.eq(created_ad_id))
            .select(AdDocumentDB::as_select())
            .load::<AdDocumentDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(AdDocument::from).collect())
    }

    fn get_document(
        &self,
        created_ad_id: &str,
        document_type: AdDocumentType,
    ) -> Result<Option<AdDocument>> {
        let mut conn = get_connection(&self.pool)?;
        let row = ad_documents::table
            .filter(ad_documents::created_ad_id.eq(created_ad_id))
            .filter(ad_documents::document_type.eq(document_type.as_str()))
            .select(AdDocumentDB::as_select())
            .first::<AdDocumentDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        Ok(row.map(AdDocument::from))
    }

    async fn insert_missing_documents(&self, documents: Vec<AdDocument>) -> Result<Vec<AdDocument>> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Vec<AdDocument>> {
                let mut inserted = Vec::new();
                for document in documents {
                    let document_db = AdDocumentDB::from(document);
                    let exists = ad_documents::table
                        .filter(ad_documents::created_ad_id.eq(&document_db.created_ad_id))
                        .filter(ad_documents::document_type.eq(&document_db.document_type))
                        .select(ad_documents::id)
                        .first::<String>(conn)
                        .optional()
                        .map_err(StorageError::from)?
                        .is_some();
                    if exists {
                        continue;
                    }
                    let row = diesel::insert_into(ad_documents::table)
                        .values(&document_db)
                        .returning(AdDocumentDB::as_returning())
                        .get_result(conn)
                        .map_err(StorageError::from)?;
                    inserted.push(AdDocument::from(row));
                }
                Ok(inserted)
            })
            .await
    }

    async fn save_document(&self, document: AdDocument) -> Result<AdDocument> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<AdDocument> {
                let document_db = AdDocumentDB::from(document);
                let row = diesel::insert_into(ad_documents::table)
                    .values(&document_db)
                    .on_conflict((ad_documents::created_ad_id, ad_documents::document_type))
                    .do_update()
                    .set((
                        ad_documents::content.eq(&document_db.content),
                        ad_documents::version.eq(document_db.version),
                        ad_documents::status.eq(&document_db.status),
                        ad_documents::updated_at.eq(document_db.updated_at),
                    ))
                    .returning(AdDocumentDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                Ok(row.into())
            })
            .await
    }
}
