use std::{sync::Arc, time::Duration};

use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, DbErr,
    EntityTrait, IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
    TransactionTrait,
};
use tracing::{debug, info};

use crate::{
    cache::ListingCache,
    error::{ServiceError, ServiceResult},
    pagination::{Page, Window},
    resource::Resource,
    upload::{UploadedFile, Uploader, sanitize_file_name},
};

/// The list/get/create/update/delete routine shared by every entity. What
/// differs per entity lives in its [`Resource`] descriptor.
#[derive(Clone)]
pub struct CrudService {
    db: DatabaseConnection,
    uploader: Arc<dyn Uploader>,
    cache: ListingCache,
    listing_ttl: Duration,
}

impl CrudService {
    pub fn new(
        db: DatabaseConnection,
        uploader: Arc<dyn Uploader>,
        cache: ListingCache,
        listing_ttl: Duration,
    ) -> Self {
        Self { db, uploader, cache, listing_ttl }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    pub async fn list<R: Resource>(&self, window: Window) -> ServiceResult<Page<R::Model>> {
        self.list_where::<R>(window, Condition::all()).await
    }

    pub async fn list_where<R: Resource>(
        &self,
        window: Window,
        filter: Condition,
    ) -> ServiceResult<Page<R::Model>> {
        let total = R::Entity::find().filter(filter.clone()).count(&self.db).await?;
        let items = R::Entity::find()
            .filter(filter)
            .order_by_asc(R::id_column())
            .offset(window.skip)
            .limit(window.limit)
            .all(&self.db)
            .await?;
        Ok(Page { items, total, window })
    }

    pub async fn all<R: Resource>(&self) -> ServiceResult<Vec<R::Model>> {
        Ok(R::Entity::find().order_by_asc(R::id_column()).all(&self.db).await?)
    }

    /// Full listing served through the listing cache when the entity has a
    /// cache key. Stale reads are possible until the next write invalidates it.
    pub async fn cached_all<R: Resource>(&self) -> ServiceResult<Vec<R::Model>> {
        let Some(key) = R::CACHE_KEY else {
            return self.all::<R>().await;
        };

        if let Some(rows) = self.cache.get::<Vec<R::Model>>(key) {
            debug!(key, "listing cache hit");
            return Ok(rows);
        }

        debug!(key, "listing cache miss");
        let rows = self.all::<R>().await?;
        self.cache.set(key, rows.clone(), self.listing_ttl);
        Ok(rows)
    }

    pub async fn get<R: Resource>(&self, id: i32) -> ServiceResult<R::Model> {
        find::<R, _>(&self.db, id)
            .await?
            .ok_or(ServiceError::NotFound { entity: R::NAME, id })
    }

    pub async fn create<R: Resource>(
        &self,
        mut model: R::Model,
        file: Option<UploadedFile>,
    ) -> ServiceResult<R::Model> {
        R::validate(&model)?;
        self.ensure_unique::<R>(&model, None).await?;

        if let Some(file) = file {
            self.attach_upload::<R>(&mut model, file).await?;
        }

        let mut active = model.into_active_model();
        active.not_set(R::id_column());
        let created = active.insert(&self.db).await?;

        self.invalidate::<R>();
        info!(entity = R::NAME, id = R::id(&created), "created");
        Ok(created)
    }

    pub async fn update<R: Resource>(
        &self,
        id: i32,
        mut model: R::Model,
        file: Option<UploadedFile>,
    ) -> ServiceResult<()> {
        let body_id = R::id(&model);
        if body_id != id {
            return Err(ServiceError::IdMismatch { entity: R::NAME, path: id, body: body_id });
        }

        let mut existing = self.get::<R>(id).await?;
        R::validate(&model)?;
        self.ensure_unique::<R>(&model, Some(id)).await?;

        match file {
            Some(file) => self.attach_upload::<R>(&mut model, file).await?,
            None => {
                let previous = R::upload_slot(&mut existing).and_then(Option::take);
                if let Some(slot) = R::upload_slot(&mut model) {
                    if slot.is_none() {
                        *slot = previous;
                    }
                }
            },
        }

        let active = model.into_active_model().reset_all();
        match active.update(&self.db).await {
            Ok(_) => {},
            Err(DbErr::RecordNotUpdated | DbErr::RecordNotFound(_)) => {
                // The row changed between the read above and the write.
                return Err(missed_update::<R, _>(&self.db, id).await?);
            },
            Err(err) => return Err(err.into()),
        }

        self.invalidate::<R>();
        info!(entity = R::NAME, id, "updated");
        Ok(())
    }

    pub async fn delete<R: Resource>(&self, id: i32) -> ServiceResult<()> {
        let txn = self.db.begin().await?;

        let Some(model) = find::<R, _>(&txn, id).await? else {
            txn.rollback().await?;
            return Err(ServiceError::NotFound { entity: R::NAME, id });
        };

        if let Err(err) = R::purge_dependents(&txn, &model).await {
            txn.rollback().await?;
            return Err(err.into());
        }
        R::Entity::delete_many().filter(R::id_column().eq(id)).exec(&txn).await?;
        txn.commit().await?;

        self.invalidate::<R>();
        info!(entity = R::NAME, id, "deleted");
        Ok(())
    }

    /// Stores a file that is not attached to any entity.
    pub async fn upload_file(&self, file: UploadedFile) -> ServiceResult<String> {
        let name = upload_name(&file)?;
        Ok(self.uploader.upload(file.data, &name).await?)
    }

    async fn ensure_unique<R: Resource>(
        &self,
        model: &R::Model,
        exclude: Option<i32>,
    ) -> ServiceResult<()> {
        let Some(key) = R::unique_key(model) else {
            return Ok(());
        };

        let mut cond = Condition::all().add(key);
        if let Some(id) = exclude {
            cond = cond.add(R::id_column().ne(id));
        }

        let clash = R::Entity::find().filter(cond).select_only().column(R::id_column());
        if clash.into_tuple::<i32>().one(&self.db).await?.is_some() {
            return Err(ServiceError::Conflict(R::conflict_message(model)));
        }
        Ok(())
    }

    async fn attach_upload<R: Resource>(
        &self,
        model: &mut R::Model,
        file: UploadedFile,
    ) -> ServiceResult<()> {
        let Some(slot) = R::upload_slot(model) else {
            debug!(entity = R::NAME, file = %file.file_name, "entity keeps no file reference");
            return Ok(());
        };
        let name = upload_name(&file)?;
        *slot = Some(self.uploader.upload(file.data, &name).await?);
        Ok(())
    }

    fn invalidate<R: Resource>(&self) {
        if let Some(key) = R::CACHE_KEY {
            self.cache.invalidate(key);
        }
    }
}

async fn find<R, C>(db: &C, id: i32) -> Result<Option<R::Model>, DbErr>
where
    R: Resource,
    C: ConnectionTrait,
{
    R::Entity::find().filter(R::id_column().eq(id)).one(db).await
}

/// Classifies an update that matched no row.
async fn missed_update<R, C>(db: &C, id: i32) -> Result<ServiceError, DbErr>
where
    R: Resource,
    C: ConnectionTrait,
{
    Ok(match find::<R, _>(db, id).await? {
        None => ServiceError::NotFound { entity: R::NAME, id },
        Some(_) => ServiceError::ConcurrencyConflict { entity: R::NAME, id },
    })
}

fn upload_name(file: &UploadedFile) -> ServiceResult<String> {
    sanitize_file_name(&file.file_name).ok_or_else(|| {
        ServiceError::ValidationFailed(format!("invalid file name `{}`", file.file_name))
    })
}
