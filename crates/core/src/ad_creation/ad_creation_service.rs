use async_trait::async_trait;
use log::{debug, info, warn};
use std::sync::Arc;
use uuid::Uuid;

use super::ad_creation_model::{
    AdDocument, AdDocumentStatus, AdDocumentType, AdFilter, AdFilterCategory, CreatedAd,
    DocumentEditSource, FilterSelection, NewAdFilter, NewCreatedAd,
};
use super::ad_creation_seeds::seed_entries;
use super::ad_creation_templates::render_document;
use super::ad_creation_traits::{AdCreationRepositoryTrait, AdCreationServiceTrait};
use crate::constants::{INITIAL_DOCUMENT_VERSION, INITIAL_PIPELINE_STAGE};
use crate::context::RequestContext;
use crate::errors::{Error, Result};
use crate::events::{DomainEvent, DomainEventSink};
use crate::utils::text_utils::normalize_optional;
use crate::utils::time_utils::now_utc;

pub struct AdCreationService {
    repository: Arc<dyn AdCreationRepositoryTrait>,
    event_sink: Arc<dyn DomainEventSink>,
}

impl AdCreationService {
    pub fn new(
        repository: Arc<dyn AdCreationRepositoryTrait>,
        event_sink: Arc<dyn DomainEventSink>,
    ) -> Self {
        Self {
            repository,
            event_sink,
        }
    }

    fn load_created_ad(&self, ctx: &RequestContext, created_ad_id: &str) -> Result<CreatedAd> {
        let created_ad = self.repository.get_created_ad(created_ad_id)?;
        ctx.ensure_org_access(&created_ad.organization_id)?;
        Ok(created_ad)
    }

    /// Loads and checks the four filters referenced by a new ad.
    fn resolve_selection(&self, organization_id: &str, new_ad: &NewCreatedAd) -> Result<FilterSelection> {
        let mut selection = FilterSelection::default();
        for (category, filter_id) in new_ad.filter_ids() {
            let filter = self.repository.get_filter(filter_id)?;
            if !filter.visible_to(organization_id) {
                return Err(Error::NotFound(format!("Filter {}", filter_id)));
            }
            if filter.category != category {
                return Err(Error::invalid_input(format!(
                    "Filter '{}' is a {}, expected a {}",
                    filter.name, filter.category, category
                )));
            }
            selection.set(filter);
        }
        Ok(selection)
    }

    /// Best-effort lookup used when rendering templates after the fact.
    fn lookup_selection(&self, created_ad: &CreatedAd) -> FilterSelection {
        let mut selection = FilterSelection::default();
        for filter_id in [
            &created_ad.concept_id,
            &created_ad.angle_id,
            &created_ad.style_id,
            &created_ad.hook_id,
        ] {
            match self.repository.get_filter(filter_id) {
                Ok(filter) => selection.set(filter),
                Err(e) => debug!("Filter {} unavailable for templates: {}", filter_id, e),
            }
        }
        selection
    }
}

#[async_trait]
impl AdCreationServiceTrait for AdCreationService {
    fn list_filters(
        &self,
        ctx: &RequestContext,
        category: AdFilterCategory,
    ) -> Result<Vec<AdFilter>> {
        let organization_id = ctx.organization_id()?;
        self.repository.list_filters(category, organization_id)
    }

    async fn create_custom_filter(
        &self,
        ctx: &RequestContext,
        new_filter: NewAdFilter,
    ) -> Result<AdFilter> {
        let organization_id = ctx.organization_id()?;
        new_filter.validate()?;
        let filter = AdFilter {
            id: Uuid::new_v4().to_string(),
            category: new_filter.category,
            organization_id: Some(organization_id.to_string()),
            name: new_filter.name.trim().to_string(),
            description: normalize_optional(new_filter.description),
            sort_order: new_filter.sort_order.unwrap_or(i32::MAX),
            created_at: now_utc(),
        };
        self.repository.create_filter(filter).await
    }

    async fn delete_custom_filter(&self, ctx: &RequestContext, filter_id: &str) -> Result<()> {
        let filter = self.repository.get_filter(filter_id)?;
        match filter.organization_id.as_deref() {
            None => {
                return Err(Error::Unauthorized(
                    "global filters can only be changed by seeding".to_string(),
                ))
            }
            Some(owner) => ctx.ensure_org_access(owner)?,
        }
        self.repository.delete_filter(filter_id).await?;
        Ok(())
    }

    async fn seed_filters(&self, category: AdFilterCategory) -> Result<usize> {
        let now = now_utc();
        let filters: Vec<AdFilter> = seed_entries(category)
            .iter()
            .enumerate()
            .map(|(index, (name, description))| AdFilter {
                id: Uuid::new_v4().to_string(),
                category,
                organization_id: None,
                name: (*name).to_string(),
                description: Some((*description).to_string()),
                sort_order: index as i32,
                created_at: now,
            })
            .collect();
        let inserted = self.repository.replace_global_filters(category, filters).await?;
        info!("Seeded {} global {} filters", inserted, category);
        Ok(inserted)
    }

    async fn seed_missing_filters(&self) -> Result<usize> {
        let mut inserted = 0;
        for category in AdFilterCategory::ALL {
            // No organization id matches an empty string, so only global rows come back.
            let has_globals = self
                .repository
                .list_filters(category, "")?
                .iter()
                .any(|f| f.organization_id.is_none());
            if !has_globals {
                inserted += self.seed_filters(category).await?;
            }
        }
        Ok(inserted)
    }

    async fn create_ad(&self, ctx: &RequestContext, new_ad: NewCreatedAd) -> Result<CreatedAd> {
        let organization_id = ctx.organization_id()?;
        let selection = self.resolve_selection(organization_id, &new_ad)?;
        let now = now_utc();
        let created_ad = CreatedAd {
            id: Uuid::new_v4().to_string(),
            organization_id: organization_id.to_string(),
            user_id: ctx.user_id.clone(),
            name: selection.display_name(),
            concept_id: new_ad.concept_id,
            angle_id: new_ad.angle_id,
            style_id: new_ad.style_id,
            hook_id: new_ad.hook_id,
            selected_desires: new_ad.selected_desires,
            selected_beliefs: new_ad.selected_beliefs,
            pipeline_stage: INITIAL_PIPELINE_STAGE.to_string(),
            created_at: now,
            updated_at: now,
        };
        let created = self.repository.create_created_ad(created_ad).await?;
        info!("Created ad '{}' ({})", created.name, created.id);
        self.event_sink.emit(DomainEvent::created_ad_inserted(
            created.id.clone(),
            created.organization_id.clone(),
        ));
        Ok(created)
    }

    async fn initialize_documents(&self, created_ad_id: &str) -> Result<Vec<AdDocument>> {
        let created_ad = self.repository.get_created_ad(created_ad_id)?;
        let existing: Vec<AdDocumentType> = self
            .repository
            .list_documents(created_ad_id)?
            .into_iter()
            .map(|d| d.document_type)
            .collect();
        let selection = self.lookup_selection(&created_ad);
        let now = now_utc();
        let missing: Vec<AdDocument> = AdDocumentType::ALL
            .into_iter()
            .filter(|t| !existing.contains(t))
            .map(|document_type| AdDocument {
                id: Uuid::new_v4().to_string(),
                created_ad_id: created_ad.id.clone(),
                organization_id: created_ad.organization_id.clone(),
                document_type,
                content: render_document(document_type, &created_ad, &selection),
                version: INITIAL_DOCUMENT_VERSION,
                status: AdDocumentStatus::Completed,
                created_at: now,
                updated_at: now,
            })
            .collect();

        if missing.is_empty() {
            debug!("Documents for created ad {} already exist", created_ad_id);
            return Ok(Vec::new());
        }
        let inserted = self.repository.insert_missing_documents(missing).await?;
        info!(
            "Initialized {} documents for created ad {}",
            inserted.len(),
            created_ad_id
        );
        self.event_sink.emit(DomainEvent::ad_documents_ready(
            created_ad.id,
            created_ad.organization_id,
        ));
        Ok(inserted)
    }

    fn list_created_ads(&self, ctx: &RequestContext) -> Result<Vec<CreatedAd>> {
        let organization_id = ctx.organization_id()?;
        self.repository.list_created_ads(organization_id)
    }

    fn get_created_ad(&self, ctx: &RequestContext, created_ad_id: &str) -> Result<CreatedAd> {
        self.load_created_ad(ctx, created_ad_id)
    }

    async fn update_pipeline_stage(
        &self,
        ctx: &RequestContext,
        created_ad_id: &str,
        stage: String,
    ) -> Result<CreatedAd> {
        self.load_created_ad(ctx, created_ad_id)?;
        let stage = stage.trim().to_string();
        if stage.is_empty() {
            return Err(Error::invalid_input("Pipeline stage cannot be empty"));
        }
        self.repository.update_pipeline_stage(created_ad_id, stage).await
    }

    async fn delete_created_ad(&self, ctx: &RequestContext, created_ad_id: &str) -> Result<()> {
        self.load_created_ad(ctx, created_ad_id)?;
        let removed = self.repository.delete_created_ad(created_ad_id).await?;
        debug!("Deleted created ad {} ({} rows)", created_ad_id, removed);
        Ok(())
    }

    fn get_ad_documents(
        &self,
        ctx: &RequestContext,
        created_ad_id: &str,
    ) -> Result<Vec<AdDocument>> {
        self.load_created_ad(ctx, created_ad_id)?;
        let mut documents = self.repository.list_documents(created_ad_id)?;
        documents.sort_by_key(|d| d.document_type);
        Ok(documents)
    }

    async fn save_ad_document(
        &self,
        ctx: &RequestContext,
        created_ad_id: &str,
        document_type: AdDocumentType,
        content: String,
        source: DocumentEditSource,
    ) -> Result<AdDocument> {
        let created_ad = self.load_created_ad(ctx, created_ad_id)?;
        let now = now_utc();
        let document = match self.repository.get_document(created_ad_id, document_type)? {
            Some(mut existing) => {
                existing.apply_edit(content, source, now);
                existing
            }
            None => {
                warn!(
                    "Saving {} for created ad {} before initialization",
                    document_type, created_ad_id
                );
                AdDocument {
                    id: Uuid::new_v4().to_string(),
                    created_ad_id: created_ad.id,
                    organization_id: created_ad.organization_id,
                    document_type,
                    content,
                    version: INITIAL_DOCUMENT_VERSION,
                    status: AdDocumentStatus::Completed,
                    created_at: now,
                    updated_at: now,
                }
            }
        };
        self.repository.save_document(document).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::RecordingEventSink;
    use std::sync::RwLock;

    #[derive(Default)]
    struct MockAdCreationRepository {
        filters: RwLock<Vec<AdFilter>>,
        ads: RwLock<Vec<CreatedAd>>,
        documents: RwLock<Vec<AdDocument>>,
    }

    #[async_trait]
    impl AdCreationRepositoryTrait for MockAdCreationRepository {
        fn get_filter(&self, filter_id: &str) -> Result<AdFilter> {
            self.filters
                .read()
                .unwrap()
                .iter()
                .find(|f| f.id == filter_id)
                .cloned()
                .ok_or_else(|| Error::NotFound("Filter".to_string()))
        }

        fn list_filters(
            &self,
            category: AdFilterCategory,
            organization_id: &str,
        ) -> Result<Vec<AdFilter>> {
            let mut filters: Vec<AdFilter> = self
                .filters
                .read()
                .unwrap()
                .iter()
                .filter(|f| f.category == category && f.visible_to(organization_id))
                .cloned()
                .collect();
            filters.sort_by(|a, b| a.sort_order.cmp(&b.sort_order).then(a.name.cmp(&b.name)));
            Ok(filters)
        }

        async fn create_filter(&self, filter: AdFilter) -> Result<AdFilter> {
            self.filters.write().unwrap().push(filter.clone());
            Ok(filter)
        }

        async fn delete_filter(&self, filter_id: &str) -> Result<usize> {
            let mut filters = self.filters.write().unwrap();
            let before = filters.len();
            filters.retain(|f| f.id != filter_id);
            Ok(before - filters.len())
        }

        async fn replace_global_filters(
            &self,
            category: AdFilterCategory,
            new_filters: Vec<AdFilter>,
        ) -> Result<usize> {
            let mut filters = self.filters.write().unwrap();
            filters.retain(|f| !(f.category == category && f.is_global()));
            let count = new_filters.len();
            filters.extend(new_filters);
            Ok(count)
        }

        fn get_created_ad(&self, created_ad_id: &str) -> Result<CreatedAd> {
            self.ads
                .read()
                .unwrap()
                .iter()
                .find(|a| a.id == created_ad_id)
                .cloned()
                .ok_or_else(|| Error::NotFound("Created ad".to_string()))
        }

        fn list_created_ads(&self, organization_id: &str) -> Result<Vec<CreatedAd>> {
            Ok(self
                .ads
                .read()
                .unwrap()
                .iter()
                .filter(|a| a.organization_id == organization_id)
                .cloned()
                .collect())
        }

        async fn create_created_ad(&self, created_ad: CreatedAd) -> Result<CreatedAd> {
            self.ads.write().unwrap().push(created_ad.clone());
            Ok(created_ad)
        }

        async fn update_pipeline_stage(
            &self,
            created_ad_id: &str,
            stage: String,
        ) -> Result<CreatedAd> {
            let mut ads = self.ads.write().unwrap();
            let ad = ads.iter_mut().find(|a| a.id == created_ad_id).unwrap();
            ad.pipeline_stage = stage;
            Ok(ad.clone())
        }

        async fn delete_created_ad(&self, created_ad_id: &str) -> Result<usize> {
            self.documents
                .write()
                .unwrap()
                .retain(|d| d.created_ad_id != created_ad_id);
            self.ads.write().unwrap().retain(|a| a.id != created_ad_id);
            Ok(1)
        }

        fn list_documents(&self, created_ad_id: &str) -> Result<Vec<AdDocument>> {
            Ok(self
                .documents
                .read()
                .unwrap()
                .iter()
                .filter(|d| d.created_ad_id == created_ad_id)
                .cloned()
                .collect())
        }

        fn get_document(
            &self,
            created_ad_id: &str,
            document_type: AdDocumentType,
        ) -> Result<Option<AdDocument>> {
            Ok(self
                .documents
                .read()
                .unwrap()
                .iter()
                .find(|d| d.created_ad_id == created_ad_id && d.document_type == document_type)
                .cloned())
        }

        async fn insert_missing_documents(
            &self,
            documents: Vec<AdDocument>,
        ) -> Result<Vec<AdDocument>> {
            self.documents.write().unwrap().extend(documents.clone());
            Ok(documents)
        }

        async fn save_document(&self, document: AdDocument) -> Result<AdDocument> {
            let mut documents = self.documents.write().unwrap();
            documents.retain(|d| d.id != document.id);
            documents.push(document.clone());
            Ok(document)
        }
    }

    fn setup() -> (AdCreationService, RecordingEventSink) {
        let sink = RecordingEventSink::new();
        let service = AdCreationService::new(
            Arc::new(MockAdCreationRepository::default()),
            Arc::new(sink.clone()),
        );
        (service, sink)
    }

    async fn seed_all(service: &AdCreationService) {
        for category in AdFilterCategory::ALL {
            service.seed_filters(category).await.unwrap();
        }
    }

    fn first_ids(service: &AdCreationService, ctx: &RequestContext) -> NewCreatedAd {
        let first = |category| service.list_filters(ctx, category).unwrap()[0].id.clone();
        NewCreatedAd {
            concept_id: first(AdFilterCategory::Concept),
            angle_id: first(AdFilterCategory::Angle),
            style_id: first(AdFilterCategory::Style),
            hook_id: first(AdFilterCategory::Hook),
            selected_desires: vec!["Freedom".to_string()],
            selected_beliefs: vec![],
        }
    }

    fn org_ctx(org: &str) -> RequestContext {
        RequestContext::new("user-1", Some(org.to_string()))
    }

    #[tokio::test]
    async fn seeding_twice_keeps_list_length() {
        let (service, _) = setup();
        let ctx = org_ctx("org-a");
        service.seed_filters(AdFilterCategory::Hook).await.unwrap();
        service.seed_filters(AdFilterCategory::Hook).await.unwrap();
        assert_eq!(
            service.list_filters(&ctx, AdFilterCategory::Hook).unwrap().len(),
            seed_entries(AdFilterCategory::Hook).len()
        );
    }

    #[tokio::test]
    async fn seed_missing_filters_leaves_seeded_categories_alone() {
        let (service, _) = setup();
        let ctx = org_ctx("org-a");
        service.seed_filters(AdFilterCategory::Concept).await.unwrap();
        let concept_ids: Vec<String> = service
            .list_filters(&ctx, AdFilterCategory::Concept)
            .unwrap()
            .into_iter()
            .map(|f| f.id)
            .collect();

        let inserted = service.seed_missing_filters().await.unwrap();
        let expected: usize = [
            AdFilterCategory::Angle,
            AdFilterCategory::Style,
            AdFilterCategory::Hook,
        ]
        .into_iter()
        .map(|c| seed_entries(c).len())
        .sum();
        assert_eq!(inserted, expected);

        let after: Vec<String> = service
            .list_filters(&ctx, AdFilterCategory::Concept)
            .unwrap()
            .into_iter()
            .map(|f| f.id)
            .collect();
        assert_eq!(after, concept_ids);
        assert_eq!(service.seed_missing_filters().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn custom_filters_stay_in_their_organization() {
        let (service, _) = setup();
        let a = org_ctx("org-a");
        let b = org_ctx("org-b");
        let custom = service
            .create_custom_filter(
                &a,
                NewAdFilter {
                    category: AdFilterCategory::Angle,
                    name: "Our angle".to_string(),
                    description: None,
                    sort_order: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(service.list_filters(&a, AdFilterCategory::Angle).unwrap().len(), 1);
        assert!(service.list_filters(&b, AdFilterCategory::Angle).unwrap().is_empty());
        assert!(matches!(
            service.delete_custom_filter(&b, &custom.id).await,
            Err(Error::Unauthorized(_))
        ));
        service.delete_custom_filter(&a, &custom.id).await.unwrap();
    }

    #[tokio::test]
    async fn create_ad_synthesizes_name_and_emits_event() {
        let (service, sink) = setup();
        seed_all(&service).await;
        let ctx = org_ctx("org-a");
        let created = service.create_ad(&ctx, first_ids(&service, &ctx)).await.unwrap();

        assert_eq!(created.name, "Problem / Solution · Save Time · UGC · Question");
        assert_eq!(created.pipeline_stage, "concept");
        assert!(service.get_ad_documents(&ctx, &created.id).unwrap().is_empty());
        assert_eq!(
            sink.events(),
            vec![DomainEvent::created_ad_inserted(
                created.id.clone(),
                "org-a"
            )]
        );
    }

    #[tokio::test]
    async fn create_ad_rejects_wrong_category() {
        let (service, _) = setup();
        seed_all(&service).await;
        let ctx = org_ctx("org-a");
        let mut new_ad = first_ids(&service, &ctx);
        new_ad.hook_id = new_ad.angle_id.clone();
        assert!(matches!(
            service.create_ad(&ctx, new_ad).await,
            Err(Error::Validation(_))
        ));
    }

    #[tokio::test]
    async fn create_ad_requires_organization() {
        let (service, _) = setup();
        seed_all(&service).await;
        let ctx = org_ctx("org-a");
        let new_ad = first_ids(&service, &ctx);
        let no_org = RequestContext::new("user-1", None);
        assert!(matches!(
            service.create_ad(&no_org, new_ad).await,
            Err(Error::NoOrganizationSelected)
        ));
    }

    #[tokio::test]
    async fn initialize_documents_is_idempotent() {
        let (service, sink) = setup();
        seed_all(&service).await;
        let ctx = org_ctx("org-a");
        let created = service.create_ad(&ctx, first_ids(&service, &ctx)).await.unwrap();

        let first = service.initialize_documents(&created.id).await.unwrap();
        assert_eq!(first.len(), 4);
        assert!(first.iter().all(|d| d.version == 1));
        let second = service.initialize_documents(&created.id).await.unwrap();
        assert!(second.is_empty());

        let documents = service.get_ad_documents(&ctx, &created.id).unwrap();
        let types: Vec<_> = documents.iter().map(|d| d.document_type).collect();
        assert_eq!(types, AdDocumentType::ALL.to_vec());
        assert_eq!(
            sink.events().last(),
            Some(&DomainEvent::ad_documents_ready(created.id.clone(), "org-a"))
        );
    }

    #[tokio::test]
    async fn assistant_saves_bump_version_user_saves_do_not() {
        let (service, _) = setup();
        seed_all(&service).await;
        let ctx = org_ctx("org-a");
        let created = service.create_ad(&ctx, first_ids(&service, &ctx)).await.unwrap();
        service.initialize_documents(&created.id).await.unwrap();

        let user_edit = service
            .save_ad_document(
                &ctx,
                &created.id,
                AdDocumentType::AdCopy,
                "mine".to_string(),
                DocumentEditSource::User,
            )
            .await
            .unwrap();
        assert_eq!(user_edit.version, 1);

        let assistant_edit = service
            .save_ad_document(
                &ctx,
                &created.id,
                AdDocumentType::AdCopy,
                "theirs".to_string(),
                DocumentEditSource::Assistant,
            )
            .await
            .unwrap();
        assert_eq!(assistant_edit.version, 2);
        assert_eq!(assistant_edit.id, user_edit.id);
    }

    #[tokio::test]
    async fn other_organizations_cannot_see_created_ads() {
        let (service, _) = setup();
        seed_all(&service).await;
        let a = org_ctx("org-a");
        let b = org_ctx("org-b");
        let created = service.create_ad(&a, first_ids(&service, &a)).await.unwrap();

        assert!(matches!(
            service.get_created_ad(&b, &created.id),
            Err(Error::Unauthorized(_))
        ));
        assert!(service
            .update_pipeline_stage(&b, &created.id, "review".to_string())
            .await
            .is_err());
        assert!(service.delete_created_ad(&b, &created.id).await.is_err());
        assert!(service.list_created_ads(&b).unwrap().is_empty());

        let blank = service
            .update_pipeline_stage(&a, &created.id, "  ".to_string())
            .await;
        assert!(matches!(blank, Err(Error::Validation(_))));
        let moved = service
            .update_pipeline_stage(&a, &created.id, " review ".to_string())
            .await
            .unwrap();
        assert_eq!(moved.pipeline_stage, "review");
    }
}
