use std::sync::Arc;

use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};
use adscout_core::{
    ad_creation::{AdCreationService, AdCreationServiceTrait},
    ads::{AdService, AdServiceTrait},
    advertisers::{AdvertiserService, AdvertiserServiceTrait},
    canvas::{CanvasService, CanvasServiceTrait},
    events::DomainEventSink,
    onboarding::{OnboardingService, OnboardingServiceTrait},
    organizations::{OrganizationService, OrganizationServiceTrait},
    profile::{ProfileService, ProfileServiceTrait},
    subscriptions::{SubscriptionService, SubscriptionServiceTrait},
};
use adscout_storage_sqlite::{
    ad_creation::AdCreationRepository,
    ads::AdRepository,
    advertisers::AdvertiserRepository,
    canvas::CanvasRepository,
    db,
    onboarding::OnboardingRepository,
    organizations::OrganizationRepository,
    profile::ProfileRepository,
    subscriptions::SubscriptionRepository,
};

use crate::{auth::AuthManager, config::Config, domain_events::WebDomainEventSink, events::EventBus};

pub struct AppState {
    pub organization_service: Arc<dyn OrganizationServiceTrait>,
    pub profile_service: Arc<dyn ProfileServiceTrait>,
    pub subscription_service: Arc<dyn SubscriptionServiceTrait>,
    pub ad_service: Arc<dyn AdServiceTrait>,
    pub advertiser_service: Arc<dyn AdvertiserServiceTrait>,
    pub ad_creation_service: Arc<dyn AdCreationServiceTrait>,
    pub onboarding_service: Arc<dyn OnboardingServiceTrait>,
    pub canvas_service: Arc<dyn CanvasServiceTrait>,
    pub event_bus: EventBus,
    pub auth: Arc<AuthManager>,
    pub filter_admins: Vec<String>,
}

pub fn init_tracing() {
    let log_format = std::env::var("ADSCOUT_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let db_path = db::init(&config.db_path)?;
    tracing::info!("Database path in use: {}", db_path);

    let pool = db::create_pool(&db_path)?;
    db::run_migrations(&pool)?;
    let writer = db::spawn_writer((*pool).clone());

    // The sink buffers events until the worker is started below.
    let domain_event_sink = Arc::new(WebDomainEventSink::new());
    let event_sink: Arc<dyn DomainEventSink> = domain_event_sink.clone();

    let organization_repository =
        Arc::new(OrganizationRepository::new(pool.clone(), writer.clone()));
    let organization_service: Arc<dyn OrganizationServiceTrait> =
        Arc::new(OrganizationService::new(organization_repository));

    let profile_repository = Arc::new(ProfileRepository::new(pool.clone(), writer.clone()));
    let profile_service: Arc<dyn ProfileServiceTrait> = Arc::new(ProfileService::new(
        profile_repository,
        organization_service.clone(),
    ));

    let subscription_repository =
        Arc::new(SubscriptionRepository::new(pool.clone(), writer.clone()));
    let subscription_service: Arc<dyn SubscriptionServiceTrait> = Arc::new(
        SubscriptionService::new(subscription_repository.clone(), event_sink.clone()),
    );

    let ad_repository = Arc::new(AdRepository::new(pool.clone(), writer.clone()));
    let ad_service: Arc<dyn AdServiceTrait> =
        Arc::new(AdService::new(ad_repository, subscription_repository));

    let advertiser_repository = Arc::new(AdvertiserRepository::new(pool.clone(), writer.clone()));
    let advertiser_service: Arc<dyn AdvertiserServiceTrait> =
        Arc::new(AdvertiserService::new(advertiser_repository));

    let ad_creation_repository =
        Arc::new(AdCreationRepository::new(pool.clone(), writer.clone()));
    let ad_creation_service: Arc<dyn AdCreationServiceTrait> = Arc::new(
        AdCreationService::new(ad_creation_repository, event_sink.clone()),
    );
    let seeded = ad_creation_service.seed_missing_filters().await?;
    if seeded > 0 {
        tracing::info!("Seeded {} global ad filters", seeded);
    }

    let onboarding_repository = Arc::new(OnboardingRepository::new(pool.clone(), writer.clone()));
    let onboarding_service: Arc<dyn OnboardingServiceTrait> = Arc::new(OnboardingService::new(
        onboarding_repository,
        event_sink.clone(),
    ));

    let canvas_repository = Arc::new(CanvasRepository::new(pool.clone(), writer.clone()));
    let canvas_service: Arc<dyn CanvasServiceTrait> =
        Arc::new(CanvasService::new(canvas_repository, event_sink));

    let event_bus = EventBus::new(256);
    domain_event_sink.start_worker(ad_creation_service.clone(), event_bus.clone());

    Ok(Arc::new(AppState {
        organization_service,
        profile_service,
        subscription_service,
        ad_service,
        advertiser_service,
        ad_creation_service,
        onboarding_service,
        canvas_service,
        event_bus,
        auth: Arc::new(AuthManager::new(&config.jwt_secret)),
        filter_admins: config.filter_admins.clone(),
    }))
}
