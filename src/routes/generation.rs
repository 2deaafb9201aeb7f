use std::time::Instant;

use axum::{Json, extract::State};

use super::extract::ValidatedJson;
use crate::AppState;
use crate::error::LlmError;
use crate::middleware::BearerAuth;
use crate::models::{
    ApiResponse, BrandTrainData, BrandTrainRequest, ContentData, ContentRequest, ImageData,
    ImageRequest, ProductData, ProductRequest, ResponseMetadata, SeoData, SeoRequest,
};
use crate::prompts::UseCase;
use crate::services::{
    BrandService, ContentService, GenerationService, ImageService, ProductService, SeoService,
};

type Outcome<T> = Result<(T, ResponseMetadata), LlmError>;

/// Wraps a service outcome in the envelope. Failures stay HTTP 200 with
/// `success: false`, so clients always get the same shape.
fn envelope<T>(use_case: UseCase, start: Instant, outcome: Outcome<T>) -> Json<ApiResponse<T>> {
    let latency_ms = start.elapsed().as_millis() as u64;

    match outcome {
        Ok((data, metadata)) => {
            tracing::info!(
                use_case = %use_case,
                tokens_used = metadata.tokens_used,
                latency_ms,
                "Request served"
            );
            Json(ApiResponse::ok(
                data,
                ResponseMetadata {
                    latency_ms,
                    ..metadata
                },
            ))
        }
        Err(err) => {
            tracing::error!(use_case = %use_case, error = %err, latency_ms, "Request failed");
            Json(ApiResponse::failure(
                use_case.error_code(),
                format!("{}: {err}", use_case.failure_message()),
                Some(ResponseMetadata::latency_only(latency_ms)),
            ))
        }
    }
}

pub async fn generate_content(
    State(state): State<AppState>,
    _auth: BearerAuth,
    ValidatedJson(request): ValidatedJson<ContentRequest>,
) -> Json<ApiResponse<ContentData>> {
    let start = Instant::now();
    let outcome = async {
        let mut service = ContentService::new(&state.config.llm)?;
        let data = service.generate(&request).await?;
        Ok::<_, LlmError>((data, service.metadata()))
    }
    .await;
    envelope(UseCase::Content, start, outcome)
}

pub async fn generate_product(
    State(state): State<AppState>,
    _auth: BearerAuth,
    ValidatedJson(request): ValidatedJson<ProductRequest>,
) -> Json<ApiResponse<ProductData>> {
    let start = Instant::now();
    let outcome = async {
        let mut service = ProductService::new(&state.config.llm)?;
        let data = service.generate(&request).await?;
        Ok::<_, LlmError>((data, service.metadata()))
    }
    .await;
    envelope(UseCase::Product, start, outcome)
}

pub async fn optimize_seo(
    State(state): State<AppState>,
    _auth: BearerAuth,
    ValidatedJson(request): ValidatedJson<SeoRequest>,
) -> Json<ApiResponse<SeoData>> {
    let start = Instant::now();
    let outcome = async {
        let mut service = SeoService::new(&state.config.llm)?;
        let data = service.optimize(&request).await?;
        Ok::<_, LlmError>((data, service.metadata()))
    }
    .await;
    envelope(UseCase::Seo, start, outcome)
}

pub async fn analyze_image(
    State(state): State<AppState>,
    _auth: BearerAuth,
    ValidatedJson(request): ValidatedJson<ImageRequest>,
) -> Json<ApiResponse<ImageData>> {
    let start = Instant::now();
    let outcome = async {
        let mut service = ImageService::new(&state.config.llm)?;
        let data = service.analyze(&request).await?;
        Ok::<_, LlmError>((data, service.metadata()))
    }
    .await;
    envelope(UseCase::Image, start, outcome)
}

pub async fn train_brand(
    State(state): State<AppState>,
    _auth: BearerAuth,
    ValidatedJson(request): ValidatedJson<BrandTrainRequest>,
) -> Json<ApiResponse<BrandTrainData>> {
    let start = Instant::now();
    let outcome = async {
        let mut service = BrandService::new(&state.config.llm)?;
        let data = service.train(&request).await?;
        Ok::<_, LlmError>((data, service.metadata()))
    }
    .await;
    envelope(UseCase::Brand, start, outcome)
}
