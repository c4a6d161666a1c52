use crate::db;
use crate::forms;
use crate::helpers::JsonResponse;
use crate::models::{self, UsageKind};
use crate::services::entitlement;
use crate::services::SummaryEngine;
use actix_web::{post, web, Responder, Result};
use serde_valid::Validate;
use sqlx::PgPool;
use std::sync::Arc;

use super::{guard_api_call, spawn_summarization};

#[tracing::instrument(name = "Add document.", skip(form, pg_pool, summarizer))]
#[post("")]
pub async fn add_handler(
    user: web::ReqData<Arc<models::User>>,
    form: web::Json<forms::DocumentForm>,
    pg_pool: web::Data<PgPool>,
    summarizer: web::Data<Arc<dyn SummaryEngine>>,
) -> Result<impl Responder> {
    let form = form.into_inner();
    form.validate()
        .map_err(|errors| JsonResponse::<models::Document>::build().bad_request(errors))?;

    let tier = db::subscription::tier_for_user(pg_pool.get_ref(), &user.id)
        .await
        .map_err(|err| JsonResponse::<models::Document>::build().internal_server_error(err))?;

    let today = db::usage::today_count(pg_pool.get_ref(), &user.id, UsageKind::DocumentUpload)
        .await
        .map_err(|err| JsonResponse::<models::Document>::build().internal_server_error(err))?;

    if !entitlement::check_daily_pdf_limit(tier, today.max(0) as u32) {
        return Err(JsonResponse::<models::Document>::build().forbidden(
            "Daily document limit reached. Upgrade your plan to process more documents.",
        ));
    }

    if !entitlement::within_page_limit(tier, form.page_count) {
        return Err(JsonResponse::<models::Document>::build()
            .forbidden("This document exceeds your plan's page limit."));
    }

    guard_api_call(pg_pool.get_ref(), &user.id, tier).await?;

    let document = db::document::insert(pg_pool.get_ref(), &user.id, &form)
        .await
        .map_err(|err| JsonResponse::<models::Document>::build().internal_server_error(err))?;

    db::usage::increment(pg_pool.get_ref(), &user.id, UsageKind::DocumentUpload)
        .await
        .map_err(|err| JsonResponse::<models::Document>::build().internal_server_error(err))?;

    tracing::info!("New document {} accepted for summarization", document.id);
    spawn_summarization(
        pg_pool.get_ref().clone(),
        summarizer.get_ref().clone(),
        document.id,
        form.text,
    );

    Ok(JsonResponse::build()
        .set_id(document.id)
        .set_item(document)
        .ok("Accepted"))
}

#[tracing::instrument(name = "Add document batch.", skip(form, pg_pool, summarizer))]
#[post("/batch")]
pub async fn batch_handler(
    user: web::ReqData<Arc<models::User>>,
    form: web::Json<forms::BatchUploadForm>,
    pg_pool: web::Data<PgPool>,
    summarizer: web::Data<Arc<dyn SummaryEngine>>,
) -> Result<impl Responder> {
    let form = form.into_inner();
    form.validate()
        .map_err(|errors| JsonResponse::<models::Document>::build().bad_request(errors))?;

    let tier = db::subscription::tier_for_user(pg_pool.get_ref(), &user.id)
        .await
        .map_err(|err| JsonResponse::<models::Document>::build().internal_server_error(err))?;

    let today = db::usage::today_count(pg_pool.get_ref(), &user.id, UsageKind::DocumentUpload)
        .await
        .map_err(|err| JsonResponse::<models::Document>::build().internal_server_error(err))?;

    let batch_len = u32::try_from(form.documents.len()).unwrap_or(u32::MAX);
    if !entitlement::can_batch_upload(tier, today.max(0) as u32, batch_len) {
        return Err(JsonResponse::<models::Document>::build().forbidden(
            "Batch upload is not available on your plan, or the batch exceeds your daily limit.",
        ));
    }

    for document in form.documents.iter() {
        if !entitlement::within_page_limit(tier, document.page_count) {
            return Err(JsonResponse::<models::Document>::build().forbidden(format!(
                "{} exceeds your plan's page limit.",
                document.file_name
            )));
        }
    }

    guard_api_call(pg_pool.get_ref(), &user.id, tier).await?;

    let mut accepted = Vec::with_capacity(form.documents.len());
    for document_form in form.documents.into_iter() {
        let document = db::document::insert(pg_pool.get_ref(), &user.id, &document_form)
            .await
            .map_err(|err| JsonResponse::<models::Document>::build().internal_server_error(err))?;

        spawn_summarization(
            pg_pool.get_ref().clone(),
            summarizer.get_ref().clone(),
            document.id,
            document_form.text,
        );
        accepted.push(document);
    }

    db::usage::increment_by(
        pg_pool.get_ref(),
        &user.id,
        UsageKind::DocumentUpload,
        accepted.len() as i32,
    )
    .await
    .map_err(|err| JsonResponse::<models::Document>::build().internal_server_error(err))?;

    Ok(JsonResponse::build().set_list(accepted).ok("Accepted"))
}
