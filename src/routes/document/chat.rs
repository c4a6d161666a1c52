use crate::db;
use crate::forms;
use crate::helpers::JsonResponse;
use crate::models::{self, ROLE_ASSISTANT, ROLE_USER, STATUS_READY};
use crate::services::entitlement;
use crate::services::summarizer::ChatTurn;
use crate::services::SummaryEngine;
use actix_web::{get, post, web, Responder, Result};
use serde_valid::Validate;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use super::guard_api_call;

#[tracing::instrument(name = "Ask document question.", skip(form, pg_pool, summarizer))]
#[post("/{id}/chat")]
pub async fn ask_handler(
    user: web::ReqData<Arc<models::User>>,
    path: web::Path<(Uuid,)>,
    form: web::Json<forms::ChatForm>,
    pg_pool: web::Data<PgPool>,
    summarizer: web::Data<Arc<dyn SummaryEngine>>,
) -> Result<impl Responder> {
    let form = form.into_inner();
    form.validate()
        .map_err(|errors| JsonResponse::<models::ChatMessage>::build().bad_request(errors))?;

    let id = path.into_inner().0;
    let document = db::document::fetch_one(pg_pool.get_ref(), id, &user.id)
        .await
        .map_err(|err| JsonResponse::<models::ChatMessage>::build().internal_server_error(err))?
        .ok_or_else(|| {
            JsonResponse::<models::ChatMessage>::build().not_found("Document not found")
        })?;

    if document.status != STATUS_READY {
        return Err(JsonResponse::<models::ChatMessage>::build()
            .bad_request("Document is not ready for chat yet"));
    }

    let tier = db::subscription::tier_for_user(pg_pool.get_ref(), &user.id)
        .await
        .map_err(|err| JsonResponse::<models::ChatMessage>::build().internal_server_error(err))?;

    let asked = db::chat::question_count(pg_pool.get_ref(), document.id)
        .await
        .map_err(|err| JsonResponse::<models::ChatMessage>::build().internal_server_error(err))?;

    let asked = u32::try_from(asked).unwrap_or(u32::MAX);
    if !entitlement::check_chat_question_limit(tier, asked) {
        return Err(JsonResponse::<models::ChatMessage>::build().forbidden(
            "Chat question limit reached for this document. Upgrade your plan to keep asking.",
        ));
    }

    guard_api_call(pg_pool.get_ref(), &user.id, tier).await?;

    let summary = document.summary.as_deref().unwrap_or_default();
    let history: Vec<ChatTurn> = db::chat::fetch_for_document(pg_pool.get_ref(), document.id)
        .await
        .map_err(|err| JsonResponse::<models::ChatMessage>::build().internal_server_error(err))?
        .into_iter()
        .map(|message| ChatTurn {
            role: message.role,
            content: message.content,
        })
        .collect();

    let answer = summarizer
        .answer(summary, &history, &form.question)
        .await
        .map_err(|err| {
            tracing::error!("Failed to answer question: {}", err);
            JsonResponse::<models::ChatMessage>::build()
                .internal_server_error("Failed to answer the question")
        })?;

    // The question only counts once it has been answered.
    db::chat::insert(
        pg_pool.get_ref(),
        document.id,
        &user.id,
        ROLE_USER,
        &form.question,
    )
    .await
    .map_err(|err| JsonResponse::<models::ChatMessage>::build().internal_server_error(err))?;

    db::chat::insert(
        pg_pool.get_ref(),
        document.id,
        &user.id,
        ROLE_ASSISTANT,
        &answer,
    )
    .await
    .map_err(|err| JsonResponse::<models::ChatMessage>::build().internal_server_error(err))
    .map(|message| JsonResponse::build().set_item(message).ok("OK"))
}

#[tracing::instrument(name = "Get chat history.", skip(pg_pool))]
#[get("/{id}/chat")]
pub async fn history_handler(
    user: web::ReqData<Arc<models::User>>,
    path: web::Path<(Uuid,)>,
    pg_pool: web::Data<PgPool>,
) -> Result<impl Responder> {
    let id = path.into_inner().0;
    db::document::fetch_one(pg_pool.get_ref(), id, &user.id)
        .await
        .map_err(|err| JsonResponse::<models::ChatMessage>::build().internal_server_error(err))?
        .ok_or_else(|| {
            JsonResponse::<models::ChatMessage>::build().not_found("Document not found")
        })?;

    db::chat::fetch_for_document(pg_pool.get_ref(), id)
        .await
        .map_err(|err| JsonResponse::<models::ChatMessage>::build().internal_server_error(err))
        .map(|messages| JsonResponse::build().set_list(messages).ok("OK"))
}
