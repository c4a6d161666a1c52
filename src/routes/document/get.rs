use crate::db;
use crate::helpers::JsonResponse;
use crate::models;
use actix_web::{get, web, Responder, Result};
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

#[tracing::instrument(name = "List documents.", skip(pg_pool))]
#[get("")]
pub async fn list_handler(
    user: web::ReqData<Arc<models::User>>,
    pg_pool: web::Data<PgPool>,
) -> Result<impl Responder> {
    db::document::fetch_by_user(pg_pool.get_ref(), &user.id)
        .await
        .map_err(|err| JsonResponse::<models::Document>::build().internal_server_error(err))
        .map(|documents| JsonResponse::build().set_list(documents).ok("OK"))
}

#[tracing::instrument(name = "Get document.", skip(pg_pool))]
#[get("/{id}")]
pub async fn item_handler(
    user: web::ReqData<Arc<models::User>>,
    path: web::Path<(Uuid,)>,
    pg_pool: web::Data<PgPool>,
) -> Result<impl Responder> {
    let id = path.into_inner().0;
    db::document::fetch_one(pg_pool.get_ref(), id, &user.id)
        .await
        .map_err(|err| JsonResponse::<models::Document>::build().internal_server_error(err))?
        .ok_or_else(|| JsonResponse::<models::Document>::build().not_found("Document not found"))
        .map(|document| JsonResponse::build().set_item(document).ok("OK"))
}
