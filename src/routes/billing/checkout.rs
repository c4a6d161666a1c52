use crate::configuration::Settings;
use crate::db;
use crate::forms;
use crate::helpers::JsonResponse;
use crate::models;
use crate::services::billing::{CheckoutSession, PortalSession};
use crate::services::StripeClient;
use actix_web::{post, web, Responder, Result};
use sqlx::PgPool;
use std::sync::Arc;

#[tracing::instrument(name = "Create checkout session.", skip(settings, stripe))]
#[post("/checkout")]
pub async fn checkout_handler(
    user: web::ReqData<Arc<models::User>>,
    form: web::Json<forms::CheckoutForm>,
    settings: web::Data<Settings>,
    stripe: web::Data<StripeClient>,
) -> Result<impl Responder> {
    let form = form.into_inner();
    let price_id = settings
        .billing
        .price_id(form.tier, form.interval)
        .ok_or_else(|| {
            JsonResponse::<CheckoutSession>::build()
                .bad_request("The free tier does not require checkout")
        })?;

    stripe
        .create_checkout_session(
            price_id,
            form.tier.as_str(),
            &user.email,
            &user.id,
            &settings.billing.checkout_success_url,
            &settings.billing.checkout_cancel_url,
        )
        .await
        .map_err(|err| {
            tracing::error!("Failed to create checkout session: {}", err);
            JsonResponse::<CheckoutSession>::build()
                .internal_server_error("Failed to create checkout session")
        })
        .map(|session| JsonResponse::build().set_item(session).ok("OK"))
}

#[tracing::instrument(name = "Create billing portal session.", skip(pg_pool, settings, stripe))]
#[post("/portal")]
pub async fn portal_handler(
    user: web::ReqData<Arc<models::User>>,
    pg_pool: web::Data<PgPool>,
    settings: web::Data<Settings>,
    stripe: web::Data<StripeClient>,
) -> Result<impl Responder> {
    let subscription = db::subscription::fetch_by_user(pg_pool.get_ref(), &user.id)
        .await
        .map_err(|err| JsonResponse::<PortalSession>::build().internal_server_error(err))?
        .ok_or_else(|| {
            JsonResponse::<PortalSession>::build().not_found("No subscription on file")
        })?;

    let customer_id = subscription.stripe_customer_id.ok_or_else(|| {
        JsonResponse::<PortalSession>::build().bad_request("No billing account on file")
    })?;

    stripe
        .create_portal_session(&customer_id, &settings.billing.portal_return_url)
        .await
        .map_err(|err| {
            tracing::error!("Failed to create portal session: {}", err);
            JsonResponse::<PortalSession>::build()
                .internal_server_error("Failed to create portal session")
        })
        .map(|session| JsonResponse::build().set_item(session).ok("OK"))
}
