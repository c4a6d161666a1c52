use crate::helpers::JsonResponse;
use crate::models::{PlanFeatures, PricingTier};
use actix_web::{get, web, Responder, Result};

#[tracing::instrument(name = "List plan catalog.")]
#[get("")]
pub async fn list_handler() -> Result<impl Responder> {
    let plans: Vec<PlanFeatures> = PricingTier::ALL.iter().map(|tier| *tier.plan()).collect();
    Ok(JsonResponse::build().set_list(plans).ok("OK"))
}

#[tracing::instrument(name = "Get plan by tier.")]
#[get("/{tier}")]
pub async fn item_handler(path: web::Path<(String,)>) -> Result<impl Responder> {
    let tier = path
        .into_inner()
        .0
        .parse::<PricingTier>()
        .map_err(|err| JsonResponse::<PlanFeatures>::build().bad_request(err))?;

    Ok(JsonResponse::build().set_item(*tier.plan()).ok("OK"))
}
