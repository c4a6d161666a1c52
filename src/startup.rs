use crate::configuration::Settings;
use crate::middleware;
use crate::routes;
use crate::services::{StripeClient, SummarizerClient, SummaryEngine};
use actix_cors::Cors;
use actix_web::{dev::Server, error, http, web, App, HttpServer};
use sqlx::{Pool, Postgres};
use std::net::TcpListener;
use std::sync::Arc;
use std::time::Duration;
use tracing_actix_web::TracingLogger;

pub async fn run(
    listener: TcpListener,
    pg_pool: Pool<Postgres>,
    settings: Settings,
) -> Result<Server, std::io::Error> {
    let summarizer: Arc<dyn SummaryEngine> = Arc::new(SummarizerClient::new(&settings.summarizer));
    let summarizer = web::Data::new(summarizer);

    let stripe_client = web::Data::new(StripeClient::new(&settings.billing.secret_key));

    let settings = web::Data::new(settings);
    let pg_pool = web::Data::new(pg_pool);

    let oauth_http_client = reqwest::Client::builder()
        .pool_idle_timeout(Duration::from_secs(90))
        .build()
        .map_err(|err| std::io::Error::new(std::io::ErrorKind::Other, err))?;
    let oauth_http_client = web::Data::new(oauth_http_client);

    let oauth_cache = web::Data::new(middleware::authentication::OAuthCache::new(
        Duration::from_secs(60),
    ));

    let json_config = web::JsonConfig::default().error_handler(|err, _req| {
        let msg: String = match err {
            error::JsonPayloadError::Deserialize(err) => format!(
                "{{\"kind\":\"deserialize\",\"line\":{}, \"column\":{}, \"msg\":\"{}\"}}",
                err.line(),
                err.column(),
                err
            ),
            _ => format!("{{\"kind\":\"other\",\"msg\":\"{}\"}}", err),
        };
        error::InternalError::new(msg, http::StatusCode::BAD_REQUEST).into()
    });

    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .wrap(middleware::authentication::Manager::new())
            .wrap(actix_web::middleware::Compress::default())
            .wrap(Cors::permissive())
            .service(web::scope("/health_check").service(routes::health_check))
            .service(
                web::scope("/plan")
                    .service(routes::plan::list_handler)
                    .service(routes::plan::item_handler),
            )
            .service(web::scope("/usage").service(routes::usage::summary_handler))
            .service(
                web::scope("/document")
                    .service(routes::document::batch_handler)
                    .service(routes::document::add_handler)
                    .service(routes::document::list_handler)
                    .service(routes::document::ask_handler)
                    .service(routes::document::history_handler)
                    .service(routes::document::item_handler),
            )
            .service(
                web::scope("/billing")
                    .service(routes::billing::checkout_handler)
                    .service(routes::billing::portal_handler)
                    .service(routes::billing::webhook_handler),
            )
            .app_data(json_config.clone())
            .app_data(pg_pool.clone())
            .app_data(settings.clone())
            .app_data(oauth_http_client.clone())
            .app_data(oauth_cache.clone())
            .app_data(summarizer.clone())
            .app_data(stripe_client.clone())
    })
    .listen(listener)?
    .run();

    Ok(server)
}
