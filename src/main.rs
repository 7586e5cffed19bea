mod config;
mod event;
mod format;
mod github;
mod hooks;
mod http;
mod notifier;

use actix::Actor;
use actix_web::{middleware::Logger, web, App, HttpServer};
use color_eyre::eyre;
use tracing_subscriber::EnvFilter;

use crate::notifier::Notification;

#[actix_web::main]
async fn main() -> eyre::Result<()> {
    dotenv::dotenv().ok();
    color_eyre::install()?;
    tracing_log::LogTracer::init()?;
    tracing::subscriber::set_global_default(
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .finish(),
    )?;

    let config::Config {
        listen_addr,
        discord_bot_token,
        discord_channel_id,
        discord_api_url,
        slack_bot_token,
        slack_channel_id,
        slack_api_url,
    } = envy::from_env()?;

    let notifier = notifier::Notifier::new(notifier::Config {
        discord_token: discord_bot_token,
        discord_channel: discord_channel_id,
        discord_api_url,
        slack_token: slack_bot_token,
        slack_channel: slack_channel_id,
        slack_api_url,
    })
    .start()
    .recipient::<Notification>();

    tracing::info!("Listening on {}", listen_addr);
    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(notifier.clone()))
            .wrap(Logger::default())
            .configure(hooks::configure)
    })
    .bind(listen_addr.as_str())?
    .run()
    .await
    .map_err(Into::into)
}
