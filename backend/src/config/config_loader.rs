use anyhow::Result;

use super::config_model::{Auth, Database, DotEnvyConfig, Media, Payments, Realtime, Server};

const DEFAULT_YOOKASSA_API_URL: &str = "https://api.yookassa.ru/v3";
const DEFAULT_MAX_IMAGE_BYTES: u64 = 5 * 1024 * 1024;
const DEFAULT_MAX_FILES: usize = 10;

pub fn load() -> Result<DotEnvyConfig> {
    dotenvy::dotenv().ok();

    let server = Server {
        port: std::env::var("SERVER_PORT")
            .expect("SERVER_PORT is invalid")
            .parse()?,
        body_limit: std::env::var("SERVER_BODY_LIMIT")
            .expect("SERVER_BODY_LIMIT is invalid")
            .parse()?,
        timeout: std::env::var("SERVER_TIMEOUT")
            .expect("SERVER_TIMEOUT is invalid")
            .parse()?,
    };

    let database = Database {
        url: std::env::var("DATABASE_URL").expect("DATABASE_URL is invalid"),
    };

    let auth = Auth {
        jwt_secret: std::env::var("JWT_SECRET").expect("JWT_SECRET is invalid"),
    };

    let payments = Payments {
        shop_id: std::env::var("YOOKASSA_SHOP_ID").expect("YOOKASSA_SHOP_ID is invalid"),
        secret_key: std::env::var("YOOKASSA_SECRET_KEY").expect("YOOKASSA_SECRET_KEY is invalid"),
        api_url: std::env::var("YOOKASSA_API_URL")
            .unwrap_or_else(|_| DEFAULT_YOOKASSA_API_URL.to_string()),
    };

    let realtime = Realtime {
        api_url: std::env::var("CENTRIFUGO_API_URL").expect("CENTRIFUGO_API_URL is invalid"),
        api_key: std::env::var("CENTRIFUGO_API_KEY").expect("CENTRIFUGO_API_KEY is invalid"),
    };

    let media = Media {
        root: std::env::var("MEDIA_ROOT").unwrap_or_else(|_| "media".to_string()),
        max_image_bytes: std::env::var("MEDIA_MAX_IMAGE_BYTES")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(DEFAULT_MAX_IMAGE_BYTES),
        max_files: std::env::var("MEDIA_MAX_FILES")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(DEFAULT_MAX_FILES),
    };

    Ok(DotEnvyConfig {
        server,
        database,
        auth,
        payments,
        realtime,
        media,
    })
}

pub fn get_jwt_secret() -> Result<String> {
    dotenvy::dotenv().ok();

    Ok(std::env::var("JWT_SECRET").expect("JWT_SECRET is invalid"))
}
