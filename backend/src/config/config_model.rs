#[derive(Debug, Clone)]
pub struct DotEnvyConfig {
    pub server: Server,
    pub database: Database,
    pub auth: Auth,
    pub payments: Payments,
    pub realtime: Realtime,
    pub media: Media,
}

#[derive(Debug, Clone)]
pub struct Server {
    pub port: u16,
    pub body_limit: u64,
    pub timeout: u64,
}

#[derive(Debug, Clone)]
pub struct Database {
    pub url: String,
}

#[derive(Debug, Clone)]
pub struct Auth {
    pub jwt_secret: String,
}

#[derive(Debug, Clone)]
pub struct Payments {
    pub shop_id: String,
    pub secret_key: String,
    pub api_url: String,
}

#[derive(Debug, Clone)]
pub struct Realtime {
    pub api_url: String,
    pub api_key: String,
}

#[derive(Debug, Clone)]
pub struct Media {
    pub root: String,
    pub max_image_bytes: u64,
    pub max_files: usize,
}
