#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub app_url: String,
    pub jwt_secret: String,
    pub jwt_maxage: i64,
    pub port: u16,
    // Email service configuration
    pub smtp_host: String,
    pub smtp_username: String,
    pub smtp_password: String,
    pub smtp_from: String,
    // Admin notification settings
    pub admin_notifications_enabled: bool,
    pub admin_emails: Vec<String>,
    // Where release binaries live on disk
    pub releases_dir: String,
}

impl Config {
    pub fn init() -> Config {
        let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
        let jwt_secret = std::env::var("JWT_SECRET_KEY").expect("JWT_SECRET_KEY must be set");
        let jwt_maxage = std::env::var("JWT_MAXAGE").expect("JWT_MAXAGE must be set");
        let app_url = std::env::var("APP_URL").expect("APP_URL must be set");

        let smtp_host = std::env::var("SMTP_HOST").unwrap_or_else(|_| "localhost".to_string());
        let smtp_username = std::env::var("SMTP_USERNAME").unwrap_or_else(|_| "".to_string());
        let smtp_password = std::env::var("SMTP_PASSWORD").unwrap_or_else(|_| "".to_string());
        let smtp_from = std::env::var("SMTP_FROM")
            .unwrap_or_else(|_| "Workhive <noreply@workhive.app>".to_string());

        let admin_notifications_enabled = std::env::var("ADMIN_EMAIL_NOTIFICATIONS")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);
        let admin_emails: Vec<String> = std::env::var("ADMIN_EMAILS")
            .unwrap_or_else(|_| "".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let releases_dir =
            std::env::var("RELEASES_DIR").unwrap_or_else(|_| "media/releases".to_string());

        Config {
            database_url,
            app_url,
            jwt_secret,
            jwt_maxage: jwt_maxage.parse::<i64>().unwrap(),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8000),
            smtp_host,
            smtp_username,
            smtp_password,
            smtp_from,
            admin_notifications_enabled,
            admin_emails,
            releases_dir,
        }
    }
}
