use std::fs;

use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tokio::time::{sleep, Duration};

use crate::config::Config;

const MAX_RETRIES: u32 = 3;
const RETRY_DELAY_MS: u64 = 1000;

pub async fn send_email(
    config: &Config,
    to_email: &str,
    subject: &str,
    template_path: &str,
    placeholders: &[(String, String)],
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    if to_email.is_empty() {
        return Err("Email recipient cannot be empty".into());
    }
    if !to_email.contains('@') {
        return Err(format!("Invalid email address: {}", to_email).into());
    }

    let mut html_template = match fs::read_to_string(template_path) {
        Ok(content) => content,
        Err(e) => {
            tracing::error!("Failed to read email template {}: {}", template_path, e);
            return Err(format!("Template not found: {}", template_path).into());
        }
    };

    for (key, value) in placeholders {
        html_template = html_template.replace(key, value);
    }

    send_with_retries(config, to_email, subject, &html_template).await
}

async fn send_with_retries(
    config: &Config,
    to_email: &str,
    subject: &str,
    html_body: &str,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let mut last_error = None;

    for attempt in 1..=MAX_RETRIES {
        match send_via_smtp(config, to_email, subject, html_body).await {
            Ok(()) => {
                tracing::info!("Email sent to {}", to_email);
                return Ok(());
            }
            Err(e) => {
                last_error = Some(e);
                if attempt < MAX_RETRIES {
                    let delay = RETRY_DELAY_MS * (2_u64.pow(attempt - 1));
                    tracing::warn!(
                        "Email send attempt {} failed for {}. Retrying in {}ms",
                        attempt,
                        to_email,
                        delay
                    );
                    sleep(Duration::from_millis(delay)).await;
                }
            }
        }
    }

    let error_msg = last_error
        .map(|e| format!("Failed after {} retries: {}", MAX_RETRIES, e))
        .unwrap_or_else(|| "Unknown email sending error".to_string());

    tracing::error!("Email failed for {}: {}", to_email, error_msg);
    Err(error_msg.into())
}

async fn send_via_smtp(
    config: &Config,
    to_email: &str,
    subject: &str,
    html_body: &str,
) -> Result<(), String> {
    let message = Message::builder()
        .from(
            config
                .smtp_from
                .parse()
                .map_err(|e| format!("Invalid from address: {}", e))?,
        )
        .to(to_email
            .parse()
            .map_err(|e| format!("Invalid to address: {}", e))?)
        .subject(subject)
        .header(ContentType::TEXT_HTML)
        .body(html_body.to_string())
        .map_err(|e| format!("Failed to build message: {}", e))?;

    let mailer: AsyncSmtpTransport<Tokio1Executor> =
        AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)
            .map_err(|e| format!("SMTP relay error: {}", e))?
            .credentials(Credentials::new(
                config.smtp_username.clone(),
                config.smtp_password.clone(),
            ))
            .build();

    mailer
        .send(message)
        .await
        .map(|_| ())
        .map_err(|e| format!("SMTP send error: {}", e))
}
