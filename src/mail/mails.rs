use super::sendmail::send_email;
use crate::config::Config;

type MailResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

pub async fn send_verification_email(
    config: &Config,
    to_email: &str,
    name: &str,
    token: &str,
) -> MailResult {
    let subject = "Verify your email";
    let template_path = "src/mail/templates/Verification-email.html";
    let verification_link = format!("{}/api/auth/verify?token={}", config.app_url, token);
    let placeholders = vec![
        ("{{name}}".to_string(), name.to_string()),
        ("{{verification_link}}".to_string(), verification_link),
    ];

    send_email(config, to_email, subject, template_path, &placeholders).await
}

pub async fn send_welcome_email(config: &Config, to_email: &str, name: &str) -> MailResult {
    let subject = "Welcome to WorkHive";
    let template_path = "src/mail/templates/Welcome-email.html";
    let placeholders = vec![
        ("{{name}}".to_string(), name.to_string()),
        ("{{app_url}}".to_string(), config.app_url.clone()),
    ];

    send_email(config, to_email, subject, template_path, &placeholders).await
}

pub async fn send_new_message_email(
    config: &Config,
    to_email: &str,
    sender_name: &str,
    preview: &str,
) -> MailResult {
    let subject = "New message on WorkHive";
    let template_path = "src/mail/templates/New-message.html";
    let placeholders = vec![
        ("{{sender_name}}".to_string(), sender_name.to_string()),
        ("{{preview}}".to_string(), truncate(preview, 120)),
        ("{{app_url}}".to_string(), config.app_url.clone()),
    ];

    send_email(config, to_email, subject, template_path, &placeholders).await
}

pub async fn send_support_chat_email(
    config: &Config,
    to_email: &str,
    user_name: &str,
) -> MailResult {
    let subject = "New support conversation";
    let template_path = "src/mail/templates/Support-chat.html";
    let placeholders = vec![
        ("{{user_name}}".to_string(), user_name.to_string()),
        ("{{app_url}}".to_string(), config.app_url.clone()),
    ];

    send_email(config, to_email, subject, template_path, &placeholders).await
}

pub async fn send_project_offer_email(
    config: &Config,
    to_email: &str,
    freelancer_name: &str,
    project_title: &str,
    client_name: &str,
    offer_amount: &str,
) -> MailResult {
    let subject = format!("New offer on \"{}\"", project_title);
    let template_path = "src/mail/templates/Project-offer.html";
    let placeholders = vec![
        ("{{name}}".to_string(), freelancer_name.to_string()),
        ("{{project_title}}".to_string(), project_title.to_string()),
        ("{{client_name}}".to_string(), client_name.to_string()),
        ("{{offer_amount}}".to_string(), offer_amount.to_string()),
        ("{{app_url}}".to_string(), config.app_url.clone()),
    ];

    send_email(config, to_email, &subject, template_path, &placeholders).await
}

pub async fn send_offer_response_email(
    config: &Config,
    to_email: &str,
    client_name: &str,
    project_title: &str,
    accepted: bool,
    response_message: Option<&str>,
) -> MailResult {
    let subject = if accepted {
        format!("Your offer on \"{}\" was accepted", project_title)
    } else {
        format!("Update on your offer for \"{}\"", project_title)
    };
    let template_path = "src/mail/templates/Offer-response.html";
    let placeholders = vec![
        ("{{client_name}}".to_string(), client_name.to_string()),
        ("{{project_title}}".to_string(), project_title.to_string()),
        (
            "{{outcome}}".to_string(),
            if accepted { "accepted" } else { "declined" }.to_string(),
        ),
        (
            "{{response_message}}".to_string(),
            response_message.unwrap_or("").to_string(),
        ),
    ];

    send_email(config, to_email, &subject, template_path, &placeholders).await
}

pub async fn send_chat_offer_email(
    config: &Config,
    to_email: &str,
    sender_name: &str,
    title: &str,
    budget: &str,
) -> MailResult {
    let subject = "You received a project offer";
    let template_path = "src/mail/templates/Chat-offer.html";
    let placeholders = vec![
        ("{{sender_name}}".to_string(), sender_name.to_string()),
        ("{{title}}".to_string(), title.to_string()),
        ("{{budget}}".to_string(), budget.to_string()),
        ("{{app_url}}".to_string(), config.app_url.clone()),
    ];

    send_email(config, to_email, subject, template_path, &placeholders).await
}

pub async fn send_contact_notification_email(
    config: &Config,
    to_email: &str,
    contact_name: &str,
    contact_subject: &str,
) -> MailResult {
    let subject = "New contact message";
    let template_path = "src/mail/templates/Contact-notification.html";
    let placeholders = vec![
        ("{{contact_name}}".to_string(), contact_name.to_string()),
        ("{{subject}}".to_string(), contact_subject.to_string()),
        ("{{app_url}}".to_string(), config.app_url.clone()),
    ];

    send_email(config, to_email, subject, template_path, &placeholders).await
}

pub async fn send_contact_reply_email(
    config: &Config,
    to_email: &str,
    name: &str,
    original_subject: &str,
    reply: &str,
) -> MailResult {
    let subject = format!("Re: {}", original_subject);
    let template_path = "src/mail/templates/Contact-reply.html";
    let placeholders = vec![
        ("{{name}}".to_string(), name.to_string()),
        ("{{reply}}".to_string(), reply.to_string()),
    ];

    send_email(config, to_email, &subject, template_path, &placeholders).await
}

pub async fn send_test_email(config: &Config, to_email: &str) -> MailResult {
    let subject = "WorkHive email configuration test";
    let template_path = "src/mail/templates/Test-email.html";
    let placeholders = vec![("{{app_url}}".to_string(), config.app_url.clone())];

    send_email(config, to_email, subject, template_path, &placeholders).await
}

/// Fan a notification out to every configured admin address. No-op when the
/// admin notification toggle is off or no addresses are configured.
pub async fn notify_admins<F, Fut>(config: &Config, send_one: F)
where
    F: Fn(String) -> Fut,
    Fut: std::future::Future<Output = MailResult>,
{
    if !config.admin_notifications_enabled {
        return;
    }

    for email in &config.admin_emails {
        if let Err(e) = send_one(email.clone()).await {
            tracing::warn!("Admin notification to {} failed: {}", email, e);
        }
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max_chars).collect();
        format!("{}...", cut)
    }
}

#[cfg(test)]
mod tests {
    use super::truncate;

    #[test]
    fn truncate_leaves_short_text_alone() {
        assert_eq!(truncate("hello", 120), "hello");
    }

    #[test]
    fn truncate_cuts_long_text_with_ellipsis() {
        let long = "a".repeat(200);
        let cut = truncate(&long, 120);
        assert_eq!(cut.chars().count(), 123);
        assert!(cut.ends_with("..."));
    }
}
