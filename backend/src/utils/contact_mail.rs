use crate::config::contact_config::ContactConfig;
use crate::handlers::contact_dtos::{ContactSubmission, RequestMeta};
use crate::utils::mail::OutgoingMail;

/// Removes CR and LF so a value cannot open a new header line.
pub fn sanitize_header(value: &str) -> String {
    value.chars().filter(|c| !matches!(c, '\r' | '\n')).collect()
}

pub fn contact_subject(prefix: &str, name: &str) -> String {
    format!("{}：{}様より", prefix, name)
}

pub fn contact_body(submission: &ContactSubmission, meta: &RequestMeta) -> String {
    let lines = [
        "以下の内容でお問い合わせを受け付けました。".to_string(),
        String::new(),
        format!("お名前：{}", submission.name),
        format!("メールアドレス：{}", submission.email),
        format!("お電話番号：{}", submission.phone_or_placeholder()),
        format!("ご希望の連絡方法：{}", submission.contact_method_summary),
        String::new(),
        "--- お問い合わせ内容 ---".to_string(),
        submission.message.clone(),
        "------------------------".to_string(),
        String::new(),
        format!("送信日時：{}", meta.received_at_display()),
        format!("送信元IP：{}", meta.client_ip_or_unknown()),
        format!("ユーザーエージェント：{}", meta.user_agent_or_unknown()),
    ];
    lines.join("\r\n")
}

pub fn compose_contact_mail(
    config: &ContactConfig,
    submission: &ContactSubmission,
    meta: &RequestMeta,
) -> OutgoingMail {
    OutgoingMail {
        to: config.recipient.clone(),
        from: sanitize_header(&config.from_address),
        reply_to: sanitize_header(&submission.email),
        subject: sanitize_header(&contact_subject(&config.subject_prefix, &submission.name)),
        body: contact_body(submission, meta),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::contact_config::MailTransportKind;
    use chrono::TimeZone;
    use std::path::PathBuf;

    fn config() -> ContactConfig {
        ContactConfig {
            recipient: "owner@example.com".into(),
            from_address: "no-reply@example.com\r\n".into(),
            subject_prefix: "【テスト】お問い合わせ".into(),
            log_dir: PathBuf::from("unused"),
            timezone: chrono_tz::Asia::Tokyo,
            bind_addr: "127.0.0.1:0".parse().unwrap(),
            transport: MailTransportKind::Sendmail { command: None },
        }
    }

    fn submission() -> ContactSubmission {
        ContactSubmission {
            name: "田中太郎".into(),
            email: "t@example.com".into(),
            phone: String::new(),
            message: "相談したいです".into(),
            contact_method_summary: "メールでの連絡を希望".into(),
            agreement: true,
        }
    }

    fn meta() -> RequestMeta {
        RequestMeta {
            received_at: chrono_tz::Asia::Tokyo
                .with_ymd_and_hms(2024, 4, 1, 9, 30, 0)
                .unwrap(),
            client_ip: Some("203.0.113.7".into()),
            user_agent: None,
        }
    }

    #[test]
    fn strips_line_breaks() {
        assert_eq!(sanitize_header("a\r\nb\nc\rd"), "abcd");
        assert_eq!(sanitize_header("plain@example.com"), "plain@example.com");
    }

    #[test]
    fn header_values_are_sanitized() {
        let mut injected = submission();
        injected.email = "t@example.com\r\nBcc: victim@example.com".into();

        let mail = compose_contact_mail(&config(), &injected, &meta());
        assert_eq!(mail.from, "no-reply@example.com");
        assert_eq!(mail.reply_to, "t@example.comBcc: victim@example.com");
        assert!(!mail.subject.contains('\n'));
        assert_eq!(mail.subject, "【テスト】お問い合わせ：田中太郎様より");
        assert_eq!(mail.to, "owner@example.com");
    }

    #[test]
    fn body_follows_template() {
        let body = contact_body(&submission(), &meta());
        let lines: Vec<&str> = body.split("\r\n").collect();

        assert_eq!(lines[0], "以下の内容でお問い合わせを受け付けました。");
        assert_eq!(lines[2], "お名前：田中太郎");
        assert_eq!(lines[3], "メールアドレス：t@example.com");
        assert_eq!(lines[4], "お電話番号：未入力");
        assert_eq!(lines[5], "ご希望の連絡方法：メールでの連絡を希望");
        assert_eq!(lines[7], "--- お問い合わせ内容 ---");
        assert_eq!(lines[8], "相談したいです");
        assert_eq!(lines[9], "------------------------");
        assert_eq!(lines[11], "送信日時：2024-04-01 09:30:00");
        assert_eq!(lines[12], "送信元IP：203.0.113.7");
        assert_eq!(lines[13], "ユーザーエージェント：不明");
    }
}
