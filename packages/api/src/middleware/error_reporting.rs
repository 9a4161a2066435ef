use axum::{extract::Request, middleware::Next, response::Response};

use crate::{error::ErrorReport, middleware::session::AdminSession};

const MAX_REPORT_LEN: usize = 16 * 1024;
const SECRET_KEYS: [&str; 5] = ["password", "secret", "token", "api_key", "whsec"];

/// Masks bearer tokens and `key=value` secrets in free text.
fn redact(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut redact_next = false;

    for (i, word) in input.split(' ').enumerate() {
        if i > 0 {
            out.push(' ');
        }
        if redact_next {
            out.push_str("[REDACTED]");
            redact_next = false;
            continue;
        }
        if word == "Bearer" {
            redact_next = true;
            out.push_str(word);
            continue;
        }
        match word.split_once('=') {
            Some((key, _))
                if SECRET_KEYS
                    .iter()
                    .any(|secret| key.to_ascii_lowercase().contains(secret)) =>
            {
                out.push_str(key);
                out.push_str("=[REDACTED]");
            }
            _ => out.push_str(word),
        }
    }

    if out.len() > MAX_REPORT_LEN {
        let mut cut = MAX_REPORT_LEN;
        while !out.is_char_boundary(cut) {
            cut -= 1;
        }
        out.truncate(cut);
    }
    out
}

/// Logs the [`ErrorReport`] attached to 5xx responses.
pub async fn error_reporting_middleware(req: Request, next: Next) -> Response {
    let method = req.method().to_string();
    let path = req.uri().path().to_string();
    let admin = req
        .extensions()
        .get::<AdminSession>()
        .and_then(|session| session.admin())
        .map(|identity| identity.username.clone());

    let mut response = next.run(req).await;

    let Some(report) = response.extensions_mut().remove::<ErrorReport>() else {
        return response;
    };

    metrics::counter!("api_errors_reported_total", "code" => report.public_code.clone())
        .increment(1);

    tracing::error!(
        error_id = %report.id,
        status_code = report.status_code,
        public_code = %report.public_code,
        method = %method,
        path = %path,
        admin = admin.as_deref().unwrap_or(""),
        "{}", redact(&report.summary)
    );
    if let Some(details) = report.details.as_deref() {
        tracing::error!(error_id = %report.id, "details: {}", redact(details));
    }

    response
}
