//! Extractor for the advisory form
//!
//! The browser posts a `FormData` object, which arrives as
//! `multipart/form-data`; scripted callers usually send
//! `application/x-www-form-urlencoded`. Both decode into the same
//! [`AdviceForm`].

use axum::{
    extract::{FromRequest, Multipart, Request},
    http::header::CONTENT_TYPE,
    Form,
};
use shared::AdviceForm;

use crate::error::AppError;

/// Advisory form fields, decoded from either form encoding
#[derive(Debug, Clone)]
pub struct AdviceFormBody(pub AdviceForm);

#[axum::async_trait]
impl<S> FromRequest<S> for AdviceFormBody
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();

        if content_type.starts_with("multipart/form-data") {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|rejection| AppError::malformed(rejection.body_text()))?;
            read_multipart(multipart).await.map(Self)
        } else if content_type.starts_with("application/x-www-form-urlencoded") {
            let Form(form) = Form::<AdviceForm>::from_request(req, state).await?;
            Ok(Self(form))
        } else if content_type.is_empty() {
            Err(AppError::UnsupportedMediaType(
                "missing content type, expected form data".to_string(),
            ))
        } else {
            Err(AppError::UnsupportedMediaType(format!(
                "{} is not form data",
                content_type
            )))
        }
    }
}

async fn read_multipart(mut multipart: Multipart) -> Result<AdviceForm, AppError> {
    let mut form = AdviceForm::default();

    while let Some(field) = multipart.next_field().await? {
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };
        // File parts never carry observation values
        if field.file_name().is_some() {
            tracing::debug!(field = %name, "skipping file part");
            continue;
        }

        let value = field.text().await.map_err(|e| AppError::MalformedBody {
            field: Some(name.clone()),
            message: e.body_text(),
        })?;

        if !form.set_field(&name, value) {
            tracing::debug!(field = %name, "ignoring unknown form field");
        }
    }

    Ok(form)
}
