use axum::{
    Form, Json,
    extract::{FromRequest, Multipart, Request},
    http::header::CONTENT_TYPE,
};
use serde::de::DeserializeOwned;

use crate::{error::ServiceError, upload::UploadedFile};

/// A create/update body: JSON, a urlencoded form, or a multipart form whose
/// text fields form the body and whose first non-empty file part becomes
/// `file`.
pub struct Submission<T> {
    pub body: T,
    pub file: Option<UploadedFile>,
}

impl<S, T> FromRequest<S> for Submission<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = ServiceError;

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
                .map_err(|e| ServiceError::ValidationFailed(e.body_text()))?;
            return read_multipart(multipart).await;
        }

        if content_type.starts_with("application/x-www-form-urlencoded") {
            let Form(body) = Form::<T>::from_request(req, state)
                .await
                .map_err(|e| ServiceError::ValidationFailed(e.body_text()))?;
            return Ok(Self { body, file: None });
        }

        let Json(body) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| ServiceError::ValidationFailed(e.body_text()))?;
        Ok(Self { body, file: None })
    }
}

async fn read_multipart<T>(mut multipart: Multipart) -> Result<Submission<T>, ServiceError>
where
    T: DeserializeOwned,
{
    let mut fields: Vec<(String, String)> = Vec::new();
    let mut file = None;

    while let Some(field) =
        multipart.next_field().await.map_err(|e| ServiceError::ValidationFailed(e.body_text()))?
    {
        let name = field.name().unwrap_or_default().to_string();

        if let Some(file_name) = field.file_name().map(str::to_string) {
            let data =
                field.bytes().await.map_err(|e| ServiceError::ValidationFailed(e.body_text()))?;
            if file.is_none() && !data.is_empty() {
                file = Some(UploadedFile { file_name, data });
            }
            continue;
        }

        let value = field.text().await.map_err(|e| ServiceError::ValidationFailed(e.body_text()))?;
        if !value.is_empty() {
            fields.push((name, value));
        }
    }

    // Text parts are re-read as a urlencoded form so numeric fields parse the
    // same way they do for `Form` bodies.
    let encoded = serde_urlencoded::to_string(&fields)
        .map_err(|e| ServiceError::ValidationFailed(e.to_string()))?;
    let body = serde_urlencoded::from_str::<T>(&encoded)
        .map_err(|e| ServiceError::ValidationFailed(e.to_string()))?;

    Ok(Submission { body, file })
}
