use axum::extract::Multipart;

use crate::{
    foundation::error::{ArtError, ArtResult},
    pipeline::Upload,
    request::params::GenerationParams,
};

/// Multipart field carrying the image.
pub const IMAGE_FIELD: &str = "image";

/// A decoded settings-form post: the image plus raw text fields.
#[derive(Debug, Default)]
pub struct FormSubmission {
    pub upload: Option<Upload>,
    pub fields: Vec<(String, String)>,
}

impl FormSubmission {
    pub async fn read(mut multipart: Multipart) -> ArtResult<Self> {
        let mut submission = Self::default();
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| ArtError::validation(format!("malformed form data: {e}")))?
        {
            let name = field.name().unwrap_or_default().to_string();
            if name == IMAGE_FIELD {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ArtError::validation(format!("failed to read upload: {e}")))?;
                // Browsers send an empty part when no file was chosen.
                if !file_name.is_empty() || !bytes.is_empty() {
                    submission.upload = Some(Upload::new(file_name, bytes.to_vec()));
                }
            } else {
                let value = field
                    .text()
                    .await
                    .map_err(|e| ArtError::validation(format!("failed to read '{name}': {e}")))?;
                submission.fields.push((name, value));
            }
        }
        Ok(submission)
    }

    /// Parameters from the text fields, defaults for anything not sent.
    pub fn params(&self) -> ArtResult<GenerationParams> {
        let mut params = GenerationParams::default();
        for (key, value) in &self.fields {
            params.set_field(key, value)?;
        }
        Ok(params)
    }

    pub fn into_request(self) -> ArtResult<(Upload, GenerationParams)> {
        let params = self.params()?;
        let upload = self
            .upload
            .ok_or_else(|| ArtError::validation("choose an image to upload"))?;
        Ok((upload, params))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/web/form.rs"]
mod tests;
