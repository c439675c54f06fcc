//! Multipart upload of the users bulk import file.

use actix_multipart::form::{MultipartForm, tempfile::TempFile};

use crate::forms::FormError;
use crate::forms::users::validate_import_csv;

#[derive(MultipartForm)]
pub struct UploadUsersForm {
    #[multipart(limit = "10MB")]
    pub csv: TempFile,
}

/// An import file that passed local validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub rows: usize,
}

impl UploadUsersForm {
    /// Reads the upload and checks its columns and rows.
    pub fn parse(&self) -> Result<ImportFile, FormError> {
        let bytes =
            std::fs::read(self.csv.file.path()).map_err(|err| FormError::Csv(err.to_string()))?;

        let rows = validate_import_csv(&bytes)?;
        let file_name = self
            .csv
            .file_name
            .clone()
            .unwrap_or_else(|| "users.csv".to_string());

        Ok(ImportFile {
            file_name,
            bytes,
            rows,
        })
    }
}
