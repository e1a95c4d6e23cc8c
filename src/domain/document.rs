use crate::error::ApiError;

pub const MAX_DOCUMENT_BYTES: usize = 5 * 1024 * 1024;

const ALLOWED_EXTENSIONS: [&str; 3] = ["pdf", "doc", "docx"];

/// Validates an upload before any byte is written: PDF or Word documents
/// only, at most 5 MB. Returns the lowercased extension used to build the
/// stored file name.
pub fn validate_upload(file_name: &str, size: usize) -> Result<String, ApiError> {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()))
        .ok_or_else(|| ApiError::validation("Please upload a PDF or Word document"))?;

    if size == 0 {
        return Err(ApiError::validation("Uploaded file is empty"));
    }

    if size > MAX_DOCUMENT_BYTES {
        return Err(ApiError::validation("File size must be less than 5MB"));
    }

    Ok(ext)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_pdf_and_word_extensions() {
        assert_eq!(validate_upload("form.pdf", 1024).unwrap(), "pdf");
        assert_eq!(validate_upload("form.DOC", 1024).unwrap(), "doc");
        assert_eq!(validate_upload("leave form.docx", 1024).unwrap(), "docx");
    }

    #[test]
    fn rejects_other_extensions() {
        assert!(validate_upload("form.exe", 1024).is_err());
        assert!(validate_upload("form.pdf.sh", 1024).is_err());
        assert!(validate_upload("noextension", 1024).is_err());
    }

    #[test]
    fn rejects_oversized_and_empty_files() {
        assert!(validate_upload("form.pdf", MAX_DOCUMENT_BYTES + 1).is_err());
        assert!(validate_upload("form.pdf", 0).is_err());
        assert!(validate_upload("form.pdf", MAX_DOCUMENT_BYTES).is_ok());
    }
}
