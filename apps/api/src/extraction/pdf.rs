use super::ExtractionError;

/// Concatenates the text of every page with no separator, then trims.
/// A PDF with no extractable text (scanned images) yields `Ok("")`.
pub fn extract_pdf_text(data: &[u8]) -> Result<String, ExtractionError> {
    let pages = pdf_extract::extract_text_from_mem_by_pages(data)
        .map_err(|e| ExtractionError::Pdf(e.to_string()))?;

    Ok(pages.concat().trim().to_string())
}

