use axum::{
    body::Body,
    extract::{Path, State},
    http::header,
    response::Response,
};

use crate::{
    config::AppConfig,
    middleware::error_handling::{AppError, Result},
};

/// Serve an uploaded inquiry attachment by its relative path.
pub async fn serve_upload(
    State(config): State<AppConfig>,
    Path(path): Path<String>,
) -> Result<Response> {
    let (data, file_name) = config.uploads.open(&path).await?;
    let content_type = content_type_for(&file_name);

    Response::builder()
        .header(header::CONTENT_TYPE, content_type)
        .header(
            header::CONTENT_DISPOSITION,
            format!("inline; filename=\"{}\"", file_name),
        )
        .body(Body::from(data))
        .map_err(|e| AppError::Internal(anyhow::anyhow!("failed to build file response: {e}")))
}

/// The fixed extension table for attachment types we expect from clients;
/// everything else is served as an opaque download.
fn content_type_for(file_name: &str) -> &'static str {
    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "pdf" => "application/pdf",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "csv" => "text/csv",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "xls" => "application/vnd.ms-excel",
        "ods" => "application/vnd.oasis.opendocument.spreadsheet",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_extensions_map_to_content_types() {
        assert_eq!(content_type_for("report.pdf"), "application/pdf");
        assert_eq!(content_type_for("chart.PNG"), "image/png");
        assert_eq!(content_type_for("photo.jpeg"), "image/jpeg");
        assert_eq!(content_type_for("ledger.csv"), "text/csv");
        assert_eq!(
            content_type_for("book.xlsx"),
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
        );
        assert_eq!(content_type_for("legacy.xls"), "application/vnd.ms-excel");
        assert_eq!(
            content_type_for("sheet.ods"),
            "application/vnd.oasis.opendocument.spreadsheet"
        );
    }

    #[test]
    fn unknown_extensions_fall_back_to_octet_stream() {
        assert_eq!(content_type_for("archive.zip"), "application/octet-stream");
        assert_eq!(content_type_for("no-extension"), "application/octet-stream");
    }
}
