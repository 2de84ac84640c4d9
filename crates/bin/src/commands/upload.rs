//! Image upload command.

use folio::{
    backend::blob::LocalBlobStore,
    constants::IMAGE_BUCKET,
    content::{UploadRequest, upload_image},
};
use folio::SystemClock;

use crate::cli::UploadArgs;
use crate::output::{OutputFormat, print_json};

/// Content type for an image file, judged by its extension.
fn content_type(path: &std::path::Path) -> String {
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg".to_string(),
        "png" | "gif" | "webp" | "avif" | "bmp" => format!("image/{ext}"),
        "svg" => "image/svg+xml".to_string(),
        _ => "application/octet-stream".to_string(),
    }
}

/// Run the upload command
pub async fn run(args: &UploadArgs, format: OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
    let file_name = args
        .file
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or("Upload path has no file name")?;
    let size = tokio::fs::metadata(&args.file).await?.len();
    let request = UploadRequest::prepare(
        &args.folder,
        file_name,
        &content_type(&args.file),
        size,
        &SystemClock,
    )?;
    let bytes = tokio::fs::read(&args.file).await?;

    let store = LocalBlobStore::new(&args.upload_dir, IMAGE_BUCKET, args.public_url.clone());
    let url = upload_image(&store, &request, bytes).await?;

    match format {
        OutputFormat::Human => println!("{url}"),
        OutputFormat::Json => print_json(&serde_json::json!({
            "path": request.path(),
            "url": url,
        }))?,
    }
    Ok(())
}
