//! Info command - shows backend and content counts.

use folio::{
    admin::{ProjectBoard, published_projects},
    constants::ABOUT_KEY,
};

use crate::backend::{Stores, backend_label};
use crate::cli::BackendConfig;
use crate::output::{OutputFormat, print_json};

/// Run the info command
pub async fn run(
    stores: &Stores,
    config: &BackendConfig,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut board = ProjectBoard::new(stores.records.clone());
    board.load().await?;
    let published = published_projects(stores.records.as_ref()).await?.len();
    let has_about = stores.documents.read_one(ABOUT_KEY).await?.is_some();
    let backend_str = backend_label(config);

    match format {
        OutputFormat::Human => {
            println!("Backend:     {backend_str}");
            println!("About page:  {}", if has_about { "saved" } else { "defaults" });
            println!("Projects:    {}", board.len());
            println!("Published:   {published}");
        }
        OutputFormat::Json => print_json(&serde_json::json!({
            "backend": backend_str,
            "about": has_about,
            "projects": board.len(),
            "published": published,
        }))?,
    }

    Ok(())
}
