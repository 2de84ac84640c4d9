//! About page commands.

use folio::{
    ItemId,
    admin::AboutEditor,
    content::{AboutField, Section},
};

use crate::backend::Stores;
use crate::cli::AboutCommand;
use crate::output::{OutputFormat, print_json, print_table};

/// Run an `about` subcommand
pub async fn run(
    stores: &Stores,
    command: &AboutCommand,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut editor = AboutEditor::new(stores.documents.clone());
    editor.load().await?;

    match command {
        AboutCommand::Show => return show(&editor, format),
        AboutCommand::Set { field, value } => editor.set_field(*field, value.as_str()),
        AboutCommand::Add { section, text } => {
            let id = editor.add_item(*section, text.as_str());
            println!("Added {id} to {section}");
        }
        AboutCommand::Edit { section, id, text } => {
            if !editor.edit_item(*section, &ItemId::from(id.as_str()), text.as_str()) {
                return Err(format!("No item '{id}' in {section}").into());
            }
        }
        AboutCommand::Remove { section, id } => {
            if !editor.remove_item(*section, &ItemId::from(id.as_str())) {
                return Err(format!("No item '{id}' in {section}").into());
            }
        }
        AboutCommand::Move { section, from, to } => editor.move_item(*section, *from, *to)?,
    }

    if !editor.is_dirty() {
        println!("Nothing changed.");
        return Ok(());
    }
    editor.save().await?;
    stores.persist().await?;
    println!("About page saved.");
    Ok(())
}

fn show(editor: &AboutEditor, format: OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        OutputFormat::Json => print_json(&serde_json::to_value(editor.page())?),
        OutputFormat::Human => {
            for field in AboutField::ALL {
                println!("{:<12} {}", format!("{field}:"), editor.field(field));
            }
            for section in Section::ALL {
                println!();
                println!("{section}");
                let rows: Vec<Vec<String>> = editor
                    .items(section)
                    .iter()
                    .enumerate()
                    .map(|(index, item)| {
                        vec![index.to_string(), item.id.to_string(), item.payload.clone()]
                    })
                    .collect();
                print_table(&["#", "ID", "TEXT"], &rows, "  (empty)");
            }
            Ok(())
        }
    }
}
