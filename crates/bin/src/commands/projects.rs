//! Project commands.

use folio::{
    admin::{ProjectBoard, published_projects},
    content::{Project, ProjectContent, ProjectDraft, parse_keywords},
};

use crate::backend::Stores;
use crate::cli::{ProjectArgs, ProjectsCommand};
use crate::output::{OutputFormat, print_json, print_table};

/// Run a `projects` subcommand
pub async fn run(
    stores: &Stores,
    command: &ProjectsCommand,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut board = ProjectBoard::new(stores.records.clone());
    board.load().await?;

    match command {
        ProjectsCommand::List => {
            let projects: Vec<&Project> = board.projects().collect();
            print_projects(&projects, format)?;
        }
        ProjectsCommand::Published => {
            let projects = published_projects(stores.records.as_ref()).await?;
            print_projects(&projects.iter().collect::<Vec<_>>(), format)?;
        }
        ProjectsCommand::Add(args) => {
            let id = board.create(&draft(args, None)).await?;
            stores.persist().await?;
            println!("Created project {id}");
        }
        ProjectsCommand::Update { id, project } => {
            let existing = board
                .get(*id)
                .ok_or_else(|| format!("No project with id {id}"))?
                .contents
                .clone();
            if !board.update(*id, &draft(project, Some(existing))).await? {
                return Err(format!("No project with id {id}").into());
            }
            stores.persist().await?;
            println!("Updated project {id}");
        }
        ProjectsCommand::Move { from, to } => {
            board.move_project(*from, *to)?;
            if !board.is_dirty() {
                println!("Nothing changed.");
                return Ok(());
            }
            // Persist whatever landed, even when some position writes failed.
            let saved = board.save_order().await;
            stores.persist().await?;
            let report = saved?;
            println!("Saved order of {} projects", report.written);
        }
        ProjectsCommand::Status { id, status } => {
            let updated = board.set_status(*id, *status).await;
            stores.persist().await?;
            if !updated? {
                return Err(format!("No project with id {id}").into());
            }
            println!("Project {id} is now {status}");
        }
        ProjectsCommand::Delete { id } => {
            if !board.delete(*id).await? {
                return Err(format!("No project with id {id}").into());
            }
            stores.persist().await?;
            println!("Deleted project {id}");
        }
    }
    Ok(())
}

fn draft(args: &ProjectArgs, contents: Option<ProjectContent>) -> ProjectDraft {
    let mut contents = contents.unwrap_or_default();
    if let Some(keywords) = &args.keywords {
        contents.keyword = parse_keywords(keywords);
    }
    if let Some(year) = args.year {
        contents.year = year;
    }
    if let Some(client) = &args.client {
        contents.client = client.clone();
    }
    ProjectDraft::new(&args.title, &args.description, &args.slug)
        .with_status(args.status)
        .with_contents(contents)
}

fn print_projects(
    projects: &[&Project],
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        OutputFormat::Json => print_json(&serde_json::to_value(projects)?),
        OutputFormat::Human => {
            let rows: Vec<Vec<String>> = projects
                .iter()
                .enumerate()
                .map(|(index, project)| {
                    vec![
                        index.to_string(),
                        project.id.to_string(),
                        project.display_order.to_string(),
                        project.status.to_string(),
                        project.slug.clone(),
                        project.title.clone(),
                    ]
                })
                .collect();
            print_table(
                &["#", "ID", "ORDER", "STATUS", "SLUG", "TITLE"],
                &rows,
                "No projects found.",
            );
            Ok(())
        }
    }
}
