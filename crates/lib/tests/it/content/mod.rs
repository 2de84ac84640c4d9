mod about_document;
mod projects;
mod uploads;
