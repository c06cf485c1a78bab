use std::{
    io::Write,
    path::{Path, PathBuf},
};

use crate::{
    core::{
        error::ClientResult,
        http::ApiClient,
        utils::{date_to_string_opt, datetime_to_string_opt},
    },
    model::{access::Access, employee::Employee},
    repository::{access::get_accesses_by_employee, employee::get_employee_by_id},
};

pub const NO_ACCESSES_LINE: &str = "No Accesses Assigned";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportDocument {
    pub file_name: String,
    pub content: String,
}

pub fn render_employee_document(employee: &Employee, accesses: &[Access]) -> String {
    let mut lines = vec![
        format!("First Name: {}", employee.first_name),
        format!("Last Name: {}", employee.last_name),
        format!("Email: {}", employee.email),
        format!("Job Title: {}", employee.job_title_display()),
        format!("Account Status: {}", employee.account_status),
        format!(
            "Date Created: {}",
            datetime_to_string_opt(employee.date_created)
        ),
        format!(
            "Date Modified: {}",
            datetime_to_string_opt(employee.date_modified)
        ),
        "Accesses:".to_string(),
    ];
    if accesses.is_empty() {
        lines.push(NO_ACCESSES_LINE.to_string());
    } else {
        for access in accesses {
            lines.push(format!(
                "- {} (Granted: {})",
                access.application_name,
                date_to_string_opt(access.date_granted)
            ));
        }
    }
    lines.join("\n")
}

pub fn export_file_name(employee: &Employee) -> String {
    let name = format!("{} {}", employee.first_name, employee.last_name);
    let name: String = name
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    if name.is_empty() {
        return format!("Employee {}.txt", employee.employee_id);
    }
    format!("{}.txt", name)
}

/// Fetches a fresh copy of the employee and its grants and renders the document.
pub async fn build_export(api: &ApiClient, employee_id: i64) -> ClientResult<ExportDocument> {
    let (employee, accesses) = tokio::try_join!(
        get_employee_by_id(api, employee_id),
        get_accesses_by_employee(api, employee_id)
    )?;
    Ok(ExportDocument {
        file_name: export_file_name(&employee),
        content: render_employee_document(&employee, &accesses),
    })
}

/// Writes the document into `dir`. The target only appears once fully written.
pub fn save_export(document: &ExportDocument, dir: &Path) -> anyhow::Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let target = dir.join(&document.file_name);
    let mut file = tempfile::NamedTempFile::new_in(dir)?;
    file.write_all(document.content.as_bytes())?;
    file.flush()?;
    file.persist(&target)?;
    tracing::info!("exported employee document to {}", target.display());
    Ok(target)
}

pub async fn export_employee(
    api: &ApiClient,
    employee_id: i64,
    dir: &Path,
) -> anyhow::Result<PathBuf> {
    let document = build_export(api, employee_id).await.map_err(|err| {
        tracing::error!("error exporting employee {}: {}", employee_id, err);
        err
    })?;
    save_export(&document, dir)
}
