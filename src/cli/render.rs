use std::io::Write;

use crate::{
    core::utils::{date_to_string_opt, datetime_to_string_opt},
    model::{access::Access, employee::Employee},
    view::{access_assignment::PickerRow, notice::Notices},
};

fn table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|x| x.chars().count()).collect();
    for row in rows {
        for (idx, cell) in row.iter().enumerate() {
            widths[idx] = widths[idx].max(cell.chars().count());
        }
    }
    let line = |cells: &[&str]| {
        cells
            .iter()
            .enumerate()
            .map(|(idx, cell)| format!("{:<width$}", cell, width = widths[idx]))
            .collect::<Vec<String>>()
            .join("  ")
            .trim_end()
            .to_string()
    };
    let rule: Vec<String> = widths.iter().map(|x| "-".repeat(*x)).collect();
    let mut lines = vec![line(headers)];
    lines.push(line(&rule.iter().map(|x| x.as_str()).collect::<Vec<&str>>()));
    for row in rows {
        lines.push(line(&row.iter().map(|x| x.as_str()).collect::<Vec<&str>>()));
    }
    lines.join("\n")
}

pub fn employee_table(employees: &[Employee]) -> String {
    let rows: Vec<Vec<String>> = employees
        .iter()
        .map(|x| {
            vec![
                x.employee_id.to_string(),
                x.full_name(),
                x.email.clone(),
                x.job_title_display().to_string(),
                x.account_status.to_string(),
            ]
        })
        .collect();
    table(&["ID", "Name", "Email", "Job Title", "Status"], &rows)
}

/// "Page X of Y", with Y shown as at least 1.
pub fn page_indicator(page: u32, total_pages: u32, total_employees: u32) -> String {
    format!(
        "Page {} of {} ({} employees)",
        page,
        total_pages.max(1),
        total_employees
    )
}

pub fn employee_panel(employee: &Employee) -> String {
    [
        format!("{} (#{})", employee.full_name(), employee.employee_id),
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
    ]
    .join("\n")
}

pub fn access_table(accesses: &[Access]) -> String {
    if accesses.is_empty() {
        return "No accesses assigned.".to_string();
    }
    let rows: Vec<Vec<String>> = accesses
        .iter()
        .map(|x| {
            vec![
                x.access_id.to_string(),
                x.application_name.clone(),
                date_to_string_opt(x.date_granted),
            ]
        })
        .collect();
    table(&["ID", "Application", "Granted"], &rows)
}

pub fn picker_list(rows: &[PickerRow<'_>]) -> String {
    if rows.is_empty() {
        return "No applications found.".to_string();
    }
    rows.iter()
        .map(|x| {
            let mark = if x.is_granted {
                "[granted]"
            } else if x.is_selected {
                "[x]"
            } else {
                "[ ]"
            };
            format!("{:<9} {}", mark, x.application.application_name)
        })
        .collect::<Vec<String>>()
        .join("\n")
}

/// Drains the queue onto `out`, one notice per line.
pub fn write_notices(notices: &mut Notices, out: &mut impl Write) -> std::io::Result<()> {
    for notice in notices.take() {
        writeln!(out, "{}", notice)?;
    }
    Ok(())
}
