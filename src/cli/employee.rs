use std::io::Write;

use anyhow::bail;

use crate::{
    core::http::ApiClient,
    model::employee::AccountStatus,
    schema::employee::EmployeeForm,
    view::{
        detail::{DetailState, EmployeeDetail},
        directory::{DeleteConfirmation, EmployeeDirectory},
    },
};

use super::render::{
    access_table, employee_panel, employee_table, page_indicator, write_notices,
};

/// Optional overrides applied on top of the stored profile by `employees edit`.
#[derive(Clone, Debug, Default)]
pub struct EmployeeChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub job_title: Option<String>,
    pub account_status: Option<AccountStatus>,
}

impl EmployeeChanges {
    pub fn apply(&self, form: &mut EmployeeForm) {
        if let Some(val) = &self.first_name {
            form.first_name = val.clone();
        }
        if let Some(val) = &self.last_name {
            form.last_name = val.clone();
        }
        if let Some(val) = &self.email {
            form.email = val.clone();
        }
        if let Some(val) = &self.job_title {
            form.job_title = val.clone();
        }
        if let Some(val) = self.account_status {
            form.account_status = val;
        }
    }
}

pub async fn list_employees(
    api: &ApiClient,
    page_size: u32,
    search: Option<&str>,
    status: Option<AccountStatus>,
    page: u32,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let mut directory = EmployeeDirectory::new(api, page_size).with_query(
        search.unwrap_or_default(),
        status,
        page,
    );
    directory.load().await;
    if directory.employees().is_empty() {
        writeln!(out, "No employees found.")?;
    } else {
        writeln!(out, "{}", employee_table(directory.employees()))?;
    }
    writeln!(
        out,
        "{}",
        page_indicator(
            directory.page(),
            directory.total_pages(),
            directory.total_employees()
        )
    )?;
    Ok(())
}

async fn open_detail(api: &ApiClient, employee_id: i64) -> anyhow::Result<EmployeeDetail> {
    let detail = EmployeeDetail::open(api, employee_id).await;
    match detail.state() {
        DetailState::Loaded { .. } => Ok(detail),
        DetailState::NotFound => bail!("Employee not found"),
        DetailState::Failed(message) => bail!("{}", message),
        DetailState::Loading => bail!("employee {} is still loading", employee_id),
    }
}

pub async fn show_employee(
    api: &ApiClient,
    employee_id: i64,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let detail = open_detail(api, employee_id).await?;
    if let Some(employee) = detail.employee() {
        writeln!(out, "{}", employee_panel(employee))?;
    }
    if let Some(status) = detail.status_action() {
        writeln!(out, "Quick action: Mark as {}", status)?;
    }
    writeln!(out)?;
    writeln!(out, "Application Accesses")?;
    writeln!(out, "{}", access_table(detail.accesses()))?;
    Ok(())
}

pub async fn add_employee(
    api: &ApiClient,
    page_size: u32,
    form: &EmployeeForm,
    grants: &[String],
    out: &mut impl Write,
) -> anyhow::Result<i64> {
    let mut directory = EmployeeDirectory::new(api, page_size);
    let res = directory.create_employee(form, grants).await;
    write_notices(&mut directory.notices, out)?;
    let created = res?;
    writeln!(out, "{}", employee_table(&[created.employee.clone()]))?;
    Ok(created.employee.employee_id)
}

pub async fn edit_employee(
    api: &ApiClient,
    employee_id: i64,
    changes: &EmployeeChanges,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let mut detail = open_detail(api, employee_id).await?;
    let Some(mut form) = detail.edit_form() else {
        bail!("Employee not found");
    };
    changes.apply(&mut form);
    let res = detail.submit_edit(&form).await;
    write_notices(&mut detail.notices, out)?;
    res?;
    if let Some(employee) = detail.employee() {
        writeln!(out, "{}", employee_panel(employee))?;
    }
    Ok(())
}

pub async fn set_employee_status(
    api: &ApiClient,
    employee_id: i64,
    status: AccountStatus,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let mut detail = open_detail(api, employee_id).await?;
    let res = detail.set_status(status).await;
    write_notices(&mut detail.notices, out)?;
    res?;
    Ok(())
}

/// Deletes after `confirm` accepts the confirmation prompt. Returns whether the
/// employee was deleted.
pub async fn delete_employee(
    api: &ApiClient,
    page_size: u32,
    employee_id: i64,
    confirm: impl FnOnce(&DeleteConfirmation) -> bool,
    out: &mut impl Write,
) -> anyhow::Result<bool> {
    let detail = open_detail(api, employee_id).await?;
    let Some(employee) = detail.employee() else {
        bail!("Employee not found");
    };
    let confirmation = DeleteConfirmation {
        employee_id,
        employee_name: employee.full_name(),
    };
    if !confirm(&confirmation) {
        writeln!(out, "Cancelled.")?;
        return Ok(false);
    }
    let mut directory = EmployeeDirectory::new(api, page_size);
    let res = directory.delete_employee(confirmation).await;
    write_notices(&mut directory.notices, out)?;
    res?;
    Ok(true)
}
