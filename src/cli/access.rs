use std::io::Write;

use anyhow::bail;

use crate::{
    core::http::ApiClient,
    view::{
        access_assignment::{AccessAssignment, GrantReport},
        detail::{DetailState, EmployeeDetail},
        notice::NoticeKind,
    },
};

use super::render::{access_table, picker_list, write_notices};

async fn open_assignment(
    api: &ApiClient,
    employee_id: i64,
    out: &mut impl Write,
) -> anyhow::Result<AccessAssignment> {
    let mut assignment = AccessAssignment::open(api, employee_id).await;
    let failed = assignment
        .notices
        .iter()
        .any(|x| x.kind == NoticeKind::Error);
    if failed {
        write_notices(&mut assignment.notices, out)?;
        bail!("could not load applications for employee {}", employee_id);
    }
    Ok(assignment)
}

/// Prints the application catalog, marking what the employee already holds.
pub async fn show_catalog(
    api: &ApiClient,
    employee_id: i64,
    filter: Option<&str>,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let mut assignment = open_assignment(api, employee_id, out).await?;
    assignment.set_filter(filter.unwrap_or_default());
    writeln!(out, "{}", picker_list(&assignment.visible_applications()))?;
    Ok(())
}

pub async fn grant_access(
    api: &ApiClient,
    employee_id: i64,
    application_names: &[String],
    out: &mut impl Write,
) -> anyhow::Result<GrantReport> {
    let mut assignment = open_assignment(api, employee_id, out).await?;
    for name in application_names {
        // a repeated name must not deselect the earlier one
        let repeated = assignment
            .selected()
            .iter()
            .any(|x| x.eq_ignore_ascii_case(name.trim()));
        if !repeated {
            assignment.toggle(name);
        }
    }
    let report = assignment.submit().await;
    write_notices(&mut assignment.notices, out)?;
    let Some(report) = report else {
        bail!("no applications to grant");
    };
    Ok(report)
}

pub async fn revoke_access(
    api: &ApiClient,
    employee_id: i64,
    access_id: i64,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let mut detail = EmployeeDetail::open(api, employee_id).await;
    match detail.state() {
        DetailState::Loaded { accesses, .. } => {
            if !accesses.iter().any(|x| x.access_id == access_id) {
                bail!("access {} is not granted to this employee", access_id);
            }
        }
        DetailState::NotFound => bail!("Employee not found"),
        DetailState::Failed(message) => bail!("{}", message),
        DetailState::Loading => bail!("employee {} is still loading", employee_id),
    }
    let res = detail.remove_access(access_id).await;
    write_notices(&mut detail.notices, out)?;
    res?;
    writeln!(out, "{}", access_table(detail.accesses()))?;
    Ok(())
}
