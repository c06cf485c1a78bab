use std::{io::Write, path::Path};

use crate::{core::http::ApiClient, view::export::export_employee};

pub async fn export(
    api: &ApiClient,
    employee_id: i64,
    dir: &Path,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let path = export_employee(api, employee_id, dir).await?;
    writeln!(out, "Exported to {}", path.display())?;
    Ok(())
}
