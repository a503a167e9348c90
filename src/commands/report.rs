use super::Session;
use crate::{
    db::equipments::Equipments,
    libs::{
        background::Background,
        formatter::FILE_STAMP_FORMAT,
        messages::Message,
        report::{InventoryReport, ReportEntry},
    },
    msg_success,
};
use anyhow::Result;
use chrono::Local;
use clap::Args;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct ReportArgs {
    /// Output PDF; `inventory_report_<timestamp>.pdf` when omitted
    #[arg(short, long)]
    output: Option<PathBuf>,
}

pub async fn cmd(args: ReportArgs) -> Result<()> {
    let session = Session::open()?;
    let equipments = Equipments::new(&session.db);

    let mut entries = Vec::new();
    for record in equipments.in_inventory()? {
        let history = equipments.interventions(record.id)?;
        entries.push(ReportEntry { record, history });
    }

    let output = args
        .output
        .unwrap_or_else(|| PathBuf::from(format!("inventory_report_{}.pdf", Local::now().format(FILE_STAMP_FORMAT))));
    let report = InventoryReport::new(&session.config.company_name);

    let written = Background::new()
        .run("Report", move || {
            let path = report.write(&entries, &output)?;
            Ok(path.display().to_string())
        })
        .await?;
    msg_success!(Message::ReportGenerated(written));
    Ok(())
}
