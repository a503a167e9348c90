//! Export of the list as shown to CSV or Excel.
//!
//! The same filter, columns and sort as `list` apply, so the file matches
//! what the operator sees.

use super::{list::effective_settings, Session};
use crate::{
    db::equipments::{Equipments, InventoryFilter, ListFilter},
    libs::{
        background::Background,
        export::{ExportFormat, Exporter},
        messages::Message,
        view::{Column, ListView},
    },
    msg_success,
};
use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Text matched against OT, name, PN and SN
    search: Option<String>,
    /// Output format; guessed from the output extension when omitted
    #[arg(short = 'F', long)]
    format: Option<ExportFormat>,
    /// Output file
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Inventory filter (defaults to the saved one)
    #[arg(short, long)]
    filter: Option<InventoryFilter>,
    /// Comma-separated columns to export
    #[arg(short, long, value_delimiter = ',')]
    columns: Option<Vec<Column>>,
    /// Column to sort by
    #[arg(short, long)]
    sort: Option<Column>,
}

pub async fn cmd(args: ExportArgs) -> Result<()> {
    let session = Session::open()?;
    let settings = effective_settings(args.filter, args.columns, args.sort);
    let records = Equipments::new(&session.db).list(&ListFilter {
        search: args.search,
        inventory: settings.default_filter,
    })?;
    let view = ListView::build(&records, &settings.columns, settings.sort_column);
    let exporter = Exporter::new(args.format, args.output);

    let written = Background::new()
        .run("Export", move || {
            let path = exporter.export(&view)?;
            Ok(path.display().to_string())
        })
        .await?;
    msg_success!(Message::ExportCompleted(written));
    Ok(())
}
