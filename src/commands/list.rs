//! Main table of the inventory.
//!
//! Columns, sort and the default inventory filter come from the saved view
//! settings; flags override them for one run, or for good with
//! `--save-layout`.

use super::Session;
use crate::{
    db::equipments::{Equipments, InventoryFilter, ListFilter},
    libs::{messages::Message, settings::ViewSettings, view::Column, view::ListView},
    msg_info, msg_print, msg_success,
};
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Text matched against OT, name, PN and SN
    search: Option<String>,
    /// Inventory filter (defaults to the saved one)
    #[arg(short, long)]
    filter: Option<InventoryFilter>,
    /// Comma-separated columns to show
    #[arg(short, long, value_delimiter = ',')]
    columns: Option<Vec<Column>>,
    /// Column to sort by, natural order
    #[arg(short, long)]
    sort: Option<Column>,
    /// Remember the filter, columns and sort for next time
    #[arg(long)]
    save_layout: bool,
}

/// View settings with the one-off overrides applied.
pub(crate) fn effective_settings(filter: Option<InventoryFilter>, columns: Option<Vec<Column>>, sort: Option<Column>) -> ViewSettings {
    let mut settings = ViewSettings::read();
    if let Some(filter) = filter {
        settings.default_filter = filter;
    }
    if let Some(columns) = columns.filter(|c| !c.is_empty()) {
        settings.columns = columns;
    }
    if sort.is_some() {
        settings.sort_column = sort;
    }
    settings
}

pub fn cmd(args: ListArgs) -> Result<()> {
    let session = Session::open()?;
    let settings = effective_settings(args.filter, args.columns, args.sort);
    if args.save_layout {
        settings.save()?;
        msg_success!(Message::LayoutSaved);
    }

    let equipments = Equipments::new(&session.db);
    let records = equipments.list(&ListFilter {
        search: args.search,
        inventory: settings.default_filter,
    })?;
    let (total, in_inventory) = equipments.counts()?;

    if records.is_empty() {
        msg_info!(Message::NoEquipmentFound);
    } else {
        ListView::build(&records, &settings.columns, settings.sort_column).print();
    }
    msg_print!(Message::ListStatus(total, in_inventory, records.len()), true);
    Ok(())
}
