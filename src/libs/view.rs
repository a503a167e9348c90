//! Terminal rendering of equipment records.
//!
//! `ListView` is the single source for what the operator sees in `list`: the
//! export module writes exactly the same headers and rows.

use super::equipment::{Attachment, EntryCondition, Equipment, ExitCondition, Intervention};
use super::formatter::{format_hours, or_placeholder};
use prettytable::{format, row, Cell, Row, Table};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    Id,
    Order,
    Name,
    Pn,
    Sn,
    EntryCondition,
    EntryDate,
    ExitCondition,
    Status,
    ClosedAt,
    Destination,
    Hours,
    Inventory,
}

impl Column {
    pub const DEFAULT: &'static [Column] = &[
        Column::Id,
        Column::Order,
        Column::Name,
        Column::Pn,
        Column::Sn,
        Column::EntryCondition,
        Column::EntryDate,
        Column::ExitCondition,
        Column::Inventory,
    ];

    pub fn header(self) -> &'static str {
        match self {
            Column::Id => "ID",
            Column::Order => "OT",
            Column::Name => "NAME",
            Column::Pn => "PN",
            Column::Sn => "SN",
            Column::EntryCondition => "ENTRY",
            Column::EntryDate => "ENTERED",
            Column::ExitCondition => "EXIT",
            Column::Status => "STATUS",
            Column::ClosedAt => "CLOSED",
            Column::Destination => "DESTINATION",
            Column::Hours => "HOURS",
            Column::Inventory => "INVENTORY",
        }
    }

    pub fn value(self, record: &Equipment) -> String {
        match self {
            Column::Id => record.id.to_string(),
            Column::Order => record.order_number.clone(),
            Column::Name => record.name.clone(),
            Column::Pn => record.part_number.clone(),
            Column::Sn => record.serial_number.clone(),
            Column::EntryCondition => record.entry_condition.label().to_string(),
            Column::EntryDate => or_placeholder(&record.entry_date, ""),
            Column::ExitCondition => record.exit_condition.map(|c| c.label().to_string()).unwrap_or_default(),
            Column::Status => record.state().to_string(),
            Column::ClosedAt => or_placeholder(&record.closed_at, ""),
            Column::Destination => or_placeholder(&record.destination, ""),
            Column::Hours => record.hours.map(|h| format_hours(Some(h))).unwrap_or_default(),
            Column::Inventory => if record.in_inventory { "Yes" } else { "No" }.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum Chunk {
    Number(u64),
    Text(String),
}

fn natural_key(value: &str) -> Vec<Chunk> {
    let mut chunks = Vec::new();
    let mut digits = String::new();
    let mut text = String::new();

    for c in value.chars() {
        if c.is_ascii_digit() {
            if !text.is_empty() {
                chunks.push(Chunk::Text(std::mem::take(&mut text)));
            }
            digits.push(c);
        } else {
            if !digits.is_empty() {
                chunks.push(Chunk::Number(digits.parse().unwrap_or(u64::MAX)));
                digits.clear();
            }
            text.extend(c.to_lowercase());
        }
    }
    if !digits.is_empty() {
        chunks.push(Chunk::Number(digits.parse().unwrap_or(u64::MAX)));
    }
    if !text.is_empty() {
        chunks.push(Chunk::Text(text));
    }
    chunks
}

/// Orders "OT-9" before "OT-10", ignoring case.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    natural_key(a).cmp(&natural_key(b))
}

/// prettytable style spec for a row: out of inventory greyed, otherwise by
/// exit condition, falling back to the entry condition.
pub fn row_style(record: &Equipment) -> &'static str {
    if !record.in_inventory {
        return "FD";
    }
    match record.exit_condition {
        Some(ExitCondition::Serviceable) => "Fy",
        Some(ExitCondition::Repairable) => "Fg",
        Some(ExitCondition::Scrapped) => "Fr",
        Some(ExitCondition::Standby) => "BdFw",
        Some(ExitCondition::AwaitingMaterial) => "Fb",
        Some(ExitCondition::Incomplete) => "Fm",
        None => match record.entry_condition {
            EntryCondition::Serviceable => "Fy",
            EntryCondition::Repairable => "Fg",
            EntryCondition::Scrapped => "Fr",
            EntryCondition::Litigation => "Fw",
        },
    }
}

#[derive(Debug, Clone, Default)]
pub struct ListView {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub styles: Vec<&'static str>,
}

impl ListView {
    /// Records keep the store order unless `sort` names a column.
    pub fn build(records: &[Equipment], columns: &[Column], sort: Option<Column>) -> Self {
        let columns = if columns.is_empty() { Column::DEFAULT } else { columns };

        let mut ordered: Vec<&Equipment> = records.iter().collect();
        if let Some(column) = sort {
            ordered.sort_by(|a, b| natural_cmp(&column.value(a), &column.value(b)));
        }

        ListView {
            headers: columns.iter().map(|c| c.header().to_string()).collect(),
            rows: ordered.iter().map(|r| columns.iter().map(|c| c.value(r)).collect()).collect(),
            styles: ordered.iter().map(|r| row_style(r)).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn table(&self) -> Table {
        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_NO_BORDER_LINE_SEPARATOR);
        table.set_titles(Row::new(self.headers.iter().map(|h| Cell::new(h).style_spec("b")).collect()));
        for (values, style) in self.rows.iter().zip(&self.styles) {
            table.add_row(Row::new(values.iter().map(|v| Cell::new(v).style_spec(style)).collect()));
        }
        table
    }

    pub fn print(&self) {
        self.table().printstd();
    }
}

/// Info tab of one record: every facet, its documents and its history.
pub fn detail(record: &Equipment, interventions: &[Intervention], attachments: &[Attachment]) -> Vec<Table> {
    let yes_no = |flag: bool| if flag { "Yes" } else { "No" };
    let dash = |value: &Option<String>| or_placeholder(value, "-");

    let mut facets = Table::new();
    facets.set_format(*format::consts::FORMAT_CLEAN);
    facets.add_row(row![b->"ID", record.id]);
    facets.add_row(row![b->"Name", record.name]);
    facets.add_row(row![b->"PN", record.part_number]);
    facets.add_row(row![b->"SN", record.serial_number]);
    facets.add_row(row![b->"OT", record.order_number]);
    facets.add_row(row![b->"Defect report", dash(&record.defect_report)]);
    facets.add_row(row![b->"State", record.state()]);
    facets.add_row(row![b->"Entry condition", record.entry_condition]);
    facets.add_row(row![b->"Entered", dash(&record.entry_date)]);
    facets.add_row(row![b->"Entry remarks", dash(&record.entry_remarks)]);
    facets.add_row(row![b->"Exit condition", record.current_status()]);
    facets.add_row(row![b->"Exit remarks", dash(&record.exit_remarks)]);
    facets.add_row(row![b->"Closed", yes_no(record.closed)]);
    facets.add_row(row![b->"Closed at", dash(&record.closed_at)]);
    facets.add_row(row![b->"Destination", dash(&record.destination)]);
    facets.add_row(row![b->"Hours", format_hours(record.hours)]);
    facets.add_row(row![b->"Container", yes_no(record.container)]);
    facets.add_row(row![b->"Closure remarks", dash(&record.closure_remarks)]);
    facets.add_row(row![b->"Return voucher", yes_no(record.return_voucher)]);
    facets.add_row(row![b->"In inventory", yes_no(record.in_inventory)]);
    facets.add_row(row![b->"Exited at", dash(&record.exited_at)]);
    facets.add_row(row![b->"Folder", dash(&record.folder)]);

    let mut documents = Table::new();
    documents.set_titles(row![b->"#", b->"KIND", b->"PATH"]);
    let mut index = 1;
    for (label, path) in [
        ("entry document", &record.entry_document),
        ("certificate", &record.certificate),
        ("final defect report", &record.final_defect_report),
    ] {
        if let Some(path) = path.as_deref().filter(|p| !p.trim().is_empty()) {
            documents.add_row(row![index, label, path]);
            index += 1;
        }
    }
    for attachment in attachments {
        documents.add_row(row![index, attachment.kind, attachment.path]);
        index += 1;
    }

    let mut history = Table::new();
    history.set_titles(row![b->"DATE", b->"INTERVENTION"]);
    for entry in interventions {
        history.add_row(row![or_placeholder(&entry.timestamp, "legacy"), entry.text]);
    }

    vec![facets, documents, history]
}

/// Every document of a record in the order `show` numbers them.
pub fn document_paths(record: &Equipment, attachments: &[Attachment]) -> Vec<String> {
    [&record.entry_document, &record.certificate, &record.final_defect_report]
        .into_iter()
        .filter_map(|p| p.as_deref().filter(|p| !p.trim().is_empty()).map(str::to_string))
        .chain(attachments.iter().map(|a| a.path.clone()))
        .collect()
}
