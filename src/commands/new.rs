use super::Session;
use crate::{
    libs::{
        equipment::{EntryCondition, NewEquipment},
        messages::Message,
    },
    msg_success,
};
use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct NewArgs {
    /// Equipment name
    #[arg(required = true)]
    name: String,
    /// Part number
    #[arg(required = true)]
    pn: String,
    /// Serial number
    #[arg(required = true)]
    sn: String,
    /// Technical order number, unique across the store
    #[arg(required = true)]
    ot: String,
    /// Defect report reference received with the unit
    #[arg(long)]
    defect_report: Option<String>,
    /// Entry condition (serviceable, repairable, litigation, scrapped)
    #[arg(short, long, default_value = "repairable")]
    condition: EntryCondition,
    /// Entry remarks
    #[arg(short, long)]
    remarks: Option<String>,
    /// Entry document to file with the record
    #[arg(short, long)]
    document: Option<PathBuf>,
}

pub fn cmd(args: NewArgs) -> Result<()> {
    let session = Session::open()?;
    let input = NewEquipment {
        name: args.name,
        part_number: args.pn,
        serial_number: args.sn,
        order_number: args.ot,
        defect_report: args.defect_report,
        entry_condition: args.condition,
        entry_remarks: args.remarks,
    };

    let record = session.workshop().register(&input, args.document.as_deref())?;
    msg_success!(Message::EquipmentRegistered(record.order_number.clone(), record.id));
    Ok(())
}
