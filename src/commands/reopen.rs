use super::{confirm, Session};
use crate::{libs::messages::Message, msg_success};
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct ReopenArgs {
    /// Record id
    #[arg(required = true)]
    id: i64,
    /// Do not ask for confirmation
    #[arg(short, long)]
    yes: bool,
}

pub fn cmd(args: ReopenArgs) -> Result<()> {
    let session = Session::open()?;
    let workshop = session.workshop();
    let record = workshop.get(args.id)?;

    if !confirm(Message::ConfirmReopen(record.order_number.clone()), args.yes)? {
        return Ok(());
    }
    workshop.reopen(args.id)?;
    msg_success!(Message::EquipmentReopened(record.order_number));
    Ok(())
}
