use super::{confirm, Session};
use crate::{libs::lifecycle, libs::messages::Message, msg_success};
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct ExitArgs {
    /// Record id
    #[arg(required = true)]
    id: i64,
    /// Do not ask for confirmation
    #[arg(short, long)]
    yes: bool,
}

pub fn cmd(args: ExitArgs) -> Result<()> {
    let session = Session::open()?;
    let workshop = session.workshop();
    let record = workshop.get(args.id)?;

    // Check before asking so a refused exit never prompts
    lifecycle::check_inventory_exit(&record, session.config.exit_policy)?;
    if !confirm(Message::ConfirmExit(record.order_number.clone()), args.yes)? {
        return Ok(());
    }
    workshop.exit_inventory(args.id)?;
    msg_success!(Message::EquipmentExited(record.order_number));
    Ok(())
}
