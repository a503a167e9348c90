//! Closure of a record.
//!
//! Hours are passed through as typed so the validator sees exactly what the
//! operator wrote. After closing, the notice can go out right away; without
//! a terminal to ask on, it is skipped.

use super::{confirm, notify, Session};
use crate::{
    libs::{equipment::CloseInput, messages::Message},
    msg_success,
};
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct CloseArgs {
    /// Record id
    #[arg(required = true)]
    id: i64,
    /// Where the unit goes next (Repairable units)
    #[arg(short, long)]
    destination: Option<String>,
    /// Work hours, 0 to 10000
    #[arg(long, default_value = "")]
    hours: String,
    /// Shipped in a container
    #[arg(long)]
    container: bool,
    /// Closure remarks
    #[arg(short, long)]
    remarks: Option<String>,
    /// Send the closure notice without asking
    #[arg(long, conflicts_with = "no_notify")]
    notify: bool,
    /// Skip the closure notice without asking
    #[arg(long)]
    no_notify: bool,
}

/// What to do about the closure notice once the record is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeChoice {
    Send,
    Skip,
    Ask,
}

impl NoticeChoice {
    pub fn from_flags(notify: bool, no_notify: bool) -> Self {
        match (notify, no_notify) {
            (true, _) => NoticeChoice::Send,
            (_, true) => NoticeChoice::Skip,
            _ => NoticeChoice::Ask,
        }
    }

    /// The closure is already stored, so a prompt that cannot be shown
    /// counts as a no instead of failing the command.
    pub fn resolve(self, ask: impl FnOnce() -> Result<bool>) -> bool {
        match self {
            NoticeChoice::Send => true,
            NoticeChoice::Skip => false,
            NoticeChoice::Ask => ask().unwrap_or_else(|e| {
                tracing::debug!(error = %e, "closure notice prompt unavailable, skipping");
                false
            }),
        }
    }
}

pub fn cmd(args: CloseArgs) -> Result<()> {
    let session = Session::open()?;
    let workshop = session.workshop();
    let input = CloseInput {
        destination: args.destination,
        hours: args.hours,
        container: args.container,
        remarks: args.remarks,
    };

    workshop.close(args.id, &input)?;
    let record = workshop.get(args.id)?;
    msg_success!(Message::EquipmentClosed(record.order_number.clone()));

    let choice = NoticeChoice::from_flags(args.notify, args.no_notify);
    if choice.resolve(|| confirm(Message::ConfirmSendCloseNotice, false)) {
        notify::send_closure_notice(&session, &record)?;
    }
    Ok(())
}
