//! Closure notices and material requests.

use super::Session;
use crate::{
    libs::{
        equipment::Equipment,
        notify::{self, MaterialRequest, Notifier},
        validators::validate_material_request,
    },
    msg_success,
};
use anyhow::Result;
use clap::{Args, Subcommand};

#[derive(Debug, Args)]
pub struct NotifyArgs {
    #[command(subcommand)]
    command: NotifyCommand,
}

#[derive(Debug, Subcommand)]
enum NotifyCommand {
    /// Closure notice of a closed record
    Close {
        /// Record id
        id: i64,
    },
    /// Request material for a record
    Material {
        /// Record id
        id: i64,
        /// Name of the part needed
        #[arg(long, default_value = "")]
        part_name: String,
        /// Part number of the part needed
        #[arg(long)]
        part_pn: Option<String>,
        /// Serial number of the part needed
        #[arg(long)]
        part_sn: Option<String>,
        /// How many
        #[arg(short, long, default_value = "")]
        quantity: String,
    },
}

pub(crate) fn send_closure_notice(session: &Session, record: &Equipment) -> Result<()> {
    let draft = notify::closure_notice(record)?;
    let sent = Notifier::from_config(&session.config)?.deliver(&draft)?;
    msg_success!(sent);
    Ok(())
}

pub fn cmd(args: NotifyArgs) -> Result<()> {
    let session = Session::open()?;
    let workshop = session.workshop();

    match args.command {
        NotifyCommand::Close { id } => {
            let record = workshop.get(id)?;
            send_closure_notice(&session, &record)?;
        }
        NotifyCommand::Material {
            id,
            part_name,
            part_pn,
            part_sn,
            quantity,
        } => {
            let record = workshop.get(id)?;
            let quantity = validate_material_request(&part_name, &quantity)?;
            let request = MaterialRequest {
                part_name,
                part_number: part_pn,
                serial_number: part_sn,
                quantity,
            };
            let draft = notify::material_request(&record, &request);
            let sent = Notifier::from_config(&session.config)?.deliver(&draft)?;
            msg_success!(sent);
        }
    }
    Ok(())
}
