use super::Session;
use crate::{
    db::equipments::Equipments,
    libs::{messages::Message, view},
    msg_info, msg_print,
};
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct ShowArgs {
    /// Record id
    #[arg(required = true)]
    id: i64,
}

pub fn cmd(args: ShowArgs) -> Result<()> {
    let session = Session::open()?;
    let record = session.workshop().get(args.id)?;
    let equipments = Equipments::new(&session.db);
    let interventions = equipments.interventions(record.id)?;
    let attachments = equipments.attachments(record.id)?;

    let mut tables = view::detail(&record, &interventions, &attachments).into_iter();
    if let Some(facets) = tables.next() {
        facets.printstd();
    }

    msg_print!(Message::DocumentsHeader, true);
    match tables.next() {
        Some(documents) if !view::document_paths(&record, &attachments).is_empty() => {
            documents.printstd();
        }
        _ => msg_info!(Message::NoDocuments),
    }

    msg_print!(Message::HistoryHeader, true);
    match tables.next() {
        Some(history) if !interventions.is_empty() => {
            history.printstd();
        }
        _ => msg_info!(Message::NoInterventions),
    }
    Ok(())
}
