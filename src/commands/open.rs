use super::Session;
use crate::{
    db::equipments::Equipments,
    libs::{filing::open_with_default_app, messages::Message, view::document_paths},
    msg_bail_anyhow, msg_info, msg_print,
};
use anyhow::Result;
use clap::Args;
use std::path::Path;

#[derive(Debug, Args)]
pub struct OpenArgs {
    /// Record id
    #[arg(required = true)]
    id: i64,
    /// Document number as listed by `show`; lists the documents when omitted
    index: Option<usize>,
}

pub fn cmd(args: OpenArgs) -> Result<()> {
    let session = Session::open()?;
    let record = session.workshop().get(args.id)?;
    let attachments = Equipments::new(&session.db).attachments(record.id)?;
    let documents = document_paths(&record, &attachments);

    let Some(index) = args.index else {
        if documents.is_empty() {
            msg_info!(Message::NoDocuments);
        } else {
            msg_print!(Message::DocumentsHeader);
            for (i, path) in documents.iter().enumerate() {
                println!("  {}. {}", i + 1, path);
            }
        }
        return Ok(());
    };

    let Some(path) = index.checked_sub(1).and_then(|i| documents.get(i)) else {
        msg_bail_anyhow!(Message::DocumentIndexOutOfRange(index));
    };
    msg_info!(Message::OpeningDocument(path.clone()));
    if let Err(e) = open_with_default_app(Path::new(path)) {
        tracing::warn!(path = %path, error = %e, "could not open document");
        msg_bail_anyhow!(Message::FileMissing(path.clone()));
    }
    Ok(())
}
