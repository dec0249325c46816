use std::path::{Path, PathBuf};

use ledger_core::identity::{IdentityManager, LocalStorage};
use ledger_core::media::ImageAttachment;
use ledger_core::models::{parse_session_date_input, SessionDraft};
use ledger_core::service::LedgerService;
use ledger_core::Session;

use crate::commands::common::{format_session_date, require_participant};
use crate::error::CliError;

pub struct ProposeArgs {
    pub date: String,
    pub title: Option<String>,
    pub location: Option<String>,
    pub image: Option<PathBuf>,
}

pub fn read_image(path: &Path) -> Result<ImageAttachment, CliError> {
    let bytes = std::fs::read(path)?;
    let file_name = path
        .file_name()
        .map_or_else(|| "image".to_string(), |name| name.to_string_lossy().into_owned());
    let content_type = mime_guess::from_path(path).first_raw().map(str::to_string);
    Ok(ImageAttachment {
        file_name,
        content_type,
        bytes,
    })
}

pub async fn run_propose<S: LocalStorage>(
    service: &LedgerService,
    identity: &IdentityManager<S>,
    args: &ProposeArgs,
) -> Result<Session, CliError> {
    let proposer = require_participant(identity)?;
    let draft = SessionDraft {
        date: parse_session_date_input(&args.date)?,
        title: args.title.clone().unwrap_or_default(),
        location: args.location.clone().unwrap_or_default(),
    };
    let image = args.image.as_deref().map(read_image).transpose()?;

    let session = service
        .create_session(&draft, &proposer, image.as_ref())
        .await?;
    println!(
        "{}  {}  {}",
        session.id,
        format_session_date(&session),
        session.title
    );
    Ok(session)
}
