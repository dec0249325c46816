//! Image selection for the proposal form.

use ledger_core::media::ImageAttachment;
use rfd::AsyncFileDialog;

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp", "bmp", "svg"];

/// Open a file dialog and read the chosen image. `None` if cancelled.
pub async fn pick_session_image() -> Option<ImageAttachment> {
    let file = AsyncFileDialog::new()
        .add_filter("Images", IMAGE_EXTENSIONS)
        .pick_file()
        .await?;

    let file_name = file.file_name();
    let content_type = mime_guess::from_path(&file_name)
        .first_raw()
        .map(str::to_string);
    let bytes = file.read().await;
    tracing::debug!("Picked image {} ({} bytes)", file_name, bytes.len());

    Some(ImageAttachment {
        file_name,
        content_type,
        bytes,
    })
}
