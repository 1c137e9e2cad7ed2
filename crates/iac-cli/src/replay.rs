//! Scripted editing: feed recorded input events through an editor session.

use anyhow::{Context, Result};
use iac_client::{DesignService, EditorSession};
use iac_editor::{EditorConfig, InputEvent, Notice, RenamePolicy};

/// What a replay did.
#[derive(Debug, Default, PartialEq)]
pub struct ReplayReport {
    pub events: usize,
    pub notices: Vec<Notice>,
    pub dirty: bool,
    pub saved: bool,
}

pub fn parse_script(text: &str) -> Result<Vec<InputEvent>> {
    serde_json::from_str(text).context("script must be a JSON array of input events")
}

/// Open `design_id`, run `events` through the editor in order, and save
/// when asked to (or when the script itself presses the save shortcut).
pub async fn replay<S: DesignService>(
    service: S,
    design_id: &str,
    events: Vec<InputEvent>,
    rename_policy: RenamePolicy,
    save: bool,
) -> Result<(EditorSession<S>, ReplayReport)> {
    let config = EditorConfig {
        rename_policy,
        ..EditorConfig::default()
    };
    let mut session = EditorSession::new(service, config);
    session
        .open(design_id)
        .await
        .with_context(|| format!("failed to open design {design_id}"))?;

    let mut report = ReplayReport {
        events: events.len(),
        ..ReplayReport::default()
    };
    let editor = session.editor_mut();
    for event in events {
        editor.enqueue(event);
    }
    editor.drain();
    report.notices = editor.take_notices();
    let save_requested = editor.take_save_request();

    if save || save_requested {
        session.save().await.context("failed to save design")?;
        report.saved = true;
    }
    report.dirty = session.editor().is_dirty();
    Ok((session, report))
}
