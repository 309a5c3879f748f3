use serde::{Deserialize, Serialize};

/// Options shared by the open and save file dialogs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FileDialogOptions {
    pub title: Option<String>,
    /// Initial path shown by the dialog.
    pub path: Option<String>,
    /// Label of the confirm button.
    pub button: Option<String>,
    /// Allowed file extensions, without the dot.
    pub ext: Option<Vec<String>>,
    /// `false` opens the dialog unattached even when a caller surface exists.
    pub attach_to_window: Option<bool>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub enum OpenMode {
    #[serde(rename = "directory")]
    Directory,
    #[default]
    #[serde(rename = "file")]
    File,
    #[serde(rename = "multiple files")]
    MultipleFiles,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct OpenDialogOptions {
    #[serde(flatten)]
    pub file: FileDialogOptions,
    pub mode: OpenMode,
}

pub type SaveDialogOptions = FileDialogOptions;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "lowercase")]
pub enum OpenDialogResult {
    Ok { paths: Vec<String> },
    Canceled,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "lowercase")]
pub enum SaveDialogResult {
    Ok { path: String },
    Canceled,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSkin {
    #[default]
    Default,
    Info,
    Warning,
    Error,
    Question,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AlertOptions {
    pub title: Option<String>,
    pub buttons: Option<Vec<String>>,
    pub skin: AlertSkin,
    pub attach_to_window: Option<bool>,
}

/// What the host is asked to display for `alert`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageBox {
    pub message: String,
    pub title: Option<String>,
    pub buttons: Vec<String>,
    pub skin: AlertSkin,
}

impl MessageBox {
    /// Label for the host's response index: `0` cancels, `n` picks
    /// `buttons[n - 1]`, anything past the buttons confirms.
    pub fn outcome(&self, response: usize) -> String {
        match response {
            0 => "cancel".to_string(),
            n => self
                .buttons
                .get(n - 1)
                .cloned()
                .unwrap_or_else(|| "confirm".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn open_options_accept_the_renderer_shape() {
        let opts: OpenDialogOptions = serde_json::from_value(json!({
            "title": "Pick",
            "ext": ["png", "jpg"],
            "mode": "multiple files",
            "attachToWindow": false
        }))
        .unwrap();
        assert_eq!(opts.mode, OpenMode::MultipleFiles);
        assert_eq!(opts.file.title.as_deref(), Some("Pick"));
        assert_eq!(opts.file.attach_to_window, Some(false));
        assert_eq!(opts.file.ext, Some(vec!["png".to_string(), "jpg".to_string()]));

        let empty: OpenDialogOptions = serde_json::from_value(json!({})).unwrap();
        assert_eq!(empty, OpenDialogOptions::default());
    }

    #[test]
    fn results_are_tagged_on_result() {
        assert_eq!(
            serde_json::to_value(OpenDialogResult::Ok {
                paths: vec!["/a".into()]
            })
            .unwrap(),
            json!({"result": "ok", "paths": ["/a"]})
        );
        assert_eq!(
            serde_json::to_value(SaveDialogResult::Canceled).unwrap(),
            json!({"result": "canceled"})
        );
    }

    #[test]
    fn message_box_outcome_maps_response_index() {
        let mb = MessageBox {
            message: "Delete?".into(),
            title: None,
            buttons: vec!["Delete".into(), "Keep".into()],
            skin: AlertSkin::Question,
        };
        assert_eq!(mb.outcome(0), "cancel");
        assert_eq!(mb.outcome(1), "Delete");
        assert_eq!(mb.outcome(2), "Keep");
        assert_eq!(mb.outcome(3), "confirm");
    }
}
