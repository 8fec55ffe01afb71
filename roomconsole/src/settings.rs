//! Multipart forms for settings that carry files.
//!
//! A file field has three meanings on the wire: omitted leaves the stored
//! file alone, an empty string deletes it, and a file part replaces it.

use std::path::Path;

use reqwest::multipart::{Form, Part};

use crate::error::Result;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FileField {
    #[default]
    Keep,
    Delete,
    Replace {
        file_name: String,
        mime: String,
        bytes: Vec<u8>,
    },
}

impl FileField {
    /// Read a replacement file from disk.
    pub async fn from_path(path: &Path) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        Ok(FileField::Replace {
            mime: mime_for(path).to_string(),
            file_name,
            bytes,
        })
    }

    fn value(&self) -> Option<FormValue> {
        match self {
            FileField::Keep => None,
            FileField::Delete => Some(FormValue::Text(String::new())),
            FileField::Replace {
                file_name,
                mime,
                bytes,
            } => Some(FormValue::File {
                file_name: file_name.clone(),
                mime: mime.clone(),
                bytes: bytes.clone(),
            }),
        }
    }
}

fn mime_for(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("css") => "text/css",
        _ => "application/octet-stream",
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormValue {
    Text(String),
    File {
        file_name: String,
        mime: String,
        bytes: Vec<u8>,
    },
}

/// A settings form that is sent as multipart with a spoofed `PUT`.
pub trait MultipartSettings {
    /// Fields in submission order, excluding `_method`.
    fn fields(&self) -> Vec<(&'static str, FormValue)>;

    fn to_form(&self) -> Result<Form> {
        let mut form = Form::new().text("_method", "PUT");
        for (name, value) in self.fields() {
            form = match value {
                FormValue::Text(text) => form.text(name, text),
                FormValue::File {
                    file_name,
                    mime,
                    bytes,
                } => form.part(name, Part::bytes(bytes).file_name(file_name).mime_str(&mime)?),
            };
        }
        Ok(form)
    }
}

fn flag(value: bool) -> FormValue {
    FormValue::Text(if value { "1" } else { "0" }.to_string())
}

/// System-wide streaming settings.
#[derive(Debug, Clone, Default)]
pub struct StreamingSettingsForm {
    pub enabled: Option<bool>,
    /// `Some("")` clears the parameters, `None` leaves them.
    pub join_parameters: Option<String>,
    pub default_pause_image: FileField,
    pub css_file: FileField,
}

impl MultipartSettings for StreamingSettingsForm {
    fn fields(&self) -> Vec<(&'static str, FormValue)> {
        let mut fields = Vec::new();
        if let Some(enabled) = self.enabled {
            fields.push(("enabled", flag(enabled)));
        }
        if let Some(params) = &self.join_parameters {
            fields.push(("join_parameters", FormValue::Text(params.clone())));
        }
        if let Some(v) = self.default_pause_image.value() {
            fields.push(("default_pause_image", v));
        }
        if let Some(v) = self.css_file.value() {
            fields.push(("css_file", v));
        }
        fields
    }
}

/// Streaming settings of one room type.
#[derive(Debug, Clone, Default)]
pub struct RoomTypeStreamingForm {
    pub enabled: Option<bool>,
    pub default_pause_image: FileField,
}

impl MultipartSettings for RoomTypeStreamingForm {
    fn fields(&self) -> Vec<(&'static str, FormValue)> {
        let mut fields = Vec::new();
        if let Some(enabled) = self.enabled {
            fields.push(("enabled", flag(enabled)));
        }
        if let Some(v) = self.default_pause_image.value() {
            fields.push(("default_pause_image", v));
        }
        fields
    }
}

/// Streaming configuration of one room.
#[derive(Debug, Clone, Default)]
pub struct RoomStreamingConfigForm {
    pub enabled: Option<bool>,
    pub pause_image: FileField,
}

impl MultipartSettings for RoomStreamingConfigForm {
    fn fields(&self) -> Vec<(&'static str, FormValue)> {
        let mut fields = Vec::new();
        if let Some(enabled) = self.enabled {
            fields.push(("enabled", flag(enabled)));
        }
        if let Some(v) = self.pause_image.value() {
            fields.push(("pause_image", v));
        }
        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keep_omits_field() {
        let form = StreamingSettingsForm {
            enabled: Some(true),
            ..Default::default()
        };
        assert_eq!(form.fields(), vec![("enabled", FormValue::Text("1".into()))]);
    }

    #[test]
    fn delete_sends_empty_string() {
        let form = RoomTypeStreamingForm {
            enabled: None,
            default_pause_image: FileField::Delete,
        };
        assert_eq!(
            form.fields(),
            vec![("default_pause_image", FormValue::Text(String::new()))]
        );
    }

    #[test]
    fn replace_sends_file_part() {
        let form = StreamingSettingsForm {
            enabled: Some(false),
            join_parameters: Some(String::new()),
            default_pause_image: FileField::Keep,
            css_file: FileField::Replace {
                file_name: "player.css".into(),
                mime: "text/css".into(),
                bytes: b"body{}".to_vec(),
            },
        };
        let fields = form.fields();
        let names: Vec<&str> = fields.iter().map(|(n, _)| *n).collect();
        assert_eq!(names, ["enabled", "join_parameters", "css_file"]);
        assert_eq!(fields[0].1, FormValue::Text("0".into()));
        assert!(matches!(
            &fields[2].1,
            FormValue::File { file_name, .. } if file_name == "player.css"
        ));
        assert!(form.to_form().is_ok());
    }

    #[test]
    fn mime_from_extension() {
        assert_eq!(mime_for(Path::new("pause.PNG")), "image/png");
        assert_eq!(mime_for(Path::new("pause.jpeg")), "image/jpeg");
        assert_eq!(mime_for(Path::new("README")), "application/octet-stream");
    }

    #[tokio::test]
    async fn missing_file_is_an_io_error() {
        let err = FileField::from_path(Path::new("/nonexistent/pause.png"))
            .await
            .unwrap_err();
        assert!(matches!(err, crate::ConsoleError::Io(_)));
    }
}
