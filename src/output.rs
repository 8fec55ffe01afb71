use std::io::Write;

use roomconsole::types::*;
use roomconsole::{EmptyState, Pagination};
use serde::Serialize;

use crate::error::CliError;

/// A record printable as one TSV line.
pub trait Row: Serialize {
    const HEADER: &'static [&'static str];

    fn columns(&self) -> Vec<String>;
}

fn opt<T: ToString>(v: &Option<T>) -> String {
    v.as_ref().map(ToString::to_string).unwrap_or_default()
}

impl Row for Role {
    const HEADER: &'static [&'static str] = &["id", "name", "superuser", "room_limit"];

    fn columns(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            self.superuser.to_string(),
            opt(&self.room_limit),
        ]
    }
}

impl Row for Server {
    const HEADER: &'static [&'static str] =
        &["id", "name", "status", "health", "meetings", "participants", "version"];

    fn columns(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            format!("{:?}", self.status).to_lowercase(),
            self.health
                .map(|h| format!("{h:?}").to_lowercase())
                .unwrap_or_default(),
            opt(&self.meeting_count),
            opt(&self.participant_count),
            opt(&self.version),
        ]
    }
}

impl Row for ServerPool {
    const HEADER: &'static [&'static str] = &["id", "name", "servers"];

    fn columns(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            self.servers_count.to_string(),
        ]
    }
}

impl Row for User {
    const HEADER: &'static [&'static str] = &["id", "name", "email", "authenticator", "roles"];

    fn columns(&self) -> Vec<String> {
        let roles: Vec<&str> = self.roles.iter().map(|r| r.name.as_str()).collect();
        vec![
            self.id.to_string(),
            self.full_name(),
            self.email.clone(),
            self.authenticator.clone(),
            roles.join(","),
        ]
    }
}

impl Row for RoomType {
    const HEADER: &'static [&'static str] = &["id", "name", "color", "server_pool"];

    fn columns(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            self.color.clone(),
            self.server_pool
                .as_ref()
                .map(|p| p.name.clone())
                .unwrap_or_default(),
        ]
    }
}

impl Row for Recording {
    const HEADER: &'static [&'static str] = &["id", "description", "start", "end", "formats"];

    fn columns(&self) -> Vec<String> {
        let formats: Vec<&str> = self.formats.iter().map(|f| f.format.as_str()).collect();
        vec![
            self.id.clone(),
            opt(&self.description),
            self.start.to_rfc3339(),
            self.end.map(|e| e.to_rfc3339()).unwrap_or_default(),
            formats.join(","),
        ]
    }
}

impl Row for RoomMeeting {
    const HEADER: &'static [&'static str] = &["id", "start", "end"];

    fn columns(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.start.to_rfc3339(),
            self.end.map(|e| e.to_rfc3339()).unwrap_or_default(),
        ]
    }
}

impl Row for RoomMember {
    const HEADER: &'static [&'static str] = &["id", "name", "email", "role"];

    fn columns(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            format!("{} {}", self.firstname, self.lastname),
            self.email.clone(),
            format!("{:?}", self.role),
        ]
    }
}

/// Write rows as TSV (with a header line) or as JSON lines.
pub fn write_rows<W: Write, T: Row>(
    rows: &[T],
    json_mode: bool,
    writer: &mut W,
) -> Result<(), CliError> {
    let mut buf = String::new();
    if !json_mode {
        buf.push_str(&T::HEADER.join("\t"));
        buf.push('\n');
    }
    for row in rows {
        if json_mode {
            buf.push_str(&serde_json::to_string(row)?);
        } else {
            // Tabs and newlines inside values would break the columns.
            let cols: Vec<String> = row
                .columns()
                .into_iter()
                .map(|c| c.replace(['\t', '\n'], " "))
                .collect();
            buf.push_str(&cols.join("\t"));
        }
        buf.push('\n');
    }
    writer.write_all(buf.as_bytes())?;
    writer.flush()?;
    Ok(())
}

/// One-line summary for stderr below a listed page.
pub fn describe_page(pagination: Option<&Pagination>, empty: Option<EmptyState>) -> String {
    match (empty, pagination) {
        (Some(EmptyState::NoData), _) => "no entries yet".to_string(),
        (Some(EmptyState::NoResults), _) => "no entries match the search".to_string(),
        (None, Some(p)) => format!(
            "showing {}-{} of {} (page {} of {})",
            opt(&p.from),
            opt(&p.to),
            p.total,
            p.current_page,
            p.last_page
        ),
        (None, None) => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool(id: u64, name: &str) -> ServerPool {
        ServerPool {
            id,
            name: name.into(),
            description: None,
            servers_count: 2,
            servers: vec![],
            updated_at: None,
        }
    }

    #[test]
    fn tsv_has_header_and_sanitised_columns() {
        let mut out = Vec::new();
        write_rows(&[pool(1, "Pool\t1"), pool(2, "Pool 2")], false, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "id\tname\tservers\n1\tPool 1\t2\n2\tPool 2\t2\n");
    }

    #[test]
    fn json_lines_have_no_header() {
        let mut out = Vec::new();
        write_rows(&[pool(1, "Pool 1")], true, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 1);
        let v: serde_json::Value = serde_json::from_str(text.trim()).unwrap();
        assert_eq!(v["name"], "Pool 1");
    }

    #[test]
    fn empty_messages_differ() {
        assert_ne!(
            describe_page(None, Some(EmptyState::NoData)),
            describe_page(None, Some(EmptyState::NoResults))
        );
        let p = Pagination {
            current_page: 2,
            last_page: 3,
            active_index: 1,
            from: Some(11),
            to: Some(20),
            total: 25,
        };
        assert_eq!(describe_page(Some(&p), None), "showing 11-20 of 25 (page 2 of 3)");
    }
}
