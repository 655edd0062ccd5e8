//! File listing markup
//!
//! Turns remote file metadata into the collapsible listing section embedded
//! in the admin page.

use crate::remote::RemoteFile;

/// Placeholder shown in the time column when enrichment failed
const UNKNOWN_TIME: &str = "unknown";

/// Renders the repository listing section, or an empty string for an empty
/// listing (the page falls back to a placeholder section).
pub fn render_file_list(files: &[RemoteFile]) -> String {
    if files.is_empty() {
        return String::new();
    }

    let mut items = String::new();
    for file in files {
        items.push_str(&render_file_item(file));
    }

    format!(
        r##"<div class="section">
  <div class="section-header" onclick="toggleSection('fileList')">
    <h3>&#128193; Repository files <span class="file-count">{count} files</span></h3>
    <span class="toggle-icon">&#9660;</span>
  </div>
  <div class="section-content" id="fileList">
    <div class="file-grid">{items}</div>
    <div class="file-management-section">
      <div class="file-management-controls">
        <button class="btn primary create-btn" onclick="createFile()">&#10133; New file</button>
        <button class="btn success edit-btn" onclick="editSelectedFile()" disabled>&#9999;&#65039; Edit selected</button>
        <button class="btn danger delete-btn" onclick="deleteSelectedFiles()" disabled>&#128465;&#65039; Delete selected</button>
      </div>
      <div class="selection-info" id="selectionInfo">No files selected</div>
    </div>
  </div>
</div>"##,
        count = files.len(),
        items = items,
    )
}

fn render_file_item(file: &RemoteFile) -> String {
    let icon = if file.is_file() {
        "&#128196;"
    } else {
        "&#128193;"
    };
    let size = if file.size > 0 {
        format!("{:.1} KB", file.size as f64 / 1024.0)
    } else {
        "-".to_string()
    };
    let time = if file.is_file() {
        file.last_modified
            .as_deref()
            .map(format_commit_date)
            .unwrap_or_else(|| UNKNOWN_TIME.to_string())
    } else {
        "Folder".to_string()
    };

    let name_markup = if file.is_file() {
        format!(
            r##"<a href="/{href}" target="_blank">{name}</a>"##,
            href = escape_attr(&file.name),
            name = escape_text(&file.name),
        )
    } else {
        format!("<strong>{}</strong>", escape_text(&file.name))
    };

    let actions = if file.is_file() {
        format!(
            r##"<input type="checkbox" class="file-checkbox" data-filename="{name}" data-sha="{sha}" onchange="updateSelection()">"##,
            name = escape_attr(&file.name),
            sha = escape_attr(&file.sha),
        )
    } else {
        String::new()
    };

    format!(
        r##"<div class="file-item">
  <div class="file-main">
    <div class="file-icon">{icon}</div>
    <div class="file-info">
      <div class="file-name">{name_markup}</div>
      <div class="file-meta"><span class="file-size">{size}</span><span class="file-time">{time}</span></div>
    </div>
  </div>
  <div class="file-actions">{actions}</div>
</div>"##,
    )
}

/// Formats a commit timestamp for the listing, in UTC.
pub fn format_commit_date(date: &str) -> String {
    match chrono::DateTime::parse_from_rfc3339(date) {
        Ok(parsed) => parsed
            .with_timezone(&chrono::Utc)
            .format("%Y-%m-%d %H:%M")
            .to_string(),
        Err(_) => "invalid time".to_string(),
    }
}

fn escape_text(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attr(value: &str) -> String {
    escape_text(value)
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::EntryType;

    fn file(name: &str, size: u64, last_modified: Option<&str>) -> RemoteFile {
        RemoteFile {
            name: name.to_string(),
            path: name.to_string(),
            sha: format!("sha-{}", name),
            size,
            entry_type: EntryType::File,
            last_modified: last_modified.map(str::to_string),
        }
    }

    fn dir(name: &str) -> RemoteFile {
        RemoteFile {
            name: name.to_string(),
            path: name.to_string(),
            sha: format!("sha-{}", name),
            size: 0,
            entry_type: EntryType::Dir,
            last_modified: None,
        }
    }

    #[test]
    fn test_empty_listing_renders_nothing() {
        assert_eq!(render_file_list(&[]), "");
    }

    #[test]
    fn test_listing_contains_every_entry() {
        let files = vec![
            file("a.txt", 2048, Some("2024-01-02T03:04:05Z")),
            dir("archive"),
        ];
        let markup = render_file_list(&files);
        assert!(markup.contains("2 files"));
        assert!(markup.contains("a.txt"));
        assert!(markup.contains("<strong>archive</strong>"));
        assert!(markup.contains("2.0 KB"));
        assert!(markup.contains("2024-01-02 03:04"));
    }

    #[test]
    fn test_checkbox_only_for_files() {
        let markup = render_file_list(&[file("a.txt", 1, None), dir("d")]);
        assert_eq!(markup.matches("file-checkbox").count(), 1);
        assert!(markup.contains(r#"data-sha="sha-a.txt""#));
    }

    #[test]
    fn test_unenriched_entry_shows_placeholder() {
        let markup = render_file_list(&[file("a.txt", 1, None)]);
        assert!(markup.contains("unknown"));
    }

    #[test]
    fn test_date_formatting() {
        assert_eq!(
            format_commit_date("2024-06-30T22:15:00+02:00"),
            "2024-06-30 20:15"
        );
        assert_eq!(format_commit_date("garbage"), "invalid time");
    }

    #[test]
    fn test_attribute_values_escaped() {
        let markup = render_file_list(&[file(r#"we"ird.txt"#, 1, None)]);
        assert!(markup.contains("we&quot;ird.txt"));
        assert!(!markup.contains(r#"data-filename="we"ird.txt""#));
    }
}
