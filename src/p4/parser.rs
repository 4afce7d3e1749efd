//! p4 output parser
//!
//! Parses tagged (`-ztag`) output and change forms into structured data.

use std::sync::OnceLock;

use regex::Regex;

use super::constants::{errors, special};
use super::{P4Error, Severity};
use crate::model::{ChangeSpec, FileStat, OpenedFile, PendingAction, PendingChangelist, RevisionRecord};

/// Prefix on every field line of tagged output
const TAGGED_PREFIX: &str = "... ";

/// One record from tagged output: ordered key/value fields
///
/// Flag-style fields (e.g. `ourLock`) are stored with an empty value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaggedRecord {
    fields: Vec<(String, String)>,
}

impl TaggedRecord {
    /// Look up a field by key (first occurrence)
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Whether the record carries a field, flag-style fields included
    pub fn has(&self, key: &str) -> bool {
        self.fields.iter().any(|(k, _)| k == key)
    }

    fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    fn require(&self, key: &str) -> Result<&str, P4Error> {
        self.get(key)
            .ok_or_else(|| P4Error::ParseError(format!("missing field '{key}' in tagged record")))
    }

    #[cfg(test)]
    fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        TaggedRecord {
            fields: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}

/// Parse `-ztag` output into records
///
/// Field lines look like `... key value`; records are separated by blank
/// lines. Lines without the field prefix continue the previous field's
/// value (multi-line descriptions).
pub fn parse_tagged(output: &str) -> Vec<TaggedRecord> {
    let mut records = Vec::new();
    let mut current = TaggedRecord::default();

    for line in output.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                records.push(std::mem::take(&mut current));
            }
            continue;
        }

        if let Some(field) = line.strip_prefix(TAGGED_PREFIX) {
            match field.split_once(' ') {
                Some((key, value)) => current
                    .fields
                    .push((key.to_string(), value.to_string())),
                None => current.fields.push((field.to_string(), String::new())),
            }
        } else if let Some((_, value)) = current.fields.last_mut() {
            // Continuation of a multi-line value
            value.push('\n');
            value.push_str(line);
        }
    }

    if !current.is_empty() {
        records.push(current);
    }

    records
}

/// Parser for p4 command output
pub struct Parser;

impl Parser {
    /// Parse `p4 opened` tagged records into opened-file entries
    ///
    /// The server omits the `user`/`client` fields when listing only our
    /// own files, so the caller supplies its own identity as the default.
    pub fn parse_opened(
        records: &[TaggedRecord],
        default_user: &str,
        default_workspace: &str,
    ) -> Result<Vec<OpenedFile>, P4Error> {
        records
            .iter()
            .map(|record| {
                let action_raw = record.require("action")?;
                let action = PendingAction::parse(action_raw).ok_or_else(|| {
                    P4Error::ParseError(format!("unknown pending action '{action_raw}'"))
                })?;

                Ok(OpenedFile {
                    depot_path: record.require("depotFile")?.to_string(),
                    client_path: record.require("clientFile")?.to_string(),
                    file_type: record.require("type")?.to_string(),
                    action,
                    user: record.get("user").unwrap_or(default_user).to_string(),
                    workspace: record.get("client").unwrap_or(default_workspace).to_string(),
                    locked: record.has("ourLock"),
                })
            })
            .collect()
    }

    /// Parse `p4 changes -s pending` tagged records
    pub fn parse_pending_changes(
        records: &[TaggedRecord],
    ) -> Result<Vec<PendingChangelist>, P4Error> {
        records
            .iter()
            .map(|record| {
                Ok(PendingChangelist {
                    number: parse_number(record.require("change")?)?,
                    user: record.require("user")?.to_string(),
                    workspace: record.require("client")?.to_string(),
                    status: record.require("status")?.to_string(),
                    description: record.get("desc").unwrap_or_default().trim_end().to_string(),
                })
            })
            .collect()
    }

    /// Parse `p4 filelog` tagged output into revision records
    ///
    /// The tagged form reports one record per depot file, with the
    /// revision fields indexed: `rev0`, `action0`, `time0`, ... for the
    /// newest revision, `rev1` for the next, and so on. Order is
    /// preserved (newest first).
    pub fn parse_filelog(records: &[TaggedRecord]) -> Result<Vec<RevisionRecord>, P4Error> {
        let record = records
            .first()
            .ok_or_else(|| P4Error::ParseError("empty filelog output".to_string()))?;

        let mut revisions = Vec::new();
        for index in 0.. {
            let Some(rev) = record.get(&format!("rev{index}")) else {
                break;
            };

            revisions.push(RevisionRecord {
                revision: parse_number(rev)?,
                action: record.require(&format!("action{index}"))?.to_string(),
                date: record.require(&format!("time{index}"))?.to_string(),
                user: record.require(&format!("user{index}"))?.to_string(),
                workspace: record.require(&format!("client{index}"))?.to_string(),
                description: record
                    .get(&format!("desc{index}"))
                    .unwrap_or_default()
                    .trim_end()
                    .to_string(),
            });
        }

        if revisions.is_empty() {
            return Err(P4Error::ParseError(
                "filelog record carries no revisions".to_string(),
            ));
        }

        Ok(revisions)
    }

    /// Parse a `p4 fstat` tagged record
    pub fn parse_fstat(record: &TaggedRecord) -> Result<FileStat, P4Error> {
        let action = match record.get("action") {
            Some(raw) => Some(PendingAction::parse(raw).ok_or_else(|| {
                P4Error::ParseError(format!("unknown pending action '{raw}'"))
            })?),
            None => None,
        };

        Ok(FileStat {
            depot_path: record.require("depotFile")?.to_string(),
            client_path: record.require("clientFile")?.to_string(),
            head_revision: record.get("headRev").map(parse_number).transpose()?,
            have_revision: record.get("haveRev").map(parse_number).transpose()?,
            file_type: record
                .get("headType")
                .or_else(|| record.get("type"))
                .unwrap_or_default()
                .to_string(),
            action,
        })
    }

    /// Parse a change form as printed by `p4 change -o`
    pub fn parse_change_spec(form: &str) -> Result<ChangeSpec, P4Error> {
        let mut spec = ChangeSpec {
            number: None,
            user: String::new(),
            workspace: String::new(),
            status: String::new(),
            description: String::new(),
            files: Vec::new(),
        };

        let mut description_lines = Vec::new();
        let mut section = None;

        for line in form.lines() {
            // Form comments
            if line.starts_with('#') {
                continue;
            }

            // Continuation lines belong to the open section
            if line.starts_with('\t') || line.starts_with(' ') {
                let value = line.trim();
                match section {
                    Some("Description") => description_lines.push(value.to_string()),
                    Some("Files") => {
                        // Entries look like "//depot/path#comment" or
                        // "//depot/path\t# edit"
                        let path = value
                            .split_once('#')
                            .map_or(value, |(path, _)| path.trim());
                        if !path.is_empty() {
                            spec.files.push(path.to_string());
                        }
                    }
                    _ => {}
                }
                continue;
            }

            let Some((field, rest)) = line.split_once(':') else {
                continue;
            };
            let value = rest.trim();

            match field {
                "Change" => {
                    section = None;
                    spec.number = if value == special::NEW_CHANGE {
                        None
                    } else {
                        Some(parse_number(value)?)
                    };
                }
                "Client" => {
                    section = None;
                    spec.workspace = value.to_string();
                }
                "User" => {
                    section = None;
                    spec.user = value.to_string();
                }
                "Status" => {
                    section = None;
                    spec.status = value.to_string();
                }
                "Description" => {
                    section = Some("Description");
                    if !value.is_empty() {
                        description_lines.push(value.to_string());
                    }
                }
                "Files" => section = Some("Files"),
                _ => section = None,
            }
        }

        spec.description = description_lines.join("\n");

        if spec.workspace.is_empty() || spec.user.is_empty() {
            return Err(P4Error::ParseError(
                "change form is missing Client or User".to_string(),
            ));
        }

        Ok(spec)
    }

    /// Render a change form for `p4 change -i` / `p4 submit -i`
    pub fn render_change_spec(spec: &ChangeSpec) -> String {
        let mut form = String::new();

        let number = spec
            .number
            .map_or_else(|| special::NEW_CHANGE.to_string(), |n| n.to_string());
        form.push_str(&format!("Change:\t{number}\n\n"));
        form.push_str(&format!("Client:\t{}\n\n", spec.workspace));
        form.push_str(&format!("User:\t{}\n\n", spec.user));
        form.push_str(&format!("Status:\t{}\n\n", spec.status));

        form.push_str("Description:\n");
        for line in spec.description.lines() {
            form.push_str(&format!("\t{line}\n"));
        }

        if !spec.files.is_empty() {
            form.push_str("\nFiles:\n");
            for file in &spec.files {
                form.push_str(&format!("\t{file}\n"));
            }
        }

        form
    }
}

/// Extract the SSL fingerprint from a trust error message
///
/// Fingerprints are 20 colon-separated hex byte pairs, e.g.
/// `A4:09:...:3F`.
pub fn extract_trust_fingerprint(stderr: &str) -> Option<String> {
    static FINGERPRINT: OnceLock<Regex> = OnceLock::new();
    let regex = FINGERPRINT.get_or_init(|| {
        Regex::new(r"(?i)\b[0-9A-F]{2}(?::[0-9A-F]{2}){19}\b").expect("valid fingerprint regex")
    });
    regex.find(stderr).map(|m| m.as_str().to_string())
}

/// Classify a failed command's stderr as warning or error severity
pub fn classify_severity(stderr: &str) -> Severity {
    if errors::WARNING_PATTERNS
        .iter()
        .any(|pattern| stderr.contains(pattern))
    {
        Severity::Warning
    } else {
        Severity::Error
    }
}

fn parse_number(value: &str) -> Result<u32, P4Error> {
    value
        .parse()
        .map_err(|_| P4Error::ParseError(format!("expected a number, got '{value}'")))
}
