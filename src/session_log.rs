//! Append-only session log, one JSON object per line, one file per day
//! (`logs/painlog_YYYYMMDD.jsonl`). Also condenses recent records into the
//! history block fed back to the remote backend.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::models::SymptomRecord;
use crate::pipeline::advice::compose::truncate_chars;
use crate::pipeline::session::AdviceOutcome;

const FILE_PREFIX: &str = "painlog_";
const FILE_EXTENSION: &str = "jsonl";
const LINE_BREAK_REPLACEMENT: &str = " / ";
const HISTORY_EXCERPT_CHARS: usize = 180;

#[derive(Error, Debug)]
pub enum SessionLogError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// One flat log row per generated answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub id: Uuid,
    #[serde(rename = "timestamp")]
    pub logged_at: NaiveDateTime,
    /// Backend identifier: model name, LOCAL-DEMO or LOCAL-FALLBACK.
    pub model: String,
    pub red_flag: bool,
    pub red_flag_list: String,
    pub part: String,
    #[serde(rename = "type")]
    pub symptom_type: String,
    pub intensity: String,
    pub onset: String,
    pub diurnal: String,
    pub factor: String,
    pub free_text: String,
    pub profile_used: bool,
    pub history_used: bool,
    pub advice: String,
    pub detail: u8,
}

impl SessionRecord {
    pub fn new(
        record: &SymptomRecord,
        outcome: &AdviceOutcome,
        profile_used: bool,
        history_used: bool,
        logged_at: NaiveDateTime,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            logged_at: logged_at.with_nanosecond(0).unwrap_or(logged_at),
            model: outcome.backend_id.clone(),
            red_flag: outcome.red_flags.has_red_flag(),
            red_flag_list: outcome.red_flags.reason_list(),
            part: record.body_part.label().to_string(),
            symptom_type: record.symptom_type.clone(),
            intensity: record.intensity.clone(),
            onset: record.onset.clone(),
            diurnal: record.diurnal_pattern.clone(),
            factor: record.aggravating_factor.clone(),
            free_text: flatten(&record.free_text),
            profile_used,
            history_used,
            advice: flatten(&outcome.markdown),
            detail: record.detail_level,
        }
    }

    /// `部位:… / タイプ:… / 因子:… / 抜粋:…` line for the history block.
    pub fn condensed(&self) -> String {
        format!(
            "部位:{} / タイプ:{} / 因子:{} / 抜粋:{}",
            self.part,
            self.symptom_type,
            self.factor,
            truncate_chars(&self.advice, HISTORY_EXCERPT_CHARS)
        )
    }
}

fn flatten(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\n', LINE_BREAK_REPLACEMENT)
}

/// Daily JSON-lines files under one directory.
#[derive(Debug, Clone)]
pub struct SessionLog {
    dir: PathBuf,
}

impl SessionLog {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn path_for(&self, date: NaiveDate) -> PathBuf {
        self.dir
            .join(format!("{FILE_PREFIX}{}.{FILE_EXTENSION}", date.format("%Y%m%d")))
    }

    /// Append one record to the file for its date. Returns the file path.
    pub fn append(&self, record: &SessionRecord) -> Result<PathBuf, SessionLogError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(record.logged_at.date());
        let mut line = serde_json::to_string(record)?;
        line.push('\n');

        let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
        file.write_all(line.as_bytes())?;

        tracing::info!(
            record_id = %record.id,
            backend = %record.model,
            red_flag = record.red_flag,
            "Session logged"
        );
        Ok(path)
    }

    /// Newest daily file, by name.
    pub fn latest_file(&self) -> Result<Option<PathBuf>, SessionLogError> {
        if !self.dir.exists() {
            return Ok(None);
        }
        let mut files: Vec<PathBuf> = fs::read_dir(&self.dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| is_log_file(path))
            .collect();
        files.sort();
        Ok(files.pop())
    }

    /// Last `n` records of the newest file, oldest first. Malformed lines are skipped.
    pub fn load_recent(&self, n: usize) -> Result<Vec<SessionRecord>, SessionLogError> {
        let Some(path) = self.latest_file()? else {
            return Ok(Vec::new());
        };
        let reader = BufReader::new(File::open(&path)?);
        let mut records = Vec::new();
        let mut skipped = 0usize;
        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<SessionRecord>(&line) {
                Ok(record) => records.push(record),
                Err(_) => skipped += 1,
            }
        }
        if skipped > 0 {
            tracing::warn!(skipped, file = %path.display(), "Skipped malformed log lines");
        }
        let start = records.len().saturating_sub(n);
        Ok(records.split_off(start))
    }

    /// Condensed history block. Read failures yield an empty string.
    pub fn recent_history(&self, n: usize) -> String {
        match self.load_recent(n) {
            Ok(records) => records
                .iter()
                .map(SessionRecord::condensed)
                .collect::<Vec<_>>()
                .join("\n"),
            Err(e) => {
                tracing::warn!(error = %e, "History unavailable");
                String::new()
            }
        }
    }
}

fn is_log_file(path: &Path) -> bool {
    let name_ok = path
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with(FILE_PREFIX));
    let ext_ok = path.extension().and_then(|e| e.to_str()) == Some(FILE_EXTENSION);
    name_ok && ext_ok && path.is_file()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BodyPart;
    use crate::pipeline::session::{run_session, Backend, SessionContext, SessionOutcome};
    use crate::pipeline::safety::ManualFlags;

    fn at(date: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(&format!("{date} 09:30:15"), "%Y-%m-%d %H:%M:%S").unwrap()
    }

    fn outcome_for(record: &SymptomRecord, flags: ManualFlags) -> AdviceOutcome {
        match run_session(record, flags, true, &SessionContext::default(), Backend::Local) {
            SessionOutcome::Advice(outcome) => outcome,
            SessionOutcome::Halted { .. } => panic!("override should proceed"),
        }
    }

    fn entry(part: BodyPart, when: &str) -> SessionRecord {
        let mut record = SymptomRecord::neutral(part);
        record.free_text = "朝はこわばる\n前かがみで悪化".into();
        let outcome = outcome_for(&record, ManualFlags::default());
        SessionRecord::new(&record, &outcome, false, false, at(when))
    }

    #[test]
    fn record_flattens_newlines() {
        let rec = entry(BodyPart::LowerBack, "2026-10-18");
        assert_eq!(rec.free_text, "朝はこわばる / 前かがみで悪化");
        assert!(!rec.advice.contains('\n'));
        assert!(rec.advice.contains("## 可能性のある原因"));
        assert_eq!(rec.model, "LOCAL-DEMO");
        assert_eq!(rec.part, "腰");
        assert_eq!(rec.detail, 4);
    }

    #[test]
    fn record_carries_red_flag_reasons() {
        let record = SymptomRecord::neutral(BodyPart::Knee);
        let flags = ManualFlags {
            trauma: true,
            fever: true,
            ..Default::default()
        };
        let outcome = outcome_for(&record, flags);
        let rec = SessionRecord::new(&record, &outcome, true, false, at("2026-10-18"));
        assert!(rec.red_flag);
        assert_eq!(rec.red_flag_list, "強い外傷 / 発熱/感染疑い");
        assert!(rec.profile_used);
    }

    #[test]
    fn serialized_keys_match_log_columns() {
        let rec = entry(BodyPart::LowerBack, "2026-10-18");
        let json: serde_json::Value = serde_json::to_value(&rec).unwrap();
        for key in [
            "timestamp", "model", "red_flag", "red_flag_list", "part", "type", "intensity",
            "onset", "diurnal", "factor", "free_text", "profile_used", "history_used",
            "advice", "detail",
        ] {
            assert!(json.get(key).is_some(), "missing {key}");
        }
        assert_eq!(json["timestamp"], "2026-10-18T09:30:15");
    }

    #[test]
    fn append_writes_daily_file() {
        let dir = tempfile::tempdir().unwrap();
        let log = SessionLog::new(dir.path().join("logs"));
        let path = log.append(&entry(BodyPart::LowerBack, "2026-10-18")).unwrap();
        assert_eq!(path.file_name().unwrap(), "painlog_20261018.jsonl");

        log.append(&entry(BodyPart::Knee, "2026-10-18")).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 2);
    }

    #[test]
    fn load_recent_reads_newest_file_tail() {
        let dir = tempfile::tempdir().unwrap();
        let log = SessionLog::new(dir.path());
        log.append(&entry(BodyPart::Elbow, "2026-10-17")).unwrap();
        for part in [BodyPart::LowerBack, BodyPart::Knee, BodyPart::Wrist, BodyPart::Ankle] {
            log.append(&entry(part, "2026-10-18")).unwrap();
        }

        let recent = log.load_recent(3).unwrap();
        let parts: Vec<&str> = recent.iter().map(|r| r.part.as_str()).collect();
        assert_eq!(parts, vec!["膝", "手首", "足首"]);
    }

    #[test]
    fn load_recent_skips_malformed_lines() {
        let dir = tempfile::tempdir().unwrap();
        let log = SessionLog::new(dir.path());
        let path = log.append(&entry(BodyPart::LowerBack, "2026-10-18")).unwrap();
        let mut file = OpenOptions::new().append(true).open(&path).unwrap();
        writeln!(file, "not json").unwrap();

        let recent = log.load_recent(3).unwrap();
        assert_eq!(recent.len(), 1);
    }

    #[test]
    fn missing_directory_gives_empty_history() {
        let dir = tempfile::tempdir().unwrap();
        let log = SessionLog::new(dir.path().join("absent"));
        assert!(log.load_recent(3).unwrap().is_empty());
        assert_eq!(log.recent_history(3), "");
    }

    #[test]
    fn unrelated_files_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("zzz_notes.jsonl"), "{}").unwrap();
        fs::write(dir.path().join("painlog_20991231.csv"), "a,b").unwrap();
        let log = SessionLog::new(dir.path());
        assert_eq!(log.latest_file().unwrap(), None);
    }

    #[test]
    fn history_lines_are_condensed() {
        let dir = tempfile::tempdir().unwrap();
        let log = SessionLog::new(dir.path());
        let rec = entry(BodyPart::LowerBack, "2026-10-18");
        log.append(&rec).unwrap();

        let history = log.recent_history(3);
        let prefix = format!("部位:腰 / タイプ:{} / 因子:{} / 抜粋:", rec.symptom_type, rec.factor);
        assert!(history.starts_with(&prefix), "{history}");
        let excerpt = &history[prefix.len()..];
        assert_eq!(excerpt.chars().count(), 180);
        assert!(rec.advice.starts_with(excerpt));
    }
}
