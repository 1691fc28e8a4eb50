//! Record listing and placeholder views.

use crate::storage::{Record, RecordStore};
use crate::utils;
use anyhow::Result;

/// One history line, with the memo on its own line when present.
pub fn format_record(record: &Record) -> String {
    if record.has_memo() {
        format!(
            "- {}  {}\n메모: {}",
            record.timestamp_text(),
            record.symptom,
            record.memo
        )
    } else {
        format!("- {}  {}", record.timestamp_text(), record.symptom)
    }
}

pub fn show_records(store: &RecordStore, today_only: bool) -> Result<()> {
    let (title, empty) = if today_only {
        ("오늘 기록 보기", "오늘 기록이 없습니다.")
    } else {
        ("이전 상담 내역", "상담 내역이 없습니다.")
    };

    utils::print_header(title);
    let records = store.list(today_only)?;
    if records.is_empty() {
        utils::print_info(empty);
        return Ok(());
    }

    for record in &records {
        println!("{}", format_record(record));
    }
    Ok(())
}

pub fn show_settings() {
    utils::print_header("설정");
    println!("설정 기능은 준비 중입니다.");
}
