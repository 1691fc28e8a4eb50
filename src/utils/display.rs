use crate::core::triage::TriageCard;
use colored::*;
use std::io::{self, Write};

pub fn print_header(text: &str) {
    println!("\n{}", text.bright_cyan().bold());
    println!("{}", "=".repeat(text.chars().count() * 2).bright_cyan());
}

pub fn print_success(text: &str) {
    println!("{}", text.green());
}

pub fn print_error(text: &str) {
    eprintln!("{}", text.red().bold());
}

pub fn print_info(text: &str) {
    println!("{}", text.blue());
}

pub fn print_prompt(text: &str) {
    print!("{}", text.yellow().bold());
    let _ = io::stdout().flush();
}

pub fn print_user_turn(content: &str) {
    println!("{} {}", "🙋 나:".bold(), content);
}

pub fn print_bot_turn(content: &str) {
    println!("{} {}\n", "🤖 챗봇:".bold(), content);
}

/// Result card: the reply followed by the triage summary.
pub fn print_card(content: &str, card: &TriageCard) {
    println!("{} {}", "🤖 챗봇:".bold(), content);
    println!("{}", "─".repeat(40).yellow());
    println!("{} {}", card.urgency_icon, card.headline.bold());
    for (i, cause) in card.causes.iter().enumerate() {
        println!("  {}. {}", i + 1, cause);
    }
    println!("{} {}", "응급 조치 카드:".bold(), card.emergency_action);
    if let Some(link) = &card.call_link {
        println!("📞 {} ({})", link.label.bright_red().bold(), link.href);
    }
    println!("{}\n", "─".repeat(40).yellow());
}
