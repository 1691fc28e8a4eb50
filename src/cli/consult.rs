//! Interactive consultation loop.
//!
//! Every line read becomes a `SessionEvent`; after the session handles it,
//! the affected part of the transcript is printed again.

use crate::cli::views;
use crate::core::conversation::Role;
use crate::core::triage::Classification;
use crate::session::workflow::{Phase, SaveChoice, SaveMode};
use crate::session::{ConsultSession, Notice, SessionError, SessionEvent};
use crate::utils;
use anyhow::Result;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

const HELP: &str = "\
Special commands:
  /save     - Resume saving the latest result
  /today    - Show today's records
  /history  - Show all records
  /help     - Show this help
  /quit     - Exit";

/// Runs the chat until `/quit` or end of input.
pub async fn run<R>(session: &mut ConsultSession, reader: &mut R) -> Result<()>
where
    R: AsyncBufRead + Unpin,
{
    loop {
        utils::print_prompt("어떤 증상이세요? > ");
        let Some(input) = read_line(reader).await? else {
            println!();
            break;
        };

        match input.as_str() {
            "/quit" | "/exit" => break,
            "/help" => println!("{}\n", HELP),
            "/today" => views::show_records(session.store(), true)?,
            "/history" => views::show_records(session.store(), false)?,
            "/save" => match session.pending_save() {
                Some(index) => save_dialog(session, reader, index).await?,
                None => utils::print_info("저장할 상담 결과가 없습니다."),
            },
            _ => match session.apply(SessionEvent::Send(input)).await {
                Ok(Notice::Reply {
                    index,
                    classification,
                }) => {
                    if let Some(turn) = session.conversation().get(index) {
                        render_reply(&turn.content, &classification);
                    }
                    if classification.is_result() {
                        save_dialog(session, reader, index).await?;
                    }
                }
                Ok(_) => {}
                Err(e) => utils::print_error(&e.to_string()),
            },
        }
    }

    Ok(())
}

/// Prints every visible turn, result cards included.
pub fn render_transcript(session: &ConsultSession) {
    utils::print_header("VetQuick Buddy");
    for (_, turn) in session.conversation().visible() {
        match turn.role {
            Role::User => utils::print_user_turn(&turn.content),
            _ => render_reply(&turn.content, &session.classify(&turn.content)),
        }
    }
}

fn render_reply(content: &str, classification: &Classification) {
    match classification {
        Classification::Result(card) => utils::print_card(content, card),
        Classification::Plain => utils::print_bot_turn(content),
    }
}

/// Walks the save workflow for `index` from whatever phase it is in.
///
/// An empty answer leaves the workflow where it is; `/save` picks it up again.
async fn save_dialog<R>(session: &mut ConsultSession, reader: &mut R, index: usize) -> Result<()>
where
    R: AsyncBufRead + Unpin,
{
    loop {
        match session.workflows().phase(index) {
            Phase::Idle => return Ok(()),
            Phase::AwaitingChoice => {
                utils::print_prompt("저장하시겠습니까? [예/아니요] ");
                let Some(answer) = read_line(reader).await? else {
                    return Ok(());
                };
                let choice = match parse_choice(&answer) {
                    Some(choice) => choice,
                    None if answer.is_empty() => return later(),
                    None => {
                        utils::print_error("'예' 또는 '아니요'로 답해 주세요.");
                        continue;
                    }
                };

                session
                    .apply(SessionEvent::ChooseSave { index, choice })
                    .await?;
                if let Notice::Discarded {
                    conversation_reset, ..
                } = session.apply(SessionEvent::ConfirmSave { index }).await?
                {
                    utils::print_info("저장이 취소되었습니다. 챗봇을 계속 이용하실 수 있습니다.");
                    if conversation_reset {
                        render_transcript(session);
                    }
                    return Ok(());
                }
            }
            Phase::ModeSelect | Phase::Entering(SaveMode::Unset) => {
                utils::print_info("저장 방법을 선택하세요");
                utils::print_prompt("[1] 증상 입력  [2] 간단 메모 추가 > ");
                let Some(answer) = read_line(reader).await? else {
                    return Ok(());
                };
                let mode = match parse_mode(&answer) {
                    Some(mode) => mode,
                    None if answer.is_empty() => return later(),
                    None => {
                        utils::print_error("1 또는 2를 입력해 주세요.");
                        continue;
                    }
                };
                session
                    .apply(SessionEvent::ChooseMode { index, mode })
                    .await?;
            }
            Phase::Entering(mode) => {
                let prompt = if mode == SaveMode::Symptom {
                    "저장할 증상을 입력해 주세요: "
                } else {
                    "메모를 입력해 주세요: "
                };
                utils::print_prompt(prompt);
                let Some(text) = read_line(reader).await? else {
                    return Ok(());
                };

                match session.apply(SessionEvent::Submit { index, text }).await {
                    Ok(Notice::Saved { record, .. }) => {
                        utils::print_success("기록이 저장되었습니다!");
                        if mode == SaveMode::Symptom {
                            utils::print_success(&format!(
                                "✅ 증상 '{}' 이(가) 저장되었습니다!",
                                record.symptom
                            ));
                        } else {
                            utils::print_success("✅ 메모가 저장되었습니다!");
                        }
                        println!();
                    }
                    Ok(_) => {}
                    Err(e @ SessionError::Workflow(_)) => {
                        utils::print_error(&e.to_string());
                        return later();
                    }
                    Err(e) => return Err(e.into()),
                }
            }
        }
    }
}

fn later() -> Result<()> {
    utils::print_info("나중에 /save 로 이어서 저장할 수 있어요.\n");
    Ok(())
}

fn parse_choice(answer: &str) -> Option<SaveChoice> {
    match answer {
        "예" | "네" | "y" | "yes" => Some(SaveChoice::Yes),
        "아니요" | "아니오" | "n" | "no" => Some(SaveChoice::No),
        _ => None,
    }
}

fn parse_mode(answer: &str) -> Option<SaveMode> {
    match answer {
        "1" | "증상 입력" | "증상" => Some(SaveMode::Symptom),
        "2" | "간단 메모 추가" | "메모" => Some(SaveMode::Memo),
        _ => None,
    }
}

/// Next trimmed line, or `None` at end of input.
async fn read_line<R>(reader: &mut R) -> Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
{
    let mut line = String::new();
    if reader.read_line(&mut line).await? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_choice() {
        assert_eq!(parse_choice("예"), Some(SaveChoice::Yes));
        assert_eq!(parse_choice("아니요"), Some(SaveChoice::No));
        assert_eq!(parse_choice(""), None);
        assert_eq!(parse_choice("글쎄요"), None);
    }

    #[test]
    fn test_parse_mode() {
        assert_eq!(parse_mode("1"), Some(SaveMode::Symptom));
        assert_eq!(parse_mode("간단 메모 추가"), Some(SaveMode::Memo));
        assert_eq!(parse_mode("3"), None);
    }

    #[tokio::test]
    async fn test_read_line_trims_and_stops_at_eof() {
        let mut reader: &[u8] = b"  hello \n";
        assert_eq!(read_line(&mut reader).await.unwrap(), Some("hello".to_string()));
        assert_eq!(read_line(&mut reader).await.unwrap(), None);
    }
}
