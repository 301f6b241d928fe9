//! Chat Stream Demo: a terminal chat view fed by a simulated reply stream.
//!
//! A producer thread plays the part of the HTTP response body. It sends the
//! reply as raw byte chunks, cut at arbitrary offsets (often inside a
//! multi-byte character). The main loop decodes them, reveals the text at a
//! steady pace and keeps the view pinned to the bottom until you scroll up.
//!
//! Keys:
//! - type + Enter: send a message (stops a reply still streaming)
//! - Up/Down, PageUp/PageDown, mouse wheel: scroll
//! - End: jump to the newest text
//! - Ctrl+S: stop the reply
//! - Ctrl+R: regenerate the last reply
//! - Ctrl+N: start a new chat
//! - Esc or Ctrl+C: quit
//!
//! Logs go to `driftview-chat-stream.log` in the temp directory unless
//! `DRIFTVIEW_LOG_FILE` names another file.

use crossbeam_channel::{bounded, never, select, unbounded, Receiver, Sender};
use crossterm::{
    cursor::MoveTo,
    queue,
    style::{Attribute, Print, SetAttribute},
    terminal::{Clear, ClearType},
};
use driftview::actor::{InputActor, InputConfig, InputEvent, StreamEvent, ViewIntent};
use driftview::chat::{ConversationView, Transcript, Utf8StreamDecoder};
use driftview::reveal::{RevealClock, RevealConfig};
use driftview::scroll::{ScrollConfig, ScrollController, TranscriptViewport};
use driftview::telemetry::{self, LogTarget};
use driftview::terminal::TerminalSession;
use std::io::{self, Write};
use std::thread;
use std::time::Duration;

/// Reply streamed for every message.
const SAMPLE_REPLY: &str = r#"Sure! Here is a tiny Rust function that greets you in a few languages:

```rust
fn greet(lang: &str) -> &'static str {
    match lang {
        "fr" => "Bonjour, ça va ?",
        "ja" => "こんにちは 👋",
        _ => "Hello!",
    }
}
```

While this reply streams, the code block above stays closed even when only half of it has been revealed. Scroll up with the arrow keys to read earlier text: the view stops following until you scroll back down or press End.

Chunks arrive in uneven bursts, but the text appears at a steady rate, speeding up only when it falls far behind. Multi-byte characters such as é, ü, 中文 and 🦀 survive being split across chunks."#;

/// Byte sizes of successive chunks (cycled).
const CHUNK_SIZES: [usize; 6] = [7, 3, 31, 1, 64, 12];

/// Delay between chunks.
const CHUNK_DELAY: Duration = Duration::from_millis(45);

/// Animation frame period.
const FRAME: Duration = Duration::from_millis(16);

/// Rows reserved below the transcript (status + composer).
const CHROME_ROWS: u16 = 2;

/// Log file name, under the temp directory.
const LOG_FILE: &str = "driftview-chat-stream.log";

fn main() -> driftview::Result<()> {
    // Stderr would draw over the alternate screen.
    telemetry::init_with(LogTarget::from_env().or_file(std::env::temp_dir().join(LOG_FILE)))?;

    let session = TerminalSession::enter()?;
    let (width, height) = session.size()?;

    let input_config = InputConfig::default();
    let (input_tx, input_rx) = bounded::<InputEvent>(input_config.channel_capacity);
    let input = InputActor::spawn(input_tx, input_config.poll_timeout)?;

    let reveal_config = RevealConfig::default();
    let mut clock = RevealClock::new(reveal_config.tick_interval);
    let mut conversation = ConversationView::new(reveal_config);
    let mut transcript = Transcript::new();
    let mut decoder = Utf8StreamDecoder::new();

    let viewport = TranscriptViewport::new(width, height.saturating_sub(CHROME_ROWS));
    let mut scroll =
        ScrollController::with_config(viewport, ScrollConfig::default().with_pin_threshold(2.0));

    let mut reply: Option<Receiver<StreamEvent>> = None;
    let mut composer = String::new();
    let mut synced_revision = None;
    let mut dirty = true;
    let mut stdout = io::stdout();

    'main: loop {
        let reply_rx = reply.clone().unwrap_or_else(never);

        select! {
            recv(input_rx) -> event => {
                let Ok(event) = event else { break 'main };
                if let InputEvent::Resize { width, height } = event {
                    scroll
                        .viewport_mut()
                        .set_size(width, height.saturating_sub(CHROME_ROWS));
                    scroll.on_resize();
                }
                match event.intent() {
                    Some(ViewIntent::Quit) => break 'main,
                    Some(ViewIntent::ScrollRows(rows)) => {
                        scroll.viewport_mut().scroll_by(rows);
                        scroll.on_scroll();
                    }
                    Some(ViewIntent::PageUp) => {
                        scroll.viewport_mut().page_up();
                        scroll.on_scroll();
                    }
                    Some(ViewIntent::PageDown) => {
                        scroll.viewport_mut().page_down();
                        scroll.on_scroll();
                    }
                    Some(ViewIntent::JumpToBottom) => scroll.scroll_to_bottom(),
                    Some(ViewIntent::Type(c)) => composer.push(c),
                    Some(ViewIntent::Erase) => {
                        composer.pop();
                    }
                    Some(ViewIntent::Send) if !composer.trim().is_empty() => {
                        // A new message cuts off the reply in flight.
                        reply = None;
                        transcript.stop();
                        transcript.push_user(composer.trim());
                        composer.clear();
                        transcript.begin_assistant();
                        decoder = Utf8StreamDecoder::new();
                        reply = Some(spawn_reply());
                        scroll.scroll_to_bottom();
                    }
                    Some(ViewIntent::Stop) => {
                        // Dropping the receiver ends the producer on its next send.
                        reply = None;
                        transcript.stop();
                    }
                    Some(ViewIntent::Regenerate) => {
                        if transcript.regenerate() {
                            decoder = Utf8StreamDecoder::new();
                            reply = Some(spawn_reply());
                            scroll.scroll_to_bottom();
                        }
                    }
                    Some(ViewIntent::NewChat) => {
                        reply = None;
                        transcript.clear();
                        composer.clear();
                        scroll.scroll_to_bottom();
                    }
                    _ => {}
                }
                if matches!(event, InputEvent::Shutdown) {
                    break 'main;
                }
            }
            recv(reply_rx) -> event => match event {
                Ok(StreamEvent::Started { chat_id }) => {
                    transcript.adopt_chat_id(chat_id.as_deref());
                }
                Ok(StreamEvent::Chunk(bytes)) => {
                    transcript.append_chunk(&decoder.decode(&bytes));
                }
                Ok(StreamEvent::Finished) | Err(_) => {
                    transcript.append_chunk(&decoder.finish());
                    transcript.finish();
                    reply = None;
                }
                Ok(StreamEvent::Failed(reason)) => {
                    tracing::warn!(%reason, "reply failed");
                    transcript.fail("Sorry, I encountered an error connecting to the server.");
                    reply = None;
                }
            },
            recv(clock.receiver()) -> _ => {
                dirty |= conversation.tick();
            }
            default(FRAME) => {}
        }

        if synced_revision != Some(transcript.revision()) {
            conversation.sync(&transcript);
            synced_revision = Some(transcript.revision());
            dirty = true;
        }
        clock.sync(conversation.is_streaming())?;

        // Render and rewrap only when the visible text may have changed.
        if std::mem::take(&mut dirty) {
            let text = conversation.render();
            scroll.viewport_mut().set_content(&text);
            scroll.on_content_changed(&text);
        }
        scroll.on_frame();
        scroll.viewport_mut().animate();

        draw(&mut stdout, &scroll, &transcript, &composer)?;
    }

    clock.stop();
    input.join();
    drop(session);
    Ok(())
}

/// Start the simulated reply on its own thread.
fn spawn_reply() -> Receiver<StreamEvent> {
    let (tx, rx) = unbounded();
    thread::spawn(move || produce_reply(&tx));
    rx
}

fn produce_reply(tx: &Sender<StreamEvent>) {
    let started = StreamEvent::Started {
        chat_id: Some("demo-chat".to_owned()),
    };
    if tx.send(started).is_err() {
        return;
    }

    let mut bytes = SAMPLE_REPLY.as_bytes();
    for size in CHUNK_SIZES.iter().cycle() {
        if bytes.is_empty() {
            break;
        }
        let (chunk, rest) = bytes.split_at((*size).min(bytes.len()));
        bytes = rest;
        if tx.send(StreamEvent::Chunk(chunk.to_vec())).is_err() {
            return;
        }
        thread::sleep(CHUNK_DELAY);
    }

    let _ = tx.send(StreamEvent::Finished);
}

fn draw(
    out: &mut impl Write,
    scroll: &ScrollController<TranscriptViewport>,
    transcript: &Transcript,
    composer: &str,
) -> io::Result<()> {
    let viewport = scroll.viewport();
    let height = viewport.height();

    let mut rows = viewport.visible_rows();
    for y in 0..height {
        queue!(out, MoveTo(0, y), Clear(ClearType::CurrentLine))?;
        if let Some(row) = rows.next() {
            queue!(out, Print(&row.text))?;
        }
    }

    let status = match (scroll.show_scroll_button(), transcript.is_streaming()) {
        (true, _) => "↓ new messages (End)".to_owned(),
        (false, true) => "streaming... (Ctrl+S to stop)".to_owned(),
        (false, false) => format!(
            "chat {} | {} messages | Esc to quit",
            transcript.chat_id().unwrap_or("new"),
            transcript.len()
        ),
    };
    queue!(
        out,
        MoveTo(0, height),
        Clear(ClearType::CurrentLine),
        SetAttribute(Attribute::Dim),
        Print(status),
        SetAttribute(Attribute::Reset),
        MoveTo(0, height + 1),
        Clear(ClearType::CurrentLine),
        Print("> "),
        Print(composer),
    )?;

    out.flush()
}
