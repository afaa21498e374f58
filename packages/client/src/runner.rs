//! Interactive session: terminal lines go out, server frames come in.

use std::sync::Arc;

use chrono::Local;
use futures_util::{SinkExt, StreamExt};
use parlor_server::domain::{Command, EXIT_SENTINEL};
use rustyline::{DefaultEditor, error::ReadlineError};
use tokio::sync::{
    Mutex,
    mpsc::{self, UnboundedSender},
};
use tokio_tungstenite::{connect_async, tungstenite::Message};

use crate::{
    error::ClientError,
    input::{self, Input},
    session::{ClientSession, Frame},
};

/// Connect to `url` and chat until `/quit`, end of input or the server
/// closing the connection.
///
/// With `cookie`, the client first tries to resume that session.
pub async fn run_client(url: &str, cookie: Option<String>) -> Result<(), ClientError> {
    let (ws, _) = connect_async(url).await?;
    tracing::info!("Connected to {}", url);
    println!("Connected to {url}. Type /help for commands.");

    let (mut write, mut read) = ws.split();
    let session = Arc::new(Mutex::new(ClientSession::new()));

    if let Some(token) = cookie {
        let command = Command::Cookie { token };
        session.lock().await.on_send(&command);
        write.send(Message::Text(command.encode().into())).await?;
    }

    // rustyline blocks, so it runs on its own thread and feeds a channel
    let (line_tx, mut line_rx) = mpsc::unbounded_channel::<String>();
    let editor = tokio::task::spawn_blocking(move || read_lines(line_tx));

    let reader_session = session.clone();
    let mut reader = tokio::spawn(async move {
        while let Some(message) = read.next().await {
            match message {
                Ok(Message::Text(text)) => {
                    let frame = reader_session.lock().await.on_frame(text.as_str());
                    print_frame(frame);
                }
                Ok(Message::Close(_)) => break,
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!("Connection error: {}", e);
                    break;
                }
            }
        }
    });

    loop {
        tokio::select! {
            _ = &mut reader => {
                println!("Server closed the connection.");
                break;
            }
            line = line_rx.recv() => {
                let Some(line) = line else {
                    write.send(Message::Text(EXIT_SENTINEL.into())).await?;
                    break;
                };
                let own_name = session.lock().await.name().cloned();
                match input::parse_line(&line, own_name.as_ref()) {
                    Input::Send(command) => {
                        if !command.is_pre_login() && own_name.is_none() {
                            println!("(not logged in yet, the server will ignore this)");
                        }
                        session.lock().await.on_send(&command);
                        write.send(Message::Text(command.encode().into())).await?;
                    }
                    Input::Quit => {
                        write.send(Message::Text(EXIT_SENTINEL.into())).await?;
                        break;
                    }
                    Input::Help => println!("{}", input::help()),
                    Input::Invalid(message) => println!("{message}"),
                    Input::Empty => {}
                }
            }
        }
    }

    reader.abort();
    // A still-running editor is blocked in readline and ends with the process
    if editor.is_finished()
        && let Ok(Err(e)) = editor.await
    {
        return Err(e);
    }
    Ok(())
}

fn read_lines(tx: UnboundedSender<String>) -> Result<(), ClientError> {
    let mut editor = DefaultEditor::new()?;
    loop {
        match editor.readline("> ") {
            Ok(line) => {
                let _ = editor.add_history_entry(line.as_str());
                if tx.send(line).is_err() {
                    return Ok(());
                }
            }
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => return Ok(()),
            Err(e) => return Err(e.into()),
        }
    }
}

fn print_frame(frame: Frame) {
    let now = Local::now().format("%H:%M:%S");
    match frame {
        Frame::Relayed(text) | Frame::Other(text) => println!("{now} {text}"),
        Frame::LoggedIn { name, token } => {
            println!("{now} logged in as {name} (resume later with --cookie {token})")
        }
        Frame::LoginRejected => println!("{now} login rejected: wrong name or password"),
        Frame::Resumed(name) => println!("{now} session resumed as {name}"),
        Frame::CookieUnknown => println!("{now} session token unknown or expired"),
    }
}
