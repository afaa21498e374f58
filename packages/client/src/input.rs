//! Terminal input parsing.
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - parse_line() がスラッシュコマンドと本文をプロトコルのコマンドに変換すること
//!
//! ### どのような状況を想定しているか
//! - 正常系：各スラッシュコマンド、通常のテキスト
//! - 異常系：引数不足、不正なグループ ID、未知のスラッシュコマンド
//! - エッジケース：ログイン前の /to、終了センチネルと同じ本文

use parlor_server::domain::{Command, EXIT_SENTINEL, GroupId, LoginName, MessageBody, Password};

/// Sender name used in `target:` before the client knows its own name
pub const UNKNOWN_SENDER: &str = "?";

/// What the user asked for on one line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// Send a command to the server
    Send(Command),
    /// Leave the chat
    Quit,
    Help,
    /// Nothing to do
    Empty,
    /// Not understood; the message explains why
    Invalid(String),
}

/// Turn one terminal line into an `Input`.
///
/// `own_name` is the name the server accepted for this client, if any. It
/// fills the `from:` field of `/to`.
pub fn parse_line(line: &str, own_name: Option<&LoginName>) -> Input {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.trim().is_empty() {
        return Input::Empty;
    }

    let Some(slash) = line.strip_prefix('/') else {
        return content(line);
    };
    let (verb, args) = match slash.split_once(char::is_whitespace) {
        Some((verb, args)) => (verb, args.trim()),
        None => (slash, ""),
    };

    let parsed = match verb {
        "register" | "login" => credentials(verb, args),
        "cookie" if !args.is_empty() => Ok(Command::Cookie {
            token: args.to_string(),
        }),
        "to" => target(args, own_name),
        "group" => args
            .parse::<GroupId>()
            .map(|group_id| Command::Group { group_id })
            .map_err(|e| e.to_string()),
        "g" => MessageBody::new(args.to_string())
            .map(|body| Command::GroupMessage { body })
            .map_err(|e| e.to_string()),
        "quit" | "exit" => return Input::Quit,
        "help" => return Input::Help,
        "cookie" => Err("usage: /cookie <token>".to_string()),
        other => Err(format!("unknown command '/{other}', try /help")),
    };

    match parsed {
        Ok(command) => Input::Send(command),
        Err(message) => Input::Invalid(message),
    }
}

/// Help text for `/help`.
pub fn help() -> &'static str {
    "\
/register <name> <password>  create an account
/login <name> <password>     log in
/cookie <token>              resume a session with a token
/to <name>                   choose who receives plain text
/group <id>                  join a group
/g <message>                 send to your group
/quit                        leave
anything else                send to the chosen user"
}

fn content(line: &str) -> Input {
    match MessageBody::new(line.to_string()) {
        Ok(body) => {
            let command = Command::Content { body };
            // The server treats this exact body as a disconnect request.
            if command.encode() == EXIT_SENTINEL {
                Input::Quit
            } else {
                Input::Send(command)
            }
        }
        Err(e) => Input::Invalid(e.to_string()),
    }
}

fn credentials(verb: &str, args: &str) -> Result<Command, String> {
    let Some((name, password)) = args.split_once(char::is_whitespace) else {
        return Err(format!("usage: /{verb} <name> <password>"));
    };
    let name = LoginName::new(name.to_string()).map_err(|e| e.to_string())?;
    let password = Password::new(password.trim().to_string()).map_err(|e| e.to_string())?;
    Ok(if verb == "register" {
        Command::Register { name, password }
    } else {
        Command::Login { name, password }
    })
}

fn target(args: &str, own_name: Option<&LoginName>) -> Result<Command, String> {
    if args.is_empty() {
        return Err("usage: /to <name>".to_string());
    }
    let target = LoginName::new(args.to_string()).map_err(|e| e.to_string())?;
    let from = match own_name {
        Some(name) => name.clone(),
        None => LoginName::new(UNKNOWN_SENDER.to_string()).map_err(|e| e.to_string())?,
    };
    Ok(Command::Target { target, from })
}
