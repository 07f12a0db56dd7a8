use serde_json::Value;

/// Commands a front end forwards into a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClientCommand {
    Click { row: i64, col: i64 },
    Reset,
    Hint,
    Show,
    Quit,
}

/// Accepts one JSON object per line (`{"type":"click","row":1,"col":2}`) or the
/// plain text forms `1 2`, `reset`, `hint`, `show` and `quit`.
pub fn parse_command(raw: &str) -> Option<ClientCommand> {
    let trimmed = raw.trim();
    if trimmed.starts_with('{') {
        parse_json_command(trimmed)
    } else {
        parse_text_command(trimmed)
    }
}

fn parse_json_command(raw: &str) -> Option<ClientCommand> {
    let value: Value = serde_json::from_str(raw).ok()?;
    let object = value.as_object()?;
    let command_type = object.get("type")?.as_str()?;

    match command_type {
        "click" => {
            let row = parse_integer(object.get("row")?)?;
            let col = parse_integer(object.get("col")?)?;
            Some(ClientCommand::Click { row, col })
        }
        "reset" => Some(ClientCommand::Reset),
        "hint" => Some(ClientCommand::Hint),
        "show" => Some(ClientCommand::Show),
        "quit" => Some(ClientCommand::Quit),
        _ => None,
    }
}

fn parse_text_command(raw: &str) -> Option<ClientCommand> {
    match raw.to_ascii_lowercase().as_str() {
        "reset" | "r" => return Some(ClientCommand::Reset),
        "hint" | "h" => return Some(ClientCommand::Hint),
        "show" | "s" => return Some(ClientCommand::Show),
        "quit" | "q" | "exit" => return Some(ClientCommand::Quit),
        _ => {}
    }

    let mut parts = raw
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|part| !part.is_empty());
    let row = parts.next()?.parse::<i64>().ok()?;
    let col = parts.next()?.parse::<i64>().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some(ClientCommand::Click { row, col })
}

fn parse_integer(value: &Value) -> Option<i64> {
    const MAX_SAFE_INTEGER_F64: f64 = 9_007_199_254_740_991.0;

    if let Some(number) = value.as_i64() {
        return Some(number);
    }
    if let Some(number) = value.as_u64() {
        return i64::try_from(number).ok();
    }
    let number = value.as_f64()?;
    if !number.is_finite() {
        return None;
    }
    let floored = number.floor();
    if floored.abs() > MAX_SAFE_INTEGER_F64 {
        return None;
    }
    Some(floored as i64)
}
