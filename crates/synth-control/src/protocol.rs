//! A minimal line-based stand-in for the tabular query protocol's framing
//! layer, which the source specification delegates to an external
//! collaborator. Only `voices` exists as a table, so commands are addressed
//! `<verb> <row> <column> [value]`.
//!
//! ```text
//! SELECT 0 o1freq\n        -> "OK 440\n" | "ERR <message>\n"
//! UPDATE 0 o1freq 220\n    -> "OK\n"     | "ERR <message>\n"
//! ```

use crate::error::ControlError;
use crate::table::VoicesTable;
use synth_core::VoiceBank;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Select { row: usize, column: String },
    Update { row: usize, column: String, value: String },
}

/// Parses one complete line (without its trailing newline) into a command.
pub fn parse_line(line: &str) -> Result<Command, ControlError> {
    let line = line.trim();
    let mut parts = line.splitn(4, ' ');
    let verb = parts.next().unwrap_or("");
    match verb.to_ascii_uppercase().as_str() {
        "SELECT" => {
            let row = parts.next().ok_or_else(|| ControlError::Malformed(line.to_string()))?;
            let column = parts.next().ok_or_else(|| ControlError::Malformed(line.to_string()))?;
            let row = row
                .parse::<usize>()
                .map_err(|_| ControlError::Malformed(line.to_string()))?;
            Ok(Command::Select { row, column: column.to_string() })
        }
        "UPDATE" => {
            let row = parts.next().ok_or_else(|| ControlError::Malformed(line.to_string()))?;
            let column = parts.next().ok_or_else(|| ControlError::Malformed(line.to_string()))?;
            let value = parts.next().ok_or_else(|| ControlError::Malformed(line.to_string()))?;
            let row = row
                .parse::<usize>()
                .map_err(|_| ControlError::Malformed(line.to_string()))?;
            Ok(Command::Update { row, column: column.to_string(), value: value.to_string() })
        }
        _ => Err(ControlError::Malformed(line.to_string())),
    }
}

/// Applies a parsed command against the bank and renders the response line,
/// including its trailing newline.
pub fn execute(table: &VoicesTable, bank: &mut VoiceBank, cmd: Command) -> String {
    match cmd {
        Command::Select { row, column } => match table.select(bank, row, &column) {
            Ok(value) => format!("OK {value}\n"),
            Err(e) => format!("ERR {e}\n"),
        },
        Command::Update { row, column, value } => match table.update(bank, row, &column, &value) {
            Ok(()) => "OK\n".to_string(),
            Err(e) => format!("ERR {e}\n"),
        },
    }
}

/// Scans `buf` for complete newline-terminated commands, executes each
/// against `table`/`bank` in arrival order, and returns `(response, bytes
/// consumed)`. Matches the source's read-then-memmove loop: callers should
/// drop the consumed prefix from their command buffer.
pub fn drive(table: &VoicesTable, bank: &mut VoiceBank, buf: &str) -> (String, usize) {
    let mut response = String::new();
    let mut consumed = 0;
    for line in buf.split_inclusive('\n') {
        if !line.ends_with('\n') {
            break;
        }
        consumed += line.len();
        match parse_line(line) {
            Ok(cmd) => response.push_str(&execute(table, bank, cmd)),
            Err(e) => response.push_str(&format!("ERR {e}\n")),
        }
    }
    (response, consumed)
}
