use serde::Serialize;

/// Reserved input literal that ends the session instead of being sent.
const QUIT: &str = "quit";

/// One entered command, ready to be encoded as a wire line.
#[derive(Debug, Eq, PartialEq)]
pub enum Command {
    Quit,
    PlaceWall {
        horizontal: bool,
        column: i32,
        row: i32,
    },
    Move(String),
}

#[derive(Serialize)]
struct MoveFrame<'a> {
    r#type: &'static str,
    command: &'a str,
}

#[derive(Serialize)]
struct WallFrame {
    r#type: &'static str,
    is_horizontal: bool,
    position: [i32; 2],
}

impl Command {
    /// Only `quit` and well-formed `wall h|v <col> <row>` inputs are special;
    /// everything else rides along as free text for the server to judge.
    pub fn parse(input: &str) -> Self {
        if input == QUIT {
            return Command::Quit;
        }
        if let Some(wall) = parse_wall(input) {
            return wall;
        }
        Command::Move(input.to_string())
    }

    /// The wire line for this command, or `None` for the quit control
    /// command. JSON string escaping guarantees the line holds no embedded
    /// line terminator, so the framing can't be broken by user input.
    pub fn to_line(&self) -> Option<String> {
        let line = match self {
            Command::Quit => return None,
            Command::PlaceWall {
                horizontal,
                column,
                row,
            } => serde_json::to_string(&WallFrame {
                r#type: "move",
                is_horizontal: *horizontal,
                position: [*column, *row],
            }),
            Command::Move(text) => serde_json::to_string(&MoveFrame {
                r#type: "move",
                command: text,
            }),
        };
        // Serializing these frames can't fail
        Some(line.unwrap())
    }
}

fn parse_wall(input: &str) -> Option<Command> {
    let mut parts = input.split_whitespace();
    if parts.next()? != "wall" {
        return None;
    }
    let horizontal = match parts.next()? {
        "h" => true,
        "v" => false,
        _ => return None,
    };
    let column = parts.next()?.parse().ok()?;
    let row = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some(Command::PlaceWall {
        horizontal,
        column,
        row,
    })
}
