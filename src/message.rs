use std::fmt;

use serde::Deserialize;

/// One classified inbound frame.
///
/// Classification never fails: a line that is not valid JSON, or that carries
/// an unknown `type`, becomes `Raw` and is passed through untouched so the
/// read loop keeps going.
#[derive(Debug, Eq, PartialEq)]
pub enum ServerMessage {
    Welcome { message: String },
    Waiting,
    GameStarted,
    GameEnded { message: String },
    Error { message: String },
    Raw(String),
}

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum KnownMessage {
    Welcome {
        #[serde(default)]
        message: String,
    },
    Waiting,
    GameStarted,
    GameEnded {
        #[serde(default)]
        message: String,
    },
    Error {
        #[serde(default)]
        message: String,
    },
}

impl ServerMessage {
    pub fn classify(line: &str) -> Self {
        match serde_json::from_str::<KnownMessage>(line) {
            Ok(KnownMessage::Welcome { message }) => ServerMessage::Welcome { message },
            Ok(KnownMessage::Waiting) => ServerMessage::Waiting,
            Ok(KnownMessage::GameStarted) => ServerMessage::GameStarted,
            Ok(KnownMessage::GameEnded { message }) => ServerMessage::GameEnded { message },
            Ok(KnownMessage::Error { message }) => ServerMessage::Error { message },
            Err(error) => {
                debug!("Could not decode message. error={error}, line={line}");
                ServerMessage::Raw(line.to_string())
            }
        }
    }
}

impl fmt::Display for ServerMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerMessage::Welcome { message } => write!(f, "Connected to server: {message}"),
            ServerMessage::Waiting => write!(f, "Waiting for opponent..."),
            ServerMessage::GameStarted => write!(f, "Game started!"),
            ServerMessage::GameEnded { message } if message.is_empty() => write!(f, "Game ended"),
            ServerMessage::GameEnded { message } => write!(f, "Game ended: {message}"),
            ServerMessage::Error { message } => write!(f, "Server error: {message}"),
            ServerMessage::Raw(line) => write!(f, "Received message: {line}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_welcome() {
        let message = ServerMessage::classify(r#"{"type":"welcome","message":"hi"}"#);
        assert_eq!(
            message,
            ServerMessage::Welcome {
                message: "hi".to_string()
            }
        );
        assert_eq!(message.to_string(), "Connected to server: hi");
    }

    #[test]
    fn test_classify_welcome_without_payload() {
        // A known kind with a missing payload field yields an empty value
        let message = ServerMessage::classify(r#"{"type":"welcome"}"#);
        assert_eq!(
            message,
            ServerMessage::Welcome {
                message: String::new()
            }
        );
    }

    #[test]
    fn test_classify_no_payload_kinds() {
        assert_eq!(
            ServerMessage::classify(r#"{"type":"waiting"}"#),
            ServerMessage::Waiting
        );
        assert_eq!(
            ServerMessage::classify(r#"{"type":"game_started"}"#),
            ServerMessage::GameStarted
        );
    }

    #[test]
    fn test_classify_ignores_extra_fields() {
        let message =
            ServerMessage::classify(r#"{"type":"game_ended","message":"you won","turns":42}"#);
        assert_eq!(
            message,
            ServerMessage::GameEnded {
                message: "you won".to_string()
            }
        );
    }

    #[test]
    fn test_classify_error() {
        let message = ServerMessage::classify(r#"{"type":"error","message":"bad move"}"#);
        assert_eq!(
            message,
            ServerMessage::Error {
                message: "bad move".to_string()
            }
        );
        assert_eq!(message.to_string(), "Server error: bad move");
    }

    #[test]
    fn test_classify_error_without_payload() {
        assert_eq!(
            ServerMessage::classify(r#"{"type":"error"}"#),
            ServerMessage::Error {
                message: String::new()
            }
        );
    }

    #[test]
    fn test_classify_unknown_type_is_raw() {
        let line = r#"{"type":"next_turn","player":1}"#;
        assert_eq!(
            ServerMessage::classify(line),
            ServerMessage::Raw(line.to_string())
        );
    }

    #[test]
    fn test_classify_malformed_is_raw() {
        for line in ["", "not json", r#"{"type":"welcome"#, "\"unbalanced"] {
            assert_eq!(
                ServerMessage::classify(line),
                ServerMessage::Raw(line.to_string())
            );
        }
    }
}
