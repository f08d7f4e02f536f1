//! Contract with the external player engine that decodes and renders media.

use serde::{Deserialize, Serialize};

/// How a seek amount is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeekUnit {
    #[default]
    Seconds,
    Fraction,
}

/// Commands the controller sends to the engine. All of them are
/// fire-and-forget; the engine reports back through [`EngineEvent`]s.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum EngineCommand {
    Play,
    Pause,
    Seek { amount: f64, unit: SeekUnit },
    SetVolume { volume: f64 },
    SetMuted { muted: bool },
}

/// Callbacks coming out of the engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "engine", rename_all = "snake_case")]
pub enum EngineEvent {
    Play,
    Pause,
    Ended,
    Progress { played: f64 },
    Duration { seconds: f64 },
}

pub trait MediaEngine: Send {
    fn execute(&mut self, command: EngineCommand);
}

impl<F> MediaEngine for F
where
    F: FnMut(EngineCommand) + Send,
{
    fn execute(&mut self, command: EngineCommand) {
        self(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closures_are_engines() {
        let mut sent: Vec<EngineCommand> = Vec::new();
        {
            let mut engine = |command: EngineCommand| sent.push(command);
            engine.execute(EngineCommand::Play);
            engine.execute(EngineCommand::Seek {
                amount: 0.5,
                unit: SeekUnit::Fraction,
            });
        }
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0], EngineCommand::Play);
    }

    #[test]
    fn engine_events_parse_from_json() {
        let event: EngineEvent =
            serde_json::from_str(r#"{"engine":"progress","played":0.25}"#).unwrap();
        assert_eq!(event, EngineEvent::Progress { played: 0.25 });
        let event: EngineEvent =
            serde_json::from_str(r#"{"engine":"duration","seconds":120}"#).unwrap();
        assert_eq!(event, EngineEvent::Duration { seconds: 120.0 });
    }
}
