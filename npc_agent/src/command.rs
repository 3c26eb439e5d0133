//! Operator commands read from stdin.
//!
//! ```text
//! 12.5 -3 1.57          confirm a pose (x y theta, or x,y,theta)
//! set Velocity=2.0      edit a property by panel label or field name
//! props                 print the current properties
//! help                  list commands
//! quit                  leave
//! ```

use npc_core::PoseEvent;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Pose(PoseEvent),
    Set { name: String, value: String },
    Props,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        match word.to_ascii_lowercase().as_str() {
            "" => Err("empty command".to_string()),
            "quit" | "exit" | "q" => Ok(Command::Quit),
            "help" | "?" => Ok(Command::Help),
            "props" | "properties" => Ok(Command::Props),
            "set" => {
                let (name, value) = rest
                    .split_once('=')
                    .ok_or_else(|| format!("Expected 'set <name>=<value>', got '{}'", line))?;
                let name = name.trim();
                if name.is_empty() {
                    return Err("Property name is empty".to_string());
                }
                Ok(Command::Set {
                    name: name.to_string(),
                    value: value.trim().to_string(),
                })
            }
            _ => line.parse::<PoseEvent>().map(Command::Pose),
        }
    }
}

pub const HELP: &str = "\
commands:
  <x> <y> <theta>       place an object (x,y,theta also accepted)
  set <name>=<value>    edit a property, e.g. set Z position=0.5
  props                 show the current properties
  help                  show this text
  quit                  exit";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pose() {
        assert_eq!(
            "12.5 -3 1.57".parse::<Command>(),
            Ok(Command::Pose(PoseEvent::new(12.5, -3.0, 1.57)))
        );
        assert_eq!(
            "  1,2,0  ".parse::<Command>(),
            Ok(Command::Pose(PoseEvent::new(1.0, 2.0, 0.0)))
        );
    }

    #[test]
    fn test_parse_set_keeps_spaces_in_label() {
        assert_eq!(
            "set Theta std deviation = 0.1".parse::<Command>(),
            Ok(Command::Set {
                name: "Theta std deviation".to_string(),
                value: "0.1".to_string(),
            })
        );
        assert_eq!(
            "SET topic=/npc/objects".parse::<Command>(),
            Ok(Command::Set {
                name: "topic".to_string(),
                value: "/npc/objects".to_string(),
            })
        );
    }

    #[test]
    fn test_parse_keywords() {
        assert_eq!("quit".parse::<Command>(), Ok(Command::Quit));
        assert_eq!("Q".parse::<Command>(), Ok(Command::Quit));
        assert_eq!("help".parse::<Command>(), Ok(Command::Help));
        assert_eq!("props".parse::<Command>(), Ok(Command::Props));
    }

    #[test]
    fn test_parse_errors() {
        assert!("".parse::<Command>().is_err());
        assert!("set velocity".parse::<Command>().is_err());
        assert!("set =1".parse::<Command>().is_err());
        assert!("1 2".parse::<Command>().is_err());
        assert!("jump 1 2 3".parse::<Command>().is_err());
    }
}
