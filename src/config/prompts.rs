//! Personas and their system prompts
//!
//! Every request starts with a system message derived from the selected
//! [`Persona`]. The built-in personas map to fixed prompts; the custom persona
//! wraps a user-supplied character description.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A persona the chatbot can adopt
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Persona {
    #[default]
    Friend,
    Teacher,
    Sibling,
    /// User-described character; an empty description falls back to a neutral prompt
    Custom(String),
}

impl Persona {
    /// All persona ids, in display order
    pub const IDS: [&'static str; 4] = ["friend", "teacher", "sibling", "custom"];

    /// Parse a persona id, attaching the custom description when the id is `custom`
    pub fn from_parts(id: &str, custom_character: Option<&str>) -> Result<Self, PromptError> {
        match id.parse::<Persona>()? {
            Persona::Custom(_) => Ok(Persona::Custom(
                custom_character.unwrap_or_default().to_string(),
            )),
            persona => Ok(persona),
        }
    }

    pub fn id(&self) -> &'static str {
        match self {
            Persona::Friend => "friend",
            Persona::Teacher => "teacher",
            Persona::Sibling => "sibling",
            Persona::Custom(_) => "custom",
        }
    }

    pub fn custom_character(&self) -> Option<&str> {
        match self {
            Persona::Custom(character) => Some(character.as_str()),
            _ => None,
        }
    }

    /// Resolve to the system prompt sent ahead of the transcript
    pub fn system_prompt(&self) -> String {
        match self {
            Persona::Friend => builtin::FRIEND.to_string(),
            Persona::Teacher => builtin::TEACHER.to_string(),
            Persona::Sibling => builtin::SIBLING.to_string(),
            Persona::Custom(character) if character.trim().is_empty() => {
                builtin::NEUTRAL.to_string()
            }
            Persona::Custom(character) => format!(
                "You are {}, a character defined by the user. Adopt the personality, tone, and traits described by the user for this character.",
                character.trim()
            ),
        }
    }
}

impl FromStr for Persona {
    type Err = PromptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "friend" => Ok(Persona::Friend),
            "teacher" => Ok(Persona::Teacher),
            "sibling" => Ok(Persona::Sibling),
            "custom" => Ok(Persona::Custom(String::new())),
            _ => Err(PromptError::InvalidPersona(s.to_string())),
        }
    }
}

impl fmt::Display for Persona {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Persona::Custom(character) if !character.trim().is_empty() => {
                write!(f, "custom ({})", character.trim())
            }
            persona => f.write_str(persona.id()),
        }
    }
}

/// Short summary of a persona id for listings
pub fn describe(id: &str) -> &'static str {
    match id {
        "friend" => "Casual, warm and encouraging companion",
        "teacher" => "Patient educator with structured explanations",
        "sibling" => "Playful sibling with humor and honest advice",
        "custom" => "A character you describe yourself",
        _ => "",
    }
}

/// Persona selection as exchanged over the API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonaSelection {
    pub persona: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_character: Option<String>,
}

impl PersonaSelection {
    pub fn resolve(&self) -> Result<Persona, PromptError> {
        Persona::from_parts(&self.persona, self.custom_character.as_deref())
    }
}

impl From<&Persona> for PersonaSelection {
    fn from(persona: &Persona) -> Self {
        Self {
            persona: persona.id().to_string(),
            custom_character: persona.custom_character().map(str::to_string),
        }
    }
}

/// Errors from persona handling
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PromptError {
    #[error("Invalid persona: {0}")]
    InvalidPersona(String),
}

/// Built-in prompts
pub mod builtin {
    pub const FRIEND: &str = "You are a friendly, supportive companion who speaks casually, offers encouragement, and shares light-hearted banter. Respond with warmth and enthusiasm, like a close friend.";

    pub const TEACHER: &str = "You are a knowledgeable, patient educator who explains concepts clearly and concisely. Provide detailed, structured answers with examples, like a dedicated teacher.";

    pub const SIBLING: &str = "You are a playful, relatable sibling who teases gently, shares inside jokes, and offers honest advice. Respond with a mix of humor and care, like a brother or sister.";

    /// Custom persona without a description
    pub const NEUTRAL: &str = "You are a helpful assistant with a neutral tone.";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_prompts_are_fixed() {
        for persona in [Persona::Friend, Persona::Teacher, Persona::Sibling] {
            let prompt = persona.system_prompt();
            assert!(!prompt.is_empty());
            assert_eq!(prompt, persona.system_prompt());
        }
        assert_eq!(Persona::Friend.system_prompt(), builtin::FRIEND);
        assert_eq!(Persona::Teacher.system_prompt(), builtin::TEACHER);
        assert_eq!(Persona::Sibling.system_prompt(), builtin::SIBLING);
        assert_ne!(builtin::FRIEND, builtin::TEACHER);
        assert_ne!(builtin::TEACHER, builtin::SIBLING);
    }

    #[test]
    fn test_custom_prompt() {
        let prompt = Persona::Custom("a sarcastic detective".into()).system_prompt();
        assert!(prompt.contains("a sarcastic detective"));
        assert!(prompt.starts_with("You are a sarcastic detective, a character defined by the user"));
    }

    #[test]
    fn test_custom_without_description_is_neutral() {
        assert_eq!(Persona::Custom(String::new()).system_prompt(), builtin::NEUTRAL);
        assert_eq!(Persona::Custom("   ".into()).system_prompt(), builtin::NEUTRAL);
        assert_eq!(
            Persona::from_parts("custom", None).unwrap().system_prompt(),
            builtin::NEUTRAL
        );
    }

    #[test]
    fn test_parse_ids() {
        assert_eq!("friend".parse::<Persona>().unwrap(), Persona::Friend);
        assert_eq!(" Teacher ".parse::<Persona>().unwrap(), Persona::Teacher);
        assert_eq!("SIBLING".parse::<Persona>().unwrap(), Persona::Sibling);
        assert_eq!(
            Persona::from_parts("custom", Some("a wise wizard")).unwrap(),
            Persona::Custom("a wise wizard".into())
        );
        // Custom text is ignored for built-in personas
        assert_eq!(
            Persona::from_parts("friend", Some("a wise wizard")).unwrap(),
            Persona::Friend
        );
    }

    #[test]
    fn test_unknown_persona() {
        assert_eq!(
            "pirate".parse::<Persona>(),
            Err(PromptError::InvalidPersona("pirate".into()))
        );
        assert!(Persona::from_parts("", None).is_err());
    }

    #[test]
    fn test_selection_round_trip() {
        let persona = Persona::Custom("a wise wizard".into());
        let selection = PersonaSelection::from(&persona);
        assert_eq!(selection.persona, "custom");
        assert_eq!(selection.resolve().unwrap(), persona);

        let selection = PersonaSelection::from(&Persona::Teacher);
        assert!(selection.custom_character.is_none());
    }

    #[test]
    fn test_every_id_has_description() {
        for id in Persona::IDS {
            assert!(!describe(id).is_empty(), "missing description for {}", id);
        }
    }
}
