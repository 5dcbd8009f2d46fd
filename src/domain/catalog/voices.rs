use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::DEFAULT_MODEL;

/// Interface languages that carry their own voice list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Zh,
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Zh => "zh",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Zh => "中文",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "en" => Some(Language::En),
            "zh" => Some(Language::Zh),
            _ => None,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Voice {
    pub id: String,
    pub name: String,
    /// Value sent to the vendor as `voice`
    pub value: String,
    pub gender: Gender,
    pub language: Language,
}

const MALE_SPEAKERS: [(&str, &str, &str); 4] = [
    ("alex", "Alex", "亚历克斯"),
    ("benjamin", "Benjamin", "本杰明"),
    ("charles", "Charles", "查尔斯"),
    ("david", "David", "大卫"),
];

const FEMALE_SPEAKERS: [(&str, &str, &str); 4] = [
    ("anna", "Anna", "安娜"),
    ("bella", "Bella", "贝拉"),
    ("claire", "Claire", "克莱尔"),
    ("diana", "Diana", "黛安娜"),
];

// Female voices first so the language default is the head of its list.
static VOICES: Lazy<Vec<Voice>> = Lazy::new(|| {
    let mut voices = Vec::new();
    for language in [Language::En, Language::Zh] {
        for (gender, speakers) in [
            (Gender::Female, &FEMALE_SPEAKERS),
            (Gender::Male, &MALE_SPEAKERS),
        ] {
            for (speaker, en_name, zh_name) in speakers.iter() {
                voices.push(Voice {
                    id: format!("{}_{}", speaker, language.code()),
                    name: match language {
                        Language::En => en_name.to_string(),
                        Language::Zh => zh_name.to_string(),
                    },
                    value: format!("{}:{}", DEFAULT_MODEL, speaker),
                    gender,
                    language,
                });
            }
        }
    }
    voices
});

pub fn voices_for(language: Language) -> impl Iterator<Item = &'static Voice> {
    VOICES.iter().filter(move |v| v.language == language)
}

/// First female voice of the language
pub fn default_voice(language: Language) -> &'static Voice {
    voices_for(language)
        .find(|v| v.gender == Gender::Female)
        .unwrap_or(&VOICES[0])
}

/// Look a voice up by catalog id (`anna_en`) or vendor value
pub fn find_voice(key: &str) -> Option<&'static Voice> {
    VOICES.iter().find(|v| v.id == key || v.value == key)
}
