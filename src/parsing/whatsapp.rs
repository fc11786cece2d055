//! Shared WhatsApp parsing utilities.
//!
//! WhatsApp exports vary by locale and platform. The format is detected
//! from a sample of lines; see [`detect_whatsapp_format`].

use std::cmp::Reverse;
use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;

use crate::error::Result;
use crate::time::parse_with_formats;

/// Line prefix layouts seen in WhatsApp exports.
///
/// The variant decides both the line regex and the chrono formats tried on
/// the captured date and time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateFormat {
    /// `[1/15/24, 10:30:45 AM]` (iOS, US locale)
    US,
    /// `[15.01.24, 10:30:45]`
    EuDotBracketed,
    /// `26.10.2025, 20:40 - ` (Android, RU/DE locales)
    EuDotNoBracket,
    /// `15/01/2024, 10:30 - ` (Android, UK/ES locales)
    EuSlash,
    /// `[15/01/2024, 10:30:45]`
    EuSlashBracketed,
    /// `1/15/24, 9:05 PM - ` (Android, US locale)
    UsDash,
}

impl DateFormat {
    /// Returns the date/time prefix pattern, capturing date and time.
    fn prefix(self) -> &'static str {
        match self {
            DateFormat::US => {
                r"^\[(\d{1,2}/\d{1,2}/\d{2,4}),\s(\d{1,2}:\d{2}(?::\d{2})?(?:\s?[APap]\.?[Mm]\.?)?)\]\s"
            }
            DateFormat::EuDotBracketed => r"^\[(\d{2}\.\d{2}\.\d{2,4}),\s(\d{2}:\d{2}(?::\d{2})?)\]\s",
            DateFormat::EuDotNoBracket => r"^(\d{2}\.\d{2}\.\d{2,4}),\s(\d{2}:\d{2}(?::\d{2})?)\s-\s",
            DateFormat::EuSlash => r"^(\d{2}/\d{2}/\d{2,4}),\s(\d{2}:\d{2}(?::\d{2})?)\s-\s",
            DateFormat::EuSlashBracketed => r"^\[(\d{2}/\d{2}/\d{2,4}),\s(\d{2}:\d{2}(?::\d{2})?)\]\s",
            DateFormat::UsDash => {
                r"^(\d{1,2}/\d{1,2}/\d{2,4}),\s(\d{1,2}:\d{2}(?::\d{2})?\s?[APap]\.?[Mm]\.?)\s-\s"
            }
        }
    }

    /// Returns regex pattern for a sender line: date, time, sender, text.
    pub fn pattern(self) -> String {
        format!(r"{}([^:]+):\s?(.*)", self.prefix())
    }

    /// Returns regex pattern for a notice line without sender: date, time, text.
    pub fn notice_pattern(self) -> String {
        format!(r"{}(.+)", self.prefix())
    }

    /// Returns date parsing format strings for chrono.
    pub fn date_parse_formats(self) -> &'static [&'static str] {
        match self {
            DateFormat::US | DateFormat::UsDash => &[
                "%m/%d/%y, %I:%M:%S %p",
                "%m/%d/%y, %I:%M %p",
                "%m/%d/%Y, %I:%M:%S %p",
                "%m/%d/%Y, %I:%M %p",
                "%m/%d/%y, %H:%M:%S",
                "%m/%d/%y, %H:%M",
                "%m/%d/%Y, %H:%M:%S",
                "%m/%d/%Y, %H:%M",
            ],
            DateFormat::EuDotBracketed | DateFormat::EuDotNoBracket => &[
                "%d.%m.%y, %H:%M:%S",
                "%d.%m.%y, %H:%M",
                "%d.%m.%Y, %H:%M:%S",
                "%d.%m.%Y, %H:%M",
            ],
            DateFormat::EuSlash | DateFormat::EuSlashBracketed => &[
                "%d/%m/%y, %H:%M:%S",
                "%d/%m/%y, %H:%M",
                "%d/%m/%Y, %H:%M:%S",
                "%d/%m/%Y, %H:%M",
            ],
        }
    }

    /// Returns all format variants.
    pub fn all() -> &'static [DateFormat] {
        &[
            DateFormat::US,
            DateFormat::EuDotBracketed,
            DateFormat::EuDotNoBracket,
            DateFormat::EuSlash,
            DateFormat::EuSlashBracketed,
            DateFormat::UsDash,
        ]
    }
}

/// Compiled line patterns for one date format.
pub struct LinePatterns {
    pub format: DateFormat,
    pub message: Regex,
    pub notice: Regex,
}

impl LinePatterns {
    pub fn new(format: DateFormat) -> Option<Self> {
        Some(Self {
            format,
            message: Regex::new(&format.pattern()).ok()?,
            notice: Regex::new(&format.notice_pattern()).ok()?,
        })
    }
}

static DETECTORS: LazyLock<Vec<LinePatterns>> = LazyLock::new(|| {
    DateFormat::all()
        .iter()
        .filter_map(|&format| LinePatterns::new(format))
        .collect()
});

/// Removes invisible marks WhatsApp inserts (LRM, BOM) and normalizes the
/// narrow no-break space iOS puts before AM/PM.
pub fn clean_line(line: &str) -> String {
    line.chars()
        .filter(|c| !matches!(c, '\u{200e}' | '\u{200f}' | '\u{feff}'))
        .map(|c| if matches!(c, '\u{202f}' | '\u{a0}') { ' ' } else { c })
        .collect()
}

/// Reads the captured date and time of a line as a UTC instant.
///
/// Lower-case and dotted meridiems (`p.m.`) are accepted.
pub fn parse_whatsapp_timestamp(
    date_str: &str,
    time_str: &str,
    format: DateFormat,
) -> Result<DateTime<Utc>> {
    let meridiem_clean = time_str.replace('.', "").to_uppercase();
    parse_with_formats(&format!("{date_str}, {meridiem_clean}"), format.date_parse_formats())
}

/// Notices WhatsApp writes with a sender-like prefix. Latin phrases are
/// matched case-insensitively, the others verbatim.
const LATIN_NOTICES: &[&str] = &[
    "messages and calls are end-to-end encrypted",
    "created group",
    "changed the subject",
    "changed this group's icon",
    "changed the group description",
    "deleted this group's icon",
    "changed their phone number",
    "joined using this group's invite link",
    "security code changed",
    "you're now an admin",
    "is now an admin",
    "turned on disappearing messages",
    "turned off disappearing messages",
    "los mensajes y las llamadas están cifrados de extremo a extremo",
    "creó el grupo",
    "cambió el asunto",
];

const CYRILLIC_NOTICES: &[&str] = &[
    "Сообщения и звонки защищены сквозным шифрованием",
    "создал(а) группу",
    "изменил тему",
    "изменил иконку группы",
    "изменил описание группы",
    "удалил иконку группы",
    "изменил номер телефона",
    "присоединился по ссылке",
    "код безопасности изменён",
    "теперь администратор",
    "включил исчезающие сообщения",
    "выключил исчезающие сообщения",
];

/// Returns `true` for service notices: a known notice phrase, or a sender
/// that is blank or WhatsApp itself.
pub fn is_whatsapp_system_message(sender: &str, content: &str) -> bool {
    let sender = sender.trim();
    if sender.is_empty() || sender.eq_ignore_ascii_case("whatsapp") || sender.eq_ignore_ascii_case("system") {
        return true;
    }
    let lowered = content.to_lowercase();
    LATIN_NOTICES.iter().any(|notice| lowered.contains(notice))
        || CYRILLIC_NOTICES.iter().any(|notice| content.contains(notice))
}

/// Picks the layout that best explains `lines`.
///
/// A line scores for a format when it matches the line pattern and its
/// timestamp parses, which separates `DD/MM` from `M/D` exports whenever a
/// day above 12 appears. Returns the best-scoring format, or `None` if no
/// format matches any line.
pub fn detect_whatsapp_format(lines: &[&str]) -> Option<DateFormat> {
    let cleaned: Vec<String> = lines.iter().map(|line| clean_line(line)).collect();
    let score = |detector: &LinePatterns| -> usize {
        cleaned
            .iter()
            .filter_map(|line| detector.message.captures(line))
            .map(|caps| {
                let date = caps.get(1).map_or("", |m| m.as_str());
                let time = caps.get(2).map_or("", |m| m.as_str());
                if parse_whatsapp_timestamp(date, time, detector.format).is_ok() { 2 } else { 1 }
            })
            .sum()
    };

    // min_by_key keeps the first of equal keys, so ties go to the earlier layout
    DETECTORS
        .iter()
        .map(|detector| (score(detector), detector.format))
        .filter(|(points, _)| *points > 0)
        .min_by_key(|(points, _)| Reverse(*points))
        .map(|(_, format)| format)
}
