//! Attendance status levels and their colours

use std::fmt;

use serde::{Deserialize, Serialize};
use sm_core::{PaletteEntry, ProjectionStyle, Rgb};

/// Normalized symposium attendance status, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum StatusLevel {
    KeynoteSpeaker,
    GeneralParticipant,
    Declined,
    OrganisingCommittee,
    SessionPresentation,
    PanelDiscussion,
    Sponsor,
    Invited,
    Stakeholder,
}

impl StatusLevel {
    pub const ALL: [StatusLevel; 9] = [
        StatusLevel::KeynoteSpeaker,
        StatusLevel::GeneralParticipant,
        StatusLevel::Declined,
        StatusLevel::OrganisingCommittee,
        StatusLevel::SessionPresentation,
        StatusLevel::PanelDiscussion,
        StatusLevel::Sponsor,
        StatusLevel::Invited,
        StatusLevel::Stakeholder,
    ];

    /// Map free-form status text onto a level.
    ///
    /// Keyword rules are checked in order against the lower-cased text; the
    /// first hit wins.
    pub fn normalize(raw: &str) -> Self {
        let text = raw.to_lowercase();
        if text.contains("keynote") {
            StatusLevel::KeynoteSpeaker
        } else if text.contains("general") && text.contains("participant") {
            StatusLevel::GeneralParticipant
        } else if text.contains("declined") {
            StatusLevel::Declined
        } else if text.contains("organising") {
            StatusLevel::OrganisingCommittee
        } else if text.contains("session") || text.contains("oral") {
            StatusLevel::SessionPresentation
        } else if text.contains("panel") {
            StatusLevel::PanelDiscussion
        } else if text.contains("sponsor") {
            StatusLevel::Sponsor
        } else if matches!(text.trim(), "tbc" | "to be confirmed") {
            StatusLevel::Invited
        } else {
            StatusLevel::Stakeholder
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StatusLevel::KeynoteSpeaker => "Keynote speaker",
            StatusLevel::GeneralParticipant => "General Participant",
            StatusLevel::Declined => "Declined",
            StatusLevel::OrganisingCommittee => "Organising Committee",
            StatusLevel::SessionPresentation => "Session presentation",
            StatusLevel::PanelDiscussion => "Panel discussion",
            StatusLevel::Sponsor => "Sponsor",
            StatusLevel::Invited => "Invited to attend Symposium",
            StatusLevel::Stakeholder => "Stakeholder",
        }
    }

    pub fn colour(self) -> Rgb {
        match self {
            StatusLevel::KeynoteSpeaker => Rgb::new(0x2e, 0xcc, 0x71),
            StatusLevel::GeneralParticipant => Rgb::new(0xff, 0xff, 0xb3),
            StatusLevel::Declined => Rgb::new(0xe7, 0x4c, 0x3c),
            StatusLevel::OrganisingCommittee => Rgb::new(0x34, 0x98, 0xdb),
            StatusLevel::SessionPresentation => Rgb::new(0xf1, 0xc4, 0x0f),
            StatusLevel::PanelDiscussion => Rgb::new(0x9b, 0x59, 0xb6),
            StatusLevel::Sponsor => Rgb::new(0xd4, 0xac, 0x0d),
            StatusLevel::Invited => Rgb::new(0xf3, 0x9c, 0x12),
            StatusLevel::Stakeholder => Rgb::new(0x80, 0x80, 0x80),
        }
    }

    /// Level whose label is exactly `label`
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|level| level.label() == label)
    }
}

impl fmt::Display for StatusLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Projection style for stakeholder records: names as labels, status colours,
/// and the given table columns.
pub fn stakeholder_style(table_columns: &[String]) -> ProjectionStyle {
    ProjectionStyle {
        label_attribute: "Name".to_string(),
        colour_attribute: "Status".to_string(),
        palette: StatusLevel::ALL
            .into_iter()
            .map(|level| PaletteEntry {
                value: level.label().to_string(),
                colour: level.colour(),
            })
            .collect(),
        fallback_colour: StatusLevel::Stakeholder.colour(),
        table_columns: table_columns.to_vec(),
        detail_attributes: vec!["Position".to_string(), "Affiliation".to_string()],
        place_attributes: vec!["City".to_string(), "Country".to_string()],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_rules() {
        let cases = [
            ("Confirmed KEYNOTE", StatusLevel::KeynoteSpeaker),
            ("General participant (online)", StatusLevel::GeneralParticipant),
            ("general", StatusLevel::Stakeholder),
            ("Declined - travel", StatusLevel::Declined),
            ("Organising committee", StatusLevel::OrganisingCommittee),
            ("Oral presentation", StatusLevel::SessionPresentation),
            ("Session 3", StatusLevel::SessionPresentation),
            ("Panel", StatusLevel::PanelDiscussion),
            ("Gold sponsor", StatusLevel::Sponsor),
            ("  TBC ", StatusLevel::Invited),
            ("To be confirmed", StatusLevel::Invited),
            ("tbc maybe", StatusLevel::Stakeholder),
            ("", StatusLevel::Stakeholder),
            ("nan", StatusLevel::Stakeholder),
        ];
        for (raw, expected) in cases {
            assert_eq!(StatusLevel::normalize(raw), expected, "raw status {:?}", raw);
        }
    }

    #[test]
    fn test_earlier_rules_win() {
        // both "keynote" and "declined" appear
        assert_eq!(StatusLevel::normalize("declined keynote"), StatusLevel::KeynoteSpeaker);
        assert_eq!(StatusLevel::normalize("panel sponsor"), StatusLevel::PanelDiscussion);
    }

    #[test]
    fn test_palette_order_and_colours() {
        let style = stakeholder_style(&[]);
        let labels: Vec<&str> = style.palette.iter().map(|e| e.value.as_str()).collect();
        assert_eq!(labels.len(), 9);
        assert_eq!(labels[0], "Keynote speaker");
        assert_eq!(labels[8], "Stakeholder");
        assert_eq!(style.colour_for(Some("Declined")).to_hex(), "#e74c3c");
        assert_eq!(style.colour_for(Some("Sponsor")).to_hex(), "#d4ac0d");
    }

    #[test]
    fn test_label_lookup() {
        for level in StatusLevel::ALL {
            assert_eq!(StatusLevel::from_label(level.label()), Some(level));
        }
        assert_eq!(StatusLevel::from_label("keynote speaker"), None);
    }
}
