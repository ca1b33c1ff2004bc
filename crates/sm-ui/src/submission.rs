//! "Submit stakeholder" form that prepares a mailto link

use egui::{ComboBox, Grid, RichText, TextEdit, Ui};
use sm_data::StatusLevel;
use tracing::info;

use crate::theme::success_color;

/// Fields of a new stakeholder submission
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionForm {
    pub name: String,
    pub department: String,
    pub position: String,
    pub country: String,
    pub city: String,
    pub status: StatusLevel,
    /// Link built by the last "Prepare Email" click
    prepared: Option<String>,
}

impl Default for SubmissionForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            department: String::new(),
            position: String::new(),
            country: String::new(),
            city: String::new(),
            status: StatusLevel::Stakeholder,
            prepared: None,
        }
    }
}

impl SubmissionForm {
    /// Labelled values in email order
    pub fn fields(&self) -> [(&'static str, &str); 6] {
        [
            ("Name", self.name.as_str()),
            ("Department/Program", self.department.as_str()),
            ("Position", self.position.as_str()),
            ("Country", self.country.as_str()),
            ("City", self.city.as_str()),
            ("Status", self.status.label()),
        ]
    }

    /// One `Key: value` line per field
    pub fn email_body(&self) -> String {
        self.fields()
            .iter()
            .map(|(key, value)| format!("{}: {}", key, value.trim()))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn mailto(&self, recipient: &str, subject: &str) -> String {
        format!(
            "mailto:{}?subject={}&body={}",
            recipient,
            percent_encode(subject),
            percent_encode(&self.email_body())
        )
    }

    pub fn prepared_link(&self) -> Option<&str> {
        self.prepared.as_deref()
    }

    pub fn ui(&mut self, ui: &mut Ui, recipient: &str, subject: &str) {
        ui.vertical_centered(|ui| {
            ui.heading("Submit New Stakeholder");
        });
        ui.add_space(12.0);

        Grid::new("submission_form")
            .num_columns(2)
            .spacing([12.0, 8.0])
            .show(ui, |ui| {
                for (label, value) in [
                    ("Name", &mut self.name),
                    ("Department / Program", &mut self.department),
                    ("Position", &mut self.position),
                    ("Country", &mut self.country),
                    ("City", &mut self.city),
                ] {
                    ui.label(label);
                    ui.add(TextEdit::singleline(value).desired_width(320.0));
                    ui.end_row();
                }

                ui.label("Status");
                ComboBox::from_id_source("submission_status")
                    .selected_text(self.status.label())
                    .width(320.0)
                    .show_ui(ui, |ui| {
                        for level in StatusLevel::ALL {
                            ui.selectable_value(&mut self.status, level, level.label());
                        }
                    });
                ui.end_row();
            });

        ui.add_space(12.0);
        if ui.button("Prepare Email").clicked() {
            info!(recipient, "submission email prepared");
            self.prepared = Some(self.mailto(recipient, subject));
        }

        if let Some(link) = &self.prepared {
            ui.add_space(8.0);
            egui::Frame::group(ui.style()).show(ui, |ui| {
                ui.hyperlink_to(
                    RichText::new("✉ Click to send your submission").color(success_color()),
                    link,
                );
            });
        }
    }
}

/// Percent-encode everything outside the unreserved set (and `/`)
pub fn percent_encode(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for byte in text.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' | b'/' => out.push(byte as char),
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_encode() {
        assert_eq!(percent_encode("New Extrusion Symposium Stakeholder"), "New%20Extrusion%20Symposium%20Stakeholder");
        assert_eq!(percent_encode("a/b:c\n"), "a/b%3Ac%0A");
        assert_eq!(percent_encode("São"), "S%C3%A3o");
    }

    #[test]
    fn test_mailto_body_lines() {
        let form = SubmissionForm {
            name: "Ana Lima".into(),
            department: "Food Science".into(),
            position: "Professor".into(),
            country: "Brazil".into(),
            city: "Campinas".into(),
            status: StatusLevel::PanelDiscussion,
            ..SubmissionForm::default()
        };

        assert_eq!(
            form.email_body(),
            "Name: Ana Lima\nDepartment/Program: Food Science\nPosition: Professor\n\
             Country: Brazil\nCity: Campinas\nStatus: Panel discussion"
        );

        let link = form.mailto("jordan.pennells@csiro.au", "New Extrusion Symposium Stakeholder");
        assert!(link.starts_with(
            "mailto:jordan.pennells@csiro.au?subject=New%20Extrusion%20Symposium%20Stakeholder&body=Name%3A%20Ana%20Lima%0A"
        ));
        assert!(link.ends_with("Status%3A%20Panel%20discussion"));
    }

    #[test]
    fn test_default_status_is_stakeholder() {
        let form = SubmissionForm::default();
        assert!(form.email_body().ends_with("Status: Stakeholder"));
        assert_eq!(form.prepared_link(), None);
    }
}
