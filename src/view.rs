//! HTML page: shared contact field, one panel per risk track, outcome notices

use std::fmt::Write;

use serde::Deserialize;

use crate::alert::AlertOutcome;
use crate::models::{
    DisasterType, FeatureVector, InputError, ModelKind, RiskTrack, FEATURE_COUNT, PHONE_NUMBER_MAX_LEN,
};
use crate::pipeline::{SubmissionError, SubmissionOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
    Warning,
    Info,
}

impl NoticeKind {
    fn css_class(&self) -> &'static str {
        match self {
            Self::Success => "notice success",
            Self::Error => "notice error",
            Self::Warning => "notice warning",
            Self::Info => "notice info",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

impl Notice {
    fn new(kind: NoticeKind, text: impl Into<String>) -> Self {
        Self { kind, text: text.into() }
    }
}

/// Widget values of one panel
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelValues {
    pub model: ModelKind,
    pub features: FeatureVector,
}

impl PanelValues {
    pub fn defaults(track: DisasterType) -> Self {
        Self {
            model: ModelKind::default(),
            features: track.default_features(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PageView {
    pub active: Option<DisasterType>,
    pub phone_number: String,
    pub flood: PanelValues,
    pub earthquake: PanelValues,
    pub notices: Vec<Notice>,
}

impl Default for PageView {
    fn default() -> Self {
        Self {
            active: None,
            phone_number: String::new(),
            flood: PanelValues::defaults(DisasterType::Flood),
            earthquake: PanelValues::defaults(DisasterType::Earthquake),
            notices: Vec::new(),
        }
    }
}

/// The whole page form as the browser posts it: both panels and the shared
/// contact field, whichever button was pressed
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageForm {
    #[serde(default)]
    pub phone_number: String,

    #[serde(default)]
    pub flood_model: ModelKind,
    pub rainfall_mm: Option<f64>,
    pub river_level_m: Option<f64>,
    pub soil_moisture_pct: Option<f64>,
    pub temperature_c: Option<f64>,

    #[serde(default)]
    pub earthquake_model: ModelKind,
    pub magnitude: Option<f64>,
    pub depth_km: Option<f64>,
    pub distance_km: Option<f64>,
    pub population_density: Option<f64>,
}

impl PageForm {
    fn raw(&self, track: DisasterType) -> (ModelKind, [Option<f64>; FEATURE_COUNT]) {
        match track {
            DisasterType::Flood => (
                self.flood_model,
                [self.rainfall_mm, self.river_level_m, self.soil_moisture_pct, self.temperature_c],
            ),
            DisasterType::Earthquake => (
                self.earthquake_model,
                [self.magnitude, self.depth_km, self.distance_km, self.population_density],
            ),
        }
    }

    /// Widget values to echo; absent fields show their defaults
    pub fn panel(&self, track: DisasterType) -> PanelValues {
        let (model, raw) = self.raw(track);
        let mut features = track.default_features();
        for (slot, value) in features.iter_mut().zip(raw) {
            if let Some(value) = value {
                *slot = value;
            }
        }
        PanelValues { model, features }
    }

    /// The submission of track `T`; every field of that panel must be present
    pub fn input<T: RiskTrack>(&self) -> Result<T, InputError> {
        let (model, raw) = self.raw(T::TRACK);
        let mut features = [0.0; FEATURE_COUNT];
        for ((slot, value), field) in features.iter_mut().zip(raw).zip(T::TRACK.fields().iter()) {
            *slot = value.ok_or(InputError::Missing(field.name))?;
        }
        Ok(T::from_features(model, features, self.phone_number.clone()))
    }
}

impl PageView {
    /// Page echoing everything that was posted, with `active` as the
    /// submitted panel
    pub fn for_form(form: &PageForm, active: DisasterType) -> Self {
        Self {
            active: Some(active),
            phone_number: form.phone_number.clone(),
            flood: form.panel(DisasterType::Flood),
            earthquake: form.panel(DisasterType::Earthquake),
            notices: Vec::new(),
        }
    }

    pub fn panel(&self, track: DisasterType) -> &PanelValues {
        match track {
            DisasterType::Flood => &self.flood,
            DisasterType::Earthquake => &self.earthquake,
        }
    }
}

/// Notices for a completed submission: the risk verdict, then the alert step
pub fn outcome_notices(outcome: &SubmissionOutcome) -> Vec<Notice> {
    let track = outcome.disaster_type;
    let mut notices = Vec::new();

    if outcome.prediction.is_high_risk() {
        notices.push(Notice::new(NoticeKind::Error, track.high_risk_notice()));
    } else {
        notices.push(Notice::new(NoticeKind::Success, track.low_risk_notice()));
    }

    notices.extend(alert_notice(&outcome.alert));
    notices
}

fn alert_notice(alert: &AlertOutcome) -> Option<Notice> {
    match alert {
        AlertOutcome::NotRequired => None,
        AlertOutcome::MissingDestination => Some(Notice::new(
            NoticeKind::Warning,
            "Please enter a phone number to receive alerts.",
        )),
        AlertOutcome::Sent { delivery_id } => Some(Notice::new(
            NoticeKind::Info,
            format!("SMS Alert sent! (message id {})", delivery_id),
        )),
    }
}

/// Notices for a failed submission
pub fn error_notices(err: &SubmissionError) -> Vec<Notice> {
    match err {
        SubmissionError::Invalid(e) => vec![Notice::new(
            NoticeKind::Warning,
            format!("Invalid input: {}", e),
        )],
        SubmissionError::Model(_) => vec![Notice::new(
            NoticeKind::Error,
            "Prediction failed. Please try again later.",
        )],
        SubmissionError::Gateway(_) => vec![Notice::new(
            NoticeKind::Error,
            "Failed to send the SMS alert. The submission was not saved.",
        )],
        SubmissionError::Store { alert, .. } => {
            let mut notices: Vec<Notice> = alert_notice(alert).into_iter().collect();
            notices.push(Notice::new(
                NoticeKind::Error,
                "Failed to save the submission.",
            ));
            notices
        }
    }
}

pub fn render_page(view: &PageView) -> String {
    let mut html = String::with_capacity(8 * 1024);

    html.push_str(PAGE_HEAD);
    html.push_str("<main>\n<h1>🌪️ Smart Disaster Risk Prediction System</h1>\n");
    html.push_str("<form method=\"post\" action=\"/predict/flood\">\n");

    let _ = write!(
        html,
        "<div class=\"contact\"><label for=\"phone_number\">Enter phone number for alerts (+91...):</label>\n\
         <input type=\"text\" id=\"phone_number\" name=\"phone_number\" maxlength=\"{}\" value=\"{}\"></div>\n",
        PHONE_NUMBER_MAX_LEN,
        escape_html(&view.phone_number),
    );

    for track in DisasterType::ALL {
        render_panel(&mut html, view, track);
    }

    html.push_str("</form>\n</main>\n</body>\n</html>\n");
    html
}

fn render_panel(html: &mut String, view: &PageView, track: DisasterType) {
    let values = view.panel(track);
    let slug = track.slug();
    let name = track.as_str();

    let _ = write!(html, "<section id=\"{slug}\">\n<h2>{}</h2>\n", track.panel_title());

    if view.active == Some(track) {
        for notice in &view.notices {
            let _ = writeln!(
                html,
                "<p class=\"{}\">{}</p>",
                notice.kind.css_class(),
                escape_html(&notice.text)
            );
        }
    }

    let _ = write!(
        html,
        "<label for=\"{slug}_model\">Select {name} Model</label>\n<select id=\"{slug}_model\" name=\"{slug}_model\">\n"
    );
    for model in ModelKind::ALL {
        let selected = if model == values.model { " selected" } else { "" };
        let _ = writeln!(
            html,
            "<option value=\"{}\"{selected}>{}</option>",
            model.id(),
            model.label()
        );
    }
    html.push_str("</select>\n");

    for (field, value) in track.fields().iter().zip(values.features) {
        let _ = write!(
            html,
            "<label for=\"{0}\">{1}</label>\n\
             <input type=\"number\" id=\"{0}\" name=\"{0}\" min=\"{2}\" max=\"{3}\" step=\"{4}\" value=\"{5}\" required>\n",
            field.name, field.label, field.min, field.max, field.step, value
        );
    }

    let _ = write!(
        html,
        "<button type=\"submit\" formaction=\"/predict/{slug}\">Predict {name} Risk</button>\n</section>\n"
    );
}

pub fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

const PAGE_HEAD: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Smart Disaster Predictor</title>
<style>
main { max-width: 42rem; margin: 2rem auto; font-family: sans-serif; }
section { border: 1px solid #ddd; border-radius: 6px; padding: 1rem; margin-top: 1rem; }
label { display: block; margin-top: .75rem; }
input, select { width: 100%; padding: .3rem; }
button { margin-top: 1rem; padding: .5rem 1rem; }
.notice { padding: .6rem; border-radius: 4px; }
.success { background: #e6f4ea; }
.error { background: #fce8e6; }
.warning { background: #fef7e0; }
.info { background: #e8f0fe; }
</style>
</head>
<body>
"#;
