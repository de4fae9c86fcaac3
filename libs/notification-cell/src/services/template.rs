// libs/notification-cell/src/services/template.rs
use std::sync::OnceLock;

use regex::Regex;

use crate::models::NotificationContext;

/// Canonical spelling of the confirmation-link placeholder. Every
/// case variant found in a template is folded into this one.
pub const LINK_PLACEHOLDER: &str = "{enlaceconfirmacion}";

const CONTEXT_PLACEHOLDERS: [&str; 7] = [
    "paciente",
    "profesional",
    "sucursal",
    "servicio",
    "fecha",
    "hora",
    "modalidad",
];

fn link_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\{enlaceconfirmacion\}").unwrap())
}

fn placeholder_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(&format!(
            r"(?i)\{{(enlaceconfirmacion|{})\}}",
            CONTEXT_PLACEHOLDERS.join("|")
        ))
        .unwrap()
    })
}

/// Canonicalize every case variant of the link placeholder.
pub fn normalize(template: &str) -> String {
    link_regex()
        .replace_all(template, LINK_PLACEHOLDER)
        .into_owned()
}

/// Whether rendering this template will need a confirmation link.
/// Callers must check this before minting a token so that messages
/// without the placeholder never touch the token table.
pub fn needs_confirmation_link(template: &str) -> bool {
    link_regex().is_match(template)
}

/// Substitute every occurrence of every placeholder. Missing optional
/// fields render as empty strings. When no link is supplied the link
/// placeholder is left literal so the message still goes out.
///
/// Substitution is a single pass over the original template, so
/// placeholder-shaped text inside a substituted value lands verbatim.
pub fn render(template: &str, context: &NotificationContext, link: Option<&str>) -> String {
    placeholder_regex()
        .replace_all(template, |caps: &regex::Captures| {
            match caps[1].to_ascii_lowercase().as_str() {
                "enlaceconfirmacion" => link.unwrap_or(LINK_PLACEHOLDER).to_string(),
                "paciente" => context.patient_name.clone(),
                "profesional" => context.professional_name.clone(),
                "sucursal" => context.branch_name.clone(),
                "servicio" => context.service_name.clone().unwrap_or_default(),
                "fecha" => context.date.format("%d-%m-%Y").to_string(),
                "hora" => context.time.format("%H:%M").to_string(),
                "modalidad" => context.modality.clone(),
                _ => unreachable!(),
            }
        })
        .into_owned()
}
