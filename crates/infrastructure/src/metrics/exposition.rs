//! Text exposition format (`text/plain; version=0.0.4`).

use dns_sidecar_application::ports::MetricKind;
use std::fmt::Write;

/// Point-in-time copy of one metric family, detached from the registry.
#[derive(Debug, Clone)]
pub struct FamilySnapshot {
    pub name: String,
    pub kind: MetricKind,
    pub help: Option<String>,
    pub label_keys: Vec<String>,
    /// Label values in `label_keys` order, sorted, with the raw cell bits.
    pub samples: Vec<(Vec<String>, u64)>,
}

pub fn render(families: &[FamilySnapshot]) -> String {
    let mut out = String::with_capacity(families.len() * 128);
    for family in families {
        render_family(&mut out, family);
    }
    out
}

fn render_family(out: &mut String, family: &FamilySnapshot) {
    // Writing into a String cannot fail.
    if let Some(help) = &family.help {
        let _ = writeln!(out, "# HELP {} {}", family.name, escape_help(help));
    }
    let _ = writeln!(out, "# TYPE {} {}", family.name, family.kind);

    for (values, bits) in &family.samples {
        out.push_str(&family.name);
        if !values.is_empty() {
            out.push('{');
            for (i, (key, value)) in family.label_keys.iter().zip(values).enumerate() {
                if i > 0 {
                    out.push(',');
                }
                let _ = write!(out, "{}=\"{}\"", key, escape_label_value(value));
            }
            out.push('}');
        }
        out.push(' ');
        match family.kind {
            MetricKind::Counter => {
                let _ = write!(out, "{}", bits);
            }
            MetricKind::Gauge => out.push_str(&format_float(f64::from_bits(*bits))),
        }
        out.push('\n');
    }
}

pub fn escape_label_value(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            c => escaped.push(c),
        }
    }
    escaped
}

fn escape_help(help: &str) -> String {
    help.replace('\\', "\\\\").replace('\n', "\\n")
}

pub fn format_float(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value == f64::INFINITY {
        "+Inf".to_string()
    } else if value == f64::NEG_INFINITY {
        "-Inf".to_string()
    } else {
        value.to_string()
    }
}
