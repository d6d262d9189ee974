use crate::flows::BranchFlow;
use crate::recover::Voltages;
use num_complex::Complex64;
use pretty_dtoa::{dtoa, FmtFloatConfig};

const FLOAT_CONFIG: FmtFloatConfig = FmtFloatConfig::default()
    .add_point_zero(false)
    .max_significant_digits(9);

pub fn format_f64_vec(v: &[f64]) -> String {
    let a: Vec<String> = v.iter().map(|f| dtoa(*f, FLOAT_CONFIG)).collect();
    format!("[{}]", a.join(", "))
}

fn format_complex(z: &Complex64) -> String {
    format!(
        "{}{}j{}",
        dtoa(z.re, FLOAT_CONFIG),
        if z.im.signum() < 0.0 { "-" } else { "+" },
        dtoa(z.im.abs(), FLOAT_CONFIG)
    )
}

pub fn format_rect_vec(v: &[Complex64]) -> String {
    let a: Vec<String> = v.iter().map(format_complex).collect();
    format!("[{}]", a.join(", "))
}

/// Voltages as `[|V|∠deg°, ...]`.
pub fn format_voltages(v: &Voltages) -> String {
    let a: Vec<String> = v
        .vm
        .iter()
        .zip(v.va_deg())
        .map(|(m, a)| {
            format!(
                "{}\u{2220}{}\u{00B0}",
                dtoa(*m, FLOAT_CONFIG),
                dtoa(a, FLOAT_CONFIG)
            )
        })
        .collect();
    format!("[{}]", a.join(", "))
}

/// Flows as `[(f, t): S_ft / S_tf, ...]`.
pub fn format_flows(flows: &[BranchFlow]) -> String {
    let a: Vec<String> = flows
        .iter()
        .map(|fl| {
            format!(
                "({}, {}): {} / {}",
                fl.from,
                fl.to,
                format_complex(&fl.s_ft),
                format_complex(&fl.s_tf)
            )
        })
        .collect();
    format!("[{}]", a.join(", "))
}
