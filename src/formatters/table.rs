use crate::types::ParsedName;
use std::io::IsTerminal;

pub fn format(names: &[ParsedName]) -> String {
    let colors = Colors::enabled();

    let mut widths = ColWidths {
        verbatim: "Verbatim".len(),
        canonical: "Canonical".len(),
        authorship: "Authorship".len(),
        quality: "Quality".len(),
    };
    let rows: Vec<Row<'_>> = names.iter().map(Row::from).collect();
    for r in &rows {
        widths.verbatim = widths.verbatim.max(r.verbatim.chars().count());
        widths.canonical = widths.canonical.max(r.canonical.chars().count());
        widths.authorship = widths.authorship.max(r.authorship.chars().count());
    }

    let gutter: usize = 4;
    let sep = " ".repeat(gutter);

    let header_plain = [
        format!("{:<w$}", "Verbatim", w = widths.verbatim),
        format!("{:<w$}", "Canonical", w = widths.canonical),
        format!("{:<w$}", "Authorship", w = widths.authorship),
        format!("{:>w$}", "Quality", w = widths.quality),
    ]
    .join(&sep);
    let sep_len =
        widths.verbatim + widths.canonical + widths.authorship + widths.quality + gutter * 3;
    let separator = "-".repeat(sep_len);

    let mut lines = Vec::with_capacity(rows.len() + 4);
    lines.push(colors.bold(&header_plain));
    lines.push(separator.clone());
    for r in &rows {
        lines.push(format_row(r, &widths, &colors, &sep));
    }
    lines.push(separator);
    lines.push(summary(names, &colors));

    lines.join("\n")
}

struct Row<'a> {
    verbatim: &'a str,
    canonical: &'a str,
    authorship: &'a str,
    genus: &'a str,
    quality: u8,
}

impl<'a> From<&'a ParsedName> for Row<'a> {
    fn from(n: &'a ParsedName) -> Self {
        let canonical = n.canonical().unwrap_or("");
        Row {
            verbatim: n.verbatim.as_str(),
            canonical,
            authorship: n.authorship().map_or("", |a| a.value.as_str()),
            genus: canonical.split(' ').next().unwrap_or(""),
            quality: n.quality,
        }
    }
}

struct ColWidths {
    verbatim: usize,
    canonical: usize,
    authorship: usize,
    quality: usize,
}

fn format_row(r: &Row<'_>, w: &ColWidths, colors: &Colors, sep: &str) -> String {
    let verbatim_plain = format!("{:<w$}", r.verbatim, w = w.verbatim);
    let canonical_plain = format!("{:<w$}", r.canonical, w = w.canonical);
    let authorship_plain = format!("{:<w$}", r.authorship, w = w.authorship);
    let quality_plain = format!("{:>w$}", r.quality, w = w.quality);

    // Same genus, same hue
    let canonical_col = colors.paint(&canonical_plain, hue_code(stable_hash_color(r.genus)));
    let authorship_col = colors.paint(&authorship_plain, "90");
    let quality_col = colors.paint(&quality_plain, quality_code(r.quality));

    [verbatim_plain, canonical_col, authorship_col, quality_col].join(sep)
}

fn summary(names: &[ParsedName], colors: &Colors) -> String {
    let parsed = names.iter().filter(|n| n.parsed).count();
    let warned = names.iter().filter(|n| n.quality > 1).count();
    let line = format!(
        "Parsed {} of {} names, {} with warnings",
        format_num(parsed),
        format_num(names.len()),
        format_num(warned)
    );
    colors.paint(&line, "1;97")
}

fn quality_code(q: u8) -> &'static str {
    match q {
        0 => "91", // bright red
        1 => "92", // bright green
        2 => "93", // bright yellow
        _ => "95", // bright magenta
    }
}

fn format_num(n: usize) -> String {
    let s = n.to_string();
    let mut out = String::with_capacity(s.len() + s.len() / 3);
    for (i, c) in s.chars().enumerate() {
        if i > 0 && (s.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

fn stable_hash_color(s: &str) -> u8 {
    let mut h: u32 = 0xcbf29ce4; // FNV-ish
    for b in s.as_bytes() {
        h ^= u32::from(*b);
        h = h.wrapping_mul(0x01000193);
    }
    (h % 6) as u8
}

fn hue_code(idx: u8) -> &'static str {
    match idx {
        0 => "32", // green
        1 => "36", // cyan
        2 => "33", // yellow
        3 => "35", // magenta
        4 => "34", // blue
        _ => "31", // red
    }
}

struct Colors {
    enabled: bool,
}

impl Colors {
    fn enabled() -> Self {
        let force = std::env::var("CLICOLOR_FORCE")
            .ok()
            .filter(|v| v != "0")
            .is_some();
        let no_color = std::env::var_os("NO_COLOR").is_some();
        let clicolor_zero = std::env::var("CLICOLOR").is_ok_and(|v| v == "0");
        let enabled = if force {
            true
        } else if no_color || clicolor_zero {
            false
        } else {
            std::io::stdout().is_terminal()
        };
        Colors { enabled }
    }

    fn paint(&self, s: &str, code: &str) -> String {
        if self.enabled {
            format!("\x1b[{code}m{s}\x1b[0m")
        } else {
            s.to_string()
        }
    }

    fn bold(&self, s: &str) -> String {
        self.paint(s, "1")
    }
}
