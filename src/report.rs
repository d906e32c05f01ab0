use serde::Serialize;
use std::io::{self, Write};
use vizmorph::{RuleDiagnostic, Suggestion, SuggestionReport, UNKNOWN_TAG, WorkbookModel};

mod ansi {
    pub const RESET: &str = "\x1b[0m";
    pub const DIM: &str = "\x1b[2m";
    pub const BOLD: &str = "\x1b[1m";

    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const BLUE: &str = "\x1b[34m";
    pub const RED: &str = "\x1b[31m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GRAY: &str = "\x1b[90m";

    pub struct Palette {
        enabled: bool,
    }

    impl Palette {
        pub fn new(enabled: bool) -> Self {
            Self { enabled }
        }

        pub fn paint(&self, s: impl AsRef<str>, color: &str) -> String {
            if self.enabled { format!("{}{}{}", color, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn bold(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", BOLD, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn dim(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", DIM, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    workbook: &'a WorkbookModel,
    suggestions: &'a [Suggestion],
    diagnostics: &'a [RuleDiagnostic],
}

pub fn print_json(workbook: &WorkbookModel, report: &SuggestionReport) -> io::Result<()> {
    let out = JsonReport { workbook, suggestions: &report.suggestions, diagnostics: &report.diagnostics };
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, &out)?;
    writeln!(stdout)
}

pub fn print_run(workbook: &WorkbookModel, report: &SuggestionReport, color: bool) {
    let palette = ansi::Palette::new(color);
    println!(
        "\n{}",
        palette.bold(palette.paint(
            format!("⚙  Workbook: \"{}\" ({})", workbook.summary.name, workbook.filename),
            ansi::CYAN
        ))
    );
    println!(
        "  {}",
        palette.dim(format!(
            "{} worksheets │ {} dashboards │ {} stories │ {} datasources",
            workbook.summary.worksheet_count,
            workbook.summary.dashboard_count,
            workbook.summary.story_count,
            workbook.datasources.len()
        ))
    );

    println!("\n{}", palette.paint("━━━ Worksheets ━━━", ansi::GRAY));
    print_worksheets(workbook, report, &palette);

    println!("\n{}", palette.paint("━━━ Suggestions ━━━", ansi::GRAY));
    if report.suggestions.is_empty() {
        println!("{}", palette.dim("  No suggestions"));
        println!("\n{}", palette.paint("Possible reasons:", ansi::YELLOW));
        println!("  • Worksheets have no dimension/measure fields");
        println!("  • Rules are disabled in the configuration");
        println!("  • Ranking filters (min_confidence, max_suggestions) dropped everything");
        println!("\n{}", palette.dim("  Tip: Set RUST_LOG=vizmorph=debug to see which rules fired"));
    } else {
        print_suggestions(&report.suggestions, &palette);
    }

    if !report.diagnostics.is_empty() {
        println!("\n{}", palette.paint("━━━ Rule failures ━━━", ansi::GRAY));
        for d in &report.diagnostics {
            println!(
                "  {} {} {}",
                palette.paint(d.rule, ansi::RED),
                palette.dim(format!("on \"{}\":", d.worksheet)),
                d.message
            );
        }
    }

    println!("\n{}", palette.paint("━━━ Timing ━━━", ansi::GRAY));
    let metrics = &report.metrics;
    println!(
        "  Total: {}  │  Rank: {}  │  Emitted: {}  │  Kept: {}",
        palette.paint(format!("{:?}", metrics.total), ansi::GREEN),
        palette.dim(format!("{:?}", metrics.rank)),
        palette.paint(metrics.emitted.to_string(), ansi::BLUE),
        palette.paint(metrics.kept.to_string(), ansi::BLUE),
    );
    for rule in &metrics.rules {
        let failures = if rule.failures > 0 {
            palette.paint(format!("failed: {}", rule.failures), ansi::RED)
        } else {
            String::new()
        };
        println!(
            "  {} {}  {} {}  {}",
            palette.paint(format!("{:<24}", rule.rule), ansi::CYAN),
            palette.dim(format!("{:?}", rule.elapsed)),
            palette.dim("emitted:"),
            palette.paint(rule.emitted.to_string(), ansi::YELLOW),
            failures
        );
    }
    println!();
}

fn print_worksheets(workbook: &WorkbookModel, report: &SuggestionReport, palette: &ansi::Palette) {
    if workbook.worksheets.is_empty() {
        println!("{}", palette.dim("  No worksheets"));
        return;
    }
    for (ws, traits) in workbook.worksheets.iter().zip(&report.traits) {
        let current = ws.viz_type.map(|v| v.as_str()).unwrap_or(UNKNOWN_TAG);
        println!(
            "  {} {} {}",
            palette.bold(&ws.name),
            palette.paint(current, ansi::BLUE),
            palette.dim(format!("(mark: {})", ws.mark_type)),
        );
        println!(
            "      {} {}  {} {}",
            palette.dim("dimensions:"),
            ws.dimensions.join(", "),
            palette.dim("│ measures:"),
            ws.measures.join(", "),
        );
        println!("      {} {}", palette.dim("traits:"), palette.paint(traits.traits.to_string(), ansi::GRAY));
    }
}

fn print_suggestions(suggestions: &[Suggestion], palette: &ansi::Palette) {
    for (idx, s) in suggestions.iter().enumerate() {
        println!(
            "  {} {} {} {}",
            palette.paint(format!("[{}]", idx), ansi::GRAY),
            palette.bold(palette.paint(format!("{:.2}", s.confidence), ansi::GREEN)),
            palette.paint(s.viz_type.as_str(), ansi::BLUE),
            s.title,
        );
        let mapping: Vec<String> = s.data_mapping.iter().map(|(role, value)| format!("{role}={value}")).collect();
        println!("      {} {}", palette.dim("mapping:"), palette.paint(mapping.join("  "), ansi::YELLOW));
        println!("      {}", palette.dim(&s.rationale));
    }
}
