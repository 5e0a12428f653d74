//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use progeny_curator::Combination;
use progeny_gatekeeper::BatchValidation;
use progeny_stats::{
    AnalysisReport, BootstrapEstimate, ChiSquareTest, ComparisonReport, FamilySummary, Measure,
    TTest,
};
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format per-file validation results.
    pub fn format_validation(&self, batches: &[BatchValidation]) -> Result<String> {
        match self.format {
            OutputFormat::Json => validation_json(batches),
            OutputFormat::Table => Ok(self.validation_table(batches)),
        }
    }

    /// Format a combination summary and conflict audit.
    pub fn format_combination(&self, combination: &Combination) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&combination.summary)?),
            OutputFormat::Table => Ok(self.combination_table(combination)),
        }
    }

    /// Format a full analysis report.
    pub fn format_analysis(&self, report: &AnalysisReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
            OutputFormat::Table => Ok(self.analysis_table(report)),
        }
    }

    /// Format a two-corpus comparison.
    pub fn format_comparison(&self, report: &ComparisonReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
            OutputFormat::Table => Ok(self.comparison_table(report)),
        }
    }

    fn validation_table(&self, batches: &[BatchValidation]) -> String {
        let mut sections = Vec::new();

        let rows = batches
            .iter()
            .map(|batch| {
                vec![
                    batch.corpus.label().unwrap_or("-").to_string(),
                    batch.total.to_string(),
                    batch.accepted().to_string(),
                    batch.rejected().to_string(),
                    batch.corpus.complete().len().to_string(),
                    percent(batch.usable_family_data_rate()),
                ]
            })
            .collect();
        sections.push(table(
            &["Dataset", "Rows", "Accepted", "Rejected", "Complete", "Usable"],
            rows,
        ));

        let rejections: Vec<Vec<String>> = batches
            .iter()
            .flat_map(|batch| {
                let label = batch.corpus.label().unwrap_or("-").to_string();
                batch.rejections.iter().map(move |r| {
                    vec![
                        label.clone(),
                        r.index.to_string(),
                        r.name.clone().unwrap_or_else(|| "-".into()),
                        r.reason.to_string(),
                    ]
                })
            })
            .collect();

        if rejections.is_empty() {
            sections.push(self.success("No rows rejected"));
        } else {
            sections.push(self.warning(&format!("{} row(s) rejected", rejections.len())));
            sections.push(table(&["Dataset", "Row", "Name", "Reason"], rejections));
        }

        sections.join("\n\n")
    }

    fn combination_table(&self, combination: &Combination) -> String {
        let summary = &combination.summary;
        let mut sections = vec![
            self.colorize("Combination", "cyan"),
            table(
                &["Input", "Duplicates", "Unique", "Duplicate rate"],
                vec![vec![
                    summary.input_records.to_string(),
                    summary.duplicates_dropped.to_string(),
                    summary.unique_records.to_string(),
                    percent(summary.duplicate_rate()),
                ]],
            ),
        ];

        if !summary.datasets.is_empty() {
            let rows = summary
                .datasets
                .iter()
                .map(|d| {
                    vec![
                        d.label.clone(),
                        d.input_records.to_string(),
                        d.kept_records.to_string(),
                    ]
                })
                .collect();
            sections.push(table(&["Dataset", "Input", "Kept"], rows));
        }

        if summary.conflicts.is_empty() {
            sections.push(self.success("No conflicting counts"));
        } else {
            sections.push(self.warning(&format!(
                "{} conflicting count(s) between duplicates",
                summary.conflict_count()
            )));
            let rows = summary
                .conflicts
                .iter()
                .map(|c| {
                    let values: Vec<String> = c.values.iter().map(u32::to_string).collect();
                    vec![
                        c.identity_key.to_string(),
                        c.session.clone().unwrap_or_else(|| "-".into()),
                        c.field.to_string(),
                        values.join(" / "),
                    ]
                })
                .collect();
            sections.push(table(&["Identity", "Session", "Field", "Values"], rows));
        }

        sections.join("\n\n")
    }

    fn analysis_table(&self, report: &AnalysisReport) -> String {
        let mut sections = vec![
            self.colorize("Family summary", "cyan"),
            summary_table(&[("Corpus", &report.summary)]),
        ];

        if let Some(missing) = &report.missing_daughters {
            sections.push(self.info(&format!(
                "Missing daughters at natural ratio {}: {:.1} ({} observed, {:.1} expected of {} children)",
                missing.natural_sex_ratio,
                missing.missing_daughters,
                missing.observed_daughters,
                missing.expected_daughters,
                missing.total_children
            )));
        }

        let mut tests = Vec::new();
        if let Some(se) = &report.sex_ratio_se {
            tests.push(bootstrap_row("Sex ratio SE", &report.summary.sex_ratio, se));
        }
        if let Some(se) = &report.proportion_daughters_se {
            tests.push(bootstrap_row(
                "Proportion daughters SE",
                &report.summary.proportion_daughters,
                se,
            ));
        }
        if let Some(t) = &report.one_sample {
            tests.push(t_row("One-sample t", t));
        }
        if let Some(chi) = &report.goodness_of_fit {
            tests.push(chi_row("Goodness of fit", chi));
        }
        if !tests.is_empty() {
            sections.push(self.colorize("Significance", "cyan"));
            sections.push(table(&["Test", "Estimate", "Statistic", "df", "p"], tests));
        }

        if let Some(field) = report.grouped_by {
            sections.push(self.colorize(&format!("By {}", field.as_str()), "cyan"));
            let rows = report
                .groups
                .iter()
                .map(|g| {
                    vec![
                        g.key.clone(),
                        g.count.to_string(),
                        g.complete_records.to_string(),
                        g.total_sons.to_string(),
                        g.total_daughters.to_string(),
                        g.sex_ratio.to_string(),
                        g.proportion_daughters.to_string(),
                        if g.low_confidence {
                            self.colorize("low", "yellow")
                        } else {
                            "ok".to_string()
                        },
                    ]
                })
                .collect();
            sections.push(table(
                &[
                    "Group",
                    "Records",
                    "Complete",
                    "Sons",
                    "Daughters",
                    "Sex ratio",
                    "Prop. daughters",
                    "Confidence",
                ],
                rows,
            ));
        }

        if !report.largest_families.is_empty() {
            sections.push(self.colorize("Largest families", "cyan"));
            let rows = report
                .largest_families
                .iter()
                .map(|f| {
                    vec![
                        f.name.clone(),
                        f.party.clone().unwrap_or_else(|| "-".into()),
                        f.sons.to_string(),
                        f.daughters.to_string(),
                        f.total_children.to_string(),
                    ]
                })
                .collect();
            sections.push(table(&["Name", "Party", "Sons", "Daughters", "Total"], rows));
        }

        for note in &report.notes {
            sections.push(self.warning(note));
        }

        sections.join("\n\n")
    }

    fn comparison_table(&self, report: &ComparisonReport) -> String {
        let mut sections = vec![
            self.colorize("Family summary", "cyan"),
            summary_table(&[("Left", &report.left), ("Right", &report.right)]),
        ];

        let mut tests = Vec::new();
        if let Some(t) = &report.proportions {
            tests.push(t_row("Two-sample t", t));
        }
        if let Some(chi) = &report.counts {
            tests.push(chi_row("Chi-square 2x2", chi));
        }
        if !tests.is_empty() {
            sections.push(self.colorize("Significance", "cyan"));
            sections.push(table(&["Test", "Estimate", "Statistic", "df", "p"], tests));
        }

        for note in &report.notes {
            sections.push(self.warning(note));
        }

        sections.join("\n\n")
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().bold().to_string(),
            _ => text.to_string(),
        }
    }
}

fn validation_json(batches: &[BatchValidation]) -> Result<String> {
    let datasets: Vec<serde_json::Value> = batches
        .iter()
        .map(|batch| {
            let rejections: Vec<serde_json::Value> = batch
                .rejections
                .iter()
                .map(|r| {
                    serde_json::json!({
                        "index": r.index,
                        "name": r.name,
                        "kind": r.reason.kind(),
                        "reason": r.reason.to_string(),
                    })
                })
                .collect();
            serde_json::json!({
                "dataset": batch.corpus.label(),
                "total": batch.total,
                "accepted": batch.accepted(),
                "rejected": batch.rejected(),
                "complete": batch.corpus.complete().len(),
                "acceptance_rate": batch.acceptance_rate(),
                "usable_family_data_rate": batch.usable_family_data_rate(),
                "rejections_by_kind": batch.rejections.counts_by_kind(),
                "rejections": rejections,
            })
        })
        .collect();

    Ok(serde_json::to_string_pretty(&datasets)?)
}

fn table(header: &[&str], rows: Vec<Vec<String>>) -> String {
    let mut builder = Builder::default();
    builder.push_record(header.iter().copied());
    for row in rows {
        builder.push_record(row);
    }

    let mut table = builder.build();
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()));

    table.to_string()
}

fn summary_table(columns: &[(&str, &FamilySummary)]) -> String {
    let mut header = vec![""];
    header.extend(columns.iter().map(|(name, _)| *name));

    let line = |label: &str, value: fn(&FamilySummary) -> String| {
        let mut row = vec![label.to_string()];
        row.extend(columns.iter().map(|(_, s)| value(s)));
        row
    };

    let rows = vec![
        line("Records", |s| s.records.to_string()),
        line("Complete counts", |s| s.complete_records.to_string()),
        line("Completeness", |s| percent(s.completeness)),
        line("With children", |s| s.with_children.to_string()),
        line("Sons", |s| s.total_sons.to_string()),
        line("Daughters", |s| s.total_daughters.to_string()),
        line("Children", |s| s.total_children.to_string()),
        line("Sex ratio (sons/daughter)", |s| s.sex_ratio.to_string()),
        line("Mean sons", |s| s.mean_sons.to_string()),
        line("Mean daughters", |s| s.mean_daughters.to_string()),
        line("Mean children", |s| s.mean_total_children.to_string()),
        line("Proportion daughters", |s| s.proportion_daughters.to_string()),
        line("Pooled proportion daughters", |s| {
            s.pooled_proportion_daughters.to_string()
        }),
    ];

    table(&header, rows)
}

fn bootstrap_row(name: &str, estimate: &Measure, se: &BootstrapEstimate) -> Vec<String> {
    vec![
        name.to_string(),
        format!("{} ± {:.4}", estimate, se.standard_error),
        format!("{} resamples", se.iterations),
        "-".to_string(),
        "-".to_string(),
    ]
}

fn t_row(name: &str, test: &TTest) -> Vec<String> {
    vec![
        name.to_string(),
        format!("{:+.4}", test.mean_difference),
        format!("t = {:.4}", test.statistic),
        format!("{:.1}", test.degrees_of_freedom),
        p_value(test.p_value),
    ]
}

fn chi_row(name: &str, test: &ChiSquareTest) -> Vec<String> {
    let estimate = if test.is_degenerate() {
        "degenerate".to_string()
    } else if test.yates_corrected {
        "Yates".to_string()
    } else {
        "-".to_string()
    };
    vec![
        name.to_string(),
        estimate,
        format!("χ² = {:.4}", test.statistic),
        test.degrees_of_freedom.to_string(),
        p_value(test.p_value),
    ]
}

fn percent(rate: Option<f64>) -> String {
    rate.map(|r| format!("{:.1}%", r * 100.0))
        .unwrap_or_else(|| "n/a".to_string())
}

fn p_value(p: f64) -> String {
    if p < 1e-4 {
        "< 0.0001".to_string()
    } else {
        format!("{:.4}", p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use progeny_curator::DatasetCombiner;
    use progeny_domain::{PoliticianRecord, RawRecord, SourceTag};
    use progeny_gatekeeper::RecordValidator;
    use progeny_stats::{analyze, compare, AnalysisConfig, GroupField};

    fn batch() -> BatchValidation {
        RecordValidator::default_config().validate_batch(
            &[
                RawRecord::named("Asha").sons(2).daughters(1).party("INC"),
                RawRecord::named("Vikram").sons("three").daughters(2).party("BJP"),
                RawRecord::named("").sons(1),
                RawRecord::named("Ravi").sons(-1),
            ],
            SourceTag::Manual,
            Some("lok_sabha"),
        )
    }

    fn plain(format: OutputFormat) -> Formatter {
        Formatter::new(format, false)
    }

    #[test]
    fn test_validation_table_lists_rejections() {
        let output = plain(OutputFormat::Table)
            .format_validation(&[batch()])
            .unwrap();
        assert!(output.contains("lok_sabha"));
        assert!(output.contains("2 row(s) rejected"));
        assert!(output.contains("missing identity"));
        assert!(output.contains("invalid sons value"));
    }

    #[test]
    fn test_validation_json() {
        let output = plain(OutputFormat::Json)
            .format_validation(&[batch()])
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value[0]["accepted"], 2);
        assert_eq!(value[0]["rejected"], 2);
        assert_eq!(value[0]["rejections_by_kind"]["MissingIdentity"], 1);
        assert_eq!(value[0]["rejections"][1]["kind"], "InvalidFieldValue");
    }

    #[test]
    fn test_combination_output() {
        let batch = batch();
        let combination = DatasetCombiner::default_config()
            .combine(&[batch.corpus.clone(), batch.corpus])
            .unwrap();

        let table = plain(OutputFormat::Table)
            .format_combination(&combination)
            .unwrap();
        assert!(table.contains("No conflicting counts"));

        let json = plain(OutputFormat::Json)
            .format_combination(&combination)
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["input_records"], 4);
        assert_eq!(value["unique_records"], 2);
    }

    #[test]
    fn test_analysis_output() {
        let config = AnalysisConfig {
            bootstrap_iterations: 100,
            ..AnalysisConfig::default()
        };
        let report = analyze(batch().corpus.records(), &config, Some(GroupField::Party));

        let table = plain(OutputFormat::Table).format_analysis(&report).unwrap();
        assert!(table.contains("Family summary"));
        assert!(table.contains("By party"));
        assert!(table.contains("Vikram"));

        let json = plain(OutputFormat::Json).format_analysis(&report).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["summary"]["total_sons"], 5);
        assert_eq!(value["summary"]["sex_ratio"]["defined"], 5.0 / 3.0);
    }

    #[test]
    fn test_comparison_notes_are_shown() {
        let left = batch();
        let right: Vec<PoliticianRecord> = Vec::new();
        let report = compare(left.corpus.records(), &right, &AnalysisConfig::default());

        let table = plain(OutputFormat::Table).format_comparison(&report).unwrap();
        assert!(table.contains("Left"));
        assert!(table.contains("two-sample t-test"));
    }

    #[test]
    fn test_percent_and_p_value() {
        assert_eq!(percent(Some(0.5)), "50.0%");
        assert_eq!(percent(None), "n/a");
        assert_eq!(p_value(0.00001), "< 0.0001");
        assert_eq!(p_value(0.05), "0.0500");
    }

    #[test]
    fn test_no_color() {
        let formatter = plain(OutputFormat::Table);
        assert_eq!(formatter.success("done"), "✓ done");
        assert_eq!(formatter.error("failed"), "✗ failed");
    }
}
