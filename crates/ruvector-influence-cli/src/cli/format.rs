//! Output formatting utilities

use colored::*;

use super::commands::{BenchRow, SeedsOutput, SpreadOutput};

fn join_ids(ids: &[usize]) -> String {
    ids.iter()
        .map(usize::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Format the result of `seeds`
pub fn format_seeds(out: &SeedsOutput) -> String {
    let kpt = if out.kpt.converged {
        format!(
            "{:.3} (converged after {} rounds)",
            out.kpt.value,
            out.kpt.rounds.len()
        )
    } else {
        format!("{:.3} ({})", out.kpt.value, "fallback to k".yellow())
    };

    let mut s = format!(
        "{} Selected {} seeds with {} in {:.1} ms\n",
        "✓".green().bold(),
        out.seeds.len().to_string().cyan(),
        out.strategy.to_string().cyan(),
        out.wall_time_ms,
    );
    s.push_str(&format!("  Graph: {} ({} nodes, {} edges)\n", out.input.display(), out.nodes, out.edges));
    s.push_str(&format!("  Seeds: {}\n", join_ids(&out.seeds).bold()));
    s.push_str(&format!("  Lambda: {:.1}\n", out.lambda));
    s.push_str(&format!("  KPT: {kpt}\n"));
    s.push_str(&format!("  Theta: {}\n", out.theta));

    if let Some(events) = &out.events {
        s.push_str(&format!("\n{}\n", "Events".bold().green()));
        for (i, event) in events.iter().enumerate() {
            s.push_str(&format!("  {:>3}. {}\n", i + 1, event.name()));
        }
    }
    s
}

/// Format the result of `spread`
pub fn format_spread(out: &SpreadOutput) -> String {
    format!(
        "{} Estimated spread {} ({} over {} samples)\n  Seeds: {}\n",
        "✓".green().bold(),
        format!("{:.3}", out.estimate.value).cyan().bold(),
        out.estimate.method,
        out.estimate.samples,
        join_ids(&out.seeds),
    )
}

/// Format `bench` rows as an aligned table
pub fn format_bench_table(rows: &[BenchRow]) -> String {
    let header = format!(
        "{:<32} {:>9} {:>10} {:>8} {:>4} {:>10} {:>12} {:>10}",
        "input", "nodes", "edges", "strategy", "k", "theta", "time (ms)", "spread"
    );
    let mut s = format!("{}\n", header.bold());
    for row in rows {
        let name = row
            .input
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| row.input.display().to_string());
        s.push_str(&format!(
            "{:<32} {:>9} {:>10} {:>8} {:>4} {:>10} {:>12.2} {:>10.3}\n",
            name,
            row.nodes,
            row.edges,
            row.strategy.to_string(),
            row.k,
            row.theta,
            row.wall_time_ms,
            row.spread,
        ));
    }
    s
}

/// Format error message
pub fn format_error(msg: &str) -> String {
    format!("{} {}", "Error:".red().bold(), msg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ruvector_influence::Strategy;
    use std::path::PathBuf;

    #[test]
    fn bench_table_has_header_and_rows() {
        colored::control::set_override(false);
        let rows = vec![
            BenchRow {
                input: PathBuf::from("/data/graph.txt"),
                nodes: 10,
                edges: 20,
                strategy: Strategy::Ris,
                k: 2,
                theta: 1234,
                wall_time_ms: 5.0,
                spread: 4.5,
            },
            BenchRow {
                input: PathBuf::from("/data/graph.txt"),
                nodes: 10,
                edges: 20,
                strategy: Strategy::Degree,
                k: 2,
                theta: 1234,
                wall_time_ms: 0.1,
                spread: 3.25,
            },
        ];
        let table = format_bench_table(&rows);
        let lines: Vec<_> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("input"));
        assert!(lines[1].starts_with("graph.txt"));
        assert!(lines[2].contains("degree"));
        assert!(lines[2].contains("3.250"));
    }

    #[test]
    fn join_ids_is_comma_separated() {
        assert_eq!(join_ids(&[3, 1, 4]), "3, 1, 4");
        assert_eq!(join_ids(&[]), "");
    }
}
